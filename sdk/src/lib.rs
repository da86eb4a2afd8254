//! Tiller SDK
//!
//! Shared library providing the wire types, error taxonomy, and the agent
//! handle seam used by both the engine and the API boundary.

/// Agent handle trait connecting boundaries to the engine
pub mod agent;

/// Error types and handling
pub mod errors;

/// Wire types for memory entries and agent messages
pub mod types;

// Re-export commonly used types
pub use agent::AgentHandle;
pub use errors::{EngineError, TillerErrorExt};
pub use types::{seed_memory, AgentAction, AgentMessage, MemoryEntry, Role};
