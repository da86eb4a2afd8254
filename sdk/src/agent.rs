//! Agent handle trait
//!
//! Boundaries (the HTTP API server, the CLI) talk to the reasoning engine
//! through this seam instead of linking the engine crate directly. The
//! engine crate provides the implementation and wires it in at startup.

use chrono::{DateTime, Utc};

use crate::types::{AgentMessage, MemoryEntry};

/// Handle to a directive-reasoning engine.
///
/// `process` is total: it must not fail or panic for any non-empty directive
/// and any well-formed memory set (including empty). The clock is passed in
/// explicitly so that identical `(directive, memory, now)` inputs always
/// yield identical outputs.
pub trait AgentHandle: Send + Sync {
    /// Run one directive through the reasoning pipeline.
    ///
    /// Returns the composed reply and the complete updated memory set. The
    /// caller owns both; the engine retains nothing across calls.
    fn process(
        &self,
        directive: &str,
        memory: Vec<MemoryEntry>,
        now: DateTime<Utc>,
    ) -> (AgentMessage, Vec<MemoryEntry>);
}
