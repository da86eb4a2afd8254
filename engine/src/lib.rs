//! Tiller Engine Library
//!
//! This library provides the directive-reasoning engine: a single-shot,
//! deterministic pipeline that turns a free-text directive and a
//! caller-supplied memory set into a structured reply and an updated memory
//! set. It is used by both the `tiller` binary and integration tests.

/// Configuration management module
pub mod config;

/// Directive intake and normalization module
pub mod intake;

/// Memory store module (retrieval, reinforcement, decay, insertion)
pub mod memory;

/// Plan decomposition module
pub mod planner;

/// Narrative analysis module
pub mod analyzer;

/// Action synthesis and confidence scoring module
pub mod synthesizer;

/// Memory-change reflection module
pub mod reflector;

/// Pipeline orchestration and response composition module
pub mod pipeline;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
