//! Error types and handling
//!
//! The reasoning engine itself is total: it never fails for a non-empty
//! directive and a well-formed memory set. These error types cover the
//! boundaries around it (configuration, the memory file, the network
//! listener), and carry user-facing hints via the `TillerErrorExt` trait.

use thiserror::Error;

/// Trait for Tiller error extensions
///
/// Provides additional context for errors: a user-friendly hint that is safe
/// to display, and whether the error is recoverable without intervention.
pub trait TillerErrorExt {
    /// Returns a user-friendly hint for the error
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    fn is_recoverable(&self) -> bool;
}

/// Main engine error type
///
/// Covers everything that can fail around the reasoning pipeline. Error
/// messages never include internal detail that the boundary would need to
/// scrub before returning to a caller.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Directive was empty or whitespace-only; rejected before the engine runs
    #[error("Message is required.")]
    EmptyDirective,

    /// Configuration is invalid or could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// The caller-owned memory file could not be read or written
    #[error("Memory file error: {0}")]
    MemoryFile(String),

    /// JSON serialization or deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Network listener error
    #[error("Network error: {0}")]
    Network(String),
}

impl TillerErrorExt for EngineError {
    fn user_hint(&self) -> &str {
        match self {
            EngineError::EmptyDirective => "Provide a non-empty directive and try again",
            EngineError::Config(_) => "Check the configuration file syntax and values",
            EngineError::MemoryFile(_) => "Check that the memory file exists and is valid JSON",
            EngineError::Serialization(_) => "The payload was not valid JSON for this operation",
            EngineError::Network(_) => "Check that the address is available and not in use",
        }
    }

    fn is_recoverable(&self) -> bool {
        // Everything here is retryable after the caller fixes its input or
        // environment; nothing requires a restart.
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_directive_message_matches_wire_contract() {
        assert_eq!(
            EngineError::EmptyDirective.to_string(),
            "Message is required."
        );
    }

    #[test]
    fn test_hints_are_non_empty() {
        let errors = [
            EngineError::EmptyDirective,
            EngineError::Config("bad".to_string()),
            EngineError::MemoryFile("missing".to_string()),
            EngineError::Serialization("oops".to_string()),
            EngineError::Network("refused".to_string()),
        ];
        for error in errors {
            assert!(!error.user_hint().is_empty());
            assert!(error.is_recoverable());
        }
    }
}
