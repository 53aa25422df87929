//! Error types for the WordPress charm

use thiserror::Error;

/// Main error type for charm operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A config field did not parse to a string-keyed YAML mapping
    ///
    /// The payload is the human-readable reason surfaced to operators
    /// through the blocked unit status.
    #[error("invalid configuration: {0}")]
    ConfigShape(String),

    /// The dispatcher invoked the charm with an unrecognized hook name
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// A hook tool could not be spawned, exited nonzero, or produced
    /// output the charm could not decode
    #[error("hook tool error: {0}")]
    Hook(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The unit state file could not be read or written
    #[error("state error: {0}")]
    State(String),
}

impl Error {
    /// Create a config-shape error with the given reason
    pub fn config_shape(msg: impl Into<String>) -> Self {
        Self::ConfigShape(msg.into())
    }

    /// Create a hook tool error with the given message
    pub fn hook(msg: impl Into<String>) -> Self {
        Self::Hook(msg.into())
    }

    /// Create a serialization error with the given message
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create a state error with the given message
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_shape_reason_is_preserved_verbatim() {
        // The inner reason becomes the blocked status message, so it must
        // survive construction unchanged.
        let err = Error::config_shape("container_config is not a YAML mapping");
        match &err {
            Error::ConfigShape(reason) => {
                assert_eq!(reason, "container_config is not a YAML mapping");
            }
            other => panic!("expected ConfigShape, got {other:?}"),
        }
        assert!(err.to_string().contains("invalid configuration"));
    }

    #[test]
    fn hook_errors_carry_tool_context() {
        let err = Error::hook("pod-spec-set failed: permission denied");
        assert!(err.to_string().contains("hook tool error"));
        assert!(err.to_string().contains("pod-spec-set"));
    }

    #[test]
    fn unknown_event_names_the_offending_hook() {
        let err = Error::UnknownEvent("install".to_string());
        assert_eq!(err.to_string(), "unknown event: install");
    }

    #[test]
    fn error_construction_accepts_str_and_string() {
        let dynamic = format!("cannot write {}", "/var/lib/wordpress/state.json");
        assert!(Error::state(dynamic).to_string().contains("state.json"));
        assert!(Error::serialization("bad spec").to_string().contains("bad spec"));
    }
}
