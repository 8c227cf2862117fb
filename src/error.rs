//! Error types for flowbot.

/// Top-level error type for the engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Flow build error: {0}")]
    Build(#[from] BuildError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while finalizing a flow definition.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Flow {flow} has no state named {state} to use as its initial state")]
    UnknownInitialState { flow: String, state: String },
}

/// Errors raised while registering flows with a dispatcher.
///
/// Fatal to the offending registration only; everything already
/// registered is left untouched.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("A flow named {name} is already registered")]
    DuplicateFlow { name: String },
}

/// Errors raised while installing response patterns.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid response pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Transport-level failures.
///
/// Transient errors are logged by the run loop, which then keeps
/// consuming events; fatal errors end the run.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Invalid credentials")]
    InvalidAuth,

    #[error("Connection refused: {reason}")]
    ConnectionRefused { reason: String },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Whether this error should end the run loop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidAuth | Self::ConnectionRefused { .. })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for the engine.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_names_flow_and_state() {
        let err = BuildError::UnknownInitialState {
            flow: "signup".to_string(),
            state: "missing".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("signup"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_registry_error_names_flow() {
        let err = RegistryError::DuplicateFlow {
            name: "signup".to_string(),
        };
        assert!(err.to_string().contains("signup"));
    }

    #[test]
    fn test_transport_error_fatality_split() {
        assert!(TransportError::InvalidAuth.is_fatal());
        assert!(
            TransportError::ConnectionRefused {
                reason: "no route".to_string()
            }
            .is_fatal()
        );
        assert!(!TransportError::Protocol("bad frame".to_string()).is_fatal());
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        assert!(!TransportError::Io(io).is_fatal());
    }

    #[test]
    fn test_error_from_registry_error() {
        let err = Error::from(RegistryError::DuplicateFlow {
            name: "x".to_string(),
        });
        assert!(err.to_string().contains("Registry error"));
    }

    #[test]
    fn test_error_from_transport_error() {
        let err = Error::from(TransportError::InvalidAuth);
        assert!(err.to_string().contains("Transport error"));
    }
}
