//! Unified error type for the native token registry
//!
//! Every fallible registry operation returns [`TokenError`]. The public
//! C-shaped entry point collapses any error to `INVALID_TOKEN_ID`, so the
//! variants exist for logging and for tests that need to tell failures apart.

use serde::{Deserialize, Serialize};

/// Unified error type for all registry operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum TokenError {
    /// Malformed token request
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Which field failed and why
        message: String,
    },

    /// The random source failed or returned a short sample
    #[error("Entropy source failed: {message}")]
    Entropy {
        /// Error message describing the entropy failure
        message: String,
    },

    /// No unused unique id was found within the retry bound
    #[error("Token id space exhausted after {attempts} attempts")]
    IdSpaceExhausted {
        /// Number of draws performed
        attempts: u32,
    },

    /// The config file is larger than the configured bound
    #[error("Token file too large: {size} bytes exceeds limit of {limit}")]
    FileTooLarge {
        /// Actual file size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// A persisted record is structurally invalid
    #[error("Malformed token record: {message}")]
    MalformedRecord {
        /// Error message describing the offending field
        message: String,
    },

    /// Reading or writing the config file failed
    #[error("Storage error: {message}")]
    Storage {
        /// Error message describing the storage failure
        message: String,
    },

    /// JSON parsing or serialization failed
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },

    /// Addressed process or file is absent
    #[error("Not found: {message}")]
    NotFound {
        /// Error message describing what was not found
        message: String,
    },

    /// Registry configuration is invalid
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration problem
        message: String,
    },
}

impl TokenError {
    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create an entropy error
    pub fn entropy(message: impl Into<String>) -> Self {
        Self::Entropy {
            message: message.into(),
        }
    }

    /// Create a malformed record error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether this error came from request validation
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidRequest { .. })
    }
}

/// Standard Result type for registry operations
pub type Result<T> = std::result::Result<T, TokenError>;

impl From<std::io::Error> for TokenError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(err.to_string()),
            _ => Self::storage(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for TokenError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = TokenError::invalid_request("processName is empty");
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Invalid request: processName is empty");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(matches!(TokenError::from(io_err), TokenError::NotFound { .. }));

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(TokenError::from(io_err), TokenError::Storage { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("[{").unwrap_err();
        assert!(matches!(
            TokenError::from(json_err),
            TokenError::Serialization { .. }
        ));
    }

    #[test]
    fn test_file_too_large_display() {
        let err = TokenError::FileTooLarge {
            size: 200_000,
            limit: 102_400,
        };
        assert_eq!(
            err.to_string(),
            "Token file too large: 200000 bytes exceeds limit of 102400"
        );
    }
}
