//! Error types for AfiniMaki client operations.
//!
//! This module provides the error hierarchy shared by all client operations,
//! with structured error codes for programmatic handling.

use thiserror::Error;

/// Result type alias for AfiniMaki operations.
pub type AfiniResult<T> = Result<T, AfiniError>;

/// Main error type for all AfiniMaki client operations.
#[derive(Error, Debug)]
pub enum AfiniError {
    /// Client configuration is invalid (bad key length, malformed endpoint).
    #[error("Configuration error: {message}")]
    Configuration { message: String, code: ErrorCode },

    /// A required call argument is missing. Only surfaced in strict mode;
    /// in soft mode the operation returns its empty result instead.
    #[error("Validation error: {message}")]
    Validation { message: String, code: ErrorCode },

    /// Network-level failure: connection, timeout, or non-success HTTP status.
    #[error("Network error: {message}")]
    Network {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Fault reported by the remote server, passed through uninterpreted.
    #[error("Server fault {fault_code}: {message}")]
    Fault { fault_code: i32, message: String },

    /// The server response could not be decoded.
    #[error("Parse error: {message}")]
    Parse { message: String, code: ErrorCode },

    /// A batch response contained a different number of entries than the request.
    #[error("Response shape mismatch: requested {expected} entries, server returned {actual}")]
    ResponseShape { expected: usize, actual: usize },
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Authentication (AUTH_xxx)
    AuthInvalidKeyLength,

    // Configuration (CFG_xxx)
    CfgInvalidEndpoint,
    CfgMissingVar,

    // Validation (VAL_xxx)
    ValMissingArgument,

    // Network (NET_xxx)
    NetConnectionFailed,
    NetHttpStatus,

    // Server fault (FAULT_xxx)
    FaultReported,

    // Parse (PARSE_xxx)
    ParseInvalidXml,
    ParseUnexpectedType,

    // Response shape (SHAPE_xxx)
    ShapeMismatch,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AuthInvalidKeyLength => "AUTH_001",
            ErrorCode::CfgInvalidEndpoint => "CFG_001",
            ErrorCode::CfgMissingVar => "CFG_002",
            ErrorCode::ValMissingArgument => "VAL_001",
            ErrorCode::NetConnectionFailed => "NET_001",
            ErrorCode::NetHttpStatus => "NET_002",
            ErrorCode::FaultReported => "FAULT_001",
            ErrorCode::ParseInvalidXml => "PARSE_001",
            ErrorCode::ParseUnexpectedType => "PARSE_002",
            ErrorCode::ShapeMismatch => "SHAPE_001",
        }
    }
}

impl AfiniError {
    /// Create a key-length configuration error.
    pub fn invalid_key_length(which: &str) -> Self {
        Self::Configuration {
            message: format!("{} must be exactly 32 characters", which),
            code: ErrorCode::AuthInvalidKeyLength,
        }
    }

    /// Create a malformed-endpoint configuration error.
    pub fn invalid_endpoint(url: impl Into<String>) -> Self {
        Self::Configuration {
            message: format!("endpoint '{}' must start with http://", url.into()),
            code: ErrorCode::CfgInvalidEndpoint,
        }
    }

    /// Create a missing-environment-variable configuration error.
    pub fn missing_env(var: &str) -> Self {
        Self::Configuration {
            message: format!("{} not set", var),
            code: ErrorCode::CfgMissingVar,
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValMissingArgument,
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            code: ErrorCode::NetConnectionFailed,
            source: None,
        }
    }

    /// Create a network error with an underlying cause.
    pub fn network_with_source(
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            code: ErrorCode::NetConnectionFailed,
            source: Some(source),
        }
    }

    /// Create a non-success HTTP status error.
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::Network {
            message: format!("HTTP {}: {}", status, body.into()),
            code: ErrorCode::NetHttpStatus,
            source: None,
        }
    }

    /// Create a server fault error.
    pub fn fault(fault_code: i32, message: impl Into<String>) -> Self {
        Self::Fault {
            fault_code,
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseInvalidXml,
        }
    }

    /// Create a parse error for an unexpected value type.
    pub fn unexpected_type(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseUnexpectedType,
        }
    }

    /// Create a response shape mismatch error.
    pub fn response_shape(expected: usize, actual: usize) -> Self {
        Self::ResponseShape { expected, actual }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Configuration { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::Network { code, .. } => *code,
            Self::Fault { .. } => ErrorCode::FaultReported,
            Self::Parse { code, .. } => *code,
            Self::ResponseShape { .. } => ErrorCode::ShapeMismatch,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Configuration { .. } => {
                Some("Check your API key, secret, and endpoint settings")
            }
            Self::Validation { .. } => Some("Supply all required call arguments"),
            Self::Network { .. } => Some("Check your network connection and the endpoint URL"),
            Self::Fault { .. } => Some("Check your credentials and the call arguments"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_key_length_error() {
        let err = AfiniError::invalid_key_length("api_key");
        assert_eq!(err.code(), ErrorCode::AuthInvalidKeyLength);
        assert!(err.to_string().contains("api_key"));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_fault_error() {
        let err = AfiniError::fault(105, "invalid auth code");
        assert_eq!(err.code(), ErrorCode::FaultReported);
        assert!(err.to_string().contains("105"));
        assert!(err.to_string().contains("invalid auth code"));
    }

    #[test]
    fn test_response_shape_error() {
        let err = AfiniError::response_shape(3, 2);
        assert_eq!(err.code(), ErrorCode::ShapeMismatch);
        assert!(err.to_string().contains("requested 3"));
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::AuthInvalidKeyLength.as_str(), "AUTH_001");
        assert_eq!(ErrorCode::ShapeMismatch.as_str(), "SHAPE_001");
    }
}
