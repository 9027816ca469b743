//! Error types for audit pipeline operations

use std::io;
use thiserror::Error;

/// Result type for audit pipeline operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Errors that can occur while building, configuring, or running an audit trail
#[derive(Error, Debug)]
pub enum AuditError {
    /// Bad or missing configuration (unknown processor name, malformed properties)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Event is structurally invalid or missing a required field
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    /// A processor's own operation failed
    #[error("processor '{processor}' failed: {message}")]
    Processing { processor: String, message: String },

    /// A component was used before `init()`
    #[error("not initialized: {0}")]
    NotInitialized(String),

    /// Plugin resolution or construction failed
    #[error("factory error for '{name}': {message}")]
    Factory { name: String, message: String },

    /// Invalid argument (blank name, missing value)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Requested field is not present on the event
    #[error("field not found: {0}")]
    FieldNotFound(String),

    /// Requested processing object was never registered
    #[error("processing object not found: {0}")]
    ObjectNotFound(String),

    /// Payload could not be decoded (bad base64/hex, invalid UTF-8)
    #[error("encoding error: {0}")]
    Encoding(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl AuditError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        AuditError::Configuration(message.into())
    }

    /// Create an invalid event error
    pub fn invalid_event<S: Into<String>>(message: S) -> Self {
        AuditError::InvalidEvent(message.into())
    }

    /// Create a processing error attributed to a named processor
    pub fn processing<P: Into<String>, S: Into<String>>(processor: P, message: S) -> Self {
        AuditError::Processing {
            processor: processor.into(),
            message: message.into(),
        }
    }

    /// Create a not-initialized error
    pub fn not_initialized<S: Into<String>>(message: S) -> Self {
        AuditError::NotInitialized(message.into())
    }

    /// Create a factory error for a plugin name
    pub fn factory<N: Into<String>, S: Into<String>>(name: N, message: S) -> Self {
        AuditError::Factory {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        AuditError::InvalidArgument(message.into())
    }

    /// Create a field not found error
    pub fn field_not_found<S: Into<String>>(name: S) -> Self {
        AuditError::FieldNotFound(name.into())
    }

    /// Create an object not found error
    pub fn object_not_found<S: Into<String>>(name: S) -> Self {
        AuditError::ObjectNotFound(name.into())
    }

    /// Create an encoding error
    pub fn encoding<S: Into<String>>(message: S) -> Self {
        AuditError::Encoding(message.into())
    }
}
