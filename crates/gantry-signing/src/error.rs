//! Error types for signing resolution and signing operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for signing operations
pub type Result<T> = std::result::Result<T, SigningError>;

/// Signing-related errors
#[derive(Debug, Error)]
pub enum SigningError {
    /// Properties file could not be read
    #[error("Failed to read properties file {path}: {source}")]
    PropertiesUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Properties file contains a line that is not a key/value pair
    #[error("Malformed properties file {path} at line {line}: {content:?}")]
    MalformedProperties {
        path: PathBuf,
        line: usize,
        content: String,
    },

    /// Configuration error
    #[error("Signing configuration error: {0}")]
    ConfigError(String),

    /// Tool not found
    #[error("Signing tool not found: {tool}. {hint}")]
    ToolNotFound { tool: String, hint: String },

    /// Tool execution failed
    #[error("Signing tool failed: {tool} - {reason}")]
    ToolFailed { tool: String, reason: String },

    /// Verification failed
    #[error("Signature verification failed for {path}: {reason}")]
    VerificationFailed { path: PathBuf, reason: String },

    /// Unsupported artifact type
    #[error("Cannot sign {path}: unsupported file type")]
    UnsupportedArtifact { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
