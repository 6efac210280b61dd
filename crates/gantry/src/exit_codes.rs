//! Exit codes for the CLI

#![allow(dead_code)]

use gantry_signing::SigningError;

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// User cancelled
pub const CANCELLED: i32 = 130;

/// Map an error to its exit code
pub fn for_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<SigningError>() {
        Some(
            SigningError::MalformedProperties { .. }
            | SigningError::PropertiesUnreadable { .. }
            | SigningError::ConfigError(_),
        ) => CONFIG_ERROR,
        _ => ERROR,
    }
}
