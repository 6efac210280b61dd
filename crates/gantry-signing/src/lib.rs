//! Gantry Signing - release signing-configuration resolution for Android
//!
//! This crate decides which signing identity a build artifact gets:
//! - a release identity assembled from `key.properties` /
//!   `keystore.properties` or `KEYSTORE_*`/`KEY_*` environment variables,
//!   with the file taking precedence per field
//! - the fixed non-secret debug keystore, whenever no external credential
//!   source was provided
//!
//! It also applies and verifies signatures on `.apk`/`.aab` artifacts via
//! apksigner.

pub mod error;
pub mod identity;
pub mod properties;
pub mod resolver;
pub mod signer;
pub mod variant;

pub use error::{Result, SigningError};
pub use identity::SigningIdentity;
pub use properties::Properties;
pub use resolver::{
    resolve_signing_identity, resolve_with_env, IdentitySource, Resolution, SelectedIdentity,
    CREDENTIAL_FIELDS, PROPERTIES_FILE_NAMES,
};
pub use signer::{ApkSigner, SignOptions, SignatureInfo, SignatureStatus};
pub use variant::BuildVariant;
