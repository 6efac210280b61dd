//! Release signing-configuration resolution
//!
//! Determines which signing identity a build gets: a release identity
//! assembled from a keystore properties file and/or environment variables,
//! or the fixed debug keystore when no external source was provided.
//!
//! Per credential field the properties file wins over the environment, and
//! a blank value counts as absent at every step. The release identity is
//! only ever selected when at least one external source exists, so a
//! repository-stored keystore is never picked up implicitly.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::identity::SigningIdentity;
use crate::properties::Properties;
use crate::variant::BuildVariant;

/// Recognized properties filenames, checked in order. First existing wins.
pub const PROPERTIES_FILE_NAMES: [&str; 2] = ["key.properties", "keystore.properties"];

/// Recognized credential fields as (properties key, environment variable
/// fallback) pairs, in lookup order
pub const CREDENTIAL_FIELDS: [(&str, &str); 4] = [
    ("storeFile", "KEYSTORE_PATH"),
    ("storePassword", "KEYSTORE_PASSWORD"),
    ("keyAlias", "KEY_ALIAS"),
    ("keyPassword", "KEY_PASSWORD"),
];

/// Outcome of signing-configuration resolution
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    /// Release identity assembled from external sources; fields may be unset
    pub release: SigningIdentity,

    /// Properties file the values were read from, if one existed
    pub properties_file: Option<PathBuf>,

    /// True iff a recognized properties file existed or any recognized
    /// environment variable was set
    pub release_source_available: bool,
}

/// Where a selected identity came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "path")]
pub enum IdentitySource {
    /// A recognized properties file (environment variables may have filled
    /// in fields the file left out)
    PropertiesFile(PathBuf),
    /// Recognized environment variables only
    Environment,
    /// The fixed non-secret debug keystore
    DebugFallback,
}

impl std::fmt::Display for IdentitySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PropertiesFile(path) => write!(f, "properties file {}", path.display()),
            Self::Environment => write!(f, "environment variables"),
            Self::DebugFallback => write!(f, "debug keystore fallback"),
        }
    }
}

/// An identity chosen for a build variant, with its provenance
#[derive(Debug, Clone, Serialize)]
pub struct SelectedIdentity {
    pub identity: SigningIdentity,
    pub source: IdentitySource,
}

impl Resolution {
    /// Apply the selection policy for a build variant.
    ///
    /// Release builds use the release identity whenever an external source
    /// was available, even if fields are missing; the packaging step then
    /// fails on the missing field, surfacing the misconfiguration. Debug
    /// builds always use the debug keystore.
    pub fn select(&self, variant: BuildVariant) -> SelectedIdentity {
        if variant == BuildVariant::Release && self.release_source_available {
            let source = match &self.properties_file {
                Some(path) => IdentitySource::PropertiesFile(path.clone()),
                None => IdentitySource::Environment,
            };
            SelectedIdentity {
                identity: self.release.clone(),
                source,
            }
        } else {
            SelectedIdentity {
                identity: SigningIdentity::debug(),
                source: IdentitySource::DebugFallback,
            }
        }
    }
}

/// Resolve the signing configuration from a directory and the process
/// environment
pub fn resolve_signing_identity(dir: &Path) -> Result<Resolution> {
    resolve_with_env(dir, |key| std::env::var(key).ok())
}

/// Resolve the signing configuration with an injectable environment lookup
pub fn resolve_with_env<F>(dir: &Path, env: F) -> Result<Resolution>
where
    F: Fn(&str) -> Option<String>,
{
    let properties_file = PROPERTIES_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists());

    let properties = match &properties_file {
        Some(path) => {
            info!(path = %path.display(), "using keystore properties file");
            Some(Properties::load(path)?)
        }
        None => {
            debug!(dir = %dir.display(), "no keystore properties file found");
            None
        }
    };

    // Blank values fall through, same as absent ones.
    let non_blank = |value: String| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    };

    let lookup = |property_key: &str, env_key: &str| -> Option<String> {
        properties
            .as_ref()
            .and_then(|props| props.get(property_key))
            .map(str::to_string)
            .and_then(non_blank)
            .or_else(|| env(env_key).and_then(non_blank))
    };

    let release = SigningIdentity {
        store_file: lookup("storeFile", "KEYSTORE_PATH").map(PathBuf::from),
        store_password: lookup("storePassword", "KEYSTORE_PASSWORD"),
        key_alias: lookup("keyAlias", "KEY_ALIAS"),
        key_password: lookup("keyPassword", "KEY_PASSWORD"),
    };

    let env_source_present = CREDENTIAL_FIELDS
        .iter()
        .any(|(_, env_key)| env(env_key).is_some_and(|v| !v.trim().is_empty()));

    let release_source_available = properties_file.is_some() || env_source_present;

    debug!(
        release_source_available,
        from_file = properties_file.is_some(),
        complete = release.is_complete(),
        "resolved signing configuration"
    );

    Ok(Resolution {
        release,
        properties_file,
        release_source_available,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_no_sources_falls_back_to_debug_identity() {
        let dir = TempDir::new().unwrap();

        let resolution = resolve_with_env(dir.path(), no_env).unwrap();
        assert!(!resolution.release_source_available);
        assert!(resolution.properties_file.is_none());

        let selected = resolution.select(BuildVariant::Release);
        assert_eq!(selected.source, IdentitySource::DebugFallback);
        assert_eq!(selected.identity, SigningIdentity::debug());
    }

    #[test]
    fn test_properties_file_takes_precedence_over_environment() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("key.properties"), "storeFile=a.jks\n").unwrap();

        let resolution =
            resolve_with_env(dir.path(), env_from(&[("KEYSTORE_PATH", "env.jks")])).unwrap();

        assert_eq!(
            resolution.release.store_file,
            Some(PathBuf::from("a.jks"))
        );
        assert!(resolution.release_source_available);
    }

    #[test]
    fn test_keystore_properties_used_when_key_properties_absent() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("keystore.properties"),
            "keyAlias=upload\n",
        )
        .unwrap();

        let resolution = resolve_with_env(dir.path(), no_env).unwrap();
        assert_eq!(
            resolution.properties_file,
            Some(dir.path().join("keystore.properties"))
        );
        assert_eq!(resolution.release.key_alias.as_deref(), Some("upload"));
    }

    #[test]
    fn test_key_properties_wins_over_keystore_properties() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("key.properties"), "keyAlias=first\n").unwrap();
        std::fs::write(dir.path().join("keystore.properties"), "keyAlias=second\n").unwrap();

        let resolution = resolve_with_env(dir.path(), no_env).unwrap();
        assert_eq!(
            resolution.properties_file,
            Some(dir.path().join("key.properties"))
        );
        assert_eq!(resolution.release.key_alias.as_deref(), Some("first"));
    }

    #[test]
    fn test_environment_only_selects_release_identity() {
        let dir = TempDir::new().unwrap();

        let resolution =
            resolve_with_env(dir.path(), env_from(&[("KEY_ALIAS", "upload")])).unwrap();

        assert!(resolution.release_source_available);
        assert!(resolution.properties_file.is_none());

        let selected = resolution.select(BuildVariant::Release);
        assert_eq!(selected.source, IdentitySource::Environment);
        assert_eq!(selected.identity.key_alias.as_deref(), Some("upload"));
        assert!(selected.identity.store_file.is_none());
    }

    #[test]
    fn test_blank_property_falls_through_to_environment() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("key.properties"),
            "storePassword=\nkeyAlias=  \n",
        )
        .unwrap();

        let resolution = resolve_with_env(
            dir.path(),
            env_from(&[("KEYSTORE_PASSWORD", "from-env"), ("KEY_ALIAS", "upload")]),
        )
        .unwrap();

        assert_eq!(
            resolution.release.store_password.as_deref(),
            Some("from-env")
        );
        assert_eq!(resolution.release.key_alias.as_deref(), Some("upload"));
    }

    #[test]
    fn test_blank_environment_value_is_unset() {
        let dir = TempDir::new().unwrap();

        let resolution =
            resolve_with_env(dir.path(), env_from(&[("KEYSTORE_PATH", "  ")])).unwrap();

        assert!(resolution.release.store_file.is_none());
        // A blank variable is not a release source either.
        assert!(!resolution.release_source_available);
    }

    #[test]
    fn test_all_fields_resolved_from_file_and_environment() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("key.properties"),
            "storeFile=upload-keystore.jks\nstorePassword=store-secret\n",
        )
        .unwrap();

        let resolution = resolve_with_env(
            dir.path(),
            env_from(&[("KEY_ALIAS", "upload"), ("KEY_PASSWORD", "key-secret")]),
        )
        .unwrap();

        let identity = &resolution.release;
        assert!(identity.is_complete());
        assert_eq!(
            identity.store_file,
            Some(PathBuf::from("upload-keystore.jks"))
        );
        assert_eq!(identity.store_password.as_deref(), Some("store-secret"));
        assert_eq!(identity.key_alias.as_deref(), Some("upload"));
        assert_eq!(identity.key_password.as_deref(), Some("key-secret"));
    }

    #[test]
    fn test_properties_file_alone_enables_release_even_if_incomplete() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("key.properties"), "# created by CI\n").unwrap();

        let resolution = resolve_with_env(dir.path(), no_env).unwrap();
        assert!(resolution.release_source_available);

        // Incomplete release identity is passed through as-is.
        let selected = resolution.select(BuildVariant::Release);
        assert!(matches!(
            selected.source,
            IdentitySource::PropertiesFile(_)
        ));
        assert!(!selected.identity.is_complete());
    }

    #[test]
    fn test_debug_variant_ignores_release_sources() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("key.properties"),
            "storeFile=a.jks\nstorePassword=s\nkeyAlias=upload\nkeyPassword=k\n",
        )
        .unwrap();

        let resolution = resolve_with_env(dir.path(), no_env).unwrap();
        let selected = resolution.select(BuildVariant::Debug);
        assert_eq!(selected.source, IdentitySource::DebugFallback);
        assert_eq!(selected.identity, SigningIdentity::debug());
    }

    #[test]
    fn test_malformed_properties_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("key.properties"),
            "storeFile=a.jks\ngarbage line\n",
        )
        .unwrap();

        let err = resolve_with_env(dir.path(), no_env).unwrap_err();
        assert!(matches!(
            err,
            crate::error::SigningError::MalformedProperties { line: 2, .. }
        ));
    }
}
