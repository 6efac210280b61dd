//! Signing identity types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A signing identity applied to an Android build artifact
///
/// Fields may be individually unset: a release identity assembled from
/// partial configuration is passed through as-is so that the packaging step
/// fails loudly on the missing piece instead of masking the
/// misconfiguration.
///
/// Password fields are never serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningIdentity {
    /// Keystore file location
    pub store_file: Option<PathBuf>,

    /// Keystore password
    #[serde(skip)]
    pub store_password: Option<String>,

    /// Key alias within the keystore
    pub key_alias: Option<String>,

    /// Password for the key itself
    #[serde(skip)]
    pub key_password: Option<String>,
}

impl SigningIdentity {
    /// The fixed, non-secret development identity: the Android debug
    /// keystore created by the SDK tools under the user's home directory.
    pub fn debug() -> Self {
        Self {
            store_file: dirs::home_dir().map(|home| home.join(".android").join("debug.keystore")),
            store_password: Some("android".to_string()),
            key_alias: Some("androiddebugkey".to_string()),
            key_password: Some("android".to_string()),
        }
    }

    /// Whether every field required for signing is present
    pub fn is_complete(&self) -> bool {
        self.store_file.is_some()
            && self.store_password.is_some()
            && self.key_alias.is_some()
            && self.key_password.is_some()
    }

    /// Names of the fields that are unset, in lookup order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.store_file.is_none() {
            missing.push("store file");
        }
        if self.store_password.is_none() {
            missing.push("store password");
        }
        if self.key_alias.is_none() {
            missing.push("key alias");
        }
        if self.key_password.is_none() {
            missing.push("key password");
        }
        missing
    }
}

impl std::fmt::Display for SigningIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let alias = self.key_alias.as_deref().unwrap_or("<no alias>");
        match &self.store_file {
            Some(store) => write!(f, "{} ({})", alias, store.display()),
            None => write!(f, "{} (<no keystore>)", alias),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_identity_is_complete() {
        let identity = SigningIdentity::debug();
        assert!(identity.is_complete());
        assert_eq!(identity.key_alias.as_deref(), Some("androiddebugkey"));
        assert_eq!(identity.store_password.as_deref(), Some("android"));
        assert!(identity
            .store_file
            .as_ref()
            .is_some_and(|p| p.ends_with(".android/debug.keystore")));
    }

    #[test]
    fn test_missing_fields() {
        let identity = SigningIdentity {
            key_alias: Some("upload".to_string()),
            ..Default::default()
        };
        assert!(!identity.is_complete());
        assert_eq!(
            identity.missing_fields(),
            vec!["store file", "store password", "key password"]
        );
    }

    #[test]
    fn test_serialization_never_contains_passwords() {
        let identity = SigningIdentity {
            store_file: Some(PathBuf::from("upload-keystore.jks")),
            store_password: Some("store-secret".to_string()),
            key_alias: Some("upload".to_string()),
            key_password: Some("key-secret".to_string()),
        };

        let json = serde_json::to_string(&identity).unwrap();
        assert!(json.contains("upload-keystore.jks"));
        assert!(!json.contains("secret"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_display() {
        let identity = SigningIdentity {
            store_file: Some(PathBuf::from("a.jks")),
            key_alias: Some("upload".to_string()),
            ..Default::default()
        };
        assert_eq!(identity.to_string(), "upload (a.jks)");
        assert_eq!(
            SigningIdentity::default().to_string(),
            "<no alias> (<no keystore>)"
        );
    }
}
