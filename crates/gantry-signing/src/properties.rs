//! Java properties file parsing
//!
//! Keystore credential files (`key.properties`, `keystore.properties`) use
//! the Java properties format. This parser covers the subset those files
//! actually use: `key=value` or `key: value` pairs, `#`/`!` comments, and
//! blank lines. Anything else in the file is a hard error, since a broken
//! credentials file must abort the build rather than degrade to the debug
//! keystore.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, SigningError};

/// Parsed key/value pairs from a properties file.
///
/// Later occurrences of a key override earlier ones, matching
/// `java.util.Properties` load semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    values: HashMap<String, String>,
}

impl Properties {
    /// Load and parse a properties file
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|source| SigningError::PropertiesUnreadable {
                path: path.to_path_buf(),
                source,
            })?;

        let props = Self::parse(&content, path)?;
        debug!(path = %path.display(), entries = props.len(), "loaded properties file");
        Ok(props)
    }

    /// Parse properties file content. `path` is used only for error reporting.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let mut values = HashMap::new();

        for (index, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let separator = line.find(['=', ':']).ok_or_else(|| {
                SigningError::MalformedProperties {
                    path: path.to_path_buf(),
                    line: index + 1,
                    content: raw_line.to_string(),
                }
            })?;

            let key = line[..separator].trim().to_string();
            let value = line[separator + 1..].trim().to_string();

            if key.is_empty() {
                return Err(SigningError::MalformedProperties {
                    path: path.to_path_buf(),
                    line: index + 1,
                    content: raw_line.to_string(),
                });
            }

            values.insert(key, value);
        }

        Ok(Self { values })
    }

    /// Get a property value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the file declared any entries
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(content: &str) -> Result<Properties> {
        Properties::parse(content, &PathBuf::from("key.properties"))
    }

    #[test]
    fn test_parse_basic_pairs() {
        let props = parse("storeFile=upload-keystore.jks\nkeyAlias=upload\n").unwrap();
        assert_eq!(props.get("storeFile"), Some("upload-keystore.jks"));
        assert_eq!(props.get("keyAlias"), Some("upload"));
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn test_parse_colon_separator_and_trimming() {
        let props = parse("  keyAlias : upload  \n").unwrap();
        assert_eq!(props.get("keyAlias"), Some("upload"));
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let content = "# store credentials\n\n! legacy comment\nstorePassword=secret\n";
        let props = parse(content).unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("storePassword"), Some("secret"));
    }

    #[test]
    fn test_parse_last_occurrence_wins() {
        let props = parse("keyAlias=first\nkeyAlias=second\n").unwrap();
        assert_eq!(props.get("keyAlias"), Some("second"));
    }

    #[test]
    fn test_parse_value_may_contain_separator() {
        let props = parse("storePassword=pa=ss:word\n").unwrap();
        assert_eq!(props.get("storePassword"), Some("pa=ss:word"));
    }

    #[test]
    fn test_parse_blank_value_is_kept() {
        let props = parse("storePassword=\n").unwrap();
        assert_eq!(props.get("storePassword"), Some(""));
    }

    #[test]
    fn test_parse_rejects_line_without_separator() {
        let err = parse("storeFile=a.jks\nnot a pair\n").unwrap_err();
        match err {
            SigningError::MalformedProperties { line, content, .. } => {
                assert_eq!(line, 2);
                assert_eq!(content, "not a pair");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_rejects_missing_key() {
        let err = parse("=value\n").unwrap_err();
        assert!(matches!(err, SigningError::MalformedProperties { line: 1, .. }));
    }

    #[test]
    fn test_load_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = Properties::load(&dir.path().join("key.properties")).unwrap_err();
        assert!(matches!(err, SigningError::PropertiesUnreadable { .. }));
    }
}
