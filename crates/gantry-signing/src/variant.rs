//! Build variants

use serde::{Deserialize, Serialize};

/// Build variant being packaged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildVariant {
    /// Local development build
    Debug,
    /// Distribution build
    #[default]
    Release,
}

impl BuildVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "debug" | "dev" => Some(Self::Debug),
            "release" | "prod" | "production" => Some(Self::Release),
            _ => None,
        }
    }
}

impl std::fmt::Display for BuildVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_parsing() {
        assert_eq!(BuildVariant::parse("debug"), Some(BuildVariant::Debug));
        assert_eq!(BuildVariant::parse("Release"), Some(BuildVariant::Release));
        assert_eq!(BuildVariant::parse("prod"), Some(BuildVariant::Release));
        assert_eq!(BuildVariant::parse("invalid"), None);
    }

    #[test]
    fn test_default_is_release() {
        assert_eq!(BuildVariant::default(), BuildVariant::Release);
    }
}
