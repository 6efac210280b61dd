//! Artifact signing via apksigner
//!
//! Consumes a resolved [`SigningIdentity`] and applies it to an `.apk` or
//! `.aab`. A release identity with missing fields fails here, not in the
//! resolver: an unset keystore path surfaces the misconfiguration at the
//! packaging step instead of silently degrading.

use std::path::Path;
use std::process::Stdio;

use serde::Serialize;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{Result, SigningError};
use crate::identity::SigningIdentity;

/// Options for signing an artifact
#[derive(Debug, Clone, Default)]
pub struct SignOptions {
    /// Dry run mode - don't actually sign
    pub dry_run: bool,

    /// Verbose output
    pub verbose: bool,
}

/// Status of a signature verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureStatus {
    /// Signature is valid
    Valid,
    /// Signature is invalid
    Invalid,
    /// Not signed
    NotSigned,
}

impl std::fmt::Display for SignatureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid => write!(f, "Valid"),
            Self::Invalid => write!(f, "Invalid"),
            Self::NotSigned => write!(f, "Not Signed"),
        }
    }
}

/// Information about a signature on an artifact
#[derive(Debug, Clone, Serialize)]
pub struct SignatureInfo {
    /// Path to the verified artifact
    pub path: String,

    /// Status of the signature
    pub status: SignatureStatus,

    /// Signer certificate DN, when available from verbose verification
    pub signer: Option<String>,

    /// Raw verification output
    pub details: Option<String>,
}

/// Signs and verifies Android artifacts using apksigner
pub struct ApkSigner {
    /// Path to apksigner (usually in Android SDK build-tools)
    apksigner_path: Option<String>,
}

impl ApkSigner {
    /// Create a new signer, locating apksigner on the system
    pub fn new() -> Self {
        Self {
            apksigner_path: Self::find_apksigner(),
        }
    }

    /// Find apksigner in common locations
    fn find_apksigner() -> Option<String> {
        // Check ANDROID_HOME/ANDROID_SDK_ROOT
        let sdk_paths = [
            std::env::var("ANDROID_HOME").ok(),
            std::env::var("ANDROID_SDK_ROOT").ok(),
            Some("/usr/local/share/android-sdk".to_string()),
            dirs::home_dir().map(|h| h.join("Android/Sdk").to_string_lossy().to_string()),
            dirs::home_dir().map(|h| h.join("Library/Android/sdk").to_string_lossy().to_string()),
        ];

        for sdk_path in sdk_paths.into_iter().flatten() {
            let build_tools = Path::new(&sdk_path).join("build-tools");
            if !build_tools.exists() {
                continue;
            }

            // Pick the newest build-tools version
            if let Ok(entries) = std::fs::read_dir(&build_tools) {
                let mut versions: Vec<_> = entries
                    .filter_map(|e| e.ok())
                    .filter(|e| e.path().is_dir())
                    .collect();

                versions.sort_by(|a, b| b.file_name().cmp(&a.file_name()));

                if let Some(latest) = versions.first() {
                    let apksigner = latest.path().join("apksigner");
                    if apksigner.exists() {
                        return Some(apksigner.to_string_lossy().to_string());
                    }
                }
            }
        }

        // Try PATH
        if std::process::Command::new("apksigner")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
        {
            return Some("apksigner".to_string());
        }

        None
    }

    /// Whether apksigner was found on this system
    pub fn is_available(&self) -> bool {
        self.apksigner_path.is_some()
    }

    /// Get apksigner path or return error
    fn apksigner(&self) -> Result<&str> {
        self.apksigner_path
            .as_deref()
            .ok_or_else(|| SigningError::ToolNotFound {
                tool: "apksigner".to_string(),
                hint: "Install Android SDK build-tools or set ANDROID_HOME".to_string(),
            })
    }

    /// File extensions apksigner can sign
    pub fn supported_extensions(&self) -> &[&str] {
        &["apk", "aab"]
    }

    /// Check if a file type is supported
    pub fn supports_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.supported_extensions()
                    .iter()
                    .any(|e| e.eq_ignore_ascii_case(ext))
            })
    }

    /// Sign an artifact with the given identity
    pub async fn sign(
        &self,
        artifact: &Path,
        identity: &SigningIdentity,
        options: &SignOptions,
    ) -> Result<()> {
        if !self.supports_file(artifact) {
            return Err(SigningError::UnsupportedArtifact {
                path: artifact.to_path_buf(),
            });
        }

        let keystore = identity.store_file.as_ref().ok_or_else(|| {
            SigningError::ConfigError("Keystore path not specified".to_string())
        })?;

        let key_alias = identity
            .key_alias
            .as_ref()
            .ok_or_else(|| SigningError::ConfigError("Key alias not specified".to_string()))?;

        let store_password = identity.store_password.as_ref().ok_or_else(|| {
            SigningError::ConfigError("Keystore password not specified".to_string())
        })?;

        let key_password = identity.key_password.as_ref().unwrap_or(store_password);

        if !artifact.exists() {
            return Err(SigningError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Artifact not found: {}", artifact.display()),
            )));
        }

        if options.dry_run {
            info!(
                "Dry run: would sign {} with key {}",
                artifact.display(),
                key_alias
            );
            return Ok(());
        }

        let apksigner = self.apksigner()?;

        let keystore_str = keystore.to_string_lossy();
        let artifact_str = artifact.to_string_lossy();
        let store_pass_arg = format!("pass:{}", store_password);
        let key_pass_arg = format!("pass:{}", key_password);

        let mut args: Vec<&str> = vec![
            "sign",
            "--ks",
            &keystore_str,
            "--ks-key-alias",
            key_alias,
            "--ks-pass",
            &store_pass_arg,
            "--key-pass",
            &key_pass_arg,
        ];

        if options.verbose {
            args.push("-v");
        }

        args.push(&artifact_str);

        debug!(artifact = %artifact.display(), keystore = %keystore.display(), "running apksigner sign");

        let output = Command::new(apksigner)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SigningError::ToolFailed {
                tool: "apksigner".to_string(),
                reason: stderr.to_string(),
            });
        }

        info!("Signed {} with key {}", artifact.display(), key_alias);
        Ok(())
    }

    /// Verify the signature on an artifact
    pub async fn verify(&self, artifact: &Path, verbose: bool) -> Result<SignatureInfo> {
        let apksigner = self.apksigner()?;

        if !artifact.exists() {
            return Err(SigningError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Artifact not found: {}", artifact.display()),
            )));
        }

        let artifact_str = artifact.to_string_lossy();

        let mut args: Vec<&str> = vec!["verify"];

        if verbose {
            args.push("-v");
            args.push("--print-certs");
        }

        args.push(&artifact_str);

        let output = Command::new(apksigner)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        let status = if output.status.success() {
            SignatureStatus::Valid
        } else if stderr.contains("does not contain") || stdout.contains("DOES NOT VERIFY") {
            SignatureStatus::NotSigned
        } else {
            SignatureStatus::Invalid
        };

        let signer = if verbose && status == SignatureStatus::Valid {
            stdout
                .lines()
                .find(|l| l.contains("Signer #1 certificate DN:"))
                .map(|line| line.split("DN:").nth(1).unwrap_or("Unknown").trim().to_string())
        } else {
            None
        };

        Ok(SignatureInfo {
            path: artifact.to_string_lossy().to_string(),
            status,
            signer,
            details: Some(format!("{}\n{}", stdout, stderr)),
        })
    }
}

impl Default for ApkSigner {
    fn default() -> Self {
        Self::new()
    }
}
