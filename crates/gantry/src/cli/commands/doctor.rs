//! Doctor command - check the signing environment

use std::path::PathBuf;
use std::process::Command;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use gantry_signing::{
    resolve_signing_identity, ApkSigner, BuildVariant, IdentitySource, CREDENTIAL_FIELDS,
    PROPERTIES_FILE_NAMES,
};

use crate::cli::{Cli, OutputFormat};

/// Check the signing environment
#[derive(Debug, Args)]
pub struct DoctorCommand {
    /// Show suggestions for fixing issues
    #[arg(long)]
    pub fix: bool,
}

/// Result of a single check
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: Option<String>,
    pub fix_suggestion: Option<String>,
}

/// Status of a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Warn,
    Fail,
    Skip,
}

/// Summary of all checks
#[derive(Debug, Serialize)]
pub struct DoctorSummary {
    pub checks: Vec<CheckResult>,
    pub ok_count: usize,
    pub warn_count: usize,
    pub fail_count: usize,
    pub skip_count: usize,
}

impl DoctorCommand {
    /// Execute the doctor command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(fix = self.fix, "executing doctor command");
        let mut checks = Vec::new();

        if !cli.quiet && cli.format == OutputFormat::Text {
            println!("{}", style("Checking signing environment...").bold());
            println!();
        }

        checks.extend(self.check_tools());
        checks.extend(self.check_sdk());
        checks.extend(self.check_credential_sources());
        checks.extend(self.check_resolution());

        let ok_count = checks
            .iter()
            .filter(|c| c.status == CheckStatus::Ok)
            .count();
        let warn_count = checks
            .iter()
            .filter(|c| c.status == CheckStatus::Warn)
            .count();
        let fail_count = checks
            .iter()
            .filter(|c| c.status == CheckStatus::Fail)
            .count();
        let skip_count = checks
            .iter()
            .filter(|c| c.status == CheckStatus::Skip)
            .count();

        let summary = DoctorSummary {
            checks: checks.clone(),
            ok_count,
            warn_count,
            fail_count,
            skip_count,
        };

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            OutputFormat::Text => {
                self.print_results(&checks, cli);
                self.print_summary(&summary);

                if self.fix && (fail_count > 0 || warn_count > 0) {
                    println!();
                    println!("{}", style("Suggested fixes:").bold());
                    for check in &checks {
                        if check.status == CheckStatus::Fail || check.status == CheckStatus::Warn {
                            if let Some(ref fix) = check.fix_suggestion {
                                println!(
                                    "  {} {}: {}",
                                    status_icon(check.status),
                                    style(&check.name).bold(),
                                    fix
                                );
                            }
                        }
                    }
                }
            }
        }

        if fail_count > 0 {
            anyhow::bail!("{} check(s) failed", fail_count);
        }

        Ok(())
    }

    fn check_tools(&self) -> Vec<CheckResult> {
        let mut results = Vec::new();

        // Java (apksigner is a JVM tool)
        match which::which("java") {
            Ok(_) => {
                let version = Command::new("java")
                    .arg("-version")
                    .output()
                    .ok()
                    .map(|o| {
                        // Java prints its version to stderr
                        String::from_utf8_lossy(&o.stderr)
                            .lines()
                            .next()
                            .unwrap_or("")
                            .to_string()
                    })
                    .filter(|v| !v.is_empty());

                results.push(CheckResult {
                    name: "Java".to_string(),
                    status: CheckStatus::Ok,
                    message: version,
                    fix_suggestion: None,
                });
            }
            Err(_) => {
                results.push(CheckResult {
                    name: "Java".to_string(),
                    status: CheckStatus::Fail,
                    message: Some("Not found".to_string()),
                    fix_suggestion: Some("Install JDK 11 or later".to_string()),
                });
            }
        }

        // apksigner
        if ApkSigner::new().is_available() {
            results.push(CheckResult {
                name: "apksigner".to_string(),
                status: CheckStatus::Ok,
                message: Some("Found".to_string()),
                fix_suggestion: None,
            });
        } else {
            results.push(CheckResult {
                name: "apksigner".to_string(),
                status: CheckStatus::Fail,
                message: Some("Not found".to_string()),
                fix_suggestion: Some(
                    "Install Android SDK build-tools or set ANDROID_HOME".to_string(),
                ),
            });
        }

        results
    }

    fn check_sdk(&self) -> Vec<CheckResult> {
        let android_home = std::env::var("ANDROID_HOME")
            .or_else(|_| std::env::var("ANDROID_SDK_ROOT"))
            .ok();

        let result = match android_home {
            Some(ref path) if PathBuf::from(path).exists() => CheckResult {
                name: "Android SDK".to_string(),
                status: CheckStatus::Ok,
                message: Some(path.clone()),
                fix_suggestion: None,
            },
            Some(ref path) => CheckResult {
                name: "Android SDK".to_string(),
                status: CheckStatus::Warn,
                message: Some(format!("ANDROID_HOME points to missing path: {}", path)),
                fix_suggestion: Some("Point ANDROID_HOME at an installed SDK".to_string()),
            },
            None => CheckResult {
                name: "Android SDK".to_string(),
                status: CheckStatus::Warn,
                message: Some("ANDROID_HOME or ANDROID_SDK_ROOT not set".to_string()),
                fix_suggestion: Some("Set ANDROID_HOME to your SDK location".to_string()),
            },
        };

        vec![result]
    }

    fn check_credential_sources(&self) -> Vec<CheckResult> {
        let mut results = Vec::new();

        // Properties file (first recognized name wins)
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let properties_file = PROPERTIES_FILE_NAMES
            .iter()
            .find(|name| cwd.join(name).exists());

        match properties_file {
            Some(name) => {
                results.push(CheckResult {
                    name: "Keystore properties file".to_string(),
                    status: CheckStatus::Ok,
                    message: Some((*name).to_string()),
                    fix_suggestion: None,
                });
            }
            None => {
                results.push(CheckResult {
                    name: "Keystore properties file".to_string(),
                    status: CheckStatus::Skip,
                    message: Some("Not present".to_string()),
                    fix_suggestion: Some(
                        "Create key.properties with storeFile/storePassword/keyAlias/keyPassword"
                            .to_string(),
                    ),
                });
            }
        }

        // Environment variables are reported as set/unset, never echoed
        for (_, env_key) in CREDENTIAL_FIELDS {
            let set = std::env::var(env_key).is_ok_and(|v| !v.trim().is_empty());
            results.push(CheckResult {
                name: env_key.to_string(),
                status: if set { CheckStatus::Ok } else { CheckStatus::Skip },
                message: Some(if set { "Set" } else { "Not set" }.to_string()),
                fix_suggestion: None,
            });
        }

        results
    }

    fn check_resolution(&self) -> Vec<CheckResult> {
        let cwd = match std::env::current_dir() {
            Ok(cwd) => cwd,
            Err(e) => {
                return vec![CheckResult {
                    name: "Release signing".to_string(),
                    status: CheckStatus::Fail,
                    message: Some(e.to_string()),
                    fix_suggestion: None,
                }]
            }
        };

        let result = match resolve_signing_identity(&cwd) {
            Ok(resolution) => {
                let selected = resolution.select(BuildVariant::Release);
                match selected.source {
                    IdentitySource::DebugFallback => CheckResult {
                        name: "Release signing".to_string(),
                        status: CheckStatus::Skip,
                        message: Some("No release sources; debug keystore fallback".to_string()),
                        fix_suggestion: Some(
                            "Provide a properties file or KEYSTORE_* environment variables"
                                .to_string(),
                        ),
                    },
                    _ if selected.identity.is_complete() => CheckResult {
                        name: "Release signing".to_string(),
                        status: CheckStatus::Ok,
                        message: Some(format!("Release identity from {}", selected.source)),
                        fix_suggestion: None,
                    },
                    _ => CheckResult {
                        name: "Release signing".to_string(),
                        status: CheckStatus::Warn,
                        message: Some(format!(
                            "Release identity is missing {}",
                            selected.identity.missing_fields().join(", ")
                        )),
                        fix_suggestion: Some(
                            "Add the missing keys to the properties file or environment"
                                .to_string(),
                        ),
                    },
                }
            }
            Err(e) => CheckResult {
                name: "Release signing".to_string(),
                status: CheckStatus::Fail,
                message: Some(e.to_string()),
                fix_suggestion: Some("Fix the keystore properties file".to_string()),
            },
        };

        vec![result]
    }

    fn print_results(&self, checks: &[CheckResult], cli: &Cli) {
        if cli.quiet {
            return;
        }

        for check in checks {
            let icon = status_icon(check.status);
            let name = &check.name;
            let msg = check.message.as_deref().unwrap_or("");

            match check.status {
                CheckStatus::Ok => {
                    println!("  {} {} {}", icon, style(name).green(), style(msg).dim());
                }
                CheckStatus::Warn => {
                    println!("  {} {} {}", icon, style(name).yellow(), style(msg).dim());
                }
                CheckStatus::Fail => {
                    println!("  {} {} {}", icon, style(name).red(), style(msg).dim());
                }
                CheckStatus::Skip => {
                    println!("  {} {} {}", icon, style(name).dim(), style(msg).dim());
                }
            }
        }
    }

    fn print_summary(&self, summary: &DoctorSummary) {
        println!();
        let total = summary.ok_count + summary.warn_count + summary.fail_count + summary.skip_count;

        if summary.fail_count == 0 && summary.warn_count == 0 {
            println!(
                "{} All {} checks passed!",
                style("✓").green().bold(),
                summary.ok_count
            );
        } else {
            println!(
                "Summary: {} ok, {} warnings, {} failed, {} skipped (out of {})",
                style(summary.ok_count).green(),
                style(summary.warn_count).yellow(),
                style(summary.fail_count).red(),
                style(summary.skip_count).dim(),
                total
            );

            if summary.fail_count > 0 {
                println!();
                println!(
                    "{} {} issue(s) found. Run '{}' for suggestions.",
                    style("!").red().bold(),
                    summary.fail_count + summary.warn_count,
                    style("gantry doctor --fix").cyan()
                );
            }
        }
    }
}

/// Get status icon for a check
fn status_icon(status: CheckStatus) -> console::StyledObject<&'static str> {
    match status {
        CheckStatus::Ok => style("[OK]").green(),
        CheckStatus::Warn => style("[WARN]").yellow(),
        CheckStatus::Fail => style("[FAIL]").red(),
        CheckStatus::Skip => style("[SKIP]").dim(),
    }
}
