//! Resolve command

use clap::Args;
use console::style;
use tracing::info;

use gantry_signing::{resolve_signing_identity, BuildVariant};

use crate::cli::{Cli, OutputFormat, VariantArg};

/// Show which signing identity a build would use
#[derive(Debug, Args)]
pub struct ResolveCommand {
    /// Build variant to resolve signing for
    #[arg(long, default_value = "release")]
    pub variant: VariantArg,
}

impl ResolveCommand {
    /// Execute the resolve command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let variant = BuildVariant::from(self.variant);
        info!(variant = %variant, "executing resolve command");

        let cwd = std::env::current_dir()?;
        let resolution = resolve_signing_identity(&cwd)?;
        let selected = resolution.select(variant);

        match cli.format {
            OutputFormat::Json => {
                // Passwords are reported as set/unset only.
                let output = serde_json::json!({
                    "variant": variant.as_str(),
                    "release_source_available": resolution.release_source_available,
                    "properties_file": resolution.properties_file,
                    "source": selected.source,
                    "identity": {
                        "store_file": selected.identity.store_file,
                        "key_alias": selected.identity.key_alias,
                        "store_password_set": selected.identity.store_password.is_some(),
                        "key_password_set": selected.identity.key_password.is_some(),
                    },
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                println!("{}", style("Signing Configuration").bold());
                println!();
                println!("  Variant:        {}", style(variant.as_str()).cyan());
                println!("  Source:         {}", style(&selected.source).cyan());

                let identity = &selected.identity;

                match &identity.store_file {
                    Some(path) => println!("  Store file:     {}", style(path.display()).cyan()),
                    None => println!("  Store file:     {}", style("<unset>").dim()),
                }
                match &identity.key_alias {
                    Some(alias) => println!("  Key alias:      {}", style(alias).cyan()),
                    None => println!("  Key alias:      {}", style("<unset>").dim()),
                }
                println!(
                    "  Store password: {}",
                    secret_status(identity.store_password.is_some())
                );
                println!(
                    "  Key password:   {}",
                    secret_status(identity.key_password.is_some())
                );

                if variant == BuildVariant::Release {
                    if !resolution.release_source_available {
                        println!();
                        println!(
                            "  {} no release signing sources found; release builds will use the debug keystore",
                            style("note:").yellow()
                        );
                    } else if !identity.is_complete() {
                        println!();
                        println!(
                            "  {} release identity is missing {}; packaging will fail",
                            style("warning:").yellow().bold(),
                            identity.missing_fields().join(", ")
                        );
                    }
                }
            }
        }

        Ok(())
    }
}

/// Render a password field without echoing it
fn secret_status(set: bool) -> console::StyledObject<&'static str> {
    if set {
        style("set").green()
    } else {
        style("unset").dim()
    }
}
