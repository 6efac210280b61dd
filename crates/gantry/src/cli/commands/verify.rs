//! Verify command

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use gantry_signing::{ApkSigner, SignatureStatus};

use crate::cli::{Cli, OutputFormat};

/// Verify the signature on an artifact
#[derive(Debug, Args)]
pub struct VerifyCommand {
    /// Path to artifact to verify
    #[arg(required = true)]
    pub artifact: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl VerifyCommand {
    /// Execute the verify command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(artifact = %self.artifact.display(), "executing verify command");
        // Create tokio runtime for async operations
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run(cli))
    }

    async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let signer = ApkSigner::new();
        let verbose = self.verbose || cli.verbose;

        let info = signer.verify(&self.artifact, verbose).await?;

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&info)?);
            }
            OutputFormat::Text => {
                println!(
                    "{} {}",
                    style("Verifying").cyan(),
                    style(self.artifact.display()).bold()
                );
                println!();

                let status_style = match info.status {
                    SignatureStatus::Valid => style("VALID").green().bold(),
                    SignatureStatus::Invalid => style("INVALID").red().bold(),
                    SignatureStatus::NotSigned => style("NOT SIGNED").dim(),
                };

                println!("  Status: {}", status_style);

                if let Some(signer) = &info.signer {
                    println!("  Signer: {}", style(signer).cyan());
                }

                if verbose {
                    if let Some(details) = &info.details {
                        println!();
                        println!("  {}", style("Details:").dim());
                        for line in details.lines().take(20) {
                            println!("    {}", line);
                        }
                    }
                }
            }
        }

        // Return error if not valid
        if info.status != SignatureStatus::Valid {
            anyhow::bail!("Signature verification failed: {}", info.status);
        }

        Ok(())
    }
}
