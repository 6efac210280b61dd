//! Sign command

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use gantry_signing::{
    resolve_signing_identity, ApkSigner, BuildVariant, IdentitySource, SignOptions,
};

use crate::cli::{Cli, VariantArg};

/// Sign an artifact with the resolved identity
#[derive(Debug, Args)]
pub struct SignCommand {
    /// Path to artifact to sign (.apk or .aab)
    #[arg(required = true)]
    pub artifact: PathBuf,

    /// Build variant being signed
    #[arg(long, default_value = "release")]
    pub variant: VariantArg,

    /// Dry run - don't actually sign
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl SignCommand {
    /// Execute the sign command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(artifact = %self.artifact.display(), "executing sign command");
        // Create tokio runtime for async operations
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run(cli))
    }

    async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let variant = BuildVariant::from(self.variant);

        let cwd = std::env::current_dir()?;
        let resolution = resolve_signing_identity(&cwd)?;
        let selected = resolution.select(variant);

        if !cli.quiet {
            if variant == BuildVariant::Release
                && selected.source == IdentitySource::DebugFallback
            {
                println!(
                    "{} no release signing sources found; signing with the debug keystore",
                    style("note:").yellow()
                );
            }

            println!(
                "{} {} with {} (from {})",
                if self.dry_run {
                    style("Would sign").yellow()
                } else {
                    style("Signing").cyan()
                },
                style(self.artifact.display()).bold(),
                style(&selected.identity).green(),
                selected.source
            );
        }

        let signer = ApkSigner::new();
        let options = SignOptions {
            dry_run: self.dry_run,
            verbose: self.verbose || cli.verbose,
        };

        signer
            .sign(&self.artifact, &selected.identity, &options)
            .await?;

        if !cli.quiet && !self.dry_run {
            println!("{}", style("✓ Signed successfully").green().bold());
        }

        Ok(())
    }
}
