//! CLI definition and command handling

pub mod commands;

use clap::{Parser, Subcommand};

use gantry_signing::BuildVariant;

use commands::{DoctorCommand, ResolveCommand, SignCommand, VerifyCommand};

/// Gantry - Android release signing CLI
#[derive(Debug, Parser)]
#[command(name = "gantry")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Build variant argument
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum VariantArg {
    /// Local development build
    Debug,
    /// Distribution build
    #[default]
    Release,
}

impl From<VariantArg> for BuildVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Debug => BuildVariant::Debug,
            VariantArg::Release => BuildVariant::Release,
        }
    }
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show which signing identity a build would use
    Resolve(ResolveCommand),

    /// Sign an artifact with the resolved identity
    Sign(SignCommand),

    /// Verify the signature on an artifact
    Verify(VerifyCommand),

    /// Check the signing environment
    Doctor(DoctorCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Resolve(ref cmd) => cmd.execute(&self),
            Commands::Sign(ref cmd) => cmd.execute(&self),
            Commands::Verify(ref cmd) => cmd.execute(&self),
            Commands::Doctor(ref cmd) => cmd.execute(&self),
        }
    }
}
