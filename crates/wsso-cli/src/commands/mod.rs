//! CLI command definitions and dispatch.

pub mod config;
pub mod password;
pub mod token;

use clap::{Parser, Subcommand};

use wsso_core::config::AppConfig;
use wsso_core::result::AppResult;

use crate::output::OutputFormat;

/// WSSO single sign-on gateway administration
#[derive(Debug, Parser)]
#[command(name = "wsso", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Hash a password for a seeded directory identity
    HashPassword(password::HashPasswordArgs),
    /// Verify a token against the configured keys and print its payload
    VerifyToken(token::VerifyTokenArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> AppResult<()> {
        match &self.command {
            Commands::HashPassword(args) => password::execute(args),
            Commands::VerifyToken(args) => token::execute(args, &self.config, self.format).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format),
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> AppResult<AppConfig> {
    AppConfig::load_from(config_path)
}
