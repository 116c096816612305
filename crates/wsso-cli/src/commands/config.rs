//! Configuration management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

use wsso_core::config::SeedIdentity;
use wsso_core::result::AppResult;

use crate::output::{self, OutputFormat};

/// Keys whose values are never printed.
const SECRET_KEYS: &[&str] = &["secret", "password", "manager_password", "password_hash"];

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration with secrets masked
    Show,
    /// Validate configuration file
    Validate,
    /// List identities seeded into the directory
    Identities,
}

/// Identity row for table output
#[derive(Debug, Serialize, Tabled)]
struct IdentityRow {
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Groups")]
    groups: String,
    #[tabled(rename = "Admin")]
    admin: bool,
}

impl IdentityRow {
    fn new(identity: &SeedIdentity, admin_group: &str) -> Self {
        Self {
            username: identity.username.clone(),
            email: identity.email.clone().unwrap_or_default(),
            groups: identity.groups.join(", "),
            admin: identity.groups.iter().any(|g| g == admin_group),
        }
    }
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config_path: &str, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        ConfigCommand::Show => {
            let config = super::load_config(config_path)?;
            let mut document = serde_json::to_value(&config)?;
            mask_secrets(&mut document);
            output::print_document(&document, format);
        }
        ConfigCommand::Validate => match super::load_config(config_path) {
            Ok(config) => {
                output::print_success(&format!("Configuration '{config_path}' is valid"));
                output::print_kv("Server", &config.server.bind_address());
                output::print_kv("Algorithm", &config.auth.algorithm.to_string());
                output::print_kv("Issuer", &config.auth.issuer);
                output::print_kv("Admin group", &config.auth.admin_group);
                output::print_kv(
                    "Seeded identities",
                    &config.directory.identities.len().to_string(),
                );
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {e}"));
                return Err(e);
            }
        },
        ConfigCommand::Identities => {
            let config = super::load_config(config_path)?;
            let rows: Vec<IdentityRow> = config
                .directory
                .identities
                .iter()
                .map(|identity| IdentityRow::new(identity, &config.auth.admin_group))
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}

/// Replace every secret-bearing value with a fixed mask.
fn mask_secrets(value: &mut Value) {
    match value {
        Value::Object(fields) => {
            for (key, field) in fields.iter_mut() {
                if SECRET_KEYS.contains(&key.as_str()) {
                    *field = Value::String("****".to_string());
                } else {
                    mask_secrets(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(mask_secrets),
        _ => {}
    }
}
