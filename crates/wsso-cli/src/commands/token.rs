//! Token inspection.

use clap::Args;
use serde_json::json;

use wsso_auth::{KeyRing, TokenService, VerifiedToken};
use wsso_core::error::AppError;
use wsso_core::result::AppResult;

use crate::output::{self, OutputFormat};

/// Arguments for `verify-token`
#[derive(Debug, Args)]
pub struct VerifyTokenArgs {
    /// Signed token to verify
    pub token: String,
}

/// Verify a token with the configured key pair and print what it carries
pub async fn execute(
    args: &VerifyTokenArgs,
    config_path: &str,
    format: OutputFormat,
) -> AppResult<()> {
    let config = super::load_config(config_path)?;
    let keys = KeyRing::load(&config.auth).await?;
    let tokens = TokenService::new(keys, &config.auth);

    let verified = tokens
        .verify(&args.token)
        .await
        .map_err(|e| AppError::authentication(format!("Token rejected: {e}")))?;

    let document = match verified {
        VerifiedToken::Claims(claims) => json!({
            "kind": "claims",
            "username": claims.username,
            "groups": claims.groups,
            "admin": claims.admin,
        }),
        VerifiedToken::Marker(purpose) => json!({
            "kind": "marker",
            "purpose": purpose.as_str(),
        }),
    };

    output::print_success("Token is valid");
    output::print_document(&document, format);
    Ok(())
}
