//! Password hashing for configuration-seeded identities.

use clap::Args;
use dialoguer::Password;

use wsso_core::error::AppError;
use wsso_core::result::AppResult;
use wsso_directory::PasswordHasher;

/// Arguments for `hash-password`
#[derive(Debug, Args)]
pub struct HashPasswordArgs {
    /// Read the password from this argument instead of prompting
    #[arg(long)]
    pub password: Option<String>,
}

/// Prompt for a password and print its Argon2id PHC string
pub fn execute(args: &HashPasswordArgs) -> AppResult<()> {
    let password = match &args.password {
        Some(password) => password.clone(),
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()
            .map_err(|e| AppError::internal(format!("Failed to read password: {e}")))?,
    };

    if password.is_empty() {
        return Err(AppError::validation("Password must not be empty"));
    }

    let hash = PasswordHasher::new().hash_password(&password)?;
    println!("{hash}");
    Ok(())
}
