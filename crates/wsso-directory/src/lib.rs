//! # wsso-directory
//!
//! Identity directory backends for WSSO.
//!
//! - `password`: Argon2id hashing
//! - `memory`: in-process directory seeded from configuration
//! - `resilient`: timeout and bounded retry wrapper for any directory

pub mod memory;
pub mod password;
pub mod resilient;

use std::sync::Arc;

use tracing::info;

use wsso_core::config::DirectoryConfig;
use wsso_core::result::AppResult;
use wsso_core::traits::Directory;

pub use memory::MemoryDirectory;
pub use password::PasswordHasher;
pub use resilient::{ResilientDirectory, RetryPolicy};

/// Builds the configured directory, wrapped with timeout and retry handling.
pub fn build_directory(config: &DirectoryConfig) -> AppResult<Arc<dyn Directory>> {
    let policy = RetryPolicy::from_config(config);
    let directory = MemoryDirectory::from_config(config)?;
    info!(
        timeout_ms = config.timeout_ms,
        max_retries = config.max_retries,
        "Directory initialized"
    );
    Ok(Arc::new(ResilientDirectory::new(directory, policy)))
}
