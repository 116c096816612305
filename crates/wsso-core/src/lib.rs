//! # wsso-core
//!
//! Core crate for WSSO. Contains the configuration schema and loader,
//! the directory collaborator contract, and the unified error system.
//!
//! This crate has **no** internal dependencies on other WSSO crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
