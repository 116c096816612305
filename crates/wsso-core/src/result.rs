//! Convenience result type alias for WSSO.

use crate::error::AppError;

/// A specialized `Result` type for WSSO operations.
pub type AppResult<T> = Result<T, AppError>;
