//! # wsso-api
//!
//! HTTP API layer for WSSO built on Axum.
//!
//! Provides the login/logout/register endpoints, the token link flow,
//! guarded session and admin routes, the directory administration surface,
//! cookie handling, and error mapping.

pub mod app;
pub mod cookies;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
