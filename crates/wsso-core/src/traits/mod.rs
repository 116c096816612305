//! Collaborator contracts implemented outside the core.

pub mod directory;

pub use directory::{Directory, DirectoryError, IdentitySummary, NewIdentity};
