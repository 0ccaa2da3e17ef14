//! Request handler module
//!
//! Resolves request paths against the served root and streams files back.

pub mod body;
pub mod error;
pub mod router;
pub mod static_files;

// Re-export main entry points
pub use error::ServeError;
pub use router::handle_request;
pub use static_files::{serve, SiteRoot, INDEX_FILE};
