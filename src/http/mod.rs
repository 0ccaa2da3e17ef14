//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the file lookup logic.

pub mod mime;
pub mod response;
pub mod uri;

// Re-export commonly used types
pub use response::{
    build_403_response, build_404_response, build_500_response, build_file_response, ServeBody,
};
pub use uri::{decode_path, DecodeError};
