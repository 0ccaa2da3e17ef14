//! Static file server
//!
//! Serves one directory over HTTP/1.1: request paths map onto the root,
//! traversal outside it is refused, directories resolve to `index.html`, and
//! the content type follows the file extension.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
