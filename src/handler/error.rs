//! Request resolution errors
//!
//! Every failure of the file lookup pipeline is a `ServeError`; `into_response`
//! is the single place where error kinds become status codes.

use std::io;
use std::path::PathBuf;

use hyper::Response;
use thiserror::Error;

use crate::http::{self, DecodeError, ServeBody};

#[derive(Debug, Error)]
pub enum ServeError {
    /// Normalized path escapes the served root
    #[error("path escapes the served root: {}", .0.display())]
    AccessDenied(PathBuf),

    /// Request path could not be percent-decoded; reported as not found
    #[error("undecodable request path: {0}")]
    MalformedPath(#[from] DecodeError),

    /// Missing, inaccessible or unopenable file
    #[error("cannot access {}: {source}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// First read of an opened file failed, before any byte was sent
    #[error("failed to read {}: {source}", path.display())]
    ReadFailure {
        path: PathBuf,
        content_type: &'static str,
        #[source]
        source: io::Error,
    },
}

impl ServeError {
    pub fn into_response(self) -> Response<ServeBody> {
        match self {
            Self::AccessDenied(_) => http::build_403_response(),
            Self::MalformedPath(_) | Self::NotFound { .. } => http::build_404_response(),
            Self::ReadFailure { content_type, .. } => http::build_500_response(content_type),
        }
    }
}
