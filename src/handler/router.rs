//! Request dispatch module
//!
//! Entry point for HTTP request processing. Every request, whatever its method,
//! is answered from the served root.

use std::convert::Infallible;
use std::sync::Arc;

use hyper::{Request, Response};

use super::static_files::{self, SiteRoot};
use crate::http::ServeBody;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    site: Arc<SiteRoot>,
) -> Result<Response<ServeBody>, Infallible> {
    Ok(static_files::serve(&site, req.uri()).await)
}
