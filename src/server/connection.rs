// Connection handling module
// Serves a single accepted TCP connection on its own task

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::sync::watch;

use crate::handler::{self, SiteRoot};
use crate::logger;

/// Serve `stream` in a spawned task.
///
/// The active connection counter is incremented here and decremented when the
/// connection closes, so shutdown can wait for in-flight responses. When
/// `shutdown` changes the connection finishes its current response and closes
/// instead of waiting for the next keep-alive request.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address, for logging
/// * `site` - Shared served root
/// * `conn_counter` - Active connection counter
/// * `keep_alive` - Whether HTTP/1.1 keep-alive is enabled
/// * `shutdown` - Server shutdown notification
pub fn spawn_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    site: Arc<SiteRoot>,
    conn_counter: Arc<AtomicUsize>,
    keep_alive: bool,
    mut shutdown: watch::Receiver<()>,
) {
    conn_counter.fetch_add(1, Ordering::SeqCst);
    logger::log_debug(&format!("Accepted connection from {peer_addr}"));

    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(keep_alive);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&site))),
        );
        tokio::pin!(conn);

        let result = tokio::select! {
            result = conn.as_mut() => result,
            _ = shutdown.changed() => {
                conn.as_mut().graceful_shutdown();
                conn.as_mut().await
            }
        };

        // Client disconnects surface here too; they never reach other connections
        if let Err(err) = result {
            logger::log_connection_error(&err);
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
