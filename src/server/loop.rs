// Server loop module
// Owns the listener and accepts connections until shutdown, then drains

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;

use super::connection::spawn_connection;
use super::listener::create_listener;
use crate::config::Config;
use crate::handler::SiteRoot;
use crate::logger;

/// How often shutdown re-checks the active connection count
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Connection-level settings taken from configuration
#[derive(Debug, Clone, Copy)]
pub struct ServerOptions {
    pub keep_alive: bool,
    pub shutdown_grace_period: Duration,
}

impl ServerOptions {
    pub const fn from_config(config: &Config) -> Self {
        Self {
            keep_alive: config.performance.keep_alive,
            shutdown_grace_period: config.shutdown_grace_period(),
        }
    }
}

/// A bound static file server
///
/// Lifecycle: `bind` → `run` (accepts until the shutdown future resolves) →
/// drain open connections for at most the grace period.
pub struct Server {
    listener: TcpListener,
    site: Arc<SiteRoot>,
    options: ServerOptions,
    active_connections: Arc<AtomicUsize>,
    shutdown_tx: watch::Sender<()>,
}

impl Server {
    /// Resolve the served root and bind the configured address
    pub fn bind(config: &Config) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let addr = config.socket_addr()?;
        let site = config.site_root()?;
        let listener = create_listener(addr)?;
        Ok(Self::from_listener(
            listener,
            site,
            ServerOptions::from_config(config),
        ))
    }

    pub fn from_listener(listener: TcpListener, site: SiteRoot, options: ServerOptions) -> Self {
        Self {
            listener,
            site: Arc::new(site),
            options,
            active_connections: Arc::new(AtomicUsize::new(0)),
            shutdown_tx: watch::channel(()).0,
        }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn site(&self) -> &SiteRoot {
        &self.site
    }

    /// Accept connections until `shutdown` resolves, then drain.
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((stream, peer_addr)) => {
                            spawn_connection(
                                stream,
                                peer_addr,
                                Arc::clone(&self.site),
                                Arc::clone(&self.active_connections),
                                self.options.keep_alive,
                                self.shutdown_tx.subscribe(),
                            );
                        }
                        Err(e) => {
                            logger::log_error(&format!("Failed to accept connection: {e}"));
                        }
                    }
                }

                () = &mut shutdown => break,
            }
        }

        // Stop accepting, then ask open connections to close after their
        // current response
        drop(self.listener);
        self.shutdown_tx.send_replace(());
        logger::log_shutdown_started(self.active_connections.load(Ordering::SeqCst));

        let remaining =
            drain_connections(&self.active_connections, self.options.shutdown_grace_period).await;
        logger::log_shutdown_complete(remaining);
    }
}

/// Wait until no connection is active or `grace_period` elapses.
///
/// Returns the number of connections still open at the end.
async fn drain_connections(active: &AtomicUsize, grace_period: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace_period;

    loop {
        let count = active.load(Ordering::SeqCst);
        if count == 0 {
            return 0;
        }

        tokio::select! {
            () = tokio::time::sleep(DRAIN_POLL_INTERVAL) => {}
            () = tokio::time::sleep_until(deadline) => {
                return active.load(Ordering::SeqCst);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_drain_returns_immediately_when_idle() {
        let active = AtomicUsize::new(0);
        assert_eq!(drain_connections(&active, Duration::from_secs(5)).await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_gives_up_after_grace_period() {
        let active = AtomicUsize::new(2);
        assert_eq!(drain_connections(&active, Duration::from_secs(1)).await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_sees_connections_close() {
        let active = Arc::new(AtomicUsize::new(1));
        let closer = Arc::clone(&active);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(120)).await;
            closer.fetch_sub(1, Ordering::SeqCst);
        });
        assert_eq!(drain_connections(&active, Duration::from_secs(10)).await, 0);
    }
}
