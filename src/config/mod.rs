// Configuration module entry point
// Loads layered configuration: built-in defaults, optional config file, environment

mod types;

use std::net::SocketAddr;
use std::time::Duration;

use crate::handler::SiteRoot;

pub use types::{Config, LoggingConfig, PerformanceConfig, ServerConfig};

/// Environment variable naming the config file (without extension)
pub const CONFIG_PATH_ENV: &str = "STATIK_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from `$STATIK_CONFIG`, or "config.toml" when unset
    pub fn load() -> Result<Self, config::ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (extension optional)
    ///
    /// A missing file is not an error; defaults and `STATIK_*` environment
    /// variables still apply (e.g. `STATIK_SERVER__PORT=8080`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_layered(config_path, environment())
    }

    fn load_layered(
        config_path: &str,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(env)
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.root", "public")?
            .set_default("logging.level", "info")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_buffer_size", 65_536)? // 64KB
            .set_default("performance.shutdown_grace_period", 10)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Resolve the served root against the current working directory
    pub fn site_root(&self) -> std::io::Result<SiteRoot> {
        SiteRoot::new(&self.server.root, self.performance.read_buffer_size)
    }

    pub const fn shutdown_grace_period(&self) -> Duration {
        Duration::from_secs(self.performance.shutdown_grace_period)
    }
}

/// `STATIK_<SECTION>__<KEY>` variables, e.g. `STATIK_PERFORMANCE__KEEP_ALIVE`
fn environment() -> config::Environment {
    config::Environment::with_prefix("STATIK")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("/nonexistent/statik-config").unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.server.root, "public");
        assert_eq!(cfg.server.workers, None);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.performance.keep_alive);
        assert_eq!(cfg.performance.read_buffer_size, 65_536);
        assert_eq!(cfg.shutdown_grace_period(), Duration::from_secs(10));
        assert_eq!(cfg.socket_addr().unwrap(), "0.0.0.0:3000".parse().unwrap());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statik.toml");
        std::fs::write(
            &path,
            "[server]\nport = 8081\nroot = \"site\"\nworkers = 2\n\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 8081);
        assert_eq!(cfg.server.root, "site");
        assert_eq!(cfg.server.workers, Some(2));
        assert_eq!(cfg.logging.level, "debug");
        // untouched keys keep their defaults
        assert_eq!(cfg.server.host, "0.0.0.0");
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statik.toml");
        std::fs::write(&path, "[server]\nport = 8081\nroot = \"site\"\n").unwrap();

        let vars: config::Map<String, String> = [
            ("STATIK_SERVER__PORT", "8080"),
            ("STATIK_PERFORMANCE__KEEP_ALIVE", "false"),
            ("OTHER_SERVER__PORT", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let cfg =
            Config::load_layered(path.to_str().unwrap(), environment().source(Some(vars))).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert!(!cfg.performance.keep_alive);
        // keys without a variable still come from the file
        assert_eq!(cfg.server.root, "site");
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        let mut cfg = Config::load_from("/nonexistent/statik-config").unwrap();
        cfg.server.host = "not an address".to_string();
        assert!(cfg.socket_addr().is_err());
    }
}
