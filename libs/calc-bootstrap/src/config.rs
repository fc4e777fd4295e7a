//! Application configuration.
//!
//! Layered config:
//! 1) defaults -> 2) YAML (if provided) -> 3) env (`CALCULATOR__*`) -> 4) CLI overrides

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};

/// Environment variable prefix; nested keys are separated by `__`,
/// e.g. `CALCULATOR__SERVER__LISTEN_ADDR=0.0.0.0:50051`.
pub const ENV_PREFIX: &str = "CALCULATOR__";

/// Top-level configuration shared by the server and client binaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub logging: LoggingConfig,
}

/// Server-side settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address, `host:port`.
    pub listen_addr: String,
    /// Pause after each streamed Fibonacci term.
    pub fibonacci_interval_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:50051".to_owned(),
            fibonacci_interval_ms: 1000,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn fibonacci_interval(&self) -> Duration {
        Duration::from_millis(self.fibonacci_interval_ms)
    }
}

/// Client-side settings, including the demo calls the client performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoint: String,
    pub connect_timeout_ms: u64,
    pub rpc_timeout_ms: u64,
    pub sum_a: i64,
    pub sum_b: i64,
    pub fibonacci_target: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:50051".to_owned(),
            connect_timeout_ms: 10_000,
            rpc_timeout_ms: 30_000,
            sum_a: 3,
            sum_b: 10,
            fibonacci_target: 9,
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    #[must_use]
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when neither `-v` nor `RUST_LOG` is given.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Compact,
        }
    }
}

/// Command-line values that participate in config layering.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub verbose: u8,
    /// Overrides `server.listen_addr`.
    pub listen_addr: Option<String>,
    /// Overrides `client.endpoint`.
    pub endpoint: Option<String>,
}

impl AppConfig {
    /// Load configuration from defaults, an optional YAML file and the environment.
    ///
    /// # Errors
    /// Returns an error if `path` is given but does not exist, or if any layer
    /// fails to deserialize.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.is_file() {
                anyhow::bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("failed to load configuration")
    }

    /// Apply CLI overrides on top of the loaded configuration.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(addr) = &args.listen_addr {
            self.server.listen_addr.clone_from(addr);
        }
        if let Some(endpoint) = &args.endpoint {
            self.client.endpoint.clone_from(endpoint);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_yaml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_match_localhost_service() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.listen_addr, "127.0.0.1:50051");
        assert_eq!(cfg.server.fibonacci_interval(), Duration::from_secs(1));
        assert_eq!(cfg.client.endpoint, "http://localhost:50051");
        assert_eq!((cfg.client.sum_a, cfg.client.sum_b), (3, 10));
        assert_eq!(cfg.client.fibonacci_target, 9);
        assert_eq!(cfg.logging.format, LogFormat::Compact);
    }

    #[test]
    fn yaml_overrides_defaults_partially() {
        let file = write_yaml(
            "server:\n  fibonacci_interval_ms: 50\nlogging:\n  level: debug\n  format: json\n",
        );

        let cfg = AppConfig::load_or_default(Some(file.path())).unwrap();
        assert_eq!(cfg.server.fibonacci_interval_ms, 50);
        assert_eq!(cfg.server.listen_addr, "127.0.0.1:50051");
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.client, ClientConfig::default());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");

        let err = AppConfig::load_or_default(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("config file does not exist"));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let file = write_yaml("server:\n  fibonacci_interval_ms: soon\n");
        assert!(AppConfig::load_or_default(Some(file.path())).is_err());
    }

    #[test]
    fn cli_overrides_win() {
        let mut cfg = AppConfig::default();
        cfg.apply_cli_overrides(&CliArgs {
            listen_addr: Some("0.0.0.0:6000".to_owned()),
            endpoint: Some("http://10.0.0.1:6000".to_owned()),
            ..Default::default()
        });
        assert_eq!(cfg.server.listen_addr, "0.0.0.0:6000");
        assert_eq!(cfg.client.endpoint, "http://10.0.0.1:6000");
    }

    #[test]
    fn empty_cli_args_leave_config_untouched() {
        let mut cfg = AppConfig::default();
        cfg.apply_cli_overrides(&CliArgs::default());
        assert_eq!(cfg, AppConfig::default());
    }
}
