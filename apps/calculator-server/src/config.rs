//! Layered server configuration.
//!
//! Sources, lowest priority first: built-in defaults, the YAML file given with
//! `--config`, `APP__*` environment variables (`__` separates sections), and
//! finally command-line overrides.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::Context as _;
use calculator::CalculatorConfig;
use figment::Figment;
use figment::providers::{Env, Format as _, Serialized, Yaml};
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "APP__";

const MOCK_DSN: &str = "sqlite::memory:";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub modules: ModulesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Requests running longer than this are answered with 408.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    #[serde(default = "default_dsn")]
    pub dsn: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: default_dsn(),
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `calculator=debug,info`.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModulesConfig {
    #[serde(default)]
    pub calculator: CalculatorConfig,
}

/// Values taken from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub verbose: u8,
    pub mock: bool,
}

impl AppConfig {
    /// Merge defaults, the optional YAML file and `APP__*` environment variables.
    ///
    /// # Errors
    /// Returns an error if the file does not exist or any source fails to parse.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.is_file() {
                anyhow::bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("failed to load configuration (check YAML format and APP__* variables)")
    }

    pub fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(port) = overrides.port {
            self.server.bind_addr.set_port(port);
        }

        match overrides.verbose {
            0 => {}
            1 => "info".clone_into(&mut self.logging.level),
            2 => "debug".clone_into(&mut self.logging.level),
            _ => "trace".clone_into(&mut self.logging.level),
        }

        if overrides.mock {
            MOCK_DSN.clone_into(&mut self.database.dsn);
            self.database.max_connections = 1;
        }
    }

    /// Reject values the server cannot start with.
    ///
    /// # Errors
    /// Returns an error naming the offending setting.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.request_timeout_ms == 0 {
            anyhow::bail!("server.request_timeout_ms must be positive");
        }
        if self.database.dsn.trim().is_empty() {
            anyhow::bail!("database.dsn must not be empty");
        }
        if self.database.max_connections == 0 {
            anyhow::bail!("database.max_connections must be positive");
        }
        self.modules.calculator.validate()
    }

    /// Effective configuration as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8087))
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_dsn() -> String {
    "sqlite://calculator.db?mode=rwc".to_owned()
}

fn default_max_connections() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_yaml(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = temp_env::with_vars_unset(
            ["APP__SERVER__BIND_ADDR", "APP__DATABASE__DSN"],
            || AppConfig::load(None).unwrap(),
        );

        assert_eq!(config.server.bind_addr, default_bind_addr());
        assert_eq!(config.server.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.database.dsn, "sqlite://calculator.db?mode=rwc");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Text);
        assert_eq!(config.modules.calculator.max_history_limit, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_yaml(
            &dir,
            r"
server:
  bind_addr: 0.0.0.0:9000
logging:
  format: json
modules:
  calculator:
    default_history_limit: 10
",
        );

        let config = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(config.server.bind_addr.port(), 9000);
        assert_eq!(config.server.request_timeout_ms, 30_000);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.modules.calculator.default_history_limit, 10);
        assert_eq!(config.modules.calculator.max_history_limit, 100);
    }

    #[test]
    fn test_env_overrides_yaml() {
        let dir = TempDir::new().unwrap();
        let path = write_yaml(&dir, "database:\n  dsn: sqlite://from-file.db\n");

        let config = temp_env::with_var("APP__DATABASE__DSN", Some("sqlite://from-env.db"), || {
            AppConfig::load(Some(&path)).unwrap()
        });

        assert_eq!(config.database.dsn, "sqlite://from-env.db");
    }

    #[test]
    fn test_missing_file_is_rejected() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/calculator.yaml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_yaml(&dir, "server:\n  bind_adr: 127.0.0.1:1\n");

        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = AppConfig::default();
        config.apply_cli_overrides(&CliOverrides {
            port: Some(18087),
            verbose: 2,
            mock: true,
        });

        assert_eq!(config.server.bind_addr.port(), 18087);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.database.dsn, MOCK_DSN);
        assert_eq!(config.database.max_connections, 1);
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let mut config = AppConfig::default();
        config.apply_cli_overrides(&CliOverrides::default());

        assert_eq!(config.server.bind_addr, default_bind_addr());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.database.dsn, default_dsn());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.server.request_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.modules.calculator.default_history_limit = 500;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_to_json_round_trips_sections() {
        let json: serde_json::Value =
            serde_json::from_str(&AppConfig::default().to_json().unwrap()).unwrap();

        assert_eq!(json["server"]["bind_addr"], "127.0.0.1:8087");
        assert_eq!(json["logging"]["format"], "text");
        assert_eq!(json["modules"]["calculator"]["default_history_limit"], 50);
    }
}
