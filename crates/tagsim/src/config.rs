//! Server Configuration
//!
//! Defines the optional `tagsim.toml` file. Every field has a default, so an
//! empty file (or no file at all) yields the stock sample server.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{Error, Result};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerDefinition,
    pub parameters: DaParameters,
    pub simulation: SimulationConfig,
    pub log: LogConfig,
}

/// Registration identity reported to the protocol shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerDefinition {
    pub clsid_app: String,
    pub clsid_server: String,
    pub company_name: String,
    pub prog_id: String,
    pub prog_id_current: String,
    pub server_name: String,
    pub current_server_name: String,
}

impl Default for ServerDefinition {
    fn default() -> Self {
        Self {
            clsid_app: "{B5876868-F60B-4CC1-8FA5-36ED38B51FEB}".to_string(),
            clsid_server: "{212F55FA-7617-487E-B929-BC75279AC2AA}".to_string(),
            company_name: "Your-Company-Name-Here".to_string(),
            prog_id: "OpcNetDaAe.DaSimpleSample".to_string(),
            prog_id_current: "OpcNetDaAe.DaSimpleSample.90".to_string(),
            server_name: "OPC DA Server".to_string(),
            current_server_name: "OPC Server v1.0.0".to_string(),
        }
    }
}

/// How the shell presents the address space to browsing clients
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowseMode {
    #[default]
    Generic,
    Custom,
}

/// Data-access parameters reported to the protocol shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaParameters {
    /// Cache update period the shell should use, in milliseconds
    pub update_period_ms: u64,
    /// Separator between branches of item names
    pub branch_delimiter: char,
    pub browse_mode: BrowseMode,
}

impl Default for DaParameters {
    fn default() -> Self {
        Self {
            update_period_ms: 100,
            branch_delimiter: '.',
            browse_mode: BrowseMode::Generic,
        }
    }
}

/// Simulation loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub enabled: bool,
    /// Time between ticks, in milliseconds
    pub tick_period_ms: u64,
    /// How long shutdown waits for the loop to finish, in milliseconds
    pub shutdown_timeout_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_period_ms: 1000,
            shutdown_timeout_ms: 5000,
        }
    }
}

impl SimulationConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default level for this crate when `RUST_LOG` is not set
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Write to `tagsim.log` in this directory instead of stdout
    pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            directory: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    ///
    /// Only parses; call [`ServerConfig::validate`] once any overrides are applied.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.simulation.tick_period_ms == 0 {
            return Err(Error::Config("simulation.tick_period_ms must be positive".to_string()));
        }
        if self.simulation.shutdown_timeout_ms == 0 {
            return Err(Error::Config(
                "simulation.shutdown_timeout_ms must be positive".to_string(),
            ));
        }
        if self.parameters.branch_delimiter.is_alphanumeric() {
            return Err(Error::Config(format!(
                "parameters.branch_delimiter '{}' must not be alphanumeric",
                self.parameters.branch_delimiter
            )));
        }
        if self.log.level.parse::<tracing::Level>().is_err() {
            return Err(Error::Config(format!("unknown log level '{}'", self.log.level)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.simulation.tick_period(), Duration::from_secs(1));
        assert_eq!(config.simulation.shutdown_timeout(), Duration::from_secs(5));
        assert_eq!(config.parameters.update_period_ms, 100);
        assert_eq!(config.parameters.branch_delimiter, '.');
        assert_eq!(config.server.prog_id, "OpcNetDaAe.DaSimpleSample");
    }

    #[test]
    fn test_partial_override() {
        let config = ServerConfig::from_toml_str(
            r#"
[server]
company_name = "ACME"

[parameters]
branch_delimiter = "/"
browse_mode = "custom"

[simulation]
tick_period_ms = 250

[log]
level = "debug"
json = true
"#,
        )
        .unwrap();

        assert_eq!(config.server.company_name, "ACME");
        assert_eq!(config.server.server_name, "OPC DA Server");
        assert_eq!(config.parameters.branch_delimiter, '/');
        assert_eq!(config.parameters.browse_mode, BrowseMode::Custom);
        assert_eq!(config.simulation.tick_period_ms, 250);
        assert_eq!(config.simulation.shutdown_timeout_ms, 5000);
        assert!(config.simulation.enabled);
        assert_eq!(config.log.level, "debug");
        assert!(config.log.json);
    }

    #[test]
    fn test_validation_errors() {
        for content in [
            "[simulation]\ntick_period_ms = 0\n",
            "[simulation]\nshutdown_timeout_ms = 0\n",
            "[parameters]\nbranch_delimiter = \"x\"\n",
            "[log]\nlevel = \"loud\"\n",
        ] {
            let config = ServerConfig::from_toml_str(content).unwrap();
            assert!(matches!(config.validate(), Err(Error::Config(_))), "accepted {content:?}");
        }

        let result = ServerConfig::from_toml_str("[simulation]\ntick_period_ms = \"fast\"\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_parse_defers_validation() {
        // Overrides can still repair a value after parsing
        let mut config = ServerConfig::from_toml_str("[log]\nlevel = \"loud\"\n").unwrap();
        assert!(config.validate().is_err());

        config.log.level = "warn".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tagsim.toml");
        std::fs::write(&path, "[simulation]\nenabled = false\n").unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert!(!config.simulation.enabled);

        let missing = ServerConfig::load(dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }
}
