//! Bootstrap configuration
//!
//! Controls auto-loading, the manifest modules directory and logging. Loaded
//! from JSON or TOML; environment variables can override individual fields.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::utils::env::{env_bool_opt, env_opt};

/// Environment variable overriding `modules.auto_load`
pub const ENV_AUTO_LOAD: &str = "MODWEAVE_AUTO_LOAD";
/// Environment variable overriding `modules.modules_dir`
pub const ENV_MODULES_DIR: &str = "MODWEAVE_MODULES_DIR";
/// Environment variable overriding `logging.filter`
pub const ENV_LOG: &str = "MODWEAVE_LOG";

/// Module system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Run auto-discovery during bootstrap
    #[serde(default = "default_true")]
    pub auto_load: bool,

    /// Directory scanned for `*/module.toml` manifests
    #[serde(default = "default_modules_dir")]
    pub modules_dir: String,

    /// Emit deprecation alerts for deprecated modules
    #[serde(default = "default_true")]
    pub report_deprecated: bool,
}

fn default_true() -> bool {
    true
}

fn default_modules_dir() -> String {
    "modules".to_string()
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            auto_load: true,
            modules_dir: default_modules_dir(),
            report_deprecated: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive (e.g. "info", "modweave=debug"); `RUST_LOG` takes precedence
    #[serde(default)]
    pub filter: Option<String>,

    /// Structured JSON output (requires the `json-logging` feature)
    #[serde(default)]
    pub json_format: bool,
}

/// Top-level bootstrap configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default)]
    pub modules: ModuleConfig,

    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

impl BootstrapConfig {
    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BootstrapConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BootstrapConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration, choosing the format from the file extension
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            other => Err(anyhow::anyhow!(
                "Unsupported config format {:?} for {}; expected .json or .toml",
                other,
                path.display()
            )),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.modules.auto_load && self.modules.modules_dir.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "modules_dir must not be empty when auto_load is enabled"
            ));
        }

        if let Some(filter) = self.logging.as_ref().and_then(|l| l.filter.as_deref()) {
            if filter.trim().is_empty() {
                return Err(anyhow::anyhow!("logging filter must not be empty if set"));
            }
        }

        Ok(())
    }

    /// Apply `MODWEAVE_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Some(auto_load) = env_bool_opt(ENV_AUTO_LOAD) {
            self.modules.auto_load = auto_load;
        }
        if let Some(dir) = env_opt(ENV_MODULES_DIR) {
            self.modules.modules_dir = dir;
        }
        if let Some(filter) = env_opt(ENV_LOG) {
            self.logging.get_or_insert_with(LoggingConfig::default).filter = Some(filter);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config: BootstrapConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BootstrapConfig::default());
        assert!(config.modules.auto_load);
        assert_eq!(config.modules.modules_dir, "modules");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip_and_toml() {
        let temp = TempDir::new().unwrap();
        let json_path = temp.path().join("bootstrap.json");

        let mut config = BootstrapConfig::default();
        config.modules.modules_dir = "plugins".to_string();
        config.to_json_file(&json_path).unwrap();
        assert_eq!(BootstrapConfig::from_file(&json_path).unwrap(), config);

        let toml_path = temp.path().join("bootstrap.toml");
        std::fs::write(
            &toml_path,
            "[modules]\nauto_load = false\n\n[logging]\nfilter = \"debug\"\n",
        )
        .unwrap();
        let config = BootstrapConfig::from_file(&toml_path).unwrap();
        assert!(!config.modules.auto_load);
        assert_eq!(config.logging.unwrap().filter.as_deref(), Some("debug"));

        assert!(BootstrapConfig::from_file(&temp.path().join("bootstrap.yaml")).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_modules_dir() {
        let mut config = BootstrapConfig::default();
        config.modules.modules_dir = " ".to_string();
        assert!(config.validate().is_err());

        config.modules.auto_load = false;
        assert!(config.validate().is_ok());
    }
}
