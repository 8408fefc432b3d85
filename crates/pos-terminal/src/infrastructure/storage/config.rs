//! TOML-based configuration for the terminal application.
//!
//! Reads and writes `AppConfig` to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\SmartPOS\config.toml`
//! - Linux:    `~/.config/smartpos/config.toml`
//! - macOS:    `~/Library/Application Support/SmartPOS/config.toml`
//!
//! Example file:
//!
//! ```toml
//! [terminal]
//! name = "front-counter"
//! log_level = "debug"
//!
//! [driver]
//! power_up_delay_ms = 1000
//!
//! [simulator]
//! init_failures = 1
//! granted = ["storage", "radio-pairing"]
//! denied = ["fine-location"]
//! ```
//!
//! # Serde default values
//!
//! Every field has a `#[serde(default ...)]` so a partial file (or none at
//! all) still produces a complete configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use pos_core::Capability;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub terminal: TerminalConfig,
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

/// General terminal settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TerminalConfig {
    /// Name shown by the UI shell and in log output.
    #[serde(default = "default_terminal_name")]
    pub name: String,
    /// `tracing` log level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Driver session settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriverConfig {
    /// Time allowed for terminal power-up before the init retry.
    #[serde(default = "default_power_up_delay_ms")]
    pub power_up_delay_ms: u64,
}

impl DriverConfig {
    pub fn power_up_delay(&self) -> Duration {
        Duration::from_millis(self.power_up_delay_ms)
    }
}

/// Behaviour of the simulated driver and permission service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SimulatorConfig {
    /// Number of init attempts the simulated driver fails before succeeding.
    #[serde(default)]
    pub init_failures: u32,
    /// Capabilities already granted when the terminal starts.
    #[serde(default)]
    pub granted: Vec<Capability>,
    /// Capabilities the simulated user refuses when prompted.
    #[serde(default)]
    pub denied: Vec<Capability>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_terminal_name() -> String {
    "pos-terminal".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_power_up_delay_ms() -> u64 {
    1000
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            name: default_terminal_name(),
            log_level: default_log_level(),
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            power_up_delay_ms: default_power_up_delay_ms(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the full path to the platform config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    let dir = platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)?;
    Ok(dir.join("config.toml"))
}

/// Loads `AppConfig` from the platform config file.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("SmartPOS"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("smartpos"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("SmartPOS")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pos-terminal-{label}-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_app_config_default_waits_one_second_for_power_up() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.driver.power_up_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_app_config_default_simulates_a_healthy_terminal() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.simulator.init_failures, 0);
        assert!(cfg.simulator.granted.is_empty());
        assert!(cfg.simulator.denied.is_empty());
        assert_eq!(cfg.terminal.log_level, "info");
    }

    #[test]
    fn test_partial_toml_fills_in_defaults() {
        // Arrange
        let text = r#"
            [simulator]
            init_failures = 1
            denied = ["fine-location", "radio-scan"]
        "#;

        // Act
        let cfg: AppConfig = toml::from_str(text).expect("parse");

        // Assert
        assert_eq!(cfg.simulator.init_failures, 1);
        assert_eq!(
            cfg.simulator.denied,
            vec![Capability::FineLocation, Capability::RadioScan]
        );
        assert_eq!(cfg.driver.power_up_delay_ms, 1000);
        assert_eq!(cfg.terminal.name, "pos-terminal");
    }

    #[test]
    fn test_unknown_capability_name_fails_to_parse() {
        let text = r#"
            [simulator]
            granted = ["camera"]
        "#;

        assert!(toml::from_str::<AppConfig>(text).is_err());
    }

    #[test]
    fn test_load_config_from_missing_file_returns_defaults() {
        let path = scratch_dir("missing").join("config.toml");

        let cfg = load_config_from(&path).expect("load");

        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_save_then_load_preserves_settings() {
        // Arrange
        let dir = scratch_dir("save");
        let path = dir.join("nested").join("config.toml");
        let mut cfg = AppConfig::default();
        cfg.terminal.name = "front-counter".to_string();
        cfg.driver.power_up_delay_ms = 1500;
        cfg.simulator.granted = vec![Capability::Storage];

        // Act
        save_config_to(&path, &cfg).expect("save");
        let loaded = load_config_from(&path).expect("load");

        // Assert
        assert_eq!(loaded, cfg);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_load_config_from_malformed_file_is_parse_error() {
        let dir = scratch_dir("malformed");
        std::fs::create_dir_all(&dir).expect("mkdir");
        let path = dir.join("config.toml");
        std::fs::write(&path, "[driver\npower_up_delay_ms = ").expect("write");

        let result = load_config_from(&path);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
        let _ = std::fs::remove_dir_all(dir);
    }
}
