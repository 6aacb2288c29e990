//! TOML-based configuration for the layout manager and the `vkb-layout` tool.
//!
//! `AppConfig` lives in one file per user:
//! - Windows:  `%APPDATA%\vkb\config.toml`
//! - Linux:    `~/.config/vkb/config.toml`
//! - macOS:    `~/Library/Application Support/vkb/config.toml`
//!
//! Example:
//!
//! ```toml
//! [engine]
//! cache_capacity = 3
//! default_layout = "qwerty"
//! default_locale = "en-US"
//!
//! [resources]
//! layouts_dir = "/usr/share/vkb/layouts"
//!
//! [logging]
//! log_level = "debug"
//! ```
//!
//! # Defaults
//!
//! Every field carries a serde default, so an absent file and a sparse file
//! resolve to the same values.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::layout_manager::{cache_capacity, DEFAULT_CACHE_CAPACITY};

/// Failures while reading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither `APPDATA`, `XDG_CONFIG_HOME` nor `HOME` is set.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file or directory operation failed.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`AppConfig`].
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub resources: ResourceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Layout engine settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Layout sets kept in the resolver cache.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Layout set used when a request names none.
    #[serde(default = "default_layout")]
    pub default_layout: String,
    /// BCP 47 tag used when a request names no locale.
    #[serde(default = "default_locale")]
    pub default_locale: String,
}

/// Where layout resources come from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResourceConfig {
    /// Directory of layout JSON files; the bundled layouts when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layouts_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}
fn default_layout() -> String {
    "qwerty".to_string()
}
fn default_locale() -> String {
    "en-US".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            default_layout: default_layout(),
            default_locale: default_locale(),
        }
    }
}

impl EngineConfig {
    /// `cache_capacity` as a usable cache size; `0` keeps one slot.
    pub fn resolver_cache_capacity(&self) -> NonZeroUsize {
        cache_capacity(self.cache_capacity)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// The `vkb` directory under the platform config base.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when no base directory is
/// known for this environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// `config.toml` inside [`config_dir`].
///
/// # Errors
///
/// Same as [`config_dir`].
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from the platform config file, returning defaults if the
/// file does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when the file exists but cannot be read, and
/// [`ConfigError::Parse`] when it does not describe an [`AppConfig`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AppConfig` from `path`, returning defaults if it does not exist.
///
/// # Errors
///
/// Same as [`load_config`].
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

/// Persists `config` to the platform config file.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when the file or its directory cannot be
/// written.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &config_file_path()?)
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Same as [`save_config`].
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
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

/// Resolves the platform config base directory including the `vkb` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("vkb"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("vkb"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support").join("vkb"))
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

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("vkb_config_{name}_{}", std::process::id()))
    }

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn test_app_config_default_engine_settings() {
        // Arrange / Act
        let cfg = AppConfig::default();

        // Assert
        assert_eq!(cfg.engine.cache_capacity, 3);
        assert_eq!(cfg.engine.default_layout, "qwerty");
        assert_eq!(cfg.engine.default_locale, "en-US");
        assert_eq!(cfg.resources.layouts_dir, None);
        assert_eq!(cfg.logging.log_level, "info");
    }

    // ── TOML parsing ──────────────────────────────────────────────────────────

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_deserialize_partial_engine_overrides_defaults() {
        // Arrange
        let toml_str = r#"
[engine]
cache_capacity = 8

[resources]
layouts_dir = "/opt/layouts"
"#;

        // Act
        let cfg: AppConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.engine.cache_capacity, 8);
        assert_eq!(cfg.engine.default_layout, "qwerty");
        assert_eq!(cfg.resources.layouts_dir, Some(PathBuf::from("/opt/layouts")));
    }

    #[test]
    fn test_zero_cache_capacity_maps_to_one_slot() {
        let cfg: AppConfig = toml::from_str("[engine]\ncache_capacity = 0").expect("deserialize");
        assert_eq!(cfg.engine.resolver_cache_capacity().get(), 1);
        assert_eq!(AppConfig::default().engine.resolver_cache_capacity().get(), 3);
    }

    #[test]
    fn test_none_layouts_dir_is_omitted_from_toml() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).expect("serialize");
        assert!(!toml_str.contains("layouts_dir"));
    }

    #[test]
    fn test_deserialize_invalid_toml_returns_parse_error() {
        let result: Result<AppConfig, toml::de::Error> = toml::from_str("[[[ not valid toml");
        assert!(result.is_err());
    }

    // ── load/save ─────────────────────────────────────────────────────────────

    #[test]
    fn test_load_config_from_missing_file_returns_default() {
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/config.toml");
        let cfg = load_config_from(&path).expect("missing file is not an error");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_load_config_from_malformed_file_is_parse_error() {
        let dir = temp_dir("malformed");
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("config.toml");
        std::fs::write(&path, "engine = [").expect("write");

        let result = load_config_from(&path);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_and_load_config_round_trip_via_temp_dir() {
        // Arrange
        let dir = temp_dir("round_trip");
        let path = dir.join("nested").join("config.toml");
        let mut cfg = AppConfig::default();
        cfg.engine.cache_capacity = 5;
        cfg.logging.log_level = "debug".to_string();
        cfg.resources.layouts_dir = Some(PathBuf::from("/srv/layouts"));

        // Act
        save_config_to(&cfg, &path).expect("save");
        let loaded = load_config_from(&path).expect("load");

        // Assert
        assert_eq!(loaded, cfg);

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_config_file_path_ends_with_config_toml() {
        if let Ok(path) = config_file_path() {
            assert!(path.ends_with("vkb/config.toml") || path.ends_with("vkb\\config.toml"));
        }
        // NoPlatformConfigDir in a stripped environment is also acceptable.
    }
}
