//! TOML configuration schema types for the inventory dashboard.
//!
//! All structs derive `Deserialize` and `Serialize` with defaults via
//! `#[serde(default)]`, so a partial or empty file is always valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::xdg;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration encompassing all sections.
///
/// Corresponds to the full TOML file structure:
/// ```toml
/// [dashboard]
/// [storage]
/// [logging]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Whose dashboard to show and at what width.
    pub dashboard: DashboardConfig,
    /// Where preference records live.
    pub storage: StorageConfig,
    /// Log verbosity.
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// `[dashboard]` section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// User whose preferences record is loaded.
    pub user: String,
    /// Container width in pixels used when `--width` is not given.
    pub width: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            user: "default".to_string(),
            width: 1280,
        }
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// `[storage]` section.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory of preference records. Empty means the XDG data directory.
    /// A leading `~` is expanded.
    pub data_dir: String,
}

impl StorageConfig {
    /// Effective data directory.
    pub fn resolved_data_dir(&self) -> PathBuf {
        if self.data_dir.trim().is_empty() {
            xdg::data_dir()
        } else {
            xdg::expand_tilde(&self.data_dir)
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// `[logging]` section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level used when `INVDASH_LOG` is unset.
    pub log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Warn,
        }
    }
}

/// Log verbosity levels (kebab-case in TOML).
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings (default).
    Warn,
    /// Informational messages.
    Info,
    /// Debug-level detail.
    Debug,
    /// Full trace output.
    Trace,
}

impl LogLevel {
    /// Filter directive for `tracing-subscriber`.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_config_all_fields() {
        let toml_str = r#"
[dashboard]
user = "alice"
width = 800

[storage]
data_dir = "/srv/invdash"

[logging]
log_level = "debug"
"#;
        let config: Config = toml::from_str(toml_str).expect("valid TOML should parse");
        assert_eq!(config.dashboard.user, "alice");
        assert_eq!(config.dashboard.width, 800);
        assert_eq!(config.storage.data_dir, "/srv/invdash");
        assert_eq!(config.logging.log_level, LogLevel::Debug);
    }

    #[test]
    fn parse_empty_string_uses_all_defaults() {
        let config: Config = toml::from_str("").expect("empty string should parse");
        assert_eq!(config, Config::default());
        assert_eq!(config.dashboard.width, 1280);
        assert_eq!(config.logging.log_level, LogLevel::Warn);
    }

    #[test]
    fn parse_unknown_fields_are_ignored() {
        let toml_str = r#"
unknown_key = "hello"

[dashboard]
future_field = 42
"#;
        let config: Config = toml::from_str(toml_str).expect("unknown fields should be ignored");
        assert_eq!(config.dashboard, DashboardConfig::default());
    }

    #[test]
    fn log_levels_parse_and_map_to_filters() {
        for (raw, expected) in [
            ("error", LogLevel::Error),
            ("warn", LogLevel::Warn),
            ("info", LogLevel::Info),
            ("debug", LogLevel::Debug),
            ("trace", LogLevel::Trace),
        ] {
            let toml_str = format!("[logging]\nlog_level = \"{raw}\"\n");
            let config: Config = toml::from_str(&toml_str).expect("should parse");
            assert_eq!(config.logging.log_level, expected);
            assert_eq!(expected.as_filter(), raw);
        }
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let result: Result<Config, _> = toml::from_str("[logging]\nlog_level = \"loud\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn explicit_data_dir_is_used_as_is() {
        let storage = StorageConfig {
            data_dir: "/srv/invdash".to_string(),
        };
        assert_eq!(storage.resolved_data_dir(), PathBuf::from("/srv/invdash"));
    }

    #[test]
    fn tilde_data_dir_is_expanded() {
        let storage = StorageConfig {
            data_dir: "~/prefs".to_string(),
        };
        let home = dirs::home_dir().expect("could not determine home directory");
        assert_eq!(storage.resolved_data_dir(), home.join("prefs"));
    }
}
