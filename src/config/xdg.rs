//! Platform-aware path resolution for inventory-dashboard.
//!
//! On **Linux**, follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/inventory-dashboard` or `~/.config/inventory-dashboard`
//! - Data (preference records): `$XDG_DATA_HOME/inventory-dashboard` or `~/.local/share/inventory-dashboard`
//!
//! On **macOS**, uses Apple conventions with XDG env var overrides:
//! - Config: `$XDG_CONFIG_HOME/inventory-dashboard` or `~/Library/Application Support/inventory-dashboard`
//! - Data: `$XDG_DATA_HOME/inventory-dashboard` or `~/Library/Application Support/inventory-dashboard`
//!
//! When no home directory can be determined the current directory is used.

use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "inventory-dashboard";

/// Returns the configuration directory for inventory-dashboard.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/inventory-dashboard` (if env var set, any platform)
/// 2. Platform default (see module docs)
pub fn config_dir() -> PathBuf {
    if let Some(xdg) = env_dir("XDG_CONFIG_HOME") {
        return xdg.join(APP_NAME);
    }
    platform_config_dir().join(APP_NAME)
}

/// Returns the path to the main configuration file.
///
/// Resolves to `config_dir()/config.toml`.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Returns the directory holding persisted preference records.
///
/// Resolution order:
/// 1. `$XDG_DATA_HOME/inventory-dashboard` (if env var set, any platform)
/// 2. Platform default (see module docs)
pub fn data_dir() -> PathBuf {
    if let Some(xdg) = env_dir("XDG_DATA_HOME") {
        return xdg.join(APP_NAME);
    }
    platform_data_dir().join(APP_NAME)
}

fn env_dir(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Platform-native config base directory (without XDG override).
fn platform_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support
        dirs::config_dir().unwrap_or_else(|| home_dir().join("Library/Application Support"))
    }
    #[cfg(not(target_os = "macos"))]
    {
        home_dir().join(".config")
    }
}

/// Platform-native data base directory (without XDG override).
fn platform_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir().unwrap_or_else(|| home_dir().join("Library/Application Support"))
    }
    #[cfg(not(target_os = "macos"))]
    {
        home_dir().join(".local/share")
    }
}

/// Expands a leading `~` in a path string to the user's home directory.
///
/// If the path does not start with `~`, it is returned as-is.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home_dir().join(rest)
    } else if path == "~" {
        home_dir()
    } else {
        PathBuf::from(path)
    }
}

/// Creates a directory and all parent directories with mode 0700.
///
/// Equivalent to `mkdir -p` with restricted permissions.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}

/// Creates the configuration directory if it does not exist, returning its path.
pub fn ensure_config_dir() -> std::io::Result<PathBuf> {
    let dir = config_dir();
    ensure_dir(&dir)?;
    Ok(dir)
}
