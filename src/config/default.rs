//! Default configuration template and file creation utilities.
//!
//! Provides a commented TOML template that matches `Config::default()`
//! and functions to write it to the XDG config path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::error::ConfigError;
use crate::config::xdg;

// ---------------------------------------------------------------------------
// Default TOML template
// ---------------------------------------------------------------------------

/// A commented TOML template with all default values.
///
/// Every value here must match `Config::default()` from `schema.rs`.
/// Sections: `[dashboard]`, `[storage]`, `[logging]`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Inventory Dashboard Configuration
#
# This file was auto-generated with default values.
# All values shown below are the built-in defaults.
#
# Location: $XDG_CONFIG_HOME/inventory-dashboard/config.toml

# ==============================================================================
# Dashboard
# ==============================================================================

[dashboard]

# Whose saved layout to load. Each user has one preferences record.
# Characters outside [A-Za-z0-9-] are hex-escaped in the record name
# (for example "bob.smith" is stored as bob_2esmith.json).
user = "default"

# Container width in pixels when --width is not given.
# Breakpoints: >= 900 lg (12 columns), 600-899 md (6 columns), < 600 sm (1 column)
width = 1280

# ==============================================================================
# Storage
# ==============================================================================

[storage]

# Directory holding one <user>.json preferences record per user.
# Empty string means $XDG_DATA_HOME/inventory-dashboard.
# Tilde (~) is expanded to the user's home directory.
data_dir = ""

# ==============================================================================
# Logging
# ==============================================================================

[logging]

# Logging verbosity when INVDASH_LOG is not set.
# Options: "error", "warn", "info", "debug", "trace"
#   warn  - storage failures and ignored records (recommended)
#   debug - reconciliation and drag/resize details
log_level = "warn"
"#;

// ---------------------------------------------------------------------------
// File creation functions
// ---------------------------------------------------------------------------

/// Creates (or force-overwrites) the default config file.
///
/// - If the file exists and `force` is `false`, returns `ConfigError::Exists`.
/// - If the file exists and `force` is `true`, backs it up to `.toml.backup` first.
/// - Returns the path where the config was written.
pub fn create_default_config(force: bool) -> Result<PathBuf, ConfigError> {
    let path = xdg::config_path();

    if path.exists() {
        if !force {
            return Err(ConfigError::Exists { path });
        }
        let backup_path = path.with_extension("toml.backup");
        fs::rename(&path, &backup_path).map_err(|e| ConfigError::write(&backup_path, e))?;
        tracing::info!("Backed up existing config to {}", backup_path.display());
    }

    write_default_config(&path)?;
    tracing::info!("Created default configuration at {}", path.display());
    Ok(path)
}

/// Writes the default template to `path`, creating parent dirs and setting 0600 permissions.
fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let to_write_error = |source| ConfigError::write(path, source);

    xdg::ensure_config_dir().map_err(to_write_error)?;
    fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(to_write_error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(to_write_error)?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::Config;
    use serial_test::serial;

    /// Run closure with `XDG_CONFIG_HOME` temporarily pointed at `dir`.
    fn with_xdg_config<F: FnOnce()>(dir: &str, f: F) {
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        std::env::set_var("XDG_CONFIG_HOME", dir);
        f();
        match original {
            Some(v) => std::env::set_var("XDG_CONFIG_HOME", v),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }

    // -- Template validity --------------------------------------------------

    #[test]
    fn template_values_match_config_default() {
        let from_template: Config =
            toml::from_str(DEFAULT_CONFIG_TEMPLATE).expect("template should parse");
        assert_eq!(from_template, Config::default());
    }

    #[test]
    fn template_contains_all_section_headers() {
        for section in ["[dashboard]", "[storage]", "[logging]"] {
            assert!(
                DEFAULT_CONFIG_TEMPLATE.contains(section),
                "missing {section} section"
            );
        }
    }

    // -- create_default_config ----------------------------------------------

    #[test]
    #[serial]
    fn create_without_force_returns_already_exists() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        with_xdg_config(tmp.path().to_str().expect("non-utf8 tmpdir"), || {
            create_default_config(false).expect("first call should succeed");
            let err = create_default_config(false).expect_err("second init without --force");
            match err {
                ConfigError::Exists { .. } => {}
                other => panic!("expected Exists, got: {other:?}"),
            }
        });
    }

    #[test]
    #[serial]
    fn create_with_force_creates_backup() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        with_xdg_config(tmp.path().to_str().expect("non-utf8 tmpdir"), || {
            let path = create_default_config(false).expect("first call should succeed");
            fs::write(&path, "# custom content\n").expect("overwrite for test");

            let new_path = create_default_config(true).expect("force should succeed");
            assert_eq!(new_path, path);

            let backup = path.with_extension("toml.backup");
            let backup_content = fs::read_to_string(&backup).expect("read backup");
            assert_eq!(backup_content, "# custom content\n");
            let content = fs::read_to_string(&path).expect("read new");
            assert_eq!(content, DEFAULT_CONFIG_TEMPLATE);
        });
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn file_permissions_are_0600() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let expected_path = tmp.path().join("inventory-dashboard/config.toml");
        with_xdg_config(tmp.path().to_str().expect("non-utf8 tmpdir"), || {
            let path = create_default_config(false).expect("should succeed");
            assert_eq!(path, expected_path);
            let mode = fs::metadata(&expected_path)
                .expect("metadata")
                .permissions()
                .mode();
            assert_eq!(mode & 0o777, 0o600, "file should be owner-only read/write");
        });
    }
}
