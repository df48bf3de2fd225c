//! Reads `config.toml` into [`Config`].
//!
//! A missing file at the XDG location is not an error: the built-in
//! defaults apply. A file that exists but does not parse is reported with
//! its line and column so `invdash config validate` can point at it.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::config::error::ConfigError;
use crate::config::schema::Config;
use crate::config::xdg;

/// Entry point for configuration loading.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `$XDG_CONFIG_HOME/inventory-dashboard/config.toml`, or the
    /// defaults when there is no such file.
    pub fn load_default() -> Result<Config, ConfigError> {
        let path = xdg::config_path();
        match Self::load_file(&path)? {
            Some(config) => Ok(config),
            None => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Config::default())
            }
        }
    }

    /// Loads the file at `path`. `Ok(None)` means it does not exist.
    pub fn load_file(path: &Path) -> Result<Option<Config>, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => parse(&content, path).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::read(path, e)),
        }
    }
}

fn parse(content: &str, path: &Path) -> Result<Config, ConfigError> {
    toml::from_str(content).map_err(|e| {
        let (line, column) = e
            .span()
            .map_or((0, 0), |span| line_column(content, span.start));
        ConfigError::Parse {
            path: path.to_path_buf(),
            line,
            column,
            message: e.message().to_string(),
        }
    })
}

/// One-based line and column of a byte offset.
fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let before = &content[..offset.min(content.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |p| p + 1);
    (line, before.len() - line_start + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogLevel;
    use serial_test::serial;

    fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("config.toml");
        fs::write(&path, body).expect("write config");
        path
    }

    #[test]
    fn sections_left_out_keep_their_defaults() {
        let config = parse("[logging]\nlog_level = \"info\"\n", Path::new("c.toml"))
            .expect("logging-only config");
        assert_eq!(config.logging.log_level, LogLevel::Info);
        assert_eq!(config.dashboard, Config::default().dashboard);
        assert_eq!(config.storage, Config::default().storage);
    }

    #[test]
    fn wrong_type_points_at_the_value() {
        let err = parse("[dashboard]\nwidth = \"wide\"\n", Path::new("c.toml"))
            .expect_err("width must be a number");
        match err {
            ConfigError::Parse {
                line,
                column,
                message,
                ..
            } => {
                assert_eq!(line, 2);
                assert!(column > 1, "column should point past `width = `");
                assert!(!message.is_empty());
            }
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn line_column_is_one_based() {
        assert_eq!(line_column("abc", 0), (1, 1));
        assert_eq!(line_column("ab\ncd", 4), (2, 2));
        assert_eq!(line_column("ab", 99), (1, 3));
    }

    #[test]
    fn load_file_reads_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(dir.path(), "[dashboard]\nuser = \"bob\"\n");
        let config = ConfigLoader::load_file(&path)
            .expect("readable")
            .expect("present");
        assert_eq!(config.dashboard.user, "bob");
    }

    #[test]
    fn load_file_reports_absence_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = ConfigLoader::load_file(&dir.path().join("absent.toml")).expect("no error");
        assert!(loaded.is_none());
    }

    #[test]
    fn load_file_on_a_directory_is_a_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = ConfigLoader::load_file(dir.path()).expect_err("directory is not a file");
        assert!(matches!(err, ConfigError::Read { .. }), "got {err:?}");
        assert_eq!(err.path(), dir.path());
    }

    #[test]
    #[serial]
    fn load_default_uses_the_xdg_file_when_present() {
        let dir = tempfile::tempdir().expect("tempdir");
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        std::env::set_var("XDG_CONFIG_HOME", dir.path());

        let defaults = ConfigLoader::load_default().expect("defaults without a file");
        let app_dir = dir.path().join("inventory-dashboard");
        fs::create_dir_all(&app_dir).expect("create app dir");
        write_config(&app_dir, "[dashboard]\nwidth = 640\n");
        let loaded = ConfigLoader::load_default().expect("file parses");

        match original {
            Some(v) => std::env::set_var("XDG_CONFIG_HOME", v),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
        assert_eq!(defaults, Config::default());
        assert_eq!(loaded.dashboard.width, 640);
    }
}
