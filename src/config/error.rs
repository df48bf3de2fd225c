//! Errors raised while reading, parsing or writing `config.toml`.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure of a configuration file operation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("cannot read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid TOML or does not match the schema.
    ///
    /// `line` and `column` are one-based, or 0 when toml reports no span.
    #[error("{path}:{line}:{column}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// `config init` without `--force` found a file in place.
    #[error("{path} already exists (use --force to replace it)")]
    Exists { path: PathBuf },

    /// Writing the file, its directory or its backup failed.
    #[error("cannot write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    pub(crate) fn read(path: &Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn write(path: &Path, source: io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Path of the file the error is about.
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. }
            | Self::Parse { path, .. }
            | Self::Exists { path }
            | Self::Write { path, .. } => path,
        }
    }
}
