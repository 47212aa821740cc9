//! Error types shared by the providers, the panel engine and the config loader.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure of a single provider operation.
///
/// The enum is `Clone` so that batch reports can keep per-entry failures around after
/// the batch finished.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VfsError {
    /// Missing source, destination directory or target.
    #[error("no such file or directory: '{}'", .0.display())]
    NotFound(PathBuf),

    /// Name collision on copy or create.
    #[error("file already exists: '{}'", .0.display())]
    AlreadyExists(PathBuf),

    /// The backend is not configured for the requested operation.
    #[error("operation not supported: {0}")]
    Unsupported(String),

    /// Opaque I/O failure, e.g. permission denied.
    #[error("{0}")]
    Other(String),
}

impl VfsError {
    /// Maps a host I/O error onto the taxonomy, attaching `path`.
    pub fn from_io<P: AsRef<Path>>(err: io::Error, path: P) -> Self {
        let path = path.as_ref();
        match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => {
                VfsError::NotFound(path.to_path_buf())
            }
            io::ErrorKind::AlreadyExists => VfsError::AlreadyExists(path.to_path_buf()),
            io::ErrorKind::Unsupported => VfsError::Unsupported(format!("{}: {err}", path.display())),
            _ => VfsError::Other(format!("{}: {err}", path.display())),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, VfsError::NotFound(_))
    }
}

/// Failure while loading [`crate::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {field} - {message}")]
    Invalid { field: String, message: String },
}
