use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::VfsError;
use crate::Entry;

/// The file system capability a pane executes its commands against.
///
/// Both backends honour the same contract, so the panel engine behaves identically
/// regardless of which one is plugged in:
///
/// * `list_directory()` returns the immediate children of a directory, sorted with all
///   directories first and names ascending inside each group (see [`utils::compare_names`]).
///   The synthetic `..` entry is never produced here.
/// * `copy_file()` never overwrites: a same-named entry in the destination is an
///   `AlreadyExists` error. Directories are copied as empty marker directories only.
/// * `delete_entry()` is recursive and treats a missing target as success.
/// * `trash_entry()` moves the entry to a recoverable location (backend specific).
/// * `create_directory()` fails if anything already lives at `path`.
/// * `home_directory()` is pure and never touches the backing store.
///
/// All paths handed out by a provider are absolute and normalized.
#[async_trait]
pub trait FileSystemProvider: Send + Sync {
    async fn list_directory(&self, path: &Path) -> Result<Vec<Entry>>;
    async fn copy_file(&self, source: &Path, dest_dir: &Path) -> Result<()>;
    async fn delete_entry(&self, path: &Path) -> Result<()>;
    async fn trash_entry(&self, path: &Path) -> Result<()>;
    async fn create_directory(&self, path: &Path) -> Result<()>;
    fn home_directory(&self) -> PathBuf;
}

pub type Result<T> = std::result::Result<T, VfsError>;

pub mod utils {
    use std::cmp::Ordering;
    use std::path::{Component, Path, PathBuf};

    use crate::Entry;

    /// Lexically normalizes `path`: drops `.`, resolves `..` against the already built
    /// prefix and removes trailing separators. `..` never climbs above the root.
    pub fn normalize<P: AsRef<Path>>(path: P) -> PathBuf {
        let mut result = PathBuf::new();
        for component in path.as_ref().components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if let Some(parent) = result.parent() {
                        result = parent.to_path_buf();
                    }
                }
                _ => result.push(component),
            }
        }
        result
    }

    /// Parent of `path` by path decomposition. A root is its own parent, which makes
    /// repeated ascent a no-op.
    pub fn parent_of<P: AsRef<Path>>(path: P) -> PathBuf {
        let path = normalize(path);
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => path,
        }
    }

    /// Last component of `path` as an owned string, if it has one.
    pub fn base_name<P: AsRef<Path>>(path: P) -> Option<String> {
        path.as_ref()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }

    pub fn is_root<P: AsRef<Path>>(path: P) -> bool {
        let path = normalize(path);
        path.parent().is_none() && path.has_root()
    }

    /// Locale-style name ordering: case-insensitive first, then lowercase before uppercase.
    pub fn compare_names(a: &str, b: &str) -> Ordering {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| b.cmp(a))
    }

    /// Sorts a listing: directories first, then files, each group by [`compare_names`].
    pub fn sort_entries(entries: &mut [Entry]) {
        entries.sort_by(|a, b| {
            b.is_dir()
                .cmp(&a.is_dir())
                .then_with(|| compare_names(a.name(), b.name()))
        });
    }
}
