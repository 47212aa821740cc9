//! This module provides a file system provider that keeps its whole tree in memory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::core::{FileSystemProvider, Result, utils};
use crate::error::VfsError;
use crate::{Entry, EntryType};

/// Home directory used when none is given explicitly.
pub const DEFAULT_HOME: &str = "/home/test";

/// A simulated file system that stores its hierarchy as a map from path to entry kind.
///
/// `MapFS` never touches the host: existence and type checks are plain map lookups, so it
/// is ideal for tests and for driving the panel engine without side effects.
///
/// ### Internal state
///
/// * `home`: absolute normalized path reported by `home_directory()`.
/// * `entries`: the storage map.
///   - Key: absolute normalized path.
///   - Value: [`EntryType`] of the node.
///   - Uses `BTreeMap` for deterministic iteration.
///
/// ### Invariants
///
/// 1. **Home existence**: `home` and all of its ancestors are present as `Directory`.
///    Deleting one of them removes its other children, but the home chain itself is
///    put back as empty directories.
/// 2. **Path normalization**: all keys are normalized (no `.`, no `..`, no trailing `/`).
/// 3. **Parent relation**: the children of a directory are exactly the keys whose parent,
///    by path decomposition, equals that directory.
///
/// ### Thread Safety
///
/// The map lives behind an `RwLock`, so one instance can be shared by both panes through
/// `Arc<MapFS>`. No guard is ever held across an `.await`. Every mutation leaves the map
/// consistent, so a poisoned lock is recovered instead of being reported.
///
/// ### Example
///
/// ```no_run
/// use pane_vfs::{EntryType, MapFS};
///
/// let fs = MapFS::with_entries(
///     "/home/test",
///     [
///         ("/home/test/file1.txt", EntryType::File),
///         ("/home/test/folder1", EntryType::Directory),
///     ],
/// );
/// ```
#[derive(Debug)]
pub struct MapFS {
    home: PathBuf,
    entries: RwLock<BTreeMap<PathBuf, EntryType>>,
}

impl Default for MapFS {
    fn default() -> Self {
        Self::new(DEFAULT_HOME)
    }
}

impl MapFS {
    /// Creates a tree that only contains `home` and its ancestors.
    pub fn new<P: AsRef<Path>>(home: P) -> Self {
        Self::with_entries(home, std::iter::empty::<(PathBuf, EntryType)>())
    }

    /// Creates a tree seeded with `(path, kind)` pairs.
    /// Seed paths are normalized; the home directory is always present as a directory,
    /// even if a seed tried to declare it as a file.
    pub fn with_entries<H, I, P>(home: H, seed: I) -> Self
    where
        H: AsRef<Path>,
        I: IntoIterator<Item = (P, EntryType)>,
        P: AsRef<Path>,
    {
        let home = utils::normalize(home);
        let mut entries = BTreeMap::new();

        for (path, kind) in seed {
            entries.insert(utils::normalize(path), kind);
        }
        insert_home_chain(&mut entries, &home);

        Self {
            home,
            entries: RwLock::new(entries),
        }
    }

    /// Returns the kind stored at `path`, if any.
    pub fn kind_of<P: AsRef<Path>>(&self, path: P) -> Option<EntryType> {
        let path = utils::normalize(path);
        self.read().get(&path).copied()
    }

    /// Checks if `path` exists in the tree.
    pub fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.kind_of(path).is_some()
    }

    /// Number of nodes in the tree, including home and its ancestors.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<PathBuf, EntryType>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<PathBuf, EntryType>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove_tree(&self, path: &Path) -> Result<()> {
        let target = utils::normalize(path);
        let mut entries = self.write();
        if !entries.contains_key(&target) {
            return Ok(());
        }

        // `Path::starts_with` compares whole components, so `/a/bc` never matches `/a/b`.
        let removed: Vec<PathBuf> = entries
            .keys()
            .filter(|&p| p.starts_with(&target))
            .cloned()
            .collect();

        for p in &removed {
            entries.remove(p);
        }
        if self.home.starts_with(&target) {
            insert_home_chain(&mut entries, &self.home);
        }
        debug!(path = %target.display(), removed = removed.len(), "map entries removed");
        Ok(())
    }
}

/// Inserts `home` and every ancestor of it as a directory.
fn insert_home_chain(entries: &mut BTreeMap<PathBuf, EntryType>, home: &Path) {
    let mut ancestor = home.to_path_buf();
    loop {
        entries.insert(ancestor.clone(), EntryType::Directory);
        let parent = utils::parent_of(&ancestor);
        if parent == ancestor {
            break;
        }
        ancestor = parent;
    }
}

#[async_trait]
impl FileSystemProvider for MapFS {
    /// Lists the immediate children of `path`.
    /// Children are found by parent decomposition, not by string prefix; `path` itself is
    /// never part of the result.
    async fn list_directory(&self, path: &Path) -> Result<Vec<Entry>> {
        let dir = utils::normalize(path);
        let entries = self.read();

        if entries.get(&dir) != Some(&EntryType::Directory) {
            return Err(VfsError::NotFound(dir));
        }

        let mut result: Vec<Entry> = entries
            .iter()
            .filter(|&(p, _)| p != &dir && p.parent() == Some(dir.as_path()))
            .map(|(p, kind)| Entry::from_path(p, *kind))
            .collect();

        utils::sort_entries(&mut result);
        Ok(result)
    }

    /// Copies `source` into `dest_dir` under the same name.
    /// A directory is copied as an empty marker directory; its children stay behind.
    async fn copy_file(&self, source: &Path, dest_dir: &Path) -> Result<()> {
        let src = utils::normalize(source);
        let dir = utils::normalize(dest_dir);
        let mut entries = self.write();

        let Some(kind) = entries.get(&src).copied() else {
            return Err(VfsError::NotFound(src));
        };
        if entries.get(&dir) != Some(&EntryType::Directory) {
            return Err(VfsError::NotFound(dir));
        }

        let name = utils::base_name(&src).ok_or_else(|| VfsError::NotFound(src.clone()))?;
        let dest = dir.join(name);
        if entries.contains_key(&dest) {
            return Err(VfsError::AlreadyExists(dest));
        }

        debug!(from = %src.display(), to = %dest.display(), "map copy");
        entries.insert(dest, kind);
        Ok(())
    }

    /// Removes `path` with everything beneath it. A missing path is not an error.
    async fn delete_entry(&self, path: &Path) -> Result<()> {
        self.remove_tree(path)
    }

    /// The simulated tree has no trash; trashing is permanent deletion.
    async fn trash_entry(&self, path: &Path) -> Result<()> {
        self.remove_tree(path)
    }

    /// Creates a single directory. The parent must already exist as a directory.
    async fn create_directory(&self, path: &Path) -> Result<()> {
        let target = utils::normalize(path);
        let mut entries = self.write();

        if entries.contains_key(&target) {
            return Err(VfsError::AlreadyExists(target));
        }
        let parent = utils::parent_of(&target);
        if entries.get(&parent) != Some(&EntryType::Directory) {
            return Err(VfsError::NotFound(parent));
        }

        debug!(path = %target.display(), "map mkdir");
        entries.insert(target, EntryType::Directory);
        Ok(())
    }

    fn home_directory(&self) -> PathBuf {
        self.home.clone()
    }
}
