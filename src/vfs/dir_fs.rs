//! This module provides a file system provider that delegates to the host file system.
//!
//! ### Key Features:
//! - **No silent overwrite**: a copy is staged in a hidden sibling and hard-linked into
//!   place, which fails instead of replacing an existing entry.
//! - **Lenient delete**: removing a missing path succeeds, matching `MapFS`.
//! - **Injectable trash**: moving to trash is delegated to a caller supplied async
//!   callback; without one the operation is `Unsupported`.

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::core::{FileSystemProvider, Result, utils};
use crate::error::VfsError;
use crate::{Entry, EntryType};

/// Async callback that moves a path to the platform trash.
pub type TrashHandler = Arc<dyn Fn(PathBuf) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// A provider backed by real directories on the host.
///
/// ### Usage notes:
/// - Symlinks are not followed when classifying entries.
/// - Permissions are not adjusted; failures surface as [`VfsError::Other`].
///
/// ### Example:
/// ```no_run
/// use pane_vfs::DirFS;
///
/// let fs = DirFS::new().with_trash_handler(|path| async move {
///     println!("trashing {}", path.display());
///     Ok(())
/// });
/// ```
#[derive(Clone)]
pub struct DirFS {
    home: PathBuf,
    trash: Option<TrashHandler>,
}

impl fmt::Debug for DirFS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirFS")
            .field("home", &self.home)
            .field("trash", &self.trash.as_ref().map(|_| "<handler>"))
            .finish()
    }
}

impl Default for DirFS {
    fn default() -> Self {
        Self::new()
    }
}

impl DirFS {
    /// Creates a provider whose home is the current user's home directory
    /// (falls back to `/` when it cannot be determined).
    pub fn new() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
        Self::with_home(home)
    }

    /// Creates a provider with an explicit home directory.
    pub fn with_home<P: AsRef<Path>>(home: P) -> Self {
        Self {
            home: utils::normalize(home),
            trash: None,
        }
    }

    /// Installs the callback used by `trash_entry()`.
    pub fn with_trash_handler<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(PathBuf) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.trash = Some(Arc::new(move |path| handler(path).boxed()));
        self
    }

    pub fn has_trash_handler(&self) -> bool {
        self.trash.is_some()
    }

    async fn require_dir(path: &Path) -> Result<()> {
        match fs::metadata(path).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(VfsError::NotFound(path.to_path_buf())),
            Err(e) => Err(VfsError::from_io(e, path)),
        }
    }

    /// Copies the bytes of `src` into `dest`, which must not exist yet.
    ///
    /// The bytes go to a hidden staging sibling first, which is then hard-linked to `dest`,
    /// so `dest` only ever appears complete and an entry created meanwhile is never
    /// overwritten. The staging file is removed in every case.
    async fn copy_bytes(src: &Path, dest: &Path) -> Result<()> {
        if fs::symlink_metadata(dest).await.is_ok() {
            return Err(VfsError::AlreadyExists(dest.to_path_buf()));
        }

        let staging = staging_path(dest);
        let mut reader = fs::File::open(src)
            .await
            .map_err(|e| VfsError::from_io(e, src))?;
        let mut writer = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&staging)
            .await
            .map_err(|e| VfsError::from_io(e, &staging))?;

        let written = async {
            tokio::io::copy(&mut reader, &mut writer).await?;
            writer.flush().await?;
            writer.sync_all().await
        }
        .await;
        drop(writer);

        let published = match written {
            Ok(()) => fs::hard_link(&staging, dest)
                .await
                .map_err(|e| VfsError::from_io(e, dest)),
            Err(e) => Err(VfsError::from_io(e, dest)),
        };

        if let Err(cleanup) = fs::remove_file(&staging).await {
            warn!(path = %staging.display(), error = %cleanup, "failed to remove staging file");
        }
        published
    }
}

/// `.<name>.<pid>.part` next to `dest`.
fn staging_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".{name}.{}.part", std::process::id()))
}

#[async_trait]
impl FileSystemProvider for DirFS {
    async fn list_directory(&self, path: &Path) -> Result<Vec<Entry>> {
        let dir = utils::normalize(path);
        Self::require_dir(&dir).await?;

        let mut reader = fs::read_dir(&dir)
            .await
            .map_err(|e| VfsError::from_io(e, &dir))?;

        let mut result = Vec::new();
        while let Some(child) = reader
            .next_entry()
            .await
            .map_err(|e| VfsError::from_io(e, &dir))?
        {
            let file_type = child
                .file_type()
                .await
                .map_err(|e| VfsError::from_io(e, child.path()))?;
            let kind = if file_type.is_dir() {
                EntryType::Directory
            } else {
                EntryType::File
            };
            let name = child.file_name().to_string_lossy().into_owned();
            let path = dir.join(&name);
            result.push(Entry::new(name, kind, path));
        }

        utils::sort_entries(&mut result);
        debug!(path = %dir.display(), count = result.len(), "host listing");
        Ok(result)
    }

    /// Copies `source` into `dest_dir`. Never overwrites an existing entry.
    /// A directory source produces an empty directory of the same name.
    async fn copy_file(&self, source: &Path, dest_dir: &Path) -> Result<()> {
        let src = utils::normalize(source);
        let dir = utils::normalize(dest_dir);

        let src_meta = fs::symlink_metadata(&src)
            .await
            .map_err(|e| VfsError::from_io(e, &src))?;
        Self::require_dir(&dir).await?;

        let name = utils::base_name(&src).ok_or_else(|| VfsError::NotFound(src.clone()))?;
        let dest = dir.join(name);

        debug!(from = %src.display(), to = %dest.display(), "host copy");
        if src_meta.is_dir() {
            fs::create_dir(&dest)
                .await
                .map_err(|e| VfsError::from_io(e, &dest))
        } else {
            Self::copy_bytes(&src, &dest).await
        }
    }

    /// Removes `path` recursively. A missing path is not an error.
    async fn delete_entry(&self, path: &Path) -> Result<()> {
        let target = utils::normalize(path);
        let meta = match fs::symlink_metadata(&target).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(VfsError::from_io(e, &target)),
        };

        let removed = if meta.is_dir() {
            fs::remove_dir_all(&target).await
        } else {
            fs::remove_file(&target).await
        };

        match removed {
            Ok(()) => {
                debug!(path = %target.display(), "host delete");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(VfsError::from_io(e, &target)),
        }
    }

    async fn trash_entry(&self, path: &Path) -> Result<()> {
        let target = utils::normalize(path);
        let Some(handler) = self.trash.as_ref() else {
            return Err(VfsError::Unsupported(format!(
                "no trash handler configured for '{}'",
                target.display()
            )));
        };

        debug!(path = %target.display(), "host trash");
        handler(target.clone())
            .await
            .map_err(|e| VfsError::Other(format!("{}: {e:#}", target.display())))
    }

    async fn create_directory(&self, path: &Path) -> Result<()> {
        let target = utils::normalize(path);
        if fs::symlink_metadata(&target).await.is_ok() {
            return Err(VfsError::AlreadyExists(target));
        }
        fs::create_dir(&target)
            .await
            .map_err(|e| VfsError::from_io(e, &target))?;
        debug!(path = %target.display(), "host mkdir");
        Ok(())
    }

    fn home_directory(&self) -> PathBuf {
        self.home.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use tempdir::TempDir;

    /// Temp dir holding `file1.txt` and an empty `folder1`.
    fn setup_test_env() -> TempDir {
        let temp_dir = TempDir::new("dirfs_test").unwrap();
        std::fs::write(temp_dir.path().join("file1.txt"), b"content").unwrap();
        std::fs::create_dir(temp_dir.path().join("folder1")).unwrap();
        temp_dir
    }

    fn names(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.name()).collect()
    }

    mod creations {
        use super::*;

        #[test]
        fn test_with_home_is_normalized() {
            let fs = DirFS::with_home("/home/user/./docs/..");
            assert_eq!(fs.home_directory(), PathBuf::from("/home/user"));
            assert!(!fs.has_trash_handler());
        }

        #[test]
        fn test_new_has_absolute_home() {
            let fs = DirFS::new();
            assert!(fs.home_directory().is_absolute());
        }
    }

    mod list_directory {
        use super::*;

        #[tokio::test]
        async fn test_list_sorted() -> Result<()> {
            let temp_dir = setup_test_env();
            let fs = DirFS::with_home(temp_dir.path());

            let entries = fs.list_directory(temp_dir.path()).await?;
            assert_eq!(names(&entries), ["folder1", "file1.txt"]);
            assert!(entries[0].is_dir());
            assert!(entries[1].is_file());
            assert_eq!(entries[1].path(), temp_dir.path().join("file1.txt"));
            Ok(())
        }

        #[tokio::test]
        async fn test_list_missing_directory() {
            let temp_dir = setup_test_env();
            let fs = DirFS::with_home(temp_dir.path());

            let missing = temp_dir.path().join("missing");
            let result = fs.list_directory(&missing).await;
            assert_eq!(result, Err(VfsError::NotFound(missing)));
        }

        #[tokio::test]
        async fn test_list_file_is_not_found() {
            let temp_dir = setup_test_env();
            let fs = DirFS::with_home(temp_dir.path());

            let result = fs.list_directory(&temp_dir.path().join("file1.txt")).await;
            assert!(matches!(result, Err(VfsError::NotFound(_))));
        }
    }

    mod copy_file {
        use super::*;

        #[tokio::test]
        async fn test_copy_file() -> Result<()> {
            let temp_dir = setup_test_env();
            let fs = DirFS::with_home(temp_dir.path());
            let dest = temp_dir.path().join("folder1");

            fs.copy_file(&temp_dir.path().join("file1.txt"), &dest).await?;

            let entries = fs.list_directory(&dest).await?;
            assert_eq!(names(&entries), ["file1.txt"]);
            assert_eq!(std::fs::read(dest.join("file1.txt")).unwrap(), b"content");
            Ok(())
        }

        #[tokio::test]
        async fn test_copy_never_overwrites() -> Result<()> {
            let temp_dir = setup_test_env();
            let fs = DirFS::with_home(temp_dir.path());
            let dest = temp_dir.path().join("folder1");
            std::fs::write(dest.join("file1.txt"), b"original").unwrap();

            let result = fs.copy_file(&temp_dir.path().join("file1.txt"), &dest).await;
            assert_eq!(result, Err(VfsError::AlreadyExists(dest.join("file1.txt"))));
            assert_eq!(std::fs::read(dest.join("file1.txt")).unwrap(), b"original");
            Ok(())
        }

        #[tokio::test]
        async fn test_copy_leaves_no_staging_file() -> Result<()> {
            let temp_dir = setup_test_env();
            let fs = DirFS::with_home(temp_dir.path());
            let dest = temp_dir.path().join("folder1");
            std::fs::write(dest.join("file1.txt"), b"original").unwrap();

            let clash = fs.copy_file(&temp_dir.path().join("file1.txt"), &dest).await;
            assert!(matches!(clash, Err(VfsError::AlreadyExists(_))));
            std::fs::remove_file(dest.join("file1.txt")).unwrap();
            fs.copy_file(&temp_dir.path().join("file1.txt"), &dest).await?;

            let on_disk: Vec<String> = std::fs::read_dir(&dest)
                .unwrap()
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect();
            assert_eq!(on_disk, ["file1.txt"]);
            assert_eq!(std::fs::read(dest.join("file1.txt")).unwrap(), b"content");
            Ok(())
        }

        #[test]
        fn test_staging_path_is_hidden_sibling() {
            let staging = staging_path(Path::new("/tmp/out/report.txt"));
            assert_eq!(staging.parent(), Some(Path::new("/tmp/out")));
            let name = staging.file_name().unwrap().to_str().unwrap();
            assert!(name.starts_with(".report.txt."));
            assert!(name.ends_with(".part"));
        }

        #[tokio::test]
        async fn test_copy_missing_source() {
            let temp_dir = setup_test_env();
            let fs = DirFS::with_home(temp_dir.path());

            let result = fs
                .copy_file(&temp_dir.path().join("ghost.txt"), temp_dir.path())
                .await;
            assert!(matches!(result, Err(VfsError::NotFound(_))));
        }

        #[tokio::test]
        async fn test_copy_missing_destination() {
            let temp_dir = setup_test_env();
            let fs = DirFS::with_home(temp_dir.path());

            let missing = temp_dir.path().join("nowhere");
            let result = fs
                .copy_file(&temp_dir.path().join("file1.txt"), &missing)
                .await;
            assert_eq!(result, Err(VfsError::NotFound(missing)));
        }

        #[tokio::test]
        async fn test_copy_directory_is_marker_only() -> Result<()> {
            let temp_dir = setup_test_env();
            let fs = DirFS::with_home(temp_dir.path());
            std::fs::write(temp_dir.path().join("folder1").join("inner.txt"), b"x").unwrap();
            let dest = temp_dir.path().join("dest");
            std::fs::create_dir(&dest).unwrap();

            fs.copy_file(&temp_dir.path().join("folder1"), &dest).await?;

            assert!(dest.join("folder1").is_dir());
            assert!(!dest.join("folder1").join("inner.txt").exists());
            Ok(())
        }
    }

    mod delete_entry {
        use super::*;

        #[tokio::test]
        async fn test_delete_file_permanently() -> Result<()> {
            let temp_dir = setup_test_env();
            let fs = DirFS::with_home(temp_dir.path());
            let file = temp_dir.path().join("file1.txt");

            fs.delete_entry(&file).await?;
            assert!(!file.exists());
            Ok(())
        }

        #[tokio::test]
        async fn test_delete_directory_recursive() -> Result<()> {
            let temp_dir = setup_test_env();
            let fs = DirFS::with_home(temp_dir.path());
            let folder = temp_dir.path().join("folder1");
            std::fs::create_dir_all(folder.join("a/b")).unwrap();
            std::fs::write(folder.join("a/b/c.txt"), b"c").unwrap();

            fs.delete_entry(&folder).await?;
            assert!(!folder.exists());
            assert!(temp_dir.path().join("file1.txt").exists());
            Ok(())
        }

        #[tokio::test]
        async fn test_delete_missing_is_noop() -> Result<()> {
            let temp_dir = setup_test_env();
            let fs = DirFS::with_home(temp_dir.path());
            fs.delete_entry(&temp_dir.path().join("ghost")).await
        }
    }

    mod trash_entry {
        use super::*;

        #[tokio::test]
        async fn test_trash_calls_handler() -> Result<()> {
            let temp_dir = setup_test_env();
            let seen: Arc<Mutex<Vec<PathBuf>>> = Arc::new(Mutex::new(Vec::new()));
            let recorder = Arc::clone(&seen);
            let fs = DirFS::with_home(temp_dir.path()).with_trash_handler(move |path| {
                let recorder = Arc::clone(&recorder);
                async move {
                    recorder.lock().unwrap().push(path);
                    Ok(())
                }
            });

            let file = temp_dir.path().join("file1.txt");
            fs.trash_entry(&file).await?;

            assert_eq!(*seen.lock().unwrap(), vec![file.clone()]);
            // the handler owns the move; the provider itself leaves the file alone
            assert!(file.exists());
            Ok(())
        }

        #[tokio::test]
        async fn test_trash_without_handler_unsupported() {
            let temp_dir = setup_test_env();
            let fs = DirFS::with_home(temp_dir.path());

            let result = fs.trash_entry(&temp_dir.path().join("file1.txt")).await;
            assert!(matches!(result, Err(VfsError::Unsupported(_))));
        }

        #[tokio::test]
        async fn test_trash_handler_error_is_other() {
            let temp_dir = setup_test_env();
            let fs = DirFS::with_home(temp_dir.path())
                .with_trash_handler(|_| async { Err(anyhow::anyhow!("trash is full")) });

            let result = fs.trash_entry(&temp_dir.path().join("file1.txt")).await;
            assert!(matches!(result, Err(VfsError::Other(msg)) if msg.contains("trash is full")));
        }
    }

    mod create_directory {
        use super::*;

        #[tokio::test]
        async fn test_create_directory() -> Result<()> {
            let temp_dir = setup_test_env();
            let fs = DirFS::with_home(temp_dir.path());
            let new_dir = temp_dir.path().join("newFolder");

            fs.create_directory(&new_dir).await?;
            assert!(new_dir.is_dir());
            Ok(())
        }

        #[tokio::test]
        async fn test_create_existing_fails() {
            let temp_dir = setup_test_env();
            let fs = DirFS::with_home(temp_dir.path());

            for name in ["folder1", "file1.txt"] {
                let result = fs.create_directory(&temp_dir.path().join(name)).await;
                assert!(matches!(result, Err(VfsError::AlreadyExists(_))), "{name}");
            }
        }

        #[tokio::test]
        async fn test_create_without_parent_fails() {
            let temp_dir = setup_test_env();
            let fs = DirFS::with_home(temp_dir.path());

            let result = fs
                .create_directory(&temp_dir.path().join("missing").join("child"))
                .await;
            assert!(matches!(result, Err(VfsError::NotFound(_))));
        }
    }
}
