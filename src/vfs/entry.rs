use std::path::{Path, PathBuf};

use crate::core::utils;

/// Name of the synthetic entry that leads to the parent directory.
pub const PARENT_LINK: &str = "..";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EntryType {
    File,
    Directory,
}

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: String,
    entry_type: EntryType,
    path: PathBuf,
}

impl Entry {
    pub fn new<P: AsRef<Path>>(name: impl Into<String>, entry_type: EntryType, path: P) -> Entry {
        Entry {
            name: name.into(),
            entry_type,
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Builds an entry from its full path; the name is the last path component.
    pub fn from_path<P: AsRef<Path>>(path: P, entry_type: EntryType) -> Entry {
        let path = utils::normalize(path);
        let name = utils::base_name(&path).unwrap_or_default();
        Entry::new(name, entry_type, path)
    }

    pub fn file<P: AsRef<Path>>(path: P) -> Entry {
        Entry::from_path(path, EntryType::File)
    }

    pub fn directory<P: AsRef<Path>>(path: P) -> Entry {
        Entry::from_path(path, EntryType::Directory)
    }

    /// The `..` entry pointing at `parent`.
    pub fn parent_link<P: AsRef<Path>>(parent: P) -> Entry {
        Entry::new(PARENT_LINK, EntryType::Directory, parent)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }

    pub fn is_parent_link(&self) -> bool {
        self.name == PARENT_LINK
    }
}
