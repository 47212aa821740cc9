//! Per-pane state and the engines that mutate it.
//!
//! The logic is split by concern, each file adding an `impl PanelState` block:
//!
//! - `navigation`: loading directories, ascending, focus restoration and cursor movement;
//! - `selection`: tagging entries and resolving the operands of a batch command;
//! - `search`: typeahead matching and its expiry deadline.

mod navigation;
mod search;
mod selection;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::core::utils;
use crate::Entry;

pub use search::SearchDeadline;

/// Whether a directory listing is outstanding for a panel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
}

/// State of one pane of the commander.
///
/// ### Invariants
///
/// 1. `entries` is never empty: index 0 always holds the synthetic `..` entry.
/// 2. `focused_index < entries.len()`.
/// 3. Every index in `selected_indices` is inside `entries`.
/// 4. `search_buffer` is empty exactly when `search_deadline` is disarmed.
#[derive(Debug)]
pub struct PanelState {
    current_path: PathBuf,
    entries: Vec<Entry>,
    focused_index: usize,
    selected_indices: BTreeSet<usize>,
    search_buffer: String,
    search_deadline: SearchDeadline,
    load_state: LoadState,
    page_size: usize,
}

impl PanelState {
    /// Creates a panel positioned at `path` that has not been loaded yet;
    /// its listing holds only the `..` entry until the first `enter_directory()`.
    pub fn new<P: AsRef<Path>>(path: P, config: &Config) -> Self {
        let current_path = utils::normalize(path);
        let entries = vec![Entry::parent_link(utils::parent_of(&current_path))];
        Self {
            current_path,
            entries,
            focused_index: 0,
            selected_indices: BTreeSet::new(),
            search_buffer: String::new(),
            search_deadline: SearchDeadline::new(config.search_timeout()),
            load_state: LoadState::Idle,
            page_size: config.page_size.max(1),
        }
    }

    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    /// The listing including the leading `..` entry.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn focused_index(&self) -> usize {
        self.focused_index
    }

    pub fn focused_entry(&self) -> &Entry {
        &self.entries[self.focused_index]
    }

    pub fn selected_indices(&self) -> &BTreeSet<usize> {
        &self.selected_indices
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected_indices.contains(&index)
    }

    pub fn search_buffer(&self) -> &str {
        &self.search_buffer
    }

    pub fn is_searching(&self) -> bool {
        !self.search_buffer.is_empty()
    }

    pub fn search_deadline(&self) -> &SearchDeadline {
        &self.search_deadline
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn last_index(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }
}
