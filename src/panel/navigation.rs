use std::path::Path;

use tracing::{debug, warn};

use super::{LoadState, PanelState};
use crate::core::{FileSystemProvider, Result, utils};
use crate::Entry;

impl PanelState {
    /// Loads `target` into the panel.
    ///
    /// On success the listing is replaced wholesale (with a fresh `..` entry in front),
    /// the selection is cleared, any search is cancelled and `current_path` becomes
    /// `target`. When `target` is the parent of the previous directory, focus lands on
    /// the entry named after the directory we came from; otherwise it resets to 0.
    ///
    /// On failure the panel is left exactly as it was and the error is returned.
    pub async fn enter_directory(
        &mut self,
        provider: &dyn FileSystemProvider,
        target: &Path,
    ) -> Result<()> {
        let target = utils::normalize(target);

        self.load_state = LoadState::Loading;
        let listing = provider.list_directory(&target).await;
        self.load_state = LoadState::Idle;

        let children = match listing {
            Ok(children) => children,
            Err(e) => {
                warn!(path = %target.display(), error = %e, "directory load failed");
                return Err(e);
            }
        };

        let ascending = utils::parent_of(&self.current_path) == target;
        let exited = utils::base_name(&self.current_path);

        let mut entries = Vec::with_capacity(children.len() + 1);
        entries.push(Entry::parent_link(utils::parent_of(&target)));
        entries.extend(children);

        let focused_index = match exited {
            Some(name) if ascending => entries
                .iter()
                .position(|e| !e.is_parent_link() && e.name() == name)
                .unwrap_or(0),
            _ => 0,
        };

        debug!(
            path = %target.display(),
            count = entries.len() - 1,
            focused_index,
            "directory loaded"
        );

        self.entries = entries;
        self.focused_index = focused_index;
        self.selected_indices.clear();
        self.cancel_search();
        self.current_path = target;
        Ok(())
    }

    /// Re-reads the current directory.
    pub async fn reload(&mut self, provider: &dyn FileSystemProvider) -> Result<()> {
        let path = self.current_path.clone();
        self.enter_directory(provider, &path).await
    }

    /// Goes to the parent directory. Returns `false` (without a provider call) at a root.
    pub async fn ascend(&mut self, provider: &dyn FileSystemProvider) -> Result<bool> {
        let parent = utils::parent_of(&self.current_path);
        if parent == self.current_path {
            return Ok(false);
        }
        self.enter_directory(provider, &parent).await?;
        Ok(true)
    }

    /// Enters the focused entry if it is a directory (`..` included).
    /// Returns `false` when the focused entry is a file.
    pub async fn enter_focused(&mut self, provider: &dyn FileSystemProvider) -> Result<bool> {
        self.cancel_search();
        let entry = self.focused_entry().clone();
        if !entry.is_dir() {
            return Ok(false);
        }
        self.enter_directory(provider, entry.path()).await?;
        Ok(true)
    }

    /// Focuses the first non-`..` entry called `name`. Returns `false` if there is none.
    pub fn focus_name(&mut self, name: &str) -> bool {
        match self
            .entries
            .iter()
            .position(|e| !e.is_parent_link() && e.name() == name)
        {
            Some(index) => {
                self.focused_index = index;
                true
            }
            None => false,
        }
    }

    pub fn move_down(&mut self) {
        self.cancel_search();
        if self.focused_index < self.last_index() {
            self.focused_index += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.cancel_search();
        self.focused_index = self.focused_index.saturating_sub(1);
    }

    pub fn move_home(&mut self) {
        self.cancel_search();
        self.focused_index = 0;
    }

    pub fn move_end(&mut self) {
        self.cancel_search();
        self.focused_index = self.last_index();
    }

    /// Moves the cursor by `delta` rows, clamped to the listing.
    pub fn move_page(&mut self, delta: isize) {
        self.cancel_search();
        self.focused_index = self
            .focused_index
            .saturating_add_signed(delta)
            .min(self.last_index());
    }

    pub fn page_down(&mut self) {
        self.move_page(self.page_size as isize);
    }

    pub fn page_up(&mut self) {
        self.move_page(-(self.page_size as isize));
    }

    /// Focuses `index`, clamped to the listing.
    pub(crate) fn set_focus(&mut self, index: usize) {
        self.focused_index = index.min(self.last_index());
    }
}
