use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::config::Config;
use crate::core::{FileSystemProvider, Result};
use crate::ops::{self, BatchOutcome, Interaction};
use crate::panel::PanelState;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Left,
    Right,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A presentation-level command, already decoded from whatever input produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveUp,
    MoveDown,
    MoveHome,
    MoveEnd,
    PageUp,
    PageDown,
    /// Enter: open the focused directory.
    Open,
    /// Ctrl+Left / Ctrl+Right: open the focused directory in the passive pane.
    OpenInOther,
    /// Backspace: shorten the search, or go to the parent when not searching.
    Back,
    /// Escape: drop the search buffer.
    CancelSearch,
    /// Tab.
    SwitchPane,
    TypeChar(char),
    /// Insert: tag the focused row and advance.
    ToggleFocused,
    Click { index: usize, modifier: bool },
    Reload,
    /// F5: copy the operands of the active pane into the passive one.
    Copy,
    /// F8 (trash) or Shift+Delete (permanent).
    Delete { permanent: bool },
    /// F7.
    MakeDirectory,
}

/// What a dispatched command did, for the presentation layer to report.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Done,
    Batch(BatchOutcome),
    Created(Option<PathBuf>),
}

/// Two panels sharing one provider, with one of them active.
pub struct Commander {
    provider: Arc<dyn FileSystemProvider>,
    config: Config,
    left: PanelState,
    right: PanelState,
    active: Side,
}

impl Commander {
    /// Creates both panels at the provider's home directory and loads them.
    pub async fn open(provider: Arc<dyn FileSystemProvider>, config: Config) -> Result<Self> {
        let home = provider.home_directory();
        let mut left = PanelState::new(&home, &config);
        let mut right = PanelState::new(&home, &config);
        left.enter_directory(provider.as_ref(), &home).await?;
        right.enter_directory(provider.as_ref(), &home).await?;

        Ok(Self {
            provider,
            config,
            left,
            right,
            active: Side::Left,
        })
    }

    pub fn provider(&self) -> &Arc<dyn FileSystemProvider> {
        &self.provider
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn active_side(&self) -> Side {
        self.active
    }

    pub fn panel(&self, side: Side) -> &PanelState {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn panel_mut(&mut self, side: Side) -> &mut PanelState {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn active_panel(&self) -> &PanelState {
        self.panel(self.active)
    }

    pub fn active_panel_mut(&mut self) -> &mut PanelState {
        self.panel_mut(self.active)
    }

    pub fn passive_panel(&self) -> &PanelState {
        self.panel(self.active.other())
    }

    /// Active and passive panel, borrowed at once.
    fn split_mut(&mut self) -> (&mut PanelState, &mut PanelState) {
        match self.active {
            Side::Left => (&mut self.left, &mut self.right),
            Side::Right => (&mut self.right, &mut self.left),
        }
    }

    pub fn switch_pane(&mut self) {
        self.active_panel_mut().cancel_search();
        self.active = self.active.other();
        debug!(active = ?self.active, "pane switched");
    }

    pub fn move_up(&mut self) {
        self.active_panel_mut().move_up();
    }

    pub fn move_down(&mut self) {
        self.active_panel_mut().move_down();
    }

    pub fn move_home(&mut self) {
        self.active_panel_mut().move_home();
    }

    pub fn move_end(&mut self) {
        self.active_panel_mut().move_end();
    }

    pub fn page_up(&mut self) {
        self.active_panel_mut().page_up();
    }

    pub fn page_down(&mut self) {
        self.active_panel_mut().page_down();
    }

    pub async fn enter_focused(&mut self) -> Result<bool> {
        let provider = Arc::clone(&self.provider);
        self.active_panel_mut().enter_focused(provider.as_ref()).await
    }

    /// Loads the active panel's focused directory (`..` included) into the passive panel.
    /// The active panel only loses its search; returns `false` when a file is focused.
    pub async fn open_in_other(&mut self) -> Result<bool> {
        let provider = Arc::clone(&self.provider);
        let (source, dest) = self.split_mut();
        source.cancel_search();
        let entry = source.focused_entry().clone();
        if !entry.is_dir() {
            return Ok(false);
        }
        dest.enter_directory(provider.as_ref(), entry.path()).await?;
        Ok(true)
    }

    pub async fn ascend(&mut self) -> Result<bool> {
        let provider = Arc::clone(&self.provider);
        self.active_panel_mut().ascend(provider.as_ref()).await
    }

    pub async fn reload(&mut self) -> Result<()> {
        let provider = Arc::clone(&self.provider);
        self.active_panel_mut().reload(provider.as_ref()).await
    }

    pub fn click(&mut self, index: usize, modifier: bool) {
        self.active_panel_mut().click(index, modifier);
    }

    pub fn toggle_focused(&mut self) {
        self.active_panel_mut().toggle_focused_and_advance();
    }

    pub fn type_char(&mut self, c: char) -> bool {
        self.active_panel_mut().type_char(c)
    }

    /// Shortens the search buffer, or ascends when there is no search in progress.
    pub async fn backspace(&mut self) -> Result<()> {
        if !self.active_panel_mut().backspace() {
            self.ascend().await?;
        }
        Ok(())
    }

    pub fn cancel_search(&mut self) {
        self.active_panel_mut().cancel_search();
    }

    /// Drops search buffers whose deadline has passed, on both panels.
    pub fn expire_searches(&mut self) {
        self.left.expire_search_if_due();
        self.right.expire_search_if_due();
    }

    /// Resolves when the earlier of the two search deadlines passes, naming its panel.
    /// Pending forever while neither panel is searching.
    pub async fn search_expired(&self) -> Side {
        tokio::select! {
            _ = self.left.search_deadline().expired() => Side::Left,
            _ = self.right.search_deadline().expired() => Side::Right,
        }
    }

    pub async fn copy_to_other(&mut self, interaction: &dyn Interaction) -> BatchOutcome {
        let provider = Arc::clone(&self.provider);
        let (source, dest) = self.split_mut();
        let operands = source.resolve_operands();
        ops::copy_batch(provider.as_ref(), &operands, dest, interaction).await
    }

    pub async fn delete(&mut self, permanent: bool, interaction: &dyn Interaction) -> BatchOutcome {
        let provider = Arc::clone(&self.provider);
        let source = self.active_panel_mut();
        let operands = source.resolve_operands();
        ops::delete_batch(provider.as_ref(), &operands, permanent, source, interaction).await
    }

    pub async fn make_directory(&mut self, interaction: &dyn Interaction) -> Result<Option<PathBuf>> {
        let provider = Arc::clone(&self.provider);
        let panel = self.active_panel_mut();
        ops::create_directory_interactive(provider.as_ref(), panel, interaction).await
    }

    /// Runs `command` against the active panel.
    pub async fn dispatch(
        &mut self,
        command: Command,
        interaction: &dyn Interaction,
    ) -> Result<Outcome> {
        debug!(?command, active = ?self.active, "dispatch");
        match command {
            Command::MoveUp => self.move_up(),
            Command::MoveDown => self.move_down(),
            Command::MoveHome => self.move_home(),
            Command::MoveEnd => self.move_end(),
            Command::PageUp => self.page_up(),
            Command::PageDown => self.page_down(),
            Command::Open => {
                self.enter_focused().await?;
            }
            Command::OpenInOther => {
                self.open_in_other().await?;
            }
            Command::Back => self.backspace().await?,
            Command::CancelSearch => self.cancel_search(),
            Command::SwitchPane => self.switch_pane(),
            Command::TypeChar(c) => {
                self.type_char(c);
            }
            Command::ToggleFocused => self.toggle_focused(),
            Command::Click { index, modifier } => self.click(index, modifier),
            Command::Reload => self.reload().await?,
            Command::Copy => return Ok(Outcome::Batch(self.copy_to_other(interaction).await)),
            Command::Delete { permanent } => {
                return Ok(Outcome::Batch(self.delete(permanent, interaction).await));
            }
            Command::MakeDirectory => {
                return Ok(Outcome::Created(self.make_directory(interaction).await?));
            }
        }
        Ok(Outcome::Done)
    }
}
