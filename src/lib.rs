//! File system providers and a dual-pane panel engine for a file commander.
//!
//! ### Overview
//!
//! `pane-vfs` separates a two-pane file browser into two layers that never know about any
//! rendering:
//!
//! - **Providers**: the [`FileSystemProvider`] trait with two interchangeable backends,
//!   [`MapFS`] (a simulated tree kept in memory) and [`DirFS`] (the host file system with an
//!   injectable trash handler).
//! - **Panels**: [`PanelState`] plus the navigation, selection and typeahead-search logic
//!   that drives it, and the [`ops`] coordinator that runs copy/delete/mkdir batches.
//!
//! [`Commander`] glues two panels and one shared provider together.
//!
//! **Key ideas**:
//! - **Same behaviour on every backend**: the panel engine only talks to the trait.
//! - **No partial state**: a failed directory load leaves the panel untouched.
//! - **Batch isolation**: one failing item never aborts the rest of a copy or delete.
//! - **Testability**: drive the whole engine against `MapFS` without touching the disk.

mod commander;
mod config;
mod core;
mod error;
pub mod ops;
mod panel;
mod vfs;

pub use commander::{Command, Commander, Outcome, Side};
pub use config::Config;
pub use core::{FileSystemProvider, Result, utils};
pub use error::{ConfigError, VfsError};
pub use ops::{BatchOutcome, BatchReport, Interaction};
pub use panel::{LoadState, PanelState, SearchDeadline};
pub use vfs::{DEFAULT_HOME, DirFS, Entry, EntryType, MapFS, PARENT_LINK, TrashHandler};
