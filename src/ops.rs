//! Copy, delete and mkdir batches run against a [`FileSystemProvider`].
//!
//! Every batch has one cancellation point, the confirmation asked through
//! [`Interaction`] before any mutation. Once confirmed, operands are processed strictly
//! one after the other; a failing item is recorded and the rest are still attempted.
//! The affected panel is reloaded afterwards whatever the per-item results were.

use std::fmt::Write as _;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::core::{FileSystemProvider, Result, utils};
use crate::error::VfsError;
use crate::panel::PanelState;
use crate::Entry;

/// User-facing capabilities the coordinator needs from the presentation layer.
#[async_trait]
pub trait Interaction: Send + Sync {
    /// Asks a yes/no question.
    async fn confirm(&self, message: &str) -> bool;

    /// Asks for a line of text; `None` when the user cancelled.
    async fn prompt_for_text(&self, message: &str) -> Option<String>;
}

/// Aggregated result of a confirmed batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub succeeded: usize,
    /// Failed operands in the order they were attempted.
    pub failures: Vec<(Entry, VfsError)>,
    /// Set when the post-batch reload of the panel failed.
    pub reload_error: Option<VfsError>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.reload_error.is_none()
    }

    pub fn attempted(&self) -> usize {
        self.succeeded + self.failures.len()
    }

    /// One line per failure after a headline, suitable for a status bar or alert.
    pub fn summary(&self, verb: &str) -> String {
        if self.failures.is_empty() {
            let mut out = format!("{verb} {} item(s) successfully.", self.succeeded);
            if let Some(e) = &self.reload_error {
                let _ = write!(out, " Refresh failed: {e}");
            }
            return out;
        }

        let mut out = format!(
            "{verb} {} of {} item(s); {} failed:",
            self.succeeded,
            self.attempted(),
            self.failures.len()
        );
        for (entry, e) in &self.failures {
            let _ = write!(out, "\n{}: {e}", entry.name());
        }
        if let Some(e) = &self.reload_error {
            let _ = write!(out, "\nRefresh failed: {e}");
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// Nothing to act on; no question was asked.
    Skipped,
    /// The user said no; nothing was touched.
    Declined,
    Completed(BatchReport),
}

impl BatchOutcome {
    pub fn report(&self) -> Option<&BatchReport> {
        match self {
            BatchOutcome::Completed(report) => Some(report),
            _ => None,
        }
    }
}

/// Copies `operands` into the directory shown by `dest_panel`, then reloads it.
pub async fn copy_batch(
    provider: &dyn FileSystemProvider,
    operands: &[Entry],
    dest_panel: &mut PanelState,
    interaction: &dyn Interaction,
) -> BatchOutcome {
    if operands.is_empty() {
        return BatchOutcome::Skipped;
    }

    let destination = dest_panel.current_path().to_path_buf();
    let message = format!(
        "Copy {} item(s) to {}?",
        operands.len(),
        destination.display()
    );
    if !interaction.confirm(&message).await {
        info!(count = operands.len(), "copy declined");
        return BatchOutcome::Declined;
    }

    let mut report = run_sequentially(operands, |entry| {
        provider.copy_file(entry.path(), &destination)
    })
    .await;
    report.reload_error = dest_panel.reload(provider).await.err();

    info!(
        destination = %destination.display(),
        succeeded = report.succeeded,
        failed = report.failures.len(),
        "copy finished"
    );
    BatchOutcome::Completed(report)
}

/// Deletes (`permanent`) or trashes `operands`, then reloads `source_panel`.
pub async fn delete_batch(
    provider: &dyn FileSystemProvider,
    operands: &[Entry],
    permanent: bool,
    source_panel: &mut PanelState,
    interaction: &dyn Interaction,
) -> BatchOutcome {
    if operands.is_empty() {
        return BatchOutcome::Skipped;
    }

    let message = if permanent {
        format!("Are you sure you want to permanently DELETE {} item(s)?", operands.len())
    } else {
        format!("Are you sure you want to move {} item(s) to TRASH?", operands.len())
    };
    if !interaction.confirm(&message).await {
        info!(count = operands.len(), permanent, "delete declined");
        return BatchOutcome::Declined;
    }

    let mut report = run_sequentially(operands, |entry| async move {
        if permanent {
            provider.delete_entry(entry.path()).await
        } else {
            provider.trash_entry(entry.path()).await
        }
    })
    .await;
    report.reload_error = source_panel.reload(provider).await.err();

    info!(
        permanent,
        succeeded = report.succeeded,
        failed = report.failures.len(),
        "delete finished"
    );
    BatchOutcome::Completed(report)
}

/// Prompts for a name and creates that directory inside `panel`'s current directory.
///
/// Returns `Ok(None)` if the prompt was cancelled or left blank. The answer must be a single
/// path component: absolute paths, separators, `.` and `..` are rejected before any
/// provider call. On success the panel is reloaded and, when the new directory shows up in
/// the listing, focused.
pub async fn create_directory_interactive(
    provider: &dyn FileSystemProvider,
    panel: &mut PanelState,
    interaction: &dyn Interaction,
) -> Result<Option<PathBuf>> {
    let Some(answer) = interaction.prompt_for_text("Create new directory:").await else {
        return Ok(None);
    };
    let name = answer.trim();
    if name.is_empty() {
        return Ok(None);
    }

    if !is_plain_name(name) {
        warn!(name, "mkdir rejected");
        return Err(VfsError::Other(format!("invalid directory name: '{name}'")));
    }

    let target = utils::normalize(panel.current_path().join(name));
    if let Err(e) = provider.create_directory(&target).await {
        warn!(path = %target.display(), error = %e, "mkdir failed");
        return Err(e);
    }
    info!(path = %target.display(), "directory created");

    panel.reload(provider).await?;
    panel.focus_name(name);
    Ok(Some(target))
}

/// A name that stays inside the directory it is joined to.
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', std::path::MAIN_SEPARATOR])
}

async fn run_sequentially<'a, F, Fut>(operands: &'a [Entry], mut op: F) -> BatchReport
where
    F: FnMut(&'a Entry) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut report = BatchReport::default();
    for entry in operands {
        match op(entry).await {
            Ok(()) => report.succeeded += 1,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "batch item failed");
                report.failures.push((entry.clone(), e));
            }
        }
    }
    report
}
