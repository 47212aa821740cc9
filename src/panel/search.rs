use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::trace;

use super::PanelState;

/// Expiry timer of a typeahead buffer.
///
/// Holds an absolute instant instead of a spawned task, so re-arming is an assignment
/// and the owner decides when to await it. `Instant` is tokio's, which lets tests drive
/// it with a paused clock.
#[derive(Debug, Clone)]
pub struct SearchDeadline {
    timeout: Duration,
    expires_at: Option<Instant>,
}

impl SearchDeadline {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            expires_at: None,
        }
    }

    /// Pushes the deadline to `timeout` from now.
    pub fn arm(&mut self) {
        self.expires_at = Some(Instant::now() + self.timeout);
    }

    pub fn disarm(&mut self) {
        self.expires_at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.expires_at.is_some()
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn is_due(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }

    /// Resolves once the deadline passes. Never resolves while disarmed.
    pub async fn expired(&self) {
        match self.expires_at {
            Some(at) => time::sleep_until(at).await,
            None => std::future::pending().await,
        }
    }
}

impl PanelState {
    /// Appends `c` to the typeahead buffer and focuses the first entry whose name starts
    /// with the buffer, ignoring case. Returns whether such an entry was found; focus is
    /// left alone when nothing matches.
    ///
    /// A buffer whose deadline already passed is discarded before `c` is appended.
    pub fn type_char(&mut self, c: char) -> bool {
        self.expire_search_if_due();
        self.search_buffer.push(c);
        self.search_deadline.arm();
        self.focus_search_match()
    }

    /// Removes the last character of the buffer.
    ///
    /// Returns `false` when there was no search in progress, so the caller can fall back
    /// to its own meaning of the key. A buffer emptied this way cancels the search.
    pub fn backspace(&mut self) -> bool {
        self.expire_search_if_due();
        if self.search_buffer.pop().is_none() {
            return false;
        }
        if self.search_buffer.is_empty() {
            self.search_deadline.disarm();
        } else {
            self.search_deadline.arm();
            self.focus_search_match();
        }
        true
    }

    pub fn cancel_search(&mut self) {
        self.search_buffer.clear();
        self.search_deadline.disarm();
    }

    /// Clears the buffer if its deadline has passed. Returns whether it did.
    pub fn expire_search_if_due(&mut self) -> bool {
        if !self.search_deadline.is_due() {
            return false;
        }
        trace!(buffer = %self.search_buffer, "search expired");
        self.cancel_search();
        true
    }

    fn focus_search_match(&mut self) -> bool {
        let needle = self.search_buffer.to_lowercase();
        let found = self
            .entries
            .iter()
            .position(|e| !e.is_parent_link() && e.name().to_lowercase().starts_with(&needle));

        match found {
            Some(index) => {
                self.focused_index = index;
                true
            }
            None => false,
        }
    }
}
