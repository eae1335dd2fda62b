//! In-memory log panel

use crate::models::deployment::{Badge, DeploymentSnapshot};
use crate::view::StatusView;

/// State of a log panel: log text, scroll position, in-progress flag and
/// status badge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogPanel {
    content: String,
    scroll_line: usize,
    in_progress: bool,
    badge: Option<Badge>,
    renders: u64,
}

impl LogPanel {
    /// Create an empty panel
    pub fn new(in_progress: bool) -> Self {
        Self {
            in_progress,
            ..Default::default()
        }
    }

    /// Whether the deployment is still flagged as in progress
    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// Badge set by the last terminal snapshot, if any
    pub fn badge(&self) -> Option<Badge> {
        self.badge
    }

    /// Zero-based line the view is scrolled to
    pub fn scroll_line(&self) -> usize {
        self.scroll_line
    }

    /// True when the last line of the log is in view
    pub fn is_scrolled_to_bottom(&self) -> bool {
        self.scroll_line == self.last_line()
    }

    /// Number of snapshots rendered so far
    pub fn renders(&self) -> u64 {
        self.renders
    }

    fn last_line(&self) -> usize {
        self.content.lines().count().saturating_sub(1)
    }
}

impl StatusView for LogPanel {
    fn render(&mut self, snapshot: &DeploymentSnapshot) {
        self.content.clear();
        self.content.push_str(&snapshot.log);
        self.scroll_line = self.last_line();
        self.renders += 1;

        if let Some(badge) = snapshot.status.badge() {
            self.in_progress = false;
            self.badge = Some(badge);
        }
    }

    fn content(&self) -> &str {
        &self.content
    }
}
