//! Presentation of a deployment's log and status
//!
//! The poller only ever talks to [`StatusView`]; how a snapshot ends up on
//! screen (or in memory) is up to the implementation.

pub mod panel;
pub mod terminal;

use crate::models::deployment::DeploymentSnapshot;

pub use panel::LogPanel;
pub use terminal::TerminalView;

/// Something that can display the latest deployment snapshot
pub trait StatusView: Send {
    /// Replace the displayed log with the snapshot's log and, when the
    /// snapshot is terminal, show the final status.
    fn render(&mut self, snapshot: &DeploymentSnapshot);

    /// Log text currently displayed
    fn content(&self) -> &str;
}
