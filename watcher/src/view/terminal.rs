//! Terminal rendering of a deployment log

use std::io::Write;

use colored::Colorize;
use tracing::warn;

use crate::models::deployment::{Badge, BadgeStyle, DeploymentSnapshot};
use crate::view::{LogPanel, StatusView};

const REPLACED_MARKER: &str = "--- log restarted ---";

/// Streams a deployment log to a writer.
///
/// Snapshots always carry the full log, so only the part not yet printed
/// is written. When the new log does not extend what is already on screen
/// the whole log is printed again after a marker line.
pub struct TerminalView<W: Write + Send> {
    panel: LogPanel,
    out: W,
    color: bool,
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W, in_progress: bool, color: bool) -> Self {
        Self {
            panel: LogPanel::new(in_progress),
            out,
            color,
        }
    }

    pub fn into_inner(self) -> (LogPanel, W) {
        (self.panel, self.out)
    }

    fn write_update(&mut self, previous: &str, badge_changed: Option<Badge>) -> std::io::Result<()> {
        let current = self.panel.content();

        match current.strip_prefix(previous) {
            Some(rest) => self.out.write_all(rest.as_bytes())?,
            None => {
                if !previous.is_empty() {
                    writeln!(self.out)?;
                    writeln!(self.out, "{}", REPLACED_MARKER)?;
                }
                self.out.write_all(current.as_bytes())?;
            }
        }

        if let Some(badge) = badge_changed {
            if !current.is_empty() && !current.ends_with('\n') {
                writeln!(self.out)?;
            }
            let label = format_badge(badge, self.color);
            writeln!(self.out, "{}", label)?;
        }

        self.out.flush()
    }
}

fn format_badge(badge: Badge, color: bool) -> String {
    let label = format!("[{}]", badge.text);
    if !color {
        return label;
    }
    match badge.style {
        BadgeStyle::Success => label.green().bold().to_string(),
        BadgeStyle::Danger => label.red().bold().to_string(),
    }
}

impl<W: Write + Send> StatusView for TerminalView<W> {
    fn render(&mut self, snapshot: &DeploymentSnapshot) {
        let previous = self.panel.content().to_string();
        let previous_badge = self.panel.badge();

        self.panel.render(snapshot);

        let badge_changed = self.panel.badge().filter(|badge| Some(*badge) != previous_badge);
        if let Err(e) = self.write_update(&previous, badge_changed) {
            warn!("Failed to write deployment log: {}", e);
        }
    }

    fn content(&self) -> &str {
        self.panel.content()
    }
}
