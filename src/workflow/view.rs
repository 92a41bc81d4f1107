//! Presentation port and its terminal adapter

use std::io::{self, Write};

use crossterm::style::{style, Color, Stylize};

use crate::import::{SessionPreview, NO_SESSIONS_MESSAGE};
use crate::workflow::state::{FileInfo, StatusKind, WorkflowStatus};

/// What the controller can ask of the rendering surface.
///
/// Each call replaces whatever the previous call of the same kind showed.
pub trait ImportView {
    /// Replace the status line; `StatusKind::Idle` hides it
    fn show_status(&mut self, status: &WorkflowStatus);

    /// Show the session preview, or hide it with `None`
    fn render_preview(&mut self, preview: Option<&SessionPreview>);

    /// Show the selected file's name and size, or hide it with `None`
    fn set_file_info(&mut self, info: Option<&FileInfo>);

    fn set_submit_enabled(&mut self, enabled: bool);

    fn set_drop_highlight(&mut self, active: bool);
}

/// Line-oriented view for a terminal.
///
/// Output is append-only; a later status line supersedes earlier ones.
pub struct TerminalView<W: Write> {
    out: W,
    color: bool,
    submit_enabled: bool,
    file_shown: bool,
}

impl TerminalView<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout(), std::env::var_os("NO_COLOR").is_none())
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            submit_enabled: false,
            file_shown: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn emit(&mut self, line: String) {
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            tracing::warn!(error = %e, "Failed to write to terminal");
        }
    }
}

impl<W: Write> ImportView for TerminalView<W> {
    fn show_status(&mut self, status: &WorkflowStatus) {
        let color = match status.kind {
            StatusKind::Idle => return,
            StatusKind::Loading => Color::Yellow,
            StatusKind::Success => Color::Green,
            StatusKind::Error => Color::Red,
        };
        let line = format!(
            "{} {}",
            status.kind.icon(),
            self.paint(&status.message, color)
        );
        self.emit(line);
    }

    fn render_preview(&mut self, preview: Option<&SessionPreview>) {
        let Some(preview) = preview else {
            return;
        };

        match preview {
            SessionPreview::Empty => {
                let line = format!("  {}", self.paint(NO_SESSIONS_MESSAGE, Color::DarkGrey));
                self.emit(line);
            }
            SessionPreview::Items(items) => {
                for item in items {
                    let line = format!(
                        "  📁 {}  🌐 {}  📅 {}",
                        self.paint(&item.name, Color::White),
                        item.domain,
                        item.display_date()
                    );
                    self.emit(line);
                }
            }
        }
    }

    fn set_file_info(&mut self, info: Option<&FileInfo>) {
        let line = match info {
            Some(info) => format!(
                "{} ({})",
                self.paint(&info.name, Color::Cyan),
                info.display_size()
            ),
            // Nothing to retract
            None if !self.file_shown => return,
            None => self.paint("Selection cleared.", Color::DarkGrey),
        };
        self.file_shown = info.is_some();
        self.emit(line);
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        if enabled && !self.submit_enabled {
            let hint = self.paint("Ready to import. Type `import` to continue.", Color::DarkGrey);
            self.emit(hint);
        }
        self.submit_enabled = enabled;
    }

    fn set_drop_highlight(&mut self, _active: bool) {}
}
