//! Display projection of a bundle's sessions

use chrono::{DateTime, Local, Utc};

use crate::import::bundle::SessionRecord;

/// Placeholder shown when a file contains no sessions
pub const NO_SESSIONS_MESSAGE: &str = "No sessions found in file";

/// One row of the preview list
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewItem {
    /// Session name, or `Session N` when absent
    pub name: String,
    pub domain: String,
    pub created_at: DateTime<Utc>,
}

impl PreviewItem {
    /// Local calendar date of the session, e.g. `2024-01-01`
    pub fn display_date(&self) -> String {
        self.created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d")
            .to_string()
    }
}

/// Rendered preview of a bundle
#[derive(Debug, Clone, PartialEq)]
pub enum SessionPreview {
    /// The file holds no sessions; render [`NO_SESSIONS_MESSAGE`]
    Empty,
    Items(Vec<PreviewItem>),
}

impl SessionPreview {
    /// Project sessions into display rows.
    ///
    /// `now` stands in for a missing, zero, or unparseable `createdAt`.
    /// Fallbacks live only in the
    /// returned rows; `sessions` is not touched.
    pub fn build(sessions: &[SessionRecord], now: DateTime<Utc>) -> Self {
        if sessions.is_empty() {
            return SessionPreview::Empty;
        }

        let items = sessions
            .iter()
            .enumerate()
            .map(|(index, session)| PreviewItem {
                name: match session.name.as_deref() {
                    Some(name) if !name.is_empty() => name.to_string(),
                    _ => format!("Session {}", index + 1),
                },
                domain: session.domain.clone().unwrap_or_default(),
                created_at: session.created_at_time().unwrap_or(now),
            })
            .collect();

        SessionPreview::Items(items)
    }

    pub fn items(&self) -> &[PreviewItem] {
        match self {
            SessionPreview::Empty => &[],
            SessionPreview::Items(items) => items,
        }
    }
}
