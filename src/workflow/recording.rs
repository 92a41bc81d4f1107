//! In-memory view that records what the controller shows

use std::sync::Arc;

use parking_lot::Mutex;

use crate::import::SessionPreview;
use crate::workflow::state::{FileInfo, WorkflowStatus};
use crate::workflow::view::ImportView;

/// Everything currently "on screen", plus the status history
#[derive(Debug, Clone, Default)]
pub struct ViewSnapshot {
    pub status: WorkflowStatus,
    pub status_history: Vec<WorkflowStatus>,
    pub preview: Option<SessionPreview>,
    pub file_info: Option<FileInfo>,
    pub submit_enabled: bool,
    pub drop_highlight: bool,
}

/// View double; clones share the same recording
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    inner: Arc<Mutex<ViewSnapshot>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.inner.lock().clone()
    }

    pub fn status(&self) -> WorkflowStatus {
        self.inner.lock().status.clone()
    }

    pub fn submit_enabled(&self) -> bool {
        self.inner.lock().submit_enabled
    }
}

impl ImportView for RecordingView {
    fn show_status(&mut self, status: &WorkflowStatus) {
        let mut inner = self.inner.lock();
        inner.status = status.clone();
        inner.status_history.push(status.clone());
    }

    fn render_preview(&mut self, preview: Option<&SessionPreview>) {
        self.inner.lock().preview = preview.cloned();
    }

    fn set_file_info(&mut self, info: Option<&FileInfo>) {
        self.inner.lock().file_info = info.cloned();
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.inner.lock().submit_enabled = enabled;
    }

    fn set_drop_highlight(&mut self, active: bool) {
        self.inner.lock().drop_highlight = active;
    }
}
