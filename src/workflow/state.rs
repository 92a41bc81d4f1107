//! Workflow states, status messages, and the selected-file record

use crate::import::ImportError;
use crate::util::format_file_size;

pub const READING_MESSAGE: &str = "Reading file...";
pub const LOADED_MESSAGE: &str = "File loaded successfully!";
pub const IMPORTING_MESSAGE: &str = "Importing sessions...";
pub const IMPORTED_MESSAGE: &str = "Sessions imported successfully! You can close this tab.";
/// Used when the gateway reports failure without a reason
pub const GENERIC_IMPORT_FAILURE: &str = "Import failed";

/// Position in the import workflow.
///
/// A failed import goes straight back to `FileReady`, so there is no resting
/// "failed" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Empty,
    FileLoading,
    FileReady,
    Importing,
    ImportSucceeded,
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Empty => "empty",
            WorkflowState::FileLoading => "file-loading",
            WorkflowState::FileReady => "file-ready",
            WorkflowState::Importing => "importing",
            WorkflowState::ImportSucceeded => "import-succeeded",
        }
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusKind {
    /// Nothing shown
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl StatusKind {
    pub fn icon(&self) -> &'static str {
        match self {
            StatusKind::Idle => "",
            StatusKind::Loading => "⏳",
            StatusKind::Success => "✅",
            StatusKind::Error => "❌",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Idle => "idle",
            StatusKind::Loading => "loading",
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }
}

/// The single user-visible status line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkflowStatus {
    pub kind: StatusKind,
    pub message: String,
}

impl WorkflowStatus {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn loading(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Loading,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.kind != StatusKind::Idle
    }
}

impl From<&ImportError> for WorkflowStatus {
    fn from(err: &ImportError) -> Self {
        WorkflowStatus::error(err.to_string())
    }
}

/// File metadata shown next to the drop zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size_bytes: u64,
}

impl FileInfo {
    pub fn display_size(&self) -> String {
        format_file_size(self.size_bytes)
    }
}

/// A successfully read file; lives until cleared, replaced, or imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size_bytes: u64,
    pub raw_text: String,
}

impl SelectedFile {
    pub fn info(&self) -> FileInfo {
        FileInfo {
            name: self.name.clone(),
            size_bytes: self.size_bytes,
        }
    }
}
