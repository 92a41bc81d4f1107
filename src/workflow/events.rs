use crate::import::{ImportResponse, SharedFile};

/// Inputs to the import controller.
///
/// The first group are user actions, one per intake edge or button. The rest
/// are completions posted back by the controller's own background tasks.
#[derive(Debug, Clone)]
pub enum WorkflowEvent {
    /// Drop zone clicked; open the file picker
    Browse,
    /// A drag entered the drop zone
    DragEnter,
    /// A drag left the drop zone
    DragLeave,
    /// Files dropped on the drop zone; the first one is taken
    Dropped(Vec<SharedFile>),
    /// File input changed; the first file is taken
    InputChanged(Vec<SharedFile>),
    /// Clear-selection button
    Clear,
    /// Import button
    Submit,
    /// Back button; ends the event loop
    Close,

    /// The picker closed
    BrowseCompleted {
        result: Result<Option<SharedFile>, String>,
    },
    /// A file's content finished reading
    FileRead {
        generation: u64,
        file: SharedFile,
        result: Result<String, String>,
    },
    /// The gateway answered an import request
    ImportCompleted {
        attempt: u64,
        result: Result<ImportResponse, String>,
    },
    /// The post-success display delay ran out
    ClearTimerElapsed { generation: u64 },
}
