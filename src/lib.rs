pub mod config;
pub mod import;
pub mod util;
pub mod workflow;

pub use config::Config;
pub use import::{
    FileHandle, FileSource, HttpImportGateway, ImportBundle, ImportError, ImportGateway,
    ImportRequest, ImportResponse, SessionPreview, SessionRecord,
};
pub use util::format_file_size;
pub use workflow::{
    ImportController, ImportView, RecordingView, TerminalView, WorkflowEvent, WorkflowState,
    WorkflowStatus,
};
