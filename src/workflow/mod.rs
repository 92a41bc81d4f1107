//! Import workflow state machine and its presentation port

pub mod controller;
pub mod events;
pub mod recording;
pub mod state;
pub mod view;

pub use controller::{ImportController, WorkflowSender};
pub use events::WorkflowEvent;
pub use recording::{RecordingView, ViewSnapshot};
pub use state::{FileInfo, SelectedFile, StatusKind, WorkflowState, WorkflowStatus};
pub use view::{ImportView, TerminalView};
