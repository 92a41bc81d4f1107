//! Import payload, file intake, and gateway contract

pub mod bundle;
pub mod error;
pub mod file;
pub mod gateway;
pub mod mock;
pub mod preview;

pub use bundle::{ImportBundle, SessionRecord};
pub use error::ImportError;
pub use file::{has_json_extension, DiskFile, FileHandle, FileSource, PathFileSource, SharedFile};
pub use gateway::{
    GatewayError, HttpImportGateway, ImportGateway, ImportMode, ImportRequest, ImportResponse,
    MessageAction,
};
pub use preview::{PreviewItem, SessionPreview, NO_SESSIONS_MESSAGE};
