//! File intake ports and their disk-backed adapters

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

/// Required file extension (matched case-insensitively)
pub const JSON_EXTENSION: &str = ".json";

/// A file offered to the workflow by any intake path
#[async_trait]
pub trait FileHandle: Send + Sync + fmt::Debug {
    /// File name as shown to the user
    fn name(&self) -> &str;

    /// Size in bytes as reported by the source
    fn size_bytes(&self) -> u64;

    /// Read the full content as UTF-8 text
    async fn read_text(&self) -> io::Result<String>;
}

pub type SharedFile = Arc<dyn FileHandle>;

/// Whether a file name carries the `.json` extension, ignoring case
pub fn has_json_extension(name: &str) -> bool {
    name.to_lowercase().ends_with(JSON_EXTENSION)
}

/// The click-to-browse intake path
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Let the user pick a file. `Ok(None)` means the picker was dismissed.
    async fn browse(&self) -> io::Result<Option<SharedFile>>;
}

/// A file on the local filesystem
#[derive(Debug, Clone)]
pub struct DiskFile {
    path: PathBuf,
    name: String,
    size_bytes: u64,
}

impl DiskFile {
    /// Stat the file; content is not read until [`FileHandle::read_text`]
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            ));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            path,
            name,
            size_bytes: metadata.len(),
        })
    }
}

#[async_trait]
impl FileHandle for DiskFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    async fn read_text(&self) -> io::Result<String> {
        tokio::fs::read_to_string(&self.path).await
    }
}

/// Browses to a fixed, preconfigured path (the file named on the command line)
#[derive(Debug, Clone)]
pub struct PathFileSource {
    path: Option<PathBuf>,
}

impl PathFileSource {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl FileSource for PathFileSource {
    async fn browse(&self) -> io::Result<Option<SharedFile>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        let file = DiskFile::open(path).await?;
        Ok(Some(Arc::new(file)))
    }
}
