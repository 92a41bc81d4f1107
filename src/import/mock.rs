//! In-memory test doubles for the import ports
//!
//! `MockImportGateway` records every request and answers from a scripted
//! queue; it can also hold responses until released so tests can observe the
//! workflow while an import is in flight. `MemoryFile` counts reads so tests
//! can assert that rejected files are never opened.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use session_import::import::mock::{MemoryFile, MockImportGateway};
//! use session_import::import::ImportResponse;
//!
//! let gateway = Arc::new(MockImportGateway::new().respond(ImportResponse::failed("disk full")));
//! let file = Arc::new(MemoryFile::new("export.json", r#"{"sessions":[]}"#));
//! ```

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::import::file::{FileHandle, FileSource, SharedFile};
use crate::import::gateway::{GatewayError, ImportGateway, ImportRequest, ImportResponse};

/// Scripted gateway outcome
#[derive(Debug, Clone)]
pub enum MockReply {
    Respond(ImportResponse),
    TransportError(String),
}

/// Gateway double that captures requests
#[derive(Debug, Default)]
pub struct MockImportGateway {
    replies: Mutex<VecDeque<MockReply>>,
    captured: Mutex<Vec<ImportRequest>>,
    gate: Option<Notify>,
}

impl MockImportGateway {
    /// Answers every request with success unless replies are queued
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response
    pub fn respond(self, response: ImportResponse) -> Self {
        self.replies.lock().push_back(MockReply::Respond(response));
        self
    }

    /// Queue a transport failure
    pub fn fail_transport(self, message: impl Into<String>) -> Self {
        self.replies
            .lock()
            .push_back(MockReply::TransportError(message.into()));
        self
    }

    /// Hold each response until [`release`](Self::release) is called
    pub fn held(mut self) -> Self {
        self.gate = Some(Notify::new());
        self
    }

    /// Let one held request complete
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn captured_requests(&self) -> Vec<ImportRequest> {
        self.captured.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.captured.lock().len()
    }
}

#[async_trait]
impl ImportGateway for MockImportGateway {
    async fn send(&self, request: ImportRequest) -> Result<ImportResponse, GatewayError> {
        self.captured.lock().push(request);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let reply = self
            .replies
            .lock()
            .pop_front()
            .unwrap_or(MockReply::Respond(ImportResponse::ok()));

        match reply {
            MockReply::Respond(response) => Ok(response),
            MockReply::TransportError(message) => Err(GatewayError::Transport(message)),
        }
    }
}

/// A file held in memory
#[derive(Debug)]
pub struct MemoryFile {
    name: String,
    size_bytes: u64,
    content: Result<String, String>,
    reads: AtomicUsize,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            size_bytes: content.len() as u64,
            content: Ok(content),
            reads: AtomicUsize::new(0),
        }
    }

    /// A file whose read fails with `message`
    pub fn unreadable(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_bytes: 0,
            content: Err(message.into()),
            reads: AtomicUsize::new(0),
        }
    }

    /// Number of times the content was read
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileHandle for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    async fn read_text(&self) -> io::Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.content.clone().map_err(io::Error::other)
    }
}

/// Browse double returning queued picks; dismissed once the queue is empty
#[derive(Debug, Default)]
pub struct MockFileSource {
    picks: Mutex<VecDeque<SharedFile>>,
    browsed: AtomicUsize,
}

impl MockFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pick(self, file: SharedFile) -> Self {
        self.picks.lock().push_back(file);
        self
    }

    pub fn browse_count(&self) -> usize {
        self.browsed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileSource for MockFileSource {
    async fn browse(&self) -> io::Result<Option<SharedFile>> {
        self.browsed.fetch_add(1, Ordering::SeqCst);
        Ok(self.picks.lock().pop_front())
    }
}

/// Wrap a memory file for handing to the workflow while keeping a handle
pub fn shared(file: MemoryFile) -> (Arc<MemoryFile>, SharedFile) {
    let file = Arc::new(file);
    let handle: SharedFile = file.clone();
    (file, handle)
}
