//! Import workflow controller
//!
//! Owns the selected file and decoded bundle and moves them through
//! `Empty -> FileLoading -> FileReady -> Importing -> ImportSucceeded`.
//! User actions and background completions arrive as [`WorkflowEvent`]s on a
//! single channel and are handled one at a time. File reads, gateway calls,
//! and the post-success clear delay run as spawned tasks that post their
//! result back as another event, so the controller never awaits while
//! holding state.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::WorkflowConfig;
use crate::import::{
    has_json_extension, FileSource, ImportBundle, ImportError, ImportGateway, ImportRequest,
    ImportResponse, SessionPreview, SharedFile,
};
use crate::workflow::events::WorkflowEvent;
use crate::workflow::state::{
    SelectedFile, WorkflowState, WorkflowStatus, GENERIC_IMPORT_FAILURE, IMPORTED_MESSAGE,
    IMPORTING_MESSAGE, LOADED_MESSAGE, READING_MESSAGE,
};
use crate::workflow::view::ImportView;

pub type WorkflowSender = mpsc::UnboundedSender<WorkflowEvent>;

/// The import request currently awaiting a gateway answer
#[derive(Debug, Clone, Copy)]
struct InFlightImport {
    attempt: u64,
    /// Selection generation that was submitted
    generation: u64,
}

pub struct ImportController<V: ImportView> {
    view: V,
    gateway: Arc<dyn ImportGateway>,
    source: Arc<dyn FileSource>,
    clear_delay: Duration,

    state: WorkflowState,
    selected: Option<SelectedFile>,
    bundle: Option<ImportBundle>,
    /// Bumped on every intake and clear; stale reads and timers are dropped
    generation: u64,
    in_flight: Option<InFlightImport>,
    next_attempt: u64,
    clear_timer: Option<JoinHandle<()>>,

    events_tx: WorkflowSender,
    events_rx: mpsc::UnboundedReceiver<WorkflowEvent>,
}

impl<V: ImportView> ImportController<V> {
    pub fn new(
        view: V,
        gateway: Arc<dyn ImportGateway>,
        source: Arc<dyn FileSource>,
        config: &WorkflowConfig,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            view,
            gateway,
            source,
            clear_delay: config.clear_delay,
            state: WorkflowState::Empty,
            selected: None,
            bundle: None,
            generation: 0,
            in_flight: None,
            next_attempt: 0,
            clear_timer: None,
            events_tx,
            events_rx,
        }
    }

    /// Handle for posting user actions from outside the controller
    pub fn sender(&self) -> WorkflowSender {
        self.events_tx.clone()
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn bundle(&self) -> Option<&ImportBundle> {
        self.bundle.as_ref()
    }

    pub fn is_import_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Process events until `Close`
    pub async fn run(mut self) {
        while self.step().await.is_continue() {}
        debug!("Import workflow closed");
    }

    /// Wait for the next event and handle it
    pub async fn step(&mut self) -> ControlFlow<()> {
        match self.events_rx.recv().await {
            Some(event) => self.handle(event),
            None => ControlFlow::Break(()),
        }
    }

    /// Apply one event. Never blocks; asynchronous work is spawned.
    pub fn handle(&mut self, event: WorkflowEvent) -> ControlFlow<()> {
        match event {
            WorkflowEvent::Browse => self.browse(),
            WorkflowEvent::DragEnter => self.view.set_drop_highlight(true),
            WorkflowEvent::DragLeave => self.view.set_drop_highlight(false),
            WorkflowEvent::Dropped(files) => {
                self.view.set_drop_highlight(false);
                if let Some(file) = files.into_iter().next() {
                    self.intake(file);
                }
            }
            WorkflowEvent::InputChanged(files) => {
                if let Some(file) = files.into_iter().next() {
                    self.intake(file);
                }
            }
            WorkflowEvent::Clear => self.clear(),
            WorkflowEvent::Submit => self.submit(),
            WorkflowEvent::Close => {
                self.cancel_clear_timer();
                return ControlFlow::Break(());
            }
            WorkflowEvent::BrowseCompleted { result } => match result {
                Ok(Some(file)) => self.intake(file),
                Ok(None) => debug!("File picker dismissed"),
                Err(msg) => self.fail_intake(ImportError::Unreadable(msg)),
            },
            WorkflowEvent::FileRead {
                generation,
                file,
                result,
            } => {
                if generation != self.generation || self.state != WorkflowState::FileLoading {
                    debug!(file = %file.name(), "Dropping stale file read");
                } else {
                    self.finish_read(file, result);
                }
            }
            WorkflowEvent::ImportCompleted { attempt, result } => {
                self.finish_import(attempt, result)
            }
            WorkflowEvent::ClearTimerElapsed { generation } => {
                self.clear_timer = None;
                if generation == self.generation && self.state == WorkflowState::ImportSucceeded {
                    self.clear();
                }
            }
        }
        ControlFlow::Continue(())
    }

    fn browse(&mut self) {
        let source = Arc::clone(&self.source);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = source.browse().await.map_err(|e| e.to_string());
            let _ = tx.send(WorkflowEvent::BrowseCompleted { result });
        });
    }

    /// Common entry point for every intake path
    fn intake(&mut self, file: SharedFile) {
        self.cancel_clear_timer();
        self.generation += 1;

        if !has_json_extension(file.name()) {
            self.fail_intake(ImportError::UnsupportedFormat {
                file_name: file.name().to_string(),
            });
            return;
        }

        self.reset_selection();
        self.state = WorkflowState::FileLoading;
        self.view.show_status(&WorkflowStatus::loading(READING_MESSAGE));
        debug!(file = %file.name(), size = file.size_bytes(), "Reading import file");

        let generation = self.generation;
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = file.read_text().await.map_err(|e| e.to_string());
            let _ = tx.send(WorkflowEvent::FileRead {
                generation,
                file,
                result,
            });
        });
    }

    fn finish_read(&mut self, file: SharedFile, result: Result<String, String>) {
        let parsed = result
            .map_err(ImportError::Unreadable)
            .and_then(|text| ImportBundle::parse(&text).map(|bundle| (text, bundle)));

        let (raw_text, bundle) = match parsed {
            Ok(parsed) => parsed,
            Err(err) => {
                self.fail_intake(err);
                return;
            }
        };

        let selected = SelectedFile {
            name: file.name().to_string(),
            size_bytes: file.size_bytes(),
            raw_text,
        };
        info!(
            file = %selected.name,
            sessions = bundle.sessions().len(),
            export_date = bundle.export_date().unwrap_or("unknown"),
            version = bundle.version().unwrap_or("unknown"),
            "Import file loaded"
        );

        let preview = SessionPreview::build(bundle.sessions(), Utc::now());
        self.view.set_file_info(Some(&selected.info()));
        self.view.render_preview(Some(&preview));
        self.selected = Some(selected);
        self.bundle = Some(bundle);
        self.state = WorkflowState::FileReady;
        self.view.set_submit_enabled(self.in_flight.is_none());
        self.view.show_status(&WorkflowStatus::success(LOADED_MESSAGE));
    }

    fn fail_intake(&mut self, err: ImportError) {
        self.reset_selection();
        self.report(&err);
    }

    fn clear(&mut self) {
        if self.state == WorkflowState::Importing {
            debug!("Ignoring clear while importing");
            return;
        }
        self.cancel_clear_timer();
        self.generation += 1;
        self.reset_selection();
        self.view.show_status(&WorkflowStatus::idle());
    }

    fn submit(&mut self) {
        // While a request is outstanding a ready file only waits for it; with
        // nothing ready, fall through and report the missing selection.
        if let Some(in_flight) = self.in_flight {
            if matches!(self.state, WorkflowState::Importing | WorkflowState::FileReady) {
                debug!(attempt = in_flight.attempt, "Import already in flight");
                return;
            }
        }

        let serialized = match self.state {
            WorkflowState::FileReady => self.bundle.as_ref().map(ImportBundle::to_json),
            _ => None,
        };
        let json_data = match serialized {
            Some(Ok(json)) => json,
            Some(Err(err)) => {
                self.report(&err);
                return;
            }
            None => {
                self.report(&ImportError::NoFileSelected);
                return;
            }
        };

        self.view.set_submit_enabled(false);
        self.next_attempt += 1;
        let attempt = self.next_attempt;
        self.in_flight = Some(InFlightImport {
            attempt,
            generation: self.generation,
        });
        self.state = WorkflowState::Importing;
        self.view.show_status(&WorkflowStatus::loading(IMPORTING_MESSAGE));
        info!(attempt, bytes = json_data.len(), "Submitting import");

        let gateway = Arc::clone(&self.gateway);
        let tx = self.events_tx.clone();
        let request = ImportRequest::new(json_data);
        tokio::spawn(async move {
            let result = gateway.send(request).await.map_err(|e| e.to_string());
            let _ = tx.send(WorkflowEvent::ImportCompleted { attempt, result });
        });
    }

    fn finish_import(&mut self, attempt: u64, result: Result<ImportResponse, String>) {
        let in_flight = match self.in_flight {
            Some(in_flight) if in_flight.attempt == attempt => in_flight,
            _ => {
                warn!(attempt, "Ignoring result for unknown import attempt");
                return;
            }
        };
        self.in_flight = None;

        // Intake may have replaced the submitted file while we waited
        let same_selection =
            in_flight.generation == self.generation && self.state == WorkflowState::Importing;

        let outcome = match result {
            Ok(response) if response.success => Ok(()),
            Ok(response) => Err(ImportError::GatewayFailure(
                response
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| GENERIC_IMPORT_FAILURE.to_string()),
            )),
            Err(msg) => Err(ImportError::GatewayFailure(msg)),
        };

        match outcome {
            Ok(()) => {
                info!(attempt, "Sessions imported");
                self.view.show_status(&WorkflowStatus::success(IMPORTED_MESSAGE));
                if same_selection {
                    self.state = WorkflowState::ImportSucceeded;
                    self.schedule_clear();
                } else {
                    self.view
                        .set_submit_enabled(self.state == WorkflowState::FileReady);
                }
            }
            Err(err) => {
                if same_selection {
                    self.state = WorkflowState::FileReady;
                }
                self.report(&err);
                self.view
                    .set_submit_enabled(self.state == WorkflowState::FileReady);
            }
        }
    }

    fn schedule_clear(&mut self) {
        self.cancel_clear_timer();
        let generation = self.generation;
        let delay = self.clear_delay;
        let tx = self.events_tx.clone();
        self.clear_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(WorkflowEvent::ClearTimerElapsed { generation });
        }));
    }

    fn cancel_clear_timer(&mut self) {
        if let Some(timer) = self.clear_timer.take() {
            timer.abort();
        }
    }

    /// Drop the selection and hide everything that describes it
    fn reset_selection(&mut self) {
        self.state = WorkflowState::Empty;
        self.selected = None;
        self.bundle = None;
        self.view.set_file_info(None);
        self.view.render_preview(None);
        self.view.set_submit_enabled(false);
    }

    fn report(&mut self, err: &ImportError) {
        match err {
            ImportError::UnsupportedFormat { file_name } => warn!(
                error = %err,
                file = %file_name,
                state = %self.state,
                "Import workflow error"
            ),
            _ => warn!(error = %err, state = %self.state, "Import workflow error"),
        }
        self.view.show_status(&WorkflowStatus::from(err));
    }
}
