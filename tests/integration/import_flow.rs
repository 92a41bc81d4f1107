//! Integration tests for the import workflow
//!
//! Tests the flow: intake -> read/parse -> preview -> submit -> gateway result
//! using the in-memory view, file, and gateway adapters.

use std::time::Duration;

use session_import::import::mock::{MockFileSource, MockImportGateway};
use session_import::import::{ImportMode, ImportRequest, ImportResponse, MessageAction};
use session_import::workflow::{StatusKind, WorkflowEvent, WorkflowState, WorkflowStatus};
use session_import::SessionPreview;

use super::common::{
    memory_file, Harness, EMPTY_EXPORT_JSON, EXPORT_JSON, LOOSE_EXPORT_JSON,
    UNNAMED_EXPORT_JSON,
};

/// Drop `export.JSON`, preview it, and submit it
#[tokio::test]
async fn test_drop_preview_and_submit_end_to_end() {
    let mut h = Harness::new(MockImportGateway::new());

    h.drop_file("export.JSON", EXPORT_JSON).await;

    assert_eq!(h.controller.state(), WorkflowState::FileReady);
    let snapshot = h.view.snapshot();
    let preview = snapshot.preview.expect("preview should be rendered");
    assert_eq!(preview.items().len(), 1);
    assert_eq!(preview.items()[0].name, "Work");
    assert_eq!(preview.items()[0].domain, "x.com");
    let info = snapshot.file_info.expect("file info should be shown");
    assert_eq!(info.name, "export.JSON");
    assert_eq!(info.size_bytes, EXPORT_JSON.len() as u64);

    h.send(WorkflowEvent::Submit);
    assert_eq!(h.controller.state(), WorkflowState::Importing);
    h.step().await;

    let requests = h.gateway.captured_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0],
        ImportRequest {
            action: MessageAction::ImportSessions,
            json_data: EXPORT_JSON.to_string(),
            import_mode: ImportMode::Merge,
        }
    );
    let wire = serde_json::to_value(&requests[0]).unwrap();
    assert_eq!(wire["action"], "IMPORT_SESSIONS");
    assert_eq!(wire["importMode"], "merge");
}

/// Files with ISO `createdAt`, string `order`, and numeric ids still import
#[tokio::test]
async fn test_loosely_typed_export_previews_and_imports() {
    let mut h = Harness::new(MockImportGateway::new());

    h.drop_file("loose.json", LOOSE_EXPORT_JSON).await;

    assert_eq!(h.controller.state(), WorkflowState::FileReady);
    assert_eq!(h.view.status().kind, StatusKind::Success);
    let preview = h.view.snapshot().preview.expect("preview should be rendered");
    let items = preview.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "Research");
    assert_eq!(items[1].name, "Session 2");
    let new_year = chrono::DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
        .unwrap()
        .with_timezone(&chrono::Utc);
    assert_eq!(items[0].created_at, new_year);
    assert_eq!(items[1].created_at, new_year);

    h.send(WorkflowEvent::Submit);
    h.step().await;

    assert_eq!(h.controller.state(), WorkflowState::ImportSucceeded);
    let requests = h.gateway.captured_requests();
    assert_eq!(requests.len(), 1);
    let sent: serde_json::Value = serde_json::from_str(&requests[0].json_data).unwrap();
    let original: serde_json::Value = serde_json::from_str(LOOSE_EXPORT_JSON).unwrap();
    assert_eq!(sent, original);
}

#[tokio::test]
async fn test_submit_with_nothing_loaded_reports_no_file() {
    let mut h = Harness::new(MockImportGateway::new());

    h.send(WorkflowEvent::Submit);

    assert_eq!(h.controller.state(), WorkflowState::Empty);
    assert_eq!(h.view.status(), WorkflowStatus::error("No file selected"));
    tokio::task::yield_now().await;
    assert_eq!(h.gateway.request_count(), 0);
}

#[tokio::test]
async fn test_rapid_double_submit_sends_one_request() {
    let mut h = Harness::new(MockImportGateway::new().held());
    h.drop_file("export.json", EXPORT_JSON).await;

    h.send(WorkflowEvent::Submit);
    assert!(!h.view.submit_enabled());
    h.send(WorkflowEvent::Submit);
    assert_eq!(
        h.view.status(),
        WorkflowStatus::loading("Importing sessions...")
    );

    h.gateway.release();
    h.step().await;

    assert_eq!(h.gateway.request_count(), 1);
    let importing = h
        .view
        .snapshot()
        .status_history
        .iter()
        .filter(|s| s.message == "Importing sessions...")
        .count();
    assert_eq!(importing, 1);
}

#[tokio::test]
async fn test_gateway_failure_keeps_file_for_retry() {
    let gateway = MockImportGateway::new().respond(ImportResponse::failed("disk full"));
    let mut h = Harness::new(gateway);
    h.drop_file("export.json", EXPORT_JSON).await;

    h.send(WorkflowEvent::Submit);
    h.step().await;

    let status = h.view.status();
    assert_eq!(status.kind, StatusKind::Error);
    assert!(status.message.contains("disk full"));
    assert!(status.message.starts_with("Import failed"));
    assert_eq!(h.controller.state(), WorkflowState::FileReady);
    assert!(h.view.submit_enabled());
    assert!(h.controller.selected_file().is_some());

    // Retry without re-selecting; the default reply is success
    h.send(WorkflowEvent::Submit);
    h.step().await;
    assert_eq!(h.gateway.request_count(), 2);
    assert_eq!(h.controller.state(), WorkflowState::ImportSucceeded);
}

#[tokio::test]
async fn test_transport_failure_is_reported_like_rejection() {
    let gateway = MockImportGateway::new().fail_transport("connection refused");
    let mut h = Harness::new(gateway);
    h.drop_file("export.json", EXPORT_JSON).await;

    h.send(WorkflowEvent::Submit);
    h.step().await;

    let status = h.view.status();
    assert_eq!(status.kind, StatusKind::Error);
    assert!(status.message.contains("connection refused"));
    assert_eq!(h.controller.state(), WorkflowState::FileReady);
    assert!(h.view.submit_enabled());
}

#[tokio::test]
async fn test_failure_without_reason_uses_generic_message() {
    let gateway = MockImportGateway::new().respond(ImportResponse {
        success: false,
        error: None,
    });
    let mut h = Harness::new(gateway);
    h.drop_file("export.json", EXPORT_JSON).await;

    h.send(WorkflowEvent::Submit);
    h.step().await;

    assert_eq!(h.view.status().message, "Import failed: Import failed");
}

#[tokio::test(start_paused = true)]
async fn test_success_clears_after_delay() {
    let mut h = Harness::new(MockImportGateway::new());
    h.drop_file("export.json", EXPORT_JSON).await;

    h.send(WorkflowEvent::Submit);
    h.step().await;

    assert_eq!(h.controller.state(), WorkflowState::ImportSucceeded);
    assert_eq!(
        h.view.status(),
        WorkflowStatus::success("Sessions imported successfully! You can close this tab.")
    );
    assert!(h.controller.selected_file().is_some());

    let started = tokio::time::Instant::now();
    h.step().await;

    assert!(started.elapsed() >= Duration::from_secs(3));
    assert_eq!(h.controller.state(), WorkflowState::Empty);
    assert!(h.controller.selected_file().is_none());
    assert!(h.controller.bundle().is_none());
    let snapshot = h.view.snapshot();
    assert!(snapshot.file_info.is_none());
    assert!(!snapshot.status.is_visible());
    assert!(!snapshot.submit_enabled);
}

#[tokio::test(start_paused = true)]
async fn test_new_intake_cancels_pending_clear() {
    let mut h = Harness::new(MockImportGateway::new());
    h.drop_file("export.json", EXPORT_JSON).await;
    h.send(WorkflowEvent::Submit);
    h.step().await;
    assert_eq!(h.controller.state(), WorkflowState::ImportSucceeded);

    h.drop_file("next.json", EMPTY_EXPORT_JSON).await;
    assert_eq!(h.controller.state(), WorkflowState::FileReady);

    let waited = tokio::time::timeout(Duration::from_secs(10), h.step()).await;
    assert!(waited.is_err(), "no clear should fire for the new file");
    assert_eq!(h.controller.state(), WorkflowState::FileReady);
    assert_eq!(h.controller.selected_file().unwrap().name, "next.json");
}

#[tokio::test]
async fn test_malformed_file_leaves_no_residue() {
    let mut h = Harness::new(MockImportGateway::new());
    h.drop_file("export.json", EXPORT_JSON).await;

    h.drop_file("broken.json", "{\"sessions\": [").await;

    assert_eq!(h.controller.state(), WorkflowState::Empty);
    assert!(h.controller.selected_file().is_none());
    assert!(h.controller.bundle().is_none());
    let snapshot = h.view.snapshot();
    assert!(snapshot.file_info.is_none());
    assert!(snapshot.preview.is_none());
    assert!(!snapshot.submit_enabled);
    assert_eq!(snapshot.status.kind, StatusKind::Error);
    assert!(snapshot.status.message.starts_with("Failed to process file:"));
}

#[tokio::test]
async fn test_missing_sessions_is_invalid_schema() {
    let mut h = Harness::new(MockImportGateway::new());

    h.drop_file("export.json", r#"{"exportDate":"2024-01-01"}"#).await;

    assert_eq!(h.controller.state(), WorkflowState::Empty);
    assert_eq!(
        h.view.status().message,
        "Failed to process file: Invalid file format: missing sessions array"
    );
}

#[tokio::test]
async fn test_empty_sessions_show_placeholder() {
    let mut h = Harness::new(MockImportGateway::new());

    h.drop_file("export.json", EMPTY_EXPORT_JSON).await;

    assert_eq!(h.controller.state(), WorkflowState::FileReady);
    assert_eq!(h.view.snapshot().preview, Some(SessionPreview::Empty));
}

#[tokio::test]
async fn test_display_fallbacks_do_not_reach_payload() {
    let mut h = Harness::new(MockImportGateway::new());
    h.drop_file("export.json", UNNAMED_EXPORT_JSON).await;

    let preview = h.view.snapshot().preview.unwrap();
    let names: Vec<_> = preview.items().iter().map(|i| i.name.clone()).collect();
    assert_eq!(names, vec!["Session 1", "Session 2"]);

    h.send(WorkflowEvent::Submit);
    h.step().await;

    let request = &h.gateway.captured_requests()[0];
    assert_eq!(request.json_data, UNNAMED_EXPORT_JSON);
    assert!(!request.json_data.contains("Session 1"));
}

#[tokio::test]
async fn test_clear_discards_selection() {
    let mut h = Harness::new(MockImportGateway::new());
    h.drop_file("export.json", EXPORT_JSON).await;

    h.send(WorkflowEvent::Clear);

    assert_eq!(h.controller.state(), WorkflowState::Empty);
    assert!(h.controller.selected_file().is_none());
    let snapshot = h.view.snapshot();
    assert!(snapshot.file_info.is_none());
    assert!(!snapshot.status.is_visible());
    assert!(!snapshot.submit_enabled);
}

#[tokio::test]
async fn test_browse_feeds_the_same_intake() {
    let (_, picked) = memory_file("picked.json", EXPORT_JSON);
    let mut h = Harness::with_source(
        MockImportGateway::new(),
        MockFileSource::new().with_pick(picked),
    );

    h.send(WorkflowEvent::Browse);
    h.step().await; // picker result
    assert_eq!(h.controller.state(), WorkflowState::FileLoading);
    h.step().await; // file read

    assert_eq!(h.source.browse_count(), 1);
    assert_eq!(h.controller.state(), WorkflowState::FileReady);
    assert_eq!(h.controller.selected_file().unwrap().name, "picked.json");

    // Dismissed picker leaves state alone
    h.send(WorkflowEvent::Browse);
    h.step().await;
    assert_eq!(h.controller.state(), WorkflowState::FileReady);
}

#[tokio::test]
async fn test_intake_during_import_does_not_disturb_request() {
    let gateway = MockImportGateway::new()
        .held()
        .respond(ImportResponse::failed("disk full"));
    let mut h = Harness::new(gateway);
    h.drop_file("first.json", EXPORT_JSON).await;
    h.send(WorkflowEvent::Submit);

    h.drop_file("second.json", EMPTY_EXPORT_JSON).await;
    assert_eq!(h.controller.state(), WorkflowState::FileReady);
    assert!(h.controller.is_import_in_flight());
    assert!(!h.view.submit_enabled());

    h.gateway.release();
    h.step().await;

    assert!(!h.controller.is_import_in_flight());
    assert_eq!(h.gateway.request_count(), 1);
    assert_eq!(h.gateway.captured_requests()[0].json_data, EXPORT_JSON);
    assert!(h.view.status().message.contains("disk full"));
    assert_eq!(h.controller.state(), WorkflowState::FileReady);
    assert_eq!(h.controller.selected_file().unwrap().name, "second.json");
    assert!(h.view.submit_enabled());
}
