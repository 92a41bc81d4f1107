//! Property tests for intake validation
//!
//! Every rejected file must leave the workflow empty with a visible error,
//! whatever its name or content.

use proptest::prelude::*;
use serde_json::{json, Value};

use session_import::import::mock::MockImportGateway;
use session_import::import::ImportError;
use session_import::workflow::{StatusKind, WorkflowEvent, WorkflowState};

use super::common::{memory_file, Harness, EXPORT_JSON};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime")
}

/// Anything a `sessions` field can hold that is not an array
fn non_array_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,12}".prop_map(Value::from),
        "[a-z]{1,6}".prop_map(|key| {
            let mut object = serde_json::Map::new();
            object.insert(key, json!([]));
            Value::Object(object)
        }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_non_json_names_rejected_before_read(
        name in "[A-Za-z0-9_. -]{0,24}"
            .prop_filter("must not end in .json", |n| !n.to_lowercase().ends_with(".json"))
    ) {
        let mut h = Harness::new(MockImportGateway::new());
        let (file, handle) = memory_file(&name, EXPORT_JSON);

        h.send(WorkflowEvent::InputChanged(vec![handle]));

        prop_assert_eq!(h.controller.state(), WorkflowState::Empty);
        prop_assert_eq!(h.view.status().message, "Please select a JSON file.");
        prop_assert_eq!(file.read_count(), 0);
    }

    #[test]
    fn prop_json_extension_matched_in_any_case(
        stem in "[a-z0-9]{1,10}",
        ext in "[jJ][sS][oO][nN]",
    ) {
        let rt = runtime();
        rt.block_on(async {
            let mut h = Harness::new(MockImportGateway::new());
            let file = h.drop_file(&format!("{}.{}", stem, ext), EXPORT_JSON).await;

            assert_eq!(file.read_count(), 1);
            assert_eq!(h.controller.state(), WorkflowState::FileReady);
        });
    }

    #[test]
    fn prop_undecodable_text_is_malformed(
        text in ".{0,40}".prop_filter("must not be valid JSON", |t| {
            serde_json::from_str::<Value>(t).is_err()
        })
    ) {
        let rt = runtime();
        rt.block_on(async {
            let mut h = Harness::new(MockImportGateway::new());
            h.drop_file("export.json", &text).await;

            let expected = serde_json::from_str::<Value>(&text)
                .map_err(ImportError::from)
                .unwrap_err();
            assert!(matches!(expected, ImportError::MalformedPayload(_)));

            assert_eq!(h.controller.state(), WorkflowState::Empty);
            assert!(h.controller.selected_file().is_none());
            assert_eq!(h.view.status().kind, StatusKind::Error);
            assert_eq!(h.view.status().message, expected.to_string());
        });
    }

    #[test]
    fn prop_missing_or_non_array_sessions_is_invalid_schema(
        sessions in prop::option::of(non_array_value())
    ) {
        let mut document = json!({ "exportDate": "2024-01-01", "version": "1" });
        if let Some(sessions) = sessions {
            document["sessions"] = sessions;
        }
        let text = document.to_string();

        let rt = runtime();
        rt.block_on(async {
            let mut h = Harness::new(MockImportGateway::new());
            h.drop_file("export.json", &text).await;

            assert_eq!(h.controller.state(), WorkflowState::Empty);
            assert!(h.controller.bundle().is_none());
            assert!(h
                .view
                .status()
                .message
                .contains("Invalid file format"));
        });
    }
}
