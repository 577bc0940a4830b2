use serde_json::{json, Value};

use crate::domain::{Dataset, FlashKind, TransferState};
use crate::error::ChannelError;
use crate::protocol::{reposition_params, ServerEvent};

fn dataset(pairs: &[(&str, &str)]) -> Dataset {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn reposition_params_carry_indices_and_both_attribute_sets() {
    let container = dataset(&[("group", "lessons"), ("section", "intro")]);
    let item = dataset(&[("id", "lesson-42")]);

    let params = reposition_params(2, 0, &container, &item);

    assert_eq!(params["old"], json!(2));
    assert_eq!(params["new"], json!(0));
    assert_eq!(params["group"], json!("lessons"));
    assert_eq!(params["section"], json!("intro"));
    assert_eq!(params["id"], json!("lesson-42"));
}

#[test]
fn reposition_params_item_attributes_win_collisions() {
    let container = dataset(&[("section", "intro"), ("owner", "container")]);
    let item = dataset(&[("owner", "item")]);

    let params = reposition_params(1, 3, &container, &item);

    assert_eq!(params["owner"], json!("item"));
    assert_eq!(params["section"], json!("intro"));
}

#[test]
fn reposition_params_indices_survive_dataset_shadowing() {
    let container = dataset(&[("old", "9")]);
    let item = dataset(&[("new", "9")]);

    let params = reposition_params(2, 0, &container, &item);

    assert_eq!(params["old"], json!(2));
    assert_eq!(params["new"], json!(0));
}

#[test]
fn server_event_decodes_option_selected() {
    let event = ServerEvent::from_wire("option-selected", &json!({ "isCorrect": true }));
    assert_eq!(event, Some(ServerEvent::OptionSelected { is_correct: true }));

    let event = ServerEvent::from_wire("option-selected", &json!({ "isCorrect": false }));
    assert_eq!(event, Some(ServerEvent::OptionSelected { is_correct: false }));
}

#[test]
fn server_event_ignores_unknown_names_and_malformed_payloads() {
    assert_eq!(ServerEvent::from_wire("page-loaded", &json!({})), None);
    assert_eq!(
        ServerEvent::from_wire("option-selected", &json!({ "isCorrect": "yes" })),
        None
    );
    assert_eq!(ServerEvent::from_wire("option-selected", &Value::Null), None);
}

#[test]
fn flash_kind_parses_known_kinds_only() {
    assert_eq!(FlashKind::parse("info"), Some(FlashKind::Info));
    assert_eq!(FlashKind::parse("error"), Some(FlashKind::Error));
    assert_eq!(FlashKind::parse("warning"), None);
    assert_eq!(FlashKind::Info.as_str(), "info");
}

#[test]
fn dataset_inserts_and_reads_attributes() {
    let mut attrs = Dataset::default();
    assert!(attrs.is_empty());
    attrs.insert("group", "lessons");
    assert_eq!(attrs.get("group"), Some("lessons"));
    assert_eq!(attrs.get("drop"), None);
}

#[test]
fn channel_errors_render_their_cause() {
    assert_eq!(ChannelError::Detached.to_string(), "live channel detached");
    assert_eq!(
        ChannelError::Serialization("bad params".to_string()).to_string(),
        "failed to encode event params: bad params"
    );
}

#[test]
fn transfer_state_terminality() {
    assert!(!TransferState::Pending.is_terminal());
    assert!(TransferState::Success.is_terminal());
    assert!(TransferState::Failed.is_terminal());
}
