use intake_bridge::error::EventError;
use intake_bridge::event::StorageEvent;

/// A minimal well-formed event parses and exposes its single record.
#[test]
fn test_parse_event_with_single_record() {
    let raw = r#"{
        "records": [
            { "container": "intake-bucket", "key": "intake/idea-001.json" }
        ]
    }"#;

    let event = StorageEvent::parse(raw).expect("Event should parse");
    let record = event.primary().expect("Event should have a record");

    assert_eq!(record.container, "intake-bucket");
    assert_eq!(record.key, "intake/idea-001.json");
}

/// Platform metadata around the records must not break parsing.
#[test]
fn test_parse_event_ignores_unknown_metadata() {
    let raw = r#"{
        "version": "2.1",
        "emitted_at": "2025-06-02T10:00:00Z",
        "records": [
            {
                "container": "intake-bucket",
                "key": "intake/idea-002.json",
                "etag": "0x8DB9D4",
                "size": 512
            }
        ],
        "region": "westeurope"
    }"#;

    let event = StorageEvent::parse(raw).expect("Extra metadata should be ignored");
    let record = event.primary().expect("Event should have a record");
    assert_eq!(record.key, "intake/idea-002.json");
}

/// Multiple records: the first is handled, the rest are dropped.
#[test]
fn test_primary_record_is_first_of_many() {
    let raw = r#"{
        "records": [
            { "container": "intake-bucket", "key": "intake/first.json" },
            { "container": "intake-bucket", "key": "intake/second.json" }
        ]
    }"#;

    let event = StorageEvent::parse(raw).expect("Event should parse");
    let record = event.primary().expect("Event should have a record");
    assert_eq!(record.key, "intake/first.json");
}

/// An event without records is unusable.
#[test]
fn test_empty_event_is_an_error() {
    let event = StorageEvent::parse(r#"{ "records": [] }"#).expect("Event should parse");
    let err = event.primary().unwrap_err();
    assert!(matches!(err, EventError::Empty));
}

/// A missing records key behaves the same as an empty list.
#[test]
fn test_event_without_records_key_is_empty() {
    let event = StorageEvent::parse(r#"{ "version": "2.1" }"#).expect("Event should parse");
    assert!(matches!(event.primary(), Err(EventError::Empty)));
}

/// Garbage input is a malformed-event error, not a panic.
#[test]
fn test_malformed_event_is_an_error() {
    let err = StorageEvent::parse("this is not json").unwrap_err();
    assert!(matches!(err, EventError::Malformed(_)));
}
