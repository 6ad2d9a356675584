use intake_bridge::error::LoadError;
use intake_bridge::submission::{build_issue_body, validate, Submission};

fn complete_submission_json() -> &'static str {
    r#"{
        "title": "Self-serve onboarding",
        "intent_goal": "Let new customers activate without a sales call",
        "value": "Cuts onboarding cost and shortens time-to-value",
        "target_quarter": "2025-Q3",
        "author": "jdoe",
        "tag": "Growth"
    }"#
}

/// A complete submission parses and passes validation.
#[test]
fn test_complete_submission_is_valid() {
    let submission = Submission::from_slice(complete_submission_json().as_bytes())
        .expect("Submission should parse");
    validate(&submission).expect("Complete submission should validate");

    assert_eq!(submission.title, "Self-serve onboarding");
    assert_eq!(submission.author, "jdoe");
}

/// Unknown fields in the file are ignored, not rejected.
#[test]
fn test_extra_fields_are_ignored() {
    let raw = r#"{
        "title": "Self-serve onboarding",
        "intent_goal": "Goal",
        "value": "Value",
        "target_quarter": "2025-Q3",
        "author": "jdoe",
        "tag": "growth",
        "priority": "high",
        "attachments": ["a.png"]
    }"#;

    let submission = Submission::from_slice(raw.as_bytes()).expect("Submission should parse");
    validate(&submission).expect("Extra fields must not fail validation");
}

/// An absent field and an explicitly empty field are the same violation.
#[test]
fn test_missing_and_empty_fields_are_equivalent() {
    let absent = br#"{
        "title": "No author here",
        "intent_goal": "Goal",
        "value": "Value",
        "target_quarter": "2025-Q3",
        "tag": "growth"
    }"#;
    let empty = br#"{
        "title": "No author here",
        "intent_goal": "Goal",
        "value": "Value",
        "target_quarter": "2025-Q3",
        "author": "",
        "tag": "growth"
    }"#;

    for raw in [&absent[..], &empty[..]] {
        let submission = Submission::from_slice(raw).expect("Submission should parse");
        let err = validate(&submission).unwrap_err();
        assert_eq!(err.missing, vec!["author"]);
    }
}

/// Validation reports every missing field in one pass.
#[test]
fn test_validation_collects_all_missing_fields() {
    let raw = br#"{ "title": "Only a title" }"#;
    let submission = Submission::from_slice(raw).expect("Submission should parse");

    let err = validate(&submission).unwrap_err();
    assert_eq!(
        err.missing,
        vec!["intent_goal", "value", "target_quarter", "author", "tag"]
    );

    let msg = err.to_string();
    assert!(
        msg.contains("intent_goal") && msg.contains("tag"),
        "Error message should name every missing field, got: {msg}"
    );
}

/// The routing key is the trimmed, lower-cased tag.
#[test]
fn test_routing_tag_is_normalised() {
    let submission = Submission {
        tag: "  GrOwTh \n".to_string(),
        ..Default::default()
    };
    assert_eq!(submission.routing_tag(), "growth");
}

/// The issue body template is fixed and byte-stable across invocations.
#[test]
fn test_issue_body_template() {
    let submission = Submission {
        intent_goal: "Let new customers activate without a sales call".to_string(),
        value: "Cuts onboarding cost".to_string(),
        ..Default::default()
    };

    assert_eq!(
        build_issue_body(&submission),
        "## 🎯 **Goal**\nLet new customers activate without a sales call\n\n## 💎 **Value**\nCuts onboarding cost"
    );
}

/// Non-JSON bytes surface as a malformed-file error.
#[test]
fn test_malformed_submission_is_an_error() {
    let err = Submission::from_slice(b"title: yaml-not-json").unwrap_err();
    assert!(matches!(err, LoadError::Malformed(_)));
}

/// A JSON document that is not an object is also malformed.
#[test]
fn test_non_object_submission_is_an_error() {
    let err = Submission::from_slice(b"[1, 2, 3]").unwrap_err();
    assert!(matches!(err, LoadError::Malformed(_)));
}
