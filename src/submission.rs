//! The submission file format and its validation rules.
//!
//! A submission is a flat JSON object. Six fields are required; anything
//! else in the document is preserved-by-ignoring. Validation collects every
//! violation in one pass so the author gets a single complete report instead
//! of a fix-resubmit loop per field.

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, ValidationError};

/// A parsed submission file. Missing fields deserialise as empty strings and
/// are caught by [`validate`], which also treats explicit empties the same
/// way.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub intent_goal: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub target_quarter: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub tag: String,
}

impl Submission {
    /// Parse raw file bytes into a submission.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, LoadError> {
        let submission = serde_json::from_slice(bytes)?;
        Ok(submission)
    }

    /// The routing key: tag with surrounding whitespace stripped, lower-cased.
    /// Routing table keys are expected in this normalised form.
    pub fn routing_tag(&self) -> String {
        self.tag.trim().to_lowercase()
    }
}

/// Check the six required fields for presence and non-emptiness, reporting
/// every missing field at once.
pub fn validate(submission: &Submission) -> Result<(), ValidationError> {
    let fields: [(&'static str, &str); 6] = [
        ("title", &submission.title),
        ("intent_goal", &submission.intent_goal),
        ("value", &submission.value),
        ("target_quarter", &submission.target_quarter),
        ("author", &submission.author),
        ("tag", &submission.tag),
    ];

    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { missing })
    }
}

/// Render the fixed issue body from the submission's goal and value fields.
/// The template is part of the tracker contract: reconciliation overwrites
/// bodies wholesale, so every invocation must render identically.
pub fn build_issue_body(submission: &Submission) -> String {
    format!(
        "## 🎯 **Goal**\n{}\n\n## 💎 **Value**\n{}",
        submission.intent_goal, submission.value
    )
}
