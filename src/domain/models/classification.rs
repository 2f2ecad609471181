//! Classification results and their human review.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Highest number of matching digits a reviewer can confirm (10-digit TARIC code).
pub const MAX_CORRECT_DIGITS: u8 = 10;

/// A stored answer of the image classifier.
///
/// Rows written by the classification backend may lack a timestamp or a
/// filename, so both are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub id: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub filename: Option<String>,
    pub taric_code: Option<String>,
    pub cn_code: Option<String>,
    pub hs_chapter: Option<String>,
    pub confidence: Option<f64>,
    pub short_reason: Option<String>,
    pub alternatives_json: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response_json: Option<String>,
    pub official_match: Option<OfficialMatchReview>,
}

/// A classifier answer that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClassification {
    pub filename: String,
    pub taric_code: Option<String>,
    pub cn_code: Option<String>,
    pub hs_chapter: Option<String>,
    pub confidence: Option<f64>,
    pub short_reason: Option<String>,
    pub alternatives_json: Option<String>,
    pub raw_response_json: String,
}

impl NewClassification {
    /// Extract the stored columns from the model's JSON answer.
    ///
    /// Missing fields stay `None`; the full answer is always kept verbatim.
    pub fn from_model_response(filename: impl Into<String>, response: &Value) -> Self {
        let text = |key: &str| {
            response
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
        };

        let alternatives = response
            .get("possible_alternatives")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));

        Self {
            filename: filename.into(),
            taric_code: text("taric_code"),
            cn_code: text("cn_code"),
            hs_chapter: text("hs_chapter"),
            confidence: response.get("confidence").and_then(Value::as_f64),
            short_reason: text("short_reason"),
            alternatives_json: Some(alternatives.to_string()),
            raw_response_json: response.to_string(),
        }
    }
}

/// A reviewer's verdict on one classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Number of leading digits the classifier got right.
    pub correct_digits: u8,
    pub reviewer: Option<String>,
    pub comment: Option<String>,
    /// Free-form integer score, stored as `superviser_bewertung`.
    pub supervisor_rating: Option<i64>,
}

impl Evaluation {
    pub fn validate(&self) -> Result<(), String> {
        if self.correct_digits > MAX_CORRECT_DIGITS {
            return Err(format!(
                "correct_digits must be between 0 and {MAX_CORRECT_DIGITS}, got {}",
                self.correct_digits
            ));
        }
        Ok(())
    }
}

/// A stored evaluation row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEvaluation {
    pub id: i64,
    #[serde(flatten)]
    pub evaluation: Evaluation,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// How a classifier answer compares to the official description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficialMatch {
    /// Agreement between 0.0 and 1.0.
    pub score: f64,
    pub label: String,
    pub reviewed_by: Option<String>,
}

impl OfficialMatch {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.score) {
            return Err(format!("score must be between 0.0 and 1.0, got {}", self.score));
        }
        if self.label.trim().is_empty() {
            return Err("label cannot be empty".to_string());
        }
        Ok(())
    }
}

/// A persisted [`OfficialMatch`] with its review time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficialMatchReview {
    #[serde(flatten)]
    pub official_match: OfficialMatch,
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Which classifications to list for review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewFilter {
    #[default]
    All,
    Unreviewed,
    Reviewed,
}

/// One line of the review list: a classification with its evaluation, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub classification: ClassificationRecord,
    pub evaluation: Option<StoredEvaluation>,
}
