use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::UrgencyTier;

/// Input defect that was recovered locally and must be shown to a clinician.
///
/// Flags never change the tier; they only ask for human review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReviewFlag {
    /// Severity could not be read as an integer; the scale minimum was used.
    UnparsableSeverity { raw: String },
    /// Severity was a number outside the scale and was clamped.
    SeverityOutOfRange { raw: i64, clamped: u8 },
    /// A vital sign was present but unreadable and was ignored.
    UnparsableVital { field: String },
    /// A vital sign parsed but is physiologically implausible.
    ImplausibleVital { field: String },
}

/// Outcome of one symptom classification. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageResult {
    pub id: Uuid,
    pub tier: UrgencyTier,
    pub urgency_score: u8,
    pub confidence: u8,
    pub conditions: Vec<String>,
    pub recommendations: Vec<String>,
    pub wait_time: String,
    /// Catalog keywords found in the symptom text, critical first.
    pub matched_keywords: Vec<String>,
    /// Severity actually used for the decision.
    pub severity: u8,
    pub review_flags: Vec<ReviewFlag>,
    pub catalog_fingerprint: String,
    pub created_at: DateTime<Utc>,
}

impl TriageResult {
    pub fn needs_review(&self) -> bool {
        !self.review_flags.is_empty()
    }

    /// One-line report heading, e.g. "URGENT priority, score 95/100, wait Immediate".
    pub fn summary(&self) -> String {
        format!(
            "{} priority, score {}/100, wait {}",
            self.tier.as_str().to_uppercase(),
            self.urgency_score,
            self.wait_time
        )
    }
}
