use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::UrgencyTier;
use super::intake::PatientIntake;
use super::triage::TriageResult;

/// One row of the clinician queue.
///
/// Derived from a triage result on every query and never stored as
/// authoritative state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub patient_id: Uuid,
    pub result_id: Uuid,
    pub name: Option<String>,
    pub age: Option<u32>,
    pub chief_complaint: String,
    pub tier: UrgencyTier,
    pub urgency_score: u8,
    pub arrival: DateTime<Utc>,
    /// 1-based position assigned by the last ranking; 0 until ranked.
    pub display_rank: usize,
}

impl QueueEntry {
    pub fn from_result(
        patient_id: Uuid,
        intake: &PatientIntake,
        result: &TriageResult,
        arrival: DateTime<Utc>,
    ) -> Self {
        Self {
            patient_id,
            result_id: result.id,
            name: intake.name.clone(),
            age: intake.age,
            chief_complaint: intake.symptoms.trim().to_string(),
            tier: result.tier,
            urgency_score: result.urgency_score.min(100),
            arrival,
            display_rank: 0,
        }
    }
}
