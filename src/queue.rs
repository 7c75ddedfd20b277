//! Clinician queue ordering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::TierTable;
use crate::models::{QueueEntry, UrgencyTier};

/// Dashboard statistics over the current queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSummary {
    pub counts: TierTable<usize>,
    pub total: usize,
    /// Mean time since arrival, whole minutes. `None` for an empty queue.
    pub mean_wait_minutes: Option<i64>,
}

/// Orders triage results for clinician review. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueuePrioritizer;

impl QueuePrioritizer {
    /// Sort by tier (urgent first), then score descending, then arrival
    /// ascending, and assign 1-based display ranks.
    ///
    /// The sort is stable, total over its input, and idempotent.
    pub fn rank(&self, mut entries: Vec<QueueEntry>) -> Vec<QueueEntry> {
        entries.sort_by(|a, b| {
            b.tier
                .cmp(&a.tier)
                .then_with(|| b.urgency_score.cmp(&a.urgency_score))
                .then_with(|| a.arrival.cmp(&b.arrival))
        });
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.display_rank = i + 1;
        }

        tracing::info!(entries = entries.len(), "Queue ranked");
        entries
    }

    pub fn summarize(&self, entries: &[QueueEntry], now: DateTime<Utc>) -> QueueSummary {
        let mut counts = TierTable {
            urgent: 0,
            moderate: 0,
            routine: 0,
        };
        for entry in entries {
            match entry.tier {
                UrgencyTier::Urgent => counts.urgent += 1,
                UrgencyTier::Moderate => counts.moderate += 1,
                UrgencyTier::Routine => counts.routine += 1,
            }
        }

        let mean_wait_minutes = (!entries.is_empty()).then(|| {
            let total: i64 = entries
                .iter()
                .map(|e| (now - e.arrival).num_minutes().max(0))
                .sum();
            total / entries.len() as i64
        });

        QueueSummary {
            counts,
            total: entries.len(),
            mean_wait_minutes,
        }
    }
}
