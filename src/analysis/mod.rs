//! Asynchronous analysis envelope.
//!
//! The classifiers are synchronous and pure. Callers that want the
//! product's "analyzing..." behavior wrap them here: a configurable latency,
//! a deadline, and a cancellation signal owned by the session.

pub mod backend;
pub mod cancel;
pub mod envelope;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use backend::{InferenceBackend, RuleBackend};
pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use envelope::run_envelope;

/// Latency and deadline settings for the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub symptom_latency: Duration,
    pub imaging_latency: Duration,
    pub deadline: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            symptom_latency: Duration::from_millis(2500),
            imaging_latency: Duration::from_millis(3000),
            deadline: Duration::from_secs(30),
        }
    }
}

impl AnalysisConfig {
    /// No simulated latency; only the deadline applies.
    pub fn immediate() -> Self {
        Self {
            symptom_latency: Duration::ZERO,
            imaging_latency: Duration::ZERO,
            ..Self::default()
        }
    }
}
