//! Symptom triage: tier decision from intake text and severity.

pub mod classifier;
pub mod jitter;
pub mod severity;
pub mod vitals;

pub use classifier::SymptomClassifier;
pub use jitter::{DigestJitter, FixedJitter, JitterSource, RngJitter};
pub use severity::{parse_severity, ParsedSeverity};
pub use vitals::{parse_vitals, BloodPressure, ParsedVitals};
