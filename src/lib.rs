pub mod config;
pub mod error;
pub mod models;
pub mod catalog; // Rule tables, JSON loading, fingerprint
pub mod triage; // Symptom classifier
pub mod dialogue; // Clarifying questions
pub mod imaging; // Format gate + ranked candidates
pub mod queue; // Clinician queue
pub mod analysis; // Latency / deadline / cancellation envelope
pub mod session;
pub mod engine;

pub use catalog::{CatalogError, RuleCatalog};
pub use engine::TriageEngine;
pub use error::EngineError;
pub use session::{AnalysisTicket, TriageSession};
