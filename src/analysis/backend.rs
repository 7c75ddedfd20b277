use std::sync::Arc;

use uuid::Uuid;

use crate::catalog::{CatalogError, RuleCatalog};
use crate::error::EngineError;
use crate::imaging::ImagingClassifier;
use crate::models::{ImageRef, ImagingReport, PatientIntake, TriageResult};
use crate::triage::{DigestJitter, SymptomClassifier};

/// Inference seam behind the asynchronous envelope.
///
/// Called from inside the envelope after the simulated latency. A failure
/// must come back as an error, never as a guessed tier.
pub trait InferenceBackend: Send + Sync {
    fn name(&self) -> &str;

    fn triage(&self, intake: &PatientIntake, request_id: Uuid) -> Result<TriageResult, EngineError>;

    fn imaging(&self, image: &ImageRef) -> Result<ImagingReport, EngineError>;
}

/// The catalog-driven classifiers.
///
/// Confidence jitter is derived from the request id, so the backend is
/// reproducible without holding generator state.
#[derive(Debug, Clone)]
pub struct RuleBackend {
    symptoms: SymptomClassifier,
    imaging: ImagingClassifier,
}

impl RuleBackend {
    pub fn new(catalog: Arc<RuleCatalog>) -> Result<Self, CatalogError> {
        Ok(Self {
            symptoms: SymptomClassifier::new(Arc::clone(&catalog))?,
            imaging: ImagingClassifier::new(catalog),
        })
    }
}

impl InferenceBackend for RuleBackend {
    fn name(&self) -> &str {
        "rules"
    }

    fn triage(&self, intake: &PatientIntake, request_id: Uuid) -> Result<TriageResult, EngineError> {
        self.symptoms.classify(intake, request_id, &mut DigestJitter)
    }

    fn imaging(&self, image: &ImageRef) -> Result<ImagingReport, EngineError> {
        self.imaging.report(image)
    }
}
