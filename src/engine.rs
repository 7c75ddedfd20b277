//! Engine facade: the operations the view layer calls.
//!
//! Stateless apart from the read-only catalog. Sessions, transcripts and
//! queues belong to the caller and are passed in on every call.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::analysis::{run_envelope, AnalysisConfig, CancelSignal, InferenceBackend, RuleBackend};
use crate::catalog::RuleCatalog;
use crate::dialogue::DialogueAssistant;
use crate::error::EngineError;
use crate::imaging::ImagingClassifier;
use crate::models::{
    DiagnosticCandidate, ImageRef, ImagingReport, PatientIntake, QueueEntry, Transcript,
    TriageResult,
};
use crate::queue::{QueuePrioritizer, QueueSummary};
use crate::session::TriageSession;
use crate::triage::{DigestJitter, JitterSource, SymptomClassifier};

#[derive(Clone)]
pub struct TriageEngine {
    catalog: Arc<RuleCatalog>,
    symptoms: SymptomClassifier,
    dialogue: DialogueAssistant,
    imaging: ImagingClassifier,
    queue: QueuePrioritizer,
    backend: Arc<dyn InferenceBackend>,
    analysis: AnalysisConfig,
}

impl std::fmt::Debug for TriageEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriageEngine")
            .field("catalog", &self.symptoms.fingerprint())
            .field("backend", &self.backend.name())
            .field("analysis", &self.analysis)
            .finish()
    }
}

impl TriageEngine {
    pub fn new(catalog: Arc<RuleCatalog>) -> Result<Self, EngineError> {
        Ok(Self {
            symptoms: SymptomClassifier::new(Arc::clone(&catalog))?,
            dialogue: DialogueAssistant::new(Arc::clone(&catalog)),
            imaging: ImagingClassifier::new(Arc::clone(&catalog)),
            queue: QueuePrioritizer,
            backend: Arc::new(RuleBackend::new(Arc::clone(&catalog))?),
            analysis: AnalysisConfig::default(),
            catalog,
        })
    }

    /// Engine over the built-in catalog.
    pub fn builtin() -> Result<Self, EngineError> {
        Self::new(RuleCatalog::builtin())
    }

    /// Engine over a catalog file. Fails if the file is missing, malformed,
    /// or describes an inconsistent policy.
    pub fn from_catalog_path(path: &Path) -> Result<Self, EngineError> {
        let catalog = RuleCatalog::from_path(path)?;
        Self::new(Arc::new(catalog))
    }

    pub fn with_backend(mut self, backend: Arc<dyn InferenceBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_analysis_config(mut self, analysis: AnalysisConfig) -> Self {
        self.analysis = analysis;
        self
    }

    pub fn catalog(&self) -> &Arc<RuleCatalog> {
        &self.catalog
    }

    pub fn analysis_config(&self) -> AnalysisConfig {
        self.analysis
    }

    // ── Synchronous operations ──────────────────────────────────

    /// Classify an intake under a fresh request id.
    pub fn classify_symptoms(&self, intake: &PatientIntake) -> Result<TriageResult, EngineError> {
        self.classify_symptoms_with(intake, Uuid::new_v4(), &mut DigestJitter)
    }

    /// Classify with an explicit request id and jitter source.
    pub fn classify_symptoms_with(
        &self,
        intake: &PatientIntake,
        request_id: Uuid,
        jitter: &mut dyn JitterSource,
    ) -> Result<TriageResult, EngineError> {
        self.symptoms.classify(intake, request_id, jitter)
    }

    pub fn send_chat_message(
        &self,
        transcript: Transcript,
        message: &str,
    ) -> Result<(Transcript, String), EngineError> {
        self.dialogue.respond(transcript, message)
    }

    /// Send a chat message within a session, updating its transcript.
    ///
    /// On error the session transcript is left as it was.
    pub fn chat_in_session(&self, session: &mut TriageSession, message: &str) -> Result<String, EngineError> {
        let transcript = session.transcript().clone();
        let (transcript, reply) = self.dialogue.respond(transcript, message)?;
        session.set_transcript(transcript);
        Ok(reply)
    }

    pub fn classify_image(&self, image: &ImageRef) -> Result<Vec<DiagnosticCandidate>, EngineError> {
        self.imaging.classify(image)
    }

    pub fn imaging_report(&self, image: &ImageRef) -> Result<ImagingReport, EngineError> {
        self.imaging.report(image)
    }

    pub fn rank_queue(&self, entries: Vec<QueueEntry>) -> Vec<QueueEntry> {
        self.queue.rank(entries)
    }

    pub fn queue_summary(&self, entries: &[QueueEntry], now: DateTime<Utc>) -> QueueSummary {
        self.queue.summarize(entries, now)
    }

    /// Rank the latest result of every session that has one.
    pub fn rank_sessions<'a>(&self, sessions: impl IntoIterator<Item = &'a TriageSession>) -> Vec<QueueEntry> {
        let entries = sessions.into_iter().filter_map(TriageSession::queue_entry).collect();
        self.queue.rank(entries)
    }

    // ── Asynchronous envelope ───────────────────────────────────

    /// Symptom triage through the backend, after the configured latency.
    pub async fn analyze_symptoms(
        &self,
        intake: PatientIntake,
        signal: CancelSignal,
    ) -> Result<TriageResult, EngineError> {
        let request_id = Uuid::new_v4();
        let backend = Arc::clone(&self.backend);
        tracing::debug!(request_id = %request_id, backend = backend.name(), "Symptom analysis started");

        let work = async move { backend.triage(&intake, request_id) };
        run_envelope(self.analysis.symptom_latency, self.analysis.deadline, signal, work).await
    }

    /// Imaging classification through the backend, after the configured latency.
    pub async fn analyze_image(
        &self,
        image: ImageRef,
        signal: CancelSignal,
    ) -> Result<ImagingReport, EngineError> {
        let backend = Arc::clone(&self.backend);
        tracing::debug!(backend = backend.name(), "Imaging analysis started");

        let work = async move { backend.imaging(&image) };
        run_envelope(self.analysis.imaging_latency, self.analysis.deadline, signal, work).await
    }

    /// Run symptom analysis for a session and record the result.
    ///
    /// Starting this supersedes any request already in flight for the session.
    pub async fn triage_session(&self, session: &mut TriageSession) -> Result<TriageResult, EngineError> {
        let ticket = session.begin_request();
        let result = self
            .analyze_symptoms(session.intake.clone(), ticket.signal.clone())
            .await?;
        session.record_triage(ticket.generation, result.clone())?;
        Ok(result)
    }

    /// Run imaging analysis for a session and record the report.
    pub async fn image_session(
        &self,
        session: &mut TriageSession,
        image: ImageRef,
    ) -> Result<ImagingReport, EngineError> {
        let ticket = session.begin_request();
        let report = self.analyze_image(image, ticket.signal.clone()).await?;
        session.record_imaging(ticket.generation, report.clone())?;
        Ok(report)
    }
}
