//! Caller-owned triage session.
//!
//! Holds everything one patient encounter accumulates: intake, chat
//! transcript, triage history and the latest imaging report. The engine
//! never keeps any of it; callers pass the session in and out.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::analysis::{cancel_pair, CancelHandle, CancelSignal};
use crate::error::EngineError;
use crate::models::{ImagingReport, PatientIntake, QueueEntry, Transcript, TriageResult};

/// Permission to deliver one analysis result back into a session.
#[derive(Debug, Clone)]
pub struct AnalysisTicket {
    pub generation: u64,
    pub signal: CancelSignal,
}

#[derive(Debug)]
pub struct TriageSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    pub intake: PatientIntake,
    transcript: Transcript,
    history: Vec<TriageResult>,
    imaging: Option<ImagingReport>,
    generation: u64,
    in_flight: Option<CancelHandle>,
}

impl TriageSession {
    pub fn new(intake: PatientIntake) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            intake,
            transcript: Transcript::new(),
            history: Vec::new(),
            imaging: None,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Take the transcript for a dialogue call; put it back with
    /// [`TriageSession::set_transcript`].
    pub fn take_transcript(&mut self) -> Transcript {
        std::mem::take(&mut self.transcript)
    }

    pub fn set_transcript(&mut self, transcript: Transcript) {
        self.transcript = transcript;
    }

    /// Every triage result recorded in this session, oldest first.
    pub fn history(&self) -> &[TriageResult] {
        &self.history
    }

    pub fn latest_triage(&self) -> Option<&TriageResult> {
        self.history.last()
    }

    pub fn imaging(&self) -> Option<&ImagingReport> {
        self.imaging.as_ref()
    }

    pub fn current_generation(&self) -> u64 {
        self.generation
    }

    pub fn has_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start a new analysis request, superseding any in flight.
    pub fn begin_request(&mut self) -> AnalysisTicket {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
            tracing::debug!(session = %self.id, generation = self.generation, "Superseded in-flight analysis");
        }
        self.generation += 1;
        let (handle, signal) = cancel_pair();
        self.in_flight = Some(handle);
        AnalysisTicket {
            generation: self.generation,
            signal,
        }
    }

    /// Cancel the in-flight request, if any.
    pub fn abandon(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.cancel();
        }
    }

    /// Accept a triage result for the current request only.
    pub fn record_triage(&mut self, generation: u64, result: TriageResult) -> Result<(), EngineError> {
        self.accept(generation)?;
        self.history.push(result);
        Ok(())
    }

    /// Accept an imaging report for the current request only.
    pub fn record_imaging(&mut self, generation: u64, report: ImagingReport) -> Result<(), EngineError> {
        self.accept(generation)?;
        self.imaging = Some(report);
        Ok(())
    }

    /// Queue row for the latest triage result.
    pub fn queue_entry(&self) -> Option<QueueEntry> {
        self.latest_triage()
            .map(|result| QueueEntry::from_result(self.id, &self.intake, result, self.started_at))
    }

    fn accept(&mut self, generation: u64) -> Result<(), EngineError> {
        let stale = generation != self.generation
            || self.in_flight.as_ref().map_or(true, |h| h.is_cancelled());
        if stale {
            tracing::warn!(
                session = %self.id,
                generation,
                current = self.generation,
                "Discarded stale analysis result"
            );
            return Err(EngineError::StaleResult {
                generation,
                current: self.generation,
            });
        }
        self.in_flight = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChatRole, UrgencyTier};

    fn result(tier: UrgencyTier) -> TriageResult {
        TriageResult {
            id: Uuid::new_v4(),
            tier,
            urgency_score: 65,
            confidence: 90,
            conditions: vec!["Viral Syndrome".into()],
            recommendations: vec!["Stay hydrated and rest".into()],
            wait_time: "2-4 hours".into(),
            matched_keywords: vec![],
            severity: 5,
            review_flags: vec![],
            catalog_fingerprint: String::new(),
            created_at: Utc::now(),
        }
    }

    fn session() -> TriageSession {
        TriageSession::new(PatientIntake::new("fever", 5))
    }

    // ───────────────────────────────────────
    // request generations
    // ───────────────────────────────────────

    #[test]
    fn current_request_result_is_recorded() {
        let mut session = session();
        let ticket = session.begin_request();
        session.record_triage(ticket.generation, result(UrgencyTier::Moderate)).unwrap();
        assert_eq!(session.history().len(), 1);
        assert!(!session.has_in_flight());
    }

    #[test]
    fn superseded_request_is_cancelled_and_rejected() {
        let mut session = session();
        let first = session.begin_request();
        let second = session.begin_request();
        assert!(first.signal.is_cancelled());
        assert!(!second.signal.is_cancelled());

        let err = session
            .record_triage(first.generation, result(UrgencyTier::Urgent))
            .unwrap_err();
        assert!(matches!(err, EngineError::StaleResult { generation: 1, current: 2 }));
        assert!(session.history().is_empty());

        session.record_triage(second.generation, result(UrgencyTier::Moderate)).unwrap();
        assert_eq!(session.latest_triage().map(|r| r.tier), Some(UrgencyTier::Moderate));
    }

    #[test]
    fn abandoned_request_is_rejected() {
        let mut session = session();
        let ticket = session.begin_request();
        session.abandon();
        assert!(ticket.signal.is_cancelled());
        assert!(session.record_triage(ticket.generation, result(UrgencyTier::Routine)).is_err());
        assert!(session.history().is_empty());
    }

    #[test]
    fn result_delivered_twice_is_rejected() {
        let mut session = session();
        let ticket = session.begin_request();
        session.record_triage(ticket.generation, result(UrgencyTier::Routine)).unwrap();
        assert!(session.record_triage(ticket.generation, result(UrgencyTier::Routine)).is_err());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn no_request_means_stale() {
        let mut session = session();
        assert!(session.record_triage(0, result(UrgencyTier::Routine)).is_err());
    }

    #[test]
    fn dropping_session_cancels_in_flight() {
        let mut session = session();
        let ticket = session.begin_request();
        drop(session);
        assert!(ticket.signal.is_cancelled());
    }

    // ───────────────────────────────────────
    // history and transcript
    // ───────────────────────────────────────

    #[test]
    fn history_is_append_only() {
        let mut session = session();
        for tier in [UrgencyTier::Routine, UrgencyTier::Urgent] {
            let ticket = session.begin_request();
            session.record_triage(ticket.generation, result(tier)).unwrap();
        }
        let tiers: Vec<UrgencyTier> = session.history().iter().map(|r| r.tier).collect();
        assert_eq!(tiers, vec![UrgencyTier::Routine, UrgencyTier::Urgent]);
    }

    #[test]
    fn transcript_take_and_return() {
        let mut session = session();
        let mut transcript = session.take_transcript();
        transcript.push(ChatRole::Patient, "hello");
        session.set_transcript(transcript);
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn queue_entry_from_latest_result() {
        let mut session = session();
        assert!(session.queue_entry().is_none());
        let ticket = session.begin_request();
        session.record_triage(ticket.generation, result(UrgencyTier::Moderate)).unwrap();
        let entry = session.queue_entry().unwrap();
        assert_eq!(entry.patient_id, session.id());
        assert_eq!(entry.arrival, session.started_at());
        assert_eq!(entry.chief_complaint, "fever");
    }
}
