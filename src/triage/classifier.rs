use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::catalog::{CatalogError, RuleCatalog};
use crate::error::EngineError;
use crate::models::{PatientIntake, TriageResult, UrgencyTier};

use super::jitter::JitterSource;
use super::severity::parse_severity;
use super::vitals::parse_vitals;

/// Rule-driven symptom triage over a shared catalog.
#[derive(Debug, Clone)]
pub struct SymptomClassifier {
    catalog: Arc<RuleCatalog>,
    fingerprint: String,
}

/// Keywords found in normalized symptom text, split by catalog set.
#[derive(Debug, Default, PartialEq, Eq)]
struct KeywordMatches {
    critical: Vec<String>,
    moderate: Vec<String>,
}

impl SymptomClassifier {
    pub fn new(catalog: Arc<RuleCatalog>) -> Result<Self, CatalogError> {
        let fingerprint = catalog.fingerprint()?;
        Ok(Self {
            catalog,
            fingerprint,
        })
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Fingerprint of the catalog, stamped on every result.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Classify one intake into a tier, score, conditions and actions.
    ///
    /// Tier precedence is fixed, first match wins:
    /// urgent (critical keyword or severity >= critical threshold), then
    /// moderate (moderate keyword or severity >= moderate threshold), then routine.
    pub fn classify(
        &self,
        intake: &PatientIntake,
        request_id: Uuid,
        jitter: &mut dyn JitterSource,
    ) -> Result<TriageResult, EngineError> {
        let text = intake
            .symptom_text()
            .ok_or_else(|| EngineError::InvalidInput("symptom text is empty".into()))?;
        let normalized = text.to_lowercase();

        let catalog = &*self.catalog;
        let mut review_flags = Vec::new();

        let severity = parse_severity(&intake.severity, catalog.severity_scale);
        if let Some(flag) = severity.flag {
            tracing::warn!(request_id = %request_id, ?flag, "Severity recovered to a safe value");
            review_flags.push(flag);
        }

        let (_, vital_flags) = parse_vitals(&intake.vitals);
        if !vital_flags.is_empty() {
            tracing::warn!(
                request_id = %request_id,
                flagged = vital_flags.len(),
                "Vitals need clinician review"
            );
        }
        review_flags.extend(vital_flags);

        let matches = self.match_keywords(&normalized);
        let tier = self.decide_tier(&matches, severity.value);

        tracing::debug!(
            request_id = %request_id,
            critical_matches = matches.critical.len(),
            moderate_matches = matches.moderate.len(),
            severity = severity.value,
            "Rules evaluated"
        );

        let range = catalog.confidence_jitter_range;
        let offset = jitter.next_jitter(request_id, range.min, range.max);
        let confidence = clamp_percent(catalog.confidence_base as u16 + offset as u16);
        let urgency_score = clamp_percent(*catalog.tier_scores.get(tier) as u16);

        let result = TriageResult {
            id: request_id,
            tier,
            urgency_score,
            confidence,
            conditions: catalog.tier_conditions.get(tier).clone(),
            recommendations: catalog.tier_recommendations.get(tier).clone(),
            wait_time: catalog.tier_wait_time.get(tier).clone(),
            matched_keywords: matches.critical.into_iter().chain(matches.moderate).collect(),
            severity: severity.value,
            review_flags,
            catalog_fingerprint: self.fingerprint.clone(),
            created_at: Utc::now(),
        };

        tracing::info!(
            request_id = %request_id,
            tier = %result.tier,
            score = result.urgency_score,
            confidence = result.confidence,
            needs_review = result.needs_review(),
            "Symptom triage complete"
        );

        Ok(result)
    }

    fn match_keywords(&self, normalized: &str) -> KeywordMatches {
        let found = |keywords: &[String]| -> Vec<String> {
            keywords
                .iter()
                .filter(|k| normalized.contains(k.as_str()))
                .cloned()
                .collect()
        };
        KeywordMatches {
            critical: found(&self.catalog.critical_keywords),
            moderate: found(&self.catalog.moderate_keywords),
        }
    }

    fn decide_tier(&self, matches: &KeywordMatches, severity: u8) -> UrgencyTier {
        let thresholds = self.catalog.severity_thresholds;
        if !matches.critical.is_empty() || severity >= thresholds.critical {
            UrgencyTier::Urgent
        } else if !matches.moderate.is_empty() || severity >= thresholds.moderate {
            UrgencyTier::Moderate
        } else {
            UrgencyTier::Routine
        }
    }
}

fn clamp_percent(value: u16) -> u8 {
    value.min(100) as u8
}
