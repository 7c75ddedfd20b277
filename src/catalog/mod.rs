//! Rule catalog: the read-only policy tables the classifiers consult.
//!
//! Thresholds, keyword sets and text tables live here so the classification
//! algorithms carry no embedded policy. A catalog is loaded once, validated,
//! and shared behind an `Arc`; nothing mutates it afterwards.

pub mod defaults;

use std::path::Path;
use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::models::UrgencyTier;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

/// One value per urgency tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable<T> {
    pub urgent: T,
    pub moderate: T,
    pub routine: T,
}

impl<T> TierTable<T> {
    pub fn get(&self, tier: UrgencyTier) -> &T {
        match tier {
            UrgencyTier::Urgent => &self.urgent,
            UrgencyTier::Moderate => &self.moderate,
            UrgencyTier::Routine => &self.routine,
        }
    }
}

/// A tier table as written in a catalog file: any tier may be omitted.
#[derive(Debug, Deserialize)]
struct TierOverrides<T> {
    urgent: Option<T>,
    moderate: Option<T>,
    routine: Option<T>,
}

impl<T> TierOverrides<T> {
    fn over(self, base: TierTable<T>) -> TierTable<T> {
        TierTable {
            urgent: self.urgent.unwrap_or(base.urgent),
            moderate: self.moderate.unwrap_or(base.moderate),
            routine: self.routine.unwrap_or(base.routine),
        }
    }
}

fn tier_scores<'de, D: Deserializer<'de>>(d: D) -> Result<TierTable<u8>, D::Error> {
    Ok(TierOverrides::deserialize(d)?.over(defaults::TIER_SCORES))
}

fn tier_conditions<'de, D: Deserializer<'de>>(d: D) -> Result<TierTable<Vec<String>>, D::Error> {
    Ok(TierOverrides::deserialize(d)?.over(defaults::tier_conditions()))
}

fn tier_recommendations<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<TierTable<Vec<String>>, D::Error> {
    Ok(TierOverrides::deserialize(d)?.over(defaults::tier_recommendations()))
}

fn tier_wait_time<'de, D: Deserializer<'de>>(d: D) -> Result<TierTable<String>, D::Error> {
    Ok(TierOverrides::deserialize(d)?.over(defaults::tier_wait_time()))
}

/// Minimum severity for each escalated tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityThresholds {
    pub critical: u8,
    pub moderate: u8,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            critical: defaults::SEVERITY_CRITICAL,
            moderate: defaults::SEVERITY_MODERATE,
        }
    }
}

/// Inclusive bounds of the patient-reported severity scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityScale {
    pub min: u8,
    pub max: u8,
}

impl Default for SeverityScale {
    fn default() -> Self {
        Self {
            min: defaults::SEVERITY_MIN,
            max: defaults::SEVERITY_MAX,
        }
    }
}

/// Inclusive bounds of the confidence jitter added to the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JitterRange {
    pub min: u8,
    pub max: u8,
}

impl Default for JitterRange {
    fn default() -> Self {
        Self {
            min: defaults::JITTER_MIN,
            max: defaults::JITTER_MAX,
        }
    }
}

/// A fixed imaging hypothesis the stub classifier emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTemplate {
    pub condition: String,
    pub confidence: u8,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// A dialogue keyword and the clarifying question it triggers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueTrigger {
    pub keyword: String,
    pub reply: String,
}

/// The complete decision policy.
///
/// JSON field names are camelCase (`criticalKeywords`, `severityThresholds`,
/// `tierWaitTime`, ...). Absent fields take the built-in defaults, and so
/// do absent tiers inside a tier table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleCatalog {
    pub critical_keywords: Vec<String>,
    pub moderate_keywords: Vec<String>,
    pub severity_thresholds: SeverityThresholds,
    pub severity_scale: SeverityScale,
    #[serde(deserialize_with = "tier_scores")]
    pub tier_scores: TierTable<u8>,
    #[serde(deserialize_with = "tier_conditions")]
    pub tier_conditions: TierTable<Vec<String>>,
    #[serde(deserialize_with = "tier_recommendations")]
    pub tier_recommendations: TierTable<Vec<String>>,
    #[serde(deserialize_with = "tier_wait_time")]
    pub tier_wait_time: TierTable<String>,
    pub imaging_candidates: Vec<CandidateTemplate>,
    pub imaging_actionable_threshold: u8,
    pub confidence_base: u8,
    pub confidence_jitter_range: JitterRange,
    /// Checked in order; the first keyword found wins.
    pub dialogue_triggers: Vec<DialogueTrigger>,
    pub dialogue_fallback: String,
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self {
            critical_keywords: defaults::owned(defaults::CRITICAL_KEYWORDS),
            moderate_keywords: defaults::owned(defaults::MODERATE_KEYWORDS),
            severity_thresholds: SeverityThresholds::default(),
            severity_scale: SeverityScale::default(),
            tier_scores: defaults::TIER_SCORES,
            tier_conditions: defaults::tier_conditions(),
            tier_recommendations: defaults::tier_recommendations(),
            tier_wait_time: defaults::tier_wait_time(),
            imaging_candidates: defaults::imaging_candidates(),
            imaging_actionable_threshold: defaults::IMAGING_ACTIONABLE_THRESHOLD,
            confidence_base: defaults::CONFIDENCE_BASE,
            confidence_jitter_range: JitterRange::default(),
            dialogue_triggers: defaults::dialogue_triggers(),
            dialogue_fallback: defaults::DIALOGUE_FALLBACK.to_string(),
        }
    }
}

static BUILTIN: LazyLock<Arc<RuleCatalog>> = LazyLock::new(|| Arc::new(RuleCatalog::default()));

impl RuleCatalog {
    /// The shared built-in catalog.
    pub fn builtin() -> Arc<RuleCatalog> {
        Arc::clone(&BUILTIN)
    }

    /// Parse, normalize and validate a JSON catalog.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let catalog: RuleCatalog = serde_json::from_str(json)?;
        catalog.prepared()
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&json)?;
        let fingerprint = catalog.fingerprint()?;
        tracing::info!(
            path = %path.display(),
            fingerprint = %fingerprint,
            "Rule catalog loaded"
        );
        Ok(catalog)
    }

    /// Normalize and validate a catalog built in code.
    pub fn prepared(mut self) -> Result<Self, CatalogError> {
        self.normalize();
        self.validate()?;
        Ok(self)
    }

    /// Lowercase and trim keywords, dropping blanks.
    fn normalize(&mut self) {
        normalize_keywords(&mut self.critical_keywords);
        normalize_keywords(&mut self.moderate_keywords);
        for trigger in &mut self.dialogue_triggers {
            trigger.keyword = trigger.keyword.trim().to_lowercase();
        }
        self.dialogue_triggers.retain(|t| !t.keyword.is_empty());
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let scale = self.severity_scale;
        if scale.min > scale.max {
            return Err(invalid(format!(
                "severityScale min {} exceeds max {}",
                scale.min, scale.max
            )));
        }

        let thresholds = self.severity_thresholds;
        for (name, value) in [("critical", thresholds.critical), ("moderate", thresholds.moderate)] {
            if value < scale.min || value > scale.max {
                return Err(invalid(format!(
                    "severityThresholds.{name} = {value} is outside the {}-{} scale",
                    scale.min, scale.max
                )));
            }
        }
        if thresholds.moderate > thresholds.critical {
            return Err(invalid(format!(
                "severityThresholds.moderate ({}) exceeds critical ({})",
                thresholds.moderate, thresholds.critical
            )));
        }

        for tier in UrgencyTier::ALL {
            if self.tier_conditions.get(tier).is_empty() {
                return Err(invalid(format!("tierConditions.{tier} is empty")));
            }
            if self.tier_recommendations.get(tier).is_empty() {
                return Err(invalid(format!("tierRecommendations.{tier} is empty")));
            }
            if self.tier_wait_time.get(tier).trim().is_empty() {
                return Err(invalid(format!("tierWaitTime.{tier} is empty")));
            }
        }

        let jitter = self.confidence_jitter_range;
        if jitter.min > jitter.max {
            return Err(invalid(format!(
                "confidenceJitterRange min {} exceeds max {}",
                jitter.min, jitter.max
            )));
        }

        if let Some(pos) = self
            .imaging_candidates
            .iter()
            .position(|c| c.condition.trim().is_empty())
        {
            return Err(invalid(format!("imagingCandidates[{pos}] has no condition")));
        }

        Ok(())
    }

    /// SHA-256 hex digest of the catalog's JSON form.
    ///
    /// Stamped on every result so a decision can be traced to the exact
    /// policy that produced it.
    pub fn fingerprint(&self) -> Result<String, CatalogError> {
        let bytes = serde_json::to_vec(self)?;
        Ok(format!("{:x}", Sha256::digest(&bytes)))
    }

    /// Lowest severity on the scale; the value used for unreadable input.
    pub fn min_severity(&self) -> u8 {
        self.severity_scale.min
    }
}

fn normalize_keywords(keywords: &mut Vec<String>) {
    for keyword in keywords.iter_mut() {
        *keyword = keyword.trim().to_lowercase();
    }
    keywords.retain(|k| !k.is_empty());
}

fn invalid(message: String) -> CatalogError {
    CatalogError::Invalid(message)
}
