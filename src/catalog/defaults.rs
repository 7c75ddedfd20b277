//! Built-in rule tables.
//!
//! These are the values the engine ships with. A catalog file only needs to
//! name the fields it overrides; everything else comes from here.

use super::{CandidateTemplate, DialogueTrigger, TierTable};

// ── Keyword sets ────────────────────────────────────────────

pub static CRITICAL_KEYWORDS: &[&str] = &[
    "chest pain",
    "difficulty breathing",
    "severe bleeding",
    "unconscious",
    "stroke",
    "heart attack",
    "seizure",
];

pub static MODERATE_KEYWORDS: &[&str] = &[
    "fever", "pain", "headache", "vomiting", "dizziness", "rash", "cough",
];

// ── Severity ────────────────────────────────────────────────

pub const SEVERITY_MIN: u8 = 1;
pub const SEVERITY_MAX: u8 = 10;
pub const SEVERITY_CRITICAL: u8 = 8;
pub const SEVERITY_MODERATE: u8 = 5;

// ── Per-tier tables ─────────────────────────────────────────

pub const TIER_SCORES: TierTable<u8> = TierTable {
    urgent: 95,
    moderate: 65,
    routine: 30,
};

static URGENT_CONDITIONS: &[&str] = &[
    "Acute Coronary Syndrome",
    "Pulmonary Embolism",
    "Pneumothorax",
];

static MODERATE_CONDITIONS: &[&str] = &[
    "Upper Respiratory Infection",
    "Viral Syndrome",
    "Gastroenteritis",
];

static ROUTINE_CONDITIONS: &[&str] = &["Minor Ailment", "Common Cold", "Allergic Reaction"];

static URGENT_RECOMMENDATIONS: &[&str] = &[
    "Call emergency services (911) immediately",
    "Go to Emergency Room without delay",
    "Do not drive yourself - call ambulance",
    "Prepare medical history documents",
];

static MODERATE_RECOMMENDATIONS: &[&str] = &[
    "Schedule appointment with primary care physician within 24-48 hours",
    "Visit urgent care clinic if symptoms worsen",
    "Monitor vital signs regularly",
    "Stay hydrated and rest",
];

static ROUTINE_RECOMMENDATIONS: &[&str] = &[
    "Schedule routine appointment with primary care doctor",
    "Self-care at home appropriate",
    "Over-the-counter medications may help",
    "Follow up if symptoms persist beyond 7 days",
];

pub fn tier_conditions() -> TierTable<Vec<String>> {
    TierTable {
        urgent: owned(URGENT_CONDITIONS),
        moderate: owned(MODERATE_CONDITIONS),
        routine: owned(ROUTINE_CONDITIONS),
    }
}

pub fn tier_recommendations() -> TierTable<Vec<String>> {
    TierTable {
        urgent: owned(URGENT_RECOMMENDATIONS),
        moderate: owned(MODERATE_RECOMMENDATIONS),
        routine: owned(ROUTINE_RECOMMENDATIONS),
    }
}

pub fn tier_wait_time() -> TierTable<String> {
    TierTable {
        urgent: "Immediate".into(),
        moderate: "2-4 hours".into(),
        routine: "1-2 days".into(),
    }
}

// ── Confidence ──────────────────────────────────────────────

pub const CONFIDENCE_BASE: u8 = 87;
pub const JITTER_MIN: u8 = 0;
pub const JITTER_MAX: u8 = 9;

// ── Imaging ─────────────────────────────────────────────────

/// Candidates at or below this confidence carry no recommendations.
pub const IMAGING_ACTIONABLE_THRESHOLD: u8 = 70;

pub fn imaging_candidates() -> Vec<CandidateTemplate> {
    vec![
        CandidateTemplate {
            condition: "Pneumonia (Bacterial)".into(),
            confidence: 89,
            features: owned(&[
                "Consolidation in right lower lobe",
                "Air bronchogram visible",
                "Increased opacity",
            ]),
            severity: "Moderate to Severe".into(),
            recommendations: owned(&[
                "Immediate antibiotic therapy recommended",
                "Consider chest X-ray follow-up in 48-72 hours",
                "Monitor oxygen saturation",
                "Hospitalization may be required if respiratory distress present",
            ]),
        },
        CandidateTemplate {
            condition: "Viral Pneumonia".into(),
            confidence: 45,
            features: owned(&["Bilateral interstitial infiltrates", "Ground-glass appearance"]),
            severity: "Mild to Moderate".into(),
            recommendations: vec![],
        },
        CandidateTemplate {
            condition: "Normal Chest X-ray".into(),
            confidence: 12,
            features: owned(&["Clear lung fields", "Normal cardiac silhouette"]),
            severity: "N/A".into(),
            recommendations: vec![],
        },
    ]
}

// ── Dialogue ────────────────────────────────────────────────

pub fn dialogue_triggers() -> Vec<DialogueTrigger> {
    vec![
        DialogueTrigger {
            keyword: "pain".into(),
            reply: "I understand you're experiencing pain. Can you describe: \
                    1) Where exactly is the pain located? \
                    2) On a scale of 1-10, how severe is it? \
                    3) Is it constant or does it come and go? \
                    4) When did it start?"
                .into(),
        },
        DialogueTrigger {
            keyword: "fever".into(),
            reply: "Fever noted. Have you taken your temperature? If so, what is it? \
                    Also, do you have any other symptoms like chills, sweating, or body aches?"
                .into(),
        },
        DialogueTrigger {
            keyword: "breathing".into(),
            reply: "Breathing difficulties can be serious. Are you experiencing: \
                    1) Shortness of breath at rest or with activity? \
                    2) Chest tightness? \
                    3) Wheezing sounds? \
                    4) Any history of asthma or lung conditions?"
                .into(),
        },
    ]
}

pub const DIALOGUE_FALLBACK: &str =
    "Thank you for sharing that information. To better assess your condition, \
     could you provide more details about when the symptoms started and if \
     anything makes them better or worse?";

pub fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
