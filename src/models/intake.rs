use serde::{Deserialize, Serialize};

/// Severity as the patient entered it.
///
/// Intake forms deliver the 1–10 slider either as a number or as text, so
/// integers, decimals and strings are all accepted on the wire; parsing
/// happens in the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeverityInput {
    Number(i64),
    Decimal(f64),
    Text(String),
}

impl Default for SeverityInput {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<i64> for SeverityInput {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for SeverityInput {
    fn from(value: i32) -> Self {
        Self::Number(value as i64)
    }
}

impl From<u8> for SeverityInput {
    fn from(value: u8) -> Self {
        Self::Number(value as i64)
    }
}

impl From<f64> for SeverityInput {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for SeverityInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SeverityInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Self-reported vitals, kept as entered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    /// Degrees Fahrenheit, e.g. "98.6".
    pub temperature: Option<String>,
    /// Beats per minute, e.g. "72".
    pub heart_rate: Option<String>,
    /// "systolic/diastolic", e.g. "120/80".
    pub blood_pressure: Option<String>,
}

/// Structured record of one patient's self-reported symptoms and vitals.
///
/// Owned by the session that created it; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientIntake {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub symptoms: String,
    /// Free text, e.g. "3 days".
    pub duration: Option<String>,
    #[serde(default)]
    pub severity: SeverityInput,
    #[serde(default)]
    pub vitals: Vitals,
    #[serde(default)]
    pub medical_history: Vec<String>,
}

impl PatientIntake {
    pub fn new(symptoms: impl Into<String>, severity: impl Into<SeverityInput>) -> Self {
        Self {
            symptoms: symptoms.into(),
            severity: severity.into(),
            ..Default::default()
        }
    }

    /// Symptom text with surrounding whitespace removed, `None` when empty.
    pub fn symptom_text(&self) -> Option<&str> {
        let trimmed = self.symptoms.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}
