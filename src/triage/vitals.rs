use std::sync::LazyLock;

use regex::Regex;

use crate::models::{ReviewFlag, Vitals};

/// "120/80", "120 / 80 mmHg".
static RE_BLOOD_PRESSURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2,3})\s*/\s*(\d{2,3})(?:\s*mm\s*hg)?$").unwrap());
/// "98.6", "101 F", "38.5°f".
static RE_TEMPERATURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2,3}(?:\.\d+)?)\s*°?\s*f?$").unwrap());
/// "72", "72 bpm".
static RE_HEART_RATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,3})\s*(?:bpm)?$").unwrap());

const TEMPERATURE_RANGE_F: (f64, f64) = (80.0, 115.0);
const HEART_RATE_RANGE: (u16, u16) = (20, 250);
const SYSTOLIC_RANGE: (u16, u16) = (50, 300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloodPressure {
    pub systolic: u16,
    pub diastolic: u16,
}

/// Numeric vitals. Absent and unreadable values are both `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedVitals {
    pub temperature_f: Option<f64>,
    pub heart_rate: Option<u16>,
    pub blood_pressure: Option<BloodPressure>,
}

/// Parse raw vitals, collecting a flag for each present-but-bad field.
///
/// Vitals are informational only and never feed the tier decision.
pub fn parse_vitals(vitals: &Vitals) -> (ParsedVitals, Vec<ReviewFlag>) {
    let mut flags = Vec::new();
    let mut parsed = ParsedVitals::default();

    if let Some(raw) = present(&vitals.temperature) {
        match parse_temperature(raw) {
            Some(t) => {
                if !(TEMPERATURE_RANGE_F.0..=TEMPERATURE_RANGE_F.1).contains(&t) {
                    flags.push(implausible("temperature"));
                }
                parsed.temperature_f = Some(t);
            }
            None => flags.push(unparsable("temperature")),
        }
    }

    if let Some(raw) = present(&vitals.heart_rate) {
        match parse_heart_rate(raw) {
            Some(hr) => {
                if !(HEART_RATE_RANGE.0..=HEART_RATE_RANGE.1).contains(&hr) {
                    flags.push(implausible("heart_rate"));
                }
                parsed.heart_rate = Some(hr);
            }
            None => flags.push(unparsable("heart_rate")),
        }
    }

    if let Some(raw) = present(&vitals.blood_pressure) {
        match parse_blood_pressure(raw) {
            Some(bp) => {
                if !(SYSTOLIC_RANGE.0..=SYSTOLIC_RANGE.1).contains(&bp.systolic)
                    || bp.diastolic >= bp.systolic
                {
                    flags.push(implausible("blood_pressure"));
                }
                parsed.blood_pressure = Some(bp);
            }
            None => flags.push(unparsable("blood_pressure")),
        }
    }

    (parsed, flags)
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_temperature(raw: &str) -> Option<f64> {
    let lower = raw.to_lowercase();
    let caps = RE_TEMPERATURE.captures(&lower)?;
    caps.get(1)?.as_str().parse().ok()
}

fn parse_heart_rate(raw: &str) -> Option<u16> {
    let lower = raw.to_lowercase();
    let caps = RE_HEART_RATE.captures(&lower)?;
    caps.get(1)?.as_str().parse().ok()
}

fn parse_blood_pressure(raw: &str) -> Option<BloodPressure> {
    let lower = raw.to_lowercase();
    let caps = RE_BLOOD_PRESSURE.captures(&lower)?;
    Some(BloodPressure {
        systolic: caps.get(1)?.as_str().parse().ok()?,
        diastolic: caps.get(2)?.as_str().parse().ok()?,
    })
}

fn unparsable(field: &str) -> ReviewFlag {
    ReviewFlag::UnparsableVital {
        field: field.to_string(),
    }
}

fn implausible(field: &str) -> ReviewFlag {
    ReviewFlag::ImplausibleVital {
        field: field.to_string(),
    }
}
