use crate::catalog::SeverityScale;
use crate::models::{ReviewFlag, SeverityInput};

/// Severity as used for the decision, with the defect found while reading it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSeverity {
    pub value: u8,
    pub flag: Option<ReviewFlag>,
}

/// Read patient-reported severity onto the catalog's scale.
///
/// Text is read by its leading integer, so "9.5" and "8/10" count as 9 and
/// 8; decimals truncate toward zero the same way. Text with no leading
/// number falls to the scale minimum so a typo can never raise the tier;
/// out-of-scale numbers are clamped. Both cases carry a flag.
pub fn parse_severity(input: &SeverityInput, scale: SeverityScale) -> ParsedSeverity {
    let unparsable = |raw: String| ParsedSeverity {
        value: scale.min,
        flag: Some(ReviewFlag::UnparsableSeverity { raw }),
    };

    let raw = match input {
        SeverityInput::Number(n) => *n,
        // `as` saturates, so huge decimals clamp like huge integers.
        SeverityInput::Decimal(f) if f.is_finite() => f.trunc() as i64,
        SeverityInput::Decimal(f) => return unparsable(f.to_string()),
        SeverityInput::Text(text) => match leading_integer(text) {
            Some(n) => n,
            None => return unparsable(text.clone()),
        },
    };

    let clamped = raw.clamp(scale.min as i64, scale.max as i64) as u8;
    let flag = (clamped as i64 != raw).then(|| ReviewFlag::SeverityOutOfRange { raw, clamped });

    ParsedSeverity {
        value: clamped,
        flag,
    }
}

/// Optional sign followed by ASCII digits at the start of the trimmed text.
/// Trailing characters are ignored; digit runs past `i64` saturate.
fn leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return None;
    }

    let signed = if negative { format!("-{digits}") } else { digits.to_string() };
    Some(signed.parse::<i64>().unwrap_or(if negative { i64::MIN } else { i64::MAX }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale() -> SeverityScale {
        SeverityScale { min: 1, max: 10 }
    }

    #[test]
    fn number_in_range() {
        let parsed = parse_severity(&SeverityInput::Number(7), scale());
        assert_eq!(parsed.value, 7);
        assert!(parsed.flag.is_none());
    }

    #[test]
    fn text_with_whitespace() {
        let parsed = parse_severity(&SeverityInput::Text(" 9 ".into()), scale());
        assert_eq!(parsed.value, 9);
        assert!(parsed.flag.is_none());
    }

    #[test]
    fn unparsable_text_uses_minimum() {
        let parsed = parse_severity(&SeverityInput::Text("very bad".into()), scale());
        assert_eq!(parsed.value, 1);
        assert_eq!(
            parsed.flag,
            Some(ReviewFlag::UnparsableSeverity { raw: "very bad".into() })
        );
    }

    #[test]
    fn empty_text_uses_minimum() {
        let parsed = parse_severity(&SeverityInput::default(), scale());
        assert_eq!(parsed.value, 1);
        assert!(matches!(parsed.flag, Some(ReviewFlag::UnparsableSeverity { .. })));
    }

    #[test]
    fn decimal_text_reads_leading_integer() {
        let parsed = parse_severity(&SeverityInput::Text("9.5".into()), scale());
        assert_eq!(parsed.value, 9);
        assert!(parsed.flag.is_none());
    }

    #[test]
    fn fraction_text_reads_numerator() {
        let parsed = parse_severity(&SeverityInput::Text("8/10".into()), scale());
        assert_eq!(parsed.value, 8);
        assert!(parsed.flag.is_none());
    }

    #[test]
    fn text_without_leading_number_is_unparsable() {
        for raw in ["about 9", ".5", "-", "+x"] {
            let parsed = parse_severity(&SeverityInput::Text(raw.into()), scale());
            assert_eq!(parsed.value, 1, "{raw}");
            assert_eq!(parsed.flag, Some(ReviewFlag::UnparsableSeverity { raw: raw.into() }));
        }
    }

    #[test]
    fn oversized_digit_run_clamps() {
        let parsed = parse_severity(&SeverityInput::Text("99999999999999999999".into()), scale());
        assert_eq!(parsed.value, 10);
        assert!(matches!(parsed.flag, Some(ReviewFlag::SeverityOutOfRange { raw: i64::MAX, clamped: 10 })));
    }

    #[test]
    fn decimal_truncates_toward_zero() {
        let parsed = parse_severity(&SeverityInput::Decimal(8.5), scale());
        assert_eq!(parsed.value, 8);
        assert!(parsed.flag.is_none());

        let parsed = parse_severity(&SeverityInput::Decimal(10.9), scale());
        assert_eq!(parsed.value, 10);
        assert!(parsed.flag.is_none());

        let parsed = parse_severity(&SeverityInput::Decimal(0.5), scale());
        assert_eq!(parsed.value, 1);
        assert_eq!(parsed.flag, Some(ReviewFlag::SeverityOutOfRange { raw: 0, clamped: 1 }));
    }

    #[test]
    fn non_finite_decimal_is_unparsable() {
        let parsed = parse_severity(&SeverityInput::Decimal(f64::NAN), scale());
        assert_eq!(parsed.value, 1);
        assert!(matches!(parsed.flag, Some(ReviewFlag::UnparsableSeverity { .. })));
    }

    #[test]
    fn above_scale_clamps_to_max() {
        let parsed = parse_severity(&SeverityInput::Number(42), scale());
        assert_eq!(parsed.value, 10);
        assert_eq!(parsed.flag, Some(ReviewFlag::SeverityOutOfRange { raw: 42, clamped: 10 }));
    }

    #[test]
    fn below_scale_clamps_to_min() {
        let parsed = parse_severity(&SeverityInput::Text("-3".into()), scale());
        assert_eq!(parsed.value, 1);
        assert_eq!(parsed.flag, Some(ReviewFlag::SeverityOutOfRange { raw: -3, clamped: 1 }));
    }

    #[test]
    fn custom_scale() {
        let parsed = parse_severity(&SeverityInput::Number(0), SeverityScale { min: 0, max: 5 });
        assert_eq!(parsed.value, 0);
        assert!(parsed.flag.is_none());
    }
}
