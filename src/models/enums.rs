use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = EngineError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(EngineError::InvalidInput(format!(
                        "unknown {} value '{}'",
                        stringify!($name),
                        s
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(UrgencyTier {
    Urgent => "urgent",
    Moderate => "moderate",
    Routine => "routine",
});

str_enum!(ChatRole {
    Patient => "patient",
    Assistant => "assistant",
});

str_enum!(ImageFormat {
    Jpeg => "jpeg",
    Png => "png",
    Gif => "gif",
    Bmp => "bmp",
    Webp => "webp",
    Tiff => "tiff",
    Dicom => "dicom",
});

str_enum!(Modality {
    Xray => "xray",
    Ct => "ct",
    Mri => "mri",
    Other => "other",
});

str_enum!(ConfidenceBand {
    High => "high",
    Moderate => "moderate",
    Low => "low",
});

impl UrgencyTier {
    /// All tiers, highest priority first.
    pub const ALL: [UrgencyTier; 3] = [Self::Urgent, Self::Moderate, Self::Routine];

    /// Queue position of the tier (1 = seen first).
    pub fn priority(&self) -> u8 {
        match self {
            Self::Urgent => 1,
            Self::Moderate => 2,
            Self::Routine => 3,
        }
    }

    /// Display color used by report banners and queue rows.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Urgent => "red",
            Self::Moderate => "orange",
            Self::Routine => "green",
        }
    }

    /// Banner heading, e.g. "URGENT PRIORITY".
    pub fn label(&self) -> String {
        format!("{} PRIORITY", self.as_str().to_uppercase())
    }
}

/// Clinical priority: `Urgent > Moderate > Routine`.
impl Ord for UrgencyTier {
    fn cmp(&self, other: &Self) -> Ordering {
        other.priority().cmp(&self.priority())
    }
}

impl PartialOrd for UrgencyTier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Webp => "image/webp",
            Self::Tiff => "image/tiff",
            Self::Dicom => "application/dicom",
        }
    }

    /// Map a MIME type (as declared by an upload or guessed from an
    /// extension) to a supported format.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            "image/bmp" | "image/x-ms-bmp" => Some(Self::Bmp),
            "image/webp" => Some(Self::Webp),
            "image/tiff" => Some(Self::Tiff),
            "application/dicom" => Some(Self::Dicom),
            _ => None,
        }
    }
}

impl ConfidenceBand {
    /// Band for a 0–100 confidence: above 70 high, above 40 moderate.
    pub fn for_confidence(confidence: u8) -> Self {
        if confidence > 70 {
            Self::High
        } else if confidence > 40 {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn urgency_tier_round_trip() {
        for (variant, s) in [
            (UrgencyTier::Urgent, "urgent"),
            (UrgencyTier::Moderate, "moderate"),
            (UrgencyTier::Routine, "routine"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(UrgencyTier::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn chat_role_round_trip() {
        for (variant, s) in [(ChatRole::Patient, "patient"), (ChatRole::Assistant, "assistant")] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(ChatRole::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(UrgencyTier::from_str("critical").is_err());
        assert!(ChatRole::from_str("").is_err());
        assert!(Modality::from_str("ultrasound").is_err());
    }

    #[test]
    fn tier_ordering_is_total() {
        assert!(UrgencyTier::Urgent > UrgencyTier::Moderate);
        assert!(UrgencyTier::Moderate > UrgencyTier::Routine);
        assert!(UrgencyTier::Urgent > UrgencyTier::Routine);

        let mut tiers = vec![UrgencyTier::Routine, UrgencyTier::Urgent, UrgencyTier::Moderate];
        tiers.sort();
        assert_eq!(tiers, vec![UrgencyTier::Routine, UrgencyTier::Moderate, UrgencyTier::Urgent]);
    }

    #[test]
    fn tier_display_attributes() {
        assert_eq!(UrgencyTier::Urgent.color(), "red");
        assert_eq!(UrgencyTier::Moderate.color(), "orange");
        assert_eq!(UrgencyTier::Routine.color(), "green");
        assert_eq!(UrgencyTier::Urgent.label(), "URGENT PRIORITY");
    }

    #[test]
    fn tier_serializes_snake_case() {
        let json = serde_json::to_string(&UrgencyTier::Moderate).unwrap();
        assert_eq!(json, "\"moderate\"");
        let tier: UrgencyTier = serde_json::from_str("\"urgent\"").unwrap();
        assert_eq!(tier, UrgencyTier::Urgent);
    }

    #[test]
    fn image_format_from_mime() {
        assert_eq!(ImageFormat::from_mime("image/jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_mime("IMAGE/PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_mime("application/dicom; charset=binary"), Some(ImageFormat::Dicom));
        assert_eq!(ImageFormat::from_mime("application/pdf"), None);
        assert_eq!(ImageFormat::from_mime(""), None);
    }

    #[test]
    fn confidence_band_thresholds() {
        assert_eq!(ConfidenceBand::for_confidence(89), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::for_confidence(71), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::for_confidence(70), ConfidenceBand::Moderate);
        assert_eq!(ConfidenceBand::for_confidence(45), ConfidenceBand::Moderate);
        assert_eq!(ConfidenceBand::for_confidence(40), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::for_confidence(12), ConfidenceBand::Low);
    }
}
