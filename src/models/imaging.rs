use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{ConfidenceBand, ImageFormat, Modality};

/// Bytes read from the start of an image file for format sniffing.
/// DICOM places its magic at offset 128, so this must exceed 132.
pub const HEADER_SNIFF_LEN: usize = 256;

/// Reference to a submitted medical image. No pixel data is carried.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub file_name: String,
    /// MIME type declared by the uploader, if any.
    pub declared_mime: Option<String>,
    /// Leading bytes of the file, if the caller has them.
    #[serde(default)]
    pub header: Vec<u8>,
    pub modality: Option<Modality>,
    /// (width, height) in pixels.
    pub dimensions: Option<(u32, u32)>,
}

impl ImageRef {
    pub fn named(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, header: impl Into<Vec<u8>>) -> Self {
        self.header = header.into();
        self
    }

    pub fn with_declared_mime(mut self, mime: impl Into<String>) -> Self {
        self.declared_mime = Some(mime.into());
        self
    }

    pub fn with_modality(mut self, modality: Modality) -> Self {
        self.modality = Some(modality);
        self
    }

    /// Build a reference from a file on disk, reading only its header.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::open(path)?;
        let mut header = Vec::with_capacity(HEADER_SNIFF_LEN);
        file.take(HEADER_SNIFF_LEN as u64).read_to_end(&mut header)?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();

        Ok(Self {
            file_name,
            header,
            ..Default::default()
        })
    }
}

/// One ranked hypothesis from the imaging classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticCandidate {
    pub condition: String,
    pub confidence: u8,
    pub features: Vec<String>,
    pub severity: String,
    /// Present only for clinically actionable candidates.
    pub recommendations: Option<Vec<String>>,
}

impl DiagnosticCandidate {
    pub fn band(&self) -> ConfidenceBand {
        ConfidenceBand::for_confidence(self.confidence)
    }

    pub fn is_actionable(&self) -> bool {
        self.recommendations.as_ref().is_some_and(|r| !r.is_empty())
    }
}

/// Ranked candidates for one image, plus what was detected about the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagingReport {
    pub file_name: String,
    pub format: ImageFormat,
    pub modality: Option<Modality>,
    pub dimensions: Option<(u32, u32)>,
    /// Sorted descending by confidence; never reordered after creation.
    pub candidates: Vec<DiagnosticCandidate>,
    pub created_at: DateTime<Utc>,
}

impl ImagingReport {
    /// The candidate surfaced prominently to the clinician.
    pub fn top(&self) -> Option<&DiagnosticCandidate> {
        self.candidates.first()
    }
}
