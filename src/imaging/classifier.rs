use std::sync::Arc;

use chrono::Utc;

use crate::catalog::RuleCatalog;
use crate::error::EngineError;
use crate::models::{DiagnosticCandidate, ImageRef, ImagingReport};

use super::format::detect_image_format;

/// Stub imaging classifier.
///
/// Emits the catalog's candidate set for any supported image. A real model
/// replaces the candidate source without changing the output contract:
/// descending confidence, and recommendations only above the actionable
/// threshold.
#[derive(Debug, Clone)]
pub struct ImagingClassifier {
    catalog: Arc<RuleCatalog>,
}

impl ImagingClassifier {
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        Self { catalog }
    }

    /// Ranked candidates for one image.
    pub fn classify(&self, image: &ImageRef) -> Result<Vec<DiagnosticCandidate>, EngineError> {
        detect_image_format(image)?;
        Ok(self.ranked_candidates())
    }

    /// Ranked candidates plus what was detected about the image.
    pub fn report(&self, image: &ImageRef) -> Result<ImagingReport, EngineError> {
        let (format, source) = detect_image_format(image)?;
        let candidates = self.ranked_candidates();

        tracing::info!(
            format = %format,
            source = ?source,
            candidates = candidates.len(),
            top_confidence = candidates.first().map(|c| c.confidence),
            "Imaging classification complete"
        );

        Ok(ImagingReport {
            file_name: image.file_name.clone(),
            format,
            modality: image.modality,
            dimensions: image.dimensions,
            candidates,
            created_at: Utc::now(),
        })
    }

    fn ranked_candidates(&self) -> Vec<DiagnosticCandidate> {
        let threshold = self.catalog.imaging_actionable_threshold;
        let mut candidates: Vec<DiagnosticCandidate> = self
            .catalog
            .imaging_candidates
            .iter()
            .map(|template| {
                let confidence = template.confidence.min(100);
                let actionable = confidence > threshold && !template.recommendations.is_empty();
                DiagnosticCandidate {
                    condition: template.condition.clone(),
                    confidence,
                    features: template.features.clone(),
                    severity: template.severity.clone(),
                    recommendations: actionable.then(|| template.recommendations.clone()),
                }
            })
            .collect();

        // Stable: equal confidences keep catalog order.
        candidates.sort_by(|a, b| b.confidence.cmp(&a.confidence));
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImageFormat, Modality};

    const PNG: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn classifier() -> ImagingClassifier {
        ImagingClassifier::new(RuleCatalog::builtin())
    }

    fn chest_xray() -> ImageRef {
        ImageRef::named("chest.png").with_header(PNG.to_vec())
    }

    // ───────────────────────────────────────
    // ranking
    // ───────────────────────────────────────

    #[test]
    fn builtin_candidates_in_descending_order() {
        let candidates = classifier().classify(&chest_xray()).unwrap();
        let names: Vec<&str> = candidates.iter().map(|c| c.condition.as_str()).collect();
        assert_eq!(names, vec!["Pneumonia (Bacterial)", "Viral Pneumonia", "Normal Chest X-ray"]);
        assert!(candidates.windows(2).all(|w| w[0].confidence >= w[1].confidence));
    }

    #[test]
    fn only_actionable_candidates_carry_recommendations() {
        let candidates = classifier().classify(&chest_xray()).unwrap();
        for candidate in &candidates {
            if candidate.confidence <= 70 {
                assert!(candidate.recommendations.is_none());
            }
        }
        assert!(candidates[0].is_actionable());
    }

    #[test]
    fn catalog_order_is_sorted_and_ties_are_stable() {
        let catalog = RuleCatalog::from_json_str(
            r#"{"imagingCandidates": [
                {"condition": "A", "confidence": 20},
                {"condition": "B", "confidence": 80, "recommendations": ["act"]},
                {"condition": "C", "confidence": 20},
                {"condition": "D", "confidence": 70, "recommendations": ["wait"]}
            ]}"#,
        )
        .unwrap();
        let candidates = ImagingClassifier::new(Arc::new(catalog))
            .classify(&chest_xray())
            .unwrap();
        let names: Vec<&str> = candidates.iter().map(|c| c.condition.as_str()).collect();
        assert_eq!(names, vec!["B", "D", "A", "C"]);
        // Exactly at the threshold is not actionable.
        assert!(candidates[1].recommendations.is_none());
        assert_eq!(candidates[0].recommendations, Some(vec!["act".to_string()]));
    }

    #[test]
    fn empty_candidate_set() {
        let catalog = RuleCatalog::from_json_str(r#"{"imagingCandidates": []}"#).unwrap();
        let report = ImagingClassifier::new(Arc::new(catalog))
            .report(&chest_xray())
            .unwrap();
        assert!(report.candidates.is_empty());
        assert!(report.top().is_none());
    }

    // ───────────────────────────────────────
    // format gate and report
    // ───────────────────────────────────────

    #[test]
    fn unsupported_format_fails() {
        let image = ImageRef::named("notes.txt");
        assert!(matches!(
            classifier().classify(&image),
            Err(EngineError::UnsupportedImageFormat(_))
        ));
    }

    #[test]
    fn report_carries_detection_and_top() {
        let mut image = chest_xray().with_modality(Modality::Xray);
        image.dimensions = Some((2048, 2048));
        let report = classifier().report(&image).unwrap();
        assert_eq!(report.format, ImageFormat::Png);
        assert_eq!(report.modality, Some(Modality::Xray));
        assert_eq!(report.dimensions, Some((2048, 2048)));
        assert_eq!(report.top().map(|c| c.condition.as_str()), Some("Pneumonia (Bacterial)"));
    }
}
