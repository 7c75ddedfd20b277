use tracing_subscriber::EnvFilter;

/// Application-level constants
pub const APP_NAME: &str = "TriageMD";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "triagemd=info"
}

/// Install the global `fmt` subscriber.
///
/// Honors `RUST_LOG`, falls back to [`default_log_filter`]. Safe to call more
/// than once: a second install (or one made by an embedding host) is ignored.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} engine v{}", APP_NAME, APP_VERSION);
    }
}

/// Shown under every symptom triage report.
pub const CLINICAL_DISCLAIMER: &str =
    "This analysis is a clinical decision support tool and does not replace \
     professional medical judgment. Always consult with qualified healthcare \
     providers for diagnosis and treatment decisions.";

/// Shown under every imaging report.
pub const IMAGING_DISCLAIMER: &str =
    "Diagnostic suggestions must be reviewed and validated by qualified \
     radiologists or healthcare professionals before clinical use.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_name_is_triagemd() {
        assert_eq!(APP_NAME, "TriageMD");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn default_filter_targets_crate() {
        assert!(default_log_filter().starts_with("triagemd"));
    }

    #[test]
    fn init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }

    #[test]
    fn disclaimers_mention_professional_review() {
        assert!(CLINICAL_DISCLAIMER.contains("healthcare providers"));
        assert!(IMAGING_DISCLAIMER.contains("radiologists"));
    }
}
