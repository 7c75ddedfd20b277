//! Imaging: format gate and ranked diagnostic candidates.

pub mod classifier;
pub mod format;

pub use classifier::ImagingClassifier;
pub use format::{detect_image_format, sniff_magic, FormatSource};
