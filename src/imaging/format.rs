use std::path::Path;

use crate::error::EngineError;
use crate::models::{ImageFormat, ImageRef};

/// Where the detected format came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatSource {
    MagicBytes,
    DeclaredMime,
    Extension,
}

/// Detect the image format of a submission.
///
/// Magic bytes don't lie, extensions and upload headers can. When header
/// bytes are present they decide alone; the declared MIME type and then the
/// file extension are consulted only when no header was supplied.
pub fn detect_image_format(image: &ImageRef) -> Result<(ImageFormat, FormatSource), EngineError> {
    if !image.header.is_empty() {
        return sniff_magic(&image.header)
            .map(|f| (f, FormatSource::MagicBytes))
            .ok_or_else(|| unsupported(image, "unrecognized file signature"));
    }

    if let Some(declared) = image.declared_mime.as_deref() {
        return ImageFormat::from_mime(declared)
            .map(|f| (f, FormatSource::DeclaredMime))
            .ok_or_else(|| unsupported(image, declared));
    }

    guess_from_extension(&image.file_name)
        .map(|f| (f, FormatSource::Extension))
        .ok_or_else(|| unsupported(image, "unknown file extension"))
}

/// Match leading bytes against the supported signatures.
pub fn sniff_magic(header: &[u8]) -> Option<ImageFormat> {
    // DICOM: 128-byte preamble then "DICM"
    if header.len() >= 132 && &header[128..132] == b"DICM" {
        return Some(ImageFormat::Dicom);
    }

    match header {
        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Some(ImageFormat::Jpeg),
        // PNG: 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47, ..] => Some(ImageFormat::Png),
        // GIF87a / GIF89a
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(ImageFormat::Gif),
        // BMP: "BM"
        [b'B', b'M', ..] => Some(ImageFormat::Bmp),
        // TIFF: little-endian (49 49 2A 00) or big-endian (4D 4D 00 2A)
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => Some(ImageFormat::Tiff),
        // WEBP: "RIFF" size "WEBP"
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(ImageFormat::Webp),
        _ => None,
    }
}

fn guess_from_extension(file_name: &str) -> Option<ImageFormat> {
    let path = Path::new(file_name);
    // mime_guess has no entry for DICOM
    if path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("dcm"))
    {
        return Some(ImageFormat::Dicom);
    }
    mime_guess::from_path(path)
        .iter()
        .find_map(|mime| ImageFormat::from_mime(mime.essence_str()))
}

fn unsupported(image: &ImageRef, reason: &str) -> EngineError {
    EngineError::UnsupportedImageFormat(format!("{} ({reason})", image.file_name))
}
