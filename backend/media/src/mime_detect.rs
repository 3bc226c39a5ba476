//! MIME type detection for uploaded images.
//!
//! Uploads from phones often arrive as `application/octet-stream` or with no
//! content type at all, so the file's magic bytes and extension are consulted
//! too. Nothing is rejected here; the vision API judges what it can read.

use std::path::Path;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Detect MIME type by file extension.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "tiff" | "tif" => "image/tiff",
        _ => OCTET_STREAM,
    }
}

/// Detect an image MIME type from the leading bytes of the file.
pub fn sniff_image_type(data: &[u8]) -> Option<&'static str> {
    infer::get(data)
        .filter(|t| t.matcher_type() == infer::MatcherType::Image)
        .map(|t| t.mime_type())
}

/// Whether a MIME type is for an image.
pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Pick the MIME type to send for an upload.
///
/// A declared `image/*` type wins; otherwise the bytes, then the file name,
/// then whatever was declared.
pub fn resolve_mime_type(declared: Option<&str>, file_name: Option<&str>, data: &[u8]) -> String {
    let declared = declared
        .map(|d| d.split(';').next().unwrap_or(d).trim().to_ascii_lowercase())
        .filter(|d| !d.is_empty());

    if let Some(d) = declared.as_deref().filter(|d| is_image(d)) {
        return d.to_string();
    }
    if let Some(sniffed) = sniff_image_type(data) {
        return sniffed.to_string();
    }
    if let Some(name) = file_name {
        let by_ext = detect_mime_type(Path::new(name));
        if by_ext != OCTET_STREAM {
            return by_ext.to_string();
        }
    }
    declared.unwrap_or_else(|| OCTET_STREAM.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    #[test]
    fn detects_jpeg_extension() {
        assert_eq!(detect_mime_type(&PathBuf::from("IMG_0042.JPG")), "image/jpeg");
    }

    #[test]
    fn unknown_extension_fallback() {
        assert_eq!(detect_mime_type(&PathBuf::from("notes.xyz")), OCTET_STREAM);
    }

    #[test]
    fn sniffs_common_formats() {
        assert_eq!(sniff_image_type(PNG), Some("image/png"));
        assert_eq!(sniff_image_type(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(sniff_image_type(b"RIFF\x10\x00\x00\x00WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff_image_type(b"GIF89a\x01\x00\x01\x00"), Some("image/gif"));
        assert_eq!(sniff_image_type(b"hello"), None);
    }

    #[test]
    fn non_image_content_is_not_sniffed_as_image() {
        assert_eq!(sniff_image_type(b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n"), None);
        assert_eq!(
            resolve_mime_type(Some("application/pdf"), None, b"%PDF-1.7\n"),
            "application/pdf"
        );
    }

    #[test]
    fn declared_image_type_wins() {
        assert_eq!(resolve_mime_type(Some("image/jpeg"), None, PNG), "image/jpeg");
    }

    #[test]
    fn octet_stream_upload_is_sniffed() {
        assert_eq!(
            resolve_mime_type(Some("application/octet-stream"), Some("x.bin"), PNG),
            "image/png"
        );
        assert_eq!(resolve_mime_type(None, Some("shot.webp"), b"????"), "image/webp");
    }

    #[test]
    fn unknown_content_keeps_declared_type() {
        assert_eq!(resolve_mime_type(Some("text/plain; charset=utf-8"), None, b"hi"), "text/plain");
        assert_eq!(resolve_mime_type(None, None, b"hi"), OCTET_STREAM);
    }
}
