//! Building `ImageInput`s from uploads and local files.

use std::io;
use std::path::Path;

use bytes::Bytes;
use recipesnap_core::ImageInput;
use tracing::debug;

use crate::mime_detect::resolve_mime_type;

/// Wrap uploaded bytes, resolving the MIME type to send upstream.
pub fn image_from_upload(
    data: Bytes,
    declared_type: Option<&str>,
    file_name: Option<&str>,
) -> ImageInput {
    let mime_type = resolve_mime_type(declared_type, file_name, &data);
    debug!(
        bytes = data.len(),
        declared = declared_type.unwrap_or("-"),
        resolved = %mime_type,
        "Resolved upload MIME type"
    );
    let image = ImageInput::new(data, mime_type);
    match file_name {
        Some(name) => image.with_file_name(name),
        None => image,
    }
}

/// Read an image file from disk.
pub async fn load_image(path: &Path) -> io::Result<ImageInput> {
    let data = tokio::fs::read(path).await?;
    let file_name = path.file_name().and_then(|n| n.to_str());
    Ok(image_from_upload(Bytes::from(data), None, file_name))
}
