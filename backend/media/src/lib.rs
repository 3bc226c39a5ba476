//! Image payload handling: MIME resolution and loading.

pub mod image;
pub mod mime_detect;

pub use image::{image_from_upload, load_image};
pub use mime_detect::{detect_mime_type, is_image, resolve_mime_type, sniff_image_type};
