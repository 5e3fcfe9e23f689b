/// Fallback when an inline image declares no type and its bytes are unrecognized.
pub const FALLBACK_IMAGE_MIME: &str = "image/png";

/// Guess an image MIME type from magic bytes.
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => Some("image/png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        _ => None,
    }
}

pub fn detect_image_mime(bytes: &[u8]) -> &'static str {
    sniff_image_mime(bytes).unwrap_or_else(|| {
        tracing::warn!(
            "Inline data has no mime type and unrecognized leading bytes {:02X?}, assuming {}",
            &bytes[..bytes.len().min(4)],
            FALLBACK_IMAGE_MIME
        );
        FALLBACK_IMAGE_MIME
    })
}
