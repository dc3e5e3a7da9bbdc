//! Content-type validation
//!
//! Pure validation gate in front of the upload pipelines. Video uploads must
//! declare exactly `video/mp4`; thumbnails any `image/*`. The accepted
//! subtype becomes the stored file extension.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid content type {0:?}")]
    InvalidMediaType(String),
}

/// Parse a declared media type into `(type, subtype)`, dropping parameters
/// (e.g. `; codecs=...`) and normalizing case.
fn parse_media_type(raw: &str) -> Option<(String, String)> {
    let essence = raw.split(';').next()?.trim().to_ascii_lowercase();
    let (primary, subtype) = essence.split_once('/')?;
    if primary.is_empty()
        || subtype.is_empty()
        || primary.contains(char::is_whitespace)
        || subtype.contains(char::is_whitespace)
        || subtype.contains('/')
    {
        return None;
    }
    Some((primary.to_string(), subtype.to_string()))
}

/// Validate a video upload's declared content type. Returns the file
/// extension (the subtype) on success.
pub fn validate_video_content_type(content_type: &str) -> Result<String, ValidationError> {
    match parse_media_type(content_type) {
        Some((primary, subtype)) if primary == "video" && subtype == "mp4" => Ok(subtype),
        _ => Err(ValidationError::InvalidMediaType(content_type.to_string())),
    }
}

/// Validate a thumbnail upload's declared content type. Any `image/*` is
/// accepted; the subtype becomes the stored extension.
pub fn validate_image_content_type(content_type: &str) -> Result<String, ValidationError> {
    match parse_media_type(content_type) {
        Some((primary, subtype)) if primary == "image" => Ok(subtype),
        _ => Err(ValidationError::InvalidMediaType(content_type.to_string())),
    }
}
