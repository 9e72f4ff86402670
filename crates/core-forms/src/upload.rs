//! Profile picture pre-checks run before anything is sent to the server.

use thiserror::Error;
use tracing::debug;

/// MIME types the picture input accepts.
pub const PICTURE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Please select a valid image file (JPEG, PNG, GIF, WebP)")]
    UnsupportedType { mime: String },
    #[error("File size must be less than {}MB", .max / (1024 * 1024))]
    TooLarge { size: u64, max: u64 },
}

/// The file picked in the profile picture input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureFile {
    pub mime: String,
    pub size: u64,
}

/// Type is checked before size. A file of exactly `max` bytes is accepted.
pub fn check_picture(file: &PictureFile, max: u64) -> Result<(), UploadError> {
    if !PICTURE_TYPES.contains(&file.mime.as_str()) {
        debug!(target: "forms", mime = file.mime.as_str(), "picture_type_rejected");
        return Err(UploadError::UnsupportedType {
            mime: file.mime.clone(),
        });
    }
    if file.size > max {
        debug!(target: "forms", size = file.size, max, "picture_too_large");
        return Err(UploadError::TooLarge {
            size: file.size,
            max,
        });
    }
    Ok(())
}
