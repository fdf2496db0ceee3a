use std::path::Path;

use dermis_oracle::{ImagePayload, mime_type_for_extension};

use crate::error::DermError;

/// Reads an image file into a self-describing payload.
///
/// The MIME type comes from the file extension; files with an unknown
/// extension are refused without being read.
pub fn read_image_file(path: &Path) -> Result<ImagePayload, DermError> {
    let mime_type = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(mime_type_for_extension)
        .ok_or_else(|| DermError::UnsupportedImage(path.to_path_buf()))?;

    let bytes = std::fs::read(path)?;

    Ok(ImagePayload::from_bytes(mime_type, &bytes))
}
