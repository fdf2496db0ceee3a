use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::ImageError;

/// MIME type assumed for payloads that carry no `data:` header.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// A self-describing image: MIME type plus base64-encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    mime_type: String,
    data: String,
}

impl ImagePayload {
    /// Parses a data URI (`data:image/png;base64,...`) or bare base64 text.
    ///
    /// The data section must be non-empty valid base64 and the media type an
    /// `image/*` type.
    pub fn parse(payload: &str) -> Result<Self, ImageError> {
        let payload = payload.trim();

        let (mime_type, data) = match payload.strip_prefix("data:") {
            Some(rest) => {
                let (header, data) = rest.split_once(',').ok_or(ImageError::MissingData)?;
                let mut params = header.split(';');
                let mime_type = params.next().unwrap_or("").trim();
                if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
                    return Err(ImageError::NotBase64);
                }
                let mime_type = if mime_type.is_empty() {
                    DEFAULT_MIME_TYPE
                } else {
                    mime_type
                };
                (mime_type, data.trim())
            }
            None => (DEFAULT_MIME_TYPE, payload),
        };

        if data.is_empty() {
            return Err(ImageError::Empty);
        }
        if !mime_type.to_ascii_lowercase().starts_with("image/") {
            return Err(ImageError::UnsupportedMediaType(mime_type.to_string()));
        }
        let image = Self {
            mime_type: mime_type.to_ascii_lowercase(),
            data: data.to_string(),
        };
        image.decode_bytes()?;

        Ok(image)
    }

    /// Encodes raw image bytes.
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 text without any header.
    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn decode_bytes(&self) -> Result<Vec<u8>, ImageError> {
        Ok(STANDARD.decode(&self.data)?)
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Maps a file extension to the image MIME type it conventionally carries.
pub fn mime_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // PNG signature bytes.
    const PNG_B64: &str = "iVBORw0KGgo=";

    #[test]
    fn parses_data_uri() {
        let image = ImagePayload::parse(&format!("data:image/png;base64,{PNG_B64}")).unwrap();
        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(image.data(), PNG_B64);
        assert_eq!(
            image.decode_bytes().unwrap(),
            vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]
        );
    }

    #[test]
    fn bare_base64_defaults_to_jpeg() {
        let image = ImagePayload::parse("/9j/4AAQ").unwrap();
        assert_eq!(image.mime_type(), DEFAULT_MIME_TYPE);
        assert_eq!(image.data(), "/9j/4AAQ");
    }

    #[test]
    fn rejects_missing_comma() {
        assert!(matches!(
            ImagePayload::parse("data:image/png;base64"),
            Err(ImageError::MissingData)
        ));
    }

    #[test]
    fn rejects_empty_data() {
        assert!(matches!(
            ImagePayload::parse("data:image/png;base64,"),
            Err(ImageError::Empty)
        ));
        assert!(matches!(ImagePayload::parse("   "), Err(ImageError::Empty)));
    }

    #[test]
    fn rejects_non_base64_uri() {
        assert!(matches!(
            ImagePayload::parse("data:image/png,rawtext"),
            Err(ImageError::NotBase64)
        ));
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(matches!(
            ImagePayload::parse("data:image/png;base64,@@@"),
            Err(ImageError::InvalidBase64(_))
        ));
    }

    #[test]
    fn rejects_non_image_media() {
        assert!(matches!(
            ImagePayload::parse(&format!("data:text/plain;base64,{PNG_B64}")),
            Err(ImageError::UnsupportedMediaType(m)) if m == "text/plain"
        ));
    }

    #[test]
    fn data_uri_survives_reparse() {
        let image = ImagePayload::from_bytes("image/webp", b"riff-bytes");
        let reparsed = ImagePayload::parse(&image.to_data_uri()).unwrap();
        assert_eq!(reparsed, image);
    }

    #[test]
    fn extension_lookup() {
        assert_eq!(mime_type_for_extension("JPG"), Some("image/jpeg"));
        assert_eq!(mime_type_for_extension("heic"), Some("image/heic"));
        assert_eq!(mime_type_for_extension("txt"), None);
    }
}
