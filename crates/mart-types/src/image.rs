use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{TypeError, TypeResult};

/// MIME type assumed when a data URI does not name one.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// An image split out of a `data:<mime>;base64,<payload>` URI.
///
/// The payload stays base64-encoded; it is forwarded verbatim to services
/// that accept inline base64 content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageData {
    mime_type: String,
    payload: String,
}

impl ImageData {
    /// Parse a data URI.
    ///
    /// Everything after the first comma is the payload. The MIME type is
    /// taken from a `data:<mime>;base64` header and falls back to
    /// [`DEFAULT_MIME_TYPE`] when the header does not have that shape.
    pub fn parse(uri: &str) -> TypeResult<Self> {
        let (header, payload) = uri
            .split_once(',')
            .ok_or_else(|| TypeError::InvalidDataUri("missing ',' separator".into()))?;

        let mime_type = header
            .strip_prefix("data:")
            .and_then(|h| h.strip_suffix(";base64"))
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE);

        Ok(Self {
            mime_type: mime_type.to_string(),
            payload: payload.to_string(),
        })
    }

    /// Encode raw bytes.
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            payload: STANDARD.encode(bytes),
        }
    }

    /// Read an image file, guessing the MIME type from its extension.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let mime = path
            .extension()
            .and_then(|e| e.to_str())
            .map(mime_for_extension)
            .unwrap_or(DEFAULT_MIME_TYPE);
        Ok(Self::from_bytes(mime, &bytes))
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The base64 payload, without the header.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn decode(&self) -> TypeResult<Vec<u8>> {
        STANDARD
            .decode(self.payload.as_bytes())
            .map_err(|e| TypeError::InvalidBase64(e.to_string()))
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.payload)
    }
}

fn mime_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        _ => DEFAULT_MIME_TYPE,
    }
}
