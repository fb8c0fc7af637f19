//! `data:` URL encoding of edited rasters.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{Error, Result};

/// MIME type of rendered editor output.
pub const PNG_MIME: &str = "image/png";

/// A raster decoded from a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Declared MIME type
    pub mime: String,
    /// Encoded image bytes
    pub bytes: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Wrap encoded image bytes in a base64 `data:` URL.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Parse a base64 `data:` URL and check that it holds a decodable raster.
pub fn decode_data_url(url: &str) -> Result<DecodedImage> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| Error::invalid_data_url("missing data: scheme"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::invalid_data_url("missing payload separator"))?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| Error::invalid_data_url("payload is not base64"))?;
    if !mime.starts_with("image/") {
        return Err(Error::invalid_data_url(format!("unsupported type '{mime}'")));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::invalid_data_url(e.to_string()))?;
    let image = image::load_from_memory(&bytes)?;

    Ok(DecodedImage {
        mime: mime.to_string(),
        width: image.width(),
        height: image.height(),
        bytes,
    })
}
