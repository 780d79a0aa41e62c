//! Logo files and data URLs.

use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::error::LogoError;

const FALLBACK_MIME: &str = "application/octet-stream";

/// A user-selected image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoFile {
    /// File name as picked, used to guess the MIME type when the bytes are not recognised.
    pub name: Option<String>,
    pub bytes: Vec<u8>,
}

impl LogoFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: Some(name.into()),
            bytes,
        }
    }

    /// Reads a file from disk.
    pub fn read(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        Ok(Self { name, bytes })
    }

    /// MIME type of the file: sniffed from the bytes, then guessed from the extension.
    pub fn mime_type(&self) -> &'static str {
        image::guess_format(&self.bytes)
            .ok()
            .or_else(|| {
                self.name
                    .as_deref()
                    .and_then(|name| ImageFormat::from_path(name).ok())
            })
            .map(|format| format.to_mime_type())
            .unwrap_or(FALLBACK_MIME)
    }

    /// Encodes the file as a `data:` URL.
    pub fn to_data_url(&self) -> String {
        encode_data_url(self.mime_type(), &self.bytes)
    }
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Splits a `data:` URL into its MIME type and decoded payload.
///
/// Payloads without the `;base64` marker are taken verbatim.
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>), LogoError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or(LogoError::MalformedDataUrl)?;
    let (meta, payload) = rest.split_once(',').ok_or(LogoError::MalformedDataUrl)?;

    let mut params = meta.split(';');
    let mime = params.next().unwrap_or_default();
    let mime = if mime.is_empty() { "text/plain" } else { mime };
    let is_base64 = params.any(|p| p.eq_ignore_ascii_case("base64"));

    let bytes = if is_base64 {
        STANDARD.decode(payload.trim())?
    } else {
        payload.as_bytes().to_vec()
    };
    Ok((mime.to_string(), bytes))
}

/// Loads the pixels behind a logo source.
///
/// Data URLs are decoded in place and anything else is read as a local path. Remote URLs are
/// refused; `cross_origin` is carried into the error for diagnostics.
pub fn load_logo(source: &str, cross_origin: bool) -> Result<DynamicImage, LogoError> {
    if source.starts_with("data:") {
        let (mime, bytes) = decode_data_url(source)?;
        debug!(%mime, len = bytes.len(), "decoding logo data URL");
        return Ok(image::load_from_memory(&bytes)?);
    }
    if source.starts_with("http://") || source.starts_with("https://") {
        return Err(LogoError::Remote {
            url: source.to_string(),
            cross_origin,
        });
    }
    let bytes = fs::read(source)?;
    Ok(image::load_from_memory(&bytes)?)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Cursor;

    use image::{Rgba, RgbaImage};

    use super::*;

    pub(crate) fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba(color));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_png_data_url_prefix() {
        let file = LogoFile::new("logo.bin", png_bytes(4, 4, [255, 0, 0, 255]));
        assert_eq!(file.mime_type(), "image/png");
        assert!(file.to_data_url().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_mime_from_extension_then_fallback() {
        let named = LogoFile::new("logo.jpg", vec![1, 2, 3]);
        assert_eq!(named.mime_type(), "image/jpeg");
        let anonymous = LogoFile {
            name: None,
            bytes: vec![1, 2, 3],
        };
        assert_eq!(anonymous.mime_type(), FALLBACK_MIME);
    }

    #[test]
    fn test_decode_data_url() {
        let url = encode_data_url("image/png", b"abc");
        let (mime, bytes) = decode_data_url(&url).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"abc");

        let (mime, bytes) = decode_data_url("data:,hello").unwrap();
        assert_eq!(mime, "text/plain");
        assert_eq!(bytes, b"hello");

        assert!(matches!(decode_data_url("hello"), Err(LogoError::MalformedDataUrl)));
    }

    #[test]
    fn test_load_logo_from_data_url() {
        let url = LogoFile::new("l.png", png_bytes(3, 2, [0, 0, 255, 255])).to_data_url();
        let img = load_logo(&url, false).unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
    }

    #[test]
    fn test_remote_logo_refused() {
        let err = load_logo("https://example.com/logo.png", true).unwrap_err();
        assert!(matches!(err, LogoError::Remote { cross_origin: true, .. }));
    }
}
