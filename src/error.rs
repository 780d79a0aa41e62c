//! Error types for configuration, rendering and export.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while converting or loading configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown configuration field `{0}`")]
    UnknownField(String),
    #[error("field `{field}` expects a {expected} value")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },
    #[error("`{value}` is not a valid value for `{field}`")]
    UnknownVariant { field: &'static str, value: String },
    #[error("{value} cannot be stored in `{field}`")]
    Unrepresentable { field: &'static str, value: i64 },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("cannot access configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A color string that could not be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid color `{0}`")]
pub struct ColorError(pub String);

/// Errors raised while turning a logo source into pixels.
#[derive(Debug, Error)]
pub enum LogoError {
    #[error("malformed data URL")]
    MalformedDataUrl,
    #[error("remote logo `{url}` is not fetched (cross-origin mode: {cross_origin})")]
    Remote { url: String, cross_origin: bool },
    #[error(transparent)]
    Base64(#[from] base64::DecodeError),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Errors raised while painting a configuration onto a canvas.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot encode content: {0}")]
    Encode(#[from] qrcode::types::QrError),
    #[error("nothing to paint, call `update` first")]
    NothingPending,
    #[error("canvas of size {size} with quiet zone {quiet_zone} exceeds the pixel limit")]
    CanvasTooLarge { size: u32, quiet_zone: u32 },
}

/// Errors raised by the export routine.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("rendered canvas not found")]
    CanvasNotFound,
    #[error("cannot encode PNG: {0}")]
    Encode(#[from] image::ImageError),
    #[error("cannot deliver download: {0}")]
    Delivery(#[from] io::Error),
    #[error("export failed after {attempts} attempts: {last}")]
    Exhausted {
        attempts: usize,
        last: Box<ExportError>,
    },
}
