//! PNG export of the rendered canvas.
//!
//! An export locates the canvas through the handle returned by the render step, composites it
//! onto a fresh image (filled with the background color unless the configuration asks for a
//! transparent export), encodes the result as PNG and hands it to a [`DownloadSink`]. A canvas
//! that is not painted yet is waited for on the [`Backoff::export`] schedule; when every attempt
//! fails the user is alerted once through a [`Notifier`].

use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use image::{imageops, ImageFormat, RgbaImage};
use tracing::{debug, error, info, warn};

use crate::color::Color;
use crate::config::Configuration;
use crate::error::ExportError;
use crate::poll::{poll_with_backoff, Backoff, Clock, TokioClock};
use crate::render::CanvasSource;

/// Name given to every exported file.
pub const EXPORT_FILE_NAME: &str = "qr-code.png";

/// Message shown when the canvas never became available.
pub const EXPORT_FAILED_MESSAGE: &str =
    "Unable to download QR code. Please try again or refresh the page.";

/// Receives finished downloads.
pub trait DownloadSink {
    /// Delivers one file; returns where it ended up, if anywhere on disk.
    fn deliver(&mut self, file_name: &str, png: &[u8]) -> io::Result<Option<PathBuf>>;
}

/// Shows failure notices to the user.
pub trait Notifier {
    fn alert(&mut self, message: &str);
}

/// Writes downloads into a directory, creating it when missing.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for FileSink {
    fn deliver(&mut self, file_name: &str, png: &[u8]) -> io::Result<Option<PathBuf>> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        let path = self.dir.join(file_name);
        fs::write(&path, png)?;
        Ok(Some(path))
    }
}

/// A delivered file kept in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub png: Vec<u8>,
}

/// Keeps downloads in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub downloads: Vec<Download>,
}

impl DownloadSink for MemorySink {
    fn deliver(&mut self, file_name: &str, png: &[u8]) -> io::Result<Option<PathBuf>> {
        self.downloads.push(Download {
            file_name: file_name.to_string(),
            png: png.to_vec(),
        });
        Ok(None)
    }
}

/// Prints alerts on standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

/// Only logs alerts.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&mut self, message: &str) {
        warn!(%message, "user alert");
    }
}

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub file_name: &'static str,
    pub width: u32,
    pub height: u32,
    pub transparent: bool,
    /// One-based number of the attempt that succeeded.
    pub attempt: usize,
    pub path: Option<PathBuf>,
}

/// Builds the exported image from a rendered canvas.
///
/// The background fill only happens for non-transparent exports, but the canvas is always
/// drawn on top, so the fill shows only where the canvas itself is transparent.
pub fn compose(canvas: &RgbaImage, config: &Configuration) -> RgbaImage {
    let mut out = RgbaImage::new(canvas.width(), canvas.height());
    if !config.transparent_background {
        let fill = Color::parse_or_black(&config.background_color);
        for pixel in out.pixels_mut() {
            *pixel = fill.into();
        }
    }
    imageops::overlay(&mut out, canvas, 0, 0);
    out
}

/// Encodes an image as PNG bytes.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

/// Runs exports against a sink, a notifier and a clock.
#[derive(Debug)]
pub struct Exporter<S, N, C = TokioClock> {
    sink: S,
    notifier: N,
    clock: C,
    backoff: Backoff,
}

impl<S: DownloadSink, N: Notifier> Exporter<S, N, TokioClock> {
    pub fn new(sink: S, notifier: N) -> Self {
        Self::with_clock(sink, notifier, TokioClock)
    }
}

impl<S: DownloadSink, N: Notifier, C: Clock> Exporter<S, N, C> {
    pub fn with_clock(sink: S, notifier: N, clock: C) -> Self {
        Self {
            sink,
            notifier,
            clock,
            backoff: Backoff::export(),
        }
    }

    /// Replaces the default retry schedule.
    pub fn backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Exports whatever `source` currently holds.
    ///
    /// At most one file is delivered per call. Delays between attempts are awaited, so a paint
    /// scheduled on the same runtime can land before the next attempt. When every attempt fails
    /// the notifier is alerted exactly once and [`ExportError::Exhausted`] is returned.
    pub async fn export(
        &mut self,
        config: &Configuration,
        source: &dyn CanvasSource,
    ) -> Result<ExportReceipt, ExportError> {
        let sink = &mut self.sink;
        let result = poll_with_backoff(&mut self.clock, &self.backoff, |attempt| {
            attempt_export(config, source, &mut *sink, attempt + 1)
        })
        .await;

        result.map_err(|exhausted| {
            error!(
                attempts = exhausted.attempts,
                err = %exhausted.last,
                "failed to find QR canvas after multiple attempts"
            );
            self.notifier.alert(EXPORT_FAILED_MESSAGE);
            ExportError::Exhausted {
                attempts: exhausted.attempts,
                last: Box::new(exhausted.last),
            }
        })
    }
}

fn attempt_export<S: DownloadSink + ?Sized>(
    config: &Configuration,
    source: &dyn CanvasSource,
    sink: &mut S,
    attempt: usize,
) -> Result<ExportReceipt, ExportError> {
    let canvas = source.locate().ok_or(ExportError::CanvasNotFound)?;
    debug!(
        width = canvas.width(),
        height = canvas.height(),
        transparent = config.transparent_background,
        attempt,
        "found canvas for export"
    );

    let png = encode_png(&compose(&canvas, config))?;
    let path = sink.deliver(EXPORT_FILE_NAME, &png)?;
    info!(file = EXPORT_FILE_NAME, bytes = png.len(), ?path, "export delivered");

    Ok(ExportReceipt {
        file_name: EXPORT_FILE_NAME,
        width: canvas.width(),
        height: canvas.height(),
        transparent: config.transparent_background,
        attempt,
        path,
    })
}
