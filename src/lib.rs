//! # qrstudio
//!
//! A Rust library for configuring, rendering and exporting styled QR codes.
//!
//! `qrstudio` keeps one [`Configuration`](config::Configuration) per session, changes it one
//! field at a time, renders it into a styled canvas and exports that canvas as `qr-code.png`.
//! QR matrix encoding is delegated to the [`qrcode`] crate; everything drawn on top of the matrix
//! (dot styles, finder eyes, logo overlay) and the PNG export happen here.
//!
//! ## Features
//!
//! - Pure single-field state updates through [`store::reduce`], with an observable store.
//! - Logo ingestion from files into `data:` URLs.
//! - Squares, dots and fluid module styles; colored, rounded finder eyes.
//! - Logo overlay with opacity, square or circular padding and optional module clearing.
//! - Transparent or background-filled PNG export with a bounded, awaited retry while the
//!   canvas paints.
//! - JSON load/save of configurations.
//!
//! ## Example
//!
//! Render a configuration and export it into a directory:
//!
//! ```rust
//! use qrstudio::export::{Exporter, FileSink, LogNotifier};
//! use qrstudio::render::RenderSurface;
//! use qrstudio::store::{OptionStore, Update};
//! use qrstudio::config::DotStyle;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut store = OptionStore::new();
//!     store.set(Update::Content("Hello, World!".to_string()));
//!     store.set(Update::DotStyle(DotStyle::Dots));
//!
//!     let mut surface = RenderSurface::new();
//!     let handle = surface.render(store.config()).expect("render");
//!
//!     let dir = std::env::temp_dir().join("qrstudio-doc");
//!     let mut exporter = Exporter::new(FileSink::new(&dir), LogNotifier);
//!     let receipt = exporter.export(store.config(), &handle).await.expect("export");
//!     assert_eq!(receipt.file_name, "qr-code.png");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: The configuration model, field names and JSON persistence.
//! - [`color`]: Color string parsing.
//! - [`store`]: Single-field updates and the observable option store.
//! - [`logo`]: Logo files and data URLs.
//! - [`render`]: The render surface and styled rasterizer.
//! - [`poll`]: Async poll-with-backoff over an injectable clock.
//! - [`export`]: Canvas compositing, PNG encoding and delivery.
//! - [`details`]: Summary text shown beside the preview.

#![forbid(unsafe_code)]

pub mod color;
pub mod config;
pub mod details;
pub mod error;
pub mod export;
pub mod logo;
pub mod poll;
pub mod render;
pub mod store;

pub use config::Configuration;
pub use error::{ColorError, ConfigError, ExportError, LogoError, RenderError};
pub use store::{reduce, OptionStore, Update};
