//! Image Export Module for Viral Post
//!
//! Turns the rendered post card into a PNG through an ordered chain of
//! strategies, then hands the result to one of the output sinks.
//!
//! # Strategies
//!
//! 1. **Library rasterization**: crop the card out of a window screenshot
//! 2. **Vector reconstruction**: rebuild the card as SVG and render it
//! 3. **Manual canvas**: paint a minimal placeholder card
//!
//! # Architecture
//!
//! - `pipeline.rs` - Strategy trait, raster request and the fallback driver
//! - `capture.rs` - Library tier and viewport frame cropping
//! - `svg.rs` - SVG document builder and vector tier
//! - `canvas.rs` - Manual canvas tier
//! - `fonts.rs` - Font data bundled with egui
//! - `artifact.rs` - PNG encoding, file naming and atomic writes
//! - `download.rs`, `clipboard.rs`, `print.rs` - Output sinks

pub mod artifact;
pub mod canvas;
pub mod capture;
pub mod clipboard;
pub mod download;
pub mod fonts;
pub mod pipeline;
pub mod print;
pub mod svg;

pub use artifact::{ExportArtifact, SinkError};
pub use canvas::CanvasTier;
pub use capture::{frame_from_color_image, FrameCapture, LibraryTier};
pub use clipboard::{copy_or_download, CopyOutcome, SystemClipboard};
pub use download::{open_saved, resolve_export_dir, save_artifact};
pub use pipeline::{ExportError, ExportPipeline, RasterRequest};
pub use print::open_print_document;
pub use svg::VectorTier;
