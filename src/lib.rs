//! # qirust-page
//!
//! A Rust library for placing QR codes on pages as vector graphics.
//!
//! `qirust-page` takes content and an error correction level, finds the smallest QR Code version
//! (1 to 40) that holds it, and draws the symbol on a page surface as a minimal set of filled
//! rectangles: every horizontal run of dark modules becomes one rectangle. Size is given either
//! as a module size (`dot`) or as a total side length (`extent`), and the symbol can be placed at
//! an explicit position or aligned to the page bounds.
//!
//! ## Features
//!
//! - Smallest-version search over any [`symbol::Encoder`], with a default backed by the `qrcode`
//!   crate.
//! - Dot or extent sizing, quiet zone margin, left/center/right alignment.
//! - Custom foreground, background and border colors, and a debug coordinate overlay.
//! - Page surfaces for SVG documents and in-memory images (PNG export), plus a recording
//!   surface for inspecting draw calls.
//! - A table-cell wrapper that reports its natural size before drawing.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qirust-page = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! Print a centered, 144 point wide QR code on an A4 page:
//!
//! ```rust
//! use qirust_page::geometry::{Align, GeometryConfig};
//! use qirust_page::svg::SvgPage;
//! use qirust_page::symbol::EccLevel;
//! use qirust_page::{print_qr_code, PrintOptions};
//!
//! let mut page = SvgPage::a4();
//! let options = PrintOptions {
//!     level: EccLevel::Q,
//!     geometry: GeometryConfig {
//!         extent: Some(144.0),
//!         align: Some(Align::Center),
//!         ..GeometryConfig::default()
//!     },
//! };
//! print_qr_code(&mut page, "https://example.com", &options).unwrap();
//! let svg = page.to_svg_string();
//! assert!(svg.contains("<rect"));
//! ```
//!
//! Render an already encoded grid twice at different sizes:
//!
//! ```rust
//! use qirust_page::geometry::GeometryConfig;
//! use qirust_page::search::min_qrcode;
//! use qirust_page::surface::Recorder;
//! use qirust_page::symbol::{EccLevel, QrEncoder};
//! use qirust_page::render_qr_code;
//!
//! let outcome = min_qrcode(&QrEncoder, b"HELLO", EccLevel::M, &GeometryConfig::default()).unwrap();
//! let mut page = Recorder::new(500.0, 800.0);
//! let small = GeometryConfig { dot: Some(2.0), ..GeometryConfig::default() };
//! let fixed = GeometryConfig { extent: Some(50.0), ..GeometryConfig::default() };
//! render_qr_code(&mut page, &outcome.grid, &small).unwrap();
//! render_qr_code(&mut page, &outcome.grid, &fixed).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`symbol`]: Module grids, versions, levels and the encoder seam.
//! - [`search`]: Smallest-version search and dot size derivation.
//! - [`geometry`]: Sizing and placement options.
//! - [`renderer`]: Run-length rasterization onto a surface.
//! - [`surface`]: The page surface trait and a recording surface.
//! - [`svg`], [`raster`]: Concrete page surfaces.
//! - [`cell`]: QR codes as table cells.
//! - [`helper`]: One-call outputs (SVG string, image buffer, PNG file, text).
#![forbid(unsafe_code)]

pub mod cell;
pub mod color;
pub mod error;
pub mod geometry;
pub mod helper;
pub mod raster;
pub mod renderer;
pub mod search;
pub mod surface;
pub mod svg;
pub mod symbol;

use serde::{Deserialize, Serialize};

pub use crate::cell::QrCell;
pub use crate::color::Rgb;
pub use crate::error::{RenderError, SearchError};
pub use crate::geometry::{Align, GeometryConfig, Point, RenderPlan};
pub use crate::renderer::Renderer;
pub use crate::search::{dotsize, min_qrcode, SearchOutcome};
pub use crate::surface::{Recorder, Surface, SurfaceError};
pub use crate::symbol::{EccLevel, EncodeError, Encoder, ModuleGrid, QrEncoder, Version};

/// Everything [`print_qr_code`] needs besides the content.
///
/// Geometry fields sit next to `level` when (de)serialized:
///
/// ```rust
/// use qirust_page::{EccLevel, PrintOptions};
///
/// let options: PrintOptions = serde_json::from_str(r#"{"level": "h", "extent": 72.0, "align": "right"}"#).unwrap();
/// assert_eq!(options.level, EccLevel::H);
/// assert_eq!(options.geometry.extent, Some(72.0));
/// ```
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintOptions {
    /// Error correction level. Defaults to M.
    pub level: EccLevel,
    #[serde(flatten)]
    pub geometry: GeometryConfig,
}

/// Encodes `content` at the smallest version that fits and draws it on `surface`.
///
/// # Errors
///
/// Returns [`RenderError::Search`] if the content does not fit version 40 at the chosen level; in
/// that case nothing has been drawn. Surface failures come back as [`RenderError::Surface`].
pub fn print_qr_code<S: Surface>(
    surface: &mut S,
    content: impl AsRef<[u8]>,
    options: &PrintOptions,
) -> Result<(), RenderError<S::Error>> {
    print_qr_code_with(&QrEncoder, surface, content, options)
}

/// Like [`print_qr_code`], with a caller-supplied encoder.
pub fn print_qr_code_with<E: Encoder + ?Sized, S: Surface>(
    encoder: &E,
    surface: &mut S,
    content: impl AsRef<[u8]>,
    options: &PrintOptions,
) -> Result<(), RenderError<S::Error>> {
    let outcome = min_qrcode(encoder, content.as_ref(), options.level, &options.geometry)?;
    render_qr_code(surface, &outcome.grid, &options.geometry).map_err(RenderError::Surface)
}

/// Draws an already encoded grid on `surface`.
///
/// # Errors
///
/// Whatever the surface reports, unchanged.
pub fn render_qr_code<S: Surface>(surface: &mut S, grid: &ModuleGrid, config: &GeometryConfig) -> Result<(), S::Error> {
    Renderer::new(grid, config.clone()).render(surface)
}
