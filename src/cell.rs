//! A QR symbol as a table cell.
//!
//! Table layout needs to know how much room a cell's content wants before anything is drawn and
//! then draws each cell at a position it chose itself. [`QrCell`] encodes its content up front,
//! reports the symbol extent as its natural content size, and draws the symbol at the cell
//! origin, inset by its padding.
use crate::error::SearchError;
use crate::geometry::{GeometryConfig, Point};
use crate::renderer::Renderer;
use crate::search::min_qrcode;
use crate::surface::Surface;
use crate::symbol::{Encoder, ModuleGrid, QrEncoder};
use crate::PrintOptions;

/// Padding applied on every side of a cell unless set otherwise.
pub const DEFAULT_CELL_PADDING: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct QrCell {
    grid: ModuleGrid,
    geometry: GeometryConfig,
    padding: f64,
}

impl QrCell {
    /// Encodes `content` at the smallest version that fits, using the default encoder.
    ///
    /// # Errors
    ///
    /// Fails like [`min_qrcode`] when the content cannot be encoded.
    pub fn new(content: impl AsRef<[u8]>, options: &PrintOptions) -> Result<Self, SearchError> {
        Self::with_encoder(&QrEncoder, content, options)
    }

    pub fn with_encoder<E: Encoder + ?Sized>(
        encoder: &E,
        content: impl AsRef<[u8]>,
        options: &PrintOptions,
    ) -> Result<Self, SearchError> {
        let outcome = min_qrcode(encoder, content.as_ref(), options.level, &options.geometry)?;
        Ok(Self::from_grid(outcome.grid, options.geometry.clone()))
    }

    /// Wraps an already encoded grid.
    pub fn from_grid(grid: ModuleGrid, geometry: GeometryConfig) -> Self {
        Self { grid, geometry, padding: DEFAULT_CELL_PADDING }
    }

    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn grid(&self) -> &ModuleGrid {
        &self.grid
    }

    pub fn natural_content_width(&self) -> f64 {
        self.renderer().extent()
    }

    pub fn natural_content_height(&self) -> f64 {
        self.renderer().extent()
    }

    /// Cell width including padding on both sides.
    pub fn width(&self) -> f64 {
        self.natural_content_width() + 2.0 * self.padding
    }

    /// Cell height including padding on both sides.
    pub fn height(&self) -> f64 {
        self.natural_content_height() + 2.0 * self.padding
    }

    /// Draws the symbol with the cell's top-left corner at `top_left`.
    ///
    /// The cell position replaces any position or alignment in the geometry.
    pub fn draw<S: Surface>(&self, surface: &mut S, top_left: Point) -> Result<(), S::Error> {
        let geometry = GeometryConfig {
            position: Some(Point::new(top_left.x + self.padding, top_left.y - self.padding)),
            align: None,
            ..self.geometry.clone()
        };
        Renderer::new(&self.grid, geometry).render(surface)
    }

    fn renderer(&self) -> Renderer<'_> {
        Renderer::new(&self.grid, self.geometry.clone())
    }
}
