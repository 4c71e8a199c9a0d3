//! Sizing and placement of a symbol on a page.
//!
//! A [`GeometryConfig`] carries what the caller asked for. Combined with the side length of a
//! module grid and two readings from the page (the right edge of the current bounds and the
//! vertical cursor), it resolves into a [`RenderPlan`] holding the final dot size, extent and
//! position. Inputs are trusted: negative sizes are carried through as-is.
use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Module edge length used when neither `dot` nor `extent` is given.
pub const DEFAULT_DOT: f64 = 1.0;

/// Quiet zone width around the symbol, in modules.
pub const DEFAULT_MARGIN: f64 = 4.0;

/// A point in page units. `y` grows upwards.
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Horizontal alignment relative to the current page bounds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    /// Returns the x-coordinate of a box of width `extent` aligned inside `[0, bound_right]`.
    pub fn x_for(self, bound_right: f64, extent: f64) -> f64 {
        match self {
            Align::Left => 0.0,
            Align::Center => bound_right / 2.0 - extent / 2.0,
            Align::Right => bound_right - extent,
        }
    }
}

/// How a symbol should be sized, placed and painted.
///
/// When `extent` is set it is authoritative: the dot size is derived from it and any `dot` value
/// is ignored.
///
/// # Example
///
/// ```rust
/// use qirust_page::geometry::{Align, GeometryConfig};
///
/// let config = GeometryConfig {
///     extent: Some(144.0),
///     align: Some(Align::Center),
///     ..GeometryConfig::default()
/// };
/// assert_eq!(config.dot_for(21), 144.0 / 29.0);
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Edge length of one module in page units. Defaults to [`DEFAULT_DOT`].
    pub dot: Option<f64>,
    /// Total side length including the margin. Takes precedence over `dot`.
    pub extent: Option<f64>,
    /// Quiet zone width in modules. Defaults to [`DEFAULT_MARGIN`].
    pub margin: f64,
    /// Top-left corner of the symbol box. Defaults to `(0, cursor)`.
    pub position: Option<Point>,
    /// Overrides `position.x` relative to the right edge of the page bounds.
    pub align: Option<Align>,
    /// Draw a border around the symbol box. Defaults to `true`.
    pub stroke: bool,
    /// Color of dark modules. Defaults to black.
    pub foreground_color: Rgb,
    /// Color of light modules. Defaults to white.
    pub background_color: Rgb,
    /// Color of the border. Defaults to black.
    pub stroke_color: Rgb,
    /// Draw a coordinate overlay inside the symbol box.
    pub debug: bool,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            dot: None,
            extent: None,
            margin: DEFAULT_MARGIN,
            position: None,
            align: None,
            stroke: true,
            foreground_color: Rgb::BLACK,
            background_color: Rgb::WHITE,
            stroke_color: Rgb::BLACK,
            debug: false,
        }
    }
}

impl GeometryConfig {
    /// Number of dot lengths spanned by a grid of `side` modules plus both margins.
    pub fn span(&self, side: usize) -> f64 {
        2.0 * self.margin + side as f64
    }

    /// Resolves the dot size for a grid of `side` modules.
    pub fn dot_for(&self, side: usize) -> f64 {
        match self.extent {
            Some(extent) => extent / self.span(side),
            None => self.dot.unwrap_or(DEFAULT_DOT),
        }
    }

    /// Resolves the extent for a grid of `side` modules.
    pub fn extent_for(&self, side: usize) -> f64 {
        self.extent
            .unwrap_or_else(|| self.span(side) * self.dot.unwrap_or(DEFAULT_DOT))
    }

    /// Resolves the top-left corner of a box of width `extent`.
    ///
    /// # Arguments
    ///
    /// * `extent` - The resolved extent of the symbol box.
    /// * `bound_right` - The right edge of the current page bounds, used by `align`.
    /// * `cursor_y` - The current vertical cursor, used when no position was given.
    pub fn position_for(&self, extent: f64, bound_right: f64, cursor_y: f64) -> Point {
        let mut position = self.position.unwrap_or(Point::new(0.0, cursor_y));
        if let Some(align) = self.align {
            position.x = align.x_for(bound_right, extent);
        }
        position
    }

    /// Resolves everything needed to draw a grid of `side` modules.
    pub fn resolve(&self, side: usize, bound_right: f64, cursor_y: f64) -> RenderPlan {
        let extent = self.extent_for(side);
        RenderPlan {
            dot: self.dot_for(side),
            extent,
            margin: self.margin,
            position: self.position_for(extent, bound_right, cursor_y),
        }
    }
}

/// Final geometry of one render call.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RenderPlan {
    pub dot: f64,
    pub extent: f64,
    pub margin: f64,
    pub position: Point,
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_defaults() {
        let plan = GeometryConfig::default().resolve(21, 500.0, 700.0);
        assert_eq!(plan.dot, 1.0);
        assert_eq!(plan.extent, 29.0);
        assert_eq!(plan.margin, 4.0);
        assert_eq!(plan.position, Point::new(0.0, 700.0));
    }

    #[test]
    fn test_dot_scales_extent() {
        let config = GeometryConfig { dot: Some(3.0), margin: 2.0, ..GeometryConfig::default() };
        assert_eq!(config.extent_for(25), 3.0 * 29.0);
        assert_eq!(config.dot_for(25), 3.0);
    }

    #[test]
    fn test_extent_overrides_dot() {
        let config = GeometryConfig { dot: Some(10.0), extent: Some(58.0), ..GeometryConfig::default() };
        let plan = config.resolve(21, 0.0, 0.0);
        assert!((plan.dot - 2.0).abs() < EPS);
        assert_eq!(plan.extent, 58.0);
    }

    #[test]
    fn test_explicit_position_kept_without_align() {
        let config = GeometryConfig { position: Some(Point::new(150.0, 300.0)), ..GeometryConfig::default() };
        assert_eq!(config.resolve(21, 500.0, 700.0).position, Point::new(150.0, 300.0));
    }

    #[test]
    fn test_align_overrides_x() {
        let base = GeometryConfig {
            extent: Some(100.0),
            position: Some(Point::new(42.0, 10.0)),
            ..GeometryConfig::default()
        };
        let at = |align| GeometryConfig { align: Some(align), ..base.clone() }.resolve(21, 500.0, 0.0).position;
        assert_eq!(at(Align::Left), Point::new(0.0, 10.0));
        assert_eq!(at(Align::Center), Point::new(200.0, 10.0));
        assert_eq!(at(Align::Right), Point::new(400.0, 10.0));
    }

    #[test]
    fn test_negative_values_pass_through() {
        let config = GeometryConfig { dot: Some(-1.0), margin: -2.0, ..GeometryConfig::default() };
        let plan = config.resolve(21, 0.0, 0.0);
        assert_eq!(plan.dot, -1.0);
        assert_eq!(plan.extent, -17.0);
        assert_eq!(plan.margin, -2.0);
    }
}
