//! Drawing surfaces.
//!
//! A [`Surface`] is the page a symbol is drawn on. Coordinates follow the usual page convention:
//! the origin is the bottom-left corner of the current bounds and `y` grows upwards. Inside
//! [`Surface::with_clipped_region`] coordinates are relative to the bottom-left corner of the
//! region, and nothing drawn there shows outside it.
use core::convert::Infallible;

use crate::color::Rgb;
use crate::geometry::Point;

/// The operations the renderer needs from a page.
pub trait Surface {
    /// Error reported by the page. The renderer passes it on unchanged.
    type Error;

    /// Returns the vertical write cursor, in page units from the bottom of the bounds.
    fn cursor(&self) -> f64;

    /// Returns the right edge of the current bounds.
    fn bound_right(&self) -> f64;

    /// Runs `body` inside a clipped region whose top-left corner is at `origin`.
    ///
    /// When the region is closed the cursor moves to its bottom edge.
    fn with_clipped_region<F>(&mut self, origin: Point, width: f64, height: f64, body: F) -> Result<(), Self::Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Self::Error>;

    /// Sets the color used by [`Surface::fill_rectangle`].
    fn set_fill_color(&mut self, color: Rgb) -> Result<(), Self::Error>;

    /// Sets the color used by [`Surface::stroke_bounds`].
    fn set_stroke_color(&mut self, color: Rgb) -> Result<(), Self::Error>;

    /// Fills a rectangle whose top-left corner is at `top_left`, extending right and down.
    fn fill_rectangle(&mut self, top_left: Point, width: f64, height: f64) -> Result<(), Self::Error>;

    /// Strokes the outline of the innermost open region.
    fn stroke_bounds(&mut self) -> Result<(), Self::Error>;

    /// Draws x and y axes from `origin` with a tick every `step` units.
    fn draw_axis_overlay(&mut self, origin: Point, step: f64, color: Rgb) -> Result<(), Self::Error>;
}

/// Errors reported by the page surfaces in this crate.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// A region with a non-positive or non-finite size was requested.
    #[error("invalid region size {width} x {height}")]
    InvalidRegion { width: f64, height: f64 },

    /// The region outline was requested with no region open.
    #[error("no region is open")]
    NoRegion,

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Page size and margins, in page units.
///
/// The bounds are the page minus the margin on every side. Page coordinates (origin at the
/// bottom-left of the bounds, `y` up) are converted to device coordinates (origin at the top-left
/// of the page, `y` down) by [`PageBox::to_device`].
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PageBox {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl PageBox {
    /// ISO A4 in points with a half-inch margin.
    pub const A4: PageBox = PageBox { width: 595.28, height: 841.89, margin: 36.0 };

    pub const fn new(width: f64, height: f64, margin: f64) -> Self {
        Self { width, height, margin }
    }

    /// Width of the bounds.
    pub fn bound_right(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    /// Height of the bounds, which is where the cursor starts.
    pub fn bound_top(&self) -> f64 {
        self.height - 2.0 * self.margin
    }

    pub fn to_device(&self, point: Point) -> Point {
        Point::new(self.margin + point.x, self.height - self.margin - point.y)
    }
}

/// An open clipped region, in page coordinates.
#[derive(Clone, Copy, PartialEq, Debug)]
pub(crate) struct Region {
    pub(crate) top_left: Point,
    pub(crate) width: f64,
    pub(crate) height: f64,
}

impl Region {
    pub(crate) fn checked(origin: Point, width: f64, height: f64) -> Result<Self, SurfaceError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(SurfaceError::InvalidRegion { width, height });
        }
        Ok(Self { top_left: origin, width, height })
    }

    /// Converts a point relative to the region's bottom-left corner to page coordinates.
    pub(crate) fn to_page(&self, local: Point) -> Point {
        Point::new(self.top_left.x + local.x, self.top_left.y - self.height + local.y)
    }

    pub(crate) fn bottom(&self) -> f64 {
        self.top_left.y - self.height
    }
}

/// One call made against a [`Recorder`].
#[derive(Clone, PartialEq, Debug)]
pub enum DrawCommand {
    BeginRegion { origin: Point, width: f64, height: f64 },
    EndRegion,
    FillColor(Rgb),
    StrokeColor(Rgb),
    FillRectangle { top_left: Point, width: f64, height: f64 },
    StrokeBounds,
    AxisOverlay { origin: Point, step: f64, color: Rgb },
}

/// A surface that records every call as a [`DrawCommand`] and never fails.
///
/// Useful for measuring or replaying a render, and for comparing two renders.
#[derive(Clone, PartialEq, Debug)]
pub struct Recorder {
    cursor: f64,
    bound_right: f64,
    commands: Vec<DrawCommand>,
}

impl Recorder {
    /// Creates a recorder whose bounds are `bound_right` wide with the cursor at `cursor`.
    pub fn new(bound_right: f64, cursor: f64) -> Self {
        Self { cursor, bound_right, commands: Vec::new() }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// Returns the rectangles filled so far as `(top_left, width, height)`.
    pub fn filled_rectangles(&self) -> impl Iterator<Item = (Point, f64, f64)> + '_ {
        self.commands.iter().filter_map(|command| match *command {
            DrawCommand::FillRectangle { top_left, width, height } => Some((top_left, width, height)),
            _ => None,
        })
    }

    /// Counts recorded commands matching `pred`.
    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|command| pred(command)).count()
    }
}

impl Surface for Recorder {
    type Error = Infallible;

    fn cursor(&self) -> f64 {
        self.cursor
    }

    fn bound_right(&self) -> f64 {
        self.bound_right
    }

    fn with_clipped_region<F>(&mut self, origin: Point, width: f64, height: f64, body: F) -> Result<(), Self::Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Self::Error>,
    {
        self.commands.push(DrawCommand::BeginRegion { origin, width, height });
        body(self)?;
        self.commands.push(DrawCommand::EndRegion);
        self.cursor = origin.y - height;
        Ok(())
    }

    fn set_fill_color(&mut self, color: Rgb) -> Result<(), Self::Error> {
        self.commands.push(DrawCommand::FillColor(color));
        Ok(())
    }

    fn set_stroke_color(&mut self, color: Rgb) -> Result<(), Self::Error> {
        self.commands.push(DrawCommand::StrokeColor(color));
        Ok(())
    }

    fn fill_rectangle(&mut self, top_left: Point, width: f64, height: f64) -> Result<(), Self::Error> {
        self.commands.push(DrawCommand::FillRectangle { top_left, width, height });
        Ok(())
    }

    fn stroke_bounds(&mut self) -> Result<(), Self::Error> {
        self.commands.push(DrawCommand::StrokeBounds);
        Ok(())
    }

    fn draw_axis_overlay(&mut self, origin: Point, step: f64, color: Rgb) -> Result<(), Self::Error> {
        self.commands.push(DrawCommand::AxisOverlay { origin, step, color });
        Ok(())
    }
}
