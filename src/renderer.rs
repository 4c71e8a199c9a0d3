//! Turning a module grid into filled rectangles.
//!
//! Each row is scanned left to right and every maximal horizontal run of dark modules becomes a
//! single rectangle, so the number of draw calls follows the number of runs rather than the
//! number of dark modules.
use crate::color::Rgb;
use crate::geometry::{GeometryConfig, Point, RenderPlan};
use crate::surface::Surface;
use crate::symbol::ModuleGrid;

/// Step between ticks of the debug overlay, in page units.
pub const DEBUG_AXIS_STEP: f64 = 50.0;

/// Color of the debug overlay.
pub const DEBUG_AXIS_COLOR: Rgb = Rgb::new(0x0C, 0x0C, 0x0C);

/// Anchor of the debug overlay, just outside the bottom-left corner of the region.
pub const DEBUG_AXIS_ORIGIN: Point = Point::new(-1.0, -1.0);

/// A maximal horizontal run of dark modules.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct DarkRun {
    pub row: usize,
    pub start: usize,
    pub len: usize,
}

/// Iterates over the dark runs of `grid`, row by row from the top, left to right within a row.
pub fn dark_runs(grid: &ModuleGrid) -> impl Iterator<Item = DarkRun> + '_ {
    grid.rows().enumerate().flat_map(|(row, cells)| {
        let mut runs = Vec::new();
        let mut len = 0;
        for (col, &dark) in cells.iter().enumerate() {
            if dark {
                len += 1;
            } else if len > 0 {
                runs.push(DarkRun { row, start: col - len, len });
                len = 0;
            }
        }
        if len > 0 {
            runs.push(DarkRun { row, start: cells.len() - len, len });
        }
        runs
    })
}

/// Draws one module grid with one geometry.
///
/// The dot size and extent are fixed at construction, so a layout can ask for
/// [`Renderer::extent`] before anything is drawn. The position depends on the page and is
/// resolved in [`Renderer::render`].
///
/// # Example
///
/// ```rust
/// use qirust_page::geometry::GeometryConfig;
/// use qirust_page::renderer::Renderer;
/// use qirust_page::surface::Recorder;
/// use qirust_page::symbol::{ModuleGrid, Version};
///
/// let grid = ModuleGrid::from_fn(Version::MIN, |row, _| row == 0);
/// let renderer = Renderer::new(&grid, GeometryConfig::default());
/// assert_eq!(renderer.extent(), 29.0);
///
/// let mut page = Recorder::new(500.0, 700.0);
/// renderer.render(&mut page).unwrap();
/// assert_eq!(page.filled_rectangles().count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Renderer<'g> {
    grid: &'g ModuleGrid,
    config: GeometryConfig,
    dot: f64,
    extent: f64,
}

impl<'g> Renderer<'g> {
    pub fn new(grid: &'g ModuleGrid, config: GeometryConfig) -> Self {
        let side = grid.side_len();
        Self { dot: config.dot_for(side), extent: config.extent_for(side), grid, config }
    }

    pub fn grid(&self) -> &ModuleGrid {
        self.grid
    }

    pub fn config(&self) -> &GeometryConfig {
        &self.config
    }

    /// Edge length of one module.
    pub fn dot(&self) -> f64 {
        self.dot
    }

    /// Side length of the symbol box, margin included.
    pub fn extent(&self) -> f64 {
        self.extent
    }

    /// Resolves the final placement against the current state of `surface`.
    pub fn plan<S: Surface + ?Sized>(&self, surface: &S) -> RenderPlan {
        RenderPlan {
            dot: self.dot,
            extent: self.extent,
            margin: self.config.margin,
            position: self.config.position_for(self.extent, surface.bound_right(), surface.cursor()),
        }
    }

    /// Draws the symbol on `surface`.
    ///
    /// # Errors
    ///
    /// Whatever the surface reports, unchanged.
    pub fn render<S: Surface>(&self, surface: &mut S) -> Result<(), S::Error> {
        let plan = self.plan(surface);
        let config = &self.config;
        surface.with_clipped_region(plan.position, plan.extent, plan.extent, |surface| {
            surface.set_fill_color(config.background_color)?;
            surface.set_fill_color(config.foreground_color)?;
            self.fill_runs(surface, &plan)?;

            if config.stroke {
                surface.set_stroke_color(config.stroke_color)?;
                surface.stroke_bounds()?;
            }
            if config.debug {
                surface.draw_axis_overlay(DEBUG_AXIS_ORIGIN, DEBUG_AXIS_STEP, DEBUG_AXIS_COLOR)?;
            }
            Ok(())
        })
    }

    fn fill_runs<S: Surface>(&self, surface: &mut S, plan: &RenderPlan) -> Result<(), S::Error> {
        let margin = plan.margin * plan.dot;
        let top = margin + self.grid.side_len() as f64 * plan.dot;
        for run in dark_runs(self.grid) {
            let top_left = Point::new(margin + run.start as f64 * plan.dot, top - run.row as f64 * plan.dot);
            surface.fill_rectangle(top_left, run.len as f64 * plan.dot, plan.dot)?;
        }
        Ok(())
    }
}
