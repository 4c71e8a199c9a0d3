//! A vector page that renders to an SVG document.
use core::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::color::Rgb;
use crate::geometry::Point;
use crate::surface::{PageBox, Region, Surface, SurfaceError};

/// A single SVG page with a write cursor.
///
/// Clipped regions become `<clipPath>` groups and every filled rectangle becomes one `<rect>`.
/// The document always uses Unix newlines (\n), regardless of the platform.
///
/// # Example
///
/// ```rust
/// use qirust_page::{print_qr_code, PrintOptions};
/// use qirust_page::svg::SvgPage;
///
/// let mut page = SvgPage::a4();
/// print_qr_code(&mut page, "https://example.com", &PrintOptions::default()).unwrap();
/// assert!(page.to_svg_string().contains("<clipPath"));
/// ```
#[derive(Debug, Clone)]
pub struct SvgPage {
    page: PageBox,
    cursor: f64,
    fill: Rgb,
    stroke: Rgb,
    regions: Vec<Region>,
    next_clip_id: usize,
    body: String,
}

impl SvgPage {
    pub fn new(page: PageBox) -> Self {
        Self {
            cursor: page.bound_top(),
            page,
            fill: Rgb::BLACK,
            stroke: Rgb::BLACK,
            regions: Vec::new(),
            next_clip_id: 0,
            body: String::new(),
        }
    }

    /// An A4 page with half-inch margins.
    pub fn a4() -> Self {
        Self::new(PageBox::A4)
    }

    pub fn page(&self) -> PageBox {
        self.page
    }

    /// Moves the cursor down by `amount`.
    pub fn move_down(&mut self, amount: f64) {
        self.cursor -= amount;
    }

    /// Moves the cursor to `y`.
    pub fn move_cursor_to(&mut self, y: f64) {
        self.cursor = y;
    }

    /// Writes one line of text at the cursor and moves the cursor below it.
    pub fn text(&mut self, line: &str, size: f64) {
        let baseline = self.page.to_device(Point::new(0.0, self.cursor - size));
        let _ = writeln!(
            self.body,
            "\t<text x=\"{}\" y=\"{}\" font-family=\"Helvetica\" font-size=\"{}\" fill=\"#{}\">{}</text>",
            num(baseline.x),
            num(baseline.y),
            num(size),
            self.fill,
            escape(line)
        );
        self.cursor -= size * 1.2;
    }

    /// Returns the finished SVG document.
    pub fn to_svg_string(&self) -> String {
        let mut result = String::new();
        result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
        result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
        result += &format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{0}\" height=\"{1}\" viewBox=\"0 0 {0} {1}\" stroke=\"none\">\n",
            num(self.page.width),
            num(self.page.height)
        );
        result += &self.body;
        result += "</svg>\n";
        result
    }

    /// Writes the document to `path`, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SurfaceError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_svg_string())?;
        debug!(path = %path.display(), "wrote svg page");
        Ok(())
    }

    fn region_to_page(&self, local: Point) -> Point {
        match self.regions.last() {
            Some(region) => region.to_page(local),
            None => local,
        }
    }

    fn indent(&self) -> String {
        "\t".repeat(self.regions.len() + 1)
    }
}

impl Surface for SvgPage {
    type Error = SurfaceError;

    fn cursor(&self) -> f64 {
        self.cursor
    }

    fn bound_right(&self) -> f64 {
        self.page.bound_right()
    }

    fn with_clipped_region<F>(&mut self, origin: Point, width: f64, height: f64, body: F) -> Result<(), Self::Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Self::Error>,
    {
        // Nested regions are given relative to the enclosing one.
        let top_left = self.region_to_page(origin);
        let region = Region::checked(top_left, width, height)?;
        let corner = self.page.to_device(top_left);
        let id = self.next_clip_id;
        self.next_clip_id += 1;

        let indent = self.indent();
        let _ = writeln!(
            self.body,
            "{indent}<clipPath id=\"qr-clip-{id}\"><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/></clipPath>",
            num(corner.x),
            num(corner.y),
            num(width),
            num(height)
        );
        let _ = writeln!(self.body, "{indent}<g clip-path=\"url(#qr-clip-{id})\">");
        self.regions.push(region);
        let result = body(self);
        self.regions.pop();
        let _ = writeln!(self.body, "{indent}</g>");
        result?;
        self.cursor = region.bottom();
        Ok(())
    }

    fn set_fill_color(&mut self, color: Rgb) -> Result<(), Self::Error> {
        self.fill = color;
        Ok(())
    }

    fn set_stroke_color(&mut self, color: Rgb) -> Result<(), Self::Error> {
        self.stroke = color;
        Ok(())
    }

    fn fill_rectangle(&mut self, top_left: Point, width: f64, height: f64) -> Result<(), Self::Error> {
        let corner = self.page.to_device(self.region_to_page(top_left));
        // Edges are rounded, not sizes, so touching rectangles stay touching.
        let (x0, y0) = (round(corner.x), round(corner.y));
        let (x1, y1) = (round(corner.x + width), round(corner.y + height));
        let indent = self.indent();
        let _ = writeln!(
            self.body,
            "{indent}<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#{}\"/>",
            num(x0),
            num(y0),
            num(x1 - x0),
            num(y1 - y0),
            self.fill
        );
        Ok(())
    }

    fn stroke_bounds(&mut self) -> Result<(), Self::Error> {
        let region = *self.regions.last().ok_or(SurfaceError::NoRegion)?;
        let corner = self.page.to_device(region.top_left);
        let indent = self.indent();
        let _ = writeln!(
            self.body,
            "{indent}<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"#{}\" stroke-width=\"1\"/>",
            num(corner.x),
            num(corner.y),
            num(region.width),
            num(region.height),
            self.stroke
        );
        Ok(())
    }

    fn draw_axis_overlay(&mut self, origin: Point, step: f64, color: Rgb) -> Result<(), Self::Error> {
        let (width, height) = match self.regions.last() {
            Some(region) => (region.width, region.height),
            None => (self.page.bound_right(), self.page.bound_top()),
        };
        let start = self.page.to_device(self.region_to_page(origin));
        let x_end = self.page.to_device(self.region_to_page(Point::new(width, origin.y)));
        let y_end = self.page.to_device(self.region_to_page(Point::new(origin.x, height)));

        let mut path = format!(
            "M{},{}H{}M{},{}V{}",
            num(start.x),
            num(start.y),
            num(x_end.x),
            num(start.x),
            num(start.y),
            num(y_end.y)
        );
        if step > 0.0 {
            let mut offset = step;
            while offset <= width {
                let tick = self.page.to_device(self.region_to_page(Point::new(origin.x + offset, origin.y)));
                let _ = write!(path, "M{},{}v-2v4", num(tick.x), num(tick.y));
                offset += step;
            }
            offset = step;
            while offset <= height {
                let tick = self.page.to_device(self.region_to_page(Point::new(origin.x, origin.y + offset)));
                let _ = write!(path, "M{},{}h-2h4", num(tick.x), num(tick.y));
                offset += step;
            }
        }
        let indent = self.indent();
        let _ = writeln!(
            self.body,
            "{indent}<path d=\"{path}\" fill=\"none\" stroke=\"#{color}\" stroke-width=\"0.5\"/>"
        );
        Ok(())
    }
}

/// Decimal places written for coordinates and sizes.
const PRECISION: usize = 4;

fn round(value: f64) -> f64 {
    let scale = 10f64.powi(PRECISION as i32);
    (value * scale).round() / scale
}

/// Formats a coordinate with at most [`PRECISION`] decimals and no trailing zeros.
fn num(value: f64) -> String {
    let text = format!("{value:.prec$}", prec = PRECISION);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        return "0".to_string();
    }
    text.to_string()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
