use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use image::RgbImage;

use crate::error::RenderError;
use crate::geometry::{GeometryConfig, Point};
use crate::raster::RasterPage;
use crate::renderer::Renderer;
use crate::search::min_qrcode;
use crate::surface::{PageBox, SurfaceError};
use crate::svg::SvgPage;
use crate::symbol::{ModuleGrid, QrEncoder};
use crate::PrintOptions;

/*---- Utilities ----*/

/// Directory used by [`qr_to_image_and_save`] when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = "generated";

/// A page that fits one symbol exactly, with the symbol box at its top-left corner.
fn symbol_page(renderer: &Renderer<'_>) -> (PageBox, GeometryConfig) {
    let extent = renderer.extent();
    let config = GeometryConfig {
        position: Some(Point::new(0.0, extent)),
        align: None,
        ..renderer.config().clone()
    };
    (PageBox::new(extent, extent, 0.0), config)
}

/// Returns an SVG document containing only the given grid, drawn with `config`.
///
/// The document is exactly one extent wide and high; any position or alignment in `config` is
/// ignored.
///
/// # Errors
///
/// Returns [`SurfaceError::InvalidRegion`] when the extent is not positive.
pub fn to_svg_string(grid: &ModuleGrid, config: &GeometryConfig) -> Result<String, SurfaceError> {
    let renderer = Renderer::new(grid, config.clone());
    let (page_box, config) = symbol_page(&renderer);
    let mut page = SvgPage::new(page_box);
    Renderer::new(grid, config).render(&mut page)?;
    Ok(page.to_svg_string())
}

/// Returns an image of the given grid, `scale` pixels per page unit.
///
/// # Example
///
/// ```rust
/// use qirust_page::geometry::GeometryConfig;
/// use qirust_page::helper::to_image_buffer;
/// use qirust_page::symbol::{ModuleGrid, Version};
///
/// let grid = ModuleGrid::from_fn(Version::MIN, |row, col| (row + col) % 2 == 0);
/// let img = to_image_buffer(&grid, &GeometryConfig::default(), 2.0).unwrap();
/// assert_eq!(img.dimensions(), (58, 58));
/// ```
pub fn to_image_buffer(grid: &ModuleGrid, config: &GeometryConfig, scale: f64) -> Result<RgbImage, SurfaceError> {
    let renderer = Renderer::new(grid, config.clone());
    let (page_box, config) = symbol_page(&renderer);
    let mut page = RasterPage::new(page_box, scale);
    Renderer::new(grid, config).render(&mut page)?;
    Ok(page.into_image())
}

/// Renders a grid to a PNG file and returns the path written.
///
/// # Arguments
///
/// * `grid` - The grid to render.
/// * `config` - Geometry and colors; position and alignment are ignored.
/// * `scale` - Pixels per page unit.
/// * `directory_path` - Optional. Defaults to [`DEFAULT_OUTPUT_DIR`].
/// * `filename` - Optional, without extension. Defaults to a timestamp.
///
/// # Errors
///
/// Returns a [`SurfaceError`] if the geometry is invalid or the file cannot be written.
pub fn qr_to_image_and_save(
    grid: &ModuleGrid,
    config: &GeometryConfig,
    scale: f64,
    directory_path: Option<&str>,
    filename: Option<&str>,
) -> Result<PathBuf, SurfaceError> {
    let renderer = Renderer::new(grid, config.clone());
    let (page_box, config) = symbol_page(&renderer);
    let mut page = RasterPage::new(page_box, scale);
    Renderer::new(grid, config).render(&mut page)?;

    let directory_path = directory_path.unwrap_or(DEFAULT_OUTPUT_DIR);
    let filename = match filename {
        Some(name) => name.to_string(),
        None => {
            let since_the_epoch = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
            since_the_epoch.as_millis().to_string()
        }
    };
    let file_path = PathBuf::from(directory_path).join(format!("{filename}.png"));
    page.save(&file_path)?;
    Ok(file_path)
}

/// Encodes `content` and returns it as a standalone SVG document.
///
/// # Example
///
/// ```rust
/// use qirust_page::helper::generate_svg_string;
/// use qirust_page::PrintOptions;
///
/// let svg = generate_svg_string("Hello, World!", &PrintOptions::default()).unwrap();
/// assert!(svg.contains("<rect"));
/// ```
pub fn generate_svg_string(content: &str, options: &PrintOptions) -> Result<String, RenderError<SurfaceError>> {
    let outcome = min_qrcode(&QrEncoder, content.as_bytes(), options.level, &options.geometry)?;
    to_svg_string(&outcome.grid, &options.geometry).map_err(RenderError::Surface)
}

/// Encodes `content` and returns it as an image, `scale` pixels per page unit.
pub fn generate_image_buffer(
    content: &str,
    options: &PrintOptions,
    scale: f64,
) -> Result<RgbImage, RenderError<SurfaceError>> {
    let outcome = min_qrcode(&QrEncoder, content.as_bytes(), options.level, &options.geometry)?;
    to_image_buffer(&outcome.grid, &options.geometry, scale).map_err(RenderError::Surface)
}

/// Returns the grid as text, two characters per module, with `border` light modules around it.
pub fn to_ascii_string(grid: &ModuleGrid, border: usize) -> String {
    let side = grid.side_len() + 2 * border;
    let mut result = String::with_capacity(side * (side * 2 + 1));
    for y in 0..side {
        for x in 0..side {
            let dark = y >= border && x >= border && grid.is_dark(y - border, x - border);
            let c: char = if dark { '█' } else { ' ' };
            result.push(c);
            result.push(c);
        }
        result.push('\n');
    }
    result
}

/// Prints the given grid to the console with a four module border.
pub fn print_qr(grid: &ModuleGrid) {
    println!("{}", to_ascii_string(grid, 4));
}
