//! A pixel page backed by an `image` buffer.
use std::fs;
use std::path::Path;

use image::RgbImage;
use tracing::debug;

use crate::color::Rgb;
use crate::geometry::Point;
use crate::surface::{PageBox, Region, Surface, SurfaceError};

/// A page rasterized into an RGB image at a fixed number of pixels per page unit.
///
/// Filled rectangles snap their edges to the nearest pixel boundary, so modules whose edges fall
/// on whole pixels are reproduced exactly.
#[derive(Debug, Clone)]
pub struct RasterPage {
    page: PageBox,
    scale: f64,
    cursor: f64,
    fill: Rgb,
    stroke: Rgb,
    regions: Vec<Region>,
    image: RgbImage,
}

impl RasterPage {
    /// Creates a white page of `page` size, `scale` pixels per page unit.
    pub fn new(page: PageBox, scale: f64) -> Self {
        let width = (page.width * scale).round().max(1.0) as u32;
        let height = (page.height * scale).round().max(1.0) as u32;
        Self {
            cursor: page.bound_top(),
            page,
            scale,
            fill: Rgb::BLACK,
            stroke: Rgb::BLACK,
            regions: Vec::new(),
            image: RgbImage::from_pixel(width, height, Rgb::WHITE.to_pixel()),
        }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Returns the color at a point given in page coordinates.
    pub fn color_at(&self, point: Point) -> Option<Rgb> {
        let device = self.page.to_device(point);
        let x = (device.x * self.scale).floor();
        let y = (device.y * self.scale).floor();
        if x < 0.0 || y < 0.0 {
            return None;
        }
        self.image.get_pixel_checked(x as u32, y as u32).map(|pixel| Rgb(pixel.0))
    }

    /// Saves the page. The format is chosen from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SurfaceError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        self.image.save(path)?;
        debug!(path = %path.display(), width = self.image.width(), height = self.image.height(), "wrote raster page");
        Ok(())
    }

    fn region_to_page(&self, local: Point) -> Point {
        match self.regions.last() {
            Some(region) => region.to_page(local),
            None => local,
        }
    }

    /// Pixel bounds `[x0, x1) x [y0, y1)` of a page-space box, clipped to the open region and the
    /// image.
    fn pixel_span(&self, top_left: Point, width: f64, height: f64) -> Option<(u32, u32, u32, u32)> {
        let corner = self.page.to_device(top_left);
        let mut x0 = corner.x;
        let mut y0 = corner.y;
        let mut x1 = corner.x + width;
        let mut y1 = corner.y + height;
        if let Some(region) = self.regions.last() {
            let clip = self.page.to_device(region.top_left);
            x0 = x0.max(clip.x);
            y0 = y0.max(clip.y);
            x1 = x1.min(clip.x + region.width);
            y1 = y1.min(clip.y + region.height);
        }
        let to_px = |v: f64, max: u32| (v * self.scale).round().clamp(0.0, f64::from(max)) as u32;
        let (w, h) = self.image.dimensions();
        let (x0, x1) = (to_px(x0, w), to_px(x1, w));
        let (y0, y1) = (to_px(y0, h), to_px(y1, h));
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    fn paint(&mut self, top_left: Point, width: f64, height: f64, color: Rgb) {
        if let Some((x0, y0, x1, y1)) = self.pixel_span(top_left, width, height) {
            let pixel = color.to_pixel();
            for y in y0..y1 {
                for x in x0..x1 {
                    self.image.put_pixel(x, y, pixel);
                }
            }
        }
    }
}

impl Surface for RasterPage {
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
        let region = Region::checked(self.region_to_page(origin), width, height)?;
        self.regions.push(region);
        let result = body(self);
        self.regions.pop();
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
        let top_left = self.region_to_page(top_left);
        self.paint(top_left, width, height, self.fill);
        Ok(())
    }

    fn stroke_bounds(&mut self) -> Result<(), Self::Error> {
        let region = *self.regions.last().ok_or(SurfaceError::NoRegion)?;
        let line = 1.0 / self.scale;
        let Region { top_left, width, height } = region;
        let stroke = self.stroke;
        self.paint(top_left, width, line, stroke);
        self.paint(Point::new(top_left.x, region.bottom() + line), width, line, stroke);
        self.paint(top_left, line, height, stroke);
        self.paint(Point::new(top_left.x + width - line, top_left.y), line, height, stroke);
        Ok(())
    }

    fn draw_axis_overlay(&mut self, origin: Point, step: f64, color: Rgb) -> Result<(), Self::Error> {
        let (width, height) = match self.regions.last() {
            Some(region) => (region.width, region.height),
            None => (self.page.bound_right(), self.page.bound_top()),
        };
        let line = 1.0 / self.scale;
        let anchor = self.region_to_page(origin);
        self.paint(Point::new(anchor.x, anchor.y + line), width - origin.x, line, color);
        self.paint(Point::new(anchor.x, anchor.y + height - origin.y), line, height - origin.y, color);
        if step > 0.0 {
            let tick = 2.0;
            let mut offset = step;
            while offset <= width {
                self.paint(Point::new(anchor.x + offset, anchor.y + tick), line, 2.0 * tick, color);
                offset += step;
            }
            offset = step;
            while offset <= height {
                self.paint(Point::new(anchor.x - tick, anchor.y + offset), 2.0 * tick, line, color);
                offset += step;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_page_is_white() {
        let page = RasterPage::new(PageBox::new(10.0, 20.0, 0.0), 2.0);
        assert_eq!(page.image().dimensions(), (20, 40));
        assert_eq!(page.color_at(Point::new(5.0, 5.0)), Some(Rgb::WHITE));
    }

    #[test]
    fn test_fill_inside_region() {
        let mut page = RasterPage::new(PageBox::new(40.0, 40.0, 0.0), 1.0);
        page.with_clipped_region(Point::new(10.0, 30.0), 20.0, 20.0, |s| {
            s.set_fill_color(Rgb::new(0, 0, 255))?;
            s.fill_rectangle(Point::new(2.0, 18.0), 3.0, 2.0)
        })
        .unwrap();
        // Region bottom-left is page (10, 10), so the rectangle covers page x 12..15, y 26..28.
        assert_eq!(page.color_at(Point::new(12.5, 27.5)), Some(Rgb::new(0, 0, 255)));
        assert_eq!(page.color_at(Point::new(15.5, 27.5)), Some(Rgb::WHITE));
        assert_eq!(page.color_at(Point::new(12.5, 25.5)), Some(Rgb::WHITE));
        assert_eq!(page.cursor(), 10.0);
    }

    #[test]
    fn test_region_clips_rectangles() {
        let mut page = RasterPage::new(PageBox::new(40.0, 40.0, 0.0), 1.0);
        page.with_clipped_region(Point::new(10.0, 30.0), 10.0, 10.0, |s| {
            s.fill_rectangle(Point::new(-5.0, 15.0), 30.0, 30.0)
        })
        .unwrap();
        assert_eq!(page.color_at(Point::new(15.0, 25.0)), Some(Rgb::BLACK));
        assert_eq!(page.color_at(Point::new(5.0, 25.0)), Some(Rgb::WHITE));
        assert_eq!(page.color_at(Point::new(25.0, 25.0)), Some(Rgb::WHITE));
        assert_eq!(page.color_at(Point::new(15.0, 35.0)), Some(Rgb::WHITE));
    }

    #[test]
    fn test_stroke_bounds_draws_outline() {
        let mut page = RasterPage::new(PageBox::new(40.0, 40.0, 0.0), 1.0);
        page.with_clipped_region(Point::new(10.0, 30.0), 20.0, 20.0, |s| {
            s.set_stroke_color(Rgb::new(255, 0, 0))?;
            s.stroke_bounds()
        })
        .unwrap();
        let red = Some(Rgb::new(255, 0, 0));
        assert_eq!(page.color_at(Point::new(20.5, 29.5)), red);
        assert_eq!(page.color_at(Point::new(20.5, 10.5)), red);
        assert_eq!(page.color_at(Point::new(10.5, 20.5)), red);
        assert_eq!(page.color_at(Point::new(29.5, 20.5)), red);
        assert_eq!(page.color_at(Point::new(20.5, 20.5)), Some(Rgb::WHITE));
    }

    #[test]
    fn test_invalid_region_leaves_cursor() {
        let mut page = RasterPage::new(PageBox::new(40.0, 40.0, 0.0), 1.0);
        let err = page.with_clipped_region(Point::new(0.0, 40.0), 0.0, 10.0, |_| Ok(())).unwrap_err();
        assert!(matches!(err, SurfaceError::InvalidRegion { .. }));
        assert_eq!(page.cursor(), 40.0);
    }
}
