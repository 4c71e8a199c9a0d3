//! Writes `generated/dotsize.svg`: QR codes of the same content at different dot sizes, with and
//! without a border, and at a higher error correction level.
//!
//! Run with `RUST_LOG=debug` to see the selected versions.
use qirust_page::geometry::{Align, GeometryConfig, Point};
use qirust_page::surface::Surface;
use qirust_page::svg::SvgPage;
use qirust_page::{print_qr_code, EccLevel, PrintOptions, RenderError, SurfaceError};
use tracing_subscriber::EnvFilter;

/// Points per millimetre.
const MM: f64 = 72.0 / 25.4;

fn main() -> Result<(), RenderError<SurfaceError>> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let content = "https://github.com/ashaffah/qirust";
    let mut page = SvgPage::a4();
    let dot = |size: f64| PrintOptions {
        geometry: GeometryConfig { dot: Some(size), ..GeometryConfig::default() },
        ..PrintOptions::default()
    };

    page.text("Sample autosized QR-Code (with stroked bounds). Size of dots : 3mm (huge)", 10.0);
    print_qr_code(&mut page, content, &dot(3.0 * MM))?;
    page.move_down(20.0);

    page.text("Sample QR-Code (with and without stroked bounds) using dots with size: 1 mm (~2.8pt)", 10.0);
    let cpos = page.cursor();
    print_qr_code(&mut page, content, &dot(MM))?;
    let mut unstroked = dot(MM);
    unstroked.geometry.position = Some(Point::new(150.0, cpos));
    unstroked.geometry.stroke = false;
    print_qr_code(&mut page, content, &unstroked)?;
    page.move_down(20.0);

    page.text("Higher ECC Levels (may) increase module size. This QR Code uses ECC Level Q.", 10.0);
    let mut high = dot(MM);
    high.level = EccLevel::Q;
    high.geometry.align = Some(Align::Right);
    print_qr_code(&mut page, content, &high)?;

    page.save("generated/dotsize.svg").map_err(RenderError::Surface)?;
    Ok(())
}
