use qirust_page::geometry::{Align, GeometryConfig, Point};
use qirust_page::surface::{DrawCommand, PageBox, Recorder, Surface, SurfaceError};
use qirust_page::svg::SvgPage;
use qirust_page::{print_qr_code, render_qr_code, EccLevel, PrintOptions, QrCell, RenderError, Rgb, SearchError};

fn is_stroke(command: &DrawCommand) -> bool {
    matches!(command, DrawCommand::StrokeBounds)
}

#[test]
fn test_render_with_margin() {
    let options = PrintOptions {
        geometry: GeometryConfig { margin: 0.0, ..GeometryConfig::default() },
        ..PrintOptions::default()
    };
    let mut page = Recorder::new(523.0, 770.0);
    print_qr_code(&mut page, "HELOWORLD", &options).unwrap();

    assert!(page.filled_rectangles().count() > 0);
    assert_eq!(page.count(is_stroke), 1);
    // Without a margin the first module starts at the region's left edge.
    let (first, _, _) = page.filled_rectangles().next().unwrap();
    assert_eq!(first.x, 0.0);
}

#[test]
fn test_exhaustion_draws_nothing() {
    let options = PrintOptions { level: EccLevel::H, ..PrintOptions::default() };
    let content = "x".repeat(4000);
    let mut page = Recorder::new(523.0, 770.0);
    let err = print_qr_code(&mut page, &content, &options).unwrap_err();

    assert!(err.is_capacity_exceeded());
    assert!(matches!(err, RenderError::Search(SearchError::CapacityExceeded { level: EccLevel::H, bytes: 4000 })));
    assert!(page.commands().is_empty());
    assert_eq!(page.cursor(), 770.0);
}

#[test]
fn test_alignment_against_bounds() {
    let grid_options = |align| PrintOptions {
        geometry: GeometryConfig {
            extent: Some(100.0),
            position: Some(Point::new(33.0, 500.0)),
            align,
            ..GeometryConfig::default()
        },
        ..PrintOptions::default()
    };
    let origin_for = |align| {
        let mut page = Recorder::new(400.0, 770.0);
        print_qr_code(&mut page, "align me", &grid_options(align)).unwrap();
        match page.commands()[0] {
            DrawCommand::BeginRegion { origin, .. } => origin,
            ref other => panic!("unexpected first command {other:?}"),
        }
    };
    assert_eq!(origin_for(Some(Align::Center)), Point::new(150.0, 500.0));
    assert_eq!(origin_for(Some(Align::Right)), Point::new(300.0, 500.0));
    assert_eq!(origin_for(Some(Align::Left)), Point::new(0.0, 500.0));
    assert_eq!(origin_for(None), Point::new(33.0, 500.0));
}

#[test]
fn test_symbols_stack_down_the_page() {
    let mut page = SvgPage::new(PageBox::new(300.0, 300.0, 0.0));
    let options = PrintOptions {
        geometry: GeometryConfig { dot: Some(2.0), ..GeometryConfig::default() },
        ..PrintOptions::default()
    };
    print_qr_code(&mut page, "first", &options).unwrap();
    assert_eq!(page.cursor(), 300.0 - 58.0);
    print_qr_code(&mut page, "second", &options).unwrap();
    assert_eq!(page.cursor(), 300.0 - 116.0);
    assert_eq!(page.to_svg_string().matches("<clipPath").count(), 2);
}

#[test]
fn test_surface_error_is_passed_through() {
    let options = PrintOptions {
        geometry: GeometryConfig { extent: Some(-10.0), ..GeometryConfig::default() },
        ..PrintOptions::default()
    };
    let mut page = SvgPage::a4();
    let err = print_qr_code(&mut page, "negative", &options).unwrap_err();
    assert!(matches!(err, RenderError::Surface(SurfaceError::InvalidRegion { width, .. }) if width == -10.0));
}

#[test]
fn test_negative_margin_is_not_validated() {
    let grid = qirust_page::min_qrcode(&qirust_page::QrEncoder, b"abc", EccLevel::M, &GeometryConfig::default())
        .unwrap()
        .grid;
    let config = GeometryConfig { margin: -2.0, stroke: false, ..GeometryConfig::default() };
    let mut page = Recorder::new(500.0, 500.0);
    render_qr_code(&mut page, &grid, &config).unwrap();
    let (first, _, _) = page.filled_rectangles().next().unwrap();
    assert_eq!(first.x, -2.0);
}

#[test]
fn test_colors_reach_the_surface() {
    let options = PrintOptions {
        geometry: GeometryConfig {
            foreground_color: "336699".parse().unwrap(),
            background_color: "FAFAFA".parse().unwrap(),
            stroke_color: "FF0000".parse().unwrap(),
            ..GeometryConfig::default()
        },
        ..PrintOptions::default()
    };
    let mut page = Recorder::new(500.0, 500.0);
    print_qr_code(&mut page, "colors", &options).unwrap();
    let colors: Vec<&DrawCommand> = page
        .commands()
        .iter()
        .filter(|c| matches!(c, DrawCommand::FillColor(_) | DrawCommand::StrokeColor(_)))
        .collect();
    assert_eq!(
        colors,
        vec![
            &DrawCommand::FillColor(Rgb::new(0xFA, 0xFA, 0xFA)),
            &DrawCommand::FillColor(Rgb::new(0x33, 0x66, 0x99)),
            &DrawCommand::StrokeColor(Rgb::new(0xFF, 0, 0)),
        ]
    );
}

#[test]
fn test_options_from_json() {
    let options: PrintOptions = serde_json::from_str(
        r##"{
            "level": "q",
            "dot": 2.5,
            "margin": 2,
            "position": {"x": 10, "y": 400},
            "stroke": false,
            "foreground_color": "#0C0C0C",
            "debug": true
        }"##,
    )
    .unwrap();
    assert_eq!(options.level, EccLevel::Q);
    assert_eq!(options.geometry.dot, Some(2.5));
    assert_eq!(options.geometry.margin, 2.0);
    assert_eq!(options.geometry.position, Some(Point::new(10.0, 400.0)));
    assert!(!options.geometry.stroke);
    assert!(options.geometry.debug);
    assert_eq!(options.geometry.foreground_color, Rgb::new(12, 12, 12));
    assert_eq!(options.geometry.background_color, Rgb::WHITE);

    let json = serde_json::to_string(&options).unwrap();
    assert!(json.contains("\"foreground_color\":\"0C0C0C\""));
    assert!(serde_json::from_str::<PrintOptions>(r#"{"align": "middle"}"#).is_err());
}

#[test]
fn test_cells_in_a_row() {
    let options = PrintOptions {
        geometry: GeometryConfig { extent: Some(60.0), ..GeometryConfig::default() },
        ..PrintOptions::default()
    };
    let cells = [QrCell::new("left", &options).unwrap(), QrCell::new("right", &options).unwrap()];
    let mut page = Recorder::new(500.0, 700.0);
    let mut x = 0.0;
    for cell in &cells {
        cell.draw(&mut page, Point::new(x, 700.0)).unwrap();
        x += cell.width();
    }
    let origins: Vec<Point> = page
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::BeginRegion { origin, .. } => Some(*origin),
            _ => None,
        })
        .collect();
    assert_eq!(origins, vec![Point::new(5.0, 695.0), Point::new(75.0, 695.0)]);
}
