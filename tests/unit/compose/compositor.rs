use std::io::Cursor;

use super::*;

fn mono(s: &str, size: f32) -> GnxResult<f32> {
    Ok(s.chars().count() as f32 * size * 0.5)
}

fn white_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 255, 255, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn font_and_line_metrics_scale_with_width() {
    let canvas = Canvas::new(1000, 1000).unwrap();
    let layout = layout_caption(canvas, "GNX", &CaptionStyle::default(), mono).unwrap();
    assert!((layout.font_size_px - 40.0).abs() < 1e-3);
    assert!((layout.line_height_px - 60.0).abs() < 1e-3);
    assert_eq!(layout.lines.len(), 1);
    assert_eq!(layout.lines[0].anchor.x, 500.0);
    assert!((layout.lines[0].anchor.y - (1000.0 - 2.0 * 60.0)).abs() < 1e-3);
}

#[test]
fn block_reserves_one_extra_line_above_bottom() {
    let canvas = Canvas::new(1000, 800).unwrap();
    // 20px per char at 40px; 900px max => at most 44 chars per line.
    let caption = "Ridin' in my Oldsmobile Cutlass with Teddy Pendergrass in the tape deck";
    let layout = layout_caption(canvas, caption, &CaptionStyle::default(), mono).unwrap();

    let n = layout.lines.len();
    assert!(n >= 2);
    for (i, line) in layout.lines.iter().enumerate() {
        let expected = 800.0 - (n as f64 + 1.0) * 60.0 + i as f64 * 60.0;
        assert!((line.anchor.y - expected).abs() < 1e-3);
        assert_eq!(line.anchor.x, 500.0);
        assert!(mono(&line.text, 40.0).unwrap() < 900.0);
    }
    assert!((layout.lines[n - 1].anchor.y - (800.0 - 120.0)).abs() < 1e-3);
}

#[test]
fn measure_receives_computed_font_size() {
    let canvas = Canvas::new(500, 500).unwrap();
    let mut sizes = Vec::new();
    layout_caption(canvas, "a b c", &CaptionStyle::default(), |s, size| {
        sizes.push(size);
        mono(s, size)
    })
    .unwrap();
    assert!(!sizes.is_empty());
    assert!(sizes.iter().all(|s| (s - 20.0).abs() < 1e-3));
}

#[test]
fn empty_caption_renders_source_without_font() {
    let mut compositor = Compositor::new(Vec::new());
    let out = compositor.compose(&white_png(64, 48), "").unwrap();
    assert_eq!(out.canvas, Canvas::new(64, 48).unwrap());

    let decoded = image::load_from_memory(&out.jpeg).unwrap();
    assert_eq!(decoded.width(), 64);
    assert_eq!(decoded.height(), 48);
    assert_eq!(
        image::guess_format(&out.jpeg).unwrap(),
        image::ImageFormat::Jpeg
    );
    let px = decoded.to_rgb8().get_pixel(10, 10).0;
    assert!(px.iter().all(|c| *c > 240), "expected white, got {px:?}");
}

#[test]
fn undecodable_source_produces_no_output() {
    let mut compositor = Compositor::new(Vec::new());
    assert!(compositor.compose(b"<html>404</html>", "caption").is_err());
}

#[test]
fn caption_without_usable_font_fails() {
    let mut compositor = Compositor::new(Vec::new());
    let err = compositor.compose(&white_png(32, 32), "GNX").unwrap_err();
    assert!(matches!(err, GnxError::Render(_)));
}

#[test]
fn quality_is_clamped() {
    let c = Compositor::new(Vec::new()).with_quality(0);
    assert_eq!(c.quality, 1);
    let c = Compositor::new(Vec::new()).with_quality(200);
    assert_eq!(c.quality, 100);
    assert_eq!(Compositor::new(Vec::new()).quality, JPEG_QUALITY);
}

fn font() -> Vec<u8> {
    std::fs::read("tests/data/fonts/DejaVuSans.ttf").unwrap()
}

fn solid_png(width: u32, height: u32, v: u8) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([v, v, v, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn caption_darkens_bottom_band() {
    let mut compositor = Compositor::new(font());
    let out = compositor
        .compose(
            &white_png(400, 400),
            "Ridin' in my GNX with Anita Baker in the tape deck",
        )
        .unwrap();
    assert_eq!(out.canvas, Canvas::new(400, 400).unwrap());
    let rgb = image::load_from_memory(&out.jpeg).unwrap().to_rgb8();

    let dark = |y0: u32, y1: u32| {
        (y0..y1)
            .flat_map(|y| (0..400).map(move |x| (x, y)))
            .filter(|&(x, y)| rgb.get_pixel(x, y).0[0] < 100)
            .count()
    };
    assert_eq!(dark(0, 200), 0);
    assert!(dark(250, 390) > 50);
    // Text is centered: both halves of the caption band get ink.
    let dark_cols = |x0: u32, x1: u32| {
        (300..370)
            .flat_map(|y| (x0..x1).map(move |x| (x, y)))
            .filter(|&(x, y)| rgb.get_pixel(x, y).0[0] < 100)
            .count()
    };
    assert!(dark_cols(0, 200) > 20);
    assert!(dark_cols(200, 400) > 20);
}

#[test]
fn wrapped_lines_fit_under_wrap_width_with_real_font() {
    let mut engine = TextLayoutEngine::new(font());
    let canvas = Canvas::new(400, 400).unwrap();
    let caption = "Ridin' in my Oldsmobile Cutlass with Teddy Pendergrass in the tape deck";
    let layout = layout_caption(canvas, caption, &CaptionStyle::default(), |s, size| {
        engine.measure(s, size)
    })
    .unwrap();

    assert!(layout.lines.len() >= 2);
    let max = 400.0 * 0.9;
    for line in &layout.lines {
        let width = engine.measure(&line.text, layout.font_size_px).unwrap();
        assert!(
            width < max || !line.text.contains(' '),
            "line {:?} measures {width} >= {max}",
            line.text
        );
    }
    let rejoined = layout
        .lines
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    assert_eq!(rejoined, caption);
}

#[test]
fn over_long_word_stands_alone_with_real_font() {
    let mut engine = TextLayoutEngine::new(font());
    let canvas = Canvas::new(200, 200).unwrap();
    let long = "W".repeat(60);
    let caption = format!("a {long} b");
    let layout = layout_caption(canvas, &caption, &CaptionStyle::default(), |s, size| {
        engine.measure(s, size)
    })
    .unwrap();

    let texts: Vec<&str> = layout.lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["a", long.as_str(), "b"]);
    assert!(engine.measure(&long, layout.font_size_px).unwrap() > 200.0 * 0.9);
}

#[test]
fn configured_style_sets_caption_color() {
    let style = CaptionStyle {
        color: Rgba8 {
            r: 255,
            g: 255,
            b: 255,
            a: 255,
        },
        ..CaptionStyle::default()
    };
    let mut compositor = Compositor::new(font()).with_style(style);
    assert_eq!(compositor.style, style);

    let out = compositor
        .compose(
            &solid_png(400, 400, 0),
            "Ridin' in my GNX with Anita Baker in the tape deck",
        )
        .unwrap();
    let rgb = image::load_from_memory(&out.jpeg).unwrap().to_rgb8();
    let bright = |y0: u32, y1: u32| {
        (y0..y1)
            .flat_map(|y| (0..400).map(move |x| (x, y)))
            .filter(|&(x, y)| rgb.get_pixel(x, y).0[0] > 150)
            .count()
    };
    assert_eq!(bright(0, 200), 0);
    assert!(bright(250, 390) > 50);
}
