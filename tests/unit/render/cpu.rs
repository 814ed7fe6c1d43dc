use std::path::{Path, PathBuf};

use super::*;
use crate::{
    foundation::core::{Canvas, FrameIndex, Rect},
    stage::{Stage, Timeline, TimelineRecorder},
};

fn scene(background: Color, items: Vec<DrawItem>) -> FrameScene {
    FrameScene {
        frame: FrameIndex(0),
        canvas: Canvas {
            width: 64,
            height: 32,
        },
        background,
        monospace: "Monospace".to_owned(),
        items,
    }
}

fn empty_timeline() -> Timeline {
    TimelineRecorder::new(
        "cpu-test",
        crate::foundation::core::Fps::default(),
        Canvas::default(),
        Color::BLACK,
        "Monospace",
    )
    .finish()
}

fn store_with_red_square() -> (AssetStore, PathBuf) {
    let root = std::env::temp_dir().join(format!("evalcast-cpu-{}", std::process::id()));
    std::fs::create_dir_all(root.join("images")).unwrap();
    let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 255]));
    img.save(root.join("images/red.png")).unwrap();

    let mut rec = TimelineRecorder::new(
        "cpu-test",
        crate::foundation::core::Fps::default(),
        Canvas::default(),
        Color::BLACK,
        "Monospace",
    );
    let id = rec.insert(crate::layout::Visual::image("images/red.png", 4.0, 4.0));
    rec.add(id).unwrap();
    let store = AssetStore::prepare(&rec.finish(), &root).unwrap();
    (store, root)
}

#[test]
fn background_fills_every_pixel() {
    let assets = AssetStore::prepare(&empty_timeline(), Path::new(".")).unwrap();
    let mut r = CpuRenderer::new(&assets);
    let frame = r
        .render(&scene(Color::rgb(10, 20, 30), vec![]), &assets)
        .unwrap();
    assert_eq!((frame.width, frame.height), (64, 32));
    assert!(frame.premultiplied);
    assert!(
        frame
            .data
            .chunks_exact(4)
            .all(|px| px == [10, 20, 30, 255])
    );
}

#[test]
fn strokes_are_rasterized() {
    let assets = AssetStore::prepare(&empty_timeline(), Path::new(".")).unwrap();
    let mut r = CpuRenderer::new(&assets);
    let line = DrawItem::Stroke {
        from: Point::new(4.0, 16.0),
        to: Point::new(60.0, 16.0),
        width: 4.0,
        color: Color::WHITE,
        opacity: 1.0,
        head: true,
    };
    let frame = r.render(&scene(Color::BLACK, vec![line]), &assets).unwrap();
    assert_eq!(frame.pixel(30, 16), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(30, 2), Some([0, 0, 0, 255]));
}

#[test]
fn images_are_composited_with_opacity() {
    let (assets, root) = store_with_red_square();
    let mut r = CpuRenderer::new(&assets);
    let item = |opacity| DrawItem::Image {
        source: "images/red.png".to_owned(),
        rect: Rect::new(8.0, 8.0, 24.0, 24.0),
        opacity,
    };

    let full = r.render(&scene(Color::BLACK, vec![item(1.0)]), &assets).unwrap();
    assert_eq!(full.pixel(16, 16), Some([255, 0, 0, 255]));
    assert_eq!(full.pixel(40, 16), Some([0, 0, 0, 255]));

    let half = r.render(&scene(Color::BLACK, vec![item(0.5)]), &assets).unwrap();
    let [red, g, b, a] = half.pixel(16, 16).unwrap();
    assert!((120..=136).contains(&red), "red {red}");
    assert_eq!((g, b, a), (0, 0, 255));
    std::fs::remove_dir_all(root).unwrap();
}

#[test]
fn unknown_images_are_errors() {
    let assets = AssetStore::prepare(&empty_timeline(), Path::new(".")).unwrap();
    let mut r = CpuRenderer::new(&assets);
    let item = DrawItem::Image {
        source: "images/missing.png".to_owned(),
        rect: Rect::new(0.0, 0.0, 4.0, 4.0),
        opacity: 1.0,
    };
    assert!(r.render(&scene(Color::BLACK, vec![item]), &assets).is_err());
}

#[test]
fn svg_batches_escape_text_and_name_fonts() {
    let s = scene(
        Color::BLACK,
        vec![DrawItem::Text {
            text: "a < b & \"c\"".to_owned(),
            origin: Point::new(1.0, 20.0),
            font_px: 12.0,
            family: FontFamily::Mono,
            color: Color::YELLOW,
            opacity: 0.5,
        }],
    );
    let items: Vec<&DrawItem> = s.items.iter().collect();
    let svg = svg_document(&s, &items);
    assert!(svg.contains("a &lt; b &amp; &quot;c&quot;"));
    assert!(svg.contains("font-family=\"'Monospace', monospace\""));
    assert!(svg.contains("fill=\"#ffff00\""));
    assert!(svg.contains("fill-opacity=\"0.5000\""));
    assert!(usvg::Tree::from_str(&svg, &usvg::Options::default()).is_ok());
}
