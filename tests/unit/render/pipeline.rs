use std::path::Path;

use super::*;
use crate::{
    encode::InMemorySink,
    foundation::{
        color::Color,
        core::{Canvas, Fps, Vec2},
    },
    layout::Visual,
    stage::{Animation, Stage, TimelineRecorder},
};

fn arrow_timeline() -> Timeline {
    let mut rec = TimelineRecorder::new(
        "pipeline-test",
        Fps::new(10, 1).unwrap(),
        Canvas {
            width: 32,
            height: 16,
        },
        Color::BLACK,
        "Monospace",
    );
    let a = rec.insert(Visual::arrow(Vec2::new(20.0, 0.0), Color::WHITE));
    rec.play(vec![Animation::Write { id: a }], None).unwrap();
    rec.wait(1.0).unwrap();
    rec.finish()
}

#[test]
fn holds_are_elided_but_still_pushed() {
    let t = arrow_timeline();
    let assets = AssetStore::prepare(&t, Path::new(".")).unwrap();
    let mut r = CpuRenderer::new(&assets);
    let mut sink = InMemorySink::new();

    let stats = render_range(
        &t,
        t.frame_range(),
        &mut r,
        &assets,
        &mut sink,
        &RenderOpts::default(),
    )
    .unwrap();

    assert_eq!(stats.frames_total, 20);
    assert_eq!(stats.frames_rendered + stats.frames_elided, 20);
    assert!(stats.frames_elided >= 9, "{stats:?}");
    assert!(sink.ended());
    assert_eq!(sink.config().map(|c| c.width), Some(32));

    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, (0..20).collect::<Vec<_>>());
    let last = &sink.frames()[19].1;
    assert_eq!(last, &render_frame(&t, FrameIndex(19), &mut r, &assets).unwrap());
}

#[test]
fn elision_can_be_disabled() {
    let t = arrow_timeline();
    let assets = AssetStore::prepare(&t, Path::new(".")).unwrap();
    let mut r = CpuRenderer::new(&assets);
    let mut sink = InMemorySink::new();
    let opts = RenderOpts {
        static_frame_elision: false,
    };
    let range = FrameRange::new(FrameIndex(10), FrameIndex(15)).unwrap();
    let stats = render_range(&t, range, &mut r, &assets, &mut sink, &opts).unwrap();
    assert_eq!(
        stats,
        RenderStats {
            frames_total: 5,
            frames_rendered: 5,
            frames_elided: 0,
        }
    );
}

#[test]
fn ranges_outside_the_scene_are_rejected() {
    let t = arrow_timeline();
    let assets = AssetStore::prepare(&t, Path::new(".")).unwrap();
    let mut r = CpuRenderer::new(&assets);
    let mut sink = InMemorySink::new();
    let range = FrameRange::new(FrameIndex(0), FrameIndex(21)).unwrap();
    assert!(matches!(
        render_range(&t, range, &mut r, &assets, &mut sink, &RenderOpts::default()),
        Err(CastError::Validation(_))
    ));
    assert!(render_frame(&t, FrameIndex(20), &mut r, &assets).is_err());
}
