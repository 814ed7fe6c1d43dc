use super::*;
use crate::{
    foundation::core::{Canvas, Fps},
    formula::Formula,
    layout::metrics::FontFamily,
    stage::{Stage, TimelineRecorder},
};

fn recorder() -> TimelineRecorder {
    TimelineRecorder::new(
        "eval-test",
        Fps::new(30, 1).unwrap(),
        Canvas::default(),
        Color::BLACK,
        "Monospace",
    )
}

fn text(s: &str) -> Visual {
    Visual::text(s, 20.0, FontFamily::Sans, Color::WHITE)
}

fn origin_of(scene: &FrameScene, wanted: &str) -> Point {
    scene
        .items
        .iter()
        .find_map(|i| match i {
            DrawItem::Text { text, origin, .. } if text == wanted => Some(*origin),
            _ => None,
        })
        .unwrap()
}

#[test]
fn write_at_half_progress_reveals_about_half_the_glyphs() {
    let mut rec = recorder();
    let a = rec.insert(text("abcdefgh"));
    rec.play(vec![Animation::Write { id: a }], None).unwrap();
    let t = rec.finish();

    let start = evaluate(&t, FrameIndex(0)).unwrap();
    assert!(start.items.is_empty());

    let mid = evaluate(&t, FrameIndex(15)).unwrap();
    let shown = mid.texts().concat();
    assert!((3..=5).contains(&shown.len()), "shown {shown:?}");
    assert!("abcdefgh".starts_with(&shown));
}

#[test]
fn frames_past_the_end_are_errors() {
    let mut rec = recorder();
    let a = rec.insert(text("a"));
    rec.play(vec![Animation::FadeIn { id: a }], None).unwrap();
    let t = rec.finish();
    assert_eq!(t.total_frames(), 30);
    assert!(evaluate(&t, FrameIndex(29)).is_ok());
    assert!(matches!(
        evaluate(&t, FrameIndex(30)),
        Err(CastError::Evaluation(_))
    ));
}

#[test]
fn transform_matching_moves_matched_parts_and_swaps_objects() {
    let mut rec = recorder();
    let from = Visual::formula(Formula::new(["x", "+", "1"]).unwrap(), 40.0);
    let to = Visual::formula(Formula::new(["1", "+", "x"]).unwrap(), 40.0)
        .shift(Vec2::new(0.0, 100.0));
    let a = rec.insert(from);
    let b = rec.insert(to);
    rec.play(vec![Animation::Write { id: a }], None).unwrap();
    rec.play(vec![Animation::TransformMatching { from: a, to: b }], None)
        .unwrap();
    rec.wait(1.0).unwrap();
    let t = rec.finish();

    let before = evaluate(&t, FrameIndex(30)).unwrap();
    let mid = evaluate(&t, FrameIndex(45)).unwrap();
    let after = evaluate(&t, FrameIndex(75)).unwrap();

    let (x0, x1, xm) = (
        origin_of(&before, "x"),
        origin_of(&after, "x"),
        origin_of(&mid, "x"),
    );
    assert!(x0.x < xm.x && xm.x < x1.x);
    assert!(x0.y < xm.y && xm.y < x1.y);

    // Only the target remains once the play is over.
    assert_eq!(after.texts(), vec!["1", " + ", "x"]);
    let target = &t.objects[1];
    let expected = target.center + target.primitives()[2].offset + t.canvas.center().to_vec2();
    assert!((x1 - expected).hypot() < 1e-9);
}

#[test]
fn unmatched_parts_fade_in_and_out() {
    let mut rec = recorder();
    let a = rec.insert(Visual::formula(Formula::new(["a"]).unwrap(), 40.0));
    let b = rec.insert(Visual::formula(Formula::new(["b"]).unwrap(), 40.0));
    rec.add(a).unwrap();
    rec.play(vec![Animation::TransformMatching { from: a, to: b }], None)
        .unwrap();
    let t = rec.finish();

    let mid = evaluate(&t, FrameIndex(15)).unwrap();
    assert_eq!(mid.items.len(), 2);
    for item in &mid.items {
        assert!((item.opacity() - 0.5).abs() < 0.05);
    }
}

#[test]
fn completed_recolor_sticks_and_fade_out_dims() {
    let mut rec = recorder();
    let a = rec.insert(text("1 / 0"));
    rec.add(a).unwrap();
    rec.play(
        vec![
            Animation::Recolor {
                id: a,
                color: Color::RED,
            },
            Animation::Wiggle { id: a },
        ],
        None,
    )
    .unwrap();
    rec.play(vec![Animation::FadeOut { id: a }], None).unwrap();
    let t = rec.finish();

    let fading = evaluate(&t, FrameIndex(45)).unwrap();
    match &fading.items[0] {
        DrawItem::Text { color, opacity, .. } => {
            assert_eq!(*color, Color::RED);
            assert!((opacity - 0.5).abs() < 0.05);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn instant_adds_and_removes_apply_at_their_time() {
    let mut rec = recorder();
    let a = rec.insert(text("a"));
    let b = rec.insert(text("b"));
    rec.add(a).unwrap();
    rec.wait(1.0).unwrap();
    rec.remove(a).unwrap();
    rec.add(b).unwrap();
    rec.wait(1.0).unwrap();
    let t = rec.finish();

    assert_eq!(evaluate(&t, FrameIndex(10)).unwrap().texts(), vec!["a"]);
    assert_eq!(evaluate(&t, FrameIndex(30)).unwrap().texts(), vec!["b"]);
}

#[test]
fn write_reveals_strokes_partially() {
    let mut rec = recorder();
    let a = rec.insert(Visual::arrow(Vec2::new(200.0, 0.0), Color::WHITE));
    rec.play(vec![Animation::Write { id: a }], None).unwrap();
    rec.wait(1.0).unwrap();
    let t = rec.finish();

    let mid = evaluate(&t, FrameIndex(15)).unwrap();
    let full = evaluate(&t, FrameIndex(40)).unwrap();
    let len = |s: &FrameScene| match &s.items[0] {
        DrawItem::Stroke { from, to, .. } => (*to - *from).hypot(),
        other => panic!("unexpected {other:?}"),
    };
    assert!((len(&full) - 200.0).abs() < 1e-9);
    assert!((len(&mid) - 100.0).abs() < 1.0);
}
