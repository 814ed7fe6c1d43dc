use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
    assert_eq!(r.len_frames(), 3);
}

#[test]
fn frame_range_rejects_reversed_bounds() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
    assert!(
        FrameRange::new(FrameIndex(3), FrameIndex(3))
            .unwrap()
            .is_empty()
    );
}

#[test]
fn fps_ceil_does_not_add_a_frame_for_exact_durations() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.secs_to_frames_ceil(3.0), 90);
    assert_eq!(fps.secs_to_frames_ceil(0.01), 1);
    assert_eq!(fps.secs_to_frames_ceil(0.0), 0);
}

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn canvas_unit_is_an_eighth_of_the_height() {
    let c = Canvas {
        width: 1280,
        height: 720,
    };
    assert_eq!(c.unit_px(), 90.0);
    assert_eq!(c.center(), Point::new(640.0, 360.0));
}
