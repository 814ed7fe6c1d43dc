use super::*;
use crate::foundation::core::Fps;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::default(),
    }
}

fn pixel(px: [u8; 4], premultiplied: bool) -> FrameRGBA {
    FrameRGBA {
        width: 1,
        height: 1,
        data: px.to_vec(),
        premultiplied,
    }
}

fn flattened(frame: &FrameRGBA, background: Color) -> Vec<u8> {
    let mut out = vec![0u8; frame.data.len()];
    flatten(frame, background, &mut out);
    out
}

#[test]
fn yuv420_needs_even_nonzero_sizes() {
    assert!(check_yuv420(&cfg(0, 10)).is_err());
    assert!(check_yuv420(&cfg(11, 10)).is_err());
    assert!(check_yuv420(&cfg(10, 10)).is_ok());
    let mut bad = cfg(10, 10);
    bad.fps.num = 0;
    assert!(check_yuv420(&bad).is_err());
}

#[test]
fn odd_sizes_fail_before_spawning() {
    let mut sink = FfmpegSink::new(std::env::temp_dir().join("evalcast-odd.mp4"), Color::BLACK);
    assert!(matches!(
        sink.begin(cfg(1281, 720)),
        Err(CastError::Validation(_))
    ));
    assert!(sink.end().is_err());
}

#[test]
fn frames_before_begin_are_rejected() {
    let mut sink = FfmpegSink::new("out.mp4", Color::BLACK);
    let err = sink
        .push_frame(FrameIndex(0), &pixel([0, 0, 0, 255], true))
        .unwrap_err();
    assert!(matches!(err, CastError::Encode(_)));
}

#[test]
fn command_passes_rate_before_input() {
    let cmd = encoder_command(&cfg(640, 360), Path::new("out/clip.mp4"));
    let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
    let rate = args.iter().position(|a| a == "-r").unwrap();
    let input = args.iter().position(|a| a == "-i").unwrap();
    assert!(rate < input);
    assert_eq!(args[rate + 1], "30/1");
    assert!(args.windows(2).any(|w| w[0] == "-s" && w[1] == "640x360"));
    assert_eq!(args.last().map(String::as_str), Some("out/clip.mp4"));
}

#[test]
fn premultiplied_half_red_over_black() {
    let out = flattened(&pixel([128, 0, 0, 128], true), Color::BLACK);
    assert_eq!(out, vec![128, 0, 0, 255]);
}

#[test]
fn straight_half_red_over_black() {
    let out = flattened(&pixel([255, 0, 0, 128], false), Color::BLACK);
    assert_eq!(out, vec![128, 0, 0, 255]);
}

#[test]
fn transparent_pixels_show_the_background() {
    let bg = Color::from_hex("#0a141e").unwrap();
    let out = flattened(&pixel([0, 0, 0, 0], true), bg);
    assert_eq!(out, vec![10, 20, 30, 255]);
}
