use super::*;
use crate::{
    foundation::core::Point,
    layout::metrics::FontFamily,
    stage::{Director, LONG_WRITE_SECS},
};

fn recorder() -> TimelineRecorder {
    TimelineRecorder::new(
        "test",
        Fps::default(),
        Canvas::default(),
        Color::BLACK,
        "Monospace",
    )
}

fn text(s: &str) -> Visual {
    Visual::text(s, 20.0, FontFamily::Sans, Color::WHITE)
}

#[test]
fn records_plays_and_waits_back_to_back() {
    let mut rec = recorder();
    let a = rec.insert(text("hi"));
    rec.play(vec![Animation::Write { id: a }], None).unwrap();
    rec.wait(0.5).unwrap();
    rec.wait(0.0).unwrap();
    rec.play(vec![Animation::Unwrite { id: a }], Some(0.25))
        .unwrap();
    let t = rec.finish();
    assert_eq!(
        t.events,
        vec![
            Event::Play {
                start: 0.0,
                run_time: 1.0,
                animations: vec![Animation::Write { id: a }],
            },
            Event::Wait {
                start: 1.0,
                secs: 0.5
            },
            Event::Play {
                start: 1.5,
                run_time: 0.25,
                animations: vec![Animation::Unwrite { id: a }],
            },
        ]
    );
    assert!((t.duration_secs() - 1.75).abs() < 1e-9);
    assert_eq!(t.total_frames(), 53);
    t.validate().unwrap();
}

#[test]
fn play_run_time_is_the_longest_default() {
    let mut rec = recorder();
    let short = rec.insert(text("x"));
    let long = rec.insert(text("a fairly long line of text"));
    rec.play(
        vec![Animation::Write { id: short }, Animation::Write { id: long }],
        None,
    )
    .unwrap();
    assert!((rec.now() - LONG_WRITE_SECS).abs() < 1e-9);
}

#[test]
fn invalid_calls_are_choreography_errors() {
    let mut rec = recorder();
    let a = rec.insert(text("a"));
    assert!(matches!(
        rec.play(vec![], None),
        Err(CastError::Choreography(_))
    ));
    assert!(rec.remove(a).is_err());
    assert!(
        rec.play(vec![Animation::Write { id: ObjectId(9) }], None)
            .is_err()
    );
    assert!(rec.wait(-1.0).is_err());
    assert!(rec.wait(f64::NAN).is_err());
    assert!(
        rec.play(vec![Animation::Write { id: a }], Some(0.0))
            .is_err()
    );
    rec.add(a).unwrap();
    assert!(
        rec.play(vec![Animation::Write { id: a }], None)
            .is_err()
    );
    // Nothing invalid was recorded.
    assert_eq!(rec.finish().events.len(), 1);
}

#[test]
fn json_round_trip_validates() {
    let mut rec = recorder();
    let a = rec.insert(text("a"));
    rec.add(a).unwrap();
    rec.wait(1.0).unwrap();
    let t = rec.finish();
    let json = t.to_json_pretty().unwrap();
    assert_eq!(Timeline::from_json(&json).unwrap(), t);
}

#[test]
fn json_round_trip_keeps_positions_exact() {
    let mut rec = recorder();
    let a = rec.insert(text("a").move_to(Point::new(-475.20000000000005, 0.1 + 0.2)));
    rec.add(a).unwrap();
    rec.wait(1.0 / 3.0).unwrap();
    let t = rec.finish();
    let back = Timeline::from_json(&t.to_json_pretty().unwrap()).unwrap();
    assert_eq!(back.objects[0].center, t.objects[0].center);
    assert_eq!(back, t);
}

#[test]
fn validate_rejects_broken_timelines() {
    let mut rec = recorder();
    let a = rec.insert(text("a"));
    rec.add(a).unwrap();
    let good = rec.finish();

    let mut t = good.clone();
    t.events.push(Event::Remove {
        at: 0.0,
        id: ObjectId(5),
    });
    assert!(t.validate().is_err());

    let mut t = good.clone();
    t.events.push(Event::Play {
        start: 0.0,
        run_time: 1.0,
        animations: vec![Animation::Write { id: a }],
    });
    assert!(t.validate().is_err());

    let mut t = good.clone();
    t.events.push(Event::Wait {
        start: 2.0,
        secs: 1.0,
    });
    t.events.push(Event::Wait {
        start: 1.0,
        secs: 1.0,
    });
    assert!(matches!(t.validate(), Err(CastError::Validation(_))));

    let mut t = good;
    t.canvas.width = 0;
    assert!(t.validate().is_err());
}

#[test]
fn director_writes_and_morphs_through_the_stage() {
    let cfg = crate::config::CastConfig::default();
    let mut rec = recorder();
    {
        let mut d = Director::new(&mut rec, &cfg);
        let w = d.eval_of(["2"]);
        let v = d.line(crate::formula::TokenLine::new().call(&w)).unwrap();
        let id = d.write_one(v).unwrap();
        d.hold().unwrap();
        let two = d.math(r"\mathtt{2}").unwrap();
        let id2 = d.morph(id, two).unwrap();
        d.unwrite(&[id2]).unwrap();
        assert_eq!(d.formulas().counter().current(), 1);
    }
    let t = rec.finish();
    assert_eq!(t.objects.len(), 2);
    assert!((t.duration_secs() - 4.0).abs() < 1e-9);
    t.validate().unwrap();
}
