use super::*;
use crate::{
    foundation::{
        color::Color,
        core::{Canvas, Fps},
    },
    layout::Visual,
    stage::{Stage, TimelineRecorder},
};

fn shipped_assets() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")
}

fn timeline_with_images(sources: &[&str]) -> Timeline {
    let mut rec = TimelineRecorder::new(
        "assets-test",
        Fps::default(),
        Canvas::default(),
        Color::BLACK,
        "Monospace",
    );
    for s in sources {
        let id = rec.insert(Visual::image(*s, 10.0, 10.0));
        rec.add(id).unwrap();
    }
    rec.finish()
}

#[test]
fn prepare_loads_each_image_once() {
    let t = timeline_with_images(&[
        "images/sunglasses.png",
        "./images/sunglasses.png",
        "images/turtles.png",
    ]);
    let store = AssetStore::prepare(&t, shipped_assets()).unwrap();
    assert_eq!(store.image_count(), 2);
    let img = store.image("images\\turtles.png").unwrap();
    assert!(img.width > 0 && img.height > 0);
    assert_eq!(
        img.rgba8_premul.len(),
        (img.width * img.height * 4) as usize
    );
}

#[test]
fn missing_or_escaping_paths_fail() {
    let t = timeline_with_images(&["images/nope.png"]);
    assert!(AssetStore::prepare(&t, shipped_assets()).is_err());

    let t = timeline_with_images(&["../secret.png"]);
    assert!(matches!(
        AssetStore::prepare(&t, shipped_assets()),
        Err(CastError::Validation(_))
    ));
}

#[test]
fn unprepared_lookups_are_errors() {
    let store = AssetStore::prepare(&timeline_with_images(&[]), shipped_assets()).unwrap();
    assert_eq!(store.image_count(), 0);
    assert!(store.image("images/sunglasses.png").is_err());
}
