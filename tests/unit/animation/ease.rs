use super::*;

const ALL: [Ease; 5] = [
    Ease::Linear,
    Ease::Smooth,
    Ease::InOutQuad,
    Ease::InOutCubic,
    Ease::ThereAndBack,
];

#[test]
fn monotone_eases_hit_endpoints() {
    for ease in [Ease::Linear, Ease::Smooth, Ease::InOutQuad, Ease::InOutCubic] {
        assert!(ease.apply(0.0).abs() < 1e-9, "{ease:?}");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-9, "{ease:?}");
        assert!((ease.apply(0.5) - 0.5).abs() < 1e-9, "{ease:?}");
    }
}

#[test]
fn there_and_back_returns_to_zero() {
    assert!(Ease::ThereAndBack.apply(0.0).abs() < 1e-9);
    assert!((Ease::ThereAndBack.apply(0.5) - 1.0).abs() < 1e-9);
    assert!(Ease::ThereAndBack.apply(1.0).abs() < 1e-9);
}

#[test]
fn inputs_are_clamped() {
    for ease in ALL {
        let lo = ease.apply(-3.0);
        let hi = ease.apply(7.0);
        assert!((0.0..=1.0).contains(&lo));
        assert!((0.0..=1.0).contains(&hi));
    }
}
