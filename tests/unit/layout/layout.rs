use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn formula(parts: &[&str]) -> Formula {
    Formula::new(parts.iter().copied()).unwrap()
}

#[test]
fn text_size_follows_estimated_metrics() {
    let v = Visual::text("abcd\nab", 10.0, FontFamily::Mono, Color::WHITE);
    let size = v.size();
    assert!(approx(size.x, 4.0 * 0.6 * 10.0));
    assert!(approx(size.y, 2.0 * 1.2 * 10.0));
    assert_eq!(v.glyphs(), 6);
}

#[test]
fn formula_parts_become_keyed_runs_left_to_right() {
    let v = Visual::formula(formula(&["x", "+", "1"]), 20.0);
    let prims = v.primitives();
    let keys: Vec<_> = prims.iter().map(|p| p.key.as_str()).collect();
    assert_eq!(keys, vec!["x", "+", "1"]);
    assert!(prims[0].offset.x < prims[1].offset.x);
    assert!(prims[1].offset.x < prims[2].offset.x);
    // Runs share one baseline.
    assert!(approx(prims[0].offset.y, prims[2].offset.y));
}

#[test]
fn scale_multiplies_size_and_offsets() {
    let v = Visual::formula(formula(&["abc"]), 20.0);
    let big = v.clone().scaled(2.0);
    assert!(approx(big.width(), v.width() * 2.0));
    let (a, b) = (&v.primitives()[0], &big.primitives()[0]);
    assert!(approx(b.offset.x, a.offset.x * 2.0));
    match &b.kind {
        PrimitiveKind::Run { font_px, .. } => assert!(approx(*font_px, 40.0)),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn to_edge_up_leaves_the_buffer() {
    let canvas = Canvas {
        width: 800,
        height: 400,
    };
    let v = Visual::formula(formula(&["a"]), 50.0).to_edge(canvas, Direction::Up, 10.0);
    assert!(approx(v.bounds().y0, -200.0 + 10.0));
    assert!(approx(v.center.x, 0.0));
}

#[test]
fn next_to_down_stacks_below_with_centers_aligned() {
    let a = Visual::formula(formula(&["long formula"]), 20.0).shift(Vec2::new(30.0, -50.0));
    let b = Visual::formula(formula(&["x"]), 20.0).next_to(&a, Direction::Down, 5.0);
    assert!(approx(b.center.x, a.center.x));
    assert!(approx(b.bounds().y0, a.bounds().y1 + 5.0));
}

#[test]
fn arrange_keeps_the_group_center() {
    let mut items = vec![
        Visual::image("a.png", 100.0, 50.0).shift(Vec2::new(10.0, 10.0)),
        Visual::image("b.png", 60.0, 50.0).shift(Vec2::new(10.0, 10.0)),
    ];
    arrange(&mut items, Direction::Right, 20.0);
    assert!(approx(items[1].bounds().x0, items[0].bounds().x1 + 20.0));
    let group = items[0].bounds().union(items[1].bounds());
    assert!(approx(group.center().x, 10.0));
    assert!(approx(group.center().y, 10.0));
}

#[test]
fn axiom_rule_has_bar_conclusion_and_label() {
    let rule = Rule {
        premises: vec![],
        conclusion: formula(&[r"\Gamma \vdash n : \text{Number}"]),
        label: "NUM".to_owned(),
    };
    let v = Visual::rule(rule, 20.0);
    let prims = v.primitives();
    let keys: Vec<_> = prims.iter().map(|p| p.key.as_str()).collect();
    assert_eq!(
        keys,
        vec!["rule:bar", r"\Gamma \vdash n : \text{Number}", "(NUM)"]
    );
    let ext = extent_of(&prims);
    assert!(approx(ext.center().x, 0.0));
    assert!(approx(ext.center().y, 0.0));
}

#[test]
fn derivation_premises_sit_above_the_bar() {
    let leaf = |c: &str, l: &str| {
        Premise::Derivation(Rule {
            premises: vec![],
            conclusion: formula(&[c]),
            label: l.to_owned(),
        })
    };
    let rule = Rule {
        premises: vec![leaf("a", "NUM"), leaf("b", "VAR")],
        conclusion: formula(&["c"]),
        label: "LET".to_owned(),
    };
    let prims = Visual::rule(rule, 20.0).primitives();
    let bar_y = |label: &str| {
        let idx = prims.iter().position(|p| p.key == label).unwrap();
        // The bar is pushed right before its conclusion and label.
        prims[..idx]
            .iter()
            .rev()
            .find(|p| p.key == "rule:bar")
            .map(|p| p.offset.y)
            .unwrap()
    };
    let outer = bar_y("(LET)");
    let inner = bar_y("(NUM)");
    assert!(inner < outer);
    let c = prims.iter().find(|p| p.key == "c").unwrap();
    assert!(c.offset.y > outer);
}

#[test]
fn arrow_is_a_single_headed_stroke() {
    let v = Visual::arrow(Vec2::new(100.0, 0.0), Color::WHITE);
    let prims = v.primitives();
    assert_eq!(prims.len(), 1);
    match &prims[0].kind {
        PrimitiveKind::Stroke { to, head, .. } => {
            assert!(*head);
            assert!(approx(to.x, 50.0));
            assert!(approx(prims[0].offset.x, -50.0));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn align_edge_left_lines_up_left_edges() {
    let mut items = vec![
        Visual::image("a.png", 100.0, 20.0),
        Visual::image("b.png", 40.0, 20.0).shift(Vec2::new(80.0, 30.0)),
    ];
    align_edge(&mut items, Direction::Left);
    assert!(approx(items[0].bounds().x0, -50.0));
    assert!(approx(items[1].bounds().x0, -50.0));
    // The other axis is untouched.
    assert!(approx(items[1].center.y, 30.0));
}

#[test]
fn table_aligns_columns_and_centers_the_grid() {
    let cell = |w: f64| Visual::image("c.png", w, 10.0);
    let out = table(
        vec![vec![cell(20.0), cell(50.0)], vec![cell(40.0), cell(10.0)]],
        &[ColumnAlign::Right, ColumnAlign::Left],
        5.0,
        2.0,
    );
    assert_eq!(out.len(), 4);
    // Column widths 40 and 50, 5 apart: 95 wide, from -47.5.
    assert!(approx(out[0].bounds().x1, -7.5));
    assert!(approx(out[2].bounds().x1, -7.5));
    assert!(approx(out[1].bounds().x0, -2.5));
    assert!(approx(out[3].bounds().x0, -2.5));
    assert!(approx(out[0].center.y, -6.0));
    assert!(approx(out[3].center.y, 6.0));
    let group = group_bounds(&out).unwrap();
    assert!(approx(group.center().x, 0.0));
    assert!(approx(group.center().y, 0.0));
}

#[test]
fn beside_a_box_centers_on_it() {
    let bounds = Rect::new(-10.0, 0.0, 30.0, 40.0);
    let v = Visual::image("a.png", 10.0, 10.0).beside(bounds, Direction::Down, 4.0);
    assert!(approx(v.center.x, 10.0));
    assert!(approx(v.bounds().y0, 44.0));
}
