//! Visuals, estimated-metrics layout and arrangement helpers.
//!
//! Positions live in stage space: pixels, origin at the canvas center, `y` growing downwards.

pub mod metrics;
mod primitive;

pub use primitive::{Primitive, PrimitiveKind, extent_of};

use crate::{
    foundation::{
        color::Color,
        core::{Canvas, Point, Rect, Vec2},
    },
    formula::{Formula, FormulaPart, PartRole},
    layout::{
        metrics::{ASCENT_EM, FontFamily, LINE_HEIGHT_EM, block_height, text_width},
        primitive::recenter,
    },
};

/// Default gap for [`Visual::next_to`] and [`arrange`], in scene units.
pub const NEXT_TO_BUFF_UNITS: f64 = 0.25;
/// Default gap for [`Visual::to_edge`], in scene units.
pub const EDGE_BUFF_UNITS: f64 = 0.5;

/// Screen direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    /// Towards the top edge.
    Up,
    /// Towards the bottom edge.
    Down,
    /// Towards the left edge.
    Left,
    /// Towards the right edge.
    Right,
}

impl Direction {
    /// Unit vector in stage space.
    pub fn unit(self) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -1.0),
            Self::Down => Vec2::new(0.0, 1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
        }
    }

    fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// An inference rule: premises over a bar over a conclusion, labeled on the right.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rule {
    /// Judgements or nested derivations above the bar. Empty for axioms.
    pub premises: Vec<Premise>,
    /// Judgement below the bar.
    pub conclusion: Formula,
    /// Rule name, drawn as `(NAME)`.
    pub label: String,
}

/// One premise of a [`Rule`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Premise {
    /// A plain judgement.
    Judgement(Formula),
    /// A nested derivation.
    Derivation(Rule),
}

/// What a visual shows.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum VisualKind {
    /// Left-aligned lines of text.
    Text {
        /// One entry per line.
        lines: Vec<String>,
        /// Font size in pixels.
        font_px: f64,
        /// Font class.
        family: FontFamily,
        /// Fill color.
        color: Color,
    },
    /// A single-line formula.
    Formula {
        /// Formula parts.
        formula: Formula,
        /// Font size in pixels.
        font_px: f64,
    },
    /// An inference rule or derivation tree.
    Rule {
        /// Rule tree.
        rule: Rule,
        /// Font size in pixels.
        font_px: f64,
    },
    /// A raster image.
    Image {
        /// Assets-root-relative path.
        source: String,
        /// Width in pixels.
        width: f64,
        /// Height in pixels.
        height: f64,
    },
    /// A straight arrow through the visual center.
    Arrow {
        /// Tail-to-tip vector.
        delta: Vec2,
        /// Stroke color.
        color: Color,
        /// Stroke width in pixels.
        width: f64,
    },
}

/// A positioned, scaled visual.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Visual {
    /// Content.
    pub kind: VisualKind,
    /// Center in stage space.
    pub center: Point,
    /// Uniform scale applied around `center`.
    pub scale: f64,
}

impl Visual {
    /// Centered, unscaled visual.
    pub fn new(kind: VisualKind) -> Self {
        Self {
            kind,
            center: Point::ORIGIN,
            scale: 1.0,
        }
    }

    /// Text block.
    pub fn text(text: &str, font_px: f64, family: FontFamily, color: Color) -> Self {
        Self::new(VisualKind::Text {
            lines: text.lines().map(str::to_owned).collect(),
            font_px,
            family,
            color,
        })
    }

    /// Formula.
    pub fn formula(formula: Formula, font_px: f64) -> Self {
        Self::new(VisualKind::Formula { formula, font_px })
    }

    /// Inference rule.
    pub fn rule(rule: Rule, font_px: f64) -> Self {
        Self::new(VisualKind::Rule { rule, font_px })
    }

    /// Raster image drawn at `width` x `height` pixels.
    pub fn image(source: impl Into<String>, width: f64, height: f64) -> Self {
        Self::new(VisualKind::Image {
            source: source.into(),
            width,
            height,
        })
    }

    /// Arrow from `center - delta / 2` to `center + delta / 2`.
    pub fn arrow(delta: Vec2, color: Color) -> Self {
        Self::new(VisualKind::Arrow {
            delta,
            color,
            width: 4.0,
        })
    }

    /// Primitives relative to `center`, with `scale` applied.
    pub fn primitives(&self) -> Vec<Primitive> {
        let (_, prims) = self.kind.layout();
        if self.scale == 1.0 {
            return prims;
        }
        prims.iter().map(|p| p.scaled(self.scale)).collect()
    }

    /// Width and height with `scale` applied.
    pub fn size(&self) -> Vec2 {
        self.kind.layout().0 * self.scale
    }

    /// Width with `scale` applied.
    pub fn width(&self) -> f64 {
        self.size().x
    }

    /// Height with `scale` applied.
    pub fn height(&self) -> f64 {
        self.size().y
    }

    /// Bounding box in stage space.
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, self.size().to_size())
    }

    /// Visible glyphs, counting each stroke and image as one.
    pub fn glyphs(&self) -> usize {
        self.kind.layout().1.iter().map(Primitive::glyphs).sum()
    }

    /// Multiply the scale by `s`.
    pub fn scaled(mut self, s: f64) -> Self {
        self.scale *= s;
        self
    }

    /// Move by `d`.
    pub fn shift(mut self, d: Vec2) -> Self {
        self.center += d;
        self
    }

    /// Center on `p`.
    pub fn move_to(mut self, p: Point) -> Self {
        self.center = p;
        self
    }

    /// Push against one canvas edge leaving `buff` pixels; the other axis is kept.
    pub fn to_edge(mut self, canvas: Canvas, dir: Direction, buff: f64) -> Self {
        let half = Vec2::new(f64::from(canvas.width), f64::from(canvas.height)) * 0.5;
        let size = self.size();
        match dir {
            Direction::Up => self.center.y = -half.y + buff + size.y * 0.5,
            Direction::Down => self.center.y = half.y - buff - size.y * 0.5,
            Direction::Left => self.center.x = -half.x + buff + size.x * 0.5,
            Direction::Right => self.center.x = half.x - buff - size.x * 0.5,
        }
        self
    }

    /// Place beside `other` in direction `dir`, `buff` pixels apart, centers aligned on the
    /// other axis.
    pub fn next_to(self, other: &Visual, dir: Direction, buff: f64) -> Self {
        self.beside(other.bounds(), dir, buff)
    }

    /// Place beside the box `bounds` in direction `dir`, `buff` pixels apart, centered on the box
    /// along the other axis.
    pub fn beside(mut self, bounds: Rect, dir: Direction, buff: f64) -> Self {
        let size = self.size();
        let c = bounds.center();
        self.center = match dir {
            Direction::Up => Point::new(c.x, bounds.y0 - buff - size.y * 0.5),
            Direction::Down => Point::new(c.x, bounds.y1 + buff + size.y * 0.5),
            Direction::Left => Point::new(bounds.x0 - buff - size.x * 0.5, c.y),
            Direction::Right => Point::new(bounds.x1 + buff + size.x * 0.5, c.y),
        };
        self
    }
}

/// Union of the items' bounds; `None` for no items.
pub fn group_bounds(items: &[Visual]) -> Option<Rect> {
    items.iter().map(Visual::bounds).reduce(|a, b| a.union(b))
}

/// Move every item by `d`.
pub fn shift_all(items: &mut [Visual], d: Vec2) {
    for item in items.iter_mut() {
        item.center += d;
    }
}

/// Lay `items` out one after another in direction `dir`, `buff` pixels apart, keeping the
/// group's former center.
pub fn arrange(items: &mut [Visual], dir: Direction, buff: f64) {
    let Some(before) = group_bounds(items) else {
        return;
    };
    let step = dir.unit();
    let mut cursor = 0.0;
    for item in items.iter_mut() {
        let size = item.size();
        let extent = if dir.is_vertical() { size.y } else { size.x };
        item.center = (step * (cursor + extent * 0.5)).to_point();
        cursor += extent + buff;
    }
    let after = group_bounds(items).unwrap_or(before);
    shift_all(items, before.center() - after.center());
}

/// Line up the edges of `items` facing `dir` with the group's outermost edge in that direction.
pub fn align_edge(items: &mut [Visual], dir: Direction) {
    let Some(group) = group_bounds(items) else {
        return;
    };
    for item in items.iter_mut() {
        let b = item.bounds();
        item.center += match dir {
            Direction::Up => Vec2::new(0.0, group.y0 - b.y0),
            Direction::Down => Vec2::new(0.0, group.y1 - b.y1),
            Direction::Left => Vec2::new(group.x0 - b.x0, 0.0),
            Direction::Right => Vec2::new(group.x1 - b.x1, 0.0),
        };
    }
}

/// Horizontal alignment of a [`table`] column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColumnAlign {
    /// Left edges line up.
    #[default]
    Left,
    /// Centers line up.
    Center,
    /// Right edges line up.
    Right,
}

/// Lay rows of cells out as a grid centered on the origin.
///
/// Columns are as wide as their widest cell and `col_buff` pixels apart; rows are as tall as
/// their tallest cell and `row_buff` pixels apart. Rows may be ragged. Columns past the end of
/// `align` are left-aligned. Cells come back in row-major order.
pub fn table(
    rows: Vec<Vec<Visual>>,
    align: &[ColumnAlign],
    col_buff: f64,
    row_buff: f64,
) -> Vec<Visual> {
    let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0.0_f64; cols];
    let mut heights = Vec::with_capacity(rows.len());
    for row in &rows {
        heights.push(row.iter().map(Visual::height).fold(0.0, f64::max));
        for (c, cell) in row.iter().enumerate() {
            widths[c] = widths[c].max(cell.width());
        }
    }
    let gaps = |n: usize, buff: f64| n.saturating_sub(1) as f64 * buff;
    let total_w = widths.iter().sum::<f64>() + gaps(cols, col_buff);
    let total_h = heights.iter().sum::<f64>() + gaps(rows.len(), row_buff);

    let mut out = Vec::with_capacity(rows.iter().map(Vec::len).sum());
    let mut top = -total_h * 0.5;
    for (row, h) in rows.into_iter().zip(heights) {
        let mut left = -total_w * 0.5;
        for (c, cell) in row.into_iter().enumerate() {
            let w = cell.width();
            let x = match align.get(c).copied().unwrap_or_default() {
                ColumnAlign::Left => left + w * 0.5,
                ColumnAlign::Center => left + widths[c] * 0.5,
                ColumnAlign::Right => left + widths[c] - w * 0.5,
            };
            out.push(cell.move_to(Point::new(x, top + h * 0.5)));
            left += widths[c] + col_buff;
        }
        top += h + row_buff;
    }
    out
}

impl VisualKind {
    /// Unscaled size and primitives centered on the origin.
    pub fn layout(&self) -> (Vec2, Vec<Primitive>) {
        match self {
            Self::Text {
                lines,
                font_px,
                family,
                color,
            } => {
                let width = lines
                    .iter()
                    .map(|l| text_width(l, *font_px, *family))
                    .fold(0.0, f64::max);
                let height = block_height(lines.len(), *font_px);
                let x0 = -width * 0.5;
                let top = -height * 0.5;
                let prims = lines
                    .iter()
                    .enumerate()
                    .filter(|(_, l)| !l.trim().is_empty())
                    .map(|(i, l)| {
                        let baseline = top + (i as f64) * LINE_HEIGHT_EM * font_px
                            + ASCENT_EM * font_px;
                        Primitive::run(
                            l.clone(),
                            Vec2::new(x0, baseline),
                            l.clone(),
                            *font_px,
                            *family,
                            *color,
                        )
                    })
                    .collect();
                (Vec2::new(width, height), prims)
            }
            Self::Formula { formula, font_px } => {
                let width = formula_width(formula, *font_px);
                let height = LINE_HEIGHT_EM * font_px;
                let prims = formula_runs(formula, *font_px, -width * 0.5, -height * 0.5);
                (Vec2::new(width, height), prims)
            }
            Self::Rule { rule, font_px } => recenter(rule_prims(rule, *font_px)),
            Self::Image {
                source,
                width,
                height,
            } => (
                Vec2::new(*width, *height),
                vec![Primitive {
                    key: format!("image:{source}"),
                    offset: Vec2::new(-width * 0.5, -height * 0.5),
                    kind: PrimitiveKind::Image {
                        source: source.clone(),
                        width: *width,
                        height: *height,
                    },
                }],
            ),
            Self::Arrow {
                delta,
                color,
                width,
            } => (
                Vec2::new(delta.x.abs(), delta.y.abs().max(*width)),
                vec![Primitive {
                    key: "arrow".to_owned(),
                    offset: -*delta * 0.5,
                    kind: PrimitiveKind::Stroke {
                        to: *delta * 0.5,
                        width: *width,
                        color: *color,
                        head: true,
                    },
                }],
            ),
        }
    }
}

/// Font class a formula part is set in.
pub fn part_family(part: &FormulaPart) -> FontFamily {
    if part.role == PartRole::Source || part.tex.contains(r"\mathtt") || part.tex.contains(r"\texttt")
    {
        FontFamily::Mono
    } else {
        FontFamily::Sans
    }
}

fn formula_width(formula: &Formula, font_px: f64) -> f64 {
    formula
        .parts()
        .iter()
        .map(|p| text_width(&p.text, font_px, part_family(p)))
        .sum()
}

/// Runs for `formula` with its line box's top-left corner at (`x0`, `top`).
fn formula_runs(formula: &Formula, font_px: f64, x0: f64, top: f64) -> Vec<Primitive> {
    let baseline = top + ASCENT_EM * font_px;
    let mut x = x0;
    let mut out = Vec::with_capacity(formula.parts().len());
    for part in formula.parts() {
        let family = part_family(part);
        let w = text_width(&part.text, font_px, family);
        if !part.text.trim().is_empty() {
            out.push(Primitive::run(
                part.tex.clone(),
                Vec2::new(x, baseline),
                part.text.clone(),
                font_px,
                family,
                part.color,
            ));
        }
        x += w;
    }
    out
}

/// Rule primitives with the bar's left end at `x = 0` and the premise row's top at `y = 0`.
fn rule_prims(rule: &Rule, font_px: f64) -> Vec<Primitive> {
    let line = LINE_HEIGHT_EM * font_px;
    let premise_gap = 2.0 * font_px;
    let bar_pad = 0.2 * font_px;

    let premises: Vec<(Vec2, Vec<Primitive>)> = rule
        .premises
        .iter()
        .map(|p| match p {
            Premise::Judgement(f) => {
                let w = formula_width(f, font_px);
                (Vec2::new(w, line), formula_runs(f, font_px, 0.0, 0.0))
            }
            Premise::Derivation(r) => {
                let prims = rule_prims(r, font_px);
                let ext = extent_of(&prims);
                let d = Vec2::new(-ext.x0, -ext.y0);
                (
                    Vec2::new(ext.width(), ext.height()),
                    prims.iter().map(|p| p.translated(d)).collect(),
                )
            }
        })
        .collect();

    let row_w = premises.iter().map(|(s, _)| s.x).sum::<f64>()
        + (premises.len().saturating_sub(1) as f64) * premise_gap;
    let row_h = premises.iter().map(|(s, _)| s.y).fold(0.0, f64::max);
    let concl_w = formula_width(&rule.conclusion, font_px);
    let bar_w = row_w.max(concl_w) + 2.0 * bar_pad;
    let bar_y = row_h + bar_pad;

    let mut out = Vec::new();
    let mut x = (bar_w - row_w) * 0.5;
    for (size, prims) in premises {
        // Premises sit on the bar.
        let d = Vec2::new(x, row_h - size.y);
        out.extend(prims.iter().map(|p| p.translated(d)));
        x += size.x + premise_gap;
    }

    out.push(Primitive {
        key: "rule:bar".to_owned(),
        offset: Vec2::new(0.0, bar_y),
        kind: PrimitiveKind::Stroke {
            to: Vec2::new(bar_w, bar_y),
            width: (font_px / 20.0).max(1.0),
            color: Color::WHITE,
            head: false,
        },
    });

    out.extend(formula_runs(
        &rule.conclusion,
        font_px,
        (bar_w - concl_w) * 0.5,
        bar_y + bar_pad,
    ));

    let label = format!("({})", rule.label);
    out.push(Primitive::run(
        label.clone(),
        Vec2::new(bar_w + bar_pad, bar_y - line * 0.5 + ASCENT_EM * font_px),
        label,
        font_px,
        FontFamily::Sans,
        Color::WHITE,
    ));
    out
}

#[cfg(test)]
#[path = "../../tests/unit/layout/layout.rs"]
mod tests;
