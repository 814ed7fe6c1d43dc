use crate::{
    foundation::{
        color::Color,
        core::{Canvas, FrameIndex, Point, Rect},
        math::lerp,
    },
    layout::metrics::FontFamily,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Everything drawn in one frame, in painter's order.
pub struct FrameScene {
    /// Evaluated frame index.
    pub frame: FrameIndex,
    /// Output canvas.
    pub canvas: Canvas,
    /// Background fill.
    pub background: Color,
    /// Font family for [`FontFamily::Mono`] runs.
    pub monospace: String,
    /// Draw items, first drawn first.
    pub items: Vec<DrawItem>,
}

impl FrameScene {
    /// Text items' strings, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|i| match i {
                DrawItem::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// One absolutely positioned draw call.
pub enum DrawItem {
    /// A run of text.
    Text {
        /// Display text.
        text: String,
        /// Baseline-left origin in canvas pixels.
        origin: Point,
        /// Font size in pixels.
        font_px: f64,
        /// Font class.
        family: FontFamily,
        /// Fill color.
        color: Color,
        /// Opacity in `[0, 1]`.
        opacity: f64,
    },
    /// A straight stroke.
    Stroke {
        /// Start point in canvas pixels.
        from: Point,
        /// End point in canvas pixels.
        to: Point,
        /// Stroke width in pixels.
        width: f64,
        /// Stroke color.
        color: Color,
        /// Opacity in `[0, 1]`.
        opacity: f64,
        /// Arrow head at `to`.
        head: bool,
    },
    /// A raster image.
    Image {
        /// Assets-root-relative path.
        source: String,
        /// Destination rectangle in canvas pixels.
        rect: Rect,
        /// Opacity in `[0, 1]`.
        opacity: f64,
    },
}

impl DrawItem {
    /// Opacity in `[0, 1]`.
    pub fn opacity(&self) -> f64 {
        match self {
            Self::Text { opacity, .. } | Self::Stroke { opacity, .. } | Self::Image { opacity, .. } => {
                *opacity
            }
        }
    }

    pub(crate) fn with_opacity(mut self, k: f64) -> Self {
        match &mut self {
            Self::Text { opacity, .. } | Self::Stroke { opacity, .. } | Self::Image { opacity, .. } => {
                *opacity *= k
            }
        }
        self
    }

    /// Interpolate between two items of the same kind; `None` when the kinds differ.
    pub(crate) fn lerp(&self, other: &Self, t: f64) -> Option<Self> {
        let pt = |a: Point, b: Point| a.lerp(b, t);
        match (self, other) {
            (
                Self::Text {
                    text: ta,
                    origin: oa,
                    font_px: fa,
                    family: fam_a,
                    color: ca,
                    opacity: pa,
                },
                Self::Text {
                    text: tb,
                    origin: ob,
                    font_px: fb,
                    family: fam_b,
                    color: cb,
                    opacity: pb,
                },
            ) => Some(Self::Text {
                text: if t < 0.5 { ta.clone() } else { tb.clone() },
                origin: pt(*oa, *ob),
                font_px: lerp(*fa, *fb, t),
                family: if t < 0.5 { *fam_a } else { *fam_b },
                color: ca.lerp(*cb, t),
                opacity: lerp(*pa, *pb, t),
            }),
            (
                Self::Stroke {
                    from: fa,
                    to: ta,
                    width: wa,
                    color: ca,
                    opacity: pa,
                    head,
                },
                Self::Stroke {
                    from: fb,
                    to: tb,
                    width: wb,
                    color: cb,
                    opacity: pb,
                    ..
                },
            ) => Some(Self::Stroke {
                from: pt(*fa, *fb),
                to: pt(*ta, *tb),
                width: lerp(*wa, *wb, t),
                color: ca.lerp(*cb, t),
                opacity: lerp(*pa, *pb, t),
                head: *head,
            }),
            (
                Self::Image {
                    source,
                    rect: ra,
                    opacity: pa,
                },
                Self::Image {
                    rect: rb,
                    opacity: pb,
                    ..
                },
            ) => Some(Self::Image {
                source: source.clone(),
                rect: Rect::from_points(
                    pt(ra.origin(), rb.origin()),
                    pt(
                        Point::new(ra.x1, ra.y1),
                        Point::new(rb.x1, rb.y1),
                    ),
                ),
                opacity: lerp(*pa, *pb, t),
            }),
            _ => None,
        }
    }
}
