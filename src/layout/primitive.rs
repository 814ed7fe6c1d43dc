use crate::{
    foundation::{
        color::Color,
        core::{Rect, Vec2},
    },
    layout::metrics::{ASCENT_EM, FontFamily, LINE_HEIGHT_EM, glyph_count, text_width},
};

/// One drawable piece of a laid-out visual, positioned relative to the visual's center.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Primitive {
    /// Identity used by the structural matcher (raw TeX of a formula part, a text line, an image
    /// source).
    pub key: String,
    /// Run: baseline-left origin. Stroke: start point. Image: top-left corner.
    pub offset: Vec2,
    /// What to draw.
    pub kind: PrimitiveKind,
}

/// Drawable payload of a [`Primitive`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum PrimitiveKind {
    /// A run of text on one baseline.
    Run {
        /// Display text.
        text: String,
        /// Font size in pixels.
        font_px: f64,
        /// Font class.
        family: FontFamily,
        /// Fill color.
        color: Color,
    },
    /// A straight stroke, optionally ending in an arrow head.
    Stroke {
        /// End point, relative to the visual center.
        to: Vec2,
        /// Stroke width in pixels.
        width: f64,
        /// Stroke color.
        color: Color,
        /// Draw an arrow head at `to`.
        head: bool,
    },
    /// A raster image.
    Image {
        /// Assets-root-relative path.
        source: String,
        /// Drawn width in pixels.
        width: f64,
        /// Drawn height in pixels.
        height: f64,
    },
}

impl Primitive {
    pub(crate) fn run(
        key: impl Into<String>,
        offset: Vec2,
        text: impl Into<String>,
        font_px: f64,
        family: FontFamily,
        color: Color,
    ) -> Self {
        Self {
            key: key.into(),
            offset,
            kind: PrimitiveKind::Run {
                text: text.into(),
                font_px,
                family,
                color,
            },
        }
    }

    /// Visible glyph count. Strokes and images count as one.
    pub fn glyphs(&self) -> usize {
        match &self.kind {
            PrimitiveKind::Run { text, .. } => glyph_count(text),
            PrimitiveKind::Stroke { .. } | PrimitiveKind::Image { .. } => 1,
        }
    }

    /// Extent relative to the visual center.
    pub fn extent(&self) -> Rect {
        match &self.kind {
            PrimitiveKind::Run {
                text,
                font_px,
                family,
                ..
            } => {
                let top = self.offset.y - ASCENT_EM * font_px;
                Rect::new(
                    self.offset.x,
                    top,
                    self.offset.x + text_width(text, *font_px, *family),
                    top + LINE_HEIGHT_EM * font_px,
                )
            }
            PrimitiveKind::Stroke { to, width, head, .. } => {
                let pad = if *head { width * 3.0 } else { width * 0.5 };
                Rect::from_points(self.offset.to_point(), to.to_point()).inflate(pad, pad)
            }
            PrimitiveKind::Image { width, height, .. } => Rect::new(
                self.offset.x,
                self.offset.y,
                self.offset.x + width,
                self.offset.y + height,
            ),
        }
    }

    /// Scale position and size by `s` around the visual center.
    pub fn scaled(&self, s: f64) -> Self {
        let kind = match &self.kind {
            PrimitiveKind::Run {
                text,
                font_px,
                family,
                color,
            } => PrimitiveKind::Run {
                text: text.clone(),
                font_px: font_px * s,
                family: *family,
                color: *color,
            },
            PrimitiveKind::Stroke {
                to,
                width,
                color,
                head,
            } => PrimitiveKind::Stroke {
                to: *to * s,
                width: width * s,
                color: *color,
                head: *head,
            },
            PrimitiveKind::Image {
                source,
                width,
                height,
            } => PrimitiveKind::Image {
                source: source.clone(),
                width: width * s,
                height: height * s,
            },
        };
        Self {
            key: self.key.clone(),
            offset: self.offset * s,
            kind,
        }
    }

    /// Move by `d`.
    pub fn translated(&self, d: Vec2) -> Self {
        let mut out = self.clone();
        out.offset += d;
        if let PrimitiveKind::Stroke { to, .. } = &mut out.kind {
            *to += d;
        }
        out
    }
}

/// Union of the extents of `prims`, or an empty rect at the origin.
pub fn extent_of(prims: &[Primitive]) -> Rect {
    prims
        .iter()
        .map(Primitive::extent)
        .reduce(|a, b| a.union(b))
        .unwrap_or(Rect::ZERO)
}

/// Shift `prims` so their extent is centered on the origin and return the extent size.
pub(crate) fn recenter(prims: Vec<Primitive>) -> (Vec2, Vec<Primitive>) {
    let ext = extent_of(&prims);
    let d = -ext.center().to_vec2();
    let size = Vec2::new(ext.width(), ext.height());
    (size, prims.iter().map(|p| p.translated(d)).collect())
}
