//! Estimated font metrics.
//!
//! Layout never shapes text. Every glyph advances by a fixed fraction of the font size, which keeps
//! layout deterministic and independent of the fonts installed on the host.

/// Advance of one monospace glyph, in em.
pub const MONO_ADVANCE_EM: f64 = 0.6;
/// Advance of one proportional glyph, in em.
pub const SANS_ADVANCE_EM: f64 = 0.55;
/// Distance between consecutive baselines, in em.
pub const LINE_HEIGHT_EM: f64 = 1.2;
/// Baseline offset from the top of a line box, in em.
pub const ASCENT_EM: f64 = 0.8;

/// Font family class of a text run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FontFamily {
    /// Proportional text (titles, structural formula parts).
    Sans,
    /// Code-like text (source fragments, listings).
    Mono,
}

impl FontFamily {
    /// Advance of one glyph, in em.
    pub fn advance_em(self) -> f64 {
        match self {
            Self::Sans => SANS_ADVANCE_EM,
            Self::Mono => MONO_ADVANCE_EM,
        }
    }
}

/// Width of `text` set at `font_px`.
pub fn text_width(text: &str, font_px: f64, family: FontFamily) -> f64 {
    text.chars().count() as f64 * family.advance_em() * font_px
}

/// Height of a block of `lines` lines set at `font_px`.
pub fn block_height(lines: usize, font_px: f64) -> f64 {
    lines as f64 * LINE_HEIGHT_EM * font_px
}

/// Number of visible glyphs in `text`.
pub fn glyph_count(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}
