//! The capability scenes are written against, and the recorder that turns a scene into a timeline.

mod director;
mod screen;
mod timeline;

pub use director::Director;
pub use screen::Screen;
pub use timeline::{Event, Timeline, TimelineRecorder};

use crate::{
    foundation::{color::Color, core::Canvas, error::CastResult},
    layout::Visual,
};

/// Handle of a visual registered with a [`Stage`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// Index into the stage's object table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One animation inside a play.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Animation {
    /// Draw the object in, glyph by glyph.
    Write {
        /// Target object.
        id: ObjectId,
    },
    /// Reverse of [`Animation::Write`].
    Unwrite {
        /// Target object.
        id: ObjectId,
    },
    /// Fade the object in.
    FadeIn {
        /// Target object.
        id: ObjectId,
    },
    /// Fade the object out.
    FadeOut {
        /// Target object.
        id: ObjectId,
    },
    /// Content-aware morph: primitives with equal keys move, the rest fade.
    TransformMatching {
        /// Object leaving the screen.
        from: ObjectId,
        /// Object arriving on screen.
        to: ObjectId,
    },
    /// Whole-object morph without correspondence.
    Transform {
        /// Object leaving the screen.
        from: ObjectId,
        /// Object arriving on screen.
        to: ObjectId,
    },
    /// Animate every primitive of the object to one color.
    Recolor {
        /// Target object.
        id: ObjectId,
        /// Final color.
        color: Color,
    },
    /// Shake the object in place.
    Wiggle {
        /// Target object.
        id: ObjectId,
    },
}

impl Animation {
    /// Glyph count at which writes slow down to [`LONG_WRITE_SECS`].
    pub const LONG_WRITE_GLYPHS: usize = 15;

    /// Objects this animation touches.
    pub fn objects(&self) -> Vec<ObjectId> {
        match *self {
            Self::Write { id }
            | Self::Unwrite { id }
            | Self::FadeIn { id }
            | Self::FadeOut { id }
            | Self::Recolor { id, .. }
            | Self::Wiggle { id } => vec![id],
            Self::TransformMatching { from, to } | Self::Transform { from, to } => vec![from, to],
        }
    }

    /// Default run time given the visual of the primary object.
    pub fn default_run_time(&self, visual: &Visual) -> f64 {
        match self {
            Self::Write { .. } | Self::Unwrite { .. }
                if visual.glyphs() >= Self::LONG_WRITE_GLYPHS =>
            {
                LONG_WRITE_SECS
            }
            _ => DEFAULT_RUN_TIME_SECS,
        }
    }
}

/// Run time of a play when nothing longer is needed.
pub const DEFAULT_RUN_TIME_SECS: f64 = 1.0;
/// Run time of writes over long visuals.
pub const LONG_WRITE_SECS: f64 = 2.0;

/// Display capability: register visuals, show and hide them, play animations, hold.
///
/// Calls are strictly sequential. A play completes before the next call is made.
pub trait Stage {
    /// Output canvas.
    fn canvas(&self) -> Canvas;

    /// Register a visual without showing it.
    fn insert(&mut self, visual: Visual) -> ObjectId;

    /// Visual registered under `id`.
    fn visual(&self, id: ObjectId) -> Option<&Visual>;

    /// Whether `id` is currently shown.
    fn is_on_screen(&self, id: ObjectId) -> bool;

    /// Show instantly.
    fn add(&mut self, id: ObjectId) -> CastResult<()>;

    /// Hide instantly.
    fn remove(&mut self, id: ObjectId) -> CastResult<()>;

    /// Play `animations` together. `run_time` overrides the longest default run time.
    fn play(&mut self, animations: Vec<Animation>, run_time: Option<f64>) -> CastResult<()>;

    /// Hold the current frame for `secs` seconds.
    fn wait(&mut self, secs: f64) -> CastResult<()>;
}

#[cfg(test)]
#[path = "../../tests/unit/stage/stage.rs"]
mod tests;
