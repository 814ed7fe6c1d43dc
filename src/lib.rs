//! Evalcast scripts explainer animations of interpreters and type checkers.
//!
//! A scene is written against a [`Director`], which records choreography into a [`Timeline`]:
//!
//! - Build formulas from labeled fragments ([`TokenLine`], [`FormulaContext::eval_of`])
//! - Drive nested reductions with a step list ([`Step`], [`run_steps`])
//! - Evaluate any frame of the timeline ([`evaluate`]) and rasterize it ([`CpuRenderer`])
//! - Stream a frame range into a [`FrameSink`] (PNG sequence or ffmpeg MP4)
#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Easing curves.
pub mod animation;
/// Image decoding and the font database.
pub mod assets;
/// Step-list choreography.
pub mod choreo;
/// Output and authoring settings.
pub mod config;
/// Frame sinks.
pub mod encode;
/// Frame evaluation.
pub mod eval;
/// Formulas and the labeled-fragment builder.
pub mod formula;
/// Core types, colors and the crate error.
pub mod foundation;
/// Visuals and layout.
pub mod layout;
/// CPU rendering.
pub mod render;
/// The shipped scenes.
pub mod scenes;
/// Stage capability, recorder and director.
pub mod stage;
/// TeX subset conversion.
pub mod tex;

pub use crate::foundation::color::Color;
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Point, Rect, Vec2};
pub use crate::foundation::error::{CastError, CastResult};

pub use crate::animation::ease::Ease;
pub use crate::assets::AssetStore;
pub use crate::choreo::{Row, Step, StepOptions, run_steps};
pub use crate::config::CastConfig;
pub use crate::encode::{FfmpegSink, FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
pub use crate::eval::{DrawItem, FrameScene, evaluate};
pub use crate::formula::eval_of::{EvalWrapper, Fragment, FormulaContext};
pub use crate::formula::{Formula, Token, TokenLine};
pub use crate::layout::{Direction, Visual};
pub use crate::render::{CpuRenderer, FrameRGBA, RenderOpts, RenderStats, render_frame, render_range};
pub use crate::scenes::Scene;
pub use crate::stage::{Animation, Director, ObjectId, Stage, Timeline, TimelineRecorder};
