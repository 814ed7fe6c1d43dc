//! The shipped explainer scenes and their registry.
//!
//! A scene is a parameterless script over a [`Director`]. [`record`] runs one against a
//! [`TimelineRecorder`] and returns the validated timeline.

mod interpreter;
mod polynomial;
mod typing;

use crate::{
    config::CastConfig,
    foundation::error::{CastError, CastResult},
    layout::{ColumnAlign, Visual, table},
    stage::{Director, Timeline, TimelineRecorder},
};

/// An independently invocable scene.
pub trait Scene {
    /// Name used on the command line.
    fn name(&self) -> &'static str;

    /// One-line description.
    fn summary(&self) -> &'static str;

    /// Script the scene.
    fn construct(&self, d: &mut Director<'_>) -> CastResult<()>;
}

/// A scene backed by a plain function.
#[derive(Clone, Copy)]
pub struct ScriptScene {
    name: &'static str,
    summary: &'static str,
    script: fn(&mut Director<'_>) -> CastResult<()>,
}

impl Scene for ScriptScene {
    fn name(&self) -> &'static str {
        self.name
    }

    fn summary(&self) -> &'static str {
        self.summary
    }

    fn construct(&self, d: &mut Director<'_>) -> CastResult<()> {
        (self.script)(d)
    }
}

const fn scene(
    name: &'static str,
    summary: &'static str,
    script: fn(&mut Director<'_>) -> CastResult<()>,
) -> ScriptScene {
    ScriptScene {
        name,
        summary,
        script,
    }
}

const SCENES: &[ScriptScene] = &[
    scene(
        "interpreter-title",
        "Title card of the interpreter video",
        interpreter::title,
    ),
    scene(
        "interpreter-intro",
        "The factorial program the video builds up to",
        interpreter::intro,
    ),
    scene(
        "interpreter-constants",
        "Constants evaluate to themselves",
        interpreter::constants,
    ),
    scene(
        "interpreter-operations",
        "Evaluating binary operations, and where they go wrong",
        interpreter::operations,
    ),
    scene(
        "interpreter-call-stack",
        "Step by step reduction of eval(2 * 3 + 10 / 2) on a call stack",
        interpreter::call_stack,
    ),
    scene(
        "typing-intro",
        "Tour of the typed expression language",
        typing::intro,
    ),
    scene(
        "typing-expression-grammar",
        "Grammar of expressions",
        typing::expression_grammar,
    ),
    scene("typing-type-grammar", "Grammar of types", typing::type_grammar),
    scene("typing-rules", "The typing rules, one at a time", typing::rules),
    scene(
        "typing-let-derivation",
        "Typing derivation of let x = 1 in x",
        typing::let_derivation,
    ),
    scene(
        "polynomial-intro",
        "Solving a quadratic three ways, then higher degrees",
        polynomial::intro,
    ),
];

/// Every shipped scene, in presentation order.
pub fn all() -> impl Iterator<Item = &'static dyn Scene> {
    SCENES.iter().map(|s| s as &dyn Scene)
}

/// Scene called `name`.
pub fn find(name: &str) -> CastResult<&'static dyn Scene> {
    all().find(|s| s.name() == name).ok_or_else(|| {
        let known: Vec<_> = all().map(|s| s.name()).collect();
        CastError::validation(format!(
            "unknown scene '{name}' (known: {})",
            known.join(", ")
        ))
    })
}

/// Record `scene` with `config` and validate the result.
#[tracing::instrument(skip(scene, config), fields(name = scene.name()))]
pub fn record(scene: &dyn Scene, config: &CastConfig) -> CastResult<Timeline> {
    config.validate()?;
    let mut rec = TimelineRecorder::new(
        scene.name(),
        config.fps,
        config.canvas(),
        config.background,
        config.monospace.clone(),
    );
    {
        let mut d = Director::new(&mut rec, config);
        scene.construct(&mut d)?;
    }
    let timeline = rec.finish();
    timeline.validate()?;
    tracing::debug!(
        frames = timeline.total_frames(),
        objects = timeline.objects.len(),
        "recorded"
    );
    Ok(timeline)
}

/// A grammar as a three column table: nonterminal, production, comment.
pub(crate) fn grammar(
    d: &Director<'_>,
    rows: &[(&str, &str, &str)],
    scale: f64,
) -> CastResult<Vec<Visual>> {
    let cells = rows
        .iter()
        .map(|(lhs, rhs, note)| {
            [lhs, rhs, note]
                .into_iter()
                .map(|tex| -> CastResult<Visual> { Ok(d.math(tex)?.scaled(scale)) })
                .collect::<CastResult<Vec<_>>>()
        })
        .collect::<CastResult<Vec<_>>>()?;
    let unit = d.unit() * scale;
    Ok(table(
        cells,
        &[ColumnAlign::Right, ColumnAlign::Left, ColumnAlign::Left],
        0.3 * unit,
        0.1 * unit,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/scenes/registry.rs"]
mod tests;
