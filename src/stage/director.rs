use anyhow::Context as _;

use crate::{
    choreo::{Step, StepOptions, run_steps},
    config::CastConfig,
    foundation::{
        color::Color,
        core::Canvas,
        error::{CastError, CastResult},
        platform::asset_path,
    },
    formula::{
        Formula, Token, TokenLine,
        eval_of::{EvalWrapper, Fragment, FormulaContext},
    },
    layout::{Rule, Visual, metrics::FontFamily},
    stage::{Animation, ObjectId, Stage},
};

/// Canvas height image pixel sizes are authored against.
const IMAGE_REFERENCE_HEIGHT_PX: f64 = 1080.0;

/// Authoring front end handed to scenes: builds visuals at the configured sizes, owns the scene's
/// formula context and forwards choreography to the stage.
pub struct Director<'a> {
    stage: &'a mut dyn Stage,
    config: &'a CastConfig,
    formulas: FormulaContext,
}

impl<'a> Director<'a> {
    /// Director over `stage` with a fresh formula context.
    pub fn new(stage: &'a mut dyn Stage, config: &'a CastConfig) -> Self {
        Self {
            stage,
            config,
            formulas: FormulaContext::default(),
        }
    }

    /// Active settings.
    pub fn config(&self) -> &CastConfig {
        self.config
    }

    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        self.stage.canvas()
    }

    /// One scene unit in pixels.
    pub fn unit(&self) -> f64 {
        self.canvas().unit_px()
    }

    /// Formula font size for this canvas.
    pub fn formula_px(&self) -> f64 {
        self.config.font_px(self.config.formula_px)
    }

    /// The scene's formula context.
    pub fn formulas(&mut self) -> &mut FormulaContext {
        &mut self.formulas
    }

    /// See [`FormulaContext::eval_of`].
    pub fn eval_of<I, F>(&mut self, fragments: I) -> EvalWrapper
    where
        I: IntoIterator<Item = F>,
        F: Into<Fragment>,
    {
        self.formulas.eval_of(fragments)
    }

    /// See [`FormulaContext::refresh`].
    pub fn refresh(&mut self, wrapper: &EvalWrapper) -> EvalWrapper {
        self.formulas.refresh(wrapper)
    }

    /// Single-part white formula.
    pub fn math(&self, tex: &str) -> CastResult<Visual> {
        Ok(Visual::formula(Formula::single(tex)?, self.formula_px()))
    }

    /// Multi-part white formula.
    pub fn math_parts(&self, parts: &[&str]) -> CastResult<Visual> {
        Ok(Visual::formula(
            Formula::new(parts.iter().copied())?,
            self.formula_px(),
        ))
    }

    /// Formula of an already built [`Formula`].
    pub fn formula(&self, formula: Formula) -> Visual {
        Visual::formula(formula, self.formula_px())
    }

    /// Labeled-fragment formula.
    pub fn eval_tex(&self, tokens: &[Token]) -> CastResult<Visual> {
        Ok(self.formula(self.formulas.eval_tex(tokens)?))
    }

    /// Labeled-fragment formula from a token line.
    pub fn line(&self, line: TokenLine) -> CastResult<Visual> {
        Ok(self.formula(line.build(&self.formulas)?))
    }

    /// White proportional text at an authored size.
    pub fn text(&self, text: &str, size: f64) -> Visual {
        Visual::text(text, self.config.font_px(size), FontFamily::Sans, Color::WHITE)
    }

    /// White monospace text at an authored size.
    pub fn code(&self, text: &str, size: f64) -> Visual {
        Visual::text(text, self.config.font_px(size), FontFamily::Mono, Color::WHITE)
    }

    /// Inference rule at the formula size times `scale`.
    pub fn rule(&self, rule: Rule, scale: f64) -> Visual {
        Visual::rule(rule, self.formula_px()).scaled(scale)
    }

    /// Raster image at its natural size (pixels of a 1080 px tall canvas) times `scale`.
    pub fn image(&self, source: &str, scale: f64) -> CastResult<Visual> {
        let path = asset_path(&self.config.assets, source)?;
        let (w, h) = image::image_dimensions(&path)
            .with_context(|| format!("probe image '{}'", path.display()))?;
        let k = f64::from(self.canvas().height) / IMAGE_REFERENCE_HEIGHT_PX * scale;
        Ok(Visual::image(source, f64::from(w) * k, f64::from(h) * k))
    }

    /// Register a visual without showing it.
    pub fn insert(&mut self, visual: Visual) -> ObjectId {
        self.stage.insert(visual)
    }

    /// Copy of the visual registered under `id`.
    pub fn visual(&self, id: ObjectId) -> CastResult<Visual> {
        self.stage
            .visual(id)
            .cloned()
            .ok_or_else(|| CastError::choreography(format!("unknown object {}", id.0)))
    }

    /// Show instantly.
    pub fn add(&mut self, id: ObjectId) -> CastResult<()> {
        self.stage.add(id)
    }

    /// Hide instantly.
    pub fn remove(&mut self, id: ObjectId) -> CastResult<()> {
        self.stage.remove(id)
    }

    /// Play with default run times.
    pub fn play(&mut self, animations: Vec<Animation>) -> CastResult<()> {
        self.stage.play(animations, None)
    }

    /// Hold for `secs` seconds.
    pub fn wait(&mut self, secs: f64) -> CastResult<()> {
        self.stage.wait(secs)
    }

    /// Hold for the configured step wait.
    pub fn hold(&mut self) -> CastResult<()> {
        self.stage.wait(self.config.wait_secs)
    }

    /// Register and write in one or more visuals together.
    pub fn write(&mut self, visuals: Vec<Visual>) -> CastResult<Vec<ObjectId>> {
        let ids: Vec<ObjectId> = visuals.into_iter().map(|v| self.insert(v)).collect();
        self.play(ids.iter().map(|&id| Animation::Write { id }).collect())?;
        Ok(ids)
    }

    /// Register and write in one visual.
    pub fn write_one(&mut self, visual: Visual) -> CastResult<ObjectId> {
        let id = self.insert(visual);
        self.play(vec![Animation::Write { id }])?;
        Ok(id)
    }

    /// Unwrite shown objects together.
    pub fn unwrite(&mut self, ids: &[ObjectId]) -> CastResult<()> {
        self.play(ids.iter().map(|&id| Animation::Unwrite { id }).collect())
    }

    /// Register and fade in one visual.
    pub fn fade_in(&mut self, visual: Visual) -> CastResult<ObjectId> {
        let id = self.insert(visual);
        self.play(vec![Animation::FadeIn { id }])?;
        Ok(id)
    }

    /// Content-aware morph of `from` into a new visual.
    pub fn morph(&mut self, from: ObjectId, to: Visual) -> CastResult<ObjectId> {
        let to = self.insert(to);
        self.play(vec![Animation::TransformMatching { from, to }])?;
        Ok(to)
    }

    /// Run a list of reduction steps. See [`run_steps`].
    pub fn steps(
        &mut self,
        steps: Vec<Step<Visual>>,
        opts: StepOptions,
    ) -> CastResult<Vec<ObjectId>> {
        run_steps(&mut *self.stage, steps, opts)
    }
}
