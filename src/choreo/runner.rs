use crate::{
    choreo::steps::{CallStack, Row, RowOp, Step},
    foundation::{core::Canvas, error::CastResult},
    layout::{Direction, EDGE_BUFF_UNITS, Visual},
    stage::{Animation, ObjectId, Stage},
};

/// Knobs of [`run_steps`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOptions {
    /// Hold after every animated step. Zero disables holds.
    pub wait_secs: f64,
    /// Leave the final rows on screen instead of unwriting them.
    pub keep_last: bool,
}

impl Default for StepOptions {
    fn default() -> Self {
        Self {
            wait_secs: 1.0,
            keep_last: false,
        }
    }
}

/// Place a row's visual: against the top edge, then `row` units down.
pub fn place_row(visual: Visual, canvas: Canvas, row: usize) -> Visual {
    let unit = canvas.unit_px();
    visual
        .to_edge(canvas, Direction::Up, EDGE_BUFF_UNITS * unit)
        .shift(Direction::Down.unit() * (row as f64 * unit))
}

/// Play a list of reduction steps against `stage` and return the ids of the final rows.
///
/// Each step's animated operations play together and are followed by a hold; instant steps
/// swap rows without holding.
#[tracing::instrument(skip(stage, steps), fields(steps = steps.len()))]
pub fn run_steps(
    stage: &mut dyn Stage,
    steps: Vec<Step<Visual>>,
    opts: StepOptions,
) -> CastResult<Vec<ObjectId>> {
    let canvas = stage.canvas();
    let mut stack = CallStack::<ObjectId>::new();

    for (n, step) in steps.into_iter().enumerate() {
        stack.check(&step)?;
        let mut rows = Vec::with_capacity(step.rows.len());
        for (i, row) in step.rows.into_iter().enumerate() {
            rows.push(match row {
                Row::Concrete(v) => Row::Concrete(stage.insert(place_row(v, canvas, i))),
                Row::Unchanged => Row::Unchanged,
                Row::Removed => Row::Removed,
            });
        }
        let ops = stack.apply(Step {
            rows,
            transform: step.transform,
        })?;
        tracing::debug!(step = n, ops = ops.len(), transform = step.transform, "step");

        let mut animations = Vec::new();
        for op in ops {
            match op {
                RowOp::Appear { object, .. } => animations.push(Animation::Write { id: object }),
                RowOp::Disappear { object, .. } => {
                    animations.push(Animation::Unwrite { id: object })
                }
                RowOp::Morph { from, to, .. } => {
                    animations.push(Animation::TransformMatching { from, to })
                }
                RowOp::Cut { from, to, .. } => {
                    if let Some(from) = from {
                        stage.remove(from)?;
                    }
                    if let Some(to) = to {
                        stage.add(to)?;
                    }
                }
            }
        }
        if !animations.is_empty() {
            stage.play(animations, None)?;
            if opts.wait_secs > 0.0 {
                stage.wait(opts.wait_secs)?;
            }
        }
    }

    let last: Vec<ObjectId> = stack.rows().iter().flatten().copied().collect();
    if !opts.keep_last {
        let unwrites: Vec<Animation> = stack
            .teardown()
            .into_iter()
            .filter_map(|op| match op {
                RowOp::Disappear { object, .. } => Some(Animation::Unwrite { id: object }),
                _ => None,
            })
            .collect();
        if !unwrites.is_empty() {
            stage.play(unwrites, None)?;
        }
    }
    Ok(last)
}

#[cfg(test)]
#[path = "../../tests/unit/choreo/runner.rs"]
mod tests;
