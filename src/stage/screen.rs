use std::collections::BTreeMap;

use crate::{
    foundation::{
        color::Color,
        error::{CastError, CastResult},
    },
    stage::{Animation, ObjectId},
};

/// Objects currently shown, in draw order, plus per-object color overrides.
///
/// Shared by the recorder (to reject invalid choreography) and the frame evaluator (to replay it).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Screen {
    on: Vec<ObjectId>,
    colors: BTreeMap<ObjectId, Color>,
}

impl Screen {
    /// Empty screen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is shown.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.on.contains(&id)
    }

    /// Shown objects, first drawn first.
    pub fn on_screen(&self) -> &[ObjectId] {
        &self.on
    }

    /// Color set by a completed recolor, if any.
    pub fn color_override(&self, id: ObjectId) -> Option<Color> {
        self.colors.get(&id).copied()
    }

    /// Show `id` on top of everything else.
    pub fn add(&mut self, id: ObjectId) -> CastResult<()> {
        if self.contains(id) {
            return Err(CastError::choreography(format!(
                "object {} is already on screen",
                id.0
            )));
        }
        self.on.push(id);
        Ok(())
    }

    /// Hide `id`.
    pub fn remove(&mut self, id: ObjectId) -> CastResult<()> {
        let Some(pos) = self.on.iter().position(|&o| o == id) else {
            return Err(CastError::choreography(format!(
                "object {} is not on screen",
                id.0
            )));
        };
        self.on.remove(pos);
        Ok(())
    }

    /// Apply the end state of one play. Either every animation applies or the screen is left
    /// untouched.
    pub fn apply(&mut self, animations: &[Animation]) -> CastResult<()> {
        let mut next = self.clone();
        for anim in animations {
            next.apply_one(anim)?;
        }
        *self = next;
        Ok(())
    }

    fn apply_one(&mut self, anim: &Animation) -> CastResult<()> {
        match *anim {
            Animation::Write { id } | Animation::FadeIn { id } => self.add(id),
            Animation::Unwrite { id } | Animation::FadeOut { id } => self.remove(id),
            Animation::TransformMatching { from, to } | Animation::Transform { from, to } => {
                if from == to {
                    return Err(CastError::choreography(format!(
                        "object {} cannot morph into itself",
                        from.0
                    )));
                }
                self.remove(from)?;
                self.add(to)
            }
            Animation::Recolor { id, color } => {
                self.require(id)?;
                self.colors.insert(id, color);
                Ok(())
            }
            Animation::Wiggle { id } => self.require(id),
        }
    }

    fn require(&self, id: ObjectId) -> CastResult<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(CastError::choreography(format!(
                "object {} is not on screen",
                id.0
            )))
        }
    }
}
