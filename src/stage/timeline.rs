use crate::{
    foundation::{
        color::Color,
        core::{Canvas, Fps, FrameIndex, FrameRange},
        error::{CastError, CastResult},
    },
    layout::Visual,
    stage::{Animation, ObjectId, Screen, Stage},
};

/// One recorded stage call, timestamped in seconds from the start of the scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// Instant show.
    Add {
        /// Time of the call.
        at: f64,
        /// Object shown.
        id: ObjectId,
    },
    /// Instant hide.
    Remove {
        /// Time of the call.
        at: f64,
        /// Object hidden.
        id: ObjectId,
    },
    /// Animations played together.
    Play {
        /// Start time.
        start: f64,
        /// Duration, always positive.
        run_time: f64,
        /// Animations, all spanning the whole play.
        animations: Vec<Animation>,
    },
    /// Hold.
    Wait {
        /// Start time.
        start: f64,
        /// Duration.
        secs: f64,
    },
}

impl Event {
    /// Time the event begins.
    pub fn start(&self) -> f64 {
        match *self {
            Self::Add { at, .. } | Self::Remove { at, .. } => at,
            Self::Play { start, .. } | Self::Wait { start, .. } => start,
        }
    }

    /// Time the event ends.
    pub fn end(&self) -> f64 {
        match *self {
            Self::Add { at, .. } | Self::Remove { at, .. } => at,
            Self::Play {
                start, run_time, ..
            } => start + run_time,
            Self::Wait { start, secs } => start + secs,
        }
    }
}

/// A recorded scene: every visual it registered and every stage call it made.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    /// Scene name.
    pub scene: String,
    /// Output frame rate.
    pub fps: Fps,
    /// Output canvas.
    pub canvas: Canvas,
    /// Background fill.
    pub background: Color,
    /// Font family used for monospace runs.
    pub monospace: String,
    /// Registered visuals, indexed by [`ObjectId`].
    pub objects: Vec<Visual>,
    /// Stage calls in order.
    pub events: Vec<Event>,
}

impl Timeline {
    /// Length of the scene in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.events.iter().map(Event::end).fold(0.0, f64::max)
    }

    /// Number of frames needed to show the whole scene (at least one).
    pub fn total_frames(&self) -> u64 {
        self.fps
            .secs_to_frames_ceil(self.duration_secs())
            .max(1)
    }

    /// `[0, total_frames)`.
    pub fn frame_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.total_frames()),
        }
    }

    /// Visual registered under `id`.
    pub fn object(&self, id: ObjectId) -> CastResult<&Visual> {
        self.objects.get(id.index()).ok_or_else(|| {
            CastError::validation(format!("timeline references unknown object {}", id.0))
        })
    }

    /// Check output settings, object references, event ordering and choreography.
    pub fn validate(&self) -> CastResult<()> {
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(CastError::validation("fps must have num>0 and den>0"));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(CastError::validation("canvas width/height must be > 0"));
        }

        let mut screen = Screen::new();
        let mut cursor = 0.0f64;
        for (idx, ev) in self.events.iter().enumerate() {
            let start = ev.start();
            if !start.is_finite() || start < 0.0 || start + 1e-9 < cursor {
                return Err(CastError::validation(format!(
                    "event {idx} starts at {start}s, before the previous event ended ({cursor}s)"
                )));
            }
            match ev {
                Event::Add { id, .. } => {
                    self.object(*id)?;
                    screen.add(*id)?;
                }
                Event::Remove { id, .. } => {
                    self.object(*id)?;
                    screen.remove(*id)?;
                }
                Event::Play {
                    run_time,
                    animations,
                    ..
                } => {
                    if !run_time.is_finite() || *run_time <= 0.0 {
                        return Err(CastError::validation(format!(
                            "event {idx} has run time {run_time}, must be > 0"
                        )));
                    }
                    if animations.is_empty() {
                        return Err(CastError::validation(format!(
                            "event {idx} plays no animations"
                        )));
                    }
                    for id in animations.iter().flat_map(Animation::objects) {
                        self.object(id)?;
                    }
                    screen.apply(animations)?;
                }
                Event::Wait { secs, .. } => {
                    if !secs.is_finite() || *secs < 0.0 {
                        return Err(CastError::validation(format!(
                            "event {idx} waits {secs}s, must be >= 0"
                        )));
                    }
                }
            }
            cursor = ev.end();
        }
        Ok(())
    }

    /// Parse and validate a timeline.
    pub fn from_json(s: &str) -> CastResult<Self> {
        let t: Self = serde_json::from_str(s)?;
        t.validate()?;
        Ok(t)
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> CastResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A [`Stage`] that validates every call and records it into a [`Timeline`].
#[derive(Debug)]
pub struct TimelineRecorder {
    timeline: Timeline,
    screen: Screen,
    cursor: f64,
}

impl TimelineRecorder {
    /// Start recording `scene`.
    pub fn new(
        scene: impl Into<String>,
        fps: Fps,
        canvas: Canvas,
        background: Color,
        monospace: impl Into<String>,
    ) -> Self {
        Self {
            timeline: Timeline {
                scene: scene.into(),
                fps,
                canvas,
                background,
                monospace: monospace.into(),
                objects: Vec::new(),
                events: Vec::new(),
            },
            screen: Screen::new(),
            cursor: 0.0,
        }
    }

    /// Current time in seconds.
    pub fn now(&self) -> f64 {
        self.cursor
    }

    /// Objects shown at the current time.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Stop recording.
    pub fn finish(self) -> Timeline {
        tracing::debug!(
            scene = %self.timeline.scene,
            objects = self.timeline.objects.len(),
            events = self.timeline.events.len(),
            duration_secs = self.cursor,
            "recorded scene"
        );
        self.timeline
    }

    fn check_id(&self, id: ObjectId) -> CastResult<()> {
        if id.index() < self.timeline.objects.len() {
            Ok(())
        } else {
            Err(CastError::choreography(format!("unknown object {}", id.0)))
        }
    }
}

impl Stage for TimelineRecorder {
    fn canvas(&self) -> Canvas {
        self.timeline.canvas
    }

    fn insert(&mut self, visual: Visual) -> ObjectId {
        let id = ObjectId(self.timeline.objects.len() as u32);
        self.timeline.objects.push(visual);
        id
    }

    fn visual(&self, id: ObjectId) -> Option<&Visual> {
        self.timeline.objects.get(id.index())
    }

    fn is_on_screen(&self, id: ObjectId) -> bool {
        self.screen.contains(id)
    }

    fn add(&mut self, id: ObjectId) -> CastResult<()> {
        self.check_id(id)?;
        self.screen.add(id)?;
        self.timeline.events.push(Event::Add {
            at: self.cursor,
            id,
        });
        Ok(())
    }

    fn remove(&mut self, id: ObjectId) -> CastResult<()> {
        self.check_id(id)?;
        self.screen.remove(id)?;
        self.timeline.events.push(Event::Remove {
            at: self.cursor,
            id,
        });
        Ok(())
    }

    fn play(&mut self, animations: Vec<Animation>, run_time: Option<f64>) -> CastResult<()> {
        if animations.is_empty() {
            return Err(CastError::choreography("play needs at least one animation"));
        }
        for id in animations.iter().flat_map(Animation::objects) {
            self.check_id(id)?;
        }
        let run_time = match run_time {
            Some(t) if t.is_finite() && t > 0.0 => t,
            Some(t) => {
                return Err(CastError::choreography(format!(
                    "run time must be > 0, got {t}"
                )));
            }
            None => animations
                .iter()
                .map(|a| {
                    let primary = a.objects()[0];
                    a.default_run_time(&self.timeline.objects[primary.index()])
                })
                .fold(0.0, f64::max),
        };
        self.screen.apply(&animations)?;
        tracing::debug!(
            start = self.cursor,
            run_time,
            animations = animations.len(),
            "play"
        );
        self.timeline.events.push(Event::Play {
            start: self.cursor,
            run_time,
            animations,
        });
        self.cursor += run_time;
        Ok(())
    }

    fn wait(&mut self, secs: f64) -> CastResult<()> {
        if !secs.is_finite() || secs < 0.0 {
            return Err(CastError::choreography(format!(
                "wait must be >= 0 seconds, got {secs}"
            )));
        }
        if secs == 0.0 {
            return Ok(());
        }
        self.timeline.events.push(Event::Wait {
            start: self.cursor,
            secs,
        });
        self.cursor += secs;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/timeline.rs"]
mod tests;
