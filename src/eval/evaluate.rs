use std::collections::BTreeMap;

use crate::{
    animation::ease::Ease,
    choreo::match_parts,
    eval::scene::{DrawItem, FrameScene},
    foundation::{
        color::Color,
        core::{FrameIndex, Point, Rect, Vec2},
        error::{CastError, CastResult},
    },
    layout::{Primitive, PrimitiveKind, Visual},
    stage::{Animation, Event, ObjectId, Screen, Timeline},
};

/// Peak extra scale of a wiggle.
const WIGGLE_SCALE: f64 = 0.1;
/// Sideways shakes per wiggle.
const WIGGLE_SHAKES: f64 = 3.0;

/// Evaluate `frame` of `timeline` into a flat draw list.
///
/// Events that ended at or before the frame time are applied in full. A play still running at the
/// frame time is drawn at its eased progress.
#[tracing::instrument(skip(timeline), fields(scene = %timeline.scene))]
pub fn evaluate(timeline: &Timeline, frame: FrameIndex) -> CastResult<FrameScene> {
    let total = timeline.total_frames();
    if frame.0 >= total {
        return Err(CastError::evaluation(format!(
            "frame {} is out of bounds (scene has {total} frames)",
            frame.0
        )));
    }
    let t = timeline.fps.frames_to_secs(frame.0);

    let mut screen = Screen::new();
    let mut active: Option<(&[Animation], f64)> = None;
    for ev in &timeline.events {
        if ev.start() > t {
            break;
        }
        match ev {
            Event::Add { id, .. } => screen.add(*id).map_err(replay_error)?,
            Event::Remove { id, .. } => screen.remove(*id).map_err(replay_error)?,
            Event::Play {
                start,
                run_time,
                animations,
            } => {
                if ev.end() <= t {
                    screen.apply(animations).map_err(replay_error)?;
                } else {
                    active = Some((animations.as_slice(), (t - start) / run_time));
                    break;
                }
            }
            Event::Wait { .. } => {}
        }
    }

    let mut painter = Painter {
        timeline,
        screen: &screen,
        origin: timeline.canvas.center().to_vec2(),
        items: Vec::new(),
    };
    match active {
        None => {
            for &id in screen.on_screen() {
                painter.draw(id, &Pose::default())?;
            }
        }
        Some((animations, progress)) => painter.draw_play(animations, progress)?,
    }

    let items = painter
        .items
        .into_iter()
        .filter(|i| i.opacity() > 0.0)
        .collect();
    Ok(FrameScene {
        frame,
        canvas: timeline.canvas,
        background: timeline.background,
        monospace: timeline.monospace.clone(),
        items,
    })
}

fn replay_error(e: CastError) -> CastError {
    CastError::evaluation(format!("timeline does not replay: {e}"))
}

/// Per-object modifiers of the running play.
#[derive(Clone, Debug)]
struct Pose {
    /// Fraction of glyphs shown.
    reveal: f64,
    opacity: f64,
    scale: f64,
    shift: Vec2,
    /// Target color and eased progress towards it.
    recolor: Option<(Color, f64)>,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            reveal: 1.0,
            opacity: 1.0,
            scale: 1.0,
            shift: Vec2::ZERO,
            recolor: None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum MorphKind {
    Matching,
    Whole,
}

struct Painter<'a> {
    timeline: &'a Timeline,
    screen: &'a Screen,
    origin: Vec2,
    items: Vec<DrawItem>,
}

impl Painter<'_> {
    fn draw_play(&mut self, animations: &[Animation], progress: f64) -> CastResult<()> {
        let e = Ease::Smooth.apply(progress);
        let mut poses: BTreeMap<ObjectId, Pose> = BTreeMap::new();
        let mut morphs: Vec<(ObjectId, ObjectId, MorphKind)> = Vec::new();
        let mut entering: Vec<ObjectId> = Vec::new();

        for anim in animations {
            match *anim {
                Animation::Write { id } => {
                    poses.entry(id).or_default().reveal = e;
                    entering.push(id);
                }
                Animation::Unwrite { id } => poses.entry(id).or_default().reveal = 1.0 - e,
                Animation::FadeIn { id } => {
                    poses.entry(id).or_default().opacity *= e;
                    entering.push(id);
                }
                Animation::FadeOut { id } => poses.entry(id).or_default().opacity *= 1.0 - e,
                Animation::Recolor { id, color } => {
                    poses.entry(id).or_default().recolor = Some((color, e));
                }
                Animation::Wiggle { id } => {
                    let swing = Ease::ThereAndBack.apply(progress);
                    let pose = poses.entry(id).or_default();
                    pose.scale *= 1.0 + WIGGLE_SCALE * swing;
                    let jitter = (progress * WIGGLE_SHAKES * std::f64::consts::TAU).sin();
                    pose.shift.x += jitter * swing * 0.05 * self.timeline.canvas.unit_px();
                }
                Animation::TransformMatching { from, to } => {
                    morphs.push((from, to, MorphKind::Matching))
                }
                Animation::Transform { from, to } => morphs.push((from, to, MorphKind::Whole)),
            }
        }

        let screen = self.screen;
        for &id in screen.on_screen() {
            if let Some(&(from, to, kind)) = morphs.iter().find(|m| m.0 == id) {
                self.draw_morph(from, to, kind, e)?;
            } else {
                let pose = poses.get(&id).cloned().unwrap_or_default();
                self.draw(id, &pose)?;
            }
        }
        for id in entering {
            if !screen.contains(id) {
                let pose = poses.get(&id).cloned().unwrap_or_default();
                self.draw(id, &pose)?;
            }
        }
        Ok(())
    }

    /// Absolute items of `id` under `pose`, before any reveal.
    fn items_of(&self, id: ObjectId, pose: &Pose) -> CastResult<Vec<(usize, DrawItem)>> {
        let visual = self.timeline.object(id)?;
        let base = self.screen.color_override(id);
        let center = visual.center + self.origin + pose.shift;
        Ok(visual
            .primitives()
            .iter()
            .map(|p| {
                let mut item = place(p, center, pose.scale, base);
                if let Some((target, k)) = pose.recolor {
                    recolor(&mut item, target, k);
                }
                (p.glyphs(), item.with_opacity(pose.opacity))
            })
            .collect())
    }

    fn draw(&mut self, id: ObjectId, pose: &Pose) -> CastResult<()> {
        let items = self.items_of(id, pose)?;
        let total: usize = items.iter().map(|(g, _)| *g).sum();
        let mut budget = pose.reveal.clamp(0.0, 1.0) * total as f64;
        for (glyphs, item) in items {
            if glyphs == 0 {
                continue;
            }
            let take = budget.min(glyphs as f64);
            budget -= take;
            if let Some(item) = reveal(item, take / glyphs as f64, glyphs) {
                self.items.push(item);
            }
        }
        Ok(())
    }

    fn draw_morph(
        &mut self,
        from: ObjectId,
        to: ObjectId,
        kind: MorphKind,
        e: f64,
    ) -> CastResult<()> {
        let timeline = self.timeline;
        let a = timeline.object(from)?;
        let b = timeline.object(to)?;
        match kind {
            MorphKind::Whole => {
                let d = b.center - a.center;
                let leaving = Pose {
                    shift: d * e,
                    opacity: 1.0 - e,
                    ..Pose::default()
                };
                let arriving = Pose {
                    shift: -d * (1.0 - e),
                    opacity: e,
                    ..Pose::default()
                };
                self.draw(from, &leaving)?;
                self.draw(to, &arriving)?;
            }
            MorphKind::Matching => {
                let from_items = self.items_of(from, &Pose::default())?;
                let to_items = self.items_of(to, &Pose::default())?;
                let m = match_parts(&keys(a), &keys(b));
                for &(i, j) in &m.pairs {
                    let (x, y) = (&from_items[i].1, &to_items[j].1);
                    match x.lerp(y, e) {
                        Some(item) => self.items.push(item),
                        None => {
                            self.items.push(x.clone().with_opacity(1.0 - e));
                            self.items.push(y.clone().with_opacity(e));
                        }
                    }
                }
                for &i in &m.fade_out {
                    self.items.push(from_items[i].1.clone().with_opacity(1.0 - e));
                }
                for &j in &m.fade_in {
                    self.items.push(to_items[j].1.clone().with_opacity(e));
                }
            }
        }
        Ok(())
    }
}

fn keys(v: &Visual) -> Vec<String> {
    v.primitives().into_iter().map(|p| p.key).collect()
}

/// Place a primitive of a visual centered at `center`.
fn place(p: &Primitive, center: Point, scale: f64, color: Option<Color>) -> DrawItem {
    let at = |v: Vec2| center + v * scale;
    match &p.kind {
        PrimitiveKind::Run {
            text,
            font_px,
            family,
            color: own,
        } => DrawItem::Text {
            text: text.clone(),
            origin: at(p.offset),
            font_px: font_px * scale,
            family: *family,
            color: color.unwrap_or(*own),
            opacity: 1.0,
        },
        PrimitiveKind::Stroke {
            to,
            width,
            color: own,
            head,
        } => DrawItem::Stroke {
            from: at(p.offset),
            to: at(*to),
            width: width * scale,
            color: color.unwrap_or(*own),
            opacity: 1.0,
            head: *head,
        },
        PrimitiveKind::Image {
            source,
            width,
            height,
        } => {
            let o = at(p.offset);
            DrawItem::Image {
                source: source.clone(),
                rect: Rect::new(o.x, o.y, o.x + width * scale, o.y + height * scale),
                opacity: 1.0,
            }
        }
    }
}

fn recolor(item: &mut DrawItem, target: Color, k: f64) {
    match item {
        DrawItem::Text { color, .. } | DrawItem::Stroke { color, .. } => {
            *color = color.lerp(target, k);
        }
        DrawItem::Image { .. } => {}
    }
}

/// Show the first `fraction` of an item holding `glyphs` glyphs. `None` when nothing shows.
fn reveal(item: DrawItem, fraction: f64, glyphs: usize) -> Option<DrawItem> {
    if fraction <= 0.0 {
        return None;
    }
    if fraction >= 1.0 {
        return Some(item);
    }
    match item {
        DrawItem::Text {
            text,
            origin,
            font_px,
            family,
            color,
            opacity,
        } => {
            let shown = (fraction * glyphs as f64).floor() as usize;
            if shown == 0 {
                return None;
            }
            let mut seen = 0;
            let mut end = text.len();
            for (idx, c) in text.char_indices() {
                if !c.is_whitespace() {
                    if seen == shown {
                        end = idx;
                        break;
                    }
                    seen += 1;
                }
            }
            Some(DrawItem::Text {
                text: text[..end].to_owned(),
                origin,
                font_px,
                family,
                color,
                opacity,
            })
        }
        DrawItem::Stroke {
            from,
            to,
            width,
            color,
            opacity,
            head,
        } => Some(DrawItem::Stroke {
            from,
            to: from.lerp(to, fraction),
            width,
            color,
            opacity,
            head,
        }),
        img @ DrawItem::Image { .. } => Some(img.with_opacity(fraction)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluate.rs"]
mod tests;
