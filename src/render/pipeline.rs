use crate::{
    assets::AssetStore,
    encode::{FrameSink, SinkConfig},
    eval::{FrameScene, evaluate},
    foundation::{
        core::{FrameIndex, FrameRange},
        error::{CastError, CastResult},
        math::Fnv1a64,
    },
    render::{CpuRenderer, FrameRGBA},
    stage::Timeline,
};

/// Evaluate and render a single frame.
///
/// Returns **premultiplied** RGBA8 pixels.
pub fn render_frame(
    timeline: &Timeline,
    frame: FrameIndex,
    renderer: &mut CpuRenderer,
    assets: &AssetStore,
) -> CastResult<FrameRGBA> {
    let scene = evaluate(timeline, frame)?;
    renderer.render(&scene, assets)
}

#[derive(Clone, Debug)]
/// Options for [`render_range`].
pub struct RenderOpts {
    /// Reuse the previous frame's pixels when the evaluated frame did not change.
    pub static_frame_elision: bool,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            static_frame_elision: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Frame counts from a [`render_range`] call.
pub struct RenderStats {
    /// Frames pushed to the sink.
    pub frames_total: u64,
    /// Frames actually rasterized.
    pub frames_rendered: u64,
    /// Frames reused from the previous one.
    pub frames_elided: u64,
}

/// Render `range` (start inclusive, end exclusive) into `sink`, in frame order.
///
/// Holds dominate explainer scenes, so unchanged frames are detected by fingerprinting the
/// evaluated draw list and are not rasterized again.
#[tracing::instrument(skip_all, fields(scene = %timeline.scene, start = range.start.0, end = range.end.0))]
pub fn render_range(
    timeline: &Timeline,
    range: FrameRange,
    renderer: &mut CpuRenderer,
    assets: &AssetStore,
    sink: &mut dyn FrameSink,
    opts: &RenderOpts,
) -> CastResult<RenderStats> {
    if range.is_empty() {
        return Err(CastError::validation("render range must be non-empty"));
    }
    if range.end.0 > timeline.total_frames() {
        return Err(CastError::validation(format!(
            "render range ends at frame {} but the scene has {} frames",
            range.end.0,
            timeline.total_frames()
        )));
    }

    sink.begin(SinkConfig {
        width: timeline.canvas.width,
        height: timeline.canvas.height,
        fps: timeline.fps,
    })?;

    let mut stats = RenderStats::default();
    let mut last: Option<(u64, FrameRGBA)> = None;
    for f in range.start.0..range.end.0 {
        let idx = FrameIndex(f);
        let scene = evaluate(timeline, idx)?;
        let print = fingerprint(&scene)?;

        let frame = match last.take() {
            Some((prev, pixels)) if opts.static_frame_elision && prev == print => {
                stats.frames_elided += 1;
                pixels
            }
            _ => {
                stats.frames_rendered += 1;
                renderer.render(&scene, assets)?
            }
        };
        sink.push_frame(idx, &frame)?;
        stats.frames_total += 1;
        last = Some((print, frame));
    }
    sink.end()?;

    tracing::info!(
        total = stats.frames_total,
        rendered = stats.frames_rendered,
        elided = stats.frames_elided,
        "rendered range"
    );
    Ok(stats)
}

/// FNV-1a over everything that affects pixels (the frame index does not).
fn fingerprint(scene: &FrameScene) -> CastResult<u64> {
    let bytes = serde_json::to_vec(&(&scene.canvas, &scene.background, &scene.items))
        .map_err(|e| CastError::serde(e.to_string()))?;
    let mut h = Fnv1a64::new_default();
    h.write_bytes(&bytes);
    Ok(h.finish())
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
