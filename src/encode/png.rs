use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    encode::{FrameSink, SinkConfig, ensure_parent_dir},
    foundation::{
        core::FrameIndex,
        error::{CastError, CastResult},
    },
    render::FrameRGBA,
};

/// Write one frame as a straight-alpha PNG.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> CastResult<()> {
    ensure_parent_dir(path)?;
    image::save_buffer(
        path,
        &frame.to_straight_alpha(),
        frame.width,
        frame.height,
        image::ExtendedColorType::Rgba8,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Writes `frame_000000.png`, `frame_000001.png`, ... into a directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    written: u64,
}

impl PngSequenceSink {
    /// Sink writing into `dir`, created on `begin`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            written: 0,
        }
    }

    /// Path the frame at sequence position `n` is written to.
    pub fn frame_path(&self, n: u64) -> PathBuf {
        self.dir.join(format!("frame_{n:06}.png"))
    }

    /// Frames written since the last `begin`.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> CastResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output directory '{}'", self.dir.display()))?;
        self.cfg = Some(cfg);
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, frame: &FrameRGBA) -> CastResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| CastError::encode("png sink not started"))?;
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(CastError::encode(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        write_png(&self.frame_path(self.written), frame)?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> CastResult<()> {
        self.cfg = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
