use std::{
    io::{ErrorKind, Read, Write},
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
    thread::JoinHandle,
};

use crate::{
    encode::{FrameSink, SinkConfig, ensure_parent_dir},
    foundation::{
        color::Color,
        core::FrameIndex,
        error::{CastError, CastResult},
        math::{mul_div255_u16, premultiply_rgba8},
    },
    render::FrameRGBA,
};

/// Streams frames into the system `ffmpeg` as an h264/yuv420p MP4.
///
/// Frames are flattened over `background` first, since the MP4 carries no alpha. An existing
/// file at the output path is overwritten.
pub struct FfmpegSink {
    out: PathBuf,
    background: Color,
    job: Option<Job>,
}

/// One running encode, from `begin` to `end`.
struct Job {
    cfg: SinkConfig,
    child: Child,
    stdin: ChildStdin,
    log: JoinHandle<std::io::Result<String>>,
    scratch: Vec<u8>,
    next: u64,
    written: u64,
}

impl FfmpegSink {
    /// Sink writing the MP4 at `out`.
    pub fn new(out: impl Into<PathBuf>, background: Color) -> Self {
        Self {
            out: out.into(),
            background,
            job: None,
        }
    }

    /// Output path.
    pub fn out(&self) -> &Path {
        &self.out
    }
}

/// yuv420p subsamples chroma 2x2, so both sides must be even.
fn check_yuv420(cfg: &SinkConfig) -> CastResult<()> {
    if cfg.fps.num == 0 || cfg.fps.den == 0 {
        return Err(CastError::validation("fps must be non-zero"));
    }
    if cfg.width == 0
        || cfg.height == 0
        || !cfg.width.is_multiple_of(2)
        || !cfg.height.is_multiple_of(2)
    {
        return Err(CastError::validation(format!(
            "mp4 output needs even, non-zero dimensions, got {}x{}",
            cfg.width, cfg.height
        )));
    }
    Ok(())
}

fn encoder_command(cfg: &SinkConfig, out: &Path) -> Command {
    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-y", "-loglevel", "error"])
        .args(["-f", "rawvideo", "-pix_fmt", "rgba"])
        .args(["-s", &format!("{}x{}", cfg.width, cfg.height)])
        // Rawvideo input rate goes before `-i`.
        .args(["-r", &format!("{}/{}", cfg.fps.num, cfg.fps.den)])
        .args(["-i", "pipe:0", "-an"])
        .args(["-c:v", "libx264", "-pix_fmt", "yuv420p", "-movflags", "+faststart"])
        .arg(out)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());
    cmd
}

impl Job {
    fn spawn(cfg: SinkConfig, out: &Path) -> CastResult<Self> {
        let scratch = vec![0u8; cfg.frame_bytes()?];
        let mut child = encoder_command(&cfg, out)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    CastError::encode("mp4 output needs ffmpeg, which was not found on PATH")
                }
                _ => CastError::encode(format!("spawn ffmpeg: {e}")),
            })?;
        let (Some(stdin), Some(mut stderr)) = (child.stdin.take(), child.stderr.take()) else {
            return Err(CastError::encode("ffmpeg pipes were not opened"));
        };
        // ffmpeg blocks once its stderr pipe fills up, so it is drained off-thread.
        let log = std::thread::spawn(move || {
            let mut text = String::new();
            stderr.read_to_string(&mut text)?;
            Ok(text)
        });
        Ok(Self {
            cfg,
            child,
            stdin,
            log,
            scratch,
            next: 0,
            written: 0,
        })
    }

    fn finish(self) -> CastResult<u64> {
        let Self {
            mut child,
            stdin,
            log,
            written,
            ..
        } = self;
        drop(stdin);
        let status = child
            .wait()
            .map_err(|e| CastError::encode(format!("wait for ffmpeg: {e}")))?;
        let log = log
            .join()
            .map_err(|_| CastError::encode("ffmpeg log reader panicked"))?
            .unwrap_or_default();
        if !status.success() {
            return Err(CastError::encode(format!(
                "ffmpeg failed ({status}): {}",
                log.trim()
            )));
        }
        Ok(written)
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> CastResult<()> {
        if self.job.is_some() {
            return Err(CastError::encode("mp4 sink is already encoding"));
        }
        check_yuv420(&cfg)?;
        ensure_parent_dir(&self.out)?;
        tracing::debug!(
            out = %self.out.display(),
            width = cfg.width,
            height = cfg.height,
            "ffmpeg started"
        );
        self.job = Some(Job::spawn(cfg, &self.out)?);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CastResult<()> {
        let job = self
            .job
            .as_mut()
            .ok_or_else(|| CastError::encode("mp4 sink was not started"))?;
        if idx.0 < job.next {
            return Err(CastError::encode(format!(
                "frame {} arrived after frame {}",
                idx.0,
                job.next - 1
            )));
        }
        if (frame.width, frame.height) != (job.cfg.width, job.cfg.height)
            || frame.data.len() != job.scratch.len()
        {
            return Err(CastError::encode(format!(
                "frame is {}x{}, the mp4 is {}x{}",
                frame.width, frame.height, job.cfg.width, job.cfg.height
            )));
        }
        flatten(frame, self.background, &mut job.scratch);
        job.stdin
            .write_all(&job.scratch)
            .map_err(|e| CastError::encode(format!("pipe frame {} to ffmpeg: {e}", idx.0)))?;
        job.next = idx.0 + 1;
        job.written += 1;
        Ok(())
    }

    fn end(&mut self) -> CastResult<()> {
        let job = self
            .job
            .take()
            .ok_or_else(|| CastError::encode("mp4 sink was not started"))?;
        let frames = job.finish()?;
        tracing::debug!(out = %self.out.display(), frames, "ffmpeg finished");
        Ok(())
    }
}

/// Composite `frame` over an opaque `background` into `out`, which has the frame's length.
fn flatten(frame: &FrameRGBA, background: Color, out: &mut [u8]) {
    out.copy_from_slice(&frame.data);
    if !frame.premultiplied {
        premultiply_rgba8(out);
    }
    let bg = [background.r, background.g, background.b].map(u16::from);
    for px in out.chunks_exact_mut(4) {
        let uncovered = 255 - u16::from(px[3]);
        for (c, b) in px[..3].iter_mut().zip(bg) {
            *c = (u16::from(*c) + mul_div255_u16(b, uncovered)).min(255) as u8;
        }
        px[3] = 255;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
