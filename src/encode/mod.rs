//! Frame sinks: where rendered frames go.

mod ffmpeg;
mod png;
mod sink;

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::CastResult;

pub use ffmpeg::FfmpegSink;
pub use png::{PngSequenceSink, write_png};
pub use sink::{FrameSink, InMemorySink, SinkConfig};

/// Create the parent directory of an output file.
pub fn ensure_parent_dir(path: &Path) -> CastResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory '{}'", parent.display()))?;
    }
    Ok(())
}
