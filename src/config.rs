use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::{
    color::Color,
    core::{Canvas, Fps},
    error::{CastError, CastResult},
    platform::default_monospace,
};

/// Canvas height the scene font sizes are authored against.
pub const REFERENCE_HEIGHT_PX: f64 = 720.0;

/// Output and authoring settings shared by every scene.
///
/// Every field may be omitted from the JSON file; missing fields take the defaults below.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CastConfig {
    /// Frame rate (default 30/1).
    pub fps: Fps,
    /// Canvas width in pixels (default 1280).
    pub width: u32,
    /// Canvas height in pixels (default 720).
    pub height: u32,
    /// Background fill (default `#000000`).
    pub background: Color,
    /// Hold after each animated step (default 1 s).
    pub wait_secs: f64,
    /// Monospace font family (default depends on the host OS).
    pub monospace: String,
    /// Formula font size at a 720 px tall canvas (default 40).
    pub formula_px: f64,
    /// Directory images and fonts are resolved against (default `assets`).
    pub assets: PathBuf,
}

impl Default for CastConfig {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            width: 1280,
            height: 720,
            background: Color::BLACK,
            wait_secs: 1.0,
            monospace: default_monospace().to_owned(),
            formula_px: 40.0,
            assets: PathBuf::from("assets"),
        }
    }
}

impl CastConfig {
    /// Read a JSON config file and validate it.
    pub fn load(path: &Path) -> CastResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings no scene can be recorded with.
    pub fn validate(&self) -> CastResult<()> {
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(CastError::validation("fps must have num>0 and den>0"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(CastError::validation("width/height must be > 0"));
        }
        if !self.wait_secs.is_finite() || self.wait_secs < 0.0 {
            return Err(CastError::validation("wait_secs must be >= 0"));
        }
        if !self.formula_px.is_finite() || self.formula_px <= 0.0 {
            return Err(CastError::validation("formula_px must be > 0"));
        }
        if self.monospace.trim().is_empty() {
            return Err(CastError::validation("monospace family must be non-empty"));
        }
        Ok(())
    }

    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Convert a font size authored for a 720 px tall canvas to this canvas.
    pub fn font_px(&self, authored: f64) -> f64 {
        authored * f64::from(self.height) / REFERENCE_HEIGHT_PX
    }
}
