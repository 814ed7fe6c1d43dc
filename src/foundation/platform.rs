use std::path::{Path, PathBuf};

use crate::foundation::error::{CastError, CastResult};

/// Monospace family used for code-like text when the config does not name one.
///
/// Keyed on the host OS: `consolas` on Windows, `monaco` on macOS, `Monospace` elsewhere.
pub fn default_monospace() -> &'static str {
    if cfg!(target_os = "windows") {
        "consolas"
    } else if cfg!(target_os = "macos") {
        "monaco"
    } else {
        "Monospace"
    }
}

/// Normalize and validate an assets-root-relative path.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> CastResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(CastError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(CastError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CastError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(CastError::validation("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

/// Resolve a relative asset path against the assets root.
pub fn asset_path(root: &Path, source: &str) -> CastResult<PathBuf> {
    let norm = normalize_rel_path(source)?;
    Ok(root.join(Path::new(&norm)))
}
