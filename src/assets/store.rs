use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use usvg::fontdb;

use crate::{
    assets::decode::decode_image,
    foundation::{
        error::{CastError, CastResult},
        platform::normalize_rel_path,
    },
    layout::VisualKind,
    stage::Timeline,
};

#[derive(Clone, Debug)]
/// Raster image decoded to premultiplied RGBA8.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

#[derive(Clone, Debug)]
/// Images and fonts a timeline needs, loaded once before rendering.
pub struct AssetStore {
    root: PathBuf,
    images: HashMap<String, PreparedImage>,
    fontdb: Arc<fontdb::Database>,
}

impl AssetStore {
    /// Load every image the timeline's objects reference from `root` and build the font database.
    ///
    /// All IO happens here so rendering stays IO-free.
    #[tracing::instrument(skip(timeline, root), fields(scene = %timeline.scene))]
    pub fn prepare(timeline: &Timeline, root: impl Into<PathBuf>) -> CastResult<Self> {
        let root = root.into();
        let mut images = HashMap::new();
        for visual in &timeline.objects {
            let VisualKind::Image { source, .. } = &visual.kind else {
                continue;
            };
            let norm = normalize_rel_path(source)?;
            if images.contains_key(&norm) {
                continue;
            }
            let bytes = read_bytes(&root, &norm)?;
            let image = decode_image(&norm, &bytes)?;
            images.insert(norm, image);
        }
        tracing::debug!(images = images.len(), root = %root.display(), "assets prepared");

        Ok(Self {
            fontdb: build_fontdb(&root),
            root,
            images,
        })
    }

    /// Assets root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Prepared image for an object's `source` path.
    pub fn image(&self, source: &str) -> CastResult<&PreparedImage> {
        let norm = normalize_rel_path(source)?;
        self.images
            .get(&norm)
            .ok_or_else(|| CastError::evaluation(format!("image '{norm}' was not prepared")))
    }

    /// Number of distinct images loaded.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Shared font database for text rendering.
    pub fn fontdb(&self) -> Arc<fontdb::Database> {
        Arc::clone(&self.fontdb)
    }
}

fn read_bytes(root: &Path, norm_path: &str) -> CastResult<Vec<u8>> {
    let path = root.join(Path::new(norm_path));
    let bytes =
        std::fs::read(&path).with_context(|| format!("read asset '{}'", path.display()))?;
    Ok(bytes)
}

/// System fonts plus any fonts shipped in `<root>/fonts`.
pub fn build_fontdb(root: &Path) -> Arc<fontdb::Database> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    load_fonts_from_dir(&mut db, &root.join("fonts"));
    Arc::new(db)
}

fn load_fonts_from_dir(db: &mut fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };
    for path in rd.flatten().map(|e| e.path()) {
        let is_font = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
            .unwrap_or(false);
        if path.is_file() && is_font && db.load_font_file(&path).is_err() {
            tracing::debug!(path = %path.display(), "skipping unreadable font");
        }
    }
}

/// Resolver that falls back to generic families and then to any face, so text always draws.
pub(crate) fn font_resolver() -> usvg::FontResolver<'static> {
    usvg::FontResolver {
        select_font: Box::new(|font, db| {
            let mut families: Vec<fontdb::Family<'_>> =
                font.families().iter().map(generic_family).collect();
            families.extend([
                fontdb::Family::SansSerif,
                fontdb::Family::Serif,
                fontdb::Family::Monospace,
            ]);
            let query = fontdb::Query {
                families: &families,
                weight: fontdb::Weight(font.weight()),
                stretch: stretch_of(font.stretch()),
                style: style_of(font.style()),
            };
            db.query(&query).or_else(|| db.faces().next().map(|f| f.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

fn generic_family(family: &usvg::FontFamily) -> fontdb::Family<'_> {
    match family {
        usvg::FontFamily::Serif => fontdb::Family::Serif,
        usvg::FontFamily::SansSerif => fontdb::Family::SansSerif,
        usvg::FontFamily::Cursive => fontdb::Family::Cursive,
        usvg::FontFamily::Fantasy => fontdb::Family::Fantasy,
        usvg::FontFamily::Monospace => fontdb::Family::Monospace,
        usvg::FontFamily::Named(s) => fontdb::Family::Name(s),
    }
}

fn stretch_of(s: usvg::FontStretch) -> fontdb::Stretch {
    use usvg::FontStretch as S;
    match s {
        S::UltraCondensed => fontdb::Stretch::UltraCondensed,
        S::ExtraCondensed => fontdb::Stretch::ExtraCondensed,
        S::Condensed => fontdb::Stretch::Condensed,
        S::SemiCondensed => fontdb::Stretch::SemiCondensed,
        S::Normal => fontdb::Stretch::Normal,
        S::SemiExpanded => fontdb::Stretch::SemiExpanded,
        S::Expanded => fontdb::Stretch::Expanded,
        S::ExtraExpanded => fontdb::Stretch::ExtraExpanded,
        S::UltraExpanded => fontdb::Stretch::UltraExpanded,
    }
}

fn style_of(s: usvg::FontStyle) -> fontdb::Style {
    match s {
        usvg::FontStyle::Normal => fontdb::Style::Normal,
        usvg::FontStyle::Italic => fontdb::Style::Italic,
        usvg::FontStyle::Oblique => fontdb::Style::Oblique,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
