use std::{fmt::Write as _, sync::Arc};

use anyhow::Context;
use resvg::tiny_skia;

use crate::{
    assets::{AssetStore, PreparedImage, font_resolver},
    eval::{DrawItem, FrameScene},
    foundation::{
        color::Color,
        core::Point,
        error::{CastError, CastResult},
    },
    layout::metrics::FontFamily,
    render::FrameRGBA,
};

/// Arrow head length in stroke widths.
const HEAD_LENGTH: f64 = 3.0;
/// Arrow head half-width in stroke widths.
const HEAD_HALF_WIDTH: f64 = 2.0;

/// Rasterizes [`FrameScene`]s on the CPU.
///
/// Runs of consecutive text and stroke items become one SVG document rasterized by `resvg`; images
/// are composited directly as pixmaps.
pub struct CpuRenderer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl CpuRenderer {
    /// Renderer drawing text with the store's fonts.
    pub fn new(assets: &AssetStore) -> Self {
        Self {
            fontdb: assets.fontdb(),
        }
    }

    /// Render one evaluated frame to premultiplied RGBA8.
    #[tracing::instrument(skip_all, fields(frame = scene.frame.0, items = scene.items.len()))]
    pub fn render(&mut self, scene: &FrameScene, assets: &AssetStore) -> CastResult<FrameRGBA> {
        let (width, height) = (scene.canvas.width, scene.canvas.height);
        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| CastError::evaluation(format!("cannot allocate {width}x{height} frame")))?;
        pixmap.fill(skia_color(scene.background));

        let mut batch: Vec<&DrawItem> = Vec::new();
        for item in &scene.items {
            match item {
                DrawItem::Image {
                    source,
                    rect,
                    opacity,
                } => {
                    self.flush(&mut pixmap, scene, &mut batch)?;
                    let img = assets.image(source)?;
                    draw_image(&mut pixmap, img, rect.origin(), rect.width(), rect.height(), *opacity)?;
                }
                _ => batch.push(item),
            }
        }
        self.flush(&mut pixmap, scene, &mut batch)?;

        Ok(FrameRGBA {
            width,
            height,
            data: pixmap.take(),
            premultiplied: true,
        })
    }

    fn flush(
        &self,
        pixmap: &mut tiny_skia::Pixmap,
        scene: &FrameScene,
        batch: &mut Vec<&DrawItem>,
    ) -> CastResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let svg = svg_document(scene, batch);
        batch.clear();

        let opts = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            font_resolver: font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts).context("parse frame svg")?;
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
        Ok(())
    }
}

fn skia_color(c: Color) -> tiny_skia::Color {
    let [r, g, b, a] = c.to_array();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

/// SVG source for a batch of vector items on the scene's canvas.
pub(crate) fn svg_document(scene: &FrameScene, items: &[&DrawItem]) -> String {
    let (w, h) = (scene.canvas.width, scene.canvas.height);
    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    for item in items {
        match item {
            DrawItem::Text {
                text,
                origin,
                font_px,
                family,
                color,
                opacity,
            } => {
                let family = match family {
                    FontFamily::Mono => format!("'{}', monospace", escape(&scene.monospace)),
                    FontFamily::Sans => "sans-serif".to_owned(),
                };
                let _ = write!(
                    out,
                    r#"<text x="{:.3}" y="{:.3}" font-size="{:.3}" font-family="{family}" fill="{}" fill-opacity="{:.4}" xml:space="preserve">{}</text>"#,
                    origin.x,
                    origin.y,
                    font_px,
                    color.rgb_hex(),
                    opacity * color.alpha_f64(),
                    escape(text),
                );
            }
            DrawItem::Stroke {
                from,
                to,
                width,
                color,
                opacity,
                head,
            } => {
                let paint = format!(
                    r#"stroke="{}" stroke-opacity="{:.4}""#,
                    color.rgb_hex(),
                    opacity * color.alpha_f64()
                );
                let _ = write!(
                    out,
                    r#"<line x1="{:.3}" y1="{:.3}" x2="{:.3}" y2="{:.3}" stroke-width="{:.3}" stroke-linecap="round" {paint}/>"#,
                    from.x, from.y, to.x, to.y, width,
                );
                if *head && let Some([a, b, c]) = arrow_head(*from, *to, *width) {
                    let _ = write!(
                        out,
                        r#"<polygon points="{:.3},{:.3} {:.3},{:.3} {:.3},{:.3}" fill="{}" fill-opacity="{:.4}"/>"#,
                        a.x,
                        a.y,
                        b.x,
                        b.y,
                        c.x,
                        c.y,
                        color.rgb_hex(),
                        opacity * color.alpha_f64(),
                    );
                }
            }
            DrawItem::Image { .. } => {}
        }
    }
    out.push_str("</svg>");
    out
}

/// Triangle at `to` pointing away from `from`; `None` for a zero-length stroke.
fn arrow_head(from: Point, to: Point, width: f64) -> Option<[Point; 3]> {
    let d = to - from;
    let len = d.hypot();
    if len <= f64::EPSILON {
        return None;
    }
    let dir = d / len;
    let normal = dir.turn_90();
    let base = to - dir * (HEAD_LENGTH * width).min(len);
    let side = normal * HEAD_HALF_WIDTH * width;
    Some([to, base + side, base - side])
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn draw_image(
    pixmap: &mut tiny_skia::Pixmap,
    img: &PreparedImage,
    at: Point,
    width: f64,
    height: f64,
    opacity: f64,
) -> CastResult<()> {
    if img.width == 0 || img.height == 0 || width <= 0.0 || height <= 0.0 {
        return Ok(());
    }
    let size = tiny_skia::IntSize::from_wh(img.width, img.height)
        .ok_or_else(|| CastError::evaluation("image has invalid dimensions"))?;
    let src = tiny_skia::Pixmap::from_vec(img.rgba8_premul.as_ref().clone(), size)
        .ok_or_else(|| CastError::evaluation("prepared image byte length mismatch"))?;

    let paint = tiny_skia::PixmapPaint {
        opacity: opacity.clamp(0.0, 1.0) as f32,
        quality: tiny_skia::FilterQuality::Bilinear,
        ..Default::default()
    };
    let xform = tiny_skia::Transform::from_row(
        (width / img.width as f64) as f32,
        0.0,
        0.0,
        (height / img.height as f64) as f32,
        at.x as f32,
        at.y as f32,
    );
    pixmap.draw_pixmap(0, 0, src.as_ref(), &paint, xform, None);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
