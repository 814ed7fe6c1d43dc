use std::{io::Cursor, sync::Arc};

use anyhow::Context;

use crate::{
    assets::store::PreparedImage,
    foundation::{
        error::{CastError, CastResult},
        math::premultiply_rgba8,
    },
};

/// Decode the image file `source` from its bytes into premultiplied RGBA8.
///
/// The format is sniffed from the bytes, not the extension.
pub fn decode_image(source: &str, bytes: &[u8]) -> CastResult<PreparedImage> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .with_context(|| format!("sniff image format of '{source}'"))?;
    if reader.format().is_none() {
        return Err(CastError::validation(format!(
            "'{source}' is not a recognized image format"
        )));
    }
    let rgba = reader
        .decode()
        .with_context(|| format!("decode image '{source}'"))?
        .into_rgba8();

    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(CastError::validation(format!("image '{source}' is empty")));
    }
    let mut pixels = rgba.into_raw();
    premultiply_rgba8(&mut pixels);
    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(pixels),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
