//! Image and font loading ahead of rendering.

mod decode;
mod store;

pub use decode::decode_image;
pub use store::{AssetStore, PreparedImage, build_fontdb};
pub(crate) use store::font_resolver;
