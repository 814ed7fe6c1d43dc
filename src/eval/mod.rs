//! Frame evaluation: replay a timeline up to one frame and flatten it into draw items.

mod evaluate;
mod scene;

pub use evaluate::evaluate;
pub use scene::{DrawItem, FrameScene};
