pub mod render;

pub use ab_glyph::FontArc;
pub use render::{FrameStats, SkiaRenderer};
