//! Rasterization of rendered cards into PNG output.

mod glyphs;
mod paint;
mod source;

pub use glyphs::{GLYPH_HEIGHT, GLYPH_WIDTH};
pub use paint::{PngRasterizer, encode_png, paint_card};
pub use source::SourceLoader;

use crate::error::RenderError;
use crate::templates::RenderedCard;

/// Pixel density used when exporting from the editor.
pub const EXPORT_PIXEL_RATIO: u32 = 2;
pub const MAX_PIXEL_RATIO: u32 = 8;

/// Turns a rendered card into a PNG data URI.
pub trait Rasterizer {
    /// Whether the rasterizer can accept work yet.
    fn is_ready(&self) -> bool {
        true
    }

    /// Whether `http(s)` image references are downloaded. When `false` they are
    /// painted as a placeholder.
    fn fetches_remote(&self) -> bool {
        false
    }

    fn rasterize(&self, card: &RenderedCard, pixel_ratio: u32) -> Result<String, RenderError>;
}
