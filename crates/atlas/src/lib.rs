//! Glyph atlas rasterization.
//!
//! Turns a string of unique glyphs and a font into one RGBA8 image packing
//! the glyphs row-major in a square-cell grid, plus the grid layout the
//! field binds. The field never inspects the pixels.

mod raster;

pub use raster::{AtlasError, AtlasImage, AtlasRasterizer, FontDescriptor, GlyphAtlasRasterizer};

pub fn crate_info() -> &'static str {
    "glyphfield-atlas v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("atlas"));
    }
}
