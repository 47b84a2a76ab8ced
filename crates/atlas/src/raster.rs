use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use glyphfield_common::{AtlasLayout, LayoutError};

/// Errors from atlas rasterization.
#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid font data: {0}")]
    InvalidFont(#[from] ab_glyph::InvalidFont),
    #[error("atlas text is empty")]
    EmptyText,
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// How glyphs are sized and arranged in the atlas.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Family name, for logs; the face itself comes from the rasterizer.
    pub family: String,
    /// Edge length of one glyph cell in pixels.
    pub cell_pixel_size: u32,
    /// Glyph cells per atlas row.
    pub columns: u32,
    /// Font size and baseline as a fraction of the cell size.
    pub glyph_scale: f32,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: "Cabin Sketch".to_string(),
            cell_pixel_size: 128,
            columns: 16,
            glyph_scale: 0.8,
        }
    }
}

/// A rasterized atlas: RGBA8 pixels, row-major, no padding.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasImage {
    pub layout: AtlasLayout,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl AtlasImage {
    /// Fully transparent image sized for `layout`.
    pub fn blank(layout: AtlasLayout) -> Result<Self, AtlasError> {
        let (width, height) = layout.pixel_size()?;
        Ok(Self {
            layout,
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        })
    }

    /// Accumulate white glyph coverage at a pixel, keeping the strongest hit.
    pub fn cover(&mut self, x: u32, y: u32, coverage: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = &mut self.pixels[i..i + 4];
        if alpha > px[3] {
            px.copy_from_slice(&[255, 255, 255, alpha]);
        }
    }

    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y as usize * self.width as usize + x as usize) * 4 + 3])
    }
}

/// Produces an atlas image for a glyph string. Implementations may block
/// on font availability; they run before any field exists.
pub trait AtlasRasterizer {
    fn rasterize(&self, glyphs: &str, font: &FontDescriptor) -> Result<AtlasImage, AtlasError>;
}

/// Rasterizes glyphs with an `ab_glyph` outline font.
///
/// Each glyph is centered horizontally in its cell with its baseline at
/// `glyph_scale * cell`, and shrunk to fit when wider than the cell.
#[derive(Clone)]
pub struct GlyphAtlasRasterizer {
    font: FontArc,
}

impl std::fmt::Debug for GlyphAtlasRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphAtlasRasterizer").finish_non_exhaustive()
    }
}

impl GlyphAtlasRasterizer {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, AtlasError> {
        Ok(Self {
            font: FontArc::try_from_vec(data)?,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AtlasError> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "font loaded");
        Self::from_bytes(data)
    }
}

impl AtlasRasterizer for GlyphAtlasRasterizer {
    fn rasterize(&self, glyphs: &str, font: &FontDescriptor) -> Result<AtlasImage, AtlasError> {
        let count = glyphs.chars().count();
        if count == 0 {
            return Err(AtlasError::EmptyText);
        }
        let used_length = u32::try_from(count).unwrap_or(u32::MAX);
        let layout = AtlasLayout::for_glyph_count(used_length, font.columns, font.cell_pixel_size)?;
        let mut image = AtlasImage::blank(layout)?;

        let cell = font.cell_pixel_size as f32;
        let base_px = cell * font.glyph_scale;

        for (i, c) in (0..used_length).zip(glyphs.chars()) {
            let Some((col, row)) = layout.cell_of(i) else {
                continue;
            };
            let id = self.font.glyph_id(c);

            let advance = self.font.as_scaled(PxScale::from(base_px)).h_advance(id);
            let px = fit_to_cell(base_px, advance, cell);
            let advance = self.font.as_scaled(PxScale::from(px)).h_advance(id);

            let (x, baseline) = glyph_origin(col, row, cell, font.glyph_scale, advance);
            let glyph = id.with_scale_and_position(PxScale::from(px), point(x, baseline));

            let Some(outlined) = self.font.outline_glyph(glyph) else {
                // Whitespace and unmapped glyphs leave the cell empty.
                continue;
            };
            let bounds = outlined.px_bounds();
            let size = font.cell_pixel_size;
            let (cell_x0, cell_y0) = (col * size, row * size);
            let (cell_x1, cell_y1) = (cell_x0 + size, cell_y0 + size);

            outlined.draw(|gx, gy, coverage| {
                let x = bounds.min.x as i64 + i64::from(gx);
                let y = bounds.min.y as i64 + i64::from(gy);
                if x < i64::from(cell_x0)
                    || y < i64::from(cell_y0)
                    || x >= i64::from(cell_x1)
                    || y >= i64::from(cell_y1)
                {
                    return;
                }
                image.cover(x as u32, y as u32, coverage);
            });
        }

        tracing::debug!(
            family = %font.family,
            glyphs = used_length,
            width = image.width,
            height = image.height,
            "atlas rasterized"
        );
        Ok(image)
    }
}

/// Font size that keeps a glyph of `advance` width inside `cell`.
fn fit_to_cell(px: f32, advance: f32, cell: f32) -> f32 {
    if advance > cell && advance > 0.0 {
        px * cell / advance
    } else {
        px
    }
}

/// Left edge and baseline for a glyph centered in grid cell (`col`, `row`).
fn glyph_origin(col: u32, row: u32, cell: f32, glyph_scale: f32, advance: f32) -> (f32, f32) {
    let center_x = col as f32 * cell + cell / 2.0;
    let baseline = row as f32 * cell + cell * glyph_scale;
    (center_x - advance / 2.0, baseline)
}
