use serde::{Deserialize, Serialize};

/// Opaque handle to an atlas texture owned by a render backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureHandle(pub u64);

/// Grid layout of a glyph atlas, as reported by the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasLayout {
    /// Glyph cells per atlas row.
    pub columns: u32,
    /// Glyph cell rows in the atlas.
    pub rows: u32,
    /// Edge length of one glyph cell in pixels.
    pub cell_pixel_size: u32,
    /// Number of distinct glyphs actually drawn into the atlas.
    pub used_length: u32,
}

/// Errors from atlas layout arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("atlas layout has zero columns")]
    ZeroColumns,
    #[error("atlas layout uses zero glyphs")]
    EmptyAtlas,
    #[error("atlas rows mismatch: {used_length} glyphs in {columns} columns need {expected} rows, got {found}")]
    RowMismatch {
        columns: u32,
        used_length: u32,
        expected: u32,
        found: u32,
    },
    #[error("atlas of {columns}x{rows} cells at {cell_pixel_size}px overflows the pixel range")]
    PixelOverflow {
        columns: u32,
        rows: u32,
        cell_pixel_size: u32,
    },
}

impl AtlasLayout {
    /// Layout for `used_length` glyphs packed row-major into `columns` columns.
    pub fn for_glyph_count(
        used_length: u32,
        columns: u32,
        cell_pixel_size: u32,
    ) -> Result<Self, LayoutError> {
        if columns == 0 {
            return Err(LayoutError::ZeroColumns);
        }
        if used_length == 0 {
            return Err(LayoutError::EmptyAtlas);
        }
        Ok(Self {
            columns,
            rows: used_length.div_ceil(columns),
            cell_pixel_size,
            used_length,
        })
    }

    /// Rows required to hold `used_length` glyphs.
    pub fn expected_rows(&self) -> Option<u32> {
        (self.columns > 0).then(|| self.used_length.div_ceil(self.columns))
    }

    /// Check the `rows == ceil(used_length / columns)` relationship.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let Some(expected) = self.expected_rows() else {
            return Err(LayoutError::ZeroColumns);
        };
        if self.used_length == 0 {
            return Err(LayoutError::EmptyAtlas);
        }
        if self.rows != expected {
            return Err(LayoutError::RowMismatch {
                columns: self.columns,
                used_length: self.used_length,
                expected,
                found: self.rows,
            });
        }
        Ok(())
    }

    /// Atlas image size in pixels.
    pub fn pixel_size(&self) -> Result<(u32, u32), LayoutError> {
        let width = self.columns.checked_mul(self.cell_pixel_size);
        let height = self.rows.checked_mul(self.cell_pixel_size);
        width.zip(height).ok_or(LayoutError::PixelOverflow {
            columns: self.columns,
            rows: self.rows,
            cell_pixel_size: self.cell_pixel_size,
        })
    }

    /// Grid cell (column, row) of glyph `index`, if the glyph is in the atlas.
    pub fn cell_of(&self, index: u32) -> Option<(u32, u32)> {
        if self.columns == 0 || index >= self.used_length {
            return None;
        }
        Some((index % self.columns, index / self.columns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_round_up() {
        let layout = AtlasLayout::for_glyph_count(65, 16, 128).unwrap();
        assert_eq!(layout.rows, 5);
        assert!(layout.validate().is_ok());

        let exact = AtlasLayout::for_glyph_count(64, 16, 128).unwrap();
        assert_eq!(exact.rows, 4);
    }

    #[test]
    fn rows_match_ceil_for_small_grids() {
        for columns in 1..=20u32 {
            for used in 1..=50u32 {
                let layout = AtlasLayout::for_glyph_count(used, columns, 8).unwrap();
                assert_eq!(layout.rows, (used + columns - 1) / columns);
                assert!(layout.validate().is_ok());
            }
        }
    }

    #[test]
    fn mismatched_rows_rejected() {
        let layout = AtlasLayout {
            columns: 16,
            rows: 4,
            cell_pixel_size: 128,
            used_length: 65,
        };
        assert_eq!(
            layout.validate(),
            Err(LayoutError::RowMismatch {
                columns: 16,
                used_length: 65,
                expected: 5,
                found: 4,
            })
        );
    }

    #[test]
    fn degenerate_layouts_rejected() {
        assert_eq!(
            AtlasLayout::for_glyph_count(10, 0, 64),
            Err(LayoutError::ZeroColumns)
        );
        assert_eq!(
            AtlasLayout::for_glyph_count(0, 16, 64),
            Err(LayoutError::EmptyAtlas)
        );
        let zero_cols = AtlasLayout {
            columns: 0,
            rows: 1,
            cell_pixel_size: 64,
            used_length: 3,
        };
        assert_eq!(zero_cols.validate(), Err(LayoutError::ZeroColumns));
    }

    #[test]
    fn pixel_size_and_cells() {
        let layout = AtlasLayout::for_glyph_count(65, 16, 128).unwrap();
        assert_eq!(layout.pixel_size(), Ok((2048, 640)));
        assert_eq!(layout.cell_of(0), Some((0, 0)));
        assert_eq!(layout.cell_of(17), Some((1, 1)));
        assert_eq!(layout.cell_of(64), Some((0, 4)));
        assert_eq!(layout.cell_of(65), None);
    }

    #[test]
    fn unvalidated_layouts_do_not_panic() {
        let zero_cols = AtlasLayout {
            columns: 0,
            rows: 0,
            cell_pixel_size: 64,
            used_length: 5,
        };
        assert_eq!(zero_cols.cell_of(0), None);

        let huge = AtlasLayout::for_glyph_count(65, 16, u32::MAX / 8).unwrap();
        assert!(matches!(
            huge.pixel_size(),
            Err(LayoutError::PixelOverflow { columns: 16, rows: 5, .. })
        ));
    }
}
