//! Quad field geometry: N independent flat quads ("character cells").
//!
//! # Invariants
//! - Buffers are sized from the cell count alone: 12N positions, 8N uvs,
//!   3N per-cell randoms, 4N cell indices, 6N triangle indices.
//! - The four vertices of one cell share its cell index and random triple.
//! - Geometry is built once and never mutated.

mod quad;

pub use quad::{
    INDICES_PER_CELL, MeshError, QuadMesh, QuadMeshBuilder, QuadVertex, VERTICES_PER_CELL,
};

pub fn crate_info() -> &'static str {
    "glyphfield-mesh v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("mesh"));
    }
}
