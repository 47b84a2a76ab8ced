use bytemuck::{Pod, Zeroable};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Vertices emitted per cell, in the order TL, TR, BL, BR.
pub const VERTICES_PER_CELL: usize = 4;
/// Triangle indices emitted per cell (two triangles).
pub const INDICES_PER_CELL: usize = 6;

const CORNER_UVS: [[f32; 2]; VERTICES_PER_CELL] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];

/// (TL, BL, TR) and (BL, BR, TR), relative to the cell's first vertex.
const CELL_TRIANGLES: [u32; INDICES_PER_CELL] = [0, 2, 1, 2, 3, 1];

/// Errors from invalid quad field construction arguments.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("invalid mesh configuration: cell count must be positive")]
    ZeroCells,
    #[error("invalid mesh configuration: cell width must be positive and finite, got {0}")]
    InvalidCellWidth(f32),
    #[error("invalid mesh configuration: {0} cells exceed the 32-bit index range")]
    TooManyCells(u32),
}

/// Interleaved per-vertex record for GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    /// The owning cell's random triple.
    pub random: [f32; 3],
    pub cell_index: u32,
}

/// Validated parameters for a quad field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadMeshBuilder {
    num_cells: u32,
    cell_width: f32,
}

impl QuadMeshBuilder {
    pub fn new(num_cells: u32, cell_width: f32) -> Result<Self, MeshError> {
        if num_cells == 0 {
            return Err(MeshError::ZeroCells);
        }
        if !cell_width.is_finite() || cell_width <= 0.0 {
            return Err(MeshError::InvalidCellWidth(cell_width));
        }
        if num_cells > u32::MAX / VERTICES_PER_CELL as u32 {
            return Err(MeshError::TooManyCells(num_cells));
        }
        Ok(Self {
            num_cells,
            cell_width,
        })
    }

    pub fn num_cells(&self) -> u32 {
        self.num_cells
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    /// Build with unseeded thread-local randomness.
    pub fn build(&self) -> QuadMesh {
        self.build_with_rng(&mut rand::rng())
    }

    /// Build reproducibly: the same seed yields identical buffers.
    pub fn build_seeded(&self, seed: u64) -> QuadMesh {
        self.build_with_rng(&mut ChaCha8Rng::seed_from_u64(seed))
    }

    /// Build drawing each cell's random triple from `rng`.
    pub fn build_with_rng<R: Rng>(&self, rng: &mut R) -> QuadMesh {
        let n = self.num_cells as usize;
        let half = self.cell_width / 2.0;
        let corners = [
            [-half, half, 0.0],
            [half, half, 0.0],
            [-half, -half, 0.0],
            [half, -half, 0.0],
        ];

        let mut positions = Vec::with_capacity(n * VERTICES_PER_CELL * 3);
        let mut uvs = Vec::with_capacity(n * VERTICES_PER_CELL * 2);
        let mut randoms = Vec::with_capacity(n * 3);
        let mut cell_indices = Vec::with_capacity(n * VERTICES_PER_CELL);
        let mut triangle_indices = Vec::with_capacity(n * INDICES_PER_CELL);

        for cell in 0..self.num_cells {
            let random: [f32; 3] = [rng.random(), rng.random(), rng.random()];
            randoms.extend_from_slice(&random);

            for (corner, uv) in corners.iter().zip(CORNER_UVS.iter()) {
                positions.extend_from_slice(corner);
                uvs.extend_from_slice(uv);
                cell_indices.push(cell);
            }

            let offset = cell * VERTICES_PER_CELL as u32;
            triangle_indices.extend(CELL_TRIANGLES.iter().map(|i| offset + i));
        }

        tracing::debug!(
            cells = self.num_cells,
            cell_width = self.cell_width,
            vertices = cell_indices.len(),
            indices = triangle_indices.len(),
            "built quad mesh"
        );

        let fingerprint = fingerprint(self.num_cells, self.cell_width, &randoms);
        QuadMesh {
            num_cells: self.num_cells,
            cell_width: self.cell_width,
            positions,
            uvs,
            randoms,
            cell_indices,
            triangle_indices,
            fingerprint,
        }
    }
}

fn fingerprint(num_cells: u32, cell_width: f32, randoms: &[f32]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    let words = [num_cells, cell_width.to_bits()]
        .into_iter()
        .chain(randoms.iter().map(|r| r.to_bits()));
    for word in words {
        for byte in word.to_le_bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
    }
    hash
}

/// Write-once geometry buffers for a quad field.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadMesh {
    num_cells: u32,
    cell_width: f32,
    positions: Vec<f32>,
    uvs: Vec<f32>,
    randoms: Vec<f32>,
    cell_indices: Vec<u32>,
    triangle_indices: Vec<u32>,
    /// FNV-1a over cell count, width and randoms.
    fingerprint: u64,
}

impl QuadMesh {
    /// Content hash identifying this geometry. Meshes with different
    /// per-cell randoms differ here even at equal cell counts.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn num_cells(&self) -> u32 {
        self.num_cells
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    pub fn vertex_count(&self) -> usize {
        self.cell_indices.len()
    }

    pub fn index_count(&self) -> usize {
        self.triangle_indices.len()
    }

    /// xyz per vertex, 12 floats per cell.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// uv per vertex, 8 floats per cell.
    pub fn uvs(&self) -> &[f32] {
        &self.uvs
    }

    /// One random triple per cell, 3 floats per cell.
    pub fn randoms(&self) -> &[f32] {
        &self.randoms
    }

    /// Owning cell of each vertex.
    pub fn cell_indices(&self) -> &[u32] {
        &self.cell_indices
    }

    pub fn triangle_indices(&self) -> &[u32] {
        &self.triangle_indices
    }

    pub fn random_for_cell(&self, cell: u32) -> Option<[f32; 3]> {
        let start = cell as usize * 3;
        self.randoms
            .get(start..start + 3)
            .map(|r| [r[0], r[1], r[2]])
    }

    /// Interleave the buffers into one record per vertex.
    pub fn vertices(&self) -> Vec<QuadVertex> {
        self.cell_indices
            .iter()
            .enumerate()
            .map(|(v, &cell)| {
                let p = &self.positions[v * 3..v * 3 + 3];
                let uv = &self.uvs[v * 2..v * 2 + 2];
                let r = &self.randoms[cell as usize * 3..cell as usize * 3 + 3];
                QuadVertex {
                    position: [p[0], p[1], p[2]],
                    uv: [uv[0], uv[1]],
                    random: [r[0], r[1], r[2]],
                    cell_index: cell,
                }
            })
            .collect()
    }
}
