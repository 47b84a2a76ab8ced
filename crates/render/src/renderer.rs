use glam::Vec3;
use glyphfield_mesh::QuadMesh;

use crate::params::ShaderParameterSet;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 200.0),
            target: Vec3::ZERO,
            fov_degrees: 35.0,
        }
    }
}

/// Something a renderer can draw: write-once geometry plus the parameters
/// the shader reads this frame.
pub trait Drawable {
    fn geometry(&self) -> &QuadMesh;
    fn parameters(&self) -> &ShaderParameterSet;
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads a drawable and a view configuration, then produces
/// output. It never calls back into the drawable's owner.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of the given drawable.
    fn render(&self, drawable: &dyn Drawable, view: &RenderView) -> Self::Output;
}

/// Produces a human-readable dump of a drawable. Useful for CLI output,
/// logging, and testing the render interface.
#[derive(Debug)]
pub struct DebugTextRenderer {
    /// How many leading cells to list individually.
    pub max_cells: usize,
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self { max_cells: 4 }
    }
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_cells(max_cells: usize) -> Self {
        Self { max_cells }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, drawable: &dyn Drawable, view: &RenderView) -> String {
        let mesh = drawable.geometry();
        let mut out = String::new();
        out.push_str(&format!(
            "=== Glyph Field (cells={}, vertices={}, indices={}) ===\n",
            mesh.num_cells(),
            mesh.vertex_count(),
            mesh.index_count()
        ));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        ));

        out.push_str("Parameters:\n");
        for (name, value) in drawable.parameters().iter() {
            out.push_str(&format!("  {name} = {value}\n"));
        }

        let shown = (mesh.num_cells() as usize).min(self.max_cells);
        for cell in 0..shown as u32 {
            if let Some(r) = mesh.random_for_cell(cell) {
                out.push_str(&format!(
                    "  [cell {cell}] random=({:.3}, {:.3}, {:.3})\n",
                    r[0], r[1], r[2]
                ));
            }
        }
        if shown < mesh.num_cells() as usize {
            out.push_str(&format!(
                "  ... {} more cells\n",
                mesh.num_cells() as usize - shown
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Param;
    use glyphfield_common::TextureHandle;
    use glyphfield_mesh::QuadMeshBuilder;

    struct TestDrawable {
        mesh: QuadMesh,
        params: ShaderParameterSet,
    }

    impl Drawable for TestDrawable {
        fn geometry(&self) -> &QuadMesh {
            &self.mesh
        }

        fn parameters(&self) -> &ShaderParameterSet {
            &self.params
        }
    }

    fn drawable(cells: u32) -> TestDrawable {
        TestDrawable {
            mesh: QuadMeshBuilder::new(cells, 4.0).unwrap().build_seeded(1),
            params: ShaderParameterSet::new(),
        }
    }

    #[test]
    fn debug_renderer_lists_parameters() {
        let d = drawable(2);
        let output = DebugTextRenderer::new().render(&d, &RenderView::default());

        assert!(output.contains("cells=2"));
        assert!(output.contains("vertices=8"));
        assert!(output.contains("indices=12"));
        assert!(output.contains("texture = unbound"));
        assert!(output.contains("weight1 = 1.0000"));
        assert!(output.contains("[cell 1]"));
        assert!(!output.contains("more cells"));
    }

    #[test]
    fn debug_renderer_truncates_cells() {
        let mut d = drawable(10);
        d.params.set_texture(Some(TextureHandle(5)));
        d.params.set_float(Param::Time, 1.5).unwrap();
        let output = DebugTextRenderer::with_max_cells(3).render(&d, &RenderView::default());

        assert!(output.contains("texture = texture#5"));
        assert!(output.contains("time = 1.5000"));
        assert!(output.contains("[cell 2]"));
        assert!(!output.contains("[cell 3]"));
        assert!(output.contains("... 7 more cells"));
    }

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 35.0);
        assert_eq!(view.target, Vec3::ZERO);
        assert_eq!(view.eye.z, 200.0);
    }
}
