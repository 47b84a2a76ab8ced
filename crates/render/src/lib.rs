//! Rendering Adapter: renderer-agnostic drawable interface and shader parameters.
//!
//! # Invariants
//! - Renderers read a drawable's geometry and parameters; they never mutate them.
//! - The parameter set only holds names from the fixed schema.
//!
//! The `Renderer` trait is stable; the debug text renderer and the wgpu
//! backend both consume the same `Drawable`.

mod params;
mod renderer;

pub use params::{
    FieldUniforms, Param, ParamError, ParamKind, ParamSpec, ParamValue, SCHEMA,
    ShaderParameterSet,
};
pub use renderer::{DebugTextRenderer, Drawable, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "glyphfield-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
