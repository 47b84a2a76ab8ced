//! wgpu render backend for character fields.
//!
//! Uploads a field's geometry once, binds rasterized atlases as textures and
//! draws with the field's parameters each frame. The blended vertex
//! animations live in [`FIELD_SHADER`].
//!
//! # Invariants
//! - The renderer never mutates the drawable.
//! - Camera motion is outside the field's update loop.
//! - A drawable whose texture slot is empty is not drawn.

mod camera;
mod gpu;
mod shaders;

pub use camera::ViewCamera;
pub use gpu::WgpuFieldRenderer;
pub use shaders::FIELD_SHADER;
