use glam::{Mat4, Vec3};
use glyphfield_render::RenderView;

/// Orbit camera around a fixed target, with perspective projection.
/// Camera motion is not part of the field's state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Rotation about the Y axis, radians. Zero looks down -Z.
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ViewCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 200.0,
            yaw: 0.0,
            pitch: 0.0,
            fov: 35.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 10.0,
            far: 1000.0,
            sensitivity: 0.005,
            min_distance: 20.0,
            max_distance: 800.0,
        }
    }
}

impl ViewCamera {
    pub fn eye(&self) -> Vec3 {
        let offset = Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        );
        self.target + offset * self.distance
    }

    /// Orbit by a mouse drag delta in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * self.sensitivity;
        self.pitch += dy * self.sensitivity;
        self.pitch = self.pitch.clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
    }

    /// Scale the orbit distance; positive `steps` move closer.
    pub fn zoom(&mut self, steps: f32) {
        self.distance = (self.distance * 0.9_f32.powf(steps))
            .clamp(self.min_distance, self.max_distance);
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Renderer-agnostic snapshot of this camera.
    pub fn render_view(&self) -> RenderView {
        RenderView {
            eye: self.eye(),
            target: self.target,
            fov_degrees: self.fov.to_degrees(),
        }
    }
}
