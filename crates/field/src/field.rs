use glyphfield_animation::{AnimationBlendController, BlendChannel, BlendConfig};
use glyphfield_common::{AtlasLayout, TextureHandle};
use glyphfield_mesh::{QuadMesh, QuadMeshBuilder};
use glyphfield_render::{Drawable, Param, ShaderParameterSet};

use crate::config::{FieldConfig, TimeStep};
use crate::error::FieldError;

/// A field of independently animated character cells, drawable as one unit.
///
/// Owns its geometry, shader parameters and blend controller exclusively.
/// The render loop calls [`update`](Self::update) once per tick and then
/// reads the field through [`Drawable`].
#[derive(Debug, Clone)]
pub struct AnimatedCharacterField {
    mesh: QuadMesh,
    params: ShaderParameterSet,
    blend: AnimationBlendController,
    layout: AtlasLayout,
    time_step: TimeStep,
    /// Kept in f64 so long sessions don't stall the accumulator.
    time: f64,
    bound: bool,
}

impl AnimatedCharacterField {
    /// Build a field with unseeded per-cell randoms and default timing.
    pub fn new(num_cells: u32, cell_width: f32, layout: AtlasLayout) -> Result<Self, FieldError> {
        let mesh = QuadMeshBuilder::new(num_cells, cell_width)?.build();
        Self::assemble(mesh, layout, BlendConfig::default(), TimeStep::default())
    }

    /// Build a field from configuration; a configured seed makes geometry reproducible.
    pub fn from_config(config: &FieldConfig, layout: AtlasLayout) -> Result<Self, FieldError> {
        let builder = QuadMeshBuilder::new(config.num_cells, config.cell_width)?;
        let mesh = match config.seed {
            Some(seed) => builder.build_seeded(seed),
            None => builder.build(),
        };
        Self::assemble(mesh, layout, config.blend, config.time_step)
    }

    /// Build a field around prebuilt geometry.
    pub fn with_mesh(
        mesh: QuadMesh,
        layout: AtlasLayout,
        blend: BlendConfig,
        time_step: TimeStep,
    ) -> Result<Self, FieldError> {
        Self::assemble(mesh, layout, blend, time_step)
    }

    fn assemble(
        mesh: QuadMesh,
        layout: AtlasLayout,
        blend: BlendConfig,
        time_step: TimeStep,
    ) -> Result<Self, FieldError> {
        layout.validate()?;
        time_step.validate()?;
        let blend = AnimationBlendController::with_config(blend)?;

        let mut params = ShaderParameterSet::new();
        params.set_float(Param::NumCells, mesh.num_cells() as f32)?;
        write_layout(&mut params, &layout)?;
        params.set_weights(blend.weights());

        tracing::debug!(
            cells = mesh.num_cells(),
            columns = layout.columns,
            rows = layout.rows,
            used_length = layout.used_length,
            "character field constructed"
        );

        Ok(Self {
            mesh,
            params,
            blend,
            layout,
            time_step,
            time: 0.0,
            bound: false,
        })
    }

    /// Bind the atlas texture and its grid layout.
    ///
    /// On a layout mismatch the field is left unbound, so `update` fails
    /// until a valid bind succeeds.
    pub fn bind_atlas(
        &mut self,
        texture: TextureHandle,
        layout: AtlasLayout,
    ) -> Result<(), FieldError> {
        if let Err(e) = layout.validate() {
            tracing::warn!(error = %e, "atlas bind rejected; field unbound");
            self.bound = false;
            self.params.set_texture(None);
            return Err(e.into());
        }

        self.params.set_texture(Some(texture));
        write_layout(&mut self.params, &layout)?;
        self.layout = layout;
        self.bound = true;
        tracing::debug!(texture = texture.0, ?layout, "atlas bound");
        Ok(())
    }

    /// Advance one frame: time accumulator first, then the blend weights.
    pub fn update(&mut self, dt: f32) -> Result<(), FieldError> {
        if !self.bound {
            return Err(FieldError::AtlasNotBound);
        }
        let _span = tracing::info_span!("field_update").entered();

        self.time += f64::from(self.time_step.advance(dt));
        self.params.set_float(Param::Time, self.time as f32)?;
        self.blend.update(dt, &mut self.params);

        tracing::trace!(time = self.time, weights = ?self.blend.weights(), "field updated");
        Ok(())
    }

    /// Start blending toward animation channel `n` (1, 2 or 3).
    pub fn activate_animation(&mut self, n: u8) -> Result<(), FieldError> {
        self.blend.activate(n)?;
        Ok(())
    }

    pub fn weights(&self) -> [f32; 3] {
        self.blend.weights()
    }

    pub fn weight(&self, channel: BlendChannel) -> f32 {
        self.blend.weight(channel)
    }

    /// Read-only view of the blend state for control surfaces.
    pub fn blend(&self) -> &AnimationBlendController {
        &self.blend
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn layout(&self) -> &AtlasLayout {
        &self.layout
    }

    pub fn num_cells(&self) -> u32 {
        self.mesh.num_cells()
    }
}

impl Drawable for AnimatedCharacterField {
    fn geometry(&self) -> &QuadMesh {
        &self.mesh
    }

    fn parameters(&self) -> &ShaderParameterSet {
        &self.params
    }
}

fn write_layout(params: &mut ShaderParameterSet, layout: &AtlasLayout) -> Result<(), FieldError> {
    params.set_float(Param::GridColumns, layout.columns as f32)?;
    params.set_float(Param::GridRows, layout.rows as f32)?;
    params.set_float(Param::UsedLength, layout.used_length as f32)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use glyphfield_common::LayoutError;
    use glyphfield_render::ParamValue;

    fn layout(used: u32, columns: u32) -> AtlasLayout {
        AtlasLayout::for_glyph_count(used, columns, 128).unwrap()
    }

    fn seeded_field(cells: u32) -> AnimatedCharacterField {
        let config = FieldConfig {
            num_cells: cells,
            seed: Some(11),
            ..FieldConfig::default()
        };
        AnimatedCharacterField::from_config(&config, layout(65, 16)).unwrap()
    }

    #[test]
    fn construction_seeds_parameters() {
        let field = seeded_field(10);
        let params = field.parameters();
        assert_eq!(params.get("numCells").unwrap(), ParamValue::Float(10.0));
        assert_eq!(params.get("gridColumns").unwrap(), ParamValue::Float(16.0));
        assert_eq!(params.get("gridRows").unwrap(), ParamValue::Float(5.0));
        assert_eq!(params.get("usedLength").unwrap(), ParamValue::Float(65.0));
        assert_eq!(params.weights(), [1.0, 0.0, 0.0]);
        assert!(params.texture().is_none());
        assert!(!field.is_bound());
    }

    #[test]
    fn construction_rejects_bad_arguments() {
        let err = AnimatedCharacterField::new(0, 4.0, layout(10, 4)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err = AnimatedCharacterField::new(10, -4.0, layout(10, 4)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let bad = AtlasLayout {
            rows: 1,
            ..layout(10, 4)
        };
        let err = AnimatedCharacterField::new(10, 4.0, bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Layout);
    }

    #[test]
    fn update_requires_bound_atlas() {
        let mut field = seeded_field(4);
        assert_eq!(field.update(0.016), Err(FieldError::AtlasNotBound));
        assert_eq!(field.time(), 0.0);
    }

    #[test]
    fn bind_sets_texture_and_grid() {
        let mut field = seeded_field(4);
        field.bind_atlas(TextureHandle(9), layout(62, 16)).unwrap();
        let params = field.parameters();
        assert_eq!(params.texture(), Some(TextureHandle(9)));
        assert_eq!(params.get("gridRows").unwrap(), ParamValue::Float(4.0));
        assert_eq!(params.get("usedLength").unwrap(), ParamValue::Float(62.0));
        assert_eq!(field.layout().used_length, 62);
        assert!(field.is_bound());
    }

    #[test]
    fn failed_bind_unbinds() {
        let mut field = seeded_field(4);
        field.bind_atlas(TextureHandle(1), layout(65, 16)).unwrap();
        field.update(0.1).unwrap();

        let bad = AtlasLayout {
            rows: 4,
            ..layout(65, 16)
        };
        let err = field.bind_atlas(TextureHandle(2), bad).unwrap_err();
        assert!(matches!(
            err,
            FieldError::Layout(LayoutError::RowMismatch {
                expected: 5,
                found: 4,
                ..
            })
        ));
        assert!(!field.is_bound());
        assert!(field.parameters().texture().is_none());
        assert_eq!(field.update(0.1), Err(FieldError::AtlasNotBound));

        field.bind_atlas(TextureHandle(2), layout(65, 16)).unwrap();
        assert!(field.update(0.1).is_ok());
    }

    #[test]
    fn time_accumulates_monotonically() {
        let mut field = seeded_field(4);
        field.bind_atlas(TextureHandle(1), layout(65, 16)).unwrap();
        let mut prev = 0.0;
        for _ in 0..100 {
            field.update(1.0 / 60.0).unwrap();
            assert!(field.time() > prev);
            prev = field.time();
        }
        assert!((field.time() - 0.1).abs() < 1e-4);
        let time = field.parameters().float(Param::Time).unwrap();
        assert!((f64::from(time) - field.time()).abs() < 1e-6);
    }

    #[test]
    fn fixed_time_step_ignores_dt() {
        let config = FieldConfig {
            num_cells: 2,
            seed: Some(1),
            time_step: TimeStep::Fixed { per_tick: 0.001 },
            ..FieldConfig::default()
        };
        let mut field = AnimatedCharacterField::from_config(&config, layout(3, 3)).unwrap();
        field.bind_atlas(TextureHandle(0), layout(3, 3)).unwrap();
        field.update(5.0).unwrap();
        field.update(0.0).unwrap();
        assert!((field.time() - 0.002).abs() < 1e-9);
    }

    #[test]
    fn activation_flows_into_parameters() {
        let mut field = seeded_field(4);
        field.bind_atlas(TextureHandle(1), layout(65, 16)).unwrap();
        field.activate_animation(2).unwrap();
        for _ in 0..5 {
            field.update(0.25).unwrap();
        }
        assert_eq!(field.weights(), [0.0, 1.0, 0.0]);
        assert_eq!(field.weight(BlendChannel::Two), 1.0);
        assert_eq!(field.parameters().weights(), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn activation_range_checked() {
        let mut field = seeded_field(4);
        let err = field.activate_animation(4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert!(!field.blend().is_transitioning());
    }

    #[test]
    fn seeded_fields_share_geometry() {
        let a = seeded_field(32);
        let b = seeded_field(32);
        assert_eq!(a.geometry(), b.geometry());
        assert_eq!(a.num_cells(), 32);
    }

    #[test]
    fn invalid_time_step_rejected() {
        let config = FieldConfig {
            num_cells: 2,
            time_step: TimeStep::Scaled { factor: -1.0 },
            ..FieldConfig::default()
        };
        let err = AnimatedCharacterField::from_config(&config, layout(3, 3)).unwrap_err();
        assert!(matches!(err, FieldError::InvalidTimeStep(_)));
    }
}
