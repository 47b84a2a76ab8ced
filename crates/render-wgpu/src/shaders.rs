/// WGSL program for a character field.
///
/// Each cell is positioned by three vertex animations (a flat grid wall, a
/// rotating sphere and a drifting swirl) blended by `weight1..3`, then
/// textured with the atlas glyph picked from its per-cell random.
pub const FIELD_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    time: f32,
    num_cells: f32,
    grid_columns: f32,
    grid_rows: f32,
    used_length: f32,
    weight1: f32,
    weight2: f32,
    weight3: f32,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var atlas_texture: texture_2d<f32>;
@group(1) @binding(1)
var atlas_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) random: vec3<f32>,
    @location(3) cell_index: u32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) atlas_uv: vec2<f32>,
    @location(1) tint: vec3<f32>,
};

const PI: f32 = 3.14159265;
const GOLDEN_ANGLE: f32 = 2.39996323;

fn rotate_y(p: vec3<f32>, a: f32) -> vec3<f32> {
    let c = cos(a);
    let s = sin(a);
    return vec3<f32>(c * p.x + s * p.z, p.y, -s * p.x + c * p.z);
}

// Square wall facing the camera, rippling along z.
fn grid_wall(cell: f32, local: vec3<f32>, t: f32) -> vec3<f32> {
    let side = ceil(sqrt(uniforms.num_cells));
    let col = cell % side;
    let row = floor(cell / side);
    let spacing = 5.0;
    let origin = vec3<f32>((col - side * 0.5) * spacing, (side * 0.5 - row) * spacing, 0.0);
    let ripple = sin(col * 0.3 + t) * cos(row * 0.3 + t) * 4.0;
    return origin + local + vec3<f32>(0.0, 0.0, ripple);
}

// Fibonacci sphere, cells facing outward, slowly spinning.
fn sphere(cell: f32, local: vec3<f32>, t: f32) -> vec3<f32> {
    let n = max(uniforms.num_cells, 1.0);
    let y = 1.0 - (cell + 0.5) / n * 2.0;
    let r = sqrt(max(1.0 - y * y, 0.0));
    let theta = cell * GOLDEN_ANGLE;
    let radius = 70.0;
    let center = vec3<f32>(cos(theta) * r, y, sin(theta) * r) * radius;
    let facing = atan2(center.x, center.z);
    let p = center + rotate_y(local, facing);
    return rotate_y(p, t * 0.2);
}

// Cloud drifting around the y axis at per-cell speeds.
fn swirl(random: vec3<f32>, local: vec3<f32>, t: f32) -> vec3<f32> {
    let radius = 20.0 + random.x * 80.0;
    let angle = random.y * 2.0 * PI + t * (0.2 + random.z * 0.6);
    let height = (random.z - 0.5) * 120.0 + sin(t + random.x * 2.0 * PI) * 6.0;
    let center = vec3<f32>(cos(angle) * radius, height, sin(angle) * radius);
    return center + rotate_y(local, -angle);
}

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let t = uniforms.time * 20.0;
    let cell = f32(vertex.cell_index);

    let world_pos =
        grid_wall(cell, vertex.position, t) * uniforms.weight1 +
        sphere(cell, vertex.position, t) * uniforms.weight2 +
        swirl(vertex.random, vertex.position, t) * uniforms.weight3;

    // Glyph changes at a per-cell rate.
    let flips = floor(t * (0.1 + vertex.random.y * 0.4));
    let pick = fract(vertex.random.x + flips * 0.61803398);
    let used = max(uniforms.used_length, 1.0);
    let glyph = min(floor(pick * used), used - 1.0);
    let columns = max(uniforms.grid_columns, 1.0);
    let rows = max(uniforms.grid_rows, 1.0);
    let col = glyph % columns;
    let row = floor(glyph / columns);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(world_pos, 1.0);
    out.atlas_uv = vec2<f32>((col + vertex.uv.x) / columns, (row + vertex.uv.y) / rows);
    out.tint = mix(vec3<f32>(0.55, 0.8, 1.0), vec3<f32>(1.0, 0.85, 0.5), vertex.random.z);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(atlas_texture, atlas_sampler, in.atlas_uv);
    if texel.a < 0.05 {
        discard;
    }
    return vec4<f32>(texel.rgb * in.tint, texel.a);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_declares_every_scalar_parameter() {
        for name in [
            "time",
            "num_cells",
            "grid_columns",
            "grid_rows",
            "used_length",
            "weight1",
            "weight2",
            "weight3",
        ] {
            assert!(
                FIELD_SHADER.contains(&format!("{name}: f32")),
                "missing uniform {name}"
            );
        }
    }

    #[test]
    fn shader_entry_points_present() {
        assert!(FIELD_SHADER.contains("fn vs_main"));
        assert!(FIELD_SHADER.contains("fn fs_main"));
    }
}
