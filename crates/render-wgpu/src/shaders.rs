/// WGSL shader for textured, instanced meshes (crates, projectiles, floor,
/// marker).
pub const MESH_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var material_texture: texture_2d<f32>;
@group(1) @binding(1)
var material_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct InstanceInput {
    @location(3) model_0: vec4<f32>,
    @location(4) model_1: vec4<f32>,
    @location(5) model_2: vec4<f32>,
    @location(6) model_3: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_normal = normalize(world_normal);
    out.uv = vertex.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let light_dir = normalize(vec3<f32>(0.3, 1.0, 0.5));
    let ambient = 0.35;
    let diffuse = max(dot(in.world_normal, light_dir), 0.0);
    let lighting = ambient + diffuse * 0.65;
    let albedo = textureSample(material_texture, material_sampler, in.uv);
    return vec4<f32>(albedo.rgb * lighting, albedo.a);
}
"#;

/// Background the main pass clears to. The line shader fades toward it.
pub const CLEAR_COLOR: [f64; 3] = [0.1, 0.1, 0.15];

/// WGSL shader for the coordinate axes and floor grid. Lines fade into the
/// background between 30 and 90 units of view depth so the ±100 axes and
/// the grid edge do not end in a hard cut.
pub const LINE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

const FADE_START: f32 = 30.0;
const FADE_END: f32 = 90.0;
const BACKGROUND: vec3<f32> = vec3<f32>(0.1, 0.1, 0.15);

struct LineIn {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct LineOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) view_depth: f32,
};

@vertex
fn vs_line(v: LineIn) -> LineOut {
    let clip = uniforms.view_proj * vec4<f32>(v.position, 1.0);
    return LineOut(clip, v.color, clip.w);
}

@fragment
fn fs_line(in: LineOut) -> @location(0) vec4<f32> {
    let fade = smoothstep(FADE_START, FADE_END, in.view_depth);
    return vec4<f32>(mix(in.color.rgb, BACKGROUND, fade), 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_fade_matches_clear_color() {
        let [r, g, b] = CLEAR_COLOR;
        let literal = format!("vec3<f32>({r:?}, {g:?}, {b:?})");
        assert!(LINE_SHADER.contains(&literal), "missing {literal}");
    }

    #[test]
    fn entry_points_present() {
        for name in ["fn vs_main", "fn fs_main"] {
            assert!(MESH_SHADER.contains(name), "{name}");
        }
        for name in ["fn vs_line", "fn fs_line"] {
            assert!(LINE_SHADER.contains(name), "{name}");
        }
    }
}
