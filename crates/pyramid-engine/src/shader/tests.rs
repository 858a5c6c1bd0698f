use super::*;

const UNIFORMS: &str = r#"
struct Uniforms {
    uPM: mat4x4<f32>,
    uMVM: mat4x4<f32>,
    uKernel: array<vec4<f32>, 3>,
    uResolution: vec2<f32>,
    uMouse: vec2<f32>,
    uPos: vec2<f32>,
    uTime: f32,
    uKernelWeight: f32,
}

@group(0) @binding(0) var<uniform> u: Uniforms;
"#;

const VERTEX_BODY: &str = r#"
struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) uv: vec2<f32>) -> VsOut {
    var out: VsOut;
    out.clip = u.uPM * u.uMVM * vec4<f32>(position, 1.0);
    out.uv = uv;
    return out;
}
"#;

const FRAGMENT_BODY: &str = r#"
@group(1) @binding(0) var uSampler: texture_2d<f32>;
@group(1) @binding(1) var uSamplerState: sampler;

@fragment
fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
    return textureSample(uSampler, uSamplerState, uv) * (0.9 + 0.1 * sin(u.uTime));
}
"#;

const PLAIN_FRAGMENT: &str = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 1.0, 1.0, 1.0);
}
"#;

fn vertex() -> CompiledShader {
    compile(&format!("{UNIFORMS}{VERTEX_BODY}"), ShaderStage::Vertex).unwrap()
}

fn fragment() -> CompiledShader {
    compile(&format!("{UNIFORMS}{FRAGMENT_BODY}"), ShaderStage::Fragment).unwrap()
}

fn link_err(vs: &CompiledShader, fs: &CompiledShader) -> String {
    match ProgramInterface::link(vs, fs) {
        Err(ShaderError::Link(msg)) => msg,
        other => panic!("expected a link error, got {other:?}"),
    }
}

// ── compile ───────────────────────────────────────────────────────────────

#[test]
fn compile_reports_entry_point() {
    assert_eq!(vertex().entry_point(), "vs_main");
    assert_eq!(fragment().entry_point(), "fs_main");
}

#[test]
fn compile_rejects_syntax_errors() {
    let err = compile("fn broken( {", ShaderStage::Vertex).unwrap_err();
    assert!(matches!(err, ShaderError::Compile { stage: ShaderStage::Vertex, .. }));
}

#[test]
fn compile_rejects_type_errors() {
    let src = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    let x: f32 = vec2<f32>(1.0, 2.0);
    return vec4<f32>(x);
}
"#;
    let err = compile(src, ShaderStage::Fragment).unwrap_err();
    assert!(matches!(err, ShaderError::Compile { stage: ShaderStage::Fragment, .. }));
}

#[test]
fn compile_requires_entry_point_for_stage() {
    let err = compile(PLAIN_FRAGMENT, ShaderStage::Vertex).unwrap_err();
    match err {
        ShaderError::Compile { stage, message } => {
            assert_eq!(stage, ShaderStage::Vertex);
            assert!(message.contains("@vertex"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

// ── link ──────────────────────────────────────────────────────────────────

#[test]
fn pair_links_and_resolves_every_uniform() {
    let program = ProgramInterface::link(&vertex(), &fragment()).unwrap();
    for slot in UniformSlot::ALL {
        assert!(program.uniforms.resolve(slot.name()).is_some(), "{slot} not resolved");
    }
    assert_eq!(program.vertex_entry, "vs_main");
    assert_eq!(program.fragment_entry, "fs_main");
}

#[test]
fn uniform_offsets_follow_wgsl_layout() {
    let table = ProgramInterface::link(&vertex(), &fragment()).unwrap().uniforms;
    let offset = |slot: UniformSlot| match table.get(slot) {
        Some(UniformLocation::Block { offset, .. }) => offset,
        other => panic!("{slot}: {other:?}"),
    };
    assert_eq!(offset(UniformSlot::Projection), 0);
    assert_eq!(offset(UniformSlot::ModelView), 64);
    assert_eq!(offset(UniformSlot::Kernel), 128);
    assert_eq!(offset(UniformSlot::Resolution), 176);
    assert_eq!(offset(UniformSlot::Mouse), 184);
    assert_eq!(offset(UniformSlot::Pos), 192);
    assert_eq!(offset(UniformSlot::Time), 200);
    assert_eq!(offset(UniformSlot::KernelWeight), 204);
    assert_eq!(table.block(), Some(BlockBinding { group: 0, binding: 0, size: 208 }));
}

#[test]
fn sampler_resolves_to_texture_group() {
    let table = ProgramInterface::link(&vertex(), &fragment()).unwrap().uniforms;
    assert_eq!(
        table.get(UniformSlot::Sampler),
        Some(UniformLocation::Texture { group: 1, binding: 0, sampler_binding: Some(1) })
    );
    assert_eq!(table.texture_group(UniformSlot::Sampler), Some(1));
}

#[test]
fn unknown_and_absent_uniforms_resolve_to_none() {
    let vs = compile(
        r#"
struct Small {
    uPM: mat4x4<f32>,
    uTime: f32,
}
@group(0) @binding(0) var<uniform> u: Small;

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return u.uPM * vec4<f32>(position, u.uTime);
}
"#,
        ShaderStage::Vertex,
    )
    .unwrap();
    let fs = compile(PLAIN_FRAGMENT, ShaderStage::Fragment).unwrap();

    let table = ProgramInterface::link(&vs, &fs).unwrap().uniforms;
    assert_eq!(table.resolve("uMouse"), None);
    assert_eq!(table.resolve("uSampler"), None);
    assert_eq!(table.resolve("uSomethingElse"), None);
    assert_eq!(
        table.resolve("uTime"),
        Some(UniformLocation::Block { offset: 64, kind: UniformKind::Float })
    );
    assert_eq!(table.block().map(|b| b.size), Some(80));
}

#[test]
fn program_without_uniforms_has_no_block() {
    let vs = compile(
        r#"
@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position, 1.0);
}
"#,
        ShaderStage::Vertex,
    )
    .unwrap();
    let fs = compile(PLAIN_FRAGMENT, ShaderStage::Fragment).unwrap();

    let table = ProgramInterface::link(&vs, &fs).unwrap().uniforms;
    assert_eq!(table.block(), None);
    assert!(UniformSlot::ALL.iter().all(|s| table.get(*s).is_none()));
}

#[test]
fn link_rejects_swapped_stages() {
    let msg = link_err(&fragment(), &vertex());
    assert!(msg.contains("expected a vertex shader"));
}

#[test]
fn link_rejects_missing_varying() {
    let fs = compile(
        r#"
@fragment
fn fs_main(@location(3) tint: vec4<f32>) -> @location(0) vec4<f32> {
    return tint;
}
"#,
        ShaderStage::Fragment,
    )
    .unwrap();
    let msg = link_err(&vertex(), &fs);
    assert!(msg.contains("@location(3)"));
}

#[test]
fn link_rejects_varying_type_mismatch() {
    let fs = compile(
        r#"
@fragment
fn fs_main(@location(0) uv: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(uv, 1.0);
}
"#,
        ShaderStage::Fragment,
    )
    .unwrap();
    let msg = link_err(&vertex(), &fs);
    assert!(msg.contains("@location(0)"));
}

#[test]
fn link_rejects_disagreeing_uniform_blocks() {
    let fs = compile(
        &format!(
            r#"
struct Uniforms {{
    uMVM: mat4x4<f32>,
    uPM: mat4x4<f32>,
    uKernel: array<vec4<f32>, 3>,
    uResolution: vec2<f32>,
    uMouse: vec2<f32>,
    uPos: vec2<f32>,
    uTime: f32,
    uKernelWeight: f32,
}}
@group(0) @binding(0) var<uniform> u: Uniforms;
{FRAGMENT_BODY}"#
        ),
        ShaderStage::Fragment,
    )
    .unwrap();
    let msg = link_err(&vertex(), &fs);
    assert!(msg.contains("declared differently"));
}

#[test]
fn link_rejects_mistyped_known_uniform() {
    let vs = compile(
        r#"
struct Bad {
    uPM: mat4x4<f32>,
    uTime: vec2<f32>,
}
@group(0) @binding(0) var<uniform> u: Bad;

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return u.uPM * vec4<f32>(position, u.uTime.x);
}
"#,
        ShaderStage::Vertex,
    )
    .unwrap();
    let fs = compile(PLAIN_FRAGMENT, ShaderStage::Fragment).unwrap();
    let msg = link_err(&vs, &fs);
    assert!(msg.contains("uTime"));
}
