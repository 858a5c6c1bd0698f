use std::collections::BTreeMap;

use naga::{AddressSpace, ArraySize, Binding, Handle, Module, Scalar, Type, TypeInner, VectorSize};

use super::uniforms::{BlockBinding, UniformKind, UniformLocation, UniformSlot, UniformTable};
use super::{CompiledShader, ShaderError, ShaderStage};

/// GPU-independent result of linking a vertex and a fragment shader.
///
/// Holds the entry points and the uniform table; the GPU pipeline is built
/// from it by [`ShaderProgram::link`](super::ShaderProgram::link).
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramInterface {
    pub vertex_entry: String,
    pub fragment_entry: String,
    pub uniforms: UniformTable,
}

impl ProgramInterface {
    /// Checks that the two stages fit together and resolves every uniform slot.
    pub fn link(vertex: &CompiledShader, fragment: &CompiledShader) -> Result<Self, ShaderError> {
        if vertex.stage() != ShaderStage::Vertex {
            return Err(ShaderError::link(format!(
                "expected a vertex shader, got a {} shader",
                vertex.stage()
            )));
        }
        if fragment.stage() != ShaderStage::Fragment {
            return Err(ShaderError::link(format!(
                "expected a fragment shader, got a {} shader",
                fragment.stage()
            )));
        }

        check_varyings(vertex, fragment)?;
        let uniforms = reflect_uniforms(&[vertex, fragment])?;

        Ok(Self {
            vertex_entry: vertex.entry_point().to_owned(),
            fragment_entry: fragment.entry_point().to_owned(),
            uniforms,
        })
    }
}

// ── type shapes ───────────────────────────────────────────────────────────

/// Module-independent description of a type, comparable across stages.
#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Scalar(Scalar),
    Vector(VectorSize, Scalar),
    Matrix(VectorSize, VectorSize, Scalar),
    Array {
        base: Box<Shape>,
        len: Option<u32>,
        stride: u32,
    },
    Image,
    Sampler,
    Struct(Vec<(Option<String>, u32, Shape)>),
    Other,
}

fn shape(module: &Module, ty: Handle<Type>) -> Shape {
    match &module.types[ty].inner {
        TypeInner::Scalar(s) => Shape::Scalar(*s),
        TypeInner::Vector { size, scalar } => Shape::Vector(*size, *scalar),
        TypeInner::Matrix { columns, rows, scalar } => Shape::Matrix(*columns, *rows, *scalar),
        TypeInner::Array { base, size, stride } => Shape::Array {
            base: Box::new(shape(module, *base)),
            len: match size {
                ArraySize::Constant(n) => Some(n.get()),
                _ => None,
            },
            stride: *stride,
        },
        TypeInner::Image { .. } => Shape::Image,
        TypeInner::Sampler { .. } => Shape::Sampler,
        TypeInner::Struct { members, .. } => Shape::Struct(
            members
                .iter()
                .map(|m| (m.name.clone(), m.offset, shape(module, m.ty)))
                .collect(),
        ),
        _ => Shape::Other,
    }
}

fn expected_shape(kind: UniformKind) -> Shape {
    match kind {
        UniformKind::Texture => Shape::Image,
        UniformKind::Float => Shape::Scalar(Scalar::F32),
        UniformKind::Vec2 => Shape::Vector(VectorSize::Bi, Scalar::F32),
        UniformKind::Mat4 => Shape::Matrix(VectorSize::Quad, VectorSize::Quad, Scalar::F32),
        UniformKind::Kernel3x3 => Shape::Array {
            base: Box::new(Shape::Vector(VectorSize::Quad, Scalar::F32)),
            len: Some(3),
            stride: 16,
        },
    }
}

// ── varyings ──────────────────────────────────────────────────────────────

/// Collects `@location` bindings of a value, expanding structs one level.
fn locations(
    module: &Module,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut BTreeMap<u32, Shape>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => {
            out.insert(*location, shape(module, ty));
        }
        Some(_) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    locations(module, m.ty, m.binding.as_ref(), out);
                }
            }
        }
    }
}

fn check_varyings(vertex: &CompiledShader, fragment: &CompiledShader) -> Result<(), ShaderError> {
    let mut outputs = BTreeMap::new();
    if let Some(result) = &vertex.entry().function.result {
        locations(vertex.module(), result.ty, result.binding.as_ref(), &mut outputs);
    }

    let mut inputs = BTreeMap::new();
    for arg in &fragment.entry().function.arguments {
        locations(fragment.module(), arg.ty, arg.binding.as_ref(), &mut inputs);
    }

    for (location, input) in &inputs {
        match outputs.get(location) {
            None => {
                return Err(ShaderError::link(format!(
                    "fragment input @location({location}) is not written by the vertex stage"
                )));
            }
            Some(output) if output != input => {
                return Err(ShaderError::link(format!(
                    "@location({location}) is {output:?} in the vertex stage but {input:?} in the fragment stage"
                )));
            }
            Some(_) => {}
        }
    }

    Ok(())
}

// ── uniforms ──────────────────────────────────────────────────────────────

struct BlockDecl {
    binding: BlockBinding,
    members: Shape,
    used: bool,
}

fn reflect_uniforms(stages: &[&CompiledShader]) -> Result<UniformTable, ShaderError> {
    let mut block: Option<BlockDecl> = None;
    let mut textures: BTreeMap<UniformSlot, (u32, u32)> = BTreeMap::new();
    let mut samplers: BTreeMap<u32, u32> = BTreeMap::new();

    for stage in stages {
        let module = stage.module();

        for (handle, var) in module.global_variables.iter() {
            let Some(rb) = var.binding.as_ref() else { continue };
            let used = stage.uses(handle);

            match var.space {
                AddressSpace::Uniform => {
                    let size = match &module.types[var.ty].inner {
                        TypeInner::Struct { span, .. } => *span,
                        _ => {
                            log::debug!(
                                "ignoring non-struct uniform {:?} in {} stage",
                                var.name,
                                stage.stage()
                            );
                            continue;
                        }
                    };
                    let decl = BlockDecl {
                        binding: BlockBinding { group: rb.group, binding: rb.binding, size },
                        members: shape(module, var.ty),
                        used,
                    };
                    block = Some(merge_block(block, decl)?);
                }

                AddressSpace::Handle if used => match shape(module, var.ty) {
                    Shape::Image => {
                        let slot = var.name.as_deref().and_then(UniformSlot::from_name);
                        if let Some(slot) = slot.filter(|s| s.kind() == UniformKind::Texture) {
                            textures.insert(slot, (rb.group, rb.binding));
                        }
                    }
                    Shape::Sampler => {
                        samplers.entry(rb.group).or_insert(rb.binding);
                    }
                    _ => {}
                },

                _ => {}
            }
        }
    }

    let block = block.filter(|b| b.used);
    let mut table = UniformTable::new(block.as_ref().map(|b| b.binding));

    if let Some(Shape::Struct(members)) = block.map(|b| b.members) {
        for (name, offset, member) in members {
            let Some(slot) = name.as_deref().and_then(UniformSlot::from_name) else {
                continue;
            };
            let kind = slot.kind();
            if member != expected_shape(kind) {
                return Err(ShaderError::link(format!(
                    "uniform {slot} is declared as {member:?}, expected {kind:?}"
                )));
            }
            table.insert(slot, UniformLocation::Block { offset, kind });
        }
    }

    for (slot, (group, binding)) in textures {
        table.insert(
            slot,
            UniformLocation::Texture {
                group,
                binding,
                sampler_binding: samplers.get(&group).copied(),
            },
        );
    }

    Ok(table)
}

fn merge_block(existing: Option<BlockDecl>, decl: BlockDecl) -> Result<BlockDecl, ShaderError> {
    let Some(existing) = existing else {
        return Ok(decl);
    };

    let (a, b) = (existing.binding, decl.binding);
    if (a.group, a.binding) != (b.group, b.binding) {
        return Err(ShaderError::link(format!(
            "uniforms split across blocks @group({}) @binding({}) and @group({}) @binding({})",
            a.group, a.binding, b.group, b.binding
        )));
    }
    if a.size != b.size || existing.members != decl.members {
        return Err(ShaderError::link(format!(
            "uniform block @group({}) @binding({}) is declared differently in the two stages",
            a.group, a.binding
        )));
    }

    Ok(BlockDecl {
        used: existing.used || decl.used,
        ..existing
    })
}
