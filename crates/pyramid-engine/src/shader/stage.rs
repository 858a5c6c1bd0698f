use std::fmt;

use naga::valid::{Capabilities, ModuleInfo, ValidationFlags, Validator};

use super::ShaderError;

/// Pipeline stage a shader source is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub(crate) fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed and validated WGSL shader for one stage.
///
/// This is the opaque handle `link` consumes. It owns the naga IR used for
/// interface checks and uniform reflection, plus the source handed to wgpu.
#[derive(Debug)]
pub struct CompiledShader {
    stage: ShaderStage,
    source: String,
    module: naga::Module,
    info: ModuleInfo,
    entry_index: usize,
}

impl CompiledShader {
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Name of the entry point for this stage.
    pub fn entry_point(&self) -> &str {
        &self.module.entry_points[self.entry_index].name
    }

    pub(crate) fn module(&self) -> &naga::Module {
        &self.module
    }

    pub(crate) fn entry(&self) -> &naga::EntryPoint {
        &self.module.entry_points[self.entry_index]
    }

    /// Whether the stage's entry point reads or writes `var`.
    pub(crate) fn uses(&self, var: naga::Handle<naga::GlobalVariable>) -> bool {
        !self.info.get_entry_point(self.entry_index)[var].is_empty()
    }
}

/// Parses and validates `source` as a WGSL shader for `stage`.
///
/// The first entry point declared for the stage is used.
pub fn compile(source: &str, stage: ShaderStage) -> Result<CompiledShader, ShaderError> {
    let compile_err = |message: String| ShaderError::Compile { stage, message };

    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| compile_err(e.emit_to_string(source)))?;

    let info = Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|e| compile_err(e.emit_to_string(source)))?;

    let entry_index = module
        .entry_points
        .iter()
        .position(|ep| ep.stage == stage.to_naga())
        .ok_or_else(|| compile_err(format!("no @{stage} entry point")))?;

    log::debug!(
        "compiled {stage} shader (entry `{}`)",
        module.entry_points[entry_index].name
    );

    Ok(CompiledShader {
        stage,
        source: source.to_owned(),
        module,
        info,
        entry_index,
    })
}
