//! The viewer's frame loop: one-time setup, then update + draw every tick.

use anyhow::Context;
use glam::Mat4;

use pyramid_engine::coords::Resolution;
use pyramid_engine::core::{App, AppControl, FrameCtx, SetupCtx};
use pyramid_engine::input::{InputSnapshot, Key};
use pyramid_engine::render::TextureImage;
use pyramid_engine::shader::{
    compile, CompiledShader, ProgramTargets, ShaderError, ShaderProgram, ShaderStage,
    UniformBlock, UniformSlot,
};

use crate::config::{TextureSource, ViewerConfig};
use crate::frame::{update, FrameContext, UpdateParams};
use crate::kernel::Kernel;
use crate::mesh::{PyramidMesh, PyramidVertex};

pub const VERTEX_SHADER: &str = include_str!("../shaders/pyramid.vert.wgsl");
pub const FRAGMENT_SHADER: &str = include_str!("../shaders/pyramid.frag.wgsl");

const CHECKER_SIZE: u32 = 256;
const CHECKER_CELLS: u32 = 8;
const CHECKER_LIGHT: [u8; 4] = [235, 200, 120, 255];
const CHECKER_DARK: [u8; 4] = [120, 70, 40, 255];

/// Compiles the embedded shader pair.
pub fn compile_shaders() -> Result<(CompiledShader, CompiledShader), ShaderError> {
    let vs = compile(VERTEX_SHADER, ShaderStage::Vertex)?;
    let fs = compile(FRAGMENT_SHADER, ShaderStage::Fragment)?;
    Ok((vs, fs))
}

/// Loads the configured texture, falling back to the checkerboard when the
/// file cannot be decoded or has a side longer than `max_dimension`.
pub fn load_texture(source: &TextureSource, max_dimension: u32) -> TextureImage {
    match source {
        TextureSource::Checkerboard => checkerboard(),
        TextureSource::File(path) => match TextureImage::load(path)
            .and_then(|image| image.check_fits(max_dimension).map(|()| image))
        {
            Ok(image) => {
                log::info!("texture {} ({}x{})", path.display(), image.width(), image.height());
                image
            }
            Err(e) => {
                log::warn!("{e}; using the checkerboard texture");
                checkerboard()
            }
        },
    }
}

fn checkerboard() -> TextureImage {
    TextureImage::checkerboard(CHECKER_SIZE, CHECKER_CELLS, CHECKER_LIGHT, CHECKER_DARK)
}

/// Uniforms pushed once before the first frame. `uMVM` starts as identity.
pub fn push_initial_uniforms(
    block: &mut UniformBlock,
    resolution: Resolution,
    kernel: &Kernel,
    projection: Mat4,
) {
    block.set_vec2(UniformSlot::Resolution, resolution.as_f32());
    block.set_kernel(UniformSlot::Kernel, kernel.values());
    block.set_f32(UniformSlot::KernelWeight, kernel.weight());
    block.set_mat4(UniformSlot::Projection, projection.to_cols_array());
    block.set_mat4(UniformSlot::ModelView, Mat4::IDENTITY.to_cols_array());
}

/// Pre-render half of a tick: exit on Escape, otherwise advance `frame` and
/// stage its uniforms. Nothing is touched when exiting.
pub fn tick(
    frame: &mut FrameContext,
    uniforms: &mut UniformBlock,
    params: &UpdateParams,
    input: &InputSnapshot,
    elapsed: f32,
) -> AppControl {
    if input.key_down(Key::Escape) {
        return AppControl::Exit;
    }

    update(frame, input, elapsed, params);
    push_frame_uniforms(uniforms, frame);
    AppControl::Continue
}

/// Uniforms that change every tick.
pub fn push_frame_uniforms(block: &mut UniformBlock, frame: &FrameContext) {
    block.set_f32(UniformSlot::Time, frame.elapsed);
    block.set_vec2(UniformSlot::Pos, frame.pos.to_array());
    block.set_vec2(UniformSlot::Mouse, frame.mouse.to_array());
    block.set_mat4(UniformSlot::ModelView, frame.model_view.to_cols_array());
}

struct Scene {
    program: ShaderProgram,
    mesh: PyramidMesh,
    frame: FrameContext,
    params: UpdateParams,
}

enum LoopState {
    Uninitialized,
    Running(Box<Scene>),
}

/// Renders the rotating pyramid.
pub struct FrameLoop {
    config: ViewerConfig,
    state: LoopState,
}

impl FrameLoop {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            state: LoopState::Uninitialized,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running(_))
    }

    /// Current scene state, once running.
    pub fn frame(&self) -> Option<&FrameContext> {
        match &self.state {
            LoopState::Running(scene) => Some(&scene.frame),
            LoopState::Uninitialized => None,
        }
    }
}

impl App for FrameLoop {
    fn setup(&mut self, ctx: &mut SetupCtx<'_, '_>) -> anyhow::Result<()> {
        if self.is_running() {
            return Ok(());
        }

        let (vs, fs) = compile_shaders().context("failed to compile pyramid shaders")?;

        let rctx = ctx.render_ctx();
        let vertex_buffers = [PyramidVertex::layout()];
        let targets = ProgramTargets {
            color_format: rctx.surface_format,
            depth_format: Some(rctx.depth_format),
            vertex_buffers: &vertex_buffers,
        };
        let mut program = ShaderProgram::link(rctx.device, &vs, &fs, &targets)
            .context("failed to link pyramid shaders")?;

        let image = load_texture(
            &self.config.texture,
            rctx.device.limits().max_texture_dimension_2d,
        );
        let mesh = PyramidMesh::setup(&rctx, &program, &image)
            .context("failed to upload pyramid texture")?;
        if let Some(group) = program.texture_group(UniformSlot::Sampler) {
            log::debug!("uSampler bound at group {group}");
        }

        let resolution = ctx.resolution;
        let projection = self.config.projection.matrix(resolution.aspect());
        let kernel = self.config.kernel.kernel();
        push_initial_uniforms(program.uniforms_mut(), resolution, &kernel, projection);

        log::info!(
            "scene ready: {}x{}, kernel `{}` (weight {})",
            resolution.width(),
            resolution.height(),
            self.config.kernel,
            kernel.weight()
        );

        self.state = LoopState::Running(Box::new(Scene {
            program,
            mesh,
            frame: FrameContext::new(projection),
            params: UpdateParams {
                resolution,
                keys: self.config.keys,
                speed: self.config.speed,
            },
        }));
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let LoopState::Running(scene) = &mut self.state else {
            return AppControl::Continue;
        };

        let control = tick(
            &mut scene.frame,
            scene.program.uniforms_mut(),
            &scene.params,
            &ctx.input,
            ctx.time.elapsed,
        );
        if control == AppControl::Exit {
            log::info!("escape pressed, exiting");
            return AppControl::Exit;
        }

        let program = &mut scene.program;
        let mesh = &scene.mesh;
        ctx.render(self.config.clear_color, |rctx, rpass| {
            program.flush(rctx.queue);
            program.bind(rpass);
            mesh.render(rpass);
        })
    }
}
