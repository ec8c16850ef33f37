// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Recorded drawing.

Scenes bind state on a [RenderContext] the way they would on an immediate-mode context and
then call [RenderContext::draw].  Each draw snapshots the bound state into a [DrawCall]; the
finished [Frame] is what the backend replays at present time.
*/

use glam::Mat4;

use crate::gpu::Device;

/**
Per-draw shader constants.

One layout serves every program: programs read the parts they declared and ignore the rest.
*/
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ConstantBlock {
    /// Column-major, applied as `transform * position`.
    pub transform: [[f32; 4]; 4],
    pub paint_color: [f32; 4],
}

impl ConstantBlock {
    pub const IDENTITY: ConstantBlock = ConstantBlock {
        transform: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
        paint_color: [1.0, 1.0, 1.0, 1.0],
    };

    pub fn with_transform(self, transform: Mat4) -> Self {
        ConstantBlock {
            transform: transform.to_cols_array_2d(),
            ..self
        }
    }

    pub fn with_paint_color(self, paint_color: [f32; 4]) -> Self {
        ConstantBlock { paint_color, ..self }
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.transform)
    }
}

impl Default for ConstantBlock {
    fn default() -> Self {
        ConstantBlock::IDENTITY
    }
}

/// One recorded draw.
pub struct DrawCall<D: Device> {
    pub program: D::Program,
    pub constants: ConstantBlock,
    pub texture: Option<D::Texture>,
    pub sampler: Option<D::Sampler>,
    pub blend: Option<D::BlendState>,
    pub vertex_buffer: D::Buffer,
    pub vertex_count: u32,
    pub first_vertex: u32,
}

impl<D: Device> Clone for DrawCall<D> {
    fn clone(&self) -> Self {
        DrawCall {
            program: self.program.clone(),
            constants: self.constants,
            texture: self.texture.clone(),
            sampler: self.sampler.clone(),
            blend: self.blend.clone(),
            vertex_buffer: self.vertex_buffer.clone(),
            vertex_count: self.vertex_count,
            first_vertex: self.first_vertex,
        }
    }
}

impl<D: Device> std::fmt::Debug for DrawCall<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawCall")
            .field("program", &self.program)
            .field("constants", &self.constants)
            .field("texture", &self.texture)
            .field("sampler", &self.sampler)
            .field("blend", &self.blend)
            .field("vertex_buffer", &self.vertex_buffer)
            .field("vertex_count", &self.vertex_count)
            .field("first_vertex", &self.first_vertex)
            .finish()
    }
}

/// Everything drawn in one frame, in order.
pub struct Frame<D: Device> {
    pub clear_color: [f32; 4],
    pub draws: Vec<DrawCall<D>>,
}

impl<D: Device> std::fmt::Debug for Frame<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("clear_color", &self.clear_color)
            .field("draws", &self.draws)
            .finish()
    }
}

/**
Bind points for the next draw.

State persists across draws until it is rebound, matching an immediate-mode context.
*/
pub struct RenderContext<D: Device> {
    program: Option<(D::Program, ConstantBlock)>,
    texture: Option<D::Texture>,
    sampler: Option<D::Sampler>,
    blend: Option<D::BlendState>,
    vertex_buffer: Option<D::Buffer>,
    frame: Frame<D>,
}

impl<D: Device> RenderContext<D> {
    pub fn new(clear_color: [f32; 4]) -> Self {
        RenderContext {
            program: None,
            texture: None,
            sampler: None,
            blend: None,
            vertex_buffer: None,
            frame: Frame {
                clear_color,
                draws: Vec::new(),
            },
        }
    }

    /// Binds a program with the constants it should see.
    pub fn set_program(&mut self, program: &D::Program, constants: ConstantBlock) {
        self.program = Some((program.clone(), constants));
    }

    /// Replaces the constants of the bound program.  No-op without a program.
    pub fn set_constants(&mut self, constants: ConstantBlock) {
        if let Some((_, bound)) = self.program.as_mut() {
            *bound = constants;
        }
    }

    pub fn set_texture(&mut self, texture: &D::Texture) {
        self.texture = Some(texture.clone());
    }

    pub fn set_sampler(&mut self, sampler: &D::Sampler) {
        self.sampler = Some(sampler.clone());
    }

    pub fn set_blend_state(&mut self, blend: &D::BlendState) {
        self.blend = Some(blend.clone());
    }

    pub fn set_vertex_buffer(&mut self, buffer: &D::Buffer) {
        self.vertex_buffer = Some(buffer.clone());
    }

    /**
    Records a draw of `vertex_count` vertices starting at `first_vertex`.

    Without a bound program or vertex buffer nothing is recorded and `false` is returned.
    Empty draws are dropped too.
    */
    pub fn draw(&mut self, vertex_count: u32, first_vertex: u32) -> bool {
        let (Some((program, constants)), Some(vertex_buffer)) = (&self.program, &self.vertex_buffer) else {
            logwise::warn_sync!("Draw issued without a program or vertex buffer bound");
            return false;
        };
        if vertex_count == 0 {
            return false;
        }
        self.frame.draws.push(DrawCall {
            program: program.clone(),
            constants: *constants,
            texture: self.texture.clone(),
            sampler: self.sampler.clone(),
            blend: self.blend.clone(),
            vertex_buffer: vertex_buffer.clone(),
            vertex_count,
            first_vertex,
        });
        true
    }

    /// Draws recorded so far.
    pub fn draws(&self) -> &[DrawCall<D>] {
        &self.frame.draws
    }

    pub fn finish(self) -> Frame<D> {
        self.frame
    }
}
