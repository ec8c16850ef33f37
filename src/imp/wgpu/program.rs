// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::geometry::VertexTexCoord;
use crate::gpu::{ConstantStages, GpuError, ProgramDescriptor};
use crate::imp::wgpu::bound_device::WgpuDevice;
use crate::imp::wgpu::error::scoped;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<VertexTexCoord>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

type PipelineKey = (wgpu::TextureFormat, Option<wgpu::BlendState>);

#[derive(Debug)]
struct Inner {
    label: String,
    constants: ConstantStages,
    vertex: wgpu::ShaderModule,
    fragment: wgpu::ShaderModule,
    pipelines: Mutex<HashMap<PipelineKey, wgpu::RenderPipeline>>,
}

/**
A compiled vertex/pixel shader pair.

Render pipelines depend on the target format and blend state, neither of which is known when
the program is built, so they are created on first use and kept per combination.
*/
#[derive(Debug, Clone)]
pub struct WgpuProgram(Arc<Inner>);

fn module(device: &wgpu::Device, label: &str, stage: &'static str, source: &[u8]) -> Result<wgpu::ShaderModule, GpuError> {
    let text = std::str::from_utf8(source).map_err(|e| GpuError::create("shader", label, e))?;
    let module_label = format!("{label} {stage}");
    scoped(device, "shader", &module_label, || {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&module_label),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(text)),
        })
    })
}

impl WgpuProgram {
    pub(super) fn new(device: &wgpu::Device, descriptor: &ProgramDescriptor<'_>) -> Result<Self, GpuError> {
        let vertex = module(device, descriptor.label, "vertex", descriptor.vertex_source)?;
        let fragment = module(device, descriptor.label, "pixel", descriptor.fragment_source)?;
        Ok(WgpuProgram(Arc::new(Inner {
            label: descriptor.label.to_string(),
            constants: descriptor.constants,
            vertex,
            fragment,
            pipelines: Mutex::new(HashMap::new()),
        })))
    }

    pub fn label(&self) -> &str {
        &self.0.label
    }

    pub fn constants(&self) -> ConstantStages {
        self.0.constants
    }

    pub(super) fn pipeline(
        &self,
        device: &WgpuDevice,
        format: wgpu::TextureFormat,
        blend: Option<wgpu::BlendState>,
    ) -> Result<wgpu::RenderPipeline, GpuError> {
        let mut pipelines = self.0.pipelines.lock().unwrap();
        if let Some(pipeline) = pipelines.get(&(format, blend)) {
            return Ok(pipeline.clone());
        }
        let g = logwise::perfwarn_begin!("create render pipeline");
        let pipeline = scoped(device.device(), "render pipeline", &self.0.label, || {
            device.device().create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&self.0.label),
                layout: Some(&device.layouts().pipeline),
                vertex: wgpu::VertexState {
                    module: &self.0.vertex,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[vertex_layout()],
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &self.0.fragment,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                multiview: None,
                cache: None,
            })
        });
        drop(g);
        let pipeline = pipeline?;
        pipelines.insert((format, blend), pipeline.clone());
        Ok(pipeline)
    }
}
