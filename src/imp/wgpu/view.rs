// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use std::sync::Arc;

use crate::display::{PixelExtent, Rotation};
use crate::gpu::{ConstantBlock, Device, Frame, GpuError, SwapChainError};
use crate::imp::wgpu::bound_device::WgpuDevice;
use crate::imp::wgpu::entry_point::EntryPoint;

/// Per-frame constant storage, grown when a frame has more draws than fit.
#[derive(Debug)]
struct Constants {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    capacity: usize,
}

/**
The window's surface and its configuration.

wgpu surfaces can't be pre-rotated, so the rotation only decides the configured extent;
content is rotated by the orientation transforms the scenes apply.
*/
#[derive(Debug)]
pub struct WgpuSwapChain {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    rotation: Rotation,
    constants: Option<Constants>,
}

fn stride(device: &WgpuDevice) -> usize {
    let alignment = device.device().limits().min_uniform_buffer_offset_alignment as usize;
    size_of::<ConstantBlock>().div_ceil(alignment) * alignment
}

impl WgpuSwapChain {
    pub(super) fn new(
        entry_point: &EntryPoint,
        device: &WgpuDevice,
        window: Arc<dyn wgpu::WindowHandle>,
        size: PixelExtent,
        rotation: Rotation,
    ) -> Result<Self, GpuError> {
        let surface = entry_point
            .0
            .create_surface(window)
            .map_err(|e| GpuError::SwapChain(e.to_string()))?;
        let adapter = test_executors::spin_on(entry_point.0.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: Default::default(),
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        }))
        .map_err(|e| GpuError::NoAdapter(e.to_string()))?;
        let capabilities = surface.get_capabilities(&adapter);
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| capabilities.formats.first().copied())
            .ok_or_else(|| GpuError::SwapChain("surface reports no formats".to_string()))?;
        let alpha_mode = capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(device.device(), &config);
        logwise::info_sync!(
            "Configured surface {w}x{h} as {format}",
            w = config.width,
            h = config.height,
            format = logwise::privacy::LogIt(&format)
        );
        Ok(WgpuSwapChain {
            surface,
            config,
            rotation,
            constants: None,
        })
    }

    pub fn extent(&self) -> PixelExtent {
        PixelExtent {
            width: self.config.width,
            height: self.config.height,
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub(super) fn resize(&mut self, device: &WgpuDevice, size: PixelExtent, rotation: Rotation) -> Result<(), SwapChainError> {
        if let Some(loss) = device.lost() {
            logwise::warn_sync!("Resize on a lost device: {loss}", loss = logwise::privacy::LogIt(&loss));
            return Err(SwapChainError::DeviceRemoved);
        }
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.rotation = rotation;
        self.surface.configure(device.device(), &self.config);
        Ok(())
    }

    fn acquire(&mut self, device: &WgpuDevice) -> Result<Option<wgpu::SurfaceTexture>, SwapChainError> {
        match self.surface.get_current_texture() {
            Ok(texture) => Ok(Some(texture)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(device.device(), &self.config);
                self.surface
                    .get_current_texture()
                    .map(Some)
                    .map_err(|e| SwapChainError::Gpu(GpuError::SwapChain(e.to_string())))
            }
            Err(wgpu::SurfaceError::Timeout) => {
                logwise::warn_sync!("Timed out acquiring a surface texture; skipping the frame");
                Ok(None)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => Err(SwapChainError::DeviceRemoved),
            Err(e) => Err(SwapChainError::Gpu(GpuError::SwapChain(e.to_string()))),
        }
    }

    /// Writes every draw's constants at its own aligned offset.
    fn upload_constants(&mut self, device: &WgpuDevice, frame: &Frame<WgpuDevice>) -> usize {
        let stride = stride(device);
        let needed = frame.draws.len().max(1);
        if self.constants.as_ref().is_none_or(|c| c.capacity < needed) {
            let capacity = needed.next_power_of_two();
            let buffer = device.device().create_buffer(&wgpu::BufferDescriptor {
                label: Some("frame constants"),
                size: (capacity * stride) as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.device().create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("frame constants"),
                layout: &device.layouts().constants,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &buffer,
                        offset: 0,
                        size: wgpu::BufferSize::new(size_of::<ConstantBlock>() as u64),
                    }),
                }],
            });
            self.constants = Some(Constants {
                buffer,
                bind_group,
                capacity,
            });
        }
        let mut bytes = vec![0u8; needed * stride];
        for (i, draw) in frame.draws.iter().enumerate() {
            let block = bytemuck::bytes_of(&draw.constants);
            bytes[i * stride..i * stride + block.len()].copy_from_slice(block);
        }
        if let Some(constants) = &self.constants {
            device.queue().write_buffer(&constants.buffer, 0, &bytes);
        }
        stride
    }

    pub(super) fn present(&mut self, device: &WgpuDevice, frame: &Frame<WgpuDevice>) -> Result<(), SwapChainError> {
        if device.lost().is_some() {
            return Err(SwapChainError::DeviceRemoved);
        }
        let Some(output) = self.acquire(device)? else {
            return Ok(());
        };
        let target = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let stride = self.upload_constants(device, frame);

        //bind groups and pipelines must outlive the pass
        let mut prepared = Vec::with_capacity(frame.draws.len());
        for (i, draw) in frame.draws.iter().enumerate() {
            let (Some(texture), Some(sampler)) = (&draw.texture, &draw.sampler) else {
                logwise::warn_sync!(
                    "Skipping a draw of {program} without a texture and sampler",
                    program = draw.program.label()
                );
                continue;
            };
            let pipeline = draw
                .program
                .pipeline(device, self.config.format, draw.blend)
                .map_err(SwapChainError::Gpu)?;
            let textures = device.device().create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(draw.program.label()),
                layout: &device.layouts().texture,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&texture.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            });
            prepared.push((draw, pipeline, textures, (i * stride) as u32));
        }

        let mut encoder = device.device().create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame"),
        });
        {
            let [r, g, b, a] = frame.clear_color;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if let Some(constants) = &self.constants {
                for (draw, pipeline, textures, offset) in &prepared {
                    pass.set_pipeline(pipeline);
                    pass.set_bind_group(0, textures, &[]);
                    pass.set_bind_group(1, &constants.bind_group, &[*offset]);
                    pass.set_vertex_buffer(0, draw.vertex_buffer.slice(..));
                    pass.draw(draw.first_vertex..draw.first_vertex + draw.vertex_count, 0..1);
                }
            }
        }
        device.queue().submit(std::iter::once(encoder.finish()));
        output.present();
        device.set_needs_poll();
        Ok(())
    }
}
