// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use wgpu::util::{DeviceExt, TextureDataOrder};

use crate::gpu::TextureDescriptor;

/// A static texture and the view shaders sample it through.
#[derive(Debug, Clone)]
pub struct WgpuTexture {
    pub(super) texture: wgpu::Texture,
    pub(super) view: wgpu::TextureView,
}

impl WgpuTexture {
    pub(super) fn new(device: &wgpu::Device, queue: &wgpu::Queue, descriptor: &TextureDescriptor<'_>) -> Self {
        let image = descriptor.image;
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(descriptor.label),
                size: wgpu::Extent3d {
                    width: image.width().max(1),
                    height: image.height().max(1),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            TextureDataOrder::LayerMajor,
            image.as_bytes(),
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        WgpuTexture { texture, view }
    }

    pub fn width(&self) -> u32 {
        self.texture.width()
    }

    pub fn height(&self) -> u32 {
        self.texture.height()
    }
}
