// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use wgpu::util::DeviceExt;
use wgpu::{Limits, PollType, Trace};

use crate::geometry::VertexTexCoord;
use crate::gpu::{
    AdapterId, ConstantBlock, Device, DeviceLoss, GpuError, ProgramDescriptor, SamplerKind, TextureDescriptor,
};
use crate::imp::wgpu::error::scoped;
use crate::imp::wgpu::program::WgpuProgram;
use crate::imp::wgpu::texture::WgpuTexture;
use crate::imp::wgpu::unbound_device::{UnboundDevice, adapter_id};
use crate::imp::wgpu::sampler;

const LOSS_NONE: u8 = 0;
const LOSS_REMOVED: u8 = 1;

/// The bind group layouts every program shares.
#[derive(Debug)]
pub(super) struct Layouts {
    /// Group 0: texture at binding 0, sampler at binding 1.
    pub(super) texture: wgpu::BindGroupLayout,
    /// Group 1: the [ConstantBlock] at a dynamic offset.
    pub(super) constants: wgpu::BindGroupLayout,
    pub(super) pipeline: wgpu::PipelineLayout,
}

impl Layouts {
    fn new(device: &wgpu::Device) -> Self {
        let texture = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let constants = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("constants layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(size_of::<ConstantBlock>() as u64),
                },
                count: None,
            }],
        });
        let pipeline = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("program layout"),
            bind_group_layouts: &[&texture, &constants],
            push_constant_ranges: &[],
        });
        Layouts {
            texture,
            constants,
            pipeline,
        }
    }
}

/// GPU objects owned by one device; shared by every clone of the handle.
#[derive(Debug)]
struct BoundDeviceResources {
    device: wgpu::Device,
    queue: wgpu::Queue,
    adapter_id: AdapterId,
    layouts: Layouts,
    loss: Arc<AtomicU8>,
    poll_thread: Mutex<Option<JoinHandle<()>>>,
    poll_shutdown: Arc<AtomicBool>,
    poll_trigger: Mutex<Sender<()>>,
}

/**
A wgpu device bound to the default adapter.

A background thread polls the device after each submission so finished frames and
dropped objects are reclaimed without the render loop waiting on them.
*/
#[derive(Debug, Clone)]
pub struct WgpuDevice {
    resources: Arc<BoundDeviceResources>,
}

impl WgpuDevice {
    pub(super) fn bind(unbound_device: UnboundDevice) -> Result<Self, GpuError> {
        let info = unbound_device.adapter.get_info();
        let descriptor = wgpu::DeviceDescriptor {
            label: Some("metronome device"),
            required_features: Default::default(),
            required_limits: Limits::downlevel_defaults().using_resolution(unbound_device.adapter.limits()),
            memory_hints: Default::default(),
            trace: Trace::Off,
        };
        let (device, queue) = test_executors::spin_on(unbound_device.adapter.request_device(&descriptor))
            .map_err(|e| GpuError::RequestDevice(e.to_string()))?;
        logwise::info_sync!(
            "Bound device on {adapter} ({backend})",
            adapter = info.name.as_str(),
            backend = logwise::privacy::LogIt(&info.backend)
        );

        let loss = Arc::new(AtomicU8::new(LOSS_NONE));
        let move_loss = loss.clone();
        device.set_device_lost_callback(move |reason, message| {
            logwise::warn_sync!(
                "wgpu device lost ({reason}): {message}",
                reason = logwise::privacy::LogIt(&reason),
                message = message.as_str()
            );
            move_loss.store(LOSS_REMOVED, Ordering::Release);
        });

        let layouts = Layouts::new(&device);

        let poll_device = device.clone();
        let poll_shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = poll_shutdown.clone();
        let (poll_sender, poll_receiver): (Sender<()>, Receiver<()>) = mpsc::channel();
        let poll_thread = thread::Builder::new()
            .name("wgpu_poll".to_string())
            .spawn(move || {
                while !shutdown_clone.load(Ordering::Relaxed) {
                    match poll_receiver.recv() {
                        Ok(()) => {
                            let _ = poll_device.poll(PollType::Wait);
                        }
                        Err(_) => break,
                    }
                }
            })
            .map_err(|e| GpuError::RequestDevice(e.to_string()))?;

        Ok(WgpuDevice {
            resources: Arc::new(BoundDeviceResources {
                device,
                queue,
                adapter_id: adapter_id(&info),
                layouts,
                loss,
                poll_thread: Mutex::new(Some(poll_thread)),
                poll_shutdown,
                poll_trigger: Mutex::new(poll_sender),
            }),
        })
    }

    pub(super) fn device(&self) -> &wgpu::Device {
        &self.resources.device
    }

    pub(super) fn queue(&self) -> &wgpu::Queue {
        &self.resources.queue
    }

    pub(super) fn layouts(&self) -> &Layouts {
        &self.resources.layouts
    }

    /// Signal the polling thread that GPU work may be ready
    pub(super) fn set_needs_poll(&self) {
        let _ = self.resources.poll_trigger.lock().unwrap().send(());
    }
}

impl Device for WgpuDevice {
    type Program = WgpuProgram;
    type Texture = WgpuTexture;
    type Buffer = wgpu::Buffer;
    type Sampler = wgpu::Sampler;
    type BlendState = wgpu::BlendState;

    fn create_program(&self, descriptor: &ProgramDescriptor<'_>) -> Result<WgpuProgram, GpuError> {
        WgpuProgram::new(self.device(), descriptor)
    }

    fn create_texture(&self, descriptor: &TextureDescriptor<'_>) -> Result<WgpuTexture, GpuError> {
        self.lost_check()?;
        scoped(self.device(), "texture", descriptor.label, || {
            WgpuTexture::new(self.device(), self.queue(), descriptor)
        })
    }

    fn create_vertex_buffer(&self, label: &str, vertices: &[VertexTexCoord]) -> Result<wgpu::Buffer, GpuError> {
        self.lost_check()?;
        //zero-sized vertex buffers are rejected; nothing draws from the padding
        let padding = [VertexTexCoord::default()];
        let contents = if vertices.is_empty() { &padding[..] } else { vertices };
        scoped(self.device(), "vertex buffer", label, || {
            self.device().create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(contents),
                usage: wgpu::BufferUsages::VERTEX,
            })
        })
    }

    fn create_sampler(&self, kind: SamplerKind) -> Result<wgpu::Sampler, GpuError> {
        self.lost_check()?;
        let descriptor = sampler::descriptor(kind);
        let label = descriptor.label.unwrap_or("sampler");
        scoped(self.device(), "sampler", label, || self.device().create_sampler(&descriptor))
    }

    fn create_blend_state(&self) -> Result<wgpu::BlendState, GpuError> {
        self.lost_check()?;
        Ok(wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent::REPLACE,
        })
    }

    fn adapter_id(&self) -> AdapterId {
        self.resources.adapter_id
    }

    fn lost(&self) -> Option<DeviceLoss> {
        match self.resources.loss.load(Ordering::Acquire) {
            LOSS_NONE => None,
            _ => Some(DeviceLoss::Removed),
        }
    }

    fn trim(&self) {
        let _ = self.device().poll(PollType::Poll);
    }
}

impl WgpuDevice {
    fn lost_check(&self) -> Result<(), GpuError> {
        match self.lost() {
            Some(_) => Err(GpuError::DeviceLost),
            None => Ok(()),
        }
    }
}

impl Drop for BoundDeviceResources {
    fn drop(&mut self) {
        self.poll_shutdown.store(true, Ordering::Relaxed);
        //wake the thread so it sees the flag
        if let Ok(trigger) = self.poll_trigger.lock() {
            let _ = trigger.send(());
        }
        if let Some(handle) = self.poll_thread.lock().ok().and_then(|mut h| h.take()) {
            let _ = handle.join();
        }
    }
}
