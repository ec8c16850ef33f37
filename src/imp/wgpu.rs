// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
The wgpu backend.

Resource creation and device requests block the calling thread until wgpu answers, which on
native platforms is immediate.  Presenting uses FIFO and so waits for vertical sync.
*/
use std::sync::Arc;

use crate::display::{PixelExtent, Rotation};
use crate::gpu::{AdapterId, Backend, Frame, GpuError, SwapChainError};

mod bound_device;
mod entry_point;
mod error;
mod program;
mod sampler;
mod texture;
mod unbound_device;
mod view;

pub use bound_device::WgpuDevice;
pub use entry_point::EntryPoint;
pub use program::WgpuProgram;
pub use texture::WgpuTexture;
pub use unbound_device::UnboundDevice;
pub use view::WgpuSwapChain;

/// A window wgpu can create a surface for.
pub type Window = Arc<dyn wgpu::WindowHandle>;

#[derive(Debug, Default)]
pub struct WgpuBackend {
    entry_point: EntryPoint,
}

impl WgpuBackend {
    pub fn new() -> Self {
        WgpuBackend {
            entry_point: EntryPoint::new(),
        }
    }

    pub fn entry_point(&self) -> &EntryPoint {
        &self.entry_point
    }
}

impl Backend for WgpuBackend {
    type Device = WgpuDevice;
    type Window = Window;
    type SwapChain = WgpuSwapChain;

    fn create_device(&mut self) -> Result<Arc<WgpuDevice>, GpuError> {
        let unbound = UnboundDevice::pick(&self.entry_point)?;
        WgpuDevice::bind(unbound).map(Arc::new)
    }

    fn default_adapter_id(&self) -> AdapterId {
        match UnboundDevice::pick(&self.entry_point) {
            Ok(unbound) => unbound.adapter_id(),
            Err(e) => {
                logwise::warn_sync!("No default adapter: {e}", e = logwise::privacy::LogIt(&e));
                //no adapter matches no device, so the facade notices and tries to recover
                AdapterId(0)
            }
        }
    }

    fn create_swap_chain(
        &mut self,
        device: &WgpuDevice,
        window: &Window,
        size: PixelExtent,
        rotation: Rotation,
    ) -> Result<WgpuSwapChain, GpuError> {
        WgpuSwapChain::new(&self.entry_point, device, window.clone(), size, rotation)
    }

    fn resize_swap_chain(
        &mut self,
        device: &WgpuDevice,
        swap_chain: &mut WgpuSwapChain,
        size: PixelExtent,
        rotation: Rotation,
    ) -> Result<(), SwapChainError> {
        swap_chain.resize(device, size, rotation)
    }

    fn present(
        &mut self,
        device: &WgpuDevice,
        swap_chain: &mut WgpuSwapChain,
        frame: &Frame<WgpuDevice>,
    ) -> Result<(), SwapChainError> {
        swap_chain.present(device, frame)
    }
}
