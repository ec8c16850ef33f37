// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
The seam between the presentation core and a graphics backend.

A [Backend] hands out [Device]s and owns the swap chain.  Resources are created through the
device synchronously; drawing is recorded into a [RenderContext] and submitted as a [Frame]
when the facade presents.

Two backends exist: [crate::headless] records every call and runs anywhere, and the wgpu
backend (feature `backend_wgpu`) drives a real GPU.
*/

pub mod frame;

use std::fmt::Debug;
use std::sync::Arc;

pub use frame::{ConstantBlock, DrawCall, Frame, RenderContext};

use crate::display::{PixelExtent, Rotation};
use crate::geometry::VertexTexCoord;
use crate::pixel_formats::RgbaImage;

/**
Identity of a physical adapter.

Compared across device creations to notice that the system's default adapter moved (a
driver update or an external GPU being unplugged).
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdapterId(pub u64);

/// Why a device stopped working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceLoss {
    /// The device was removed (driver crash, hot unplug).
    Removed,
    /// The device was reset and every object on it is gone.
    Reset,
    /// The device is fine but is no longer on the default adapter.
    AdapterChanged,
}

/// Texture filtering for a sampler.  Both kinds wrap in every direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplerKind {
    Linear,
    Point,
}

/// Which shader stages read the program's constant block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantStages {
    None,
    Vertex,
    Fragment,
    Both,
}

impl ConstantStages {
    pub fn vertex(self) -> bool {
        matches!(self, ConstantStages::Vertex | ConstantStages::Both)
    }
    pub fn fragment(self) -> bool {
        matches!(self, ConstantStages::Fragment | ConstantStages::Both)
    }
}

/**
Everything needed to create a program from a vertex/pixel shader pair.

Sources are whatever the backend consumes natively (WGSL text for wgpu).  Every program
reads [VertexTexCoord] vertices.
*/
#[derive(Debug, Clone, Copy)]
pub struct ProgramDescriptor<'a> {
    pub label: &'a str,
    pub vertex_source: &'a [u8],
    pub fragment_source: &'a [u8],
    pub constants: ConstantStages,
}

#[derive(Debug, Clone, Copy)]
pub struct TextureDescriptor<'a> {
    pub label: &'a str,
    pub image: &'a RgbaImage,
}

/// Failure creating or using a GPU object.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum GpuError {
    #[error("No suitable adapter: {0}")]
    NoAdapter(String),
    #[error("Device request failed: {0}")]
    RequestDevice(String),
    #[error("Creating {kind} {label:?} failed: {message}")]
    Create {
        kind: &'static str,
        label: String,
        message: String,
    },
    #[error("Swap chain operation failed: {0}")]
    SwapChain(String),
    #[error("The device is lost")]
    DeviceLost,
}

impl GpuError {
    pub(crate) fn create(kind: &'static str, label: &str, message: impl ToString) -> Self {
        GpuError::Create {
            kind,
            label: label.to_string(),
            message: message.to_string(),
        }
    }
}

/**
Outcome of a failed present or swap-chain resize.

[SwapChainError::DeviceRemoved] and [SwapChainError::DeviceReset] are recoverable: the facade
rebuilds the device.  Everything else is reported to the caller.
*/
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum SwapChainError {
    #[error("The device was removed")]
    DeviceRemoved,
    #[error("The device was reset")]
    DeviceReset,
    #[error(transparent)]
    Gpu(#[from] GpuError),
}

impl SwapChainError {
    /// The loss this error reports, if it is one the facade recovers from.
    pub fn loss(&self) -> Option<DeviceLoss> {
        match self {
            SwapChainError::DeviceRemoved => Some(DeviceLoss::Removed),
            SwapChainError::DeviceReset => Some(DeviceLoss::Reset),
            SwapChainError::Gpu(_) => None,
        }
    }
}

/**
A graphics device.

Object handles are cheap to clone and shareable across threads, so build tasks can create
objects off the render loop and hand them back to a cache.
*/
pub trait Device: Send + Sync + 'static {
    type Program: Clone + Debug + Send + Sync + 'static;
    type Texture: Clone + Debug + Send + Sync + 'static;
    type Buffer: Clone + Debug + Send + Sync + 'static;
    type Sampler: Clone + Debug + Send + Sync + 'static;
    type BlendState: Clone + Debug + Send + Sync + 'static;

    fn create_program(&self, descriptor: &ProgramDescriptor<'_>) -> Result<Self::Program, GpuError>;
    fn create_texture(&self, descriptor: &TextureDescriptor<'_>) -> Result<Self::Texture, GpuError>;
    fn create_vertex_buffer(&self, label: &str, vertices: &[VertexTexCoord]) -> Result<Self::Buffer, GpuError>;
    fn create_sampler(&self, kind: SamplerKind) -> Result<Self::Sampler, GpuError>;
    /// Source-alpha over inverse-source-alpha for colour; alpha keeps the source.
    fn create_blend_state(&self) -> Result<Self::BlendState, GpuError>;

    /// The adapter this device was created on.
    fn adapter_id(&self) -> AdapterId;
    /// `Some` once the device has been removed or reset.
    fn lost(&self) -> Option<DeviceLoss>;
    /// Hint that the app is going idle and transient allocations can be released.
    fn trim(&self);
}

/**
Creates devices and owns the presentation surface.
*/
pub trait Backend: 'static {
    type Device: Device;
    type Window;
    type SwapChain;

    fn create_device(&mut self) -> Result<Arc<Self::Device>, GpuError>;
    /// The adapter a device created right now would use.
    fn default_adapter_id(&self) -> AdapterId;

    fn create_swap_chain(
        &mut self,
        device: &Self::Device,
        window: &Self::Window,
        size: PixelExtent,
        rotation: Rotation,
    ) -> Result<Self::SwapChain, GpuError>;
    fn resize_swap_chain(
        &mut self,
        device: &Self::Device,
        swap_chain: &mut Self::SwapChain,
        size: PixelExtent,
        rotation: Rotation,
    ) -> Result<(), SwapChainError>;
    /// Draws `frame` and presents it, waiting for vertical sync.
    fn present(
        &mut self,
        device: &Self::Device,
        swap_chain: &mut Self::SwapChain,
        frame: &Frame<Self::Device>,
    ) -> Result<(), SwapChainError>;
}
