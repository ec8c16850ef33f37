// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
A backend that draws nothing and remembers everything.

Every object creation, swap-chain operation and present is appended to a [GpuLog].  Faults
can be injected through the [HeadlessBackend] (which is a cheap clone sharing its state), so
tests keep a clone and steer the copy that the facade owns.
*/

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::display::{PixelExtent, Rotation};
use crate::geometry::VertexTexCoord;
use crate::gpu::{
    AdapterId, Backend, ConstantStages, Device, DeviceLoss, DrawCall, Frame, GpuError, ProgramDescriptor, SamplerKind,
    SwapChainError, TextureDescriptor,
};

/// An object created on a headless device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(u64);

impl Handle {
    pub fn id(self) -> u64 {
        self.0
    }

    /// A handle no device issued, for exercising recording code.
    pub fn for_testing(id: u64) -> Self {
        Handle(id)
    }
}

/// One recorded backend call.
#[derive(Debug, Clone)]
pub enum GpuCall {
    CreateDevice {
        adapter: AdapterId,
    },
    CreateProgram {
        handle: Handle,
        label: String,
        constants: ConstantStages,
    },
    CreateTexture {
        handle: Handle,
        label: String,
        width: u32,
        height: u32,
    },
    CreateVertexBuffer {
        handle: Handle,
        label: String,
        vertex_count: usize,
    },
    CreateSampler {
        handle: Handle,
        kind: SamplerKind,
    },
    CreateBlendState {
        handle: Handle,
    },
    CreateSwapChain {
        size: PixelExtent,
        rotation: Rotation,
    },
    ResizeSwapChain {
        size: PixelExtent,
        rotation: Rotation,
    },
    Present {
        clear_color: [f32; 4],
        draws: Vec<DrawCall<HeadlessDevice>>,
    },
    Trim,
}

impl GpuCall {
    /// The label of a labelled creation.
    pub fn created_label(&self) -> Option<&str> {
        match self {
            GpuCall::CreateProgram { label, .. }
            | GpuCall::CreateTexture { label, .. }
            | GpuCall::CreateVertexBuffer { label, .. } => Some(label),
            _ => None,
        }
    }

    fn created_handle(&self) -> Option<Handle> {
        match self {
            GpuCall::CreateProgram { handle, .. }
            | GpuCall::CreateTexture { handle, .. }
            | GpuCall::CreateVertexBuffer { handle, .. }
            | GpuCall::CreateSampler { handle, .. }
            | GpuCall::CreateBlendState { handle } => Some(*handle),
            _ => None,
        }
    }
}

/// The shared call log.
#[derive(Debug, Clone, Default)]
pub struct GpuLog {
    calls: Arc<Mutex<Vec<GpuCall>>>,
}

impl GpuLog {
    fn push(&self, call: GpuCall) {
        logwise::trace_sync!("headless: {call}", call = logwise::privacy::LogIt(&call));
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<GpuCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// How many objects labelled `label` were created.
    pub fn creations_of(&self, label: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.created_label() == Some(label))
            .count()
    }

    /// Labels of every labelled creation, in order.
    pub fn created_labels(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| c.created_label().map(str::to_string))
            .collect()
    }

    /// What the object behind `handle` was created as.
    pub fn creation_of(&self, handle: Handle) -> Option<GpuCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.created_handle() == Some(handle))
            .cloned()
    }

    /// The label of the program, texture or buffer behind `handle`.
    pub fn label_of(&self, handle: Handle) -> Option<String> {
        self.creation_of(handle)
            .and_then(|c| c.created_label().map(str::to_string))
    }

    /// Draws of the most recent present.
    pub fn last_present(&self) -> Option<Vec<DrawCall<HeadlessDevice>>> {
        self.calls.lock().unwrap().iter().rev().find_map(|c| match c {
            GpuCall::Present { draws, .. } => Some(draws.clone()),
            _ => None,
        })
    }

    pub fn count(&self, predicate: impl Fn(&GpuCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }
}

#[derive(Default)]
struct Faults {
    failing_labels: HashSet<String>,
    failing_device_creations: usize,
    failing_swap_chain_creations: usize,
    present_failures: VecDeque<SwapChainError>,
    resize_failures: VecDeque<SwapChainError>,
}

struct Shared {
    log: GpuLog,
    faults: Mutex<Faults>,
    default_adapter: Mutex<AdapterId>,
    current_loss: Mutex<Option<Arc<Mutex<Option<DeviceLoss>>>>>,
    next_handle: AtomicU64,
}

impl Shared {
    fn next_handle(&self) -> Handle {
        Handle(self.next_handle.fetch_add(1, Ordering::Relaxed))
    }
}

/**
The headless backend.

Clones share the log, the fault table and the current device.
*/
#[derive(Clone)]
pub struct HeadlessBackend {
    shared: Arc<Shared>,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HeadlessBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessBackend")
            .field("calls", &self.shared.log.len())
            .field("default_adapter", &*self.shared.default_adapter.lock().unwrap())
            .finish()
    }
}

impl HeadlessBackend {
    pub fn new() -> Self {
        HeadlessBackend {
            shared: Arc::new(Shared {
                log: GpuLog::default(),
                faults: Mutex::default(),
                default_adapter: Mutex::new(AdapterId(1)),
                current_loss: Mutex::default(),
                next_handle: AtomicU64::new(1),
            }),
        }
    }

    pub fn log(&self) -> GpuLog {
        self.shared.log.clone()
    }

    /// Makes every creation of an object labelled `label` fail until [Self::allow_creation_of].
    pub fn fail_creation_of(&self, label: &str) {
        self.shared.faults.lock().unwrap().failing_labels.insert(label.to_string());
    }

    pub fn allow_creation_of(&self, label: &str) {
        self.shared.faults.lock().unwrap().failing_labels.remove(label);
    }

    /// Makes the next `count` device requests fail.
    pub fn fail_device_creations(&self, count: usize) {
        self.shared.faults.lock().unwrap().failing_device_creations = count;
    }

    /// Makes the next `count` swap-chain creations fail.
    pub fn fail_swap_chain_creations(&self, count: usize) {
        self.shared.faults.lock().unwrap().failing_swap_chain_creations = count;
    }

    /// Marks the most recently created device as lost.
    pub fn lose_device(&self, loss: DeviceLoss) {
        if let Some(flag) = self.shared.current_loss.lock().unwrap().as_ref() {
            *flag.lock().unwrap() = Some(loss);
        }
    }

    /// Queues an error for the next present.
    pub fn fail_next_present(&self, error: SwapChainError) {
        self.shared.faults.lock().unwrap().present_failures.push_back(error);
    }

    /// Queues an error for the next swap-chain resize.
    pub fn fail_next_resize(&self, error: SwapChainError) {
        self.shared.faults.lock().unwrap().resize_failures.push_back(error);
    }

    /// Moves the system's default adapter, as a driver update would.
    pub fn set_default_adapter(&self, adapter: AdapterId) {
        *self.shared.default_adapter.lock().unwrap() = adapter;
    }
}

/// The window a headless swap chain pretends to draw into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeadlessWindow;

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessSwapChain {
    pub size: PixelExtent,
    pub rotation: Rotation,
    pub presented: u64,
}

impl Backend for HeadlessBackend {
    type Device = HeadlessDevice;
    type Window = HeadlessWindow;
    type SwapChain = HeadlessSwapChain;

    fn create_device(&mut self) -> Result<Arc<HeadlessDevice>, GpuError> {
        {
            let mut faults = self.shared.faults.lock().unwrap();
            if faults.failing_device_creations > 0 {
                faults.failing_device_creations -= 1;
                return Err(GpuError::RequestDevice("injected failure".to_string()));
            }
        }
        let adapter = self.default_adapter_id();
        let lost = Arc::new(Mutex::new(None));
        *self.shared.current_loss.lock().unwrap() = Some(lost.clone());
        self.shared.log.push(GpuCall::CreateDevice { adapter });
        Ok(Arc::new(HeadlessDevice {
            shared: self.shared.clone(),
            adapter,
            lost,
        }))
    }

    fn default_adapter_id(&self) -> AdapterId {
        *self.shared.default_adapter.lock().unwrap()
    }

    fn create_swap_chain(
        &mut self,
        device: &HeadlessDevice,
        _window: &HeadlessWindow,
        size: PixelExtent,
        rotation: Rotation,
    ) -> Result<HeadlessSwapChain, GpuError> {
        if device.lost().is_some() {
            return Err(GpuError::DeviceLost);
        }
        {
            let mut faults = self.shared.faults.lock().unwrap();
            if faults.failing_swap_chain_creations > 0 {
                faults.failing_swap_chain_creations -= 1;
                return Err(GpuError::SwapChain("injected failure".to_string()));
            }
        }
        self.shared.log.push(GpuCall::CreateSwapChain { size, rotation });
        Ok(HeadlessSwapChain {
            size,
            rotation,
            presented: 0,
        })
    }

    fn resize_swap_chain(
        &mut self,
        device: &HeadlessDevice,
        swap_chain: &mut HeadlessSwapChain,
        size: PixelExtent,
        rotation: Rotation,
    ) -> Result<(), SwapChainError> {
        if let Some(error) = self.shared.faults.lock().unwrap().resize_failures.pop_front() {
            return Err(error);
        }
        device.check_lost()?;
        self.shared.log.push(GpuCall::ResizeSwapChain { size, rotation });
        swap_chain.size = size;
        swap_chain.rotation = rotation;
        Ok(())
    }

    fn present(
        &mut self,
        device: &HeadlessDevice,
        swap_chain: &mut HeadlessSwapChain,
        frame: &Frame<HeadlessDevice>,
    ) -> Result<(), SwapChainError> {
        if let Some(error) = self.shared.faults.lock().unwrap().present_failures.pop_front() {
            return Err(error);
        }
        device.check_lost()?;
        self.shared.log.push(GpuCall::Present {
            clear_color: frame.clear_color,
            draws: frame.draws.clone(),
        });
        swap_chain.presented += 1;
        Ok(())
    }
}

/// A device on the headless backend.
pub struct HeadlessDevice {
    shared: Arc<Shared>,
    adapter: AdapterId,
    lost: Arc<Mutex<Option<DeviceLoss>>>,
}

impl std::fmt::Debug for HeadlessDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessDevice")
            .field("adapter", &self.adapter)
            .field("lost", &self.lost())
            .finish()
    }
}

impl HeadlessDevice {
    fn check_lost(&self) -> Result<(), SwapChainError> {
        match self.lost() {
            Some(DeviceLoss::Reset) => Err(SwapChainError::DeviceReset),
            Some(_) => Err(SwapChainError::DeviceRemoved),
            None => Ok(()),
        }
    }

    fn check_create(&self, kind: &'static str, label: &str) -> Result<Handle, GpuError> {
        if self.lost().is_some() {
            return Err(GpuError::DeviceLost);
        }
        if self.shared.faults.lock().unwrap().failing_labels.contains(label) {
            return Err(GpuError::create(kind, label, "injected failure"));
        }
        Ok(self.shared.next_handle())
    }
}

impl Device for HeadlessDevice {
    type Program = Handle;
    type Texture = Handle;
    type Buffer = Handle;
    type Sampler = Handle;
    type BlendState = Handle;

    fn create_program(&self, descriptor: &ProgramDescriptor<'_>) -> Result<Handle, GpuError> {
        let handle = self.check_create("program", descriptor.label)?;
        self.shared.log.push(GpuCall::CreateProgram {
            handle,
            label: descriptor.label.to_string(),
            constants: descriptor.constants,
        });
        Ok(handle)
    }

    fn create_texture(&self, descriptor: &TextureDescriptor<'_>) -> Result<Handle, GpuError> {
        let handle = self.check_create("texture", descriptor.label)?;
        self.shared.log.push(GpuCall::CreateTexture {
            handle,
            label: descriptor.label.to_string(),
            width: descriptor.image.width(),
            height: descriptor.image.height(),
        });
        Ok(handle)
    }

    fn create_vertex_buffer(&self, label: &str, vertices: &[VertexTexCoord]) -> Result<Handle, GpuError> {
        let handle = self.check_create("vertex buffer", label)?;
        self.shared.log.push(GpuCall::CreateVertexBuffer {
            handle,
            label: label.to_string(),
            vertex_count: vertices.len(),
        });
        Ok(handle)
    }

    fn create_sampler(&self, kind: SamplerKind) -> Result<Handle, GpuError> {
        let label = match kind {
            SamplerKind::Linear => "linear sampler",
            SamplerKind::Point => "point sampler",
        };
        let handle = self.check_create("sampler", label)?;
        self.shared.log.push(GpuCall::CreateSampler { handle, kind });
        Ok(handle)
    }

    fn create_blend_state(&self) -> Result<Handle, GpuError> {
        let handle = self.check_create("blend state", "alpha blend")?;
        self.shared.log.push(GpuCall::CreateBlendState { handle });
        Ok(handle)
    }

    fn adapter_id(&self) -> AdapterId {
        self.adapter
    }

    fn lost(&self) -> Option<DeviceLoss> {
        *self.lost.lock().unwrap()
    }

    fn trim(&self) {
        self.shared.log.push(GpuCall::Trim);
    }
}
