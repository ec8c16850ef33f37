// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
The device facade.

[DeviceResources] owns the device, the swap chain and the three resource caches.  It turns
window events into swap-chain work, notices device loss, and is the only thing scenes talk
to when they need a resource or a bind point.

Device-dependent state (the device and everything created on it) is rebuilt in place after a
loss.  Window-size-dependent state (the swap chain and the rotation) is rebuilt when the
logical size, DPI or orientation actually change.
*/

pub mod notify;

use std::path::PathBuf;
use std::sync::Arc;

use glam::{Affine2, Mat4};

pub use notify::{DeviceNotify, NotifyToken};

use crate::Priority;
use crate::assets::AssetStore;
use crate::cache::{CacheError, ShaderCache, TextureCache, VertexBufferCache};
use crate::display::{DisplayInfo, Orientation, PixelExtent, Rotation, RotationError, effective_dpi, output_size};
use crate::geometry::Size;
use crate::gpu::{AdapterId, Backend, Device, DeviceLoss, GpuError, RenderContext, SwapChainError};
use crate::resources::{
    BuildContext, BuildMetrics, Partition, Shader, ShaderClass, Texture, TextureClass, VertexBuffer, VertexBufferClass,
};
use crate::spawn::Spawner;
use notify::Observers;

/// Facade configuration.
#[derive(Debug, Clone)]
pub struct ResourcesConfig {
    /// Directory asset paths are relative to.
    pub asset_root: PathBuf,
    /// Render at full resolution on large high-DPI screens instead of halving the DPI.
    pub support_high_resolutions: bool,
    pub clear_color: [f32; 4],
    /// Priority for asset reads.
    pub priority: Priority,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        ResourcesConfig {
            asset_root: PathBuf::from("assets"),
            support_high_resolutions: false,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            priority: Priority::UserInitiated,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum DeviceError {
    #[error(transparent)]
    Gpu(#[from] GpuError),
    #[error(transparent)]
    Rotation(#[from] RotationError),
    #[error("No window has been set")]
    NoWindow,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DisplayState {
    logical_size: Size,
    dpi: f32,
    native_orientation: Orientation,
    current_orientation: Orientation,
    effective_dpi: f32,
    output_size: Size,
    rotation: Rotation,
}

impl Default for DisplayState {
    fn default() -> Self {
        DisplayState {
            logical_size: Size::default(),
            dpi: crate::display::BASE_DPI,
            native_orientation: Orientation::Unknown,
            current_orientation: Orientation::Unknown,
            effective_dpi: crate::display::BASE_DPI,
            output_size: Size::new(1.0, 1.0),
            rotation: Rotation::Identity,
        }
    }
}

/**
Owner of the device, the swap chain and the resource caches.
*/
pub struct DeviceResources<B: Backend> {
    backend: B,
    config: ResourcesConfig,
    assets: AssetStore,
    spawner: Arc<dyn Spawner>,
    device: Arc<B::Device>,
    /// Adapter the current device was created on.
    adapter: AdapterId,
    window: Option<B::Window>,
    swap_chain: Option<B::SwapChain>,
    display: DisplayState,
    shaders: ShaderCache<B::Device>,
    textures: TextureCache<B::Device>,
    vertex_buffers: VertexBufferCache<B::Device>,
    observers: Observers<B>,
    /// A new device exists but observers have not been told it is restored.
    restore_pending: bool,
}

impl<B: Backend> DeviceResources<B> {
    /// Creates the device.  The swap chain waits for [Self::set_window].
    pub fn new(mut backend: B, config: ResourcesConfig, spawner: Arc<dyn Spawner>) -> Result<Self, DeviceError> {
        let device = backend.create_device()?;
        let adapter = device.adapter_id();
        logwise::info_sync!("Created device on adapter {adapter}", adapter = adapter.0);
        let assets = AssetStore::new(config.asset_root.clone(), config.priority);
        Ok(DeviceResources {
            backend,
            config,
            assets,
            spawner,
            device,
            adapter,
            window: None,
            swap_chain: None,
            display: DisplayState::default(),
            shaders: ShaderCache::new(),
            textures: TextureCache::new(),
            vertex_buffers: VertexBufferCache::new(),
            observers: Observers::default(),
            restore_pending: false,
        })
    }

    /// Attaches the window and builds the swap chain for it.
    pub fn set_window(&mut self, window: B::Window, info: DisplayInfo) -> Result<(), DeviceError> {
        self.window = Some(window);
        self.swap_chain = None;
        self.display.logical_size = info.logical_size;
        self.display.dpi = info.dpi;
        self.display.native_orientation = info.native_orientation;
        self.display.current_orientation = info.current_orientation;
        self.create_window_size_dependent_resources()
    }

    /// Returns whether the size changed; an unchanged size does nothing.
    pub fn set_logical_size(&mut self, logical_size: Size) -> Result<bool, DeviceError> {
        if self.display.logical_size == logical_size {
            return Ok(false);
        }
        self.change_display(|display| display.logical_size = logical_size)?;
        Ok(true)
    }

    /// Returns whether the DPI changed; an unchanged DPI does nothing.
    pub fn set_dpi(&mut self, dpi: f32) -> Result<bool, DeviceError> {
        if self.display.dpi == dpi {
            return Ok(false);
        }
        self.change_display(|display| display.dpi = dpi)?;
        Ok(true)
    }

    /// Returns whether the orientation changed; an unchanged orientation does nothing.
    pub fn set_current_orientation(&mut self, orientation: Orientation) -> Result<bool, DeviceError> {
        if self.display.current_orientation == orientation {
            return Ok(false);
        }
        self.change_display(|display| display.current_orientation = orientation)?;
        Ok(true)
    }

    /// Applies `change` and rebuilds; a failed rebuild puts the previous values back.
    fn change_display(&mut self, change: impl FnOnce(&mut DisplayState)) -> Result<(), DeviceError> {
        let previous = self.display;
        change(&mut self.display);
        let rebuilt = self.create_window_size_dependent_resources();
        if rebuilt.is_err() {
            self.display = previous;
        }
        rebuilt
    }

    fn create_window_size_dependent_resources(&mut self) -> Result<(), DeviceError> {
        let effective = effective_dpi(
            self.display.logical_size,
            self.display.dpi,
            self.config.support_high_resolutions,
        );
        let output = output_size(self.display.logical_size, effective);
        self.display.effective_dpi = effective;
        self.display.output_size = output;

        if self.window.is_none() {
            return Ok(());
        }
        let rotation = Rotation::compute(self.display.native_orientation, self.display.current_orientation)?;
        if rotation != self.display.rotation {
            logwise::info_sync!("Display rotation is now {rotation}", rotation = logwise::privacy::LogIt(&rotation));
        }
        self.display.rotation = rotation;
        let extent = rotation.swap_chain_extent(output);

        if let Some(swap_chain) = self.swap_chain.as_mut() {
            let resized = self.backend.resize_swap_chain(&self.device, swap_chain, extent, rotation);
            return match resized {
                Ok(()) => {
                    logwise::info_sync!(
                        "Resized swap chain to {width}x{height}",
                        width = extent.width,
                        height = extent.height
                    );
                    Ok(())
                }
                Err(e) => match e.loss() {
                    //recovery rebuilds this state for the new device
                    Some(loss) => self.handle_device_lost(loss),
                    None => Err(swap_chain_error(e)),
                },
            };
        }
        let window = self.window.as_ref().ok_or(DeviceError::NoWindow)?;
        let swap_chain = self.backend.create_swap_chain(&self.device, window, extent, rotation)?;
        logwise::info_sync!(
            "Created swap chain {width}x{height}",
            width = extent.width,
            height = extent.height
        );
        self.swap_chain = Some(swap_chain);
        Ok(())
    }

    /**
    Checks that the device still works and is still on the default adapter.

    Either failing runs the loss recovery.
    */
    pub fn validate_device(&mut self) -> Result<(), DeviceError> {
        if let Some(loss) = self.device.lost() {
            return self.handle_device_lost(loss);
        }
        if self.restore_pending {
            return self.finish_restore();
        }
        let default_adapter = self.backend.default_adapter_id();
        if default_adapter != self.adapter {
            logwise::warn_sync!(
                "Default adapter moved from {old} to {new}",
                old = self.adapter.0,
                new = default_adapter.0
            );
            return self.handle_device_lost(DeviceLoss::AdapterChanged);
        }
        Ok(())
    }

    /**
    Recovers from device loss.

    Drops the swap chain, tells observers the device is lost, creates a new device and the
    window-size-dependent state, then tells observers it is restored.  The caches are left to
    the observers.
    */
    pub fn handle_device_lost(&mut self, loss: DeviceLoss) -> Result<(), DeviceError> {
        logwise::warn_sync!("Device lost: {loss}", loss = logwise::privacy::LogIt(&loss));
        let recreate = logwise::perfwarn_begin!("DeviceResources::handle_device_lost");
        self.swap_chain = None;
        self.notify(|observer, resources| observer.on_device_lost(resources));

        self.device = self.backend.create_device()?;
        self.adapter = self.device.adapter_id();
        logwise::info_sync!("Recreated device on adapter {adapter}", adapter = self.adapter.0);
        self.restore_pending = true;
        let restored = self.finish_restore();
        drop(recreate);
        restored
    }

    /// Builds the window-size-dependent state on the new device, then tells observers.
    fn finish_restore(&mut self) -> Result<(), DeviceError> {
        self.create_window_size_dependent_resources()?;
        self.restore_pending = false;
        self.notify(|observer, resources| observer.on_device_restored(resources));
        Ok(())
    }

    fn notify(&mut self, f: impl Fn(&mut Box<dyn DeviceNotify<B>>, &mut Self)) {
        let mut lent = self.observers.take();
        for (_, observer) in lent.iter_mut() {
            f(observer, self);
        }
        self.observers.restore(lent);
    }

    pub fn register_device_notify(&mut self, observer: Box<dyn DeviceNotify<B>>) -> NotifyToken {
        self.observers.register(observer)
    }

    /// Returns whether the token was registered.
    pub fn unregister_device_notify(&mut self, token: NotifyToken) -> bool {
        self.observers.unregister(token)
    }

    pub fn device_notify_count(&self) -> usize {
        self.observers.len()
    }

    /// A context to record the next frame into.
    pub fn begin_frame(&self) -> RenderContext<B::Device> {
        RenderContext::new(self.config.clear_color)
    }

    /**
    Presents a recorded frame, blocking for vertical sync.

    Device removal or reset runs the loss recovery and reports success; the frame is
    dropped.
    */
    pub fn present(&mut self, ctx: RenderContext<B::Device>) -> Result<(), DeviceError> {
        let frame = ctx.finish();
        if self.restore_pending {
            //this frame was recorded against the old resources
            return self.finish_restore();
        }
        let Some(swap_chain) = self.swap_chain.as_mut() else {
            return Err(DeviceError::NoWindow);
        };
        match self.backend.present(&self.device, swap_chain, &frame) {
            Ok(()) => Ok(()),
            Err(e) => match e.loss() {
                Some(loss) => self.handle_device_lost(loss),
                None => Err(swap_chain_error(e)),
            },
        }
    }

    /// The app is going idle.
    pub fn trim(&self) {
        self.device.trim();
    }

    fn build_context(&self) -> BuildContext<B::Device> {
        BuildContext {
            device: self.device.clone(),
            assets: self.assets.clone(),
            metrics: self.build_metrics(),
        }
    }

    pub fn build_metrics(&self) -> BuildMetrics {
        BuildMetrics {
            output_size: self.display.output_size,
            dpi: self.display.effective_dpi,
        }
    }

    pub fn require_shaders(&mut self, ids: &[ShaderClass]) {
        let cx = self.build_context();
        self.shaders.require(ids, &cx, self.spawner.as_ref());
    }

    pub fn require_size_independent_textures(&mut self, ids: &[TextureClass]) {
        let cx = self.build_context();
        self.textures.require(ids, Partition::SizeIndependent, &cx, self.spawner.as_ref());
    }

    pub fn require_size_dependent_textures(&mut self, ids: &[TextureClass]) {
        let cx = self.build_context();
        self.textures.require(ids, Partition::SizeDependent, &cx, self.spawner.as_ref());
    }

    pub fn require_size_independent_vertex_buffers(&mut self, ids: &[VertexBufferClass]) {
        let cx = self.build_context();
        self.vertex_buffers.require(ids, Partition::SizeIndependent, &cx, self.spawner.as_ref());
    }

    pub fn require_size_dependent_vertex_buffers(&mut self, ids: &[VertexBufferClass]) {
        let cx = self.build_context();
        self.vertex_buffers.require(ids, Partition::SizeDependent, &cx, self.spawner.as_ref());
    }

    pub fn are_shaders_fulfilled(&self) -> bool {
        self.shaders.is_fulfilled()
    }

    pub fn are_size_independent_textures_fulfilled(&self) -> bool {
        self.textures.is_fulfilled(Partition::SizeIndependent)
    }

    pub fn are_size_dependent_textures_fulfilled(&self) -> bool {
        self.textures.is_fulfilled(Partition::SizeDependent)
    }

    pub fn are_size_independent_vertex_buffers_fulfilled(&self) -> bool {
        self.vertex_buffers.is_fulfilled(Partition::SizeIndependent)
    }

    pub fn are_size_dependent_vertex_buffers_fulfilled(&self) -> bool {
        self.vertex_buffers.is_fulfilled(Partition::SizeDependent)
    }

    /// Every gate at once.
    pub fn are_all_fulfilled(&self) -> bool {
        self.are_shaders_fulfilled()
            && self.are_size_independent_textures_fulfilled()
            && self.are_size_dependent_textures_fulfilled()
            && self.are_size_independent_vertex_buffers_fulfilled()
            && self.are_size_dependent_vertex_buffers_fulfilled()
    }

    /// Applies finished builds of all three caches, reporting every failure among them.
    pub fn pump(&mut self) -> Result<(), CacheError> {
        CacheError::merge([self.shaders.pump(), self.textures.pump(), self.vertex_buffers.pump()])
    }

    pub fn get_shader(&self, id: ShaderClass) -> Option<&Shader<B::Device>> {
        self.shaders.get(id)
    }

    pub fn get_texture(&self, id: TextureClass) -> Option<&Texture<B::Device>> {
        self.textures.get(id)
    }

    pub fn get_vertex_buffer(&self, id: VertexBufferClass) -> Option<&VertexBuffer<B::Device>> {
        self.vertex_buffers.get(id)
    }

    pub fn activate_blend_state(&self, ctx: &mut RenderContext<B::Device>) -> bool {
        self.textures.activate_blend_state(ctx)
    }

    pub fn activate_linear_sampler(&self, ctx: &mut RenderContext<B::Device>) -> bool {
        self.textures.activate_linear_sampler(ctx)
    }

    pub fn activate_point_sampler(&self, ctx: &mut RenderContext<B::Device>) -> bool {
        self.textures.activate_point_sampler(ctx)
    }

    /// Drops size-dependent textures and vertex buffers; size-independent ones stay.
    pub fn invalidate_size_dependent_resources(&mut self) {
        self.textures.invalidate_size_dependent();
        self.vertex_buffers.invalidate_size_dependent();
    }

    /// Drops everything in all three caches.
    pub fn clear_caches(&mut self) {
        logwise::info_sync!("Clearing resource caches");
        self.shaders.clear();
        self.textures.clear();
        self.vertex_buffers.clear();
    }

    pub fn shader_cache(&self) -> &ShaderCache<B::Device> {
        &self.shaders
    }

    pub fn texture_cache(&self) -> &TextureCache<B::Device> {
        &self.textures
    }

    pub fn vertex_buffer_cache(&self) -> &VertexBufferCache<B::Device> {
        &self.vertex_buffers
    }

    pub fn device(&self) -> &Arc<B::Device> {
        &self.device
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn swap_chain(&self) -> Option<&B::SwapChain> {
        self.swap_chain.as_ref()
    }

    pub fn logical_size(&self) -> Size {
        self.display.logical_size
    }

    pub fn output_size(&self) -> Size {
        self.display.output_size
    }

    /// Swap-chain size in pixels; swapped relative to the output for quarter turns.
    pub fn render_target_size(&self) -> PixelExtent {
        self.display.rotation.swap_chain_extent(self.display.output_size)
    }

    pub fn dpi(&self) -> f32 {
        self.display.dpi
    }

    pub fn effective_dpi(&self) -> f32 {
        self.display.effective_dpi
    }

    pub fn rotation(&self) -> Rotation {
        self.display.rotation
    }

    pub fn current_orientation(&self) -> Orientation {
        self.display.current_orientation
    }

    pub fn orientation_transform_2d(&self) -> Affine2 {
        self.display.rotation.transform_2d(self.display.logical_size)
    }

    pub fn orientation_transform_3d(&self) -> Mat4 {
        self.display.rotation.transform_3d()
    }
}

fn swap_chain_error(e: SwapChainError) -> DeviceError {
    match e {
        SwapChainError::Gpu(gpu) => DeviceError::Gpu(gpu),
        other => DeviceError::Gpu(GpuError::SwapChain(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{GpuCall, HeadlessBackend, HeadlessWindow};
    use crate::spawn::DeferredSpawner;
    use std::sync::Mutex;

    fn info() -> DisplayInfo {
        DisplayInfo {
            logical_size: Size::new(800.0, 600.0),
            dpi: 96.0,
            native_orientation: Orientation::Landscape,
            current_orientation: Orientation::Landscape,
        }
    }

    fn facade() -> (DeviceResources<HeadlessBackend>, HeadlessBackend) {
        let backend = HeadlessBackend::new();
        let mut resources =
            DeviceResources::new(backend.clone(), ResourcesConfig::default(), Arc::new(DeferredSpawner::new())).unwrap();
        resources.set_window(HeadlessWindow, info()).unwrap();
        (resources, backend)
    }

    #[test]
    fn unchanged_values_do_nothing() {
        let (mut resources, backend) = facade();
        backend.log().clear();
        assert!(!resources.set_logical_size(Size::new(800.0, 600.0)).unwrap());
        assert!(!resources.set_dpi(96.0).unwrap());
        assert!(!resources.set_current_orientation(Orientation::Landscape).unwrap());
        assert!(backend.log().is_empty());
    }

    #[test]
    fn portrait_swaps_the_swap_chain() {
        let (mut resources, backend) = facade();
        assert!(resources.set_current_orientation(Orientation::Portrait).unwrap());
        assert_eq!(resources.rotation(), Rotation::Rotate270);
        assert_eq!(resources.render_target_size(), PixelExtent { width: 600, height: 800 });
        assert!(matches!(
            backend.log().calls().last(),
            Some(GpuCall::ResizeSwapChain {
                rotation: Rotation::Rotate270,
                ..
            })
        ));
        assert!(matches!(
            resources.set_current_orientation(Orientation::Unknown),
            Err(DeviceError::Rotation(_))
        ));
    }

    #[test]
    fn rejected_orientation_is_not_kept() {
        let (mut resources, backend) = facade();
        for _ in 0..2 {
            assert!(matches!(
                resources.set_current_orientation(Orientation::Unknown),
                Err(DeviceError::Rotation(_))
            ));
            assert_eq!(resources.current_orientation(), Orientation::Landscape);
        }
        assert_eq!(resources.rotation(), Rotation::Identity);
        assert!(resources.set_current_orientation(Orientation::Portrait).unwrap());
        assert!(matches!(
            backend.log().calls().last(),
            Some(GpuCall::ResizeSwapChain {
                rotation: Rotation::Rotate270,
                ..
            })
        ));
    }

    #[test]
    fn failed_resize_keeps_the_old_size() {
        let (mut resources, backend) = facade();
        backend.fail_next_resize(SwapChainError::Gpu(GpuError::SwapChain("injected".into())));
        assert!(resources.set_logical_size(Size::new(1024.0, 768.0)).is_err());
        assert_eq!(resources.logical_size(), Size::new(800.0, 600.0));
        assert_eq!(resources.output_size(), Size::new(800.0, 600.0));
        //the same size is tried again rather than reported unchanged
        assert!(resources.set_logical_size(Size::new(1024.0, 768.0)).unwrap());
        assert_eq!(resources.render_target_size(), PixelExtent { width: 1024, height: 768 });
    }

    #[test]
    fn present_without_window_is_an_error() {
        let backend = HeadlessBackend::new();
        let mut resources =
            DeviceResources::new(backend, ResourcesConfig::default(), Arc::new(DeferredSpawner::new())).unwrap();
        let ctx = resources.begin_frame();
        assert!(matches!(resources.present(ctx), Err(DeviceError::NoWindow)));
    }

    struct Recorder(Arc<Mutex<Vec<&'static str>>>);

    impl DeviceNotify<HeadlessBackend> for Recorder {
        fn on_device_lost(&mut self, resources: &mut DeviceResources<HeadlessBackend>) {
            assert!(resources.swap_chain().is_none());
            self.0.lock().unwrap().push("lost");
        }
        fn on_device_restored(&mut self, resources: &mut DeviceResources<HeadlessBackend>) {
            assert!(resources.swap_chain().is_some());
            self.0.lock().unwrap().push("restored");
        }
    }

    #[test]
    fn observers_see_loss_then_restore() {
        let (mut resources, backend) = facade();
        let events = Arc::new(Mutex::new(Vec::new()));
        let token = resources.register_device_notify(Box::new(Recorder(events.clone())));
        backend.lose_device(DeviceLoss::Removed);
        resources.validate_device().unwrap();
        assert_eq!(*events.lock().unwrap(), vec!["lost", "restored"]);
        assert!(resources.device().lost().is_none());

        assert!(resources.unregister_device_notify(token));
        assert!(!resources.unregister_device_notify(token));
        resources.handle_device_lost(DeviceLoss::Reset).unwrap();
        assert_eq!(events.lock().unwrap().len(), 2);
    }

    #[test]
    fn restore_waits_for_the_swap_chain() {
        let (mut resources, backend) = facade();
        let events = Arc::new(Mutex::new(Vec::new()));
        resources.register_device_notify(Box::new(Recorder(events.clone())));
        backend.fail_swap_chain_creations(1);
        backend.lose_device(DeviceLoss::Removed);
        assert!(resources.validate_device().is_err());
        assert!(resources.swap_chain().is_none());
        assert_eq!(*events.lock().unwrap(), vec!["lost"]);

        resources.validate_device().unwrap();
        assert!(resources.swap_chain().is_some());
        assert_eq!(*events.lock().unwrap(), vec!["lost", "restored"]);
        //no second device was needed
        assert_eq!(backend.log().count(|c| matches!(c, GpuCall::CreateDevice { .. })), 2);
    }

    #[test]
    fn present_finishes_a_pending_restore() {
        let (mut resources, backend) = facade();
        let events = Arc::new(Mutex::new(Vec::new()));
        resources.register_device_notify(Box::new(Recorder(events.clone())));
        backend.fail_swap_chain_creations(1);
        backend.lose_device(DeviceLoss::Reset);
        assert!(resources.validate_device().is_err());

        let ctx = resources.begin_frame();
        resources.present(ctx).unwrap();
        assert_eq!(*events.lock().unwrap(), vec!["lost", "restored"]);
        assert_eq!(backend.log().count(|c| matches!(c, GpuCall::Present { .. })), 0);

        let ctx = resources.begin_frame();
        resources.present(ctx).unwrap();
        assert_eq!(backend.log().count(|c| matches!(c, GpuCall::Present { .. })), 1);
    }

    #[test]
    fn adapter_change_is_a_loss() {
        let (mut resources, backend) = facade();
        backend.set_default_adapter(AdapterId(9));
        resources.validate_device().unwrap();
        assert_eq!(resources.device().adapter_id(), AdapterId(9));
        //nothing further to do
        let devices = backend.log().count(|c| matches!(c, GpuCall::CreateDevice { .. }));
        resources.validate_device().unwrap();
        assert_eq!(backend.log().count(|c| matches!(c, GpuCall::CreateDevice { .. })), devices);
    }

    #[test]
    fn present_recovers_from_removal() {
        let (mut resources, backend) = facade();
        backend.fail_next_present(SwapChainError::DeviceRemoved);
        let ctx = resources.begin_frame();
        resources.present(ctx).unwrap();
        assert_eq!(backend.log().count(|c| matches!(c, GpuCall::CreateDevice { .. })), 2);

        backend.fail_next_present(SwapChainError::Gpu(GpuError::SwapChain("out of memory".into())));
        let ctx = resources.begin_frame();
        assert!(matches!(resources.present(ctx), Err(DeviceError::Gpu(_))));
    }
}
