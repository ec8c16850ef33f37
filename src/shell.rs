// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
The application shell: the device facade plus the scene stack, driven by platform events.

The platform layer calls [Shell::set_window] once, forwards size, DPI and orientation changes,
and then calls [Shell::update] and [Shell::render] every frame and
[Shell::pointer_pressed] on input.
*/

use std::sync::{Arc, Mutex};

use crate::cache::CacheError;
use crate::device::{DeviceError, DeviceNotify, DeviceResources, NotifyToken};
use crate::display::{DisplayInfo, Orientation};
use crate::geometry::Size;
use crate::gpu::Backend;
use crate::scenes::{Navigation, NavigationQueue, Scene, SceneRequirements};

/**
Keeps caches consistent across device loss.

Clears every cache when the device goes, and re-requires whatever the top scene needs once
the new device is up.
*/
struct CacheKeeper {
    requirements: Arc<Mutex<SceneRequirements>>,
}

impl<B: Backend> DeviceNotify<B> for CacheKeeper {
    fn on_device_lost(&mut self, resources: &mut DeviceResources<B>) {
        resources.clear_caches();
    }

    fn on_device_restored(&mut self, resources: &mut DeviceResources<B>) {
        let requirements = self.requirements.lock().unwrap().clone();
        requirements.require_all(resources);
    }
}

/// Outcome of one [Shell::render] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// A frame was recorded and presented.
    Presented,
    /// Some resource of the top scene is still building; nothing was drawn.
    NotReady,
}

pub struct Shell<B: Backend> {
    resources: DeviceResources<B>,
    stack: Vec<Box<dyn Scene<B>>>,
    /// What the top scene requires; shared with the device-loss observer.
    requirements: Arc<Mutex<SceneRequirements>>,
    notify_token: NotifyToken,
}

impl<B: Backend> Shell<B> {
    /// Starts with `root` as the only scene and requires its resources.
    pub fn new(mut resources: DeviceResources<B>, root: Box<dyn Scene<B>>) -> Self {
        let requirements = Arc::new(Mutex::new(root.requirements()));
        let notify_token = resources.register_device_notify(Box::new(CacheKeeper {
            requirements: requirements.clone(),
        }));
        let mut shell = Shell {
            resources,
            stack: vec![root],
            requirements,
            notify_token,
        };
        shell.refresh_requirements();
        shell
    }

    pub fn resources(&self) -> &DeviceResources<B> {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut DeviceResources<B> {
        &mut self.resources
    }

    pub fn top_scene(&self) -> &dyn Scene<B> {
        //the stack is never empty
        self.stack[self.stack.len() - 1].as_ref()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Names of the stacked scenes, root first.
    pub fn scene_names(&self) -> Vec<&'static str> {
        self.stack.iter().map(|s| s.name()).collect()
    }

    pub fn set_window(&mut self, window: B::Window, info: DisplayInfo) -> Result<(), DeviceError> {
        self.resources.set_window(window, info)?;
        self.size_changed();
        Ok(())
    }

    pub fn set_logical_size(&mut self, size: Size) -> Result<(), DeviceError> {
        if self.resources.set_logical_size(size)? {
            self.size_changed();
        }
        Ok(())
    }

    pub fn set_dpi(&mut self, dpi: f32) -> Result<(), DeviceError> {
        if self.resources.set_dpi(dpi)? {
            self.size_changed();
        }
        Ok(())
    }

    pub fn set_current_orientation(&mut self, orientation: Orientation) -> Result<(), DeviceError> {
        if self.resources.set_current_orientation(orientation)? {
            self.size_changed();
        }
        Ok(())
    }

    /// Rebuilds the size-dependent resources of the top scene against the new output size.
    fn size_changed(&mut self) {
        self.resources.invalidate_size_dependent_resources();
        let requirements = self.requirements.lock().unwrap().clone();
        requirements.require_size_dependent(&mut self.resources);
    }

    fn refresh_requirements(&mut self) {
        let requirements = self.top_scene().requirements();
        logwise::info_sync!(
            "Requiring resources for {scene}",
            scene = self.top_scene().name()
        );
        requirements.require_all(&mut self.resources);
        *self.requirements.lock().unwrap() = requirements;
    }

    pub fn push_scene(&mut self, scene: Box<dyn Scene<B>>) {
        logwise::info_sync!("Pushing scene {scene}", scene = scene.name());
        self.stack.push(scene);
        self.refresh_requirements();
    }

    /// Pops the top scene.  The root is never popped; that returns `false`.
    pub fn pop_scene(&mut self) -> bool {
        if self.stack.len() <= 1 {
            logwise::warn_sync!("Refusing to pop the root scene");
            return false;
        }
        if let Some(scene) = self.stack.pop() {
            logwise::info_sync!("Popped scene {scene}", scene = scene.name());
        }
        self.refresh_requirements();
        true
    }

    /**
    Applies finished builds and advances the top scene.

    Also checks the device, so a moved adapter is noticed even when nothing is presented.
    */
    pub fn update(&mut self, dt: f32) -> Result<(), ShellError> {
        self.resources.validate_device()?;
        let pumped = self.resources.pump();
        if let Some(scene) = self.stack.last_mut() {
            scene.update(dt);
        }
        pumped.map_err(ShellError::from)
    }

    /// Renders the top scene and presents it, once all of its resources are fulfilled.
    pub fn render(&mut self) -> Result<RenderOutcome, DeviceError> {
        if !self.resources.are_all_fulfilled() {
            return Ok(RenderOutcome::NotReady);
        }
        let mut ctx = self.resources.begin_frame();
        self.top_scene().render(&self.resources, &mut ctx);
        self.resources.present(ctx)?;
        Ok(RenderOutcome::Presented)
    }

    /// Routes a press in normalised coordinates to the top scene.
    pub fn pointer_pressed(&mut self, x: f32, y: f32) {
        let mut queue = NavigationQueue::new();
        if let Some(scene) = self.stack.last_mut() {
            scene.on_pointer_pressed(&self.resources, &mut queue, x, y);
        }
        for request in queue.into_requests() {
            match request {
                Navigation::Push(scene) => self.push_scene(scene),
                Navigation::Pop => {
                    self.pop_scene();
                }
            }
        }
    }

    /// Routes a press given in device-independent pixels from the window's top-left.
    pub fn pointer_pressed_at(&mut self, dips_x: f32, dips_y: f32) {
        let size = self.resources.logical_size();
        if size.width <= 0.0 || size.height <= 0.0 {
            return;
        }
        let x = 2.0 * dips_x / size.width - 1.0;
        let y = 1.0 - 2.0 * dips_y / size.height;
        self.pointer_pressed(x, y);
    }

    /// The app is being suspended.
    pub fn trim(&self) {
        self.resources.trim();
    }
}

impl<B: Backend> Drop for Shell<B> {
    fn drop(&mut self) {
        self.resources.unregister_device_notify(self.notify_token);
    }
}

/// Failure during [Shell::update].
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ShellError {
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}
