// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Screens and the stack that navigates between them.

A [Scene] declares the resources it needs, renders itself from them once they are fulfilled,
and reacts to pointer presses.  Navigation happens through a [StackHost]: a scene asks for a
push or a pop, and the [crate::shell::Shell] applies the request after the scene returns and
then re-requires resources for whichever scene ends up on top.
*/

mod main_scene;
mod settings_hub;
mod settings_navigation;

pub use main_scene::MainScene;
pub use settings_hub::SettingsHubScene;
pub use settings_navigation::{CARD_COUNT, FLIP_DURATION, SettingsNavigationScene};

use crate::device::DeviceResources;
use crate::gpu::{Backend, RenderContext};
use crate::resources::{ShaderClass, TextureClass, VertexBufferClass};

/// Text on the wood background.
pub const PAINT_BEIGE: [f32; 4] = [0.96, 0.87, 0.70, 1.0];
pub const PAINT_WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
pub const PAINT_BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/**
Everything one scene needs, split the way the facade requires it.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneRequirements {
    pub shaders: Vec<ShaderClass>,
    pub size_independent_textures: Vec<TextureClass>,
    pub size_dependent_textures: Vec<TextureClass>,
    pub size_independent_vertex_buffers: Vec<VertexBufferClass>,
    pub size_dependent_vertex_buffers: Vec<VertexBufferClass>,
}

impl SceneRequirements {
    /// Requires every list on the facade.
    pub fn require_all<B: Backend>(&self, resources: &mut DeviceResources<B>) {
        resources.require_shaders(&self.shaders);
        resources.require_size_independent_textures(&self.size_independent_textures);
        resources.require_size_dependent_textures(&self.size_dependent_textures);
        resources.require_size_independent_vertex_buffers(&self.size_independent_vertex_buffers);
        resources.require_size_dependent_vertex_buffers(&self.size_dependent_vertex_buffers);
    }

    /// Requires only the size-dependent lists, after the output size changed.
    pub fn require_size_dependent<B: Backend>(&self, resources: &mut DeviceResources<B>) {
        resources.require_size_dependent_textures(&self.size_dependent_textures);
        resources.require_size_dependent_vertex_buffers(&self.size_dependent_vertex_buffers);
    }
}

/**
One screen.
*/
pub trait Scene<B: Backend> {
    fn name(&self) -> &'static str;

    fn required_shaders(&self) -> &'static [ShaderClass];
    fn required_size_independent_textures(&self) -> &'static [TextureClass];
    fn required_size_dependent_textures(&self) -> &'static [TextureClass];
    fn required_size_independent_vertex_buffers(&self) -> &'static [VertexBufferClass];
    fn required_size_dependent_vertex_buffers(&self) -> &'static [VertexBufferClass];

    fn requirements(&self) -> SceneRequirements {
        SceneRequirements {
            shaders: self.required_shaders().to_vec(),
            size_independent_textures: self.required_size_independent_textures().to_vec(),
            size_dependent_textures: self.required_size_dependent_textures().to_vec(),
            size_independent_vertex_buffers: self.required_size_independent_vertex_buffers().to_vec(),
            size_dependent_vertex_buffers: self.required_size_dependent_vertex_buffers().to_vec(),
        }
    }

    /// Advances animations by `dt` seconds.
    fn update(&mut self, _dt: f32) {}

    /// Records this scene's draws.  Draws nothing while any resource is missing.
    fn render(&self, resources: &DeviceResources<B>, ctx: &mut RenderContext<B::Device>);

    /// Handles a press at `(x, y)` in normalised coordinates.
    fn on_pointer_pressed(&mut self, resources: &DeviceResources<B>, host: &mut dyn StackHost<B>, x: f32, y: f32);
}

/// Where scenes send navigation requests.
pub trait StackHost<B: Backend> {
    fn push_scene(&mut self, scene: Box<dyn Scene<B>>);
    fn pop_scene(&mut self);
}

/// A requested change to the stack.
pub enum Navigation<B: Backend> {
    Push(Box<dyn Scene<B>>),
    Pop,
}

impl<B: Backend> std::fmt::Debug for Navigation<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Navigation::Push(scene) => f.debug_tuple("Push").field(&scene.name()).finish(),
            Navigation::Pop => f.write_str("Pop"),
        }
    }
}

/**
Collects navigation requests while a scene handles input.

The stack itself can't be borrowed mutably while its top scene runs, so requests are queued
here and applied in order afterwards.
*/
pub struct NavigationQueue<B: Backend> {
    requests: Vec<Navigation<B>>,
}

impl<B: Backend> Default for NavigationQueue<B> {
    fn default() -> Self {
        NavigationQueue { requests: Vec::new() }
    }
}

impl<B: Backend> NavigationQueue<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn into_requests(self) -> Vec<Navigation<B>> {
        self.requests
    }
}

impl<B: Backend> StackHost<B> for NavigationQueue<B> {
    fn push_scene(&mut self, scene: Box<dyn Scene<B>>) {
        self.requests.push(Navigation::Push(scene));
    }

    fn pop_scene(&mut self) {
        self.requests.push(Navigation::Pop);
    }
}
