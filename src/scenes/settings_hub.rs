// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use crate::device::DeviceResources;
use crate::gpu::{Backend, ConstantBlock, RenderContext};
use crate::resources::{ShaderClass, TextureClass, VertexBufferClass};
use crate::scenes::{PAINT_BEIGE, PAINT_WHITE, Scene, SettingsNavigationScene, StackHost};

/// Region of the hub labels that opens the navigation help.
const NAVIGATING_THE_APP: usize = 0;

/**
The list of help sections.  Only "Navigating the App" leads anywhere yet.
*/
#[derive(Debug, Default)]
pub struct SettingsHubScene;

impl SettingsHubScene {
    pub fn new() -> Self {
        SettingsHubScene
    }
}

impl<B: Backend> Scene<B> for SettingsHubScene {
    fn name(&self) -> &'static str {
        "SettingsHub"
    }

    fn required_shaders(&self) -> &'static [ShaderClass] {
        &[ShaderClass::AlphaTexture, ShaderClass::Font]
    }

    fn required_size_independent_textures(&self) -> &'static [TextureClass] {
        &[TextureClass::Wood, TextureClass::Font]
    }

    fn required_size_dependent_textures(&self) -> &'static [TextureClass] {
        &[]
    }

    fn required_size_independent_vertex_buffers(&self) -> &'static [VertexBufferClass] {
        &[]
    }

    fn required_size_dependent_vertex_buffers(&self) -> &'static [VertexBufferClass] {
        &[VertexBufferClass::Background, VertexBufferClass::SettingsHubLabels]
    }

    fn render(&self, resources: &DeviceResources<B>, ctx: &mut RenderContext<B::Device>) {
        let (Some(alpha_texture), Some(font_shader), Some(wood), Some(font), Some(background), Some(labels)) = (
            resources.get_shader(ShaderClass::AlphaTexture),
            resources.get_shader(ShaderClass::Font),
            resources.get_texture(TextureClass::Wood),
            resources.get_texture(TextureClass::Font),
            resources.get_vertex_buffer(VertexBufferClass::Background),
            resources.get_vertex_buffer(VertexBufferClass::SettingsHubLabels),
        ) else {
            return;
        };

        alpha_texture.activate(ctx, ConstantBlock::IDENTITY);
        resources.activate_linear_sampler(ctx);
        resources.activate_blend_state(ctx);
        wood.activate(ctx);
        background.activate(ctx);
        background.draw_sub_buffer(ctx, 0);

        //heading
        font_shader.activate(ctx, ConstantBlock::IDENTITY.with_paint_color(PAINT_WHITE));
        font.activate(ctx);
        labels.activate(ctx);
        labels.draw_sub_buffer(ctx, 0);

        ctx.set_constants(ConstantBlock::IDENTITY.with_paint_color(PAINT_BEIGE));
        labels.draw_sub_buffer(ctx, 1);
    }

    fn on_pointer_pressed(&mut self, resources: &DeviceResources<B>, host: &mut dyn StackHost<B>, x: f32, y: f32) {
        if !resources.are_all_fulfilled() {
            return;
        }
        let Some(labels) = resources.get_vertex_buffer(VertexBufferClass::SettingsHubLabels) else {
            return;
        };
        if labels.region_of_interest_at(x, y) == Some(NAVIGATING_THE_APP) {
            host.push_scene(Box::new(SettingsNavigationScene::new()));
        }
    }
}
