// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use crate::device::DeviceResources;
use crate::gpu::{Backend, ConstantBlock, RenderContext};
use crate::resources::{ShaderClass, TextureClass, VertexBufferClass};
use crate::scenes::{PAINT_BEIGE, Scene, SettingsHubScene, StackHost};

/**
The root screen: wood background, translucent panels, the icon row and its labels.

Any press opens the settings hub.
*/
#[derive(Debug, Default)]
pub struct MainScene;

impl MainScene {
    pub fn new() -> Self {
        MainScene
    }
}

impl<B: Backend> Scene<B> for MainScene {
    fn name(&self) -> &'static str {
        "Main"
    }

    fn required_shaders(&self) -> &'static [ShaderClass] {
        &[ShaderClass::AlphaTexture, ShaderClass::Font]
    }

    fn required_size_independent_textures(&self) -> &'static [TextureClass] {
        &[TextureClass::Wood, TextureClass::Font, TextureClass::Icons]
    }

    fn required_size_dependent_textures(&self) -> &'static [TextureClass] {
        &[TextureClass::Overlay]
    }

    fn required_size_independent_vertex_buffers(&self) -> &'static [VertexBufferClass] {
        &[]
    }

    fn required_size_dependent_vertex_buffers(&self) -> &'static [VertexBufferClass] {
        &[
            VertexBufferClass::Background,
            VertexBufferClass::MainScreenTranslucentOverlay,
            VertexBufferClass::MainScreenIcons,
            VertexBufferClass::MainScreenIconLabels,
        ]
    }

    fn render(&self, resources: &DeviceResources<B>, ctx: &mut RenderContext<B::Device>) {
        let (
            Some(alpha_texture),
            Some(font_shader),
            Some(wood),
            Some(overlay),
            Some(icons),
            Some(font),
            Some(background),
            Some(panels),
            Some(icon_quads),
            Some(labels),
        ) = (
            resources.get_shader(ShaderClass::AlphaTexture),
            resources.get_shader(ShaderClass::Font),
            resources.get_texture(TextureClass::Wood),
            resources.get_texture(TextureClass::Overlay),
            resources.get_texture(TextureClass::Icons),
            resources.get_texture(TextureClass::Font),
            resources.get_vertex_buffer(VertexBufferClass::Background),
            resources.get_vertex_buffer(VertexBufferClass::MainScreenTranslucentOverlay),
            resources.get_vertex_buffer(VertexBufferClass::MainScreenIcons),
            resources.get_vertex_buffer(VertexBufferClass::MainScreenIconLabels),
        )
        else {
            return;
        };

        alpha_texture.activate(ctx, ConstantBlock::IDENTITY);
        resources.activate_linear_sampler(ctx);
        resources.activate_blend_state(ctx);
        wood.activate(ctx);
        background.activate(ctx);
        background.draw_sub_buffer(ctx, 0);

        //the panels are built from one corner, which must not be smoothed
        resources.activate_point_sampler(ctx);
        overlay.activate(ctx);
        panels.activate(ctx);
        panels.draw_sub_buffer(ctx, 0);

        resources.activate_linear_sampler(ctx);
        icons.activate(ctx);
        icon_quads.activate(ctx);
        icon_quads.draw_sub_buffer(ctx, 0);

        font_shader.activate(ctx, ConstantBlock::IDENTITY.with_paint_color(PAINT_BEIGE));
        font.activate(ctx);
        labels.activate(ctx);
        labels.draw_sub_buffer(ctx, 0);
    }

    fn on_pointer_pressed(&mut self, _resources: &DeviceResources<B>, host: &mut dyn StackHost<B>, _x: f32, _y: f32) {
        host.push_scene(Box::new(SettingsHubScene::new()));
    }
}
