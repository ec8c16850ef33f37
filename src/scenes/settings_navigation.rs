// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
The "Navigating the App" help: a deck of cards, one paragraph and screenshot each, flipped
with the arrow icons.

While a flip runs, two cards are on screen.  The outgoing one shrinks and slides away while
the incoming one grows and slides in; the scale curve makes both linger near full size at
the start of their motion.
*/

use glam::{Mat4, Vec3};

use crate::device::DeviceResources;
use crate::gpu::{Backend, ConstantBlock, RenderContext};
use crate::resources::{ShaderClass, TextureClass, VertexBufferClass};
use crate::scenes::{PAINT_BLACK, PAINT_WHITE, Scene, StackHost};

/// Cards in the deck; card `i` is text sub-buffer `i + 1`.
pub const CARD_COUNT: usize = 8;
/// Seconds per flip.
pub const FLIP_DURATION: f32 = 0.3;

const PREVIOUS_ARROW: usize = 0;
const NEXT_ARROW: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Moving to the previous card: the deck slides right.
    Right,
    /// Moving to the next card: the deck slides left.
    Left,
}

#[derive(Debug)]
pub struct SettingsNavigationScene {
    focus: usize,
    animation: Option<Direction>,
    progress: f32,
    left: Mat4,
    right: Mat4,
}

impl Default for SettingsNavigationScene {
    fn default() -> Self {
        SettingsNavigationScene {
            focus: 0,
            animation: None,
            progress: 0.0,
            left: Mat4::IDENTITY,
            right: Mat4::IDENTITY,
        }
    }
}

/// Scale of a card `progress` of the way into leaving.
fn scale_out(progress: f32) -> f32 {
    2.0 / 3.0 + FLIP_DURATION / (9.0 * progress + 3.0 * FLIP_DURATION)
}

/// Scale of a card `progress` of the way into arriving.
fn scale_in(progress: f32) -> f32 {
    2.0 / 3.0 + FLIP_DURATION / (9.0 * (1.0 - progress) + 3.0 * FLIP_DURATION)
}

/// Moves by `offset` in screen units, then scales about the centre.
fn card_transform(scale: f32, offset: f32) -> Mat4 {
    Mat4::from_scale(Vec3::new(scale, scale, 1.0)) * Mat4::from_translation(Vec3::new(offset / scale, 0.0, 0.0))
}

impl SettingsNavigationScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// The card shown when idle, or being flipped to.
    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Transforms of the left and right card.
    pub fn transforms(&self) -> (Mat4, Mat4) {
        (self.left, self.right)
    }

    /// Starts a flip to the previous card.  Ignored mid-flip or at the first card.
    pub fn move_to_previous(&mut self) -> bool {
        if self.animation.is_some() || self.focus == 0 {
            return false;
        }
        self.focus -= 1;
        self.start(Direction::Right);
        true
    }

    /// Starts a flip to the next card.  Ignored mid-flip or at the last card.
    pub fn move_to_next(&mut self) -> bool {
        if self.animation.is_some() || self.focus >= CARD_COUNT - 1 {
            return false;
        }
        self.focus += 1;
        self.start(Direction::Left);
        true
    }

    fn start(&mut self, direction: Direction) {
        logwise::trace_sync!(
            "Flipping to card {focus}",
            focus = self.focus
        );
        self.animation = Some(direction);
        self.progress = 0.0;
        self.update_transforms();
    }

    fn update_transforms(&mut self) {
        let p = self.progress;
        match self.animation {
            None => {
                self.left = Mat4::IDENTITY;
                self.right = Mat4::IDENTITY;
            }
            Some(Direction::Right) => {
                self.left = card_transform(scale_in(p), 2.0 * (p - 1.0));
                self.right = card_transform(scale_out(p), 2.0 * p);
            }
            Some(Direction::Left) => {
                self.left = card_transform(scale_out(p), -2.0 * p);
                self.right = card_transform(scale_in(p), 2.0 * (1.0 - p));
            }
        }
    }

    /// The card drawn on the left during a flip.
    fn left_card(&self) -> usize {
        match self.animation {
            Some(Direction::Left) => self.focus - 1,
            _ => self.focus,
        }
    }
}

impl<B: Backend> Scene<B> for SettingsNavigationScene {
    fn name(&self) -> &'static str {
        "SettingsNavigation"
    }

    fn required_shaders(&self) -> &'static [ShaderClass] {
        &[ShaderClass::AlphaTextureTransform, ShaderClass::FontTransform]
    }

    fn required_size_independent_textures(&self) -> &'static [TextureClass] {
        &[
            TextureClass::Wood,
            TextureClass::Font,
            TextureClass::Icons,
            TextureClass::SampleImage,
        ]
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
            VertexBufferClass::HelpDetailsOverlay,
            VertexBufferClass::HelpDetailsIcons,
            VertexBufferClass::HelpNavigatingTexts,
            VertexBufferClass::HelpNavigatingImages,
        ]
    }

    fn update(&mut self, dt: f32) {
        if self.animation.is_none() {
            return;
        }
        self.progress += dt / FLIP_DURATION;
        if self.progress >= 1.0 {
            self.progress = 1.0;
            self.animation = None;
        }
        self.update_transforms();
    }

    fn render(&self, resources: &DeviceResources<B>, ctx: &mut RenderContext<B::Device>) {
        let (
            Some(alpha_texture),
            Some(font_shader),
            Some(wood),
            Some(overlay),
            Some(icons),
            Some(screenshot),
            Some(font),
            Some(background),
            Some(card_overlay),
            Some(arrows),
            Some(texts),
            Some(images),
        ) = (
            resources.get_shader(ShaderClass::AlphaTextureTransform),
            resources.get_shader(ShaderClass::FontTransform),
            resources.get_texture(TextureClass::Wood),
            resources.get_texture(TextureClass::Overlay),
            resources.get_texture(TextureClass::Icons),
            resources.get_texture(TextureClass::SampleImage),
            resources.get_texture(TextureClass::Font),
            resources.get_vertex_buffer(VertexBufferClass::Background),
            resources.get_vertex_buffer(VertexBufferClass::HelpDetailsOverlay),
            resources.get_vertex_buffer(VertexBufferClass::HelpDetailsIcons),
            resources.get_vertex_buffer(VertexBufferClass::HelpNavigatingTexts),
            resources.get_vertex_buffer(VertexBufferClass::HelpNavigatingImages),
        )
        else {
            return;
        };
        let left = ConstantBlock::IDENTITY.with_transform(self.left);
        let right = ConstantBlock::IDENTITY.with_transform(self.right);

        alpha_texture.activate(ctx, ConstantBlock::IDENTITY);
        resources.activate_linear_sampler(ctx);
        resources.activate_blend_state(ctx);
        wood.activate(ctx);
        background.activate(ctx);
        background.draw_sub_buffer(ctx, 0);

        resources.activate_point_sampler(ctx);
        for (texture, buffer) in [(overlay, card_overlay), (screenshot, images)] {
            texture.activate(ctx);
            buffer.activate(ctx);
            if self.is_animating() {
                ctx.set_constants(left);
                buffer.draw_sub_buffer(ctx, 0);
                ctx.set_constants(right);
                buffer.draw_sub_buffer(ctx, 0);
            } else {
                ctx.set_constants(ConstantBlock::IDENTITY);
                buffer.draw_sub_buffer(ctx, 0);
            }
        }

        ctx.set_constants(ConstantBlock::IDENTITY);
        resources.activate_linear_sampler(ctx);
        icons.activate(ctx);
        arrows.activate(ctx);
        arrows.draw_sub_buffer(ctx, 0);

        font_shader.activate(ctx, ConstantBlock::IDENTITY.with_paint_color(PAINT_WHITE));
        font.activate(ctx);
        texts.activate(ctx);
        texts.draw_sub_buffer(ctx, 0);

        if self.is_animating() {
            let left_card = self.left_card();
            ctx.set_constants(left.with_paint_color(PAINT_BLACK));
            texts.draw_sub_buffer(ctx, left_card + 1);
            ctx.set_constants(right.with_paint_color(PAINT_BLACK));
            texts.draw_sub_buffer(ctx, left_card + 2);
        } else {
            ctx.set_constants(ConstantBlock::IDENTITY.with_paint_color(PAINT_BLACK));
            texts.draw_sub_buffer(ctx, self.focus + 1);
        }
    }

    fn on_pointer_pressed(&mut self, resources: &DeviceResources<B>, _host: &mut dyn StackHost<B>, x: f32, y: f32) {
        if !resources.are_all_fulfilled() {
            return;
        }
        let Some(arrows) = resources.get_vertex_buffer(VertexBufferClass::HelpDetailsIcons) else {
            return;
        };
        match arrows.region_of_interest_at(x, y) {
            Some(PREVIOUS_ARROW) => {
                self.move_to_previous();
            }
            Some(NEXT_ARROW) => {
                self.move_to_next();
            }
            _ => {}
        }
    }
}
