// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Fulfillment gating across the three caches, driven through the device facade.

mod support;

use metronome_amplified::geometry::Size;
use metronome_amplified::headless::GpuCall;
use metronome_amplified::resources::{BuildError, FONT_DEFINITION_PATH, ShaderClass, TextureClass, VertexBufferClass};
use support::{ICONS_PATH, fixture};

const MAIN_BUFFERS: &[VertexBufferClass] = &[
    VertexBufferClass::Background,
    VertexBufferClass::MainScreenTranslucentOverlay,
    VertexBufferClass::MainScreenIcons,
    VertexBufferClass::MainScreenIconLabels,
];

#[test]
fn nothing_required_is_fulfilled() {
    let f = fixture();
    assert!(f.resources.are_all_fulfilled());
    assert_eq!(f.spawner.pending(), 0);
}

#[test]
fn gates_open_only_after_builds_land() {
    let mut f = fixture();
    f.resources.require_shaders(&[ShaderClass::AlphaTexture, ShaderClass::Font]);
    f.resources
        .require_size_independent_textures(&[TextureClass::Wood, TextureClass::Font, TextureClass::Icons]);
    f.resources.require_size_dependent_textures(&[TextureClass::Overlay]);
    f.resources.require_size_dependent_vertex_buffers(MAIN_BUFFERS);

    assert!(!f.resources.are_shaders_fulfilled());
    assert!(!f.resources.are_size_independent_textures_fulfilled());
    assert!(!f.resources.are_size_dependent_textures_fulfilled());
    assert!(!f.resources.are_size_dependent_vertex_buffers_fulfilled());
    assert!(f.resources.are_size_independent_vertex_buffers_fulfilled());
    assert_eq!(f.spawner.pending(), 2 + 3 + 1 + 4);

    //builds finished but not yet pumped
    f.spawner.run_all();
    assert!(!f.resources.are_all_fulfilled());
    f.resources.pump().unwrap();
    assert!(f.resources.are_all_fulfilled());

    assert!(f.resources.get_shader(ShaderClass::Font).is_some());
    assert!(f.resources.get_shader(ShaderClass::FontTransform).is_none());
    let labels = f.resources.get_vertex_buffer(VertexBufferClass::MainScreenIconLabels).unwrap();
    assert!(labels.sub_buffer_count() >= 1);
    assert!(f.resources.vertex_buffer_cache().font().is_some());
}

#[test]
fn requiring_twice_builds_once() {
    let mut f = fixture();
    f.resources.require_size_independent_textures(&[TextureClass::Wood, TextureClass::Wood]);
    f.settle();
    f.resources.require_size_independent_textures(&[TextureClass::Wood]);
    assert_eq!(f.spawner.pending(), 0);
    f.settle();
    assert_eq!(f.backend.log().creations_of("Wood"), 1);
}

#[test]
fn wrong_partition_is_ignored() {
    let mut f = fixture();
    f.resources.require_size_independent_textures(&[TextureClass::Overlay]);
    f.resources.require_size_dependent_vertex_buffers(&[VertexBufferClass::Background]);
    assert_eq!(f.spawner.pending(), 1);
    f.settle();
    assert!(f.resources.get_texture(TextureClass::Overlay).is_none());
    assert!(f.resources.are_size_independent_textures_fulfilled());
}

#[test]
fn resize_rebuilds_only_size_dependent_resources() {
    let mut f = fixture();
    f.resources.require_size_independent_textures(&[TextureClass::Wood]);
    f.resources.require_size_dependent_textures(&[TextureClass::Overlay]);
    f.resources.require_size_dependent_vertex_buffers(&[VertexBufferClass::Background]);
    f.settle();
    assert!(f.resources.are_all_fulfilled());

    f.backend.log().clear();
    assert!(f.resources.set_logical_size(Size::new(640.0, 480.0)).unwrap());
    f.resources.invalidate_size_dependent_resources();
    assert!(f.resources.are_size_independent_textures_fulfilled());
    assert!(!f.resources.are_size_dependent_textures_fulfilled());
    assert!(!f.resources.are_size_dependent_vertex_buffers_fulfilled());

    f.resources.require_size_dependent_textures(&[TextureClass::Overlay]);
    f.resources.require_size_dependent_vertex_buffers(&[VertexBufferClass::Background]);
    f.settle();
    assert!(f.resources.are_all_fulfilled());
    let labels = f.backend.log().created_labels();
    assert!(labels.contains(&"Overlay".to_string()));
    assert!(labels.contains(&"Background".to_string()));
    assert!(!labels.contains(&"Wood".to_string()));
}

#[test]
fn builds_overtaken_by_invalidation_are_discarded() {
    let mut f = fixture();
    f.resources.require_size_dependent_vertex_buffers(&[VertexBufferClass::Background]);
    f.resources.invalidate_size_dependent_resources();
    f.settle();
    assert!(f.resources.get_vertex_buffer(VertexBufferClass::Background).is_none());
    assert!(!f.resources.are_size_dependent_vertex_buffers_fulfilled());

    f.resources.require_size_dependent_vertex_buffers(&[VertexBufferClass::Background]);
    f.settle();
    assert!(f.resources.are_size_dependent_vertex_buffers_fulfilled());
}

#[test]
fn failed_builds_are_reported_and_retried() {
    let mut f = fixture();
    f.backend.fail_creation_of("Icons");
    f.resources.require_size_independent_textures(&[TextureClass::Wood, TextureClass::Icons]);
    f.spawner.run_all();
    let error = f.resources.pump().unwrap_err();
    assert_eq!(error.failures.len(), 1);
    assert_eq!(error.failures[0].class, "Icons");
    assert!(matches!(error.failures[0].error, BuildError::Gpu(_)));
    assert!(!f.resources.are_size_independent_textures_fulfilled());
    assert!(f.resources.get_texture(TextureClass::Wood).is_some());

    f.backend.allow_creation_of("Icons");
    f.resources.require_size_independent_textures(&[TextureClass::Wood, TextureClass::Icons]);
    assert_eq!(f.spawner.pending_labels().len(), 1);
    f.settle();
    assert!(f.resources.are_size_independent_textures_fulfilled());
}

#[test]
fn undecodable_asset_fails_the_build() {
    let mut f = fixture();
    f.resources.assets().insert(ICONS_PATH, b"not an image".to_vec());
    f.resources.require_size_independent_textures(&[TextureClass::Icons]);
    f.spawner.run_all();
    let error = f.resources.pump().unwrap_err();
    assert!(matches!(error.failures[0].error, BuildError::Decode(_)));
}

#[test]
fn text_waits_on_the_font_but_geometry_does_not() {
    let mut f = fixture();
    f.resources.assets().remove(FONT_DEFINITION_PATH);
    f.resources.assets().insert(FONT_DEFINITION_PATH, b"info face=\"broken\"\n".to_vec());
    f.resources.require_size_dependent_vertex_buffers(&[
        VertexBufferClass::Background,
        VertexBufferClass::SettingsHubLabels,
    ]);
    f.spawner.run_all();
    let error = f.resources.pump().unwrap_err();
    assert_eq!(error.failures.len(), 1);
    assert_eq!(error.failures[0].class, "SettingsHubLabels");
    assert!(f.resources.get_vertex_buffer(VertexBufferClass::Background).is_some());

    //a fixed definition is picked up on the next require
    f.resources.assets().insert(FONT_DEFINITION_PATH, support::font_definition().into_bytes());
    f.resources.require_size_dependent_vertex_buffers(&[
        VertexBufferClass::Background,
        VertexBufferClass::SettingsHubLabels,
    ]);
    f.settle();
    assert!(f.resources.are_size_dependent_vertex_buffers_fulfilled());
}

#[test]
fn samplers_and_blend_state_come_with_textures() {
    let mut f = fixture();
    let mut ctx = f.resources.begin_frame();
    assert!(!f.resources.activate_linear_sampler(&mut ctx));
    f.resources.require_size_independent_textures(&[TextureClass::Wood]);
    f.settle();
    assert!(f.resources.activate_linear_sampler(&mut ctx));
    assert!(f.resources.activate_point_sampler(&mut ctx));
    assert!(f.resources.activate_blend_state(&mut ctx));
    let log = f.backend.log();
    assert_eq!(log.count(|c| matches!(c, GpuCall::CreateSampler { .. })), 2);
    assert_eq!(log.count(|c| matches!(c, GpuCall::CreateBlendState { .. })), 1);
}
