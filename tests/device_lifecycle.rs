// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Device loss, swap-chain changes and the shell keeping its caches in step.

mod support;

use metronome_amplified::display::{self, Orientation, PixelExtent, Rotation};
use metronome_amplified::geometry::Size;
use metronome_amplified::gpu::{AdapterId, DeviceLoss, SwapChainError};
use metronome_amplified::headless::{GpuCall, HeadlessBackend};
use metronome_amplified::resources::TextureClass;
use metronome_amplified::scenes::MainScene;
use metronome_amplified::shell::{RenderOutcome, Shell, ShellError};
use metronome_amplified::spawn::DeferredSpawner;

struct Harness {
    backend: HeadlessBackend,
    spawner: DeferredSpawner,
    shell: Shell<HeadlessBackend>,
}

impl Harness {
    fn new() -> Self {
        let f = support::fixture();
        let shell = Shell::new(f.resources, Box::new(MainScene::new()));
        Harness {
            backend: f.backend,
            spawner: f.spawner,
            shell,
        }
    }

    fn settle(&mut self) {
        self.spawner.run_all();
        self.shell.update(0.0).unwrap();
    }

    fn devices_created(&self) -> usize {
        self.backend.log().count(|c| matches!(c, GpuCall::CreateDevice { .. }))
    }
}

#[test]
fn renders_once_fulfilled() {
    let mut h = Harness::new();
    assert_eq!(h.shell.render().unwrap(), RenderOutcome::NotReady);
    assert_eq!(h.backend.log().count(|c| matches!(c, GpuCall::Present { .. })), 0);
    h.settle();
    assert_eq!(h.shell.render().unwrap(), RenderOutcome::Presented);
    let draws = h.backend.log().last_present().unwrap();
    assert!(!draws.is_empty());
}

#[test]
fn device_loss_rebuilds_everything() {
    let mut h = Harness::new();
    h.settle();
    let wood_before = *h.shell.resources().get_texture(TextureClass::Wood).unwrap().handle();

    h.backend.lose_device(DeviceLoss::Removed);
    h.shell.update(0.0).unwrap();
    assert_eq!(h.devices_created(), 2);
    assert!(h.shell.resources().swap_chain().is_some());
    assert!(!h.shell.resources().are_all_fulfilled());
    assert!(h.spawner.pending() > 0);
    assert_eq!(h.shell.render().unwrap(), RenderOutcome::NotReady);

    h.settle();
    assert_eq!(h.shell.render().unwrap(), RenderOutcome::Presented);
    let wood_after = *h.shell.resources().get_texture(TextureClass::Wood).unwrap().handle();
    assert_ne!(wood_before, wood_after);
}

#[test]
fn reset_during_present_recovers() {
    let mut h = Harness::new();
    h.settle();
    h.backend.fail_next_present(SwapChainError::DeviceReset);
    assert_eq!(h.shell.render().unwrap(), RenderOutcome::Presented);
    assert_eq!(h.devices_created(), 2);
    assert_eq!(h.shell.render().unwrap(), RenderOutcome::NotReady);
    h.settle();
    assert_eq!(h.shell.render().unwrap(), RenderOutcome::Presented);
}

#[test]
fn removal_during_resize_recovers() {
    let mut h = Harness::new();
    h.settle();
    h.backend.fail_next_resize(SwapChainError::DeviceRemoved);
    h.shell.set_logical_size(Size::new(800.0, 600.0)).unwrap();
    assert_eq!(h.devices_created(), 2);
    assert_eq!(
        h.shell.resources().swap_chain().map(|s| s.size),
        Some(PixelExtent { width: 800, height: 600 })
    );
}

#[test]
fn failed_recovery_is_retried() {
    let mut h = Harness::new();
    h.settle();
    h.backend.fail_device_creations(1);
    h.backend.lose_device(DeviceLoss::Removed);
    assert!(matches!(h.shell.update(0.0), Err(ShellError::Device(_))));
    assert!(h.shell.resources().swap_chain().is_none());
    h.shell.update(0.0).unwrap();
    assert!(h.shell.resources().swap_chain().is_some());
    h.settle();
    assert_eq!(h.shell.render().unwrap(), RenderOutcome::Presented);
}

#[test]
fn adapter_change_moves_the_device() {
    let mut h = Harness::new();
    h.settle();
    h.backend.set_default_adapter(AdapterId(42));
    h.shell.update(0.0).unwrap();
    assert!(matches!(
        h.backend.log().calls().iter().rev().find(|c| matches!(c, GpuCall::CreateDevice { .. })),
        Some(GpuCall::CreateDevice { adapter: AdapterId(42) })
    ));
    h.settle();
    assert!(h.shell.resources().are_all_fulfilled());
}

#[test]
fn rotation_swaps_the_swap_chain_and_rebuilds_layouts() {
    let mut h = Harness::new();
    h.settle();
    h.backend.log().clear();
    h.shell.set_current_orientation(Orientation::Portrait).unwrap();
    let resources = h.shell.resources();
    assert_eq!(resources.rotation(), Rotation::Rotate270);
    assert_eq!(resources.render_target_size(), PixelExtent { width: 768, height: 1024 });
    assert_eq!(resources.orientation_transform_3d(), Rotation::Rotate270.transform_3d());
    assert!(!resources.are_size_dependent_vertex_buffers_fulfilled());
    assert!(resources.are_size_independent_textures_fulfilled());

    h.settle();
    let labels = h.backend.log().created_labels();
    assert!(labels.contains(&"Background".to_string()));
    assert!(!labels.contains(&"Wood".to_string()));
}

#[test]
fn unchanged_display_values_keep_resources() {
    let mut h = Harness::new();
    h.settle();
    h.shell.set_logical_size(Size::new(1024.0, 768.0)).unwrap();
    h.shell.set_dpi(96.0).unwrap();
    h.shell.set_current_orientation(Orientation::Landscape).unwrap();
    assert!(h.shell.resources().are_all_fulfilled());
    assert_eq!(h.spawner.pending(), 0);
}

#[test]
fn dpi_change_follows_the_effective_dpi() {
    let mut h = Harness::new();
    h.settle();
    h.shell.set_dpi(192.0).unwrap();
    let resources = h.shell.resources();
    let logical = Size::new(1024.0, 768.0);
    let effective = display::effective_dpi(logical, 192.0, false);
    assert_eq!(resources.dpi(), 192.0);
    assert_eq!(resources.effective_dpi(), effective);
    assert_eq!(resources.output_size(), display::output_size(logical, effective));
    assert!(!resources.are_size_dependent_textures_fulfilled());
}

#[test]
fn trim_reaches_the_device() {
    let h = Harness::new();
    h.shell.trim();
    assert_eq!(h.backend.log().count(|c| matches!(c, GpuCall::Trim)), 1);
}

#[test]
fn dropping_the_shell_unregisters_its_observer() {
    let f = support::fixture();
    let shell = Shell::new(f.resources, Box::new(MainScene::new()));
    assert_eq!(shell.resources().device_notify_count(), 1);
    drop(shell);
}
