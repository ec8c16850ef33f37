// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Fixtures shared by the integration tests.
//!
//! Shaders are read from the crate's `assets/` directory; textures and the font are small
//! generated stand-ins injected into the asset overlay.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use metronome_amplified::device::{DeviceResources, ResourcesConfig};
use metronome_amplified::display::{DisplayInfo, Orientation};
use metronome_amplified::geometry::Size;
use metronome_amplified::headless::{HeadlessBackend, HeadlessWindow};
use metronome_amplified::resources::FONT_DEFINITION_PATH;
use metronome_amplified::spawn::DeferredSpawner;

pub const WOOD_PATH: &str = "Textures/wood_bg_texture.jpg";
pub const FONT_TEXTURE_PATH: &str = "Textures/Orkney.png";
pub const ICONS_PATH: &str = "Textures/icons.png";
pub const SAMPLE_IMAGE_PATH: &str = "Textures/sample_screenshot.png";

pub fn landscape() -> DisplayInfo {
    DisplayInfo {
        logical_size: Size::new(1024.0, 768.0),
        dpi: 96.0,
        native_orientation: Orientation::Landscape,
        current_orientation: Orientation::Landscape,
    }
}

/// A BMFont definition with every printable ASCII glyph, 10 pixels apart.
pub fn font_definition() -> String {
    let mut s = String::from(
        "info face=\"Orkney\" size=32 bold=0 italic=0\ncommon lineHeight=20 base=16 scaleW=256 scaleH=256 pages=1\npage id=0 file=\"Orkney.png\"\nchars count=95\n",
    );
    for id in 32..127 {
        s.push_str(&format!(
            "char id={id} x={x} y={y} width=8 height=12 xoffset=1 yoffset=4 xadvance=10 page=0 chnl=15\n",
            x = (id % 16) * 16,
            y = (id / 16) * 16
        ));
    }
    s
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let data: Vec<u8> = (0..width * height).flat_map(|i| [(i % 256) as u8, 0x80, 0x40, 0xff]).collect();
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&data).unwrap();
    }
    out
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let data: Vec<u8> = (0..width * height).flat_map(|_| [0x8b, 0x5a, 0x2b]).collect();
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut out)
        .encode(&data, width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    out
}

/// Puts every non-shader asset into the overlay.
pub fn install_assets<B: metronome_amplified::gpu::Backend>(resources: &DeviceResources<B>) {
    let assets = resources.assets();
    assets.insert(WOOD_PATH, jpeg(16, 16));
    assets.insert(FONT_TEXTURE_PATH, png(32, 32));
    assets.insert(ICONS_PATH, png(16, 16));
    assets.insert(SAMPLE_IMAGE_PATH, png(8, 8));
    assets.insert(FONT_DEFINITION_PATH, font_definition().into_bytes());
}

pub fn config() -> ResourcesConfig {
    ResourcesConfig {
        asset_root: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"),
        ..ResourcesConfig::default()
    }
}

pub struct Fixture {
    pub backend: HeadlessBackend,
    pub spawner: DeferredSpawner,
    pub resources: DeviceResources<HeadlessBackend>,
}

/// A facade on the headless backend with a landscape window attached and every asset present.
pub fn fixture() -> Fixture {
    let backend = HeadlessBackend::new();
    let spawner = DeferredSpawner::new();
    let mut resources = DeviceResources::new(backend.clone(), config(), Arc::new(spawner.clone())).unwrap();
    install_assets(&resources);
    resources.set_window(HeadlessWindow, landscape()).unwrap();
    Fixture {
        backend,
        spawner,
        resources,
    }
}

impl Fixture {
    /// Runs every queued build and applies the results.
    pub fn settle(&mut self) {
        self.spawner.run_all();
        self.resources.pump().unwrap();
    }
}
