// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Screen layouts: the vertex data for each vertex-buffer class.

Everything here is pure CPU work over [BuildMetrics] (and the font, for text).  Positions are
laid out on a grid of quarter-inch margins so the screens keep their proportions across
window sizes and densities.
*/

use crate::font::{Font, Gravity, TextBox};
use crate::geometry::{Rect, VertexTexCoord};
use crate::resources::vertex_algorithms::{put_square, put_square_centred_inside};
use crate::resources::vertex_buffer::{VertexData, VertexTable};
use crate::resources::{BuildError, BuildMetrics, VertexBufferClass};

/// Height cap for headings and labels, as a multiple of the margin in pixels.
const HEADING_HEIGHT_MARGINS: f32 = 1.2;
/// Height cap for body text, as a multiple of the margin in pixels.
const BODY_HEIGHT_MARGINS: f32 = 0.9;

pub const MAIN_SCREEN_LABELS: [&str; 6] = ["TONE", "SONG", "HELP", "SETTINGS", "TIMER", "LIFT"];

pub const SETTINGS_HUB_LABELS: [&str; 5] = [
    "Help Sections",
    "Navigating the App",
    "Controlling the Experience",
    "Crafting Your Song",
    "Managing Song Files",
];

pub const NAVIGATION_HEADING: &str = "Navigating the App";

/// One card per paragraph on the navigation help screen.
pub const NAVIGATION_CARDS: [&str; 8] = [
    "The pattern of percussive beats you'll play along with are displayed here. The time signature is shown, along with the timing of each note, in case you're familiar with musical notation. A song consists of one or more of these sections, each with its own note pattern, and therefore can be very simple or very complex.",
    "Playback is controlled with the buttons at the bottom. Fast-forward and rewind have a use only with songs that have multiple sections. Pausing will halt the current position in the current section, while stopping will reset the playback position to the beginning.",
    "A section of a song has a default tempo, although the tempo it is being played at can vary. Tapping the beat-per-minute count will reset to the default tempo, while the slider allows free manual adjustments.",
    "Training modes exist to alter the tempo automatically while you play, or set a limit to how long you'd like to play. Pressing the One-touch Tempo Lift button will begin tempo control, and this feature can be customised through the settings screen.",
    "The timer will allow you to set a timespan before the metronome stops playing.",
    "There is more than one set of sounds that the metronome can play - they can be loaded by pressing the Tone button.",
    "The song and its sections can be fully customised by tapping the Song button.",
    "Various settings are accessible by tapping the Settings button. These settings control the Tempo Lift behaviour, as well as visual cues to coincide with the sounds you here.",
];

/// Aspect ratio (width / height) of the sample screenshot.
const SAMPLE_IMAGE_ASPECT: f32 = 720.0 / 1280.0;

/// Vertical guide lines shared by the main screen layouts.
struct MainGrid {
    w1: f32,
    w2: f32,
    w3: f32,
    w4: f32,
    w5: f32,
    w6: f32,
    w7: f32,
    w8: f32,
    w9: f32,
    w10: f32,
    h1: f32,
    h2: f32,
    h3: f32,
    h4: f32,
    h5: f32,
    h6: f32,
}

impl MainGrid {
    fn new(metrics: &BuildMetrics) -> Self {
        let (mw, mh) = metrics.margin_units();
        let w1 = -1.0 + mw;
        let w4 = -1.0 + (2.0 - 2.0 * mw) / 3.0;
        let w7 = 1.0 - (2.0 - 2.0 * mw) / 3.0;
        let w10 = 1.0 - mw;
        let h1 = -1.0 + mh;
        let h4 = -1.0 + (2.0 - mh) / 4.0;
        let h6 = -mh;
        MainGrid {
            w1,
            w2: w1 + mw,
            w3: w4 - mw,
            w4,
            w5: w4 + mw,
            w6: w7 - mw,
            w7,
            w8: w7 + mw,
            w9: w10 - mw,
            w10,
            h1,
            h2: h1 + mh,
            h3: h4 - mh,
            h4,
            h5: h6 - mh,
            h6,
        }
    }

    /// Top of the labels under the two lower icons.
    fn lower_label_top(&self) -> f32 {
        self.h2 + 0.25 * (self.h3 - self.h2)
    }
}

/// Columns of the four icons across the top of the main screen.
const TOP_ICON_COLUMNS: [f32; 5] = [-1.0, -0.5, 0.0, 0.5, 1.0];
const TOP_ICON_BOTTOM: f32 = 0.7;
const TOP_ICON_TOP: f32 = 1.0;
const TOP_ICON_LABEL_BOTTOM: f32 = 0.5;

/// Computes the vertex data for `class`.  Text layouts need `font`.
pub fn generate(class: VertexBufferClass, metrics: &BuildMetrics, font: Option<&Font>) -> Result<VertexData, BuildError> {
    let text_font = || font.ok_or(BuildError::FontUnavailable);
    let data = match class {
        VertexBufferClass::Background => background(),
        VertexBufferClass::MainScreenTranslucentOverlay => main_screen_overlay(metrics),
        VertexBufferClass::MainScreenIcons => main_screen_icons(metrics),
        VertexBufferClass::MainScreenIconLabels => main_screen_icon_labels(metrics, text_font()?),
        VertexBufferClass::SettingsHubLabels => settings_hub_labels(metrics, text_font()?),
        VertexBufferClass::HelpDetailsOverlay => help_details_overlay(metrics),
        VertexBufferClass::HelpDetailsIcons => help_details_icons(metrics),
        VertexBufferClass::HelpNavigatingImages => help_navigating_images(metrics),
        VertexBufferClass::HelpNavigatingTexts => help_navigating_texts(metrics, text_font()?),
    };
    Ok(data)
}

fn single(vertices: Vec<VertexTexCoord>) -> VertexData {
    let end = vertices.len() as u32;
    VertexData {
        vertices,
        table: VertexTable::new(vec![0, end], Vec::new()),
    }
}

fn background() -> VertexData {
    let mut v = Vec::with_capacity(6);
    put_square(&mut v, -1.0, -1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0);
    single(v)
}

fn main_screen_overlay(metrics: &BuildMetrics) -> VertexData {
    let g = MainGrid::new(metrics);
    let mut v = Vec::with_capacity(108);
    //lower-left and lower-right panels
    put_square(&mut v, g.w1, g.h1, g.w2, g.h2, 0.0, 0.0, 0.5, 0.5);
    put_square(&mut v, g.w2, g.h1, g.w3, g.h2, 0.5, 0.0, 1.0, 0.5);
    put_square(&mut v, g.w3, g.h1, g.w4, g.h2, 0.5, 0.0, 0.0, 0.5);
    put_square(&mut v, g.w7, g.h1, g.w8, g.h2, 0.0, 0.0, 0.5, 0.5);
    put_square(&mut v, g.w8, g.h1, g.w9, g.h2, 0.5, 0.0, 1.0, 0.5);
    put_square(&mut v, g.w9, g.h1, g.w10, g.h2, 0.5, 0.0, 0.0, 0.5);
    put_square(&mut v, g.w1, g.h2, g.w2, g.h4, 0.5, 0.0, 1.0, 0.5);
    put_square(&mut v, g.w2, g.h3, g.w3, g.h4, 0.5, 0.0, 1.0, 0.5);
    put_square(&mut v, g.w3, g.h2, g.w4, g.h4, 0.5, 0.0, 1.0, 0.5);
    put_square(&mut v, g.w7, g.h2, g.w8, g.h4, 0.5, 0.0, 1.0, 0.5);
    put_square(&mut v, g.w8, g.h3, g.w9, g.h4, 0.5, 0.0, 1.0, 0.5);
    put_square(&mut v, g.w9, g.h2, g.w10, g.h4, 0.5, 0.0, 1.0, 0.5);
    //inner corners joining the panels to the middle strip
    put_square(&mut v, g.w4, g.h3, g.w5, g.h4, 0.5, 1.0, 0.0, 0.5);
    put_square(&mut v, g.w6, g.h3, g.w7, g.h4, 0.0, 1.0, 0.5, 0.5);
    //middle strip and its rounded top
    put_square(&mut v, g.w1, g.h4, g.w10, g.h5, 0.5, 0.0, 1.0, 0.5);
    put_square(&mut v, g.w1, g.h5, g.w2, g.h6, 0.0, 0.5, 0.5, 0.0);
    put_square(&mut v, g.w2, g.h5, g.w9, g.h6, 0.5, 0.5, 1.0, 0.0);
    put_square(&mut v, g.w9, g.h5, g.w10, g.h6, 0.5, 0.5, 0.0, 0.0);
    single(v)
}

fn main_screen_icons(metrics: &BuildMetrics) -> VertexData {
    let g = MainGrid::new(metrics);
    let size = metrics.output_size;
    let mut v = Vec::with_capacity(36);
    for (i, cols) in TOP_ICON_COLUMNS.windows(2).enumerate() {
        let s1 = 0.25 * i as f32;
        put_square_centred_inside(&mut v, cols[0], TOP_ICON_BOTTOM, cols[1], TOP_ICON_TOP, s1, 0.5, s1 + 0.25, 0.0, size);
    }
    let label_top = g.lower_label_top();
    put_square_centred_inside(&mut v, g.w2, label_top, g.w3, g.h3, 0.0, 1.0, 0.25, 0.5, size);
    put_square_centred_inside(&mut v, g.w8, label_top, g.w9, g.h3, 0.25, 1.0, 0.5, 0.5, size);
    single(v)
}

fn main_screen_icon_labels(metrics: &BuildMetrics, font: &Font) -> VertexData {
    let g = MainGrid::new(metrics);
    let size = metrics.output_size;
    let max_h = HEADING_HEIGHT_MARGINS * 0.25 * metrics.dpi;
    let label_top = g.lower_label_top();
    let mut boxes = Vec::with_capacity(6);
    for cols in TOP_ICON_COLUMNS.windows(2) {
        boxes.push(TextBox::new(cols[0], TOP_ICON_BOTTOM, cols[1] - cols[0], TOP_ICON_BOTTOM - TOP_ICON_LABEL_BOTTOM));
    }
    boxes.push(TextBox::new(g.w2, label_top, g.w3 - g.w2, label_top - g.h2));
    boxes.push(TextBox::new(g.w8, label_top, g.w9 - g.w8, label_top - g.h2));

    let mut v = Vec::new();
    for (label, text_box) in MAIN_SCREEN_LABELS.iter().zip(&boxes) {
        font.print_line(&mut v, label, text_box, max_h, size, Gravity::Center, Gravity::Center);
    }
    single(v)
}

fn settings_hub_labels(metrics: &BuildMetrics, font: &Font) -> VertexData {
    let (mw, mh) = metrics.margin_units();
    let size = metrics.output_size;
    let left = -1.0 + mw;
    let right = 1.0 - mw;
    //row tops, two margins apart
    let rows: Vec<f32> = (1..=6).map(|k| 1.0 - 2.0 * mh * k as f32).collect();
    let max_h = HEADING_HEIGHT_MARGINS * 0.25 * metrics.dpi;

    let mut v = Vec::new();
    let mut sub_buffers = vec![0];
    for (k, label) in SETTINGS_HUB_LABELS.iter().enumerate() {
        let text_box = TextBox::new(left, rows[k], right - left, rows[k] - rows[k + 1]);
        font.print_line(&mut v, label, &text_box, max_h, size, Gravity::Start, Gravity::Center);
        if k == 0 {
            sub_buffers.push(v.len() as u32);
        }
    }
    sub_buffers.push(v.len() as u32);
    //the "Navigating the App" row
    let regions = vec![Rect::new(left, rows[2], right - left, rows[1] - rows[2])];
    VertexData {
        vertices: v,
        table: VertexTable::new(sub_buffers, regions),
    }
}

fn help_details_overlay(metrics: &BuildMetrics) -> VertexData {
    let (mw, mh) = metrics.margin_units();
    let w1 = -1.0 + mw;
    let w2 = w1 + mw;
    let w4 = 1.0 - mw;
    let w3 = w4 - mw;
    let h1 = -1.0 + mh;
    let h2 = h1 + mh;
    let h4 = 1.0 - 4.0 * mh;
    let h3 = h4 - mh;
    let mut v = Vec::with_capacity(42);
    put_square(&mut v, w1, h1, w2, h2, 0.0, 0.0, 0.5, 0.5);
    put_square(&mut v, w2, h1, w3, h2, 0.5, 0.0, 1.0, 0.5);
    put_square(&mut v, w3, h1, w4, h2, 0.5, 0.0, 0.0, 0.5);
    put_square(&mut v, w1, h2, w4, h3, 0.5, 0.0, 1.0, 0.5);
    put_square(&mut v, w1, h3, w2, h4, 0.0, 0.5, 0.5, 0.0);
    put_square(&mut v, w2, h3, w3, h4, 0.5, 0.5, 1.0, 0.0);
    put_square(&mut v, w3, h3, w4, h4, 0.5, 0.5, 0.0, 0.0);
    single(v)
}

fn help_details_icons(metrics: &BuildMetrics) -> VertexData {
    let (mw, _) = metrics.margin_units();
    let size = metrics.output_size;
    let aspect = size.width / size.height;
    let icon_h = 0.25;
    let icon_w = icon_h * 0.5 / aspect;
    let w1 = -1.0 + mw;
    let w2 = w1 + icon_w;
    let w4 = 1.0 - mw;
    let w3 = w4 - icon_w;
    let h1 = -0.5 * icon_h;
    let h2 = 0.5 * icon_h;
    let mut v = Vec::with_capacity(12);
    //previous arrow, then the same arrow mirrored for next
    put_square(&mut v, w1, h1, w2, h2, 0.875, 0.5, 1.0, 1.0);
    put_square(&mut v, w3, h1, w4, h2, 1.0, 0.5, 0.875, 1.0);
    let regions = vec![Rect::new(w1, h1, w2 - w1, h2 - h1), Rect::new(w3, h1, w4 - w3, h2 - h1)];
    VertexData {
        table: VertexTable::new(vec![0, v.len() as u32], regions),
        vertices: v,
    }
}

fn help_navigating_images(metrics: &BuildMetrics) -> VertexData {
    let (_, mh) = metrics.margin_units();
    let size = metrics.output_size;
    let screen_aspect = size.width / size.height;
    let h1 = -0.125 - mh;
    let h2 = 1.0 - 5.0 * mh;
    let width = (h2 - h1) * SAMPLE_IMAGE_ASPECT / screen_aspect;
    let mut v = Vec::with_capacity(6);
    put_square(&mut v, -0.5 * width, h1, 0.5 * width, h2, 0.0, 1.0, 1.0, 0.0);
    single(v)
}

fn help_navigating_texts(metrics: &BuildMetrics, font: &Font) -> VertexData {
    let (mw, mh) = metrics.margin_units();
    let size = metrics.output_size;
    let w1 = -1.0 + mw;
    let w2 = w1 + mw;
    let w4 = 1.0 - mw;
    let w3 = w4 - mw;
    let h1 = -1.0 + 2.0 * mh;
    let h2 = -0.125 - mh;
    let h4 = 1.0 - mh;
    let h3 = h4 - 2.0 * mh;
    let heading_h = HEADING_HEIGHT_MARGINS * 0.25 * metrics.dpi;
    let body_h = BODY_HEIGHT_MARGINS * 0.25 * metrics.dpi;

    let mut v = Vec::new();
    let mut sub_buffers = vec![0];
    font.print_line(
        &mut v,
        NAVIGATION_HEADING,
        &TextBox::new(w1, h4, w4 - w1, h4 - h3),
        heading_h,
        size,
        Gravity::Start,
        Gravity::Center,
    );
    sub_buffers.push(v.len() as u32);
    let body = TextBox::new(w2, h2, w3 - w2, h2 - h1);
    for card in NAVIGATION_CARDS {
        font.print_wrapped(&mut v, card, &body, body_h, size, Gravity::Start, Gravity::Start);
        sub_buffers.push(v.len() as u32);
    }
    VertexData {
        vertices: v,
        table: VertexTable::new(sub_buffers, Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::monospace_font;
    use crate::geometry::Size;
    use crate::resources::ResourceClass;

    fn metrics() -> BuildMetrics {
        BuildMetrics {
            output_size: Size::new(1280.0, 720.0),
            dpi: 96.0,
        }
    }

    fn chars(texts: &[&str]) -> u32 {
        texts.iter().map(|t| 6 * t.chars().count() as u32).sum()
    }

    #[test]
    fn every_class_generates() {
        let font = monospace_font();
        for class in VertexBufferClass::ALL {
            let data = generate(*class, &metrics(), Some(&font)).unwrap();
            assert_eq!(data.table.sub_buffer_end(), data.vertices.len() as u32, "{class:?}");
            assert_eq!(data.vertices.len() % 6, 0);
        }
    }

    #[test]
    fn text_layouts_need_the_font() {
        assert!(matches!(
            generate(VertexBufferClass::SettingsHubLabels, &metrics(), None),
            Err(BuildError::FontUnavailable)
        ));
        assert!(generate(VertexBufferClass::Background, &metrics(), None).is_ok());
    }

    #[test]
    fn fixed_quad_counts() {
        let m = metrics();
        let count = |c| generate(c, &m, None).unwrap().vertices.len();
        assert_eq!(count(VertexBufferClass::Background), 6);
        assert_eq!(count(VertexBufferClass::MainScreenTranslucentOverlay), 108);
        assert_eq!(count(VertexBufferClass::MainScreenIcons), 36);
        assert_eq!(count(VertexBufferClass::HelpDetailsOverlay), 42);
        assert_eq!(count(VertexBufferClass::HelpDetailsIcons), 12);
        assert_eq!(count(VertexBufferClass::HelpNavigatingImages), 6);
    }

    #[test]
    fn hub_sub_buffers_split_heading_from_rows() {
        let font = monospace_font();
        let data = generate(VertexBufferClass::SettingsHubLabels, &metrics(), Some(&font)).unwrap();
        assert_eq!(data.table.sub_buffer_count(), 2);
        assert_eq!(data.table.vertices_in_sub_buffer(0), chars(&SETTINGS_HUB_LABELS[..1]));
        assert_eq!(data.table.index_of_sub_buffer(1), chars(&SETTINGS_HUB_LABELS[..1]));
        assert_eq!(data.table.vertices_in_sub_buffer(1), chars(&SETTINGS_HUB_LABELS[1..]));
    }

    #[test]
    fn hub_region_is_second_row() {
        let font = monospace_font();
        let data = generate(VertexBufferClass::SettingsHubLabels, &metrics(), Some(&font)).unwrap();
        let (_, mh) = metrics().margin_units();
        //middle of the "Navigating the App" row
        let y = 1.0 - 5.0 * mh;
        assert_eq!(data.table.region_of_interest_at(0.0, y), Some(0));
        assert_eq!(data.table.region_of_interest_at(0.0, 1.0 - mh), None);
        assert_eq!(data.table.region_of_interest_at(0.0, -0.9), None);
    }

    #[test]
    fn arrows_are_regions() {
        let data = generate(VertexBufferClass::HelpDetailsIcons, &metrics(), None).unwrap();
        let (mw, _) = metrics().margin_units();
        assert_eq!(data.table.region_of_interest_at(-1.0 + mw + 0.01, 0.0), Some(0));
        assert_eq!(data.table.region_of_interest_at(1.0 - mw - 0.01, 0.0), Some(1));
        assert_eq!(data.table.region_of_interest_at(0.0, 0.0), None);
    }

    #[test]
    fn navigation_texts_have_a_sub_buffer_per_card() {
        let font = monospace_font();
        let data = generate(VertexBufferClass::HelpNavigatingTexts, &metrics(), Some(&font)).unwrap();
        assert_eq!(data.table.sub_buffer_count(), 1 + NAVIGATION_CARDS.len());
        assert_eq!(data.table.vertices_in_sub_buffer(0), chars(&[NAVIGATION_HEADING]));
        for (i, card) in NAVIGATION_CARDS.iter().enumerate() {
            assert_eq!(data.table.vertices_in_sub_buffer(i + 1), chars(&[card]));
        }
    }

    #[test]
    fn background_covers_the_screen() {
        let data = generate(VertexBufferClass::Background, &metrics(), None).unwrap();
        let xs: Vec<f32> = data.vertices.iter().map(VertexTexCoord::x).collect();
        assert!(xs.contains(&-1.0) && xs.contains(&1.0));
    }
}
