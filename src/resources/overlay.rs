// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
The translucent panel texture behind the app's controls.

The image is `2R x 2R` white pixels, where `R` is a quarter inch at the current DPI.  Its
quadrants are sampled separately by the overlay layouts:

| quadrant     | content                                   |
|--------------|-------------------------------------------|
| top-left     | outer rounded corner, translucent inside   |
| top-right    | solid translucent fill                     |
| bottom-left  | inner (concave) corner                     |
| bottom-right | fully transparent                          |
*/

use crate::pixel_formats::{RgbaImage, Unorm4};

/// Alpha of the translucent parts.
pub const ALPHA_LEVEL: u8 = 0x80;

/// Corner radius in inches.
pub const CORNER_RADIUS_INCHES: f32 = 0.25;

/// Corner radius in pixels at `dpi`; at least one pixel so the texture is never empty.
pub fn corner_radius_pixels(dpi: f32) -> u32 {
    ((CORNER_RADIUS_INCHES * dpi) as u32).max(1)
}

/// Count of leading transparent pixels on row `j` of the outer corner.
fn outer_transparent(j: u32, radius: u32) -> i64 {
    let (j, r) = (j as f64, radius as f64);
    (r - (2.0 * j * r - j * j).max(0.0).sqrt()) as i64
}

/// Count of leading transparent pixels on row `j` of the inner corner.
fn inner_transparent(j: u32, radius: u32) -> i64 {
    let (j, r) = (j as f64, radius as f64);
    (2.0 * j * r - j * j).max(0.0).sqrt() as i64
}

/// Generates the overlay image for a corner radius in pixels.
pub fn generate(radius: u32) -> RgbaImage {
    let mut image = RgbaImage::filled(2 * radius, 2 * radius, Unorm4::TRANSPARENT_WHITE);
    let alpha = |a: u8| Unorm4 { a, ..Unorm4::TRANSPARENT_WHITE };
    for j in 0..radius {
        let outer = outer_transparent(j, radius);
        let inner = inner_transparent(j, radius);
        for i in 0..radius {
            let covered = |transparent: i64| if (i as i64) <= transparent { 0 } else { ALPHA_LEVEL };
            image.put(i, j, alpha(covered(outer)));
            image.put(radius + i, j, alpha(ALPHA_LEVEL));
            image.put(i, radius + j, alpha(covered(inner)));
            image.put(radius + i, radius + j, alpha(0));
        }
    }
    image
}
