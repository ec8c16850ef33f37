// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Display geometry: DPI policy, output sizing and orientation.
*/

use glam::{Affine2, Mat4, Vec2};

use crate::geometry::Size;

/// Logical DPI at which one device-independent pixel is one physical pixel.
pub const BASE_DPI: f32 = 96.0;

/**
Thresholds for the high-resolution policy.

Above these, rendering at full resolution costs more than it looks better on a phone-sized
screen, so the effective DPI is halved unless the app opts out.
*/
pub struct DisplayMetrics;

impl DisplayMetrics {
    pub const DPI_THRESHOLD: f32 = 192.0;
    pub const WIDTH_THRESHOLD: f32 = 1920.0;
    pub const HEIGHT_THRESHOLD: f32 = 1080.0;
}

/// Rounds device-independent pixels to physical pixels at `dpi`.
pub fn dips_to_pixels(dips: f32, dpi: f32) -> f32 {
    (dips * dpi / BASE_DPI + 0.5).floor()
}

/**
The DPI the app renders at.

Halved when high resolutions are not supported, the DPI is at least the threshold, and the
physical size exceeds the width threshold on its long side and the height threshold on its
short side.
*/
pub fn effective_dpi(logical_size: Size, dpi: f32, support_high_resolutions: bool) -> f32 {
    if support_high_resolutions || dpi < DisplayMetrics::DPI_THRESHOLD {
        return dpi;
    }
    let width = dips_to_pixels(logical_size.width, dpi);
    let height = dips_to_pixels(logical_size.height, dpi);
    if width.max(height) > DisplayMetrics::WIDTH_THRESHOLD && width.min(height) > DisplayMetrics::HEIGHT_THRESHOLD {
        dpi / 2.0
    } else {
        dpi
    }
}

/// Output size in physical pixels, never smaller than 1x1.
pub fn output_size(logical_size: Size, effective_dpi: f32) -> Size {
    Size::new(
        dips_to_pixels(logical_size.width, effective_dpi).max(1.0),
        dips_to_pixels(logical_size.height, effective_dpi).max(1.0),
    )
}

/// A size in whole pixels, as a swap chain wants it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelExtent {
    pub width: u32,
    pub height: u32,
}

impl PixelExtent {
    pub fn from_size(size: Size) -> Self {
        PixelExtent {
            width: size.width.max(1.0) as u32,
            height: size.height.max(1.0) as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// The platform could not say.
    #[default]
    Unknown,
    Landscape,
    Portrait,
    LandscapeFlipped,
    PortraitFlipped,
}

/// How far the swap chain content is rotated relative to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    Identity,
    Rotate90,
    Rotate180,
    Rotate270,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("Unsupported orientation pair: native {native:?}, current {current:?}")]
pub struct RotationError {
    pub native: Orientation,
    pub current: Orientation,
}

// row-major, applied to row vectors
const ROTATION_0: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];
const ROTATION_90: [[f32; 4]; 4] = [
    [0.0, 1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];
const ROTATION_180: [[f32; 4]; 4] = [
    [-1.0, 0.0, 0.0, 0.0],
    [0.0, -1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];
const ROTATION_270: [[f32; 4]; 4] = [
    [0.0, -1.0, 0.0, 0.0],
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

impl Rotation {
    /**
    Maps the panel's native orientation and the current one to a rotation.

    Fails for any pair involving [Orientation::Unknown].
    */
    pub fn compute(native: Orientation, current: Orientation) -> Result<Rotation, RotationError> {
        use Orientation::*;
        let rotation = match (native, current) {
            (Landscape, Landscape) => Rotation::Identity,
            (Landscape, Portrait) => Rotation::Rotate270,
            (Landscape, LandscapeFlipped) => Rotation::Rotate180,
            (Landscape, PortraitFlipped) => Rotation::Rotate90,
            (Portrait, Landscape) => Rotation::Rotate90,
            (Portrait, Portrait) => Rotation::Identity,
            (Portrait, LandscapeFlipped) => Rotation::Rotate270,
            (Portrait, PortraitFlipped) => Rotation::Rotate180,
            _ => return Err(RotationError { native, current }),
        };
        Ok(rotation)
    }

    /// Whether the swap chain's width and height are swapped relative to the logical size.
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Rotate90 | Rotation::Rotate270)
    }

    /// Swap-chain size for an output size under this rotation.
    pub fn swap_chain_extent(self, output: Size) -> PixelExtent {
        if self.swaps_dimensions() {
            PixelExtent::from_size(Size::new(output.height, output.width))
        } else {
            PixelExtent::from_size(output)
        }
    }

    /**
    Transform for 2D overlay content in logical coordinates (y down).

    Rotates by the angle, then translates back into the visible quadrant.
    */
    pub fn transform_2d(self, logical_size: Size) -> Affine2 {
        let (w, h) = (logical_size.width, logical_size.height);
        match self {
            Rotation::Identity => Affine2::IDENTITY,
            Rotation::Rotate90 => Affine2::from_cols(Vec2::new(0.0, 1.0), Vec2::new(-1.0, 0.0), Vec2::new(h, 0.0)),
            Rotation::Rotate180 => Affine2::from_cols(Vec2::new(-1.0, 0.0), Vec2::new(0.0, -1.0), Vec2::new(w, h)),
            Rotation::Rotate270 => Affine2::from_cols(Vec2::new(0.0, -1.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, w)),
        }
    }

    /// The row-major 3D rotation for this state.
    pub fn transform_3d_rows(self) -> [[f32; 4]; 4] {
        match self {
            Rotation::Identity => ROTATION_0,
            Rotation::Rotate90 => ROTATION_270,
            Rotation::Rotate180 => ROTATION_180,
            Rotation::Rotate270 => ROTATION_90,
        }
    }

    /// [Rotation::transform_3d_rows] as a glam matrix.
    pub fn transform_3d(self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.transform_3d_rows()).transpose()
    }
}

/// What the platform tells us about the window when it is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayInfo {
    /// In device-independent pixels.
    pub logical_size: Size,
    pub dpi: f32,
    pub native_orientation: Orientation,
    pub current_orientation: Orientation,
}
