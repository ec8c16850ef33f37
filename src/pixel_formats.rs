// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! CPU-side pixel data for texture upload.
//!
//! Every texture in the app is 8-bit RGBA.  Image assets arrive as PNG or JPEG bytes and are
//! decoded into an [`RgbaImage`]; procedural textures build one directly.
//!
//! ```
//! use metronome_amplified::pixel_formats::{RgbaImage, Unorm4};
//!
//! let mut image = RgbaImage::new(2, 2);
//! image.put(1, 0, Unorm4 { r: 255, g: 255, b: 255, a: 128 });
//! assert_eq!(image.get(1, 0).a, 128);
//! ```

mod jpeg_support;
mod png_support;

/// One 8-bit RGBA pixel.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Unorm4 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Unorm4 {
    pub const TRANSPARENT_WHITE: Unorm4 = Unorm4 {
        r: 0xff,
        g: 0xff,
        b: 0xff,
        a: 0,
    };

    /// Convert from normalized float values (0.0-1.0) to 8-bit values (0-255).
    ///
    /// Values are clamped to the valid range and rounded to nearest integer.
    pub fn from_floats(rgba: [f32; 4]) -> Self {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Unorm4 {
            r: c(rgba[0]),
            g: c(rgba[1]),
            b: c(rgba[2]),
            a: c(rgba[3]),
        }
    }
}

/// Which decoder an encoded image needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    Png,
    Jpeg,
}

impl ImageEncoding {
    /// Picks the encoding from a file extension (case-insensitive).
    pub fn from_path(path: &str) -> Option<ImageEncoding> {
        let (_, ext) = path.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageEncoding::Png),
            "jpg" | "jpeg" => Some(ImageEncoding::Jpeg),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("PNG decode failed: {0}")]
    Png(#[from] png::DecodingError),
    #[error("JPEG decode failed: {0}")]
    Jpeg(#[from] image::ImageError),
    #[error("Unsupported pixel layout {0}")]
    UnsupportedLayout(String),
    #[error("Unknown image encoding for {0}")]
    UnknownEncoding(String),
}

/**
A row-major 8-bit RGBA image, top row first.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct RgbaImage {
    width: u32,
    height: u32,
    pixels: Vec<Unorm4>,
}

impl RgbaImage {
    /// A fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Unorm4::default())
    }

    pub fn filled(width: u32, height: u32, pixel: Unorm4) -> Self {
        RgbaImage {
            width,
            height,
            pixels: vec![pixel; width as usize * height as usize],
        }
    }

    /// Wraps tightly-packed RGBA bytes.  Returns `None` if the length doesn't match.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(RgbaImage {
            width,
            height,
            pixels: bytemuck::cast_slice(bytes).to_vec(),
        })
    }

    /// Decodes PNG or JPEG bytes.
    pub fn decode(bytes: &[u8], encoding: ImageEncoding) -> Result<Self, DecodeError> {
        match encoding {
            ImageEncoding::Png => png_support::decode(bytes),
            ImageEncoding::Jpeg => jpeg_support::decode(bytes),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "Pixel out of bounds");
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Unorm4 {
        self.pixels[self.index(x, y)]
    }

    pub fn put(&mut self, x: u32, y: u32, pixel: Unorm4) {
        let i = self.index(x, y);
        self.pixels[i] = pixel;
    }

    pub fn pixels(&self) -> &[Unorm4] {
        &self.pixels
    }

    /// Raw bytes in upload order.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_from_path() {
        assert_eq!(ImageEncoding::from_path("Textures/icons.png"), Some(ImageEncoding::Png));
        assert_eq!(ImageEncoding::from_path("Textures/wood.JPG"), Some(ImageEncoding::Jpeg));
        assert_eq!(ImageEncoding::from_path("Textures/noext"), None);
    }

    #[test]
    fn byte_view_matches_pixels() {
        let mut image = RgbaImage::new(2, 1);
        image.put(1, 0, Unorm4 { r: 1, g: 2, b: 3, a: 4 });
        assert_eq!(image.as_bytes(), &[0, 0, 0, 0, 1, 2, 3, 4]);
        let copy = RgbaImage::from_rgba_bytes(2, 1, image.as_bytes()).unwrap();
        assert_eq!(copy, image);
        assert!(RgbaImage::from_rgba_bytes(3, 1, image.as_bytes()).is_none());
    }

    #[test]
    fn from_floats_rounds_and_clamps() {
        let p = Unorm4::from_floats([0.5, 1.5, -1.0, 1.0]);
        assert_eq!(p, Unorm4 { r: 128, g: 255, b: 0, a: 255 });
    }
}
