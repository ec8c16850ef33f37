// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use crate::pixel_formats::{DecodeError, RgbaImage};

pub(super) fn decode(bytes: &[u8]) -> Result<RgbaImage, DecodeError> {
    let decoded = image::load_from_memory_with_format(bytes, image::ImageFormat::Jpeg)?.to_rgba8();
    let (width, height) = decoded.dimensions();
    RgbaImage::from_rgba_bytes(width, height, decoded.as_raw())
        .ok_or_else(|| DecodeError::UnsupportedLayout(format!("{width}x{height} buffer size mismatch")))
}

#[cfg(test)]
mod tests {
    use crate::pixel_formats::{ImageEncoding, RgbaImage};

    #[test]
    fn decodes_opaque_rgba() {
        let rgb = image::RgbImage::from_pixel(4, 3, image::Rgb([200, 100, 50]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(rgb)
            .write_to(&mut bytes, image::ImageFormat::Jpeg)
            .unwrap();
        let decoded = RgbaImage::decode(bytes.get_ref(), ImageEncoding::Jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 3));
        assert!(decoded.pixels().iter().all(|p| p.a == 255));
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(RgbaImage::decode(b"\xff\xd8 nope", ImageEncoding::Jpeg).is_err());
    }
}
