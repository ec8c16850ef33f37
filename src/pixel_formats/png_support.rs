// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use std::io::Cursor;

use png::{BitDepth, ColorType, Transformations};

use crate::pixel_formats::{DecodeError, RgbaImage, Unorm4};

/**
Decodes a PNG into 8-bit RGBA.

Palette and low bit-depth images are expanded, 16-bit channels are stripped to 8 bits, and
images without alpha get an opaque alpha channel.
*/
pub(super) fn decode(bytes: &[u8]) -> Result<RgbaImage, DecodeError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;
    let (color_type, bit_depth) = reader.output_color_type();
    if bit_depth != BitDepth::Eight {
        return Err(DecodeError::UnsupportedLayout(format!("{color_type:?} at {bit_depth:?}")));
    }
    let info = reader.info();
    let (width, height) = (info.width, info.height);
    let mut buf = vec![0u8; width as usize * height as usize * color_type.samples()];
    let frame = reader.next_frame(&mut buf)?;
    buf.truncate(frame.buffer_size());

    let pixels: Vec<Unorm4> = match color_type {
        ColorType::Rgba => bytemuck::cast_slice(&buf).to_vec(),
        ColorType::Rgb => buf
            .chunks_exact(3)
            .map(|p| Unorm4 { r: p[0], g: p[1], b: p[2], a: 0xff })
            .collect(),
        ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .map(|p| Unorm4 { r: p[0], g: p[0], b: p[0], a: p[1] })
            .collect(),
        ColorType::Grayscale => buf
            .iter()
            .map(|&v| Unorm4 { r: v, g: v, b: v, a: 0xff })
            .collect(),
        other => return Err(DecodeError::UnsupportedLayout(format!("{other:?}"))),
    };
    let mut image = RgbaImage::new(width, height);
    for (i, pixel) in pixels.into_iter().enumerate() {
        let i = i as u32;
        image.put(i % width, i / width, pixel);
    }
    Ok(image)
}
