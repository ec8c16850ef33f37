/*!
Implements common vertex algorithms.

All quads are two triangles, six vertices, in normalised coordinates.
*/

use crate::geometry::{Size, VertexTexCoord};

/**
Appends a quad spanning `(x1, y1)..(x2, y2)` textured with `(s1, t1)..(s2, t2)`.

Vertex order is `(x1,y1), (x1,y2), (x2,y2), (x2,y2), (x2,y1), (x1,y1)`.  Passing a reversed
texture range mirrors the texture, which the overlay layouts use to reuse one corner.
*/
pub fn put_square(out: &mut Vec<VertexTexCoord>, x1: f32, y1: f32, x2: f32, y2: f32, s1: f32, t1: f32, s2: f32, t2: f32) {
    out.extend_from_slice(&[
        VertexTexCoord::new(x1, y1, s1, t1),
        VertexTexCoord::new(x1, y2, s1, t2),
        VertexTexCoord::new(x2, y2, s2, t2),
        VertexTexCoord::new(x2, y2, s2, t2),
        VertexTexCoord::new(x2, y1, s2, t1),
        VertexTexCoord::new(x1, y1, s1, t1),
    ]);
}

/**
Appends the largest quad that is square in pixels and centred inside the rectangle.

Squareness is measured in output pixels, so the result is square on screen whatever the
aspect ratio.
*/
pub fn put_square_centred_inside(
    out: &mut Vec<VertexTexCoord>,
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    s1: f32,
    t1: f32,
    s2: f32,
    t2: f32,
    size: Size,
) {
    let ppu_w = size.pixels_per_unit_width();
    let ppu_h = size.pixels_per_unit_height();
    let rect_w = (x2 - x1).abs() * ppu_w;
    let rect_h = (y2 - y1).abs() * ppu_h;
    if rect_w > rect_h {
        let direction = if x1 > x2 { -1.0 } else { 1.0 };
        let margin = direction * 0.5 * (rect_w - rect_h) / ppu_w;
        put_square(out, x1 + margin, y1, x2 - margin, y2, s1, t1, s2, t2);
    } else {
        let direction = if y1 > y2 { -1.0 } else { 1.0 };
        let margin = direction * 0.5 * (rect_h - rect_w) / ppu_h;
        put_square(out, x1, y1 + margin, x2, y2 - margin, s1, t1, s2, t2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_vertex_order() {
        let mut out = Vec::new();
        put_square(&mut out, -1.0, -1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0);
        let corners: Vec<(f32, f32)> = out.iter().map(|v| (v.x(), v.y())).collect();
        assert_eq!(corners, vec![(-1.0, -1.0), (-1.0, 1.0), (1.0, 1.0), (1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)]);
        assert_eq!(out[1].tex, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn centred_square_is_square_in_pixels() {
        let size = Size::new(200.0, 100.0);
        let mut out = Vec::new();
        //a 1x1 unit rect is 100x50 pixels: trim 25px from each side
        put_square_centred_inside(&mut out, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, size);
        assert_eq!(out[0].x(), 0.25);
        assert_eq!(out[2].x(), 0.75);
        assert_eq!(out[0].y(), 0.0);
        assert_eq!(out[2].y(), 1.0);

        //tall rect, reversed y
        out.clear();
        put_square_centred_inside(&mut out, 0.0, 1.0, 0.25, -1.0, 0.0, 0.0, 1.0, 1.0, size);
        //25x100 pixels: trim 37.5px top and bottom, 0.75 units each
        assert_eq!(out[0].y(), 0.25);
        assert_eq!(out[2].y(), -0.25);
    }
}
