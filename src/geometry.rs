// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Plain geometry shared by font layout, vertex buffers and the device facade.

Positions are in normalised device coordinates: `-1..1` on both axes, `+y` up.
*/

/**
The single vertex format used by every vertex buffer in the app.

Each vertex carries a position and a texture coordinate.  The third texture component is
unused padding, kept so both halves share one layout.
*/
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VertexTexCoord {
    pub pos: [f32; 3],
    pub tex: [f32; 3],
}

impl VertexTexCoord {
    pub const fn new(x: f32, y: f32, s: f32, t: f32) -> Self {
        VertexTexCoord {
            pos: [x, y, 0.0],
            tex: [s, t, 0.0],
        }
    }
    pub const fn x(&self) -> f32 {
        self.pos[0]
    }
    pub const fn y(&self) -> f32 {
        self.pos[1]
    }
}

/**
A size in physical pixels (for the output) or device-independent pixels (for a window).
*/
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Size { width, height }
    }

    /// Pixels per normalised unit horizontally.
    pub fn pixels_per_unit_width(&self) -> f32 {
        self.width / 2.0
    }

    /// Pixels per normalised unit vertically.
    pub fn pixels_per_unit_height(&self) -> f32 {
        self.height / 2.0
    }
}

/**
An axis-aligned rectangle in normalised coordinates, anchored at its minimum corner.
*/
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }

    /**
    Whether the point lies strictly inside the rectangle.

    Points on an edge are outside, so two rectangles sharing an edge never both claim a press.
    */
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x > self.x && x < self.x + self.width && y > self.y && y < self.y + self.height
    }
}
