// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Text layout into textured quads.

Every input character produces exactly six vertices (two triangles), so a caller can size a
sub-buffer as `6 * text.chars().count()` before laying out.  Characters without a glyph and
spaces consumed by a line break still produce a (degenerate or invisible) quad.
*/

use crate::font::{ATLAS_SIZE, Font, Glyph};
use crate::geometry::{Size, VertexTexCoord};

/// Number of vertices emitted per character.
pub const VERTICES_PER_CHAR: usize = 6;

/**
Placement of content inside a larger extent along one axis.

For the vertical axis, [Gravity::Start] is the top of the box.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gravity {
    #[default]
    Start,
    Center,
    End,
}

impl Gravity {
    /// Leading margin that places `content` inside `extent`.
    pub fn margin(self, extent: f32, content: f32) -> f32 {
        match self {
            Gravity::Start => 0.0,
            Gravity::Center => 0.5 * (extent - content),
            Gravity::End => extent - content,
        }
    }
}

/**
The box text is laid out in, in normalised units.

`left`/`top` is the top-left corner; the box extends right by `width` and down by `height`.
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl TextBox {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        TextBox {
            left,
            top,
            width,
            height,
        }
    }
}

/**
One line produced by [Font::break_lines].

Character indices are positions in `text.chars()`.
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSpan {
    /// First character on the line.
    pub start: usize,
    /// One past the last measured character.
    pub end: usize,
    /// First character of the next line.  Any break space lies in `end..next`.
    pub next: usize,
    /// Rendered width of `start..end`, in screen pixels.
    pub width: f32,
}

impl LineSpan {
    pub fn char_count(&self) -> usize {
        self.end - self.start
    }
}

/// Per-call constants shared by the single-line and wrapping paths.
struct Metrics {
    ppu_w: f32,
    ppu_h: f32,
    target_w: f32,
    target_h: f32,
    render_h: f32,
    scale: f32,
}

impl Metrics {
    fn new(font: &Font, text_box: &TextBox, max_height_pixels: f32, size: Size) -> Metrics {
        let ppu_w = size.pixels_per_unit_width();
        let ppu_h = size.pixels_per_unit_height();
        let target_w = ppu_w * text_box.width;
        let target_h = ppu_h * text_box.height;
        let render_h = target_h.min(max_height_pixels);
        Metrics {
            ppu_w,
            ppu_h,
            target_w,
            target_h,
            render_h,
            scale: render_h / font.line_height(),
        }
    }

    fn width_units_per_font_pixel(&self) -> f32 {
        self.scale / self.ppu_w
    }

    fn height_units_per_font_pixel(&self) -> f32 {
        self.scale / self.ppu_h
    }
}

impl Font {
    /// Width of `text` in screen pixels at the given font-pixel scale.
    pub fn measure(&self, text: &str, scale: f32) -> f32 {
        text.chars().map(|c| self.glyph(c).advance_x * scale).sum()
    }

    /**
    Greedy line breaking.

    Characters accumulate on a line until the next one would push the width past
    `max_width_pixels`.  The line then breaks at the most recent space since the line start
    (the space itself ends the old line but is not measured), or, when there is no such
    space, right before the overflowing character.  A line always holds at least one
    character, so an unbreakable token longer than the box still makes progress.
    */
    pub fn break_lines(&self, text: &str, max_width_pixels: f32, scale: f32) -> Vec<LineSpan> {
        let chars: Vec<char> = text.chars().collect();
        let mut lines = Vec::new();
        let mut line_start = 0;
        let mut width = 0.0;
        let mut last_space: Option<(usize, f32)> = None;
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            let advance = self.glyph(c).advance_x * scale;
            if width + advance > max_width_pixels && i > line_start {
                if let Some((space, width_before_space)) = last_space {
                    lines.push(LineSpan {
                        start: line_start,
                        end: space,
                        next: space + 1,
                        width: width_before_space,
                    });
                    line_start = space + 1;
                } else {
                    lines.push(LineSpan {
                        start: line_start,
                        end: i,
                        next: i,
                        width,
                    });
                    line_start = i;
                }
                //rescan the carried-over part of the word
                i = line_start;
                width = 0.0;
                last_space = None;
                continue;
            }
            if c == ' ' && i > line_start {
                last_space = Some((i, width));
            }
            width += advance;
            i += 1;
        }
        if line_start < chars.len() {
            lines.push(LineSpan {
                start: line_start,
                end: chars.len(),
                next: chars.len(),
                width,
            });
        }
        lines
    }

    /**
    Lays out `text` on a single line inside `text_box` and appends its quads to `out`.

    The line height is the box height in pixels, capped at `max_height_pixels`.  Returns the
    number of vertices appended, always `6 * text.chars().count()`.
    */
    pub fn print_line(
        &self,
        out: &mut Vec<VertexTexCoord>,
        text: &str,
        text_box: &TextBox,
        max_height_pixels: f32,
        size: Size,
        horizontal: Gravity,
        vertical: Gravity,
    ) -> usize {
        let m = Metrics::new(self, text_box, max_height_pixels, size);
        let render_w = self.measure(text, m.scale);
        let margin_x = horizontal.margin(m.target_w, render_w);
        //the line occupies the band render_h tall; the baseline sits inside it
        let margin_top = vertical.margin(m.target_h, m.render_h);
        let pen_x = text_box.left + margin_x / m.ppu_w;
        let pen_y = text_box.top - (margin_top + m.render_h) / m.ppu_h;
        let before = out.len();
        self.emit_run(out, text.chars(), pen_x, pen_y, &m);
        out.len() - before
    }

    /**
    Lays out `text` with greedy word wrap inside `text_box` and appends its quads to `out`.

    The block of lines is placed with `vertical` gravity; each line gets `horizontal` gravity
    against its own width.  Returns the number of vertices appended, always
    `6 * text.chars().count()`.
    */
    pub fn print_wrapped(
        &self,
        out: &mut Vec<VertexTexCoord>,
        text: &str,
        text_box: &TextBox,
        max_height_pixels: f32,
        size: Size,
        horizontal: Gravity,
        vertical: Gravity,
    ) -> usize {
        let m = Metrics::new(self, text_box, max_height_pixels, size);
        let lines = self.break_lines(text, m.target_w, m.scale);
        let block_h = m.render_h * lines.len() as f32;
        let margin_top = vertical.margin(m.target_h, block_h);
        let chars: Vec<char> = text.chars().collect();
        let before = out.len();
        for (row, line) in lines.iter().enumerate() {
            let margin_x = horizontal.margin(m.target_w, line.width);
            let pen_x = text_box.left + margin_x / m.ppu_w;
            let pen_y = text_box.top - (margin_top + (row + 1) as f32 * m.render_h) / m.ppu_h;
            self.emit_run(out, chars[line.start..line.next].iter().copied(), pen_x, pen_y, &m);
        }
        out.len() - before
    }

    fn emit_run(
        &self,
        out: &mut Vec<VertexTexCoord>,
        text: impl Iterator<Item = char>,
        mut pen_x: f32,
        pen_y: f32,
        m: &Metrics,
    ) {
        let w_units = m.width_units_per_font_pixel();
        let h_units = m.height_units_per_font_pixel();
        for c in text {
            let glyph = self.glyph(c);
            emit_quad(out, glyph, pen_x, pen_y, w_units, h_units, self.base_height());
            pen_x += glyph.advance_x * w_units;
        }
    }
}

fn emit_quad(
    out: &mut Vec<VertexTexCoord>,
    glyph: &Glyph,
    pen_x: f32,
    pen_y: f32,
    w_units: f32,
    h_units: f32,
    base_height: f32,
) {
    let x_min = pen_x + glyph.offset_x * w_units;
    let x_max = x_min + glyph.width * w_units;
    let y_max = pen_y + (base_height - glyph.offset_y) * h_units;
    let y_min = y_max - glyph.height * h_units;
    let s_min = glyph.texture_s / ATLAS_SIZE;
    let s_max = s_min + glyph.width / ATLAS_SIZE;
    let t_min = glyph.texture_t / ATLAS_SIZE;
    let t_max = t_min + glyph.height / ATLAS_SIZE;
    out.extend_from_slice(&[
        VertexTexCoord::new(x_min, y_max, s_min, t_min),
        VertexTexCoord::new(x_max, y_max, s_max, t_min),
        VertexTexCoord::new(x_max, y_min, s_max, t_max),
        VertexTexCoord::new(x_max, y_min, s_max, t_max),
        VertexTexCoord::new(x_min, y_min, s_min, t_max),
        VertexTexCoord::new(x_min, y_max, s_min, t_min),
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::monospace_font;

    const SIZE: Size = Size::new(200.0, 100.0);

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn wraps_at_the_space() {
        let font = monospace_font();
        //box fits exactly ten 10px characters at scale 1
        let lines = font.break_lines("abcdef ghijkl", 100.0, 1.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], LineSpan { start: 0, end: 6, next: 7, width: 60.0 });
        assert_eq!(lines[1], LineSpan { start: 7, end: 13, next: 13, width: 60.0 });
    }

    #[test]
    fn long_word_breaks_mid_word() {
        let font = monospace_font();
        let lines = font.break_lines("abcdefghijklmnopqrstuvwxy", 100.0, 1.0);
        let counts: Vec<usize> = lines.iter().map(LineSpan::char_count).collect();
        assert_eq!(counts, vec![10, 10, 5]);
        assert!(lines.iter().all(|l| l.width > 0.0));
    }

    #[test]
    fn narrow_box_still_progresses() {
        let font = monospace_font();
        //narrower than one glyph: one character per line
        let lines = font.break_lines("abc", 5.0, 1.0);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.char_count() == 1));
    }

    #[test]
    fn fitting_text_is_one_line() {
        let font = monospace_font();
        let lines = font.break_lines("abc def", 100.0, 1.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].width, 70.0);
        assert!(font.break_lines("", 100.0, 1.0).is_empty());
    }

    #[test]
    fn six_vertices_per_char() {
        let font = monospace_font();
        let mut out = Vec::new();
        let tb = TextBox::new(-1.0, 1.0, 1.0, 0.4);
        let n = font.print_line(&mut out, "hi there", &tb, 100.0, SIZE, Gravity::Start, Gravity::Center);
        assert_eq!(n, 48);
        let n = font.print_wrapped(&mut out, "abcdef ghijkl", &tb, 100.0, SIZE, Gravity::Start, Gravity::Start);
        assert_eq!(n, 78);
        assert_eq!(out.len(), 126);
    }

    #[test]
    fn single_line_geometry() {
        let font = monospace_font();
        let mut out = Vec::new();
        //box 100px wide, 20px tall; line height 20 gives scale 1
        let tb = TextBox::new(-1.0, 1.0, 1.0, 0.4);
        font.print_line(&mut out, "A", &tb, 100.0, SIZE, Gravity::Start, Gravity::Center);
        let w_units = 1.0 / 100.0;
        let h_units = 1.0 / 50.0;
        let pen_y = 1.0 - 0.4;
        let x_min = -1.0 + 1.0 * w_units;
        let y_max = pen_y + (16.0 - 4.0) * h_units;
        assert!(approx(out[0].x(), x_min));
        assert!(approx(out[0].y(), y_max));
        assert!(approx(out[2].x(), x_min + 8.0 * w_units));
        assert!(approx(out[2].y(), y_max - 12.0 * h_units));
        assert!(approx(out[0].tex[0], (65 % 16 * 16) as f32 / ATLAS_SIZE));
        assert_eq!(out[0], out[5]);
        assert_eq!(out[2], out[3]);
    }

    #[test]
    fn height_cap_centres_vertically() {
        let font = monospace_font();
        let mut capped = Vec::new();
        let tb = TextBox::new(-1.0, 1.0, 1.0, 0.4);
        //cap the 20px box to 10px: half scale, 5px margin on top and bottom
        font.print_line(&mut capped, "A", &tb, 10.0, SIZE, Gravity::Start, Gravity::Center);
        let pen_y = 1.0 - 0.4 + 5.0 / 50.0;
        let y_max = pen_y + 12.0 * 0.5 / 50.0;
        assert!(approx(capped[0].y(), y_max));
    }

    #[test]
    fn horizontal_gravity() {
        let font = monospace_font();
        let tb = TextBox::new(-1.0, 1.0, 1.0, 0.4);
        let mut start = Vec::new();
        let mut centre = Vec::new();
        let mut end = Vec::new();
        font.print_line(&mut start, "AB", &tb, 100.0, SIZE, Gravity::Start, Gravity::Center);
        font.print_line(&mut centre, "AB", &tb, 100.0, SIZE, Gravity::Center, Gravity::Center);
        font.print_line(&mut end, "AB", &tb, 100.0, SIZE, Gravity::End, Gravity::Center);
        //80px of slack in a 100px box
        assert!(approx(centre[0].x() - start[0].x(), 0.4));
        assert!(approx(end[0].x() - start[0].x(), 0.8));
    }

    #[test]
    fn wrapped_lines_stack_downwards() {
        let font = monospace_font();
        let tb = TextBox::new(-1.0, 1.0, 1.0, 1.0);
        let mut out = Vec::new();
        font.print_wrapped(&mut out, "abcdef ghijkl", &tb, 20.0, SIZE, Gravity::Start, Gravity::Start);
        let first_line = out[0];
        let second_line = out[7 * VERTICES_PER_CHAR];
        //both lines start at the left edge, one line (20px = 0.4 units) apart
        assert!(approx(first_line.x(), second_line.x()));
        assert!(approx(first_line.y() - second_line.y(), 0.4));
    }

    #[test]
    fn single_line_matches_one_wrapped_line() {
        let font = monospace_font();
        let tb = TextBox::new(-0.5, 0.5, 1.0, 0.6);
        let mut line = Vec::new();
        let mut wrapped = Vec::new();
        font.print_line(&mut line, "abc", &tb, 12.0, SIZE, Gravity::Center, Gravity::Center);
        font.print_wrapped(&mut wrapped, "abc", &tb, 12.0, SIZE, Gravity::Center, Gravity::Center);
        assert_eq!(line.len(), wrapped.len());
        for (a, b) in line.iter().zip(&wrapped) {
            assert!(approx(a.x(), b.x()) && approx(a.y(), b.y()));
        }
    }
}
