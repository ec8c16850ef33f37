// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Bitmap fonts in the text flavour of the BMFont format.

A font definition is a stream of whitespace-separated tokens.  Header tokens of the form
`key=value` are scanned for `base` and `lineHeight` up to the `count` key of the `chars`
line.  After that, each `char` token starts a glyph record whose `id`, `x`, `y`, `width`,
`height`, `xoffset`, `yoffset` and `xadvance` keys are collected until the next `char`
token or the end of the input.  Unrecognised keys are skipped wherever they appear.

```
use metronome_amplified::font::Font;
let font = Font::parse(b"common lineHeight=32 base=26 chars count=1 char id=65 x=1 y=2 width=10 height=12 xoffset=0 yoffset=4 xadvance=11").unwrap();
assert_eq!(font.glyph('A').advance_x, 11.0);
```
*/

pub mod layout;

pub use layout::{Gravity, TextBox};

/// Number of slots in the glyph table.  Character codes at or above this are never mapped.
pub const GLYPH_COUNT: usize = 128;

/// Width and height of the font atlas texture, in pixels.
pub const ATLAS_SIZE: f32 = 512.0;

/**
One character of a bitmap font, in font-design pixels.
*/
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Glyph {
    /// Atlas origin, horizontal.
    pub texture_s: f32,
    /// Atlas origin, vertical (down from the atlas top).
    pub texture_t: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub width: f32,
    pub height: f32,
    pub advance_x: f32,
}

impl Glyph {
    /// The glyph substituted for unmapped characters: zero size, zero advance.
    pub const ZERO: Glyph = Glyph {
        texture_s: 0.0,
        texture_t: 0.0,
        offset_x: 0.0,
        offset_y: 0.0,
        width: 0.0,
        height: 0.0,
        advance_x: 0.0,
    };
}

static ZERO_GLYPH: Glyph = Glyph::ZERO;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FontError {
    #[error("Font definition is not text: {0}")]
    NotText(#[from] std::str::Utf8Error),
    #[error("Font definition has a non-numeric value {value:?} for key {key}")]
    InvalidValue { key: String, value: String },
    #[error("Font definition has no usable {0} value")]
    MissingMetric(&'static str),
}

/**
A parsed bitmap font.

Immutable once parsed.  The vertex-buffer cache shares one instance with every builder that
lays out text.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    base_height: f32,
    line_height: f32,
    glyphs: Vec<Option<Glyph>>,
}

#[derive(Default)]
struct GlyphRecord {
    id: Option<i32>,
    glyph: Glyph,
}

impl GlyphRecord {
    fn set(&mut self, key: &str, value: &str) -> Result<(), FontError> {
        let slot = match key {
            "id" => {
                self.id = Some(parse_value(key, value)?);
                return Ok(());
            }
            "x" => &mut self.glyph.texture_s,
            "y" => &mut self.glyph.texture_t,
            "width" => &mut self.glyph.width,
            "height" => &mut self.glyph.height,
            "xoffset" => &mut self.glyph.offset_x,
            "yoffset" => &mut self.glyph.offset_y,
            "xadvance" => &mut self.glyph.advance_x,
            _ => return Ok(()),
        };
        *slot = parse_value(key, value)? as f32;
        Ok(())
    }

    fn flush_into(self, glyphs: &mut [Option<Glyph>]) {
        //ids outside the table are dropped silently
        if let Some(id) = self.id
            && let Ok(index) = usize::try_from(id)
            && let Some(slot) = glyphs.get_mut(index)
        {
            *slot = Some(self.glyph);
        }
    }
}

fn parse_value(key: &str, value: &str) -> Result<i32, FontError> {
    value.parse::<i32>().map_err(|_| FontError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

impl Font {
    /**
    Parses a BMFont text definition.

    Fails when the input is not UTF-8, when a recognised key carries a non-numeric value, or
    when `base` or `lineHeight` is missing (a zero line height cannot be laid out).
    */
    pub fn parse(bytes: &[u8]) -> Result<Font, FontError> {
        let text = std::str::from_utf8(bytes)?;
        let mut tokens = text.split_ascii_whitespace();

        let mut base = None;
        let mut line_height = None;
        for token in tokens.by_ref() {
            let Some((key, value)) = token.split_once('=') else {
                continue;
            };
            match key {
                "base" => base = Some(parse_value(key, value)?),
                "lineHeight" => line_height = Some(parse_value(key, value)?),
                "count" => break,
                _ => {}
            }
        }
        let base = base.ok_or(FontError::MissingMetric("base"))?;
        let line_height = line_height
            .filter(|h| *h > 0)
            .ok_or(FontError::MissingMetric("lineHeight"))?;

        let mut glyphs = vec![None; GLYPH_COUNT];
        let mut record: Option<GlyphRecord> = None;
        for token in tokens {
            if token == "char" {
                if let Some(done) = record.take() {
                    done.flush_into(&mut glyphs);
                }
                record = Some(GlyphRecord::default());
                continue;
            }
            let Some((key, value)) = token.split_once('=') else {
                continue;
            };
            if let Some(record) = record.as_mut() {
                record.set(key, value)?;
            }
        }
        if let Some(done) = record {
            done.flush_into(&mut glyphs);
        }

        let font = Font {
            base_height: base as f32,
            line_height: line_height as f32,
            glyphs,
        };
        logwise::trace_sync!(
            "Parsed font with {count} glyphs",
            count = font.glyphs.iter().filter(|g| g.is_some()).count()
        );
        Ok(font)
    }

    /// Distance from the top of a line to the baseline, in font pixels.
    pub fn base_height(&self) -> f32 {
        self.base_height
    }

    /// Height of one line, in font pixels.
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /**
    Looks up the glyph for a character.

    Characters without a record (including anything outside the table) get [Glyph::ZERO],
    which draws nothing and advances nothing.  Use [Font::has_glyph] to tell the two apart.
    */
    pub fn glyph(&self, c: char) -> &Glyph {
        self.glyphs
            .get(c as usize)
            .and_then(Option::as_ref)
            .unwrap_or(&ZERO_GLYPH)
    }

    /// Whether the definition had a record for this character.
    pub fn has_glyph(&self, c: char) -> bool {
        matches!(self.glyphs.get(c as usize), Some(Some(_)))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A small font with a fixed 10px advance for every printable ASCII character.
    pub(crate) fn monospace_definition() -> String {
        let mut s = String::from(
            "info face=\"Test\" size=32 bold=0\ncommon lineHeight=20 base=16 scaleW=512 scaleH=512 pages=1\npage id=0 file=\"test.png\"\nchars count=95\n",
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

    pub(crate) fn monospace_font() -> Font {
        Font::parse(monospace_definition().as_bytes()).unwrap()
    }

    #[test]
    fn parses_metrics_and_glyphs() {
        let font = monospace_font();
        assert_eq!(font.base_height(), 16.0);
        assert_eq!(font.line_height(), 20.0);
        let a = font.glyph('A');
        assert_eq!(a.texture_s, (65 % 16 * 16) as f32);
        assert_eq!(a.texture_t, (65 / 16 * 16) as f32);
        assert_eq!(a.width, 8.0);
        assert_eq!(a.height, 12.0);
        assert_eq!(a.offset_x, 1.0);
        assert_eq!(a.offset_y, 4.0);
        assert_eq!(a.advance_x, 10.0);
    }

    #[test]
    fn last_record_is_flushed() {
        let font = monospace_font();
        assert!(font.has_glyph('~'));
        assert_eq!(font.glyph('~').advance_x, 10.0);
    }

    #[test]
    fn unmapped_glyphs_are_zero() {
        let font = Font::parse(b"common lineHeight=20 base=16 chars count=1 char id=65 xadvance=7").unwrap();
        assert!(font.has_glyph('A'));
        assert!(!font.has_glyph('B'));
        assert_eq!(*font.glyph('B'), Glyph::ZERO);
        assert_eq!(*font.glyph('é'), Glyph::ZERO);
    }

    #[test]
    fn out_of_range_ids_are_dropped() {
        let font = Font::parse(b"common lineHeight=20 base=16 chars count=2 char id=300 xadvance=9 char id=-1 xadvance=9 char id=66 xadvance=3").unwrap();
        assert_eq!(font.glyph('B').advance_x, 3.0);
        assert_eq!(font.glyphs.iter().filter(|g| g.is_some()).count(), 1);
    }

    #[test]
    fn rejects_non_numeric_values() {
        let err = Font::parse(b"common lineHeight=abc base=16 chars count=0").unwrap_err();
        assert!(matches!(err, FontError::InvalidValue { ref key, .. } if key == "lineHeight"));
        let err = Font::parse(b"common lineHeight=20 base=16 chars count=1 char id=65 x=oops").unwrap_err();
        assert!(matches!(err, FontError::InvalidValue { ref key, .. } if key == "x"));
    }

    #[test]
    fn requires_line_height() {
        let err = Font::parse(b"common base=16 chars count=0").unwrap_err();
        assert!(matches!(err, FontError::MissingMetric("lineHeight")));
        let err = Font::parse(b"common lineHeight=0 base=16 chars count=0").unwrap_err();
        assert!(matches!(err, FontError::MissingMetric("lineHeight")));
    }

    #[test]
    fn rejects_binary() {
        assert!(matches!(Font::parse(&[0xff, 0xfe, 0x00]), Err(FontError::NotText(_))));
    }
}
