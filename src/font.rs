//! Glyph sources for the icon letter.
//!
//! The preferred font is looked up once in the system font database and its
//! outlines are scaled to the requested pixel size. When that lookup fails the
//! built-in 5x7 bitmap font is used instead; it always renders at its own fixed
//! size regardless of the requested one.

use fontdb::{Database, Family, Query};
use once_cell::sync::Lazy;
use tiny_skia::{Path, PathBuilder};
use ttf_parser::{Face, OutlineBuilder};

use crate::error::IconError;

pub static SYSTEM_FONTS: Lazy<Database> = Lazy::new(|| {
    let mut db = Database::new();
    db.load_system_fonts();
    log::debug!("loaded {} system font faces", db.len());
    db
});

/// Pixel edge of one bitmap cell.
const BITMAP_CELL: f32 = 2.0;
const BITMAP_ROWS: usize = 7;
const BITMAP_COLS: usize = 5;
/// Horizontal advance in cells, one blank column between letters.
const BITMAP_ADVANCE: usize = 6;

pub struct OutlineFont {
    family: String,
    data: Vec<u8>,
    index: u32,
}

impl OutlineFont {
    /// Finds `family` in `db` and checks it has a glyph for every char of `text`.
    pub fn load(db: &Database, family: &str, text: &str) -> Result<Self, IconError> {
        let families = [Family::Name(family)];
        let query = Query { families: &families, ..Query::default() };
        let id = db
            .query(&query)
            .ok_or_else(|| IconError::FontUnavailable(format!("{family} is not installed")))?;
        let (data, index) = db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| IconError::FontUnavailable(format!("{family}: face data unreadable")))?;

        {
            let face = Face::parse(&data, index)
                .map_err(|e| IconError::FontUnavailable(format!("{family}: {e}")))?;
            if let Some(c) = text.chars().find(|c| face.glyph_index(*c).is_none()) {
                return Err(IconError::FontUnavailable(format!("{family} has no glyph for {c:?}")));
            }
        }

        Ok(Self { family: family.to_string(), data, index })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    fn outline(&self, text: &str, px: f32) -> Option<Path> {
        let face = Face::parse(&self.data, self.index).ok()?;
        let scale = px / face.units_per_em() as f32;
        let mut pb = PathBuilder::new();
        let mut pen_x = 0.0;
        for c in text.chars() {
            let Some(id) = face.glyph_index(c) else { continue };
            let mut sink = PixelOutline { pb: &mut pb, scale, pen_x };
            face.outline_glyph(id, &mut sink);
            pen_x += face.glyph_hor_advance(id).unwrap_or(0) as f32 * scale;
        }
        pb.finish()
    }
}

/// Maps font units (y up, baseline at 0) to pixels (y down, baseline at 0).
struct PixelOutline<'a> {
    pb: &'a mut PathBuilder,
    scale: f32,
    pen_x: f32,
}

impl PixelOutline<'_> {
    #[inline]
    fn px(&self, x: f32, y: f32) -> (f32, f32) {
        (self.pen_x + x * self.scale, -y * self.scale)
    }
}

impl OutlineBuilder for PixelOutline<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.px(x, y);
        self.pb.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.px(x, y);
        self.pb.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.px(x1, y1);
        let (x, y) = self.px(x, y);
        self.pb.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.px(x1, y1);
        let (x2, y2) = self.px(x2, y2);
        let (x, y) = self.px(x, y);
        self.pb.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.pb.close();
    }
}

pub enum GlyphFont {
    Outline(OutlineFont),
    Bitmap,
}

impl GlyphFont {
    /// Preferred family if usable, otherwise the bitmap font. Never fails.
    pub fn select(db: &Database, family: &str, text: &str) -> Self {
        match OutlineFont::load(db, family, text) {
            Ok(font) => {
                log::debug!("using font {}", font.family());
                GlyphFont::Outline(font)
            }
            Err(e) => {
                log::info!("{e}; using built-in bitmap font");
                GlyphFont::Bitmap
            }
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, GlyphFont::Bitmap)
    }

    /// Glyph outlines in pixels, pen at x = 0 and baseline at y = 0.
    /// `None` when the text has no ink.
    pub fn outline(&self, text: &str, px: f32) -> Option<Path> {
        match self {
            GlyphFont::Outline(font) => font.outline(text, px),
            GlyphFont::Bitmap => bitmap_outline(text),
        }
    }
}

/// Integer box enclosing a glyph path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphBox {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl GlyphBox {
    pub fn measure(path: &Path) -> Self {
        let b = path.compute_tight_bounds().unwrap_or_else(|| path.bounds());
        let left = b.left().floor() as i32;
        let top = b.top().floor() as i32;
        Self {
            left,
            top,
            width: b.right().ceil() as i32 - left,
            height: b.bottom().ceil() as i32 - top,
        }
    }
}

fn bitmap_outline(text: &str) -> Option<Path> {
    let mut pb = PathBuilder::new();
    for (i, c) in text.chars().enumerate() {
        let pen = (i * BITMAP_ADVANCE) as f32 * BITMAP_CELL;
        for (row, &bits) in bitmap_rows(c).iter().enumerate() {
            for col in 0..BITMAP_COLS {
                if bits & (0b1_0000u8 >> col) == 0 {
                    continue;
                }
                let x = pen + col as f32 * BITMAP_CELL;
                let y = (row as f32 - BITMAP_ROWS as f32) * BITMAP_CELL;
                push_cell(&mut pb, x, y);
            }
        }
    }
    pb.finish()
}

fn push_cell(pb: &mut PathBuilder, x: f32, y: f32) {
    pb.move_to(x, y);
    pb.line_to(x + BITMAP_CELL, y);
    pb.line_to(x + BITMAP_CELL, y + BITMAP_CELL);
    pb.line_to(x, y + BITMAP_CELL);
    pb.close();
}

fn bitmap_rows(c: char) -> [u8; BITMAP_ROWS] {
    match c.to_ascii_uppercase() {
        ' ' => [0; BITMAP_ROWS],
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        // unknown
        _ => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
    }
}

/// First installed family that can render `text`, if the system has any fonts.
#[cfg(test)]
pub(crate) fn installed_family(text: &str) -> Option<String> {
    SYSTEM_FONTS
        .faces()
        .filter_map(|face| face.families.first().map(|(name, _)| name.clone()))
        .find(|name| OutlineFont::load(&SYSTEM_FONTS, name, text).is_ok())
}
