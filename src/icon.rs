use image::RgbImage;
use tiny_skia::{Color, FillRule, Paint, Path, PathBuilder, Pixmap, Transform};

use crate::config::IconStyle;
use crate::error::IconError;
use crate::font::{GlyphBox, GlyphFont};

// Control point factor for a quarter circle drawn as one cubic.
const KAPPA: f32 = 0.552_284_8;

/// Render one square icon: background, inset rounded rectangle, centered text.
pub fn render_icon(size: u32, style: &IconStyle, font: &GlyphFont) -> Result<RgbImage, IconError> {
    let mut pixmap = Pixmap::new(size, size).ok_or(IconError::Canvas { size })?;
    pixmap.fill(color(style.background));

    let near = style.margin(size) as f32;
    // far edge is inclusive: the panel covers pixels margin..=size - margin
    let far = (size.saturating_sub(style.margin(size)) + 1) as f32;
    if let Some(rect) = rounded_rect(near, near, far, far, style.corner_radius(size) as f32) {
        pixmap.fill_path(
            &rect,
            &paint(style.foreground, true),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    if let Some(glyphs) = font.outline(&style.text, style.font_px(size)) {
        let (dx, dy) = centered_offset(size, &GlyphBox::measure(&glyphs));
        pixmap.fill_path(
            &glyphs,
            &paint(style.glyph_color, !font.is_fallback()),
            FillRule::Winding,
            Transform::from_translate(dx as f32, dy as f32),
            None,
        );
    }

    to_rgb(&pixmap).ok_or(IconError::Canvas { size })
}

/// Translation that moves `glyph` so its box sits at `((S - w) / 2, (S - h) / 2)`.
pub fn centered_offset(size: u32, glyph: &GlyphBox) -> (i32, i32) {
    let x = (size as i32 - glyph.width).div_euclid(2);
    let y = (size as i32 - glyph.height).div_euclid(2);
    (x - glyph.left, y - glyph.top)
}

/// Rounded rectangle from `(x0, y0)` to `(x1, y1)`; radius is clamped to half the shorter side.
pub fn rounded_rect(x0: f32, y0: f32, x1: f32, y1: f32, radius: f32) -> Option<Path> {
    let r = radius.min((x1 - x0) / 2.0).min((y1 - y0) / 2.0).max(0.0);
    let k = r * KAPPA;
    let mut pb = PathBuilder::new();
    pb.move_to(x0 + r, y0);
    pb.line_to(x1 - r, y0);
    pb.cubic_to(x1 - r + k, y0, x1, y0 + r - k, x1, y0 + r);
    pb.line_to(x1, y1 - r);
    pb.cubic_to(x1, y1 - r + k, x1 - r + k, y1, x1 - r, y1);
    pb.line_to(x0 + r, y1);
    pb.cubic_to(x0 + r - k, y1, x0, y1 - r + k, x0, y1 - r);
    pb.line_to(x0, y0 + r);
    pb.cubic_to(x0, y0 + r - k, x0 + r - k, y0, x0 + r, y0);
    pb.close();
    pb.finish()
}

#[inline]
fn color(rgb: [u8; 3]) -> Color {
    Color::from_rgba8(rgb[0], rgb[1], rgb[2], 255)
}

// Bitmap cells are pixel aligned and stay crisp without anti-aliasing.
fn paint(rgb: [u8; 3], anti_alias: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color(rgb));
    paint.anti_alias = anti_alias;
    paint
}

fn to_rgb(pixmap: &Pixmap) -> Option<RgbImage> {
    let mut rgb = Vec::with_capacity(pixmap.pixels().len() * 3);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgb.extend_from_slice(&[c.red(), c.green(), c.blue()]);
    }
    RgbImage::from_raw(pixmap.width(), pixmap.height(), rgb)
}
