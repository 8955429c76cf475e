use std::path::{Path, PathBuf};

/// Sizes required by the web-app manifest, in output order.
pub const ICON_SIZES: [u32; 8] = [72, 96, 128, 144, 152, 192, 384, 512];

/// Fixed look of every icon. All fractions are relative to the canvas side.
#[derive(Debug, Clone, PartialEq)]
pub struct IconStyle {
    pub background: [u8; 3],
    pub foreground: [u8; 3],
    pub glyph_color: [u8; 3],
    pub text: String,
    pub font_family: String,
    pub margin_divisor: u32,
    pub radius_divisor: u32,
    pub font_scale: f32,
}

impl Default for IconStyle {
    fn default() -> Self {
        Self {
            background: [0x8B, 0x5C, 0xF6],
            foreground: [0x7C, 0x3A, 0xED],
            glyph_color: [0xFF, 0xFF, 0xFF],
            text: "L".to_string(),
            font_family: "Arial".to_string(),
            margin_divisor: 8,
            radius_divisor: 6,
            font_scale: 0.5,
        }
    }
}

impl IconStyle {
    pub fn margin(&self, size: u32) -> u32 {
        size / self.margin_divisor
    }

    pub fn corner_radius(&self, size: u32) -> u32 {
        size / self.radius_divisor
    }

    pub fn font_px(&self, size: u32) -> f32 {
        (size as f32 * self.font_scale).round()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub icons_dir: PathBuf,
    pub sizes: Vec<u32>,
    pub style: IconStyle,
    /// Manifest icon list; kept outside `icons_dir` so that directory only holds PNGs.
    pub manifest_path: PathBuf,
    pub icons_url_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::for_root(Path::new(env!("CARGO_MANIFEST_DIR")))
    }
}

impl Config {
    /// Defaults laid out under `<root>/public`.
    pub fn for_root(root: &Path) -> Self {
        let public = root.join("public");
        Self {
            icons_dir: public.join("icons"),
            sizes: ICON_SIZES.to_vec(),
            style: IconStyle::default(),
            manifest_path: public.join("manifest-icons.json"),
            icons_url_prefix: "/icons".to_string(),
        }
    }
}
