use std::fs;
use std::path::PathBuf;

use fontdb::Database;
use image::ImageFormat;

use crate::config::Config;
use crate::error::IconError;
use crate::font::{GlyphFont, SYSTEM_FONTS};
use crate::icon::render_icon;
use crate::manifest::write_manifest;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedIcon {
    pub size: u32,
    pub path: PathBuf,
}

pub fn icon_file_name(size: u32) -> String {
    format!("icon-{size}x{size}.png")
}

/// Writes one PNG per configured size, in order. The first filesystem or
/// encoder error aborts the loop; icons already written stay on disk.
pub fn generate_icons(config: &Config, fonts: &Database) -> Result<Vec<GeneratedIcon>, IconError> {
    fs::create_dir_all(&config.icons_dir).map_err(|source| IconError::CreateDir {
        path: config.icons_dir.clone(),
        source,
    })?;

    let font = GlyphFont::select(fonts, &config.style.font_family, &config.style.text);
    let mut written = Vec::with_capacity(config.sizes.len());
    for &size in &config.sizes {
        let img = render_icon(size, &config.style, &font)?;
        let file_name = icon_file_name(size);
        let path = config.icons_dir.join(&file_name);
        img.save_with_format(&path, ImageFormat::Png)
            .map_err(|source| IconError::Encode { path: path.clone(), source })?;
        log::debug!("wrote {} ({size}x{size})", path.display());
        println!("✓ Generated: {file_name}");
        written.push(GeneratedIcon { size, path });
    }
    Ok(written)
}

/// Full run against the system fonts: icons, then the manifest icon list.
pub fn run(config: &Config) -> Result<Vec<GeneratedIcon>, IconError> {
    let icons = generate_icons(config, &SYSTEM_FONTS)?;
    let manifest = write_manifest(config, &icons)?;
    log::info!("wrote manifest icons to {}", manifest.display());
    println!("\nAll {} PWA icons generated.", icons.len());
    Ok(icons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ICON_SIZES;
    use crate::font::installed_family;
    use std::collections::BTreeSet;
    use std::path::Path;

    fn config_in(root: &Path, sizes: &[u32]) -> Config {
        let mut cfg = Config::for_root(root);
        cfg.sizes = sizes.to_vec();
        cfg
    }

    fn dir_names(dir: &Path) -> BTreeSet<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    /// Box of glyph-coloured pixels; only the white glyph has a green channel above 128.
    fn glyph_bounds(img: &image::RgbImage) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (x, y, px) in img.enumerate_pixels() {
            if px.0[1] <= 128 {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        bounds
    }

    #[test]
    fn test_creates_missing_dirs_and_sizes() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path(), &[72, 512]);
        assert!(!cfg.icons_dir.exists());

        let icons = generate_icons(&cfg, &Database::new()).unwrap();
        assert_eq!(icons.len(), 2);
        for icon in &icons {
            let img = image::open(&icon.path).unwrap();
            assert_eq!((img.width(), img.height()), (icon.size, icon.size));
        }
        assert_eq!(
            dir_names(&cfg.icons_dir),
            BTreeSet::from(["icon-512x512.png".to_string(), "icon-72x72.png".to_string()])
        );
    }

    #[test]
    fn test_full_icon_set() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = Config::for_root(tmp.path());
        let icons = generate_icons(&cfg, &Database::new()).unwrap();

        assert_eq!(icons.iter().map(|i| i.size).collect::<Vec<_>>(), ICON_SIZES.to_vec());
        let expected: BTreeSet<String> = ICON_SIZES.iter().map(|&s| icon_file_name(s)).collect();
        assert_eq!(dir_names(&cfg.icons_dir), expected);
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path(), &[96, 192]);
        let first: Vec<Vec<u8>> = generate_icons(&cfg, &SYSTEM_FONTS)
            .unwrap()
            .iter()
            .map(|i| fs::read(&i.path).unwrap())
            .collect();
        let second: Vec<Vec<u8>> = generate_icons(&cfg, &SYSTEM_FONTS)
            .unwrap()
            .iter()
            .map(|i| fs::read(&i.path).unwrap())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_glyph_is_centered() {
        let tmp = tempfile::tempdir().unwrap();
        let mut outline = Config::for_root(&tmp.path().join("outline"));
        if let Some(family) = installed_family(&outline.style.text) {
            outline.style.font_family = family;
        }
        let bitmap = Config::for_root(&tmp.path().join("bitmap"));
        for (cfg, fonts) in [(&outline, &*SYSTEM_FONTS), (&bitmap, &Database::new())] {
            for icon in generate_icons(cfg, fonts).unwrap() {
                let img = image::open(&icon.path).unwrap().to_rgb8();
                let (x0, y0, x1, y1) = glyph_bounds(&img).expect("glyph drawn");
                let center = icon.size as f32 / 2.0;
                let cx = (x0 + x1 + 1) as f32 / 2.0;
                let cy = (y0 + y1 + 1) as f32 / 2.0;
                assert!((cx - center).abs() <= 2.0, "size {}: x center {cx}", icon.size);
                assert!((cy - center).abs() <= 2.0, "size {}: y center {cy}", icon.size);
            }
        }
    }

    #[test]
    fn test_background_and_panel_colors() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path(), &[128]);
        let icons = generate_icons(&cfg, &Database::new()).unwrap();
        let img = image::open(&icons[0].path).unwrap().to_rgb8();
        assert_eq!(img.get_pixel(0, 0).0, cfg.style.background);
        assert_eq!(img.get_pixel(127, 64).0, cfg.style.background);
        // margin is 16
        assert_eq!(img.get_pixel(17, 64).0, cfg.style.foreground);
    }

    #[test]
    fn test_unwritable_dir_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("public");
        fs::write(&blocker, b"not a directory").unwrap();

        let cfg = config_in(tmp.path(), &[72]);
        let err = generate_icons(&cfg, &Database::new()).unwrap_err();
        assert!(matches!(err, IconError::CreateDir { .. }), "{err}");
    }

    #[test]
    fn test_write_failure_keeps_earlier_icons() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path(), &[72, 96, 128]);
        fs::create_dir_all(cfg.icons_dir.join(icon_file_name(96))).unwrap();

        let err = generate_icons(&cfg, &Database::new()).unwrap_err();
        assert!(matches!(err, IconError::Encode { .. }), "{err}");
        assert!(cfg.icons_dir.join(icon_file_name(72)).is_file());
        assert!(!cfg.icons_dir.join(icon_file_name(128)).exists());
    }

    #[test]
    fn test_run_writes_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path(), &[72, 144]);
        run(&cfg).unwrap();
        assert!(cfg.manifest_path.is_file());
        assert_eq!(dir_names(&cfg.icons_dir).len(), 2);
    }
}
