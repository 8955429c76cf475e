use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::IconError;
use crate::generator::{GeneratedIcon, icon_file_name};
use crate::models::ManifestIcon;

pub fn manifest_icons(url_prefix: &str, icons: &[GeneratedIcon]) -> Vec<ManifestIcon> {
    let prefix = url_prefix.trim_end_matches('/');
    icons
        .iter()
        .map(|icon| ManifestIcon {
            src: format!("{}/{}", prefix, icon_file_name(icon.size)),
            sizes: format!("{0}x{0}", icon.size),
            mime_type: "image/png".to_string(),
            purpose: "any maskable".to_string(),
        })
        .collect()
}

/// Writes the icon list as pretty JSON to `config.manifest_path`.
pub fn write_manifest(config: &Config, icons: &[GeneratedIcon]) -> Result<PathBuf, IconError> {
    let path = config.manifest_path.clone();
    let entries = manifest_icons(&config.icons_url_prefix, icons);
    save_json(&path, &entries).map_err(|source| IconError::Manifest { path: path.clone(), source })?;
    Ok(path)
}

fn save_json(path: &Path, entries: &[ManifestIcon]) -> Result<(), io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut f = BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer_pretty(&mut f, entries)?;
    writeln!(f)?;
    f.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icon(size: u32) -> GeneratedIcon {
        GeneratedIcon { size, path: PathBuf::from(icon_file_name(size)) }
    }

    #[test]
    fn test_entries_follow_icon_order() {
        let entries = manifest_icons("/icons/", &[icon(72), icon(512)]);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].src, "/icons/icon-72x72.png");
        assert_eq!(entries[0].sizes, "72x72");
        assert_eq!(entries[1].src, "/icons/icon-512x512.png");
        assert!(entries.iter().all(|e| e.purpose == "any maskable"));
    }

    #[test]
    fn test_written_json_uses_type_key() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cfg = Config::for_root(tmp.path());
        cfg.manifest_path = tmp.path().join("nested").join("icons.json");

        let path = write_manifest(&cfg, &[icon(192)]).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["type"], "image/png");
        assert_eq!(value[0]["src"], "/icons/icon-192x192.png");

        let parsed: Vec<ManifestIcon> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, manifest_icons("/icons", &[icon(192)]));
    }
}
