/// Manifest and unlock-code collaborators
///
/// Both files are plain JSON arrays consumed read-only. The manifest is
/// fatal when missing (the grid has nothing to show); the code map is not
/// (unlocking just fails until it loads).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::fs;

use crate::error::GalleryError;

/// One entry of `manifest.json`. Only `id`, `name` and `file` matter to the
/// core; the rest is display metadata. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ManifestEntry {
    pub id: String,
    pub name: String,
    pub file: String,
    pub scene: String,
    pub photos: u32,
    pub videos: u32,
}

/// One row of `codes.plain.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CodeRow {
    pub id: String,
    pub code: String,
}

/// Lookup from card id to its expected unlock code.
pub type CodeMap = HashMap<String, String>;

/// Load the manifest, trying several locations in order and using the
/// first one that reads and parses. A file that exists but does not parse
/// is logged and skipped like a missing one.
pub async fn load_manifest(assets_root: PathBuf) -> Result<Vec<ManifestEntry>, GalleryError> {
    load_manifest_from(vec![
        assets_root.join("manifest.json"),
        PathBuf::from("assets/manifest.json"),
        PathBuf::from("manifest.json"),
    ])
    .await
}

async fn load_manifest_from(locations: Vec<PathBuf>) -> Result<Vec<ManifestEntry>, GalleryError> {
    for path in &locations {
        match read_entries(path).await {
            Ok(entries) => {
                println!(
                    "📦 Manifest loaded from {} ({} entries)",
                    path.display(),
                    entries.len()
                );
                return Ok(entries);
            }
            Err(reason) => eprintln!("⚠️  Manifest unavailable at {}: {}", path.display(), reason),
        }
    }

    Err(GalleryError::ManifestLoad(
        "no readable manifest in any known location".to_string(),
    ))
}

async fn read_entries(path: &Path) -> Result<Vec<ManifestEntry>, String> {
    let bytes = fs::read(path).await.map_err(|e| e.to_string())?;
    serde_json::from_slice(&bytes).map_err(|e| e.to_string())
}

/// Load the id → code map used by the unlock gate.
pub async fn load_codes(assets_root: PathBuf) -> Result<CodeMap, GalleryError> {
    let path = assets_root.join("codes.plain.json");
    let bytes = fs::read(&path)
        .await
        .map_err(|e| GalleryError::CodeMapLoad(format!("{}: {}", path.display(), e)))?;
    let rows: Vec<CodeRow> =
        serde_json::from_slice(&bytes).map_err(|e| GalleryError::CodeMapLoad(e.to_string()))?;
    Ok(build_code_map(rows))
}

/// Build the lookup, skipping rows with a blank id or code.
/// Duplicate ids resolve last-wins.
pub fn build_code_map(rows: Vec<CodeRow>) -> CodeMap {
    let mut map = CodeMap::new();
    for row in rows {
        let id = row.id.trim();
        let code = row.code.trim();
        if !id.is_empty() && !code.is_empty() {
            map.insert(id.to_string(), code.to_string());
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_entry_tolerates_unknown_and_missing_fields() {
        let json = r#"{"id":"s1","name":"Set One","file":"assets/models/one.jpg",
                       "patreon":"https://example.com","photos":12}"#;
        let entry: ManifestEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, "s1");
        assert_eq!(entry.photos, 12);
        assert_eq!(entry.videos, 0);
        assert!(entry.scene.is_empty());
    }

    #[test]
    fn code_map_skips_blanks_and_keeps_last_duplicate() {
        let rows = vec![
            CodeRow { id: "a".into(), code: "FIRST".into() },
            CodeRow { id: "  ".into(), code: "X".into() },
            CodeRow { id: "b".into(), code: "".into() },
            CodeRow { id: "a".into(), code: " SECOND ".into() },
        ];
        let map = build_code_map(rows);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a").map(String::as_str), Some("SECOND"));
    }

    #[tokio::test]
    async fn missing_manifest_is_a_load_failure() {
        let locations = vec![
            PathBuf::from("/nonexistent/a/manifest.json"),
            PathBuf::from("/nonexistent/b/manifest.json"),
        ];
        let result = load_manifest_from(locations).await;
        assert!(matches!(result, Err(GalleryError::ManifestLoad(_))));
    }
}
