//! Catalog source loading
//!
//! Reads raw catalog rows from JSON/YAML export files. The catalog is read
//! wholesale at rebuild time; there is no incremental delta feed.

use serde::{Deserialize, Serialize};
use std::path::Path;

use bedding_agent_core::RawCatalogItem;

use crate::CatalogError;

/// Catalog export file format
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Version for format compatibility
    #[serde(default)]
    pub version: Option<String>,
    /// Raw catalog rows
    pub items: Vec<RawCatalogItem>,
}

/// Loads raw catalog rows from export files
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load every JSON/YAML catalog file in a directory.
    ///
    /// A file that fails to parse is logged and skipped; one bad export must
    /// not abort the whole rebuild.
    pub fn load_directory(catalog_dir: &Path) -> Result<Vec<RawCatalogItem>, CatalogError> {
        if !catalog_dir.exists() {
            tracing::warn!(path = %catalog_dir.display(), "Catalog directory does not exist");
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(catalog_dir)
            .map_err(|e| CatalogError::Io(format!("Failed to read directory: {}", e)))?;

        let mut items = Vec::new();

        for entry in entries {
            let entry =
                entry.map_err(|e| CatalogError::Io(format!("Failed to read entry: {}", e)))?;
            let path = entry.path();

            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if !matches!(extension, "yaml" | "yml" | "json") {
                continue;
            }

            match Self::load_file(&path) {
                Ok(mut file_items) => {
                    tracing::info!(
                        file = %path.display(),
                        items = file_items.len(),
                        "Loaded catalog file"
                    );
                    items.append(&mut file_items);
                },
                Err(e) => {
                    tracing::error!(
                        file = %path.display(),
                        error = %e,
                        "Failed to load catalog file"
                    );
                },
            }
        }

        tracing::info!(
            directory = %catalog_dir.display(),
            total_items = items.len(),
            "Catalog loading complete"
        );

        Ok(items)
    }

    /// Load a single catalog export file
    pub fn load_file(path: &Path) -> Result<Vec<RawCatalogItem>, CatalogError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Io(format!("Failed to read file: {}", e)))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let file: CatalogFile = match extension {
            "json" => serde_json::from_str(&content)
                .map_err(|e| CatalogError::Format(format!("JSON parse error: {}", e)))?,
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .map_err(|e| CatalogError::Format(format!("YAML parse error: {}", e)))?,
            _ => {
                return Err(CatalogError::Format(format!(
                    "Unsupported file type: {}",
                    extension
                )))
            },
        };

        Ok(file.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"{
        "items": [
            {
                "category": "棉被",
                "product_name": "康適四孔棉抗菌被",
                "description": "透氣抗菌",
                "sizes": ["3*4", "4*5"],
                "prices": [750, 850]
            },
            {
                "category": "蠶絲被",
                "product_name": "手工蠶絲被",
                "description": "手工拉製",
                "weight_prices": ["$2550 (1.5斤)"]
            }
        ]
    }"#;

    #[test]
    fn loads_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let items = CatalogLoader::load_file(&path).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].sizes.len(), 2);
    }

    #[test]
    fn bad_file_is_skipped_by_directory_load() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("good.json"), SAMPLE).unwrap();
        std::fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let items = CatalogLoader::load_directory(dir.path()).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn missing_directory_is_empty_not_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let items = CatalogLoader::load_directory(&missing).unwrap();
        assert!(items.is_empty());
    }
}
