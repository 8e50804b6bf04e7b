use crate::error::PasteError;
use crate::text::SplitMode;
use scribe_html::BlockRenderRules;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "scribe.config.json";

/// Default per-file character limit for file text extraction
pub const DEFAULT_FILE_TEXT_LIMIT: usize = 5000;

/// Paste behavior configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasteConfig {
    /// Paste everything as plain text, ignoring markup and the internal clipboard
    #[serde(default)]
    pub strip_pasted_styles: bool,

    /// Host cannot read HTML from a paste event synchronously
    #[serde(default)]
    pub lacks_sync_html: bool,

    /// Honour the vendor web-archive clipboard type when no `text/html` is advertised
    #[serde(default = "default_true")]
    pub legacy_vendor_archive: bool,

    #[serde(default)]
    pub split_mode: SplitMode,

    #[serde(default = "default_file_text_limit")]
    pub file_text_limit: usize,

    #[serde(default)]
    pub block_render_rules: BlockRenderRules,
}

fn default_true() -> bool {
    true
}

fn default_file_text_limit() -> usize {
    DEFAULT_FILE_TEXT_LIMIT
}

impl PasteConfig {
    /// Load config from a directory, falling back to defaults when absent
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, PasteError> {
        let path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if path.exists() {
            Self::from_file(&path)
        } else {
            Ok(PasteConfig::default())
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, PasteError> {
        let content = std::fs::read_to_string(path).map_err(|source| PasteError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&content).map_err(|source| PasteError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("[Config] loaded {}", path.display());
        Ok(config)
    }
}

impl Default for PasteConfig {
    fn default() -> Self {
        Self {
            strip_pasted_styles: false,
            lacks_sync_html: false,
            legacy_vendor_archive: true,
            split_mode: SplitMode::default(),
            file_text_limit: DEFAULT_FILE_TEXT_LIMIT,
            block_render_rules: BlockRenderRules::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_model::BlockType;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "stripPastedStyles": true,
            "lacksSyncHtml": true,
            "splitMode": "paragraphs",
            "fileTextLimit": 100,
            "blockRenderRules": { "p": "paragraph" }
        }"#;

        let config: PasteConfig = serde_json::from_str(json).unwrap();
        assert!(config.strip_pasted_styles);
        assert!(config.lacks_sync_html);
        assert!(config.legacy_vendor_archive);
        assert_eq!(config.split_mode, SplitMode::Paragraphs);
        assert_eq!(config.file_text_limit, 100);
        assert_eq!(
            config.block_render_rules.block_type("p"),
            Some(BlockType::Paragraph)
        );
    }

    #[test]
    fn test_default_config() {
        let config = PasteConfig::default();
        assert!(!config.strip_pasted_styles);
        assert!(!config.lacks_sync_html);
        assert_eq!(config.split_mode, SplitMode::Lines);
        assert_eq!(config.file_text_limit, 5000);
        assert_eq!(config, serde_json::from_str::<PasteConfig>("{}").unwrap());
    }

    #[test]
    fn test_load_missing_and_present() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(PasteConfig::load(dir.path()).unwrap(), PasteConfig::default());

        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{"legacyVendorArchive": false}"#,
        )
        .unwrap();
        assert!(!PasteConfig::load(dir.path()).unwrap().legacy_vendor_archive);

        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{ not json").unwrap();
        assert!(matches!(
            PasteConfig::load(dir.path()),
            Err(PasteError::ConfigParse { .. })
        ));
    }
}
