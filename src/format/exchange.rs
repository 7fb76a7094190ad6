use std::sync::Arc;

use paper_storage_core::{KeyValueStore, FORMAT_CONFIG_KEY};
use tracing::{info, instrument, warn};

use super::{resolve, FormatConfig, SectionPath};
use crate::error::ConfigError;
use crate::sanitize::validate_config_json;

/// Pretty-printed JSON of the full configuration.
///
/// Sections an import requires are written from the built-in defaults when
/// `config` leaves them unset, so any exported text imports back to a
/// configuration that resolves identically.
pub fn export_config_text(config: &FormatConfig) -> Result<String, ConfigError> {
    Ok(serde_json::to_string_pretty(&config.with_required_sections())?)
}

/// Parse and validate an externally supplied configuration.
///
/// Beyond the structural check, every leaf must resolve, so an accepted
/// configuration can never fail assembly with an unknown font size.
pub fn import_config_text(text: &str) -> Result<FormatConfig, ConfigError> {
    let value = validate_config_json(text)?;
    let config: FormatConfig = serde_json::from_value(value)?;
    for path in SectionPath::ALL {
        resolve(path, &config)?;
    }
    Ok(config)
}

/// Loads, saves and exchanges the active format configuration through a
/// key-value store.
///
/// The configuration is always replaced wholesale; there is no partial merge.
#[derive(Clone)]
pub struct ConfigManager {
    store: Arc<dyn KeyValueStore>,
}

impl ConfigManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The stored configuration, or the built-in one if nothing usable is
    /// stored.
    #[instrument(skip(self), level = "debug")]
    pub async fn load(&self) -> Result<FormatConfig, ConfigError> {
        let Some(text) = self.store.get(FORMAT_CONFIG_KEY).await? else {
            return Ok(FormatConfig::default());
        };
        match serde_json::from_str(&text) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!("Stored format configuration is unreadable, using defaults: {}", e);
                Ok(FormatConfig::default())
            }
        }
    }

    pub async fn save(&self, config: &FormatConfig) -> Result<(), ConfigError> {
        let text = serde_json::to_string(config)?;
        self.store.set(FORMAT_CONFIG_KEY, &text).await?;
        Ok(())
    }

    /// Restore and persist the built-in configuration.
    pub async fn reset(&self) -> Result<FormatConfig, ConfigError> {
        let config = FormatConfig::default();
        self.save(&config).await?;
        info!("Format configuration reset to defaults");
        Ok(config)
    }

    pub async fn export_text(&self) -> Result<String, ConfigError> {
        export_config_text(&self.load().await?)
    }

    /// Validate `text` and, on success, make it the active configuration.
    /// On failure the stored configuration is left untouched.
    pub async fn import_text(&self, text: &str) -> Result<FormatConfig, ConfigError> {
        let config = import_config_text(text)?;
        self.save(&config).await?;
        info!("Imported format configuration ({} bytes)", text.len());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigJsonError;
    use crate::format::StyleSpec;
    use paper_storage_local::MemoryKvStore;

    fn manager() -> (ConfigManager, Arc<MemoryKvStore>) {
        let store = Arc::new(MemoryKvStore::new());
        (ConfigManager::new(store.clone()), store)
    }

    #[test]
    fn test_export_import_roundtrip() {
        let mut config = FormatConfig::default();
        config.content_english = Some(StyleSpec::new("Arial", "五号").align("right").spacing(1.15));
        config.numbering_indents = Some(crate::format::NumberingIndents {
            level3: Some(3.0),
            ..Default::default()
        });

        let text = export_config_text(&config).unwrap();
        assert!(text.contains('\n'), "export should be pretty-printed");
        assert_eq!(import_config_text(&text).unwrap(), config);
    }

    #[test]
    fn test_export_of_sparse_config_imports_back() {
        let mut partial = FormatConfig::default();
        partial.personal_info = None;
        partial.title = Some(StyleSpec {
            family: Some("楷体".into()),
            ..Default::default()
        });

        for config in [FormatConfig::empty(), partial] {
            let imported = import_config_text(&export_config_text(&config).unwrap()).unwrap();
            assert_eq!(imported, config.with_required_sections());
            for path in SectionPath::ALL {
                assert_eq!(resolve(path, &imported).unwrap(), resolve(path, &config).unwrap(), "{}", path);
            }
        }
    }

    #[test]
    fn test_import_rejects_unknown_font_size() {
        let text = r#"{
            "title": {"family": "宋体", "size": "三号"},
            "personalInfo": {"size": "五号"},
            "abstractTitle": {"size": "四号"},
            "abstractContent": {"size": "huge"}
        }"#;
        assert!(matches!(import_config_text(text), Err(ConfigError::Format(_))));
    }

    #[test]
    fn test_import_rejects_wrong_field_types() {
        let text = r#"{"title": {"size": 16}, "personalInfo": {}, "abstractTitle": {}, "abstractContent": {}}"#;
        assert!(matches!(import_config_text(text), Err(ConfigError::Shape(_))));
    }

    #[tokio::test]
    async fn test_load_without_stored_value_uses_defaults() {
        let (manager, _store) = manager();
        assert_eq!(manager.load().await.unwrap(), FormatConfig::default());
    }

    #[tokio::test]
    async fn test_load_with_corrupt_value_uses_defaults() {
        let (manager, store) = manager();
        store.set(FORMAT_CONFIG_KEY, "{{{").await.unwrap();
        assert_eq!(manager.load().await.unwrap(), FormatConfig::default());
    }

    #[tokio::test]
    async fn test_import_replaces_and_persists() {
        let (manager, store) = manager();
        let text = r#"{
            "title": {"family": "黑体", "size": "二号"},
            "personalInfo": {"family": "宋体"},
            "abstractTitle": {"family": "黑体"},
            "abstractContent": {"family": "宋体"}
        }"#;

        let imported = manager.import_text(text).await.unwrap();
        // Wholesale replacement: sections absent from the import are unset
        assert!(imported.keywords.is_none());
        assert!(store.get(FORMAT_CONFIG_KEY).await.unwrap().is_some());
        assert_eq!(manager.load().await.unwrap(), imported);
    }

    #[tokio::test]
    async fn test_failed_import_keeps_previous_config() {
        let (manager, _store) = manager();
        let mut custom = FormatConfig::default();
        custom.title = Some(StyleSpec::new("Arial", "一号"));
        manager.save(&custom).await.unwrap();

        let err = manager.import_text(r#"{"title": {}}"#).await.unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(ConfigJsonError::MissingSection("personalInfo"))
        ));
        assert_eq!(manager.load().await.unwrap(), custom);
    }

    #[tokio::test]
    async fn test_reset() {
        let (manager, _store) = manager();
        manager.save(&FormatConfig::empty()).await.unwrap();
        assert_eq!(manager.reset().await.unwrap(), FormatConfig::default());
        assert_eq!(manager.load().await.unwrap(), FormatConfig::default());
    }
}
