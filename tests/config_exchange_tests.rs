use std::sync::Arc;

use paper_docx::error::{ConfigError, ConfigJsonError};
use paper_docx::format::{export_config_text, import_config_text, resolve_path, FontSize, StyleSpec};
use paper_docx::{ConfigManager, DraftStore, Footnote, FormatConfig, PaperContent};
use paper_storage_core::{KeyValueStore, FORMAT_CONFIG_KEY};
use paper_storage_local::FileKvStore;
use pretty_assertions::assert_eq;
use rstest::*;
use tempfile::TempDir;

#[fixture]
fn store() -> (Arc<FileKvStore>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileKvStore::new(temp_dir.path()));
    (store, temp_dir)
}

#[test]
fn test_default_config_roundtrip() {
    let config = FormatConfig::default();
    let text = export_config_text(&config).unwrap();
    assert_eq!(import_config_text(&text).unwrap(), config);
}

#[test]
fn test_partial_import_resolves_through_defaults() {
    let text = r#"{
        "title": {"size": "二号"},
        "personalInfo": {},
        "abstractTitle": {},
        "abstractContent": {},
        "references": {"content": {"family": "楷体"}}
    }"#;
    let config = import_config_text(text).unwrap();

    let title = resolve_path("title", &config).unwrap();
    assert_eq!(title.size, FontSize::ErHao);
    assert_eq!(title.family, "宋体");
    assert!(title.bold);

    let refs = resolve_path("references.content", &config).unwrap();
    assert_eq!(refs.family, "楷体");
    assert_eq!(refs.line_units(), 540);
}

#[rstest]
#[case("null", ConfigJsonError::NotAnObject)]
#[case("[1, 2]", ConfigJsonError::NotAnObject)]
#[case(r#"{"title": {}}"#, ConfigJsonError::MissingSection("personalInfo"))]
#[case(
    r#"{"title": {}, "personalInfo": {}, "abstractTitle": null, "abstractContent": {}}"#,
    ConfigJsonError::MissingSection("abstractTitle")
)]
fn test_import_rejects_structurally_invalid_text(#[case] text: &str, #[case] expected: ConfigJsonError) {
    match import_config_text(text) {
        Err(ConfigError::Invalid(e)) => assert_eq!(e, expected),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[rstest]
#[tokio::test]
async fn test_manager_persists_across_instances(store: (Arc<FileKvStore>, TempDir)) {
    let (store, _temp_dir) = store;
    let manager = ConfigManager::new(store.clone());

    let mut config = FormatConfig::default();
    config.footnote_english = Some(StyleSpec::new("Georgia", "五号"));
    let text = export_config_text(&config).unwrap();
    manager.import_text(&text).await.unwrap();

    let reopened = ConfigManager::new(Arc::new(FileKvStore::new(store.root())));
    assert_eq!(reopened.load().await.unwrap(), config);
    assert_eq!(reopened.export_text().await.unwrap(), text);
}

#[rstest]
#[tokio::test]
async fn test_saved_empty_config_exports_importable_text(store: (Arc<FileKvStore>, TempDir)) {
    let (store, _temp_dir) = store;
    let manager = ConfigManager::new(store);
    manager.save(&FormatConfig::empty()).await.unwrap();

    let text = manager.export_text().await.unwrap();
    let imported = manager.import_text(&text).await.unwrap();
    assert_eq!(imported, FormatConfig::empty().with_required_sections());
    assert_eq!(
        resolve_path("title", &imported).unwrap(),
        resolve_path("title", &FormatConfig::empty()).unwrap()
    );
}

#[rstest]
#[tokio::test]
async fn test_failed_import_keeps_previous_config(store: (Arc<FileKvStore>, TempDir)) {
    let (store, _temp_dir) = store;
    let manager = ConfigManager::new(store.clone());
    manager.reset().await.unwrap();
    let before = store.get(FORMAT_CONFIG_KEY).await.unwrap();

    assert!(manager.import_text("{not json").await.is_err());
    assert_eq!(store.get(FORMAT_CONFIG_KEY).await.unwrap(), before);
}

#[rstest]
#[tokio::test]
async fn test_draft_and_config_share_a_store(store: (Arc<FileKvStore>, TempDir)) {
    let (store, temp_dir) = store;
    let drafts = DraftStore::new(store.clone());
    let configs = ConfigManager::new(store);

    let mut paper = PaperContent {
        title: "草稿".into(),
        ..Default::default()
    };
    let id = paper.add_footnote().unwrap();
    paper.update_footnote(id, "脚注");
    drafts.save(&paper).await.unwrap();
    configs.reset().await.unwrap();

    let loaded = drafts.load().await.unwrap().unwrap().value;
    assert_eq!(loaded.footnotes, vec![Footnote { id: 1, content: "脚注".into() }]);
    assert!(temp_dir.path().join("paper-factory-draft.json").exists());
    assert!(temp_dir.path().join("paper-factory-format-config.json").exists());
}
