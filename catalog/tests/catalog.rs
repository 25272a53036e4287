#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use themer_catalog::CatalogError;
use themer_catalog::CatalogStore;
use themer_catalog::LanguageProvider;
use themer_catalog::ProviderLanguage;
use themer_core::FormatPatch;
use themer_core::GLOBAL_SCHEMES;

struct FixtureProvider {
    languages: Vec<(String, ProviderLanguage)>,
}

impl FixtureProvider {
    fn standard() -> Self {
        Self {
            languages: vec![
                (
                    "python".to_string(),
                    ProviderLanguage {
                        name: "Python".to_string(),
                        style_ids: vec![
                            "python:keyword".to_string(),
                            "python:string".to_string(),
                        ],
                    },
                ),
                (
                    "c".to_string(),
                    ProviderLanguage {
                        name: "C".to_string(),
                        style_ids: vec!["c:comment".to_string()],
                    },
                ),
            ],
        }
    }
}

impl LanguageProvider for FixtureProvider {
    fn language_ids(&self) -> Vec<String> {
        self.languages.iter().map(|(id, _)| id.clone()).collect()
    }

    fn language(&self, id: &str) -> Option<ProviderLanguage> {
        self.languages
            .iter()
            .find(|(candidate, _)| candidate == id)
            .map(|(_, language)| language.clone())
    }
}

async fn open_store(dir: &TempDir) -> CatalogStore {
    CatalogStore::open(&dir.path().join("catalog.db"))
        .await
        .unwrap()
}

#[tokio::test]
async fn seed_populates_languages_styles_and_globals() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let report = store.seed(&FixtureProvider::standard()).await.unwrap();
    assert_eq!(report.languages, 2);
    assert_eq!(report.styles, 3);
    assert_eq!(report.skipped, 0);
    assert!(store.is_seeded().await.unwrap());

    let languages = store.iter_languages().await.unwrap();
    let titles: Vec<(&str, &str)> = languages
        .iter()
        .map(|record| (record.scheme.as_str(), record.title.as_str()))
        .collect();
    assert_eq!(titles, vec![("c", "C"), ("python", "Python")]);

    let globals = store.iter_globals().await.unwrap();
    assert_eq!(globals.len(), GLOBAL_SCHEMES.len());
    assert!(globals.iter().all(|record| record.format.is_unset()));

    let python_styles = store.iter_styles(Some("python")).await.unwrap();
    let names: Vec<&str> = python_styles
        .iter()
        .map(|record| record.style.as_str())
        .collect();
    assert_eq!(names, vec!["python:keyword", "python:string"]);
    assert!(python_styles.iter().all(|record| record.format.is_unset()));

    assert_eq!(store.iter_styles(None).await.unwrap().len(), 3);
    assert!(store.iter_styles(Some("zig")).await.unwrap().is_empty());
}

#[tokio::test]
async fn seed_refuses_a_populated_catalog() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    store.seed(&FixtureProvider::standard()).await.unwrap();

    let err = store.seed(&FixtureProvider::standard()).await.unwrap_err();
    assert!(matches!(err, CatalogError::AlreadySeeded));
}

#[tokio::test]
async fn failed_seed_leaves_the_catalog_empty() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    // The duplicate language id trips the unique index mid-seed; the whole
    // transaction must roll back.
    let mut provider = FixtureProvider::standard();
    provider.languages.push((
        "python".to_string(),
        ProviderLanguage {
            name: "Python again".to_string(),
            style_ids: vec!["python:other".to_string()],
        },
    ));
    let err = store.seed(&provider).await.unwrap_err();
    assert!(matches!(err, CatalogError::UniqueViolation { .. }));

    assert!(!store.is_seeded().await.unwrap());
    assert!(store.iter_languages().await.unwrap().is_empty());
    assert!(store.iter_globals().await.unwrap().is_empty());
}

#[tokio::test]
async fn seed_skips_languages_without_names_or_styles() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let mut provider = FixtureProvider::standard();
    provider.languages.push((
        "empty".to_string(),
        ProviderLanguage {
            name: "Empty".to_string(),
            style_ids: Vec::new(),
        },
    ));
    let report = store.seed(&provider).await.unwrap();
    assert_eq!(report.languages, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(store.iter_languages().await.unwrap().len(), 2);
}

#[tokio::test]
async fn update_format_merges_partial_patches() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    store.seed(&FixtureProvider::standard()).await.unwrap();

    store
        .update_format(
            "python",
            "python:keyword",
            &FormatPatch {
                foreground: Some("#00A72F".to_string()),
                bold: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    store
        .update_format(
            "python",
            "python:keyword",
            &FormatPatch {
                bold: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let styles = store.iter_styles(Some("python")).await.unwrap();
    let keyword = styles
        .iter()
        .find(|record| record.style == "python:keyword")
        .unwrap();
    assert_eq!(keyword.format.foreground.as_deref(), Some("#00A72F"));
    assert_eq!(keyword.format.bold, Some(false));
    assert_eq!(keyword.format.italic, None);
}

#[tokio::test]
async fn update_format_rejects_unknown_styles() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    store.seed(&FixtureProvider::standard()).await.unwrap();

    let patch = FormatPatch {
        italic: Some(true),
        ..Default::default()
    };
    let err = store
        .update_format("python", "python:nope", &patch)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::UndefinedStyle { .. }));

    // An empty patch is a no-op even for unknown styles.
    store
        .update_format("python", "python:nope", &FormatPatch::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn update_global_targets_one_scheme() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    store.seed(&FixtureProvider::standard()).await.unwrap();

    store
        .update_global(
            "cursor",
            &FormatPatch {
                foreground: Some("#ffcc00".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let globals = store.iter_globals().await.unwrap();
    let cursor = globals
        .iter()
        .find(|record| record.scheme == "cursor")
        .unwrap();
    assert_eq!(cursor.format.foreground.as_deref(), Some("#ffcc00"));
    assert!(
        globals
            .iter()
            .filter(|record| record.scheme != "cursor")
            .all(|record| record.format.is_unset())
    );

    let err = store
        .update_global(
            "not-a-scheme",
            &FormatPatch {
                bold: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::UndefinedLanguage(_)));
}

#[tokio::test]
async fn manual_inserts_enforce_catalog_keys() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    store.new_language("rust", "Rust").await.unwrap();
    let err = store.new_language("rust", "Rust").await.unwrap_err();
    assert!(matches!(err, CatalogError::UniqueViolation { .. }));

    let err = store.new_style("zig", "zig:keyword").await.unwrap_err();
    assert!(matches!(err, CatalogError::UndefinedLanguage(_)));

    store.new_style("rust", "rust:keyword").await.unwrap();
    store.new_format("rust", "rust:keyword").await.unwrap();
    let err = store.new_format("rust", "rust:nope").await.unwrap_err();
    assert!(matches!(err, CatalogError::UndefinedStyle { .. }));

    store.new_global("text").await.unwrap();
    let err = store.new_global("text").await.unwrap_err();
    assert!(matches!(err, CatalogError::UniqueViolation { .. }));
}

#[tokio::test]
async fn language_titles_maps_scheme_to_title() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    store.seed(&FixtureProvider::standard()).await.unwrap();

    let titles = store.language_titles().await.unwrap();
    assert_eq!(titles.get("python").map(String::as_str), Some("Python"));
    assert_eq!(titles.get("c").map(String::as_str), Some("C"));
}
