use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use themer_catalog::LanguageProvider;
use themer_catalog::ProviderLanguage;

#[derive(Debug, Deserialize)]
struct ManifestLanguage {
    id: String,
    name: String,
    #[serde(default)]
    styles: Vec<String>,
}

/// Language inventory loaded from a JSON manifest: a top-level array of
/// `{ "id", "name", "styles": [...] }` objects.
#[derive(Debug)]
pub struct ManifestProvider {
    languages: Vec<ManifestLanguage>,
}

impl ManifestProvider {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        let languages: Vec<ManifestLanguage> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse manifest {}", path.display()))?;
        Ok(Self { languages })
    }
}

impl LanguageProvider for ManifestProvider {
    fn language_ids(&self) -> Vec<String> {
        self.languages.iter().map(|language| language.id.clone()).collect()
    }

    fn language(&self, id: &str) -> Option<ProviderLanguage> {
        self.languages
            .iter()
            .find(|language| language.id == id)
            .map(|language| ProviderLanguage {
                name: language.name.clone(),
                style_ids: language.styles.clone(),
            })
    }
}
