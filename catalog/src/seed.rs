use themer_core::GLOBAL_SCHEMES;

use crate::CatalogError;
use crate::CatalogStore;

/// Source of the language inventory used to populate a fresh catalog.
pub trait LanguageProvider {
    fn language_ids(&self) -> Vec<String>;
    fn language(&self, id: &str) -> Option<ProviderLanguage>;
}

/// One language as reported by a provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderLanguage {
    pub name: String,
    pub style_ids: Vec<String>,
}

/// What a seeding run inserted and what it skipped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub languages: usize,
    pub styles: usize,
    pub skipped: usize,
}

impl CatalogStore {
    /// Populates an empty catalog: one global row per fixed scheme name, then
    /// every language and style the provider reports, each style paired with
    /// an all-null format row. Runs in a single transaction, so a failure
    /// part-way leaves the catalog untouched. A non-empty catalog is refused.
    pub async fn seed(
        &self,
        provider: &impl LanguageProvider,
    ) -> Result<SeedReport, CatalogError> {
        if self.is_seeded().await? {
            return Err(CatalogError::AlreadySeeded);
        }

        let mut report = SeedReport::default();
        let mut tx = self.pool().begin().await?;

        for scheme in GLOBAL_SCHEMES {
            sqlx::query("INSERT INTO globals (scheme) VALUES (?1)")
                .bind(scheme)
                .execute(&mut *tx)
                .await
                .map_err(|err| CatalogError::from_insert(err, format!("global {scheme}")))?;
        }

        for id in provider.language_ids() {
            let Some(language) = provider.language(&id) else {
                tracing::warn!(language = %id, "provider listed a language it cannot describe");
                report.skipped += 1;
                continue;
            };
            if language.name.is_empty() || language.style_ids.is_empty() {
                tracing::warn!(language = %id, "skipping language without a name or styles");
                report.skipped += 1;
                continue;
            }

            let lang_seq_id = sqlx::query("INSERT INTO languages (scheme, title) VALUES (?1, ?2)")
                .bind(&id)
                .bind(&language.name)
                .execute(&mut *tx)
                .await
                .map_err(|err| CatalogError::from_insert(err, format!("language {id}")))?
                .last_insert_rowid();

            for style in &language.style_ids {
                let style_seq_id =
                    sqlx::query("INSERT INTO style_schemes (lang_seq_id, style) VALUES (?1, ?2)")
                        .bind(lang_seq_id)
                        .bind(style)
                        .execute(&mut *tx)
                        .await
                        .map_err(|err| {
                            CatalogError::from_insert(err, format!("style {id}/{style}"))
                        })?
                        .last_insert_rowid();
                sqlx::query("INSERT INTO formats (style_seq_id) VALUES (?1)")
                    .bind(style_seq_id)
                    .execute(&mut *tx)
                    .await?;
                report.styles += 1;
            }
            report.languages += 1;
        }

        tx.commit().await?;
        tracing::info!(
            languages = report.languages,
            styles = report.styles,
            skipped = report.skipped,
            "seeded catalog"
        );
        Ok(report)
    }
}
