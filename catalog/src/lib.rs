//! SQLite-backed catalog of languages, their style names, and the formats
//! assigned to each style and global scheme.

mod seed;
mod store;

pub use seed::LanguageProvider;
pub use seed::ProviderLanguage;
pub use seed::SeedReport;
pub use store::CatalogStore;
pub use store::GlobalRecord;
pub use store::LanguageRecord;
pub use store::StyleRecord;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog key already exists: {key}")]
    UniqueViolation { key: String },
    #[error("language `{0}` is not present in the catalog")]
    UndefinedLanguage(String),
    #[error("style `{style}` is not present in the catalog for language `{language}`")]
    UndefinedStyle { language: String, style: String },
    #[error("the catalog has already been seeded")]
    AlreadySeeded,
    #[error("catalog database error: {source}")]
    Database {
        #[from]
        source: sqlx::Error,
    },
}

impl CatalogError {
    /// Folds SQLite unique-constraint failures into [`CatalogError::UniqueViolation`]
    /// so callers can tell duplicates apart from real database trouble.
    pub(crate) fn from_insert(err: sqlx::Error, key: impl Into<String>) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return Self::UniqueViolation { key: key.into() };
        }
        Self::Database { source: err }
    }
}
