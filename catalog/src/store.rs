use std::collections::BTreeMap;
use std::path::Path;

use sqlx::Row as _;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::sqlite::SqliteRow;
use themer_core::FormatPatch;
use themer_core::StyleFormat;

use crate::CatalogError;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS languages (
  lang_seq_id INTEGER PRIMARY KEY AUTOINCREMENT,
  scheme      TEXT NOT NULL,
  title       TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_languages_scheme ON languages(scheme);

CREATE TABLE IF NOT EXISTS style_schemes (
  style_seq_id INTEGER PRIMARY KEY AUTOINCREMENT,
  lang_seq_id  INTEGER NOT NULL REFERENCES languages(lang_seq_id),
  style        TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_style_schemes_style
  ON style_schemes(style, lang_seq_id);

CREATE TABLE IF NOT EXISTS formats (
  format_seq_id INTEGER PRIMARY KEY AUTOINCREMENT,
  style_seq_id  INTEGER NOT NULL REFERENCES style_schemes(style_seq_id),
  foreground    TEXT,
  background    TEXT,
  bold          INTEGER,
  italic        INTEGER,
  underline     INTEGER,
  strikethrough INTEGER
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_formats_style ON formats(style_seq_id);

CREATE TABLE IF NOT EXISTS globals (
  global_seq_id INTEGER PRIMARY KEY AUTOINCREMENT,
  scheme        TEXT NOT NULL,
  foreground    TEXT,
  background    TEXT,
  bold          INTEGER,
  italic        INTEGER,
  underline     INTEGER,
  strikethrough INTEGER
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_globals_scheme ON globals(scheme);
"#;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageRecord {
    pub scheme: String,
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleRecord {
    pub language: String,
    pub style: String,
    pub format: StyleFormat,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlobalRecord {
    pub scheme: String,
    pub format: StyleFormat,
}

/// Handle to the on-disk catalog. All access flows through one connection
/// pool; the catalog assumes a single writer at a time.
#[derive(Clone)]
pub struct CatalogStore {
    pool: SqlitePool,
}

impl CatalogStore {
    /// Opens (creating if missing) the catalog at `path` and ensures the
    /// schema exists. Re-opening an existing catalog is a no-op thanks to
    /// the `IF NOT EXISTS` guards.
    pub async fn open(path: &Path) -> Result<Self, CatalogError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn new_language(&self, scheme: &str, title: &str) -> Result<(), CatalogError> {
        sqlx::query("INSERT INTO languages (scheme, title) VALUES (?1, ?2)")
            .bind(scheme)
            .bind(title)
            .execute(&self.pool)
            .await
            .map_err(|err| CatalogError::from_insert(err, format!("language {scheme}")))?;
        Ok(())
    }

    pub async fn new_style(&self, scheme: &str, style: &str) -> Result<(), CatalogError> {
        let lang_seq_id: Option<i64> =
            sqlx::query_scalar("SELECT lang_seq_id FROM languages WHERE scheme = ?1")
                .bind(scheme)
                .fetch_optional(&self.pool)
                .await?;
        let lang_seq_id =
            lang_seq_id.ok_or_else(|| CatalogError::UndefinedLanguage(scheme.to_string()))?;
        sqlx::query("INSERT INTO style_schemes (lang_seq_id, style) VALUES (?1, ?2)")
            .bind(lang_seq_id)
            .bind(style)
            .execute(&self.pool)
            .await
            .map_err(|err| CatalogError::from_insert(err, format!("style {scheme}/{style}")))?;
        Ok(())
    }

    /// Creates the (initially all-null) format row for one style.
    pub async fn new_format(&self, scheme: &str, style: &str) -> Result<(), CatalogError> {
        let lang_seq_id: Option<i64> =
            sqlx::query_scalar("SELECT lang_seq_id FROM languages WHERE scheme = ?1")
                .bind(scheme)
                .fetch_optional(&self.pool)
                .await?;
        let lang_seq_id =
            lang_seq_id.ok_or_else(|| CatalogError::UndefinedLanguage(scheme.to_string()))?;
        let result = sqlx::query(
            "INSERT INTO formats (style_seq_id)
             SELECT style_seq_id FROM style_schemes
              WHERE lang_seq_id = ?1 AND style = ?2",
        )
        .bind(lang_seq_id)
        .bind(style)
        .execute(&self.pool)
        .await
        .map_err(|err| CatalogError::from_insert(err, format!("format {scheme}/{style}")))?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::UndefinedStyle {
                language: scheme.to_string(),
                style: style.to_string(),
            });
        }
        Ok(())
    }

    pub async fn new_global(&self, scheme: &str) -> Result<(), CatalogError> {
        sqlx::query("INSERT INTO globals (scheme) VALUES (?1)")
            .bind(scheme)
            .execute(&self.pool)
            .await
            .map_err(|err| CatalogError::from_insert(err, format!("global {scheme}")))?;
        Ok(())
    }

    /// Merges `patch` into one style's persisted format. Columns the patch
    /// does not carry keep their stored value.
    pub async fn update_format(
        &self,
        scheme: &str,
        style: &str,
        patch: &FormatPatch,
    ) -> Result<(), CatalogError> {
        if patch.is_empty() {
            return Ok(());
        }
        let mut builder = sqlx::QueryBuilder::<sqlx::Sqlite>::new("UPDATE formats SET ");
        push_patch_assignments(&mut builder, patch);
        builder.push(
            " WHERE style_seq_id IN (
               SELECT style_schemes.style_seq_id
                 FROM style_schemes
                 JOIN languages ON languages.lang_seq_id = style_schemes.lang_seq_id
                WHERE languages.scheme = ",
        );
        builder.push_bind(scheme);
        builder.push(" AND style_schemes.style = ");
        builder.push_bind(style);
        builder.push(")");
        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::UndefinedStyle {
                language: scheme.to_string(),
                style: style.to_string(),
            });
        }
        Ok(())
    }

    /// Merges `patch` into one global scheme's persisted format.
    pub async fn update_global(
        &self,
        scheme: &str,
        patch: &FormatPatch,
    ) -> Result<(), CatalogError> {
        if patch.is_empty() {
            return Ok(());
        }
        let mut builder = sqlx::QueryBuilder::<sqlx::Sqlite>::new("UPDATE globals SET ");
        push_patch_assignments(&mut builder, patch);
        builder.push(" WHERE scheme = ");
        builder.push_bind(scheme);
        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::UndefinedLanguage(scheme.to_string()));
        }
        Ok(())
    }

    pub async fn iter_languages(&self) -> Result<Vec<LanguageRecord>, CatalogError> {
        let rows = sqlx::query("SELECT scheme, title FROM languages ORDER BY scheme")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter()
            .map(|row| {
                Ok(LanguageRecord {
                    scheme: row.try_get("scheme")?,
                    title: row.try_get("title")?,
                })
            })
            .collect()
    }

    /// Lists style rows with their formats, optionally filtered to one
    /// language. An unknown language filter yields an empty list.
    pub async fn iter_styles(
        &self,
        language: Option<&str>,
    ) -> Result<Vec<StyleRecord>, CatalogError> {
        const BASE: &str = "SELECT languages.scheme AS language, style_schemes.style,
                    formats.foreground, formats.background, formats.bold,
                    formats.italic, formats.underline, formats.strikethrough
               FROM formats
               JOIN style_schemes ON style_schemes.style_seq_id = formats.style_seq_id
               JOIN languages ON languages.lang_seq_id = style_schemes.lang_seq_id";
        let rows = match language {
            Some(language) => {
                sqlx::query(&format!(
                    "{BASE} WHERE languages.scheme = ?1 ORDER BY style_schemes.style"
                ))
                .bind(language)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "{BASE} ORDER BY languages.scheme, style_schemes.style"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        rows.into_iter()
            .map(|row| {
                Ok(StyleRecord {
                    language: row.try_get("language")?,
                    style: row.try_get("style")?,
                    format: format_from_row(&row)?,
                })
            })
            .collect()
    }

    pub async fn iter_globals(&self) -> Result<Vec<GlobalRecord>, CatalogError> {
        let rows = sqlx::query(
            "SELECT scheme, foreground, background, bold, italic, underline, strikethrough
               FROM globals ORDER BY scheme",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|row| {
                Ok(GlobalRecord {
                    scheme: row.try_get("scheme")?,
                    format: format_from_row(&row)?,
                })
            })
            .collect()
    }

    /// Scheme-id to display-title map, as needed when parsing scheme files.
    pub async fn language_titles(&self) -> Result<BTreeMap<String, String>, CatalogError> {
        Ok(self
            .iter_languages()
            .await?
            .into_iter()
            .map(|record| (record.scheme, record.title))
            .collect())
    }

    /// True once any language row exists. Seeding is all-or-nothing, so a
    /// non-empty language table means the whole seed sequence ran.
    pub async fn is_seeded(&self) -> Result<bool, CatalogError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM languages")
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn format_from_row(row: &SqliteRow) -> Result<StyleFormat, sqlx::Error> {
    Ok(StyleFormat {
        foreground: row.try_get("foreground")?,
        background: row.try_get("background")?,
        bold: row.try_get("bold")?,
        italic: row.try_get("italic")?,
        underline: row.try_get("underline")?,
        strikethrough: row.try_get("strikethrough")?,
    })
}

// Column names come from this fixed list, never from input; only the values
// are bound.
fn push_patch_assignments(builder: &mut sqlx::QueryBuilder<'_, sqlx::Sqlite>, patch: &FormatPatch) {
    let mut assignments = builder.separated(", ");
    if let Some(foreground) = &patch.foreground {
        assignments.push("foreground = ");
        assignments.push_bind_unseparated(foreground.clone());
    }
    if let Some(background) = &patch.background {
        assignments.push("background = ");
        assignments.push_bind_unseparated(background.clone());
    }
    if let Some(bold) = patch.bold {
        assignments.push("bold = ");
        assignments.push_bind_unseparated(bold);
    }
    if let Some(italic) = patch.italic {
        assignments.push("italic = ");
        assignments.push_bind_unseparated(italic);
    }
    if let Some(underline) = patch.underline {
        assignments.push("underline = ");
        assignments.push_bind_unseparated(underline);
    }
    if let Some(strikethrough) = patch.strikethrough {
        assignments.push("strikethrough = ");
        assignments.push_bind_unseparated(strikethrough);
    }
}
