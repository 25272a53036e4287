//! Command-line front end for the scheme catalog and scheme files.

mod manifest;

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clap::Subcommand;
use owo_colors::OwoColorize;
use themer_catalog::CatalogStore;
use themer_core::SchemeSerializer;
use themer_core::StyleRow;
use themer_core::ThemeDocument;
use themer_core::ThemeInfo;
use themer_core::markup;
use themer_core::parse_scheme_file;

pub use manifest::ManifestProvider;

#[derive(Debug, Parser)]
#[command(name = "themer", about = "Edit GtkSourceView-compatible style scheme files")]
pub struct ThemerCli {
    /// Path to the catalog database.
    #[arg(long = "db", value_name = "PATH", default_value = "themer.db", global = true)]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Populate a fresh catalog from a language manifest.
    Seed {
        /// JSON manifest listing languages and their style ids.
        #[arg(long, value_name = "FILE")]
        manifest: PathBuf,
    },
    /// List the languages in the catalog.
    Languages,
    /// List catalog styles with their stored formats.
    Styles {
        /// Restrict the listing to one language scheme id.
        language: Option<String>,
    },
    /// List the global editor schemes with their stored formats.
    Globals,
    /// Parse a scheme file and print its groups and styled entries.
    Inspect {
        /// Scheme XML file to inspect.
        file: PathBuf,
    },
    /// Write a new scheme file containing only header metadata.
    New {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "1.0")]
        version: String,
        #[arg(long, default_value = "")]
        author: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Where to write the scheme file.
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

pub async fn run(cli: ThemerCli) -> anyhow::Result<()> {
    match cli.command {
        Command::Seed { manifest } => seed(&cli.db, &manifest).await,
        Command::Languages => languages(&cli.db).await,
        Command::Styles { language } => styles(&cli.db, language.as_deref()).await,
        Command::Globals => globals(&cli.db).await,
        Command::Inspect { file } => inspect(&cli.db, &file).await,
        Command::New {
            id,
            name,
            version,
            author,
            description,
            output,
        } => {
            let info = ThemeInfo {
                id,
                name,
                version,
                author,
                description,
            };
            let mut doc = ThemeDocument::new();
            doc.info = info;
            doc.init_globals(&BTreeMap::new());
            let mut serializer = SchemeSerializer::new();
            serializer.add_info(&doc.info)?;
            serializer.add_styles(&doc);
            serializer.save_file(&output)?;
            println!("wrote {}", output.display());
            Ok(())
        }
    }
}

async fn open_store(db: &Path) -> anyhow::Result<CatalogStore> {
    CatalogStore::open(db)
        .await
        .with_context(|| format!("failed to open catalog at {}", db.display()))
}

async fn seed(db: &Path, manifest: &Path) -> anyhow::Result<()> {
    let provider = ManifestProvider::load(manifest)?;
    let store = open_store(db).await?;
    let report = store.seed(&provider).await?;
    println!(
        "seeded {} languages, {} styles ({} skipped)",
        report.languages, report.styles, report.skipped
    );
    Ok(())
}

async fn languages(db: &Path) -> anyhow::Result<()> {
    let store = open_store(db).await?;
    for record in store.iter_languages().await? {
        println!("{}  {}", record.scheme.bold(), record.title);
    }
    Ok(())
}

async fn styles(db: &Path, language: Option<&str>) -> anyhow::Result<()> {
    let store = open_store(db).await?;
    for record in store.iter_styles(language).await? {
        print_row(&markup::format_row(&record.format, &record.style));
    }
    Ok(())
}

async fn globals(db: &Path) -> anyhow::Result<()> {
    let store = open_store(db).await?;
    for record in store.iter_globals().await? {
        print_row(&markup::format_row(&record.format, &record.scheme));
    }
    Ok(())
}

async fn inspect(db: &Path, file: &Path) -> anyhow::Result<()> {
    let store = open_store(db).await?;
    let titles = store.language_titles().await?;
    let doc = parse_scheme_file(file, &titles)
        .with_context(|| format!("failed to parse scheme {}", file.display()))?;

    println!(
        "{} ({}) version {}",
        doc.info.name.bold(),
        doc.info.id,
        doc.info.version
    );
    if !doc.info.author.is_empty() {
        println!("author: {}", doc.info.author);
    }
    if !doc.info.description.is_empty() {
        println!("{}", doc.info.description.italic());
    }
    for (_, group) in doc.groups() {
        let header = markup::header_row(&group.title);
        println!("\n{}", header.name.underline());
        for (name, format) in group.entries() {
            print_row(&markup::format_row(format, name));
        }
    }
    Ok(())
}

fn print_row(row: &StyleRow) {
    let mut flags = String::new();
    for (set, flag) in [
        (row.bold, 'b'),
        (row.italic, 'i'),
        (row.underline, 'u'),
        (row.strikethrough, 's'),
    ] {
        flags.push(if set { flag } else { '-' });
    }
    println!(
        "  {:<32} fg {:<8} bg {:<8} {flags}",
        row.name,
        row.foreground.as_deref().unwrap_or("-"),
        row.background.as_deref().unwrap_or("-"),
    );
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_styles_with_optional_language() {
        let cli = ThemerCli::parse_from(["themer", "styles", "python"]);
        match cli.command {
            Command::Styles { language } => assert_eq!(language.as_deref(), Some("python")),
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = ThemerCli::parse_from(["themer", "--db", "/tmp/x.db", "styles"]);
        assert_eq!(cli.db, PathBuf::from("/tmp/x.db"));
        assert!(matches!(cli.command, Command::Styles { language: None }));
    }

    #[test]
    fn parses_new_with_defaults() {
        let cli = ThemerCli::parse_from([
            "themer", "new", "--id", "midnight", "--name", "Midnight", "--output", "out.xml",
        ]);
        match cli.command {
            Command::New { version, author, .. } => {
                assert_eq!(version, "1.0");
                assert_eq!(author, "");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn seed_requires_a_manifest() {
        assert!(ThemerCli::try_parse_from(["themer", "seed"]).is_err());
    }
}
