//! Reader and writer for GtkSourceView-compatible `.xml` style scheme files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::BytesDecl;
use quick_xml::events::BytesEnd;
use quick_xml::events::BytesStart;
use quick_xml::events::BytesText;
use quick_xml::events::Event;
use quick_xml::events::attributes::AttrError;

use crate::document::ThemeDocument;
use crate::document::ThemeInfo;
use crate::format::StyleFormat;
use crate::markup;

#[derive(Debug, thiserror::Error)]
pub enum SchemeError {
    #[error("no style-scheme root element found")]
    MissingRoot,
    #[error("scheme header info has not been provided")]
    MissingInfo,
    #[error("a scheme version is required before serializing")]
    MissingVersion,
    #[error("malformed scheme XML: {source}")]
    Xml {
        #[from]
        source: quick_xml::Error,
    },
    #[error("malformed scheme attribute: {source}")]
    Attr {
        #[from]
        source: AttrError,
    },
    #[error("failed to read scheme file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write scheme file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialize scheme XML: {source}")]
    Serialize {
        #[from]
        source: std::io::Error,
    },
}

/// Parses a scheme file from disk. `titles` maps language scheme ids to the
/// display titles shown on editing surfaces; ids without a mapping fall back
/// to the id itself.
pub fn parse_scheme_file(
    path: &Path,
    titles: &BTreeMap<String, String>,
) -> Result<ThemeDocument, SchemeError> {
    let source = fs::read_to_string(path).map_err(|source| SchemeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_scheme_str(&source, titles)
}

/// Parses scheme XML into a document. Style names containing `:` are routed
/// to the language group named by the prefix; everything else lands in the
/// globals group. Unknown elements and attributes are ignored.
pub fn parse_scheme_str(
    source: &str,
    titles: &BTreeMap<String, String>,
) -> Result<ThemeDocument, SchemeError> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);

    let mut doc = ThemeDocument::new();
    // The globals group is always part of a parsed document, even when the
    // file styles nothing global.
    doc.ensure_globals();
    let mut saw_root = false;
    let mut text_target = TextTarget::None;

    loop {
        match reader.read_event()? {
            Event::Start(element) | Event::Empty(element) => {
                match element.name().as_ref() {
                    b"style-scheme" => {
                        saw_root = true;
                        read_header(&element, &mut doc.info)?;
                    }
                    b"author" => text_target = TextTarget::Author,
                    b"_description" | b"description" => text_target = TextTarget::Description,
                    b"style" => read_style(&element, titles, &mut doc)?,
                    _ => {}
                }
            }
            Event::Text(text) => {
                let value = text.unescape()?;
                match text_target {
                    TextTarget::Author => doc.info.author = value.into_owned(),
                    TextTarget::Description => doc.info.description = value.into_owned(),
                    TextTarget::None => {}
                }
            }
            Event::End(_) => text_target = TextTarget::None,
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(SchemeError::MissingRoot);
    }
    Ok(doc)
}

enum TextTarget {
    None,
    Author,
    Description,
}

fn read_header(element: &BytesStart<'_>, info: &mut ThemeInfo) -> Result<(), SchemeError> {
    for attr in element.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?;
        match attr.key.as_ref() {
            b"id" => info.id = value.into_owned(),
            b"_name" | b"name" => info.name = value.into_owned(),
            b"version" => info.version = value.into_owned(),
            _ => {}
        }
    }
    Ok(())
}

fn read_style(
    element: &BytesStart<'_>,
    titles: &BTreeMap<String, String>,
    doc: &mut ThemeDocument,
) -> Result<(), SchemeError> {
    let mut name = None;
    let mut format = StyleFormat::default();
    for attr in element.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?;
        match attr.key.as_ref() {
            b"name" => name = Some(value.into_owned()),
            b"foreground" => format.foreground = Some(value.into_owned()),
            b"background" => format.background = Some(value.into_owned()),
            b"bold" => format.bold = Some(parse_bool(&value)),
            b"italic" => format.italic = Some(parse_bool(&value)),
            b"underline" => format.underline = Some(parse_bool(&value)),
            b"strikethrough" => format.strikethrough = Some(parse_bool(&value)),
            _ => {}
        }
    }

    let Some(name) = name else {
        // A style element without a name has nothing to attach to.
        tracing::warn!("ignoring style element without a name attribute");
        return Ok(());
    };

    match name.split_once(':') {
        Some((scheme_id, _)) => {
            let scheme_id = scheme_id.to_string();
            let title = titles
                .get(&scheme_id)
                .cloned()
                .unwrap_or_else(|| scheme_id.clone());
            doc.add_group(scheme_id.clone(), title, &[]);
            doc.add_style(scheme_id, name, format);
        }
        None => doc.add_global(name, format),
    }
    Ok(())
}

// Any value other than a case-insensitive "true" reads as false, matching how
// permissive scheme consumers treat these attributes.
fn parse_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

fn bool_attr(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Builds scheme XML from header info plus the styled entries of a document.
/// Entries whose format is entirely unset are not persisted.
#[derive(Default)]
pub struct SchemeSerializer {
    info: Option<ThemeInfo>,
    styles: Vec<(String, StyleFormat)>,
}

impl SchemeSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the header metadata. A version is mandatory; everything else
    /// may be empty and is then left out of the output.
    pub fn add_info(&mut self, info: &ThemeInfo) -> Result<(), SchemeError> {
        if info.version.is_empty() {
            return Err(SchemeError::MissingVersion);
        }
        self.info = Some(info.clone());
        Ok(())
    }

    /// Collects every styled entry of `doc`, group by group in document
    /// order. Entry names are reduced to their canonical plain form in case
    /// a caller hands over rendered labels.
    pub fn add_styles(&mut self, doc: &ThemeDocument) {
        for (_, group) in doc.groups() {
            for (name, format) in group.entries() {
                if format.is_unset() {
                    continue;
                }
                let plain = markup::plain_text(name).into_owned();
                self.styles.push((plain, format.clone()));
            }
        }
    }

    pub fn to_xml(&self) -> Result<String, SchemeError> {
        let info = self.info.as_ref().ok_or(SchemeError::MissingInfo)?;
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("style-scheme");
        root.push_attribute(("id", info.id.as_str()));
        root.push_attribute(("_name", info.name.as_str()));
        root.push_attribute(("version", info.version.as_str()));
        writer.write_event(Event::Start(root))?;

        if !info.author.is_empty() {
            write_text_element(&mut writer, "author", &info.author)?;
        }
        if !info.description.is_empty() {
            write_text_element(&mut writer, "_description", &info.description)?;
        }

        for (name, format) in &self.styles {
            let mut element = BytesStart::new("style");
            element.push_attribute(("name", name.as_str()));
            if let Some(foreground) = &format.foreground {
                element.push_attribute(("foreground", foreground.as_str()));
            }
            if let Some(background) = &format.background {
                element.push_attribute(("background", background.as_str()));
            }
            if let Some(bold) = format.bold {
                element.push_attribute(("bold", bool_attr(bold)));
            }
            if let Some(italic) = format.italic {
                element.push_attribute(("italic", bool_attr(italic)));
            }
            if let Some(underline) = format.underline {
                element.push_attribute(("underline", bool_attr(underline)));
            }
            if let Some(strikethrough) = format.strikethrough {
                element.push_attribute(("strikethrough", bool_attr(strikethrough)));
            }
            writer.write_event(Event::Empty(element))?;
        }

        writer.write_event(Event::End(BytesEnd::new("style-scheme")))?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }

    pub fn save_file(&self, path: &Path) -> Result<(), SchemeError> {
        let xml = self.to_xml()?;
        fs::write(path, xml).map_err(|source| SchemeError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    tag: &str,
    text: &str,
) -> Result<(), SchemeError> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
