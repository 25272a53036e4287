//! Data model and serialization for GtkSourceView-compatible style scheme
//! documents: a grouped in-memory theme, the XML reader/writer for scheme
//! files, and the Pango-markup row rendering used by editing surfaces.

pub mod document;
pub mod format;
pub mod markup;
pub mod scheme_xml;

pub use document::DocumentError;
pub use document::GLOBAL_SCHEMES;
pub use document::GroupKey;
pub use document::StyleGroup;
pub use document::ThemeDocument;
pub use document::ThemeInfo;
pub use format::FormatPatch;
pub use format::StyleFormat;
pub use markup::StyleRow;
pub use scheme_xml::SchemeError;
pub use scheme_xml::SchemeSerializer;
pub use scheme_xml::parse_scheme_file;
pub use scheme_xml::parse_scheme_str;
