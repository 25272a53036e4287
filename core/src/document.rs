use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::format::FormatPatch;
use crate::format::StyleFormat;
use crate::markup;

/// The fixed editor-wide targets a scheme can style. Every document carries a
/// globals group keyed by these names; the set itself is never edited.
pub const GLOBAL_SCHEMES: [&str; 12] = [
    "text",
    "selection",
    "selection-unfocused",
    "cursor",
    "cursor-secondary",
    "current-line",
    "line-numbers",
    "draw-spaces",
    "bracket-match",
    "bracket-mismatch",
    "right-margin",
    "search-match",
];

/// Display title used for the globals group on editing surfaces.
pub const GLOBALS_TITLE: &str = "Global Editor Settings";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("language `{0}` is not present in the document")]
    UndefinedLanguage(String),
    #[error("style `{style}` is not present in group `{group}`")]
    UndefinedStyle { group: String, style: String },
    #[error("global scheme entries are fixed and cannot be removed")]
    GlobalsEntryImmutable,
}

/// Identity of a style group. The globals group is a singleton; language
/// groups are keyed by the language's scheme id, never by its display title.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKey {
    Globals,
    Language(String),
}

impl GroupKey {
    pub fn language(scheme_id: impl Into<String>) -> Self {
        Self::Language(scheme_id.into())
    }

    fn describe(&self) -> String {
        match self {
            Self::Globals => "globals".to_string(),
            Self::Language(scheme_id) => scheme_id.clone(),
        }
    }
}

/// Header metadata of a scheme document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThemeInfo {
    pub id: String,
    pub name: String,
    pub author: String,
    pub version: String,
    pub description: String,
}

/// One group of styled entries: the globals group or one language's styles.
/// Entries are keyed by their canonical plain name and keep insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleGroup {
    pub title: String,
    entries: IndexMap<String, StyleFormat>,
}

impl StyleGroup {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: IndexMap::new(),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &StyleFormat)> {
        self.entries.iter().map(|(name, format)| (name.as_str(), format))
    }

    pub fn get(&self, name: &str) -> Option<&StyleFormat> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An in-memory scheme document: header info plus ordered style groups. The
/// globals group, when present, always sits first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThemeDocument {
    pub info: ThemeInfo,
    groups: IndexMap<GroupKey, StyleGroup>,
}

impl ThemeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> impl Iterator<Item = (&GroupKey, &StyleGroup)> {
        self.groups.iter()
    }

    pub fn group(&self, key: &GroupKey) -> Option<&StyleGroup> {
        self.groups.get(key)
    }

    /// (Re)builds the globals group from the fixed scheme names, in sorted
    /// order. Names present in `defaults` start with the supplied format;
    /// everything else starts unset. Any previous globals entries are
    /// discarded.
    pub fn init_globals(&mut self, defaults: &BTreeMap<String, StyleFormat>) {
        let group = self.globals_group_mut();
        group.entries.clear();
        let mut names = GLOBAL_SCHEMES.to_vec();
        names.sort_unstable();
        for name in names {
            let format = defaults.get(name).cloned().unwrap_or_default();
            group.entries.insert(name.to_string(), format);
        }
    }

    /// Creates the globals group, with no entries, if it does not exist yet.
    /// A document always carries the group even when nothing global is
    /// styled.
    pub fn ensure_globals(&mut self) {
        self.globals_group_mut();
    }

    /// Inserts a single entry into the globals group, creating the group if
    /// needed. Existing entries keep their format.
    pub fn add_global(&mut self, name: impl Into<String>, format: StyleFormat) {
        self.globals_group_mut().entries.entry(name.into()).or_insert(format);
    }

    /// Adds a language group with unset entries for each of `style_names`.
    /// Idempotent for names already present; an existing group keeps its
    /// styled entries and only gains the missing names.
    pub fn add_group(
        &mut self,
        scheme_id: impl Into<String>,
        title: impl Into<String>,
        style_names: &[String],
    ) {
        let group = self
            .groups
            .entry(GroupKey::Language(scheme_id.into()))
            .or_insert_with(|| StyleGroup::new(title));
        for name in style_names {
            group.entries.entry(name.clone()).or_default();
        }
    }

    /// Inserts or replaces one styled entry in a language group, creating the
    /// group (titled by its scheme id) when it does not exist yet.
    pub fn add_style(
        &mut self,
        scheme_id: impl Into<String>,
        style_name: impl Into<String>,
        format: StyleFormat,
    ) {
        let scheme_id = scheme_id.into();
        let group = self
            .groups
            .entry(GroupKey::Language(scheme_id.clone()))
            .or_insert_with(|| StyleGroup::new(scheme_id));
        group.entries.insert(style_name.into(), format);
    }

    /// Merges a patch into one entry's format.
    pub fn update_style(
        &mut self,
        key: &GroupKey,
        name: &str,
        patch: &FormatPatch,
    ) -> Result<(), DocumentError> {
        self.entry_mut(key, name)?.apply(patch);
        Ok(())
    }

    /// Removes a whole language group and every entry in it.
    pub fn delete_language(&mut self, scheme_id: &str) -> Result<(), DocumentError> {
        let key = GroupKey::Language(scheme_id.to_string());
        self.groups
            .shift_remove(&key)
            .map(|_| ())
            .ok_or_else(|| DocumentError::UndefinedLanguage(scheme_id.to_string()))
    }

    /// Removes one entry from a language group. Globals entries are part of
    /// the fixed scheme set and cannot be removed, only cleared.
    pub fn delete_style(&mut self, key: &GroupKey, name: &str) -> Result<(), DocumentError> {
        if matches!(key, GroupKey::Globals) {
            return Err(DocumentError::GlobalsEntryImmutable);
        }
        let group = self
            .groups
            .get_mut(key)
            .ok_or_else(|| DocumentError::UndefinedLanguage(key.describe()))?;
        group
            .entries
            .shift_remove(name)
            .map(|_| ())
            .ok_or_else(|| DocumentError::UndefinedStyle {
                group: key.describe(),
                style: name.to_string(),
            })
    }

    /// Resets one entry's format to unset. The entry itself stays.
    pub fn clear_style(&mut self, key: &GroupKey, name: &str) -> Result<(), DocumentError> {
        self.entry_mut(key, name)?.clear();
        Ok(())
    }

    /// Resets every entry in a group to unset. Entries stay, in order.
    pub fn clear_all_styles(&mut self, key: &GroupKey) -> Result<(), DocumentError> {
        let group = self
            .groups
            .get_mut(key)
            .ok_or_else(|| DocumentError::UndefinedLanguage(key.describe()))?;
        for format in group.entries.values_mut() {
            format.clear();
        }
        Ok(())
    }

    /// Duplicate check for editing surfaces: `candidate` may carry Pango
    /// markup, which is stripped before comparing against the group's
    /// canonical plain names. A missing group reports false.
    pub fn in_group(&self, key: &GroupKey, candidate: &str) -> bool {
        let plain = markup::plain_text(candidate);
        self.groups
            .get(key)
            .is_some_and(|group| group.contains(plain.as_ref()))
    }

    fn globals_group_mut(&mut self) -> &mut StyleGroup {
        if !self.groups.contains_key(&GroupKey::Globals) {
            // The globals group always renders first on editing surfaces.
            self.groups
                .shift_insert(0, GroupKey::Globals, StyleGroup::new(GLOBALS_TITLE));
        }
        self.groups
            .get_mut(&GroupKey::Globals)
            .unwrap_or_else(|| unreachable!("globals group inserted above"))
    }

    fn entry_mut(
        &mut self,
        key: &GroupKey,
        name: &str,
    ) -> Result<&mut StyleFormat, DocumentError> {
        let group = self
            .groups
            .get_mut(key)
            .ok_or_else(|| DocumentError::UndefinedLanguage(key.describe()))?;
        group
            .entries
            .get_mut(name)
            .ok_or_else(|| DocumentError::UndefinedStyle {
                group: key.describe(),
                style: name.to_string(),
            })
    }
}
