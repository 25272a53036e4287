use serde::Deserialize;
use serde::Serialize;

/// Visual attributes of a single style or global scheme.
///
/// Every field is optional: `None` means the attribute is unset and the
/// rendered style inherits whatever the consumer falls back to, which is
/// distinct from an explicit `Some(false)` or an empty color.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
}

impl StyleFormat {
    /// True when no attribute has been set. Unset formats are skipped by the
    /// scheme serializer.
    pub fn is_unset(&self) -> bool {
        self.foreground.is_none()
            && self.background.is_none()
            && self.bold.is_none()
            && self.italic.is_none()
            && self.underline.is_none()
            && self.strikethrough.is_none()
    }

    /// Resets every attribute back to unset.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Merges `patch` into this format. Attributes the patch does not carry
    /// keep their previous value.
    pub fn apply(&mut self, patch: &FormatPatch) {
        if let Some(foreground) = &patch.foreground {
            self.foreground = Some(foreground.clone());
        }
        if let Some(background) = &patch.background {
            self.background = Some(background.clone());
        }
        if let Some(bold) = patch.bold {
            self.bold = Some(bold);
        }
        if let Some(italic) = patch.italic {
            self.italic = Some(italic);
        }
        if let Some(underline) = patch.underline {
            self.underline = Some(underline);
        }
        if let Some(strikethrough) = patch.strikethrough {
            self.strikethrough = Some(strikethrough);
        }
    }
}

/// A partial update to a [`StyleFormat`]. `None` fields are left untouched by
/// [`StyleFormat::apply`] and by the catalog update queries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
}

impl FormatPatch {
    pub fn is_empty(&self) -> bool {
        self.foreground.is_none()
            && self.background.is_none()
            && self.bold.is_none()
            && self.italic.is_none()
            && self.underline.is_none()
            && self.strikethrough.is_none()
    }
}
