//! Pango-markup rendering for editing-surface rows.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::format::StyleFormat;

/// One row of the editing surface: the rendered label plus the raw attribute
/// values the surface binds its editors to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleRow {
    pub name: String,
    pub label_markup: String,
    pub foreground: Option<String>,
    pub foreground_markup: String,
    pub background: Option<String>,
    pub background_markup: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub editable: bool,
}

/// Renders one style entry as a surface row. The label markup previews the
/// format itself; the color cells get swatches rendered over the color with
/// a readable foreground.
pub fn format_row(format: &StyleFormat, label: &str) -> StyleRow {
    StyleRow {
        name: label.to_string(),
        label_markup: label_markup(format, label),
        foreground: format.foreground.clone(),
        foreground_markup: format.foreground.as_deref().map(color_swatch).unwrap_or_default(),
        background: format.background.clone(),
        background_markup: format.background.as_deref().map(color_swatch).unwrap_or_default(),
        bold: format.bold.unwrap_or(false),
        italic: format.italic.unwrap_or(false),
        underline: format.underline.unwrap_or(false),
        strikethrough: format.strikethrough.unwrap_or(false),
        editable: true,
    }
}

/// A non-editable group header row. Only the title is rendered.
pub fn header_row(title: &str) -> StyleRow {
    StyleRow {
        name: title.to_string(),
        label_markup: title.to_string(),
        editable: false,
        ..Default::default()
    }
}

/// Strips span tags from a markup string, returning the plain label. Input
/// without markup is returned as-is.
pub fn plain_text(markup: &str) -> Cow<'_, str> {
    if !markup.contains('<') {
        return Cow::Borrowed(markup);
    }
    let mut plain = String::with_capacity(markup.len());
    let mut in_tag = false;
    for ch in markup.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => plain.push(ch),
            _ => {}
        }
    }
    Cow::Owned(plain)
}

/// Formats an RGB triple as a `#rrggbb` hex color.
pub fn rgb_to_hex(red: u8, green: u8, blue: u8) -> String {
    format!("#{red:02x}{green:02x}{blue:02x}")
}

/// Picks black or white, whichever stays legible over `background`. Colors
/// that do not parse as `#rrggbb` fall back to black.
pub fn readable_on(background: &str) -> &'static str {
    match relative_luminance(background) {
        Some(luminance) if luminance <= 0.6 => "#ffffff",
        _ => "#000000",
    }
}

fn relative_luminance(color: &str) -> Option<f32> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let red = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let green = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let blue = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(
        (0.2126 * f32::from(red) + 0.7152 * f32::from(green) + 0.0722 * f32::from(blue)) / 255.0,
    )
}

fn color_swatch(color: &str) -> String {
    format!(
        "<span background=\"{color}\" foreground=\"{}\">{color}</span>",
        readable_on(color)
    )
}

fn label_markup(format: &StyleFormat, label: &str) -> String {
    let mut markup = String::from("<span");
    if let Some(foreground) = format.foreground.as_deref().filter(|color| !color.is_empty()) {
        let _ = write!(markup, " foreground=\"{foreground}\"");
    }
    if let Some(background) = format.background.as_deref().filter(|color| !color.is_empty()) {
        let _ = write!(markup, " background=\"{background}\"");
    }
    if format.bold == Some(true) {
        markup.push_str(" weight=\"bold\"");
    }
    if format.italic == Some(true) {
        markup.push_str(" style=\"italic\"");
    }
    if format.underline == Some(true) {
        markup.push_str(" underline=\"single\"");
    }
    if format.strikethrough == Some(true) {
        markup.push_str(" strikethrough=\"true\"");
    }
    markup.push('>');
    markup.push_str(label);
    markup.push_str("</span>");
    markup
}
