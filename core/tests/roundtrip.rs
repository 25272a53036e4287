#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use themer_core::GroupKey;
use themer_core::SchemeSerializer;
use themer_core::StyleFormat;
use themer_core::ThemeDocument;
use themer_core::ThemeInfo;
use themer_core::parse_scheme_str;

fn sample_document() -> ThemeDocument {
    let mut doc = ThemeDocument::new();
    let mut globals = BTreeMap::new();
    globals.insert(
        "text".to_string(),
        StyleFormat {
            foreground: Some("#d4d4d4".to_string()),
            background: Some("#1e1e1e".to_string()),
            ..Default::default()
        },
    );
    doc.init_globals(&globals);
    doc.add_style(
        "python",
        "python:keyword",
        StyleFormat {
            foreground: Some("#00A72F".to_string()),
            bold: Some(true),
            ..Default::default()
        },
    );
    doc.add_style(
        "python",
        "python:comment",
        StyleFormat {
            italic: Some(true),
            bold: Some(false),
            ..Default::default()
        },
    );
    doc.add_style(
        "c",
        "c:string",
        StyleFormat {
            foreground: Some("#ce9178".to_string()),
            underline: Some(true),
            strikethrough: Some(false),
            ..Default::default()
        },
    );
    doc.info = ThemeInfo {
        id: "midnight".to_string(),
        name: "Midnight".to_string(),
        author: "Ada L.".to_string(),
        version: "1.0".to_string(),
        description: "A dark test scheme".to_string(),
    };
    doc
}

fn serialize(doc: &ThemeDocument) -> String {
    let mut serializer = SchemeSerializer::new();
    serializer.add_info(&doc.info).unwrap();
    serializer.add_styles(doc);
    serializer.to_xml().unwrap()
}

#[test]
fn styled_entries_survive_a_serialize_parse_cycle() {
    let doc = sample_document();
    let mut titles = BTreeMap::new();
    titles.insert("python".to_string(), "Python".to_string());
    titles.insert("c".to_string(), "C".to_string());

    let parsed = parse_scheme_str(&serialize(&doc), &titles).unwrap();

    assert_eq!(parsed.info, doc.info);

    // Every styled entry comes back with an identical format. Unset entries
    // (the remaining global schemes) are not persisted, so the parsed groups
    // contain exactly the styled subset.
    for (key, group) in doc.groups() {
        let styled: Vec<(&str, &StyleFormat)> = group
            .entries()
            .filter(|(_, format)| !format.is_unset())
            .collect();
        if styled.is_empty() {
            continue;
        }
        let parsed_group = parsed.group(key).unwrap();
        let parsed_entries: Vec<(&str, &StyleFormat)> = parsed_group.entries().collect();
        assert_eq!(parsed_entries, styled);
    }

    assert_eq!(
        parsed.group(&GroupKey::language("python")).unwrap().title,
        "Python"
    );
}

#[test]
fn second_cycle_is_a_fixed_point() {
    let doc = sample_document();
    let titles = BTreeMap::new();

    let first = parse_scheme_str(&serialize(&doc), &titles).unwrap();
    let second = parse_scheme_str(&serialize(&first), &titles).unwrap();
    assert_eq!(second, first);
}
