//! Open format maps and the CSS property families the converters understand.
//!
//! A `Format` is keyed by CSS property name. The set of recognised keys is
//! described by [`FormatFamily`], but the map itself stays open so hosts can
//! carry properties the converters do not know about.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use weaver_content_dom::style::expand_box_shorthand;

/// `data-*` values of a node, keyed in camelCase.
pub type Dataset = BTreeMap<SmolStr, String>;

/// Ordered, open map of style properties.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Format(BTreeMap<SmolStr, String>);

impl Format {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(SmolStr::new(key), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy every entry of `other` over this map.
    pub fn merge(&mut self, other: &Format) {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
    }

    /// Entries of `self` whose value differs from `base`.
    pub fn difference(&self, base: &Format) -> Format {
        self.iter()
            .filter(|(key, value)| base.get(key) != Some(value))
            .collect()
    }

    /// Keep only the keys a family recognises.
    pub fn retain_family(&mut self, family: FormatFamily) {
        self.0
            .retain(|key, value| family.accepts(key.as_str(), value.as_str()));
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Format {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut format = Format::new();
        for (key, value) in iter {
            format.set(key.as_ref(), value);
        }
        format
    }
}

const SEGMENT_PROPERTIES: &[&str] = &[
    "font-family",
    "font-size",
    "color",
    "background-color",
    "font-weight",
    "font-style",
    "text-decoration",
    "vertical-align",
    "letter-spacing",
];

const BLOCK_PROPERTIES: &[&str] = &[
    "direction",
    "text-align",
    "line-height",
    "white-space",
    "text-indent",
    "background-color",
    "margin-top",
    "margin-right",
    "margin-bottom",
    "margin-left",
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
];

const TABLE_EXTRA_PROPERTIES: &[&str] = &[
    "border-top",
    "border-right",
    "border-bottom",
    "border-left",
    "border-collapse",
    "vertical-align",
    "width",
    "height",
];

const IMAGE_PROPERTIES: &[&str] = &["width", "height", "max-width"];

/// The groups of style properties each kind of model node understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatFamily {
    /// Character formatting on text, images, breaks and list markers.
    Segment,
    /// Paragraphs, list items and format containers.
    Block,
    /// Tables, rows and cells.
    Table,
    /// Image sizing (on top of segment formatting).
    Image,
}

impl FormatFamily {
    pub fn accepts(self, name: &str, value: &str) -> bool {
        match self {
            FormatFamily::Segment => {
                SEGMENT_PROPERTIES.contains(&name)
                    && (name != "vertical-align" || matches!(value, "sub" | "super"))
            }
            FormatFamily::Block => BLOCK_PROPERTIES.contains(&name),
            FormatFamily::Table => {
                BLOCK_PROPERTIES.contains(&name) || TABLE_EXTRA_PROPERTIES.contains(&name)
            }
            FormatFamily::Image => IMAGE_PROPERTIES.contains(&name),
        }
    }
}

/// Merge style declarations into `format`, keeping the keys `family` accepts.
///
/// Box shorthands are expanded first, and `text-decoration` is reduced to the
/// `underline` / `line-through` tokens the model tracks.
pub fn parse_declarations(
    declarations: &[(SmolStr, String)],
    family: FormatFamily,
    format: &mut Format,
) {
    for (name, value) in declarations {
        match name.as_str() {
            "margin" | "padding" | "border" => {
                let sides = if name == "border" {
                    Some([value.clone(), value.clone(), value.clone(), value.clone()])
                } else {
                    expand_box_shorthand(value)
                };
                let Some(sides) = sides else {
                    continue;
                };
                for (side, side_value) in ["top", "right", "bottom", "left"].iter().zip(sides) {
                    let key = format!("{name}-{side}");
                    if family.accepts(&key, &side_value) {
                        format.set(&key, side_value);
                    }
                }
            }
            "text-decoration" | "text-decoration-line" => {
                if family.accepts("text-decoration", value) {
                    format.remove("text-decoration");
                    for token in value.split_ascii_whitespace() {
                        if matches!(token, "underline" | "line-through") {
                            add_text_decoration(format, token);
                        }
                    }
                }
            }
            _ => {
                if family.accepts(name, value) {
                    format.set(name, value.clone());
                }
            }
        }
    }
}

/// Add one decoration token, keeping `underline` before `line-through`.
pub fn add_text_decoration(format: &mut Format, token: &str) {
    let mut underline = has_text_decoration(format, "underline");
    let mut line_through = has_text_decoration(format, "line-through");
    match token {
        "underline" => underline = true,
        "line-through" => line_through = true,
        _ => return,
    }
    let value = match (underline, line_through) {
        (true, true) => "underline line-through",
        (true, false) => "underline",
        (false, true) => "line-through",
        (false, false) => return,
    };
    format.set("text-decoration", value);
}

pub fn has_text_decoration(format: &Format, token: &str) -> bool {
    format
        .get("text-decoration")
        .is_some_and(|v| v.split_ascii_whitespace().any(|t| t == token))
}

/// Segment format implied by an element's tag before any inline style.
pub fn implicit_segment_format(tag: &str) -> Format {
    let mut format = Format::new();
    match tag {
        "b" | "strong" => format.set("font-weight", "bold"),
        "i" | "em" => format.set("font-style", "italic"),
        "u" => format.set("text-decoration", "underline"),
        "s" | "strike" | "del" => format.set("text-decoration", "line-through"),
        "sub" => format.set("vertical-align", "sub"),
        "sup" => format.set("vertical-align", "super"),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            format.set("font-weight", "bold");
            let size = match tag {
                "h1" => Some("2em"),
                "h2" => Some("1.5em"),
                "h3" => Some("1.17em"),
                "h5" => Some("0.83em"),
                "h6" => Some("0.67em"),
                _ => None,
            };
            if let Some(size) = size {
                format.set("font-size", size);
            }
        }
        _ => {}
    }
    format
}

/// Merge an implicit tag format into the running segment format.
/// Decorations accumulate instead of replacing each other.
pub fn merge_implicit_segment_format(format: &mut Format, implicit: &Format) {
    for (key, value) in implicit.iter() {
        if key == "text-decoration" {
            for token in value.split_ascii_whitespace() {
                add_text_decoration(format, token);
            }
        } else {
            format.set(key, value);
        }
    }
}

/// Whether a block format asks for whitespace to be kept verbatim.
pub fn preserves_white_space(format: &Format) -> bool {
    format
        .get("white-space")
        .is_some_and(|v| v.starts_with("pre") || v == "break-spaces")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decls(pairs: &[(&str, &str)]) -> Vec<(SmolStr, String)> {
        pairs
            .iter()
            .map(|(k, v)| (SmolStr::new(k), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_declarations_filters_by_family() {
        let mut format = Format::new();
        parse_declarations(
            &decls(&[
                ("color", "red"),
                ("text-align", "center"),
                ("vertical-align", "middle"),
                ("display", "flex"),
            ]),
            FormatFamily::Segment,
            &mut format,
        );
        assert_eq!(format, Format::new().with("color", "red"));

        let mut block = Format::new();
        parse_declarations(
            &decls(&[("margin", "0 0 0 40px"), ("color", "red")]),
            FormatFamily::Block,
            &mut block,
        );
        assert_eq!(block.get("margin-left"), Some("40px"));
        assert_eq!(block.get("margin-top"), Some("0"));
        assert!(!block.contains("color"));
    }

    #[test]
    fn test_text_decoration_tokens() {
        let mut format = Format::new();
        parse_declarations(
            &decls(&[("text-decoration", "line-through overline")]),
            FormatFamily::Segment,
            &mut format,
        );
        assert_eq!(format.get("text-decoration"), Some("line-through"));

        add_text_decoration(&mut format, "underline");
        assert_eq!(format.get("text-decoration"), Some("underline line-through"));
        assert!(has_text_decoration(&format, "underline"));
    }

    #[test]
    fn test_implicit_formats_merge() {
        let mut format = implicit_segment_format("u");
        merge_implicit_segment_format(&mut format, &implicit_segment_format("s"));
        merge_implicit_segment_format(&mut format, &implicit_segment_format("h1"));
        assert_eq!(format.get("text-decoration"), Some("underline line-through"));
        assert_eq!(format.get("font-weight"), Some("bold"));
        assert_eq!(format.get("font-size"), Some("2em"));
    }

    #[test]
    fn test_difference() {
        let a = Format::new().with("color", "red").with("font-weight", "bold");
        let b = Format::new().with("font-weight", "bold");
        assert_eq!(a.difference(&b), Format::new().with("color", "red"));
    }
}
