//! Inline style and dataset helpers.

use smol_str::SmolStr;

/// Parse a `style` attribute into `(property, value)` pairs.
///
/// Property names are lowercased. Semicolons inside quotes or parentheses
/// do not split declarations, so `list-style-type: "1; "` survives intact.
/// Declarations without a colon or with an empty value are dropped.
pub fn parse_style(style: &str) -> Vec<(SmolStr, String)> {
    split_top_level(style, ';')
        .into_iter()
        .filter_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                None
            } else {
                Some((SmolStr::new(name), value.to_string()))
            }
        })
        .collect()
}

/// Serialize declarations back into a `style` attribute value.
pub fn write_style(declarations: &[(SmolStr, String)]) -> String {
    declarations
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Split on `separator`, ignoring separators nested in quotes or parentheses.
pub fn split_top_level(input: &str, separator: char) -> Vec<&str> {
    let mut parts = vec![];
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (index, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, c) if c == separator && depth == 0 => {
                parts.push(&input[start..index]);
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

/// Expand a CSS box shorthand (`margin`, `padding`) into its four sides,
/// in top, right, bottom, left order.
pub fn expand_box_shorthand(value: &str) -> Option<[String; 4]> {
    let parts: Vec<&str> = split_top_level(value.trim(), ' ')
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect();
    let [top, right, bottom, left] = match parts.as_slice() {
        [all] => [*all; 4],
        [vertical, horizontal] => [*vertical, *horizontal, *vertical, *horizontal],
        [top, horizontal, bottom] => [*top, *horizontal, *bottom, *horizontal],
        [top, right, bottom, left] => [*top, *right, *bottom, *left],
        _ => return None,
    };
    Some([
        top.to_string(),
        right.to_string(),
        bottom.to_string(),
        left.to_string(),
    ])
}

/// Parse a pixel length such as `120px` or `120`. Other units yield `None`.
pub fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Format a pixel length without a trailing `.0` for whole numbers.
pub fn format_px(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}px", value as i64)
    } else {
        format!("{value}px")
    }
}

/// `editing-info` -> `editingInfo`
pub fn data_key_to_camel(key: &str) -> SmolStr {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    SmolStr::new(out)
}

/// `editingInfo` -> `editing-info`
pub fn camel_to_data_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_style_keeps_quoted_semicolons() {
        let parsed = parse_style(r#"color: red; list-style-type: "1; "; ;bogus"#);
        assert_eq!(
            parsed,
            vec![
                (SmolStr::new("color"), "red".to_string()),
                (SmolStr::new("list-style-type"), r#""1; ""#.to_string()),
            ]
        );
    }

    #[test]
    fn test_expand_box_shorthand() {
        assert_eq!(
            expand_box_shorthand("0 0 0 40px"),
            Some([
                "0".to_string(),
                "0".to_string(),
                "0".to_string(),
                "40px".to_string()
            ])
        );
        assert_eq!(
            expand_box_shorthand("4px 8px").map(|sides| sides[3].clone()),
            Some("8px".to_string())
        );
        assert_eq!(expand_box_shorthand("1px 2px 3px 4px 5px"), None);
    }

    #[test]
    fn test_px_helpers() {
        assert_eq!(parse_px("120px"), Some(120.0));
        assert_eq!(parse_px(" 12.5 "), Some(12.5));
        assert_eq!(parse_px("3em"), None);
        assert_eq!(format_px(100.0), "100px");
        assert_eq!(format_px(12.5), "12.5px");
    }

    #[test]
    fn test_data_key_conversion() {
        assert_eq!(data_key_to_camel("editing-info"), "editingInfo");
        assert_eq!(camel_to_data_key("editingInfo"), "editing-info");
    }
}
