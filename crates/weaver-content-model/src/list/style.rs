//! Numbering and bullet styles, and rendering of custom marker templates.

use crate::metadata::ListMetadataFormat;
use crate::model::ListType;

/// Ordered list styles as stored in list metadata (1-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NumberingListType {
    Decimal = 1,
    DecimalDash,
    DecimalParenthesis,
    DecimalDoubleParenthesis,
    LowerAlpha,
    LowerAlphaDash,
    LowerAlphaParenthesis,
    LowerAlphaDoubleParenthesis,
    UpperAlpha,
    UpperAlphaDash,
    UpperAlphaParenthesis,
    UpperAlphaDoubleParenthesis,
    LowerRoman,
    LowerRomanDash,
    LowerRomanParenthesis,
    LowerRomanDoubleParenthesis,
    UpperRoman,
    UpperRomanDash,
    UpperRomanParenthesis,
    UpperRomanDoubleParenthesis,
}

impl NumberingListType {
    const ALL: [NumberingListType; 20] = [
        Self::Decimal,
        Self::DecimalDash,
        Self::DecimalParenthesis,
        Self::DecimalDoubleParenthesis,
        Self::LowerAlpha,
        Self::LowerAlphaDash,
        Self::LowerAlphaParenthesis,
        Self::LowerAlphaDoubleParenthesis,
        Self::UpperAlpha,
        Self::UpperAlphaDash,
        Self::UpperAlphaParenthesis,
        Self::UpperAlphaDoubleParenthesis,
        Self::LowerRoman,
        Self::LowerRomanDash,
        Self::LowerRomanParenthesis,
        Self::LowerRomanDoubleParenthesis,
        Self::UpperRoman,
        Self::UpperRomanDash,
        Self::UpperRomanParenthesis,
        Self::UpperRomanDoubleParenthesis,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value).checked_sub(1)?).copied()
    }

    /// CSS `list-style-type` value: a keyword or a quoted template.
    pub fn css_value(self) -> &'static str {
        match self {
            Self::Decimal => "decimal",
            Self::DecimalDash => r#""${Number}- ""#,
            Self::DecimalParenthesis => r#""${Number}) ""#,
            Self::DecimalDoubleParenthesis => r#""(${Number}) ""#,
            Self::LowerAlpha => "lower-alpha",
            Self::LowerAlphaDash => r#""${LowerAlpha}- ""#,
            Self::LowerAlphaParenthesis => r#""${LowerAlpha}) ""#,
            Self::LowerAlphaDoubleParenthesis => r#""(${LowerAlpha}) ""#,
            Self::UpperAlpha => "upper-alpha",
            Self::UpperAlphaDash => r#""${UpperAlpha}- ""#,
            Self::UpperAlphaParenthesis => r#""${UpperAlpha}) ""#,
            Self::UpperAlphaDoubleParenthesis => r#""(${UpperAlpha}) ""#,
            Self::LowerRoman => "lower-roman",
            Self::LowerRomanDash => r#""${LowerRoman}- ""#,
            Self::LowerRomanParenthesis => r#""${LowerRoman}) ""#,
            Self::LowerRomanDoubleParenthesis => r#""(${LowerRoman}) ""#,
            Self::UpperRoman => "upper-roman",
            Self::UpperRomanDash => r#""${UpperRoman}- ""#,
            Self::UpperRomanParenthesis => r#""${UpperRoman}) ""#,
            Self::UpperRomanDoubleParenthesis => r#""(${UpperRoman}) ""#,
        }
    }
}

/// Unordered list styles as stored in list metadata (1-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BulletListType {
    Disc = 1,
    Square,
    Circle,
    Dash,
    LongArrow,
    DoubleLongArrow,
    ShortArrow,
    UnfilledArrow,
    Hyphen,
}

impl BulletListType {
    const ALL: [BulletListType; 9] = [
        Self::Disc,
        Self::Square,
        Self::Circle,
        Self::Dash,
        Self::LongArrow,
        Self::DoubleLongArrow,
        Self::ShortArrow,
        Self::UnfilledArrow,
        Self::Hyphen,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value).checked_sub(1)?).copied()
    }

    pub fn css_value(self) -> &'static str {
        match self {
            Self::Disc => "disc",
            Self::Square => "square",
            Self::Circle => "circle",
            Self::Dash => r#""- ""#,
            Self::LongArrow => r#""➔ ""#,
            Self::DoubleLongArrow => r#""➢ ""#,
            Self::ShortArrow => r#""➤ ""#,
            Self::UnfilledArrow => r#""➪ ""#,
            Self::Hyphen => r#""— ""#,
        }
    }
}

const LEVEL_NUMBERING: [NumberingListType; 3] = [
    NumberingListType::Decimal,
    NumberingListType::LowerAlpha,
    NumberingListType::LowerRoman,
];

const LEVEL_BULLETS: [BulletListType; 3] = [
    BulletListType::Disc,
    BulletListType::Circle,
    BulletListType::Square,
];

/// The `list-style-type` value metadata asks for at a given depth (0-based),
/// or `None` when the metadata leaves the style to the element.
pub fn list_style_from_metadata(
    metadata: &ListMetadataFormat,
    list_type: ListType,
    depth: usize,
) -> Option<&'static str> {
    let from_level = metadata.apply_list_style_from_level.unwrap_or(false);
    match list_type {
        ListType::Ordered => {
            let style = if from_level {
                Some(LEVEL_NUMBERING[depth % LEVEL_NUMBERING.len()])
            } else {
                metadata
                    .ordered_style_type
                    .and_then(NumberingListType::from_u8)
            };
            style.map(NumberingListType::css_value)
        }
        ListType::Unordered => {
            let style = if from_level {
                Some(LEVEL_BULLETS[depth % LEVEL_BULLETS.len()])
            } else {
                metadata
                    .unordered_style_type
                    .and_then(BulletListType::from_u8)
            };
            style.map(BulletListType::css_value)
        }
    }
}

/// A `list-style-type` that must be rendered per item because CSS cannot
/// express it: a quoted literal containing `${...}` tokens.
pub fn is_template_style(style: &str) -> bool {
    style.starts_with('"') && style.contains("${")
}

/// Expand `${Number}`, `${LowerAlpha}`, `${UpperAlpha}`, `${LowerRoman}` and
/// `${UpperRoman}` in `template` for item number `n`. Unknown tokens and
/// surrounding characters are copied through unchanged.
pub fn get_ordered_list_style_value(template: &str, n: u32) -> String {
    let mut out = String::with_capacity(template.len() + 8);
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let token = &after[..end];
        match token {
            "Number" => out.push_str(&n.to_string()),
            "LowerAlpha" => out.push_str(&to_alpha(n)),
            "UpperAlpha" => out.push_str(&to_alpha(n).to_ascii_uppercase()),
            "LowerRoman" => out.push_str(&to_roman(n).to_ascii_lowercase()),
            "UpperRoman" => out.push_str(&to_roman(n)),
            _ => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

/// Bijective base-26: 1 -> a, 26 -> z, 27 -> aa. Zero falls back to decimal.
fn to_alpha(n: u32) -> String {
    if n == 0 {
        return n.to_string();
    }
    let mut letters = vec![];
    let mut n = i64::from(n) - 1;
    while n >= 0 {
        letters.push((b'a' + (n % 26) as u8) as char);
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// Subtractive Roman numerals for `1..=3999`, decimal outside that range.
fn to_roman(n: u32) -> String {
    if !(1..=3999).contains(&n) {
        return n.to_string();
    }
    const NUMERALS: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    let mut n = n;
    for (value, numeral) in NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_tokens() {
        assert_eq!(get_ordered_list_style_value("${LowerAlpha}", 1), "a");
        assert_eq!(get_ordered_list_style_value("${LowerAlpha}", 26), "z");
        assert_eq!(get_ordered_list_style_value("${LowerAlpha}", 27), "aa");
        assert_eq!(get_ordered_list_style_value("${LowerAlpha}", 100), "cv");
        assert_eq!(get_ordered_list_style_value("${UpperAlpha}", 28), "AB");
    }

    #[test]
    fn test_roman_tokens() {
        assert_eq!(get_ordered_list_style_value("${LowerRoman}", 1), "i");
        assert_eq!(get_ordered_list_style_value("${LowerRoman}", 4), "iv");
        assert_eq!(get_ordered_list_style_value("${UpperRoman}", 100), "C");
        assert_eq!(get_ordered_list_style_value("${UpperRoman}", 1994), "MCMXCIV");
        assert_eq!(get_ordered_list_style_value("${UpperRoman}", 10000), "10000");
    }

    #[test]
    fn test_literals_around_tokens() {
        assert_eq!(get_ordered_list_style_value("(${Number}) ", 3), "(3) ");
        assert_eq!(
            get_ordered_list_style_value(r#""${Number}) ""#, 12),
            r#""12) ""#
        );
        assert_eq!(get_ordered_list_style_value("${Bogus}.", 2), "${Bogus}.");
        assert_eq!(get_ordered_list_style_value("${Number", 2), "${Number");
    }

    #[test]
    fn test_style_from_metadata() {
        let metadata = ListMetadataFormat {
            ordered_style_type: Some(NumberingListType::UpperRomanParenthesis as u8),
            unordered_style_type: Some(BulletListType::Dash as u8),
            apply_list_style_from_level: None,
        };
        assert_eq!(
            list_style_from_metadata(&metadata, ListType::Ordered, 0),
            Some(r#""${UpperRoman}) ""#)
        );
        assert_eq!(
            list_style_from_metadata(&metadata, ListType::Unordered, 5),
            Some(r#""- ""#)
        );

        let by_level = ListMetadataFormat {
            apply_list_style_from_level: Some(true),
            ..Default::default()
        };
        assert_eq!(
            list_style_from_metadata(&by_level, ListType::Ordered, 4),
            Some("lower-alpha")
        );
        assert_eq!(
            list_style_from_metadata(&by_level, ListType::Unordered, 2),
            Some("square")
        );
        assert_eq!(
            list_style_from_metadata(&ListMetadataFormat::default(), ListType::Ordered, 0),
            None
        );
    }

    #[test]
    fn test_enum_ranges() {
        assert_eq!(NumberingListType::from_u8(0), None);
        assert_eq!(
            NumberingListType::from_u8(20),
            Some(NumberingListType::UpperRomanDoubleParenthesis)
        );
        assert_eq!(NumberingListType::from_u8(21), None);
        assert_eq!(BulletListType::from_u8(9), Some(BulletListType::Hyphen));
        assert!(!is_template_style(BulletListType::Dash.css_value()));
        assert!(is_template_style(NumberingListType::DecimalDash.css_value()));
        assert_eq!(BulletListType::Square.css_value(), "square");
    }

    #[test]
    fn test_out_of_range_numbers_fall_back_to_decimal() {
        assert_eq!(to_roman(0), "0");
        assert_eq!(to_roman(3999), "MMMCMXCIX");
        assert_eq!(to_roman(4000), "4000");
        assert_eq!(to_roman(u32::MAX), u32::MAX.to_string());
        assert_eq!(to_alpha(0), "0");
        assert_eq!(to_alpha(u32::MAX).len(), 7);
    }
}
