use serde::Serialize;

use super::block::ContentModelEntity;
use super::group::{BlockGroupType, ContentModelBlockGroup};
use super::{ContentModelBlock, ForeignElement};
use crate::format::{Dataset, Format};

/// Hyperlink wrapping a segment. `format` holds `href`, `target`, `title`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContentModelLink {
    pub format: Format,
    pub dataset: Dataset,
}

impl ContentModelLink {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            format: Format::new().with("href", href),
            dataset: Dataset::new(),
        }
    }

    pub fn href(&self) -> Option<&str> {
        self.format.get("href")
    }
}

/// Inline code decoration.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContentModelCode {
    pub format: Format,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContentModelText {
    pub text: String,
    pub format: Format,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<ContentModelLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ContentModelCode>,
    pub is_selected: bool,
}

impl ContentModelText {
    pub fn new(text: impl Into<String>, format: Format) -> Self {
        Self {
            text: text.into(),
            format,
            ..Default::default()
        }
    }

    /// Same rendering context: text of two such segments can be joined.
    pub fn can_merge_with(&self, other: &ContentModelText) -> bool {
        self.format == other.format
            && self.link == other.link
            && self.code == other.code
            && self.is_selected == other.is_selected
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContentModelImage {
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub format: Format,
    pub dataset: Dataset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<ContentModelLink>,
    pub is_selected: bool,
    /// Selected as an object rather than as part of a text range.
    pub is_selected_as_image_selection: bool,
}

impl ContentModelImage {
    pub fn new(src: impl Into<String>, format: Format) -> Self {
        Self {
            src: src.into(),
            format,
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContentModelBr {
    pub format: Format,
    pub is_selected: bool,
}

/// Zero-width caret position. Always counts as selected.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContentModelSelectionMarker {
    pub format: Format,
}

/// Inline element the model does not interpret. The element is carried
/// through verbatim; `blocks` holds any content parsed from inside it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContentModelGeneralSegment {
    pub element: ForeignElement,
    pub blocks: Vec<ContentModelBlock>,
    pub format: Format,
    pub is_selected: bool,
}

impl ContentModelGeneralSegment {
    pub fn new(element: ForeignElement, format: Format) -> Self {
        Self {
            element,
            blocks: vec![],
            format,
            is_selected: false,
        }
    }
}

impl ContentModelBlockGroup for ContentModelGeneralSegment {
    fn block_group_type(&self) -> BlockGroupType {
        BlockGroupType::General
    }

    fn blocks(&self) -> &[ContentModelBlock] {
        &self.blocks
    }

    fn blocks_mut(&mut self) -> &mut Vec<ContentModelBlock> {
        &mut self.blocks
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SegmentType {
    Text,
    Image,
    Br,
    SelectionMarker,
    General,
    Entity,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "segmentType")]
pub enum ContentModelSegment {
    Text(ContentModelText),
    Image(ContentModelImage),
    Br(ContentModelBr),
    SelectionMarker(ContentModelSelectionMarker),
    General(ContentModelGeneralSegment),
    Entity(ContentModelEntity),
}

impl ContentModelSegment {
    pub fn text(text: impl Into<String>, format: Format) -> Self {
        Self::Text(ContentModelText::new(text, format))
    }

    pub fn br(format: Format) -> Self {
        Self::Br(ContentModelBr {
            format,
            is_selected: false,
        })
    }

    pub fn selection_marker(format: Format) -> Self {
        Self::SelectionMarker(ContentModelSelectionMarker { format })
    }

    pub fn segment_type(&self) -> SegmentType {
        match self {
            Self::Text(_) => SegmentType::Text,
            Self::Image(_) => SegmentType::Image,
            Self::Br(_) => SegmentType::Br,
            Self::SelectionMarker(_) => SegmentType::SelectionMarker,
            Self::General(_) => SegmentType::General,
            Self::Entity(_) => SegmentType::Entity,
        }
    }

    pub fn is_selected(&self) -> bool {
        match self {
            Self::Text(s) => s.is_selected,
            Self::Image(s) => s.is_selected,
            Self::Br(s) => s.is_selected,
            Self::SelectionMarker(_) => true,
            Self::General(s) => s.is_selected,
            Self::Entity(s) => s.is_selected,
        }
    }

    /// Markers cannot be deselected; the call is ignored for them.
    pub fn set_selected(&mut self, selected: bool) {
        match self {
            Self::Text(s) => s.is_selected = selected,
            Self::Image(s) => s.is_selected = selected,
            Self::Br(s) => s.is_selected = selected,
            Self::SelectionMarker(_) => {}
            Self::General(s) => s.is_selected = selected,
            Self::Entity(s) => s.is_selected = selected,
        }
    }

    pub fn format(&self) -> &Format {
        match self {
            Self::Text(s) => &s.format,
            Self::Image(s) => &s.format,
            Self::Br(s) => &s.format,
            Self::SelectionMarker(s) => &s.format,
            Self::General(s) => &s.format,
            Self::Entity(s) => &s.format,
        }
    }

    pub fn format_mut(&mut self) -> &mut Format {
        match self {
            Self::Text(s) => &mut s.format,
            Self::Image(s) => &mut s.format,
            Self::Br(s) => &mut s.format,
            Self::SelectionMarker(s) => &mut s.format,
            Self::General(s) => &mut s.format,
            Self::Entity(s) => &mut s.format,
        }
    }

    pub fn link(&self) -> Option<&ContentModelLink> {
        match self {
            Self::Text(s) => s.link.as_ref(),
            Self::Image(s) => s.link.as_ref(),
            _ => None,
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, Self::SelectionMarker(_))
    }
}
