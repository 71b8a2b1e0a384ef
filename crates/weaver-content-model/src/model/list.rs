use serde::Serialize;

use super::block::ContentModelBlock;
use super::group::{BlockGroupType, ContentModelBlockGroup};
use super::segment::ContentModelSelectionMarker;
use crate::format::{Dataset, Format};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ListType {
    #[serde(rename = "OL")]
    Ordered,
    #[serde(rename = "UL")]
    Unordered,
}

impl ListType {
    pub fn tag(self) -> &'static str {
        match self {
            ListType::Ordered => "ol",
            ListType::Unordered => "ul",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ol" => Some(ListType::Ordered),
            "ul" => Some(ListType::Unordered),
            _ => None,
        }
    }
}

/// One `<ol>`/`<ul>` an item is nested in.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContentModelListLevel {
    pub list_type: ListType,
    /// Style of the list element itself, including `list-style-type`.
    pub format: Format,
    /// Set when numbering restarts here instead of continuing the thread.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_number_override: Option<u32>,
    pub dataset: Dataset,
}

impl ContentModelListLevel {
    pub fn new(list_type: ListType, format: Format, dataset: Dataset) -> Self {
        Self {
            list_type,
            format,
            start_number_override: None,
            dataset,
        }
    }
}

/// A single `<li>`. Nested lists are flattened: depth lives in `levels`,
/// ordered outermost first.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContentModelListItem {
    pub blocks: Vec<ContentModelBlock>,
    pub levels: Vec<ContentModelListLevel>,
    /// Carries the segment format of the list marker.
    pub format_holder: ContentModelSelectionMarker,
    pub format: Format,
}

impl ContentModelListItem {
    pub fn new(levels: Vec<ContentModelListLevel>, marker_format: Format) -> Self {
        Self {
            blocks: vec![],
            levels,
            format_holder: ContentModelSelectionMarker {
                format: marker_format,
            },
            format: Format::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn last_level(&self) -> Option<&ContentModelListLevel> {
        self.levels.last()
    }
}

impl ContentModelBlockGroup for ContentModelListItem {
    fn block_group_type(&self) -> BlockGroupType {
        BlockGroupType::ListItem
    }

    fn blocks(&self) -> &[ContentModelBlock] {
        &self.blocks
    }

    fn blocks_mut(&mut self) -> &mut Vec<ContentModelBlock> {
        &mut self.blocks
    }
}
