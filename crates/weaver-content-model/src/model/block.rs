use serde::Serialize;
use smol_str::SmolStr;

use super::group::{ContentModelBlockGroup, ContentModelFormatContainer, ContentModelGeneralBlock};
use super::list::ContentModelListItem;
use super::segment::ContentModelSegment;
use super::table::ContentModelTable;
use super::{CachedElement, ForeignElement, ParagraphMarker};
use crate::format::Format;

/// Heading or `<p>` tag wrapping a paragraph.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContentModelParagraphDecorator {
    pub tag_name: SmolStr,
    pub format: Format,
}

impl ContentModelParagraphDecorator {
    pub fn new(tag_name: impl Into<SmolStr>) -> Self {
        Self {
            tag_name: tag_name.into(),
            format: Format::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContentModelParagraph {
    pub segments: Vec<ContentModelSegment>,
    pub format: Format,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decorator: Option<ContentModelParagraphDecorator>,
    /// No element of its own in the DOM. One is only created on output
    /// when the paragraph needs somewhere to hang its format.
    pub is_implicit: bool,
    #[serde(skip)]
    pub cached_element: CachedElement,
    #[serde(skip_serializing_if = "ParagraphMarker::is_unset")]
    pub marker: ParagraphMarker,
}

impl ContentModelParagraph {
    pub fn new(is_implicit: bool, format: Format) -> Self {
        Self {
            is_implicit,
            format,
            ..Default::default()
        }
    }

    pub fn with_decorator(mut self, decorator: ContentModelParagraphDecorator) -> Self {
        self.decorator = Some(decorator);
        self
    }

    /// Append a segment, folding it into the trailing text run when the
    /// rendering context matches. Selection markers next to already
    /// selected content are redundant and dropped.
    pub fn add_segment(&mut self, segment: ContentModelSegment) {
        if segment.is_marker() {
            if !self
                .segments
                .last()
                .is_some_and(ContentModelSegment::is_selected)
            {
                self.segments.push(segment);
            }
            return;
        }

        if segment.is_selected()
            && self
                .segments
                .last()
                .is_some_and(ContentModelSegment::is_marker)
        {
            self.segments.pop();
        }

        if let ContentModelSegment::Text(text) = &segment {
            if let Some(ContentModelSegment::Text(last)) = self.segments.last_mut() {
                if last.can_merge_with(text) {
                    last.text.push_str(&text.text);
                    return;
                }
            }
        }
        self.segments.push(segment);
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Horizontal rule or similar separator.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContentModelDivider {
    pub tag_name: SmolStr,
    pub format: Format,
    pub is_selected: bool,
    #[serde(skip)]
    pub cached_element: CachedElement,
}

impl ContentModelDivider {
    pub fn new(tag_name: impl Into<SmolStr>, format: Format) -> Self {
        Self {
            tag_name: tag_name.into(),
            format,
            is_selected: false,
            cached_element: CachedElement::default(),
        }
    }
}

/// Identity of an entity as encoded in its wrapper's class list.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EntityFormat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<SmolStr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<SmolStr>,
    pub is_readonly: bool,
    /// Foreign content frozen by the converter rather than a host entity.
    pub is_fake_entity: bool,
}

/// Island of content the engine does not manage, referenced by wrapper.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContentModelEntity {
    pub wrapper: ForeignElement,
    pub entity_format: EntityFormat,
    pub format: Format,
    pub is_selected: bool,
}

impl ContentModelEntity {
    pub fn new(wrapper: ForeignElement, entity_format: EntityFormat, format: Format) -> Self {
        Self {
            wrapper,
            entity_format,
            format,
            is_selected: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "blockType")]
pub enum ContentModelBlock {
    Paragraph(ContentModelParagraph),
    Table(ContentModelTable),
    Divider(ContentModelDivider),
    Entity(ContentModelEntity),
    FormatContainer(ContentModelFormatContainer),
    ListItem(ContentModelListItem),
    General(ContentModelGeneralBlock),
}

impl ContentModelBlock {
    pub fn format(&self) -> &Format {
        match self {
            Self::Paragraph(b) => &b.format,
            Self::Table(b) => &b.format,
            Self::Divider(b) => &b.format,
            Self::Entity(b) => &b.format,
            Self::FormatContainer(b) => &b.format,
            Self::ListItem(b) => &b.format,
            Self::General(b) => &b.format,
        }
    }

    pub fn as_paragraph(&self) -> Option<&ContentModelParagraph> {
        match self {
            Self::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_paragraph_mut(&mut self) -> Option<&mut ContentModelParagraph> {
        match self {
            Self::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_list_item(&self) -> Option<&ContentModelListItem> {
        match self {
            Self::ListItem(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&ContentModelTable> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut ContentModelTable> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    /// The block viewed as a group, for the variants that hold blocks.
    pub fn as_block_group(&self) -> Option<&dyn ContentModelBlockGroup> {
        match self {
            Self::FormatContainer(g) => Some(g),
            Self::ListItem(g) => Some(g),
            Self::General(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_block_group_mut(&mut self) -> Option<&mut dyn ContentModelBlockGroup> {
        match self {
            Self::FormatContainer(g) => Some(g),
            Self::ListItem(g) => Some(g),
            Self::General(g) => Some(g),
            _ => None,
        }
    }

    /// Drop DOM caches on this block and everything below it.
    pub fn clear_cached_elements(&mut self) {
        match self {
            Self::Paragraph(p) => p.cached_element.clear(),
            Self::Divider(d) => d.cached_element.clear(),
            Self::Table(t) => t.clear_cached_elements(),
            Self::Entity(_) => {}
            Self::FormatContainer(_) | Self::ListItem(_) | Self::General(_) => {
                if let Some(group) = self.as_block_group_mut() {
                    for block in group.blocks_mut() {
                        block.clear_cached_elements();
                    }
                }
            }
        }
    }
}
