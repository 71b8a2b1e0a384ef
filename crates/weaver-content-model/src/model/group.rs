use serde::Serialize;
use smol_str::SmolStr;

use super::ForeignElement;
use super::block::{ContentModelBlock, ContentModelParagraph};
use crate::format::Format;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum BlockGroupType {
    Document,
    FormatContainer,
    ListItem,
    TableCell,
    General,
}

/// Anything that owns a sequence of blocks.
///
/// The converters and editing helpers walk groups through this trait so a
/// table cell, a list item and the document are handled the same way.
pub trait ContentModelBlockGroup {
    fn block_group_type(&self) -> BlockGroupType;

    fn blocks(&self) -> &[ContentModelBlock];

    fn blocks_mut(&mut self) -> &mut Vec<ContentModelBlock>;

    fn add_block(&mut self, block: ContentModelBlock) {
        self.blocks_mut().push(block);
    }

    /// The trailing paragraph, if the group ends with one.
    fn last_paragraph_mut(&mut self) -> Option<&mut ContentModelParagraph> {
        self.blocks_mut()
            .last_mut()
            .and_then(ContentModelBlock::as_paragraph_mut)
    }
}

/// Root of a content model.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContentModelDocument {
    pub blocks: Vec<ContentModelBlock>,
    /// Default segment format of the editing surface.
    pub format: Format,
}

impl ContentModelDocument {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentModelBlockGroup for ContentModelDocument {
    fn block_group_type(&self) -> BlockGroupType {
        BlockGroupType::Document
    }

    fn blocks(&self) -> &[ContentModelBlock] {
        &self.blocks
    }

    fn blocks_mut(&mut self) -> &mut Vec<ContentModelBlock> {
        &mut self.blocks
    }
}

/// A wrapping element such as `<blockquote>` or `<pre>` that adds format to
/// the blocks it holds.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContentModelFormatContainer {
    pub tag_name: SmolStr,
    pub blocks: Vec<ContentModelBlock>,
    pub format: Format,
}

impl ContentModelFormatContainer {
    pub fn new(tag_name: impl Into<SmolStr>, format: Format) -> Self {
        Self {
            tag_name: tag_name.into(),
            blocks: vec![],
            format,
        }
    }
}

impl ContentModelBlockGroup for ContentModelFormatContainer {
    fn block_group_type(&self) -> BlockGroupType {
        BlockGroupType::FormatContainer
    }

    fn blocks(&self) -> &[ContentModelBlock] {
        &self.blocks
    }

    fn blocks_mut(&mut self) -> &mut Vec<ContentModelBlock> {
        &mut self.blocks
    }
}

/// A block-level element passed through as-is, with its content parsed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContentModelGeneralBlock {
    pub element: ForeignElement,
    pub blocks: Vec<ContentModelBlock>,
    pub format: Format,
}

impl ContentModelGeneralBlock {
    pub fn new(element: ForeignElement) -> Self {
        Self {
            element,
            blocks: vec![],
            format: Format::new(),
        }
    }
}

impl ContentModelBlockGroup for ContentModelGeneralBlock {
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
