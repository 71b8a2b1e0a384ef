//! Read-only (and a few mutable) walks over a content model.

use crate::model::{
    ContentModelBlock, ContentModelBlockGroup, ContentModelParagraph, ContentModelSegment,
};

/// Visit every block below `blocks` in document order, parents first.
/// Table cells and nested groups are entered.
pub fn for_each_block<'a>(
    blocks: &'a [ContentModelBlock],
    f: &mut dyn FnMut(&'a ContentModelBlock),
) {
    for block in blocks {
        f(block);
        match block {
            ContentModelBlock::Table(table) => {
                for cell in table.rows.iter().flat_map(|row| &row.cells) {
                    for_each_block(&cell.blocks, f);
                }
            }
            _ => {
                if let Some(group) = block.as_block_group() {
                    for_each_block(group.blocks(), f);
                }
            }
        }
    }
}

/// Mutable counterpart of [`for_each_block`].
pub fn for_each_block_mut(
    blocks: &mut [ContentModelBlock],
    f: &mut dyn FnMut(&mut ContentModelBlock),
) {
    for block in blocks {
        f(block);
        match block {
            ContentModelBlock::Table(table) => {
                for cell in table.rows.iter_mut().flat_map(|row| &mut row.cells) {
                    for_each_block_mut(&mut cell.blocks, f);
                }
            }
            _ => {
                if let Some(group) = block.as_block_group_mut() {
                    for_each_block_mut(group.blocks_mut(), f);
                }
            }
        }
    }
}

/// All blocks below `group` matching `predicate`, in document order.
pub fn query_blocks<'a>(
    group: &'a dyn ContentModelBlockGroup,
    predicate: impl Fn(&ContentModelBlock) -> bool,
) -> Vec<&'a ContentModelBlock> {
    let mut found = vec![];
    for_each_block(group.blocks(), &mut |block| {
        if predicate(block) {
            found.push(block);
        }
    });
    found
}

pub fn for_each_paragraph_mut(
    group: &mut dyn ContentModelBlockGroup,
    f: &mut dyn FnMut(&mut ContentModelParagraph),
) {
    for_each_block_mut(group.blocks_mut(), &mut |block| {
        if let ContentModelBlock::Paragraph(paragraph) = block {
            f(paragraph);
        }
    });
}

pub fn get_paragraphs(group: &dyn ContentModelBlockGroup) -> Vec<&ContentModelParagraph> {
    query_blocks(group, |block| block.as_paragraph().is_some())
        .into_iter()
        .filter_map(ContentModelBlock::as_paragraph)
        .collect()
}

/// Selected segments (including selection markers) in document order.
pub fn get_selected_segments(group: &dyn ContentModelBlockGroup) -> Vec<&ContentModelSegment> {
    get_paragraphs(group)
        .into_iter()
        .flat_map(|paragraph| paragraph.segments.iter())
        .filter(|segment| segment.is_selected())
        .collect()
}

/// Paragraphs holding at least one selected segment.
pub fn get_selected_paragraphs(
    group: &dyn ContentModelBlockGroup,
) -> Vec<&ContentModelParagraph> {
    get_paragraphs(group)
        .into_iter()
        .filter(|paragraph| paragraph.segments.iter().any(ContentModelSegment::is_selected))
        .collect()
}

pub fn has_selection_in_block(block: &ContentModelBlock) -> bool {
    match block {
        ContentModelBlock::Paragraph(paragraph) => {
            paragraph.segments.iter().any(has_selection_in_segment)
        }
        ContentModelBlock::Table(table) => table
            .rows
            .iter()
            .flat_map(|row| &row.cells)
            .any(|cell| cell.is_selected || cell.blocks.iter().any(has_selection_in_block)),
        ContentModelBlock::Divider(divider) => divider.is_selected,
        ContentModelBlock::Entity(entity) => entity.is_selected,
        _ => block
            .as_block_group()
            .is_some_and(|group| group.blocks().iter().any(has_selection_in_block)),
    }
}

pub fn has_selection_in_segment(segment: &ContentModelSegment) -> bool {
    match segment {
        ContentModelSegment::General(general) => {
            general.is_selected || general.blocks.iter().any(has_selection_in_block)
        }
        _ => segment.is_selected(),
    }
}

pub fn has_selection_in_block_group(group: &dyn ContentModelBlockGroup) -> bool {
    group.blocks().iter().any(has_selection_in_block)
}

pub fn find_paragraph_by_marker<'a>(
    group: &'a dyn ContentModelBlockGroup,
    marker: &str,
) -> Option<&'a ContentModelParagraph> {
    get_paragraphs(group)
        .into_iter()
        .find(|paragraph| paragraph.marker.get() == Some(marker))
}

pub fn find_paragraph_by_marker_mut<'a>(
    blocks: &'a mut [ContentModelBlock],
    marker: &str,
) -> Option<&'a mut ContentModelParagraph> {
    for block in blocks {
        let found = match block {
            ContentModelBlock::Paragraph(paragraph) => {
                if paragraph.marker.get() == Some(marker) {
                    return Some(paragraph);
                }
                None
            }
            ContentModelBlock::Table(table) => table
                .rows
                .iter_mut()
                .flat_map(|row| &mut row.cells)
                .find_map(|cell| find_paragraph_by_marker_mut(&mut cell.blocks, marker)),
            _ => block
                .as_block_group_mut()
                .and_then(|group| find_paragraph_by_marker_mut(group.blocks_mut(), marker)),
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Format;
    use crate::model::{
        ContentModelDocument, ContentModelFormatContainer, ContentModelTable,
        ContentModelTableCell, ContentModelTableRow,
    };

    fn paragraph(text: &str, selected: bool) -> ContentModelBlock {
        let mut paragraph = ContentModelParagraph::new(false, Format::new());
        let mut segment = ContentModelSegment::text(text, Format::new());
        segment.set_selected(selected);
        paragraph.segments.push(segment);
        ContentModelBlock::Paragraph(paragraph)
    }

    fn sample() -> ContentModelDocument {
        let mut quote = ContentModelFormatContainer::new("blockquote", Format::new());
        quote.blocks.push(paragraph("quoted", true));

        let mut cell = ContentModelTableCell::new(false, false, false, Format::new());
        cell.blocks.push(paragraph("cell", false));
        let mut row = ContentModelTableRow::new(0.0);
        row.cells.push(cell);
        let mut table = ContentModelTable::new(Format::new(), Default::default());
        table.rows.push(row);
        table.widths.push(0.0);

        let mut doc = ContentModelDocument::new();
        doc.blocks.push(paragraph("first", false));
        doc.blocks.push(ContentModelBlock::FormatContainer(quote));
        doc.blocks.push(ContentModelBlock::Table(table));
        doc
    }

    #[test]
    fn test_query_blocks_enters_groups_and_tables() {
        let doc = sample();
        let paragraphs = get_paragraphs(&doc);
        assert_eq!(paragraphs.len(), 3);
        assert_eq!(query_blocks(&doc, |b| b.as_table().is_some()).len(), 1);
    }

    #[test]
    fn test_selection_queries() {
        let doc = sample();
        assert!(has_selection_in_block_group(&doc));
        assert_eq!(get_selected_segments(&doc).len(), 1);
        assert_eq!(get_selected_paragraphs(&doc).len(), 1);
        assert!(!has_selection_in_block(&doc.blocks[0]));
        assert!(has_selection_in_block(&doc.blocks[1]));
    }

    #[test]
    fn test_find_paragraph_by_marker() {
        let mut doc = sample();
        for_each_paragraph_mut(&mut doc, &mut |paragraph| {
            if let Some(ContentModelSegment::Text(text)) = paragraph.segments.first() {
                if text.text == "cell" {
                    paragraph.marker.set(Some("paragraph_t_0".into()));
                }
            }
        });
        assert!(find_paragraph_by_marker(&doc, "paragraph_t_0").is_some());
        let found = find_paragraph_by_marker_mut(&mut doc.blocks, "paragraph_t_0");
        assert!(found.is_some());
        assert!(find_paragraph_by_marker(&doc, "paragraph_t_1").is_none());
    }
}
