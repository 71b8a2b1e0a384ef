//! Canonical cleanup of a content model.
//!
//! Both converters rely on this: DOM→model output is normalized, and a
//! normalized model written to the DOM reads back as the same model.

use crate::format::preserves_white_space;
use crate::model::{ContentModelBlock, ContentModelBlockGroup, ContentModelParagraph, ContentModelSegment};

/// Normalize every paragraph below `group`:
///
/// - adjacent text segments with the same format, link, code and selection
///   are merged;
/// - collapsible spaces at line starts, line ends and after another space
///   are trimmed (not inside `pre` or `white-space: pre*` blocks);
/// - empty text is dropped, or turned into a marker when it was selected;
/// - a trailing `<br>` is dropped when it only ends a line of content;
/// - a paragraph holding nothing but markers gets a `<br>` so it keeps
///   its height;
/// - empty paragraphs and format containers are removed, and so are tables
///   without a single cell, which the writer would skip.
pub fn normalize_content_model(group: &mut dyn ContentModelBlockGroup) {
    normalize_blocks(group.blocks_mut(), false, false);
}

/// As [`normalize_content_model`], but empty implicit paragraphs are kept.
/// Reduced passes use them as placeholders for skipped content.
pub fn normalize_content_model_keeping_placeholders(group: &mut dyn ContentModelBlockGroup) {
    normalize_blocks(group.blocks_mut(), false, true);
}

fn normalize_blocks(blocks: &mut Vec<ContentModelBlock>, preserve_white_space: bool, keep_placeholders: bool) {
    for block in blocks.iter_mut() {
        match block {
            ContentModelBlock::Paragraph(paragraph) => {
                normalize_paragraph(paragraph, preserve_white_space, keep_placeholders)
            }
            ContentModelBlock::Table(table) => {
                for cell in table.rows.iter_mut().flat_map(|row| &mut row.cells) {
                    normalize_blocks(&mut cell.blocks, false, keep_placeholders);
                }
            }
            ContentModelBlock::FormatContainer(container) => {
                let preserve = preserve_white_space
                    || container.tag_name == "pre"
                    || preserves_white_space(&container.format);
                normalize_blocks(&mut container.blocks, preserve, keep_placeholders);
            }
            ContentModelBlock::ListItem(item) => {
                normalize_blocks(&mut item.blocks, preserve_white_space, keep_placeholders)
            }
            ContentModelBlock::General(general) => {
                normalize_blocks(&mut general.blocks, preserve_white_space, keep_placeholders)
            }
            ContentModelBlock::Divider(_) | ContentModelBlock::Entity(_) => {}
        }
    }

    blocks.retain(|block| match block {
        ContentModelBlock::Paragraph(p) => {
            !p.segments.is_empty() || (keep_placeholders && p.is_implicit)
        }
        ContentModelBlock::FormatContainer(container) => !container.blocks.is_empty(),
        ContentModelBlock::Table(table) => table.rows.iter().any(|row| !row.cells.is_empty()),
        _ => true,
    });
}

fn normalize_paragraph(paragraph: &mut ContentModelParagraph, preserve_white_space: bool, keep_placeholders: bool) {
    let preserve = preserve_white_space || preserves_white_space(&paragraph.format);

    for segment in &mut paragraph.segments {
        if let ContentModelSegment::General(general) = segment {
            normalize_blocks(&mut general.blocks, preserve, keep_placeholders);
        }
    }

    if !preserve {
        trim_white_space(&mut paragraph.segments);
    }

    let segments = std::mem::take(&mut paragraph.segments);
    for segment in segments {
        match segment {
            ContentModelSegment::Text(text) if text.text.is_empty() => {
                if text.is_selected {
                    paragraph.add_segment(ContentModelSegment::selection_marker(text.format));
                }
            }
            segment => paragraph.add_segment(segment),
        }
    }

    if let Some((ContentModelSegment::Br(_), rest)) = paragraph.segments.split_last() {
        let ends_content = rest
            .iter()
            .rev()
            .find(|segment| !segment.is_marker())
            .is_some_and(|segment| !matches!(segment, ContentModelSegment::Br(_)));
        if ends_content {
            paragraph.segments.pop();
        }
    }

    if !paragraph.is_implicit
        && !paragraph.segments.is_empty()
        && paragraph.segments.iter().all(ContentModelSegment::is_marker)
    {
        let format = paragraph.segments[0].format().clone();
        paragraph.segments.push(ContentModelSegment::br(format));
    }
}

fn is_transparent(segment: &ContentModelSegment) -> bool {
    match segment {
        ContentModelSegment::SelectionMarker(_) => true,
        ContentModelSegment::Text(text) => text.text.is_empty(),
        _ => false,
    }
}

/// Trim collapsible spaces the way a browser hides them.
fn trim_white_space(segments: &mut [ContentModelSegment]) {
    // Line starts and runs continuing a space.
    let mut after_space = true;
    for segment in segments.iter_mut() {
        match segment {
            ContentModelSegment::Text(text) => {
                if after_space {
                    let trimmed = text.text.trim_start_matches(' ');
                    if trimmed.len() != text.text.len() {
                        text.text = trimmed.to_string();
                    }
                }
                if !text.text.is_empty() {
                    after_space = text.text.ends_with(' ');
                }
            }
            ContentModelSegment::Br(_) => after_space = true,
            ContentModelSegment::SelectionMarker(_) => {}
            _ => after_space = false,
        }
    }

    // Line ends, walking backwards so an emptied segment exposes the one
    // before it.
    for index in (0..segments.len()).rev() {
        let at_line_end = segments[index + 1..]
            .iter()
            .find(|segment| !is_transparent(segment))
            .is_none_or(|segment| matches!(segment, ContentModelSegment::Br(_)));
        if !at_line_end {
            continue;
        }
        if let ContentModelSegment::Text(text) = &mut segments[index] {
            let len = text.text.trim_end_matches(' ').len();
            text.text.truncate(len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Format;
    use crate::model::{
        ContentModelDocument, ContentModelTable, ContentModelTableCell, ContentModelTableRow,
        ContentModelText,
    };
    use pretty_assertions::assert_eq;

    fn text(value: &str) -> ContentModelSegment {
        ContentModelSegment::text(value, Format::new())
    }

    fn bold(value: &str) -> ContentModelSegment {
        ContentModelSegment::text(value, Format::new().with("font-weight", "bold"))
    }

    fn doc_with(segments: Vec<ContentModelSegment>, is_implicit: bool) -> ContentModelDocument {
        let mut paragraph = ContentModelParagraph::new(is_implicit, Format::new());
        paragraph.segments = segments;
        let mut doc = ContentModelDocument::new();
        doc.blocks.push(ContentModelBlock::Paragraph(paragraph));
        doc
    }

    fn segments(doc: &ContentModelDocument) -> &[ContentModelSegment] {
        &doc.blocks[0].as_paragraph().unwrap().segments
    }

    #[test]
    fn test_merges_and_trims() {
        let mut doc = doc_with(vec![text(" a "), text(" b"), bold(" c "), text(" ")], false);
        normalize_content_model(&mut doc);
        assert_eq!(segments(&doc), &[text("a b"), bold(" c")]);
    }

    #[test]
    fn test_trailing_br() {
        let mut doc = doc_with(
            vec![text("a"), ContentModelSegment::br(Format::new())],
            false,
        );
        normalize_content_model(&mut doc);
        assert_eq!(segments(&doc), &[text("a")]);

        let two = vec![
            text("a"),
            ContentModelSegment::br(Format::new()),
            ContentModelSegment::br(Format::new()),
        ];
        let mut doc = doc_with(two.clone(), false);
        normalize_content_model(&mut doc);
        assert_eq!(segments(&doc), &two[..]);

        let lone = vec![ContentModelSegment::br(Format::new())];
        let mut doc = doc_with(lone.clone(), false);
        normalize_content_model(&mut doc);
        assert_eq!(segments(&doc), &lone[..]);
    }

    #[test]
    fn test_selected_empty_text_becomes_marker() {
        let mut selected = ContentModelText::new("  ", Format::new());
        selected.is_selected = true;
        let mut doc = doc_with(vec![ContentModelSegment::Text(selected)], true);
        normalize_content_model(&mut doc);
        assert_eq!(
            segments(&doc),
            &[ContentModelSegment::selection_marker(Format::new())]
        );
    }

    #[test]
    fn test_marker_only_paragraph_gets_br() {
        let mut doc = doc_with(vec![ContentModelSegment::selection_marker(Format::new())], false);
        normalize_content_model(&mut doc);
        assert_eq!(
            segments(&doc),
            &[
                ContentModelSegment::selection_marker(Format::new()),
                ContentModelSegment::br(Format::new()),
            ]
        );
    }

    #[test]
    fn test_empty_implicit_paragraphs() {
        let mut doc = doc_with(vec![text("   ")], true);
        let mut kept = doc.clone();
        normalize_content_model(&mut doc);
        assert!(doc.blocks.is_empty());

        normalize_content_model_keeping_placeholders(&mut kept);
        assert_eq!(kept.blocks.len(), 1);

        let mut explicit = doc_with(vec![], false);
        normalize_content_model_keeping_placeholders(&mut explicit);
        assert!(explicit.blocks.is_empty());
    }

    #[test]
    fn test_pre_keeps_spaces() {
        let mut doc = doc_with(vec![text("  a  ")], false);
        if let ContentModelBlock::Paragraph(p) = &mut doc.blocks[0] {
            p.format.set("white-space", "pre");
        }
        normalize_content_model(&mut doc);
        assert_eq!(segments(&doc), &[text("  a  ")]);
    }

    #[test]
    fn test_tables_without_cells_are_dropped() {
        let mut doc = doc_with(vec![text("a")], false);
        let mut empty_rows = ContentModelTable::new(Format::new(), Default::default());
        empty_rows.rows.push(ContentModelTableRow::new(0.0));
        doc.blocks.push(ContentModelBlock::Table(empty_rows));
        doc.blocks
            .push(ContentModelBlock::Table(ContentModelTable::new(Format::new(), Default::default())));

        let mut kept = ContentModelTable::new(Format::new(), Default::default());
        let mut row = ContentModelTableRow::new(0.0);
        row.cells
            .push(ContentModelTableCell::new(false, false, false, Format::new()));
        kept.rows.push(row);
        doc.blocks.push(ContentModelBlock::Table(kept));

        normalize_content_model(&mut doc);
        assert_eq!(doc.blocks.len(), 2);
        assert!(doc.blocks[1].as_table().is_some());
    }
}
