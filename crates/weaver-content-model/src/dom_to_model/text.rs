use weaver_content_dom::{DomSelection, NodeId};

use super::DomToModelContext;
use super::child::{add_segment, add_selection_marker, at_paragraph_start};
use crate::model::{ContentModelBlockGroup, ContentModelSegment, ContentModelText};

const TARGET: &str = "weaver::content_model::dom_to_model";

/// Text node processor.
///
/// The text is split only where a range boundary falls inside it. Each
/// piece inherits the running segment format, link and code.
pub fn process_text(
    group: &mut dyn ContentModelBlockGroup,
    node: NodeId,
    context: &mut DomToModelContext<'_>,
) {
    let dom = context.dom;
    let Some(text) = dom.text(node) else {
        return;
    };

    // (char offset, is_start). Start is pushed first so a collapsed range
    // opens before it closes.
    let mut boundaries: Vec<(usize, bool)> = Vec::with_capacity(2);
    let mut collapsed = false;
    if let Some(DomSelection::Range { range }) = context.selection {
        let length = text.chars().count();
        collapsed = range.is_collapsed();
        if range.start.node == node {
            boundaries.push((range.start.offset.min(length), true));
        }
        if range.end.node == node {
            boundaries.push((range.end.offset.min(length), false));
        }
        boundaries.sort_by_key(|(offset, _)| *offset);
    }

    let mut position = 0;
    for (offset, is_start) in boundaries {
        add_text_segment(group, char_slice(text, position, offset), context);
        position = offset;
        if is_start {
            context.is_in_selection = true;
            add_selection_marker(group, context);
        } else {
            if !collapsed {
                add_selection_marker(group, context);
            }
            context.is_in_selection = false;
        }
    }
    let rest = char_slice(text, position, usize::MAX);
    add_text_segment(group, rest, context);
}

fn add_text_segment(
    group: &mut dyn ContentModelBlockGroup,
    text: &str,
    context: &DomToModelContext<'_>,
) {
    if text.is_empty() {
        return;
    }
    let text = if context.preserve_white_space {
        text.to_string()
    } else {
        collapse_white_space(text)
    };
    if !context.preserve_white_space && text == " " && at_paragraph_start(group) {
        tracing::trace!(target: TARGET, "skipping leading whitespace");
        return;
    }

    let mut segment = ContentModelText::new(text, context.segment_format.clone());
    segment.link = context.link.clone();
    segment.code = context.code.clone();
    segment.is_selected = context.is_in_selection;
    add_segment(group, ContentModelSegment::Text(segment), context);
}

/// Substring between two char offsets. `end` past the text is clamped.
fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let byte = |offset: usize| {
        text.char_indices()
            .nth(offset)
            .map_or(text.len(), |(index, _)| index)
    };
    let start = byte(start);
    let end = byte(end).max(start);
    &text[start..end]
}

/// Collapse runs of HTML whitespace to a single space, the way a normal
/// `white-space` renders them.
pub fn collapse_white_space(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0c') {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}
