use weaver_content_dom::{DomSelection, NodeId, NodeKind};

use super::DomToModelContext;
use crate::model::{
    ContentModelBlock, ContentModelBlockGroup, ContentModelParagraph, ContentModelSegment,
};

/// Walk every child of `parent`, checking for selection boundaries at each
/// child index and after the last child.
pub fn process_children(
    group: &mut dyn ContentModelBlockGroup,
    parent: NodeId,
    context: &mut DomToModelContext<'_>,
) {
    let dom = context.dom;
    let children = dom.children(parent);
    for (index, &child) in children.iter().enumerate() {
        handle_regular_selection(group, parent, index, context);
        process_child_node(group, child, context);
    }
    handle_regular_selection(group, parent, children.len(), context);
}

/// Route a single node to the processor for its kind.
pub fn process_child_node(
    group: &mut dyn ContentModelBlockGroup,
    node: NodeId,
    context: &mut DomToModelContext<'_>,
) {
    let dom = context.dom;
    let processors = context.processors;
    match dom.kind(node) {
        NodeKind::Element(_) => processors.element(group, node, context),
        NodeKind::Text(_) => processors.text(group, node, context),
        NodeKind::Fragment => processors.child(group, node, context),
        NodeKind::Comment(_) => {}
    }
}

/// Range boundary check at child position `(parent, index)`.
///
/// The start of a range opens the selected region and leaves a marker.
/// The end closes it; a marker is only left there for a non-collapsed
/// range, since a collapsed one already has its marker from the start.
pub fn handle_regular_selection(
    group: &mut dyn ContentModelBlockGroup,
    parent: NodeId,
    index: usize,
    context: &mut DomToModelContext<'_>,
) {
    let Some(DomSelection::Range { range }) = context.selection else {
        return;
    };
    if range.start.node == parent && range.start.offset == index {
        context.is_in_selection = true;
        add_selection_marker(group, context);
    }
    if range.end.node == parent && range.end.offset == index {
        if !range.is_collapsed() {
            add_selection_marker(group, context);
        }
        context.is_in_selection = false;
    }
}

/// Like [`handle_regular_selection`] for positions between rows or list
/// items, where no paragraph exists to hold a marker.
pub fn handle_selection_state(parent: NodeId, index: usize, context: &mut DomToModelContext<'_>) {
    let Some(DomSelection::Range { range }) = context.selection else {
        return;
    };
    if range.start.node == parent && range.start.offset == index {
        context.is_in_selection = true;
    }
    if range.end.node == parent && range.end.offset == index {
        context.is_in_selection = false;
    }
}

pub fn add_selection_marker(
    group: &mut dyn ContentModelBlockGroup,
    context: &DomToModelContext<'_>,
) {
    let marker = ContentModelSegment::selection_marker(context.segment_format.clone());
    add_segment(group, marker, context);
}

/// Append a segment to the trailing paragraph of `group`, opening an
/// implicit paragraph first when the group does not end with one.
pub fn add_segment(
    group: &mut dyn ContentModelBlockGroup,
    segment: ContentModelSegment,
    context: &DomToModelContext<'_>,
) {
    with_paragraph(group, context, |paragraph| paragraph.add_segment(segment));
}

pub fn with_paragraph<R>(
    group: &mut dyn ContentModelBlockGroup,
    context: &DomToModelContext<'_>,
    f: impl FnOnce(&mut ContentModelParagraph) -> R,
) -> R {
    let blocks = group.blocks_mut();
    if let Some(ContentModelBlock::Paragraph(paragraph)) = blocks.last_mut() {
        return f(paragraph);
    }
    let mut paragraph = ContentModelParagraph::new(true, context.block_format.clone());
    let result = f(&mut paragraph);
    blocks.push(ContentModelBlock::Paragraph(paragraph));
    result
}

/// Whether inline content added now would be the first thing in its
/// paragraph.
pub fn at_paragraph_start(group: &dyn ContentModelBlockGroup) -> bool {
    match group.blocks().last() {
        Some(ContentModelBlock::Paragraph(paragraph)) => paragraph.segments.is_empty(),
        _ => true,
    }
}

/// Whether `element` falls inside the range selection, judged by its
/// boundaries alone. Used for opaque elements whose insides are not
/// walked: a boundary inside them still has to open or close the region.
pub fn handle_opaque_selection(element: NodeId, context: &mut DomToModelContext<'_>) -> bool {
    let mut selected = context.is_in_selection;
    if let Some(DomSelection::Range { range }) = context.selection {
        let dom = context.dom;
        if dom.contains(element, range.start.node) {
            selected = true;
            context.is_in_selection = true;
        }
        if dom.contains(element, range.end.node) {
            selected = true;
            context.is_in_selection = false;
        }
    }
    selected
}
