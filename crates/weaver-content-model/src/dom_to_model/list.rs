use weaver_content_dom::NodeId;

use super::DomToModelContext;
use super::child::{handle_selection_state, process_child_node};
use crate::format::{Format, FormatFamily, parse_declarations};
use crate::list::list_style_from_metadata;
use crate::metadata::{ListMetadataFormat, get_metadata, list_metadata_definition};
use crate::model::{
    ContentModelBlock, ContentModelBlockGroup, ContentModelListItem, ContentModelListLevel,
    ListType,
};

const TARGET: &str = "weaver::content_model::dom_to_model";

/// `<ol>` / `<ul>`: push a list level and read the items.
///
/// Items of nested lists are flattened into the same sequence as their
/// parents, so the outermost list moves every finished item into `group`
/// after each of its children.
pub fn process_list(
    group: &mut dyn ContentModelBlockGroup,
    element: NodeId,
    context: &mut DomToModelContext<'_>,
) {
    let dom = context.dom;
    let processors = context.processors;
    let Some(list_type) = dom.tag(element).and_then(ListType::from_tag) else {
        return;
    };
    let depth = context.list_format.levels.len();
    let dataset = dom.dataset(element);

    let mut format = Format::new();
    parse_declarations(&dom.style(element), FormatFamily::Block, &mut format);
    let metadata: Option<ListMetadataFormat> = get_metadata(&dataset, &list_metadata_definition());
    let style_from_metadata = metadata
        .as_ref()
        .and_then(|metadata| list_style_from_metadata(metadata, list_type, depth))
        .is_some();
    if !style_from_metadata {
        if let Some(style) = dom.style_property(element, "list-style-type") {
            format.set("list-style-type", style);
        }
    }

    let mut level = ContentModelListLevel::new(list_type, format, dataset);
    if list_type == ListType::Ordered {
        let start = dom
            .attribute(element, "start")
            .and_then(|start| start.trim().parse::<u32>().ok())
            .unwrap_or(1);
        level.start_number_override = context
            .list_format
            .thread_item_counts
            .open_parsed_list(depth, start);
    }
    tracing::trace!(
        target: TARGET,
        depth,
        list_type = list_type.tag(),
        start_override = ?level.start_number_override,
        "list"
    );

    let outermost = !context.list_format.in_list;
    context.list_format.levels.push(level);
    context.list_format.in_list = true;

    context.stack_format(|context| {
        context.block_format = Format::new();
        let children = dom.children(element);
        for (index, &child) in children.iter().enumerate() {
            handle_selection_state(element, index, context);
            if dom.has_tag(child, "li") {
                processors.list_item(group, child, context);
            } else {
                process_child_node(group, child, context);
            }
            if outermost {
                flush_pending_items(group, context);
            }
        }
        handle_selection_state(element, children.len(), context);
    });

    context.list_format.levels.pop();
    context.list_format.in_list = !outermost;
    if outermost {
        flush_pending_items(group, context);
    }
}

fn flush_pending_items(group: &mut dyn ContentModelBlockGroup, context: &mut DomToModelContext<'_>) {
    for item in context.list_format.pending_items.drain(..).flatten() {
        group.add_block(ContentModelBlock::ListItem(item));
    }
}

/// `<li>` inside a list. The item is numbered on entry so items of lists
/// nested inside it count after it.
pub fn process_list_item(
    group: &mut dyn ContentModelBlockGroup,
    element: NodeId,
    context: &mut DomToModelContext<'_>,
) {
    let dom = context.dom;
    let processors = context.processors;
    let levels = context.list_format.levels.clone();
    if let Some(last) = levels.last() {
        if last.list_type == ListType::Ordered {
            context.list_format.thread_item_counts.next_item(levels.len() - 1);
        }
    }
    // An override belongs to the first item of its list only.
    for level in &mut context.list_format.levels {
        level.start_number_override = None;
    }

    let style = dom.style(element);
    let mut marker_format = context.segment_format.clone();
    parse_declarations(&style, FormatFamily::Segment, &mut marker_format);
    let mut item = ContentModelListItem::new(levels, marker_format.clone());
    parse_declarations(&style, FormatFamily::Block, &mut item.format);

    let slot = context.list_format.pending_items.len();
    context.list_format.pending_items.push(None);

    context.stack_format(|context| {
        context.block_format = Format::new();
        context.segment_format = marker_format;
        processors.child(&mut item, element, context);
    });

    match context.list_format.pending_items.get_mut(slot) {
        Some(entry) => *entry = Some(item),
        // Flushed early by a caller that does not reserve slots.
        None => group.add_block(ContentModelBlock::ListItem(item)),
    }
}
