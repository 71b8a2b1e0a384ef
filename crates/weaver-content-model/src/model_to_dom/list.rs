use weaver_content_dom::{Dom, NodeId};

use super::ModelToDomContext;
use super::block::{apply_dataset, apply_format};
use super::context::ListStackEntry;
use crate::list::{get_ordered_list_style_value, is_template_style, list_style_from_metadata};
use crate::metadata::{ListMetadataFormat, get_metadata, list_metadata_definition};
use crate::model::{ContentModelListItem, ContentModelListLevel, ListType};

const TARGET: &str = "weaver::content_model::model_to_dom";

/// An open list element can host the level when it renders the same list.
/// A level restarting its numbering always gets a fresh element.
fn can_reuse_level(open: &ContentModelListLevel, level: &ContentModelListLevel) -> bool {
    level.start_number_override.is_none()
        && open.list_type == level.list_type
        && open.format == level.format
        && open.dataset == level.dataset
}

/// The `list-style-type` a level renders with: metadata first, then the
/// level's own style.
fn effective_list_style(level: &ContentModelListLevel, depth: usize) -> Option<String> {
    let metadata: Option<ListMetadataFormat> =
        get_metadata(&level.dataset, &list_metadata_definition());
    metadata
        .and_then(|metadata| list_style_from_metadata(&metadata, level.list_type, depth))
        .map(str::to_string)
        .or_else(|| level.format.get("list-style-type").map(str::to_string))
}

pub fn handle_list(
    dom: &mut Dom,
    parent: NodeId,
    item: &ContentModelListItem,
    ref_node: Option<NodeId>,
    context: &mut ModelToDomContext<'_>,
) -> Option<NodeId> {
    let stack = &mut context.list_format.node_stack;
    let reused = stack
        .iter()
        .zip(&item.levels)
        .take_while(|(open, level)| can_reuse_level(&open.level, level))
        .count();
    stack.truncate(reused);

    for (depth, level) in item.levels.iter().enumerate().skip(reused) {
        let list = dom.create_element(level.list_type.tag());
        match context.list_format.node_stack.last() {
            Some(open) => dom.append_child(open.node, list),
            None => dom.insert_before(parent, list, ref_node),
        }

        if level.list_type == ListType::Ordered {
            let start = context
                .list_format
                .thread_item_counts
                .open_rendered_list(depth, level.start_number_override);
            if start != 1 {
                dom.set_attribute(list, "start", &start.to_string());
            }
        }

        apply_format(dom, list, &level.format);
        let metadata: Option<ListMetadataFormat> =
            get_metadata(&level.dataset, &list_metadata_definition());
        if let Some(style) = metadata
            .and_then(|metadata| list_style_from_metadata(&metadata, level.list_type, depth))
        {
            if !is_template_style(style) {
                dom.set_style_property(list, "list-style-type", style);
            }
        }
        apply_dataset(dom, list, &level.dataset);

        tracing::trace!(target: TARGET, depth, list_type = level.list_type.tag(), "opened list");
        context.list_format.node_stack.push(ListStackEntry {
            node: list,
            level: level.clone(),
        });
    }
    ref_node
}

pub fn handle_list_item(
    dom: &mut Dom,
    parent: NodeId,
    item: &mut ContentModelListItem,
    ref_node: Option<NodeId>,
    context: &mut ModelToDomContext<'_>,
) -> Option<NodeId> {
    let handlers = context.handlers;
    let ref_node = handlers.list(dom, parent, item, ref_node, context);

    let li = dom.create_element("li");
    match context.list_format.node_stack.last() {
        Some(open) => dom.append_child(open.node, li),
        None => dom.insert_before(parent, li, ref_node),
    }

    let depth = item.depth();
    let number = match item.last_level() {
        Some(level) if level.list_type == ListType::Ordered && depth > 0 => {
            Some(context.list_format.thread_item_counts.next_item(depth - 1))
        }
        _ => None,
    };

    apply_format(dom, li, &item.format);
    apply_format(dom, li, &item.format_holder.format);

    if let (Some(level), Some(number)) = (item.last_level(), number) {
        if let Some(style) = effective_list_style(level, depth - 1) {
            if is_template_style(&style) {
                let value = get_ordered_list_style_value(&style, number);
                dom.set_style_property(li, "list-style-type", &value);
            }
        }
    }

    let implicit = item.format_holder.format.clone();
    context.with_implicit_format(implicit, |context| {
        handlers.block_group_children(dom, li, item, context);
    });
    ref_node
}
