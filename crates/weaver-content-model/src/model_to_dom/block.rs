use smol_str::SmolStr;
use weaver_content_dom::{Dom, NodeId};

use super::ModelToDomContext;
use super::context::NodePairKind;
use crate::entity::apply_entity_format;
use crate::format::{Dataset, Format};
use crate::model::{
    BlockGroupType, ContentModelBlock, ContentModelBlockGroup, ContentModelDivider,
    ContentModelEntity, ContentModelFormatContainer, ContentModelGeneralBlock,
};

const TARGET: &str = "weaver::content_model::model_to_dom";

/// Append `format` to the inline style of `element`.
pub fn apply_format(dom: &mut Dom, element: NodeId, format: &Format) {
    if format.is_empty() {
        return;
    }
    let mut declarations = dom.style(element);
    for (key, value) in format.iter() {
        declarations.retain(|(name, _)| name != key);
        declarations.push((SmolStr::new(key), value.to_string()));
    }
    dom.write_style(element, &declarations);
}

pub fn apply_dataset(dom: &mut Dom, element: NodeId, dataset: &Dataset) {
    for (key, value) in dataset {
        dom.set_data(element, key, value.as_str());
    }
}

/// Put an element that may already sit in `parent` at the position of
/// `ref_node`. Stale siblings between the two are dropped, since the model
/// has nothing there. Returns the reference for the next block.
pub fn reuse_cached_element(
    dom: &mut Dom,
    parent: NodeId,
    element: NodeId,
    ref_node: Option<NodeId>,
) -> Option<NodeId> {
    let mut ref_node = ref_node;
    if dom.parent(element) == Some(parent) {
        while let Some(node) = ref_node {
            if node == element {
                return dom.next_sibling(element);
            }
            ref_node = dom.next_sibling(node);
            dom.remove(node);
        }
    }
    dom.insert_before(parent, element, ref_node);
    ref_node
}

pub fn handle_block_group_children(
    dom: &mut Dom,
    parent: NodeId,
    group: &mut dyn ContentModelBlockGroup,
    context: &mut ModelToDomContext<'_>,
) {
    let handlers = context.handlers;
    let isolate = matches!(
        group.block_group_type(),
        BlockGroupType::TableCell | BlockGroupType::FormatContainer | BlockGroupType::General
    );
    let saved_stack = std::mem::take(&mut context.list_format.node_stack);
    let saved_counts = isolate.then(|| std::mem::take(&mut context.list_format.thread_item_counts));

    let original = dom.children(parent).to_vec();
    let mut ref_node = original.first().copied();
    for (index, block) in group.blocks_mut().iter_mut().enumerate() {
        // Only consecutive list items share open list elements.
        if index == 0 || !matches!(block, ContentModelBlock::ListItem(_)) {
            context.list_format.node_stack.clear();
        }
        ref_node = handlers.block(dom, parent, block, ref_node, context);
        ref_node = resync_ref_node(dom, parent, &original, ref_node, context);
    }

    while let Some(node) = ref_node {
        ref_node = dom.next_sibling(node);
        tracing::trace!(target: TARGET, node = node.index(), "removing node with no model counterpart");
        dom.remove(node);
    }

    context.list_format.node_stack = saved_stack;
    if let Some(counts) = saved_counts {
        context.list_format.thread_item_counts = counts;
    }
}

/// A reused element may have been moved out of `parent` while it was the
/// reference. Continue from the next original child still in place.
fn resync_ref_node(
    dom: &Dom,
    parent: NodeId,
    original: &[NodeId],
    ref_node: Option<NodeId>,
    context: &ModelToDomContext<'_>,
) -> Option<NodeId> {
    let node = ref_node?;
    if dom.parent(node) == Some(parent) {
        return Some(node);
    }
    let position = original.iter().position(|&n| n == node)?;
    original[position + 1..]
        .iter()
        .copied()
        .find(|&n| dom.parent(n) == Some(parent) && !context.placed.contains(&n))
}

pub fn handle_block(
    dom: &mut Dom,
    parent: NodeId,
    block: &mut ContentModelBlock,
    ref_node: Option<NodeId>,
    context: &mut ModelToDomContext<'_>,
) -> Option<NodeId> {
    let handlers = context.handlers;
    match block {
        ContentModelBlock::Paragraph(paragraph) => {
            handlers.paragraph(dom, parent, paragraph, ref_node, context)
        }
        ContentModelBlock::Table(table) => handlers.table(dom, parent, table, ref_node, context),
        ContentModelBlock::Divider(divider) => {
            handlers.divider(dom, parent, divider, ref_node, context)
        }
        ContentModelBlock::Entity(entity) => handlers.entity(dom, parent, entity, ref_node, context),
        ContentModelBlock::FormatContainer(container) => {
            handlers.format_container(dom, parent, container, ref_node, context)
        }
        ContentModelBlock::ListItem(item) => handlers.list_item(dom, parent, item, ref_node, context),
        ContentModelBlock::General(general) => {
            handlers.general_block(dom, parent, general, ref_node, context)
        }
    }
}

pub fn handle_entity(
    dom: &mut Dom,
    parent: NodeId,
    entity: &mut ContentModelEntity,
    ref_node: Option<NodeId>,
    context: &mut ModelToDomContext<'_>,
) -> Option<NodeId> {
    let wrapper = context.claim_element(dom, &entity.wrapper, true);
    apply_entity_format(dom, wrapper, &entity.entity_format);
    let ref_node = reuse_cached_element(dom, parent, wrapper, ref_node);
    context.record(NodePairKind::Entity, wrapper, entity.entity_format.id.as_deref());
    ref_node
}

pub fn handle_divider(
    dom: &mut Dom,
    parent: NodeId,
    divider: &mut ContentModelDivider,
    ref_node: Option<NodeId>,
    context: &mut ModelToDomContext<'_>,
) -> Option<NodeId> {
    if context.allow_cache_element {
        if let Some(cached) = divider.cached_element.get() {
            return reuse_cached_element(dom, parent, cached, ref_node);
        }
    }
    let element = dom.create_element(&divider.tag_name);
    dom.insert_before(parent, element, ref_node);
    apply_format(dom, element, &divider.format);
    if context.allow_cache_element {
        divider.cached_element.set(Some(element));
    }
    ref_node
}

pub fn handle_format_container(
    dom: &mut Dom,
    parent: NodeId,
    container: &mut ContentModelFormatContainer,
    ref_node: Option<NodeId>,
    context: &mut ModelToDomContext<'_>,
) -> Option<NodeId> {
    let handlers = context.handlers;
    let element = dom.create_element(&container.tag_name);
    dom.insert_before(parent, element, ref_node);
    apply_format(dom, element, &container.format);
    handlers.block_group_children(dom, element, container, context);
    ref_node
}

/// The original element is moved into place (or shallow-copied when it
/// cannot be moved) and its modelled content written inside it.
pub fn handle_general_block(
    dom: &mut Dom,
    parent: NodeId,
    general: &mut ContentModelGeneralBlock,
    ref_node: Option<NodeId>,
    context: &mut ModelToDomContext<'_>,
) -> Option<NodeId> {
    let handlers = context.handlers;
    let element = context.claim_element(dom, &general.element, false);
    let ref_node = reuse_cached_element(dom, parent, element, ref_node);
    apply_format(dom, element, &general.format);
    context.record(NodePairKind::General, element, None);
    handlers.block_group_children(dom, element, general, context);
    ref_node
}
