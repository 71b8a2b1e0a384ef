use weaver_content_dom::NodeId;

use super::child::{handle_regular_selection, process_child_node, process_children};
use super::{DomToModelContext, DomToModelProcessors};
use crate::format::Format;
use crate::model::{ContentModelBlock, ContentModelBlockGroup, ContentModelParagraph};

const TARGET: &str = "weaver::content_model::dom_to_model";

/// Processors for a reduced pass: only the path down to the selection and
/// the subtree holding the selection are modelled.
///
/// Siblings off the path collapse into one empty implicit paragraph each
/// run, and subtrees that neither hold nor sit inside the selection are
/// left empty. Without a selection the pass is a full one.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReducedModelProcessors;

impl DomToModelProcessors for ReducedModelProcessors {
    fn child(
        &self,
        group: &mut dyn ContentModelBlockGroup,
        parent: NodeId,
        context: &mut DomToModelContext<'_>,
    ) {
        process_reduced_children(group, parent, context)
    }
}

pub fn process_reduced_children(
    group: &mut dyn ContentModelBlockGroup,
    parent: NodeId,
    context: &mut DomToModelContext<'_>,
) {
    let dom = context.dom;
    let Some(selection_root) = context.selection_root else {
        return process_children(group, parent, context);
    };

    if dom.contains(selection_root, parent) {
        return process_children(group, parent, context);
    }
    if !dom.contains(parent, selection_root) {
        tracing::trace!(target: TARGET, parent = parent.index(), "skipping subtree off the selection");
        return;
    }

    let children = dom.children(parent);
    for (index, &child) in children.iter().enumerate() {
        if dom.contains(child, selection_root) {
            handle_regular_selection(group, parent, index, context);
            process_child_node(group, child, context);
            handle_regular_selection(group, parent, index + 1, context);
        } else {
            add_placeholder(group);
        }
    }
}

fn add_placeholder(group: &mut dyn ContentModelBlockGroup) {
    let is_placeholder = |block: &ContentModelBlock| {
        block
            .as_paragraph()
            .is_some_and(|p| p.is_implicit && p.segments.is_empty())
    };
    if !group.blocks().last().is_some_and(is_placeholder) {
        group.add_block(ContentModelBlock::Paragraph(ContentModelParagraph::new(
            true,
            Format::new(),
        )));
    }
}
