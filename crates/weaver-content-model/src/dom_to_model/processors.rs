use weaver_content_dom::NodeId;

use super::{DomToModelContext, block, child, element, entity, inline, list, table, text};
use crate::model::ContentModelBlockGroup;

/// Registry of the per-category DOM processors.
///
/// Every method has a default implementation, so an override only needs to
/// replace the categories it cares about. The context holds the registry
/// as a trait object and processors dispatch through it, so an override is
/// picked up at every depth of the walk.
pub trait DomToModelProcessors {
    /// Walk the children of `parent`, tracking selection boundaries
    /// between them.
    fn child(
        &self,
        group: &mut dyn ContentModelBlockGroup,
        parent: NodeId,
        context: &mut DomToModelContext<'_>,
    ) {
        child::process_children(group, parent, context)
    }

    /// Dispatch an element to its category processor.
    fn element(
        &self,
        group: &mut dyn ContentModelBlockGroup,
        element: NodeId,
        context: &mut DomToModelContext<'_>,
    ) {
        element::process_element(group, element, context)
    }

    fn text(
        &self,
        group: &mut dyn ContentModelBlockGroup,
        node: NodeId,
        context: &mut DomToModelContext<'_>,
    ) {
        text::process_text(group, node, context)
    }

    /// `div`, `p` and headings.
    fn block(
        &self,
        group: &mut dyn ContentModelBlockGroup,
        element: NodeId,
        context: &mut DomToModelContext<'_>,
    ) {
        block::process_block(group, element, context)
    }

    /// `blockquote` and `pre`.
    fn format_container(
        &self,
        group: &mut dyn ContentModelBlockGroup,
        element: NodeId,
        context: &mut DomToModelContext<'_>,
    ) {
        block::process_format_container(group, element, context)
    }

    /// Block elements the model has no dedicated node for.
    fn general_block(
        &self,
        group: &mut dyn ContentModelBlockGroup,
        element: NodeId,
        context: &mut DomToModelContext<'_>,
    ) {
        block::process_general_block(group, element, context)
    }

    fn hr(
        &self,
        group: &mut dyn ContentModelBlockGroup,
        element: NodeId,
        context: &mut DomToModelContext<'_>,
    ) {
        block::process_divider(group, element, context)
    }

    /// Inline formatting elements (`b`, `span`, `font`, ...) and unknown
    /// inline containers.
    fn inline_format(
        &self,
        group: &mut dyn ContentModelBlockGroup,
        element: NodeId,
        context: &mut DomToModelContext<'_>,
    ) {
        inline::process_format_element(group, element, context)
    }

    fn link(
        &self,
        group: &mut dyn ContentModelBlockGroup,
        element: NodeId,
        context: &mut DomToModelContext<'_>,
    ) {
        inline::process_link(group, element, context)
    }

    fn code(
        &self,
        group: &mut dyn ContentModelBlockGroup,
        element: NodeId,
        context: &mut DomToModelContext<'_>,
    ) {
        inline::process_code(group, element, context)
    }

    fn image(
        &self,
        group: &mut dyn ContentModelBlockGroup,
        element: NodeId,
        context: &mut DomToModelContext<'_>,
    ) {
        inline::process_image(group, element, context)
    }

    fn br(
        &self,
        group: &mut dyn ContentModelBlockGroup,
        element: NodeId,
        context: &mut DomToModelContext<'_>,
    ) {
        inline::process_br(group, element, context)
    }

    /// Inline elements carried through verbatim (`svg`, `video`, ...).
    fn general_segment(
        &self,
        group: &mut dyn ContentModelBlockGroup,
        element: NodeId,
        context: &mut DomToModelContext<'_>,
    ) {
        inline::process_general_segment(group, element, context)
    }

    fn entity(
        &self,
        group: &mut dyn ContentModelBlockGroup,
        element: NodeId,
        context: &mut DomToModelContext<'_>,
    ) {
        entity::process_entity(group, element, context)
    }

    fn list(
        &self,
        group: &mut dyn ContentModelBlockGroup,
        element: NodeId,
        context: &mut DomToModelContext<'_>,
    ) {
        list::process_list(group, element, context)
    }

    fn list_item(
        &self,
        group: &mut dyn ContentModelBlockGroup,
        element: NodeId,
        context: &mut DomToModelContext<'_>,
    ) {
        list::process_list_item(group, element, context)
    }

    fn table(
        &self,
        group: &mut dyn ContentModelBlockGroup,
        element: NodeId,
        context: &mut DomToModelContext<'_>,
    ) {
        table::process_table(group, element, context)
    }
}

/// The built-in processors, unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultProcessors;

impl DomToModelProcessors for DefaultProcessors {}
