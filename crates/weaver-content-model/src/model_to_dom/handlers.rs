use weaver_content_dom::{Dom, NodeId};

use super::{ModelToDomContext, block, list, paragraph, segment, table};
use crate::model::{
    ContentModelBlock, ContentModelBlockGroup, ContentModelBr, ContentModelDivider,
    ContentModelEntity, ContentModelFormatContainer, ContentModelGeneralBlock,
    ContentModelGeneralSegment, ContentModelImage, ContentModelListItem, ContentModelParagraph,
    ContentModelSegment, ContentModelTable, ContentModelText,
};

/// Registry of the per-kind model writers.
///
/// Writers receive the node to insert before (`ref_node`) and return the
/// reference for whatever comes next, so content already in the DOM can be
/// reused in place. Inside a paragraph element of its own a segment gets
/// `None` and is appended.
pub trait ModelToDomHandlers {
    /// Write the blocks of a group into `parent`, reusing or removing the
    /// nodes it already holds.
    fn block_group_children(
        &self,
        dom: &mut Dom,
        parent: NodeId,
        group: &mut dyn ContentModelBlockGroup,
        context: &mut ModelToDomContext<'_>,
    ) {
        block::handle_block_group_children(dom, parent, group, context)
    }

    fn block(
        &self,
        dom: &mut Dom,
        parent: NodeId,
        block: &mut ContentModelBlock,
        ref_node: Option<NodeId>,
        context: &mut ModelToDomContext<'_>,
    ) -> Option<NodeId> {
        block::handle_block(dom, parent, block, ref_node, context)
    }

    fn paragraph(
        &self,
        dom: &mut Dom,
        parent: NodeId,
        paragraph: &mut ContentModelParagraph,
        ref_node: Option<NodeId>,
        context: &mut ModelToDomContext<'_>,
    ) -> Option<NodeId> {
        paragraph::handle_paragraph(dom, parent, paragraph, ref_node, context)
    }

    /// Dispatch a segment and track the range selection around it.
    fn segment(
        &self,
        dom: &mut Dom,
        parent: NodeId,
        segment: &mut ContentModelSegment,
        ref_node: Option<NodeId>,
        context: &mut ModelToDomContext<'_>,
    ) -> Option<NodeId> {
        segment::handle_segment(dom, parent, segment, ref_node, context)
    }

    fn text(
        &self,
        dom: &mut Dom,
        parent: NodeId,
        text: &mut ContentModelText,
        ref_node: Option<NodeId>,
        context: &mut ModelToDomContext<'_>,
    ) -> Option<NodeId> {
        segment::handle_text(dom, parent, text, ref_node, context)
    }

    fn br(
        &self,
        dom: &mut Dom,
        parent: NodeId,
        br: &mut ContentModelBr,
        ref_node: Option<NodeId>,
        context: &mut ModelToDomContext<'_>,
    ) -> Option<NodeId> {
        segment::handle_br(dom, parent, br, ref_node, context)
    }

    fn image(
        &self,
        dom: &mut Dom,
        parent: NodeId,
        image: &mut ContentModelImage,
        ref_node: Option<NodeId>,
        context: &mut ModelToDomContext<'_>,
    ) -> Option<NodeId> {
        segment::handle_image(dom, parent, image, ref_node, context)
    }

    fn general_segment(
        &self,
        dom: &mut Dom,
        parent: NodeId,
        general: &mut ContentModelGeneralSegment,
        ref_node: Option<NodeId>,
        context: &mut ModelToDomContext<'_>,
    ) -> Option<NodeId> {
        segment::handle_general_segment(dom, parent, general, ref_node, context)
    }

    /// Entities, block or inline. The wrapper always ends up directly
    /// before the returned reference.
    fn entity(
        &self,
        dom: &mut Dom,
        parent: NodeId,
        entity: &mut ContentModelEntity,
        ref_node: Option<NodeId>,
        context: &mut ModelToDomContext<'_>,
    ) -> Option<NodeId> {
        block::handle_entity(dom, parent, entity, ref_node, context)
    }

    fn table(
        &self,
        dom: &mut Dom,
        parent: NodeId,
        table: &mut ContentModelTable,
        ref_node: Option<NodeId>,
        context: &mut ModelToDomContext<'_>,
    ) -> Option<NodeId> {
        table::handle_table(dom, parent, table, ref_node, context)
    }

    /// Open the list elements a list item needs, reusing the ones already
    /// open where the levels agree.
    fn list(
        &self,
        dom: &mut Dom,
        parent: NodeId,
        item: &ContentModelListItem,
        ref_node: Option<NodeId>,
        context: &mut ModelToDomContext<'_>,
    ) -> Option<NodeId> {
        list::handle_list(dom, parent, item, ref_node, context)
    }

    fn list_item(
        &self,
        dom: &mut Dom,
        parent: NodeId,
        item: &mut ContentModelListItem,
        ref_node: Option<NodeId>,
        context: &mut ModelToDomContext<'_>,
    ) -> Option<NodeId> {
        list::handle_list_item(dom, parent, item, ref_node, context)
    }

    fn divider(
        &self,
        dom: &mut Dom,
        parent: NodeId,
        divider: &mut ContentModelDivider,
        ref_node: Option<NodeId>,
        context: &mut ModelToDomContext<'_>,
    ) -> Option<NodeId> {
        block::handle_divider(dom, parent, divider, ref_node, context)
    }

    fn format_container(
        &self,
        dom: &mut Dom,
        parent: NodeId,
        container: &mut ContentModelFormatContainer,
        ref_node: Option<NodeId>,
        context: &mut ModelToDomContext<'_>,
    ) -> Option<NodeId> {
        block::handle_format_container(dom, parent, container, ref_node, context)
    }

    fn general_block(
        &self,
        dom: &mut Dom,
        parent: NodeId,
        general: &mut ContentModelGeneralBlock,
        ref_node: Option<NodeId>,
        context: &mut ModelToDomContext<'_>,
    ) -> Option<NodeId> {
        block::handle_general_block(dom, parent, general, ref_node, context)
    }
}

/// The stock writers.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultModelHandlers;

impl ModelToDomHandlers for DefaultModelHandlers {}
