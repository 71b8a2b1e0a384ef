use weaver_content_dom::{Dom, DomPosition, NodeId};

use super::ModelToDomContext;
use super::block::{apply_format, reuse_cached_element};
use super::context::NodePairKind;
use crate::format::{implicit_segment_format, merge_implicit_segment_format};
use crate::model::{ContentModelParagraph, ContentModelSegment};

const TARGET: &str = "weaver::content_model::model_to_dom";

/// A cached element can stand in for the paragraph only when nothing inside
/// it has to be located again: no selection, no foreign nodes.
fn can_reuse(paragraph: &ContentModelParagraph) -> bool {
    !paragraph.segments.iter().any(|segment| {
        segment.is_selected()
            || matches!(
                segment,
                ContentModelSegment::General(_) | ContentModelSegment::Entity(_)
            )
    })
}

/// Implicit paragraphs write their segments straight into the parent
/// unless they carry format that needs an element to live on.
fn needs_wrapper(paragraph: &ContentModelParagraph) -> bool {
    !paragraph.is_implicit
        || paragraph.decorator.is_some()
        || (!paragraph.format.is_empty() && paragraph.segments.iter().any(|s| !s.is_marker()))
}

pub fn handle_paragraph(
    dom: &mut Dom,
    parent: NodeId,
    paragraph: &mut ContentModelParagraph,
    ref_node: Option<NodeId>,
    context: &mut ModelToDomContext<'_>,
) -> Option<NodeId> {
    let handlers = context.handlers;

    if context.allow_cache_element && can_reuse(paragraph) {
        if let Some(cached) = paragraph.cached_element.get() {
            tracing::trace!(target: TARGET, element = cached.index(), "reusing paragraph element");
            let ref_node = reuse_cached_element(dom, parent, cached, ref_node);
            if let Some(paragraph_map) = context.paragraph_map.as_deref_mut() {
                paragraph_map.apply_marker_to_dom(cached, paragraph);
            }
            context.record(NodePairKind::Paragraph, cached, paragraph.marker.get());
            return ref_node;
        }
    }

    let mut implicit = context.implicit_format.clone();
    if let Some(decorator) = &paragraph.decorator {
        merge_implicit_segment_format(&mut implicit, &implicit_segment_format(&decorator.tag_name));
        implicit.merge(&decorator.format);
    }

    if !needs_wrapper(paragraph) {
        let index = ref_node
            .and_then(|node| dom.index_in_parent(node))
            .unwrap_or_else(|| dom.child_count(parent));
        context.regular_selection.current = Some(DomPosition::new(parent, index));
        return context.with_implicit_format(implicit, |context| {
            let mut ref_node = ref_node;
            for segment in &mut paragraph.segments {
                ref_node = handlers.segment(dom, parent, segment, ref_node, context);
            }
            ref_node
        });
    }

    let tag = paragraph
        .decorator
        .as_ref()
        .map_or("div", |decorator| decorator.tag_name.as_str());
    let element = dom.create_element(tag);
    dom.insert_before(parent, element, ref_node);
    apply_format(dom, element, &paragraph.format);
    if let Some(decorator) = &paragraph.decorator {
        apply_format(dom, element, &decorator.format);
    }

    context.regular_selection.current = Some(DomPosition::new(element, 0));
    context.with_implicit_format(implicit, |context| {
        for segment in &mut paragraph.segments {
            handlers.segment(dom, element, segment, None, context);
        }
    });

    if context.allow_cache_element {
        paragraph.cached_element.set(Some(element));
    }
    if let Some(paragraph_map) = context.paragraph_map.as_deref_mut() {
        paragraph_map.apply_marker_to_dom(element, paragraph);
    }
    context.record(NodePairKind::Paragraph, element, paragraph.marker.get());
    ref_node
}
