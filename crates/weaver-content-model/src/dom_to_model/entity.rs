use weaver_content_dom::{Dom, NodeId, is_block_tag};

use super::DomToModelContext;
use super::child::{add_segment, handle_opaque_selection};
use crate::entity::parse_entity_format;
use crate::model::{
    ContentModelBlock, ContentModelBlockGroup, ContentModelEntity, ContentModelSegment,
    EntityFormat, ForeignElement,
};

const TARGET: &str = "weaver::content_model::dom_to_model";

/// An entity wrapper becomes a block when it renders as one, otherwise an
/// inline segment. Its content is never walked.
pub fn process_entity(
    group: &mut dyn ContentModelBlockGroup,
    element: NodeId,
    context: &mut DomToModelContext<'_>,
) {
    let dom = context.dom;
    let entity_format = parse_entity_format(dom, element);
    tracing::trace!(
        target: TARGET,
        id = ?entity_format.id,
        entity_type = ?entity_format.entity_type,
        "entity"
    );
    add_entity(group, element, entity_format, context);
}

/// Freeze foreign markup (a table the editor did not author) as a readonly
/// entity so it passes through untouched.
pub fn process_fake_entity(
    group: &mut dyn ContentModelBlockGroup,
    element: NodeId,
    context: &mut DomToModelContext<'_>,
) {
    let entity_format = EntityFormat {
        entity_type: context.dom.tag(element).map(Into::into),
        is_readonly: true,
        is_fake_entity: true,
        ..Default::default()
    };
    add_entity(group, element, entity_format, context);
}

fn add_entity(
    group: &mut dyn ContentModelBlockGroup,
    element: NodeId,
    entity_format: EntityFormat,
    context: &mut DomToModelContext<'_>,
) {
    let dom = context.dom;
    let wrapper = ForeignElement::capture(dom, element);
    let mut entity = ContentModelEntity::new(wrapper, entity_format, context.segment_format.clone());
    entity.is_selected = handle_opaque_selection(element, context);

    if renders_as_block(dom, element) {
        group.add_block(ContentModelBlock::Entity(entity));
    } else {
        add_segment(group, ContentModelSegment::Entity(entity), context);
    }
}

fn renders_as_block(dom: &Dom, element: NodeId) -> bool {
    match dom.style_property(element, "display") {
        Some(display) => matches!(
            display.as_str(),
            "block" | "flex" | "grid" | "table" | "list-item"
        ),
        None => dom.tag(element).is_some_and(is_block_tag),
    }
}
