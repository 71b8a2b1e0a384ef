use weaver_content_dom::{NodeId, is_block_tag};

use super::DomToModelContext;
use crate::entity::is_entity_element;
use crate::model::ContentModelBlockGroup;

const TARGET: &str = "weaver::content_model::dom_to_model";

/// Elements that hold no document content.
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "head", "meta", "link", "title", "template", "noscript",
];

/// Inline elements whose insides the model does not interpret.
pub const OPAQUE_TAGS: &[&str] = &[
    "svg", "canvas", "video", "audio", "iframe", "object", "embed", "math", "input", "button",
    "select", "textarea",
];

/// Dispatch an element by tag. Entities win over every tag rule.
pub fn process_element(
    group: &mut dyn ContentModelBlockGroup,
    element: NodeId,
    context: &mut DomToModelContext<'_>,
) {
    let dom = context.dom;
    let processors = context.processors;
    let Some(tag) = dom.tag(element) else {
        return;
    };

    if is_entity_element(dom, element) {
        return processors.entity(group, element, context);
    }

    match tag {
        _ if SKIPPED_TAGS.contains(&tag) => {
            tracing::trace!(target: TARGET, tag, "skipping non-content element");
        }
        "div" | "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            processors.block(group, element, context)
        }
        "li" if context.list_format.in_list => processors.list_item(group, element, context),
        "li" => processors.block(group, element, context),
        "blockquote" | "pre" => processors.format_container(group, element, context),
        "ol" | "ul" => processors.list(group, element, context),
        "table" => processors.table(group, element, context),
        "img" => processors.image(group, element, context),
        "br" => processors.br(group, element, context),
        "hr" => processors.hr(group, element, context),
        "a" => processors.link(group, element, context),
        "code" => processors.code(group, element, context),
        _ if OPAQUE_TAGS.contains(&tag) => processors.general_segment(group, element, context),
        _ if is_block_tag(tag) => processors.general_block(group, element, context),
        _ => processors.inline_format(group, element, context),
    }
}
