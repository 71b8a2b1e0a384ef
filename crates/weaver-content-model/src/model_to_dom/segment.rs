use weaver_content_dom::{Dom, DomPosition, NodeId};

use super::ModelToDomContext;
use super::block::{apply_dataset, apply_format};
use super::context::NodePairKind;
use crate::format::{Format, has_text_decoration};
use crate::model::{
    ContentModelBr, ContentModelCode, ContentModelGeneralSegment, ContentModelImage,
    ContentModelLink, ContentModelSegment, ContentModelText,
};

/// Image properties written on the `<img>` itself.
const IMAGE_SIZE_KEYS: &[&str] = &["width", "height", "max-width"];

/// Link format keys written as attributes besides `href`.
const LINK_ATTRIBUTES: &[&str] = &["href", "target", "title", "rel"];

pub fn handle_segment(
    dom: &mut Dom,
    parent: NodeId,
    segment: &mut ContentModelSegment,
    ref_node: Option<NodeId>,
    context: &mut ModelToDomContext<'_>,
) -> Option<NodeId> {
    let handlers = context.handlers;
    let selected = segment.is_selected();
    if selected && context.regular_selection.start.is_none() {
        context.regular_selection.start = context.regular_selection.current;
    }

    let ref_node = match segment {
        ContentModelSegment::Text(text) => handlers.text(dom, parent, text, ref_node, context),
        ContentModelSegment::Br(br) => handlers.br(dom, parent, br, ref_node, context),
        ContentModelSegment::Image(image) => handlers.image(dom, parent, image, ref_node, context),
        ContentModelSegment::General(general) => {
            handlers.general_segment(dom, parent, general, ref_node, context)
        }
        ContentModelSegment::Entity(entity) => {
            let next = handlers.entity(dom, parent, entity, ref_node, context);
            let placed = match next {
                Some(next) => dom.previous_sibling(next),
                None => dom.last_child(parent),
            };
            if let Some(wrapper) = placed {
                let implicit = context.implicit_format.clone();
                let outer = apply_segment_decorators(dom, wrapper, &entity.format, None, None, &implicit);
                context.regular_selection.current = DomPosition::after(dom, outer);
            }
            next
        }
        ContentModelSegment::SelectionMarker(_) => ref_node,
    };

    if selected {
        context.regular_selection.end = context.regular_selection.current;
    }
    ref_node
}

/// Insert a freshly built node, or step over it when it already is the
/// reference.
fn place_node(dom: &mut Dom, parent: NodeId, node: NodeId, ref_node: Option<NodeId>) -> Option<NodeId> {
    if ref_node == Some(node) {
        return dom.next_sibling(node);
    }
    dom.insert_before(parent, node, ref_node);
    ref_node
}

pub fn handle_text(
    dom: &mut Dom,
    parent: NodeId,
    text: &mut ContentModelText,
    ref_node: Option<NodeId>,
    context: &mut ModelToDomContext<'_>,
) -> Option<NodeId> {
    let node = dom.create_text(text.text.as_str());
    let ref_node = place_node(dom, parent, node, ref_node);
    let implicit = context.implicit_format.clone();
    apply_segment_decorators(
        dom,
        node,
        &text.format,
        text.link.as_ref(),
        text.code.as_ref(),
        &implicit,
    );
    context.regular_selection.current = Some(DomPosition::end_of(dom, node));
    ref_node
}

pub fn handle_br(
    dom: &mut Dom,
    parent: NodeId,
    br: &mut ContentModelBr,
    ref_node: Option<NodeId>,
    context: &mut ModelToDomContext<'_>,
) -> Option<NodeId> {
    let node = dom.create_element("br");
    let ref_node = place_node(dom, parent, node, ref_node);
    let implicit = context.implicit_format.clone();
    apply_segment_decorators(dom, node, &br.format, None, None, &implicit);
    context.regular_selection.current = DomPosition::after(dom, node);
    ref_node
}

pub fn handle_image(
    dom: &mut Dom,
    parent: NodeId,
    image: &mut ContentModelImage,
    ref_node: Option<NodeId>,
    context: &mut ModelToDomContext<'_>,
) -> Option<NodeId> {
    let node = dom.create_element("img");
    let ref_node = place_node(dom, parent, node, ref_node);
    dom.set_attribute(node, "src", image.src.as_str());
    if let Some(alt) = &image.alt {
        dom.set_attribute(node, "alt", alt.as_str());
    }
    if let Some(title) = &image.title {
        dom.set_attribute(node, "title", title.as_str());
    }

    let (size, rest): (Vec<_>, Vec<_>) = image
        .format
        .iter()
        .partition(|(key, _)| IMAGE_SIZE_KEYS.contains(key));
    let size: Format = size.into_iter().collect();
    apply_format(dom, node, &size);
    apply_dataset(dom, node, &image.dataset);

    let implicit = context.implicit_format.clone();
    let segment_format: Format = rest.into_iter().collect();
    apply_segment_decorators(dom, node, &segment_format, image.link.as_ref(), None, &implicit);

    if image.is_selected_as_image_selection {
        context.image_selection = Some(node);
    }
    context.record(NodePairKind::Image, node, None);
    context.regular_selection.current = DomPosition::after(dom, node);
    ref_node
}

/// An uninterpreted inline element. Without modelled content it is copied
/// through verbatim; otherwise the content is written into it.
pub fn handle_general_segment(
    dom: &mut Dom,
    parent: NodeId,
    general: &mut ContentModelGeneralSegment,
    ref_node: Option<NodeId>,
    context: &mut ModelToDomContext<'_>,
) -> Option<NodeId> {
    let handlers = context.handlers;
    let verbatim = general.blocks.is_empty();
    let element = context.claim_element(dom, &general.element, verbatim);
    let ref_node = place_node(dom, parent, element, ref_node);
    if !verbatim {
        handlers.block_group_children(dom, element, general, context);
    }

    let implicit = context.implicit_format.clone();
    apply_segment_decorators(dom, element, &general.format, None, None, &implicit);
    context.record(NodePairKind::General, element, None);
    context.regular_selection.current = DomPosition::after(dom, element);
    ref_node
}

/// Wrap an inline node in the elements that express its format, innermost
/// first: `code`, `sub`/`sup`, `s`, `u`, `i`, `b`, a `span` for the rest,
/// then the link. Values `implicit` already provides are skipped. Returns
/// the outermost node.
pub fn apply_segment_decorators(
    dom: &mut Dom,
    node: NodeId,
    format: &Format,
    link: Option<&ContentModelLink>,
    code: Option<&ContentModelCode>,
    implicit: &Format,
) -> NodeId {
    let mut outer = node;
    if let Some(code) = code {
        outer = dom.wrap(outer, "code");
        apply_format(dom, outer, &code.format);
    }

    let mut tags: [Option<&str>; 5] = [None; 5];
    let mut style = Format::new();
    for (key, value) in format.iter() {
        if implicit.get(key) == Some(value) {
            continue;
        }
        match (key, value) {
            ("vertical-align", "sub") => tags[0] = Some("sub"),
            ("vertical-align", "super") => tags[0] = Some("sup"),
            ("text-decoration", _) => {
                for token in value.split_ascii_whitespace() {
                    if has_text_decoration(implicit, token) {
                        continue;
                    }
                    match token {
                        "line-through" => tags[1] = Some("s"),
                        "underline" => tags[2] = Some("u"),
                        _ => {}
                    }
                }
            }
            ("font-style", "italic") => tags[3] = Some("i"),
            ("font-weight", "bold") => tags[4] = Some("b"),
            _ => style.set(key, value),
        }
    }
    for tag in tags.into_iter().flatten() {
        outer = dom.wrap(outer, tag);
    }
    if !style.is_empty() {
        outer = dom.wrap(outer, "span");
        apply_format(dom, outer, &style);
    }

    if let Some(link) = link {
        outer = dom.wrap(outer, "a");
        for &name in LINK_ATTRIBUTES {
            if let Some(value) = link.format.get(name) {
                dom.set_attribute(outer, name, value);
            }
        }
        apply_dataset(dom, outer, &link.dataset);
    }
    outer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decorators_skip_implicit_values() {
        let mut dom = Dom::new();
        let root = dom.create_element("div");
        let text = dom.create_text("x");
        dom.append_child(root, text);

        let format = Format::new()
            .with("font-weight", "bold")
            .with("font-style", "italic")
            .with("text-decoration", "underline line-through")
            .with("color", "red");
        let implicit = Format::new().with("font-weight", "bold").with("text-decoration", "underline");
        let link = ContentModelLink::new("https://example.com");
        apply_segment_decorators(&mut dom, text, &format, Some(&link), None, &implicit);

        assert_eq!(
            dom.inner_html(root),
            r#"<a href="https://example.com"><span style="color: red"><i><s>x</s></i></span></a>"#
        );
    }
}
