use weaver_content_dom::style::{format_px, parse_px};
use weaver_content_dom::{DomSelection, NodeId};

use super::DomToModelContext;
use super::child::{add_segment, handle_opaque_selection};
use crate::format::{
    Format, FormatFamily, implicit_segment_format, merge_implicit_segment_format,
    parse_declarations,
};
use crate::model::{
    ContentModelBlockGroup, ContentModelBr, ContentModelCode, ContentModelGeneralSegment,
    ContentModelImage, ContentModelLink, ContentModelSegment, ForeignElement,
};

/// Link attributes kept in the link format besides `href`.
const LINK_ATTRIBUTES: &[&str] = &["target", "title", "rel"];

/// Inline formatting elements. The tag's implied format and the inline
/// style are merged into the running segment format for the children.
pub fn process_format_element(
    group: &mut dyn ContentModelBlockGroup,
    element: NodeId,
    context: &mut DomToModelContext<'_>,
) {
    let dom = context.dom;
    let processors = context.processors;
    let tag = dom.tag(element).unwrap_or_default();

    context.stack_format(|context| {
        merge_implicit_segment_format(&mut context.segment_format, &implicit_segment_format(tag));
        if tag == "font" {
            if let Some(color) = dom.attribute(element, "color") {
                context.segment_format.set("color", color);
            }
            if let Some(face) = dom.attribute(element, "face") {
                context.segment_format.set("font-family", face);
            }
        }
        parse_declarations(&dom.style(element), FormatFamily::Segment, &mut context.segment_format);
        processors.child(group, element, context);
    });
}

/// `<a>`: children inherit the link. An anchor without `href` is only a
/// formatting container.
pub fn process_link(
    group: &mut dyn ContentModelBlockGroup,
    element: NodeId,
    context: &mut DomToModelContext<'_>,
) {
    let dom = context.dom;
    let Some(href) = dom.attribute(element, "href") else {
        return process_format_element(group, element, context);
    };
    let processors = context.processors;

    let mut link = ContentModelLink::new(href);
    for &name in LINK_ATTRIBUTES {
        if let Some(value) = dom.attribute(element, name) {
            link.format.set(name, value);
        }
    }
    link.dataset = dom.dataset(element);

    context.stack_format(|context| {
        context.link = Some(link);
        parse_declarations(&dom.style(element), FormatFamily::Segment, &mut context.segment_format);
        processors.child(group, element, context);
    });
}

/// `<code>`: its own style belongs to the code decoration, not the text.
pub fn process_code(
    group: &mut dyn ContentModelBlockGroup,
    element: NodeId,
    context: &mut DomToModelContext<'_>,
) {
    let dom = context.dom;
    let processors = context.processors;
    let mut format = Format::new();
    parse_declarations(&dom.style(element), FormatFamily::Segment, &mut format);

    context.stack_format(|context| {
        context.code = Some(ContentModelCode { format });
        processors.child(group, element, context);
    });
}

pub fn process_image(
    group: &mut dyn ContentModelBlockGroup,
    element: NodeId,
    context: &mut DomToModelContext<'_>,
) {
    let dom = context.dom;

    let mut format = context.segment_format.clone();
    let mut size = Format::new();
    parse_declarations(&dom.style(element), FormatFamily::Image, &mut size);
    for dimension in ["width", "height"] {
        if size.contains(dimension) {
            continue;
        }
        if let Some(px) = dom.attribute(element, dimension).and_then(parse_px) {
            size.set(dimension, format_px(px));
        }
    }
    format.merge(&size);

    let mut image = ContentModelImage::new(dom.attribute(element, "src").unwrap_or_default(), format);
    image.alt = dom.attribute(element, "alt").map(str::to_string);
    image.title = dom.attribute(element, "title").map(str::to_string);
    image.dataset = dom.dataset(element);
    image.link = context.link.clone();
    image.is_selected = context.is_in_selection;
    if let Some(DomSelection::Image { image: selected }) = context.selection {
        if selected == element {
            image.is_selected = true;
            image.is_selected_as_image_selection = true;
        }
    }
    add_segment(group, ContentModelSegment::Image(image), context);
}

pub fn process_br(
    group: &mut dyn ContentModelBlockGroup,
    _element: NodeId,
    context: &mut DomToModelContext<'_>,
) {
    let br = ContentModelBr {
        format: context.segment_format.clone(),
        is_selected: context.is_in_selection,
    };
    add_segment(group, ContentModelSegment::Br(br), context);
}

/// Opaque inline element, carried through without looking inside.
pub fn process_general_segment(
    group: &mut dyn ContentModelBlockGroup,
    element: NodeId,
    context: &mut DomToModelContext<'_>,
) {
    let mut segment = ContentModelGeneralSegment::new(
        ForeignElement::capture(context.dom, element),
        context.segment_format.clone(),
    );
    segment.is_selected = handle_opaque_selection(element, context);
    add_segment(group, ContentModelSegment::General(segment), context);
}
