use weaver_content_dom::NodeId;

use super::DomToModelContext;
use crate::format::{
    Format, FormatFamily, implicit_segment_format, merge_implicit_segment_format,
    parse_declarations, preserves_white_space,
};
use crate::model::{
    CachedElement, ContentModelBlock, ContentModelBlockGroup, ContentModelDivider,
    ContentModelFormatContainer, ContentModelGeneralBlock, ContentModelParagraph,
    ContentModelParagraphDecorator, ForeignElement,
};

const TARGET: &str = "weaver::content_model::dom_to_model";

fn is_heading(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// `div`, `p`, headings, and stray `li` elements.
///
/// The element opens a paragraph with its own block format; nothing is
/// inherited from enclosing blocks. Inline content that follows the
/// element goes into a fresh implicit paragraph.
pub fn process_block(
    group: &mut dyn ContentModelBlockGroup,
    element: NodeId,
    context: &mut DomToModelContext<'_>,
) {
    let dom = context.dom;
    let processors = context.processors;
    let tag = dom.tag(element).unwrap_or("div");

    context.stack_format(|context| {
        let style = dom.style(element);
        let mut block_format = Format::new();
        parse_declarations(&style, FormatFamily::Block, &mut block_format);
        if preserves_white_space(&block_format) {
            context.preserve_white_space = true;
        }

        let decorator = (tag == "p" || is_heading(tag)).then(|| ContentModelParagraphDecorator::new(tag));
        if is_heading(tag) {
            merge_implicit_segment_format(&mut context.segment_format, &implicit_segment_format(tag));
        }
        parse_declarations(&style, FormatFamily::Segment, &mut context.segment_format);
        context.block_format = block_format.clone();

        let mut paragraph = ContentModelParagraph::new(false, block_format);
        paragraph.decorator = decorator;

        let index = group.blocks().len();
        group.add_block(ContentModelBlock::Paragraph(paragraph));
        processors.child(group, element, context);

        // Only a paragraph that is still the last block maps 1:1 to the element.
        let maps_to_element = group.blocks().len() == index + 1;
        if let Some(ContentModelBlock::Paragraph(paragraph)) = group.blocks_mut().get_mut(index) {
            if maps_to_element && context.allow_cache_element {
                paragraph.cached_element = CachedElement::new(element);
            }
            if let Some(paragraph_map) = context.paragraph_map.as_deref_mut() {
                paragraph_map.assign_marker_to_model(element, paragraph);
            }
        }
    });

    group.add_block(ContentModelBlock::Paragraph(ContentModelParagraph::new(
        true,
        context.block_format.clone(),
    )));
}

/// `blockquote` and `pre`: a group carrying block format for everything
/// inside it.
pub fn process_format_container(
    group: &mut dyn ContentModelBlockGroup,
    element: NodeId,
    context: &mut DomToModelContext<'_>,
) {
    let dom = context.dom;
    let processors = context.processors;
    let tag = dom.tag(element).unwrap_or("blockquote");
    let style = dom.style(element);

    let mut format = Format::new();
    parse_declarations(&style, FormatFamily::Block, &mut format);
    let mut container = ContentModelFormatContainer::new(tag, format);

    context.stack_format(|context| {
        context.block_format = Format::new();
        if tag == "pre" || preserves_white_space(&container.format) {
            context.preserve_white_space = true;
        }
        parse_declarations(&style, FormatFamily::Segment, &mut context.segment_format);
        context.isolate_list_format(|context| {
            processors.child(&mut container, element, context);
        });
    });

    group.add_block(ContentModelBlock::FormatContainer(container));
}

/// A block element with no model counterpart. The element is kept as-is
/// and its children are modelled inside it.
pub fn process_general_block(
    group: &mut dyn ContentModelBlockGroup,
    element: NodeId,
    context: &mut DomToModelContext<'_>,
) {
    let processors = context.processors;
    tracing::trace!(
        target: TARGET,
        tag = context.dom.tag(element).unwrap_or_default(),
        "general block"
    );

    let mut general = ContentModelGeneralBlock::new(ForeignElement::capture_shallow(context.dom, element));
    context.stack_format(|context| {
        context.block_format = Format::new();
        context.isolate_list_format(|context| {
            processors.child(&mut general, element, context);
        });
    });
    group.add_block(ContentModelBlock::General(general));
}

pub fn process_divider(
    group: &mut dyn ContentModelBlockGroup,
    element: NodeId,
    context: &mut DomToModelContext<'_>,
) {
    let dom = context.dom;
    let mut format = Format::new();
    parse_declarations(&dom.style(element), FormatFamily::Block, &mut format);

    let mut divider = ContentModelDivider::new(dom.tag(element).unwrap_or("hr"), format);
    divider.is_selected = context.is_in_selection;
    if context.allow_cache_element {
        divider.cached_element = CachedElement::new(element);
    }
    group.add_block(ContentModelBlock::Divider(divider));
}
