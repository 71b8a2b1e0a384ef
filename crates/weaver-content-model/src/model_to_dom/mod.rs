//! Content model → DOM conversion.
//!
//! Blocks are written into an existing container, reusing the elements
//! cached on model nodes and removing whatever the model no longer has.
//! As with the reverse direction, each node kind goes through a
//! [`ModelToDomHandlers`] registry that hosts can override piecemeal.

mod block;
mod context;
mod handlers;
mod list;
mod paragraph;
mod segment;
mod table;

use weaver_content_dom::{Dom, DomSelection, NodeId};

pub use block::{
    apply_dataset, apply_format, handle_block, handle_block_group_children, handle_divider,
    handle_entity, handle_format_container, handle_general_block, reuse_cached_element,
};
pub use context::{
    ListStackEntry, ModelToDomContext, ModelToDomListFormat, ModelToDomRegularSelection, NodePair,
    NodePairKind,
};
pub use handlers::{DefaultModelHandlers, ModelToDomHandlers};
pub use list::{handle_list, handle_list_item};
pub use paragraph::handle_paragraph;
pub use segment::{
    apply_segment_decorators, handle_br, handle_general_segment, handle_image, handle_segment,
    handle_text,
};
pub use table::handle_table;

use crate::model::ContentModelDocument;
use crate::options::ModelToDomOption;

const TARGET: &str = "weaver::content_model::model_to_dom";

/// What a model→DOM pass produced.
#[derive(Clone, Debug)]
pub struct ModelToDomOutput {
    pub root: NodeId,
    /// Selection to restore, if the model had one.
    pub selection: Option<DomSelection>,
    /// DOM nodes written for paragraphs, tables, images, entities and
    /// general nodes, in document order.
    pub node_pairs: Vec<NodePair>,
}

/// Write `model` into `root`, replacing its current children.
pub fn content_model_to_dom(
    dom: &mut Dom,
    root: NodeId,
    model: &mut ContentModelDocument,
    context: &mut ModelToDomContext<'_>,
) -> ModelToDomOutput {
    context.root = Some(root);
    let handlers = context.handlers;
    handlers.block_group_children(dom, root, model, context);

    let selection = context.resolve_selection();
    tracing::debug!(
        target: TARGET,
        blocks = model.blocks.len(),
        has_selection = selection.is_some(),
        "converted content model to dom"
    );
    ModelToDomOutput {
        root,
        selection,
        node_pairs: std::mem::take(&mut context.node_pairs),
    }
}

/// Render a detached copy of `model` into a new fragment. Cached elements
/// are neither used nor recorded, so the model stays bound to its editor.
///
/// `dom` need not be the tree the model was read from: entity wrappers and
/// general elements whose handles do not resolve in it are rebuilt from
/// their markup snapshots.
pub fn content_model_to_fragment(dom: &mut Dom, model: &ContentModelDocument) -> ModelToDomOutput {
    let mut model = model.clone();
    let fragment = dom.create_fragment();
    let option = ModelToDomOption {
        allow_cache_element: false,
    };
    let mut context = ModelToDomContext::new(&option);
    content_model_to_dom(dom, fragment, &mut model, &mut context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Format;
    use crate::model::{
        ContentModelBlock, ContentModelDivider, ContentModelParagraph,
        ContentModelParagraphDecorator, ContentModelSegment,
    };
    use pretty_assertions::assert_eq;

    fn paragraph(text: &str) -> ContentModelParagraph {
        let mut paragraph = ContentModelParagraph::new(false, Format::new());
        paragraph.add_segment(ContentModelSegment::text(text, Format::new()));
        paragraph
    }

    #[test]
    fn test_foreign_handles_are_rebuilt_from_markup() {
        let html = r#"<div class="_Entity _EType_chart">chart</div><div>x<svg viewBox="0 0 1 1"></svg></div>"#;
        let mut source = Dom::new();
        let root = source.create_element("div");
        source.set_inner_html(root, html);
        let model = crate::dom_to_content_model_with_option(
            &source,
            root,
            &crate::options::DomToModelOption::default(),
        );

        // Too small for the source handles.
        let mut empty = Dom::new();
        let output = content_model_to_fragment(&mut empty, &model);
        assert_eq!(empty.inner_html(output.root), html);

        // Large enough that the same indices name unrelated nodes.
        let filler = "<span>filler</span>".repeat(20);
        let mut busy = Dom::new();
        let other = busy.create_element("div");
        busy.set_inner_html(other, &filler);
        let output = content_model_to_fragment(&mut busy, &model);
        assert_eq!(busy.inner_html(output.root), html);
        assert_eq!(busy.inner_html(other), filler);
    }

    #[test]
    fn test_writes_blocks_and_replaces_children() {
        let mut dom = Dom::new();
        let root = dom.create_element("div");
        dom.set_inner_html(root, "<p>old</p>");

        let mut model = ContentModelDocument::new();
        let mut heading = ContentModelParagraph::new(false, Format::new())
            .with_decorator(ContentModelParagraphDecorator::new("h1"));
        heading.add_segment(ContentModelSegment::text(
            "Title",
            Format::new().with("font-weight", "bold"),
        ));
        model.blocks.push(ContentModelBlock::Paragraph(heading));
        model
            .blocks
            .push(ContentModelBlock::Divider(ContentModelDivider::new("hr", Format::new())));
        model.blocks.push(ContentModelBlock::Paragraph(paragraph("body")));

        let mut context = ModelToDomContext::new(&ModelToDomOption::default());
        let output = content_model_to_dom(&mut dom, root, &mut model, &mut context);

        assert_eq!(dom.inner_html(root), "<h1>Title</h1><hr><div>body</div>");
        assert!(output.selection.is_none());
        assert_eq!(
            output
                .node_pairs
                .iter()
                .filter(|pair| pair.kind == NodePairKind::Paragraph)
                .count(),
            2
        );
    }

    #[test]
    fn test_cached_paragraph_is_reused() {
        let mut dom = Dom::new();
        let root = dom.create_element("div");
        let mut model = ContentModelDocument::new();
        model.blocks.push(ContentModelBlock::Paragraph(paragraph("a")));
        model.blocks.push(ContentModelBlock::Paragraph(paragraph("b")));

        let mut context = ModelToDomContext::new(&ModelToDomOption::default());
        content_model_to_dom(&mut dom, root, &mut model, &mut context);
        let first = dom.children(root).to_vec();

        model.blocks.remove(0);
        let mut context = ModelToDomContext::new(&ModelToDomOption::default());
        content_model_to_dom(&mut dom, root, &mut model, &mut context);

        assert_eq!(dom.children(root), &first[1..]);
        assert_eq!(dom.inner_html(root), "<div>b</div>");
    }

    #[test]
    fn test_range_selection_is_resolved() {
        let mut dom = Dom::new();
        let mut model = ContentModelDocument::new();
        let mut paragraph = ContentModelParagraph::new(true, Format::new());
        paragraph.add_segment(ContentModelSegment::text("ab", Format::new()));
        let mut marker = ContentModelSegment::selection_marker(Format::new());
        marker.set_selected(true);
        paragraph.add_segment(marker);
        model.blocks.push(ContentModelBlock::Paragraph(paragraph));

        let output = content_model_to_fragment(&mut dom, &model);
        let Some(DomSelection::Range { range }) = &output.selection else {
            panic!("expected a range selection, got {:?}", output.selection);
        };
        assert!(range.is_collapsed());
        let text = dom.children(output.root)[0];
        assert_eq!(range.start.node, text);
        assert_eq!(range.start.offset, 2);
    }
}
