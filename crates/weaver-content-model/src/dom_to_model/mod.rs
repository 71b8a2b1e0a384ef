//! DOM → content model conversion.
//!
//! A recursive walk over the DOM below a root element. Every node is
//! dispatched through a [`DomToModelProcessors`] registry, so hosts can swap
//! the handling of any category (tables, links, entities...) without
//! touching the rest of the walk. The pass only reads the DOM.

mod block;
mod child;
mod context;
mod element;
mod entity;
mod inline;
mod list;
mod processors;
mod reduced;
mod table;
mod text;

use weaver_content_dom::{Dom, NodeId};

pub use block::{process_block, process_divider, process_format_container, process_general_block};
pub use child::{
    add_segment, handle_regular_selection, process_child_node, process_children, with_paragraph,
};
pub use context::{DomToModelContext, DomToModelListFormat};
pub use element::{OPAQUE_TAGS, process_element};
pub use entity::{process_entity, process_fake_entity};
pub use inline::{
    process_br, process_code, process_format_element, process_general_segment, process_image,
    process_link,
};
pub use list::{process_list, process_list_item};
pub use processors::{DefaultProcessors, DomToModelProcessors};
pub use reduced::ReducedModelProcessors;
pub use table::process_table;
pub use text::{collapse_white_space, process_text};

use crate::model::ContentModelDocument;
use crate::normalize::{normalize_content_model, normalize_content_model_keeping_placeholders};
use crate::options::DomToModelOption;

const TARGET: &str = "weaver::content_model::dom_to_model";

/// Build a normalized content model from the children of `root`.
pub fn dom_to_content_model(root: NodeId, context: &mut DomToModelContext<'_>) -> ContentModelDocument {
    let dom = context.dom;
    if let Some(selection) = context.selection {
        if !selection.intersects(dom, root) {
            tracing::warn!(target: TARGET, ?selection, "selection is outside the converted tree");
        }
    }

    let mut document = ContentModelDocument::new();
    let processors = context.processors;
    processors.child(&mut document, root, context);

    // Reduced passes keep their placeholders.
    if context.reduced && context.selection_root.is_some() {
        normalize_content_model_keeping_placeholders(&mut document);
    } else {
        normalize_content_model(&mut document);
    }

    tracing::debug!(
        target: TARGET,
        blocks = document.blocks.len(),
        reduced = context.reduced,
        "converted dom to content model"
    );
    document
}

/// One-off pass with the registry the option selects, and no selection or
/// paragraph map.
pub fn dom_to_content_model_with_option(
    dom: &Dom,
    root: NodeId,
    option: &DomToModelOption,
) -> ContentModelDocument {
    let mut context = DomToModelContext::new(dom, option);
    dom_to_content_model(root, &mut context)
}
