//! weaver-content-model: a structured content model for rich text editing.
//!
//! This crate provides:
//! - the content model tree (`ContentModelDocument` and its blocks,
//!   block groups and segments)
//! - `dom_to_model` - reads a DOM subtree and its selection into a model
//! - `model_to_dom` - writes a model back, reusing cached elements and
//!   restoring the selection
//! - list numbering shared by both directions
//! - `table` - structural table editing on the row/cell matrix
//! - `ParagraphMap` - paragraph identity across passes and peers
//! - metadata definitions and validation for `data-editing-info`
//! - `CoauthoringServer` - bounded version history for peer updates
//!
//! `ContentModelEditor` ties the pieces together for hosts that just want
//! "read, edit under a callback, write back".

pub mod coauthoring;
pub mod definition;
pub mod dom_to_model;
pub mod editor;
pub mod entity;
pub mod error;
pub mod format;
pub mod list;
pub mod metadata;
pub mod model;
pub mod model_to_dom;
pub mod normalize;
pub mod options;
pub mod paragraph_map;
pub mod query;
pub mod table;

pub use coauthoring::{CoauthoringServer, CoauthoringUpdate, DocumentVersion};
pub use definition::{Definition, validate};
pub use dom_to_model::{
    DefaultProcessors, DomToModelContext, DomToModelProcessors, ReducedModelProcessors,
    dom_to_content_model, dom_to_content_model_with_option,
};
pub use editor::{ContentModelEditor, format_content_model};
pub use error::{ContentModelError, Result};
pub use format::{Dataset, Format, FormatFamily};
pub use model::{
    BlockGroupType, ContentModelBlock, ContentModelBlockGroup, ContentModelDocument,
    ContentModelParagraph, ContentModelSegment, ContentModelTable, ContentModelTableCell,
};
pub use model_to_dom::{
    DefaultModelHandlers, ModelToDomContext, ModelToDomHandlers, ModelToDomOutput,
    content_model_to_dom, content_model_to_fragment,
};
pub use normalize::normalize_content_model;
pub use options::{DomToModelOption, EditorOptions, ModelToDomOption};
pub use paragraph_map::ParagraphMap;
pub use smol_str::SmolStr;
pub use weaver_content_dom as dom;
