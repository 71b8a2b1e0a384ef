//! weaver-content-dom: the DOM the content model converters read and write.
//!
//! This crate provides:
//! - `Dom` - an arena that owns every node of an editable surface
//! - `NodeId` - a copyable handle into that arena
//! - HTML fragment parsing and serialization for hosts and tests
//! - `DomPosition`, `DomRange` and `DomSelection` for the selection shapes
//!   (caret/range, table cells, image) the converters thread through
//!
//! The converters never hang engine state off nodes. Anything that needs to
//! survive between passes (paragraph markers, cached elements) lives in side
//! tables keyed by `NodeId`.

pub mod dom;
pub mod html;
pub mod node;
pub mod selection;
pub mod style;

pub use dom::Dom;
pub use node::{ElementData, NodeId, NodeKind, is_block_tag, is_void_element};
pub use selection::{DomPosition, DomRange, DomSelection, TableSelection};
