use std::collections::HashSet;

use serde::Serialize;
use smol_str::SmolStr;
use weaver_content_dom::{Dom, DomPosition, DomRange, DomSelection, NodeId, TableSelection};

use super::handlers::{DefaultModelHandlers, ModelToDomHandlers};
use crate::format::Format;
use crate::list::ThreadItemCounts;
use crate::model::{ContentModelListLevel, ForeignElement};
use crate::options::ModelToDomOption;
use crate::paragraph_map::ParagraphMap;

const TARGET: &str = "weaver::content_model::model_to_dom";

/// A list element currently open for writing, with the level it renders.
#[derive(Clone, Debug)]
pub struct ListStackEntry {
    pub node: NodeId,
    pub level: ContentModelListLevel,
}

/// List state while writing flattened list items back as nested lists.
#[derive(Clone, Debug, Default)]
pub struct ModelToDomListFormat {
    pub thread_item_counts: ThreadItemCounts,
    /// Open list elements, outermost first.
    pub node_stack: Vec<ListStackEntry>,
}

/// Range selection collected while segments are written.
#[derive(Clone, Copy, Debug, Default)]
pub struct ModelToDomRegularSelection {
    pub start: Option<DomPosition>,
    pub end: Option<DomPosition>,
    /// Position right after the content written last.
    pub current: Option<DomPosition>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum NodePairKind {
    Paragraph,
    Table,
    Image,
    Entity,
    General,
}

/// A model node and the DOM node written for it. `key` is the paragraph
/// marker or entity id when the node has one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodePair {
    pub kind: NodePairKind,
    pub node: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<SmolStr>,
}

/// Scratch state of one model→DOM pass.
pub struct ModelToDomContext<'a> {
    pub handlers: &'a dyn ModelToDomHandlers,
    pub allow_cache_element: bool,
    pub paragraph_map: Option<&'a mut ParagraphMap>,
    pub list_format: ModelToDomListFormat,
    /// Segment format the enclosing elements already imply. Segments only
    /// write what differs from it.
    pub implicit_format: Format,
    pub regular_selection: ModelToDomRegularSelection,
    pub table_selection: Option<TableSelection>,
    pub image_selection: Option<NodeId>,
    pub node_pairs: Vec<NodePair>,
    /// Foreign elements already moved into the output during this pass.
    pub(crate) placed: HashSet<NodeId>,
    pub(crate) root: Option<NodeId>,
}

static DEFAULT_HANDLERS: DefaultModelHandlers = DefaultModelHandlers;

impl<'a> ModelToDomContext<'a> {
    pub fn new(option: &ModelToDomOption) -> Self {
        Self {
            handlers: &DEFAULT_HANDLERS,
            allow_cache_element: option.allow_cache_element,
            paragraph_map: None,
            list_format: ModelToDomListFormat::default(),
            implicit_format: Format::new(),
            regular_selection: ModelToDomRegularSelection::default(),
            table_selection: None,
            image_selection: None,
            node_pairs: vec![],
            placed: HashSet::new(),
            root: None,
        }
    }

    /// Replace the handler registry.
    pub fn with_handlers(mut self, handlers: &'a dyn ModelToDomHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn with_paragraph_map(mut self, paragraph_map: &'a mut ParagraphMap) -> Self {
        self.paragraph_map = Some(paragraph_map);
        self
    }

    /// Run `f` with `implicit` as the implied segment format, restoring the
    /// previous one afterwards.
    pub fn with_implicit_format<R>(&mut self, implicit: Format, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = std::mem::replace(&mut self.implicit_format, implicit);
        let result = f(self);
        self.implicit_format = saved;
        result
    }

    pub fn record(&mut self, kind: NodePairKind, node: NodeId, key: Option<&str>) {
        self.node_pairs.push(NodePair {
            kind,
            node,
            key: key.map(SmolStr::new),
        });
    }

    /// Take ownership of a foreign element (entity wrapper, general node)
    /// for the output. The element itself is moved the first time; a copy
    /// is used when it was already placed in this pass or still belongs
    /// to a tree outside the one being written. When the handle does not
    /// name the element in `dom` at all, it is rebuilt from its markup.
    pub(crate) fn claim_element(&mut self, dom: &mut Dom, foreign: &ForeignElement, deep: bool) -> NodeId {
        let Some(element) = foreign.resolve(dom) else {
            tracing::debug!(target: TARGET, tag = foreign.tag(), "rebuilding foreign element from markup");
            let rebuilt = foreign.rebuild(dom);
            if !deep {
                dom.clear_children(rebuilt);
            }
            self.placed.insert(rebuilt);
            return rebuilt;
        };
        let attached_elsewhere = dom.parent(element).is_some()
            && self.root.is_some_and(|root| !dom.contains(root, element));
        if self.placed.contains(&element) || attached_elsewhere {
            let copy = if deep {
                dom.deep_clone(element)
            } else {
                dom.shallow_clone(element)
            };
            self.placed.insert(copy);
            copy
        } else {
            self.placed.insert(element);
            element
        }
    }

    /// The selection to restore: a table selection wins over an image
    /// selection, which wins over a range.
    pub fn resolve_selection(&self) -> Option<DomSelection> {
        if let Some(table) = self.table_selection {
            return Some(DomSelection::Table(table));
        }
        if let Some(image) = self.image_selection {
            return Some(DomSelection::Image { image });
        }
        let ModelToDomRegularSelection { start, end, .. } = self.regular_selection;
        let start = start?;
        Some(DomSelection::Range {
            range: DomRange::new(start, end.unwrap_or(start)),
        })
    }
}
