//! The content model: a tagged tree of block groups, blocks and segments.
//!
//! Every node owns its children outright. DOM references are plain
//! [`NodeId`] handles, or a [`ForeignElement`] for elements carried through
//! uninterpreted; the model never reaches into the DOM on its own.

mod block;
mod group;
mod list;
mod segment;
mod table;

use serde::Serialize;
use smol_str::SmolStr;
use weaver_content_dom::{Dom, NodeId};

pub use block::{
    ContentModelBlock, ContentModelDivider, ContentModelEntity, ContentModelParagraph,
    ContentModelParagraphDecorator, EntityFormat,
};
pub use group::{
    BlockGroupType, ContentModelBlockGroup, ContentModelDocument, ContentModelFormatContainer,
    ContentModelGeneralBlock,
};
pub use list::{ContentModelListItem, ContentModelListLevel, ListType};
pub use segment::{
    ContentModelBr, ContentModelCode, ContentModelGeneralSegment, ContentModelImage,
    ContentModelLink, ContentModelSegment, ContentModelSelectionMarker, ContentModelText,
    SegmentType,
};
pub use table::{ContentModelTable, ContentModelTableCell, ContentModelTableRow};

/// Element the model carries without interpreting it: an entity wrapper or
/// a general node.
///
/// Besides the handle it was read from, it keeps a markup snapshot so the
/// element can be rebuilt when the model is written into a different
/// [`Dom`] than the one it was read from. Equality compares the snapshot.
#[derive(Clone, Debug, Serialize)]
pub struct ForeignElement {
    #[serde(skip)]
    node: Option<NodeId>,
    tag: SmolStr,
    html: String,
    /// Whether `html` includes the element's children.
    #[serde(skip)]
    deep: bool,
}

impl ForeignElement {
    /// Snapshot `node` together with its content.
    pub fn capture(dom: &Dom, node: NodeId) -> Self {
        Self {
            node: Some(node),
            tag: dom.tag(node).unwrap_or("span").into(),
            html: dom.outer_html(node),
            deep: true,
        }
    }

    /// Snapshot `node` alone, for elements whose content is modelled.
    pub fn capture_shallow(dom: &Dom, node: NodeId) -> Self {
        Self {
            node: Some(node),
            tag: dom.tag(node).unwrap_or("span").into(),
            html: dom.shallow_outer_html(node),
            deep: false,
        }
    }

    /// An element known only by its markup, such as one built by a host.
    pub fn from_html(html: impl Into<String>) -> Self {
        let html = html.into();
        let tag = html
            .strip_prefix('<')
            .and_then(|rest| rest.split(|c: char| c.is_whitespace() || c == '>' || c == '/').next())
            .filter(|tag| !tag.is_empty())
            .unwrap_or("span")
            .to_ascii_lowercase();
        Self {
            node: None,
            tag: tag.into(),
            html,
            deep: true,
        }
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn is_deep(&self) -> bool {
        self.deep
    }

    /// The handle, when it still names this element in `dom`: in bounds and
    /// serializing to the snapshot. A handle from another tree, or one whose
    /// node has changed since, does not resolve.
    pub fn resolve(&self, dom: &Dom) -> Option<NodeId> {
        let node = self.node.filter(|&node| dom.contains_node(node) && dom.is_element(node))?;
        let current = if self.deep {
            dom.outer_html(node)
        } else {
            dom.shallow_outer_html(node)
        };
        (current == self.html).then_some(node)
    }

    /// Build a fresh, detached copy of the element in `dom` from the
    /// snapshot. Markup the fragment parser cannot hold on its own (a
    /// stray `<td>`, say) falls back to an empty element with the same tag.
    pub fn rebuild(&self, dom: &mut Dom) -> NodeId {
        let fragment = dom.parse_fragment(&self.html);
        let parsed = dom
            .children(fragment)
            .iter()
            .copied()
            .find(|&child| dom.has_tag(child, &self.tag));
        match parsed {
            Some(element) => {
                dom.remove(element);
                element
            }
            None => dom.create_element(&self.tag),
        }
    }
}

impl PartialEq for ForeignElement {
    fn eq(&self, other: &Self) -> bool {
        self.html == other.html
    }
}

/// DOM element produced for (or read into) a model node by an earlier pass.
///
/// Model→DOM may reuse it instead of building new markup. The handle is not
/// part of the node's content, so it never affects equality and is never
/// serialized.
#[derive(Clone, Copy, Debug, Default)]
pub struct CachedElement(Option<NodeId>);

impl CachedElement {
    pub fn new(element: NodeId) -> Self {
        Self(Some(element))
    }

    pub fn get(&self) -> Option<NodeId> {
        self.0
    }

    pub fn set(&mut self, element: Option<NodeId>) {
        self.0 = element;
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

impl PartialEq for CachedElement {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl From<Option<NodeId>> for CachedElement {
    fn from(value: Option<NodeId>) -> Self {
        Self(value)
    }
}

/// Identity token tying a paragraph to "the same" paragraph across passes
/// and peers. Ignored by equality like [`CachedElement`].
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct ParagraphMarker(Option<SmolStr>);

impl ParagraphMarker {
    pub fn get(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn set(&mut self, marker: Option<SmolStr>) {
        self.0 = marker;
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    pub(crate) fn is_unset(&self) -> bool {
        self.0.is_none()
    }
}

impl PartialEq for ParagraphMarker {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}
