//! DOM positions, ranges and the selection shapes an editor can hold.

use serde::Serialize;

use crate::dom::Dom;
use crate::node::NodeId;

/// A boundary point: a node plus an offset.
///
/// For text nodes the offset counts `char`s into the text. For other nodes
/// it is a child index, with `offset == child_count` meaning "after the last
/// child".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct DomPosition {
    pub node: NodeId,
    pub offset: usize,
}

impl DomPosition {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }

    /// Position directly before `node` in its parent.
    pub fn before(dom: &Dom, node: NodeId) -> Option<Self> {
        Some(Self::new(dom.parent(node)?, dom.index_in_parent(node)?))
    }

    /// Position directly after `node` in its parent.
    pub fn after(dom: &Dom, node: NodeId) -> Option<Self> {
        Some(Self::new(dom.parent(node)?, dom.index_in_parent(node)? + 1))
    }

    /// Position at the end of a node's content.
    pub fn end_of(dom: &Dom, node: NodeId) -> Self {
        match dom.text(node) {
            Some(text) => Self::new(node, text.chars().count()),
            None => Self::new(node, dom.child_count(node)),
        }
    }
}

/// A start/end pair of boundary points. Collapsed when both are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct DomRange {
    pub start: DomPosition,
    pub end: DomPosition,
}

impl DomRange {
    pub fn new(start: DomPosition, end: DomPosition) -> Self {
        Self { start, end }
    }

    pub fn collapsed(position: DomPosition) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Deepest node that contains both boundary points.
    pub fn common_ancestor_container(&self, dom: &Dom) -> Option<NodeId> {
        dom.common_ancestor(self.start.node, self.end.node)
    }
}

/// Cell coordinates of a table selection, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TableSelection {
    pub table: NodeId,
    pub first_column: usize,
    pub first_row: usize,
    pub last_column: usize,
    pub last_row: usize,
}

/// One of the selection shapes an editor surface can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type")]
pub enum DomSelection {
    /// A caret or a regular text range.
    Range { range: DomRange },
    /// A rectangular block of table cells.
    Table(TableSelection),
    /// A single image selected as an object.
    Image { image: NodeId },
}

impl DomSelection {
    /// The node the selection is rooted at: the common ancestor of a range,
    /// the table of a table selection, or the selected image.
    pub fn root_node(&self, dom: &Dom) -> Option<NodeId> {
        match self {
            DomSelection::Range { range } => range.common_ancestor_container(dom),
            DomSelection::Table(table) => Some(table.table),
            DomSelection::Image { image } => Some(*image),
        }
    }

    /// Whether any part of the selection lies inside `node`.
    pub fn intersects(&self, dom: &Dom, node: NodeId) -> bool {
        match self {
            DomSelection::Range { range } => {
                dom.contains(node, range.start.node) || dom.contains(node, range.end.node)
            }
            DomSelection::Table(table) => dom.contains(node, table.table),
            DomSelection::Image { image } => dom.contains(node, *image),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_around_node() {
        let mut dom = Dom::new();
        let root = dom.create_element("div");
        let a = dom.create_text("abc");
        let b = dom.create_element("br");
        dom.append_child(root, a);
        dom.append_child(root, b);

        assert_eq!(DomPosition::before(&dom, b), Some(DomPosition::new(root, 1)));
        assert_eq!(DomPosition::after(&dom, b), Some(DomPosition::new(root, 2)));
        assert_eq!(DomPosition::end_of(&dom, a), DomPosition::new(a, 3));
        assert_eq!(DomPosition::before(&dom, root), None);
    }

    #[test]
    fn test_selection_root_and_intersection() {
        let mut dom = Dom::new();
        let root = dom.create_element("div");
        let p1 = dom.create_element("p");
        let p2 = dom.create_element("p");
        let t1 = dom.create_text("one");
        let t2 = dom.create_text("two");
        dom.append_child(root, p1);
        dom.append_child(root, p2);
        dom.append_child(p1, t1);
        dom.append_child(p2, t2);

        let selection = DomSelection::Range {
            range: DomRange::new(DomPosition::new(t1, 1), DomPosition::new(t2, 2)),
        };
        assert_eq!(selection.root_node(&dom), Some(root));
        assert!(selection.intersects(&dom, p2));

        let caret = DomSelection::Range {
            range: DomRange::collapsed(DomPosition::new(t1, 0)),
        };
        assert!(!caret.intersects(&dom, p2));
    }
}
