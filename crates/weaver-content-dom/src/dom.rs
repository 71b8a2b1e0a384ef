//! The arena that owns every node of an editable surface.

use std::collections::BTreeMap;

use smol_str::SmolStr;

use crate::node::{ElementData, NodeData, NodeId, NodeKind};
use crate::style;

/// Arena-backed DOM tree.
///
/// A single `Dom` owns all nodes of one editable surface. Nodes are never
/// freed: removal detaches a subtree, and the detached handles can be
/// re-inserted. This mirrors how a live browser DOM keeps detached nodes
/// alive while script holds a reference to them.
#[derive(Clone, Debug, Default)]
pub struct Dom {
    nodes: Vec<NodeData>,
}

impl Dom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever allocated in this arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check that a handle belongs to this arena.
    pub fn contains_node(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(NodeData::new(kind));
        NodeId(self.nodes.len() - 1)
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    // === Creation ===

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element(ElementData::new(tag)))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Comment(text.into()))
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.alloc(NodeKind::Fragment)
    }

    /// Copy a node without its children. Attributes are copied verbatim.
    pub fn shallow_clone(&mut self, id: NodeId) -> NodeId {
        let kind = self.data(id).kind.clone();
        self.alloc(kind)
    }

    /// Copy a node and its whole subtree. The copy is detached.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let copy = self.shallow_clone(id);
        let children = self.data(id).children.clone();
        for child in children {
            let child_copy = self.deep_clone(child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    // === Node inspection ===

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.data(id).kind
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.data(id).kind, NodeKind::Element(_))
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.data(id).kind, NodeKind::Text(_))
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.data(id).kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.data_mut(id).kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Lowercase tag name, or `None` for non-element nodes.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    pub fn has_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag(id) == Some(tag)
    }

    /// Text of a text node, `None` for other kinds.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.data(id).kind {
            NodeKind::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn set_text(&mut self, id: NodeId, value: impl Into<String>) {
        if let NodeKind::Text(text) = &mut self.data_mut(id).kind {
            *text = value.into();
        }
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(text) = self.text(node) {
                out.push_str(text);
            }
        }
        out
    }

    // === Attributes ===

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.attribute(name))
    }

    pub fn attributes(&self, id: NodeId) -> &[(SmolStr, String)] {
        self.element(id).map(|e| e.attrs.as_slice()).unwrap_or(&[])
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(element) = self.element_mut(id) {
            element.set_attribute(name, value);
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.element_mut(id).and_then(|e| e.remove_attribute(name))
    }

    pub fn classes(&self, id: NodeId) -> impl Iterator<Item = &str> {
        self.attribute(id, "class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).any(|c| c == class)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        let value = match self.attribute(id, "class") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{} {}", existing.trim(), class)
            }
            _ => class.to_string(),
        };
        self.set_attribute(id, "class", value);
    }

    /// Parsed inline style declarations in source order.
    pub fn style(&self, id: NodeId) -> Vec<(SmolStr, String)> {
        self.attribute(id, "style")
            .map(style::parse_style)
            .unwrap_or_default()
    }

    pub fn style_property(&self, id: NodeId, name: &str) -> Option<String> {
        self.style(id)
            .into_iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Set (or with an empty value, remove) one inline style declaration.
    pub fn set_style_property(&mut self, id: NodeId, name: &str, value: &str) {
        let mut declarations = self.style(id);
        declarations.retain(|(key, _)| key != name);
        if !value.is_empty() {
            declarations.push((SmolStr::new(name), value.to_string()));
        }
        self.write_style(id, &declarations);
    }

    pub fn write_style(&mut self, id: NodeId, declarations: &[(SmolStr, String)]) {
        if declarations.is_empty() {
            self.remove_attribute(id, "style");
        } else {
            self.set_attribute(id, "style", style::write_style(declarations));
        }
    }

    /// `data-*` attributes keyed the way `HTMLElement.dataset` does (camelCase).
    pub fn dataset(&self, id: NodeId) -> BTreeMap<SmolStr, String> {
        self.attributes(id)
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix("data-")
                    .map(|name| (style::data_key_to_camel(name), value.clone()))
            })
            .collect()
    }

    pub fn set_data(&mut self, id: NodeId, key: &str, value: impl Into<String>) {
        let attr = format!("data-{}", style::camel_to_data_key(key));
        self.set_attribute(id, &attr, value);
    }

    // === Tree navigation ===

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.data(id).children
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.data(id).children.len()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).children.first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).children.last().copied()
    }

    /// Position of a node among its parent's children.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    /// Ancestors from the parent up to the topmost node.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            dom: self,
            next: self.parent(id),
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Deepest node containing both `a` and `b`, if they share a tree.
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        if self.contains(a, b) {
            return Some(a);
        }
        std::iter::once(a)
            .chain(self.ancestors(a))
            .find(|&candidate| self.contains(candidate, b))
    }

    /// Path of nodes from `root` (exclusive) down to `node` (inclusive).
    ///
    /// Returns `None` when `node` is not inside `root`.
    pub fn path_from(&self, root: NodeId, node: NodeId) -> Option<Vec<NodeId>> {
        let mut path = vec![];
        let mut current = node;
        while current != root {
            path.push(current);
            current = self.parent(current)?;
        }
        path.reverse();
        Some(path)
    }

    /// Pre-order iterator over a subtree, including its root.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            dom: self,
            stack: vec![id],
        }
    }

    // === Mutation ===

    /// Detach a node from its parent. The subtree stays intact.
    pub fn remove(&mut self, id: NodeId) {
        if let Some(parent) = self.data(id).parent {
            self.data_mut(parent).children.retain(|&c| c != id);
            self.data_mut(id).parent = None;
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    /// Insert `child` into `parent` before `reference`, or at the end when
    /// `reference` is `None` or not a child of `parent`. A child that is
    /// already attached elsewhere is moved.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        debug_assert!(
            !self.contains(child, parent),
            "cannot insert a node into its own subtree"
        );
        if reference == Some(child) {
            return;
        }
        self.remove(child);
        let children = &self.data(parent).children;
        let index = reference
            .and_then(|r| children.iter().position(|&c| c == r))
            .unwrap_or(children.len());
        self.data_mut(parent).children.insert(index, child);
        self.data_mut(child).parent = Some(parent);
    }

    /// Replace `old` with `new` in `old`'s parent.
    pub fn replace_with(&mut self, old: NodeId, new: NodeId) {
        if let Some(parent) = self.parent(old) {
            let next = self.next_sibling(old);
            self.remove(old);
            self.insert_before(parent, new, next);
        }
    }

    /// Detach every child of a node.
    pub fn clear_children(&mut self, id: NodeId) {
        for child in self.data(id).children.clone() {
            self.remove(child);
        }
    }

    /// Move every child of `from` to the end of `to`.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        for child in self.data(from).children.clone() {
            self.append_child(to, child);
        }
    }

    /// Replace a node with its children.
    pub fn unwrap_node(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        for child in self.data(id).children.clone() {
            self.insert_before(parent, child, Some(id));
        }
        self.remove(id);
    }

    /// Wrap a node in a freshly created element and return the wrapper.
    pub fn wrap(&mut self, id: NodeId, tag: &str) -> NodeId {
        let wrapper = self.create_element(tag);
        if let Some(parent) = self.parent(id) {
            self.insert_before(parent, wrapper, Some(id));
        }
        self.append_child(wrapper, id);
        wrapper
    }

    /// Wrap all children of `id` in a new element appended to `id`.
    pub fn wrap_children(&mut self, id: NodeId, tag: &str) -> NodeId {
        let wrapper = self.create_element(tag);
        self.move_children(id, wrapper);
        self.append_child(id, wrapper);
        wrapper
    }
}

pub struct Ancestors<'a> {
    dom: &'a Dom,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.dom.parent(current);
        Some(current)
    }
}

pub struct Descendants<'a> {
    dom: &'a Dom,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.dom.children(current).iter().rev().copied());
        Some(current)
    }
}
