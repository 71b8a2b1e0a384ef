//! HTML fragment parsing and serialization.
//!
//! Parsing goes through html5ever's fragment algorithm with a `body`
//! context, building straight into the arena. It never fails: malformed
//! input is repaired the way a browser would repair it.

use std::borrow::Cow;
use std::collections::HashMap;

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, ExpandedName, LocalName, Namespace, ParseOpts, QualName, parse_fragment};
use markdown_weaver_escape::{FmtWriter, StrWrite, escape_html, escape_html_body_text};

use crate::dom::Dom;
use crate::node::{ElementData, NodeId, NodeKind, is_void_element};

impl Dom {
    /// Parse `html` into a new detached fragment node.
    pub fn parse_fragment(&mut self, html: &str) -> NodeId {
        let fragment = self.create_fragment();
        parse_into(self, fragment, html);
        fragment
    }

    /// Replace all children of `id` with the parsed `html`.
    pub fn set_inner_html(&mut self, id: NodeId, html: &str) {
        self.clear_children(id);
        parse_into(self, id, html);
    }

    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Err(error) = self.write_inner_html(id, FmtWriter(&mut out)) {
            tracing::warn!(target: "weaver::content_dom::html", %error, "serialization stopped early");
        }
        out
    }

    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Err(error) = write_node(self, id, &mut FmtWriter(&mut out)) {
            tracing::warn!(target: "weaver::content_dom::html", %error, "serialization stopped early");
        }
        out
    }

    /// `id` serialized without its children: the start tag plus, for
    /// non-void elements, the end tag. Other nodes serialize in full.
    pub fn shallow_outer_html(&self, id: NodeId) -> String {
        let NodeKind::Element(element) = self.kind(id) else {
            return self.outer_html(id);
        };
        let mut out = String::new();
        let mut writer = FmtWriter(&mut out);
        let written = write_start_tag(element, &mut writer).and_then(|()| {
            if is_void_element(&element.tag) {
                Ok(())
            } else {
                write_end_tag(element, &mut writer)
            }
        });
        if let Err(error) = written {
            tracing::warn!(target: "weaver::content_dom::html", %error, "serialization stopped early");
        }
        out
    }

    /// Serialize the children of `id` into `writer`.
    pub fn write_inner_html<W: StrWrite>(&self, id: NodeId, mut writer: W) -> Result<(), W::Error> {
        for &child in self.children(id) {
            write_node(self, child, &mut writer)?;
        }
        Ok(())
    }
}

fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "textarea" | "title")
}

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

fn html_name(local: &str) -> QualName {
    QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(local))
}

fn parse_into(dom: &mut Dom, parent: NodeId, html: &str) {
    let document = dom.create_fragment();
    let sink = DomSink {
        dom: &mut *dom,
        document,
        names: HashMap::new(),
        fallback: html_name("span"),
    };
    let document = parse_fragment(sink, ParseOpts::default(), html_name("body"), vec![]).one(html);

    // The fragment algorithm parents everything under a synthetic `html`.
    let root = dom
        .children(document)
        .iter()
        .copied()
        .find(|&child| dom.has_tag(child, "html"))
        .unwrap_or(document);
    dom.move_children(root, parent);
}

/// Tree builder target writing into a [`Dom`] arena.
struct DomSink<'a> {
    dom: &'a mut Dom,
    document: NodeId,
    /// Qualified names as the tree builder saw them. The arena only keeps
    /// the local name, the builder also needs the namespace.
    names: HashMap<NodeId, QualName>,
    fallback: QualName,
}

impl DomSink<'_> {
    fn create_text_or_merge(&mut self, after: Option<NodeId>, text: &str) -> Option<NodeId> {
        if let Some(previous) = after {
            if let Some(existing) = self.dom.text(previous) {
                let merged = format!("{existing}{text}");
                self.dom.set_text(previous, merged);
                return None;
            }
        }
        Some(self.dom.create_text(text))
    }
}

fn attribute_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{prefix}:{}", name.local),
        None => name.local.to_string(),
    }
}

impl TreeSink for DomSink<'_> {
    type Handle = NodeId;
    type Output = NodeId;

    fn finish(self) -> NodeId {
        self.document
    }

    fn parse_error(&mut self, msg: Cow<'static, str>) {
        tracing::trace!(target: "weaver::content_dom::html", %msg, "repaired malformed html");
    }

    fn get_document(&mut self) -> NodeId {
        self.document
    }

    fn elem_name<'a>(&'a self, target: &'a NodeId) -> ExpandedName<'a> {
        self.names.get(target).unwrap_or(&self.fallback).expanded()
    }

    fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>, _flags: ElementFlags) -> NodeId {
        let element = self.dom.create_element(&name.local);
        for attr in attrs {
            self.dom
                .set_attribute(element, &attribute_name(&attr.name), attr.value.to_string());
        }
        self.names.insert(element, name);
        element
    }

    fn create_comment(&mut self, text: StrTendril) -> NodeId {
        self.dom.create_comment(text.to_string())
    }

    fn create_pi(&mut self, _target: StrTendril, data: StrTendril) -> NodeId {
        self.dom.create_comment(data.to_string())
    }

    fn append(&mut self, parent: &NodeId, child: NodeOrText<NodeId>) {
        match child {
            NodeOrText::AppendNode(node) => self.dom.append_child(*parent, node),
            NodeOrText::AppendText(text) => {
                let last = self.dom.last_child(*parent);
                if let Some(node) = self.create_text_or_merge(last, &text) {
                    self.dom.append_child(*parent, node);
                }
            }
        }
    }

    fn append_based_on_parent_node(
        &mut self,
        element: &NodeId,
        prev_element: &NodeId,
        child: NodeOrText<NodeId>,
    ) {
        if self.dom.parent(*element).is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(&mut self, _name: StrTendril, _public_id: StrTendril, _system_id: StrTendril) {}

    fn get_template_contents(&mut self, target: &NodeId) -> NodeId {
        *target
    }

    fn same_node(&self, x: &NodeId, y: &NodeId) -> bool {
        x == y
    }

    fn set_quirks_mode(&mut self, _mode: QuirksMode) {}

    fn append_before_sibling(&mut self, sibling: &NodeId, new_node: NodeOrText<NodeId>) {
        let Some(parent) = self.dom.parent(*sibling) else {
            return;
        };
        let node = match new_node {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(text) => {
                let previous = self.dom.previous_sibling(*sibling);
                match self.create_text_or_merge(previous, &text) {
                    Some(node) => node,
                    None => return,
                }
            }
        };
        self.dom.insert_before(parent, node, Some(*sibling));
    }

    fn add_attrs_if_missing(&mut self, target: &NodeId, attrs: Vec<Attribute>) {
        for attr in attrs {
            let name = attribute_name(&attr.name);
            if self.dom.attribute(*target, &name).is_none() {
                self.dom.set_attribute(*target, &name, attr.value.to_string());
            }
        }
    }

    fn remove_from_parent(&mut self, target: &NodeId) {
        self.dom.remove(*target);
    }

    fn reparent_children(&mut self, node: &NodeId, new_parent: &NodeId) {
        self.dom.move_children(*node, *new_parent);
    }
}

fn write_node<W: StrWrite>(dom: &Dom, id: NodeId, out: &mut W) -> Result<(), W::Error> {
    match dom.kind(id) {
        NodeKind::Text(text) => escape_html_body_text(&mut *out, text),
        NodeKind::Comment(text) => {
            out.write_str("<!--")?;
            out.write_str(text)?;
            out.write_str("-->")
        }
        NodeKind::Fragment => {
            for &child in dom.children(id) {
                write_node(dom, child, out)?;
            }
            Ok(())
        }
        NodeKind::Element(element) => {
            write_start_tag(element, out)?;
            if is_void_element(&element.tag) {
                return Ok(());
            }
            if is_raw_text_element(&element.tag) {
                out.write_str(&dom.text_content(id))?;
            } else {
                for &child in dom.children(id) {
                    write_node(dom, child, out)?;
                }
            }
            write_end_tag(element, out)
        }
    }
}

fn write_start_tag<W: StrWrite>(element: &ElementData, out: &mut W) -> Result<(), W::Error> {
    out.write_str("<")?;
    out.write_str(&element.tag)?;
    for (name, value) in &element.attrs {
        out.write_str(" ")?;
        out.write_str(name)?;
        out.write_str("=\"")?;
        escape_html(&mut *out, value)?;
        out.write_str("\"")?;
    }
    out.write_str(">")
}

fn write_end_tag<W: StrWrite>(element: &ElementData, out: &mut W) -> Result<(), W::Error> {
    out.write_str("</")?;
    out.write_str(&element.tag)?;
    out.write_str(">")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(html: &str) -> String {
        let mut dom = Dom::new();
        let fragment = dom.parse_fragment(html);
        dom.inner_html(fragment)
    }

    #[test]
    fn test_simple_round_trip() {
        let html = r#"<div style="color: red">a<b>b</b><br>c</div>"#;
        assert_eq!(round_trip(html), html);
    }

    #[test]
    fn test_implied_end_tags() {
        assert_eq!(
            round_trip("<ul><li>one<li>two</ul>"),
            "<ul><li>one</li><li>two</li></ul>"
        );
        assert_eq!(
            round_trip("<table><tr><td>a<td>b<tr><td>c</table>"),
            "<table><tbody><tr><td>a</td><td>b</td></tr><tr><td>c</td></tr></tbody></table>"
        );
        assert_eq!(round_trip("<p>a<div>b</div>"), "<p>a</p><div>b</div>");
    }

    #[test]
    fn test_named_entities_decode() {
        let mut dom = Dom::new();
        let fragment = dom.parse_fragment("&copy; 2024 &mdash; caf&eacute;&hellip; &lt;tag&gt;");
        assert_eq!(dom.text_content(fragment), "\u{a9} 2024 \u{2014} caf\u{e9}\u{2026} <tag>");
        assert_eq!(dom.child_count(fragment), 1);
        assert_eq!(dom.inner_html(fragment), "\u{a9} 2024 \u{2014} caf\u{e9}\u{2026} &lt;tag&gt;");
    }

    #[test]
    fn test_entities_and_literal_lt() {
        let mut dom = Dom::new();
        let fragment = dom.parse_fragment("a &lt; b &amp;&nbsp;c < d &bogus;");
        let text = dom.text_content(fragment);
        assert_eq!(text, "a < b &\u{a0}c < d &bogus;");
        assert_eq!(dom.child_count(fragment), 1);
    }

    #[test]
    fn test_attributes() {
        let mut dom = Dom::new();
        let fragment =
            dom.parse_fragment(r#"<img src='a.png' alt="x &quot;y&quot;" data-editing-info={} hidden/>"#);
        let img = dom.first_child(fragment).expect("img element");
        assert_eq!(dom.attribute(img, "src"), Some("a.png"));
        assert_eq!(dom.attribute(img, "alt"), Some("x \"y\""));
        assert_eq!(dom.attribute(img, "data-editing-info"), Some("{}"));
        assert_eq!(dom.attribute(img, "hidden"), Some(""));
        assert_eq!(dom.child_count(fragment), 1);
        assert_eq!(
            dom.outer_html(img),
            r#"<img src="a.png" alt="x &quot;y&quot;" data-editing-info="{}" hidden="">"#
        );
    }

    #[test]
    fn test_stray_end_tag_and_comment() {
        assert_eq!(round_trip("a</span><!--c-->b"), "a<!--c-->b");
        assert_eq!(round_trip("<div><span>x</div>y"), "<div><span>x</span></div>y");
    }

    #[test]
    fn test_foreign_content_keeps_case() {
        let mut dom = Dom::new();
        let fragment = dom.parse_fragment(r#"<svg viewBox="0 0 1 1"><foreignObject></foreignObject></svg>"#);
        let svg = dom.first_child(fragment).expect("svg element");
        assert_eq!(dom.attribute(svg, "viewBox"), Some("0 0 1 1"));
        assert!(dom.first_child(svg).is_some_and(|child| dom.has_tag(child, "foreignObject")));
    }

    #[test]
    fn test_shallow_outer_html() {
        let mut dom = Dom::new();
        let fragment = dom.parse_fragment(r#"<section class="a">one<b>two</b></section><hr>"#);
        let section = dom.children(fragment)[0];
        let hr = dom.children(fragment)[1];
        assert_eq!(dom.shallow_outer_html(section), r#"<section class="a"></section>"#);
        assert_eq!(dom.shallow_outer_html(hr), "<hr>");
    }

    #[test]
    fn test_raw_text_element() {
        assert_eq!(
            round_trip("<style>p > b { color: red }</style>"),
            "<style>p > b { color: red }</style>"
        );
    }
}
