//! Paragraph identity cache.
//!
//! Markers are minted per map instance under the map's own namespace, so
//! two maps (two peers, two tests) never hand out the same marker. The
//! element side of the mapping is a side table keyed by [`NodeId`]; nothing
//! is written to the DOM itself.

use std::collections::HashMap;

use smol_str::{SmolStr, format_smolstr};
use weaver_content_dom::NodeId;

use crate::model::ContentModelParagraph;

const TARGET: &str = "weaver::content_model::paragraph_map";

#[derive(Clone, Debug)]
pub struct ParagraphMap {
    namespace: SmolStr,
    next_index: u64,
    element_markers: HashMap<NodeId, SmolStr>,
    paragraphs: HashMap<SmolStr, ContentModelParagraph>,
}

impl ParagraphMap {
    /// Create a map whose markers read `paragraph_<namespace>_<n>`.
    pub fn new(namespace: impl Into<SmolStr>) -> Self {
        Self {
            namespace: namespace.into(),
            next_index: 0,
            element_markers: HashMap::new(),
            paragraphs: HashMap::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn mint(&mut self) -> SmolStr {
        let marker = format_smolstr!("paragraph_{}_{}", self.namespace, self.next_index);
        self.next_index += 1;
        marker
    }

    /// A paragraph was read from `element`. Reuse the element's marker when
    /// it has one, otherwise mint one for it, then index the paragraph.
    pub fn assign_marker_to_model(
        &mut self,
        element: NodeId,
        paragraph: &mut ContentModelParagraph,
    ) {
        let marker = match self.element_markers.get(&element) {
            Some(marker) => marker.clone(),
            None => {
                let marker = self.mint();
                self.element_markers.insert(element, marker.clone());
                marker
            }
        };
        tracing::trace!(
            target: TARGET,
            %marker,
            element = element.index(),
            "assigned marker to paragraph"
        );
        paragraph.marker.set(Some(marker.clone()));
        self.paragraphs.insert(marker, paragraph.clone());
    }

    /// A paragraph was written to `element`. The paragraph's marker (minted
    /// if missing) is recorded against the element and the paragraph indexed.
    pub fn apply_marker_to_dom(
        &mut self,
        element: NodeId,
        paragraph: &mut ContentModelParagraph,
    ) {
        let marker = match paragraph.marker.get() {
            Some(marker) => SmolStr::new(marker),
            None => {
                let marker = self.mint();
                paragraph.marker.set(Some(marker.clone()));
                marker
            }
        };
        tracing::trace!(
            target: TARGET,
            %marker,
            element = element.index(),
            "applied marker to element"
        );
        self.element_markers.insert(element, marker.clone());
        self.paragraphs.insert(marker, paragraph.clone());
    }

    /// The indexed paragraph sharing `paragraph`'s marker.
    pub fn get_paragraph_from_marker(
        &self,
        paragraph: &ContentModelParagraph,
    ) -> Option<&ContentModelParagraph> {
        self.paragraphs.get(paragraph.marker.get()?)
    }

    pub fn marker_of_element(&self, element: NodeId) -> Option<&str> {
        self.element_markers.get(&element).map(SmolStr::as_str)
    }

    /// The element a marker was last recorded against.
    pub fn element_of_marker(&self, marker: &str) -> Option<NodeId> {
        self.element_markers
            .iter()
            .find(|(_, m)| m.as_str() == marker)
            .map(|(element, _)| *element)
    }

    /// Forget all markers and indexed paragraphs. The namespace and counter
    /// are kept so markers stay unique for the lifetime of the map.
    pub fn clear(&mut self) {
        self.element_markers.clear();
        self.paragraphs.clear();
    }
}
