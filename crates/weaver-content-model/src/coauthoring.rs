//! Versioned document history for co-authoring peers.
//!
//! Each peer edits its own snapshot and sends it back together with the
//! version it started from. Paragraphs are matched across snapshots by
//! paragraph marker, so peers must use distinct marker namespaces.
//!
//! Concurrent edits are not merged. An update based on the latest version
//! replaces it; an update based on an older version only re-applies the
//! paragraphs it changed, last writer wins.

use std::collections::{HashMap, VecDeque};

use smol_str::SmolStr;

use crate::error::{ContentModelError, Result};
use crate::model::{ContentModelDocument, ContentModelParagraph};
use crate::query::{find_paragraph_by_marker_mut, get_paragraphs};

const TARGET: &str = "weaver::content_model::coauthoring";

/// Versions kept for updates still in flight.
pub const MAX_VERSIONS: usize = 100;

#[derive(Clone, Debug)]
pub struct DocumentVersion {
    pub version: u64,
    pub document: ContentModelDocument,
}

/// A peer's edited snapshot and the version it was derived from.
#[derive(Clone, Debug)]
pub struct CoauthoringUpdate {
    pub client_id: SmolStr,
    pub base_version: u64,
    pub document: ContentModelDocument,
}

#[derive(Debug)]
pub struct CoauthoringServer {
    history: VecDeque<DocumentVersion>,
    max_versions: usize,
}

impl CoauthoringServer {
    /// Start a history at version 0.
    pub fn new(document: ContentModelDocument) -> Self {
        Self::with_max_versions(document, MAX_VERSIONS)
    }

    pub fn with_max_versions(document: ContentModelDocument, max_versions: usize) -> Self {
        let mut history = VecDeque::with_capacity(max_versions.max(1));
        history.push_back(DocumentVersion {
            version: 0,
            document,
        });
        Self {
            history,
            max_versions: max_versions.max(1),
        }
    }

    /// The newest snapshot. The history is never empty.
    pub fn latest(&self) -> &DocumentVersion {
        &self.history[self.history.len() - 1]
    }

    pub fn latest_version(&self) -> u64 {
        self.latest().version
    }

    pub fn oldest_version(&self) -> u64 {
        self.history[0].version
    }

    pub fn get_version(&self, version: u64) -> Option<&DocumentVersion> {
        self.history.iter().find(|entry| entry.version == version)
    }

    /// Record a peer's update and return the new version number.
    pub fn apply_update(&mut self, update: CoauthoringUpdate) -> Result<u64> {
        let latest = self.latest_version();
        if update.base_version > latest {
            return Err(ContentModelError::UnknownVersion {
                version: update.base_version,
                latest,
            });
        }
        let Some(base) = self.get_version(update.base_version) else {
            return Err(ContentModelError::VersionEvicted {
                version: update.base_version,
                oldest: self.oldest_version(),
            });
        };

        let document = if update.base_version == latest {
            update.document
        } else {
            tracing::warn!(
                target: TARGET,
                client = %update.client_id,
                base = update.base_version,
                latest,
                "update based on a superseded version, applying changed paragraphs only"
            );
            let changed = changed_paragraphs(&base.document, &update.document);
            let mut document = self.latest().document.clone();
            let mut applied = 0;
            for (marker, paragraph) in changed {
                match find_paragraph_by_marker_mut(&mut document.blocks, &marker) {
                    Some(target) => {
                        target.segments = paragraph.segments.clone();
                        target.format = paragraph.format.clone();
                        target.decorator = paragraph.decorator.clone();
                        target.cached_element.clear();
                        applied += 1;
                    }
                    None => {
                        tracing::debug!(target: TARGET, %marker, "changed paragraph no longer exists");
                    }
                }
            }
            tracing::debug!(target: TARGET, applied, "re-applied paragraphs");
            document
        };

        let version = latest + 1;
        self.history.push_back(DocumentVersion { version, document });
        while self.history.len() > self.max_versions {
            self.history.pop_front();
        }
        tracing::debug!(target: TARGET, client = %update.client_id, version, "accepted update");
        Ok(version)
    }
}

/// Paragraphs of `edited` that carry a marker and differ from the
/// paragraph with the same marker in `base`. Paragraphs the edit created
/// have no counterpart and are not returned.
fn changed_paragraphs<'a>(
    base: &ContentModelDocument,
    edited: &'a ContentModelDocument,
) -> Vec<(SmolStr, &'a ContentModelParagraph)> {
    let base_paragraphs: HashMap<&str, &ContentModelParagraph> = get_paragraphs(base)
        .into_iter()
        .filter_map(|paragraph| Some((paragraph.marker.get()?, paragraph)))
        .collect();

    get_paragraphs(edited)
        .into_iter()
        .filter_map(|paragraph| {
            let marker = paragraph.marker.get()?;
            let original = base_paragraphs.get(marker)?;
            (*original != paragraph).then(|| (SmolStr::new(marker), paragraph))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Format;
    use crate::model::{ContentModelBlock, ContentModelSegment};
    use crate::query::find_paragraph_by_marker;
    use pretty_assertions::assert_eq;

    fn paragraph(marker: &str, text: &str) -> ContentModelBlock {
        let mut paragraph = ContentModelParagraph::new(false, Format::new());
        paragraph.add_segment(ContentModelSegment::text(text, Format::new()));
        paragraph.marker.set(Some(SmolStr::new(marker)));
        ContentModelBlock::Paragraph(paragraph)
    }

    fn document(paragraphs: &[(&str, &str)]) -> ContentModelDocument {
        let mut document = ContentModelDocument::new();
        for (marker, text) in paragraphs {
            document.blocks.push(paragraph(marker, text));
        }
        document
    }

    fn text_of(document: &ContentModelDocument, marker: &str) -> String {
        let paragraph = find_paragraph_by_marker(document, marker).expect("paragraph");
        match &paragraph.segments[0] {
            ContentModelSegment::Text(text) => text.text.clone(),
            other => panic!("unexpected segment {other:?}"),
        }
    }

    fn update(client: &str, base_version: u64, document: ContentModelDocument) -> CoauthoringUpdate {
        CoauthoringUpdate {
            client_id: SmolStr::new(client),
            base_version,
            document,
        }
    }

    #[test]
    fn test_update_on_latest_replaces_document() {
        let mut server = CoauthoringServer::new(document(&[("p_a_1", "one")]));
        let version = server
            .apply_update(update("a", 0, document(&[("p_a_1", "one"), ("p_a_2", "two")])))
            .expect("update");
        assert_eq!(version, 1);
        assert_eq!(server.latest().document.blocks.len(), 2);
    }

    #[test]
    fn test_superseded_update_reapplies_changed_paragraphs() {
        let initial = document(&[("p_1", "one"), ("p_2", "two")]);
        let mut server = CoauthoringServer::new(initial);

        // Peer A edits the first paragraph and lands first.
        server
            .apply_update(update("a", 0, document(&[("p_1", "ONE"), ("p_2", "two")])))
            .expect("first update");
        // Peer B, still on version 0, edits the second one.
        let version = server
            .apply_update(update("b", 0, document(&[("p_1", "one"), ("p_2", "TWO")])))
            .expect("second update");

        assert_eq!(version, 2);
        let latest = &server.latest().document;
        assert_eq!(text_of(latest, "p_1"), "ONE");
        assert_eq!(text_of(latest, "p_2"), "TWO");
    }

    #[test]
    fn test_unknown_and_evicted_versions() {
        let mut server = CoauthoringServer::with_max_versions(document(&[("p", "x")]), 2);
        assert!(matches!(
            server.apply_update(update("a", 5, document(&[]))),
            Err(ContentModelError::UnknownVersion { version: 5, latest: 0 })
        ));

        for base in 0..3 {
            server
                .apply_update(update("a", base, document(&[("p", "x")])))
                .expect("update");
        }
        assert_eq!(server.latest_version(), 3);
        assert_eq!(server.oldest_version(), 2);
        assert!(matches!(
            server.apply_update(update("a", 0, document(&[]))),
            Err(ContentModelError::VersionEvicted { version: 0, oldest: 2 })
        ));
    }
}
