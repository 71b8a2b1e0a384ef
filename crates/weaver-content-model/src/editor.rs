//! A minimal editing host: a DOM, the root being edited, the current
//! selection and the paragraph map that ties both converters together.

use weaver_content_dom::{Dom, DomSelection, NodeId};

use crate::dom_to_model::{DomToModelContext, dom_to_content_model};
use crate::model::ContentModelDocument;
use crate::model_to_dom::{ModelToDomContext, ModelToDomOutput, content_model_to_dom};
use crate::normalize::normalize_content_model;
use crate::options::{DomToModelOption, EditorOptions, ModelToDomOption};
use crate::paragraph_map::ParagraphMap;

const TARGET: &str = "weaver::content_model::editor";

/// Run an editing callback over `model`. The callback returns whether it
/// changed anything; a changed model is normalized.
///
/// Callbacks that edit a paragraph must clear its cached element, or the
/// next output pass reuses the old markup.
pub fn format_content_model(
    model: &mut ContentModelDocument,
    callback: impl FnOnce(&mut ContentModelDocument) -> bool,
) -> bool {
    let changed = callback(model);
    if changed {
        normalize_content_model(model);
    }
    changed
}

pub struct ContentModelEditor {
    dom: Dom,
    root: NodeId,
    selection: Option<DomSelection>,
    options: EditorOptions,
    paragraph_map: ParagraphMap,
}

impl ContentModelEditor {
    pub fn new(dom: Dom, root: NodeId, options: EditorOptions) -> Self {
        let paragraph_map = ParagraphMap::new(options.paragraph_marker_namespace.clone());
        Self {
            dom,
            root,
            selection: None,
            options,
            paragraph_map,
        }
    }

    /// An editor over a fresh `<div>` holding `html`.
    pub fn from_html(html: &str, options: EditorOptions) -> Self {
        let mut dom = Dom::new();
        let root = dom.create_element("div");
        dom.set_attribute(root, "contenteditable", "true");
        dom.set_inner_html(root, html);
        Self::new(dom, root, options)
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// Direct access for changes made outside the model, as a browser
    /// would make them.
    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn selection(&self) -> Option<DomSelection> {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Option<DomSelection>) {
        self.selection = selection;
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn paragraph_map(&self) -> &ParagraphMap {
        &self.paragraph_map
    }

    pub fn html(&self) -> String {
        self.dom.inner_html(self.root)
    }

    /// Read the current DOM and selection into a model. `option` overrides
    /// the editor's own DOM→model options for this call.
    pub fn create_content_model(&mut self, option: Option<&DomToModelOption>) -> ContentModelDocument {
        let option = option.unwrap_or(&self.options.dom_to_model);
        let mut context = DomToModelContext::new(&self.dom, option)
            .with_selection(self.selection)
            .with_paragraph_map(&mut self.paragraph_map);
        dom_to_content_model(self.root, &mut context)
    }

    /// Write `model` back into the DOM. The selection it carries, if any,
    /// becomes the editor selection.
    pub fn set_content_model(
        &mut self,
        model: &mut ContentModelDocument,
        option: Option<&ModelToDomOption>,
    ) -> ModelToDomOutput {
        let option = option.unwrap_or(&self.options.model_to_dom);
        let mut context =
            ModelToDomContext::new(option).with_paragraph_map(&mut self.paragraph_map);
        let output = content_model_to_dom(&mut self.dom, self.root, model, &mut context);
        if output.selection.is_some() {
            self.selection = output.selection;
        }
        output
    }

    /// Read the model, let `callback` edit it, and write it back when the
    /// callback reports a change. Returns whether it did.
    pub fn format_content_model(
        &mut self,
        callback: impl FnOnce(&mut ContentModelDocument) -> bool,
    ) -> bool {
        let mut model = self.create_content_model(None);
        if !format_content_model(&mut model, callback) {
            tracing::trace!(target: TARGET, "callback made no change");
            return false;
        }
        self.set_content_model(&mut model, None);
        tracing::debug!(target: TARGET, blocks = model.blocks.len(), "applied formatting");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContentModelSegment;
    use crate::query::{for_each_paragraph_mut, get_selected_segments};
    use pretty_assertions::assert_eq;
    use weaver_content_dom::{DomPosition, DomRange};

    #[test]
    fn test_format_under_callback() {
        let mut editor = ContentModelEditor::from_html("<div>hello</div>", EditorOptions::default());
        let changed = editor.format_content_model(|model| {
            for_each_paragraph_mut(model, &mut |paragraph| {
                for segment in &mut paragraph.segments {
                    if let ContentModelSegment::Text(text) = segment {
                        text.format.set("font-weight", "bold");
                    }
                }
                paragraph.cached_element.clear();
            });
            true
        });
        assert!(changed);
        assert_eq!(editor.html(), "<div><b>hello</b></div>");
    }

    #[test]
    fn test_unchanged_callback_leaves_dom_alone() {
        let mut editor = ContentModelEditor::from_html("<p>a</p>", EditorOptions::default());
        assert!(!editor.format_content_model(|_| false));
        assert_eq!(editor.html(), "<p>a</p>");
    }

    #[test]
    fn test_selection_survives_round_trip() {
        let mut editor = ContentModelEditor::from_html("<div>hello</div>", EditorOptions::default());
        let div = editor.dom().children(editor.root())[0];
        let text = editor.dom().children(div)[0];
        let caret = DomPosition::new(text, 2);
        editor.set_selection(Some(DomSelection::Range {
            range: DomRange::collapsed(caret),
        }));

        let mut model = editor.create_content_model(None);
        assert_eq!(get_selected_segments(&model).len(), 1);

        editor.set_content_model(&mut model, None);
        assert_eq!(editor.html(), "<div>hello</div>");
        let Some(DomSelection::Range { range }) = editor.selection() else {
            panic!("expected a range selection");
        };
        assert!(range.is_collapsed());
        assert_eq!(editor.dom().text(range.start.node), Some("he"));
    }
}
