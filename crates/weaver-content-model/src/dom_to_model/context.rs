use weaver_content_dom::{Dom, DomSelection, NodeId};

use super::processors::{DefaultProcessors, DomToModelProcessors};
use super::reduced::ReducedModelProcessors;
use crate::format::Format;
use crate::list::ThreadItemCounts;
use crate::model::{ContentModelCode, ContentModelLink, ContentModelListItem, ContentModelListLevel};
use crate::options::DomToModelOption;
use crate::paragraph_map::ParagraphMap;

/// List state while reading nested `<ol>`/`<ul>` elements.
#[derive(Clone, Debug, Default)]
pub struct DomToModelListFormat {
    pub thread_item_counts: ThreadItemCounts,
    /// Levels of the lists enclosing the current node, outermost first.
    pub levels: Vec<ContentModelListLevel>,
    /// Items read so far under the outermost open list, in document order.
    /// A slot is reserved when an `<li>` starts so items of nested lists
    /// land after their parent item.
    pub(crate) pending_items: Vec<Option<ContentModelListItem>>,
    pub(crate) in_list: bool,
}

/// Scratch state of one DOM→model pass.
pub struct DomToModelContext<'a> {
    pub dom: &'a Dom,
    pub processors: &'a dyn DomToModelProcessors,
    pub selection: Option<DomSelection>,
    /// Set while the walk is between the start and end of a range selection.
    pub is_in_selection: bool,
    pub segment_format: Format,
    pub block_format: Format,
    pub link: Option<ContentModelLink>,
    pub code: Option<ContentModelCode>,
    pub list_format: DomToModelListFormat,
    pub preserve_white_space: bool,
    pub allow_cache_element: bool,
    pub freeze_foreign_tables: bool,
    pub paragraph_map: Option<&'a mut ParagraphMap>,
    /// Deepest node holding the whole selection, used by reduced passes.
    pub(crate) selection_root: Option<NodeId>,
    pub(crate) reduced: bool,
}

static DEFAULT_PROCESSORS: DefaultProcessors = DefaultProcessors;
static REDUCED_PROCESSORS: ReducedModelProcessors = ReducedModelProcessors;

impl<'a> DomToModelContext<'a> {
    pub fn new(dom: &'a Dom, option: &DomToModelOption) -> Self {
        let processors: &'a dyn DomToModelProcessors = if option.reduced_model {
            &REDUCED_PROCESSORS
        } else {
            &DEFAULT_PROCESSORS
        };
        Self {
            dom,
            processors,
            selection: None,
            is_in_selection: false,
            segment_format: Format::new(),
            block_format: Format::new(),
            link: None,
            code: None,
            list_format: DomToModelListFormat::default(),
            preserve_white_space: false,
            allow_cache_element: option.allow_cache_element,
            freeze_foreign_tables: option.freeze_foreign_tables,
            paragraph_map: None,
            selection_root: None,
            reduced: option.reduced_model,
        }
    }

    /// Replace the processor registry.
    pub fn with_processors(mut self, processors: &'a dyn DomToModelProcessors) -> Self {
        self.processors = processors;
        self
    }

    pub fn with_selection(mut self, selection: Option<DomSelection>) -> Self {
        self.selection_root = selection.and_then(|s| s.root_node(self.dom));
        self.selection = selection;
        self
    }

    pub fn with_paragraph_map(mut self, paragraph_map: &'a mut ParagraphMap) -> Self {
        self.paragraph_map = Some(paragraph_map);
        self
    }

    /// Run `f` and restore the inherited formats, link, code and whitespace
    /// mode afterwards.
    pub fn stack_format<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let segment_format = self.segment_format.clone();
        let block_format = self.block_format.clone();
        let link = self.link.clone();
        let code = self.code.clone();
        let preserve_white_space = self.preserve_white_space;

        let result = f(self);

        self.segment_format = segment_format;
        self.block_format = block_format;
        self.link = link;
        self.code = code;
        self.preserve_white_space = preserve_white_space;
        result
    }

    /// Run `f` with a fresh list state, for content that starts a new
    /// block group such as a table cell.
    pub fn isolate_list_format<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = std::mem::take(&mut self.list_format);
        let result = f(self);
        self.list_format = saved;
        result
    }
}
