//! List numbering: thread counters shared by both converters, marker
//! styles, and thread lookup for editing operations.

mod numbering;
mod style;
mod thread;

pub use numbering::ThreadItemCounts;
pub use style::{
    BulletListType, NumberingListType, get_ordered_list_style_value, is_template_style,
    list_style_from_metadata,
};
pub use thread::find_list_items_in_same_thread;
