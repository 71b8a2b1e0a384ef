//! Locating the run of list items that share numbering with a given item.

use crate::model::{ContentModelBlock, ContentModelBlockGroup, ContentModelListItem};

/// List items of `group` in document order. `None` marks anything that
/// interrupts a thread: a non-list block, or the edge of a nested group.
fn flatten_list_items<'a>(
    blocks: &'a [ContentModelBlock],
    out: &mut Vec<Option<&'a ContentModelListItem>>,
) {
    for block in blocks {
        match block {
            ContentModelBlock::ListItem(item) => out.push(Some(item)),
            ContentModelBlock::Table(table) => {
                out.push(None);
                for cell in table.rows.iter().flat_map(|row| &row.cells) {
                    flatten_list_items(&cell.blocks, out);
                    out.push(None);
                }
            }
            ContentModelBlock::FormatContainer(_) | ContentModelBlock::General(_) => {
                out.push(None);
                if let Some(group) = block.as_block_group() {
                    flatten_list_items(group.blocks(), out);
                }
                out.push(None);
            }
            _ => out.push(None),
        }
    }
}

fn same_type_prefix(a: &ContentModelListItem, b: &ContentModelListItem) -> bool {
    a.levels
        .iter()
        .zip(&b.levels)
        .all(|(x, y)| x.list_type == y.list_type)
}

fn starts_new_thread(item: &ContentModelListItem) -> bool {
    item.last_level()
        .is_some_and(|level| level.start_number_override.is_some())
}

fn has_any_override(item: &ContentModelListItem) -> bool {
    item.levels
        .iter()
        .any(|level| level.start_number_override.is_some())
}

/// Every list item numbered in the same thread as `current`, in document
/// order and including `current` itself.
///
/// The thread extends over deeper items, and over shallower items that do
/// not restart numbering. It stops at any non-list block, at a type
/// mismatch on the shared levels, and at a start-number override at the
/// current depth. Returns an empty list when `current` is not in `group`.
pub fn find_list_items_in_same_thread<'a>(
    group: &'a dyn ContentModelBlockGroup,
    current: &ContentModelListItem,
) -> Vec<&'a ContentModelListItem> {
    let mut items = vec![];
    flatten_list_items(group.blocks(), &mut items);

    let Some(index) = items
        .iter()
        .position(|item| item.is_some_and(|item| std::ptr::eq(item, current)))
    else {
        return vec![];
    };
    let Some(target) = items[index] else {
        return vec![];
    };
    let depth = target.depth();
    if depth == 0 {
        return vec![target];
    }

    let mut before = vec![];
    if !starts_new_thread(target) {
        for item in items[..index].iter().rev() {
            let Some(item) = *item else {
                break;
            };
            if !same_type_prefix(item, target) {
                break;
            }
            if item.depth() > depth {
                continue;
            }
            if item.depth() < depth {
                if has_any_override(item) {
                    break;
                }
                continue;
            }
            before.push(item);
            if starts_new_thread(item) {
                break;
            }
        }
    }

    let mut thread: Vec<&ContentModelListItem> = before.into_iter().rev().collect();
    thread.push(target);

    for item in &items[index + 1..] {
        let Some(item) = *item else {
            break;
        };
        if !same_type_prefix(item, target) {
            break;
        }
        if item.depth() > depth {
            continue;
        }
        if item.depth() < depth {
            if has_any_override(item) {
                break;
            }
            continue;
        }
        if starts_new_thread(item) {
            break;
        }
        thread.push(item);
    }

    thread
}
