use super::{TARGET, TableColumnMergeOperation, TableRowMergeOperation, get_selected_cells};
use crate::model::{
    ContentModelBlock, ContentModelSegment, ContentModelTable, ContentModelTableCell,
};

/// Content of a cell that is about to become a continuation, minus empty
/// placeholder paragraphs.
fn take_content(cell: &mut ContentModelTableCell) -> Vec<ContentModelBlock> {
    std::mem::take(&mut cell.blocks)
        .into_iter()
        .filter(|block| !is_placeholder(block))
        .collect()
}

fn is_placeholder(block: &ContentModelBlock) -> bool {
    block.as_paragraph().is_some_and(|paragraph| {
        paragraph.segments.iter().all(|segment| {
            matches!(
                segment,
                ContentModelSegment::Br(_) | ContentModelSegment::SelectionMarker(_)
            )
        })
    })
}

/// Append blocks moved from merged cells to the governing cell.
fn absorb(table: &mut ContentModelTable, row: usize, column: usize, blocks: Vec<ContentModelBlock>) {
    if blocks.is_empty() {
        return;
    }
    if let Some(cell) = table.cell_mut(row, column) {
        if cell.blocks.iter().all(is_placeholder) {
            cell.blocks.clear();
        }
        cell.blocks.extend(blocks);
        cell.cached_element.clear();
    }
}

/// Merge the selected cells into the first one. Content of the other
/// cells moves into it.
pub fn merge_table_cells(table: &mut ContentModelTable) {
    let Some(selection) = get_selected_cells(table) else {
        return;
    };
    if selection.first_row == selection.last_row && selection.first_column == selection.last_column {
        return;
    }
    debug_assert!(table.is_rectangular());

    let mut moved = vec![];
    for row in selection.first_row..=selection.last_row {
        for column in selection.first_column..=selection.last_column {
            let Some(cell) = table.cell_mut(row, column) else {
                continue;
            };
            let was_governing = cell.is_governing();
            cell.span_left = column > selection.first_column;
            cell.span_above = row > selection.first_row;
            cell.cached_element.clear();
            if was_governing && !cell.is_governing() {
                moved.extend(take_content(cell));
            }
        }
    }
    absorb(table, selection.first_row, selection.first_column, moved);

    tracing::trace!(target: TARGET, ?selection, "merged cells");
}

/// Walk up from (`row`, `column`) to the cell a vertical continuation
/// belongs to.
fn governing_row(table: &ContentModelTable, mut row: usize, column: usize) -> usize {
    while row > 0 && table.cell(row, column).is_some_and(|cell| cell.span_above) {
        row -= 1;
    }
    row
}

fn governing_column(table: &ContentModelTable, row: usize, mut column: usize) -> usize {
    while column > 0 && table.cell(row, column).is_some_and(|cell| cell.span_left) {
        column -= 1;
    }
    column
}

/// Merge the selected rows with the row above the selection or below it.
pub fn merge_table_row(table: &mut ContentModelTable, operation: TableRowMergeOperation) {
    let Some(selection) = get_selected_cells(table) else {
        return;
    };
    debug_assert!(table.is_rectangular());
    let merging_row = match operation {
        TableRowMergeOperation::MergeAbove => selection.first_row,
        TableRowMergeOperation::MergeBelow => selection.last_row + 1,
    };
    if merging_row == 0 || merging_row >= table.rows.len() {
        return;
    }

    for column in selection.first_column..=selection.last_column {
        let Some(cell) = table.cell_mut(merging_row, column) else {
            continue;
        };
        if cell.span_left || cell.span_above {
            continue;
        }
        cell.span_above = true;
        cell.cached_element.clear();
        let blocks = take_content(cell);
        let target = governing_row(table, merging_row, column);
        absorb(table, target, column, blocks);
    }

    tracing::trace!(target: TARGET, ?operation, row = merging_row, "merged row");
}

/// Merge the selected columns with the column left or right of the
/// selection.
pub fn merge_table_column(table: &mut ContentModelTable, operation: TableColumnMergeOperation) {
    let Some(selection) = get_selected_cells(table) else {
        return;
    };
    debug_assert!(table.is_rectangular());
    let merging_column = match operation {
        TableColumnMergeOperation::MergeLeft => selection.first_column,
        TableColumnMergeOperation::MergeRight => selection.last_column + 1,
    };
    if merging_column == 0 || merging_column >= table.column_count() {
        return;
    }

    for row in selection.first_row..=selection.last_row {
        let Some(cell) = table.cell_mut(row, merging_column) else {
            continue;
        };
        if cell.span_left || cell.span_above {
            continue;
        }
        cell.span_left = true;
        cell.cached_element.clear();
        let blocks = take_content(cell);
        let target = governing_column(table, row, merging_column);
        absorb(table, row, target, blocks);
    }

    tracing::trace!(target: TARGET, ?operation, column = merging_column, "merged column");
}
