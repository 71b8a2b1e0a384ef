//! Structural editing of table models.
//!
//! Every operation works on the row/cell matrix alone. Merged cells are
//! continuation slots (`span_left`/`span_above`), so the matrix stays
//! rectangular through inserts, deletes, merges and splits. The
//! operations act on the selected cell range and do nothing when no cell
//! is selected.

mod delete;
mod format;
mod insert;
mod merge;
mod normalize;
mod split;

use serde::Serialize;

pub use delete::{delete_table_column, delete_table_row};
pub use format::{apply_table_format, default_table_format, set_table_cell_background_color};
pub use insert::{insert_table_column, insert_table_row};
pub use merge::{merge_table_cells, merge_table_column, merge_table_row};
pub use normalize::normalize_table;
pub use split::{split_table_cell_horizontally, split_table_cell_vertically};

use crate::model::{ContentModelTable, ContentModelTableCell};

/// Narrowest column the editor produces, in px.
pub const MIN_ALLOWED_TABLE_CELL_WIDTH: f64 = 30.0;

/// Lowest row the editor produces, in px.
pub const MIN_ALLOWED_TABLE_CELL_HEIGHT: f64 = 22.0;

const TARGET: &str = "weaver::content_model::table";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TableRowInsertOperation {
    InsertAbove,
    InsertBelow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TableColumnInsertOperation {
    InsertLeft,
    InsertRight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TableRowMergeOperation {
    MergeAbove,
    MergeBelow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TableColumnMergeOperation {
    MergeLeft,
    MergeRight,
}

/// Bounding box of the selected cells, inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TableSelectionCoordinates {
    pub first_row: usize,
    pub first_column: usize,
    pub last_row: usize,
    pub last_column: usize,
}

impl TableSelectionCoordinates {
    pub fn contains(&self, row: usize, column: usize) -> bool {
        (self.first_row..=self.last_row).contains(&row)
            && (self.first_column..=self.last_column).contains(&column)
    }
}

/// The box spanning every selected cell, or `None` when nothing is
/// selected.
pub fn get_selected_cells(table: &ContentModelTable) -> Option<TableSelectionCoordinates> {
    let mut selection: Option<TableSelectionCoordinates> = None;
    for (row_index, row) in table.rows.iter().enumerate() {
        for (column, cell) in row.cells.iter().enumerate() {
            if !cell.is_selected {
                continue;
            }
            selection = Some(match selection {
                Some(s) => TableSelectionCoordinates {
                    first_row: s.first_row.min(row_index),
                    first_column: s.first_column.min(column),
                    last_row: s.last_row.max(row_index),
                    last_column: s.last_column.max(column),
                },
                None => TableSelectionCoordinates {
                    first_row: row_index,
                    first_column: column,
                    last_row: row_index,
                    last_column: column,
                },
            });
        }
    }
    selection
}

/// Deselect every cell.
pub fn clear_selected_cells(table: &mut ContentModelTable) {
    for cell in table.rows.iter_mut().flat_map(|row| row.cells.iter_mut()) {
        cell.is_selected = false;
    }
}

/// An empty, unselected cell with the look of `cell`. It has no element
/// yet, so the next render builds one.
fn new_cell_like(cell: &ContentModelTableCell) -> ContentModelTableCell {
    let mut new_cell =
        ContentModelTableCell::new(cell.span_left, cell.span_above, cell.is_header, cell.format.clone());
    new_cell.dataset = cell.dataset.clone();
    new_cell
}


#[cfg(test)]
mod tests {
    use super::test_util::table;
    use super::*;

    #[test]
    fn test_get_selected_cells() {
        assert_eq!(get_selected_cells(&table(2, 2, &[])), None);
        assert_eq!(
            get_selected_cells(&table(3, 3, &[(1, 2), (2, 1)])),
            Some(TableSelectionCoordinates {
                first_row: 1,
                first_column: 1,
                last_row: 2,
                last_column: 2,
            })
        );
    }

    #[test]
    fn test_clear_selected_cells() {
        let mut table = table(2, 2, &[(0, 0), (1, 1)]);
        clear_selected_cells(&mut table);
        assert_eq!(get_selected_cells(&table), None);
    }
}
