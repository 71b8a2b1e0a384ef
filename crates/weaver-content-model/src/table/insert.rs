use super::{
    TARGET, TableColumnInsertOperation, TableRowInsertOperation, TableSelectionCoordinates,
    get_selected_cells, new_cell_like,
};
use crate::model::{ContentModelTable, ContentModelTableRow};

/// With nothing selected, a table of a single row anchors on that row.
fn sole_row(table: &ContentModelTable) -> Option<TableSelectionCoordinates> {
    match table.rows.as_slice() {
        [row] if !row.cells.is_empty() => Some(TableSelectionCoordinates {
            first_row: 0,
            first_column: 0,
            last_row: 0,
            last_column: row.cells.len() - 1,
        }),
        _ => None,
    }
}

/// With nothing selected, a table of a single column anchors on that column.
fn sole_column(table: &ContentModelTable) -> Option<TableSelectionCoordinates> {
    let single = !table.rows.is_empty() && table.rows.iter().all(|row| row.cells.len() == 1);
    single.then(|| TableSelectionCoordinates {
        first_row: 0,
        first_column: 0,
        last_row: table.rows.len() - 1,
        last_column: 0,
    })
}

/// Insert one row per selected row, above the first or below the last
/// selected row. New rows copy the look of their neighbour but start
/// empty and unselected. Without a selection only a single-row table gets
/// a row; anything larger is left alone.
pub fn insert_table_row(table: &mut ContentModelTable, operation: TableRowInsertOperation) {
    let Some(selection) = get_selected_cells(table).or_else(|| sole_row(table)) else {
        return;
    };
    debug_assert!(table.is_rectangular());
    let insert_above = operation == TableRowInsertOperation::InsertAbove;
    let source_index = if insert_above {
        selection.first_row
    } else {
        selection.last_row
    };

    for _ in selection.first_row..=selection.last_row {
        let source = &table.rows[source_index];
        let mut row = ContentModelTableRow::new(source.height);
        row.format = source.format.clone();
        row.cells = source
            .cells
            .iter()
            .map(|cell| {
                let mut new_cell = new_cell_like(cell);
                // A row inserted above continues nothing.
                if insert_above {
                    new_cell.span_above = false;
                }
                new_cell
            })
            .collect();
        let at = if insert_above {
            selection.first_row
        } else {
            selection.last_row + 1
        };
        table.rows.insert(at, row);
    }

    tracing::trace!(
        target: TARGET,
        ?operation,
        count = selection.last_row - selection.first_row + 1,
        "inserted rows"
    );
}

/// Insert one column per selected column, left of the first or right of
/// the last selected column. The new column takes the width of the one
/// it was copied from. Without a selection only a single-column table
/// gets a column.
pub fn insert_table_column(table: &mut ContentModelTable, operation: TableColumnInsertOperation) {
    let Some(selection) = get_selected_cells(table).or_else(|| sole_column(table)) else {
        return;
    };
    debug_assert!(table.is_rectangular());
    let insert_left = operation == TableColumnInsertOperation::InsertLeft;
    let source_index = if insert_left {
        selection.first_column
    } else {
        selection.last_column
    };
    let at = if insert_left {
        selection.first_column
    } else {
        selection.last_column + 1
    };

    for _ in selection.first_column..=selection.last_column {
        for row in &mut table.rows {
            let Some(source) = row.cells.get(source_index) else {
                continue;
            };
            let mut new_cell = new_cell_like(source);
            if insert_left {
                new_cell.span_left = false;
            }
            row.cells.insert(at.min(row.cells.len()), new_cell);
        }
        if let Some(&width) = table.widths.get(source_index) {
            table.widths.insert(at.min(table.widths.len()), width);
        }
    }

    tracing::trace!(
        target: TARGET,
        ?operation,
        count = selection.last_column - selection.first_column + 1,
        "inserted columns"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Format;
    use crate::model::ContentModelTableCell;
    use crate::table::test_util::{layout, table, text};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_row_on_empty_table_is_noop() {
        let mut table = ContentModelTable::new(Format::new(), Default::default());
        insert_table_row(&mut table, TableRowInsertOperation::InsertAbove);
        insert_table_row(&mut table, TableRowInsertOperation::InsertBelow);
        assert!(table.rows.is_empty());
        assert!(table.widths.is_empty());
        assert!(table.dataset.is_empty());
    }

    #[test]
    fn test_insert_row_above_single_selected_cell() {
        let mut table = ContentModelTable::new(Format::new(), Default::default());
        table.widths = vec![100.0];
        let mut row = ContentModelTableRow::new(200.0);
        let mut cell = ContentModelTableCell::new(false, false, false, Format::new());
        cell.is_selected = true;
        row.cells.push(cell);
        table.rows.push(row);

        insert_table_row(&mut table, TableRowInsertOperation::InsertAbove);

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.widths, vec![100.0]);
        assert!(table.rows.iter().all(|row| row.height == 200.0));
        assert!(!table.rows[0].cells[0].is_selected);
        assert!(table.rows[1].cells[0].is_selected);
        assert_eq!(
            table.rows[0].cells[0],
            ContentModelTableCell::new(false, false, false, Format::new())
        );
    }

    #[test]
    fn test_insert_rows_below_multiple_selected_rows() {
        let mut table = table(3, 2, &[(0, 1), (1, 1)]);
        insert_table_row(&mut table, TableRowInsertOperation::InsertBelow);

        assert_eq!(table.rows.len(), 5);
        let texts: Vec<String> = table.rows.iter().map(|row| text(&row.cells[0])).collect();
        assert_eq!(texts, vec!["0,0", "1,0", "", "", "2,0"]);
    }

    #[test]
    fn test_insert_column_keeps_width_and_spans() {
        let mut table = table(2, 2, &[(0, 1)]);
        table.rows[1].cells[1].span_left = true;
        table.widths = vec![100.0, 60.0];

        insert_table_column(&mut table, TableColumnInsertOperation::InsertRight);

        assert_eq!(table.widths, vec![100.0, 60.0, 60.0]);
        assert_eq!(layout(&table), vec!["...", ".<<"]);
        assert_eq!(text(&table.rows[0].cells[2]), "");
    }

    #[test]
    fn test_insert_column_left_clears_span_left() {
        let mut table = table(2, 2, &[(1, 1)]);
        table.rows[1].cells[1].span_left = true;

        insert_table_column(&mut table, TableColumnInsertOperation::InsertLeft);

        assert_eq!(layout(&table), vec!["...", "..<"]);
        assert_eq!(table.widths.len(), 3);
    }

    #[test]
    fn test_unselected_single_row_anchors_insert() {
        let mut single = table(1, 2, &[]);
        insert_table_row(&mut single, TableRowInsertOperation::InsertBelow);
        assert_eq!(single.rows.len(), 2);
        assert_eq!(text(&single.rows[0].cells[0]), "0,0");
        assert_eq!(text(&single.rows[1].cells[0]), "");
        assert!(single.rows[1].cells.iter().all(|cell| !cell.is_selected));

        let mut larger = table(2, 2, &[]);
        insert_table_row(&mut larger, TableRowInsertOperation::InsertAbove);
        assert_eq!(larger.rows.len(), 2);
    }

    #[test]
    fn test_unselected_single_column_anchors_insert() {
        let mut single = table(2, 1, &[]);
        insert_table_column(&mut single, TableColumnInsertOperation::InsertRight);
        assert_eq!(layout(&single), vec!["..", ".."]);
        assert_eq!(single.widths, vec![100.0, 100.0]);
        assert_eq!(text(&single.rows[1].cells[0]), "1,0");

        let mut larger = table(2, 2, &[]);
        insert_table_column(&mut larger, TableColumnInsertOperation::InsertLeft);
        assert_eq!(layout(&larger), vec!["..", ".."]);
    }
}
