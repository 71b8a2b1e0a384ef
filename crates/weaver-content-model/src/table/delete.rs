use super::{TARGET, get_selected_cells};
use crate::model::ContentModelTable;

/// Remove every row touched by the selection. Cells below that continued
/// a removed cell inherit the continuation state of the first removed row,
/// so a merge that started above the selection stays intact.
pub fn delete_table_row(table: &mut ContentModelTable) {
    let Some(selection) = get_selected_cells(table) else {
        return;
    };
    debug_assert!(table.is_rectangular());

    let inherited: Vec<bool> = table.rows[selection.first_row]
        .cells
        .iter()
        .map(|cell| cell.span_above)
        .collect();
    if let Some(next) = table.rows.get_mut(selection.last_row + 1) {
        for (cell, span_above) in next.cells.iter_mut().zip(inherited) {
            if cell.span_above != span_above {
                cell.span_above = span_above;
                cell.cached_element.clear();
            }
        }
    }
    table.rows.drain(selection.first_row..=selection.last_row);

    tracing::trace!(
        target: TARGET,
        first = selection.first_row,
        last = selection.last_row,
        "deleted rows"
    );
}

/// Remove every column touched by the selection, with the same treatment
/// of continuation cells as [`delete_table_row`].
pub fn delete_table_column(table: &mut ContentModelTable) {
    let Some(selection) = get_selected_cells(table) else {
        return;
    };
    debug_assert!(table.is_rectangular());

    for row in &mut table.rows {
        let inherited = row
            .cells
            .get(selection.first_column)
            .is_some_and(|cell| cell.span_left);
        if let Some(next) = row.cells.get_mut(selection.last_column + 1) {
            if next.span_left != inherited {
                next.span_left = inherited;
                next.cached_element.clear();
            }
        }
        let end = (selection.last_column + 1).min(row.cells.len());
        if selection.first_column < end {
            row.cells.drain(selection.first_column..end);
        }
    }
    let end = (selection.last_column + 1).min(table.widths.len());
    if selection.first_column < end {
        table.widths.drain(selection.first_column..end);
    }

    tracing::trace!(
        target: TARGET,
        first = selection.first_column,
        last = selection.last_column,
        "deleted columns"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::test_util::{layout, table, text};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_delete_rows_releases_continuations() {
        let mut table = table(3, 2, &[(0, 0)]);
        // Row 0 cell 1 spans down into row 1.
        table.rows[1].cells[1].span_above = true;

        delete_table_row(&mut table);

        assert_eq!(table.rows.len(), 2);
        assert_eq!(layout(&table), vec!["..", ".."]);
        assert_eq!(text(&table.rows[0].cells[0]), "1,0");
    }

    #[test]
    fn test_delete_rows_keeps_merge_from_above() {
        let mut table = table(3, 1, &[(1, 0)]);
        table.rows[1].cells[0].span_above = true;
        table.rows[2].cells[0].span_above = true;

        delete_table_row(&mut table);

        assert_eq!(layout(&table), vec![".", "^"]);
    }

    #[test]
    fn test_delete_columns() {
        let mut table = table(2, 3, &[(0, 1), (1, 2)]);
        table.widths = vec![10.0, 20.0, 30.0];

        delete_table_column(&mut table);

        assert_eq!(table.widths, vec![10.0]);
        assert_eq!(layout(&table), vec![".", "."]);
    }

    #[test]
    fn test_delete_without_selection_is_noop() {
        let mut table = table(2, 2, &[]);
        delete_table_row(&mut table);
        delete_table_column(&mut table);
        assert_eq!(layout(&table), vec!["..", ".."]);
    }
}
