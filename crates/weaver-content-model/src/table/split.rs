use super::{
    MIN_ALLOWED_TABLE_CELL_HEIGHT, MIN_ALLOWED_TABLE_CELL_WIDTH, TARGET, get_selected_cells,
    new_cell_like,
};
use crate::model::{ContentModelTable, ContentModelTableRow};

/// Split each selected column in two. Where the column to the right is
/// already a continuation in every selected row, the split just undoes
/// that merge; otherwise a new column is inserted that continues the old
/// one outside the selection.
pub fn split_table_cell_horizontally(table: &mut ContentModelTable) {
    let Some(selection) = get_selected_cells(table) else {
        return;
    };
    debug_assert!(table.is_rectangular());

    for column in (selection.first_column..=selection.last_column).rev() {
        let in_selection = |row: usize| (selection.first_row..=selection.last_row).contains(&row);
        let merged_right = table.rows.iter().enumerate().all(|(row_index, row)| {
            !in_selection(row_index) || row.cells.get(column + 1).is_some_and(|cell| cell.span_left)
        });

        if merged_right {
            for (row_index, row) in table.rows.iter_mut().enumerate() {
                if let Some(cell) = row.cells.get_mut(column) {
                    cell.cached_element.clear();
                }
                if in_selection(row_index) {
                    if let Some(next) = row.cells.get_mut(column + 1) {
                        next.span_left = false;
                        next.cached_element.clear();
                    }
                }
            }
            continue;
        }

        for (row_index, row) in table.rows.iter_mut().enumerate() {
            let Some(cell) = row.cells.get_mut(column) else {
                continue;
            };
            cell.cached_element.clear();
            let mut new_cell = new_cell_like(cell);
            if in_selection(row_index) {
                new_cell.span_left = false;
                new_cell.is_selected = cell.is_selected;
            } else {
                new_cell.span_left = true;
            }
            row.cells.insert(column + 1, new_cell);
        }
        if let Some(&width) = table.widths.get(column) {
            let half = (width / 2.0).max(MIN_ALLOWED_TABLE_CELL_WIDTH);
            table.widths.splice(column..=column, [half, half]);
        }
    }

    tracing::trace!(target: TARGET, ?selection, "split cells horizontally");
}

/// Split each selected row in two, the vertical counterpart of
/// [`split_table_cell_horizontally`]. Row heights are halved, never below
/// the minimum row height.
pub fn split_table_cell_vertically(table: &mut ContentModelTable) {
    let Some(selection) = get_selected_cells(table) else {
        return;
    };
    debug_assert!(table.is_rectangular());
    let in_selection =
        |column: usize| (selection.first_column..=selection.last_column).contains(&column);

    for row_index in (selection.first_row..=selection.last_row).rev() {
        let merged_below = table.rows.get(row_index + 1).is_some_and(|next| {
            next.cells
                .iter()
                .enumerate()
                .all(|(column, cell)| !in_selection(column) || cell.span_above)
        });

        if merged_below {
            for cell in &mut table.rows[row_index].cells {
                cell.cached_element.clear();
            }
            for (column, cell) in table.rows[row_index + 1].cells.iter_mut().enumerate() {
                if in_selection(column) {
                    cell.span_above = false;
                    cell.cached_element.clear();
                }
            }
            continue;
        }

        let row = &mut table.rows[row_index];
        let height = if row.height > 0.0 {
            (row.height / 2.0).max(MIN_ALLOWED_TABLE_CELL_HEIGHT)
        } else {
            0.0
        };
        row.height = height;
        row.cached_element.clear();

        let mut new_row = ContentModelTableRow::new(height);
        new_row.format = row.format.clone();
        new_row.cells = row
            .cells
            .iter_mut()
            .enumerate()
            .map(|(column, cell)| {
                cell.cached_element.clear();
                let mut new_cell = new_cell_like(cell);
                if in_selection(column) {
                    new_cell.span_above = false;
                    new_cell.is_selected = cell.is_selected;
                } else {
                    new_cell.span_above = true;
                }
                new_cell
            })
            .collect();
        table.rows.insert(row_index + 1, new_row);
    }

    tracing::trace!(target: TARGET, ?selection, "split cells vertically");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{TableCellMetadataFormat, get_metadata, table_cell_metadata_definition};
    use crate::table::set_table_cell_background_color;
    use crate::table::test_util::{layout, table, text};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_horizontally_inserts_column() {
        let mut table = table(2, 2, &[(0, 0)]);
        split_table_cell_horizontally(&mut table);

        assert_eq!(layout(&table), vec!["...", ".<."]);
        assert_eq!(table.widths, vec![50.0, 50.0, 100.0]);
        assert_eq!(text(&table.rows[0].cells[0]), "0,0");
        assert_eq!(text(&table.rows[0].cells[1]), "");
        assert!(table.rows[0].cells[1].is_selected);
    }

    #[test]
    fn test_split_horizontally_respects_min_width() {
        let mut table = table(1, 1, &[(0, 0)]);
        table.widths = vec![40.0];
        split_table_cell_horizontally(&mut table);
        assert_eq!(table.widths, vec![30.0, 30.0]);
    }

    #[test]
    fn test_split_horizontally_undoes_merge() {
        let mut table = table(1, 2, &[(0, 0)]);
        table.rows[0].cells[1].span_left = true;
        split_table_cell_horizontally(&mut table);

        assert_eq!(layout(&table), vec![".."]);
        assert_eq!(table.widths, vec![100.0, 100.0]);
    }

    #[test]
    fn test_split_vertically_halves_height() {
        let mut table = table(1, 2, &[(0, 1)]);
        table.rows[0].height = 100.0;
        split_table_cell_vertically(&mut table);

        assert_eq!(layout(&table), vec!["..", "^."]);
        assert_eq!(table.rows[0].height, 50.0);
        assert_eq!(table.rows[1].height, 50.0);

        let mut table = table_with_height(30.0);
        split_table_cell_vertically(&mut table);
        assert_eq!(table.rows[0].height, MIN_ALLOWED_TABLE_CELL_HEIGHT);
    }

    fn table_with_height(height: f64) -> ContentModelTable {
        let mut table = table(1, 1, &[(0, 0)]);
        table.rows[0].height = height;
        table
    }

    #[test]
    fn test_split_keeps_background_override() {
        let mut table = table(1, 1, &[(0, 0)]);
        set_table_cell_background_color(&mut table.rows[0].cells[0], Some("red"), true)
            .expect("metadata");
        split_table_cell_horizontally(&mut table);

        let copy = &table.rows[0].cells[1];
        assert_eq!(copy.format.get("background-color"), Some("red"));
        let metadata: TableCellMetadataFormat =
            get_metadata(&copy.dataset, &table_cell_metadata_definition()).expect("cell metadata");
        assert_eq!(metadata.bg_color_override, Some(true));
    }
}
