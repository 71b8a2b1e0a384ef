use super::{MIN_ALLOWED_TABLE_CELL_HEIGHT, MIN_ALLOWED_TABLE_CELL_WIDTH, TARGET};
use crate::format::Format;
use crate::model::{
    ContentModelBlock, ContentModelParagraph, ContentModelSegment, ContentModelTable,
    ContentModelTableCell,
};

/// Bring a table back to a shape every operation can rely on:
///
/// - rows padded to the same number of cells, `widths` to match;
/// - no continuation cells in the first row or column;
/// - columns and rows made only of continuations folded into their
///   neighbour;
/// - every governing cell holding at least one paragraph;
/// - known sizes raised to the editor minimums.
pub fn normalize_table(table: &mut ContentModelTable, default_segment_format: &Format) {
    let column_count = table.rows.iter().map(|row| row.cells.len()).max().unwrap_or(0);
    for row in &mut table.rows {
        if row.cells.len() < column_count {
            row.cells
                .resize_with(column_count, ContentModelTableCell::default);
        }
    }
    table.widths.resize(column_count, 0.0);

    for (row_index, row) in table.rows.iter_mut().enumerate() {
        for (column, cell) in row.cells.iter_mut().enumerate() {
            if row_index == 0 {
                cell.span_above = false;
            }
            if column == 0 {
                cell.span_left = false;
            }
        }
    }

    // Columns of continuations only add width to the column on their left.
    for column in (1..column_count).rev() {
        if table
            .rows
            .iter()
            .all(|row| row.cells.get(column).is_some_and(|cell| cell.span_left))
        {
            for row in &mut table.rows {
                row.cells.remove(column);
                row.cached_element.clear();
            }
            let width = table.widths.remove(column);
            table.widths[column - 1] += width;
            tracing::trace!(target: TARGET, column, "folded continuation column");
        }
    }
    for row_index in (1..table.rows.len()).rev() {
        if table.rows[row_index].cells.iter().all(|cell| cell.span_above) {
            let removed = table.rows.remove(row_index);
            table.rows[row_index - 1].height += removed.height;
            tracing::trace!(target: TARGET, row = row_index, "folded continuation row");
        }
    }

    for width in &mut table.widths {
        if *width > 0.0 && *width < MIN_ALLOWED_TABLE_CELL_WIDTH {
            *width = MIN_ALLOWED_TABLE_CELL_WIDTH;
        }
    }
    for row in &mut table.rows {
        if row.height > 0.0 && row.height < MIN_ALLOWED_TABLE_CELL_HEIGHT {
            row.height = MIN_ALLOWED_TABLE_CELL_HEIGHT;
        }
        for cell in row.cells.iter_mut().filter(|cell| cell.is_governing()) {
            if cell.blocks.is_empty() {
                let mut paragraph = ContentModelParagraph::new(true, Format::new());
                paragraph.add_segment(ContentModelSegment::br(default_segment_format.clone()));
                cell.blocks.push(ContentModelBlock::Paragraph(paragraph));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::test_util::{layout, table};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_pads_and_fills() {
        let mut table = table(2, 2, &[]);
        table.rows[1].cells.pop();
        table.rows[0].cells[1].blocks.clear();
        table.widths = vec![10.0];

        normalize_table(&mut table, &Format::new());

        assert!(table.is_rectangular());
        assert_eq!(table.widths, vec![30.0, 0.0]);
        assert_eq!(table.rows[0].cells[1].blocks.len(), 1);
        assert_eq!(table.rows[1].cells[1].blocks.len(), 1);
    }

    #[test]
    fn test_normalize_folds_continuations() {
        let mut table = table(3, 3, &[]);
        for row in &mut table.rows {
            row.cells[2].span_left = true;
        }
        for cell in &mut table.rows[2].cells {
            cell.span_above = true;
        }
        table.rows[0].cells[0].span_above = true;

        normalize_table(&mut table, &Format::new());

        assert_eq!(layout(&table), vec!["..", ".."]);
        assert_eq!(table.widths, vec![100.0, 200.0]);
        assert_eq!(table.rows[1].height, 40.0);
    }
}
