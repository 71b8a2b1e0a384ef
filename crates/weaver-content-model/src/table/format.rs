use super::TARGET;
use crate::error::Result;
use crate::metadata::{
    TableCellMetadataFormat, TableMetadataFormat, get_metadata, table_cell_metadata_definition,
    table_metadata_definition, update_metadata,
};
use crate::model::{ContentModelTable, ContentModelTableCell};

const BORDER_WIDTH: &str = "1px solid";

/// Styling a table gets before any choice was made.
pub fn default_table_format() -> TableMetadataFormat {
    TableMetadataFormat {
        top_border_color: Some("#ABABAB".into()),
        bottom_border_color: Some("#ABABAB".into()),
        vertical_border_color: Some("#ABABAB".into()),
        has_header_row: Some(false),
        header_row_color: Some("#ABABAB".into()),
        has_first_column: Some(false),
        has_banded_rows: Some(false),
        has_banded_columns: Some(false),
        bg_color_even: None,
        bg_color_odd: Some("#ABABAB20".into()),
        vertical_align: None,
    }
}

/// Fields set in `update` win over `base`.
fn merge_table_format(base: TableMetadataFormat, update: TableMetadataFormat) -> TableMetadataFormat {
    TableMetadataFormat {
        top_border_color: update.top_border_color.or(base.top_border_color),
        bottom_border_color: update.bottom_border_color.or(base.bottom_border_color),
        vertical_border_color: update.vertical_border_color.or(base.vertical_border_color),
        has_header_row: update.has_header_row.or(base.has_header_row),
        header_row_color: update.header_row_color.or(base.header_row_color),
        has_first_column: update.has_first_column.or(base.has_first_column),
        has_banded_rows: update.has_banded_rows.or(base.has_banded_rows),
        has_banded_columns: update.has_banded_columns.or(base.has_banded_columns),
        bg_color_even: update.bg_color_even.or(base.bg_color_even),
        bg_color_odd: update.bg_color_odd.or(base.bg_color_odd),
        vertical_align: update.vertical_align.or(base.vertical_align),
    }
}

/// Set (or with `None` remove) the background of a cell. An override is
/// remembered in the cell metadata so table-wide restyling leaves the
/// cell alone.
pub fn set_table_cell_background_color(
    cell: &mut ContentModelTableCell,
    color: Option<&str>,
    is_color_override: bool,
) -> Result<()> {
    match color {
        Some(color) => cell.format.set("background-color", color),
        None => {
            cell.format.remove("background-color");
        }
    }
    if is_color_override {
        update_metadata(
            &mut cell.dataset,
            &table_cell_metadata_definition(),
            |metadata: Option<TableCellMetadataFormat>| {
                let mut metadata = metadata.unwrap_or_default();
                metadata.bg_color_override = Some(true);
                Some(metadata)
            },
        )?;
    }
    cell.cached_element.clear();
    Ok(())
}

/// Restyle the whole table from its metadata, updated with `format`.
///
/// Borders, header row, first column, banded backgrounds and vertical
/// alignment are written onto the cells. Cells that carry a background or
/// alignment override keep theirs.
pub fn apply_table_format(
    table: &mut ContentModelTable,
    format: Option<TableMetadataFormat>,
) -> Result<()> {
    let applied = update_metadata(
        &mut table.dataset,
        &table_metadata_definition(),
        |current: Option<TableMetadataFormat>| {
            let base = merge_table_format(default_table_format(), current.unwrap_or_default());
            Some(match format {
                Some(format) => merge_table_format(base, format),
                None => base,
            })
        },
    )?
    .unwrap_or_else(default_table_format);

    table.format.set("border-collapse", "collapse");
    table.cached_element.clear();

    let has_header_row = applied.has_header_row.unwrap_or(false);
    let has_first_column = applied.has_first_column.unwrap_or(false);
    let has_banded_rows = applied.has_banded_rows.unwrap_or(false);
    let has_banded_columns = applied.has_banded_columns.unwrap_or(false);

    for (row_index, row) in table.rows.iter_mut().enumerate() {
        row.cached_element.clear();
        for (column, cell) in row.cells.iter_mut().enumerate() {
            let overrides: TableCellMetadataFormat =
                get_metadata(&cell.dataset, &table_cell_metadata_definition()).unwrap_or_default();

            let top = if row_index == 0 {
                &applied.top_border_color
            } else {
                &applied.bottom_border_color
            };
            for (property, color) in [
                ("border-top", top),
                ("border-bottom", &applied.bottom_border_color),
                ("border-left", &applied.vertical_border_color),
                ("border-right", &applied.vertical_border_color),
            ] {
                match color {
                    Some(color) => cell.format.set(property, format!("{BORDER_WIDTH} {color}")),
                    None => {
                        cell.format.remove(property);
                    }
                }
            }

            let is_header_row = has_header_row && row_index == 0;
            cell.is_header = is_header_row || (has_first_column && column == 0);

            if !overrides.bg_color_override.unwrap_or(false) {
                let background = if is_header_row {
                    applied.header_row_color.as_deref()
                } else if has_banded_rows {
                    band(row_index, &applied)
                } else if has_banded_columns {
                    band(column, &applied)
                } else {
                    None
                };
                set_table_cell_background_color(cell, background, false)?;
            }

            if !overrides.v_align_override.unwrap_or(false) {
                match &applied.vertical_align {
                    Some(align) => cell.format.set("vertical-align", align.as_str()),
                    None => {
                        cell.format.remove("vertical-align");
                    }
                }
            }
            cell.cached_element.clear();
        }
    }

    tracing::debug!(
        target: TARGET,
        has_header_row,
        has_first_column,
        has_banded_rows,
        has_banded_columns,
        "applied table format"
    );
    Ok(())
}

/// Banded background for the `index`th row or column, counting from 0.
fn band(index: usize, format: &TableMetadataFormat) -> Option<&str> {
    if index % 2 == 0 {
        format.bg_color_even.as_deref()
    } else {
        format.bg_color_odd.as_deref()
    }
}
