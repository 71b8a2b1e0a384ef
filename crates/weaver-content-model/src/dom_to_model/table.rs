use weaver_content_dom::style::parse_px;
use weaver_content_dom::{Dom, DomSelection, NodeId, TableSelection};

use super::DomToModelContext;
use super::child::handle_selection_state;
use super::entity::process_fake_entity;
use crate::format::{Format, FormatFamily, parse_declarations};
use crate::metadata::has_metadata;
use crate::model::{
    CachedElement, ContentModelBlock, ContentModelBlockGroup, ContentModelTable,
    ContentModelTableCell, ContentModelTableRow,
};

const TARGET: &str = "weaver::content_model::dom_to_model";

/// Tables the editor wrote carry editing metadata. Anything else is only
/// modelled once the selection reaches into it.
fn should_model_table(dom: &Dom, element: NodeId, context: &DomToModelContext<'_>) -> bool {
    !context.freeze_foreign_tables
        || context.is_in_selection
        || has_metadata(&dom.dataset(element))
        || context
            .selection
            .is_some_and(|selection| selection.intersects(dom, element))
}

/// `<tr>` elements of a table, looking through `thead`/`tbody`/`tfoot`.
fn collect_rows(dom: &Dom, table: NodeId) -> Vec<NodeId> {
    let mut rows = vec![];
    for &child in dom.children(table) {
        match dom.tag(child) {
            Some("tr") => rows.push(child),
            Some("thead" | "tbody" | "tfoot") => rows.extend(
                dom.children(child)
                    .iter()
                    .copied()
                    .filter(|&row| dom.has_tag(row, "tr")),
            ),
            _ => {}
        }
    }
    rows
}

/// Spans past these limits are clamped, as browsers do.
const MAX_COLSPAN: usize = 1000;
const MAX_ROWSPAN: usize = 65534;

/// A `colspan`/`rowspan` value in `1..=max`. Leading digits are read the way
/// browsers read them, so `"2px"` is 2 and an overflowing number is `max`.
fn span_attribute(dom: &Dom, element: NodeId, name: &str, max: usize) -> usize {
    let Some(value) = dom.attribute(element, name) else {
        return 1;
    };
    let value = value.trim();
    let digits = &value[..value.find(|c: char| !c.is_ascii_digit()).unwrap_or(value.len())];
    if digits.is_empty() {
        return 1;
    }
    digits.parse::<usize>().map_or(max, |span| span.clamp(1, max))
}

fn in_table_selection(selection: Option<&TableSelection>, row: usize, column: usize) -> bool {
    selection.is_some_and(|s| {
        (s.first_row..=s.last_row).contains(&row) && (s.first_column..=s.last_column).contains(&column)
    })
}

/// Table format, minus the size properties derived from column widths and
/// row heights.
fn parse_table_format(dom: &Dom, element: NodeId) -> Format {
    let mut format = Format::new();
    parse_declarations(&dom.style(element), FormatFamily::Table, &mut format);
    format.remove("width");
    format.remove("height");
    format
}

pub fn process_table(
    group: &mut dyn ContentModelBlockGroup,
    element: NodeId,
    context: &mut DomToModelContext<'_>,
) {
    let dom = context.dom;
    if !should_model_table(dom, element, context) {
        tracing::trace!(target: TARGET, "freezing foreign table");
        return process_fake_entity(group, element, context);
    }

    let processors = context.processors;
    let table_selection = match context.selection {
        Some(DomSelection::Table(selection)) if selection.table == element => Some(selection),
        _ => None,
    };

    let mut table = ContentModelTable::new(parse_table_format(dom, element), dom.dataset(element));
    if context.allow_cache_element {
        table.cached_element = CachedElement::new(element);
    }

    let rows = collect_rows(dom, element);
    let mut grid: Vec<Vec<Option<ContentModelTableCell>>> = vec![vec![]; rows.len()];
    let mut cell_widths: Vec<(usize, usize, f64)> = vec![];

    for (row_index, &tr) in rows.iter().enumerate() {
        let mut row = ContentModelTableRow::new(
            dom.style_property(tr, "height")
                .as_deref()
                .and_then(parse_px)
                .unwrap_or(0.0),
        );
        row.format = parse_table_format(dom, tr);
        if context.allow_cache_element {
            row.cached_element = CachedElement::new(tr);
        }
        table.rows.push(row);

        let mut column = 0;
        let cells = dom.children(tr);
        for (cell_index, &td) in cells.iter().enumerate() {
            handle_selection_state(tr, cell_index, context);
            let is_header = match dom.tag(td) {
                Some("th") => true,
                Some("td") => false,
                _ => continue,
            };
            while grid[row_index].get(column).is_some_and(Option::is_some) {
                column += 1;
            }
            let col_span = span_attribute(dom, td, "colspan", MAX_COLSPAN);
            let row_span = span_attribute(dom, td, "rowspan", MAX_ROWSPAN).min(rows.len() - row_index);

            let mut format = parse_table_format(dom, td);
            if let Some(width) = dom.style_property(td, "width").as_deref().and_then(parse_px) {
                cell_widths.push((column, col_span, width));
            }
            format.remove("width");
            let mut cell = ContentModelTableCell::new(false, false, is_header, format);
            cell.dataset = dom.dataset(td);
            if context.allow_cache_element {
                cell.cached_element = CachedElement::new(td);
            }
            let selected_by_table = in_table_selection(table_selection.as_ref(), row_index, column);
            cell.is_selected = selected_by_table;

            context.stack_format(|context| {
                context.block_format = Format::new();
                parse_declarations(&dom.style(td), FormatFamily::Segment, &mut context.segment_format);
                let was_in_selection = context.is_in_selection;
                if selected_by_table {
                    context.is_in_selection = true;
                }
                context.isolate_list_format(|context| {
                    processors.child(&mut cell, td, context);
                });
                if selected_by_table {
                    context.is_in_selection = was_in_selection;
                }
            });

            for r in 0..row_span {
                for c in 0..col_span {
                    if r == 0 && c == 0 {
                        continue;
                    }
                    let mut continuation =
                        ContentModelTableCell::new(c > 0, r > 0, is_header, cell.format.clone());
                    continuation.dataset = cell.dataset.clone();
                    continuation.is_selected =
                        in_table_selection(table_selection.as_ref(), row_index + r, column.saturating_add(c));
                    place_cell(&mut grid[row_index + r], column.saturating_add(c), continuation);
                }
            }
            place_cell(&mut grid[row_index], column, cell);
            column = column.saturating_add(col_span);
        }
        handle_selection_state(tr, cells.len(), context);
    }

    let column_count = grid.iter().map(Vec::len).max().unwrap_or(0);
    for (row, cells) in table.rows.iter_mut().zip(grid) {
        row.cells = cells
            .into_iter()
            .chain(std::iter::repeat_with(|| None))
            .take(column_count)
            .map(Option::unwrap_or_default)
            .collect();
    }
    table.widths = infer_widths(column_count, &cell_widths);

    tracing::trace!(
        target: TARGET,
        rows = table.row_count(),
        columns = column_count,
        "table"
    );
    group.add_block(ContentModelBlock::Table(table));
}

fn place_cell(row: &mut Vec<Option<ContentModelTableCell>>, column: usize, cell: ContentModelTableCell) {
    if row.len() <= column {
        row.resize_with(column + 1, || None);
    }
    row[column] = Some(cell);
}

/// Column widths from cell widths. Single-column cells decide first; a
/// spanning cell then fills in the one column of its span still unknown.
fn infer_widths(column_count: usize, cell_widths: &[(usize, usize, f64)]) -> Vec<f64> {
    let mut widths = vec![0.0; column_count];
    for &(column, span, width) in cell_widths {
        if span == 1 && column < column_count && widths[column] == 0.0 {
            widths[column] = width;
        }
    }
    for &(column, span, width) in cell_widths {
        if span < 2 || column + span > column_count {
            continue;
        }
        let range = column..column + span;
        let unknown: Vec<usize> = range.clone().filter(|&c| widths[c] == 0.0).collect();
        if let &[only] = unknown.as_slice() {
            let known: f64 = range.map(|c| widths[c]).sum();
            if width > known {
                widths[only] = width - known;
            }
        }
    }
    widths
}
