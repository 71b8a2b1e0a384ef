use weaver_content_dom::style::format_px;
use weaver_content_dom::{Dom, NodeId, TableSelection};

use super::ModelToDomContext;
use super::block::{apply_dataset, apply_format, reuse_cached_element};
use super::context::NodePairKind;
use crate::model::ContentModelTable;

const TARGET: &str = "weaver::content_model::model_to_dom";

/// Number of cells a governing cell at (`row`, `column`) covers in each
/// direction, counted from the continuation cells next to it.
fn spans(table: &ContentModelTable, row: usize, column: usize) -> (usize, usize) {
    let mut col_span = 1;
    while table
        .cell(row, column + col_span)
        .is_some_and(|cell| cell.span_left)
    {
        col_span += 1;
    }
    let mut row_span = 1;
    while table
        .cell(row + row_span, column)
        .is_some_and(|cell| cell.span_above)
    {
        row_span += 1;
    }
    (col_span, row_span)
}

pub fn handle_table(
    dom: &mut Dom,
    parent: NodeId,
    table: &mut ContentModelTable,
    ref_node: Option<NodeId>,
    context: &mut ModelToDomContext<'_>,
) -> Option<NodeId> {
    if table.rows.iter().all(|row| row.cells.is_empty()) {
        tracing::trace!(target: TARGET, "skipping empty table");
        return ref_node;
    }
    let handlers = context.handlers;

    let cached = table
        .cached_element
        .get()
        .filter(|_| context.allow_cache_element);
    let (element, ref_node) = match cached {
        Some(element) => {
            let ref_node = reuse_cached_element(dom, parent, element, ref_node);
            dom.clear_children(element);
            (element, ref_node)
        }
        None => {
            let element = dom.create_element("table");
            dom.insert_before(parent, element, ref_node);
            apply_format(dom, element, &table.format);
            apply_dataset(dom, element, &table.dataset);
            if context.allow_cache_element {
                table.cached_element.set(Some(element));
            }
            (element, ref_node)
        }
    };

    let tbody = dom.create_element("tbody");
    dom.append_child(element, tbody);

    let mut selected: Option<(usize, usize, usize, usize)> = None;
    for row_index in 0..table.rows.len() {
        let cached_tr = table.rows[row_index]
            .cached_element
            .get()
            .filter(|_| context.allow_cache_element);
        let tr = match cached_tr {
            Some(tr) => {
                dom.clear_children(tr);
                tr
            }
            None => {
                let tr = dom.create_element("tr");
                let row = &mut table.rows[row_index];
                apply_format(dom, tr, &row.format);
                if row.height > 0.0 {
                    dom.set_style_property(tr, "height", &format_px(row.height));
                }
                if context.allow_cache_element {
                    row.cached_element.set(Some(tr));
                }
                tr
            }
        };
        dom.append_child(tbody, tr);

        for column in 0..table.rows[row_index].cells.len() {
            let (col_span, row_span) = spans(table, row_index, column);
            let width: f64 = table.widths.iter().skip(column).take(col_span).sum();
            let cell = &mut table.rows[row_index].cells[column];

            if cell.is_selected {
                selected = Some(match selected {
                    Some((r0, c0, r1, c1)) => {
                        (r0.min(row_index), c0.min(column), r1.max(row_index), c1.max(column))
                    }
                    None => (row_index, column, row_index, column),
                });
            }
            if !cell.is_governing() {
                continue;
            }

            let tag = if cell.is_header { "th" } else { "td" };
            let cached_td = cell
                .cached_element
                .get()
                .filter(|&td| context.allow_cache_element && dom.has_tag(td, tag));
            let td = match cached_td {
                Some(td) => td,
                None => {
                    let td = dom.create_element(tag);
                    if width > 0.0 {
                        dom.set_style_property(td, "width", &format_px(width));
                    }
                    apply_format(dom, td, &cell.format);
                    apply_dataset(dom, td, &cell.dataset);
                    if context.allow_cache_element {
                        cell.cached_element.set(Some(td));
                    }
                    td
                }
            };
            dom.append_child(tr, td);
            for (name, span) in [("colspan", col_span), ("rowspan", row_span)] {
                if span > 1 {
                    dom.set_attribute(td, name, span.to_string());
                } else {
                    dom.remove_attribute(td, name);
                }
            }

            handlers.block_group_children(dom, td, cell, context);
        }
    }

    if let Some((first_row, first_column, last_row, last_column)) = selected {
        if context.table_selection.is_none() {
            context.table_selection = Some(TableSelection {
                table: element,
                first_column,
                first_row,
                last_column,
                last_row,
            });
        }
    }

    tracing::trace!(
        target: TARGET,
        rows = table.row_count(),
        columns = table.column_count(),
        "wrote table"
    );
    context.record(NodePairKind::Table, element, None);
    ref_node
}
