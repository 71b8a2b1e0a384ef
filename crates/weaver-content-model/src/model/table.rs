use serde::Serialize;

use super::CachedElement;
use super::block::ContentModelBlock;
use super::group::{BlockGroupType, ContentModelBlockGroup};
use crate::format::{Dataset, Format};

/// A rectangular grid of cells. Merged cells are represented by
/// continuation cells flagged `span_left` / `span_above`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContentModelTable {
    pub rows: Vec<ContentModelTableRow>,
    /// Column widths in px, one per column. Zero means unknown.
    pub widths: Vec<f64>,
    pub format: Format,
    pub dataset: Dataset,
    #[serde(skip)]
    pub cached_element: CachedElement,
}

impl ContentModelTable {
    pub fn new(format: Format, dataset: Dataset) -> Self {
        Self {
            format,
            dataset,
            ..Default::default()
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, |row| row.cells.len())
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&ContentModelTableCell> {
        self.rows.get(row)?.cells.get(column)
    }

    pub fn cell_mut(&mut self, row: usize, column: usize) -> Option<&mut ContentModelTableCell> {
        self.rows.get_mut(row)?.cells.get_mut(column)
    }

    /// Every row has the same number of cells.
    pub fn is_rectangular(&self) -> bool {
        let columns = self.column_count();
        self.rows.iter().all(|row| row.cells.len() == columns)
    }

    pub fn clear_cached_elements(&mut self) {
        self.cached_element.clear();
        for row in &mut self.rows {
            row.cached_element.clear();
            for cell in &mut row.cells {
                cell.cached_element.clear();
                for block in &mut cell.blocks {
                    block.clear_cached_elements();
                }
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContentModelTableRow {
    pub cells: Vec<ContentModelTableCell>,
    /// Row height in px. Zero means unknown.
    pub height: f64,
    pub format: Format,
    #[serde(skip)]
    pub cached_element: CachedElement,
}

impl ContentModelTableRow {
    pub fn new(height: f64) -> Self {
        Self {
            height,
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContentModelTableCell {
    pub blocks: Vec<ContentModelBlock>,
    pub format: Format,
    pub dataset: Dataset,
    /// Continuation of the cell to the left.
    pub span_left: bool,
    /// Continuation of the cell above.
    pub span_above: bool,
    pub is_header: bool,
    pub is_selected: bool,
    #[serde(skip)]
    pub cached_element: CachedElement,
}

impl ContentModelTableCell {
    pub fn new(span_left: bool, span_above: bool, is_header: bool, format: Format) -> Self {
        Self {
            span_left,
            span_above,
            is_header,
            format,
            ..Default::default()
        }
    }

    /// A cell that renders its own element rather than extending a neighbour.
    pub fn is_governing(&self) -> bool {
        !self.span_left && !self.span_above
    }
}

impl ContentModelBlockGroup for ContentModelTableCell {
    fn block_group_type(&self) -> BlockGroupType {
        BlockGroupType::TableCell
    }

    fn blocks(&self) -> &[ContentModelBlock] {
        &self.blocks
    }

    fn blocks_mut(&mut self) -> &mut Vec<ContentModelBlock> {
        &mut self.blocks
    }
}
