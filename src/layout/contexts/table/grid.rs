//! Table grid and effective-column model
//!
//! Cells are placed into a per-section grid of *effective* columns. An
//! effective column stands for one or more markup columns that no cell
//! boundary falls between; it is split as soon as a cell needs a boundary
//! inside it. Placement follows the KHTML algorithm (CSS 2.1 Section 17.5):
//! cells fill the first free slot at or after the row cursor, columns are
//! split or appended as the colspan demands, and every position a cell covers
//! is marked either with the cell itself (first column, every spanned row) or
//! with [`GridSlot::Spanned`].
//!
//! Malformed markup never fails: a span running into an earlier cell skips the
//! positions already taken, ragged rows leave [`GridSlot::Empty`] holes, and
//! rowspans are clipped at the end of their section.

use crate::error::Result;
use crate::style::SectionRole;
use crate::tree::{CellId, RowId, SectionId, TableTree};
use rustc_hash::FxHashMap;

/// One position of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridSlot {
  /// No cell covers this position
  #[default]
  Empty,
  /// Covered by a cell that originates to the left
  Spanned,
  /// First column of a cell, repeated for every row it spans
  Cell(CellId),
}

impl GridSlot {
  pub fn is_occupied(self) -> bool {
    !matches!(self, GridSlot::Empty)
  }

  pub fn cell(self) -> Option<CellId> {
    match self {
      GridSlot::Cell(id) => Some(id),
      _ => None,
    }
  }
}

/// An effective column and the number of markup columns it stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnData {
  pub span: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowData {
  slots: Vec<GridSlot>,
}

impl RowData {
  pub fn slots(&self) -> &[GridSlot] {
    &self.slots
  }
}

/// The grid of one row group
#[derive(Debug, Clone)]
pub struct SectionGrid {
  pub id: SectionId,
  pub role: SectionRole,
  rows: Vec<RowData>,
  row_ids: Vec<RowId>,
}

impl SectionGrid {
  pub fn num_rows(&self) -> usize {
    self.rows.len()
  }

  pub fn rows(&self) -> &[RowData] {
    &self.rows
  }

  pub fn row_id(&self, row: usize) -> Option<RowId> {
    self.row_ids.get(row).copied()
  }

  pub fn row_ids(&self) -> &[RowId] {
    &self.row_ids
  }

  pub fn cell_at(&self, row: usize, eff_col: usize) -> GridSlot {
    self
      .rows
      .get(row)
      .and_then(|r| r.slots.get(eff_col))
      .copied()
      .unwrap_or_default()
  }

  pub fn is_header(&self) -> bool {
    self.role == SectionRole::Header
  }

  pub fn is_footer(&self) -> bool {
    self.role == SectionRole::Footer
  }
}

/// Where a placed cell ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
  /// Index into [`TableGrid::sections`]
  pub section: usize,
  /// Row index within the section
  pub row: usize,
  /// Markup column (not the effective column)
  pub col: usize,
  pub colspan: usize,
  /// Rowspan after clipping to the section
  pub rowspan: usize,
}

#[derive(Debug, Clone, Default)]
pub struct TableGrid {
  columns: Vec<ColumnData>,
  sections: Vec<SectionGrid>,
  cells: FxHashMap<CellId, GridCell>,
  rows: FxHashMap<RowId, (usize, usize)>,
}

impl TableGrid {
  pub fn new() -> Self {
    Self::default()
  }

  /// Places every cell of `tree` in document order.
  pub fn build(tree: &TableTree) -> Result<TableGrid> {
    let mut grid = TableGrid::new();
    for &section_id in tree.sections() {
      let section = tree.section(section_id)?;
      let s = grid.push_section(section_id, section.role(), section.rows.clone());
      for (r, &row_id) in section.rows.iter().enumerate() {
        let mut cursor = 0;
        for &cell_id in &tree.row(row_id)?.cells {
          let style = &tree.cell(cell_id)?.style;
          cursor = grid.place_cell(s, r, cursor, cell_id, style.colspan(), style.rowspan());
        }
      }
    }
    log::debug!(
      target: "tablegrid::grid",
      "grid built: {} sections, {} effective columns, {} cells",
      grid.sections.len(),
      grid.num_eff_cols(),
      grid.cells.len()
    );
    Ok(grid)
  }

  // ---- effective columns ----

  pub fn num_eff_cols(&self) -> usize {
    self.columns.len()
  }

  pub fn columns(&self) -> &[ColumnData] {
    &self.columns
  }

  pub fn span_of_eff_col(&self, eff_col: usize) -> usize {
    self.columns.get(eff_col).map_or(1, |c| c.span)
  }

  /// Markup column to effective column: accumulate spans until `col` is
  /// reached or passed. Columns past the grid map to `num_eff_cols()`.
  pub fn col_to_eff_col(&self, col: usize) -> usize {
    let mut c = 0;
    let mut i = 0;
    while c < col && i < self.columns.len() {
      c += self.columns[i].span;
      i += 1;
    }
    i
  }

  /// Effective column to the first markup column it covers.
  pub fn eff_col_to_col(&self, eff_col: usize) -> usize {
    self.columns.iter().take(eff_col).map(|c| c.span).sum()
  }

  /// Adds an effective column at the end, padding every row.
  pub fn append_column(&mut self, span: usize) {
    self.columns.push(ColumnData { span });
    let n = self.columns.len();
    for section in &mut self.sections {
      for row in &mut section.rows {
        if row.slots.len() < n {
          row.slots.resize(n, GridSlot::Empty);
        }
      }
    }
  }

  /// Splits effective column `pos` so that its first `first_span` markup
  /// columns become a column of their own.
  pub fn split_column(&mut self, pos: usize, first_span: usize) {
    debug_assert!(pos < self.columns.len(), "split past the last column");
    debug_assert!(first_span < self.columns[pos].span);
    self.columns.insert(pos, ColumnData { span: first_span });
    self.columns[pos + 1].span -= first_span;

    for section in &mut self.sections {
      for row in &mut section.rows {
        let carried = if row.slots[pos].is_occupied() {
          GridSlot::Spanned
        } else {
          GridSlot::Empty
        };
        row.slots.insert(pos + 1, carried);
      }
    }
  }

  // ---- placement ----

  fn push_section(&mut self, id: SectionId, role: SectionRole, row_ids: Vec<RowId>) -> usize {
    let index = self.sections.len();
    let width = self.columns.len();
    for (r, row_id) in row_ids.iter().enumerate() {
      self.rows.insert(*row_id, (index, r));
    }
    self.sections.push(SectionGrid {
      id,
      role,
      rows: vec![
        RowData {
          slots: vec![GridSlot::Empty; width]
        };
        row_ids.len()
      ],
      row_ids,
    });
    index
  }

  /// Places `cell` in `row` of `section`, starting the free-slot search at
  /// effective column `cursor`. Returns the cursor for the next cell.
  pub fn place_cell(
    &mut self,
    section: usize,
    row: usize,
    cursor: usize,
    cell: CellId,
    colspan: usize,
    rowspan: usize,
  ) -> usize {
    let num_rows = self.sections[section].rows.len();
    debug_assert!(row < num_rows, "row outside its section");
    let rowspan = rowspan.max(1).min(num_rows - row);
    let colspan = colspan.max(1);

    let mut c = cursor;
    while c < self.columns.len() && self.sections[section].rows[row].slots[c].is_occupied() {
      c += 1;
    }
    let origin = c;

    let mut remaining = colspan;
    let mut mark = GridSlot::Cell(cell);
    while remaining > 0 {
      let current = if c >= self.columns.len() {
        self.append_column(1);
        1
      } else {
        if remaining < self.columns[c].span {
          self.split_column(c, remaining);
        }
        self.columns[c].span
      };
      for r in row..row + rowspan {
        let slot = &mut self.sections[section].rows[r].slots[c];
        if !slot.is_occupied() {
          *slot = mark;
        }
      }
      c += 1;
      remaining -= current;
      mark = GridSlot::Spanned;
    }

    self.cells.insert(
      cell,
      GridCell {
        section,
        row,
        col: self.eff_col_to_col(origin),
        colspan,
        rowspan,
      },
    );
    c
  }

  // ---- lookup ----

  pub fn sections(&self) -> &[SectionGrid] {
    &self.sections
  }

  pub fn section(&self, index: usize) -> &SectionGrid {
    &self.sections[index]
  }

  pub fn cell(&self, cell: CellId) -> Option<&GridCell> {
    self.cells.get(&cell)
  }

  /// `(section index, row index)` of a row.
  pub fn row_position(&self, row: RowId) -> Option<(usize, usize)> {
    self.rows.get(&row).copied()
  }

  pub fn cell_at(&self, section: usize, row: usize, eff_col: usize) -> GridSlot {
    self
      .sections
      .get(section)
      .map(|s| s.cell_at(row, eff_col))
      .unwrap_or_default()
  }

  /// First effective column of a placed cell.
  pub fn eff_col(&self, cell: &GridCell) -> usize {
    self.col_to_eff_col(cell.col)
  }

  /// Number of effective columns a placed cell covers.
  pub fn eff_span(&self, cell: &GridCell) -> usize {
    self.col_to_eff_col(cell.col + cell.colspan) - self.col_to_eff_col(cell.col)
  }

  /// Cells whose last spanned row is `row`, in column order.
  pub fn cells_ending_in_row(&self, section: usize, row: usize) -> Vec<CellId> {
    let grid = &self.sections[section];
    let last = grid.num_rows().saturating_sub(1);
    let Some(data) = grid.rows.get(row) else {
      return Vec::new();
    };
    data
      .slots
      .iter()
      .enumerate()
      .filter_map(|(c, slot)| {
        let id = slot.cell()?;
        if row < last && grid.cell_at(row + 1, c) == GridSlot::Cell(id) {
          None
        } else {
          Some(id)
        }
      })
      .collect()
  }

  pub fn section_above(&self, section: usize, skip_empty: bool) -> Option<usize> {
    (0..section)
      .rev()
      .find(|&s| !skip_empty || self.sections[s].num_rows() > 0)
  }

  pub fn section_below(&self, section: usize, skip_empty: bool) -> Option<usize> {
    (section + 1..self.sections.len()).find(|&s| !skip_empty || self.sections[s].num_rows() > 0)
  }

  /// The real cell at a position, walking left over spanned slots.
  fn origin_cell_at(&self, section: usize, row: usize, eff_col: usize) -> Option<CellId> {
    let mut c = eff_col;
    loop {
      match self.cell_at(section, row, c) {
        GridSlot::Cell(id) => return Some(id),
        GridSlot::Empty => return None,
        GridSlot::Spanned if c > 0 => c -= 1,
        GridSlot::Spanned => return None,
      }
    }
  }

  pub fn cell_above(&self, cell: CellId) -> Option<CellId> {
    let g = self.cells.get(&cell)?;
    let (section, row) = if g.row > 0 {
      (g.section, g.row - 1)
    } else {
      let s = self.section_above(g.section, true)?;
      (s, self.sections[s].num_rows() - 1)
    };
    self.origin_cell_at(section, row, self.col_to_eff_col(g.col))
  }

  pub fn cell_below(&self, cell: CellId) -> Option<CellId> {
    let g = self.cells.get(&cell)?;
    let last = g.row + g.rowspan - 1;
    let (section, row) = if last + 1 < self.sections[g.section].num_rows() {
      (g.section, last + 1)
    } else {
      (self.section_below(g.section, true)?, 0)
    };
    self.origin_cell_at(section, row, self.col_to_eff_col(g.col))
  }

  pub fn cell_left(&self, cell: CellId) -> Option<CellId> {
    let g = self.cells.get(&cell)?;
    let eff = self.col_to_eff_col(g.col);
    if eff == 0 {
      return None;
    }
    self.origin_cell_at(g.section, g.row, eff - 1)
  }

  pub fn cell_right(&self, cell: CellId) -> Option<CellId> {
    let g = self.cells.get(&cell)?;
    let eff = self.col_to_eff_col(g.col + g.colspan);
    if eff >= self.num_eff_cols() {
      return None;
    }
    self.cell_at(g.section, g.row, eff).cell()
  }

  /// Debug rendering of a section, one line per row (`#` cell, `-` spanned,
  /// `.` empty).
  pub fn dump_section(&self, section: usize) -> String {
    let mut out = String::new();
    for row in &self.sections[section].rows {
      for slot in &row.slots {
        out.push(match slot {
          GridSlot::Empty => '.',
          GridSlot::Spanned => '-',
          GridSlot::Cell(_) => '#',
        });
      }
      out.push('\n');
    }
    out
  }
}
