//! Collapsing border model (CSS 2.1 Section 17.6.2)
//!
//! Each cell edge is resolved against everything that meets there: the
//! neighbouring cell, the rows, the row groups, the `<col>` elements and the
//! table itself. Conflicts follow Section 17.6.2.1:
//!
//! 1. `hidden` wins outright and stops the search.
//! 2. `none` loses to everything.
//! 3. Wider borders win; equal widths are ordered by style.
//! 4. Same width and style: the box closer to the cell wins.
//!
//! The winning width is split between the two boxes sharing the edge for
//! layout (the top/left half gets the odd pixel) and painted whole.

use super::grid::{GridSlot, TableGrid};
use crate::error::Result;
use crate::geometry::{EdgeOffsets, Rect};
use crate::style::{BorderSet, BorderSide, BorderStyle, Rgba};
use crate::tree::{CellId, TableTree};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

/// Which kind of box a border came from
///
/// Ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BorderPrecedence {
  Table,
  Column,
  RowGroup,
  Row,
  Cell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
  Top,
  Right,
  Bottom,
  Left,
}

/// A candidate (or resolved) collapsed border
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CollapsedBorderValue {
  style: Option<BorderStyle>,
  width: i32,
  color: Rgba,
  precedence: BorderPrecedence,
}

impl CollapsedBorderValue {
  /// No border information at all; loses every comparison.
  pub const UNDEFINED: CollapsedBorderValue = CollapsedBorderValue {
    style: None,
    width: 0,
    color: Rgba::TRANSPARENT,
    precedence: BorderPrecedence::Table,
  };

  pub fn new(side: BorderSide, precedence: BorderPrecedence) -> Self {
    Self {
      style: Some(side.style),
      width: side.used_width(),
      color: side.color,
      precedence,
    }
  }

  pub fn defined(&self) -> bool {
    self.style.is_some()
  }

  /// A border that will actually be drawn.
  pub fn exists(&self) -> bool {
    matches!(self.style, Some(style) if !style.is_invisible())
  }

  pub fn hidden(&self) -> bool {
    self.style == Some(BorderStyle::Hidden)
  }

  pub fn style(&self) -> Option<BorderStyle> {
    self.style
  }

  pub fn width(&self) -> i32 {
    self.width
  }

  pub fn color(&self) -> Rgba {
    self.color
  }

  pub fn precedence(&self) -> BorderPrecedence {
    self.precedence
  }
}

/// Picks the winner of two conflicting borders.
///
/// Commutative except when both sides tie on width, style and precedence;
/// then the first argument wins.
///
/// # Examples
///
/// ```
/// use tablegrid::{compare_borders, BorderPrecedence, BorderSide, BorderStyle, CollapsedBorderValue, Rgba};
///
/// let cell = CollapsedBorderValue::new(BorderSide::solid(2, Rgba::RED), BorderPrecedence::Cell);
/// let table = CollapsedBorderValue::new(
///     BorderSide::new(1, BorderStyle::Dashed, Rgba::BLUE),
///     BorderPrecedence::Table,
/// );
/// assert_eq!(compare_borders(table, cell), cell);
/// ```
pub fn compare_borders(
  border1: CollapsedBorderValue,
  border2: CollapsedBorderValue,
) -> CollapsedBorderValue {
  if !border2.defined() {
    return border1;
  }
  if !border1.defined() {
    return border2;
  }

  if border1.hidden() {
    return border1;
  }
  if border2.hidden() {
    return border2;
  }

  if border2.style == Some(BorderStyle::None) {
    return border1;
  }
  if border1.style == Some(BorderStyle::None) {
    return border2;
  }

  if border1.width != border2.width {
    return if border1.width > border2.width {
      border1
    } else {
      border2
    };
  }

  if let (Some(s1), Some(s2)) = (border1.style, border2.style) {
    if s1 != s2 {
      return if s1.collapse_rank() < s2.collapse_rank() {
        border1
      } else {
        border2
      };
    }
  }

  if border1.precedence >= border2.precedence {
    border1
  } else {
    border2
  }
}

/// The four resolved edges of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellBorders {
  pub top: CollapsedBorderValue,
  pub right: CollapsedBorderValue,
  pub bottom: CollapsedBorderValue,
  pub left: CollapsedBorderValue,
}

impl CellBorders {
  pub fn side(&self, side: Side) -> CollapsedBorderValue {
    match side {
      Side::Top => self.top,
      Side::Right => self.right,
      Side::Bottom => self.bottom,
      Side::Left => self.left,
    }
  }

  /// Full widths, as painted.
  pub fn painting_widths(&self) -> EdgeOffsets {
    EdgeOffsets::new(
      self.top.width,
      self.right.width,
      self.bottom.width,
      self.left.width,
    )
  }

  /// The share of each edge this cell occupies in layout.
  pub fn layout_widths(&self) -> EdgeOffsets {
    EdgeOffsets::new(
      (self.top.width + 1) / 2,
      self.right.width / 2,
      self.bottom.width / 2,
      (self.left.width + 1) / 2,
    )
  }

  /// Grows a cell's border box by the part of the painted borders that lies
  /// outside it.
  pub fn expand_bounds(&self, bounds: Rect) -> Rect {
    let w = self.painting_widths();
    Rect {
      x: bounds.x - w.left / 2,
      y: bounds.y - w.top / 2,
      width: bounds.width + w.left / 2 + (w.right + 1) / 2,
      height: bounds.height + w.top / 2 + (w.bottom + 1) / 2,
    }
  }
}

/// One edge to paint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollapsedBorderSide {
  pub cell: CellId,
  pub side: Side,
  pub value: CollapsedBorderValue,
}

/// Resolved borders for every cell of a collapsed table
#[derive(Debug, Clone, Default)]
pub struct CollapsedBorders {
  cells: FxHashMap<CellId, CellBorders>,
}

impl CollapsedBorders {
  pub fn resolve(tree: &TableTree, grid: &TableGrid, log_borders: bool) -> Result<Self> {
    let resolver = Resolver { tree, grid };
    let mut cells = FxHashMap::default();
    for section in grid.sections() {
      for &row in section.row_ids() {
        for &id in &tree.row(row)?.cells {
          if grid.cell(id).is_none() {
            continue;
          }
          let borders = CellBorders {
            top: resolver.top(id)?,
            right: resolver.right(id)?,
            bottom: resolver.bottom(id)?,
            left: resolver.left(id)?,
          };
          if log_borders {
            log::trace!(
              target: "tablegrid::collapse",
              "cell {:?}: top {:?} right {:?} bottom {:?} left {:?}",
              id,
              borders.top,
              borders.right,
              borders.bottom,
              borders.left
            );
          }
          cells.insert(id, borders);
        }
      }
    }
    Ok(Self { cells })
  }

  pub fn get(&self, cell: CellId) -> Option<&CellBorders> {
    self.cells.get(&cell)
  }

  pub fn layout_widths(&self, cell: CellId) -> EdgeOffsets {
    self
      .cells
      .get(&cell)
      .map_or(EdgeOffsets::ZERO, CellBorders::layout_widths)
  }

  pub fn painting_widths(&self, cell: CellId) -> EdgeOffsets {
    self
      .cells
      .get(&cell)
      .map_or(EdgeOffsets::ZERO, CellBorders::painting_widths)
  }

  /// Visible edges in painting order (cells in row order, each cell top,
  /// right, bottom, left). An edge shared by two cells that resolved to the
  /// same value along the same grid line is listed once.
  pub fn collect_sides(&self, grid: &TableGrid) -> Vec<CollapsedBorderSide> {
    let mut seen = FxHashSet::default();
    let mut out = Vec::new();
    let mut row_offset = 0;
    for section in grid.sections() {
      for (r, data) in section.rows().iter().enumerate() {
        for slot in data.slots() {
          let GridSlot::Cell(id) = *slot else {
            continue;
          };
          let Some(placed) = grid.cell(id) else {
            continue;
          };
          if placed.row != r {
            continue;
          }
          let Some(borders) = self.cells.get(&id) else {
            continue;
          };
          let row = row_offset + r;
          let col = grid.eff_col(placed);
          let span = grid.eff_span(placed);
          let edges = [
            (Side::Top, EdgeKey::horizontal(row, col, span)),
            (Side::Right, EdgeKey::vertical(col + span, row, placed.rowspan)),
            (Side::Bottom, EdgeKey::horizontal(row + placed.rowspan, col, span)),
            (Side::Left, EdgeKey::vertical(col, row, placed.rowspan)),
          ];
          for (side, key) in edges {
            let value = borders.side(side);
            if value.exists() && seen.insert((key, value)) {
              out.push(CollapsedBorderSide {
                cell: id,
                side,
                value,
              });
            }
          }
        }
      }
      row_offset += section.num_rows();
    }
    out
  }
}

/// A stretch of a grid line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct EdgeKey {
  horizontal: bool,
  line: usize,
  start: usize,
  len: usize,
}

impl EdgeKey {
  fn horizontal(line: usize, start: usize, len: usize) -> Self {
    Self {
      horizontal: true,
      line,
      start,
      len,
    }
  }

  fn vertical(line: usize, start: usize, len: usize) -> Self {
    Self {
      horizontal: false,
      line,
      start,
      len,
    }
  }
}

struct Resolver<'a> {
  tree: &'a TableTree,
  grid: &'a TableGrid,
}

/// Folds the next candidate in; a hidden result ends the chain.
macro_rules! merge {
  ($result:ident, $candidate:expr) => {{
    $result = compare_borders($result, $candidate);
    if $result.hidden() {
      return Ok($result);
    }
  }};
}

impl Resolver<'_> {
  fn cell_side(&self, cell: CellId, side: Side) -> Result<CollapsedBorderValue> {
    let border = &self.tree.cell(cell)?.style.border;
    Ok(CollapsedBorderValue::new(
      pick(border, side),
      BorderPrecedence::Cell,
    ))
  }

  fn row_side(&self, section: usize, row: usize, side: Side) -> Result<CollapsedBorderValue> {
    match self.grid.section(section).row_id(row) {
      Some(id) => Ok(CollapsedBorderValue::new(
        pick(&self.tree.row(id)?.style.border, side),
        BorderPrecedence::Row,
      )),
      None => Ok(CollapsedBorderValue::UNDEFINED),
    }
  }

  fn section_side(&self, section: usize, side: Side) -> Result<CollapsedBorderValue> {
    let id = self.grid.section(section).id;
    Ok(CollapsedBorderValue::new(
      pick(&self.tree.section(id)?.style.border, side),
      BorderPrecedence::RowGroup,
    ))
  }

  fn col_side(&self, col: usize, side: Side) -> CollapsedBorderValue {
    self
      .tree
      .col_element(col)
      .map_or(CollapsedBorderValue::UNDEFINED, |c| {
        CollapsedBorderValue::new(pick(&c.border, side), BorderPrecedence::Column)
      })
  }

  fn table_side(&self, side: Side) -> CollapsedBorderValue {
    CollapsedBorderValue::new(
      pick(&self.tree.style().border, side),
      BorderPrecedence::Table,
    )
  }

  fn left(&self, cell: CellId) -> Result<CollapsedBorderValue> {
    let Some(g) = self.grid.cell(cell).copied() else {
      return Ok(CollapsedBorderValue::UNDEFINED);
    };
    let mut result = self.cell_side(cell, Side::Left)?;

    if let Some(prev) = self.grid.cell_left(cell) {
      merge!(result, self.cell_side(prev, Side::Right)?);
    } else if g.col == 0 {
      merge!(result, self.row_side(g.section, g.row, Side::Left)?);
      merge!(result, self.section_side(g.section, Side::Left)?);
    }

    merge!(result, self.col_side(g.col, Side::Left));
    if g.col > 0 {
      merge!(result, self.col_side(g.col - 1, Side::Right));
    }
    if g.col == 0 {
      merge!(result, self.table_side(Side::Left));
    }
    Ok(result)
  }

  fn right(&self, cell: CellId) -> Result<CollapsedBorderValue> {
    let Some(g) = self.grid.cell(cell).copied() else {
      return Ok(CollapsedBorderValue::UNDEFINED);
    };
    let last_col = g.col + g.colspan - 1;
    let in_last_column =
      self.grid.col_to_eff_col(last_col) + 1 == self.grid.num_eff_cols();
    let mut result = self.cell_side(cell, Side::Right)?;

    if !in_last_column {
      if let Some(next) = self.grid.cell_right(cell) {
        merge!(result, self.cell_side(next, Side::Left)?);
      }
    } else {
      merge!(result, self.row_side(g.section, g.row, Side::Right)?);
      merge!(result, self.section_side(g.section, Side::Right)?);
    }

    merge!(result, self.col_side(last_col, Side::Right));
    if !in_last_column {
      merge!(result, self.col_side(g.col + g.colspan, Side::Left));
    } else {
      merge!(result, self.table_side(Side::Right));
    }
    Ok(result)
  }

  fn top(&self, cell: CellId) -> Result<CollapsedBorderValue> {
    let Some(g) = self.grid.cell(cell).copied() else {
      return Ok(CollapsedBorderValue::UNDEFINED);
    };
    let mut result = self.cell_side(cell, Side::Top)?;

    let prev = self.grid.cell_above(cell);
    if let Some(prev) = prev {
      merge!(result, self.cell_side(prev, Side::Bottom)?);
    }

    merge!(result, self.row_side(g.section, g.row, Side::Top)?);

    if let Some(prev_g) = prev.and_then(|p| self.grid.cell(p)) {
      let (section, row) = if prev_g.section == g.section {
        (g.section, g.row.checked_sub(1))
      } else {
        (
          prev_g.section,
          self.grid.section(prev_g.section).num_rows().checked_sub(1),
        )
      };
      if let Some(row) = row {
        merge!(result, self.row_side(section, row, Side::Bottom)?);
      }
    }

    let mut outer_edge = false;
    if g.row == 0 {
      merge!(result, self.section_side(g.section, Side::Top)?);
      match self.grid.section_above(g.section, false) {
        Some(above) => merge!(result, self.section_side(above, Side::Bottom)?),
        None => outer_edge = true,
      }
    }

    if outer_edge {
      merge!(result, self.col_side(g.col, Side::Top));
      merge!(result, self.table_side(Side::Top));
    }
    Ok(result)
  }

  fn bottom(&self, cell: CellId) -> Result<CollapsedBorderValue> {
    let Some(g) = self.grid.cell(cell).copied() else {
      return Ok(CollapsedBorderValue::UNDEFINED);
    };
    let mut result = self.cell_side(cell, Side::Bottom)?;

    let next = self.grid.cell_below(cell);
    if let Some(next) = next {
      merge!(result, self.cell_side(next, Side::Top)?);
    }

    merge!(result, self.row_side(g.section, g.row, Side::Bottom)?);

    if let Some(next_g) = next.and_then(|n| self.grid.cell(n)) {
      merge!(result, self.row_side(next_g.section, next_g.row, Side::Top)?);
    }

    let mut outer_edge = false;
    if g.row + g.rowspan >= self.grid.section(g.section).num_rows() {
      merge!(result, self.section_side(g.section, Side::Bottom)?);
      match self.grid.section_below(g.section, false) {
        Some(below) => merge!(result, self.section_side(below, Side::Top)?),
        None => outer_edge = true,
      }
    }

    if outer_edge {
      merge!(result, self.col_side(g.col, Side::Bottom));
      merge!(result, self.table_side(Side::Bottom));
    }
    Ok(result)
  }
}

fn pick(border: &BorderSet, side: Side) -> BorderSide {
  match side {
    Side::Top => border.top,
    Side::Right => border.right,
    Side::Bottom => border.bottom,
    Side::Left => border.left,
  }
}
