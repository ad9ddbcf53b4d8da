//! Automatic table layout: column width distribution
//!
//! Implements the automatic table layout algorithm of CSS 2.1 Section
//! 17.5.2.2 the way KHTML (and Mozilla before it) does it:
//!
//! 1. Every effective column collects min/max widths and a declared width
//!    from its `<col>` element and from the single-column cells in it.
//! 2. Cells spanning several columns are folded in afterwards, narrowest
//!    span first, growing the *effective* min/max of the columns they cover.
//! 3. Table min/max widths are derived from the effective values, scaling
//!    percentage columns up so the percentages can actually be honoured.
//! 4. Once the table width is known, it is handed out in passes: min widths
//!    first, then percentage, fixed and auto columns, and any surplus (or
//!    deficit) is spread back over the columns.
//!
//! All arithmetic is integer and truncating; the order of the passes is what
//! makes the result pixel-exact with the browsers this follows.
//!
//! # References
//!
//! - CSS 2.1 Section 17.5.2.2: <https://www.w3.org/TR/CSS21/tables.html#auto-table-layout>

use super::dimensions::{ColumnInput, TableDimensions, TableWidths};
use super::grid::GridSlot;
use crate::style::{Length, MAX_WIDTH};
use crate::tree::CellId;

/// Width constraints of one effective column
///
/// `width`, `min_width` and `max_width` come from single-column cells and
/// `<col>` elements; the `eff_*` values additionally account for spanning
/// cells and are what distribution works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnConstraints {
  pub width: Length,
  pub eff_width: Length,
  pub min_width: i64,
  pub max_width: i64,
  pub eff_min_width: i64,
  pub eff_max_width: i64,
  /// Final width handed out by [`AutoTableLayout::layout`]
  pub calc_width: i64,
}

impl ColumnConstraints {
  pub fn new(min_width: i64, max_width: i64) -> Self {
    Self {
      width: Length::ZERO,
      eff_width: Length::ZERO,
      min_width,
      max_width,
      eff_min_width: 0,
      eff_max_width: 0,
      calc_width: 0,
    }
  }
}

impl Default for ColumnConstraints {
  fn default() -> Self {
    Self::new(1, 1)
  }
}

/// Column distribution for `table-layout: auto`
///
/// The margin-box variant differs in two ways: columns may collapse to zero
/// width, and a three-column table keeps its outer columns the same width so
/// the middle one stays centred.
#[derive(Debug, Clone)]
pub struct AutoTableLayout {
  min_col_width: i64,
  balance_sides: bool,
  columns: Vec<ColumnConstraints>,
  span_cells: Vec<CellId>,
}

impl Default for AutoTableLayout {
  fn default() -> Self {
    Self::new()
  }
}

impl AutoTableLayout {
  pub fn new() -> Self {
    Self {
      min_col_width: 1,
      balance_sides: false,
      columns: Vec::new(),
      span_cells: Vec::new(),
    }
  }

  /// Layout for page margin-box tables.
  pub fn for_margin_boxes() -> Self {
    Self {
      min_col_width: 0,
      balance_sides: true,
      ..Self::new()
    }
  }

  pub fn reset(&mut self) {
    self.columns.clear();
    self.span_cells.clear();
  }

  pub fn columns(&self) -> &[ColumnConstraints] {
    &self.columns
  }

  fn full_recalc(&mut self, input: &ColumnInput<'_>) {
    let grid = input.grid;
    let n = grid.num_eff_cols();
    self.columns = vec![ColumnConstraints::new(self.min_col_width, self.min_col_width); n];
    self.span_cells.clear();

    let mut c_col = 0;
    for col in input.tree.columns() {
      let span = col.span();
      let mut w = col.effective_width();
      if (w.is_fixed() || w.is_percent()) && w.value() == 0 {
        w = Length::ZERO;
      }
      let c_eff_col = grid.col_to_eff_col(c_col);
      if !w.is_variable() && span == 1 && c_eff_col < n && grid.span_of_eff_col(c_eff_col) == 1 {
        let layout = &mut self.columns[c_eff_col];
        layout.width = w;
        if w.is_fixed() && layout.max_width < w.value() {
          layout.max_width = w.value();
        }
      }
      c_col += span;
    }

    for eff_col in 0..n {
      self.recalc_column(input, eff_col);
    }
  }

  fn recalc_column(&mut self, input: &ColumnInput<'_>, eff_col: usize) {
    let min_col_width = self.min_col_width;
    let l = &mut self.columns[eff_col];

    for section in input.grid.sections() {
      for i in 0..section.num_rows() {
        let GridSlot::Cell(id) = section.cell_at(i, eff_col) else {
          continue;
        };
        let Some(cell) = input.cells.get(&id) else {
          continue;
        };

        if cell.colspan == 1 {
          l.min_width = l.min_width.max(min_col_width);
          l.max_width = l.max_width.max(min_col_width);
          l.min_width = l.min_width.max(cell.min_width);
          l.max_width = l.max_width.max(cell.max_width);

          let outer = cell.outer_style_or_col_width(input.tree);
          let w = outer.with_value(outer.value().clamp(0, MAX_WIDTH));
          match w {
            Length::Fixed(v) if v > 0 && !l.width.is_percent() => {
              if !l.width.is_fixed() || v > l.width.value() {
                l.width = w;
              }
              if v > l.max_width {
                l.max_width = v;
              }
            }
            Length::Percent(v) if v > 0 && (!l.width.is_percent() || v > l.width.value()) => {
              l.width = w;
            }
            _ => {}
          }
        } else {
          let origin_col = eff_col == 0 || section.cell_at(i, eff_col - 1) != GridSlot::Cell(id);
          // rowspanning cells are met once per row; count them once
          let origin_row = input.grid.cell(id).map_or(true, |g| g.row == i);
          if origin_col {
            l.min_width = l.min_width.max(min_col_width);
            l.max_width = l.max_width.max(min_col_width);
            if origin_row {
              self.span_cells.push(id);
            }
          }
        }
      }
    }

    l.max_width = l.max_width.max(l.min_width);
  }

  /// Folds spanning cells into the effective column widths. Returns the
  /// table max width implied by percentage spanning cells.
  fn calc_effective_width(&mut self, input: &ColumnInput<'_>) -> i64 {
    let mut t_max_width = 0i64;
    let n = self.columns.len();
    let hspacing = input.hspacing;
    let layout = &mut self.columns;

    for l in layout.iter_mut() {
      l.eff_width = l.width;
      l.eff_min_width = l.min_width;
      l.eff_max_width = l.max_width;
    }

    let cells = input.cells;
    // Stable, so equal spans keep document order.
    self
      .span_cells
      .sort_by_key(|id| cells.get(id).map_or(0, |c| c.colspan));

    for id in &self.span_cells {
      let Some(cell) = cells.get(id) else {
        continue;
      };
      let mut span = cell.colspan as i64;
      let mut w = cell.outer_style_or_col_width(input.tree);
      if w.value() == 0 {
        w = Length::ZERO;
      }

      let col = input.grid.col_to_eff_col(cell.col);
      let mut last_col = col;
      let mut c_min_width = cell.min_width + hspacing;
      let mut c_max_width = cell.max_width + hspacing;
      let mut total_percent = 0i64;
      let mut min_width = 0i64;
      let mut max_width = 0i64;
      let mut all_cols_are_percent = true;
      let mut all_cols_are_fixed = true;
      let mut have_variable = false;
      let mut fixed_width = 0i64;

      while last_col < n && span > 0 {
        let l = &mut layout[last_col];
        match l.width {
          Length::Percent(v) => {
            total_percent += v;
            all_cols_are_fixed = false;
          }
          Length::Fixed(v) if v > 0 => {
            fixed_width += v;
            all_cols_are_percent = false;
          }
          _ => {
            have_variable = true;
            // A percentage column keeps its percentage even under a
            // spanning cell.
            if !l.eff_width.is_percent() {
              l.eff_width = Length::ZERO;
              all_cols_are_percent = false;
            } else {
              total_percent += l.eff_width.value();
            }
            all_cols_are_fixed = false;
          }
        }

        span -= input.grid.span_of_eff_col(last_col) as i64;
        min_width += l.eff_min_width;
        max_width += l.eff_max_width;
        last_col += 1;
        c_min_width -= hspacing;
        c_max_width -= hspacing;
      }

      if let Length::Percent(pct) = w {
        if total_percent > pct || all_cols_are_percent {
          // cannot be satisfied; treat as auto
          w = Length::ZERO;
        } else {
          let span_max = max_width.max(c_max_width);
          t_max_width = t_max_width.max(span_max * 100 / pct);

          // Hand the missing percentage to the non-percent columns.
          let mut percent_missing = pct - total_percent;
          let mut total_width: i64 = layout[col..last_col]
            .iter()
            .filter(|l| !l.width.is_percent())
            .map(|l| l.eff_max_width)
            .sum();
          for l in &mut layout[col..last_col] {
            if total_width <= 0 {
              break;
            }
            if !l.width.is_percent() {
              let percent = percent_missing * l.eff_max_width / total_width;
              total_width -= l.eff_max_width;
              percent_missing -= percent;
              l.eff_width = if percent > 0 {
                Length::Percent(percent)
              } else {
                Length::ZERO
              };
            }
          }
        }
      }

      // the spanning cell's min width must fit
      if c_min_width > min_width {
        if all_cols_are_fixed {
          for l in &mut layout[col..last_col] {
            if fixed_width <= 0 {
              break;
            }
            let c_width = l.eff_min_width.max(c_min_width * l.width.value() / fixed_width);
            fixed_width -= l.width.value();
            c_min_width -= c_width;
            l.eff_min_width = c_width;
          }
        } else if all_cols_are_percent {
          let mut maxw = max_width;
          let mut minw = min_width;
          let cminw = c_min_width;
          for l in &mut layout[col..last_col] {
            if maxw <= 0 {
              break;
            }
            if l.eff_width.is_percent()
              && l.eff_width.value() > 0
              && fixed_width <= c_min_width
              && total_percent != 0
            {
              let mut c_width = l.eff_min_width;
              c_width = c_width.max(cminw * l.eff_width.value() / total_percent);
              c_width = c_width.min(l.eff_min_width + (c_min_width - minw));
              maxw -= l.eff_max_width;
              minw -= l.eff_min_width;
              c_min_width -= c_width;
              l.eff_min_width = c_width;
            }
          }
        } else {
          let mut maxw = max_width;
          let mut minw = min_width;

          // Fixed columns first, when auto columns can take the rest.
          for l in &mut layout[col..last_col] {
            if maxw <= 0 {
              break;
            }
            if l.width.is_fixed() && have_variable && fixed_width <= c_min_width {
              let c_width = l.eff_min_width.max(l.width.value());
              fixed_width -= l.width.value();
              minw -= l.eff_min_width;
              maxw -= l.eff_max_width;
              c_min_width -= c_width;
              l.eff_min_width = c_width;
            }
          }

          for l in &mut layout[col..last_col] {
            if maxw <= 0 || minw >= c_min_width {
              break;
            }
            if !(l.width.is_fixed() && have_variable && fixed_width <= c_min_width) {
              let mut c_width = l.eff_min_width.max(c_min_width * l.eff_max_width / maxw);
              c_width = c_width.min(l.eff_min_width + (c_min_width - minw));
              maxw -= l.eff_max_width;
              minw -= l.eff_min_width;
              c_min_width -= c_width;
              l.eff_min_width = c_width;
            }
          }
        }
      }

      if !w.is_percent() {
        if c_max_width > max_width {
          for l in &mut layout[col..last_col] {
            if max_width <= 0 {
              break;
            }
            let c_width = l.eff_max_width.max(c_max_width * l.eff_max_width / max_width);
            max_width -= l.eff_max_width;
            c_max_width -= c_width;
            l.eff_max_width = c_width;
          }
        }
      } else {
        for l in &mut layout[col..last_col] {
          l.max_width = l.max_width.max(l.min_width);
        }
      }
    }

    t_max_width
  }

  /// Measures columns and returns the table's outer min/max widths.
  pub fn calc_min_max(&mut self, input: &ColumnInput<'_>, dims: &TableDimensions) -> TableWidths {
    self.full_recalc(input);
    let span_max_width = self.calc_effective_width(input);

    let mut min_width = 0i64;
    let mut max_width = 0i64;
    let mut max_percent = 0i64;
    let mut max_non_percent = 0i64;
    let mut remaining_percent = 100i64;

    for l in &self.columns {
      min_width += l.eff_min_width;
      max_width += l.eff_max_width;
      if let Length::Percent(v) = l.eff_width {
        let percent = v.min(remaining_percent);
        let pw = l.eff_max_width * 100 / percent.max(1);
        remaining_percent -= percent;
        max_percent = max_percent.max(pw);
      } else {
        max_non_percent += l.eff_max_width;
      }
    }

    max_non_percent = (max_non_percent * 100 + 50) / remaining_percent.max(1);
    max_width = max_width
      .max(max_non_percent)
      .max(max_percent)
      .max(span_max_width);

    let bs = dims.margins_borders_padding_and_spacing(self.columns.len());
    min_width += bs;
    max_width += bs;

    if let Length::Fixed(v) = dims.declared_width {
      if v > 0 {
        let width = dims.content_width + bs;
        min_width = min_width.max(width);
        max_width = min_width;
      }
    }

    if self.balance_sides {
      self.balance_margin_sides();
    }

    TableWidths::clamped(min_width, max_width)
  }

  /// Gives the outer columns of a three-column margin-box table the same
  /// constraints, taken from the side with the larger min width.
  fn balance_margin_sides(&mut self) {
    let [left, center, right] = self.columns.as_mut_slice() else {
      return;
    };
    if center.width.is_variable() && center.max_width == 0 {
      return;
    }
    if left.min_width > right.min_width {
      *right = *left;
    } else if right.min_width > left.min_width {
      *left = *right;
    } else {
      let min_width = left.min_width.max(right.min_width);
      let max_width = left.max_width.max(right.max_width);
      let merged = ColumnConstraints {
        eff_min_width: min_width,
        eff_max_width: max_width,
        ..ColumnConstraints::new(min_width, max_width)
      };
      *left = merged;
      *right = merged;
    }
  }

  /// Distributes the table width and returns the column positions.
  pub fn layout(&mut self, dims: &TableDimensions) -> Vec<i32> {
    let n = self.columns.len();
    let table_width = dims.columns_width(n);
    let mut available = table_width;
    let layout = &mut self.columns;

    let mut have_percent = false;
    let mut num_variable = 0;
    let mut num_fixed = 0;
    let mut total_variable = 0i64;
    let mut total_fixed = 0i64;
    let mut total_percent = 0i64;
    let mut alloc_variable = 0i64;

    // everyone gets their min width
    for l in layout.iter_mut() {
      let w = l.eff_min_width;
      l.calc_width = w;
      available -= w;
      match l.eff_width {
        Length::Percent(v) => {
          have_percent = true;
          total_percent += v;
        }
        Length::Fixed(_) => {
          num_fixed += 1;
          total_fixed += l.eff_max_width;
        }
        Length::Auto => {
          num_variable += 1;
          total_variable += l.eff_max_width;
          alloc_variable += w;
        }
      }
    }

    // percent columns
    if available > 0 && have_percent {
      for l in layout.iter_mut() {
        if l.eff_width.is_percent() {
          let w = l.eff_min_width.max(l.eff_width.min_width(table_width));
          available += l.calc_width - w;
          l.calc_width = w;
        }
      }
      if total_percent > 100 {
        // take the excess back from the last columns
        let mut excess = table_width * (total_percent - 100) / 100;
        for l in layout.iter_mut().rev() {
          if l.eff_width.is_percent() {
            let w = l.calc_width;
            let reduction = w.min(excess);
            excess -= reduction;
            let new_width = l.eff_min_width.max(w - reduction);
            available += w - new_width;
            l.calc_width = new_width;
          }
        }
      }
    }

    // fixed columns
    if available > 0 {
      for l in layout.iter_mut() {
        if let Length::Fixed(v) = l.eff_width {
          if v > l.calc_width {
            available += l.calc_width - v;
            l.calc_width = v;
          }
        }
      }
    }

    // auto columns, redistributing what they already hold
    if available > 0 && num_variable > 0 {
      available += alloc_variable;
      for l in layout.iter_mut() {
        if l.eff_width.is_variable() && total_variable != 0 {
          let w = l
            .calc_width
            .max(available * l.eff_max_width / total_variable);
          available -= w;
          total_variable -= l.eff_max_width;
          l.calc_width = w;
        }
      }
    }

    // surplus to fixed columns
    if available > 0 && num_fixed > 0 {
      for l in layout.iter_mut() {
        if l.eff_width.is_fixed() && total_fixed != 0 {
          let w = available * l.eff_max_width / total_fixed;
          available -= w;
          total_fixed -= l.eff_max_width;
          l.calc_width += w;
        }
      }
    }

    // surplus to percent columns
    if available > 0 && have_percent && total_percent < 100 {
      for l in layout.iter_mut() {
        if let Length::Percent(v) = l.eff_width {
          if total_percent == 0 {
            break;
          }
          let w = available * v / total_percent;
          available -= w;
          total_percent -= v;
          l.calc_width += w;
          if available == 0 || total_percent == 0 {
            break;
          }
        }
      }
    }

    // whatever is left, right to left
    if available > 0 {
      let mut total = n as i64;
      for l in layout.iter_mut().rev() {
        let w = available / total;
        available -= w;
        total -= 1;
        l.calc_width += w;
      }
    }

    // Over-allocated: shrink towards min widths, auto columns first, then
    // fixed, then percent.
    if available < 0 {
      let kinds: [fn(Length) -> bool; 3] = [Length::is_variable, Length::is_fixed, Length::is_percent];
      for kind in kinds {
        if available >= 0 {
          break;
        }
        let mut mw: i64 = layout
          .iter()
          .filter(|l| kind(l.eff_width))
          .map(|l| l.calc_width - l.eff_min_width)
          .sum();
        for l in layout.iter_mut().rev() {
          if mw <= 0 {
            break;
          }
          if kind(l.eff_width) {
            let min_max_diff = l.calc_width - l.eff_min_width;
            let reduce = available * min_max_diff / mw;
            l.calc_width += reduce;
            available -= reduce;
            mw -= min_max_diff;
            if available >= 0 {
              break;
            }
          }
        }
      }
    }

    column_positions(layout.iter().map(|l| l.calc_width), dims.hspacing, n)
  }
}

/// Running column offsets; entry `i` is where column `i` starts, the last
/// entry is the total width including the spacing after every column.
pub(crate) fn column_positions(
  widths: impl Iterator<Item = i64>,
  hspacing: i64,
  n: usize,
) -> Vec<i32> {
  let mut positions = Vec::with_capacity(n + 1);
  let mut pos = 0i64;
  for w in widths {
    positions.push(clamp_i32(pos));
    pos += w + hspacing;
  }
  positions.push(clamp_i32(pos));
  positions
}

fn clamp_i32(v: i64) -> i32 {
  v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
