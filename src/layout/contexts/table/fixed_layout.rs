//! Fixed table layout (CSS 2.1 Section 17.5.2.1)
//!
//! Column widths come only from `<col>` elements and the cells of the first
//! row; the rest of the table never influences them. `<col>` elements that
//! reach past the last effective column add columns to the grid.

use super::column_distribution::column_positions;
use super::cell_metrics::CellMetricsMap;
use super::dimensions::{TableDimensions, TableWidths};
use super::grid::TableGrid;
use crate::style::{Length, MAX_WIDTH};
use crate::tree::TableTree;

#[derive(Debug, Clone, Default)]
pub struct FixedTableLayout {
  widths: Vec<Length>,
}

impl FixedTableLayout {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn reset(&mut self) {
    self.widths.clear();
  }

  /// Declared width per effective column.
  pub fn widths(&self) -> &[Length] {
    &self.widths
  }

  /// Collects declared widths; returns the sum of the fixed ones.
  fn calc_width_array(
    &mut self,
    tree: &TableTree,
    grid: &mut TableGrid,
    first_row: &[(Length, usize)],
  ) -> i64 {
    let mut n_eff_cols = grid.num_eff_cols();
    self.widths = vec![Length::ZERO; n_eff_cols];
    let mut used_width = 0i64;

    let mut c_col = 0;
    for col in tree.columns() {
      let span = col.span();
      let w = col.effective_width();
      let eff_width = match w {
        Length::Fixed(v) if v > 0 => v.min(MAX_WIDTH),
        _ => 0,
      };

      let mut used_span = 0;
      let mut i = 0;
      while used_span < span {
        if c_col + i >= n_eff_cols {
          grid.append_column(span - used_span);
          n_eff_cols += 1;
          self.widths.push(Length::ZERO);
        }
        let e_span = grid.span_of_eff_col(c_col + i);
        if (w.is_fixed() || w.is_percent()) && w.value() > 0 {
          self.widths[c_col + i] = w.with_value(w.value() * e_span as i64);
          used_width += eff_width * e_span as i64;
        }
        used_span += e_span;
        i += 1;
      }
      c_col += i;
    }

    // First row cells fill in whatever no column element set.
    let mut c_col = 0;
    for &(w, span) in first_row {
      let mut used_span = 0;
      let mut i = 0;
      while used_span < span && c_col + i < n_eff_cols {
        let e_span = grid.span_of_eff_col(c_col + i);
        // A spanning cell's width is shared out by column span; shares that
        // come to nothing leave the column auto.
        let share = w.value().min(MAX_WIDTH) * e_span as i64 / span as i64;
        if self.widths[c_col + i].is_variable() && !w.is_variable() && share > 0 {
          self.widths[c_col + i] = w.with_value(share);
          if w.is_fixed() {
            used_width += share;
          }
        }
        used_span += e_span;
        i += 1;
      }
      c_col += i;
    }

    used_width
  }

  /// Measures the table; may append columns to `grid`.
  pub fn calc_min_max(
    &mut self,
    tree: &TableTree,
    cells: &CellMetricsMap,
    grid: &mut TableGrid,
    dims: &TableDimensions,
  ) -> TableWidths {
    let first_row = first_row_widths(tree, cells);
    let used = self.calc_width_array(tree, grid, &first_row);
    let bs = dims.margins_borders_padding_and_spacing(grid.num_eff_cols());
    let min = (used + bs).max(dims.outer_width());
    let max = if self.widths.iter().any(|w| !w.is_fixed()) {
      MAX_WIDTH
    } else {
      min
    };
    TableWidths::clamped(min, max)
  }

  pub fn layout(&mut self, dims: &TableDimensions) -> Vec<i32> {
    let n = self.widths.len();
    let table_width = dims.columns_width(n);
    let mut available = table_width;
    let mut calc_width = vec![-1i64; n];

    for (i, l) in self.widths.iter().enumerate() {
      if let Length::Fixed(v) = *l {
        let v = v.max(0);
        calc_width[i] = v;
        available -= v;
      }
    }

    let total_percent: i64 = self
      .widths
      .iter()
      .filter(|l| l.is_percent())
      .map(|l| l.value().max(0))
      .sum();
    if available > 0 && total_percent > 0 {
      let base = (table_width * total_percent / 100).min(available);
      for (i, l) in self.widths.iter().enumerate() {
        if available <= 0 {
          break;
        }
        if let Length::Percent(p) = *l {
          let w = base * p.max(0) / total_percent;
          available -= w;
          calc_width[i] = w;
        }
      }
    }

    if available > 0 {
      let mut total_variable = self.widths.iter().filter(|l| l.is_variable()).count() as i64;
      for (i, l) in self.widths.iter().enumerate() {
        if available <= 0 {
          break;
        }
        if l.is_variable() {
          let w = available / total_variable;
          available -= w;
          calc_width[i] = w;
          total_variable -= 1;
        }
      }
    }

    for w in &mut calc_width {
      if *w < 0 {
        *w = 0;
      }
    }

    if available > 0 {
      let mut total = n as i64;
      for w in calc_width.iter_mut().rev() {
        let share = available / total;
        available -= share;
        total -= 1;
        *w += share;
      }
    }

    column_positions(calc_width.into_iter(), dims.hspacing, n)
  }
}

/// Outer style widths and colspans of the first row's cells.
fn first_row_widths(tree: &TableTree, cells: &CellMetricsMap) -> Vec<(Length, usize)> {
  tree
    .first_row()
    .and_then(|row| tree.row(row).ok())
    .map(|row| {
      row
        .cells
        .iter()
        .filter_map(|id| cells.get(id))
        .map(|cell| (cell.outer_style_width(), cell.colspan))
        .collect()
    })
    .unwrap_or_default()
}
