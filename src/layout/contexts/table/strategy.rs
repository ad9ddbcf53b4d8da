//! Column layout strategy selection
//!
//! A table picks its column strategy from its style: page margin-box tables
//! always use the balanced automatic layout, `table-layout: fixed` applies
//! only when the table also has a declared width, and everything else is
//! laid out automatically.

use super::cell_metrics::CellMetricsMap;
use super::column_distribution::AutoTableLayout;
use super::dimensions::{ColumnInput, TableDimensions, TableWidths};
use super::fixed_layout::FixedTableLayout;
use super::grid::TableGrid;
use crate::style::{TableLayout, TableStyle};
use crate::tree::TableTree;
use serde::Serialize;

/// Which algorithm a table uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StrategyKind {
  Fixed,
  Auto,
  MarginBox,
}

impl StrategyKind {
  pub fn select(style: &TableStyle, margin_area_root: bool) -> StrategyKind {
    if margin_area_root {
      StrategyKind::MarginBox
    } else if style.table_layout == TableLayout::Auto || style.width.is_variable() {
      StrategyKind::Auto
    } else {
      StrategyKind::Fixed
    }
  }
}

#[derive(Debug, Clone)]
pub enum TableLayoutStrategy {
  Fixed(FixedTableLayout),
  Auto(AutoTableLayout),
  MarginBox(AutoTableLayout),
}

impl TableLayoutStrategy {
  pub fn new(kind: StrategyKind) -> Self {
    match kind {
      StrategyKind::Fixed => TableLayoutStrategy::Fixed(FixedTableLayout::new()),
      StrategyKind::Auto => TableLayoutStrategy::Auto(AutoTableLayout::new()),
      StrategyKind::MarginBox => TableLayoutStrategy::MarginBox(AutoTableLayout::for_margin_boxes()),
    }
  }

  pub fn for_style(style: &TableStyle, margin_area_root: bool) -> Self {
    Self::new(StrategyKind::select(style, margin_area_root))
  }

  pub fn kind(&self) -> StrategyKind {
    match self {
      TableLayoutStrategy::Fixed(_) => StrategyKind::Fixed,
      TableLayoutStrategy::Auto(_) => StrategyKind::Auto,
      TableLayoutStrategy::MarginBox(_) => StrategyKind::MarginBox,
    }
  }

  /// Drops everything computed by the last layout.
  pub fn reset(&mut self) {
    match self {
      TableLayoutStrategy::Fixed(layout) => layout.reset(),
      TableLayoutStrategy::Auto(layout) | TableLayoutStrategy::MarginBox(layout) => layout.reset(),
    }
  }

  /// Table min/max widths. The fixed strategy may add columns to the grid.
  pub fn calc_min_max(
    &mut self,
    tree: &TableTree,
    grid: &mut TableGrid,
    cells: &CellMetricsMap,
    dims: &TableDimensions,
  ) -> TableWidths {
    match self {
      TableLayoutStrategy::Fixed(layout) => layout.calc_min_max(tree, cells, grid, dims),
      TableLayoutStrategy::Auto(layout) | TableLayoutStrategy::MarginBox(layout) => {
        let input = ColumnInput {
          tree,
          grid,
          cells,
          hspacing: dims.hspacing,
        };
        layout.calc_min_max(&input, dims)
      }
    }
  }

  /// Column positions for the final table width; `num_eff_cols + 1`
  /// entries.
  pub fn layout(&mut self, dims: &TableDimensions) -> Vec<i32> {
    match self {
      TableLayoutStrategy::Fixed(layout) => layout.layout(dims),
      TableLayoutStrategy::Auto(layout) | TableLayoutStrategy::MarginBox(layout) => layout.layout(dims),
    }
  }
}
