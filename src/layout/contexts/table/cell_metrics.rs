//! Per-cell width inputs for column distribution
//!
//! Column strategies see a cell through its outer min/max widths (content
//! plus horizontal border and padding) and its declared width. The border
//! used here is the layout border: the cell's own border in the separated
//! model, half of the resolved edge in the collapsing one.

use super::collapse::CollapsedBorders;
use super::grid::TableGrid;
use crate::error::Result;
use crate::geometry::EdgeOffsets;
use crate::layout::formatting_context::CellContentLayout;
use crate::style::Length;
use crate::tree::{CellId, TableTree};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics {
  /// Outer min-content width
  pub min_width: i64,
  /// Outer max-content width, never below `min_width`
  pub max_width: i64,
  /// Declared content width
  pub style_width: Length,
  pub colspan: usize,
  pub col: usize,
  pub border: EdgeOffsets,
  pub padding: EdgeOffsets,
}

pub type CellMetricsMap = FxHashMap<CellId, CellMetrics>;

impl CellMetrics {
  fn border_and_padding(&self) -> i64 {
    (self.border.horizontal() + self.padding.horizontal()) as i64
  }

  /// Declared width as a border-box width; only fixed widths grow. Negative
  /// declared widths count as zero.
  pub fn outer_style_width(&self) -> Length {
    match self.style_width {
      Length::Fixed(v) => Length::Fixed(v.max(0) + self.border_and_padding()),
      Length::Percent(v) => Length::Percent(v.max(0)),
      Length::Auto => Length::Auto,
    }
  }

  /// Outer style width, or for single-column cells without one the width of
  /// the `<col>` element over the cell.
  pub fn outer_style_or_col_width(&self, tree: &TableTree) -> Length {
    let own = self.outer_style_width();
    if self.colspan > 1 || !own.is_variable() {
      return own;
    }
    tree.col_element(self.col).map_or(own, |col| col.width)
  }
}

/// Measures every placed cell.
pub fn measure_cells(
  tree: &TableTree,
  grid: &TableGrid,
  collapsed: Option<&CollapsedBorders>,
  content: &dyn CellContentLayout,
) -> Result<CellMetricsMap> {
  let mut out = CellMetricsMap::default();
  for section in grid.sections() {
    for &row in section.row_ids() {
      for &id in &tree.row(row)?.cells {
        let Some(placed) = grid.cell(id) else {
          continue;
        };
        let style = &tree.cell(id)?.style;
        let border = match collapsed {
          Some(borders) => borders.layout_widths(id),
          None => style.border.widths(),
        };
        let padding = style.padding;
        let bp = (border.horizontal() + padding.horizontal()) as i64;
        let intrinsic = content.intrinsic_widths(id);
        let min = intrinsic.min.max(0) as i64;
        let max = (intrinsic.max.max(0) as i64).max(min);
        out.insert(
          id,
          CellMetrics {
            min_width: min + bp,
            max_width: max + bp,
            style_width: style.width,
            colspan: placed.colspan,
            col: placed.col,
            border,
            padding,
          },
        );
      }
    }
  }
  Ok(out)
}
