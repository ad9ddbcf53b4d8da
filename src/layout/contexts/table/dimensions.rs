//! Table box widths
//!
//! The horizontal box model of the table itself: declared width, margins,
//! the border and padding the table box occupies, and border spacing. Column
//! strategies read the width left for columns from here, and the table's
//! min/max widths feed back into the final content width.
//!
//! A declared table width is a border-box width (CSS 2.1 Section 17.4: the
//! HTML `width` attribute has always meant the border edge).

use super::cell_metrics::CellMetricsMap;
use super::grid::TableGrid;
use crate::style::{Length, TableStyle, MAX_WIDTH};
use crate::tree::TableTree;

/// Everything a column strategy reads while measuring
#[derive(Clone, Copy)]
pub struct ColumnInput<'a> {
  pub tree: &'a TableTree,
  pub grid: &'a TableGrid,
  pub cells: &'a CellMetricsMap,
  pub hspacing: i64,
}

/// Outer min/max widths of the table, margins included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableWidths {
  pub min: i64,
  pub max: i64,
}

impl TableWidths {
  pub fn clamped(min: i64, max: i64) -> Self {
    Self {
      min: min.min(MAX_WIDTH),
      max: max.min(MAX_WIDTH),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDimensions {
  pub declared_width: Length,
  /// Width inside the table box's border and padding
  pub content_width: i64,
  /// Left plus right, for each of the three
  pub margin: i64,
  pub border: i64,
  pub padding: i64,
  pub hspacing: i64,
  pub collapse: bool,
}

impl TableDimensions {
  /// Resolves the table's content width against the containing block.
  /// A declared width that resolves negative once border and padding are
  /// taken off is treated as `auto`.
  pub fn resolve(style: &TableStyle, containing_width: i64) -> Self {
    let margin = style.margin.horizontal() as i64;
    let border = style.box_border().horizontal() as i64;
    let padding = style.box_padding().horizontal() as i64;

    let declared = match style.width {
      Length::Auto => None,
      width => Some(width.min_width(containing_width) - border - padding).filter(|w| *w >= 0),
    };
    let (declared_width, content_width) = match declared {
      Some(content) => (style.width, content),
      None => (
        Length::Auto,
        (containing_width - margin - border - padding).max(0),
      ),
    };

    Self {
      declared_width,
      content_width,
      margin,
      border,
      padding,
      hspacing: style.h_spacing() as i64,
      collapse: style.is_collapse_borders(),
    }
  }

  /// Margin-box width.
  pub fn outer_width(&self) -> i64 {
    self.content_width + self.margin + self.border + self.padding
  }

  /// Horizontal margins, border, padding and, for separated borders, the
  /// spacing around `num_eff_cols` columns.
  pub fn margins_borders_padding_and_spacing(&self, num_eff_cols: usize) -> i64 {
    let mut result = self.margin + self.border;
    if !self.collapse {
      result += self.padding + (num_eff_cols as i64 + 1) * self.hspacing;
    }
    result
  }

  /// Width left for the columns themselves.
  pub fn columns_width(&self, num_eff_cols: usize) -> i64 {
    self.outer_width() - self.margins_borders_padding_and_spacing(num_eff_cols)
  }

  /// Grows the table to its min width, or shrinks an auto-width table to
  /// its max width.
  pub fn fit(&mut self, widths: TableWidths) {
    let outer = self.outer_width();
    if widths.min > outer {
      self.content_width += widths.min - outer;
    } else if self.declared_width.is_variable() && widths.max < outer {
      self.content_width -= outer - widths.max;
    }
  }
}
