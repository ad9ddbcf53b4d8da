//! Resolved style records for table boxes
//!
//! These are the already-cascaded values the table engine consumes. One
//! record type exists per box kind (table, row group, row, cell, `<col>`);
//! fields are public and every record has a `Default` matching the CSS
//! initial values.

use super::color::Rgba;
use super::types::{BorderCollapse, BorderStyle, SectionRole, TableLayout, VerticalAlign};
use super::values::Length;
use crate::geometry::EdgeOffsets;
use serde::Serialize;

/// One side of a box border
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct BorderSide {
  pub width: i32,
  pub style: BorderStyle,
  pub color: Rgba,
}

impl BorderSide {
  pub const NONE: BorderSide = BorderSide {
    width: 0,
    style: BorderStyle::None,
    color: Rgba::BLACK,
  };

  pub const fn new(width: i32, style: BorderStyle, color: Rgba) -> Self {
    Self {
      width,
      style,
      color,
    }
  }

  pub const fn solid(width: i32, color: Rgba) -> Self {
    Self::new(width, BorderStyle::Solid, color)
  }

  /// Computed width: zero when the style draws nothing, never negative.
  pub fn used_width(self) -> i32 {
    if self.style.is_invisible() {
      0
    } else {
      self.width.max(0)
    }
  }
}

/// All four border sides of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct BorderSet {
  pub top: BorderSide,
  pub right: BorderSide,
  pub bottom: BorderSide,
  pub left: BorderSide,
}

impl BorderSet {
  pub const NONE: BorderSet = BorderSet::all(BorderSide::NONE);

  pub const fn all(side: BorderSide) -> Self {
    Self {
      top: side,
      right: side,
      bottom: side,
      left: side,
    }
  }

  /// Used widths as edge offsets (separate border model).
  pub fn widths(&self) -> EdgeOffsets {
    EdgeOffsets::new(
      self.top.used_width(),
      self.right.used_width(),
      self.bottom.used_width(),
      self.left.used_width(),
    )
  }
}

/// Style of the table box itself
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableStyle {
  pub width: Length,
  /// Border-box height; only fixed values stretch the last row.
  pub height: Length,
  pub table_layout: TableLayout,
  pub border_collapse: BorderCollapse,
  /// `border-spacing` horizontal component
  pub border_spacing_h: i32,
  /// `border-spacing` vertical component
  pub border_spacing_v: i32,
  pub border: BorderSet,
  pub padding: EdgeOffsets,
  pub margin: EdgeOffsets,
  /// Page-aware table layout (repeat header/footer, keep rows whole).
  pub paginate: bool,
}

impl TableStyle {
  pub fn is_collapse_borders(&self) -> bool {
    self.border_collapse == BorderCollapse::Collapse
  }

  /// Horizontal spacing; spacing does not apply to collapsed tables.
  pub fn h_spacing(&self) -> i32 {
    if self.is_collapse_borders() {
      0
    } else {
      self.border_spacing_h.max(0)
    }
  }

  /// Vertical spacing; spacing does not apply to collapsed tables.
  pub fn v_spacing(&self) -> i32 {
    if self.is_collapse_borders() {
      0
    } else {
      self.border_spacing_v.max(0)
    }
  }

  /// Border widths the table box itself occupies. Under the collapsing
  /// model the table border only takes part in edge resolution.
  pub fn box_border(&self) -> EdgeOffsets {
    if self.is_collapse_borders() {
      EdgeOffsets::ZERO
    } else {
      self.border.widths()
    }
  }

  /// Padding the table box occupies; collapsed tables have none.
  pub fn box_padding(&self) -> EdgeOffsets {
    if self.is_collapse_borders() {
      EdgeOffsets::ZERO
    } else {
      self.padding
    }
  }
}

/// Style of a row group (`thead`, `tbody`, `tfoot`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionStyle {
  pub role: SectionRole,
  pub border: BorderSet,
}

impl SectionStyle {
  pub fn header() -> Self {
    Self {
      role: SectionRole::Header,
      ..Self::default()
    }
  }

  pub fn footer() -> Self {
    Self {
      role: SectionRole::Footer,
      ..Self::default()
    }
  }
}

/// Style of a table row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowStyle {
  pub border: BorderSet,
  /// Only fixed heights are honoured, as a minimum row height.
  pub height: Length,
}

/// Style of a table cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellStyle {
  pub colspan: usize,
  pub rowspan: usize,
  pub width: Length,
  /// Border-box height; fixed values only.
  pub height: Length,
  pub vertical_align: VerticalAlign,
  pub border: BorderSet,
  pub padding: EdgeOffsets,
}

impl Default for CellStyle {
  fn default() -> Self {
    Self {
      colspan: 1,
      rowspan: 1,
      width: Length::Auto,
      height: Length::Auto,
      vertical_align: VerticalAlign::Baseline,
      border: BorderSet::NONE,
      padding: EdgeOffsets::ZERO,
    }
  }
}

impl CellStyle {
  /// Spans below one are treated as one.
  pub fn colspan(&self) -> usize {
    self.colspan.max(1)
  }

  pub fn rowspan(&self) -> usize {
    self.rowspan.max(1)
  }
}

/// Style of a `<col>` element, with the enclosing `<colgroup>` width used as
/// a fallback when the column itself has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnStyle {
  pub span: usize,
  pub width: Length,
  pub group_width: Option<Length>,
  pub border: BorderSet,
}

impl Default for ColumnStyle {
  fn default() -> Self {
    Self {
      span: 1,
      width: Length::Auto,
      group_width: None,
      border: BorderSet::NONE,
    }
  }
}

impl ColumnStyle {
  pub fn span(&self) -> usize {
    self.span.max(1)
  }

  /// Own width, falling back to the column group's width when auto.
  pub fn effective_width(&self) -> Length {
    match (self.width, self.group_width) {
      (Length::Auto, Some(group)) => group,
      (own, _) => own,
    }
  }
}
