//! Style type definitions
//!
//! Enum types for the table-related CSS properties the layout engine reads.

use serde::Serialize;

/// Table layout algorithm
///
/// CSS: `table-layout`
/// Reference: CSS 2.1 Section 17.5.2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TableLayout {
  #[default]
  Auto,
  Fixed,
}

/// Border model for tables
///
/// CSS: `border-collapse`
/// Reference: CSS 2.1 Section 17.6
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BorderCollapse {
  #[default]
  Separate,
  Collapse,
}

/// Border line style
///
/// CSS: `border-style`, `border-*-style`
/// Reference: CSS Backgrounds and Borders Module Level 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum BorderStyle {
  #[default]
  None,
  Hidden,
  Solid,
  Dashed,
  Dotted,
  Double,
  Groove,
  Ridge,
  Inset,
  Outset,
}

impl BorderStyle {
  /// True for styles that draw nothing.
  pub fn is_invisible(self) -> bool {
    matches!(self, BorderStyle::None | BorderStyle::Hidden)
  }

  /// Rank used when two collapsed borders have the same width.
  ///
  /// CSS 2.1 Section 17.6.2.1 rule 3: double, solid, dashed, dotted, ridge,
  /// outset, groove, inset. Lower ranks win; `none` and `hidden` never reach
  /// this comparison.
  pub(crate) fn collapse_rank(self) -> u8 {
    match self {
      BorderStyle::Double => 1,
      BorderStyle::Solid => 2,
      BorderStyle::Dashed => 3,
      BorderStyle::Dotted => 4,
      BorderStyle::Ridge => 5,
      BorderStyle::Outset => 6,
      BorderStyle::Groove => 7,
      BorderStyle::Inset => 8,
      BorderStyle::None | BorderStyle::Hidden => 0,
    }
  }
}

/// Vertical alignment keyword as declared on a table cell
///
/// CSS: `vertical-align`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum VerticalAlign {
  #[default]
  Baseline,
  Sub,
  Super,
  TextTop,
  TextBottom,
  Middle,
  Top,
  Bottom,
}

impl VerticalAlign {
  /// Table cells only honour `top`, `middle` and `bottom`; every other value
  /// behaves as `baseline` (CSS 2.1 Section 17.5.3).
  pub fn for_table_cell(self) -> VerticalAlign {
    match self {
      VerticalAlign::Top | VerticalAlign::Middle | VerticalAlign::Bottom => self,
      _ => VerticalAlign::Baseline,
    }
  }
}

/// Role of a row group
///
/// CSS: `display: table-header-group | table-row-group | table-footer-group`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SectionRole {
  Header,
  #[default]
  Body,
  Footer,
}
