//! The seam between table layout and cell content
//!
//! Table layout never looks inside a cell. It asks a [`CellContentLayout`]
//! for the content's intrinsic widths and, once a column width is known, for
//! the content's height and first baseline. Any block/inline engine can sit
//! behind the trait; [`StaticCellContent`] is a canned implementation used by
//! tests, benchmarks and embedders that measure content up front.

use crate::tree::CellId;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Content-based widths of a cell, excluding its border and padding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IntrinsicWidths {
  /// Narrowest width without overflow
  pub min: i32,
  /// Width without any line breaking
  pub max: i32,
}

impl IntrinsicWidths {
  pub const fn new(min: i32, max: i32) -> Self {
    Self { min, max }
  }
}

/// A vertical stretch of content, relative to the top of the content box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ContentExtent {
  pub top: i32,
  pub bottom: i32,
}

impl ContentExtent {
  pub const fn new(top: i32, bottom: i32) -> Self {
    Self { top, bottom }
  }

  pub fn translate(self, dy: i32) -> Self {
    Self {
      top: self.top + dy,
      bottom: self.bottom + dy,
    }
  }
}

/// What laying out a cell's content produced
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ContentMetrics {
  /// Height of the content, including the requested start offset
  pub height: i32,
  /// First line baseline relative to the content box top, when the content
  /// has a line box
  pub baseline: Option<i32>,
  /// Extents of the content's fragments (lines, blocks) relative to the
  /// content box top; used for page limit bookkeeping
  pub fragments: Vec<ContentExtent>,
}

/// Parameters of one content layout request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRequest {
  /// Width of the cell's content box
  pub width: i32,
  /// Vertical offset the content starts at inside the content box
  pub content_start: i32,
  /// Absolute y of the content box top
  pub top: i32,
}

/// Layout of whatever is inside a table cell
pub trait CellContentLayout {
  fn intrinsic_widths(&self, cell: CellId) -> IntrinsicWidths;

  fn layout_content(&self, cell: CellId, request: &ContentRequest) -> ContentMetrics;
}

/// Pre-measured content of one cell
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StaticContent {
  pub widths: IntrinsicWidths,
  pub height: i32,
  pub baseline: Option<i32>,
  pub lines: Vec<ContentExtent>,
}

impl StaticContent {
  pub fn new(min: i32, max: i32, height: i32) -> Self {
    Self {
      widths: IntrinsicWidths::new(min, max),
      height,
      baseline: None,
      lines: Vec::new(),
    }
  }

  pub fn with_baseline(mut self, baseline: i32) -> Self {
    self.baseline = Some(baseline);
    self
  }

  /// Splits the content into lines of `line_height`; the baseline becomes the
  /// first line's bottom.
  pub fn with_lines(mut self, line_height: i32) -> Self {
    let line_height = line_height.max(1);
    let mut top = 0;
    self.lines.clear();
    while top < self.height {
      let bottom = (top + line_height).min(self.height);
      self.lines.push(ContentExtent::new(top, bottom));
      top = bottom;
    }
    if let Some(first) = self.lines.first() {
      self.baseline = Some(first.bottom);
    }
    self
  }
}

/// Content fixed ahead of layout
///
/// Cells without an entry have no content: zero widths, zero height and no
/// baseline.
///
/// # Examples
///
/// ```
/// use tablegrid::{CellContentLayout, StaticCellContent, StaticContent};
/// use tablegrid::{CellStyle, RowStyle, SectionStyle, TableStyle, TableTree};
///
/// let mut tree = TableTree::new(TableStyle::default());
/// let section = tree.push_section(SectionStyle::default());
/// let row = tree.push_row(section, RowStyle::default()).unwrap();
/// let cell = tree.push_cell(row, CellStyle::default()).unwrap();
///
/// let mut content = StaticCellContent::new();
/// content.insert(cell, StaticContent::new(10, 40, 18).with_baseline(14));
/// assert_eq!(content.intrinsic_widths(cell).max, 40);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticCellContent {
  cells: FxHashMap<CellId, StaticContent>,
}

impl StaticCellContent {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, cell: CellId, content: StaticContent) {
    self.cells.insert(cell, content);
  }

  pub fn with_cell(mut self, cell: CellId, content: StaticContent) -> Self {
    self.insert(cell, content);
    self
  }

  pub fn get(&self, cell: CellId) -> Option<&StaticContent> {
    self.cells.get(&cell)
  }
}

impl CellContentLayout for StaticCellContent {
  fn intrinsic_widths(&self, cell: CellId) -> IntrinsicWidths {
    self.cells.get(&cell).map(|c| c.widths).unwrap_or_default()
  }

  fn layout_content(&self, cell: CellId, request: &ContentRequest) -> ContentMetrics {
    let start = request.content_start.max(0);
    match self.cells.get(&cell) {
      Some(content) => ContentMetrics {
        height: start + content.height,
        baseline: content.baseline.map(|b| start + b),
        fragments: content.lines.iter().map(|l| l.translate(start)).collect(),
      },
      None => ContentMetrics {
        height: start,
        ..ContentMetrics::default()
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::style::{CellStyle, RowStyle, SectionStyle, TableStyle};
  use crate::tree::TableTree;

  #[test]
  fn content_start_shifts_everything() {
    let mut tree = TableTree::new(TableStyle::default());
    let section = tree.push_section(SectionStyle::default());
    let row = tree.push_row(section, RowStyle::default()).unwrap();
    let cell = tree.push_cell(row, CellStyle::default()).unwrap();
    let content =
      StaticCellContent::new().with_cell(cell, StaticContent::new(5, 5, 30).with_lines(12));

    let request = ContentRequest {
      width: 50,
      content_start: 4,
      top: 0,
    };
    let metrics = content.layout_content(cell, &request);
    assert_eq!(metrics.height, 34);
    assert_eq!(metrics.baseline, Some(16));
    assert_eq!(
      metrics.fragments,
      vec![
        ContentExtent::new(4, 16),
        ContentExtent::new(16, 28),
        ContentExtent::new(28, 34)
      ]
    );
  }
}
