//! Row layout (CSS 2.1 Section 17.5.3)
//!
//! Rows are laid out one at a time, top to bottom. Every cell that starts in
//! a row is laid out at the row's y with the width its columns give it; the
//! row then settles its height and aligns its cells:
//!
//! 1. Baseline-aligned cells are shifted so their first baselines line up.
//! 2. The row grows to the bottom of every cell that ends in it (and, for
//!    the last row of a fixed-height table, to the table's fixed bottom).
//! 3. Middle and bottom aligned cells are shifted into the row's height.
//! 4. Rows without baseline-aligned cells take the lowest content edge as
//!    their baseline.
//! 5. Every cell ending in the row is stretched to the row's bottom.
//!
//! In paged layout a shift that would push content across a page boundary
//! lays the cell out again instead, so its content can break properly.

use super::collapse::CollapsedBorders;
use super::grid::{GridCell, TableGrid};
use crate::error::Result;
use crate::geometry::{EdgeOffsets, Rect};
use crate::layout::context::LayoutContext;
use crate::layout::formatting_context::{CellContentLayout, ContentMetrics, ContentRequest};
use crate::style::{Length, VerticalAlign};
use crate::tree::{CellId, RowId, TableTree};
use rustc_hash::FxHashMap;

/// Layout state of one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellBox {
  pub id: CellId,
  pub placement: GridCell,
  pub eff_col: usize,
  pub eff_span: usize,
  pub x: i32,
  pub y: i32,
  pub width: i32,
  pub height: i32,
  /// Layout border (half of each collapsed edge when collapsing)
  pub border: EdgeOffsets,
  pub padding: EdgeOffsets,
  /// Declared border-box height
  pub css_height: Option<i32>,
  pub vertical_align: VerticalAlign,
  pub content: ContentMetrics,
  /// Shift applied to the laid out content by alignment
  pub content_offset: i32,
}

impl CellBox {
  pub(crate) fn new(
    id: CellId,
    placement: GridCell,
    grid: &TableGrid,
    tree: &TableTree,
    border: EdgeOffsets,
  ) -> Result<Self> {
    let style = &tree.cell(id)?.style;
    let css_height = match style.height {
      Length::Fixed(h) if h > 0 => Some(h.min(i32::MAX as i64) as i32),
      _ => None,
    };
    Ok(Self {
      id,
      eff_col: grid.eff_col(&placement),
      eff_span: grid.eff_span(&placement),
      placement,
      x: 0,
      y: 0,
      width: 0,
      height: 0,
      border,
      padding: style.padding,
      css_height,
      vertical_align: style.vertical_align.for_table_cell(),
      content: ContentMetrics::default(),
      content_offset: 0,
    })
  }

  pub fn bounds(&self) -> Rect {
    Rect::from_xywh(self.x, self.y, self.width, self.height)
  }

  pub fn content_top(&self) -> i32 {
    self.y + self.border.top + self.padding.top
  }

  pub fn content_width(&self) -> i32 {
    (self.width - self.border.horizontal() - self.padding.horizontal()).max(0)
  }

  /// Content box of the final cell height.
  pub fn content_box(&self) -> Rect {
    self.bounds().inset(self.border + self.padding)
  }

  /// Border, padding and laid out content, ignoring the declared height
  /// and any alignment shift.
  pub fn natural_height(&self) -> i32 {
    self.border.vertical() + self.padding.vertical() + self.content.height
  }

  /// First line baseline, if the content has one.
  pub fn block_baseline(&self) -> Option<i32> {
    self
      .content
      .baseline
      .map(|b| self.content_top() + self.content_offset + b)
  }

  /// Baseline used for row alignment; the content top when there is no line.
  pub fn baseline(&self) -> i32 {
    self.block_baseline().unwrap_or_else(|| self.content_top())
  }

  fn layout(&mut self, content: &dyn CellContentLayout, content_start: i32) {
    let request = ContentRequest {
      width: self.content_width(),
      content_start,
      top: self.content_top(),
    };
    self.content = content.layout_content(self.id, &request);
    self.content_offset = 0;
    self.height = self.css_height.unwrap_or(0).max(self.natural_height());
  }

  fn move_content(&mut self, delta: i32) {
    self.content_offset += delta;
    self.height += delta;
  }

  /// Whether shifting the content by `delta` would cross (or already
  /// touches) the bottom of the page the cell starts on.
  fn is_page_breaks_change(&self, ctx: &LayoutContext<'_>, delta: i32) -> Result<bool> {
    if !ctx.is_page_breaks_allowed() {
      return Ok(false);
    }
    let page = ctx.require_page_at(self.y)?;
    let limit = page.bottom - ctx.extra_space_bottom();
    let bottom = self.y + self.content.height;
    Ok(bottom >= limit || bottom + delta >= limit)
  }
}

/// Layout state of one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowBox {
  pub id: RowId,
  pub section: usize,
  pub index: usize,
  pub y: i32,
  pub height: i32,
  /// Relative to the row's top
  pub baseline: Option<i32>,
  pub extra_space_top: i32,
  pub extra_space_bottom: i32,
  /// The row was pushed to the next page
  pub moved: bool,
}

impl RowBox {
  pub fn new(id: RowId, section: usize, index: usize, y: i32) -> Self {
    Self {
      id,
      section,
      index,
      y,
      height: 0,
      baseline: None,
      extra_space_top: 0,
      extra_space_bottom: 0,
      moved: false,
    }
  }

  pub fn bounds(&self, x: i32, width: i32) -> Rect {
    Rect::from_xywh(x, self.y, width, self.height)
  }
}

/// What a row asks of its container after layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageBreakRequest {
  None,
  /// Move this row to the next page
  Row,
  /// Move the whole table to the next page
  Table,
}

/// A laid out row group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLayout {
  pub top: i32,
  pub height: i32,
  pub rows: Vec<RowBox>,
  pub table_page_clear: bool,
}

/// Lays out rows of one table against precomputed cell boxes
pub struct RowLayout<'a> {
  pub tree: &'a TableTree,
  pub grid: &'a TableGrid,
  pub content: &'a dyn CellContentLayout,
  pub collapsed: Option<&'a CollapsedBorders>,
  pub cells: &'a mut FxHashMap<CellId, CellBox>,
  pub vspacing: i32,
  /// Where the last row must reach for a fixed-height table
  pub fixed_row_bottom: Option<i32>,
  /// Page aware row layout (print mode and a paginated table)
  pub running: bool,
}

impl RowLayout<'_> {
  /// Lays out every row of a section starting at `top`.
  pub fn layout_section(
    &mut self,
    ctx: &mut LayoutContext<'_>,
    section: usize,
    top: i32,
  ) -> Result<SectionLayout> {
    let mut out = SectionLayout {
      top,
      height: 0,
      rows: Vec::new(),
      table_page_clear: false,
    };

    let row_ids = self.grid.section(section).row_ids().to_vec();
    for (index, id) in row_ids.into_iter().enumerate() {
      let mut row = RowBox::new(id, section, index, top + out.height + self.vspacing);
      match self.layout_row(ctx, &mut row)? {
        PageBreakRequest::Table if ctx.is_page_breaks_allowed() => out.table_page_clear = true,
        PageBreakRequest::Row if ctx.is_page_breaks_allowed() => {
          let delta = self.force_page_break_before(ctx, &row)?;
          log::debug!(
            target: "tablegrid::pagination",
            "row {}:{} moved down {} to the next page",
            section,
            index,
            delta
          );
          row.y += delta;
          row.moved = true;
          // One retry; a row taller than a page stays where it lands.
          self.layout_row(ctx, &mut row)?;
        }
        _ => {}
      }
      out.height = row.y + row.height - top;
      out.rows.push(row);
    }
    Ok(out)
  }

  /// Lays out the cells starting in `row` and settles its height.
  pub fn layout_row(
    &mut self,
    ctx: &mut LayoutContext<'_>,
    row: &mut RowBox,
  ) -> Result<PageBreakRequest> {
    let prev_extra = (ctx.extra_space_top(), ctx.extra_space_bottom());
    let own = self.origin_cells(row)?;

    if self.running {
      row.extra_space_top = own
        .iter()
        .filter_map(|id| self.cells.get(id))
        .map(|cell| cell.padding.top + cell.border.top)
        .max()
        .unwrap_or(0);
      row.extra_space_bottom = self
        .grid
        .cells_ending_in_row(row.section, row.index)
        .iter()
        .filter_map(|id| self.cells.get(id))
        .map(|cell| cell.padding.bottom + cell.border.bottom)
        .max()
        .unwrap_or(0);
      ctx.set_extra_space_top(prev_extra.0 + row.extra_space_top);
      ctx.set_extra_space_bottom(prev_extra.1 + row.extra_space_bottom);
    }

    row.height = match self.tree.row(row.id)?.style.height {
      Length::Fixed(h) if h > 0 => h.min(i32::MAX as i64) as i32,
      _ => 0,
    };
    row.baseline = None;
    for id in &own {
      if let Some(cell) = self.cells.get_mut(id) {
        cell.y = row.y;
        cell.layout(self.content, 0);
      }
    }

    let result = self.calc_layout_height(ctx, row, &own);

    let mut request = PageBreakRequest::None;
    if self.running {
      if result.is_ok() && self.should_move_to_next_page(ctx, row, &own)? {
        request = if self.tree.first_body_row() == Some(row.id) {
          PageBreakRequest::Table
        } else {
          PageBreakRequest::Row
        };
      }
      ctx.set_extra_space_top(prev_extra.0);
      ctx.set_extra_space_bottom(prev_extra.1);
    }
    result?;

    if ctx.config().log_rows {
      log::trace!(
        target: "tablegrid::rows",
        "row {}:{} y={} height={} baseline={:?}",
        row.section,
        row.index,
        row.y,
        row.height,
        row.baseline
      );
    }
    Ok(request)
  }

  /// Cells whose first row is `row`, in document order.
  fn origin_cells(&self, row: &RowBox) -> Result<Vec<CellId>> {
    Ok(
      self
        .tree
        .row(row.id)?
        .cells
        .iter()
        .copied()
        .filter(|id| {
          self
            .grid
            .cell(*id)
            .map_or(false, |g| g.section == row.section && g.row == row.index)
        })
        .collect(),
    )
  }

  fn calc_layout_height(
    &mut self,
    ctx: &LayoutContext<'_>,
    row: &mut RowBox,
    own: &[CellId],
  ) -> Result<()> {
    self.align_baseline_aligned_cells(ctx, row, own)?;
    self.calc_row_height(row);
    if self.align_middle_and_bottom_aligned_cells(ctx, row)? {
      self.calc_row_height(row);
    }
    if row.baseline.is_none() {
      self.calc_default_baseline(row);
    }
    self.set_cell_heights(row);
    Ok(())
  }

  fn align_baseline_aligned_cells(
    &mut self,
    ctx: &LayoutContext<'_>,
    row: &mut RowBox,
    own: &[CellId],
  ) -> Result<()> {
    let baselines: Vec<(CellId, i32)> = own
      .iter()
      .filter_map(|id| self.cells.get(id))
      .filter(|cell| cell.vertical_align == VerticalAlign::Baseline)
      .map(|cell| (cell.id, cell.baseline()))
      .collect();
    let Some(lowest) = baselines.iter().map(|&(_, b)| b).max() else {
      return Ok(());
    };

    for (id, baseline) in baselines {
      let delta = lowest - baseline;
      if delta == 0 {
        continue;
      }
      let Some(cell) = self.cells.get_mut(&id) else {
        continue;
      };
      if ctx.is_print() && cell.is_page_breaks_change(ctx, delta)? {
        cell.layout(self.content, delta);
      } else {
        cell.move_content(delta);
      }
    }

    row.baseline = Some(lowest - row.y);
    Ok(())
  }

  /// Returns whether a relayout changed a cell's height so the row height
  /// must be computed again.
  fn align_middle_and_bottom_aligned_cells(
    &mut self,
    ctx: &LayoutContext<'_>,
    row: &RowBox,
  ) -> Result<bool> {
    let mut need_recalc = false;
    for id in self.grid.cells_ending_in_row(row.section, row.index) {
      let Some(cell) = self.cells.get_mut(&id) else {
        continue;
      };
      let align = cell.vertical_align;
      if align != VerticalAlign::Middle && align != VerticalAlign::Bottom {
        continue;
      }
      let gap = if cell.placement.rowspan == 1 {
        row.height - cell.natural_height()
      } else {
        row.y + row.height - (cell.y + cell.natural_height())
      };
      let delta = if align == VerticalAlign::Middle { gap / 2 } else { gap };
      if delta <= 0 {
        continue;
      }
      if ctx.is_print() && cell.is_page_breaks_change(ctx, delta)? {
        let old_height = cell.height;
        cell.layout(self.content, delta);
        if old_height + delta != cell.height {
          need_recalc = true;
        }
      } else {
        cell.move_content(delta);
      }
    }
    Ok(need_recalc)
  }

  fn is_last_row(&self, row: &RowBox) -> bool {
    self.grid.section_below(row.section, true).is_none()
      && row.index + 1 == self.grid.section(row.section).num_rows()
  }

  fn calc_row_height(&self, row: &mut RowBox) {
    let top = row.y;
    let mut bottom = top + row.height;

    if self.is_last_row(row) {
      if let Some(fixed) = self.fixed_row_bottom {
        if fixed > 0 && fixed > bottom {
          bottom = fixed;
        }
      }
    }

    for id in self.grid.cells_ending_in_row(row.section, row.index) {
      if let Some(cell) = self.cells.get(&id) {
        bottom = bottom.max(cell.y + cell.height);
      }
    }

    row.height = bottom - top;
  }

  fn calc_default_baseline(&self, row: &mut RowBox) {
    let lowest = self
      .grid
      .cells_ending_in_row(row.section, row.index)
      .iter()
      .filter_map(|id| self.cells.get(id))
      .map(|cell| cell.y + cell.height - cell.border.bottom - cell.padding.bottom)
      .max();
    if let Some(lowest) = lowest.filter(|l| *l > 0) {
      row.baseline = Some(lowest - row.y);
    }
  }

  fn set_cell_heights(&mut self, row: &RowBox) {
    for id in self.grid.cells_ending_in_row(row.section, row.index) {
      if let Some(cell) = self.cells.get_mut(&id) {
        cell.height = if cell.placement.rowspan == 1 {
          row.height
        } else {
          row.y + row.height - cell.y
        };
      }
    }
  }

  fn should_move_to_next_page(
    &self,
    ctx: &LayoutContext<'_>,
    row: &RowBox,
    own: &[CellId],
  ) -> Result<bool> {
    let page = ctx.require_page_at(row.y)?;
    if row.y + row.height < page.bottom {
      return Ok(false);
    }
    let starts_on_page = own
      .iter()
      .filter_map(|id| self.cells.get(id))
      .filter_map(CellBox::block_baseline)
      .any(|baseline| baseline < page.bottom);
    Ok(!starts_on_page)
  }

  /// Distance to move `row` so it starts below the reserved space at the top
  /// of the next page. Collapsed top borders that would spill above the page
  /// push the row further down.
  pub fn force_page_break_before(&self, ctx: &LayoutContext<'_>, row: &RowBox) -> Result<i32> {
    let page = ctx.require_page_at(row.y)?;
    let mut delta = page.bottom + ctx.extra_space_top() - row.y;

    if let Some(collapsed) = self.collapsed {
      let destination = ctx.require_page_at(row.y + delta)?;
      let spill = self
        .origin_cells(row)?
        .iter()
        .map(|id| collapsed.painting_widths(*id).top / 2)
        .max()
        .unwrap_or(0);
      let border_top = row.y + delta - spill;
      let row_delta = destination.top - border_top;
      if row_delta > 0 {
        delta += row_delta;
      }
    }
    Ok(delta)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::layout::formatting_context::{StaticCellContent, StaticContent};
  use crate::layout::pagination::UniformPages;
  use crate::style::{CellStyle, RowStyle, SectionStyle, TableStyle};

  struct Fixture {
    tree: TableTree,
    grid: TableGrid,
    cells: FxHashMap<CellId, CellBox>,
    ids: Vec<CellId>,
  }

  /// One row per entry of `rows`, cells 100px wide side by side.
  fn fixture(rows: &[Vec<CellStyle>]) -> Fixture {
    let mut tree = TableTree::new(TableStyle::default());
    let section = tree.push_section(SectionStyle::default());
    let mut ids = Vec::new();
    for cells in rows {
      let row = tree.push_row(section, RowStyle::default()).unwrap();
      for style in cells {
        ids.push(tree.push_cell(row, style.clone()).unwrap());
      }
    }
    let grid = TableGrid::build(&tree).unwrap();
    let mut cells = FxHashMap::default();
    for &id in &ids {
      let placement = *grid.cell(id).unwrap();
      let border = tree.cell(id).unwrap().style.border.widths();
      let mut cell = CellBox::new(id, placement, &grid, &tree, border).unwrap();
      cell.x = cell.eff_col as i32 * 100;
      cell.width = cell.eff_span as i32 * 100;
      cells.insert(id, cell);
    }
    Fixture {
      tree,
      grid,
      cells,
      ids,
    }
  }

  fn aligned(vertical_align: VerticalAlign) -> CellStyle {
    CellStyle {
      vertical_align,
      ..CellStyle::default()
    }
  }

  fn run(f: &mut Fixture, content: &StaticCellContent, ctx: &mut LayoutContext<'_>) -> SectionLayout {
    let mut rows = RowLayout {
      tree: &f.tree,
      grid: &f.grid,
      content,
      collapsed: None,
      cells: &mut f.cells,
      vspacing: 0,
      fixed_row_bottom: None,
      running: false,
    };
    rows.layout_section(ctx, 0, 0).unwrap()
  }

  #[test]
  fn baselines_line_up_at_the_lowest() {
    let mut f = fixture(&[vec![aligned(VerticalAlign::Baseline); 3]]);
    let content = StaticCellContent::new()
      .with_cell(f.ids[0], StaticContent::new(0, 0, 20).with_baseline(10))
      .with_cell(f.ids[1], StaticContent::new(0, 0, 20).with_baseline(14))
      .with_cell(f.ids[2], StaticContent::new(0, 0, 20).with_baseline(8));
    let mut ctx = LayoutContext::screen(300);
    let section = run(&mut f, &content, &mut ctx);

    assert_eq!(section.rows[0].baseline, Some(14));
    for id in &f.ids {
      assert_eq!(f.cells[id].baseline(), 14, "cell {:?}", id);
    }
    // the cell shifted furthest (6px) sets the row height
    assert_eq!(section.rows[0].height, 26);
    assert!(f.cells.values().all(|c| c.height == 26));
  }

  #[test]
  fn middle_and_bottom_cells_move_into_the_row() {
    let mut f = fixture(&[vec![
      aligned(VerticalAlign::Top),
      aligned(VerticalAlign::Middle),
      aligned(VerticalAlign::Bottom),
    ]]);
    let content = StaticCellContent::new()
      .with_cell(f.ids[0], StaticContent::new(0, 0, 60))
      .with_cell(f.ids[1], StaticContent::new(0, 0, 20))
      .with_cell(f.ids[2], StaticContent::new(0, 0, 20));
    let mut ctx = LayoutContext::screen(300);
    let section = run(&mut f, &content, &mut ctx);

    assert_eq!(section.height, 60);
    assert_eq!(f.cells[&f.ids[0]].content_offset, 0);
    assert_eq!(f.cells[&f.ids[1]].content_offset, 20);
    assert_eq!(f.cells[&f.ids[2]].content_offset, 40);
    // no baseline-aligned cell: lowest content edge
    assert_eq!(section.rows[0].baseline, Some(60));
  }

  #[test]
  fn rowspan_cells_reach_the_bottom_of_their_last_row() {
    let spanning = CellStyle {
      rowspan: 2,
      ..CellStyle::default()
    };
    let mut f = fixture(&[vec![spanning, CellStyle::default()], vec![CellStyle::default()]]);
    let content = StaticCellContent::new()
      .with_cell(f.ids[0], StaticContent::new(0, 0, 70))
      .with_cell(f.ids[1], StaticContent::new(0, 0, 20))
      .with_cell(f.ids[2], StaticContent::new(0, 0, 30));
    let mut ctx = LayoutContext::screen(200);
    let section = run(&mut f, &content, &mut ctx);

    assert_eq!(section.rows[0].height, 20);
    assert_eq!(section.rows[1].y, 20);
    // the second row grows so the spanning cell fits
    assert_eq!(section.rows[1].height, 50);
    assert_eq!(f.cells[&f.ids[0]].height, 70);
    assert_eq!(f.cells[&f.ids[2]].height, 50);
  }

  #[test]
  fn declared_heights_are_minimums() {
    let tall = CellStyle {
      height: Length::Fixed(40),
      padding: EdgeOffsets::all(5),
      ..CellStyle::default()
    };
    let mut f = fixture(&[vec![tall]]);
    let content = StaticCellContent::new().with_cell(f.ids[0], StaticContent::new(0, 0, 10));
    let mut ctx = LayoutContext::screen(100);
    let section = run(&mut f, &content, &mut ctx);
    assert_eq!(section.height, 40);
    assert_eq!(f.cells[&f.ids[0]].content_box(), Rect::from_xywh(5, 5, 90, 30));
  }

  #[test]
  fn empty_rows_have_no_baseline() {
    let mut f = fixture(&[vec![]]);
    let content = StaticCellContent::new();
    let mut ctx = LayoutContext::screen(100);
    let section = run(&mut f, &content, &mut ctx);
    assert_eq!(section.rows[0].height, 0);
    assert_eq!(section.rows[0].baseline, None);
  }

  fn paged(f: &mut Fixture, content: &StaticCellContent, ctx: &mut LayoutContext<'_>) -> SectionLayout {
    let mut rows = RowLayout {
      tree: &f.tree,
      grid: &f.grid,
      content,
      collapsed: None,
      cells: &mut f.cells,
      vspacing: 0,
      fixed_row_bottom: None,
      running: true,
    };
    rows.layout_section(ctx, 0, 0).unwrap()
  }

  #[test]
  fn rows_crossing_the_page_bottom_move_to_the_next_page() {
    let mut f = fixture(&[vec![CellStyle::default()], vec![CellStyle::default()]]);
    let content = StaticCellContent::new()
      .with_cell(f.ids[0], StaticContent::new(0, 0, 60).with_lines(20))
      .with_cell(f.ids[1], StaticContent::new(0, 0, 60).with_lines(50));
    let pages = UniformPages::new(0, 100);
    let mut ctx = LayoutContext::print(100, &pages).with_extra_space(5, 0);
    let section = paged(&mut f, &content, &mut ctx);

    assert!(!section.table_page_clear);
    assert!(!section.rows[0].moved);
    // first baseline at 110 lies past the page bottom
    assert!(section.rows[1].moved);
    assert_eq!(section.rows[1].y, 105);
    assert_eq!(section.height, 165);
    assert_eq!(ctx.extra_space_top(), 5);
  }

  #[test]
  fn first_body_row_asks_to_move_the_table() {
    let mut f = fixture(&[vec![CellStyle::default()]]);
    let content =
      StaticCellContent::new().with_cell(f.ids[0], StaticContent::new(0, 0, 150).with_lines(120));
    let pages = UniformPages::new(0, 100);
    let mut ctx = LayoutContext::print(100, &pages);
    let section = paged(&mut f, &content, &mut ctx);

    assert!(section.table_page_clear);
    assert!(!section.rows[0].moved);
    assert_eq!(section.rows[0].y, 0);
  }

  #[test]
  fn no_page_break_regions_keep_rows_in_place() {
    let mut f = fixture(&[vec![CellStyle::default()], vec![CellStyle::default()]]);
    let content = StaticCellContent::new()
      .with_cell(f.ids[0], StaticContent::new(0, 0, 90))
      .with_cell(f.ids[1], StaticContent::new(0, 0, 60));
    let pages = UniformPages::new(0, 100);
    let mut ctx = LayoutContext::print(100, &pages);
    ctx.enter_no_page_break();
    let section = paged(&mut f, &content, &mut ctx);
    assert!(section.rows.iter().all(|r| !r.moved));
    assert_eq!(section.height, 150);
  }
}
