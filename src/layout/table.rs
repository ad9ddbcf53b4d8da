//! Table layout (CSS 2.1 Chapter 17)
//!
//! [`Table`] owns a [`TableTree`] together with the state derived from it: the
//! grid of effective columns and the column strategy picked from the table's
//! style. [`TableFormattingContext`] runs one layout of such a table:
//!
//! 1. Build (or reuse) the grid and, for `border-collapse: collapse`, resolve
//!    every cell edge.
//! 2. Measure cells and let the strategy compute the table's min/max widths;
//!    fit the table width to them.
//! 3. In print mode, push a collapsed table down so its top border starts on
//!    the page.
//! 4. Position columns and cells, then lay out rows section by section.
//! 5. For paginated tables, reserve space for repeated headers and footers
//!    while rows are laid out, move the table to the next page when its first
//!    body row (or its header and footer) cannot start on this one, and record
//!    per-page content limits for painting.

use crate::error::{LayoutError, Result};
use crate::geometry::{Point, Rect};
use crate::layout::context::LayoutContext;
use crate::layout::contexts::table::cell_metrics::measure_cells;
use crate::layout::contexts::table::collapse::CollapsedBorders;
use crate::layout::contexts::table::content_limit::ContentLimitTree;
use crate::layout::contexts::table::dimensions::{TableDimensions, TableWidths};
use crate::layout::contexts::table::grid::TableGrid;
use crate::layout::contexts::table::row_layout::{CellBox, RowLayout, SectionLayout};
use crate::layout::contexts::table::strategy::{StrategyKind, TableLayoutStrategy};
use crate::layout::formatting_context::CellContentLayout;
use crate::style::{Length, TableStyle, MAX_WIDTH};
use crate::tree::{CellGeometry, CellId, RowGeometry, SectionGeometry, TableGeometry, TableTree};
use rustc_hash::FxHashMap;

/// A table and its cached layout state
///
/// The grid is rebuilt whenever the tree changed since it was last built.
/// The column strategy is chosen when the table is created and again on
/// every [`Table::set_style`]; it never changes during a layout.
///
/// # Examples
///
/// ```
/// use tablegrid::{LayoutContext, StaticCellContent, StaticContent, Table};
/// use tablegrid::{CellStyle, RowStyle, SectionStyle, TableStyle, TableTree};
///
/// let mut tree = TableTree::new(TableStyle::default());
/// let body = tree.push_section(SectionStyle::default());
/// let row = tree.push_row(body, RowStyle::default()).unwrap();
/// let cell = tree.push_cell(row, CellStyle::default()).unwrap();
///
/// let content = StaticCellContent::new().with_cell(cell, StaticContent::new(20, 60, 18));
/// let mut table = Table::new(tree);
/// let geometry = table.layout(&LayoutContext::screen(500), &content).unwrap();
/// assert_eq!(geometry.bounds.width, 60);
/// assert_eq!(geometry.bounds.height, 18);
/// ```
#[derive(Debug, Clone)]
pub struct Table {
  tree: TableTree,
  margin_area_root: bool,
  strategy: TableLayoutStrategy,
  grid: Option<(u64, TableGrid)>,
}

impl Table {
  pub fn new(tree: TableTree) -> Self {
    Self::with_root(tree, false)
  }

  /// A synthetic table holding page margin boxes. Its columns may shrink to
  /// nothing and the outer two stay balanced around the middle one.
  pub fn margin_box(tree: TableTree) -> Self {
    Self::with_root(tree, true)
  }

  fn with_root(tree: TableTree, margin_area_root: bool) -> Self {
    let strategy = TableLayoutStrategy::for_style(tree.style(), margin_area_root);
    Self {
      tree,
      margin_area_root,
      strategy,
      grid: None,
    }
  }

  pub fn tree(&self) -> &TableTree {
    &self.tree
  }

  /// Structural edits; the grid is rebuilt on the next layout.
  pub fn tree_mut(&mut self) -> &mut TableTree {
    &mut self.tree
  }

  pub fn style(&self) -> &TableStyle {
    self.tree.style()
  }

  /// Replaces the table style and selects the column strategy anew.
  pub fn set_style(&mut self, style: TableStyle) {
    self.strategy = TableLayoutStrategy::for_style(&style, self.margin_area_root);
    self.tree.set_style(style);
  }

  pub fn strategy(&self) -> StrategyKind {
    self.strategy.kind()
  }

  /// Drops the grid and the strategy's per-column state.
  pub fn reset(&mut self) {
    self.grid = None;
    self.strategy.reset();
  }

  pub fn layout(
    &mut self,
    ctx: &LayoutContext<'_>,
    content: &dyn CellContentLayout,
  ) -> Result<TableGeometry> {
    TableFormattingContext::new(content).layout(self, ctx)
  }

  /// The grid for the current tree revision. Fixed layout may append
  /// columns while measuring, so every pass works on its own copy.
  fn grid(&mut self) -> Result<TableGrid> {
    let revision = self.tree.revision();
    match &self.grid {
      Some((built, grid)) if *built == revision => Ok(grid.clone()),
      _ => {
        let grid = TableGrid::build(&self.tree)?;
        self.strategy.reset();
        self.grid = Some((revision, grid.clone()));
        Ok(grid)
      }
    }
  }
}

/// Lays out tables whose cell content comes from `content`
pub struct TableFormattingContext<'a> {
  content: &'a dyn CellContentLayout,
}

/// Result of one layout pass
struct Pass {
  geometry: TableGeometry,
  /// The table asked to start on the next page
  page_clear: bool,
}

impl<'a> TableFormattingContext<'a> {
  pub fn new(content: &'a dyn CellContentLayout) -> Self {
    Self { content }
  }

  /// Lays out `table` with its margin box at `ctx.origin()`.
  pub fn layout(&self, table: &mut Table, ctx: &LayoutContext<'_>) -> Result<TableGeometry> {
    if ctx.containing_width() < 0 {
      return Err(
        LayoutError::InvalidConstraints {
          message: format!(
            "containing width cannot be negative (got {})",
            ctx.containing_width()
          ),
        }
        .into(),
      );
    }

    let mut ctx = ctx.clone();
    let mut passes = 0;
    loop {
      let pass = self.layout_once(table, &ctx)?;
      if !pass.page_clear
        || !ctx.is_page_breaks_allowed()
        || passes >= ctx.config().max_page_clear_passes
      {
        return Ok(pass.geometry);
      }

      let origin = ctx.origin();
      let page = ctx.require_page_at(origin.y)?;
      let y = page.bottom + ctx.extra_space_top();
      log::debug!(
        target: "tablegrid::pagination",
        "table moved from y={} to the next page at y={}",
        origin.y,
        y
      );
      ctx.set_origin(Point::new(origin.x, y));
      passes += 1;
    }
  }

  fn layout_once(&self, table: &mut Table, ctx: &LayoutContext<'_>) -> Result<Pass> {
    let mut grid = table.grid()?;
    let tree = &table.tree;
    let strategy = &mut table.strategy;
    let style = tree.style();
    let config = ctx.config();

    let collapsed = if style.is_collapse_borders() {
      Some(CollapsedBorders::resolve(tree, &grid, config.log_borders)?)
    } else {
      None
    };

    let metrics = measure_cells(tree, &grid, collapsed.as_ref(), self.content)?;
    strategy.reset();
    let mut dims = TableDimensions::resolve(style, ctx.containing_width() as i64);
    let widths = strategy.calc_min_max(tree, &mut grid, &metrics, &dims);
    dims.fit(widths);

    let mut origin = ctx.origin();
    let page_clearance = match &collapsed {
      Some(collapsed) if ctx.is_print() => calc_page_clearance(ctx, tree, collapsed, origin)?,
      _ => 0,
    };
    origin.y += page_clearance;

    let column_positions = strategy.layout(&dims);
    if config.log_columns {
      log_columns(strategy, &dims, widths, &column_positions);
    }

    let margin = style.margin;
    let border = style.box_border();
    let padding = style.box_padding();
    let hspacing = style.h_spacing();
    let vspacing = style.v_spacing();
    let content_width = clamp_width(dims.content_width);
    let x = origin.x + margin.left;
    let y = origin.y + margin.top;
    let content_x = x + border.left + padding.left;
    let content_top = y + border.top + padding.top;

    let mut cells = place_cells(
      tree,
      &grid,
      collapsed.as_ref(),
      &column_positions,
      content_x,
      hspacing,
    )?;

    let fixed_row_bottom = match style.height {
      Length::Fixed(h) if h > 0 => {
        Some(y + clamp_width(h) - border.bottom - padding.bottom - vspacing)
      }
      _ => None,
    };

    let mut ctx = ctx.clone();
    ctx.set_origin(origin);
    let running = ctx.is_print() && style.paginate;
    let prev_extra = (ctx.extra_space_top(), ctx.extra_space_bottom());
    let num_sections = grid.sections().len();
    let header = tree.running_header().map(|_| 0);
    let footer = tree
      .running_footer()
      .and_then(|_| num_sections.checked_sub(1));

    let mut rows = RowLayout {
      tree,
      grid: &grid,
      content: self.content,
      collapsed: collapsed.as_ref(),
      cells: &mut cells,
      vspacing,
      fixed_row_bottom,
      running,
    };

    let mut page_clear = false;
    if running {
      ctx.set_extra_space_top(prev_extra.0 + padding.top + border.top + vspacing);
      ctx.set_extra_space_bottom(prev_extra.1 + padding.bottom + border.bottom + vspacing);

      let header_height = match header {
        Some(section) => pinned_section(&mut rows, &mut ctx, section, content_top)?.height,
        None => 0,
      };
      ctx.set_extra_space_top(ctx.extra_space_top() + header_height);

      let footer_height = match footer {
        Some(section) => pinned_section(&mut rows, &mut ctx, section, content_top)?.height,
        None => 0,
      };
      if footer_height > 0 {
        ctx.set_extra_space_bottom(ctx.extra_space_bottom() + footer_height + vspacing);
      }

      if ctx.is_page_breaks_allowed() {
        let page = ctx.require_page_at(content_top)?;
        let spacing = if footer_height > 0 { vspacing } else { 0 };
        if content_top + header_height + footer_height + spacing > page.bottom {
          page_clear = true;
        }
      }
    }

    let mut layouts = Vec::with_capacity(num_sections);
    let mut top = content_top;
    for section in 0..num_sections {
      let layout = if header == Some(section) || footer == Some(section) {
        pinned_section(&mut rows, &mut ctx, section, top)?
      } else {
        rows.layout_section(&mut ctx, section, top)?
      };
      page_clear |= layout.table_page_clear;
      top += layout.height;
      layouts.push(layout);
    }

    let mut content_height = top - content_top;
    if num_sections > 0 {
      content_height += vspacing;
    }
    let mut height = content_height + border.vertical() + padding.vertical();
    if let Length::Fixed(h) = style.height {
      height = height.max(clamp_width(h));
    }

    let (extra_space_top, extra_space_bottom) = if running && ctx.is_inside_paginated_table() {
      (
        ctx.extra_space_top() - prev_extra.0,
        ctx.extra_space_bottom() - prev_extra.1,
      )
    } else {
      (0, 0)
    };

    let sections = layouts
      .into_iter()
      .zip(grid.sections())
      .map(|(layout, section)| -> Result<SectionGeometry> {
        let rows = layout
          .rows
          .iter()
          .map(|row| -> Result<RowGeometry> {
            let cells = tree
              .row(row.id)?
              .cells
              .iter()
              .filter_map(|id| cells.get(id))
              .map(|cell| cell_geometry(cell, collapsed.as_ref()))
              .collect();
            Ok(RowGeometry {
              id: row.id,
              bounds: row.bounds(content_x, content_width),
              baseline: row.baseline,
              extra_space_top: row.extra_space_top,
              extra_space_bottom: row.extra_space_bottom,
              moved_to_next_page: row.moved,
              cells,
              content_limit: None,
            })
          })
          .collect::<Result<Vec<_>>>()?;
        Ok(SectionGeometry {
          id: section.id,
          role: section.role,
          bounds: Rect::from_xywh(content_x, layout.top, content_width, layout.height),
          rows,
        })
      })
      .collect::<Result<Vec<_>>>()?;

    let mut geometry = TableGeometry {
      strategy: strategy.kind(),
      bounds: Rect::from_xywh(
        x,
        y,
        content_width + border.horizontal() + padding.horizontal(),
        height,
      ),
      margin,
      border,
      padding,
      min_width: widths.min,
      max_width: widths.max,
      column_positions,
      hspacing,
      vspacing,
      page_clearance,
      extra_space_top,
      extra_space_bottom,
      sections,
      collapsed_borders: collapsed
        .as_ref()
        .map(|c| c.collect_sides(&grid))
        .unwrap_or_default(),
      content_limits: None,
    };

    if running && !ctx.is_inside_paginated_table() {
      if let Some(pages) = ctx.pages() {
        let mut limits = ContentLimitTree::new();
        geometry.analyze_page_breaks(pages, &mut limits, None)?;
        geometry.content_limits = Some(limits);
      }
    }

    log::debug!(
      target: "tablegrid::rows",
      "table laid out at {} ({} sections, page clear requested: {})",
      geometry.bounds,
      geometry.sections.len(),
      page_clear
    );
    Ok(Pass {
      geometry,
      page_clear,
    })
  }
}

/// Lays out a header or footer; its rows never move to another page.
fn pinned_section(
  rows: &mut RowLayout<'_>,
  ctx: &mut LayoutContext<'_>,
  section: usize,
  top: i32,
) -> Result<SectionLayout> {
  ctx.enter_no_page_break();
  let layout = rows.layout_section(ctx, section, top);
  ctx.leave_no_page_break();
  layout
}

/// How far a collapsed table must move down so the top borders of its first
/// row do not start above the page.
fn calc_page_clearance(
  ctx: &LayoutContext<'_>,
  tree: &TableTree,
  collapsed: &CollapsedBorders,
  origin: Point,
) -> Result<i32> {
  let Some(first_row) = tree.first_row() else {
    return Ok(0);
  };
  let spill = tree
    .row(first_row)?
    .cells
    .iter()
    .map(|id| collapsed.painting_widths(*id).top / 2)
    .max()
    .unwrap_or(0);
  let page = ctx.require_page_at(origin.y)?;
  let border_top = origin.y + tree.style().margin.top - spill;
  let delta = page.top - border_top;
  if delta > 0 {
    log::debug!(
      target: "tablegrid::pagination",
      "collapsed top border spills {}px above the page; clearance {}",
      spill,
      delta
    );
    Ok(delta)
  } else {
    Ok(0)
  }
}

/// Cell boxes with their horizontal position and width.
fn place_cells(
  tree: &TableTree,
  grid: &TableGrid,
  collapsed: Option<&CollapsedBorders>,
  column_positions: &[i32],
  content_x: i32,
  hspacing: i32,
) -> Result<FxHashMap<CellId, CellBox>> {
  let mut cells = FxHashMap::default();
  for section in grid.sections() {
    for &row in section.row_ids() {
      for &id in &tree.row(row)?.cells {
        let Some(placement) = grid.cell(id).copied() else {
          continue;
        };
        let border = match collapsed {
          Some(collapsed) => collapsed.layout_widths(id),
          None => tree.cell(id)?.style.border.widths(),
        };
        let mut cell = CellBox::new(id, placement, grid, tree, border)?;
        debug_assert!(cell.eff_col < column_positions.len());
        let start = column_positions.get(cell.eff_col).copied().unwrap_or(0);
        let end = column_positions
          .get(cell.eff_col + cell.eff_span)
          .copied()
          .unwrap_or(start);
        cell.x = content_x + start + hspacing;
        cell.width = (end - start - hspacing).max(0);
        cells.insert(id, cell);
      }
    }
  }
  Ok(cells)
}

fn cell_geometry(cell: &CellBox, collapsed: Option<&CollapsedBorders>) -> CellGeometry {
  let content_top = cell.content_top() + cell.content_offset;
  CellGeometry {
    id: cell.id,
    col: cell.placement.col,
    eff_col: cell.eff_col,
    colspan: cell.placement.colspan,
    rowspan: cell.placement.rowspan,
    bounds: cell.bounds(),
    border: cell.border,
    padding: cell.padding,
    vertical_align: cell.vertical_align,
    baseline: cell.block_baseline(),
    content_offset: cell.content_offset,
    fragments: cell
      .content
      .fragments
      .iter()
      .map(|f| f.translate(content_top))
      .collect(),
    collapsed: collapsed.and_then(|c| c.get(cell.id)).copied(),
  }
}

fn log_columns(
  strategy: &TableLayoutStrategy,
  dims: &TableDimensions,
  widths: TableWidths,
  positions: &[i32],
) {
  log::debug!(
    target: "tablegrid::columns",
    "{:?} layout: min {} max {} content width {} positions {:?}",
    strategy.kind(),
    widths.min,
    widths.max,
    dims.content_width,
    positions
  );
  if let TableLayoutStrategy::Auto(layout) | TableLayoutStrategy::MarginBox(layout) = strategy {
    for (i, column) in layout.columns().iter().enumerate() {
      log::trace!(
        target: "tablegrid::columns",
        "column {}: width {:?} eff {:?} min {} max {} eff min {} eff max {} calc {}",
        i,
        column.width,
        column.eff_width,
        column.min_width,
        column.max_width,
        column.eff_min_width,
        column.eff_max_width,
        column.calc_width
      );
    }
  }
}

fn clamp_width(value: i64) -> i32 {
  value.clamp(0, MAX_WIDTH) as i32
}
