//! Table layout output
//!
//! A [`TableGeometry`] is what the painting side gets back from table layout:
//! absolute border boxes for the table, its sections, rows and cells, the
//! column boundaries, the collapsed border segments to paint and, for paged
//! output, the per-page content limits. The page-dependent painting queries
//! (clipped edges, repeated header/footer placement) live here too, since
//! they only read finished geometry.
//!
//! Everything serializes, so a layout can be snapshotted as JSON.

use crate::error::Result;
use crate::geometry::{EdgeOffsets, Rect};
use crate::layout::contexts::table::collapse::{CellBorders, CollapsedBorderSide};
use crate::layout::contexts::table::content_limit::{ContentLimit, ContentLimitTree};
use crate::layout::contexts::table::strategy::StrategyKind;
use crate::layout::formatting_context::ContentExtent;
use crate::layout::pagination::PageGeometry;
use crate::style::{SectionRole, VerticalAlign};
use crate::tree::{CellId, RowId, SectionId};
use serde::Serialize;

/// A laid out cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellGeometry {
  pub id: CellId,
  /// Markup column
  pub col: usize,
  pub eff_col: usize,
  pub colspan: usize,
  pub rowspan: usize,
  /// Border box
  pub bounds: Rect,
  /// Layout border widths
  pub border: EdgeOffsets,
  pub padding: EdgeOffsets,
  pub vertical_align: VerticalAlign,
  /// Absolute first baseline of the content
  pub baseline: Option<i32>,
  /// Downward shift applied to the content by vertical alignment
  pub content_offset: i32,
  /// Absolute extents of the content's fragments
  pub fragments: Vec<ContentExtent>,
  /// Resolved edges, for collapsed tables
  pub collapsed: Option<CellBorders>,
}

impl CellGeometry {
  pub fn content_box(&self) -> Rect {
    self.bounds.inset(self.border + self.padding)
  }

  /// Area painted for the cell's border: the border box, grown by the
  /// outer halves of collapsed edges.
  pub fn painting_bounds(&self) -> Rect {
    match &self.collapsed {
      Some(borders) => borders.expand_bounds(self.bounds),
      None => self.bounds,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowGeometry {
  pub id: RowId,
  pub bounds: Rect,
  /// Relative to the row's top
  pub baseline: Option<i32>,
  pub extra_space_top: i32,
  pub extra_space_bottom: i32,
  /// Pushed to the next page during layout
  pub moved_to_next_page: bool,
  /// Cells starting in this row
  pub cells: Vec<CellGeometry>,
  /// Index into [`TableGeometry::content_limits`]
  pub content_limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionGeometry {
  pub id: SectionId,
  pub role: SectionRole,
  pub bounds: Rect,
  pub rows: Vec<RowGeometry>,
}

impl SectionGeometry {
  pub fn is_header(&self) -> bool {
    self.role == SectionRole::Header
  }

  pub fn is_footer(&self) -> bool {
    self.role == SectionRole::Footer
  }
}

/// A laid out table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableGeometry {
  pub strategy: StrategyKind,
  /// Border box
  pub bounds: Rect,
  pub margin: EdgeOffsets,
  /// Border and padding the table box occupies (none when collapsing)
  pub border: EdgeOffsets,
  pub padding: EdgeOffsets,
  pub min_width: i64,
  pub max_width: i64,
  /// Column boundaries relative to the content box, one more than there
  /// are effective columns
  pub column_positions: Vec<i32>,
  pub hspacing: i32,
  pub vspacing: i32,
  /// Extra offset applied so collapsed top borders start on the page
  pub page_clearance: i32,
  /// Space this table reserves on every page of an enclosing paginated
  /// table (only for nested tables)
  pub extra_space_top: i32,
  pub extra_space_bottom: i32,
  pub sections: Vec<SectionGeometry>,
  /// Collapsed edges to paint, each shared edge once
  pub collapsed_borders: Vec<CollapsedBorderSide>,
  /// Per-page content extents; container 0 is the table
  pub content_limits: Option<ContentLimitTree>,
}

/// Index of the table's own container in [`TableGeometry::content_limits`].
const TABLE_LIMITS: usize = 0;

impl TableGeometry {
  pub fn content_box(&self) -> Rect {
    self.bounds.inset(self.border + self.padding)
  }

  pub fn margin_box(&self) -> Rect {
    Rect::from_xywh(
      self.bounds.x - self.margin.left,
      self.bounds.y - self.margin.top,
      self.bounds.width + self.margin.horizontal(),
      self.bounds.height + self.margin.vertical(),
    )
  }

  pub fn num_eff_cols(&self) -> usize {
    self.column_positions.len().saturating_sub(1)
  }

  pub fn rows(&self) -> impl Iterator<Item = &RowGeometry> {
    self.sections.iter().flat_map(|s| s.rows.iter())
  }

  pub fn cells(&self) -> impl Iterator<Item = &CellGeometry> {
    self.rows().flat_map(|r| r.cells.iter())
  }

  pub fn cell(&self, id: CellId) -> Option<&CellGeometry> {
    self.cells().find(|c| c.id == id)
  }

  /// The first section, when it is a header.
  pub fn header(&self) -> Option<&SectionGeometry> {
    self.sections.first().filter(|s| s.is_header())
  }

  /// The last section, when it is a footer.
  pub fn footer(&self) -> Option<&SectionGeometry> {
    self.sections.last().filter(|s| s.is_footer())
  }

  /// Background area of an effective column.
  pub fn column_bounds(&self, eff_col: usize) -> Option<Rect> {
    let start = *self.column_positions.get(eff_col)?;
    let end = *self.column_positions.get(eff_col + 1)?;
    let content = self.content_box();
    Some(Rect::from_xywh(
      content.x + start + self.hspacing,
      content.y + self.vspacing,
      end - start - self.hspacing,
      content.height - 2 * self.vspacing,
    ))
  }

  /// Baseline for inline placement, relative to the border box top: the
  /// first row's baseline, or the table's height without rows.
  pub fn inline_baseline(&self) -> i32 {
    match self.sections.first().and_then(|s| s.rows.first()) {
      Some(row) => row.bounds.y + row.baseline.unwrap_or(0) - self.bounds.y,
      None => self.bounds.height,
    }
  }

  /// Builds content limits for this table under `parent` (a container of
  /// an enclosing paginated table, or `None` for a top-level table). Returns
  /// the table's container index.
  pub fn analyze_page_breaks(
    &mut self,
    pages: &dyn PageGeometry,
    limits: &mut ContentLimitTree,
    parent: Option<usize>,
  ) -> Result<usize> {
    let top = self.margin_box().y;
    let table = limits.push(pages, parent, top)?;
    if let Some(parent) = parent {
      limits.update_top(pages, parent, top)?;
      limits.update_bottom(pages, parent, self.bounds.max_y())?;
    }

    for section in &mut self.sections {
      limits.update_top(pages, table, section.bounds.y)?;
      for row in &mut section.rows {
        let container = limits.push(pages, Some(table), row.bounds.y)?;
        limits.update_top(pages, table, row.bounds.y)?;
        limits.update_bottom(pages, table, row.bounds.max_y())?;

        for cell in &row.cells {
          limits.update_top(pages, container, cell.bounds.y)?;
          for fragment in &cell.fragments {
            limits.update_top(pages, container, fragment.top)?;
            limits.update_bottom(pages, container, fragment.bottom)?;
          }
          limits.update_bottom(pages, container, cell.bounds.max_y())?;
        }

        if limits
          .get(container)
          .map_or(false, |c| c.contains_multiple_pages())
        {
          limits.propagate_extra_space(
            pages,
            table,
            container,
            row.extra_space_top,
            row.extra_space_bottom,
          )?;
        }
        row.content_limit = Some(container);
      }
      limits.update_bottom(pages, table, section.bounds.max_y())?;
    }

    if let Some(parent) = parent {
      let multiple = limits
        .get(table)
        .map_or(false, |c| c.contains_multiple_pages());
      if multiple && (self.extra_space_top > 0 || self.extra_space_bottom > 0) {
        limits.propagate_extra_space(
          pages,
          parent,
          table,
          self.extra_space_top,
          self.extra_space_bottom,
        )?;
      }
    }
    Ok(table)
  }

  fn table_limit(&self, page: usize) -> Option<(ContentLimit, usize, usize)> {
    let container = self.content_limits.as_ref()?.get(TABLE_LIMITS)?;
    let limit = *container.limit(page)?;
    Some((limit, container.initial_page(), container.last_page()))
  }

  /// The table's border box clipped to what it occupies on `page`.
  ///
  /// Continuation pages start at the page's content top, less the space the
  /// table's border, padding, spacing and repeated header take; pages the
  /// table continues past end likewise below the content bottom.
  pub fn content_limited_border_edge(&self, page: usize) -> Rect {
    let bounds = self.bounds;
    if self.content_limits.is_none() {
      return bounds;
    }
    let Some((limit, first, last)) = self.table_limit(page) else {
      log::warn!(target: "tablegrid::pagination", "no content limit for page {}", page);
      return bounds;
    };
    let (Some(limit_top), Some(limit_bottom)) = (limit.top, limit.bottom) else {
      return bounds;
    };

    let top = if page == first {
      bounds.y
    } else {
      limit_top
        - self.padding.top
        - self.border.top
        - self.vspacing
        - self.header().map_or(0, |h| h.bounds.height)
    };
    let bottom = if page == last {
      bounds.max_y()
    } else {
      limit_bottom
        + self.padding.bottom
        + self.border.bottom
        + self.vspacing
        + self.footer().map_or(0, |f| f.bounds.height)
    };
    Rect::from_xywh(bounds.x, top, bounds.width, bottom - top)
  }

  /// Where the repeated header's top goes on `page`: its own position on
  /// the page it starts on, otherwise flush above the page's content.
  pub fn header_position(&self, page: usize) -> Option<i32> {
    let header = self.header()?;
    let (limit, first, _) = self.table_limit(page)?;
    if page == first {
      return Some(header.bounds.y);
    }
    limit
      .top
      .map(|top| top - self.vspacing - header.bounds.height)
  }

  /// Where the repeated footer's top goes on `page`: its own position on the
  /// table's last page, otherwise right below the page's content.
  pub fn footer_position(&self, page: usize) -> Option<i32> {
    let footer = self.footer()?;
    let (limit, _, last) = self.table_limit(page)?;
    if page == last {
      return Some(footer.bounds.y);
    }
    limit.bottom
  }

  /// A body cell's border box clipped to `page`, extended by its row's
  /// reserved space where the row breaks. `None` when the cell's row has
  /// nothing on that page.
  pub fn cell_content_limited_border_edge(&self, cell: CellId, page: usize) -> Option<Rect> {
    let (section, row, cell) = self.locate(cell)?;
    let bounds = cell.bounds;
    if section.is_header() || section.is_footer() || self.content_limits.is_none() {
      return Some(bounds);
    }
    let container = self
      .content_limits
      .as_ref()
      .and_then(|limits| limits.get(row.content_limit?))?;
    let limit = container.limit(page)?;
    let (Some(limit_top), Some(limit_bottom)) = (limit.top, limit.bottom) else {
      return Some(bounds);
    };

    let top = if page == container.initial_page() {
      bounds.y
    } else {
      limit_top - row.extra_space_top
    };
    let bottom = if page == container.last_page() {
      bounds.max_y()
    } else {
      limit_bottom + row.extra_space_bottom
    };
    Some(Rect::from_xywh(bounds.x, top, bounds.width, bottom - top))
  }

  /// Clip for a cell's content on `page`.
  pub fn cell_clip_edge(&self, cell: CellId, page: usize) -> Option<Rect> {
    let geometry = self.cell(cell)?;
    let edge = self.cell_content_limited_border_edge(cell, page)?;
    Some(Rect::from_xywh(
      edge.x,
      edge.y + geometry.border.top + geometry.padding.top,
      edge.width,
      edge.height - geometry.border.vertical() - geometry.padding.vertical(),
    ))
  }

  fn locate(&self, id: CellId) -> Option<(&SectionGeometry, &RowGeometry, &CellGeometry)> {
    self.sections.iter().find_map(|section| {
      section.rows.iter().find_map(|row| {
        row
          .cells
          .iter()
          .find(|c| c.id == id)
          .map(|cell| (section, row, cell))
      })
    })
  }
}
