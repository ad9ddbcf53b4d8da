//! Per-page content extents of a paginated table
//!
//! A paginated table records, for every page its content touches, the
//! topmost and bottommost y of that content. Painting uses the extents to
//! clip the table and its cells to one page and to place the repeated header
//! and footer. Containers form a tree (table, then one per row); every update
//! also reaches all ancestors.

use crate::error::{LayoutError, Result};
use crate::layout::pagination::{PageBox, PageGeometry};
use serde::Serialize;

/// Extent of content on a single page; `None` until something lands there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ContentLimit {
  pub top: Option<i32>,
  pub bottom: Option<i32>,
}

impl ContentLimit {
  pub fn update_top(&mut self, top: i32) {
    if self.top.map_or(true, |t| top < t) {
      self.top = Some(top);
    }
  }

  pub fn update_bottom(&mut self, bottom: i32) {
    if self.bottom.map_or(true, |b| bottom > b) {
      self.bottom = Some(bottom);
    }
  }

  pub fn is_defined(&self) -> bool {
    self.top.is_some() && self.bottom.is_some()
  }
}

/// Content limits of one box, indexed from the page it starts on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentLimitContainer {
  parent: Option<usize>,
  initial_page: usize,
  limits: Vec<ContentLimit>,
}

impl ContentLimitContainer {
  pub fn parent(&self) -> Option<usize> {
    self.parent
  }

  pub fn initial_page(&self) -> usize {
    self.initial_page
  }

  /// Last page any content was recorded on (the initial page when nothing
  /// was).
  pub fn last_page(&self) -> usize {
    self.initial_page + self.limits.len().saturating_sub(1)
  }

  pub fn limit(&self, page: usize) -> Option<&ContentLimit> {
    page
      .checked_sub(self.initial_page)
      .and_then(|i| self.limits.get(i))
  }

  pub fn contains_multiple_pages(&self) -> bool {
    self.limits.len() > 1
  }

  fn limit_mut(&mut self, page: usize) -> Option<&mut ContentLimit> {
    let index = page.checked_sub(self.initial_page)?;
    if self.limits.len() <= index {
      self.limits.resize(index + 1, ContentLimit::default());
    }
    self.limits.get_mut(index)
  }
}

/// All containers of one table layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentLimitTree {
  containers: Vec<ContentLimitContainer>,
}

impl ContentLimitTree {
  pub fn new() -> Self {
    Self::default()
  }

  /// Opens a container for a box starting at `start_y`.
  pub fn push(
    &mut self,
    pages: &dyn PageGeometry,
    parent: Option<usize>,
    start_y: i32,
  ) -> Result<usize> {
    let page = page_at(pages, start_y)?;
    self.containers.push(ContentLimitContainer {
      parent,
      initial_page: page.number,
      limits: Vec::new(),
    });
    Ok(self.containers.len() - 1)
  }

  pub fn get(&self, index: usize) -> Option<&ContentLimitContainer> {
    self.containers.get(index)
  }

  pub fn len(&self) -> usize {
    self.containers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.containers.is_empty()
  }

  pub fn update_top(&mut self, pages: &dyn PageGeometry, index: usize, y: i32) -> Result<()> {
    let page = page_at(pages, y)?;
    let mut current = Some(index);
    while let Some(i) = current {
      let Some(container) = self.containers.get_mut(i) else {
        break;
      };
      if let Some(limit) = container.limit_mut(page.number) {
        limit.update_top(y);
      }
      current = container.parent;
    }
    Ok(())
  }

  pub fn update_bottom(&mut self, pages: &dyn PageGeometry, index: usize, y: i32) -> Result<()> {
    let page = page_at(pages, y)?;
    let mut current = Some(index);
    while let Some(i) = current {
      let Some(container) = self.containers.get_mut(i) else {
        break;
      };
      if let Some(limit) = container.limit_mut(page.number) {
        limit.update_bottom(y);
      }
      current = container.parent;
    }
    Ok(())
  }

  /// Widens `parent`'s limits on the pages `child` continues onto or breaks
  /// from, so the space reserved around broken content stays inside the
  /// parent's extents.
  pub fn propagate_extra_space(
    &mut self,
    pages: &dyn PageGeometry,
    parent: usize,
    child: usize,
    extra_top: i32,
    extra_bottom: i32,
  ) -> Result<()> {
    let Some(container) = self.containers.get(child) else {
      return Ok(());
    };
    let start = container.initial_page;
    let end = container.last_page();
    let limits: Vec<ContentLimit> = (start..=end)
      .map(|page| container.limit(page).copied().unwrap_or_default())
      .collect();

    for (page, limit) in (start..=end).zip(limits) {
      if page != start {
        if let Some(top) = limit.top {
          self.update_top(pages, parent, top - extra_top)?;
        }
      }
      if page != end {
        if let Some(bottom) = limit.bottom {
          self.update_bottom(pages, parent, bottom + extra_bottom)?;
        }
      }
    }
    Ok(())
  }
}

fn page_at(pages: &dyn PageGeometry, y: i32) -> Result<PageBox> {
  pages
    .page_at(y)
    .ok_or_else(|| LayoutError::MissingPage { y }.into())
}
