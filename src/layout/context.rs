//! Per-layout state shared between the table, its rows and its cells
//!
//! Besides the containing width and the page geometry, the context carries
//! the *extra space* reservations of a paginated layout: room at the top and
//! bottom of every page that running headers, footers, table borders and
//! cell padding will occupy. Rows consult them when deciding whether they
//! still fit on the current page.

use super::config::LayoutConfig;
use super::pagination::{PageBox, PageGeometry};
use crate::error::{LayoutError, Result};
use crate::geometry::Point;

#[derive(Clone)]
pub struct LayoutContext<'a> {
  containing_width: i32,
  origin: Point,
  pages: Option<&'a dyn PageGeometry>,
  extra_space_top: i32,
  extra_space_bottom: i32,
  no_page_break: u32,
  inside_paginated_table: bool,
  config: LayoutConfig,
}

impl<'a> LayoutContext<'a> {
  /// Continuous (screen) layout.
  pub fn screen(containing_width: i32) -> Self {
    Self {
      containing_width,
      origin: Point::ZERO,
      pages: None,
      extra_space_top: 0,
      extra_space_bottom: 0,
      no_page_break: 0,
      inside_paginated_table: false,
      config: LayoutConfig::default(),
    }
  }

  /// Paged (print) layout over `pages`.
  pub fn print(containing_width: i32, pages: &'a dyn PageGeometry) -> Self {
    Self {
      pages: Some(pages),
      ..Self::screen(containing_width)
    }
  }

  /// Top-left corner of the table's margin box.
  pub fn with_origin(mut self, origin: Point) -> Self {
    self.origin = origin;
    self
  }

  pub fn with_config(mut self, config: LayoutConfig) -> Self {
    self.config = config;
    self
  }

  /// Marks the table as nested inside another paginated table; its page
  /// break analysis is then left to the outer table.
  pub fn nested_in_paginated_table(mut self) -> Self {
    self.inside_paginated_table = true;
    self
  }

  /// Space already reserved at the top and bottom of every page by
  /// enclosing boxes.
  pub fn with_extra_space(mut self, top: i32, bottom: i32) -> Self {
    self.extra_space_top = top;
    self.extra_space_bottom = bottom;
    self
  }

  pub fn containing_width(&self) -> i32 {
    self.containing_width
  }

  pub fn origin(&self) -> Point {
    self.origin
  }

  pub(crate) fn set_origin(&mut self, origin: Point) {
    self.origin = origin;
  }

  pub fn config(&self) -> &LayoutConfig {
    &self.config
  }

  pub fn is_print(&self) -> bool {
    self.pages.is_some()
  }

  pub fn is_inside_paginated_table(&self) -> bool {
    self.inside_paginated_table
  }

  /// Page breaks may move content only in print mode and outside of
  /// no-break regions.
  pub fn is_page_breaks_allowed(&self) -> bool {
    self.is_print() && self.no_page_break == 0
  }

  pub fn pages(&self) -> Option<&'a dyn PageGeometry> {
    self.pages
  }

  pub fn page_at(&self, y: i32) -> Option<PageBox> {
    self.pages.and_then(|pages| pages.page_at(y))
  }

  /// Like [`Self::page_at`] but treats a missing page as an error.
  pub fn require_page_at(&self, y: i32) -> Result<PageBox> {
    self
      .page_at(y)
      .ok_or_else(|| LayoutError::MissingPage { y }.into())
  }

  pub fn page(&self, number: usize) -> Option<PageBox> {
    self.pages.and_then(|pages| pages.page(number))
  }

  pub fn extra_space_top(&self) -> i32 {
    self.extra_space_top
  }

  pub fn extra_space_bottom(&self) -> i32 {
    self.extra_space_bottom
  }

  pub(crate) fn set_extra_space_top(&mut self, value: i32) {
    self.extra_space_top = value;
  }

  pub(crate) fn set_extra_space_bottom(&mut self, value: i32) {
    self.extra_space_bottom = value;
  }

  pub(crate) fn enter_no_page_break(&mut self) {
    self.no_page_break += 1;
  }

  pub(crate) fn leave_no_page_break(&mut self) {
    self.no_page_break = self.no_page_break.saturating_sub(1);
  }
}

impl std::fmt::Debug for LayoutContext<'_> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("LayoutContext")
      .field("containing_width", &self.containing_width)
      .field("origin", &self.origin)
      .field("print", &self.is_print())
      .field("extra_space_top", &self.extra_space_top)
      .field("extra_space_bottom", &self.extra_space_bottom)
      .field("no_page_break", &self.no_page_break)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::layout::pagination::UniformPages;

  #[test]
  fn breaks_need_print_mode() {
    let screen = LayoutContext::screen(100);
    assert!(!screen.is_page_breaks_allowed());
    assert!(screen.page_at(0).is_none());
    assert!(screen.require_page_at(5).is_err());

    let pages = UniformPages::new(0, 100);
    let mut print = LayoutContext::print(100, &pages);
    assert!(print.is_page_breaks_allowed());
    print.enter_no_page_break();
    assert!(!print.is_page_breaks_allowed());
    print.leave_no_page_break();
    assert!(print.is_page_breaks_allowed());
  }
}
