//! Page geometry for paginated table layout
//!
//! Pages are stacked vertically in one continuous coordinate space: page
//! `n + 1` starts where page `n` ends. Table layout only ever asks two
//! questions, which page covers a given y, and where page `n` lies, so the
//! page model is a small trait with a uniform and a list-backed
//! implementation.

use serde::Serialize;

/// The content area of one page, in document coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PageBox {
  /// Zero-based page number
  pub number: usize,
  pub top: i32,
  /// Exclusive bottom edge; equals the next page's top
  pub bottom: i32,
}

impl PageBox {
  pub fn height(&self) -> i32 {
    self.bottom - self.top
  }

  pub fn contains(&self, y: i32) -> bool {
    y >= self.top && y < self.bottom
  }
}

/// Source of page boxes for a paginated layout
pub trait PageGeometry {
  /// The page whose content area covers `y`.
  fn page_at(&self, y: i32) -> Option<PageBox>;

  /// Page number `number`.
  fn page(&self, number: usize) -> Option<PageBox>;

  fn next_page(&self, page: &PageBox) -> Option<PageBox> {
    self.page(page.number + 1)
  }
}

/// Pages of equal height starting at `first_top`
///
/// # Examples
///
/// ```
/// use tablegrid::{PageGeometry, UniformPages};
///
/// let pages = UniformPages::new(0, 100);
/// let page = pages.page_at(250).unwrap();
/// assert_eq!((page.number, page.top, page.bottom), (2, 200, 300));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformPages {
  first_top: i32,
  page_height: i32,
}

impl UniformPages {
  /// Page heights below one are treated as one.
  pub fn new(first_top: i32, page_height: i32) -> Self {
    Self {
      first_top,
      page_height: page_height.max(1),
    }
  }
}

impl PageGeometry for UniformPages {
  fn page_at(&self, y: i32) -> Option<PageBox> {
    // Anything above the first page belongs to it.
    let offset = (y - self.first_top).max(0);
    self.page((offset / self.page_height) as usize)
  }

  fn page(&self, number: usize) -> Option<PageBox> {
    let top = i32::try_from(number)
      .ok()
      .and_then(|n| n.checked_mul(self.page_height))
      .and_then(|offset| offset.checked_add(self.first_top))?;
    Some(PageBox {
      number,
      top,
      bottom: top.checked_add(self.page_height)?,
    })
  }
}

/// Explicit page boxes; past the last one, pages of the last page's height
/// keep following.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageList {
  pages: Vec<PageBox>,
}

impl PageList {
  /// Builds contiguous pages from their heights, the first starting at
  /// `first_top`.
  pub fn from_heights(first_top: i32, heights: &[i32]) -> Self {
    let mut top = first_top;
    let pages = heights
      .iter()
      .enumerate()
      .map(|(number, &height)| {
        let page = PageBox {
          number,
          top,
          bottom: top + height.max(1),
        };
        top = page.bottom;
        page
      })
      .collect();
    Self { pages }
  }

  pub fn pages(&self) -> &[PageBox] {
    &self.pages
  }

  fn overflow_page(&self, last: &PageBox, offset: usize) -> Option<PageBox> {
    let height = last.height().max(1);
    let top = i32::try_from(offset)
      .ok()
      .and_then(|n| n.checked_mul(height))
      .and_then(|delta| last.bottom.checked_add(delta))?;
    Some(PageBox {
      number: last.number + 1 + offset,
      top,
      bottom: top.checked_add(height)?,
    })
  }
}

impl PageGeometry for PageList {
  fn page_at(&self, y: i32) -> Option<PageBox> {
    let first = self.pages.first()?;
    if y < first.top {
      return Some(*first);
    }
    if let Some(page) = self.pages.iter().find(|p| p.contains(y)) {
      return Some(*page);
    }
    let last = self.pages.last()?;
    let offset = (y - last.bottom) / last.height().max(1);
    self.overflow_page(last, offset as usize)
  }

  fn page(&self, number: usize) -> Option<PageBox> {
    if let Some(page) = self.pages.get(number) {
      return Some(*page);
    }
    let last = self.pages.last()?;
    self.overflow_page(last, number - self.pages.len())
  }
}
