//! Core geometry types for table layout
//!
//! All values are integer device units. Table layout is specified in whole
//! pixels so that percentage truncation and the odd-pixel bias of collapsed
//! borders reproduce exactly; nothing in this crate works in fractional
//! coordinates.
//!
//! # Coordinate System
//!
//! The origin is at the top-left corner, positive X extends to the right and
//! positive Y extends downward (CSS 2.1 Section 8.3.1). Positions produced by
//! layout are absolute, so page lookups can use them directly.

use serde::Serialize;
use std::fmt;

/// A 2D point in device space
///
/// # Examples
///
/// ```
/// use tablegrid::Point;
///
/// let p = Point::new(10, 20).translate(Point::new(5, 3));
/// assert_eq!(p, Point::new(15, 23));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Point {
  pub x: i32,
  pub y: i32,
}

impl Point {
  /// The zero point at the origin (0, 0)
  pub const ZERO: Self = Self { x: 0, y: 0 };

  pub const fn new(x: i32, y: i32) -> Self {
    Self { x, y }
  }

  /// Translates this point by another point's coordinates
  pub fn translate(self, other: Point) -> Self {
    Self {
      x: self.x + other.x,
      y: self.y + other.y,
    }
  }
}

impl fmt::Display for Point {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.x, self.y)
  }
}

/// An axis-aligned rectangle
///
/// Width and height are not clamped; callers that subtract insets from a
/// rectangle may observe negative extents for degenerate boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Rect {
  pub x: i32,
  pub y: i32,
  pub width: i32,
  pub height: i32,
}

impl Rect {
  pub const ZERO: Self = Self {
    x: 0,
    y: 0,
    width: 0,
    height: 0,
  };

  pub const fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
    Self {
      x,
      y,
      width,
      height,
    }
  }

  pub fn min_x(self) -> i32 {
    self.x
  }

  pub fn max_x(self) -> i32 {
    self.x + self.width
  }

  pub fn min_y(self) -> i32 {
    self.y
  }

  pub fn max_y(self) -> i32 {
    self.y + self.height
  }

  pub fn translate(self, offset: Point) -> Rect {
    Rect {
      x: self.x + offset.x,
      y: self.y + offset.y,
      ..self
    }
  }

  /// Shrinks the rectangle by the given edge offsets.
  ///
  /// ```
  /// use tablegrid::{EdgeOffsets, Rect};
  ///
  /// let r = Rect::from_xywh(0, 0, 100, 50).inset(EdgeOffsets::new(1, 2, 3, 4));
  /// assert_eq!(r, Rect::from_xywh(4, 1, 94, 46));
  /// ```
  pub fn inset(self, edges: EdgeOffsets) -> Rect {
    Rect {
      x: self.x + edges.left,
      y: self.y + edges.top,
      width: self.width - edges.horizontal(),
      height: self.height - edges.vertical(),
    }
  }
}

impl fmt::Display for Rect {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Rect({}, {}, {}x{})",
      self.x, self.y, self.width, self.height
    )
  }
}

/// Per-side offsets (padding, margin, resolved border widths)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct EdgeOffsets {
  pub top: i32,
  pub right: i32,
  pub bottom: i32,
  pub left: i32,
}

impl EdgeOffsets {
  pub const ZERO: Self = Self::all(0);

  pub const fn all(value: i32) -> Self {
    Self {
      top: value,
      right: value,
      bottom: value,
      left: value,
    }
  }

  /// Creates offsets in CSS order: top, right, bottom, left
  pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
    Self {
      top,
      right,
      bottom,
      left,
    }
  }

  /// Sum of left and right
  pub fn horizontal(self) -> i32 {
    self.left + self.right
  }

  /// Sum of top and bottom
  pub fn vertical(self) -> i32 {
    self.top + self.bottom
  }
}

impl std::ops::Add for EdgeOffsets {
  type Output = EdgeOffsets;

  fn add(self, rhs: EdgeOffsets) -> EdgeOffsets {
    EdgeOffsets {
      top: self.top + rhs.top,
      right: self.right + rhs.right,
      bottom: self.bottom + rhs.bottom,
      left: self.left + rhs.left,
    }
  }
}

impl fmt::Display for EdgeOffsets {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "EdgeOffsets({} {} {} {})",
      self.top, self.right, self.bottom, self.left
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rect_edges() {
    let r = Rect::from_xywh(10, 20, 30, 40);
    assert_eq!(r.max_x(), 40);
    assert_eq!(r.max_y(), 60);
    assert_eq!(r.translate(Point::new(-10, 5)).min_y(), 25);
  }

  #[test]
  fn edge_sums() {
    let e = EdgeOffsets::new(1, 2, 3, 4) + EdgeOffsets::all(1);
    assert_eq!(e.horizontal(), 8);
    assert_eq!(e.vertical(), 6);
  }
}
