//! Length values as seen by table layout
//!
//! Table width distribution only distinguishes three kinds of declared
//! widths: fixed device lengths, whole percentages and `auto` ("variable" in
//! the KHTML vocabulary the algorithms below are written in). Every other CSS
//! unit has been resolved to device units before it reaches this crate.
//!
//! Reference: CSS 2.1 Section 17.5.2

use serde::Serialize;
use std::fmt;

/// The "unconstrained" width sentinel.
///
/// Max widths that depend on non-fixed columns saturate here instead of
/// overflowing; it is small enough that a sum of two sentinels still fits in
/// an `i32`.
pub const MAX_WIDTH: i64 = (i32::MAX / 2) as i64;

/// A declared width or height
///
/// # Examples
///
/// ```
/// use tablegrid::style::Length;
///
/// assert_eq!(Length::Percent(25).min_width(200), 50);
/// assert_eq!(Length::Fixed(40).min_width(200), 40);
/// assert_eq!(Length::Auto.min_width(200), 0);
/// assert!(Length::ZERO.is_variable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Length {
  /// `auto`, or any width the layout treats as unset
  #[default]
  Auto,
  /// Device units
  Fixed(i64),
  /// Whole percent of the containing width
  Percent(i64),
}

impl Length {
  /// The "variable" width every column starts with.
  pub const ZERO: Length = Length::Auto;

  pub fn is_variable(self) -> bool {
    matches!(self, Length::Auto)
  }

  pub fn is_fixed(self) -> bool {
    matches!(self, Length::Fixed(_))
  }

  pub fn is_percent(self) -> bool {
    matches!(self, Length::Percent(_))
  }

  /// Raw numeric value; `auto` reads as zero.
  pub fn value(self) -> i64 {
    match self {
      Length::Auto => 0,
      Length::Fixed(v) | Length::Percent(v) => v,
    }
  }

  /// Same unit, different value.
  pub fn with_value(self, value: i64) -> Length {
    match self {
      Length::Auto => Length::Auto,
      Length::Fixed(_) => Length::Fixed(value),
      Length::Percent(_) => Length::Percent(value),
    }
  }

  /// Resolves the length against `max_width`, truncating percentages.
  pub fn min_width(self, max_width: i64) -> i64 {
    match self {
      Length::Auto => 0,
      Length::Fixed(v) => v,
      Length::Percent(p) => max_width * p / 100,
    }
  }

  /// Resolves to a definite size, or `None` for `auto`.
  pub fn resolve(self, containing: i64) -> Option<i64> {
    match self {
      Length::Auto => None,
      other => Some(other.min_width(containing)),
    }
  }
}

impl fmt::Display for Length {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Length::Auto => write!(f, "auto"),
      Length::Fixed(v) => write!(f, "{v}px"),
      Length::Percent(p) => write!(f, "{p}%"),
    }
  }
}
