//! Error types for tablegrid
//!
//! Table layout itself never fails on malformed input: ragged grids, absent
//! neighbours and negative widths all degrade to well-defined defaults. The
//! errors below cover the two places where a caller can hand the engine
//! something it cannot work with:
//! - Tree errors (stale or foreign node handles)
//! - Layout errors (missing page geometry, unusable constraints)
//!
//! All errors use the `thiserror` crate for minimal boilerplate and
//! proper error trait implementations.

use thiserror::Error;

/// Result type alias for tablegrid operations
///
/// # Examples
///
/// ```
/// use tablegrid::Result;
///
/// fn build() -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for tablegrid
///
/// Each variant wraps a more specific error type for that subsystem.
///
/// # Examples
///
/// ```
/// use tablegrid::Error;
/// use tablegrid::error::LayoutError;
///
/// fn layout() -> Result<(), Error> {
///     Err(Error::Layout(LayoutError::InvalidConstraints {
///         message: "containing width cannot be negative".to_string(),
///     }))
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
  /// Table tree construction or lookup error
  #[error("Tree error: {0}")]
  Tree(#[from] TreeError),

  /// Layout error
  #[error("Layout error: {0}")]
  Layout(#[from] LayoutError),
}

/// Errors raised while building or navigating a [`crate::tree::TableTree`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
  /// A handle refers to a node that has since been removed.
  #[error("stale {kind} handle (slot {index}, generation {generation})")]
  StaleHandle {
    kind: &'static str,
    index: u32,
    generation: u32,
  },

  /// A handle was used with a parent it does not belong to.
  #[error("{kind} does not belong to this table")]
  WrongParent { kind: &'static str },
}

/// Errors raised during table layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
  /// The page geometry returned no page for a y coordinate while paginating.
  #[error("no page box covers y={y}")]
  MissingPage { y: i32 },

  /// The caller supplied constraints the engine cannot lay out against.
  #[error("invalid constraints: {message}")]
  InvalidConstraints { message: String },
}
