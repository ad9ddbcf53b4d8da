//! Table layout algorithms
//!
//! The pieces of table layout, leaves first:
//!
//! - `grid` - cell placement into effective columns
//! - `cell_metrics` - per-cell width inputs
//! - `dimensions` - the table box's horizontal model
//! - `column_distribution` - automatic column widths (CSS 2.1 Section 17.5.2.2)
//! - `fixed_layout` - fixed column widths (CSS 2.1 Section 17.5.2.1)
//! - `strategy` - choosing between them
//! - `collapse` - the collapsing border model (CSS 2.1 Section 17.6.2)
//! - `row_layout` - row heights, cell heights and vertical alignment
//! - `content_limit` - per-page content extents of paginated tables
//!
//! [`crate::layout::table`] strings them together.
//!
//! # References
//!
//! - CSS 2.1 Section 17: https://www.w3.org/TR/CSS21/tables.html

pub mod cell_metrics;
pub mod collapse;
pub mod column_distribution;
pub mod content_limit;
pub mod dimensions;
pub mod fixed_layout;
pub mod grid;
pub mod row_layout;
pub mod strategy;

pub use collapse::{
  compare_borders, BorderPrecedence, CellBorders, CollapsedBorderSide, CollapsedBorderValue,
  CollapsedBorders, Side,
};
pub use column_distribution::{AutoTableLayout, ColumnConstraints};
pub use content_limit::{ContentLimit, ContentLimitContainer, ContentLimitTree};
pub use dimensions::{TableDimensions, TableWidths};
pub use fixed_layout::FixedTableLayout;
pub use grid::{ColumnData, GridCell, GridSlot, TableGrid};
pub use strategy::{StrategyKind, TableLayoutStrategy};
