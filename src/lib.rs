//! CSS table layout
//!
//! `tablegrid` lays out CSS tables: it places cells into a grid of effective
//! columns, sizes columns with the fixed or automatic algorithm of CSS 2.1
//! Section 17.5.2, resolves collapsed borders, lays out rows with vertical
//! alignment and, for paged media, keeps rows from straddling page breaks
//! while recording what each page shows of the table.
//!
//! Cell content stays opaque: a [`CellContentLayout`] reports its intrinsic
//! widths and, for a given width, its height and first baseline.
//!
//! # Example
//!
//! ```
//! use tablegrid::{LayoutContext, StaticCellContent, StaticContent, Table};
//! use tablegrid::{CellStyle, RowStyle, SectionStyle, TableStyle, TableTree};
//!
//! let mut tree = TableTree::new(TableStyle {
//!     border_spacing_h: 2,
//!     ..TableStyle::default()
//! });
//! let body = tree.push_section(SectionStyle::default());
//! let row = tree.push_row(body, RowStyle::default()).unwrap();
//! let a = tree.push_cell(row, CellStyle::default()).unwrap();
//! let b = tree.push_cell(row, CellStyle::default()).unwrap();
//!
//! let content = StaticCellContent::new()
//!     .with_cell(a, StaticContent::new(30, 30, 12))
//!     .with_cell(b, StaticContent::new(50, 50, 12));
//! let geometry = Table::new(tree)
//!     .layout(&LayoutContext::screen(400), &content)
//!     .unwrap();
//! assert_eq!(geometry.bounds.width, 86);
//! assert_eq!(geometry.cell(b).unwrap().bounds.x, 34);
//! ```

pub mod debug;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod style;
pub mod tree;

pub use error::{Error, Result};
pub use geometry::{EdgeOffsets, Point, Rect};

pub use layout::contexts::table::{
  compare_borders, BorderPrecedence, CellBorders, CollapsedBorderSide, CollapsedBorderValue,
  ContentLimit, ContentLimitContainer, ContentLimitTree, Side, StrategyKind,
};
pub use layout::{
  CellContentLayout, ContentExtent, ContentMetrics, ContentRequest, IntrinsicWidths, LayoutConfig,
  LayoutContext, PageBox, PageGeometry, PageList, StaticCellContent, StaticContent, Table,
  TableFormattingContext, UniformPages,
};

pub use style::{
  BorderCollapse, BorderSet, BorderSide, BorderStyle, CellStyle, ColumnStyle, Length, Rgba,
  RowStyle, SectionRole, SectionStyle, TableLayout, TableStyle, VerticalAlign, MAX_WIDTH,
};
pub use tree::{
  CellGeometry, CellId, RowGeometry, RowId, SectionGeometry, SectionId, TableGeometry, TableTree,
};
