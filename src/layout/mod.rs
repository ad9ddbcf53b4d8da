//! Layout algorithms
//!
//! Table layout turns a [`crate::tree::TableTree`] into a
//! [`crate::tree::TableGeometry`].
//!
//! # Module Organization
//!
//! - `config.rs` - diagnostics and pagination knobs
//! - `context.rs` - per-layout state (containing width, pages, reserved space)
//! - `pagination.rs` - page geometry
//! - `formatting_context.rs` - the cell content seam
//! - `contexts/table/` - the table algorithms
//! - `table.rs` - the table aggregate and the layout driver
//!
//! # Example
//!
//! ```
//! use tablegrid::{LayoutConfig, LayoutContext, UniformPages};
//!
//! let pages = UniformPages::new(0, 1000);
//! let ctx = LayoutContext::print(600, &pages).with_config(LayoutConfig::default());
//! assert!(ctx.is_page_breaks_allowed());
//! ```

pub mod config;
pub mod context;
pub mod contexts;
pub mod formatting_context;
pub mod pagination;
pub mod table;

pub use config::LayoutConfig;
pub use context::LayoutContext;
pub use formatting_context::{
  CellContentLayout, ContentExtent, ContentMetrics, ContentRequest, IntrinsicWidths,
  StaticCellContent, StaticContent,
};
pub use pagination::{PageBox, PageGeometry, PageList, UniformPages};
pub use table::{Table, TableFormattingContext};
