//! Style system types
//!
//! Resolved style inputs for tables. The cascade lives elsewhere; this module
//! only defines the shapes the table engine reads.

pub mod color;
pub mod computed;
pub mod types;
pub mod values;

pub use color::Rgba;
pub use computed::{
  BorderSet, BorderSide, CellStyle, ColumnStyle, RowStyle, SectionStyle, TableStyle,
};
pub use types::{BorderCollapse, BorderStyle, SectionRole, TableLayout, VerticalAlign};
pub use values::{Length, MAX_WIDTH};
