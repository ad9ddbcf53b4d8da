//! Table box tree and layout output
//!
//! - `arena` - generation-checked handle storage
//! - `table_tree` - sections, rows, cells and `<col>` elements as authored
//! - `fragment` - positioned geometry produced by table layout

pub mod arena;
pub mod fragment;
pub mod table_tree;

pub use arena::{Arena, Id};
pub use fragment::{CellGeometry, RowGeometry, SectionGeometry, TableGeometry};
pub use table_tree::{CellId, CellNode, RowId, RowNode, SectionId, SectionNode, TableTree};
