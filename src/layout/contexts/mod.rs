//! Formatting contexts
//!
//! Only tables have their own context here; everything inside a cell is left
//! to a [`crate::layout::formatting_context::CellContentLayout`].

pub mod table;
