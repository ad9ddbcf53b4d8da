//! Debugging and diagnostics helpers.

pub mod runtime;

pub use runtime::{runtime_toggles, RuntimeToggles, Toggle};
