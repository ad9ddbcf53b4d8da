//! Layout configuration
//!
//! Diagnostics knobs for table layout. Defaults are quiet; the same switches
//! can be flipped from the environment through [`RuntimeToggles`].

use crate::debug::runtime::{self, RuntimeToggles, Toggle};

/// Configuration for a table layout run
///
/// # Examples
///
/// ```
/// use tablegrid::LayoutConfig;
///
/// let config = LayoutConfig::default().with_column_logging(true);
/// assert!(config.log_columns);
/// assert_eq!(config.max_page_clear_passes, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
  /// Log effective column min/max and final positions at `debug` level.
  pub log_columns: bool,

  /// Log every resolved collapsed border at `trace` level.
  pub log_borders: bool,

  /// Log row heights and baselines at `trace` level.
  pub log_rows: bool,

  /// How many times a table that asks to start on the next page is moved
  /// and laid out again.
  pub max_page_clear_passes: usize,
}

impl Default for LayoutConfig {
  fn default() -> Self {
    Self {
      log_columns: false,
      log_borders: false,
      log_rows: false,
      max_page_clear_passes: 1,
    }
  }
}

impl LayoutConfig {
  /// Reads `TABLEGRID_LOG_COLUMNS`, `TABLEGRID_LOG_BORDERS`,
  /// `TABLEGRID_LOG_ROWS` and `TABLEGRID_PAGE_CLEAR_PASSES`.
  pub fn from_toggles(toggles: &RuntimeToggles) -> Self {
    let defaults = Self::default();
    Self {
      log_columns: toggles.enabled(Toggle::LogColumns),
      log_borders: toggles.enabled(Toggle::LogBorders),
      log_rows: toggles.enabled(Toggle::LogRows),
      max_page_clear_passes: toggles
        .count(Toggle::PageClearPasses, defaults.max_page_clear_passes),
    }
  }

  /// Configuration from the process environment.
  pub fn from_env() -> Self {
    Self::from_toggles(runtime::runtime_toggles())
  }

  pub fn with_column_logging(mut self, enabled: bool) -> Self {
    self.log_columns = enabled;
    self
  }

  pub fn with_border_logging(mut self, enabled: bool) -> Self {
    self.log_borders = enabled;
    self
  }

  pub fn with_row_logging(mut self, enabled: bool) -> Self {
    self.log_rows = enabled;
    self
  }

  pub fn with_page_clear_passes(mut self, passes: usize) -> Self {
    self.max_page_clear_passes = passes;
    self
  }
}
