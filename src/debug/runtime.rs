//! `TABLEGRID_*` environment switches.
//!
//! The environment is read once per process; [`LayoutConfig::from_env`]
//! turns the snapshot into a configuration. Tests and embedders build a
//! [`RuntimeToggles`] from their own pairs and go through
//! [`LayoutConfig::from_toggles`] instead.
//!
//! [`LayoutConfig::from_env`]: crate::layout::config::LayoutConfig::from_env
//! [`LayoutConfig::from_toggles`]: crate::layout::config::LayoutConfig::from_toggles

use rustc_hash::FxHashMap;
use std::sync::OnceLock;

/// A switch the layout code understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
  LogColumns,
  LogBorders,
  LogRows,
  PageClearPasses,
}

impl Toggle {
  pub const ALL: [Toggle; 4] = [
    Toggle::LogColumns,
    Toggle::LogBorders,
    Toggle::LogRows,
    Toggle::PageClearPasses,
  ];

  /// Environment variable name.
  pub fn key(self) -> &'static str {
    match self {
      Toggle::LogColumns => "TABLEGRID_LOG_COLUMNS",
      Toggle::LogBorders => "TABLEGRID_LOG_BORDERS",
      Toggle::LogRows => "TABLEGRID_LOG_ROWS",
      Toggle::PageClearPasses => "TABLEGRID_PAGE_CLEAR_PASSES",
    }
  }

  pub fn from_key(key: &str) -> Option<Toggle> {
    Self::ALL.into_iter().find(|t| t.key() == key)
  }
}

/// Raw values of the switches that were set. Unknown `TABLEGRID_*` names
/// are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeToggles {
  values: FxHashMap<Toggle, String>,
}

impl RuntimeToggles {
  pub fn from_env() -> Self {
    Self::from_pairs(std::env::vars())
  }

  /// Builds a set from `(name, value)` pairs named like the environment.
  pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
  where
    K: AsRef<str>,
    V: Into<String>,
  {
    let values = pairs
      .into_iter()
      .filter_map(|(k, v)| Toggle::from_key(k.as_ref()).map(|t| (t, v.into())))
      .collect();
    Self { values }
  }

  pub fn get(&self, toggle: Toggle) -> Option<&str> {
    self.values.get(&toggle).map(String::as_str)
  }

  /// Set and not spelled `0`, `false` or `off`.
  pub fn enabled(&self, toggle: Toggle) -> bool {
    self.get(toggle).is_some_and(|v| {
      let v = v.trim();
      !(v == "0" || v.eq_ignore_ascii_case("false") || v.eq_ignore_ascii_case("off"))
    })
  }

  /// Parsed count, or `default` when unset or not a number.
  pub fn count(&self, toggle: Toggle, default: usize) -> usize {
    self
      .get(toggle)
      .and_then(|v| v.trim().parse().ok())
      .unwrap_or(default)
  }
}

static PROCESS_TOGGLES: OnceLock<RuntimeToggles> = OnceLock::new();

/// The environment snapshot taken on first use.
pub fn runtime_toggles() -> &'static RuntimeToggles {
  PROCESS_TOGGLES.get_or_init(RuntimeToggles::from_env)
}
