use tracing::debug;

use crate::storage::{
  KeyValueStore,
  THEME_KEY,
  read_logged,
  write_logged
};

pub const DARK_CLASS: &str = "dark-mode";

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum ThemeMode {
  #[default]
  Light,
  Dark
}

impl ThemeMode {
  pub fn storage_value(self) -> &'static str {
    match self {
      | Self::Light => "light",
      | Self::Dark => "dark"
    }
  }

  pub fn from_storage(
    value: Option<&str>
  ) -> Self {
    match value {
      | Some("dark") => Self::Dark,
      | _ => Self::Light
    }
  }

  pub fn toggled(self) -> Self {
    match self {
      | Self::Light => Self::Dark,
      | Self::Dark => Self::Light
    }
  }

  pub fn is_dark(self) -> bool {
    self == Self::Dark
  }

  /// Icon shown on the toggle: the sun while
  /// dark (click for light), the moon while
  /// light.
  pub fn icon_class(self) -> &'static str {
    match self {
      | Self::Light => "fa-moon",
      | Self::Dark => "fa-sun"
    }
  }

  pub fn load(
    store: &dyn KeyValueStore
  ) -> Self {
    let mode = Self::from_storage(
      read_logged(store, THEME_KEY)
        .as_deref()
    );
    debug!(?mode, "loaded theme mode");
    mode
  }

  pub fn save(
    self,
    store: &dyn KeyValueStore
  ) -> bool {
    write_logged(
      store,
      THEME_KEY,
      self.storage_value()
    )
  }

  /// Flips and persists; returns the new
  /// mode.
  pub fn toggle(
    &mut self,
    store: &dyn KeyValueStore
  ) -> Self {
    *self = self.toggled();
    self.save(store);
    debug!(mode = ?*self, "toggled theme");
    *self
  }
}
