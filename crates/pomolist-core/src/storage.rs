use std::cell::RefCell;
use std::collections::BTreeMap;

use anyhow::anyhow;
use tracing::{
  debug,
  error
};

pub const USERNAME_KEY: &str = "USERNAME";
pub const TODO_KEY: &str = "TODO";
pub const WORK_TIME_KEY: &str =
  "POMODORO_WORK_TIME";
pub const BREAK_TIME_KEY: &str =
  "POMODORO_BREAK_TIME";
pub const COUNT_KEY: &str =
  "POMODORO_COUNT";
pub const DATE_KEY: &str =
  "POMODORO_DATE";
pub const THEME_KEY: &str = "THEME_MODE";

/// String-keyed, string-valued storage
/// scoped to the page origin.
///
/// Browser `localStorage` is the production
/// implementation; it lives in the web
/// crate. Methods take `&self` because the
/// backing store is shared and mutated
/// behind the handle.
pub trait KeyValueStore {
  fn get(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>>;

  fn set(
    &self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()>;
}

/// Reads a key, logging and swallowing
/// access failures.
pub fn read_logged(
  store: &dyn KeyValueStore,
  key: &str
) -> Option<String> {
  match store.get(key) {
    | Ok(value) => value,
    | Err(error) => {
      error!(
        key,
        error = %format!("{error:#}"),
        "failed reading from storage"
      );
      None
    }
  }
}

/// Writes a key, logging failures.
/// Returns whether the write landed.
pub fn write_logged(
  store: &dyn KeyValueStore,
  key: &str,
  value: &str
) -> bool {
  match store.set(key, value) {
    | Ok(()) => {
      debug!(key, "persisted value");
      true
    }
    | Err(error) => {
      error!(
        key,
        error = %format!("{error:#}"),
        "failed writing to storage"
      );
      false
    }
  }
}

/// In-memory store used by tests and as the
/// fallback when the browser refuses to hand
/// out `localStorage`.
#[derive(Debug, Default)]
pub struct MemoryStore {
  entries:   RefCell<BTreeMap<String, String>>,
  read_only: bool
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// A store whose writes always fail, the
  /// way a full or disabled `localStorage`
  /// behaves.
  pub fn read_only() -> Self {
    Self {
      entries:   RefCell::default(),
      read_only: true
    }
  }

  pub fn with_entries<I, K, V>(
    entries: I
  ) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>
  {
    let store = Self::new();
    store.entries.borrow_mut().extend(
      entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
    );
    store
  }

  pub fn raw(
    &self,
    key: &str
  ) -> Option<String> {
    self.entries.borrow().get(key).cloned()
  }

  pub fn len(&self) -> usize {
    self.entries.borrow().len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.borrow().is_empty()
  }
}

impl KeyValueStore for MemoryStore {
  fn get(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    Ok(self.raw(key))
  }

  fn set(
    &self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    if self.read_only {
      return Err(anyhow!(
        "storage quota exceeded while \
         writing {key}"
      ));
    }
    self
      .entries
      .borrow_mut()
      .insert(key.to_string(), value.to_string());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn memory_store_round_trips_values() {
    let store = MemoryStore::new();
    assert!(write_logged(
      &store, THEME_KEY, "dark"
    ));
    assert_eq!(
      read_logged(&store, THEME_KEY)
        .as_deref(),
      Some("dark")
    );
    assert_eq!(
      read_logged(&store, TODO_KEY),
      None
    );
  }

  #[test]
  fn read_only_store_reports_failed_writes()
  {
    let store = MemoryStore::read_only();
    assert!(!write_logged(
      &store,
      USERNAME_KEY,
      "Ada"
    ));
    assert!(store.is_empty());
  }
}
