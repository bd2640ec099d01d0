use std::rc::Rc;

use anyhow::{
  Context,
  anyhow
};
use pomolist_core::{
  KeyValueStore,
  MemoryStore
};

use crate::dom::js_error;

pub type SharedStore = Rc<dyn KeyValueStore>;

/// `window.localStorage` behind the core
/// storage trait.
pub struct BrowserStorage {
  inner: web_sys::Storage
}

impl BrowserStorage {
  pub fn open() -> anyhow::Result<Self> {
    let window = web_sys::window()
      .ok_or_else(|| anyhow!("no window"))?;
    let inner = window
      .local_storage()
      .map_err(js_error)
      .context("localStorage access denied")?
      .ok_or_else(|| {
        anyhow!("localStorage unavailable")
      })?;
    Ok(Self { inner })
  }
}

impl KeyValueStore for BrowserStorage {
  fn get(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    self
      .inner
      .get_item(key)
      .map_err(js_error)
      .with_context(|| {
        format!("failed reading {key}")
      })
  }

  fn set(
    &self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    self
      .inner
      .set_item(key, value)
      .map_err(js_error)
      .with_context(|| {
        format!("failed writing {key}")
      })
  }
}

/// Browser storage, or a per-page memory
/// store when the browser refuses access.
pub fn open_store() -> SharedStore {
  match BrowserStorage::open() {
    | Ok(storage) => Rc::new(storage),
    | Err(error) => {
      tracing::error!(
        error = %format!("{error:#}"),
        "local storage unavailable; state \
         will not survive a reload"
      );
      Rc::new(MemoryStore::new())
    }
  }
}
