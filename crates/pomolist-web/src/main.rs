mod dom;
mod identity;
mod keys;
mod name_editor;
mod notify;
mod storage;
mod tasks;
mod theme;
mod timer;

use std::rc::Rc;

use pomolist_core::WidgetConfig;
use pomolist_core::datetime::{
  header_date,
  local_today
};

const CONFIG_ELEMENT_ID: &str =
  "pomolist-config";

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  tracing::info!("starting pomolist widget");

  let config = load_config();
  let store = storage::open_store();
  let ids = &config.elements;

  render_date(&ids.date);
  let enter_guard =
    Rc::new(keys::EnterGuard::default());

  // Listeners registered by each controller
  // own it for the rest of the page's life.
  let identity = identity::IdentityController::mount(
    ids,
    &config.identity,
    store.clone(),
    Rc::clone(&enter_guard)
  );
  let tasks = tasks::TaskListController::mount(
    ids,
    store.clone(),
    enter_guard
  );
  let timer = timer::TimerController::mount(
    ids,
    &config.timer,
    &config.labels,
    store.clone()
  );
  let theme = theme::ThemeController::mount(
    &ids.theme_toggle,
    store
  );

  tracing::info!(
    identity = identity.is_some(),
    tasks = tasks.is_some(),
    timer = timer.is_some(),
    theme = theme.is_some(),
    "widget mounted"
  );
}

fn load_config() -> WidgetConfig {
  let raw = dom::by_id(CONFIG_ELEMENT_ID)
    .and_then(|el| el.text_content());
  WidgetConfig::load_or_default(
    raw.as_deref()
  )
}

fn render_date(date_id: &str) {
  if let Some(el) = dom::by_id(date_id) {
    dom::set_text(
      &el,
      &header_date(local_today())
    );
  }
}
