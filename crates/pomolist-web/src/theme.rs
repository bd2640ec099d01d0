use std::cell::Cell;
use std::rc::Rc;

use gloo::events::EventListener;
use pomolist_core::ThemeMode;
use pomolist_core::theme::DARK_CLASS;
use web_sys::{
  Element,
  HtmlElement
};

use crate::dom;
use crate::storage::SharedStore;

pub struct ThemeController {
  mode:  Cell<ThemeMode>,
  body:  HtmlElement,
  icon:  Option<Element>,
  store: SharedStore
}

impl ThemeController {
  pub fn mount(
    toggle_id: &str,
    store: SharedStore
  ) -> Option<Rc<Self>> {
    let Some(button) = dom::by_id(toggle_id)
    else {
      tracing::info!(
        toggle_id,
        "no theme toggle on page"
      );
      return None;
    };
    let Some(body) = dom::body() else {
      tracing::info!(
        "no body to carry the theme class"
      );
      return None;
    };
    let icon =
      button.query_selector("i").ok().flatten();

    let controller = Rc::new(Self {
      mode: Cell::new(ThemeMode::load(
        store.as_ref()
      )),
      body,
      icon,
      store
    });
    controller.apply();

    let this = Rc::clone(&controller);
    EventListener::new(
      &button,
      "click",
      move |_| this.toggle()
    )
    .forget();

    tracing::info!(
      mode = ?controller.mode.get(),
      "theme controller ready"
    );
    Some(controller)
  }

  fn toggle(&self) {
    let mut mode = self.mode.get();
    mode.toggle(self.store.as_ref());
    self.mode.set(mode);
    self.apply();
  }

  fn apply(&self) {
    let mode = self.mode.get();
    dom::set_class(
      &self.body,
      DARK_CLASS,
      mode.is_dark()
    );
    if let Some(icon) = &self.icon {
      dom::swap_class(
        icon,
        &[
          ThemeMode::Light.icon_class(),
          ThemeMode::Dark.icon_class()
        ],
        mode.icon_class()
      );
    }
  }
}
