use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use pomolist_core::config::{
  ElementIds,
  IdentityConfig
};
use pomolist_core::{
  Identity,
  NameEdit
};
use wasm_bindgen::JsCast;
use web_sys::{
  Element,
  HtmlElement
};
use yew::AppHandle;

use crate::dom;
use crate::keys::EnterGuard;
use crate::name_editor::{
  NameEditor,
  NameEditorProps
};
use crate::storage::SharedStore;

/// Where the name is shown: a dedicated
/// element, or the tail of the greeting
/// heading.
enum NameTarget {
  Label(Element),
  Heading(Element)
}

impl NameTarget {
  fn element(&self) -> &Element {
    match self {
      | Self::Label(el) | Self::Heading(el) => {
        el
      }
    }
  }
}

struct OpenEditor {
  app:  AppHandle<NameEditor>,
  host: Element
}

pub struct IdentityController {
  identity: RefCell<Identity>,
  target:   NameTarget,
  config:   IdentityConfig,
  store:    SharedStore,
  editor:   RefCell<Option<OpenEditor>>,
  enter:    Rc<EnterGuard>
}

impl IdentityController {
  pub fn mount(
    ids: &ElementIds,
    config: &IdentityConfig,
    store: SharedStore,
    enter: Rc<EnterGuard>
  ) -> Option<Rc<Self>> {
    let target = dom::by_id(&ids.username)
      .map(NameTarget::Label)
      .or_else(|| {
        dom::query(&ids.greeting_heading)
          .map(NameTarget::Heading)
      });
    let Some(target) = target else {
      tracing::info!(
        "no name label or greeting heading \
         on page"
      );
      return None;
    };

    let controller = Rc::new(Self {
      identity: RefCell::new(Identity::load(
        store.as_ref(),
        config
      )),
      target,
      config: config.clone(),
      store,
      editor: RefCell::default(),
      enter
    });

    let clickable = controller.target.element();
    if let Some(el) =
      clickable.dyn_ref::<HtmlElement>()
    {
      el.set_title(&config.edit_tooltip);
      if let Err(error) =
        el.style().set_property("cursor", "pointer")
      {
        tracing::debug!(
          error = ?error,
          "failed setting label cursor"
        );
      }
    }

    let this = Rc::clone(&controller);
    EventListener::new(
      clickable,
      "click",
      move |_| this.open_for_edit()
    )
    .forget();

    let needs_prompt =
      controller.identity.borrow().needs_prompt();
    if needs_prompt {
      controller.open_editor(
        &controller.config.first_prompt,
        String::new()
      );
    } else {
      controller.render();
    }

    tracing::info!(
      needs_prompt,
      "identity controller ready"
    );
    Some(controller)
  }

  fn open_for_edit(self: &Rc<Self>) {
    let shown =
      self.target.element().text_content();
    let current = self
      .identity
      .borrow()
      .current_for_edit(shown.as_deref());
    self.open_editor(
      &self.config.edit_prompt,
      current
    );
  }

  fn open_editor(
    self: &Rc<Self>,
    prompt: &str,
    initial: String
  ) {
    if self.editor.borrow().is_some() {
      return;
    }
    let host = match attach_host() {
      | Ok(host) => host,
      | Err(error) => {
        tracing::error!(
          error = %format!("{error:#}"),
          "failed opening name editor"
        );
        return;
      }
    };

    let weak = Rc::downgrade(self);
    let enter = Rc::clone(&self.enter);
    let props = NameEditorProps {
      prompt: prompt.to_string(),
      initial,
      on_enter: yew::Callback::from(
        move |()| enter.claim()
      ),
      on_close: yew::Callback::from(
        move |edit: NameEdit| {
          if let Some(this) = weak.upgrade() {
            this.close_editor(edit);
          }
        }
      )
    };
    let app = yew::Renderer::<NameEditor>::with_root_and_props(
      host.clone(),
      props
    )
    .render();
    *self.editor.borrow_mut() =
      Some(OpenEditor { app, host });
  }

  fn close_editor(&self, edit: NameEdit) {
    let changed = self
      .identity
      .borrow_mut()
      .submit(self.store.as_ref(), edit)
      .is_some();
    if changed {
      self.render();
    }

    // The close arrives from inside the
    // editor's own handler; tear it down once
    // that handler has returned.
    if let Some(OpenEditor { app, host }) =
      self.editor.borrow_mut().take()
    {
      wasm_bindgen_futures::spawn_local(
        async move {
          app.destroy();
          host.remove();
        }
      );
    }
  }

  fn render(&self) {
    let identity = self.identity.borrow();
    match &self.target {
      | NameTarget::Label(el) => {
        dom::set_text(el, &identity.display());
      }
      | NameTarget::Heading(el) => {
        let current =
          el.text_content().unwrap_or_default();
        dom::set_text(
          el,
          &identity.heading_text(&current)
        );
      }
    }
  }
}

fn attach_host() -> anyhow::Result<Element> {
  let body = dom::body().ok_or_else(|| {
    anyhow::anyhow!("page has no body")
  })?;
  let host = dom::create("div")?;
  host.set_class_name("name-editor-host");
  body
    .append_child(&host)
    .map_err(dom::js_error)?;
  Ok(host)
}
