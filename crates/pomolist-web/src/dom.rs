use anyhow::anyhow;
use wasm_bindgen::{
  JsCast,
  JsValue
};
use web_sys::{
  Document,
  Element,
  HtmlElement
};

pub fn js_error(value: JsValue) -> anyhow::Error {
  anyhow!("{value:?}")
}

pub fn document() -> Option<Document> {
  web_sys::window()
    .and_then(|window| window.document())
}

pub fn by_id(id: &str) -> Option<Element> {
  document()
    .and_then(|document| {
      document.get_element_by_id(id)
    })
}

pub fn by_id_as<T: JsCast>(
  id: &str
) -> Option<T> {
  by_id(id)
    .and_then(|el| el.dyn_into::<T>().ok())
}

pub fn query(selector: &str) -> Option<Element> {
  document().and_then(|document| {
    document
      .query_selector(selector)
      .ok()
      .flatten()
  })
}

pub fn body() -> Option<HtmlElement> {
  document().and_then(|document| {
    document.body()
  })
}

pub fn create(
  tag: &str
) -> anyhow::Result<Element> {
  let document = document()
    .ok_or_else(|| anyhow!("no document"))?;
  document
    .create_element(tag)
    .map_err(js_error)
}

pub fn set_text(el: &Element, text: &str) {
  el.set_text_content(Some(text));
}

/// Swaps one class for another, leaving the
/// rest of the element's classes alone.
pub fn swap_class(
  el: &Element,
  remove: &[&str],
  add: &str
) {
  let classes = el.class_list();
  for class in remove {
    if let Err(error) = classes.remove_1(class)
    {
      tracing::debug!(
        error = ?error,
        class,
        "failed removing class"
      );
    }
  }
  if let Err(error) = classes.add_1(add) {
    tracing::debug!(
      error = ?error,
      class = add,
      "failed adding class"
    );
  }
}

pub fn set_class(
  el: &Element,
  class: &str,
  on: bool
) {
  if let Err(error) = el
    .class_list()
    .toggle_with_force(class, on)
  {
    tracing::debug!(
      error = ?error,
      class,
      "failed toggling class"
    );
  }
}
