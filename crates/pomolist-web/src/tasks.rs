use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use gloo::events::EventListener;
use pomolist_core::config::ElementIds;
use pomolist_core::task::{
  ROLE_ATTRIBUTE,
  RowAction,
  Task,
  TaskList
};
use wasm_bindgen::JsCast;
use web_sys::{
  Element,
  Event,
  HtmlInputElement,
  KeyboardEvent
};

use crate::dom;
use crate::keys::EnterGuard;
use crate::name_editor::EDITOR_CLASS;
use crate::storage::SharedStore;

/// Elements of one rendered row.
struct RowHandle {
  row:  Element,
  icon: Element,
  text: Element
}

pub struct TaskListController {
  list:      RefCell<TaskList>,
  rows:      RefCell<BTreeMap<u32, RowHandle>>,
  container: Element,
  input:     Option<HtmlInputElement>,
  store:     SharedStore,
  enter:     Rc<EnterGuard>
}

impl TaskListController {
  pub fn mount(
    ids: &ElementIds,
    store: SharedStore,
    enter: Rc<EnterGuard>
  ) -> Option<Rc<Self>> {
    let Some(container) =
      dom::by_id(&ids.task_list)
    else {
      tracing::info!(
        id = %ids.task_list,
        "no task list on page"
      );
      return None;
    };

    let controller = Rc::new(Self {
      list: RefCell::new(TaskList::load(
        store.as_ref()
      )),
      rows: RefCell::default(),
      container,
      input: dom::by_id_as(&ids.task_input),
      store,
      enter
    });
    controller.render_all();

    if let Some(button) =
      dom::by_id(&ids.add_button)
    {
      let this = Rc::clone(&controller);
      EventListener::new(
        &button,
        "click",
        move |_| this.add_from_input()
      )
      .forget();
    }

    if let Some(document) = dom::document() {
      let this = Rc::clone(&controller);
      EventListener::new(
        &document,
        "keyup",
        move |event| this.on_keyup(event)
      )
      .forget();
    }

    let this = Rc::clone(&controller);
    EventListener::new(
      &controller.container,
      "click",
      move |event| this.on_list_click(event)
    )
    .forget();

    tracing::info!(
      visible =
        controller.rows.borrow().len(),
      "task list controller ready"
    );
    Some(controller)
  }

  fn render_all(&self) {
    let list = self.list.borrow();
    for task in list.visible() {
      self.render_row(task);
    }
  }

  fn render_row(&self, task: &Task) {
    match build_row(task) {
      | Ok(handle) => {
        if let Err(error) = self
          .container
          .append_child(&handle.row)
        {
          tracing::error!(
            error = ?error,
            id = task.id,
            "failed attaching task row"
          );
          return;
        }
        self
          .rows
          .borrow_mut()
          .insert(task.id, handle);
      }
      | Err(error) => {
        tracing::error!(
          error = %format!("{error:#}"),
          id = task.id,
          "failed building task row"
        );
      }
    }
  }

  fn add_from_input(&self) {
    let Some(input) = &self.input else {
      return;
    };
    let text = input.value();
    let added = self
      .list
      .borrow_mut()
      .add(self.store.as_ref(), &text);
    if let Some(task) = added {
      self.render_row(&task);
      input.set_value("");
    }
  }

  fn on_keyup(&self, event: &Event) {
    let Some(event) =
      event.dyn_ref::<KeyboardEvent>()
    else {
      return;
    };
    if event.key() != "Enter" {
      return;
    }
    let in_editor = event
      .target()
      .and_then(|target| {
        target.dyn_into::<Element>().ok()
      })
      .and_then(|el| {
        el.closest(&format!(".{EDITOR_CLASS}"))
          .ok()
          .flatten()
      })
      .is_some();
    if self.enter.allows_add(in_editor) {
      self.add_from_input();
    } else {
      tracing::debug!(
        "enter belongs to the name editor"
      );
    }
  }

  fn on_list_click(&self, event: &Event) {
    let Some(target) = event
      .target()
      .and_then(|target| {
        target.dyn_into::<Element>().ok()
      })
    else {
      return;
    };
    let Some(action) = target
      .get_attribute(ROLE_ATTRIBUTE)
      .as_deref()
      .and_then(RowAction::from_marker)
    else {
      return;
    };
    let Ok(id) = target.id().parse::<u32>()
    else {
      tracing::debug!(
        raw = %target.id(),
        "row icon without numeric id"
      );
      return;
    };

    let applied = self.list.borrow_mut().apply(
      self.store.as_ref(),
      action,
      id
    );
    if !applied {
      return;
    }

    match action {
      | RowAction::ToggleComplete => {
        self.refresh_row(id);
      }
      | RowAction::Delete => {
        if let Some(handle) =
          self.rows.borrow_mut().remove(&id)
        {
          handle.row.remove();
        }
      }
    }
  }

  fn refresh_row(&self, id: u32) {
    let list = self.list.borrow();
    let rows = self.rows.borrow();
    let (Some(task), Some(handle)) =
      (list.get(id), rows.get(&id))
    else {
      return;
    };
    handle
      .icon
      .set_class_name(&icon_classes(task));
    handle
      .text
      .set_class_name(task.text_class());
  }
}

fn icon_classes(task: &Task) -> String {
  format!("far {}", task.icon_class())
}

fn build_row(
  task: &Task
) -> anyhow::Result<RowHandle> {
  let id = task.id.to_string();

  let row = dom::create("li")?;

  let icon = dom::create("i")?;
  icon.set_class_name(&icon_classes(task));
  icon
    .set_attribute(
      ROLE_ATTRIBUTE,
      RowAction::ToggleComplete.marker()
    )
    .map_err(dom::js_error)?;
  icon.set_id(&id);

  let text = dom::create("p")?;
  text.set_class_name(task.text_class());
  dom::set_text(&text, &task.text);

  let trash = dom::create("i")?;
  trash.set_class_name("fas fa-trash de");
  trash
    .set_attribute(
      ROLE_ATTRIBUTE,
      RowAction::Delete.marker()
    )
    .map_err(dom::js_error)?;
  trash.set_id(&id);

  for child in [&icon, &text, &trash] {
    row
      .append_child(child)
      .map_err(dom::js_error)?;
  }

  Ok(RowHandle { row, icon, text })
}

#[cfg(test)]
mod tests {
  use pomolist_core::Task;

  use super::icon_classes;

  #[test]
  fn icon_classes_follow_completion() {
    let mut task =
      Task::new(0, "Buy milk".to_string());
    assert_eq!(
      icon_classes(&task),
      "far fa-circle"
    );
    task.done = true;
    assert_eq!(
      icon_classes(&task),
      "far fa-check-circle"
    );
  }
}
