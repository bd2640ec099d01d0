use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::storage::{KeyValueStore, TODO_KEY, read_logged, write_logged};

pub const CHECK_ICON: &str = "fa-check-circle";
pub const UNCHECK_ICON: &str = "fa-circle";

/// Marker attribute placed on the row icons.
pub const ROLE_ATTRIBUTE: &str = "data";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: u32,
    #[serde(rename = "nombre")]
    pub text: String,
    #[serde(rename = "realizado")]
    pub done: bool,
    #[serde(rename = "eliminado")]
    pub deleted: bool,
}

impl Task {
    pub fn new(id: u32, text: String) -> Self {
        Self {
            id,
            text,
            done: false,
            deleted: false,
        }
    }

    pub fn icon_class(&self) -> &'static str {
        if self.done { CHECK_ICON } else { UNCHECK_ICON }
    }

    pub fn text_class(&self) -> &'static str {
        if self.done { "text line-through" } else { "text" }
    }
}

/// What a click on a row icon asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    ToggleComplete,
    Delete,
}

impl RowAction {
    pub fn marker(self) -> &'static str {
        match self {
            RowAction::ToggleComplete => "realizado",
            RowAction::Delete => "eliminado",
        }
    }

    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "realizado" => Some(RowAction::ToggleComplete),
            "eliminado" => Some(RowAction::Delete),
            _ => None,
        }
    }
}

/// Ordered task collection mirrored into the `TODO` key after every
/// mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
    next_id: u32,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the persisted collection. Unreadable or malformed data yields
    /// an empty list.
    #[tracing::instrument(skip(store))]
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(raw) = read_logged(store, TODO_KEY) else {
            debug!("no persisted tasks; starting empty");
            return Self::new();
        };

        match Self::from_json(&raw) {
            Ok(list) => {
                info!(
                    count = list.tasks.len(),
                    next_id = list.next_id,
                    "loaded persisted tasks"
                );
                list
            }
            Err(error) => {
                warn!(
                    error = %format!("{error:#}"),
                    "persisted tasks are malformed; starting empty"
                );
                Self::new()
            }
        }
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let tasks: Vec<Task> =
            serde_json::from_str(raw).context("failed parsing persisted task list")?;
        Ok(Self::from_tasks(tasks))
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let len = u32::try_from(tasks.len()).unwrap_or(u32::MAX);
        let past_max = tasks
            .iter()
            .map(|t| t.id.saturating_add(1))
            .max()
            .unwrap_or(0);
        Self {
            tasks,
            next_id: len.max(past_max),
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string(&self.tasks).context("failed serializing task list")
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    pub fn get(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Entries that should be on screen, in stored order.
    pub fn visible(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !t.deleted)
    }

    /// Appends a task. The empty string is rejected; anything else is kept
    /// verbatim.
    #[tracing::instrument(skip(self, store, text), fields(next_id = self.next_id))]
    pub fn add(&mut self, store: &dyn KeyValueStore, text: &str) -> Option<Task> {
        if text.is_empty() {
            debug!("ignoring empty task text");
            return None;
        }

        let task = Task::new(self.next_id, text.to_string());
        self.tasks.push(task.clone());
        self.next_id = self.next_id.saturating_add(1);
        self.persist(store);
        info!(id = task.id, "added task");
        Some(task)
    }

    /// Flips the completion flag. Returns the new flag, or `None` for an
    /// unknown id.
    #[tracing::instrument(skip(self, store))]
    pub fn toggle_complete(&mut self, store: &dyn KeyValueStore, id: u32) -> Option<bool> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!("toggle for unknown task id");
            return None;
        };
        task.done = !task.done;
        let done = task.done;
        self.persist(store);
        debug!(done, "toggled task");
        Some(done)
    }

    /// Soft-deletes an entry; it stays in the collection so ids of later
    /// rows never shift.
    #[tracing::instrument(skip(self, store))]
    pub fn delete(&mut self, store: &dyn KeyValueStore, id: u32) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!("delete for unknown task id");
            return false;
        };
        task.deleted = true;
        self.persist(store);
        info!("deleted task");
        true
    }

    pub fn apply(
        &mut self,
        store: &dyn KeyValueStore,
        action: RowAction,
        id: u32,
    ) -> bool {
        match action {
            RowAction::ToggleComplete => self.toggle_complete(store, id).is_some(),
            RowAction::Delete => self.delete(store, id),
        }
    }

    fn persist(&self, store: &dyn KeyValueStore) -> bool {
        match self.to_json() {
            Ok(json) => write_logged(store, TODO_KEY, &json),
            Err(error) => {
                tracing::error!(
                    error = %format!("{error:#}"),
                    "task list not persisted"
                );
                false
            }
        }
    }
}
