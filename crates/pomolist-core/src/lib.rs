//! Platform-free state behind the pomolist widget: the task list, the
//! pomodoro countdown, the greeting name and the theme flag, each persisted
//! through a [`storage::KeyValueStore`].

pub mod config;
pub mod datetime;
pub mod identity;
pub mod pomodoro;
pub mod storage;
pub mod task;
pub mod theme;

pub use config::WidgetConfig;
pub use identity::{Identity, NameEdit};
pub use pomodoro::{Phase, PomodoroTimer, TickOutcome};
pub use storage::{KeyValueStore, MemoryStore};
pub use task::{RowAction, Task, TaskList};
pub use theme::ThemeMode;
