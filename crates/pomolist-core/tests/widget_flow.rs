use chrono::NaiveDate;
use pomolist_core::config::{Labels, TimerConfig};
use pomolist_core::storage::{COUNT_KEY, DATE_KEY, TODO_KEY, WORK_TIME_KEY};
use pomolist_core::task::{CHECK_ICON, UNCHECK_ICON};
use pomolist_core::{MemoryStore, Phase, PomodoroTimer, RowAction, Task, TaskList, TickOutcome};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).expect("valid date")
}

fn persisted(store: &MemoryStore) -> Vec<Task> {
    let raw = store.raw(TODO_KEY).expect("tasks persisted");
    serde_json::from_str(&raw).expect("persisted tasks parse")
}

#[test]
fn add_toggle_delete_scenario() {
    init_tracing();
    let store = MemoryStore::new();
    let mut list = TaskList::load(&store);

    let task = list.add(&store, "Buy milk").expect("task added");
    assert_eq!(task.icon_class(), UNCHECK_ICON);
    assert_eq!(
        store.raw(TODO_KEY).as_deref(),
        Some(r#"[{"id":0,"nombre":"Buy milk","realizado":false,"eliminado":false}]"#)
    );

    assert_eq!(list.toggle_complete(&store, 0), Some(true));
    let toggled = list.get(0).expect("task 0");
    assert_eq!(toggled.icon_class(), CHECK_ICON);
    assert_eq!(toggled.text_class(), "text line-through");
    assert!(persisted(&store)[0].done);

    assert!(list.delete(&store, 0));
    assert_eq!(list.visible().count(), 0);
    let after = persisted(&store);
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].id, 0);
    assert!(after[0].deleted);
}

#[test]
fn reload_restores_visible_rows_and_next_id() {
    let store = MemoryStore::new();
    let mut list = TaskList::load(&store);
    for text in ["a", "b", "c"] {
        list.add(&store, text);
    }
    list.delete(&store, 1);
    list.toggle_complete(&store, 2);

    let reloaded = TaskList::load(&store);
    assert_eq!(reloaded, list);
    assert_eq!(reloaded.next_id(), 3);
    let visible: Vec<(u32, bool)> = reloaded.visible().map(|t| (t.id, t.done)).collect();
    assert_eq!(visible, vec![(0, false), (2, true)]);
}

#[test]
fn mutations_keep_storage_in_sync_and_ids_stable() {
    let store = MemoryStore::new();
    let mut list = TaskList::new();
    let mut seen_ids = Vec::new();

    // Small deterministic LCG so the sequence mixes all three operations.
    let mut seed: u32 = 0x2545_f491;
    for step in 0..200 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let len = list.tasks().len() as u32;
        match seed % 3 {
            0 => {
                let task = list
                    .add(&store, &format!("task {step}"))
                    .expect("non-empty text");
                assert!(!seen_ids.contains(&task.id), "id reused");
                seen_ids.push(task.id);
            }
            1 if len > 0 => {
                let id = (seed >> 8) % len;
                list.apply(&store, RowAction::ToggleComplete, id);
            }
            _ if len > 0 => {
                let id = (seed >> 8) % len;
                let before: Vec<u32> = list.tasks().iter().map(|t| t.id).collect();
                list.apply(&store, RowAction::Delete, id);
                let after: Vec<u32> = list.tasks().iter().map(|t| t.id).collect();
                assert_eq!(before, after);
            }
            _ => {}
        }

        if store.raw(TODO_KEY).is_none() {
            continue;
        }
        let stored = persisted(&store);
        assert_eq!(stored.as_slice(), list.tasks());
        let stored_view: Vec<(u32, bool)> = stored
            .iter()
            .filter(|t| !t.deleted)
            .map(|t| (t.id, t.done))
            .collect();
        let shown: Vec<(u32, bool)> = list.visible().map(|t| (t.id, t.done)).collect();
        assert_eq!(stored_view, shown);
    }
}

#[test]
fn work_session_rolls_into_auto_started_break() {
    init_tracing();
    let store = MemoryStore::new();
    let config = TimerConfig::default();
    let mut timer = PomodoroTimer::load(&store, &config, day(18));
    let ceiling = timer.work_seconds().max(timer.break_seconds());

    assert!(timer.start());
    let mut completions = 0;
    for _ in 0..1500 {
        let outcome = timer.tick(&store, day(18));
        assert!(timer.remaining_seconds() <= ceiling);
        if outcome == TickOutcome::WorkCompleted {
            completions += 1;
        }
    }

    assert_eq!(completions, 1);
    assert_eq!(timer.phase(), Phase::Break);
    assert_eq!(timer.completed_today(), 1);
    assert_eq!(timer.remaining_seconds(), 300);
    assert!(!timer.is_running());
    assert!(timer.auto_start_pending());
    assert_eq!(store.raw(COUNT_KEY).as_deref(), Some("1"));

    assert!(timer.resume_pending_break());
    assert!(timer.is_running());
}

#[test]
fn break_completion_waits_for_the_user() {
    let store = MemoryStore::new();
    let config = TimerConfig {
        default_work_minutes: 1,
        default_break_minutes: 1,
        ..TimerConfig::default()
    };
    let mut timer = PomodoroTimer::load(&store, &config, day(18));
    timer.start();
    for _ in 0..60 {
        timer.tick(&store, day(18));
    }
    assert!(timer.resume_pending_break());

    let mut last = TickOutcome::Idle;
    for _ in 0..60 {
        last = timer.tick(&store, day(18));
    }
    assert_eq!(last, TickOutcome::BreakCompleted);
    assert_eq!(timer.phase(), Phase::Working);
    assert_eq!(timer.remaining_seconds(), 60);
    assert!(!timer.is_running());
    assert!(!timer.auto_start_pending());
    assert_eq!(timer.completed_today(), 1);

    let notice = timer
        .notice_for(last, &Labels::default())
        .expect("break notice");
    assert_eq!(notice.title, "Break over");
}

#[test]
fn pause_or_reset_cancels_pending_auto_start() {
    let store = MemoryStore::new();
    let config = TimerConfig {
        default_work_minutes: 1,
        ..TimerConfig::default()
    };

    let mut paused = PomodoroTimer::load(&store, &config, day(18));
    paused.start();
    for _ in 0..60 {
        paused.tick(&store, day(18));
    }
    assert!(paused.pause());
    assert!(!paused.resume_pending_break());
    assert!(!paused.is_running());
    assert_eq!(paused.phase(), Phase::Break);

    let mut reset = PomodoroTimer::load(&store, &config, day(18));
    reset.start();
    for _ in 0..60 {
        reset.tick(&store, day(18));
    }
    reset.reset();
    assert!(!reset.resume_pending_break());
    assert_eq!(reset.phase(), Phase::Working);
    assert_eq!(reset.remaining_seconds(), 60);
    assert_eq!(reset.completed_today(), 2);
}

#[test]
fn daily_counter_survives_reload_and_resets_next_day() {
    let store = MemoryStore::new();
    let config = TimerConfig {
        default_work_minutes: 1,
        ..TimerConfig::default()
    };

    let mut timer = PomodoroTimer::load(&store, &config, day(18));
    for _ in 0..2 {
        timer.start();
        for _ in 0..60 {
            timer.tick(&store, day(18));
        }
        timer.reset();
    }
    assert_eq!(timer.completed_today(), 2);

    let same_day = PomodoroTimer::load(&store, &config, day(18));
    assert_eq!(same_day.completed_today(), 2);
    assert_eq!(same_day.work_seconds(), 60);

    let next_day = PomodoroTimer::load(&store, &config, day(19));
    assert_eq!(next_day.completed_today(), 0);
    assert_eq!(store.raw(COUNT_KEY).as_deref(), Some("0"));
    assert_eq!(store.raw(DATE_KEY).as_deref(), Some("Mon Oct 19 2026"));
}

#[test]
fn counter_rolls_over_when_the_page_stays_open_overnight() {
    let store = MemoryStore::new();
    let config = TimerConfig {
        default_work_minutes: 1,
        ..TimerConfig::default()
    };
    let mut timer = PomodoroTimer::load(&store, &config, day(18));
    timer.start();
    for _ in 0..60 {
        timer.tick(&store, day(18));
    }
    timer.reset();
    assert_eq!(timer.completed_today(), 1);

    timer.start();
    for _ in 0..60 {
        timer.tick(&store, day(19));
    }
    assert_eq!(timer.completed_today(), 1);
    assert_eq!(timer.count_date(), "Mon Oct 19 2026");
}

#[test]
fn apply_settings_bounds() {
    let store = MemoryStore::new();
    let config = TimerConfig::default();
    let mut timer = PomodoroTimer::load(&store, &config, day(18));

    timer.apply_settings(&store, Some(40), None, day(18));
    assert_eq!(timer.work_seconds(), 2400);

    timer.apply_settings(&store, Some(0), None, day(18));
    assert_eq!(timer.work_seconds(), 2400);

    timer.apply_settings(&store, Some(61), None, day(18));
    assert_eq!(timer.work_seconds(), 2400);

    timer.apply_settings(&store, Some(25), None, day(18));
    assert_eq!(timer.work_seconds(), 1500);
    assert_eq!(store.raw(WORK_TIME_KEY).as_deref(), Some("1500"));
}

#[test]
fn storage_failures_never_block_the_timer() {
    let store = MemoryStore::read_only();
    let config = TimerConfig {
        default_work_minutes: 1,
        ..TimerConfig::default()
    };
    let mut timer = PomodoroTimer::load(&store, &config, day(18));
    timer.start();
    let mut last = TickOutcome::Idle;
    for _ in 0..60 {
        last = timer.tick(&store, day(18));
    }
    assert_eq!(last, TickOutcome::WorkCompleted);
    assert_eq!(timer.completed_today(), 1);
    assert!(store.is_empty());
}
