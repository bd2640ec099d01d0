use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::{
  debug,
  info,
  warn
};

use crate::config::{
  Labels,
  TimerConfig
};
use crate::datetime::count_date_key;
use crate::storage::{
  BREAK_TIME_KEY,
  COUNT_KEY,
  DATE_KEY,
  KeyValueStore,
  WORK_TIME_KEY,
  read_logged,
  write_logged
};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Phase {
  Working,
  Break
}

impl Phase {
  pub fn label(
    self,
    labels: &Labels
  ) -> &str {
    match self {
      | Self::Working => &labels.work_phase,
      | Self::Break => &labels.break_phase
    }
  }
}

/// Result of one tick of the countdown.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum TickOutcome {
  /// Timer was paused; nothing changed.
  Idle,
  Counting,
  /// Work phase finished. The break is
  /// seeded and waits for the auto-start.
  WorkCompleted,
  /// Break finished. Back to a paused work
  /// phase.
  BreakCompleted
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub title: String,
  pub body:  String
}

/// Which of the submitted durations were
/// accepted by `apply_settings`.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub struct SettingsOutcome {
  pub work_applied:  bool,
  pub break_applied: bool
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomodoroTimer {
  work_seconds:       u32,
  break_seconds:      u32,
  remaining_seconds:  u32,
  phase:              Phase,
  running:            bool,
  completed_today:    u32,
  count_date:         String,
  auto_start_pending: bool,
  max_work_minutes:   u32,
  max_break_minutes:  u32
}

impl PomodoroTimer {
  pub fn new(
    config: &TimerConfig,
    today: NaiveDate
  ) -> Self {
    let work_seconds =
      config.default_work_seconds().max(1);
    Self {
      work_seconds,
      break_seconds: config
        .default_break_seconds()
        .max(1),
      remaining_seconds: work_seconds,
      phase: Phase::Working,
      running: false,
      completed_today: 0,
      count_date: count_date_key(today),
      auto_start_pending: false,
      max_work_minutes: config
        .max_work_minutes,
      max_break_minutes: config
        .max_break_minutes
    }
  }

  /// Restores durations and the daily
  /// counter. A stored date other than
  /// `today` zeroes the counter and
  /// persists the new day.
  #[tracing::instrument(skip(
    store, config
  ))]
  pub fn load(
    store: &dyn KeyValueStore,
    config: &TimerConfig,
    today: NaiveDate
  ) -> Self {
    let mut timer = Self::new(config, today);

    if let Some(seconds) =
      read_seconds(store, WORK_TIME_KEY)
    {
      timer.work_seconds = seconds;
    }
    if let Some(seconds) =
      read_seconds(store, BREAK_TIME_KEY)
    {
      timer.break_seconds = seconds;
    }

    let today_key = count_date_key(today);
    let stored_date =
      read_logged(store, DATE_KEY);
    if stored_date.as_deref()
      != Some(today_key.as_str())
    {
      info!(
        stored = ?stored_date,
        today = %today_key,
        "new day; resetting pomodoro \
         counter"
      );
      timer.completed_today = 0;
      write_logged(
        store, DATE_KEY, &today_key
      );
      write_logged(store, COUNT_KEY, "0");
    } else if let Some(raw) =
      read_logged(store, COUNT_KEY)
    {
      timer.completed_today =
        match parse_leading_int(&raw)
          .and_then(|n| u32::try_from(n).ok())
        {
          | Some(count) => count,
          | None => {
            warn!(
              raw = %raw,
              "stored pomodoro count is \
               malformed; using 0"
            );
            0
          }
        };
    }
    timer.count_date = today_key;

    timer.remaining_seconds =
      timer.work_seconds;
    debug!(
      work = timer.work_seconds,
      brk = timer.break_seconds,
      count = timer.completed_today,
      "loaded pomodoro state"
    );
    timer
  }

  pub fn work_seconds(&self) -> u32 {
    self.work_seconds
  }

  pub fn break_seconds(&self) -> u32 {
    self.break_seconds
  }

  pub fn remaining_seconds(&self) -> u32 {
    self.remaining_seconds
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn is_running(&self) -> bool {
    self.running
  }

  pub fn completed_today(&self) -> u32 {
    self.completed_today
  }

  pub fn count_date(&self) -> &str {
    &self.count_date
  }

  pub fn auto_start_pending(&self) -> bool {
    self.auto_start_pending
  }

  pub fn work_minutes(&self) -> u32 {
    self.work_seconds / 60
  }

  pub fn break_minutes(&self) -> u32 {
    self.break_seconds / 60
  }

  /// `MM:SS` for the remaining time.
  pub fn clock(&self) -> String {
    format_clock(self.remaining_seconds)
  }

  /// Paused -> Running. Returns whether the
  /// state changed.
  pub fn start(&mut self) -> bool {
    self.auto_start_pending = false;
    if self.running {
      return false;
    }
    self.running = true;
    debug!(phase = ?self.phase, "timer started");
    true
  }

  /// Running -> Paused. Also drops a
  /// pending auto-start so it cannot fire
  /// later.
  pub fn pause(&mut self) -> bool {
    let cancelled = std::mem::take(
      &mut self.auto_start_pending
    );
    if cancelled {
      debug!("cancelled pending auto-start");
    }
    if !self.running {
      return cancelled;
    }
    self.running = false;
    debug!(
      remaining = self.remaining_seconds,
      "timer paused"
    );
    true
  }

  pub fn reset(&mut self) {
    self.pause();
    self.phase = Phase::Working;
    self.remaining_seconds =
      self.work_seconds;
    debug!("timer reset");
  }

  /// Fires the auto-start scheduled by a
  /// completed work phase. Returns false if
  /// it was cancelled in the meantime.
  pub fn resume_pending_break(
    &mut self
  ) -> bool {
    if !std::mem::take(
      &mut self.auto_start_pending
    ) {
      return false;
    }
    self.start()
  }

  /// One second of countdown. The tick that
  /// brings the clock to zero completes the
  /// phase.
  pub fn tick(
    &mut self,
    store: &dyn KeyValueStore,
    today: NaiveDate
  ) -> TickOutcome {
    if !self.running {
      return TickOutcome::Idle;
    }

    self.remaining_seconds =
      self.remaining_seconds.saturating_sub(1);
    if self.remaining_seconds > 0 {
      return TickOutcome::Counting;
    }

    self.running = false;
    match self.phase {
      | Phase::Working => {
        self.roll_over(today);
        self.completed_today =
          self.completed_today.saturating_add(1);
        self.save(store);
        self.phase = Phase::Break;
        self.remaining_seconds =
          self.break_seconds;
        self.auto_start_pending = true;
        info!(
          count = self.completed_today,
          "work session complete"
        );
        TickOutcome::WorkCompleted
      }
      | Phase::Break => {
        self.phase = Phase::Working;
        self.remaining_seconds =
          self.work_seconds;
        info!("break complete");
        TickOutcome::BreakCompleted
      }
    }
  }

  /// Validates each duration on its own,
  /// keeps the accepted ones, persists and
  /// resets.
  #[tracing::instrument(skip(self, store))]
  pub fn apply_settings(
    &mut self,
    store: &dyn KeyValueStore,
    work_minutes: Option<i64>,
    break_minutes: Option<i64>,
    today: NaiveDate
  ) -> SettingsOutcome {
    let mut outcome =
      SettingsOutcome::default();

    if let Some(minutes) = work_minutes
      .filter(|m| {
        *m > 0
          && *m
            <= i64::from(
              self.max_work_minutes
            )
      })
    {
      self.work_seconds =
        minutes as u32 * 60;
      outcome.work_applied = true;
    } else {
      debug!(
        ?work_minutes,
        "work duration rejected"
      );
    }

    if let Some(minutes) = break_minutes
      .filter(|m| {
        *m > 0
          && *m
            <= i64::from(
              self.max_break_minutes
            )
      })
    {
      self.break_seconds =
        minutes as u32 * 60;
      outcome.break_applied = true;
    } else {
      debug!(
        ?break_minutes,
        "break duration rejected"
      );
    }

    self.roll_over(today);
    self.save(store);
    self.reset();
    info!(
      work = self.work_seconds,
      brk = self.break_seconds,
      "applied timer settings"
    );
    outcome
  }

  /// Writes durations, counter and date.
  pub fn save(
    &self,
    store: &dyn KeyValueStore
  ) -> bool {
    let writes = [
      (
        WORK_TIME_KEY,
        self.work_seconds.to_string()
      ),
      (
        BREAK_TIME_KEY,
        self.break_seconds.to_string()
      ),
      (
        COUNT_KEY,
        self.completed_today.to_string()
      ),
      (DATE_KEY, self.count_date.clone())
    ];
    writes.iter().fold(
      true,
      |ok, (key, value)| {
        write_logged(store, key, value) && ok
      }
    )
  }

  /// Message for a finished phase, if the
  /// outcome warrants one.
  pub fn notice_for(
    &self,
    outcome: TickOutcome,
    labels: &Labels
  ) -> Option<Notice> {
    match outcome {
      | TickOutcome::WorkCompleted => {
        Some(Notice {
          title: labels
            .work_done_title
            .clone(),
          body:  labels.work_done_body.replace(
            "{minutes}",
            &self.break_minutes().to_string()
          )
        })
      }
      | TickOutcome::BreakCompleted => {
        Some(Notice {
          title: labels
            .break_done_title
            .clone(),
          body:  labels
            .break_done_body
            .clone()
        })
      }
      | TickOutcome::Idle
      | TickOutcome::Counting => None
    }
  }

  fn roll_over(&mut self, today: NaiveDate) {
    let today_key = count_date_key(today);
    if self.count_date != today_key {
      info!(
        previous = %self.count_date,
        today = %today_key,
        "day changed while open; \
         resetting pomodoro counter"
      );
      self.completed_today = 0;
      self.count_date = today_key;
    }
  }
}

#[must_use]
pub fn format_clock(seconds: u32) -> String {
  format!(
    "{:02}:{:02}",
    seconds / 60,
    seconds % 60
  )
}

fn leading_int_re() -> Option<&'static Regex>
{
  static LEADING_INT: OnceLock<
    Option<Regex>
  > = OnceLock::new();
  LEADING_INT
    .get_or_init(|| {
      Regex::new(r"^\s*([+-]?[0-9]+)").ok()
    })
    .as_ref()
}

/// Leading integer of a form value:
/// `" 25 "` and `"25.5"` give 25, `"abc"`
/// gives `None`. Only ASCII digits count,
/// so `"2\u{ff15}"` gives 2.
#[must_use]
pub fn parse_leading_int(
  raw: &str
) -> Option<i64> {
  leading_int_re()?
    .captures(raw)?
    .get(1)?
    .as_str()
    .parse()
    .ok()
}

fn read_seconds(
  store: &dyn KeyValueStore,
  key: &str
) -> Option<u32> {
  let raw = read_logged(store, key)?;
  match parse_leading_int(&raw)
    .and_then(|n| u32::try_from(n).ok())
    .filter(|n| *n > 0)
  {
    | Some(seconds) => Some(seconds),
    | None => {
      warn!(
        key,
        raw = %raw,
        "stored duration is invalid; \
         using default"
      );
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::storage::MemoryStore;

  fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d)
      .expect("valid date")
  }

  fn timer() -> PomodoroTimer {
    PomodoroTimer::new(
      &TimerConfig::default(),
      day(18)
    )
  }

  #[test]
  fn starts_paused_in_work_phase() {
    let t = timer();
    assert_eq!(t.phase(), Phase::Working);
    assert!(!t.is_running());
    assert_eq!(t.remaining_seconds(), 1500);
    assert_eq!(t.clock(), "25:00");
  }

  #[test]
  fn clock_is_zero_padded() {
    assert_eq!(format_clock(0), "00:00");
    assert_eq!(format_clock(65), "01:05");
    assert_eq!(format_clock(3600), "60:00");
  }

  #[test]
  fn paused_tick_is_idle() {
    let store = MemoryStore::new();
    let mut t = timer();
    assert_eq!(
      t.tick(&store, day(18)),
      TickOutcome::Idle
    );
    assert_eq!(t.remaining_seconds(), 1500);
  }

  #[test]
  fn start_and_pause_are_idempotent() {
    let mut t = timer();
    assert!(t.start());
    assert!(!t.start());
    assert!(t.pause());
    assert!(!t.pause());
  }

  #[test]
  fn parses_like_a_form_integer() {
    assert_eq!(parse_leading_int("25"), Some(25));
    assert_eq!(
      parse_leading_int(" 25 "),
      Some(25)
    );
    assert_eq!(
      parse_leading_int("25.5"),
      Some(25)
    );
    assert_eq!(parse_leading_int("-3"), Some(-3));
    assert_eq!(parse_leading_int("abc"), None);
    assert_eq!(parse_leading_int(""), None);
  }

  #[test]
  fn only_ascii_digits_are_read() {
    assert_eq!(
      parse_leading_int("2\u{ff15}"),
      Some(2)
    );
    assert_eq!(
      parse_leading_int("\u{ff15}"),
      None
    );
    assert_eq!(
      parse_leading_int("\u{0663}0"),
      None
    );
  }

  #[test]
  fn settings_are_validated_independently() {
    let store = MemoryStore::new();
    let mut t = timer();
    let outcome = t.apply_settings(
      &store,
      Some(0),
      Some(10),
      day(18)
    );
    assert!(!outcome.work_applied);
    assert!(outcome.break_applied);
    assert_eq!(t.work_seconds(), 1500);
    assert_eq!(t.break_seconds(), 600);

    t.apply_settings(
      &store,
      Some(61),
      Some(31),
      day(18)
    );
    assert_eq!(t.work_seconds(), 1500);
    assert_eq!(t.break_seconds(), 600);

    t.apply_settings(
      &store,
      Some(25),
      None,
      day(18)
    );
    assert_eq!(t.work_seconds(), 1500);
    assert_eq!(
      store.raw(WORK_TIME_KEY).as_deref(),
      Some("1500")
    );
    assert_eq!(
      store.raw(BREAK_TIME_KEY).as_deref(),
      Some("600")
    );
  }

  #[test]
  fn apply_settings_resets_the_countdown() {
    let store = MemoryStore::new();
    let mut t = timer();
    t.start();
    t.tick(&store, day(18));
    t.apply_settings(
      &store,
      Some(10),
      Some(2),
      day(18)
    );
    assert!(!t.is_running());
    assert_eq!(t.phase(), Phase::Working);
    assert_eq!(t.remaining_seconds(), 600);
  }

  #[test]
  fn invalid_stored_durations_fall_back() {
    let store = MemoryStore::with_entries([
      (WORK_TIME_KEY, "zero"),
      (BREAK_TIME_KEY, "0")
    ]);
    let t = PomodoroTimer::load(
      &store,
      &TimerConfig::default(),
      day(18)
    );
    assert_eq!(t.work_seconds(), 1500);
    assert_eq!(t.break_seconds(), 300);
  }

  #[test]
  fn completion_notices_name_the_break() {
    let labels = Labels::default();
    let t = timer();
    let notice = t
      .notice_for(
        TickOutcome::WorkCompleted,
        &labels
      )
      .expect("work notice");
    assert_eq!(
      notice.body,
      "Take a 5 minute break"
    );
    assert!(
      t.notice_for(
        TickOutcome::Counting,
        &labels
      )
      .is_none()
    );
  }
}
