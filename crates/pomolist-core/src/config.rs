use anyhow::Context;
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  warn
};

/// Widget configuration, read from an
/// optional JSON blob on the host page.
/// Every field falls back to its default.
#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct WidgetConfig {
  pub timer:    TimerConfig,
  pub identity: IdentityConfig,
  pub labels:   Labels,
  pub elements: ElementIds
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct TimerConfig {
  pub default_work_minutes:  u32,
  pub default_break_minutes: u32,
  pub max_work_minutes:      u32,
  pub max_break_minutes:     u32,
  pub auto_start_delay_ms:   u32,
  pub feedback_ms:           u32
}

impl Default for TimerConfig {
  fn default() -> Self {
    Self {
      default_work_minutes:  25,
      default_break_minutes: 5,
      max_work_minutes:      60,
      max_break_minutes:     30,
      auto_start_delay_ms:   500,
      feedback_ms:           1_500
    }
  }
}

impl TimerConfig {
  pub fn default_work_seconds(&self) -> u32 {
    self.default_work_minutes * 60
  }

  pub fn default_break_seconds(
    &self
  ) -> u32 {
    self.default_break_minutes * 60
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct IdentityConfig {
  pub default_name:  String,
  pub greeting:      String,
  pub first_prompt:  String,
  pub edit_prompt:   String,
  pub edit_tooltip:  String
}

impl Default for IdentityConfig {
  fn default() -> Self {
    Self {
      default_name: "Guest".to_string(),
      greeting:     "Hello".to_string(),
      first_prompt: "What's your name?"
        .to_string(),
      edit_prompt:  "Enter your name:"
        .to_string(),
      edit_tooltip: "Click to change your \
                     name"
        .to_string()
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct Labels {
  pub work_phase:          String,
  pub break_phase:         String,
  pub applied:             String,
  pub work_done_title:     String,
  pub work_done_body:      String,
  pub break_done_title:    String,
  pub break_done_body:     String,
  pub notification_icon:   Option<String>
}

impl Default for Labels {
  fn default() -> Self {
    Self {
      work_phase:        "Work Time"
        .to_string(),
      break_phase:       "Break Time"
        .to_string(),
      applied:           "✓ Applied"
        .to_string(),
      work_done_title:   "Pomodoro complete!"
        .to_string(),
      work_done_body:    "Take a {minutes} \
                          minute break"
        .to_string(),
      break_done_title:  "Break over"
        .to_string(),
      break_done_body:   "Time to get back \
                          to work!"
        .to_string(),
      notification_icon: None
    }
  }
}

/// Identifiers of the host-page elements
/// each controller binds to.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct ElementIds {
  pub username:         String,
  pub greeting_heading: String,
  pub date:             String,
  pub task_input:       String,
  pub add_button:       String,
  pub task_list:        String,
  pub timer_display:    String,
  pub session_label:    String,
  pub start_button:     String,
  pub pause_button:     String,
  pub reset_button:     String,
  pub pomodoro_count:   String,
  pub work_input:       String,
  pub break_input:      String,
  pub apply_button:     String,
  pub theme_toggle:     String
}

impl Default for ElementIds {
  fn default() -> Self {
    Self {
      username:         "username".into(),
      greeting_heading: ".perfil h1".into(),
      date:             "fecha".into(),
      task_input:       "input".into(),
      add_button:       "enter".into(),
      task_list:        "lista".into(),
      timer_display:    "timer".into(),
      session_label:    "session-label"
        .into(),
      start_button:     "start-btn".into(),
      pause_button:     "pause-btn".into(),
      reset_button:     "reset-btn".into(),
      pomodoro_count:   "pomodoro-count"
        .into(),
      work_input:       "work-time".into(),
      break_input:      "break-time".into(),
      apply_button:     "apply-settings"
        .into(),
      theme_toggle:     "theme-toggle".into()
    }
  }
}

impl WidgetConfig {
  #[tracing::instrument(skip(raw))]
  pub fn from_json(
    raw: &str
  ) -> anyhow::Result<Self> {
    let mut cfg: Self =
      serde_json::from_str(raw).context(
        "failed parsing widget config"
      )?;
    cfg.sanitize();
    debug!(?cfg, "loaded widget config");
    Ok(cfg)
  }

  /// Loads from an optional blob, falling
  /// back to defaults on absence or error.
  pub fn load_or_default(
    raw: Option<&str>
  ) -> Self {
    match raw
      .map(str::trim)
      .filter(|raw| !raw.is_empty())
    {
      | None => Self::default(),
      | Some(raw) => {
        match Self::from_json(raw) {
          | Ok(cfg) => cfg,
          | Err(error) => {
            tracing::error!(
              error = %format!("{error:#}"),
              "invalid widget config; \
               using defaults"
            );
            Self::default()
          }
        }
      }
    }
  }

  fn sanitize(&mut self) {
    let defaults = TimerConfig::default();
    let timer = &mut self.timer;

    if timer.max_work_minutes == 0 {
      warn!(
        "max_work_minutes must be \
         positive; using default"
      );
      timer.max_work_minutes =
        defaults.max_work_minutes;
    }
    if timer.max_break_minutes == 0 {
      warn!(
        "max_break_minutes must be \
         positive; using default"
      );
      timer.max_break_minutes =
        defaults.max_break_minutes;
    }
    timer.max_work_minutes =
      timer.max_work_minutes.min(24 * 60);
    timer.max_break_minutes =
      timer.max_break_minutes.min(24 * 60);

    if timer.default_work_minutes == 0
      || timer.default_work_minutes
        > timer.max_work_minutes
    {
      warn!(
        minutes = timer.default_work_minutes,
        "default work minutes out of \
         range; using default"
      );
      timer.default_work_minutes = defaults
        .default_work_minutes
        .min(timer.max_work_minutes);
    }
    if timer.default_break_minutes == 0
      || timer.default_break_minutes
        > timer.max_break_minutes
    {
      warn!(
        minutes = timer.default_break_minutes,
        "default break minutes out of \
         range; using default"
      );
      timer.default_break_minutes = defaults
        .default_break_minutes
        .min(timer.max_break_minutes);
    }

    if self
      .identity
      .default_name
      .trim()
      .is_empty()
    {
      self.identity.default_name =
        IdentityConfig::default()
          .default_name;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_blob_yields_defaults() {
    assert_eq!(
      WidgetConfig::load_or_default(None),
      WidgetConfig::default()
    );
    assert_eq!(
      WidgetConfig::load_or_default(Some(
        "   "
      )),
      WidgetConfig::default()
    );
  }

  #[test]
  fn partial_blob_keeps_other_defaults() {
    let cfg = WidgetConfig::from_json(
      r#"{"timer":{"default_work_minutes":50},"elements":{"task_list":"todo"}}"#
    )
    .expect("valid config");
    assert_eq!(
      cfg.timer.default_work_minutes,
      50
    );
    assert_eq!(
      cfg.timer.default_break_minutes,
      5
    );
    assert_eq!(cfg.elements.task_list, "todo");
    assert_eq!(cfg.elements.timer_display, "timer");
  }

  #[test]
  fn malformed_blob_falls_back() {
    let cfg = WidgetConfig::load_or_default(
      Some("{not json")
    );
    assert_eq!(cfg, WidgetConfig::default());
  }

  #[test]
  fn out_of_range_defaults_are_clamped() {
    let cfg = WidgetConfig::from_json(
      r#"{"timer":{"default_work_minutes":90,"default_break_minutes":0,"max_break_minutes":3}}"#
    )
    .expect("valid config");
    assert_eq!(
      cfg.timer.default_work_minutes,
      25
    );
    assert_eq!(
      cfg.timer.default_break_minutes,
      3
    );
  }

  #[test]
  fn blank_default_name_is_restored() {
    let cfg = WidgetConfig::from_json(
      r#"{"identity":{"default_name":"  "}}"#
    )
    .expect("valid config");
    assert_eq!(
      cfg.identity.default_name,
      "Guest"
    );
  }
}
