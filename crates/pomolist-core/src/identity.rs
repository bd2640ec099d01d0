use regex::RegexBuilder;
use tracing::{
  debug,
  info
};

use crate::config::IdentityConfig;
use crate::storage::{
  KeyValueStore,
  USERNAME_KEY,
  read_logged,
  write_logged
};

/// How the name editor was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameEdit {
  Cancelled,
  Submitted(String)
}

/// Display name shown in the greeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
  name:         Option<String>,
  default_name: String,
  greeting:     String
}

impl Identity {
  pub fn new(config: &IdentityConfig) -> Self {
    Self {
      name:         None,
      default_name: config.default_name.clone(),
      greeting:     config.greeting.clone()
    }
  }

  #[tracing::instrument(skip(
    store, config
  ))]
  pub fn load(
    store: &dyn KeyValueStore,
    config: &IdentityConfig
  ) -> Self {
    let mut identity = Self::new(config);
    identity.name =
      read_logged(store, USERNAME_KEY)
        .filter(|name| !name.is_empty());
    debug!(
      stored = identity.name.is_some(),
      "loaded identity"
    );
    identity
  }

  /// No usable name on record yet, so the
  /// page should ask for one.
  pub fn needs_prompt(&self) -> bool {
    self.name.is_none()
  }

  pub fn display(&self) -> String {
    display_name(
      self.name.as_deref().unwrap_or_default(),
      &self.default_name
    )
  }

  /// Value the editor opens with: the stored
  /// name, else what the page shows.
  pub fn current_for_edit(
    &self,
    shown: Option<&str>
  ) -> String {
    self
      .name
      .clone()
      .or_else(|| shown.map(str::to_string))
      .unwrap_or_default()
  }

  /// Applies an editor result. Returns the
  /// new display name, or `None` when the
  /// edit was cancelled.
  #[tracing::instrument(skip(self, store))]
  pub fn submit(
    &mut self,
    store: &dyn KeyValueStore,
    edit: NameEdit
  ) -> Option<String> {
    let NameEdit::Submitted(raw) = edit
    else {
      debug!("name edit cancelled");
      return None;
    };

    let display =
      display_name(&raw, &self.default_name);
    self.name = Some(display.clone());
    write_logged(store, USERNAME_KEY, &display);
    info!("display name updated");
    Some(display)
  }

  /// Greeting heading text with the current
  /// name after the greeting phrase.
  pub fn heading_text(
    &self,
    current_heading: &str
  ) -> String {
    compose_heading(
      current_heading,
      &self.greeting,
      &self.display()
    )
  }
}

/// Blank names fall back to the default
/// label; anything else is kept as typed.
#[must_use]
pub fn display_name(
  raw: &str,
  default_name: &str
) -> String {
  if raw.trim().is_empty() {
    default_name.to_string()
  } else {
    raw.to_string()
  }
}

/// Leading greeting phrase of a heading
/// (`"hello, "`, `"Hello: "`, ...) matched
/// case-insensitively. Headings without one
/// get `"<greeting>, "`.
#[must_use]
pub fn greeting_prefix(
  heading: &str,
  greeting: &str
) -> String {
  let fallback = format!("{greeting}, ");
  let pattern = format!(
    r"^\s*{}[,|:\s]*",
    regex::escape(greeting)
  );
  let Ok(prefix_re) =
    RegexBuilder::new(&pattern)
      .case_insensitive(true)
      .build()
  else {
    return fallback;
  };

  prefix_re
    .find(heading)
    .map(|m| m.as_str().to_string())
    .unwrap_or(fallback)
}

#[must_use]
pub fn compose_heading(
  heading: &str,
  greeting: &str,
  name: &str
) -> String {
  format!(
    "{}{name}",
    greeting_prefix(heading, greeting)
  )
}
