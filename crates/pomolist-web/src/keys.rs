use std::cell::Cell;

/// Routes the page-wide Enter key-up between
/// the task input and the name editor.
///
/// The editor closes on the Enter key-down
/// and is gone by the time the matching
/// key-up reaches the document, so the
/// key-up cannot be attributed to it by
/// target alone.
#[derive(Debug, Default)]
pub struct EnterGuard {
  claimed: Cell<bool>
}

impl EnterGuard {
  /// The editor saw an Enter key-down; its
  /// key-up is not for the task list.
  pub fn claim(&self) {
    self.claimed.set(true);
  }

  /// Whether an Enter key-up should add a
  /// task. Consumes a pending claim.
  pub fn allows_add(
    &self,
    from_editor: bool
  ) -> bool {
    let claimed = self.claimed.replace(false);
    !(claimed || from_editor)
  }
}
