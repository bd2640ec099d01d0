use pomolist_core::pomodoro::Notice;
use wasm_bindgen::JsValue;
use web_sys::{
  Notification,
  NotificationOptions,
  NotificationPermission
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
  Unsupported,
  Default,
  Granted,
  Denied
}

pub fn permission() -> Permission {
  let Some(window) = web_sys::window()
  else {
    return Permission::Unsupported;
  };

  let has_notification =
    js_sys::Reflect::has(
      window.as_ref(),
      &JsValue::from_str("Notification")
    )
    .unwrap_or(false);
  if !has_notification {
    return Permission::Unsupported;
  }

  match Notification::permission() {
    | NotificationPermission::Default => {
      Permission::Default
    }
    | NotificationPermission::Granted => {
      Permission::Granted
    }
    | NotificationPermission::Denied => {
      Permission::Denied
    }
    | _ => Permission::Unsupported
  }
}

/// Asks for permission when the user has not
/// decided yet. Never waits on the answer.
pub fn request_permission_if_undecided() {
  if permission() != Permission::Default {
    return;
  }

  match Notification::request_permission() {
    | Ok(promise) => {
      wasm_bindgen_futures::spawn_local(
        async move {
          match wasm_bindgen_futures::JsFuture::from(
            promise
          )
          .await
          {
            | Ok(_) => {
              tracing::info!(
                permission = ?permission(),
                "notification permission \
                 request completed"
              );
            }
            | Err(error) => {
              tracing::warn!(
                error = ?error,
                "notification permission \
                 request failed"
              );
            }
          }
        }
      );
    }
    | Err(error) => {
      tracing::warn!(
        error = ?error,
        "failed starting notification \
         permission request"
      );
    }
  }
}

/// Best-effort phase announcement.
pub fn show(
  notice: &Notice,
  icon: Option<&str>
) -> bool {
  if permission() != Permission::Granted {
    tracing::debug!(
      "skipping notification because \
       permission is not granted"
    );
    return false;
  }

  let options = NotificationOptions::new();
  options.set_body(&notice.body);
  if let Some(icon) = icon {
    options.set_icon(icon);
  }

  match Notification::new_with_options(
    &notice.title,
    &options
  ) {
    | Ok(_) => {
      tracing::info!(
        title = %notice.title,
        "emitted notification"
      );
      true
    }
    | Err(error) => {
      tracing::warn!(
        error = ?error,
        title = %notice.title,
        "failed to emit notification"
      );
      false
    }
  }
}
