use pomolist_core::NameEdit;
use web_sys::{
  HtmlInputElement,
  InputEvent,
  KeyboardEvent,
  MouseEvent,
  SubmitEvent
};
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html,
  use_effect_with,
  use_node_ref,
  use_state
};

/// Class on the editor form; key handlers
/// elsewhere on the page skip events from
/// inside it.
pub const EDITOR_CLASS: &str = "name-editor";

#[derive(Properties, PartialEq)]
pub struct NameEditorProps {
  pub prompt:   String,
  pub initial:  String,
  /// Fired on every Enter key-down inside
  /// the form, before it closes.
  pub on_enter: Callback<()>,
  pub on_close: Callback<NameEdit>
}

/// Inline replacement for a blocking name
/// prompt. Save submits the typed value
/// (empty included); Cancel and Escape leave
/// the name alone.
#[function_component(NameEditor)]
pub fn name_editor(
  props: &NameEditorProps
) -> Html {
  let draft = {
    let initial = props.initial.clone();
    use_state(move || initial)
  };
  let input_ref = use_node_ref();

  // `autofocus` is ignored on nodes
  // inserted after load.
  {
    let input_ref = input_ref.clone();
    use_effect_with((), move |_| {
      if let Some(input) =
        input_ref.cast::<HtmlInputElement>()
      {
        if let Err(error) = input.focus() {
          tracing::debug!(
            error = ?error,
            "failed focusing name editor"
          );
        }
      }
      || ()
    });
  }

  let on_input = {
    let draft = draft.clone();
    Callback::from(move |e: InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      draft.set(input.value());
    })
  };

  let on_submit = {
    let draft = draft.clone();
    let on_close = props.on_close.clone();
    Callback::from(move |e: SubmitEvent| {
      e.prevent_default();
      on_close.emit(NameEdit::Submitted(
        (*draft).clone()
      ));
    })
  };

  let on_cancel = {
    let on_close = props.on_close.clone();
    Callback::from(move |_: MouseEvent| {
      on_close.emit(NameEdit::Cancelled);
    })
  };

  let on_keydown = {
    let on_close = props.on_close.clone();
    let on_enter = props.on_enter.clone();
    Callback::from(move |e: KeyboardEvent| {
      match e.key().as_str() {
        | "Escape" => {
          on_close.emit(NameEdit::Cancelled);
        }
        | "Enter" => on_enter.emit(()),
        | _ => {}
      }
    })
  };

  html! {
    <div class="name-editor-backdrop">
      <form
        class={EDITOR_CLASS}
        onsubmit={on_submit}
        onkeydown={on_keydown}
      >
        <label for="name-editor-input">
          { props.prompt.clone() }
        </label>
        <input
          id="name-editor-input"
          type="text"
          ref={input_ref}
          value={(*draft).clone()}
          oninput={on_input}
        />
        <div class="name-editor-actions">
          <button type="submit">{ "Save" }</button>
          <button type="button" onclick={on_cancel}>
            { "Cancel" }
          </button>
        </div>
      </form>
    </div>
  }
}
