use std::cell::RefCell;
use std::rc::{
  Rc,
  Weak
};

use gloo::events::EventListener;
use gloo::timers::callback::{
  Interval,
  Timeout
};
use pomolist_core::config::{
  ElementIds,
  Labels,
  TimerConfig
};
use pomolist_core::datetime::local_today;
use pomolist_core::pomodoro::parse_leading_int;
use pomolist_core::{
  PomodoroTimer,
  TickOutcome
};
use web_sys::{
  Element,
  HtmlInputElement
};

use crate::dom;
use crate::notify;
use crate::storage::SharedStore;

const TICK_MS: u32 = 1_000;

struct TimerView {
  display:     Element,
  label:       Option<Element>,
  count:       Option<Element>,
  work_input:  Option<HtmlInputElement>,
  break_input: Option<HtmlInputElement>,
  apply:       Option<Element>
}

pub struct TimerController {
  timer:       RefCell<PomodoroTimer>,
  view:        TimerView,
  config:      TimerConfig,
  labels:      Labels,
  store:       SharedStore,
  ticker:      RefCell<Option<Interval>>,
  auto_start:  RefCell<Option<Timeout>>,
  feedback:    RefCell<Option<Timeout>>,
  apply_label: Option<String>
}

impl TimerController {
  pub fn mount(
    ids: &ElementIds,
    config: &TimerConfig,
    labels: &Labels,
    store: SharedStore
  ) -> Option<Rc<Self>> {
    let (Some(display), Some(start)) = (
      dom::by_id(&ids.timer_display),
      dom::by_id(&ids.start_button)
    ) else {
      tracing::info!(
        "no timer display or start button \
         on page"
      );
      return None;
    };

    let apply = dom::by_id(&ids.apply_button);
    let apply_label = apply
      .as_ref()
      .and_then(|button| button.text_content());

    let controller = Rc::new(Self {
      timer: RefCell::new(PomodoroTimer::load(
        store.as_ref(),
        config,
        local_today()
      )),
      view: TimerView {
        display,
        label: dom::by_id(&ids.session_label),
        count: dom::by_id(&ids.pomodoro_count),
        work_input: dom::by_id_as(
          &ids.work_input
        ),
        break_input: dom::by_id_as(
          &ids.break_input
        ),
        apply
      },
      config: config.clone(),
      labels: labels.clone(),
      store,
      ticker: RefCell::default(),
      auto_start: RefCell::default(),
      feedback: RefCell::default(),
      apply_label
    });

    controller.fill_inputs();
    controller.render();

    controller.on_click(&start, Self::start);
    if let Some(button) =
      dom::by_id(&ids.pause_button)
    {
      controller.on_click(&button, Self::pause);
    }
    if let Some(button) =
      dom::by_id(&ids.reset_button)
    {
      controller.on_click(&button, Self::reset);
    }
    if let Some(apply) = &controller.view.apply {
      controller
        .on_click(apply, Self::apply_settings);
    }

    tracing::info!(
      count = controller
        .timer
        .borrow()
        .completed_today(),
      "timer controller ready"
    );
    Some(controller)
  }

  fn on_click(
    self: &Rc<Self>,
    button: &Element,
    handler: fn(&Rc<Self>)
  ) {
    let this = Rc::clone(self);
    EventListener::new(
      button,
      "click",
      move |_| handler(&this)
    )
    .forget();
  }

  fn start(self: &Rc<Self>) {
    self.auto_start.borrow_mut().take();
    if !self.timer.borrow_mut().start() {
      return;
    }
    self.spawn_ticker();
    notify::request_permission_if_undecided();
  }

  fn pause(self: &Rc<Self>) {
    self.timer.borrow_mut().pause();
    self.stop_scheduled();
  }

  fn reset(self: &Rc<Self>) {
    self.timer.borrow_mut().reset();
    self.stop_scheduled();
    self.render();
  }

  fn apply_settings(self: &Rc<Self>) {
    let work = read_minutes(
      self.view.work_input.as_ref(),
      self.config.default_work_minutes
    );
    let brk = read_minutes(
      self.view.break_input.as_ref(),
      self.config.default_break_minutes
    );

    self.timer.borrow_mut().apply_settings(
      self.store.as_ref(),
      work,
      brk,
      local_today()
    );
    self.stop_scheduled();
    self.fill_inputs();
    self.render();
    self.flash_applied();
  }

  fn spawn_ticker(self: &Rc<Self>) {
    let weak: Weak<Self> = Rc::downgrade(self);
    let interval =
      Interval::new(TICK_MS, move || {
        if let Some(this) = weak.upgrade() {
          this.on_tick();
        }
      });
    *self.ticker.borrow_mut() = Some(interval);
  }

  fn stop_scheduled(&self) {
    self.ticker.borrow_mut().take();
    self.auto_start.borrow_mut().take();
  }

  fn on_tick(self: &Rc<Self>) {
    let outcome = self
      .timer
      .borrow_mut()
      .tick(self.store.as_ref(), local_today());

    match outcome {
      | TickOutcome::Idle => {
        self.ticker.borrow_mut().take();
      }
      | TickOutcome::Counting => self.render(),
      | TickOutcome::WorkCompleted
      | TickOutcome::BreakCompleted => {
        self.ticker.borrow_mut().take();
        self.render();
        self.announce(outcome);
        if outcome
          == TickOutcome::WorkCompleted
        {
          self.schedule_auto_start();
        }
      }
    }
  }

  fn announce(&self, outcome: TickOutcome) {
    let notice = self
      .timer
      .borrow()
      .notice_for(outcome, &self.labels);
    if let Some(notice) = notice {
      notify::show(
        &notice,
        self.labels.notification_icon.as_deref()
      );
    }
  }

  fn schedule_auto_start(self: &Rc<Self>) {
    let weak = Rc::downgrade(self);
    let timeout = Timeout::new(
      self.config.auto_start_delay_ms,
      move || {
        let Some(this) = weak.upgrade() else {
          return;
        };
        let resumed = this
          .timer
          .borrow_mut()
          .resume_pending_break();
        if resumed {
          tracing::debug!(
            "auto-starting break"
          );
          this.spawn_ticker();
        }
      }
    );
    *self.auto_start.borrow_mut() = Some(timeout);
  }

  fn flash_applied(self: &Rc<Self>) {
    let Some(button) = &self.view.apply else {
      return;
    };
    dom::set_text(button, &self.labels.applied);

    let weak = Rc::downgrade(self);
    let timeout = Timeout::new(
      self.config.feedback_ms,
      move || {
        let Some(this) = weak.upgrade() else {
          return;
        };
        if let (Some(button), Some(label)) =
          (&this.view.apply, &this.apply_label)
        {
          dom::set_text(button, label);
        }
      }
    );
    // Replacing drops the previous timeout,
    // so only the latest click restores.
    *self.feedback.borrow_mut() = Some(timeout);
  }

  fn fill_inputs(&self) {
    let timer = self.timer.borrow();
    if let Some(input) = &self.view.work_input
    {
      input.set_value(
        &timer.work_minutes().to_string()
      );
    }
    if let Some(input) = &self.view.break_input
    {
      input.set_value(
        &timer.break_minutes().to_string()
      );
    }
  }

  fn render(&self) {
    let timer = self.timer.borrow();
    dom::set_text(
      &self.view.display,
      &timer.clock()
    );
    if let Some(label) = &self.view.label {
      dom::set_text(
        label,
        timer.phase().label(&self.labels)
      );
    }
    if let Some(count) = &self.view.count {
      dom::set_text(
        count,
        &timer.completed_today().to_string()
      );
    }
  }
}

/// Minutes typed into a settings input. A
/// page without the input submits the
/// default.
fn read_minutes(
  input: Option<&HtmlInputElement>,
  default_minutes: u32
) -> Option<i64> {
  match input {
    | Some(input) => {
      parse_leading_int(&input.value())
    }
    | None => Some(i64::from(default_minutes))
  }
}
