//! The countdown itself: state, guarded transitions and the tick.
//!
//! Every mutation ends in `sync()`, which re-arms or cancels the tick and
//! refreshes the label from the new state. Nothing is cached between calls.

use strum::EnumIs;

use crate::duration::{format_minutes_and_seconds, parse_duration};
use crate::guards::{can_edit, can_pause, can_reset, can_resume, can_start, Guards};
use crate::label::SetLabel;
use crate::ticker::TickScheduler;

pub const DEFAULT_INITIAL_SECONDS: u32 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownState {
  pub initial_seconds: u32,
  pub seconds: u32,
  pub is_active: bool,
}

impl CountdownState {
  pub fn new(initial_seconds: u32) -> Self {
    Self { initial_seconds, seconds: initial_seconds, is_active: false }
  }

  pub fn phase(&self) -> Phase {
    if self.seconds == 0 {
      Phase::Expired
    } else if self.is_active {
      Phase::Running
    } else if self.seconds == self.initial_seconds {
      Phase::Unstarted
    } else {
      Phase::Paused
    }
  }

  /// The tick should be scheduled exactly while this holds.
  pub fn should_tick(&self) -> bool {
    self.is_active && self.seconds > 0
  }
}

impl Default for CountdownState {
  fn default() -> Self {
    Self::new(DEFAULT_INITIAL_SECONDS)
  }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, EnumIs)]
pub enum Phase {
  #[default]
  Unstarted,
  Running,
  Paused,
  Expired,
}

pub struct Countdown<S: TickScheduler, L: SetLabel> {
  state: CountdownState,
  default_label: String,
  last_label: Option<String>,
  scheduler: S,
  label: L,
}

impl<S: TickScheduler, L: SetLabel> Countdown<S, L> {
  pub fn new(initial_seconds: u32, default_label: &str, scheduler: S, label: L) -> Self {
    Self {
      state: CountdownState::new(initial_seconds),
      default_label: default_label.to_string(),
      last_label: None,
      scheduler,
      label,
    }
  }

  pub fn state(&self) -> &CountdownState {
    &self.state
  }

  pub fn phase(&self) -> Phase {
    self.state.phase()
  }

  pub fn guards(&self) -> Guards {
    Guards::evaluate(&self.state)
  }

  pub fn formatted(&self) -> String {
    format_minutes_and_seconds(self.state.seconds)
  }

  pub fn start(&mut self) {
    let CountdownState { initial_seconds, seconds, is_active } = self.state;
    if !can_start(seconds, initial_seconds, is_active) {
      debug!("Ignoring start in {:?}", self.phase());
      return;
    }
    info!("Starting countdown of {}", self.formatted());
    self.activate();
  }

  pub fn resume(&mut self) {
    let CountdownState { initial_seconds, seconds, is_active } = self.state;
    if !can_resume(seconds, initial_seconds, is_active) {
      debug!("Ignoring resume in {:?}", self.phase());
      return;
    }
    info!("Resuming countdown at {}", self.formatted());
    self.activate();
  }

  fn activate(&mut self) {
    self.state.is_active = true;
    self.sync();
  }

  pub fn pause(&mut self) {
    if !can_pause(self.state.seconds, self.state.is_active) {
      debug!("Ignoring pause in {:?}", self.phase());
      return;
    }
    info!("Pausing countdown at {}", self.formatted());
    self.state.is_active = false;
    self.sync();
  }

  pub fn reset(&mut self) {
    let CountdownState { initial_seconds, seconds, is_active } = self.state;
    if !can_reset(seconds, initial_seconds, is_active) {
      debug!("Ignoring reset in {:?}", self.phase());
      return;
    }
    self.state.seconds = initial_seconds;
    self.state.is_active = false;
    info!("Reset countdown to {}", self.formatted());
    self.sync();
  }

  /// One second has passed. Returns true if this tick ran the countdown out.
  pub fn tick(&mut self) -> bool {
    if !self.state.should_tick() {
      debug!("Dropping tick in {:?}", self.phase());
      return false;
    }
    self.state.seconds -= 1;
    debug!("Tick: {}", self.formatted());
    let expired = self.state.seconds == 0;
    if expired {
      info!("Countdown expired");
    }
    self.sync();
    expired
  }

  /// Replace the duration from edited text. Only allowed before starting.
  pub fn edit_duration(&mut self, text: &str) {
    let CountdownState { initial_seconds, seconds, is_active } = self.state;
    if !can_edit(seconds, initial_seconds, is_active) {
      debug!("Ignoring duration edit '{}' in {:?}", text, self.phase());
      return;
    }
    let Some(total) = parse_duration(text) else {
      debug!("Ignoring blank duration edit");
      return;
    };
    self.state.seconds = total;
    self.state.initial_seconds = total;
    info!("Duration set to {} from '{}'", self.formatted(), text.trim());
    self.sync();
  }

  /// Tear down the tick and hand the label back.
  ///
  /// The label is left alone until the first countdown text is shown. After
  /// that it ends on `default_label`: the previous window title can't be read
  /// back, so it is not restored.
  pub fn shutdown(&mut self) {
    self.scheduler.cancel();
    if self.shows_countdown_label() {
      self.request_label(self.default_label.clone());
    }
  }

  fn sync(&mut self) {
    if self.state.should_tick() {
      self.scheduler.arm();
    } else {
      self.scheduler.cancel();
    }

    let CountdownState { initial_seconds, seconds, is_active } = self.state;
    if is_active && seconds != initial_seconds {
      self.request_label(format!("({}) {}", self.formatted(), self.default_label));
    } else if self.shows_countdown_label() {
      self.request_label(self.default_label.clone());
    }
  }

  fn shows_countdown_label(&self) -> bool {
    matches!(&self.last_label, Some(label) if *label != self.default_label)
  }

  fn request_label(&mut self, text: String) {
    if self.last_label.as_deref() == Some(text.as_str()) {
      return;
    }
    self.label.set_label(&text);
    self.last_label = Some(text);
  }

  #[cfg(test)]
  pub fn scheduler(&self) -> &S {
    &self.scheduler
  }

  #[cfg(test)]
  pub fn label(&self) -> &L {
    &self.label
  }
}

impl<S: TickScheduler, L: SetLabel> Drop for Countdown<S, L> {
  fn drop(&mut self) {
    self.shutdown();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::label::RecordingLabel;
  use crate::ticker::ManualTicker;

  const LABEL: &str = "Timer";

  fn countdown(initial_seconds: u32) -> Countdown<ManualTicker, RecordingLabel> {
    Countdown::new(initial_seconds, LABEL, ManualTicker::default(), RecordingLabel::default())
  }

  fn running(seconds: u32) -> Countdown<ManualTicker, RecordingLabel> {
    let mut c = countdown(seconds);
    c.start();
    c
  }

  #[test]
  fn test_default_state() {
    let state = CountdownState::default();
    assert_eq!(state.initial_seconds, 300);
    assert_eq!(state.seconds, 300);
    assert!(!state.is_active);
    assert!(state.phase().is_unstarted());
  }

  #[test]
  fn test_phase_derivation() {
    let s = |seconds, is_active| CountdownState { initial_seconds: 10, seconds, is_active };
    assert_eq!(s(10, false).phase(), Phase::Unstarted);
    assert_eq!(s(10, true).phase(), Phase::Running);
    assert_eq!(s(5, true).phase(), Phase::Running);
    assert_eq!(s(5, false).phase(), Phase::Paused);
    assert_eq!(s(0, true).phase(), Phase::Expired);
    assert_eq!(s(0, false).phase(), Phase::Expired);
  }

  #[test]
  fn test_new_leaves_label_untouched() {
    let c = countdown(300);
    assert!(c.label().history.is_empty());
    assert!(!c.scheduler().is_armed());
  }

  #[test]
  fn test_start_arms_tick() {
    let c = running(300);
    assert!(c.phase().is_running());
    assert!(c.scheduler().is_armed());
  }

  #[test]
  fn test_tick_terminates_at_zero() {
    let mut c = running(2);
    assert!(!c.tick());
    assert!(c.tick());
    assert_eq!(c.state().seconds, 0);
    assert!(c.state().is_active);
    assert!(!c.scheduler().is_armed());

    assert!(!c.tick());
    assert_eq!(c.state().seconds, 0);
  }

  #[test]
  fn test_tick_ignored_when_inactive() {
    let mut c = countdown(10);
    assert!(!c.tick());
    assert_eq!(c.state().seconds, 10);
  }

  #[test]
  fn test_pause_and_resume() {
    let mut c = running(10);
    c.tick();
    c.pause();
    assert!(c.phase().is_paused());
    assert!(!c.scheduler().is_armed());

    // a stale tick after pausing changes nothing
    c.tick();
    assert_eq!(c.state().seconds, 9);

    c.start(); // not the initial value, so start is refused
    assert!(c.phase().is_paused());

    c.resume();
    assert!(c.phase().is_running());
    assert!(c.scheduler().is_armed());
    assert_eq!(c.scheduler().arm_count, 2);
  }

  #[test]
  fn test_resume_refused_when_unstarted() {
    let mut c = countdown(10);
    c.resume();
    assert!(c.phase().is_unstarted());
    assert!(!c.scheduler().is_armed());
  }

  #[test]
  fn test_pause_refused_when_expired() {
    let mut c = running(1);
    c.tick();
    c.pause();
    assert!(c.state().is_active);
    assert!(c.phase().is_expired());
  }

  #[test]
  fn test_reset_refused_while_running() {
    let mut c = running(10);
    c.tick();
    c.reset();
    assert_eq!(c.state().seconds, 9);
    assert!(c.phase().is_running());
  }

  #[test]
  fn test_reset_from_paused() {
    let mut c = running(10);
    c.tick();
    c.tick();
    c.pause();
    c.reset();
    assert_eq!(*c.state(), CountdownState::new(10));
  }

  #[test]
  fn test_full_lifecycle() {
    let mut c = countdown(300);
    c.start();
    assert!(c.phase().is_running());

    c.tick();
    c.edit_duration("10");
    assert_eq!(c.state().initial_seconds, 300);
    assert_eq!(c.state().seconds, 299);

    let mut expirations = 0;
    for _ in 1..300 {
      if c.tick() {
        expirations += 1;
      }
    }
    assert_eq!(expirations, 1);
    assert!(c.phase().is_expired());
    assert!(!c.scheduler().is_armed());
    assert!(c.guards().reset);

    c.reset();
    assert!(c.phase().is_unstarted());
    assert_eq!(*c.state(), CountdownState::new(300));
  }

  #[test]
  fn test_edit_then_start() {
    let mut c = countdown(300);
    c.edit_duration("10");
    assert_eq!(*c.state(), CountdownState::new(600));
    c.start();
    assert!(c.phase().is_running());
    assert_eq!(c.state().seconds, 600);
  }

  #[test]
  fn test_blank_edit_is_noop() {
    let mut c = countdown(300);
    c.edit_duration("   ");
    assert_eq!(*c.state(), CountdownState::new(300));
  }

  #[test]
  fn test_edit_refused_while_paused() {
    let mut c = running(300);
    c.tick();
    c.pause();
    c.edit_duration("1");
    assert_eq!(c.state().initial_seconds, 300);
    assert_eq!(c.state().seconds, 299);
  }

  #[test]
  fn test_edit_to_zero_leaves_only_reset() {
    let mut c = countdown(300);
    c.edit_duration("0");
    assert!(c.phase().is_expired());
    c.start();
    assert!(!c.state().is_active);
    assert!(!c.scheduler().is_armed());
  }

  #[test]
  fn test_tick_scheduled_only_while_counting() {
    let mut c = countdown(3);
    let armed_matches = |c: &Countdown<ManualTicker, RecordingLabel>| {
      c.scheduler().is_armed() == c.state().should_tick()
    };
    assert!(armed_matches(&c));
    c.start();
    assert!(armed_matches(&c));
    c.tick();
    c.pause();
    assert!(armed_matches(&c));
    c.resume();
    assert!(armed_matches(&c));
    c.tick();
    c.tick();
    assert!(armed_matches(&c));
    c.reset();
    assert!(armed_matches(&c));
  }

  #[test]
  fn test_label_follows_running_countdown() {
    let mut c = running(90);
    // nothing to report until the first second has passed
    assert_eq!(c.label().last(), None);
    c.tick();
    assert_eq!(c.label().last(), Some("(01:29) Timer"));
    c.tick();
    assert_eq!(c.label().last(), Some("(01:28) Timer"));
    c.pause();
    assert_eq!(c.label().last(), Some(LABEL));
    c.resume();
    assert_eq!(c.label().last(), Some("(01:28) Timer"));
    c.pause();
    c.reset();
    assert_eq!(
      c.label().history,
      vec!["(01:29) Timer", "(01:28) Timer", "Timer", "(01:28) Timer", "Timer"]
    );
  }

  #[test]
  fn test_label_frozen_at_zero() {
    let mut c = running(1);
    c.tick();
    assert_eq!(c.label().last(), Some("(00:00) Timer"));
    c.reset();
    assert_eq!(c.label().last(), Some(LABEL));
  }

  #[test]
  fn test_label_untouched_until_first_tick() {
    let mut c = countdown(10);
    c.edit_duration("1");
    c.start();
    c.pause();
    c.shutdown();
    assert!(c.label().history.is_empty());
  }

  #[test]
  fn test_shutdown_cancels_tick_and_restores_label() {
    let mut c = running(10);
    c.tick();
    c.shutdown();
    assert!(!c.scheduler().is_armed());
    assert_eq!(c.label().last(), Some(LABEL));
  }
}
