//! Transition guards for the countdown.
//!
//! These are the only validation the countdown has. The engine gates its
//! transitions on them and the help line picks which keys to show with the
//! very same functions, so the two can never disagree.

use crate::engine::CountdownState;

/// Reset is offered once expired, or while paused part-way through.
pub fn can_reset(seconds: u32, initial_seconds: u32, is_active: bool) -> bool {
  if seconds == 0 {
    return true;
  }
  !is_active && seconds != initial_seconds
}

pub fn can_pause(seconds: u32, is_active: bool) -> bool {
  seconds > 0 && is_active
}

/// Start only from the untouched initial value.
pub fn can_start(seconds: u32, initial_seconds: u32, is_active: bool) -> bool {
  seconds > 0 && !is_active && seconds == initial_seconds
}

/// Resume only from part-way through.
pub fn can_resume(seconds: u32, initial_seconds: u32, is_active: bool) -> bool {
  seconds > 0 && !is_active && seconds != initial_seconds
}

pub fn can_edit(seconds: u32, initial_seconds: u32, is_active: bool) -> bool {
  seconds == initial_seconds && !is_active
}

/// Every guard evaluated against one state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Guards {
  pub start: bool,
  pub resume: bool,
  pub pause: bool,
  pub reset: bool,
  pub edit: bool,
}

impl Guards {
  pub fn evaluate(state: &CountdownState) -> Self {
    let CountdownState { initial_seconds, seconds, is_active } = *state;
    Self {
      start: can_start(seconds, initial_seconds, is_active),
      resume: can_resume(seconds, initial_seconds, is_active),
      pause: can_pause(seconds, is_active),
      reset: can_reset(seconds, initial_seconds, is_active),
      edit: can_edit(seconds, initial_seconds, is_active),
    }
  }
}
