//! The repeating one-second countdown tick.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::tui::Event;

pub const COUNTDOWN_TICK_MS: u64 = 1000;

/// Something that can be told to start or stop delivering countdown ticks.
///
/// Arming an armed scheduler or cancelling an idle one does nothing.
pub trait TickScheduler {
  fn arm(&mut self);
  fn cancel(&mut self);
  fn is_armed(&self) -> bool;
}

/// Sends `Event::Tick` into the app's event channel every second while armed.
pub struct IntervalTicker {
  period: Duration,
  event_tx: UnboundedSender<Event>,
  running: Option<(JoinHandle<()>, CancellationToken)>,
}

impl IntervalTicker {
  pub fn new(event_tx: UnboundedSender<Event>) -> Self {
    Self::with_period(event_tx, Duration::from_millis(COUNTDOWN_TICK_MS))
  }

  pub fn with_period(event_tx: UnboundedSender<Event>, period: Duration) -> Self {
    Self { period, event_tx, running: None }
  }
}

impl TickScheduler for IntervalTicker {
  fn arm(&mut self) {
    if self.is_armed() {
      return;
    }
    let cancellation_token = CancellationToken::new();
    let _cancellation_token = cancellation_token.clone();
    let _event_tx = self.event_tx.clone();
    let period = self.period;
    let task = tokio::spawn(async move {
      // first decrement lands one full period after arming
      let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
      loop {
        tokio::select! {
          _ = _cancellation_token.cancelled() => {
            break;
          }
          _ = interval.tick() => {
            if let Err(e) = _event_tx.send(Event::Tick) {
              log::error!("Failed to send countdown tick: {}", e);
              break;
            }
          }
        }
      }
    });
    debug!("Countdown tick armed ({}ms)", period.as_millis());
    self.running = Some((task, cancellation_token));
  }

  fn cancel(&mut self) {
    if let Some((task, cancellation_token)) = self.running.take() {
      cancellation_token.cancel();
      task.abort();
      debug!("Countdown tick cancelled");
    }
  }

  fn is_armed(&self) -> bool {
    self.running.is_some()
  }
}

impl Drop for IntervalTicker {
  fn drop(&mut self) {
    self.cancel();
  }
}

/// Scheduler that only remembers whether it's armed; ticks are delivered by hand.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ManualTicker {
  pub armed: bool,
  pub arm_count: u32,
  pub cancel_count: u32,
}

#[cfg(test)]
impl TickScheduler for ManualTicker {
  fn arm(&mut self) {
    if !self.armed {
      self.armed = true;
      self.arm_count += 1;
    }
  }

  fn cancel(&mut self) {
    if self.armed {
      self.armed = false;
      self.cancel_count += 1;
    }
  }

  fn is_armed(&self) -> bool {
    self.armed
  }
}
