//! How loudly the clock should look, by time remaining.

use ratatui::style::{Color, Modifier, Style};

// Thresholds in seconds remaining, loosest first
const NOTICE_THRESHOLD: u32 = 60;
const WARNING_THRESHOLD: u32 = 45;
const ALERT_THRESHOLD: u32 = 30;
const CRITICAL_THRESHOLD: u32 = 20;
const FINAL_THRESHOLD: u32 = 10;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Urgency {
  #[default]
  Calm,
  Notice,
  Warning,
  Alert,
  Critical,
  Final,
}

impl Urgency {
  pub fn from_seconds(seconds: u32) -> Self {
    match seconds {
      s if s <= FINAL_THRESHOLD => Urgency::Final,
      s if s <= CRITICAL_THRESHOLD => Urgency::Critical,
      s if s <= ALERT_THRESHOLD => Urgency::Alert,
      s if s <= WARNING_THRESHOLD => Urgency::Warning,
      s if s <= NOTICE_THRESHOLD => Urgency::Notice,
      _ => Urgency::Calm,
    }
  }

  /// Clock style. Bold while counting, plain otherwise.
  pub fn style(self, is_active: bool) -> Style {
    let style = match self {
      Urgency::Calm if is_active => Style::new().fg(Color::Green),
      Urgency::Calm => Style::new().fg(Color::Gray),
      Urgency::Notice => Style::new().fg(Color::LightYellow),
      Urgency::Warning => Style::new().fg(Color::Yellow),
      Urgency::Alert => Style::new().fg(Color::LightRed),
      Urgency::Critical => Style::new().fg(Color::Red),
      Urgency::Final => Style::new().fg(Color::White).bg(Color::Red),
    };
    if is_active {
      style.add_modifier(Modifier::BOLD)
    } else {
      style
    }
  }
}
