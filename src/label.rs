//! Where the countdown reports itself: the terminal window title.

use crossterm::terminal::SetTitle;

/// Fire-and-forget label sink. Implementations never report failure back.
pub trait SetLabel {
  fn set_label(&mut self, text: &str);
}

/// Writes the label as the terminal window title.
///
/// Terminals can't report the title they had before, so whatever is written
/// last stays after exit.
#[derive(Debug, Default)]
pub struct TerminalTitle;

impl SetLabel for TerminalTitle {
  fn set_label(&mut self, text: &str) {
    if let Err(e) = crossterm::execute!(std::io::stderr(), SetTitle(text)) {
      warn!("Could not set terminal title to '{}': {}", text, e);
    }
  }
}

/// Keeps every label it was asked to show.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingLabel {
  pub history: Vec<String>,
}

#[cfg(test)]
impl RecordingLabel {
  pub fn last(&self) -> Option<&str> {
    self.history.last().map(String::as_str)
  }
}

#[cfg(test)]
impl SetLabel for RecordingLabel {
  fn set_label(&mut self, text: &str) {
    self.history.push(text.to_string());
  }
}
