/////////////////////
/// TMINUS - a single countdown in the terminal
///
/// Counts down from a configurable duration (5 minutes unless tminus.ini says otherwise)
/// and mirrors the remaining time into the terminal window title while it runs.
/// Under a minute the clock gets progressively redder.
/// - 'space' starts, pauses and resumes
/// - 'r' resets once paused or finished
/// - 'e' edits the duration before starting; type "5" for five minutes or "5:30"
/// - 'q' quits
///
pub const APP_VERSION: &str = "TMINUS V0.1.0";
const LOG_FILE_NAME: &str = "tminus.log";
const TIP_TEXT: &str = "Tip: press e and type 5 for a 5-minute countdown.";
// Stderr sits under the alternate screen while running; only errors go there
const TERM_LOG_LEVEL: LevelFilter = LevelFilter::Error;
const FILE_LOG_LEVEL: LevelFilter = LevelFilter::Info;

use std::fs::File;
use std::io::Write;
#[macro_use] extern crate log;
extern crate simplelog;
use simplelog::*;
#[macro_use]
extern crate ini;

use color_eyre::eyre::{eyre, Result};
use ratatui::{prelude::*, widgets::*};
use strum::EnumIs;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use build_time::build_time_local;

mod config;
mod duration;
mod engine;
mod guards;
mod label;
mod ticker;
mod tui;
mod urgency;

use crate::engine::{Countdown, Phase};
use crate::label::{SetLabel, TerminalTitle};
use crate::ticker::{IntervalTicker, TickScheduler};
use crate::tui::{Event, Tui};
use crate::urgency::Urgency;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, EnumIs)]
enum AppState {
  #[default]
  Viewing,
  Editing,
  Quitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Message {
  StartPauseResume,
  Pause,
  Reset,
  BeginEdit,
  EditInput(char),
  EditBackspace,
  EditCommit,
  EditCancel,
  Tick,
  Redraw,
  Quit,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;
  init_logging();
  let config = config::Config::load();

  let mut tui = Tui::new()?;
  let countdown = Countdown::new(
    config.initial_seconds,
    &config.label,
    IntervalTicker::new(tui.sender()),
    TerminalTitle,
  );
  let mut app = CountdownApp::new(config, countdown);

  tui.enter()?;
  let outcome = app.run(&mut tui).await;
  drop(app);
  tui.exit()?;
  outcome?;
  println!("Thanks for using {} (built: {})\n", APP_VERSION, build_time_local!("%Y-%b-%d at %H:%M:%S"));
  Ok(())
}

fn init_logging() {
  let log_file = match File::create(LOG_FILE_NAME) {
    Ok(file) => Some(file),
    Err(e) => {
      eprintln!("Warning: Could not create log file: {}", e);
      eprintln!("Continuing with terminal logging only.");
      None
    }
  };

  let mut loggers: Vec<Box<dyn SharedLogger>> = vec![
    TermLogger::new(TERM_LOG_LEVEL, Config::default(), TerminalMode::Mixed, ColorChoice::Auto),
  ];
  if let Some(file) = log_file {
    loggers.push(WriteLogger::new(FILE_LOG_LEVEL, Config::default(), file));
  }

  CombinedLogger::init(loggers).unwrap_or_else(|e| {
    eprintln!("Warning: Could not initialize logger: {}", e);
  });

  info!("Logging for {} initialized", APP_VERSION);
}

struct CountdownApp<S: TickScheduler, L: SetLabel> {
  state: AppState,
  config: config::Config,
  countdown: Countdown<S, L>,
  edit_buffer: String,
}

impl<S: TickScheduler, L: SetLabel> CountdownApp<S, L> {
  fn new(config: config::Config, countdown: Countdown<S, L>) -> Self {
    Self {
      state: Default::default(),
      config,
      countdown,
      edit_buffer: String::new(),
    }
  }

  async fn run(&mut self, tui: &mut Tui) -> Result<()> {
    while !self.state.is_quitting() {
      tui.draw(|f| self.ui(f))?;
      let event = tui.next().await.ok_or(eyre!("Unable to get event"))?; // blocks until next event
      let message = self.handle_event(event);
      self.update(message);
    }
    self.countdown.shutdown();
    Ok(())
  }

  // Event handler (keyboard, tick)
  fn handle_event(&self, event: Event) -> Message {
    match event {
      Event::Key(key) => {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
          return Message::Quit;
        }
        if self.state.is_editing() {
          self.handle_edit_key(key)
        } else {
          self.handle_view_key(key)
        }
      }
      Event::Tick => Message::Tick,
      Event::Resize => Message::Redraw,
      Event::Error => {
        warn!("Error reading terminal event");
        Message::Redraw
      }
    }
  }

  fn handle_view_key(&self, key: KeyEvent) -> Message {
    match key.code {
      KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Message::Quit,
      KeyCode::Char(' ') | KeyCode::Enter => Message::StartPauseResume,
      KeyCode::Char('p') | KeyCode::Char('P') => Message::Pause,
      KeyCode::Char('r') | KeyCode::Char('R') => Message::Reset,
      KeyCode::Char('e') | KeyCode::Char('E') => Message::BeginEdit,
      _ => Message::Redraw,
    }
  }

  fn handle_edit_key(&self, key: KeyEvent) -> Message {
    match key.code {
      KeyCode::Enter | KeyCode::Tab => Message::EditCommit,
      KeyCode::Esc => Message::EditCancel,
      KeyCode::Backspace => Message::EditBackspace,
      KeyCode::Char(c) if (key.modifiers - KeyModifiers::SHIFT).is_empty() => Message::EditInput(c),
      _ => Message::Redraw,
    }
  }

  fn update(&mut self, message: Message) {
    match message {
      Message::StartPauseResume => self.start_pause_resume(),
      Message::Pause => self.countdown.pause(),
      Message::Reset => self.countdown.reset(),
      Message::BeginEdit => self.begin_edit(),
      Message::EditInput(c) => self.edit_buffer.push(c),
      Message::EditBackspace => {
        self.edit_buffer.pop();
      }
      Message::EditCommit => self.commit_edit(),
      Message::EditCancel => self.cancel_edit(),
      Message::Tick => self.tick(),
      Message::Redraw => {}
      Message::Quit => self.quit(),
    }
  }

  fn start_pause_resume(&mut self) {
    let guards = self.countdown.guards();
    if guards.start {
      self.countdown.start();
    } else if guards.resume {
      self.countdown.resume();
    } else if guards.pause {
      self.countdown.pause();
    }
  }

  fn begin_edit(&mut self) {
    if !self.countdown.guards().edit {
      return;
    }
    self.edit_buffer = self.countdown.formatted();
    self.state = AppState::Editing;
  }

  fn commit_edit(&mut self) {
    let text = std::mem::take(&mut self.edit_buffer);
    self.countdown.edit_duration(&text);
    self.state = AppState::Viewing;
  }

  fn cancel_edit(&mut self) {
    self.edit_buffer.clear();
    self.state = AppState::Viewing;
  }

  fn tick(&mut self) {
    if self.countdown.tick() && self.config.bell {
      self.ring_bell();
    }
  }

  fn ring_bell(&self) {
    let mut stderr = std::io::stderr();
    if let Err(e) = stderr.write_all(b"\x07").and_then(|_| stderr.flush()) {
      warn!("Could not ring the bell: {}", e);
    }
  }

  fn quit(&mut self) {
    self.state = AppState::Quitting;
  }

  fn ui(&self, f: &mut Frame) {
    let layout = self.layout(f.size());
    f.render_widget(self.title_paragraph(), layout[0]);
    f.render_widget(self.timer_paragraph(), layout[1]);
    f.render_widget(self.status_paragraph(), layout[2]);
    f.render_widget(self.help_paragraph(), layout[3]);
    f.render_widget(self.tip_paragraph(), layout[4]);
  }

  fn layout(&self, area: Rect) -> Vec<Rect> {
    let layout = Layout::default()
      .direction(Direction::Vertical)
      .constraints(vec![
        Constraint::Length(3), // top bar
        Constraint::Length(9), // clock
        Constraint::Length(2), // phase
        Constraint::Length(2), // help
        Constraint::Length(2), // tip
      ])
      .split(area);

    layout.to_vec()
  }

  fn title_paragraph(&self) -> Paragraph<'_> {
    let title_text = Line::from(vec![APP_VERSION.into(), " - ".into(), self.config.label.as_str().dim()]);
    Paragraph::new(title_text).gray()
  }

  fn timer_paragraph(&self) -> tui_big_text::BigText<'_> {
    let state = self.countdown.state();
    let (text, style) = if self.state.is_editing() {
      (format!("{}_", self.edit_buffer), Style::new().cyan())
    } else {
      (self.countdown.formatted(), Urgency::from_seconds(state.seconds).style(state.is_active))
    };
    let lines = vec![text.into()];
    tui_big_text::BigTextBuilder::default()
      .lines(lines)
      .style(style)
      .build()
      .expect("lines are always set")
  }

  fn status_paragraph(&self) -> Paragraph<'_> {
    let status = match self.countdown.phase() {
      Phase::Unstarted => "ready",
      Phase::Running => "running",
      Phase::Paused => "paused",
      Phase::Expired => "time's up",
    };
    let status = if self.state.is_editing() { "editing" } else { status };
    Paragraph::new(Line::from(vec!["state ".into(), status.bold()])).gray()
  }

  fn help_paragraph(&self) -> Paragraph<'_> {
    Paragraph::new(Line::from(self.help_spans())).gray()
  }

  fn help_spans(&self) -> Vec<Span<'static>> {
    let mut help: Vec<Span<'static>> = Vec::new();
    let mut push = |key: &'static str, action: &'static str| {
      if !help.is_empty() {
        help.push(" : ".into());
      }
      help.push(key.into());
      help.push(" ".into());
      help.push(action.dim());
    };

    if self.state.is_editing() {
      push("enter", "save");
      push("esc", "cancel");
      push("backspace", "delete");
    } else {
      let guards = self.countdown.guards();
      if guards.start {
        push("space", "start");
      }
      if guards.resume {
        push("space", "resume");
      }
      if guards.pause {
        push("space", "pause");
      }
      if guards.reset {
        push("r", "reset");
      }
      if guards.edit {
        push("e", "edit");
      }
      push("q", "quit");
    }
    help
  }

  fn tip_paragraph(&self) -> Paragraph<'_> {
    Paragraph::new(self.tip_text().dim())
  }

  fn tip_text(&self) -> &'static str {
    if self.countdown.guards().edit { TIP_TEXT } else { "" }
  }
}
