//! `tminus.ini` loading.
//!
//! ```ini
//! [tminus]
//! duration = 25      ; same syntax as typing into the clock
//! label = Focus
//! bell = no
//! ```

use std::collections::HashMap;

use crate::duration::{extract_digits, parse_duration};
use crate::engine::DEFAULT_INITIAL_SECONDS;

pub const CONF_FILE_NAME: &str = "tminus.ini";
const CONF_SECTION: &str = "tminus";
pub const DEFAULT_LABEL: &str = "Timer";

type IniMap = HashMap<String, HashMap<String, Option<String>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub initial_seconds: u32,
  pub label: String,
  pub bell: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      initial_seconds: DEFAULT_INITIAL_SECONDS,
      label: DEFAULT_LABEL.to_string(),
      bell: true,
    }
  }
}

/// Parse and validate the initial duration; no digits or a zero length means default
fn parse_duration_config(value: &str) -> u32 {
  if extract_digits(value).is_empty() {
    warn!("Config value 'duration' = '{}' has no digits, using default {}s", value, DEFAULT_INITIAL_SECONDS);
    eprintln!("Warning: Invalid duration value '{}', using default {}s", value, DEFAULT_INITIAL_SECONDS);
    return DEFAULT_INITIAL_SECONDS;
  }
  match parse_duration(value) {
    Some(seconds) if seconds > 0 => seconds,
    _ => {
      warn!("Config value 'duration' = '{}' is zero, using default {}s", value, DEFAULT_INITIAL_SECONDS);
      eprintln!("Warning: duration value '{}' is zero, using default {}s", value, DEFAULT_INITIAL_SECONDS);
      DEFAULT_INITIAL_SECONDS
    }
  }
}

fn parse_bool_config(value: &str, config_name: &str, default: bool) -> bool {
  match value.trim().to_ascii_lowercase().as_str() {
    "true" | "yes" | "on" | "1" => true,
    "false" | "no" | "off" | "0" => false,
    other => {
      warn!("Config value '{}' = '{}' is not a boolean, using default {}", config_name, other, default);
      eprintln!("Warning: Invalid {} value '{}', using default {}", config_name, other, default);
      default
    }
  }
}

impl Config {
  /// Read `tminus.ini` from the working directory. A missing or broken
  /// file just means defaults.
  pub fn load() -> Self {
    info!("Reading config from {}", CONF_FILE_NAME);
    let inimap: IniMap = match ini!(safe CONF_FILE_NAME) {
      Ok(map) => map,
      Err(error) => {
        eprintln!("Warning: Couldn't load config file '{}': {}", CONF_FILE_NAME, error);
        eprintln!("Continuing with default values.");
        info!("Using default configuration");
        HashMap::new()
      }
    };

    for (key, value) in &inimap {
      info!("{} / {:?}", key, value);
    }

    Self::from_map(&inimap)
  }

  pub fn from_map(inimap: &IniMap) -> Self {
    let mut config = Self::default();
    let Some(section) = inimap.get(CONF_SECTION) else {
      info!("No [{}] section, using defaults", CONF_SECTION);
      return config;
    };

    if let Some(val) = section.get("duration").and_then(|v| v.as_ref()) {
      info!("Found duration config: {}", val);
      config.initial_seconds = parse_duration_config(val);
    }

    if let Some(val) = section.get("label").and_then(|v| v.as_ref()) {
      let label = val.trim();
      if label.is_empty() {
        warn!("Label is empty, using default '{}'", DEFAULT_LABEL);
      } else {
        config.label = label.to_string();
      }
    }

    if let Some(val) = section.get("bell").and_then(|v| v.as_ref()) {
      config.bell = parse_bool_config(val, "bell", config.bell);
    }

    info!("Config: {:?}", config);
    config
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn inimap(pairs: &[(&str, &str)]) -> IniMap {
    let section = pairs
      .iter()
      .map(|(k, v)| (k.to_string(), Some(v.to_string())))
      .collect();
    HashMap::from([(CONF_SECTION.to_string(), section)])
  }

  #[test]
  fn test_defaults_without_section() {
    assert_eq!(Config::from_map(&HashMap::new()), Config::default());
    assert_eq!(Config::default().initial_seconds, 300);
    assert_eq!(Config::default().label, "Timer");
    assert!(Config::default().bell);
  }

  #[test]
  fn test_duration_uses_clock_syntax() {
    assert_eq!(Config::from_map(&inimap(&[("duration", "25")])).initial_seconds, 1500);
    assert_eq!(Config::from_map(&inimap(&[("duration", "1:30")])).initial_seconds, 90);
  }

  #[test]
  fn test_blank_duration_falls_back() {
    assert_eq!(Config::from_map(&inimap(&[("duration", "  ")])).initial_seconds, 300);
  }

  #[test]
  fn test_unparsable_duration_falls_back() {
    assert_eq!(Config::from_map(&inimap(&[("duration", "abc")])).initial_seconds, 300);
    assert_eq!(Config::from_map(&inimap(&[("duration", "::")])).initial_seconds, 300);
  }

  #[test]
  fn test_zero_duration_falls_back() {
    assert_eq!(Config::from_map(&inimap(&[("duration", "0")])).initial_seconds, 300);
    assert_eq!(Config::from_map(&inimap(&[("duration", "0:00")])).initial_seconds, 300);
  }

  #[test]
  fn test_label() {
    assert_eq!(Config::from_map(&inimap(&[("label", " Focus ")])).label, "Focus");
    assert_eq!(Config::from_map(&inimap(&[("label", "")])).label, DEFAULT_LABEL);
  }

  #[test]
  fn test_bell() {
    assert!(!Config::from_map(&inimap(&[("bell", "no")])).bell);
    assert!(!Config::from_map(&inimap(&[("bell", "FALSE")])).bell);
    assert!(Config::from_map(&inimap(&[("bell", "1")])).bell);
    assert!(Config::from_map(&inimap(&[("bell", "maybe")])).bell);
  }

  #[test]
  fn test_valueless_keys_are_ignored() {
    let mut map = inimap(&[]);
    map.get_mut(CONF_SECTION).unwrap().insert("duration".to_string(), None);
    assert_eq!(Config::from_map(&map), Config::default());
  }
}
