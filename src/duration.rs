//! Duration text handling for the countdown clock.
//!
//! Typed durations are minutes by default: "5" is five minutes, "5:30" is
//! five and a half. Anything that isn't a digit is thrown away, so a
//! fumbled edit degrades to zero instead of failing.

/// Only inputs this long (with a colon) are taken as already being `m:ss`/`mm:ss`.
const SPLIT_INPUT_LENGTHS: [usize; 2] = [4, 5];

/// Keep only the ASCII digits of `text`.
pub fn extract_digits(text: &str) -> String {
  text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Digits of `text` as a number; no digits reads as 0, huge values saturate.
fn digits_to_u32(text: &str) -> u32 {
  extract_digits(text)
    .chars()
    .filter_map(|c| c.to_digit(10))
    .fold(0u32, |acc, d| acc.saturating_mul(10).saturating_add(d))
}

/// Parse an edited duration into total seconds.
///
/// Returns `None` for blank input, which callers treat as "leave the
/// countdown alone".
pub fn parse_duration(text: &str) -> Option<u32> {
  let raw = text.trim();
  if raw.is_empty() {
    return None;
  }

  let coerced = if raw.contains(':') && SPLIT_INPUT_LENGTHS.contains(&raw.chars().count()) {
    raw.to_string()
  } else {
    format!("{}:00", raw)
  };

  let mut parts = coerced.split(':');
  let minutes = digits_to_u32(parts.next().unwrap_or_default());
  let seconds = digits_to_u32(parts.next().unwrap_or_default());

  Some(minutes.saturating_mul(60).saturating_add(seconds))
}

/// Two-digit, zero-padded time unit.
pub fn pad_time_unit(time: u32) -> String {
  format!("{:02}", time)
}

/// `mm:ss` for any number of seconds. Hours are not split out, so an hour
/// reads "60:00".
pub fn format_minutes_and_seconds(seconds: u32) -> String {
  format!("{}:{}", pad_time_unit(seconds / 60), pad_time_unit(seconds % 60))
}
