use std::time::Duration;

use super::Seconds;

pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Wall clock time with nanosecond resolution
#[derive(Debug, PartialOrd, PartialEq, Clone, Copy)]
pub struct ClockTime(u64);

impl ClockTime {
  pub fn zero() -> ClockTime {
    ClockTime(0)
  }

  /// Negative spans become zero.
  pub fn from_seconds(seconds: Seconds) -> ClockTime {
    ClockTime((seconds.max(0.0) * NANOS_PER_SECOND as f64).round() as u64)
  }

  pub fn to_nanos(&self) -> u64 {
    self.0
  }

  pub fn to_seconds(&self) -> Seconds {
    self.0 as f64 / NANOS_PER_SECOND as f64
  }

  pub fn to_duration(&self) -> Duration {
    Duration::from_nanos(self.to_nanos())
  }
}

#[cfg(test)]
mod test {

  use super::{ClockTime, NANOS_PER_SECOND};
  use std::time::Duration;

  #[test]
  pub fn from_seconds() {
    let time = ClockTime::from_seconds(1.5);
    assert_eq!(time.to_nanos(), NANOS_PER_SECOND + NANOS_PER_SECOND / 2);
    assert_eq!(time.to_seconds(), 1.5);
  }

  #[test]
  pub fn from_negative_seconds() {
    assert_eq!(ClockTime::from_seconds(-0.5), ClockTime::zero());
  }

  #[test]
  pub fn to_duration() {
    let time = ClockTime::from_seconds(0.25);
    assert_eq!(time.to_duration(), Duration::from_millis(250));
  }
}
