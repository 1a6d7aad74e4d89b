use crate::time::{Seconds, Tempo};

pub type TicksPerBeat = u16;

pub const DEFAULT_TICKS_PER_BEAT: TicksPerBeat = 480;

const SECONDS_PER_MINUTE: f64 = 60.0;

/// Discrete time at a given resolution of ticks per beat.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone)]
pub struct TicksTime(u64);

impl TicksTime {
  pub fn new(ticks: u64) -> TicksTime {
    TicksTime(ticks)
  }

  pub fn zero() -> TicksTime {
    TicksTime(0)
  }

  pub fn per_second(tempo: Tempo, ticks_per_beat: TicksPerBeat) -> f64 {
    f64::from(ticks_per_beat) * tempo.get_value() / SECONDS_PER_MINUTE
  }

  /// Ticks for a span of seconds, rounding half to even. Negative spans
  /// saturate to zero.
  pub fn from_seconds(seconds: Seconds, tempo: Tempo, ticks_per_beat: TicksPerBeat) -> TicksTime {
    let ticks = (seconds * Self::per_second(tempo, ticks_per_beat)).round_ties_even();
    TicksTime(ticks.max(0.0) as u64)
  }

  pub fn to_seconds(&self, tempo: Tempo, ticks_per_beat: TicksPerBeat) -> Seconds {
    self.0 as f64 / Self::per_second(tempo, ticks_per_beat)
  }
}

impl From<TicksTime> for u64 {
  fn from(item: TicksTime) -> Self {
    item.0
  }
}
