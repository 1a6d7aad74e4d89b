use crate::note::NoteTime;

pub type Seconds = f64;

pub const DEFAULT_TEMPO: f64 = 120.0;

const SECONDS_PER_MINUTE: f64 = 60.0;

/// Quarter notes in a whole note, the unit musical time is expressed in.
const BEATS_PER_WHOLE_NOTE: f64 = 4.0;

/// Beats per minute, where a beat is a quarter note.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Tempo(f64);

impl Tempo {
  pub fn new(value: f64) -> Tempo {
    Tempo(value)
  }

  pub fn get_value(&self) -> f64 {
    self.0
  }

  pub fn seconds_per_beat(&self) -> Seconds {
    SECONDS_PER_MINUTE / self.0
  }

  /// Musical time (fractions of a whole note) into seconds.
  pub fn to_seconds(&self, time: NoteTime) -> Seconds {
    time * BEATS_PER_WHOLE_NOTE * self.seconds_per_beat()
  }

  /// Seconds back into musical time.
  pub fn to_musical(&self, seconds: Seconds) -> NoteTime {
    seconds / (BEATS_PER_WHOLE_NOTE * self.seconds_per_beat())
  }
}

impl Default for Tempo {
  fn default() -> Self {
    Tempo(DEFAULT_TEMPO)
  }
}

impl From<Tempo> for f64 {
  fn from(item: Tempo) -> Self {
    item.0
  }
}
