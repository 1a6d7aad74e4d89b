pub mod pitch;

pub use self::pitch::{pitch_class, pitch_names, Octave, Pitch, PitchClass};

use std::ops::{Add, Sub};

/// Time expressed as a fraction of a whole note (1/4 is a quarter note).
pub type NoteTime = f64;

pub type Velocity = u8;

pub const DEFAULT_VELOCITY: Velocity = 64;

/// Where a delay is measured from: the start or the end of whatever came before.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Anchor {
  Start,
  End,
}

impl Anchor {
  pub fn is_start(self) -> bool {
    self == Anchor::Start
  }
}

impl From<bool> for Anchor {
  fn from(start: bool) -> Self {
    if start {
      Anchor::Start
    } else {
      Anchor::End
    }
  }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Note {
  pitch: Pitch,
  velocity: Velocity,
  duration: NoteTime,
  delay: NoteTime,
  anchor: Anchor,
}

impl Note {
  pub fn new(
    pitch: Pitch,
    velocity: Velocity,
    duration: NoteTime,
    delay: NoteTime,
    anchor: Anchor,
  ) -> Note {
    Note {
      pitch,
      velocity,
      duration,
      delay,
      anchor,
    }
  }

  pub fn pitch(&self) -> Pitch {
    self.pitch
  }

  pub fn class(&self) -> PitchClass {
    self.pitch.class()
  }

  pub fn octave(&self) -> Octave {
    self.pitch.octave()
  }

  pub fn to_midi(&self) -> i32 {
    self.pitch.to_midi()
  }

  pub fn velocity(&self) -> Velocity {
    self.velocity
  }

  pub fn duration(&self) -> NoteTime {
    self.duration
  }

  pub fn delay(&self) -> NoteTime {
    self.delay
  }

  pub fn anchor(&self) -> Anchor {
    self.anchor
  }

  pub fn with_delay(&self, delay: NoteTime) -> Note {
    Note { delay, ..*self }
  }
}

impl Add<i32> for Note {
  type Output = Note;

  fn add(self, semitones: i32) -> Note {
    Note {
      pitch: self.pitch + semitones,
      ..self
    }
  }
}

impl Sub<i32> for Note {
  type Output = Note;

  fn sub(self, semitones: i32) -> Note {
    Note {
      pitch: self.pitch - semitones,
      ..self
    }
  }
}

#[cfg(test)]
mod test {

  use super::{Anchor, Note, Pitch};

  #[test]
  /// Transposing a note keeps its timing
  pub fn add_keeps_timing() {
    let note = Note::new(Pitch::new(11, 3), 100, 0.5, 0.25, Anchor::End);
    let transposed = note + 2;
    assert_eq!(transposed.pitch(), Pitch::new(1, 4));
    assert_eq!(transposed.velocity(), 100);
    assert_eq!(transposed.duration(), 0.5);
    assert_eq!(transposed.delay(), 0.25);
    assert_eq!(transposed.anchor(), Anchor::End);
    assert_eq!(transposed - 2, note);
  }

  #[test]
  pub fn eq_is_structural() {
    let note = Note::new(Pitch::new(0, 3), 64, 1.0, 0.0, Anchor::Start);
    assert_eq!(note, Note::new(Pitch::new(12, 2), 64, 1.0, 0.0, Anchor::Start));
    assert_ne!(note, Note::new(Pitch::new(0, 3), 64, 1.0, 0.0, Anchor::End));
    assert_ne!(note, note.with_delay(1.0));
  }

  #[test]
  pub fn anchor_from_bool() {
    assert_eq!(Anchor::from(true), Anchor::Start);
    assert_eq!(Anchor::from(false), Anchor::End);
  }
}
