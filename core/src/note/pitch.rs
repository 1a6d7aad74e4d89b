use std::ops::{Add, Sub};

use crate::error::{Error, Result};

pub type PitchClass = u8;
pub type Octave = i32;

pub const CLASSES_PER_OCTAVE: i32 = 12;

const NAMES: [(&str, PitchClass); 17] = [
  ("C", 0),
  ("C#", 1),
  ("Db", 1),
  ("D", 2),
  ("D#", 3),
  ("Eb", 3),
  ("E", 4),
  ("F", 5),
  ("F#", 6),
  ("Gb", 6),
  ("G", 7),
  ("G#", 8),
  ("Ab", 8),
  ("A", 9),
  ("A#", 10),
  ("Bb", 10),
  ("B", 11),
];

/// Looks up the pitch class for a note name such as `C#` or `Bb`.
pub fn pitch_class(name: &str) -> Option<PitchClass> {
  NAMES
    .iter()
    .find(|(candidate, _)| *candidate == name)
    .map(|(_, class)| *class)
}

/// All the note names known by [`pitch_class`], sharps and flats included.
pub fn pitch_names() -> impl Iterator<Item = &'static str> {
  NAMES.iter().map(|(name, _)| *name)
}

/// A pitch class together with its octave, always normalized so that the
/// class falls in `[0, 12)`.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Pitch {
  class: PitchClass,
  octave: Octave,
}

impl Pitch {
  pub fn new(class: i32, octave: Octave) -> Pitch {
    let carry = class.div_euclid(CLASSES_PER_OCTAVE);
    Pitch {
      class: class.rem_euclid(CLASSES_PER_OCTAVE) as PitchClass,
      octave: octave + carry,
    }
  }

  pub fn from_name(name: &str, octave: Octave) -> Result<Pitch> {
    pitch_class(name)
      .map(|class| Pitch::new(i32::from(class), octave))
      .ok_or_else(|| Error::InvalidPitchName {
        name: name.to_string(),
      })
  }

  pub fn class(&self) -> PitchClass {
    self.class
  }

  pub fn octave(&self) -> Octave {
    self.octave
  }

  pub fn with_octave(&self, octave: Octave) -> Pitch {
    Pitch {
      class: self.class,
      octave,
    }
  }

  /// MIDI note number, where C-1 is 0 and C4 is 60.
  pub fn to_midi(&self) -> i32 {
    (self.octave + 1) * CLASSES_PER_OCTAVE + i32::from(self.class)
  }
}

impl Add<i32> for Pitch {
  type Output = Pitch;

  fn add(self, semitones: i32) -> Pitch {
    Pitch::new(i32::from(self.class) + semitones, self.octave)
  }
}

impl Sub<i32> for Pitch {
  type Output = Pitch;

  fn sub(self, semitones: i32) -> Pitch {
    self + (-semitones)
  }
}
