use failure::Fail;

#[derive(Debug, Fail, PartialEq)]
pub enum Error {
  #[fail(display = "Unknown pitch name: {:?}", name)]
  InvalidPitchName { name: String },

  #[fail(display = "The track {:?} already exists", track)]
  DuplicateTrack { track: String },

  #[fail(display = "The track {:?} does not exist", track)]
  UnknownTrack { track: String },

  #[fail(display = "Malformed chord spec {:?}: {}", spec, cause)]
  MalformedChordSpec { spec: String, cause: String },

  #[fail(display = "Chaining a sequence of track {:?} would create a cycle", track)]
  CyclicSequence { track: String },

  #[fail(display = "Negative delay {} in a sequence of track {:?}", delay, track)]
  NegativeDelay { track: String, delay: f64 },

  #[fail(display = "MIDI {} {} is out of the 0..=127 range", what, value)]
  MidiOutOfRange { what: String, value: i32 },
}

pub type Result<T> = std::result::Result<T, Error>;
