use crate::error::{Error, Result};
use crate::note::{Anchor, Note, NoteTime, Octave, Pitch, Velocity, DEFAULT_VELOCITY};

pub const DEFAULT_OCTAVE: Octave = 3;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ChordQuality {
  Major,
  Minor,
}

impl ChordQuality {
  fn third(self) -> i32 {
    match self {
      ChordQuality::Major => 4,
      ChordQuality::Minor => 3,
    }
  }
}

#[derive(Debug, Clone, Copy)]
pub struct ChordOptions {
  /// Order the pitches by MIDI number.
  pub sorted: bool,
  /// Put every pitch on the octave of the tonic.
  pub normalized: bool,
}

impl Default for ChordOptions {
  fn default() -> Self {
    ChordOptions {
      sorted: true,
      normalized: true,
    }
  }
}

/// A triad built on a tonic.
#[derive(Debug, PartialEq, Clone)]
pub struct Chord {
  tonic: Pitch,
  quality: ChordQuality,
  pitches: Vec<Pitch>,
}

impl Chord {
  pub fn new(tonic: Pitch, quality: ChordQuality, options: ChordOptions) -> Chord {
    let mut pitches = vec![tonic, tonic + quality.third(), tonic + 7];
    if options.sorted {
      pitches.sort_by_key(Pitch::to_midi);
    }
    if options.normalized {
      pitches = pitches
        .into_iter()
        .map(|pitch| pitch.with_octave(tonic.octave()))
        .collect();
    }
    Chord {
      tonic,
      quality,
      pitches,
    }
  }

  /// Parses chords like `C`, `F#` or `Bbm`: a note name optionally followed by
  /// `m` for minor.
  pub fn parse(spec: &str, octave: Octave) -> Result<Chord> {
    Self::parse_with(spec, octave, ChordOptions::default())
  }

  pub fn parse_with(spec: &str, octave: Octave, options: ChordOptions) -> Result<Chord> {
    let name_len = spec
      .char_indices()
      .skip(1)
      .find(|(_, c)| *c != '#' && *c != 'b')
      .map(|(index, _)| index)
      .unwrap_or_else(|| spec.len());
    let (name, suffix) = spec.split_at(name_len);

    let quality = match suffix {
      "" => ChordQuality::Major,
      "m" => ChordQuality::Minor,
      _ => {
        return Err(Error::MalformedChordSpec {
          spec: spec.to_string(),
          cause: format!("unsupported quality {:?}", suffix),
        })
      }
    };

    let tonic = Pitch::from_name(name, octave)?;
    Ok(Chord::new(tonic, quality, options))
  }

  pub fn tonic(&self) -> Pitch {
    self.tonic
  }

  pub fn quality(&self) -> ChordQuality {
    self.quality
  }

  pub fn pitches(&self) -> &[Pitch] {
    self.pitches.as_slice()
  }

  pub fn len(&self) -> usize {
    self.pitches.len()
  }

  pub fn is_empty(&self) -> bool {
    self.pitches.is_empty()
  }
}

/// A note parameter given either once for every note or note by note.
#[derive(Debug, Clone)]
pub enum PerNote<T> {
  All(T),
  Each(Vec<T>),
}

impl<T: Copy> PerNote<T> {
  fn get(&self, index: usize, name: &str) -> Result<T> {
    match self {
      PerNote::All(value) => Ok(*value),
      PerNote::Each(values) => values.get(index).copied().ok_or_else(|| Error::MalformedChordSpec {
        spec: name.to_string(),
        cause: format!("no value for note {}", index),
      }),
    }
  }
}

impl<T> From<T> for PerNote<T> {
  fn from(value: T) -> Self {
    PerNote::All(value)
  }
}

/// Turns pitches into notes, the way a player would strike or arpeggiate a chord.
#[derive(Debug, Clone)]
pub struct ChordPlayer {
  duration: PerNote<NoteTime>,
  delay: PerNote<NoteTime>,
  anchor: PerNote<Anchor>,
  velocity: PerNote<Velocity>,
  order: Option<Vec<usize>>,
}

impl Default for ChordPlayer {
  fn default() -> Self {
    ChordPlayer {
      duration: PerNote::All(1.0),
      delay: PerNote::All(0.0),
      anchor: PerNote::All(Anchor::Start),
      velocity: PerNote::All(DEFAULT_VELOCITY),
      order: None,
    }
  }
}

impl ChordPlayer {
  pub fn new() -> ChordPlayer {
    ChordPlayer::default()
  }

  pub fn duration<T: Into<PerNote<NoteTime>>>(mut self, duration: T) -> Self {
    self.duration = duration.into();
    self
  }

  pub fn delay<T: Into<PerNote<NoteTime>>>(mut self, delay: T) -> Self {
    self.delay = delay.into();
    self
  }

  pub fn anchor<T: Into<PerNote<Anchor>>>(mut self, anchor: T) -> Self {
    self.anchor = anchor.into();
    self
  }

  pub fn velocity<T: Into<PerNote<Velocity>>>(mut self, velocity: T) -> Self {
    self.velocity = velocity.into();
    self
  }

  /// Indices into the chord to play, in order. Indices may repeat.
  pub fn order(mut self, order: Vec<usize>) -> Self {
    self.order = Some(order);
    self
  }

  pub fn play_chord(&self, chord: &Chord) -> Result<Vec<Note>> {
    self.play(chord.pitches())
  }

  pub fn play(&self, pitches: &[Pitch]) -> Result<Vec<Note>> {
    let order = self
      .order
      .clone()
      .unwrap_or_else(|| (0..pitches.len()).collect());

    order
      .iter()
      .enumerate()
      .map(|(i, pitch_index)| -> Result<Note> {
        let pitch = pitches
          .get(*pitch_index)
          .copied()
          .ok_or_else(|| Error::MalformedChordSpec {
            spec: "order".to_string(),
            cause: format!("index {} is out of {} pitches", pitch_index, pitches.len()),
          })?;
        Ok(Note::new(
          pitch,
          self.velocity.get(i, "velocity")?,
          self.duration.get(i, "duration")?,
          self.delay.get(i, "delay")?,
          self.anchor.get(i, "anchor")?,
        ))
      })
      .collect()
  }
}
