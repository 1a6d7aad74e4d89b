use crate::note::{Note, Velocity};

/// MIDI note number, not yet checked against the 7 bit range.
pub type Key = i32;

/// Position of a track in its composition, also used as the playback channel.
pub type TrackIndex = usize;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EventKind {
  NoteOn,
  NoteOff,
}

/// A note event whose `time` unit depends on the stage that produced it:
/// musical units while compiling, then seconds or ticks once normalized.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Event<T> {
  pub kind: EventKind,
  pub time: T,
  pub key: Key,
  pub velocity: Velocity,
  pub track: Option<TrackIndex>,
}

impl<T> Event<T> {
  pub fn note_on(time: T, key: Key, velocity: Velocity) -> Event<T> {
    Event {
      kind: EventKind::NoteOn,
      time,
      key,
      velocity,
      track: None,
    }
  }

  pub fn note_off(time: T, key: Key, velocity: Velocity) -> Event<T> {
    Event {
      kind: EventKind::NoteOff,
      time,
      key,
      velocity,
      track: None,
    }
  }

  /// The pair of events a note produces when it starts at `start`.
  pub fn from_note(note: &Note, start: T, end: T) -> (Event<T>, Event<T>) {
    (
      Event::note_on(start, note.to_midi(), note.velocity()),
      Event::note_off(end, note.to_midi(), note.velocity()),
    )
  }

  pub fn with_time<U>(&self, time: U) -> Event<U> {
    Event {
      kind: self.kind,
      time,
      key: self.key,
      velocity: self.velocity,
      track: self.track,
    }
  }

  pub fn map_time<U, F>(&self, f: F) -> Event<U>
  where
    F: FnOnce(&T) -> U,
  {
    self.with_time(f(&self.time))
  }

  pub fn on_track(self, track: TrackIndex) -> Event<T> {
    Event {
      track: Some(track),
      ..self
    }
  }
}
