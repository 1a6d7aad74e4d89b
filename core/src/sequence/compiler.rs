use log::trace;

use serde_derive::Deserialize;

use crate::error::{Error, Result};
use crate::event::Event;
use crate::note::{Note, NoteTime};

use super::{Sequence, TrackId};

/// Events of every compiled sequence, paired with their track, in depth-first order.
pub type Compiled = Vec<(TrackId, Vec<Event<NoteTime>>)>;

/// What to do with negative delays, in notes as well as in sequences.
#[derive(Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum DelayPolicy {
  /// Use them as they are, events may start before their anchor.
  Allow,
  /// Treat them as zero.
  Clamp,
  /// Fail with `NegativeDelay`.
  Reject,
}

impl Default for DelayPolicy {
  fn default() -> Self {
    DelayPolicy::Allow
  }
}

impl DelayPolicy {
  fn apply(self, delay: NoteTime, track: &str) -> Result<NoteTime> {
    match self {
      DelayPolicy::Allow => Ok(delay),
      DelayPolicy::Clamp => Ok(delay.max(0.0)),
      DelayPolicy::Reject if delay < 0.0 => Err(Error::NegativeDelay {
        track: track.to_string(),
        delay,
      }),
      DelayPolicy::Reject => Ok(delay),
    }
  }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CompileOptions {
  pub delay_policy: DelayPolicy,
}

impl CompileOptions {
  pub fn new(delay_policy: DelayPolicy) -> CompileOptions {
    CompileOptions { delay_policy }
  }
}

/// Lays out notes relative to the start of their sequence.
///
/// A note starts `delay` after the end of the previous one, or after its
/// start when the note is anchored to the start. The first note starts at
/// its own delay.
fn local_events(
  notes: &[Note],
  policy: DelayPolicy,
  track: &str,
) -> Result<(Vec<Event<NoteTime>>, NoteTime)> {
  let mut events = Vec::with_capacity(notes.len() * 2);
  let mut time: NoteTime = 0.0;
  let mut previous: Option<&Note> = None;

  for note in notes {
    let delay = policy.apply(note.delay(), track)?;
    let start = match previous {
      None => delay,
      Some(previous) if note.anchor().is_start() => time + delay - previous.duration(),
      Some(_) => time + delay,
    };
    time = start + note.duration();

    let (note_on, note_off) = Event::from_note(note, start, time);
    events.push(note_on);
    events.push(note_off);
    previous = Some(note);
  }

  Ok((events, time))
}

impl Sequence {
  /// Events of this sequence's own notes, with times relative to its start,
  /// and the duration of the sequence.
  pub fn to_local_events(&self) -> (Vec<Event<NoteTime>>, NoteTime) {
    let node = self.read();
    local_events(&node.notes, DelayPolicy::Allow, &node.track).unwrap_or_default()
  }

  /// Compiles this sequence and every sequence after it into absolute times,
  /// given the start and end of the sequence that came before.
  pub fn compile(&self, last_start: NoteTime, last_end: NoteTime) -> Compiled {
    self
      .compile_with(last_start, last_end, &CompileOptions::default())
      .unwrap_or_default()
  }

  pub fn compile_with(
    &self,
    last_start: NoteTime,
    last_end: NoteTime,
    options: &CompileOptions,
  ) -> Result<Compiled> {
    let policy = options.delay_policy;
    let mut results = Compiled::new();
    let mut pending = vec![(self.clone(), last_start, last_end)];

    while let Some((sequence, last_start, last_end)) = pending.pop() {
      let node = sequence.read();

      let (events, duration) = local_events(&node.notes, policy, &node.track)?;
      let anchor_time = if node.anchor.is_start() {
        last_start
      } else {
        last_end
      };
      let start = anchor_time + policy.apply(node.delay, &node.track)?;
      let end = start + duration;

      trace!(
        "Compiled {} notes of track {:?} into [{}, {})",
        node.notes.len(),
        node.track,
        start,
        end
      );

      let events = events
        .iter()
        .map(|event| event.map_time(|time| time + start))
        .collect();
      results.push((node.track.clone(), events));

      pending.extend(node.next.iter().rev().map(|next| (next.clone(), start, end)));
    }

    Ok(results)
  }
}
