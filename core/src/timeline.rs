use std::cmp::Ordering;
use std::thread;

use log::{debug, warn};

use crate::event::Event;
use crate::note::NoteTime;
use crate::time::{Seconds, Tempo, TicksPerBeat, TicksTime, DEFAULT_TICKS_PER_BEAT};

/// Sorts by time keeping the insertion order of simultaneous events, so that
/// a note off is never moved after a note on sharing its instant.
pub fn sort_stable(events: &mut [Event<NoteTime>]) {
  events.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(Ordering::Equal));
}

/// Absolute times into the time elapsed since the previous event.
pub fn to_relative(events: &[Event<NoteTime>]) -> Vec<Event<NoteTime>> {
  let mut last_time = 0.0;
  events
    .iter()
    .map(|event| {
      let relative = event.with_time(event.time - last_time);
      last_time = event.time;
      relative
    })
    .collect()
}

pub fn to_seconds(events: &[Event<NoteTime>], tempo: Tempo) -> Vec<Event<Seconds>> {
  events
    .iter()
    .map(|event| event.map_time(|time| tempo.to_seconds(*time)))
    .collect()
}

pub fn to_ticks(
  events: &[Event<Seconds>],
  tempo: Tempo,
  ticks_per_beat: TicksPerBeat,
) -> Vec<Event<TicksTime>> {
  events
    .iter()
    .map(|event| event.map_time(|seconds| TicksTime::from_seconds(*seconds, tempo, ticks_per_beat)))
    .collect()
}

/// Sorts one track's absolute events and turns them into relative seconds.
pub fn normalize(mut events: Vec<Event<NoteTime>>, tempo: Tempo) -> Vec<Event<Seconds>> {
  sort_stable(&mut events);
  to_seconds(&to_relative(&events), tempo)
}

/// Like [`normalize`], then quantized into relative ticks.
pub fn quantize(
  events: Vec<Event<NoteTime>>,
  tempo: Tempo,
  ticks_per_beat: TicksPerBeat,
) -> Vec<Event<TicksTime>> {
  to_ticks(&normalize(events, tempo), tempo, ticks_per_beat)
}

#[derive(Debug, PartialEq, Clone)]
pub enum Timeline {
  Seconds(Vec<Event<Seconds>>),
  Ticks(Vec<Event<TicksTime>>),
}

impl Timeline {
  pub fn len(&self) -> usize {
    match self {
      Timeline::Seconds(events) => events.len(),
      Timeline::Ticks(events) => events.len(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
  pub tempo: Tempo,
  pub ticks_per_beat: TicksPerBeat,
  pub quantize: bool,
}

impl Default for Normalizer {
  fn default() -> Self {
    Normalizer {
      tempo: Tempo::default(),
      ticks_per_beat: DEFAULT_TICKS_PER_BEAT,
      quantize: true,
    }
  }
}

impl Normalizer {
  pub fn new(tempo: Tempo, ticks_per_beat: TicksPerBeat, quantize: bool) -> Normalizer {
    Normalizer {
      tempo,
      ticks_per_beat,
      quantize,
    }
  }

  pub fn apply(&self, events: Vec<Event<NoteTime>>) -> Timeline {
    if self.quantize {
      Timeline::Ticks(quantize(events, self.tempo, self.ticks_per_beat))
    } else {
      Timeline::Seconds(normalize(events, self.tempo))
    }
  }

  /// Normalizes every track on its own thread. Results keep the input order.
  pub fn apply_all<K>(&self, tracks: Vec<(K, Vec<Event<NoteTime>>)>) -> Vec<(K, Timeline)> {
    let (tx, rx) = crossbeam_channel::unbounded::<(usize, Timeline)>();
    let normalizer = *self;
    let mut keys = Vec::with_capacity(tracks.len());

    thread::scope(|scope| {
      for (position, (key, events)) in tracks.into_iter().enumerate() {
        keys.push(key);
        let tx = tx.clone();
        scope.spawn(move || {
          drop(tx.send((position, normalizer.apply(events))));
        });
      }
    });
    drop(tx);

    let mut timelines: Vec<Option<Timeline>> = keys.iter().map(|_| None).collect();
    for (position, timeline) in rx.iter() {
      timelines[position] = Some(timeline);
    }
    debug!("Normalized {} tracks", keys.len());

    keys
      .into_iter()
      .zip(timelines)
      .map(|(key, timeline)| {
        let timeline = timeline.unwrap_or_else(|| {
          warn!("A track was lost while normalizing");
          Timeline::Seconds(Vec::new())
        });
        (key, timeline)
      })
      .collect()
  }
}
