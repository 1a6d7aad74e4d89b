use std::collections::HashMap;

use crate::event::Event;
use crate::note::NoteTime;
use crate::sequence::TrackId;

pub type TrackEvents = Vec<Event<NoteTime>>;

/// Groups compiled event lists by track, keeping tracks in the order they
/// were first seen and each track's lists in the order they arrived.
#[derive(Debug, Default)]
pub struct TrackAggregator {
  index: HashMap<TrackId, usize>,
  tracks: Vec<(TrackId, TrackEvents)>,
}

impl TrackAggregator {
  pub fn new() -> TrackAggregator {
    TrackAggregator::default()
  }

  /// Starts with the given tracks, in that order, even if no events arrive for them.
  pub fn with_tracks<I, T>(ids: I) -> TrackAggregator
  where
    I: IntoIterator<Item = T>,
    T: Into<TrackId>,
  {
    let mut aggregator = TrackAggregator::new();
    for id in ids {
      aggregator.entry(id.into());
    }
    aggregator
  }

  pub fn push<T>(&mut self, track: T, events: TrackEvents) -> &mut Self
  where
    T: Into<TrackId>,
  {
    self.entry(track.into()).extend(events);
    self
  }

  pub fn extend<I>(&mut self, compiled: I) -> &mut Self
  where
    I: IntoIterator<Item = (TrackId, TrackEvents)>,
  {
    compiled.into_iter().for_each(|(track, events)| {
      self.push(track, events);
    });
    self
  }

  pub fn contains(&self, track: &str) -> bool {
    self.index.contains_key(track)
  }

  pub fn len(&self) -> usize {
    self.tracks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tracks.is_empty()
  }

  pub fn into_tracks(self) -> Vec<(TrackId, TrackEvents)> {
    self.tracks
  }

  fn entry(&mut self, track: TrackId) -> &mut TrackEvents {
    let tracks = &mut self.tracks;
    let position = *self.index.entry(track.clone()).or_insert_with(|| {
      tracks.push((track, Vec::new()));
      tracks.len() - 1
    });
    &mut self.tracks[position].1
  }
}
