use std::collections::BTreeMap;

use log::{debug, info};

use crate::aggregator::{TrackAggregator, TrackEvents};
use crate::error::{Error, Result};
use crate::event::TrackIndex;
use crate::sequence::{CompileOptions, Sequence, TrackId};

/// General MIDI program number.
pub type Instrument = u8;

#[derive(Debug, PartialEq, Clone)]
pub struct CompiledTrack {
  pub id: TrackId,
  pub index: TrackIndex,
  pub instrument: Instrument,
  pub events: TrackEvents,
}

/// Registered tracks plus the sequences every chain starts from.
#[derive(Debug, Default)]
pub struct Composition {
  tracks: Vec<(TrackId, Instrument)>,
  roots: Vec<Sequence>,
}

impl Composition {
  pub fn new() -> Composition {
    Composition::default()
  }

  pub fn register_track<T>(&mut self, id: T, instrument: Instrument) -> Result<()>
  where
    T: Into<TrackId>,
  {
    let id = id.into();
    if self.position(&id).is_some() {
      return Err(Error::DuplicateTrack { track: id });
    }
    debug!("Registered track {:?} with instrument {}", id, instrument);
    self.tracks.push((id, instrument));
    Ok(())
  }

  /// Adds a sequence that starts at the beginning of the composition and
  /// returns it, so that chaining can continue from it.
  pub fn attach_root_sequence(&mut self, sequence: Sequence) -> Result<Sequence> {
    if let Some(unknown) = sequence
      .walk()
      .into_iter()
      .map(|sequence| sequence.track())
      .find(|track| self.position(track).is_none())
    {
      return Err(Error::UnknownTrack { track: unknown });
    }
    self.roots.push(sequence.clone());
    Ok(sequence)
  }

  pub fn tracks(&self) -> &[(TrackId, Instrument)] {
    self.tracks.as_slice()
  }

  pub fn instrument(&self, id: &str) -> Option<Instrument> {
    self
      .position(id)
      .map(|position| self.tracks[position].1)
  }

  pub fn roots(&self) -> &[Sequence] {
    self.roots.as_slice()
  }

  pub fn compile(&self) -> Result<Vec<CompiledTrack>> {
    self.compile_with(&CompileOptions::default())
  }

  /// Compiles every root from the start of the composition and groups the
  /// events by track, in registration order. Events keep absolute musical
  /// times and are tagged with their track index.
  pub fn compile_with(&self, options: &CompileOptions) -> Result<Vec<CompiledTrack>> {
    let mut aggregator = TrackAggregator::with_tracks(self.tracks.iter().map(|(id, _)| id.clone()));

    for root in self.roots.iter() {
      let compiled = root.compile_with(0.0, 0.0, options)?;
      if let Some((unknown, _)) = compiled.iter().find(|(track, _)| !aggregator.contains(track)) {
        return Err(Error::UnknownTrack {
          track: unknown.clone(),
        });
      }
      aggregator.extend(compiled);
    }

    let compiled: Vec<CompiledTrack> = aggregator
      .into_tracks()
      .into_iter()
      .zip(self.tracks.iter())
      .enumerate()
      .map(|(index, ((id, events), (_, instrument)))| CompiledTrack {
        id,
        index,
        instrument: *instrument,
        events: events.into_iter().map(|event| event.on_track(index)).collect(),
      })
      .collect();

    info!(
      "Compiled {} sequences into {} tracks",
      self.roots.len(),
      compiled.len()
    );

    Ok(compiled)
  }

  pub fn compile_map(&self) -> Result<BTreeMap<TrackId, TrackEvents>> {
    Ok(
      self
        .compile()?
        .into_iter()
        .map(|track| (track.id, track.events))
        .collect(),
    )
  }

  fn position(&self, id: &str) -> Option<usize> {
    self.tracks.iter().position(|(track, _)| track == id)
  }
}

#[cfg(test)]
mod test {

  use super::Composition;
  use crate::error::Error;
  use crate::event::Event;
  use crate::note::{Anchor, Note, Pitch};
  use crate::sequence::Sequence;

  fn notes() -> Vec<Note> {
    vec![
      Note::new(Pitch::new(0, 4), 64, 0.25, 0.0, Anchor::Start),
      Note::new(Pitch::new(4, 4), 64, 0.25, 0.0, Anchor::End),
    ]
  }

  #[test]
  pub fn register_track_twice() {
    let mut composition = Composition::new();
    assert!(composition.register_track("p", 0).is_ok());
    assert_eq!(
      composition.register_track("p", 1),
      Err(Error::DuplicateTrack {
        track: "p".to_string()
      })
    );
    assert_eq!(composition.tracks(), &[("p".to_string(), 0)]);
    assert_eq!(composition.instrument("p"), Some(0));
    assert_eq!(composition.instrument("q"), None);
  }

  #[test]
  pub fn attach_unknown_track() {
    let mut composition = Composition::new();
    composition.register_track("p", 0).unwrap();

    let result = composition.attach_root_sequence(Sequence::new(notes(), "q"));
    assert_eq!(
      result,
      Err(Error::UnknownTrack {
        track: "q".to_string()
      })
    );
    assert!(composition.roots().is_empty());
  }

  #[test]
  /// Sequences already chained to the root are checked too
  pub fn attach_unknown_track_in_chain() {
    let mut composition = Composition::new();
    composition.register_track("p", 0).unwrap();
    let root = Sequence::new(notes(), "p");
    root.chain(&Sequence::new(notes(), "q")).unwrap();

    assert!(composition.attach_root_sequence(root).is_err());
    assert!(composition.roots().is_empty());
  }

  #[test]
  pub fn attach_returns_same_sequence() {
    let mut composition = Composition::new();
    composition.register_track("p", 0).unwrap();
    let sequence = Sequence::new(notes(), "p");
    let attached = composition.attach_root_sequence(sequence.clone()).unwrap();
    assert_eq!(attached, sequence);
    assert_eq!(composition.roots(), &[sequence]);
  }

  #[test]
  /// Independent roots on the same track start at zero and concatenate in root order
  pub fn compile_many_roots_same_track() {
    let mut composition = Composition::new();
    composition.register_track("p", 0).unwrap();
    let first = composition
      .attach_root_sequence(Sequence::new(notes(), "p"))
      .unwrap();
    first.chain(&Sequence::new(notes(), "p")).unwrap();
    composition
      .attach_root_sequence(Sequence::new(notes(), "p").with_delay(0.125))
      .unwrap();

    let tracks = composition.compile().unwrap();
    assert_eq!(tracks.len(), 1);
    let times: Vec<f64> = tracks[0].events.iter().map(|event| event.time).collect();
    assert_eq!(
      times,
      vec![0.0, 0.25, 0.25, 0.5, 0.5, 0.75, 0.75, 1.0, 0.125, 0.375, 0.375, 0.625]
    );
  }

  #[test]
  pub fn compile_tracks_in_registration_order() {
    let mut composition = Composition::new();
    composition.register_track("bass", 33).unwrap();
    composition.register_track("piano", 0).unwrap();
    composition.register_track("silent", 48).unwrap();
    let piano = composition
      .attach_root_sequence(Sequence::new(notes(), "piano"))
      .unwrap();
    piano.chain(&Sequence::new(notes(), "bass")).unwrap();

    let tracks = composition.compile().unwrap();
    let ids: Vec<&str> = tracks.iter().map(|track| track.id.as_str()).collect();
    assert_eq!(ids, vec!["bass", "piano", "silent"]);
    assert_eq!(tracks[0].instrument, 33);
    assert_eq!(tracks[0].events[0], Event::note_on(0.5, 60, 64).on_track(0));
    assert_eq!(tracks[1].index, 1);
    assert!(tracks[1].events.iter().all(|event| event.track == Some(1)));
    assert!(tracks[2].events.is_empty());
  }

  #[test]
  /// A sequence chained after attaching still needs a registered track
  pub fn compile_unknown_track_chained_later() {
    let mut composition = Composition::new();
    composition.register_track("p", 0).unwrap();
    let root = composition
      .attach_root_sequence(Sequence::new(notes(), "p"))
      .unwrap();
    root.chain(&Sequence::new(notes(), "late")).unwrap();

    assert_eq!(
      composition.compile(),
      Err(Error::UnknownTrack {
        track: "late".to_string()
      })
    );
  }

  #[test]
  pub fn compile_map() {
    let mut composition = Composition::new();
    composition.register_track("b", 0).unwrap();
    composition.register_track("a", 0).unwrap();
    composition
      .attach_root_sequence(Sequence::new(notes(), "a"))
      .unwrap();

    let map = composition.compile_map().unwrap();
    assert_eq!(map.len(), 2);
    assert!(map["b"].is_empty());
    assert_eq!(map["a"].len(), 4);
  }
}
