use notechain_core::chord::{Chord, ChordPlayer, PerNote, DEFAULT_OCTAVE};
use notechain_core::{Anchor, Composition, NoteTime, Result, Sequence};

pub const PIANO: &str = "piano";

fn strike(chord: &str, duration: NoteTime) -> Result<Sequence> {
  let chord = Chord::parse(chord, DEFAULT_OCTAVE)?;
  let notes = ChordPlayer::new().duration(duration).play_chord(&chord)?;
  Ok(Sequence::new(notes, PIANO))
}

fn arpeggio(chord: &str, duration: NoteTime, order: Option<Vec<usize>>) -> Result<Sequence> {
  let chord = Chord::parse(chord, DEFAULT_OCTAVE)?;
  let mut player = ChordPlayer::new()
    .duration(duration)
    .anchor(PerNote::All(Anchor::End));
  if let Some(order) = order {
    player = player.order(order);
  }
  Ok(Sequence::new(player.play_chord(&chord)?, PIANO))
}

/// A short piano progression over E, D and Am.
pub fn composition() -> Result<Composition> {
  let mut composition = Composition::new();
  composition.register_track(PIANO, 0)?;

  let eighth = 1.0 / 8.0;
  let quarter = 1.0 / 4.0;

  let mut last = composition.attach_root_sequence(strike("E", quarter)?)?;
  last = last.chain(&arpeggio("E", eighth, None)?)?;
  last = last.chain(&strike("D", quarter)?)?;
  last = last.chain(&arpeggio("D", eighth, None)?)?;
  last = last.chain(&strike("Am", quarter)?)?;
  last = last.chain(&arpeggio("Am", eighth, Some([0, 1, 2, 1].repeat(2)))?)?;
  last = last.chain(&strike("E", quarter + eighth)?)?;
  last = last.chain(&strike("D", quarter + eighth)?)?;
  last.chain(&strike("Am", quarter + eighth)?)?;

  Ok(composition)
}
