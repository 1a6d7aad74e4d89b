use log::info;

use notechain_core::composition::Instrument;
use notechain_core::event::{Key, TrackIndex};
use notechain_core::note::Velocity;
use notechain_core::player::Synth;

/// Logs every call instead of making sound.
pub struct LogSynth;

impl Synth for LogSynth {
  fn program_select(&mut self, channel: TrackIndex, instrument: Instrument) {
    info!("[{:02}] program {}", channel, instrument);
  }

  fn note_on(&mut self, channel: TrackIndex, key: Key, velocity: Velocity) {
    info!("[{:02}] on  {:3} {:3}", channel, key, velocity);
  }

  fn note_off(&mut self, channel: TrackIndex, key: Key) {
    info!("[{:02}] off {:3}", channel, key);
  }

  fn all_notes_off(&mut self, channel: TrackIndex) {
    info!("[{:02}] all notes off", channel);
  }
}
