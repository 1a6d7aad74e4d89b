use std::thread;
use std::thread::JoinHandle;

use log::{debug, info, trace, warn};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::composition::{CompiledTrack, Instrument};
use crate::error::Result;
use crate::event::{Event, EventKind, Key, TrackIndex};
use crate::midi::{self, data_byte, types::U4, Message, MidiSink};
use crate::note::{NoteTime, Velocity};
use crate::time::{ClockTime, Seconds, Tempo};
use crate::timeline::normalize;

/// MIDI has 16 channels, higher track indices share them.
pub const MIDI_CHANNELS: TrackIndex = 16;

/// Whatever makes the sound. Channels are track indices.
pub trait Synth {
  fn program_select(&mut self, channel: TrackIndex, instrument: Instrument);
  fn note_on(&mut self, channel: TrackIndex, key: Key, velocity: Velocity);
  fn note_off(&mut self, channel: TrackIndex, key: Key);
  fn all_notes_off(&mut self, _channel: TrackIndex) {}
}

/// Waits between events. Returns `true` when `stop` fired during the wait.
pub trait Sleeper {
  fn sleep(&mut self, time: ClockTime, stop: &Receiver<()>) -> bool;
}

pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
  fn sleep(&mut self, time: ClockTime, stop: &Receiver<()>) -> bool {
    match stop.recv_timeout(time.to_duration()) {
      Ok(()) => true,
      Err(RecvTimeoutError::Disconnected) => true,
      Err(RecvTimeoutError::Timeout) => false,
    }
  }
}

/// A synth that sends the encoded MIDI messages to a sink.
///
/// Track indices are folded into the 16 MIDI channels, so track 16 plays on
/// channel 0 together with track 0. Notes outside the MIDI range are dropped
/// with a warning.
pub struct MidiOutSynth<S: MidiSink> {
  sink: S,
}

impl<S: MidiSink> MidiOutSynth<S> {
  pub fn new(sink: S) -> MidiOutSynth<S> {
    MidiOutSynth { sink }
  }

  pub fn into_sink(self) -> S {
    self.sink
  }

  fn channel(channel: TrackIndex) -> U4 {
    if channel >= MIDI_CHANNELS {
      warn!(
        "Track {} shares MIDI channel {} with other tracks",
        channel,
        channel % MIDI_CHANNELS
      );
    }
    (channel % MIDI_CHANNELS) as U4
  }

  fn send(&mut self, msg: Result<Message>) {
    match msg {
      Ok(msg) => midi::send_message(&mut self.sink, &msg),
      Err(err) => warn!("Dropping MIDI message: {}", err),
    }
  }
}

impl<S: MidiSink> Synth for MidiOutSynth<S> {
  fn program_select(&mut self, channel: TrackIndex, instrument: Instrument) {
    let msg = Message::program_change(Self::channel(channel), instrument);
    self.send(msg);
  }

  fn note_on(&mut self, channel: TrackIndex, key: Key, velocity: Velocity) {
    let msg = Message::note_on(Self::channel(channel), key, velocity);
    self.send(msg);
  }

  fn note_off(&mut self, channel: TrackIndex, key: Key) {
    let msg = Message::note_off(Self::channel(channel), key, 0);
    self.send(msg);
  }

  fn all_notes_off(&mut self, channel: TrackIndex) {
    let msg = Message::AllNotesOff {
      channel: Self::channel(channel),
    };
    self.send(Ok(msg));
  }
}

/// All the tracks in a single list, every event tagged with its track index.
pub fn merge_tracks(tracks: &[CompiledTrack]) -> Vec<Event<NoteTime>> {
  tracks
    .iter()
    .flat_map(|track| {
      track
        .events
        .iter()
        .map(move |event| event.on_track(track.index))
    })
    .collect()
}

#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub struct PlaybackStats {
  pub passes: u32,
  pub events: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct Player {
  pub tempo: Tempo,
  pub looping: bool,
}

impl Player {
  pub fn new(tempo: Tempo, looping: bool) -> Player {
    Player { tempo, looping }
  }

  /// Plays the tracks waiting between events. When looping, starts over at
  /// the end until `stop` receives a message or its sender goes away.
  ///
  /// Fails before playing anything if a key or velocity does not fit in MIDI.
  pub fn play<S, L>(
    &self,
    tracks: &[CompiledTrack],
    synth: &mut S,
    sleeper: &mut L,
    stop: &Receiver<()>,
  ) -> Result<PlaybackStats>
  where
    S: Synth + ?Sized,
    L: Sleeper + ?Sized,
  {
    let timeline = normalize(merge_tracks(tracks), self.tempo);
    for event in timeline.iter() {
      data_byte("key", event.key)?;
      data_byte("velocity", i32::from(event.velocity))?;
    }

    for track in tracks.iter() {
      synth.program_select(track.index, track.instrument);
    }

    let total: Seconds = timeline.iter().map(|event| event.time).sum();
    info!(
      "Playing {} events over {:.3} seconds{}",
      timeline.len(),
      total,
      if self.looping { " in a loop" } else { "" }
    );

    let mut stats = PlaybackStats::default();
    let mut stopped = false;
    'playback: loop {
      for event in timeline.iter() {
        if sleeper.sleep(ClockTime::from_seconds(event.time), stop) {
          stopped = true;
          break 'playback;
        }

        let channel = event.track.unwrap_or(0);
        trace!("{:?} {} on channel {}", event.kind, event.key, channel);
        match event.kind {
          EventKind::NoteOn => synth.note_on(channel, event.key, event.velocity),
          EventKind::NoteOff => synth.note_off(channel, event.key),
        }
        stats.events += 1;
      }
      stats.passes += 1;

      if !self.looping || timeline.is_empty() {
        break;
      }
    }

    if stopped {
      debug!("Playback stopped");
      tracks
        .iter()
        .for_each(|track| synth.all_notes_off(track.index));
    }

    Ok(stats)
  }

  /// Plays on its own thread, see [`Player::play`].
  pub fn spawn<S>(self, tracks: Vec<CompiledTrack>, mut synth: S) -> PlaybackHandle<S>
  where
    S: Synth + Send + 'static,
  {
    let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
    let thread = thread::Builder::new()
      .name("player".into())
      .spawn(move || {
        let stats = self.play(&tracks, &mut synth, &mut ThreadSleeper, &stop_rx);
        (stats, synth)
      });

    PlaybackHandle { stop_tx, thread }
  }
}

pub struct PlaybackHandle<S> {
  stop_tx: Sender<()>,
  thread: std::io::Result<JoinHandle<(Result<PlaybackStats>, S)>>,
}

impl<S> PlaybackHandle<S> {
  pub fn stop(&self) {
    drop(self.stop_tx.try_send(()));
  }

  /// Waits for the playback to finish. `None` if the thread could not be
  /// started or panicked.
  pub fn join(self) -> Option<(Result<PlaybackStats>, S)> {
    self.thread.ok().and_then(|thread| thread.join().ok())
  }
}

#[cfg(test)]
mod test {

  use std::time::{Duration, Instant};

  use crossbeam_channel::Receiver;

  use super::{merge_tracks, MidiOutSynth, PlaybackStats, Player, Sleeper, Synth};
  use crate::composition::{CompiledTrack, Instrument};
  use crate::error::Error;
  use crate::event::{Event, Key, TrackIndex};
  use crate::note::Velocity;
  use crate::time::{ClockTime, Tempo};

  #[derive(Debug, PartialEq, Clone)]
  enum Call {
    Program(TrackIndex, Instrument),
    On(TrackIndex, Key, Velocity),
    Off(TrackIndex, Key),
    AllOff(TrackIndex),
  }

  #[derive(Default)]
  struct Recorder {
    calls: Vec<Call>,
  }

  impl Synth for Recorder {
    fn program_select(&mut self, channel: TrackIndex, instrument: Instrument) {
      self.calls.push(Call::Program(channel, instrument));
    }

    fn note_on(&mut self, channel: TrackIndex, key: Key, velocity: Velocity) {
      self.calls.push(Call::On(channel, key, velocity));
    }

    fn note_off(&mut self, channel: TrackIndex, key: Key) {
      self.calls.push(Call::Off(channel, key));
    }

    fn all_notes_off(&mut self, channel: TrackIndex) {
      self.calls.push(Call::AllOff(channel));
    }
  }

  /// Records the waits without waiting. Stops on a pending message, or by
  /// itself once `stop_at` waits happened.
  #[derive(Default)]
  struct FakeSleeper {
    slept: Vec<f64>,
    stop_at: Option<usize>,
  }

  impl Sleeper for FakeSleeper {
    fn sleep(&mut self, time: ClockTime, stop: &Receiver<()>) -> bool {
      if self.stop_at == Some(self.slept.len()) || stop.try_recv().is_ok() {
        return true;
      }
      self.slept.push(time.to_seconds());
      false
    }
  }

  fn tracks() -> Vec<CompiledTrack> {
    vec![
      CompiledTrack {
        id: "lead".to_string(),
        index: 0,
        instrument: 0,
        events: vec![Event::note_on(0.0, 60, 64), Event::note_off(0.25, 60, 64)],
      },
      CompiledTrack {
        id: "bass".to_string(),
        index: 1,
        instrument: 33,
        events: vec![Event::note_on(0.125, 36, 90), Event::note_off(0.5, 36, 90)],
      },
    ]
  }

  #[test]
  pub fn merge_tags_tracks() {
    let merged = merge_tracks(&tracks());
    assert_eq!(merged.len(), 4);
    assert_eq!(merged[0].track, Some(0));
    assert_eq!(merged[2].track, Some(1));
  }

  #[test]
  /// One pass plays every track in time order on its own channel
  pub fn play_once() {
    let mut synth = Recorder::default();
    let mut sleeper = FakeSleeper::default();
    let (_stop_tx, stop_rx) = crossbeam_channel::unbounded::<()>();

    let stats = Player::new(Tempo::new(120.0), false)
      .play(&tracks(), &mut synth, &mut sleeper, &stop_rx)
      .unwrap();

    assert_eq!(
      stats,
      PlaybackStats {
        passes: 1,
        events: 4
      }
    );
    assert_eq!(
      synth.calls,
      vec![
        Call::Program(0, 0),
        Call::Program(1, 33),
        Call::On(0, 60, 64),
        Call::On(1, 36, 90),
        Call::Off(0, 60),
        Call::Off(1, 36),
      ]
    );
    assert_eq!(sleeper.slept, vec![0.0, 0.25, 0.25, 0.5]);
  }

  #[test]
  /// A pending stop message ends a looping playback before the next event
  pub fn play_loop_until_stopped() {
    let mut synth = Recorder::default();
    let mut sleeper = FakeSleeper::default();
    let (stop_tx, stop_rx) = crossbeam_channel::unbounded::<()>();
    stop_tx.send(()).unwrap();

    let stats = Player::new(Tempo::new(120.0), true)
      .play(&tracks(), &mut synth, &mut sleeper, &stop_rx)
      .unwrap();

    assert_eq!(stats, PlaybackStats::default());
    assert_eq!(&synth.calls[2..], &[Call::AllOff(0), Call::AllOff(1)]);
    assert!(sleeper.slept.is_empty());
  }

  #[test]
  /// Stopping at the end of a pass silences the tracks like stopping mid pass
  pub fn play_stop_between_passes() {
    let mut synth = Recorder::default();
    let mut sleeper = FakeSleeper {
      slept: Vec::new(),
      stop_at: Some(4),
    };
    let (_stop_tx, stop_rx) = crossbeam_channel::unbounded::<()>();

    let stats = Player::new(Tempo::new(120.0), true)
      .play(&tracks(), &mut synth, &mut sleeper, &stop_rx)
      .unwrap();

    assert_eq!(
      stats,
      PlaybackStats {
        passes: 1,
        events: 4
      }
    );
    assert_eq!(synth.calls.len(), 8);
    assert_eq!(&synth.calls[6..], &[Call::AllOff(0), Call::AllOff(1)]);
  }

  #[test]
  pub fn play_empty_loop_ends() {
    let mut synth = Recorder::default();
    let (_stop_tx, stop_rx) = crossbeam_channel::unbounded::<()>();
    let stats = Player::new(Tempo::new(120.0), true)
      .play(&[], &mut synth, &mut FakeSleeper::default(), &stop_rx)
      .unwrap();
    assert_eq!(stats.passes, 1);
    assert!(synth.calls.is_empty());
  }

  #[test]
  /// Keys beyond MIDI fail the playback before any sound is made
  pub fn play_key_out_of_range() {
    let mut synth = Recorder::default();
    let (_stop_tx, stop_rx) = crossbeam_channel::unbounded::<()>();
    let mut tracks = tracks();
    tracks[1].events[0].key = 132;

    let result = Player::new(Tempo::new(120.0), false).play(
      &tracks,
      &mut synth,
      &mut FakeSleeper::default(),
      &stop_rx,
    );

    assert_eq!(
      result,
      Err(Error::MidiOutOfRange {
        what: "key".to_string(),
        value: 132
      })
    );
    assert!(synth.calls.is_empty());
  }

  #[test]
  pub fn spawn_and_join() {
    let mut tracks = tracks();
    for track in tracks.iter_mut() {
      for event in track.events.iter_mut() {
        event.time /= 100.0;
      }
    }
    let handle = Player::new(Tempo::new(240.0), false).spawn(tracks, Recorder::default());
    let (stats, synth) = handle.join().unwrap();
    assert_eq!(stats.unwrap().events, 4);
    assert_eq!(synth.calls.len(), 6);
  }

  #[test]
  /// A stop sent in the middle of a long wait ends the playback right away
  pub fn spawn_stop_during_long_wait() {
    let tracks = vec![CompiledTrack {
      id: "pad".to_string(),
      index: 0,
      instrument: 89,
      events: vec![Event::note_on(0.0, 48, 64), Event::note_off(1.0, 48, 64)],
    }];
    // a whole note at 60 bpm is a 4 seconds wait
    let handle = Player::new(Tempo::new(60.0), true).spawn(tracks, Recorder::default());

    std::thread::sleep(Duration::from_millis(100));
    let stopped_at = Instant::now();
    handle.stop();
    let (stats, synth) = handle.join().unwrap();

    assert!(stopped_at.elapsed() < Duration::from_secs(1));
    assert_eq!(stats.unwrap().events, 1);
    assert_eq!(synth.calls.last(), Some(&Call::AllOff(0)));
  }

  #[test]
  pub fn midi_out_synth() {
    let mut synth = MidiOutSynth::new(Vec::<Vec<u8>>::new());
    synth.program_select(1, 33);
    synth.note_on(1, 36, 90);
    synth.note_off(17, 36);
    synth.all_notes_off(0);
    assert_eq!(
      synth.into_sink(),
      vec![
        vec![0xc1, 33],
        vec![0x91, 36, 90],
        vec![0x81, 36, 0],
        vec![0xb0, 123, 0],
      ]
    );
  }

  #[test]
  /// Notes the MIDI encoding cannot carry are dropped, not moved to another key
  pub fn midi_out_synth_drops_out_of_range() {
    let mut synth = MidiOutSynth::new(Vec::<Vec<u8>>::new());
    synth.note_on(0, 132, 64);
    synth.note_off(0, -1);
    synth.note_on(0, 127, 64);
    assert_eq!(synth.into_sink(), vec![vec![0x90, 127, 64]]);
  }
}
