use crate::error::{Error, Result};
use crate::event::Key;
use crate::note::Velocity;

use super::types::{U4, U7};

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Message {
  NoteOff { channel: U4, key: U7, velocity: U7 },
  NoteOn { channel: U4, key: U7, velocity: U7 },
  ProgramChange { channel: U4, value: U7 },
  AllNotesOff { channel: U4 },
}

/// Checks that a value fits in the 7 bits of a MIDI data byte.
pub fn data_byte(what: &str, value: i32) -> Result<U7> {
  if (0..=127).contains(&value) {
    Ok(value as U7)
  } else {
    Err(Error::MidiOutOfRange {
      what: what.to_string(),
      value,
    })
  }
}

impl Message {
  pub fn note_on(channel: U4, key: Key, velocity: Velocity) -> Result<Message> {
    Ok(Message::NoteOn {
      channel,
      key: data_byte("key", key)?,
      velocity: data_byte("velocity", i32::from(velocity))?,
    })
  }

  pub fn note_off(channel: U4, key: Key, velocity: Velocity) -> Result<Message> {
    Ok(Message::NoteOff {
      channel,
      key: data_byte("key", key)?,
      velocity: data_byte("velocity", i32::from(velocity))?,
    })
  }

  pub fn program_change(channel: U4, value: u8) -> Result<Message> {
    Ok(Message::ProgramChange {
      channel,
      value: data_byte("program", i32::from(value))?,
    })
  }
}
