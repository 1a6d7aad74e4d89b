use super::messages::Message;
use super::types::{U4, U7};

#[inline]
fn u4(d: &U4) -> u8 {
  d & 0x0f
}

#[inline]
fn u7(d: &U7) -> u8 {
  d & 0x7f
}

#[inline]
fn status_and_channel(status: U4, channel: &U4) -> u8 {
  (status << 4) | u4(channel)
}

pub struct Encoder;

impl Encoder {
  pub fn data_size(msg: &Message) -> usize {
    match msg {
      Message::NoteOff { .. } => 3,
      Message::NoteOn { .. } => 3,
      Message::ProgramChange { .. } => 2,
      Message::AllNotesOff { .. } => 3,
    }
  }

  pub fn encode(msg: &Message, out: &mut [u8]) {
    match msg {
      Message::NoteOff {
        channel,
        key,
        velocity,
      } => out[..3].copy_from_slice(&[status_and_channel(0b1000, channel), u7(key), u7(velocity)]),
      Message::NoteOn {
        channel,
        key,
        velocity,
      } => out[..3].copy_from_slice(&[status_and_channel(0b1001, channel), u7(key), u7(velocity)]),
      Message::ProgramChange { channel, value } => {
        out[..2].copy_from_slice(&[status_and_channel(0b1100, channel), u7(value)])
      }
      Message::AllNotesOff { channel } => {
        out[..3].copy_from_slice(&[status_and_channel(0b1011, channel), 123, 0])
      }
    }
  }

  pub fn to_vec(msg: &Message) -> Vec<u8> {
    let mut data = vec![0u8; Self::data_size(msg)];
    Self::encode(msg, data.as_mut_slice());
    data
  }
}
