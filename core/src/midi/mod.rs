pub mod encoder;
pub mod messages;
pub use messages::{data_byte, Message};
pub mod types;

use self::encoder::Encoder;

/// Destination for raw MIDI bytes, one message at a time.
pub trait MidiSink {
  fn send(&mut self, data: &[u8]);
}

impl MidiSink for Vec<Vec<u8>> {
  fn send(&mut self, data: &[u8]) {
    self.push(data.to_vec());
  }
}

pub fn send_message<S: MidiSink + ?Sized>(sink: &mut S, msg: &Message) {
  sink.send(&Encoder::to_vec(msg));
}
