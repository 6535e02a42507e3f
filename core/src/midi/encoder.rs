use super::messages::{Message, ALL_NOTES_OFF_CONTROLLER};
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
      Message::AllNotesOff { channel } => out[..3].copy_from_slice(&[
        status_and_channel(0b1011, channel),
        ALL_NOTES_OFF_CONTROLLER,
        0,
      ]),
    }
  }

  ///! Encodes into a freshly allocated buffer of the exact size
  pub fn to_vec(msg: &Message) -> Vec<u8> {
    let mut data = vec![0u8; Encoder::data_size(msg)];
    Encoder::encode(msg, data.as_mut_slice());
    data
  }
}

#[cfg(test)]
mod test {

  use super::*;

  #[test]
  pub fn test_u4() {
    assert_eq!(u4(&0xff), 0x0f);
  }

  #[test]
  pub fn test_u7() {
    assert_eq!(u7(&0xff), 0x7f);
  }

  #[test]
  pub fn test_status_and_channel() {
    assert_eq!(status_and_channel(0b1010, &0b0101_0101), 0b1010_0101);
  }

  #[test]
  pub fn note_off() {
    assert_encoding(
      &Message::NoteOff {
        channel: 1,
        key: 65,
        velocity: 120,
      },
      vec![0b1000_0001, 65, 120],
    )
  }

  #[test]
  pub fn note_on() {
    assert_encoding(
      &Message::NoteOn {
        channel: 1,
        key: 65,
        velocity: 120,
      },
      vec![0b1001_0001, 65, 120],
    )
  }

  #[test]
  pub fn note_on_masks_out_of_range_key() {
    assert_encoding(
      &Message::NoteOn {
        channel: 2,
        key: 200,
        velocity: 255,
      },
      vec![0b1001_0010, 200 & 0x7f, 0x7f],
    )
  }

  #[test]
  pub fn program_change() {
    assert_encoding(
      &Message::ProgramChange {
        channel: 15,
        value: 24,
      },
      vec![0b1100_1111, 24],
    )
  }

  #[test]
  pub fn all_notes_off() {
    assert_encoding(
      &Message::AllNotesOff { channel: 3 },
      vec![0b1011_0011, 123, 0],
    )
  }

  fn assert_encoding(msg: &Message, expected: Vec<u8>) {
    assert_eq!(Encoder::data_size(msg), expected.len());
    assert_eq!(Encoder::to_vec(msg), expected);
  }
}
