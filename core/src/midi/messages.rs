use crate::midi::types::{U4, U7};

pub const ALL_NOTES_OFF_CONTROLLER: U7 = 123;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
  NoteOff {
    channel: U4,
    key: U7,
    velocity: U7,
  },
  NoteOn {
    channel: U4,
    key: U7,
    velocity: U7,
  },
  ProgramChange {
    channel: U4,
    value: U7,
  },
  AllNotesOff {
    channel: U4,
  },
}
