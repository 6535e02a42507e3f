use failure::Fail;

use crate::instrument::Fret;
use crate::time::{Position, StringIndex};

#[derive(Debug, Fail, PartialEq)]
pub enum TuneError {
  #[fail(display = "Malformed tune document: {}", cause)]
  Malformed { cause: String },

  #[fail(display = "Tempo out of range: {} bpm", bpm)]
  TempoOutOfRange { bpm: u16 },

  #[fail(display = "Invalid meter: {} beats per bar", beats_per_bar)]
  InvalidMeter { beats_per_bar: u8 },

  #[fail(display = "Invalid volume: {}", volume)]
  InvalidVolume { volume: f64 },

  #[fail(display = "Invalid bar count: {}", bars)]
  InvalidBarCount { bars: u32 },

  #[fail(display = "Unknown instrument: {}", name)]
  UnknownInstrument { name: String },

  #[fail(display = "Sound {} is not available for {}", sound, instrument)]
  UnknownSound { instrument: String, sound: String },

  #[fail(display = "Too many parts, the maximum is {}", max)]
  TooManyParts { max: usize },

  #[fail(display = "Unknown part: {}", index)]
  UnknownPart { index: usize },

  #[fail(display = "Invalid position: {:?}", position)]
  InvalidPosition { position: Position },

  #[fail(display = "Unknown string {} for {}", string, instrument)]
  UnknownString { instrument: String, string: StringIndex },

  #[fail(display = "Fret {} out of range for string {}", fret, string)]
  FretOutOfRange { string: StringIndex, fret: Fret },
}
