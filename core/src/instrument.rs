//! Fretted instruments: string tunings, fret limits and the sounds they can be played with.

use std::collections::BTreeMap;

use crate::pitch::{Pitch, PitchClass};
use crate::time::StringIndex;

pub type Fret = u8;

pub const DEFAULT_MAX_FRET: Fret = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentString {
  open: Pitch,
  start_fret: Fret,
}

impl InstrumentString {
  pub fn new(open: Pitch, start_fret: Fret) -> InstrumentString {
    InstrumentString { open, start_fret }
  }

  pub fn get_open(&self) -> Pitch {
    self.open
  }

  pub fn get_start_fret(&self) -> Fret {
    self.start_fret
  }

  pub fn pitch_at(&self, fret: Fret) -> Pitch {
    self.open.at_fret(fret)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
  name: String,
  max_fret: Fret,
  strings: Vec<InstrumentString>,
  sounds: Vec<String>,
}

impl Instrument {
  pub fn new<T>(name: T, max_fret: Fret) -> Instrument
  where
    T: Into<String>,
  {
    Instrument {
      name: name.into(),
      max_fret,
      strings: Vec::new(),
      sounds: Vec::new(),
    }
  }

  ///! Appends a string, ordered from the first (highest on the tab) to the last
  pub fn string(self, note: PitchClass, octave: i32) -> Instrument {
    self.drone_string(note, octave, 0)
  }

  ///! Appends a string that can only be fretted from `start_fret`, like the banjo fifth string
  pub fn drone_string(mut self, note: PitchClass, octave: i32, start_fret: Fret) -> Instrument {
    self
      .strings
      .push(InstrumentString::new(Pitch::new(note, octave), start_fret));
    self
  }

  pub fn sound<T>(mut self, sound: T) -> Instrument
  where
    T: Into<String>,
  {
    self.sounds.push(sound.into());
    self
  }

  pub fn get_name(&self) -> &str {
    self.name.as_str()
  }

  pub fn get_max_fret(&self) -> Fret {
    self.max_fret
  }

  pub fn get_string(&self, index: StringIndex) -> Option<&InstrumentString> {
    self.strings.get(usize::from(index))
  }

  pub fn num_strings(&self) -> usize {
    self.strings.len()
  }

  pub fn min_fret(&self, string: StringIndex) -> Option<Fret> {
    self.get_string(string).map(InstrumentString::get_start_fret)
  }

  pub fn is_valid_fret(&self, string: StringIndex, fret: Fret) -> bool {
    self
      .min_fret(string)
      .map_or(false, |min_fret| fret >= min_fret && fret <= self.max_fret)
  }

  pub fn pitch_at(&self, string: StringIndex, fret: Fret) -> Option<Pitch> {
    self.get_string(string).map(|s| s.pitch_at(fret))
  }

  pub fn get_sounds(&self) -> &[String] {
    self.sounds.as_slice()
  }

  pub fn has_sound(&self, sound: &str) -> bool {
    self.sounds.iter().any(|s| s == sound)
  }

  pub fn default_sound(&self) -> Option<&str> {
    self.sounds.first().map(String::as_str)
  }
}

///! The immutable set of instruments a tune can use, by name
pub struct Catalog {
  instruments: BTreeMap<String, Instrument>,
}

impl Catalog {
  pub fn new(instruments: Vec<Instrument>) -> Catalog {
    let instruments = instruments
      .into_iter()
      .map(|instrument| (instrument.name.clone(), instrument))
      .collect();

    Catalog { instruments }
  }

  pub fn available(&self) -> Vec<&str> {
    self.instruments.keys().map(String::as_str).collect()
  }

  pub fn get(&self, name: &str) -> Option<&Instrument> {
    self.instruments.get(name)
  }

  pub fn sounds(&self, name: &str) -> Vec<&str> {
    self
      .get(name)
      .map(|instrument| instrument.sounds.iter().map(String::as_str).collect())
      .unwrap_or_default()
  }

  pub fn default_sound(&self, name: &str) -> Option<&str> {
    self.get(name).and_then(Instrument::default_sound)
  }
}

impl Default for Catalog {
  fn default() -> Self {
    use crate::pitch::PitchClass::*;

    Catalog::new(vec![
      Instrument::new("banjo", DEFAULT_MAX_FRET)
        .string(D, 5)
        .string(B, 4)
        .string(G, 4)
        .string(D, 4)
        .drone_string(G, 5, 5)
        .sound("banjo"),
      Instrument::new("bass", DEFAULT_MAX_FRET)
        .string(G, 3)
        .string(D, 3)
        .string(A, 2)
        .string(E, 2)
        .sound("acoustic_bass")
        .sound("electric_bass_finger")
        .sound("electric_bass_pick")
        .sound("fretless_bass"),
      Instrument::new("guitar", DEFAULT_MAX_FRET)
        .string(E, 5)
        .string(B, 4)
        .string(G, 4)
        .string(D, 4)
        .string(A, 3)
        .string(E, 3)
        .sound("acoustic_guitar_nylon")
        .sound("acoustic_guitar_steel")
        .sound("distortion_guitar")
        .sound("electric_guitar_clean")
        .sound("electric_guitar_jazz"),
      Instrument::new("violin", DEFAULT_MAX_FRET)
        .string(E, 6)
        .string(A, 5)
        .string(D, 5)
        .string(G, 4)
        .sound("violin"),
    ])
  }
}

#[cfg(test)]
mod test {

  use super::{Catalog, Instrument};
  use crate::pitch::{Pitch, PitchClass};

  #[test]
  pub fn available() {
    let catalog = Catalog::default();
    assert_eq!(catalog.available(), vec!["banjo", "bass", "guitar", "violin"]);
  }

  #[test]
  pub fn get() {
    let catalog = Catalog::default();
    let guitar = catalog.get("guitar").unwrap();
    assert_eq!(guitar.get_name(), "guitar");
    assert_eq!(guitar.num_strings(), 6);
    assert_eq!(guitar.get_max_fret(), 24);
    assert_eq!(
      guitar.get_string(5).unwrap().get_open(),
      Pitch::new(PitchClass::E, 3)
    );
    assert!(catalog.get("ukulele").is_none());
  }

  #[test]
  pub fn sounds() {
    let catalog = Catalog::default();
    assert_eq!(
      catalog.sounds("bass"),
      vec![
        "acoustic_bass",
        "electric_bass_finger",
        "electric_bass_pick",
        "fretless_bass"
      ]
    );
    assert!(catalog.sounds("ukulele").is_empty());
    assert_eq!(catalog.default_sound("violin"), Some("violin"));
    assert_eq!(catalog.default_sound("guitar"), Some("acoustic_guitar_nylon"));
    assert_eq!(catalog.default_sound("ukulele"), None);
  }

  #[test]
  pub fn banjo_drone_string() {
    let catalog = Catalog::default();
    let banjo = catalog.get("banjo").unwrap();
    assert_eq!(banjo.min_fret(4), Some(5));
    assert_eq!(banjo.min_fret(0), Some(0));
    assert!(!banjo.is_valid_fret(4, 4));
    assert!(banjo.is_valid_fret(4, 5));
    assert!(banjo.is_valid_fret(0, 0));
    assert!(!banjo.is_valid_fret(0, 25));
    assert!(!banjo.is_valid_fret(5, 0));
  }

  #[test]
  pub fn pitch_at() {
    let bass = Instrument::new("bass", 20)
      .string(PitchClass::G, 2)
      .string(PitchClass::E, 1);
    assert_eq!(bass.pitch_at(1, 3), Some(Pitch::new(PitchClass::G, 1)));
    assert_eq!(bass.pitch_at(2, 3), None);
  }
}
