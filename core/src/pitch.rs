//! Pitch resolution: open string tuning plus fret offset into a sounding pitch,
//! and sounding pitch into the 128 keys numbering used by the synthesisers.

use std::fmt;
use std::str::FromStr;

use failure::Fail;

use crate::midi::types::U7;

pub const SEMITONES_PER_OCTAVE: i32 = 12;

const MAX_KEY: i32 = 127;

#[derive(Debug, Fail, PartialEq)]
pub enum PitchError {
  #[fail(display = "Unknown note name: {:?}", name)]
  UnknownNoteName { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PitchClass {
  C,
  CSharp,
  D,
  DSharp,
  E,
  F,
  FSharp,
  G,
  GSharp,
  A,
  ASharp,
  B,
}

const CHROMATIC: [PitchClass; 12] = [
  PitchClass::C,
  PitchClass::CSharp,
  PitchClass::D,
  PitchClass::DSharp,
  PitchClass::E,
  PitchClass::F,
  PitchClass::FSharp,
  PitchClass::G,
  PitchClass::GSharp,
  PitchClass::A,
  PitchClass::ASharp,
  PitchClass::B,
];

impl PitchClass {
  pub fn index(self) -> i32 {
    self as i32
  }

  pub fn from_index(index: i32) -> PitchClass {
    CHROMATIC[index.rem_euclid(SEMITONES_PER_OCTAVE) as usize]
  }

  pub fn name(self) -> &'static str {
    match self {
      PitchClass::C => "C",
      PitchClass::CSharp => "C#",
      PitchClass::D => "D",
      PitchClass::DSharp => "D#",
      PitchClass::E => "E",
      PitchClass::F => "F",
      PitchClass::FSharp => "F#",
      PitchClass::G => "G",
      PitchClass::GSharp => "G#",
      PitchClass::A => "A",
      PitchClass::ASharp => "A#",
      PitchClass::B => "B",
    }
  }
}

impl FromStr for PitchClass {
  type Err = PitchError;

  ///! Accepts a letter optionally followed by a sharp (`#`, `♯`) or a flat (`b`, `♭`)
  fn from_str(name: &str) -> Result<PitchClass, PitchError> {
    let unknown = || PitchError::UnknownNoteName {
      name: name.to_string(),
    };

    let mut chars = name.trim().chars();
    let natural = match chars.next().map(|ch| ch.to_ascii_uppercase()) {
      Some('C') => 0,
      Some('D') => 2,
      Some('E') => 4,
      Some('F') => 5,
      Some('G') => 7,
      Some('A') => 9,
      Some('B') => 11,
      _ => return Err(unknown()),
    };
    let accidental = match chars.as_str() {
      "" => 0,
      "#" | "♯" => 1,
      "b" | "♭" => -1,
      _ => return Err(unknown()),
    };

    Ok(PitchClass::from_index(natural + accidental))
  }
}

impl fmt::Display for PitchClass {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}

///! Advance `fret` semitones from an open note. Returns the resulting pitch class and octave.
pub fn note_at_fret(open_note: PitchClass, open_octave: i32, fret: u8) -> (PitchClass, i32) {
  let semitones = open_note.index() + i32::from(fret);
  (
    PitchClass::from_index(semitones),
    open_octave + semitones.div_euclid(SEMITONES_PER_OCTAVE),
  )
}

///! Linear pitch code where C4 is 60
pub fn linear_pitch_code(note: PitchClass, octave: i32) -> i32 {
  note.index() + (octave + 1) * SEMITONES_PER_OCTAVE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pitch {
  octave: i32,
  class: PitchClass,
}

impl Pitch {
  pub fn new(class: PitchClass, octave: i32) -> Pitch {
    Pitch { octave, class }
  }

  pub fn get_class(&self) -> PitchClass {
    self.class
  }

  pub fn get_octave(&self) -> i32 {
    self.octave
  }

  pub fn at_fret(&self, fret: u8) -> Pitch {
    let (class, octave) = note_at_fret(self.class, self.octave, fret);
    Pitch::new(class, octave)
  }

  pub fn code(&self) -> i32 {
    linear_pitch_code(self.class, self.octave)
  }

  ///! The synthesiser key, if the pitch is inside its 128 keys range
  pub fn midi_key(&self) -> Option<U7> {
    let code = self.code();
    if code >= 0 && code <= MAX_KEY {
      Some(code as U7)
    } else {
      None
    }
  }
}

impl fmt::Display for Pitch {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}{}", self.class, self.octave)
  }
}

#[cfg(test)]
mod test {

  use super::{linear_pitch_code, note_at_fret, Pitch, PitchClass, PitchError};

  #[test]
  pub fn note_at_fret_full_octave() {
    assert_eq!(note_at_fret(PitchClass::C, 4, 12), (PitchClass::C, 5));
  }

  #[test]
  pub fn note_at_fret_within_octave() {
    assert_eq!(note_at_fret(PitchClass::E, 3, 3), (PitchClass::G, 3));
    assert_eq!(note_at_fret(PitchClass::G, 4, 0), (PitchClass::G, 4));
  }

  #[test]
  pub fn note_at_fret_crossing_c() {
    assert_eq!(note_at_fret(PitchClass::B, 3, 1), (PitchClass::C, 4));
    assert_eq!(note_at_fret(PitchClass::A, 2, 24), (PitchClass::A, 4));
  }

  #[test]
  pub fn every_fret_raises_the_key_by_one() {
    assert_eq!(note_at_fret(PitchClass::E, 3, 8), (PitchClass::C, 4));
    for fret in 0..=24u8 {
      let (note, octave) = note_at_fret(PitchClass::E, 3, fret);
      assert_eq!(
        linear_pitch_code(note, octave),
        linear_pitch_code(PitchClass::E, 3) + i32::from(fret)
      );
    }
  }

  #[test]
  pub fn codes() {
    assert_eq!(linear_pitch_code(PitchClass::C, 4), 60);
    assert_eq!(linear_pitch_code(PitchClass::A, 4), 69);
    assert_eq!(linear_pitch_code(PitchClass::C, -1), 0);
    assert_eq!(linear_pitch_code(PitchClass::G, 9), 127);
  }

  #[test]
  pub fn midi_key_range() {
    assert_eq!(Pitch::new(PitchClass::E, 2).midi_key(), Some(40));
    assert_eq!(Pitch::new(PitchClass::GSharp, 9).midi_key(), None);
    assert_eq!(Pitch::new(PitchClass::B, -2).midi_key(), None);
  }

  #[test]
  pub fn at_fret() {
    let open = Pitch::new(PitchClass::D, 4);
    assert_eq!(open.at_fret(5), Pitch::new(PitchClass::G, 4));
    assert_eq!(open.at_fret(10).midi_key(), Some(72));
  }

  #[test]
  pub fn parse_names() {
    assert_eq!("C".parse::<PitchClass>(), Ok(PitchClass::C));
    assert_eq!("f#".parse::<PitchClass>(), Ok(PitchClass::FSharp));
    assert_eq!("Db".parse::<PitchClass>(), Ok(PitchClass::CSharp));
    assert_eq!("Cb".parse::<PitchClass>(), Ok(PitchClass::B));
    assert_eq!("A♯".parse::<PitchClass>(), Ok(PitchClass::ASharp));
    assert_eq!(
      "H".parse::<PitchClass>(),
      Err(PitchError::UnknownNoteName {
        name: "H".to_string()
      })
    );
    assert!("C##".parse::<PitchClass>().is_err());
  }

  #[test]
  pub fn display() {
    assert_eq!(Pitch::new(PitchClass::FSharp, 3).to_string(), "F#3");
  }
}
