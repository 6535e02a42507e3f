use std::collections::BTreeMap;

use log::debug;

use crate::instrument::{Fret, Instrument};
use crate::time::{NoteAddress, Position, StringIndex};

use super::error::TuneError;

///! The frets played at a single position, by string
pub type Chord = BTreeMap<StringIndex, Fret>;

pub fn is_valid_volume(volume: f64) -> bool {
  volume >= 0.0 && volume <= 1.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct Part {
  name: String,
  instrument: Instrument,
  sound: String,
  volume: f64,
  notes: BTreeMap<NoteAddress, Fret>,
}

impl Part {
  pub fn new<T>(name: T, instrument: Instrument, sound: &str, volume: f64) -> Result<Part, TuneError>
  where
    T: Into<String>,
  {
    check_sound(&instrument, sound)?;
    if !is_valid_volume(volume) {
      return Err(TuneError::InvalidVolume { volume });
    }

    Ok(Part {
      name: name.into(),
      instrument,
      sound: sound.to_string(),
      volume,
      notes: BTreeMap::new(),
    })
  }

  pub fn get_name(&self) -> &str {
    self.name.as_str()
  }

  pub fn set_name<T>(&mut self, name: T)
  where
    T: Into<String>,
  {
    self.name = name.into();
  }

  pub fn get_instrument(&self) -> &Instrument {
    &self.instrument
  }

  pub fn get_sound(&self) -> &str {
    self.sound.as_str()
  }

  ///! Switches the instrument and sound. Notes that can not be played on the new instrument are dropped.
  pub fn set_instrument(&mut self, instrument: Instrument, sound: &str) -> Result<(), TuneError> {
    check_sound(&instrument, sound)?;

    let before = self.notes.len();
    self
      .notes
      .retain(|address, fret| instrument.is_valid_fret(address.get_string(), *fret));
    let dropped = before - self.notes.len();
    if dropped > 0 {
      debug!(
        "Dropped {} notes not playable on {}",
        dropped,
        instrument.get_name()
      );
    }

    self.instrument = instrument;
    self.sound = sound.to_string();
    Ok(())
  }

  pub fn get_volume(&self) -> f64 {
    self.volume
  }

  pub fn set_volume(&mut self, volume: f64) -> Result<(), TuneError> {
    if is_valid_volume(volume) {
      self.volume = volume;
      Ok(())
    } else {
      Err(TuneError::InvalidVolume { volume })
    }
  }

  ///! All the strings sounding at a position
  pub fn get_notes(&self, position: Position) -> Chord {
    let first = NoteAddress::new(position, StringIndex::min_value());
    let last = NoteAddress::new(position, StringIndex::max_value());
    self
      .notes
      .range(first..=last)
      .map(|(address, fret)| (address.get_string(), *fret))
      .collect()
  }

  pub fn notes(&self) -> impl Iterator<Item = (&NoteAddress, &Fret)> {
    self.notes.iter()
  }

  pub fn num_notes(&self) -> usize {
    self.notes.len()
  }

  pub fn max_bar(&self) -> Option<u32> {
    self
      .notes
      .keys()
      .next_back()
      .map(|address| address.get_position().get_bar())
  }

  pub fn check_note(&self, address: &NoteAddress, fret: Fret) -> Result<(), TuneError> {
    let string = address.get_string();
    if self.instrument.get_string(string).is_none() {
      return Err(TuneError::UnknownString {
        instrument: self.instrument.get_name().to_string(),
        string,
      });
    }
    if !self.instrument.is_valid_fret(string, fret) {
      return Err(TuneError::FretOutOfRange { string, fret });
    }
    Ok(())
  }

  ///! Stores a fret at an address, or removes the note when there is no fret
  pub fn set_note(&mut self, address: NoteAddress, fret: Option<Fret>) -> Result<(), TuneError> {
    match fret {
      Some(fret) => {
        self.check_note(&address, fret)?;
        self.notes.insert(address, fret);
      }
      None => {
        if self.instrument.get_string(address.get_string()).is_none() {
          return Err(TuneError::UnknownString {
            instrument: self.instrument.get_name().to_string(),
            string: address.get_string(),
          });
        }
        self.notes.remove(&address);
      }
    }
    Ok(())
  }
}

fn check_sound(instrument: &Instrument, sound: &str) -> Result<(), TuneError> {
  if instrument.has_sound(sound) {
    Ok(())
  } else {
    Err(TuneError::UnknownSound {
      instrument: instrument.get_name().to_string(),
      sound: sound.to_string(),
    })
  }
}
