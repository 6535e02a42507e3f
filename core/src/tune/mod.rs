pub mod document;
pub mod error;
pub mod part;

pub use self::document::{NoteDocument, PartDocument, TuneDocument};
pub use self::error::TuneError;
pub use self::part::{Chord, Part};

use log::{debug, warn};

use crate::config::TuneDefaults;
use crate::instrument::{Catalog, Fret};
use crate::time::{NoteAddress, Position, Signature, Tempo};

use self::part::is_valid_volume;

///! One synthesis channel per part
pub const MAX_PARTS: usize = 16;

pub const DEFAULT_BARS: u32 = 16;

///! The last bar a note can be placed in, so that the bar count stays representable
pub const MAX_BAR: u32 = u32::MAX - 1;

#[derive(Debug, Clone, PartialEq)]
pub struct Tune {
  name: String,
  tempo: Tempo,
  signature: Signature,
  volume: f64,
  bars: u32,
  parts: Vec<Part>,
}

impl Default for Tune {
  fn default() -> Self {
    Tune::new()
  }
}

impl Tune {
  pub fn new() -> Tune {
    Tune {
      name: String::new(),
      tempo: Tempo::default(),
      signature: Signature::default(),
      volume: 1.0,
      bars: DEFAULT_BARS,
      parts: Vec::new(),
    }
  }

  ///! An empty tune using the configured defaults. Invalid defaults are ignored.
  pub fn with_defaults(defaults: &TuneDefaults) -> Tune {
    let mut tune = Tune::new();
    if !tune.set_bpm(defaults.bpm) {
      warn!("Ignoring the default tempo: {} bpm", defaults.bpm);
    }
    if !tune.set_beats_per_bar(defaults.beats_per_bar) {
      warn!("Ignoring the default meter: {}", defaults.beats_per_bar);
    }
    if !tune.set_volume(defaults.volume) {
      warn!("Ignoring the default volume: {}", defaults.volume);
    }
    if !tune.set_num_bars(defaults.bars) {
      warn!("Ignoring the default bar count: {}", defaults.bars);
    }
    tune
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

  pub fn get_tempo(&self) -> Tempo {
    self.tempo
  }

  pub fn set_bpm(&mut self, bpm: u16) -> bool {
    match Tempo::new(bpm) {
      Some(tempo) => {
        self.tempo = tempo;
        true
      }
      None => {
        debug!("{}", TuneError::TempoOutOfRange { bpm });
        false
      }
    }
  }

  pub fn get_signature(&self) -> Signature {
    self.signature
  }

  ///! Changes the meter, unless some note would be left outside of its bar
  pub fn set_beats_per_bar(&mut self, beats_per_bar: u8) -> bool {
    let fits = |signature: &Signature| {
      self.parts.iter().all(|part| {
        part
          .notes()
          .all(|(address, _)| address.get_position().is_valid(*signature))
      })
    };

    match Signature::new(beats_per_bar).filter(fits) {
      Some(signature) => {
        self.signature = signature;
        true
      }
      None => {
        debug!("{}", TuneError::InvalidMeter { beats_per_bar });
        false
      }
    }
  }

  pub fn get_volume(&self) -> f64 {
    self.volume
  }

  pub fn set_volume(&mut self, volume: f64) -> bool {
    if is_valid_volume(volume) {
      self.volume = volume;
      true
    } else {
      debug!("{}", TuneError::InvalidVolume { volume });
      false
    }
  }

  ///! The minimum number of bars, regardless of the notes
  pub fn get_bars(&self) -> u32 {
    self.bars
  }

  pub fn set_num_bars(&mut self, bars: u32) -> bool {
    if bars >= 1 {
      self.bars = bars;
      true
    } else {
      debug!("{}", TuneError::InvalidBarCount { bars });
      false
    }
  }

  ///! The highest bar holding a note, or 0 for an empty tune
  pub fn max_bar(&self) -> u32 {
    self
      .parts
      .iter()
      .filter_map(Part::max_bar)
      .max()
      .unwrap_or(0)
  }

  pub fn num_bars(&self) -> u32 {
    self.max_bar().saturating_add(1).max(self.bars)
  }

  ///! The last playable position
  pub fn last_position(&self) -> Position {
    let last_sub_beat = crate::time::SUB_BEATS_PER_BEAT - 1;
    Position::new(
      self.num_bars() - 1,
      self.signature.get_num_beats() - 1,
      last_sub_beat,
    )
  }

  pub fn contains(&self, position: Position) -> bool {
    position.is_valid(self.signature) && position.get_bar() < self.num_bars()
  }

  pub fn get_parts(&self) -> &[Part] {
    self.parts.as_slice()
  }

  pub fn get_part(&self, index: usize) -> Option<&Part> {
    self.parts.get(index)
  }

  pub fn num_parts(&self) -> usize {
    self.parts.len()
  }

  pub fn add_part(&mut self, part: Part) -> Result<usize, TuneError> {
    if self.parts.len() >= MAX_PARTS {
      return Err(TuneError::TooManyParts { max: MAX_PARTS });
    }
    self.parts.push(part);
    Ok(self.parts.len() - 1)
  }

  pub fn get_part_mut(&mut self, index: usize) -> Result<&mut Part, TuneError> {
    self
      .parts
      .get_mut(index)
      .ok_or(TuneError::UnknownPart { index })
  }

  pub fn delete_part(&mut self, index: usize) -> Result<Part, TuneError> {
    if index < self.parts.len() {
      Ok(self.parts.remove(index))
    } else {
      Err(TuneError::UnknownPart { index })
    }
  }

  pub fn set_part_volume(&mut self, index: usize, volume: f64) -> bool {
    match self.get_part_mut(index).and_then(|part| part.set_volume(volume)) {
      Ok(()) => true,
      Err(err) => {
        debug!("Rejected part volume: {}", err);
        false
      }
    }
  }

  ///! The chord of a part at a position, empty if there is none
  pub fn get_notes(&self, part: usize, position: Position) -> Chord {
    self
      .parts
      .get(part)
      .map(|part| part.get_notes(position))
      .unwrap_or_default()
  }

  pub fn try_set_note(
    &mut self,
    part: usize,
    address: NoteAddress,
    fret: Option<Fret>,
  ) -> Result<(), TuneError> {
    let position = address.get_position();
    if !self.contains(position) {
      return Err(TuneError::InvalidPosition { position });
    }
    self.get_part_mut(part)?.set_note(address, fret)
  }

  pub fn set_note(&mut self, part: usize, address: NoteAddress, fret: Option<Fret>) -> bool {
    match self.try_set_note(part, address, fret) {
      Ok(()) => true,
      Err(err) => {
        debug!("Rejected note edit: {}", err);
        false
      }
    }
  }

  pub fn to_document(&self) -> TuneDocument {
    let parts = self
      .parts
      .iter()
      .map(|part| PartDocument {
        name: part.get_name().to_string(),
        instrument_name: part.get_instrument().get_name().to_string(),
        sound_id: part.get_sound().to_string(),
        volume: part.get_volume(),
        notes: part
          .notes()
          .map(|(address, fret)| {
            let position = address.get_position();
            NoteDocument {
              bar: position.get_bar(),
              beat: position.get_beat(),
              sub_beat: position.get_sub_beat(),
              string: address.get_string(),
              fret: *fret,
            }
          })
          .collect(),
      })
      .collect();

    TuneDocument {
      name: self.name.clone(),
      bpm: self.tempo.get_value(),
      beats_per_bar: self.signature.get_num_beats(),
      volume: self.volume,
      bars: self.bars,
      parts,
    }
  }

  ///! Builds a complete tune from a document, or fails without any partial result
  pub fn from_document(doc: &TuneDocument, catalog: &Catalog) -> Result<Tune, TuneError> {
    let tempo = Tempo::new(doc.bpm).ok_or(TuneError::TempoOutOfRange { bpm: doc.bpm })?;
    let signature = Signature::new(doc.beats_per_bar).ok_or(TuneError::InvalidMeter {
      beats_per_bar: doc.beats_per_bar,
    })?;
    if !is_valid_volume(doc.volume) {
      return Err(TuneError::InvalidVolume { volume: doc.volume });
    }
    if doc.bars == 0 {
      return Err(TuneError::InvalidBarCount { bars: doc.bars });
    }
    if doc.parts.len() > MAX_PARTS {
      return Err(TuneError::TooManyParts { max: MAX_PARTS });
    }

    let mut parts = Vec::with_capacity(doc.parts.len());
    for part_doc in doc.parts.iter() {
      let instrument = catalog.get(&part_doc.instrument_name).ok_or_else(|| {
        TuneError::UnknownInstrument {
          name: part_doc.instrument_name.clone(),
        }
      })?;
      let mut part = Part::new(
        part_doc.name.as_str(),
        instrument.clone(),
        &part_doc.sound_id,
        part_doc.volume,
      )?;
      for note in part_doc.notes.iter() {
        let position = Position::new(note.bar, note.beat, note.sub_beat);
        if !position.is_valid(signature) || position.get_bar() > MAX_BAR {
          return Err(TuneError::InvalidPosition { position });
        }
        part.set_note(NoteAddress::new(position, note.string), Some(note.fret))?;
      }
      parts.push(part);
    }

    Ok(Tune {
      name: doc.name.clone(),
      tempo,
      signature,
      volume: doc.volume,
      bars: doc.bars,
      parts,
    })
  }
}
