use std::collections::BTreeMap;

use crate::midi::types::U7;
use crate::pitch::Pitch;
use crate::time::StringIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundingNote {
  pub pitch: Pitch,
  pub key: U7,
}

///! The pitch currently sounding on every string of every part
#[derive(Debug, Default)]
pub struct Sounding {
  parts: BTreeMap<usize, BTreeMap<StringIndex, SoundingNote>>,
}

impl Sounding {
  pub fn new() -> Sounding {
    Sounding::default()
  }

  pub fn get(&self, part: usize, string: StringIndex) -> Option<&SoundingNote> {
    self.parts.get(&part).and_then(|strings| strings.get(&string))
  }

  ///! Records a note, returning the one it replaces on that string
  pub fn insert(&mut self, part: usize, string: StringIndex, note: SoundingNote) -> Option<SoundingNote> {
    self.parts.entry(part).or_default().insert(string, note)
  }

  pub fn remove(&mut self, part: usize, string: StringIndex) -> Option<SoundingNote> {
    self.parts.get_mut(&part).and_then(|strings| strings.remove(&string))
  }

  ///! Removes the notes of a part, keeping the other parts where they are
  pub fn clear_part(&mut self, part: usize) -> Vec<SoundingNote> {
    self
      .parts
      .remove(&part)
      .map(|strings| strings.into_iter().map(|(_, note)| note).collect())
      .unwrap_or_default()
  }

  pub fn is_empty(&self) -> bool {
    self.parts.values().all(BTreeMap::is_empty)
  }

  pub fn len(&self) -> usize {
    self.parts.values().map(BTreeMap::len).sum()
  }

  ///! Clears the table, returning every note with its part
  pub fn drain(&mut self) -> Vec<(usize, SoundingNote)> {
    let parts = std::mem::replace(&mut self.parts, BTreeMap::new());
    parts
      .into_iter()
      .flat_map(|(part, strings)| strings.into_iter().map(move |(_, note)| (part, note)))
      .collect()
  }

  ///! Removes the notes of a part and of every part after it, returning them with the part that played them
  pub fn remove_from(&mut self, part: usize) -> Vec<(usize, SoundingNote)> {
    self
      .parts
      .split_off(&part)
      .into_iter()
      .flat_map(|(part, strings)| strings.into_iter().map(move |(_, note)| (part, note)))
      .collect()
  }
}
