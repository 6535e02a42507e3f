use std::time::Duration;

use crate::time::SUB_BEATS_PER_BEAT;

pub const MIN_BPM: u16 = 40;
pub const MAX_BPM: u16 = 300;

const DEFAULT_BPM: u16 = 120;
const NANOS_PER_MINUTE: u64 = 60_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tempo(u16);

impl Tempo {
  pub fn new(value: u16) -> Option<Tempo> {
    if value >= MIN_BPM && value <= MAX_BPM {
      Some(Tempo(value))
    } else {
      None
    }
  }

  pub fn get_value(&self) -> u16 {
    self.0
  }

  ///! Time between two consecutive sub-beats
  pub fn sub_beat_interval(&self) -> Duration {
    Duration::from_nanos(NANOS_PER_MINUTE / u64::from(self.0) / u64::from(SUB_BEATS_PER_BEAT))
  }
}

impl Default for Tempo {
  fn default() -> Tempo {
    Tempo(DEFAULT_BPM)
  }
}

impl From<Tempo> for u16 {
  fn from(item: Tempo) -> Self {
    item.0
  }
}

#[cfg(test)]
mod test {

  use super::{Tempo, MAX_BPM, MIN_BPM};
  use std::time::Duration;

  #[test]
  pub fn tempo_new() {
    let tempo = Tempo::new(120).unwrap();
    assert_eq!(tempo.get_value(), 120);
  }

  #[test]
  pub fn tempo_bounds() {
    assert!(Tempo::new(MIN_BPM).is_some());
    assert!(Tempo::new(MAX_BPM).is_some());
    assert_eq!(Tempo::new(MIN_BPM - 1), None);
    assert_eq!(Tempo::new(MAX_BPM + 1), None);
  }

  #[test]
  pub fn sub_beat_interval() {
    let tempo = Tempo::new(120).unwrap();
    assert_eq!(tempo.sub_beat_interval(), Duration::from_millis(125));

    let tempo = Tempo::new(60).unwrap();
    assert_eq!(tempo.sub_beat_interval(), Duration::from_millis(250));
  }

  #[test]
  pub fn sub_beat_interval_is_exact() {
    let tempo = Tempo::new(110).unwrap();
    assert_eq!(tempo.sub_beat_interval(), Duration::from_nanos(136_363_636));
  }
}
