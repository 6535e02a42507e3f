pub const SUB_BEATS_PER_BEAT: u8 = 4;

const DEFAULT_NUM_BEATS: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
  num_beats: u8, // beats per bar, each one split in SUB_BEATS_PER_BEAT
}

impl Signature {
  pub fn new(num_beats: u8) -> Option<Signature> {
    if num_beats > 0 {
      Some(Signature { num_beats })
    } else {
      None
    }
  }

  pub fn get_num_beats(&self) -> u8 {
    self.num_beats
  }

  pub fn get_num_sub_beats(&self) -> u32 {
    u32::from(self.num_beats) * u32::from(SUB_BEATS_PER_BEAT)
  }
}

impl Default for Signature {
  fn default() -> Signature {
    Signature {
      num_beats: DEFAULT_NUM_BEATS,
    }
  }
}

#[cfg(test)]
mod test {

  use super::Signature;

  #[test]
  pub fn signature_new() {
    let signature = Signature::new(3).unwrap();
    assert_eq!(signature.get_num_beats(), 3);
    assert_eq!(signature.get_num_sub_beats(), 12);
  }

  #[test]
  pub fn signature_without_beats() {
    assert_eq!(Signature::new(0), None);
  }

  #[test]
  pub fn signature_default() {
    assert_eq!(Signature::default().get_num_beats(), 4);
  }
}
