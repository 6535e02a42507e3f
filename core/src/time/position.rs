use std::fmt;

use crate::time::{Signature, SUB_BEATS_PER_BEAT};

pub type StringIndex = u8;

///! How an offset behaves once it moves past the edges of the tune
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
  /// Playback: the bar wraps around so the tune loops forever
  Cyclic,
  /// Focus movement: moving past the first or last address gives no target
  Navigation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
  Forward,
  Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringMove {
  Up,
  Down,
  Top,
  Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset {
  pub bars: i32,
  pub beats: i32,
  pub sub_beats: i32,
}

impl Offset {
  pub fn new() -> Offset {
    Offset::default()
  }

  pub fn bars(self, bars: i32) -> Offset {
    Offset { bars, ..self }
  }

  pub fn beats(self, beats: i32) -> Offset {
    Offset { beats, ..self }
  }

  pub fn sub_beats(self, sub_beats: i32) -> Offset {
    Offset { sub_beats, ..self }
  }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
  bar: u32,
  beat: u8,
  sub_beat: u8,
}

impl Position {
  pub fn new(bar: u32, beat: u8, sub_beat: u8) -> Position {
    Position {
      bar,
      beat,
      sub_beat,
    }
  }

  pub fn start() -> Position {
    Position::default()
  }

  pub fn get_bar(&self) -> u32 {
    self.bar
  }

  pub fn get_beat(&self) -> u8 {
    self.beat
  }

  pub fn get_sub_beat(&self) -> u8 {
    self.sub_beat
  }

  pub fn is_valid(&self, signature: Signature) -> bool {
    self.beat < signature.get_num_beats() && self.sub_beat < SUB_BEATS_PER_BEAT
  }

  pub fn offset(
    &self,
    offset: Offset,
    signature: Signature,
    num_bars: u32,
    policy: Policy,
  ) -> Option<Position> {
    match policy {
      Policy::Cyclic => Some(self.offset_cyclic(offset, signature, num_bars)),
      Policy::Navigation => self.offset_navigation(offset, signature, num_bars),
    }
  }

  ///! Offset wrapping the bar around `num_bars`
  pub fn offset_cyclic(&self, offset: Offset, signature: Signature, num_bars: u32) -> Position {
    let (bar, beat, sub_beat) = self.carry(offset, signature);
    let num_bars = i64::from(num_bars.max(1));
    Position::new(bar.rem_euclid(num_bars) as u32, beat, sub_beat)
  }

  ///! Offset that fails when the target falls outside of `[0, num_bars)`
  pub fn offset_navigation(
    &self,
    offset: Offset,
    signature: Signature,
    num_bars: u32,
  ) -> Option<Position> {
    let (bar, beat, sub_beat) = self.carry(offset, signature);
    if bar < 0 || bar >= i64::from(num_bars) {
      None
    } else {
      Some(Position::new(bar as u32, beat, sub_beat))
    }
  }

  ///! Jump to the start of the neighbour beat.
  ///! Going backward from inside a beat lands on the start of that same beat.
  pub fn jump_beat(
    &self,
    direction: Direction,
    signature: Signature,
    num_bars: u32,
    policy: Policy,
  ) -> Option<Position> {
    let beat_start = Position::new(self.bar, self.beat, 0);
    let offset = match direction {
      Direction::Forward => Offset::new().beats(1),
      Direction::Backward if self.sub_beat > 0 => return Some(beat_start),
      Direction::Backward => Offset::new().beats(-1),
    };
    beat_start.offset(offset, signature, num_bars, policy)
  }

  fn carry(&self, offset: Offset, signature: Signature) -> (i64, u8, u8) {
    let sub_beats_per_beat = i64::from(SUB_BEATS_PER_BEAT);
    let beats_per_bar = i64::from(signature.get_num_beats());

    let sub_beat = i64::from(self.sub_beat) + i64::from(offset.sub_beats);
    let beat =
      i64::from(self.beat) + i64::from(offset.beats) + sub_beat.div_euclid(sub_beats_per_beat);
    let bar = i64::from(self.bar) + i64::from(offset.bars) + beat.div_euclid(beats_per_bar);

    (
      bar,
      beat.rem_euclid(beats_per_bar) as u8,
      sub_beat.rem_euclid(sub_beats_per_beat) as u8,
    )
  }
}

impl fmt::Debug for Position {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "{:05}:{:02}:{:02}",
      u64::from(self.bar) + 1,
      u16::from(self.beat) + 1,
      u16::from(self.sub_beat) + 1
    )
  }
}

///! A playable slot: a position on a given string
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoteAddress {
  position: Position,
  string: StringIndex,
}

impl NoteAddress {
  pub fn new(position: Position, string: StringIndex) -> NoteAddress {
    NoteAddress { position, string }
  }

  pub fn get_position(&self) -> Position {
    self.position
  }

  pub fn get_string(&self) -> StringIndex {
    self.string
  }

  pub fn move_string(&self, movement: StringMove, num_strings: usize) -> Option<NoteAddress> {
    if num_strings == 0 {
      return None;
    }
    let last = (num_strings - 1) as StringIndex;
    let string = match movement {
      StringMove::Up => self.string.checked_sub(1)?,
      StringMove::Down if self.string < last => self.string + 1,
      StringMove::Down => return None,
      StringMove::Top => 0,
      StringMove::Bottom => last,
    };
    Some(NoteAddress { string, ..*self })
  }
}

#[cfg(test)]
mod test {

  use super::{Direction, NoteAddress, Offset, Policy, Position, StringMove};
  use crate::time::Signature;

  const NUM_BARS: u32 = 16;

  fn four_four() -> Signature {
    Signature::new(4).unwrap()
  }

  #[test]
  pub fn new() {
    let position = Position::new(10, 1, 2);
    assert_eq!(position.get_bar(), 10);
    assert_eq!(position.get_beat(), 1);
    assert_eq!(position.get_sub_beat(), 2);
  }

  #[test]
  pub fn ordering() {
    assert!(Position::new(0, 3, 3) < Position::new(1, 0, 0));
    assert!(Position::new(1, 0, 3) < Position::new(1, 1, 0));
    assert!(Position::new(1, 1, 0) < Position::new(1, 1, 1));
  }

  #[test]
  pub fn is_valid() {
    let signature = Signature::new(3).unwrap();
    assert!(Position::new(7, 2, 3).is_valid(signature));
    assert!(!Position::new(7, 3, 0).is_valid(signature));
    assert!(!Position::new(7, 0, 4).is_valid(signature));
  }

  #[test]
  pub fn carry_into_beat() {
    let position = Position::new(0, 0, 3);
    let next = position.offset_cyclic(Offset::new().sub_beats(1), four_four(), NUM_BARS);
    assert_eq!(next, Position::new(0, 1, 0));
  }

  #[test]
  pub fn borrow_from_bar() {
    let position = Position::new(2, 0, 0);
    let previous = position.offset_cyclic(Offset::new().sub_beats(-1), four_four(), NUM_BARS);
    assert_eq!(previous, Position::new(1, 3, 3));
  }

  #[test]
  pub fn carry_uses_the_meter() {
    let signature = Signature::new(3).unwrap();
    let position = Position::new(4, 2, 3);
    let next = position.offset_cyclic(Offset::new().sub_beats(1), signature, NUM_BARS);
    assert_eq!(next, Position::new(5, 0, 0));
  }

  #[test]
  pub fn combined_offset() {
    let position = Position::new(3, 1, 2);
    let offset = Offset::new().bars(-1).beats(2).sub_beats(-7);
    let target = position.offset_navigation(offset, four_four(), NUM_BARS);
    assert_eq!(target, Some(Position::new(2, 1, 3)));
  }

  #[test]
  pub fn cyclic_wraps_at_the_end() {
    let position = Position::new(NUM_BARS - 1, 3, 3);
    let next = position.offset_cyclic(Offset::new().sub_beats(1), four_four(), NUM_BARS);
    assert_eq!(next, Position::start());
  }

  #[test]
  pub fn cyclic_wraps_at_the_start() {
    let position = Position::start();
    let previous = position.offset(Offset::new().sub_beats(-1), four_four(), NUM_BARS, Policy::Cyclic);
    assert_eq!(previous, Some(Position::new(NUM_BARS - 1, 3, 3)));
  }

  #[test]
  pub fn navigation_never_wraps() {
    let first = Position::start();
    let before = first.offset(Offset::new().sub_beats(-1), four_four(), NUM_BARS, Policy::Navigation);
    assert_eq!(before, None);

    let last = Position::new(NUM_BARS - 1, 3, 3);
    assert_eq!(last.offset_navigation(Offset::new().sub_beats(1), four_four(), NUM_BARS), None);
    assert_eq!(last.offset_navigation(Offset::new().bars(1), four_four(), NUM_BARS), None);
  }

  #[test]
  pub fn navigation_crosses_bars_inside_the_tune() {
    let position = Position::new(0, 3, 3);
    let next = position.offset_navigation(Offset::new().sub_beats(1), four_four(), NUM_BARS);
    assert_eq!(next, Some(Position::new(1, 0, 0)));
  }

  #[test]
  pub fn full_bar_of_sub_beats() {
    let signature = four_four();
    let mut position = Position::new(5, 0, 0);
    for _ in 0..signature.get_num_sub_beats() {
      position = position.offset_cyclic(Offset::new().sub_beats(1), signature, NUM_BARS);
    }
    assert_eq!(position, Position::new(6, 0, 0));
  }

  #[test]
  pub fn jump_beat_forward() {
    let position = Position::new(1, 3, 2);
    let target = position.jump_beat(Direction::Forward, four_four(), NUM_BARS, Policy::Navigation);
    assert_eq!(target, Some(Position::new(2, 0, 0)));
  }

  #[test]
  pub fn jump_beat_backward_inside_beat() {
    let position = Position::new(1, 2, 3);
    let target = position.jump_beat(Direction::Backward, four_four(), NUM_BARS, Policy::Navigation);
    assert_eq!(target, Some(Position::new(1, 2, 0)));
  }

  #[test]
  pub fn jump_beat_backward_from_beat_start() {
    let position = Position::new(1, 0, 0);
    let target = position.jump_beat(Direction::Backward, four_four(), NUM_BARS, Policy::Navigation);
    assert_eq!(target, Some(Position::new(0, 3, 0)));
  }

  #[test]
  pub fn jump_beat_at_the_edges() {
    let signature = four_four();
    let first = Position::start();
    assert_eq!(first.jump_beat(Direction::Backward, signature, NUM_BARS, Policy::Navigation), None);
    assert_eq!(
      first.jump_beat(Direction::Backward, signature, NUM_BARS, Policy::Cyclic),
      Some(Position::new(NUM_BARS - 1, 3, 0))
    );

    let last = Position::new(NUM_BARS - 1, 3, 1);
    assert_eq!(last.jump_beat(Direction::Forward, signature, NUM_BARS, Policy::Navigation), None);
  }

  #[test]
  pub fn move_string() {
    let address = NoteAddress::new(Position::new(0, 1, 2), 2);
    assert_eq!(address.move_string(StringMove::Up, 6).map(|a| a.get_string()), Some(1));
    assert_eq!(address.move_string(StringMove::Down, 6).map(|a| a.get_string()), Some(3));
    assert_eq!(address.move_string(StringMove::Top, 6).map(|a| a.get_string()), Some(0));
    assert_eq!(address.move_string(StringMove::Bottom, 6).map(|a| a.get_string()), Some(5));

    let top = NoteAddress::new(Position::start(), 0);
    assert_eq!(top.move_string(StringMove::Up, 6), None);
    let bottom = NoteAddress::new(Position::start(), 5);
    assert_eq!(bottom.move_string(StringMove::Down, 6), None);
  }

  #[test]
  pub fn addresses_group_by_position() {
    let a = NoteAddress::new(Position::new(0, 0, 1), 5);
    let b = NoteAddress::new(Position::new(0, 0, 2), 0);
    assert!(a < b);
  }

  #[test]
  pub fn debug_format() {
    assert_eq!(format!("{:?}", Position::new(9, 2, 0)), "00010:03:01");
    assert_eq!(
      format!("{:?}", Position::new(u32::MAX, 0, 0)),
      "4294967296:01:01"
    );
  }
}
