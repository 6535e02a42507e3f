use crate::time::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
  ///! Every part has its instrument loaded
  Ready,
  ///! A tick has sent its notes to the synthesiser
  Play,
  PositionChanged(Position),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuneEvent {
  Loaded,
  PartAdded { index: usize },
  PartUpdated { index: usize },
  PartDeleted { index: usize },
}
