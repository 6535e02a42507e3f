pub mod position;
pub mod signature;
pub mod tempo;

pub use self::position::{Direction, NoteAddress, Offset, Policy, Position, StringIndex, StringMove};
pub use self::signature::{Signature, SUB_BEATS_PER_BEAT};
pub use self::tempo::Tempo;
