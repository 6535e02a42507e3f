//! Line commands typed on the standard input.
//!
//! Positions are written one based, the way they are displayed: `pos 1 1 1` is the first sub-beat.

use std::str::FromStr;

use failure::Fail;

use tab_studio_core::instrument::Fret;
use tab_studio_core::time::{NoteAddress, Position, StringIndex};

pub const HELP: &str = "commands: play | pause | resume | stop | toggle | pos <bar> <beat> <sub> | \
                        bar+ | bar- | bpm <n> | new <name> [instrument] | part <instrument> [sound] | \
                        note <part> <bar> <beat> <sub> <string> <fret|-> | quit";

#[derive(Debug, Fail, PartialEq)]
pub enum ConsoleError {
  #[fail(display = "Unknown command: {}", name)]
  UnknownCommand { name: String },

  #[fail(display = "Missing {} for {}", argument, command)]
  MissingArgument {
    command: &'static str,
    argument: &'static str,
  },

  #[fail(display = "Invalid {}: {}", argument, value)]
  InvalidArgument {
    argument: &'static str,
    value: String,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCommand {
  Start,
  Resume,
  Pause,
  Stop,
  Toggle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
  Transport(TransportCommand),
  SetPosition(Position),
  OffsetBars(i32),
  SetBpm(u16),
  NewTune {
    name: String,
    instrument: Option<String>,
  },
  AddPart {
    instrument: String,
    sound: Option<String>,
  },
  SetNote {
    part: usize,
    address: NoteAddress,
    fret: Option<Fret>,
  },
  Quit,
}

struct Arguments<'a> {
  command: &'static str,
  words: std::str::SplitWhitespace<'a>,
}

impl<'a> Arguments<'a> {
  fn next<T: FromStr>(&mut self, argument: &'static str) -> Result<T, ConsoleError> {
    let word = self.words.next().ok_or(ConsoleError::MissingArgument {
      command: self.command,
      argument,
    })?;
    word.parse::<T>().map_err(|_| ConsoleError::InvalidArgument {
      argument,
      value: word.to_string(),
    })
  }

  fn one_based<T>(&mut self, argument: &'static str) -> Result<T, ConsoleError>
  where
    T: FromStr + PartialOrd + From<u8> + std::ops::Sub<Output = T>,
  {
    let value: T = self.next(argument)?;
    if value < T::from(1) {
      return Err(ConsoleError::InvalidArgument {
        argument,
        value: "0".to_string(),
      });
    }
    Ok(value - T::from(1))
  }

  fn position(&mut self) -> Result<Position, ConsoleError> {
    let bar: u32 = self.one_based("bar")?;
    let beat: u8 = self.one_based("beat")?;
    let sub_beat: u8 = self.one_based("sub-beat")?;
    Ok(Position::new(bar, beat, sub_beat))
  }
}

///! Returns None for a blank line
pub fn parse(line: &str) -> Result<Option<Command>, ConsoleError> {
  let mut words = line.split_whitespace();
  let name = match words.next() {
    Some(name) => name,
    None => return Ok(None),
  };

  let command = match name {
    "play" => Command::Transport(TransportCommand::Start),
    "resume" => Command::Transport(TransportCommand::Resume),
    "pause" => Command::Transport(TransportCommand::Pause),
    "stop" => Command::Transport(TransportCommand::Stop),
    "toggle" => Command::Transport(TransportCommand::Toggle),
    "bar+" => Command::OffsetBars(1),
    "bar-" => Command::OffsetBars(-1),
    "quit" | "exit" => Command::Quit,
    "pos" => {
      let mut args = Arguments {
        command: "pos",
        words,
      };
      Command::SetPosition(args.position()?)
    }
    "bpm" => {
      let mut args = Arguments {
        command: "bpm",
        words,
      };
      Command::SetBpm(args.next("bpm")?)
    }
    "new" => {
      let mut args = Arguments {
        command: "new",
        words,
      };
      let name = args.next("name")?;
      let instrument = args.words.next().map(str::to_string);
      Command::NewTune { name, instrument }
    }
    "part" => {
      let mut args = Arguments {
        command: "part",
        words,
      };
      let instrument = args.next("instrument")?;
      let sound = args.words.next().map(str::to_string);
      Command::AddPart { instrument, sound }
    }
    "note" => {
      let mut args = Arguments {
        command: "note",
        words,
      };
      let part: usize = args.one_based("part")?;
      let position = args.position()?;
      let string: StringIndex = args.one_based("string")?;
      let fret = match args.words.next() {
        Some("-") => None,
        Some(word) => Some(word.parse::<Fret>().map_err(|_| ConsoleError::InvalidArgument {
          argument: "fret",
          value: word.to_string(),
        })?),
        None => {
          return Err(ConsoleError::MissingArgument {
            command: "note",
            argument: "fret",
          })
        }
      };
      Command::SetNote {
        part,
        address: NoteAddress::new(position, string),
        fret,
      }
    }
    _ => {
      return Err(ConsoleError::UnknownCommand {
        name: name.to_string(),
      })
    }
  };

  Ok(Some(command))
}

#[cfg(test)]
mod test {

  use super::{parse, Command, ConsoleError, TransportCommand};
  use tab_studio_core::time::{NoteAddress, Position};

  #[test]
  pub fn transport() {
    assert_eq!(
      parse("play"),
      Ok(Some(Command::Transport(TransportCommand::Start)))
    );
    assert_eq!(
      parse("  toggle "),
      Ok(Some(Command::Transport(TransportCommand::Toggle)))
    );
    assert_eq!(parse("bar-"), Ok(Some(Command::OffsetBars(-1))));
    assert_eq!(parse(""), Ok(None));
    assert_eq!(parse("quit"), Ok(Some(Command::Quit)));
  }

  #[test]
  pub fn position_is_one_based() {
    assert_eq!(
      parse("pos 3 2 4"),
      Ok(Some(Command::SetPosition(Position::new(2, 1, 3))))
    );
    assert!(parse("pos 0 1 1").is_err());
    assert_eq!(
      parse("pos 1 1"),
      Err(ConsoleError::MissingArgument {
        command: "pos",
        argument: "sub-beat"
      })
    );
  }

  #[test]
  pub fn bpm() {
    assert_eq!(parse("bpm 96"), Ok(Some(Command::SetBpm(96))));
    assert_eq!(
      parse("bpm fast"),
      Err(ConsoleError::InvalidArgument {
        argument: "bpm",
        value: "fast".to_string()
      })
    );
  }

  #[test]
  pub fn new_tune() {
    assert_eq!(
      parse("new reel banjo"),
      Ok(Some(Command::NewTune {
        name: "reel".to_string(),
        instrument: Some("banjo".to_string())
      }))
    );
    assert_eq!(
      parse("new jig"),
      Ok(Some(Command::NewTune {
        name: "jig".to_string(),
        instrument: None
      }))
    );
    assert_eq!(
      parse("new"),
      Err(ConsoleError::MissingArgument {
        command: "new",
        argument: "name"
      })
    );
  }

  #[test]
  pub fn part() {
    assert_eq!(
      parse("part bass fretless_bass"),
      Ok(Some(Command::AddPart {
        instrument: "bass".to_string(),
        sound: Some("fretless_bass".to_string())
      }))
    );
    assert_eq!(
      parse("part violin"),
      Ok(Some(Command::AddPart {
        instrument: "violin".to_string(),
        sound: None
      }))
    );
  }

  #[test]
  pub fn note() {
    assert_eq!(
      parse("note 1 2 1 3 6 5"),
      Ok(Some(Command::SetNote {
        part: 0,
        address: NoteAddress::new(Position::new(1, 0, 2), 5),
        fret: Some(5)
      }))
    );
    assert_eq!(
      parse("note 2 1 1 1 1 -"),
      Ok(Some(Command::SetNote {
        part: 1,
        address: NoteAddress::new(Position::start(), 0),
        fret: None
      }))
    );
    assert!(parse("note 1 1 1 1 1").is_err());
  }

  #[test]
  pub fn unknown() {
    assert_eq!(
      parse("rewind"),
      Err(ConsoleError::UnknownCommand {
        name: "rewind".to_string()
      })
    );
  }
}
