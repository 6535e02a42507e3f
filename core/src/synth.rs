//! The synthesis backend seam: instruments are loaded asynchronously and then played through MIDI channel messages.

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use failure::Fail;

use crate::midi::types::{U4, U7};
use crate::midi::Message;

#[derive(Debug, Fail, Clone, PartialEq)]
pub enum SynthError {
  #[fail(display = "Unknown sound: {}", sound)]
  UnknownSound { sound: String },

  #[fail(display = "Failed to load {}: {}", sound, cause)]
  Load { sound: String, cause: String },

  #[fail(display = "The load of {} was abandoned", sound)]
  Abandoned { sound: String },

  #[fail(display = "Failed to send to the synthesiser: {}", cause)]
  Output { cause: String },
}

pub type LoadResult = Result<(), SynthError>;

///! The completion side of an instrument load, owned by the backend
pub struct LoadCompleter {
  sender: Sender<LoadResult>,
}

impl LoadCompleter {
  pub fn complete(self, result: LoadResult) {
    drop(self.sender.send(result));
  }
}

///! A pending instrument load. It resolves once, with either success or an error.
pub struct LoadHandle {
  sound: String,
  receiver: Receiver<LoadResult>,
}

impl LoadHandle {
  pub fn new<T>(sound: T) -> (LoadCompleter, LoadHandle)
  where
    T: Into<String>,
  {
    let sound = sound.into();
    let (sender, receiver) = crossbeam_channel::bounded(1);
    let completer = LoadCompleter { sender };
    (completer, LoadHandle { sound, receiver })
  }

  pub fn ready<T>(sound: T) -> LoadHandle
  where
    T: Into<String>,
  {
    let (completer, handle) = LoadHandle::new(sound);
    completer.complete(Ok(()));
    handle
  }

  pub fn failed(error: SynthError) -> LoadHandle {
    let sound = match &error {
      SynthError::UnknownSound { sound }
      | SynthError::Load { sound, .. }
      | SynthError::Abandoned { sound } => sound.clone(),
      SynthError::Output { .. } => String::new(),
    };
    let (completer, handle) = LoadHandle::new(sound);
    completer.complete(Err(error));
    handle
  }

  pub fn get_sound(&self) -> &str {
    self.sound.as_str()
  }

  pub fn receiver(&self) -> &Receiver<LoadResult> {
    &self.receiver
  }

  ///! None while the load is still in progress
  pub fn poll(&self) -> Option<LoadResult> {
    match self.receiver.try_recv() {
      Ok(result) => Some(result),
      Err(TryRecvError::Empty) => None,
      Err(TryRecvError::Disconnected) => Some(Err(SynthError::Abandoned {
        sound: self.sound.clone(),
      })),
    }
  }
}

pub trait Synth {
  fn load_instrument(&mut self, sound: &str) -> LoadHandle;

  fn send(&mut self, message: Message);

  ///! Whether a first load must complete before any other load is issued
  fn needs_bootstrap(&self) -> bool {
    false
  }

  fn program_channel(&mut self, channel: U4, program: U7) {
    self.send(Message::ProgramChange {
      channel,
      value: program,
    });
  }

  fn note_on(&mut self, channel: U4, key: U7, velocity: U7) {
    self.send(Message::NoteOn {
      channel,
      key,
      velocity,
    });
  }

  fn note_off(&mut self, channel: U4, key: U7) {
    self.send(Message::NoteOff {
      channel,
      key,
      velocity: 0,
    });
  }

  fn all_notes_off(&mut self, channel: U4) {
    self.send(Message::AllNotesOff { channel });
  }
}
