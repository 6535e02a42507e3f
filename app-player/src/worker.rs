use std::thread;
use std::thread::JoinHandle;
use std::time::Instant;

use crossbeam_channel::{Receiver, Select, Sender, TryRecvError};
use failure::Fail;
use log::{debug, info, warn};

use tab_studio_core::studio::Studio;
use tab_studio_core::synth::LoadResult;

use crate::console::{Command, TransportCommand};

#[derive(Debug, Fail)]
pub enum WorkerError {
  #[fail(display = "Failed to create the player thread: {}", cause)]
  Start { cause: String },

  #[fail(display = "Failed to join the player thread")]
  Stop,
}

pub enum Protocol {
  Stop,

  Command(Command),
}

struct WorkerThread {
  studio: Studio,
}

impl WorkerThread {
  fn new(studio: Studio) -> WorkerThread {
    WorkerThread { studio }
  }

  ///! Serves commands, ticks and instrument loads until asked to stop
  fn handle_messages(mut self, protocol_rx: Receiver<Protocol>) -> Studio {
    loop {
      let ticks = match self.studio.next_tick() {
        Some(deadline) => crossbeam_channel::after(deadline.saturating_duration_since(Instant::now())),
        None => crossbeam_channel::never(),
      };
      let loads: Vec<Receiver<LoadResult>> = self
        .studio
        .pending_loads()
        .into_iter()
        .cloned()
        .collect();

      let mut sel = Select::new();
      let protocol_index = sel.recv(&protocol_rx);
      let tick_index = sel.recv(&ticks);
      for load in loads.iter() {
        sel.recv(load);
      }

      match sel.ready() {
        index if index == protocol_index => match protocol_rx.try_recv() {
          Ok(Protocol::Stop) => break,
          Ok(Protocol::Command(command)) => self.handle_command(command),
          Err(TryRecvError::Disconnected) => break,
          Err(TryRecvError::Empty) => {}
        },
        index if index == tick_index => {
          if ticks.try_recv().is_ok() {
            self.studio.tick(Instant::now());
          }
        }
        _ => {
          self.studio.poll_loads();
        }
      }
    }

    self.studio.stop();
    self.studio
  }

  fn handle_command(&mut self, command: Command) {
    debug!("{:?}", command);
    let done = match command {
      Command::Transport(TransportCommand::Start) => self.studio.start(),
      Command::Transport(TransportCommand::Resume) => self.studio.resume(),
      Command::Transport(TransportCommand::Pause) => self.studio.pause(),
      Command::Transport(TransportCommand::Stop) => self.studio.stop(),
      Command::Transport(TransportCommand::Toggle) => self.studio.toggle(),
      Command::SetPosition(position) => self.studio.set_play_position(position),
      Command::OffsetBars(bars) => {
        if bars >= 0 {
          (0..bars).for_each(|_| self.studio.increment_bar());
        } else {
          (bars..0).for_each(|_| self.studio.decrement_bar());
        }
        true
      }
      Command::SetBpm(bpm) => self.studio.set_bpm(bpm),
      Command::NewTune { name, instrument } => self
        .studio
        .new_tune(&name, instrument.as_ref().map(String::as_str)),
      Command::AddPart { instrument, sound } => self
        .studio
        .add_part(&instrument, &instrument, sound.as_ref().map(String::as_str))
        .is_some(),
      Command::SetNote {
        part,
        address,
        fret,
      } => self.studio.set_note(part, address, fret),
      Command::Quit => true,
    };

    if !done {
      warn!("The command had no effect");
    }
  }
}

pub struct Worker {
  handler: JoinHandle<Studio>,
  protocol_tx: Sender<Protocol>,
}

impl Worker {
  pub fn new(studio: Studio) -> Result<Worker, WorkerError> {
    info!("Starting the player ...");

    let (protocol_tx, protocol_rx) = crossbeam_channel::unbounded::<Protocol>();

    thread::Builder::new()
      .name("player".into())
      .spawn(move || WorkerThread::new(studio).handle_messages(protocol_rx))
      .map_err(|err| WorkerError::Start {
        cause: err.to_string(),
      })
      .map(|handler| Worker {
        handler,
        protocol_tx,
      })
  }

  pub fn sender(&self) -> Sender<Protocol> {
    self.protocol_tx.clone()
  }

  ///! Stops the player thread and hands the studio back
  pub fn stop(self) -> Result<Studio, WorkerError> {
    info!("Stopping the player ...");

    let Worker {
      handler,
      protocol_tx,
    } = self;

    drop(protocol_tx.send(Protocol::Stop));
    handler.join().map_err(|_| WorkerError::Stop)
  }
}
