use std::collections::BTreeMap;

use crossbeam_channel::Receiver;
use log::{debug, info, warn};

use crate::instrument::Instrument;
use crate::midi::gm;
use crate::midi::types::{U4, U7};
use crate::synth::{LoadHandle, LoadResult, Synth};
use crate::tune::Part;

#[derive(Debug, Clone)]
pub struct LoadedInstrument {
  instrument: Instrument,
  sound: String,
}

impl LoadedInstrument {
  pub fn get_instrument(&self) -> &Instrument {
    &self.instrument
  }

  pub fn get_sound(&self) -> &str {
    self.sound.as_str()
  }
}

struct Request {
  part: usize,
  instrument: Instrument,
  sound: String,
}

struct LoadTask {
  request: Request,
  program: Option<U7>,
  handle: LoadHandle,
}

///! The instrument loaded for every part, which is also its synthesiser channel
pub struct Instruments {
  loaded: BTreeMap<usize, LoadedInstrument>,
  tasks: Vec<LoadTask>,
  deferred: Vec<Request>,
  bootstrapped: bool,
}

impl Default for Instruments {
  fn default() -> Self {
    Instruments::new()
  }
}

impl Instruments {
  pub fn new() -> Instruments {
    Instruments {
      loaded: BTreeMap::new(),
      tasks: Vec::new(),
      deferred: Vec::new(),
      bootstrapped: false,
    }
  }

  ///! Forgets everything loaded so far and loads the instruments of all the parts
  pub fn load_all(&mut self, parts: &[Part], synth: &mut dyn Synth) {
    self.loaded.clear();
    self.tasks.clear();
    self.deferred.clear();

    for (index, part) in parts.iter().enumerate() {
      self.load(index, part, synth);
    }
  }

  pub fn load(&mut self, index: usize, part: &Part, synth: &mut dyn Synth) {
    self.loaded.remove(&index);
    self.tasks.retain(|task| task.request.part != index);
    self.deferred.retain(|request| request.part != index);

    let request = Request {
      part: index,
      instrument: part.get_instrument().clone(),
      sound: part.get_sound().to_string(),
    };

    let waiting_bootstrap = synth.needs_bootstrap() && !self.bootstrapped;
    if waiting_bootstrap && !self.tasks.is_empty() {
      debug!(
        "Deferring the load of {} for part {} until the synthesiser is bootstrapped",
        request.sound, index
      );
      self.deferred.push(request);
    } else {
      self.issue(request, synth);
    }
  }

  ///! Forgets a deleted part and moves the following parts one channel down
  pub fn remove(&mut self, index: usize, synth: &mut dyn Synth) {
    self.loaded.remove(&index);
    let following = self.loaded.split_off(&index);
    for (part, loaded) in following.into_iter() {
      let channel = part - 1;
      if let Some(program) = gm::program(&loaded.sound) {
        synth.program_channel(channel as U4, program);
      }
      self.loaded.insert(channel, loaded);
    }

    self.tasks.retain(|task| task.request.part != index);
    for task in self.tasks.iter_mut() {
      if task.request.part > index {
        task.request.part -= 1;
      }
    }

    self.deferred.retain(|request| request.part != index);
    for request in self.deferred.iter_mut() {
      if request.part > index {
        request.part -= 1;
      }
    }

    self.restart_bootstrap(synth);
  }

  ///! Resolves the loads that have completed. Returns whether any did.
  pub fn poll(&mut self, synth: &mut dyn Synth) -> bool {
    let mut changed = self.poll_tasks(synth);
    if self.bootstrapped && !self.deferred.is_empty() {
      info!("Synthesiser bootstrapped, loading the remaining instruments");
      let deferred = std::mem::replace(&mut self.deferred, Vec::new());
      for request in deferred {
        self.issue(request, synth);
      }
      changed |= self.poll_tasks(synth);
    } else {
      self.restart_bootstrap(synth);
    }
    changed
  }

  pub fn is_ready(&self, num_parts: usize) -> bool {
    (0..num_parts).all(|part| self.loaded.contains_key(&part))
  }

  pub fn is_loaded(&self, part: usize) -> bool {
    self.loaded.contains_key(&part)
  }

  pub fn get(&self, part: usize) -> Option<&LoadedInstrument> {
    self.loaded.get(&part)
  }

  pub fn num_pending(&self) -> usize {
    self.tasks.len() + self.deferred.len()
  }

  pub fn pending_receivers(&self) -> Vec<&Receiver<LoadResult>> {
    self.tasks.iter().map(|task| task.handle.receiver()).collect()
  }

  fn issue(&mut self, request: Request, synth: &mut dyn Synth) {
    debug!("Loading {} for part {}", request.sound, request.part);
    let program = gm::program(&request.sound);
    let handle = synth.load_instrument(&request.sound);
    self.tasks.push(LoadTask {
      request,
      program,
      handle,
    });
  }

  ///! Picks the next deferred load as the bootstrap one when none is in flight anymore
  fn restart_bootstrap(&mut self, synth: &mut dyn Synth) {
    if !self.bootstrapped && self.tasks.is_empty() && !self.deferred.is_empty() {
      let request = self.deferred.remove(0);
      debug!("Bootstrapping the synthesiser with {} for part {}", request.sound, request.part);
      self.issue(request, synth);
    }
  }

  fn poll_tasks(&mut self, synth: &mut dyn Synth) -> bool {
    let mut changed = false;
    let mut pending = Vec::with_capacity(self.tasks.len());

    for task in self.tasks.drain(..) {
      match task.handle.poll() {
        None => pending.push(task),
        Some(Ok(())) => {
          let LoadTask {
            request, program, ..
          } = task;
          let channel = request.part as U4;
          match program {
            Some(program) => synth.program_channel(channel, program),
            None => warn!("No program for {}, channel {} keeps its sound", request.sound, channel),
          }
          info!("Loaded {} for part {}", request.sound, request.part);
          self.loaded.insert(
            request.part,
            LoadedInstrument {
              instrument: request.instrument,
              sound: request.sound,
            },
          );
          self.bootstrapped = true;
          changed = true;
        }
        Some(Err(err)) => {
          warn!("Instrument load for part {} failed: {}", task.request.part, err);
          changed = true;
        }
      }
    }

    self.tasks = pending;
    changed
  }
}
