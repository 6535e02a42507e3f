//! The playback scheduler.
//!
//! The player does not own a timer. It exposes the deadline of its next tick and
//! whoever drives it calls `tick` once the deadline is due, so commands and ticks
//! are serialised by the caller.

pub mod instruments;
pub mod sounding;

use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, trace, warn};

use crate::config;
use crate::events::PlayerEvent;
use crate::midi::types::{U4, U7};
use crate::synth::{LoadResult, Synth};
use crate::time::{Offset, Position};
use crate::tune::part::is_valid_volume;
use crate::tune::Tune;

pub use self::instruments::{Instruments, LoadedInstrument};
pub use self::sounding::{Sounding, SoundingNote};

const MAX_VELOCITY: f64 = 127.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
  Stopped,
  Playing,
  Paused,
}

pub struct Player {
  state: PlayState,
  position: Position,
  next_tick: Option<Instant>,
  note_volume: f64,
  sounding: Sounding,
  instruments: Instruments,
  ready: bool,
  events: Sender<PlayerEvent>,
}

impl Player {
  pub fn new(config: &config::Player, events: Sender<PlayerEvent>) -> Player {
    let note_volume = if is_valid_volume(config.note_volume) {
      config.note_volume
    } else {
      let default = config::Player::default().note_volume;
      warn!(
        "Ignoring the note volume {}, using {}",
        config.note_volume, default
      );
      default
    };

    Player {
      state: PlayState::Stopped,
      position: Position::start(),
      next_tick: None,
      note_volume,
      sounding: Sounding::new(),
      instruments: Instruments::new(),
      ready: false,
      events,
    }
  }

  pub fn get_state(&self) -> PlayState {
    self.state
  }

  pub fn is_playing(&self) -> bool {
    self.state == PlayState::Playing
  }

  pub fn is_ready(&self) -> bool {
    self.ready
  }

  pub fn get_position(&self) -> Position {
    self.position
  }

  ///! When the next tick is due, if playing
  pub fn next_tick(&self) -> Option<Instant> {
    self.next_tick
  }

  pub fn sounding(&self) -> &Sounding {
    &self.sounding
  }

  pub fn instruments(&self) -> &Instruments {
    &self.instruments
  }

  pub fn start(&mut self, tune: &Tune, synth: &mut dyn Synth, now: Instant) -> bool {
    if !self.ready {
      warn!("Can not start, the instruments are not loaded yet");
      return false;
    }
    match self.state {
      PlayState::Playing => true,
      PlayState::Paused => {
        warn!("Can not start while paused, resume or stop first");
        false
      }
      PlayState::Stopped => {
        info!("Start playing");
        self.move_to(Position::start());
        self.state = PlayState::Playing;
        self.tick(tune, synth, now);
        true
      }
    }
  }

  pub fn resume(&mut self, tune: &Tune, synth: &mut dyn Synth, now: Instant) -> bool {
    if !self.ready {
      warn!("Can not resume, the instruments are not loaded yet");
      return false;
    }
    match self.state {
      PlayState::Playing => true,
      PlayState::Stopped => {
        warn!("Can not resume while stopped");
        false
      }
      PlayState::Paused => {
        info!("Resume playing at {:?}", self.position);
        self.state = PlayState::Playing;
        self.tick(tune, synth, now);
        true
      }
    }
  }

  pub fn pause(&mut self, synth: &mut dyn Synth) -> bool {
    if self.state != PlayState::Playing {
      return false;
    }
    info!("Pause at {:?}", self.position);
    self.state = PlayState::Paused;
    self.next_tick = None;
    self.silence(synth);
    true
  }

  pub fn stop(&mut self, synth: &mut dyn Synth) -> bool {
    if self.state == PlayState::Stopped {
      return false;
    }
    info!("Stop");
    self.state = PlayState::Stopped;
    self.next_tick = None;
    self.silence(synth);
    self.move_to(Position::start());
    true
  }

  pub fn toggle(&mut self, tune: &Tune, synth: &mut dyn Synth, now: Instant) -> bool {
    match self.state {
      PlayState::Playing => self.pause(synth),
      PlayState::Paused => self.resume(tune, synth, now),
      PlayState::Stopped => self.start(tune, synth, now),
    }
  }

  pub fn set_play_position(&mut self, position: Position, tune: &Tune) -> bool {
    if tune.contains(position) {
      self.move_to(position);
      true
    } else {
      debug!("Rejected play position {:?}", position);
      false
    }
  }

  ///! Moves the cursor a number of bars, wrapping around the tune
  pub fn offset_bars(&mut self, bars: i32, tune: &Tune) {
    let position =
      self
        .position
        .offset_cyclic(Offset::new().bars(bars), tune.get_signature(), tune.num_bars());
    self.move_to(position);
  }

  ///! Brings the cursor back to the start if the tune no longer contains it
  pub fn fit_position(&mut self, tune: &Tune) {
    if !tune.contains(self.position) {
      debug!("Play position {:?} is outside the tune", self.position);
      self.move_to(Position::start());
    }
  }

  pub fn tick(&mut self, tune: &Tune, synth: &mut dyn Synth, now: Instant) {
    if self.state != PlayState::Playing {
      return;
    }

    self.next_tick = Some(now + tune.get_tempo().sub_beat_interval());

    self.play_notes(tune, synth);
    self.send(PlayerEvent::Play);

    let next =
      self
        .position
        .offset_cyclic(Offset::new().sub_beats(1), tune.get_signature(), tune.num_bars());
    self.move_to(next);
  }

  pub fn load_instruments(&mut self, tune: &Tune, synth: &mut dyn Synth) {
    self.silence(synth);
    self.instruments.load_all(tune.get_parts(), synth);
    self.update_ready(tune.num_parts());
  }

  ///! Reloads the instrument of a part after it was added or changed
  pub fn load_instrument(&mut self, index: usize, tune: &Tune, synth: &mut dyn Synth) {
    if let Some(part) = tune.get_part(index) {
      for note in self.sounding.clear_part(index) {
        synth.note_off(index as U4, note.key);
      }
      self.instruments.load(index, part, synth);
      self.update_ready(tune.num_parts());
    }
  }

  ///! Forgets a deleted part, moving the following parts one channel down.
  ///! The notes of the moved parts are released on the channel that played them.
  pub fn remove_instrument(&mut self, index: usize, tune: &Tune, synth: &mut dyn Synth) {
    for (part, note) in self.sounding.remove_from(index) {
      synth.note_off(part as U4, note.key);
    }
    self.instruments.remove(index, synth);
    self.update_ready(tune.num_parts());
  }

  pub fn poll_loads(&mut self, tune: &Tune, synth: &mut dyn Synth) -> bool {
    let changed = self.instruments.poll(synth);
    self.update_ready(tune.num_parts());
    changed
  }

  pub fn pending_loads(&self) -> Vec<&Receiver<LoadResult>> {
    self.instruments.pending_receivers()
  }

  fn play_notes(&mut self, tune: &Tune, synth: &mut dyn Synth) {
    for (index, part) in tune.get_parts().iter().enumerate() {
      let instrument = match self.instruments.get(index) {
        Some(loaded) => loaded.get_instrument(),
        None => continue,
      };

      let channel = index as U4;
      let velocity = self.velocity(tune.get_volume(), part.get_volume());

      for (string, fret) in part.get_notes(self.position) {
        if let Some(previous) = self.sounding.remove(index, string) {
          trace!("Part {} string {} releases {}", index, string, previous.pitch);
          synth.note_off(channel, previous.key);
        }

        let pitch = match instrument.pitch_at(string, fret) {
          Some(pitch) => pitch,
          None => continue,
        };
        match pitch.midi_key() {
          Some(key) => {
            trace!("{:?} part {} string {}: {} ({})", self.position, index, string, pitch, key);
            synth.note_on(channel, key, velocity);
            self.sounding.insert(index, string, SoundingNote { pitch, key });
          }
          None => debug!("Pitch {} can not be played", pitch),
        }
      }
    }
  }

  fn velocity(&self, tune_volume: f64, part_volume: f64) -> U7 {
    let velocity = (MAX_VELOCITY * tune_volume * part_volume * self.note_volume).round();
    velocity.max(0.0).min(MAX_VELOCITY) as U7
  }

  fn silence(&mut self, synth: &mut dyn Synth) {
    for (part, note) in self.sounding.drain() {
      synth.note_off(part as U4, note.key);
    }
  }

  fn move_to(&mut self, position: Position) {
    self.position = position;
    self.send(PlayerEvent::PositionChanged(position));
  }

  fn update_ready(&mut self, num_parts: usize) {
    let ready = self.instruments.is_ready(num_parts);
    if ready && !self.ready {
      info!("Player ready");
      self.send(PlayerEvent::Ready);
    }
    self.ready = ready;
  }

  fn send(&self, event: PlayerEvent) {
    drop(self.events.send(event));
  }
}
