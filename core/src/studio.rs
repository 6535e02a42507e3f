use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};
use failure::Error;
use log::{debug, info, warn};

use crate::config::Config;
use crate::events::{PlayerEvent, TuneEvent};
use crate::instrument::{Catalog, Fret, Instrument};
use crate::player::Player;
use crate::storage::Store;
use crate::synth::{LoadResult, Synth};
use crate::time::{Direction, NoteAddress, Offset, Policy, Position, StringMove};
use crate::tune::{Part, Tune, TuneDocument, TuneError};

pub struct Studio {
  config: Config,
  catalog: Catalog,
  tune: Tune,
  player: Player,
  synth: Box<dyn Synth + Send>,
  events: Sender<TuneEvent>,
}

impl Studio {
  pub fn new(
    config: Config,
    synth: Box<dyn Synth + Send>,
    player_events: Sender<PlayerEvent>,
    tune_events: Sender<TuneEvent>,
  ) -> Studio {
    let tune = Tune::with_defaults(&config.tune);
    let player = Player::new(&config.player, player_events);
    let mut studio = Studio {
      config,
      catalog: Catalog::default(),
      tune,
      player,
      synth,
      events: tune_events,
    };
    studio.player.load_instruments(&studio.tune, studio.synth.as_mut());
    studio
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn catalog(&self) -> &Catalog {
    &self.catalog
  }

  pub fn tune(&self) -> &Tune {
    &self.tune
  }

  pub fn player(&self) -> &Player {
    &self.player
  }

  ///! Replaces the tune, stopping the playback and loading the new instruments
  pub fn load_tune(&mut self, tune: Tune) {
    self.player.stop(self.synth.as_mut());
    self.tune = tune;
    self.player.fit_position(&self.tune);
    self.player.load_instruments(&self.tune, self.synth.as_mut());
    info!(
      "Loaded tune {:?} with {} parts",
      self.tune.get_name(),
      self.tune.num_parts()
    );
    self.send(TuneEvent::Loaded);
  }

  pub fn try_import_tune(&mut self, json: &str) -> Result<(), TuneError> {
    let doc = TuneDocument::from_json(json)?;
    let tune = Tune::from_document(&doc, &self.catalog)?;
    self.load_tune(tune);
    Ok(())
  }

  ///! Loads a tune document. An invalid document leaves the current tune untouched.
  pub fn import_tune(&mut self, json: &str) -> bool {
    match self.try_import_tune(json) {
      Ok(()) => true,
      Err(err) => {
        warn!("Rejected tune document: {}", err);
        false
      }
    }
  }

  pub fn export_tune(&self) -> Result<String, TuneError> {
    self.tune.to_document().to_json()
  }

  pub fn save(&self, store: &mut dyn Store, key: &str) -> Result<(), Error> {
    let json = self.export_tune()?;
    store.set(key, json)?;
    info!("Saved the tune as {}", key);
    Ok(())
  }

  ///! Returns whether a valid tune was found under the key
  pub fn load(&mut self, store: &dyn Store, key: &str) -> Result<bool, Error> {
    match store.get(key)? {
      Some(json) => Ok(self.import_tune(&json)),
      None => {
        debug!("Nothing stored as {}", key);
        Ok(false)
      }
    }
  }

  ///! Every tune kept in the store, by key
  pub fn list_tunes(&self, store: &dyn Store) -> Result<Vec<String>, Error> {
    Ok(store.keys()?)
  }

  ///! Returns whether a tune was stored under the key. The tune being edited is kept.
  pub fn delete_tune(&self, store: &mut dyn Store, key: &str) -> Result<bool, Error> {
    let deleted = store.delete(key)?;
    if deleted {
      info!("Deleted the tune {}", key);
    }
    Ok(deleted)
  }

  ///! Replaces the tune with an empty one built from the configured defaults.
  ///! With an instrument, the tune starts with a part playing its default sound.
  pub fn new_tune(&mut self, name: &str, instrument: Option<&str>) -> bool {
    let mut tune = Tune::with_defaults(&self.config.tune);
    tune.set_name(name);

    if let Some(instrument) = instrument {
      let result = self
        .instrument_and_sound(instrument, None)
        .and_then(|(instrument, sound)| {
          let name = instrument.get_name().to_string();
          Part::new(name, instrument, &sound, 1.0)
        })
        .and_then(|part| tune.add_part(part));

      if let Err(err) = result {
        debug!("Rejected new tune: {}", err);
        return false;
      }
    }

    self.load_tune(tune);
    true
  }

  pub fn set_name<T>(&mut self, name: T)
  where
    T: Into<String>,
  {
    self.tune.set_name(name);
  }

  ///! Adds a part playing an instrument of the catalogue, with its default sound unless one is given
  pub fn add_part(&mut self, name: &str, instrument: &str, sound: Option<&str>) -> Option<usize> {
    let result = self
      .instrument_and_sound(instrument, sound)
      .and_then(|(instrument, sound)| Part::new(name, instrument, &sound, 1.0))
      .and_then(|part| self.tune.add_part(part));

    match result {
      Ok(index) => {
        self
          .player
          .load_instrument(index, &self.tune, self.synth.as_mut());
        self.send(TuneEvent::PartAdded { index });
        Some(index)
      }
      Err(err) => {
        debug!("Rejected new part: {}", err);
        None
      }
    }
  }

  pub fn update_part(&mut self, index: usize, name: &str, instrument: &str, sound: Option<&str>) -> bool {
    let result = self
      .instrument_and_sound(instrument, sound)
      .and_then(|(instrument, sound)| {
        let part = self.tune.get_part_mut(index)?;
        part.set_instrument(instrument, &sound)?;
        part.set_name(name);
        Ok(())
      });

    match result {
      Ok(()) => {
        self
          .player
          .load_instrument(index, &self.tune, self.synth.as_mut());
        self.player.fit_position(&self.tune);
        self.send(TuneEvent::PartUpdated { index });
        true
      }
      Err(err) => {
        debug!("Rejected part update: {}", err);
        false
      }
    }
  }

  pub fn delete_part(&mut self, index: usize) -> bool {
    match self.tune.delete_part(index) {
      Ok(part) => {
        debug!("Deleted part {} ({})", index, part.get_name());
        self
          .player
          .remove_instrument(index, &self.tune, self.synth.as_mut());
        self.player.fit_position(&self.tune);
        self.send(TuneEvent::PartDeleted { index });
        true
      }
      Err(err) => {
        debug!("Rejected part deletion: {}", err);
        false
      }
    }
  }

  pub fn set_part_volume(&mut self, index: usize, volume: f64) -> bool {
    self.tune.set_part_volume(index, volume)
  }

  pub fn set_note(&mut self, part: usize, address: NoteAddress, fret: Option<Fret>) -> bool {
    let done = self.tune.set_note(part, address, fret);
    if done {
      self.player.fit_position(&self.tune);
    }
    done
  }

  pub fn set_bpm(&mut self, bpm: u16) -> bool {
    self.tune.set_bpm(bpm)
  }

  pub fn set_beats_per_bar(&mut self, beats_per_bar: u8) -> bool {
    let done = self.tune.set_beats_per_bar(beats_per_bar);
    self.player.fit_position(&self.tune);
    done
  }

  pub fn set_volume(&mut self, volume: f64) -> bool {
    self.tune.set_volume(volume)
  }

  pub fn set_num_bars(&mut self, bars: u32) -> bool {
    let done = self.tune.set_num_bars(bars);
    self.player.fit_position(&self.tune);
    done
  }

  pub fn start(&mut self) -> bool {
    self
      .player
      .start(&self.tune, self.synth.as_mut(), Instant::now())
  }

  pub fn resume(&mut self) -> bool {
    self
      .player
      .resume(&self.tune, self.synth.as_mut(), Instant::now())
  }

  pub fn pause(&mut self) -> bool {
    self.player.pause(self.synth.as_mut())
  }

  pub fn stop(&mut self) -> bool {
    self.player.stop(self.synth.as_mut())
  }

  pub fn toggle(&mut self) -> bool {
    self
      .player
      .toggle(&self.tune, self.synth.as_mut(), Instant::now())
  }

  pub fn set_play_position(&mut self, position: Position) -> bool {
    self.player.set_play_position(position, &self.tune)
  }

  pub fn increment_bar(&mut self) {
    self.player.offset_bars(1, &self.tune);
  }

  pub fn decrement_bar(&mut self) {
    self.player.offset_bars(-1, &self.tune);
  }

  pub fn offset_position(&self, position: Position, offset: Offset, policy: Policy) -> Option<Position> {
    position.offset(
      offset,
      self.tune.get_signature(),
      self.tune.num_bars(),
      policy,
    )
  }

  pub fn jump_beat(&self, position: Position, direction: Direction, policy: Policy) -> Option<Position> {
    position.jump_beat(
      direction,
      self.tune.get_signature(),
      self.tune.num_bars(),
      policy,
    )
  }

  ///! Moves across the strings of the instrument played by a part
  pub fn move_string(&self, part: usize, address: NoteAddress, movement: StringMove) -> Option<NoteAddress> {
    let num_strings = self.tune.get_part(part)?.get_instrument().num_strings();
    address.move_string(movement, num_strings)
  }

  pub fn next_tick(&self) -> Option<Instant> {
    self.player.next_tick()
  }

  pub fn tick(&mut self, now: Instant) {
    self.player.tick(&self.tune, self.synth.as_mut(), now);
  }

  pub fn poll_loads(&mut self) -> bool {
    self.player.poll_loads(&self.tune, self.synth.as_mut())
  }

  pub fn pending_loads(&self) -> Vec<&Receiver<LoadResult>> {
    self.player.pending_loads()
  }

  fn instrument_and_sound(&self, name: &str, sound: Option<&str>) -> Result<(Instrument, String), TuneError> {
    let instrument = self
      .catalog
      .get(name)
      .ok_or_else(|| TuneError::UnknownInstrument {
        name: name.to_string(),
      })?;
    let sound = sound
      .or_else(|| instrument.default_sound())
      .ok_or_else(|| TuneError::UnknownSound {
        instrument: name.to_string(),
        sound: String::new(),
      })?;
    Ok((instrument.clone(), sound.to_string()))
  }

  fn send(&self, event: TuneEvent) {
    drop(self.events.send(event));
  }
}
