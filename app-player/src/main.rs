use std::io::BufRead;
use std::thread;

use log::{debug, info, trace, warn};

use failure::{Error, Fail};

use crossbeam_channel::{Receiver, Select};

use tab_studio_core::events::{PlayerEvent, TuneEvent};
use tab_studio_core::storage::FileStore;
use tab_studio_core::studio::Studio;

mod config;
use crate::config::Config;

mod console;
use crate::console::Command;

mod synth;
use crate::synth::RawMidiSynth;

mod worker;
use crate::worker::{Protocol, Worker};

const TAB_STUDIO_CONFIG: &str = "TAB_STUDIO_CONFIG";
const DEFAULT_TAB_STUDIO_CONFIG: &str = "tab-studio.toml";

const TAB_STUDIO_LOG_CONFIG: &str = "TAB_STUDIO_LOG_CONFIG";
const DEFAULT_TAB_STUDIO_LOG_CONFIG: &str = "log4rs.yaml";

#[derive(Debug, Fail)]
enum MainError {
  #[fail(display = "Failed to init logging: {}", cause)]
  LoggingInit { cause: String },

  #[fail(display = "Failed to start the events thread: {}", cause)]
  EventsInit { cause: String },
}

fn main() -> Result<(), Error> {
  init_logging()?;

  let config = init_config()?;

  let mut store = FileStore::new(config.storage.path.as_str())?;

  let (player_tx, player_rx) = crossbeam_channel::unbounded::<PlayerEvent>();
  let (tune_tx, tune_rx) = crossbeam_channel::unbounded::<TuneEvent>();
  init_events(player_rx, tune_rx)?;

  let studio = init_studio(&config, &store, player_tx, tune_tx)?;

  let worker = Worker::new(studio)?;

  run_console(&worker);

  let studio = worker.stop()?;

  studio.save(&mut store, config.storage.key.as_str())?;

  Ok(())
}

fn init_logging() -> Result<(), Error> {
  let log_config_path = std::env::var(TAB_STUDIO_LOG_CONFIG)
    .unwrap_or_else(|_| DEFAULT_TAB_STUDIO_LOG_CONFIG.to_string());

  log4rs::init_file(log_config_path.as_str(), Default::default()).map_err(|err| {
    MainError::LoggingInit {
      cause: err.to_string(),
    }
  })?;

  Ok(())
}

fn init_config() -> Result<Config, Error> {
  let config_path =
    std::env::var(TAB_STUDIO_CONFIG).unwrap_or_else(|_| DEFAULT_TAB_STUDIO_CONFIG.to_string());

  info!("Loading configuration from {} ...", config_path);
  let config = Config::from_file(config_path.as_str())?;
  debug!("{:#?}", config);

  Ok(config)
}

fn init_events(player_rx: Receiver<PlayerEvent>, tune_rx: Receiver<TuneEvent>) -> Result<(), Error> {
  thread::Builder::new()
    .name("events".into())
    .spawn(move || {
      let mut sel = Select::new();
      let player_index = sel.recv(&player_rx);
      let tune_index = sel.recv(&tune_rx);

      loop {
        let oper = sel.select();
        match oper.index() {
          index if index == player_index => match oper.recv(&player_rx) {
            Ok(PlayerEvent::PositionChanged(position)) => trace!("{:?}", position),
            Ok(PlayerEvent::Play) => {}
            Ok(event) => info!("{:?}", event),
            Err(_) => break,
          },
          index if index == tune_index => match oper.recv(&tune_rx) {
            Ok(event) => info!("{:?}", event),
            Err(_) => break,
          },
          _ => unreachable!(),
        }
      }
    })
    .map_err(|err| MainError::EventsInit {
      cause: err.to_string(),
    })?;

  Ok(())
}

fn init_studio(
  config: &Config,
  store: &FileStore,
  player_tx: crossbeam_channel::Sender<PlayerEvent>,
  tune_tx: crossbeam_channel::Sender<TuneEvent>,
) -> Result<Studio, Error> {
  info!("Initialising the studio ...");

  let synth = RawMidiSynth::new(&config.midi)?;

  let mut studio = Studio::new(config.studio.clone(), Box::new(synth), player_tx, tune_tx);

  let key = config.storage.key.as_str();
  if !studio.load(store, key)? {
    info!("Starting with an empty tune, it will be saved as {}", key);
  }

  Ok(studio)
}

fn run_console(worker: &Worker) {
  println!("{}", console::HELP);

  let protocol_tx = worker.sender();
  let stdin = std::io::stdin();
  for line in stdin.lock().lines() {
    let line = match line {
      Ok(line) => line,
      Err(err) => {
        warn!("Failed to read the console: {}", err);
        break;
      }
    };

    match console::parse(&line) {
      Ok(Some(Command::Quit)) => break,
      Ok(Some(command)) => {
        if protocol_tx.send(Protocol::Command(command)).is_err() {
          warn!("The player is gone");
          break;
        }
      }
      Ok(None) => {}
      Err(err) => println!("{}\n{}", err, console::HELP),
    }
  }
}
