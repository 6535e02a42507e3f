use failure::Error;

use serde_derive::Deserialize;

use std::fs::File;
use std::io::Read;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TuneDefaults {
  pub bpm: u16,
  pub beats_per_bar: u8,
  pub volume: f64,
  pub bars: u32,
}

impl Default for TuneDefaults {
  fn default() -> TuneDefaults {
    TuneDefaults {
      bpm: 120,
      beats_per_bar: 4,
      volume: 1.0,
      bars: 16,
    }
  }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Player {
  pub note_volume: f64,
}

impl Default for Player {
  fn default() -> Player {
    Player { note_volume: 1.0 }
  }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
  pub tune: TuneDefaults,
  pub player: Player,
}

impl Config {
  pub fn from_file<'a, T>(path: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let mut content = String::new();
    let path_str = path.into();
    let mut file = File::open(path_str)?;
    file.read_to_string(&mut content)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
  }

  pub fn from_str<'a, T>(content: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let config: Config = toml::from_str(content.into())?;
    Ok(config)
  }
}
