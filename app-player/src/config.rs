use failure::Error;

use serde_derive::Deserialize;

use std::fs::File;
use std::io::Read;

use tab_studio_core::config::Config as StudioConfig;

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
  pub studio: StudioConfig,
  pub midi: Midi,
  pub storage: Storage,
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

  #[allow(dead_code)]
  pub fn from_str<'a, T>(content: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let config: Config = toml::from_str(content.into())?;
    Ok(config)
  }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub enum MidiOutput {
  #[serde(rename = "none")]
  None,
  #[serde(rename = "path")]
  Path(String),
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Midi {
  pub output: MidiOutput,
}

impl Default for Midi {
  fn default() -> Midi {
    Midi {
      output: MidiOutput::None,
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Storage {
  pub path: String,
  pub key: String,
}

impl Default for Storage {
  fn default() -> Storage {
    Storage {
      path: "tunes".to_string(),
      key: "default".to_string(),
    }
  }
}
