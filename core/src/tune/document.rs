//! The serialised form of a tune, as exchanged with files and the persistence store.

use serde_derive::{Deserialize, Serialize};

use super::error::TuneError;
use super::DEFAULT_BARS;

fn default_bars() -> u32 {
  DEFAULT_BARS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TuneDocument {
  #[serde(default)]
  pub name: String,
  pub bpm: u16,
  pub beats_per_bar: u8,
  pub volume: f64,
  #[serde(default = "default_bars")]
  pub bars: u32,
  #[serde(default)]
  pub parts: Vec<PartDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartDocument {
  #[serde(default)]
  pub name: String,
  pub instrument_name: String,
  pub sound_id: String,
  pub volume: f64,
  #[serde(default)]
  pub notes: Vec<NoteDocument>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDocument {
  pub bar: u32,
  pub beat: u8,
  pub sub_beat: u8,
  pub string: u8,
  pub fret: u8,
}

impl TuneDocument {
  pub fn from_json(json: &str) -> Result<TuneDocument, TuneError> {
    serde_json::from_str(json).map_err(|err| TuneError::Malformed {
      cause: err.to_string(),
    })
  }

  pub fn to_json(&self) -> Result<String, TuneError> {
    serde_json::to_string(self).map_err(|err| TuneError::Malformed {
      cause: err.to_string(),
    })
  }
}

#[cfg(test)]
mod test {

  use super::{NoteDocument, TuneDocument};
  use crate::tune::error::TuneError;

  #[test]
  pub fn from_json() {
    let json = r#"{
      "bpm": 96,
      "beatsPerBar": 3,
      "volume": 0.5,
      "parts": [{
        "name": "melody",
        "instrumentName": "violin",
        "soundId": "violin",
        "volume": 1.0,
        "notes": [{"bar": 2, "beat": 1, "subBeat": 3, "string": 1, "fret": 7}]
      }]
    }"#;

    let doc = TuneDocument::from_json(json).unwrap();
    assert_eq!(doc.name, "");
    assert_eq!(doc.bpm, 96);
    assert_eq!(doc.beats_per_bar, 3);
    assert_eq!(doc.bars, 16);
    assert_eq!(doc.parts.len(), 1);
    assert_eq!(doc.parts[0].instrument_name, "violin");
    assert_eq!(
      doc.parts[0].notes,
      vec![NoteDocument {
        bar: 2,
        beat: 1,
        sub_beat: 3,
        string: 1,
        fret: 7
      }]
    );
  }

  #[test]
  pub fn to_json_uses_camel_case() {
    let doc = TuneDocument {
      name: "reel".to_string(),
      bpm: 120,
      beats_per_bar: 4,
      volume: 1.0,
      bars: 8,
      parts: Vec::new(),
    };
    let json = doc.to_json().unwrap();
    assert!(json.contains("\"beatsPerBar\":4"));
    assert_eq!(TuneDocument::from_json(&json), Ok(doc));
  }

  #[test]
  pub fn malformed() {
    match TuneDocument::from_json("{\"bpm\": \"fast\"}") {
      Err(TuneError::Malformed { .. }) => {}
      other => panic!("unexpected result: {:?}", other),
    }
  }
}
