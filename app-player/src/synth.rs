use std::fs::OpenOptions;
use std::io::Write;

use log::{debug, info, warn};

use tab_studio_core::midi::encoder::Encoder;
use tab_studio_core::midi::types::U4;
use tab_studio_core::midi::{gm, Message};
use tab_studio_core::synth::{LoadHandle, Synth, SynthError};

use crate::config::{Midi as MidiConfig, MidiOutput};

const MAX_CHANNELS: U4 = 16;

///! Writes raw MIDI bytes to a device node or a file. Every General MIDI sound is always available.
pub struct RawMidiSynth {
  output: Option<Box<dyn Write + Send>>,
}

impl RawMidiSynth {
  pub fn new(config: &MidiConfig) -> Result<RawMidiSynth, SynthError> {
    let output = match &config.output {
      MidiOutput::None => {
        info!("No MIDI output configured, playing silently");
        None
      }
      MidiOutput::Path(path) => {
        info!("Opening MIDI output {} ...", path);
        let file = OpenOptions::new()
          .write(true)
          .create(true)
          .append(true)
          .open(path)
          .map_err(|err| SynthError::Output {
            cause: format!("{}: {}", path, err),
          })?;
        Some(Box::new(file) as Box<dyn Write + Send>)
      }
    };

    Ok(RawMidiSynth { output })
  }
}

impl Synth for RawMidiSynth {
  fn load_instrument(&mut self, sound: &str) -> LoadHandle {
    if gm::program(sound).is_some() {
      debug!("Sound {} is a General MIDI program", sound);
      LoadHandle::ready(sound)
    } else {
      LoadHandle::failed(SynthError::UnknownSound {
        sound: sound.to_string(),
      })
    }
  }

  fn send(&mut self, message: Message) {
    if let Some(output) = self.output.as_mut() {
      let data = Encoder::to_vec(&message);
      if let Err(err) = output.write_all(&data).and_then(|()| output.flush()) {
        let err = SynthError::Output {
          cause: err.to_string(),
        };
        warn!("{}: {:?}", err, message);
      }
    }
  }
}

impl Drop for RawMidiSynth {
  fn drop(&mut self) {
    for channel in 0..MAX_CHANNELS {
      self.all_notes_off(channel);
    }
  }
}
