use failure::Error;

use serde_derive::Deserialize;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::player::Player;
use crate::sequence::{CompileOptions, DelayPolicy};
use crate::time::{Tempo, TicksPerBeat, DEFAULT_TICKS_PER_BEAT};
use crate::timeline::Normalizer;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Timing {
  pub bpm: f64,
  pub ticks_per_beat: TicksPerBeat,
  pub quantize: bool,
}

impl Default for Timing {
  fn default() -> Timing {
    Timing {
      bpm: f64::from(Tempo::default()),
      ticks_per_beat: DEFAULT_TICKS_PER_BEAT,
      quantize: true,
    }
  }
}

impl Timing {
  pub fn tempo(&self) -> Tempo {
    Tempo::new(self.bpm)
  }

  pub fn normalizer(&self) -> Normalizer {
    Normalizer::new(self.tempo(), self.ticks_per_beat, self.quantize)
  }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Compile {
  pub negative_delays: DelayPolicy,
}

impl Compile {
  pub fn options(&self) -> CompileOptions {
    CompileOptions::new(self.negative_delays)
  }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Playback {
  #[serde(rename = "loop")]
  pub looping: bool,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
  pub timing: Timing,
  pub compile: Compile,
  pub playback: Playback,
}

impl Config {
  pub fn from_file<P>(path: P) -> Result<Config, Error>
  where
    P: AsRef<Path>,
  {
    let mut content = String::new();
    let mut file = File::open(path)?;
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

  pub fn player(&self) -> Player {
    Player::new(self.timing.tempo(), self.playback.looping)
  }
}
