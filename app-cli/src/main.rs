use std::io::BufRead;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use log::{debug, info, LevelFilter};

use failure::{Error, Fail};

use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;

use notechain_core::{
  config::Config,
  timeline::{Normalizer, Timeline},
  CompiledTrack, Composition,
};

mod demo;

mod synth;
use crate::synth::LogSynth;

const NOTECHAIN_CONFIG: &str = "NOTECHAIN_CONFIG";
const DEFAULT_NOTECHAIN_CONFIG: &str = "notechain.toml";

const NOTECHAIN_LOG_CONFIG: &str = "NOTECHAIN_LOG_CONFIG";
const DEFAULT_NOTECHAIN_LOG_CONFIG: &str = "log4rs.yaml";

const LOG_PATTERN: &str = "{d(%H:%M:%S%.3f)} {h({l:5.5})} - {m}{n}";

#[derive(Debug, Fail)]
enum MainError {
  #[fail(display = "Failed to init logging: {}", cause)]
  LoggingInit { cause: String },

  #[fail(display = "Failed to start the player")]
  PlayerStart,
}

/// Compiles the demo composition into note events
#[derive(Debug, Parser)]
#[command(name = "notechain")]
#[command(version)]
struct Cli {
  /// Configuration file, overrides the NOTECHAIN_CONFIG variable
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Debug, PartialEq, Subcommand)]
enum Command {
  /// Print the normalized timeline of every track (default)
  Print,

  /// Play the tracks through the log synth
  Play,
}

fn main() -> Result<(), Error> {
  let cli = Cli::parse();

  init_logging()?;

  let config = init_config(cli.config)?;
  let command = cli.command.unwrap_or(Command::Print);

  let composition = demo::composition()?;

  let tracks = composition.compile_with(&config.compile.options())?;

  match command {
    Command::Print => print(&composition, tracks, config.timing.normalizer()),
    Command::Play => play(tracks, &config)?,
  }

  Ok(())
}

fn init_logging() -> Result<(), Error> {
  let log_config_path = std::env::var(NOTECHAIN_LOG_CONFIG)
    .unwrap_or_else(|_| DEFAULT_NOTECHAIN_LOG_CONFIG.to_string());

  if std::path::Path::new(&log_config_path).exists() {
    log4rs::init_file(log_config_path.as_str(), Default::default()).map_err(|err| {
      MainError::LoggingInit {
        cause: err.to_string(),
      }
    })?;
  } else {
    let stdout = ConsoleAppender::builder()
      .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
      .build();
    let log_config = LogConfig::builder()
      .appender(Appender::builder().build("stdout", Box::new(stdout)))
      .build(Root::builder().appender("stdout").build(LevelFilter::Info))
      .map_err(|err| MainError::LoggingInit {
        cause: err.to_string(),
      })?;
    log4rs::init_config(log_config).map_err(|err| MainError::LoggingInit {
      cause: err.to_string(),
    })?;
  }

  Ok(())
}

fn init_config(path: Option<PathBuf>) -> Result<Config, Error> {
  let config_path = path.unwrap_or_else(|| {
    std::env::var(NOTECHAIN_CONFIG)
      .unwrap_or_else(|_| DEFAULT_NOTECHAIN_CONFIG.to_string())
      .into()
  });

  let config = if config_path.exists() {
    info!("Loading configuration from {} ...", config_path.display());
    Config::from_file(&config_path)?
  } else {
    info!("No configuration at {}, using defaults", config_path.display());
    Config::default()
  };
  debug!("{:#?}", config);

  Ok(config)
}

fn print(composition: &Composition, tracks: Vec<CompiledTrack>, normalizer: Normalizer) {
  let timelines = normalizer.apply_all(
    tracks
      .into_iter()
      .map(|track| ((track.id, track.instrument), track.events))
      .collect(),
  );

  info!(
    "{} root sequences, {} tracks at {} bpm",
    composition.roots().len(),
    timelines.len(),
    normalizer.tempo.get_value()
  );

  for ((id, instrument), timeline) in timelines {
    println!("# {} (program {}, {} events)", id, instrument, timeline.len());
    match timeline {
      Timeline::Ticks(events) => {
        for event in events {
          println!("{:>8} {:?} {} {}", u64::from(event.time), event.kind, event.key, event.velocity);
        }
      }
      Timeline::Seconds(events) => {
        for event in events {
          println!("{:>8.4} {:?} {} {}", event.time, event.kind, event.key, event.velocity);
        }
      }
    }
  }
}

fn play(tracks: Vec<CompiledTrack>, config: &Config) -> Result<(), Error> {
  let player = config.player();
  let handle = player.spawn(tracks, LogSynth);

  if player.looping {
    info!("Press enter to stop ...");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    handle.stop();
  }

  let (stats, _synth) = handle.join().ok_or(MainError::PlayerStart)?;
  let stats = stats?;
  info!("Played {} events in {} passes", stats.events, stats.passes);

  Ok(())
}
