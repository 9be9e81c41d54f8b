use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lane_rhythm_core::{Chart, GameConfig};
use tracing_subscriber::EnvFilter;

mod simulate;

use simulate::{PressScript, SimulationOptions};

fn main() -> lane_rhythm_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { chart } => run_check(&chart),
        Commands::Simulate {
            chart,
            config,
            inputs,
            autoplay,
            realtime,
            fps,
            song_length,
        } => {
            let config = match config {
                Some(path) => GameConfig::from_path(path)?,
                None => GameConfig::default(),
            };
            let script = match inputs {
                Some(path) => PressScript::from_path(path)?,
                None => PressScript::default(),
            };
            let options = SimulationOptions {
                autoplay,
                realtime,
                fps,
                song_length,
            };
            simulate::run(&chart, config, script, options)
        }
    }
}

fn run_check(path: &PathBuf) -> lane_rhythm_core::Result<()> {
    tracing::info!(?path, "checking chart");
    let chart = Chart::from_path(path)?;
    let lanes = chart.cues.lane_counts();

    println!("cues:        {}", chart.cues.len());
    println!("bpm:         {}", chart.bpm);
    println!("song offset: {}", chart.song_offset);
    println!("last cue:    {:.3}s", chart.cues.last_time().unwrap_or(0.0));
    for (lane, count) in lanes.iter().enumerate() {
        println!("lane {lane}:      {count}");
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Four-lane rhythm game judge", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a chart file and print a summary of its cues.
    Check {
        /// Path to the JSON chart.
        chart: PathBuf,
    },
    /// Play a chart against scripted presses on a simulated clock.
    Simulate {
        /// Path to the JSON chart. An unreadable chart plays with no cues.
        chart: PathBuf,
        /// Optional JSON game configuration.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// JSON list of `{ "time": seconds, "lane": 0..=3 }` presses in song time.
        #[arg(short, long)]
        inputs: Option<PathBuf>,
        /// Press every cue's lane exactly on time.
        #[arg(long)]
        autoplay: bool,
        /// Run at wall-clock speed instead of as fast as possible.
        #[arg(long)]
        realtime: bool,
        /// Simulated frames per second.
        #[arg(long, default_value_t = 60)]
        fps: u32,
        /// Song length in seconds. Defaults to one second past the last cue's
        /// late window.
        #[arg(long)]
        song_length: Option<f64>,
    },
}
