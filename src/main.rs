//! Headless head racer: drives the game with a synthetic head and logs progress.

use anyhow::Result;
use clap::Parser;
use head_racer::{
    app::{GameApp, LogRenderer},
    config::Config,
    landmarks::SyntheticSource,
};
use log::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Number of ticks to simulate (runs until game over if omitted)
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Random seed for the road, obstacles and synthetic head
    #[arg(short, long)]
    seed: Option<u64>,

    /// Pace ticks to the configured tick rate
    #[arg(long)]
    realtime: bool,

    /// Probability per frame that the synthetic face is lost
    #[arg(long, default_value = "0.0")]
    face_drop: f64,

    /// Print the final render state as YAML
    #[arg(long)]
    dump_state: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Head Racer");

    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if !args.realtime {
        // Synthetic frames are available immediately
        config.tracking.sample_interval_ms = 0;
    }

    let seed = config.seed.unwrap_or_else(rand::random);
    let source = SyntheticSource::new(seed, config.driving.tick_rate)
        .with_face_drop(args.face_drop.clamp(0.0, 1.0));
    let renderer = LogRenderer::new(config.display.status_interval);

    let mut app = GameApp::new(&config, source, renderer)?;
    app.start();
    app.run(args.ticks, args.realtime);

    if args.dump_state {
        println!("{}", serde_yaml::to_string(&app.simulator().render_state())?);
    }

    Ok(())
}
