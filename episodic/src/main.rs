use anyhow::Result;
use clap::Parser;
use episodic::{config::TrainConfig, train::train};
use log::info;
use std::path::PathBuf;

/// Train a Q-learning agent on a corridor
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Configuration file in YAML; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of episodes
    #[arg(short, long)]
    episodes: Option<usize>,

    /// Maximum number of timesteps per episode
    #[arg(short = 't', long)]
    max_timesteps: Option<usize>,

    /// Number of environment steps each action is applied for
    #[arg(short, long)]
    repeat_actions: Option<usize>,

    /// Number of workers; 1 runs episodes sequentially
    #[arg(short, long)]
    workers: Option<usize>,

    /// Number of cells of the corridor
    #[arg(long)]
    corridor_length: Option<usize>,

    /// Seed of the agent
    #[arg(long)]
    seed: Option<u64>,

    /// Save environment steps to this CSV file
    #[arg(short, long)]
    monitor: Option<PathBuf>,

    /// Save the configuration of the run to this YAML file
    #[arg(long)]
    save_config: Option<PathBuf>,
}

fn config(args: &Args) -> Result<TrainConfig> {
    let mut config = match &args.config {
        Some(path) => TrainConfig::load(path)?,
        None => TrainConfig::default(),
    };
    if let Some(v) = args.episodes {
        config.runner = config.runner.max_episodes(v);
    }
    if let Some(v) = args.max_timesteps {
        config.runner = config.runner.max_timesteps_per_episode(v);
    }
    if let Some(v) = args.repeat_actions {
        config.runner = config.runner.action_repeat(v);
    }
    if let Some(v) = args.workers {
        config.n_workers = v;
    }
    if let Some(v) = args.corridor_length {
        config.corridor.length = v;
    }
    if let Some(v) = args.seed {
        config.agent.seed = v;
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = config(&args)?;
    info!("{:?}", config);

    if let Some(path) = &args.save_config {
        config.save(path)?;
    }

    train(&config, args.monitor.as_deref())?;

    Ok(())
}
