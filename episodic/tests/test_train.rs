use anyhow::Result;
use episodic::{
    config::TrainConfig,
    corridor::{CorridorConfig, Move},
    train::train,
};
use episodic_core::{exploration::ExplorerConfig, RunnerConfig};
use tempdir::TempDir;
use test_log::test;

fn config(n_workers: usize, max_episodes: usize) -> TrainConfig {
    TrainConfig::default()
        .n_workers(n_workers)
        .runner(
            RunnerConfig::default()
                .max_episodes(max_episodes)
                .max_timesteps_per_episode(100)
                .action_repeat(1),
        )
        .exploration(ExplorerConfig::EpsilonAnneal {
            epsilon: 1.0,
            epsilon_final: 0.05,
            epsilon_timesteps: 1000,
        })
        .corridor(CorridorConfig::default().length(5))
}

#[test]
fn test_sequential_training_reaches_goal() -> Result<()> {
    let (agent, history) = train(&config(1, 300), None)?;

    assert_eq!(history.len(), 300);
    let indices = history.iter().map(|r| r.episode_index).collect::<Vec<_>>();
    assert_eq!(indices, (0..300).collect::<Vec<_>>());
    assert!(history.mean_reward_last(50).unwrap() > 0.5);
    assert_eq!(agent.greedy(0), Move::Right);
    Ok(())
}

#[test]
fn test_async_training_writes_monitor() -> Result<()> {
    let dir = TempDir::new("train")?;
    let path = dir.path().join("monitor.csv");

    let (_, history) = train(&config(3, 60), Some(&path))?;

    assert_eq!(history.len(), 60);
    let text = std::fs::read_to_string(&path)?;
    assert_eq!(text.lines().count(), history.total_timesteps() + 1);
    Ok(())
}

#[test]
fn test_invalid_exploration_fails_before_running() {
    let config = config(1, 10).exploration(ExplorerConfig::EpsilonAnneal {
        epsilon: 1.0,
        epsilon_final: 0.1,
        epsilon_timesteps: 0,
    });
    assert!(train(&config, None).is_err());
}
