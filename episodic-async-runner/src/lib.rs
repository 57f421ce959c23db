#![warn(missing_docs)]
//! Runs episodes on several worker threads sharing one agent.
//!
//! # Messages
//! * From [`Worker`] to the aggregator of [`AsyncRunner`]
//!   - `EpisodeFinished`, the record of a finished episode with a reply channel
//!     the worker waits on before claiming another episode
//!   - `Failed`, the error that stopped a worker
//!   - `Exited`, the [`WorkerStat`] of a worker leaving its loop
//!
//! ```rust
//! use episodic_async_runner::{AsyncRunner, AsyncRunnerConfig};
//! use episodic_core::{
//!     dummy::{CountingEnv, CountingEnvConfig, RecordingAgent},
//!     exploration::EpsilonAnneal,
//!     Progress, RunnerConfig, RunnerState,
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = AsyncRunnerConfig::default()
//!     .n_workers(2)
//!     .runner(RunnerConfig::default().max_episodes(10).action_repeat(1));
//! let env_config = CountingEnvConfig::default().episode_length(5);
//! let explorer = EpsilonAnneal::new(1.0, 0.1, 100)?;
//! let mut runner: AsyncRunner<CountingEnv, _, _> =
//!     AsyncRunner::build(config, env_config, RecordingAgent::default(), explorer)?;
//!
//! let state = runner.run(|r| Ok(r.episode() <= 10))?;
//! assert_eq!(state, RunnerState::Completed);
//! assert_eq!(runner.history().len(), 10);
//! # Ok(())
//! # }
//! ```
mod async_runner;
mod messages;
mod worker;
pub use async_runner::{AsyncRunner, AsyncRunnerConfig};
pub use messages::WorkerMessage;
pub use worker::{worker_stats_fmt, Worker, WorkerStat};
