#![warn(missing_docs)]
//! Episodic training loops for reinforcement learning.
//!
//! This crate drives the interaction of an [`Agent`] with an [`Env`]
//! episode by episode, while an exploration schedule decays the rate at which
//! the agent acts randomly.
//!
//! * [`exploration`] - exploration schedules sharing the
//!   [`Exploration`](exploration::Exploration) contract
//! * [`EpisodeExecutor`] - runs one episode
//! * [`Runner`] - runs a bounded number of episodes and reports each of them to
//!   a callback
//! * [`record`] - key-value records for monitoring
//!
//! ```rust
//! use episodic_core::{
//!     dummy::{CountingEnv, CountingEnvConfig, RecordingAgent},
//!     exploration::EpsilonAnneal,
//!     Env, Progress, Runner, RunnerConfig, RunnerState,
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! let env = CountingEnv::build(&CountingEnvConfig::default().episode_length(10), 0)?;
//! let explorer = EpsilonAnneal::new(1.0, 0.1, 100)?;
//! let config = RunnerConfig::default().max_episodes(5).action_repeat(1);
//! let mut runner = Runner::build(config, RecordingAgent::default(), env, explorer)?;
//!
//! let state = runner.run(|r| {
//!     println!("episode {} return {:?}", r.episode(), r.history().last());
//!     Ok(true)
//! })?;
//! assert_eq!(state, RunnerState::Completed);
//! assert_eq!(runner.history().len(), 5);
//! # Ok(())
//! # }
//! ```
pub mod dummy;
pub mod error;
pub mod exploration;
pub mod record;

mod base;
pub use base::{Agent, Env, SharedAgent, Step, Transition};
pub use error::EpisodicError;

mod runner;
pub use runner::{
    EpisodeExecutor, EpisodeRecord, Progress, RunHistory, Runner, RunnerConfig, RunnerState,
};
