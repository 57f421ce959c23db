//! Runs episodes on its own environment, sharing the agent with other workers.
mod base;
mod stat;
pub use base::Worker;
pub use stat::{worker_stats_fmt, WorkerStat};
