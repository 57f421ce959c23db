//! Runs episodes on several worker threads.
mod base;
mod config;
pub use base::AsyncRunner;
pub use config::AsyncRunnerConfig;
