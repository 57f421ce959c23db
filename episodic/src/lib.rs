//! Trains a tabular Q-learning agent on a corridor with the runners of
//! [`episodic_core`] and [`episodic_async_runner`].
pub mod config;
pub mod corridor;
pub mod monitor;
pub mod q_learning;
pub mod train;
