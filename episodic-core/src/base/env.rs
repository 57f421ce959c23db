//! Environment.
use super::Step;
use anyhow::Result;
use std::fmt::Debug;

/// Represents an environment, typically an MDP.
///
/// The runners never look inside observations or actions. An environment
/// instance is assumed to be stateful and non-reentrant, so each worker of an
/// asynchronous runner builds and owns its own instance with [`Env::build`].
///
/// A wrapper implementing [`Env`] around another [`Env`] sees every reset and
/// step boundary, which is how monitoring is attached.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Clone + Debug;

    /// Action of the environment.
    type Act: Clone + Debug;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Resets the environment and returns the initial observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Performes an environment step.
    fn step(&mut self, act: &Self::Act) -> Result<Step<Self::Obs>>;
}
