//! Environment step.
use super::Env;

/// Represents an observation, reward and terminal flag `(o_t+1, r_t, done)`.
///
/// An environment emits [`Step`] object at every interaction steps.
#[derive(Clone, Debug)]
pub struct Step<O> {
    /// Observation.
    pub obs: O,

    /// Reward.
    pub reward: f32,

    /// Flag denoting if episode is terminated.
    pub is_terminated: bool,
}

impl<O> Step<O> {
    /// Constructs a [`Step`] object.
    pub fn new(obs: O, reward: f32, is_terminated: bool) -> Self {
        Step {
            obs,
            reward,
            is_terminated,
        }
    }
}

/// A transition `(o_t, a_t, r_t, o_t+1, done)` handed to [`Agent::learn`].
///
/// With action repeat, `reward` is the sum over the repeated environment
/// steps and `next_obs` is the observation after the last of them.
///
/// [`Agent::learn`]: crate::Agent::learn
pub struct Transition<'a, E: Env> {
    /// Observation the action was chosen on.
    pub obs: &'a E::Obs,

    /// Action.
    pub act: &'a E::Act,

    /// Accumulated reward.
    pub reward: f32,

    /// Resulting observation.
    pub next_obs: &'a E::Obs,

    /// Flag denoting if episode is terminated.
    pub is_terminated: bool,
}
