//! Deterministic environment and agent used for tests.
use crate::{Agent, Env, Step, Transition};
use anyhow::{bail, Result};

/// Configuration of [`CountingEnv`].
#[derive(Clone, Debug, Default)]
pub struct CountingEnvConfig {
    /// Steps until the terminal signal; `None` never terminates.
    pub episode_length: Option<usize>,

    /// The step of an episode (1-based) at which [`Env::step`] fails.
    pub fail_at_step: Option<usize>,
}

impl CountingEnvConfig {
    /// Sets the number of steps until the terminal signal.
    pub fn episode_length(mut self, v: usize) -> Self {
        self.episode_length = Some(v);
        self
    }

    /// Sets the failing step.
    pub fn fail_at_step(mut self, v: Option<usize>) -> Self {
        self.fail_at_step = v;
        self
    }
}

/// Counts steps. Observation is the number of steps since the last reset,
/// every step yields reward 1.
pub struct CountingEnv {
    config: CountingEnvConfig,
    t: usize,
    n_steps: usize,
    seed: i64,
}

impl CountingEnv {
    /// Total steps since the environment was built.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// The seed given at construction.
    pub fn seed(&self) -> i64 {
        self.seed
    }
}

impl Env for CountingEnv {
    type Config = CountingEnvConfig;
    type Obs = usize;
    type Act = usize;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            t: 0,
            n_steps: 0,
            seed,
        })
    }

    fn reset(&mut self) -> Result<usize> {
        self.t = 0;
        Ok(0)
    }

    fn step(&mut self, _act: &usize) -> Result<Step<usize>> {
        if self.config.fail_at_step == Some(self.t + 1) {
            bail!("step {} failed on purpose", self.t + 1);
        }
        self.t += 1;
        self.n_steps += 1;
        let is_terminated = self.config.episode_length == Some(self.t);
        Ok(Step::new(self.t, 1.0, is_terminated))
    }
}

/// Remembers what it was given, always acts `0`.
#[derive(Clone, Debug, Default)]
pub struct RecordingAgent {
    /// Rates passed to [`Agent::act`].
    pub epsilons: Vec<f64>,

    /// Rewards of the learned transitions.
    pub rewards: Vec<f32>,

    /// Next observations of the learned transitions.
    pub next_obs: Vec<usize>,

    /// The number of calls of [`Agent::learn`].
    pub n_learn: usize,

    /// The number of terminal transitions learned.
    pub terminal_transitions: usize,

    /// Zero-based index of the [`Agent::act`] call that fails.
    pub fail_at_act: Option<usize>,
}

impl RecordingAgent {
    /// Sets the failing call of [`Agent::act`].
    pub fn fail_at_act(mut self, v: Option<usize>) -> Self {
        self.fail_at_act = v;
        self
    }
}

impl<E: Env<Obs = usize, Act = usize>> Agent<E> for RecordingAgent {
    fn act(&mut self, _obs: &usize, epsilon: f64) -> Result<usize> {
        if self.fail_at_act == Some(self.epsilons.len()) {
            bail!("act failed on purpose");
        }
        self.epsilons.push(epsilon);
        Ok(0)
    }

    fn learn(&mut self, transition: Transition<E>) -> Result<()> {
        self.n_learn += 1;
        self.rewards.push(transition.reward);
        self.next_obs.push(*transition.next_obs);
        if transition.is_terminated {
            self.terminal_transitions += 1;
        }
        Ok(())
    }
}
