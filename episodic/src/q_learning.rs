//! Tabular Q-learning on the corridor.
use crate::corridor::Move;
use anyhow::{bail, Result};
use episodic_core::{Agent, Env, Transition};
use serde::{Deserialize, Serialize};

/// Configuration of [`QLearning`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct QLearningConfig {
    /// Step size of the updates.
    pub learning_rate: f32,

    /// Discount factor.
    pub discount_factor: f32,

    /// Seed of the random number generator used for exploration.
    pub seed: u64,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.95,
            seed: 42,
        }
    }
}

impl QLearningConfig {
    /// Sets the step size.
    pub fn learning_rate(mut self, v: f32) -> Self {
        self.learning_rate = v;
        self
    }

    /// Sets the discount factor.
    pub fn discount_factor(mut self, v: f32) -> Self {
        self.discount_factor = v;
        self
    }

    /// Sets the seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }
}

/// Epsilon-greedy Q-learning with one row of action values per cell.
pub struct QLearning {
    q: Vec<[f32; 2]>,
    learning_rate: f32,
    discount_factor: f32,
    rng: fastrand::Rng,
}

impl QLearning {
    /// Builds an agent for a corridor of `n_states` cells.
    pub fn build(config: &QLearningConfig, n_states: usize) -> Self {
        Self {
            q: vec![[0.0; 2]; n_states],
            learning_rate: config.learning_rate,
            discount_factor: config.discount_factor,
            rng: fastrand::Rng::with_seed(config.seed),
        }
    }

    /// Action values of a cell.
    pub fn q_values(&self, state: usize) -> Option<&[f32; 2]> {
        self.q.get(state)
    }

    /// The greedy move in `state`; ties go to [`Move::Right`].
    pub fn greedy(&self, state: usize) -> Move {
        match self.q.get(state) {
            Some(q) if q[0] > q[1] => Move::Left,
            _ => Move::Right,
        }
    }

    fn row(&self, state: usize) -> Result<&[f32; 2]> {
        match self.q.get(state) {
            Some(q) => Ok(q),
            None => bail!("state {} out of the Q table of {} rows", state, self.q.len()),
        }
    }
}

impl<E: Env<Obs = usize, Act = Move>> Agent<E> for QLearning {
    fn act(&mut self, obs: &usize, epsilon: f64) -> Result<Move> {
        self.row(*obs)?;
        if self.rng.f64() < epsilon {
            Ok(Move::ALL[self.rng.usize(..Move::ALL.len())])
        } else {
            Ok(self.greedy(*obs))
        }
    }

    fn learn(&mut self, transition: Transition<E>) -> Result<()> {
        let next_value = match transition.is_terminated {
            true => 0.0,
            false => {
                let q = self.row(*transition.next_obs)?;
                q[0].max(q[1])
            }
        };
        let target = transition.reward + self.discount_factor * next_value;
        let a = transition.act.index();
        let q = self.row(*transition.obs)?[a];
        let lr = self.learning_rate;
        self.q[*transition.obs][a] = q + lr * (target - q);
        Ok(())
    }
}
