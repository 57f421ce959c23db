//! A one-dimensional corridor with the goal at its right end.
use anyhow::{bail, Result};
use episodic_core::{Env, Step};
use serde::{Deserialize, Serialize};

/// Reward of a step not reaching the goal.
pub const STEP_REWARD: f32 = -0.01;

/// Reward of the step reaching the goal.
pub const GOAL_REWARD: f32 = 1.0;

/// Moves in the corridor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    /// Towards cell 0.
    Left,

    /// Towards the goal.
    Right,
}

impl Move {
    /// All moves, indexed as in the Q table.
    pub const ALL: [Move; 2] = [Move::Left, Move::Right];

    /// Index of the move.
    pub fn index(&self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

/// Configuration of [`Corridor`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CorridorConfig {
    /// The number of cells, including the start and the goal.
    pub length: usize,

    /// Probability that a move goes the opposite way.
    pub slip: f32,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self {
            length: 10,
            slip: 0.0,
        }
    }
}

impl CorridorConfig {
    /// Sets the number of cells.
    pub fn length(mut self, v: usize) -> Self {
        self.length = v;
        self
    }

    /// Sets the slip probability.
    pub fn slip(mut self, v: f32) -> Self {
        self.slip = v;
        self
    }
}

/// Starts at cell 0. Reaching cell `length - 1` ends the episode with
/// [`GOAL_REWARD`]; every other step costs [`STEP_REWARD`].
///
/// Observations are cell indices.
pub struct Corridor {
    length: usize,
    slip: f32,
    pos: usize,
    rng: fastrand::Rng,
}

impl Corridor {
    /// The number of cells.
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Env for Corridor {
    type Config = CorridorConfig;
    type Obs = usize;
    type Act = Move;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        if config.length < 2 {
            bail!("corridor needs at least 2 cells, got {}", config.length);
        }
        if !(0.0..=1.0).contains(&config.slip) {
            bail!("slip must be in [0, 1], got {}", config.slip);
        }
        Ok(Self {
            length: config.length,
            slip: config.slip,
            pos: 0,
            rng: fastrand::Rng::with_seed(seed as u64),
        })
    }

    fn reset(&mut self) -> Result<usize> {
        self.pos = 0;
        Ok(self.pos)
    }

    fn step(&mut self, act: &Move) -> Result<Step<usize>> {
        let goal = self.length - 1;
        if self.pos == goal {
            bail!("step after the episode ended");
        }

        let slipped = self.slip > 0.0 && self.rng.f32() < self.slip;
        let go_right = (*act == Move::Right) != slipped;
        self.pos = match go_right {
            true => self.pos + 1,
            false => self.pos.saturating_sub(1),
        };

        let is_terminated = self.pos == goal;
        let reward = if is_terminated {
            GOAL_REWARD
        } else {
            STEP_REWARD
        };
        Ok(Step::new(self.pos, reward, is_terminated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_to_goal() -> Result<()> {
        let mut env = Corridor::build(&CorridorConfig::default().length(3), 0)?;
        assert_eq!(env.reset()?, 0);

        let step = env.step(&Move::Left)?;
        assert_eq!(step.obs, 0);
        assert_eq!(step.reward, STEP_REWARD);

        let step = env.step(&Move::Right)?;
        assert_eq!(step.obs, 1);
        assert!(!step.is_terminated);

        let step = env.step(&Move::Right)?;
        assert_eq!(step.obs, 2);
        assert_eq!(step.reward, GOAL_REWARD);
        assert!(step.is_terminated);

        assert!(env.step(&Move::Right).is_err());
        assert_eq!(env.reset()?, 0);
        Ok(())
    }

    #[test]
    fn test_always_slipping_reverses_moves() -> Result<()> {
        let mut env = Corridor::build(&CorridorConfig::default().slip(1.0), 0)?;
        env.reset()?;
        assert_eq!(env.step(&Move::Left)?.obs, 1);
        assert_eq!(env.step(&Move::Right)?.obs, 0);
        Ok(())
    }

    #[test]
    fn test_invalid_config() {
        assert!(Corridor::build(&CorridorConfig::default().length(1), 0).is_err());
        assert!(Corridor::build(&CorridorConfig::default().slip(1.5), 0).is_err());
    }
}
