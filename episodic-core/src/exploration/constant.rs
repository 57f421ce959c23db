//! Fixed exploration rate.
use super::{check_rate, Exploration};
use crate::error::EpisodicError;

/// A fixed exploration rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantEpsilon {
    epsilon: f64,
}

impl ConstantEpsilon {
    /// Constructs the schedule, `epsilon` must be in `[0, 1]`.
    pub fn new(epsilon: f64) -> Result<Self, EpisodicError> {
        check_rate("epsilon", epsilon)?;
        Ok(Self { epsilon })
    }
}

impl Exploration for ConstantEpsilon {
    fn update(&self, _episode: usize, _timestep: usize) -> (Self, f64) {
        (*self, self.epsilon)
    }

    fn epsilon(&self) -> f64 {
        self.epsilon
    }
}
