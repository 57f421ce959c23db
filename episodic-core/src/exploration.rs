//! Exploration schedules.
//!
//! An exploration schedule maps training progress, given as `(episode, timestep)`,
//! to an exploration rate `epsilon` in `[0, 1]`. All schedules share the
//! [`Exploration`] contract, so runners never depend on a concrete variant.
//!
//! Schedules do not mutate themselves when queried. [`Exploration::update`] takes
//! the current state and returns the next state together with the rate:
//!
//! ```rust
//! use episodic_core::exploration::{EpsilonAnneal, Exploration};
//!
//! let anneal = EpsilonAnneal::new(1.0, 0.1, 10_000).unwrap();
//! let (anneal, eps) = anneal.update(0, 5_000);
//! assert!((eps - 0.55).abs() < 1e-9);
//! assert_eq!(anneal.epsilon(), eps);
//! ```
//!
//! [`ExplorationSchedule`] pairs a schedule with the global timestep counter of a
//! run, and [`SharedSchedule`] puts that pair behind a mutex for concurrent
//! workers.
mod anneal;
mod config;
mod constant;
mod decay;
mod schedule;
pub use anneal::EpsilonAnneal;
pub use config::ExplorerConfig;
pub use constant::ConstantEpsilon;
pub use decay::EpsilonDecay;
pub use schedule::{EpsilonSource, ExplorationSchedule, SharedSchedule};

use crate::error::EpisodicError;

/// A schedule of the exploration rate.
pub trait Exploration: Clone {
    /// Computes the exploration rate at `(episode, timestep)`.
    ///
    /// Returns the next state of the schedule, whose [`Exploration::epsilon`]
    /// equals the returned rate. Callers issue exactly one update per timestep
    /// in increasing timestep order.
    fn update(&self, episode: usize, timestep: usize) -> (Self, f64);

    /// The most recently computed rate, or the initial rate before any update.
    fn epsilon(&self) -> f64;
}

/// The family of exploration schedules as a single type.
#[derive(Debug, Clone, PartialEq)]
pub enum Explorer {
    /// Fixed rate.
    Constant(ConstantEpsilon),

    /// Linear anneal.
    EpsilonAnneal(EpsilonAnneal),

    /// Exponential decay.
    EpsilonDecay(EpsilonDecay),
}

impl Exploration for Explorer {
    fn update(&self, episode: usize, timestep: usize) -> (Self, f64) {
        match self {
            Self::Constant(x) => {
                let (x, eps) = x.update(episode, timestep);
                (Self::Constant(x), eps)
            }
            Self::EpsilonAnneal(x) => {
                let (x, eps) = x.update(episode, timestep);
                (Self::EpsilonAnneal(x), eps)
            }
            Self::EpsilonDecay(x) => {
                let (x, eps) = x.update(episode, timestep);
                (Self::EpsilonDecay(x), eps)
            }
        }
    }

    fn epsilon(&self) -> f64 {
        match self {
            Self::Constant(x) => x.epsilon(),
            Self::EpsilonAnneal(x) => x.epsilon(),
            Self::EpsilonDecay(x) => x.epsilon(),
        }
    }
}

impl From<ConstantEpsilon> for Explorer {
    fn from(x: ConstantEpsilon) -> Self {
        Self::Constant(x)
    }
}

impl From<EpsilonAnneal> for Explorer {
    fn from(x: EpsilonAnneal) -> Self {
        Self::EpsilonAnneal(x)
    }
}

impl From<EpsilonDecay> for Explorer {
    fn from(x: EpsilonDecay) -> Self {
        Self::EpsilonDecay(x)
    }
}

/// Checks that a rate is a probability.
fn check_rate(name: &str, v: f64) -> Result<(), EpisodicError> {
    if !(0.0..=1.0).contains(&v) {
        return Err(EpisodicError::ConfigurationError(format!(
            "{} must be in [0, 1], got {}",
            name, v
        )));
    }
    Ok(())
}

/// Checks `0 <= epsilon_final <= epsilon_start <= 1`.
fn check_range(epsilon_start: f64, epsilon_final: f64) -> Result<(), EpisodicError> {
    check_rate("epsilon", epsilon_start)?;
    check_rate("epsilon_final", epsilon_final)?;
    if epsilon_final > epsilon_start {
        return Err(EpisodicError::ConfigurationError(format!(
            "epsilon_final ({}) must not exceed epsilon ({})",
            epsilon_final, epsilon_start
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explorer_delegates_to_variant() {
        let explorer: Explorer = EpsilonAnneal::new(1.0, 0.1, 100).unwrap().into();
        let (explorer, eps) = explorer.update(0, 50);
        assert!((eps - 0.55).abs() < 1e-9);
        assert_eq!(explorer.epsilon(), eps);
        assert!(matches!(explorer, Explorer::EpsilonAnneal(_)));

        let explorer: Explorer = ConstantEpsilon::new(0.3).unwrap().into();
        let (_, eps) = explorer.update(7, 1_000_000);
        assert_eq!(eps, 0.3);
    }

    #[test]
    fn test_check_range() {
        assert!(check_range(1.0, 0.1).is_ok());
        assert!(check_range(0.5, 0.5).is_ok());
        assert!(check_range(0.5, 0.6).is_err());
        assert!(check_range(1.5, 0.1).is_err());
        assert!(check_range(1.0, -0.1).is_err());
        assert!(check_range(f64::NAN, 0.1).is_err());
    }
}
