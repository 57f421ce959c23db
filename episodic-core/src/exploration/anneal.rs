//! Linear anneal of the exploration rate.
use super::{check_range, Exploration};
use crate::error::EpisodicError;

/// Anneals epsilon linearly with the ratio of the current timestep to the
/// length of the anneal.
///
/// The rate starts at `epsilon_start` at timestep 0, reaches `epsilon_final`
/// at timestep `epsilon_timesteps` and stays there. It is always clamped to
/// `[epsilon_final, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonAnneal {
    epsilon: f64,
    epsilon_start: f64,
    epsilon_final: f64,
    epsilon_timesteps: usize,
}

impl EpsilonAnneal {
    /// Constructs a linear anneal.
    ///
    /// Fails with [`EpisodicError::ConfigurationError`] if `epsilon_timesteps`
    /// is zero or the rates do not satisfy `0 <= epsilon_final <= epsilon_start <= 1`.
    pub fn new(
        epsilon_start: f64,
        epsilon_final: f64,
        epsilon_timesteps: usize,
    ) -> Result<Self, EpisodicError> {
        check_range(epsilon_start, epsilon_final)?;
        if epsilon_timesteps == 0 {
            return Err(EpisodicError::ConfigurationError(
                "epsilon_timesteps must be positive".to_string(),
            ));
        }
        Ok(Self {
            epsilon: epsilon_start,
            epsilon_start,
            epsilon_final,
            epsilon_timesteps,
        })
    }

    /// Rate at the start of the anneal.
    pub fn epsilon_start(&self) -> f64 {
        self.epsilon_start
    }

    /// Rate at and after the end of the anneal.
    pub fn epsilon_final(&self) -> f64 {
        self.epsilon_final
    }

    /// Length of the anneal in timesteps.
    pub fn epsilon_timesteps(&self) -> usize {
        self.epsilon_timesteps
    }
}

impl Exploration for EpsilonAnneal {
    fn update(&self, _episode: usize, timestep: usize) -> (Self, f64) {
        let progress = (timestep as f64 / self.epsilon_timesteps as f64).min(1.0);
        let eps = self.epsilon_start + (self.epsilon_final - self.epsilon_start) * progress;
        let eps = eps.clamp(self.epsilon_final, 1.0);
        (
            Self {
                epsilon: eps,
                ..*self
            },
            eps,
        )
    }

    fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_endpoints_and_saturation() {
        let x = EpsilonAnneal::new(1.0, 0.05, 1000).unwrap();
        assert_eq!(x.update(0, 0).1, 1.0);
        assert_eq!(x.update(0, 1000).1, 0.05);
        assert_eq!(x.update(0, 2000).1, 0.05);
        assert_eq!(x.update(0, usize::MAX).1, 0.05);
    }

    #[test]
    fn test_midpoint() {
        let x = EpsilonAnneal::new(1.0, 0.1, 10000).unwrap();
        assert!(close(x.update(0, 5000).1, 0.55));
        assert_eq!(x.update(0, 10000).1, 0.1);
        assert_eq!(x.update(0, 20000).1, 0.1);
    }

    #[test]
    fn test_non_increasing_over_horizon() {
        let mut x = EpsilonAnneal::new(1.0, 0.1, 500).unwrap();
        let mut prev = f64::INFINITY;
        for t in 0..=500 {
            let (next, eps) = x.update(0, t);
            assert!(eps <= prev, "t = {}: {} > {}", t, eps, prev);
            assert!((0.1..=1.0).contains(&eps));
            prev = eps;
            x = next;
        }
        assert_eq!(prev, 0.1);
    }

    #[test]
    fn test_update_is_a_state_transition() {
        let x = EpsilonAnneal::new(1.0, 0.1, 100).unwrap();
        let (y, eps) = x.update(3, 40);
        // The original state is left untouched
        assert_eq!(x.epsilon(), 1.0);
        assert_eq!(y.epsilon(), eps);
        assert_eq!(y.epsilon_timesteps(), 100);

        // Out-of-order queries are not guarded against
        let (z, eps_back) = y.update(3, 10);
        assert!(eps_back > eps);
        assert_eq!(z.epsilon(), eps_back);
    }

    #[test]
    fn test_start_below_one() {
        let x = EpsilonAnneal::new(0.5, 0.1, 4).unwrap();
        assert_eq!(x.epsilon(), 0.5);
        assert_eq!(x.update(0, 0).1, 0.5);
        assert!(close(x.update(0, 2).1, 0.3));
    }

    #[test]
    fn test_zero_timesteps_is_rejected_at_construction() {
        match EpsilonAnneal::new(1.0, 0.1, 0) {
            Err(EpisodicError::ConfigurationError(_)) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_rates_are_rejected() {
        assert!(EpsilonAnneal::new(1.0, 1.5, 10).is_err());
        assert!(EpsilonAnneal::new(0.2, 0.3, 10).is_err());
        assert!(EpsilonAnneal::new(1.2, 0.1, 10).is_err());
    }
}
