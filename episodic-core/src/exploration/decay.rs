//! Exponential decay of the exploration rate.
use super::{check_range, Exploration};
use crate::error::EpisodicError;

/// Decays epsilon exponentially toward `epsilon_final`.
///
/// The distance to `epsilon_final` halves every `half_life` timesteps:
/// `eps(t) = epsilon_final + (epsilon_start - epsilon_final) * 0.5^(t / half_life)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonDecay {
    epsilon: f64,
    epsilon_start: f64,
    epsilon_final: f64,
    half_life: usize,
}

impl EpsilonDecay {
    /// Constructs the schedule.
    ///
    /// Fails if `half_life` is zero or the rates do not satisfy
    /// `0 <= epsilon_final <= epsilon_start <= 1`.
    pub fn new(
        epsilon_start: f64,
        epsilon_final: f64,
        half_life: usize,
    ) -> Result<Self, EpisodicError> {
        check_range(epsilon_start, epsilon_final)?;
        if half_life == 0 {
            return Err(EpisodicError::ConfigurationError(
                "half_life must be positive".to_string(),
            ));
        }
        Ok(Self {
            epsilon: epsilon_start,
            epsilon_start,
            epsilon_final,
            half_life,
        })
    }
}

impl Exploration for EpsilonDecay {
    fn update(&self, _episode: usize, timestep: usize) -> (Self, f64) {
        let factor = 0.5f64.powf(timestep as f64 / self.half_life as f64);
        let eps = self.epsilon_final + (self.epsilon_start - self.epsilon_final) * factor;
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

    #[test]
    fn test_half_life() {
        let x = EpsilonDecay::new(1.0, 0.0, 100).unwrap();
        assert_eq!(x.update(0, 0).1, 1.0);
        assert!((x.update(0, 100).1 - 0.5).abs() < 1e-12);
        assert!((x.update(0, 200).1 - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_never_below_final() {
        let x = EpsilonDecay::new(0.9, 0.2, 10).unwrap();
        let eps = x.update(0, 1_000_000).1;
        assert!(eps >= 0.2);
        assert!((eps - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_zero_half_life_is_rejected() {
        assert!(matches!(
            EpsilonDecay::new(1.0, 0.1, 0),
            Err(EpisodicError::ConfigurationError(_))
        ));
    }
}
