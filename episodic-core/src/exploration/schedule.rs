//! Binding of a schedule to the timestep counter of a run.
use super::Exploration;
use crate::error::EpisodicError;
use std::sync::{Arc, Mutex, MutexGuard};

/// Provides the exploration rate for each timestep of a run.
pub trait EpsilonSource {
    /// Returns the rate for the next timestep of the run, then advances the
    /// timestep counter.
    fn next_epsilon(&mut self, episode: usize) -> Result<f64, EpisodicError>;
}

/// A schedule together with the global timestep counter of a run.
///
/// Each call of [`EpsilonSource::next_epsilon`] performs exactly one state
/// transition of the schedule at the current timestep and advances the counter,
/// so the schedule sees timesteps `0, 1, 2, ...` in order.
#[derive(Debug, Clone)]
pub struct ExplorationSchedule<X> {
    explorer: X,
    timestep: usize,
}

impl<X: Exploration> ExplorationSchedule<X> {
    /// Starts a schedule at timestep 0.
    pub fn new(explorer: X) -> Self {
        Self {
            explorer,
            timestep: 0,
        }
    }

    /// Number of timesteps elapsed.
    pub fn timestep(&self) -> usize {
        self.timestep
    }

    /// The most recent rate.
    pub fn epsilon(&self) -> f64 {
        self.explorer.epsilon()
    }

    /// Current state of the schedule.
    pub fn explorer(&self) -> &X {
        &self.explorer
    }
}

impl<X: Exploration> EpsilonSource for ExplorationSchedule<X> {
    fn next_epsilon(&mut self, episode: usize) -> Result<f64, EpisodicError> {
        let (explorer, eps) = self.explorer.update(episode, self.timestep);
        self.explorer = explorer;
        self.timestep += 1;
        Ok(eps)
    }
}

/// An [`ExplorationSchedule`] shared between workers.
///
/// The state transition and the counter increment happen under one lock,
/// so no update is lost and timesteps are still issued in order.
#[derive(Debug)]
pub struct SharedSchedule<X> {
    inner: Arc<Mutex<ExplorationSchedule<X>>>,
}

impl<X> Clone for SharedSchedule<X> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<X: Exploration> SharedSchedule<X> {
    /// Starts a shared schedule at timestep 0.
    pub fn new(explorer: X) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ExplorationSchedule::new(explorer))),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ExplorationSchedule<X>>, EpisodicError> {
        self.inner
            .lock()
            .map_err(|_| EpisodicError::LockPoisoned("exploration schedule".to_string()))
    }

    /// Number of timesteps elapsed across all workers.
    pub fn timestep(&self) -> Result<usize, EpisodicError> {
        Ok(self.lock()?.timestep())
    }

    /// The most recent rate.
    pub fn epsilon(&self) -> Result<f64, EpisodicError> {
        Ok(self.lock()?.epsilon())
    }
}

impl<X: Exploration> EpsilonSource for SharedSchedule<X> {
    fn next_epsilon(&mut self, episode: usize) -> Result<f64, EpisodicError> {
        self.lock()?.next_epsilon(episode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exploration::EpsilonAnneal;
    use std::thread;

    #[test]
    fn test_schedule_advances_once_per_call() {
        let mut s = ExplorationSchedule::new(EpsilonAnneal::new(1.0, 0.0, 4).unwrap());
        let rates = (0..6)
            .map(|_| s.next_epsilon(0).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(rates, vec![1.0, 0.75, 0.5, 0.25, 0.0, 0.0]);
        assert_eq!(s.timestep(), 6);
        assert_eq!(s.epsilon(), 0.0);
    }

    #[test]
    fn test_shared_schedule_loses_no_updates() {
        let s = SharedSchedule::new(EpsilonAnneal::new(1.0, 0.1, 10_000).unwrap());
        let handles = (0..4)
            .map(|_| {
                let mut s = s.clone();
                thread::spawn(move || {
                    let mut prev = f64::INFINITY;
                    for _ in 0..1000 {
                        let eps = s.next_epsilon(0).unwrap();
                        // Each thread observes a non-increasing sequence
                        assert!(eps <= prev);
                        prev = eps;
                    }
                })
            })
            .collect::<Vec<_>>();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(s.timestep().unwrap(), 4000);
        let expected = 1.0 - 0.9 * 3999.0 / 10_000.0;
        assert!((s.epsilon().unwrap() - expected).abs() < 1e-9);
    }
}
