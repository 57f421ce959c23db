//! Agent.
use super::{Env, Transition};
use crate::EpisodicError;
use anyhow::Result;
use std::sync::{Arc, Mutex};

/// Represents a learning agent on an environment.
///
/// The learning algorithm itself lives behind this trait; runners only ask
/// for actions and hand back transitions.
pub trait Agent<E: Env> {
    /// Samples an action given an observation.
    ///
    /// `epsilon` is the current exploration rate, the probability-like
    /// value deciding how often the agent acts randomly.
    fn act(&mut self, obs: &E::Obs, epsilon: f64) -> Result<E::Act>;

    /// Feeds a transition back to the agent.
    fn learn(&mut self, transition: Transition<E>) -> Result<()>;
}

/// An agent shared between threads.
///
/// Each call to [`Agent::act`] or [`Agent::learn`] holds the lock for the
/// duration of the call, so an agent that is not reentrant can be used from
/// several workers.
pub struct SharedAgent<A> {
    inner: Arc<Mutex<A>>,
}

impl<A> Clone for SharedAgent<A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<A> SharedAgent<A> {
    /// Wraps an agent.
    pub fn new(agent: A) -> Self {
        Self {
            inner: Arc::new(Mutex::new(agent)),
        }
    }

    /// Returns the agent.
    ///
    /// Fails with [`EpisodicError::AgentInUse`] while other handles are alive,
    /// and with [`EpisodicError::LockPoisoned`] if a holder of the lock
    /// panicked.
    pub fn try_unwrap(self) -> Result<A, EpisodicError> {
        let mutex = Arc::try_unwrap(self.inner)
            .map_err(|inner| EpisodicError::AgentInUse(Arc::strong_count(&inner) - 1))?;
        mutex
            .into_inner()
            .map_err(|_| EpisodicError::LockPoisoned("agent".to_string()))
    }

    /// Runs `f` with exclusive access to the agent.
    pub fn with<T>(&self, f: impl FnOnce(&mut A) -> T) -> Result<T> {
        let mut agent = self
            .inner
            .lock()
            .map_err(|_| EpisodicError::LockPoisoned("agent".to_string()))?;
        Ok(f(&mut agent))
    }
}

impl<E: Env, A: Agent<E>> Agent<E> for SharedAgent<A> {
    fn act(&mut self, obs: &E::Obs, epsilon: f64) -> Result<E::Act> {
        self.with(|agent| agent.act(obs, epsilon))?
    }

    fn learn(&mut self, transition: Transition<E>) -> Result<()> {
        self.with(|agent| agent.learn(transition))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_try_unwrap_with_other_handles() {
        let shared = SharedAgent::new(3usize);
        let other = shared.clone();
        assert!(matches!(
            shared.try_unwrap(),
            Err(EpisodicError::AgentInUse(1))
        ));
        assert_eq!(other.try_unwrap().unwrap(), 3);
    }

    #[test]
    fn test_try_unwrap_after_panic() {
        let shared = SharedAgent::new(0usize);
        let other = shared.clone();
        let result = thread::spawn(move || {
            let _ = other.with(|_| panic!("panicked while holding the agent"));
        })
        .join();
        assert!(result.is_err());

        let err = shared.with(|n| *n).unwrap_err();
        assert!(err.to_string().contains("Lock poisoned"));
        assert!(matches!(
            shared.try_unwrap(),
            Err(EpisodicError::LockPoisoned(_))
        ));
    }
}
