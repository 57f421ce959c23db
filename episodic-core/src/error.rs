//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum EpisodicError {
    /// Invalid parameters, detected before a run starts.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The agent, the environment or the episode-finished callback failed.
    #[error("Episode {episode} failed: {source:#}")]
    ExecutionError {
        /// Index of the episode during or after which the failure happened.
        episode: usize,

        /// The underlying error.
        #[source]
        source: anyhow::Error,
    },

    /// A worker could not build its environment.
    #[error("Worker {worker} failed to build its environment: {source:#}")]
    EnvBuildError {
        /// Id of the worker.
        worker: usize,

        /// The underlying error.
        #[source]
        source: anyhow::Error,
    },

    /// A mutex shared between workers was poisoned.
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    /// The agent is still referenced by other handles.
    #[error("Agent is still referenced by {0} other handle(s)")]
    AgentInUse(usize),

    /// A worker thread panicked outside of an episode.
    #[error("Worker {0} panicked")]
    WorkerPanicked(usize),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}

impl EpisodicError {
    /// Index of the failed episode, if the error is tied to one.
    pub fn episode(&self) -> Option<usize> {
        match self {
            Self::ExecutionError { episode, .. } => Some(*episode),
            _ => None,
        }
    }

    /// Returns `true` if the error comes from a poisoned lock, possibly wrapped
    /// in an [`EpisodicError::ExecutionError`].
    ///
    /// Such errors are consequences of a panic elsewhere, not causes.
    pub fn is_lock_poisoned(&self) -> bool {
        match self {
            Self::LockPoisoned(_) => true,
            Self::ExecutionError { source, .. } => source
                .chain()
                .any(|e| matches!(e.downcast_ref::<EpisodicError>(), Some(Self::LockPoisoned(_)))),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_is_lock_poisoned() {
        let poisoned = EpisodicError::ExecutionError {
            episode: 2,
            source: anyhow::Error::from(EpisodicError::LockPoisoned("agent".to_string()))
                .context("agent failed to act"),
        };
        assert!(poisoned.is_lock_poisoned());
        assert_eq!(poisoned.episode(), Some(2));

        let failed = EpisodicError::ExecutionError {
            episode: 2,
            source: anyhow!("env crashed").context("environment step failed"),
        };
        assert!(!failed.is_lock_poisoned());
        assert!(EpisodicError::LockPoisoned("agent".to_string()).is_lock_poisoned());
        assert!(!EpisodicError::WorkerPanicked(0).is_lock_poisoned());
    }
}
