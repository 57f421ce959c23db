//! Configuration of [`Explorer`](super::Explorer).
use super::{ConstantEpsilon, EpsilonAnneal, EpsilonDecay, Explorer};
use crate::error::EpisodicError;
use serde::{Deserialize, Serialize};

/// Configuration of an exploration schedule.
///
/// In YAML, the variant is given by the `type` key:
///
/// ```yaml
/// type: epsilon_anneal
/// epsilon: 1.0
/// epsilon_final: 0.1
/// epsilon_timesteps: 10000
/// ```
///
/// Values are validated only when [`ExplorerConfig::build`] is called, before
/// a run starts.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExplorerConfig {
    /// See [`ConstantEpsilon`].
    Constant {
        /// The fixed rate.
        epsilon: f64,
    },

    /// See [`EpsilonAnneal`].
    EpsilonAnneal {
        /// Rate at timestep 0.
        #[serde(default = "default_epsilon")]
        epsilon: f64,

        /// Rate at the end of the anneal.
        epsilon_final: f64,

        /// Length of the anneal in timesteps.
        epsilon_timesteps: usize,
    },

    /// See [`EpsilonDecay`].
    EpsilonDecay {
        /// Rate at timestep 0.
        #[serde(default = "default_epsilon")]
        epsilon: f64,

        /// Lower bound of the rate.
        epsilon_final: f64,

        /// Half life of the decay in timesteps.
        half_life: usize,
    },
}

fn default_epsilon() -> f64 {
    1.0
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self::EpsilonAnneal {
            epsilon: 1.0,
            epsilon_final: 0.1,
            epsilon_timesteps: 10000,
        }
    }
}

impl ExplorerConfig {
    /// Validates the configuration and builds the schedule.
    pub fn build(&self) -> Result<Explorer, EpisodicError> {
        Ok(match *self {
            Self::Constant { epsilon } => ConstantEpsilon::new(epsilon)?.into(),
            Self::EpsilonAnneal {
                epsilon,
                epsilon_final,
                epsilon_timesteps,
            } => EpsilonAnneal::new(epsilon, epsilon_final, epsilon_timesteps)?.into(),
            Self::EpsilonDecay {
                epsilon,
                epsilon_final,
                half_life,
            } => EpsilonDecay::new(epsilon, epsilon_final, half_life)?.into(),
        })
    }
}
