//! Runs a single episode.
use super::{EpisodeRecord, RunnerConfig};
use crate::{exploration::EpsilonSource, Agent, EpisodicError, Env, Step, Transition};
use log::debug;

/// Runs one episode of interaction between an [`Agent`] and an [`Env`].
///
/// Each timestep of an episode:
///
/// 1. Takes the exploration rate of the timestep from an [`EpsilonSource`].
/// 2. Asks the agent for an action.
/// 3. Applies the action to the environment `action_repeat` times, or until the
///    environment signals termination, summing the rewards.
/// 4. Feeds the resulting transition to [`Agent::learn`].
///
/// The episode ends on a terminal signal or after `max_timesteps_per_episode`
/// timesteps. Truncation is not an error.
#[derive(Debug, Clone)]
pub struct EpisodeExecutor {
    max_timesteps: usize,
    action_repeat: usize,
}

fn execution_error(episode: usize, source: anyhow::Error) -> EpisodicError {
    EpisodicError::ExecutionError { episode, source }
}

impl EpisodeExecutor {
    /// Constructs an executor.
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            max_timesteps: config.max_timesteps_per_episode,
            action_repeat: config.action_repeat.max(1),
        }
    }

    /// Runs an episode with index `episode`.
    ///
    /// Errors of the agent or the environment are not retried; they are
    /// returned as [`EpisodicError::ExecutionError`] carrying the episode index.
    pub fn run_episode<E, A, S>(
        &self,
        agent: &mut A,
        env: &mut E,
        epsilon: &mut S,
        episode: usize,
    ) -> Result<EpisodeRecord, EpisodicError>
    where
        E: Env,
        A: Agent<E> + ?Sized,
        S: EpsilonSource + ?Sized,
    {
        let mut obs = env
            .reset()
            .map_err(|e| execution_error(episode, e.context("failed to reset environment")))?;
        let mut total_reward = 0f32;
        let mut length = 0;

        while length < self.max_timesteps {
            let eps = epsilon.next_epsilon(episode)?;
            let act = agent
                .act(&obs, eps)
                .map_err(|e| execution_error(episode, e.context("agent failed to act")))?;
            let step = self
                .repeat_action(env, &act)
                .map_err(|e| execution_error(episode, e.context("environment step failed")))?;

            agent
                .learn(Transition {
                    obs: &obs,
                    act: &act,
                    reward: step.reward,
                    next_obs: &step.obs,
                    is_terminated: step.is_terminated,
                })
                .map_err(|e| execution_error(episode, e.context("agent failed to learn")))?;

            total_reward += step.reward;
            length += 1;
            obs = step.obs;

            if step.is_terminated {
                break;
            }
        }

        debug!(
            "Episode {} finished after {} timesteps, reward = {}",
            episode, length, total_reward
        );

        Ok(EpisodeRecord {
            episode_index: episode,
            total_reward,
            length,
        })
    }

    /// Applies `act` up to `action_repeat` times, stopping on termination.
    fn repeat_action<E: Env>(&self, env: &mut E, act: &E::Act) -> anyhow::Result<Step<E::Obs>> {
        let mut step = env.step(act)?;
        let mut reward = step.reward;
        for _ in 1..self.action_repeat {
            if step.is_terminated {
                break;
            }
            step = env.step(act)?;
            reward += step.reward;
        }
        Ok(Step::new(step.obs, reward, step.is_terminated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dummy::{CountingEnv, CountingEnvConfig, RecordingAgent},
        exploration::{ConstantEpsilon, EpsilonAnneal, ExplorationSchedule},
    };

    fn executor(max_timesteps: usize, action_repeat: usize) -> EpisodeExecutor {
        EpisodeExecutor::new(
            &RunnerConfig::default()
                .max_timesteps_per_episode(max_timesteps)
                .action_repeat(action_repeat),
        )
    }

    fn env(config: CountingEnvConfig) -> CountingEnv {
        CountingEnv::build(&config, 0).unwrap()
    }

    #[test]
    fn test_never_terminating_env_is_truncated() {
        let mut env = env(CountingEnvConfig::default());
        let mut agent = RecordingAgent::default();
        let mut schedule = ExplorationSchedule::new(ConstantEpsilon::new(0.5).unwrap());

        let record = executor(25, 1)
            .run_episode(&mut agent, &mut env, &mut schedule, 0)
            .unwrap();

        assert_eq!(record.length, 25);
        assert!(record.is_truncated(25));
        assert_eq!(record.total_reward, 25.0);
        assert_eq!(agent.n_learn, 25);
        assert_eq!(schedule.timestep(), 25);
    }

    #[test]
    fn test_terminal_signal_ends_episode() {
        let mut env = env(CountingEnvConfig::default().episode_length(7));
        let mut agent = RecordingAgent::default();
        let mut schedule = ExplorationSchedule::new(ConstantEpsilon::new(0.0).unwrap());

        let record = executor(100, 1)
            .run_episode(&mut agent, &mut env, &mut schedule, 3)
            .unwrap();

        assert_eq!(record.episode_index, 3);
        assert_eq!(record.length, 7);
        assert!(!record.is_truncated(100));
        assert_eq!(agent.terminal_transitions, 1);
    }

    #[test]
    fn test_action_repeat_accumulates_reward() {
        // 10 env steps until termination, each action applied 4 times:
        // timesteps cover 4 + 4 + 2 env steps.
        let mut env = env(CountingEnvConfig::default().episode_length(10));
        let mut agent = RecordingAgent::default();
        let mut schedule = ExplorationSchedule::new(ConstantEpsilon::new(0.0).unwrap());

        let record = executor(100, 4)
            .run_episode(&mut agent, &mut env, &mut schedule, 0)
            .unwrap();

        assert_eq!(record.length, 3);
        assert_eq!(record.total_reward, 10.0);
        assert_eq!(env.n_steps(), 10);
        assert_eq!(agent.rewards, vec![4.0, 4.0, 2.0]);
        // The observation after the last repeated step is passed on
        assert_eq!(agent.next_obs, vec![4, 8, 10]);
    }

    #[test]
    fn test_agent_sees_scheduled_rates() {
        let mut env = env(CountingEnvConfig::default().episode_length(3));
        let mut agent = RecordingAgent::default();
        let mut schedule = ExplorationSchedule::new(EpsilonAnneal::new(1.0, 0.0, 4).unwrap());
        let exec = executor(100, 1);

        exec.run_episode(&mut agent, &mut env, &mut schedule, 0)
            .unwrap();
        exec.run_episode(&mut agent, &mut env, &mut schedule, 1)
            .unwrap();

        // The timestep counter carries over between episodes
        assert_eq!(agent.epsilons, vec![1.0, 0.75, 0.5, 0.25, 0.0, 0.0]);
    }

    #[test]
    fn test_env_failure_names_episode() {
        let mut env = env(CountingEnvConfig::default().fail_at_step(Some(2)));
        let mut agent = RecordingAgent::default();
        let mut schedule = ExplorationSchedule::new(ConstantEpsilon::new(0.0).unwrap());

        let err = executor(100, 1)
            .run_episode(&mut agent, &mut env, &mut schedule, 5)
            .unwrap_err();

        assert_eq!(err.episode(), Some(5));
        assert!(format!("{}", err).contains("Episode 5"));
        // The failing step is not fed to the agent
        assert_eq!(agent.n_learn, 1);
    }

    #[test]
    fn test_agent_failure_propagates() {
        let mut env = env(CountingEnvConfig::default());
        let mut agent = RecordingAgent::default().fail_at_act(Some(0));
        let mut schedule = ExplorationSchedule::new(ConstantEpsilon::new(0.0).unwrap());

        let err = executor(100, 1)
            .run_episode(&mut agent, &mut env, &mut schedule, 0)
            .unwrap_err();
        assert!(matches!(err, EpisodicError::ExecutionError { episode: 0, .. }));
    }
}
