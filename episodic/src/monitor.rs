//! Records every step of an environment.
use anyhow::{anyhow, Result};
use episodic_core::{
    record::{BufferedRecorder, Record, RecordValue, Recorder},
    Env, Step,
};
use serde::Serialize;
use std::{
    convert::TryFrom,
    fs::File,
    path::Path,
    sync::{Arc, Mutex},
};

/// Configuration of [`MonitoredEnv`].
///
/// Clones share the recorder, so all workers of an asynchronous run write to
/// the same buffer.
#[derive(Clone)]
pub struct MonitoredEnvConfig<C> {
    /// Configuration of the wrapped environment.
    pub env_config: C,

    recorder: Arc<Mutex<BufferedRecorder>>,
}

impl<C> MonitoredEnvConfig<C> {
    /// Wraps an environment configuration with a fresh recorder.
    pub fn new(env_config: C) -> Self {
        Self {
            env_config,
            recorder: Arc::new(Mutex::new(BufferedRecorder::new())),
        }
    }

    /// Takes the records written so far.
    pub fn drain(&self) -> Result<Vec<Record>> {
        let mut recorder = self
            .recorder
            .lock()
            .map_err(|_| anyhow!("monitor recorder lock poisoned"))?;
        Ok(recorder.drain())
    }
}

/// Wraps an [`Env`] and writes a [`Record`] for every step.
///
/// Records carry the keys `env`, `episode`, `step`, `reward` and
/// `is_terminated`. `env` is the seed the environment was built with, which is
/// the worker id in asynchronous runs; `episode` counts resets of this
/// environment.
pub struct MonitoredEnv<E: Env> {
    env: E,
    seed: i64,
    episode: usize,
    step: usize,
    recorder: Arc<Mutex<BufferedRecorder>>,
}

impl<E: Env> MonitoredEnv<E> {
    /// The wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }
}

impl<E: Env> Env for MonitoredEnv<E> {
    type Config = MonitoredEnvConfig<E::Config>;
    type Obs = E::Obs;
    type Act = E::Act;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        Ok(Self {
            env: E::build(&config.env_config, seed)?,
            seed,
            episode: 0,
            step: 0,
            recorder: config.recorder.clone(),
        })
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        let obs = self.env.reset()?;
        self.episode += 1;
        self.step = 0;
        Ok(obs)
    }

    fn step(&mut self, act: &Self::Act) -> Result<Step<Self::Obs>> {
        let step = self.env.step(act)?;
        self.step += 1;

        let record = Record::from_slice(&[
            ("env", RecordValue::Scalar(self.seed as f32)),
            ("episode", RecordValue::Scalar(self.episode as f32)),
            ("step", RecordValue::Scalar(self.step as f32)),
            ("reward", RecordValue::Scalar(step.reward)),
            (
                "is_terminated",
                RecordValue::Scalar(step.is_terminated as i32 as f32),
            ),
        ]);
        self.recorder
            .lock()
            .map_err(|_| anyhow!("monitor recorder lock poisoned"))?
            .write(record);

        Ok(step)
    }
}

/// A row of the monitor CSV file.
#[derive(Debug, Serialize, PartialEq)]
pub struct MonitorRow {
    env: i64,
    episode: usize,
    step: usize,
    reward: f32,
    is_terminated: bool,
}

impl TryFrom<&Record> for MonitorRow {
    type Error = anyhow::Error;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            env: record.get_scalar("env")? as _,
            episode: record.get_scalar("episode")? as _,
            step: record.get_scalar("step")? as _,
            reward: record.get_scalar("reward")?,
            is_terminated: record.get_scalar("is_terminated")? > 0.0,
        })
    }
}

/// Writes monitor records to a CSV file with a header line.
pub fn write_csv(path: impl AsRef<Path>, records: &[Record]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(File::create(path)?);
    for record in records {
        wtr.serialize(MonitorRow::try_from(record)?)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corridor::{Corridor, CorridorConfig, Move};
    use tempdir::TempDir;

    #[test]
    fn test_records_steps() -> Result<()> {
        let config = MonitoredEnvConfig::new(CorridorConfig::default().length(3));
        let mut env = MonitoredEnv::<Corridor>::build(&config, 7)?;

        env.reset()?;
        env.step(&Move::Right)?;
        env.step(&Move::Right)?;
        env.reset()?;
        env.step(&Move::Left)?;

        let rows = config
            .drain()?
            .iter()
            .map(MonitorRow::try_from)
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[1],
            MonitorRow {
                env: 7,
                episode: 1,
                step: 2,
                reward: 1.0,
                is_terminated: true,
            }
        );
        assert_eq!((rows[2].episode, rows[2].step), (2, 1));
        assert!(config.drain()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_write_csv() -> Result<()> {
        let dir = TempDir::new("monitor")?;
        let path = dir.path().join("monitor.csv");
        let config = MonitoredEnvConfig::new(CorridorConfig::default().length(2));
        let mut env = MonitoredEnv::<Corridor>::build(&config, 0)?;
        env.reset()?;
        env.step(&Move::Right)?;

        write_csv(&path, &config.drain()?)?;

        let text = std::fs::read_to_string(&path)?;
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "env,episode,step,reward,is_terminated");
        assert_eq!(lines[1], "0,1,1,1.0,true");
        Ok(())
    }
}
