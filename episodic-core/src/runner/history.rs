//! Episode records and run history.
use crate::record::{Record, RecordValue};
use serde::{Deserialize, Serialize};

/// Summary of one finished episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// Index of the episode in the run.
    pub episode_index: usize,

    /// Sum of rewards over the episode.
    pub total_reward: f32,

    /// The number of timesteps, i.e., agent actions, in the episode.
    pub length: usize,
}

impl EpisodeRecord {
    /// Returns `true` if the episode hit the timestep bound.
    ///
    /// An episode whose terminal signal arrives exactly at the bound is
    /// indistinguishable from a truncated one.
    pub fn is_truncated(&self, max_timesteps_per_episode: usize) -> bool {
        self.length >= max_timesteps_per_episode
    }
}

impl From<&EpisodeRecord> for Record {
    fn from(r: &EpisodeRecord) -> Self {
        Record::from_slice(&[
            ("episode", RecordValue::Scalar(r.episode_index as f32)),
            ("episode_return", RecordValue::Scalar(r.total_reward)),
            ("episode_length", RecordValue::Scalar(r.length as f32)),
        ])
    }
}

/// Records of finished episodes in completion order.
///
/// The history only grows. With concurrent workers, completion order is not
/// the order of episode indices.
#[derive(Debug, Clone, Default)]
pub struct RunHistory {
    records: Vec<EpisodeRecord>,
}

impl RunHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub fn push(&mut self, record: EpisodeRecord) {
        self.records.push(record);
    }

    /// The number of finished episodes.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no episode has finished.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recently finished episode.
    pub fn last(&self) -> Option<&EpisodeRecord> {
        self.records.last()
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> std::slice::Iter<EpisodeRecord> {
        self.records.iter()
    }

    /// Records as a slice.
    pub fn as_slice(&self) -> &[EpisodeRecord] {
        &self.records
    }

    /// Episode returns in completion order.
    pub fn rewards(&self) -> Vec<f32> {
        self.records.iter().map(|r| r.total_reward).collect()
    }

    /// Sum of episode lengths.
    pub fn total_timesteps(&self) -> usize {
        self.records.iter().map(|r| r.length).sum()
    }

    /// Mean return of the last `n` finished episodes, or of all of them if
    /// fewer have finished. `None` for an empty history or `n == 0`.
    pub fn mean_reward_last(&self, n: usize) -> Option<f32> {
        let k = n.min(self.records.len());
        if k == 0 {
            return None;
        }
        let sum: f32 = self.records[self.records.len() - k..]
            .iter()
            .map(|r| r.total_reward)
            .sum();
        Some(sum / k as f32)
    }
}

impl<'a> IntoIterator for &'a RunHistory {
    type Item = &'a EpisodeRecord;
    type IntoIter = std::slice::Iter<'a, EpisodeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(rewards: &[f32]) -> RunHistory {
        let mut h = RunHistory::new();
        for (i, &r) in rewards.iter().enumerate() {
            h.push(EpisodeRecord {
                episode_index: i,
                total_reward: r,
                length: i + 1,
            });
        }
        h
    }

    #[test]
    fn test_mean_reward_last() {
        let h = history(&[1.0, 2.0, 3.0, 6.0]);
        assert_eq!(h.mean_reward_last(2), Some(4.5));
        assert_eq!(h.mean_reward_last(100), Some(3.0));
        assert_eq!(h.mean_reward_last(0), None);
        assert_eq!(RunHistory::new().mean_reward_last(10), None);
    }

    #[test]
    fn test_totals() {
        let h = history(&[1.0, -1.0, 0.5]);
        assert_eq!(h.total_timesteps(), 6);
        assert_eq!(h.rewards(), vec![1.0, -1.0, 0.5]);
        assert_eq!(h.last().map(|r| r.episode_index), Some(2));
    }

    #[test]
    fn test_into_record() {
        let r = EpisodeRecord {
            episode_index: 3,
            total_reward: -2.0,
            length: 17,
        };
        let record = Record::from(&r);
        assert_eq!(record.get_scalar("episode").unwrap(), 3.0);
        assert_eq!(record.get_scalar("episode_return").unwrap(), -2.0);
        assert_eq!(record.get_scalar("episode_length").unwrap(), 17.0);
        assert!(r.is_truncated(17));
        assert!(!r.is_truncated(18));
    }
}
