use std::time::Duration;

/// Stats of the episode loop in each [`Worker`](crate::Worker).
#[derive(Clone, Debug, Default)]
pub struct WorkerStat {
    /// Id of the worker.
    pub worker_id: usize,

    /// The number of episodes finished by the worker.
    pub episodes: usize,

    /// The number of timesteps in those episodes.
    pub timesteps: usize,

    /// Duration of the episode loop.
    pub duration: Duration,
}

/// Returns a formatted string of the set of [`WorkerStat`] for reporting.
pub fn worker_stats_fmt(stats: &[WorkerStat]) -> String {
    let mut s = "worker id, episodes, timesteps, duration [sec], timesteps per sec\n".to_string();
    for stat in stats.iter() {
        let d = stat.duration.as_secs_f32();
        let p = if d > 0.0 { stat.timesteps as f32 / d } else { 0.0 };
        s += format!(
            "{}, {}, {}, {}, {}\n",
            stat.worker_id, stat.episodes, stat.timesteps, d, p
        )
        .as_str();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_stats_fmt() {
        let stats = vec![
            WorkerStat {
                worker_id: 0,
                episodes: 3,
                timesteps: 30,
                duration: Duration::from_secs(2),
            },
            WorkerStat {
                worker_id: 1,
                ..Default::default()
            },
        ];
        let s = worker_stats_fmt(&stats);
        let lines = s.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "0, 3, 30, 2, 15");
        assert_eq!(lines[2], "1, 0, 0, 0, 0");
    }
}
