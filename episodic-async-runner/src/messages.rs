use crate::WorkerStat;
use crossbeam_channel::Sender;
use episodic_core::{EpisodeRecord, EpisodicError};

/// Messages that the aggregator receives from workers.
#[derive(Debug)]
pub enum WorkerMessage {
    /// A worker finished an episode.
    EpisodeFinished {
        /// Id of the worker.
        worker_id: usize,

        /// Summary of the episode.
        record: EpisodeRecord,

        /// Signalled by the aggregator once the record is handled. The worker
        /// waits for it before claiming another episode.
        ack: Sender<()>,
    },

    /// A worker failed and stopped.
    Failed {
        /// Id of the worker.
        worker_id: usize,

        /// The error.
        error: EpisodicError,
    },

    /// A worker left its loop. This is the last message of a worker.
    Exited(WorkerStat),
}
