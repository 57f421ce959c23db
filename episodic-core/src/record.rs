//! Types and traits for recording values obtained during a run.
//!
//! * [`Record`] - A container for key-value pairs of various data types
//! * [`RecordValue`] - The values that can be stored in a [`Record`]
//! * [`Recorder`] - Where records are written to
//! * [`BufferedRecorder`] - Keeps records in memory
//!
//! ```rust
//! use episodic_core::record::{Record, RecordValue};
//!
//! // following values are obtained with some process in reality
//! let episode = 1;
//! let reward = -1f32;
//!
//! let mut record = Record::empty();
//! record.insert("episode", RecordValue::Scalar(episode as f32));
//! record.insert("reward", RecordValue::Scalar(reward));
//! record.insert("tag", RecordValue::String("warmup".to_string()));
//! assert_eq!(record.get_scalar("reward").unwrap(), -1.0);
//! ```
//!
//! [`EpisodeRecord`](crate::EpisodeRecord) converts into a [`Record`], which is
//! how episode summaries reach a [`Recorder`].
mod base;
mod buffered_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use recorder::Recorder;
