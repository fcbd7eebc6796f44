//! Types and traits for recording training metrics.
//!
//! A [`Record`] is a map from string keys to [`RecordValue`]s, produced once
//! per training episode or evaluation run. Records are handed to a
//! [`Recorder`], which either writes them out immediately or stores them for
//! aggregation with [`RecordStorage`].
//!
//! ```rust
//! use lander_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("episode", RecordValue::Scalar(1.0));
//! record.insert("score", RecordValue::Scalar(-87.3));
//! assert_eq!(record.get_scalar("score").unwrap(), -87.3);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
pub use storage::RecordStorage;
