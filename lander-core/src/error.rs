//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Debug, Error)]
pub enum LanderError {
    /// The value stored in a record has an unexpected type.
    #[error("Record value type mismatch, expected {0}")]
    RecordValueTypeError(String),

    /// The requested key does not exist in a record.
    #[error("Key {0} was not found in the record")]
    RecordKeyError(String),

    /// A configuration value is out of its admissible range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A batch was requested from a replay buffer holding no transitions.
    #[error("Tried to sample a batch from an empty replay buffer")]
    EmptyReplayBuffer,
}
