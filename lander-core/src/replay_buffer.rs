//! A prioritized replay buffer of bootstrapped transitions.
//!
//! The buffer stores [`Transition`]s up to a fixed capacity, evicting the
//! oldest transition when full, and samples batches with replacement with
//! probabilities derived from per-slot priorities. Priorities live in a
//! fixed-size array indexed by slot position; see
//! [`PriorityReplayBufferConfig::realign_on_evict`] for how the two arrays
//! relate after an eviction.
mod base;
mod config;

pub use base::{PriorityReplayBuffer, Transition, TransitionBatch};
pub use config::PriorityReplayBufferConfig;
