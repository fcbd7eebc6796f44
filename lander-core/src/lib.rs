#![warn(missing_docs)]
//! Core abstractions for training an actor-critic lander agent.
//!
//! This crate defines the interfaces connecting the objects of the training
//! process and provides backend-agnostic implementations of the training
//! loop and the experience replay buffer:
//!
//! * [`Env`] is the environment interface, a Markov decision process with
//!   discrete actions.
//! * [`Policy`] maps observations to actions; [`Agent`] extends it with
//!   optimization steps, value estimation and target network handling.
//! * [`PriorityReplayBuffer`] stores bootstrapped transitions and samples
//!   batches with priority-weighted probabilities.
//! * [`Trainer`] runs the episode-based training loop, pushing transitions
//!   with discounted target values into the buffer and triggering
//!   optimization steps, target synchronization and evaluation.
//! * [`record`] contains types for collecting and aggregating training
//!   metrics, consumed by implementations of [`record::Recorder`].
//!
//! Concrete environments and agents live in separate crates; this crate has
//! no dependency on a specific deep learning backend.
//!
//! [`PriorityReplayBuffer`]: replay_buffer::PriorityReplayBuffer
pub mod error;
pub mod record;
pub mod replay_buffer;

mod base;
pub use base::{Act, Agent, Env, ExperienceBufferBase, Info, Obs, Policy, ReplayBufferBase, Step};

mod trainer;
pub use trainer::{Trainer, TrainerConfig};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};
