//! Actor-critic training of a lunar lander agent in Rust.
//!
//! Lander consists of the following crates:
//!
//! * Core and utility
//!   * [lander-core](../lander_core/index.html) provides basic traits and
//!     functions generic to environments and reinforcement learning (RL)
//!     agents, an episode-based [`Trainer`](lander_core::Trainer) and a
//!     prioritized replay buffer.
//!   * [lander-tensorboard](../lander_tensorboard/index.html) has the
//!     `TensorboardRecorder` struct to write records which can be shown in
//!     Tensorboard. It is based on
//!     [tensorboard-rs](https://crates.io/crates/tensorboard-rs).
//!   * [lander](../lander/index.html) is just a collection of examples.
//! * Environment
//!   * [lander-env](../lander_env/index.html) is a self-contained simulation
//!     of a lunar lander with a discrete action space.
//! * Agent
//!   * [lander-tch-agent](../lander_tch_agent/index.html) includes an
//!     actor-critic agent with a clipped surrogate objective, based on
//!     [tch](https://crates.io/crates/tch).
//!
//! See `examples/a2c_lander.rs` for training and evaluating the agent in the
//! lander environment.
