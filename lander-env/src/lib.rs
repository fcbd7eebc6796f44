#![warn(missing_docs)]
//! A simulated lunar lander environment.
//!
//! [`LanderEnv`] implements [`lander_core::Env`] for a small deterministic
//! rigid-body simulation of a lunar lander with one main engine and two
//! orientation engines. Observations are 8-dimensional vectors and the
//! action space consists of four discrete actions.
//!
//! With the `tch` feature enabled, [`LanderObs`] converts into a
//! `tch::Tensor` so that the environment can be driven by tch-based agents.
mod base;
mod config;

pub use base::{LanderAct, LanderEnv, LanderObs, N_ACTS, OBS_DIM};
pub use config::LanderEnvConfig;
