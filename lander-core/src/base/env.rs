//! Environment interface.
use super::{Act, Info, Obs, Step};
use crate::record::Record;
use anyhow::Result;

/// An environment, typically an MDP with discrete actions.
pub trait Env {
    /// Configuration of the environment.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Information given at every step of the interaction.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Resets the environment and returns the initial observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Resets the environment for the `ix`-th evaluation episode.
    ///
    /// Implementations may use `ix` to derive a deterministic initial state
    /// per evaluation episode.
    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs>;

    /// Performs an environment step given an action.
    fn step(&mut self, a: &Self::Act) -> (Step<Self>, Record)
    where
        Self: Sized;

    /// Draws an action from the environment's action space at random.
    ///
    /// Used by agents for epsilon-greedy exploration.
    fn sample_act(&mut self) -> Self::Act;

    /// The number of discrete actions.
    fn n_acts(&self) -> usize;

    /// Dimension of the observation vector.
    fn obs_dim(&self) -> usize;
}
