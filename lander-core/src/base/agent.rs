//! Agent interface.
use super::{Env, Policy, ReplayBufferBase};
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// A trainable policy.
///
/// In addition to sampling actions, an agent performs optimization steps on
/// batches drawn from a replay buffer and maintains its internal networks,
/// including a periodically synchronized target network.
pub trait Agent<E: Env, R: ReplayBufferBase>: Policy<E> {
    /// Sets the policy to training mode, enabling exploration.
    fn train(&mut self);

    /// Sets the policy to evaluation mode, acting greedily.
    fn eval(&mut self);

    /// Returns `true` if the policy is in training mode.
    fn is_train(&self) -> bool;

    /// Performs an optimization step.
    ///
    /// `episode` is the index of the current training episode; agents may use
    /// it to switch behavior during an initial warm-up phase.
    fn opt(&mut self, episode: usize, buffer: &mut R) {
        let _ = self.opt_with_record(episode, buffer);
    }

    /// Performs an optimization step and returns information as a [`Record`].
    fn opt_with_record(&mut self, episode: usize, buffer: &mut R) -> Record;

    /// Estimates the state value of each given observation.
    ///
    /// Used by the training loop to bootstrap discounted targets.
    fn state_values(&mut self, obs: &[E::Obs]) -> Vec<f32>;

    /// Copies the online network parameters into the target network.
    fn sync_target(&mut self);

    /// Saves the model parameters in the given directory.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Loads the model parameters from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
