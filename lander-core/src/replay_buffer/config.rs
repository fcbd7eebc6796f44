//! Configuration of [`PriorityReplayBuffer`](super::PriorityReplayBuffer).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`PriorityReplayBuffer`](super::PriorityReplayBuffer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PriorityReplayBufferConfig {
    /// The maximum number of transitions in the buffer.
    pub capacity: usize,

    /// The number of transitions per sampled batch.
    pub batch_size: usize,

    /// Exponent applied to shifted priorities when computing sampling
    /// probabilities.
    pub alpha: f32,

    /// Seed of the random number generator used for sampling.
    pub seed: u64,

    /// Shifts the priority array together with the transitions when the
    /// oldest transition is evicted.
    ///
    /// When `false`, priorities keep their slot position while transitions
    /// move down by one, so surviving transitions inherit the priority of
    /// their former neighbor. This reproduces the historical behavior of the
    /// buffer; set to `true` for the corrected bookkeeping.
    #[serde(default)]
    pub realign_on_evict: bool,
}

impl Default for PriorityReplayBufferConfig {
    fn default() -> Self {
        Self {
            capacity: 20000,
            batch_size: 128,
            alpha: 1.0,
            seed: 42,
            realign_on_evict: false,
        }
    }
}

impl PriorityReplayBufferConfig {
    /// Sets the capacity of the buffer.
    pub fn capacity(mut self, v: usize) -> Self {
        self.capacity = v;
        self
    }

    /// Sets the batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the priority exponent.
    pub fn alpha(mut self, v: f32) -> Self {
        self.alpha = v;
        self
    }

    /// Sets the seed of the sampling random number generator.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Sets whether priorities are shifted together with evicted transitions.
    pub fn realign_on_evict(mut self, v: bool) -> Self {
        self.realign_on_evict = v;
        self
    }

    /// Constructs [`PriorityReplayBufferConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`PriorityReplayBufferConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_replay_buffer_config() -> Result<()> {
        let config = PriorityReplayBufferConfig::default()
            .capacity(1000)
            .batch_size(32)
            .seed(7);

        let dir = TempDir::new("priority_replay_buffer_config")?;
        let path = dir.path().join("config.yaml");
        config.save(&path)?;
        let config_ = PriorityReplayBufferConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
