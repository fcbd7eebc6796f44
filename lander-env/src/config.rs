//! Configuration of [`LanderEnv`](crate::LanderEnv).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`LanderEnv`](crate::LanderEnv).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct LanderEnvConfig {
    /// The number of steps after which an episode is truncated.
    pub max_episode_steps: usize,
}

impl Default for LanderEnvConfig {
    fn default() -> Self {
        Self {
            max_episode_steps: 1000,
        }
    }
}

impl LanderEnvConfig {
    /// Sets the number of steps after which an episode is truncated.
    pub fn max_episode_steps(mut self, v: usize) -> Self {
        self.max_episode_steps = v;
        self
    }

    /// Constructs [`LanderEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`LanderEnvConfig`].
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
    fn test_serde_lander_env_config() -> Result<()> {
        let config = LanderEnvConfig::default().max_episode_steps(250);

        let dir = TempDir::new("lander_env_config")?;
        let path = dir.path().join("env_config.yaml");
        config.save(&path)?;
        let config_ = LanderEnvConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
