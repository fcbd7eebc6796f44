//! Configuration of the actor-critic agent.
use super::A2cModelConfig;
use crate::{model::SubModel, util::OutDim, Device};
use anyhow::Result;
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    marker::PhantomData,
    path::Path,
};
use tch::Tensor;

/// Configuration of [`A2c`](super::A2c).
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct A2cConfig<P, V>
where
    P: SubModel<Input = Tensor, Output = Tensor>,
    V: SubModel<Input = Tensor, Output = Tensor>,
    P::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    V::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    /// Configuration of the actor network.
    pub(super) actor_model_config: A2cModelConfig<P::Config>,

    /// Configuration of the critic network.
    pub(super) critic_model_config: A2cModelConfig<V::Config>,

    /// Initial exploration rate, also used as the clip width of the
    /// surrogate objective.
    pub(super) epsilon: f64,

    /// Lower bound of the exploration rate.
    pub(super) epsilon_min: f64,

    /// Multiplicative decay applied to the exploration rate per
    /// optimization step.
    pub(super) epsilon_decay: f64,

    /// The number of initial episodes during which the surrogate ratio is
    /// computed against the current policy itself instead of the target
    /// network.
    pub(super) warmup_episodes: usize,

    /// Whether the agent starts in training mode.
    pub(super) train: bool,

    /// Device on which the networks are placed.
    pub device: Option<Device>,

    phantom: PhantomData<(P, V)>,
}

impl<P, V> Clone for A2cConfig<P, V>
where
    P: SubModel<Input = Tensor, Output = Tensor>,
    V: SubModel<Input = Tensor, Output = Tensor>,
    P::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    V::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    fn clone(&self) -> Self {
        Self {
            actor_model_config: self.actor_model_config.clone(),
            critic_model_config: self.critic_model_config.clone(),
            epsilon: self.epsilon,
            epsilon_min: self.epsilon_min,
            epsilon_decay: self.epsilon_decay,
            warmup_episodes: self.warmup_episodes,
            train: self.train,
            device: self.device.clone(),
            phantom: PhantomData,
        }
    }
}

impl<P, V> Default for A2cConfig<P, V>
where
    P: SubModel<Input = Tensor, Output = Tensor>,
    V: SubModel<Input = Tensor, Output = Tensor>,
    P::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    V::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    fn default() -> Self {
        Self {
            actor_model_config: Default::default(),
            critic_model_config: Default::default(),
            epsilon: 0.99,
            epsilon_min: 0.1,
            epsilon_decay: 0.999,
            warmup_episodes: 500,
            train: false,
            device: None,
            phantom: PhantomData,
        }
    }
}

impl<P, V> A2cConfig<P, V>
where
    P: SubModel<Input = Tensor, Output = Tensor>,
    V: SubModel<Input = Tensor, Output = Tensor>,
    P::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    V::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    /// Sets the configuration of the actor network.
    pub fn actor_model_config(mut self, actor_model_config: A2cModelConfig<P::Config>) -> Self {
        self.actor_model_config = actor_model_config;
        self
    }

    /// Sets the configuration of the critic network.
    pub fn critic_model_config(mut self, critic_model_config: A2cModelConfig<V::Config>) -> Self {
        self.critic_model_config = critic_model_config;
        self
    }

    /// Sets the initial exploration rate.
    pub fn epsilon(mut self, v: f64) -> Self {
        self.epsilon = v;
        self
    }

    /// Sets the lower bound of the exploration rate.
    pub fn epsilon_min(mut self, v: f64) -> Self {
        self.epsilon_min = v;
        self
    }

    /// Sets the decay of the exploration rate.
    pub fn epsilon_decay(mut self, v: f64) -> Self {
        self.epsilon_decay = v;
        self
    }

    /// Sets the number of warm-up episodes.
    pub fn warmup_episodes(mut self, v: usize) -> Self {
        self.warmup_episodes = v;
        self
    }

    /// Sets whether the agent starts in training mode.
    pub fn train(mut self, v: bool) -> Self {
        self.train = v;
        self
    }

    /// Sets the device.
    pub fn device(mut self, device: tch::Device) -> Self {
        self.device = Some(device.into());
        self
    }

    /// Loads [`A2cConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of A2C agent from {}", path_.to_str().unwrap());
        Ok(b)
    }

    /// Saves [`A2cConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of A2C agent into {}", path_.to_str().unwrap());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mlp::{Mlp, MlpConfig};
    use crate::opt::OptimizerConfig;
    use tempdir::TempDir;

    #[test]
    fn test_serde_a2c_config() -> Result<()> {
        let config: A2cConfig<Mlp, Mlp> = A2cConfig::default()
            .actor_model_config(
                A2cModelConfig::default()
                    .net_config(MlpConfig::new(8, vec![512, 512], 4, true))
                    .opt_config(OptimizerConfig::Adam { lr: 1e-4 }),
            )
            .critic_model_config(
                A2cModelConfig::default()
                    .net_config(MlpConfig::new(8, vec![512, 512], 1, false))
                    .opt_config(OptimizerConfig::Adam { lr: 1e-4 }),
            )
            .epsilon(0.9)
            .warmup_episodes(100);

        let dir = TempDir::new("a2c_config")?;
        let path = dir.path().join("a2c_config.yaml");
        config.save(&path)?;
        let config_ = A2cConfig::<Mlp, Mlp>::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
