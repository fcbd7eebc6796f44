//! Actor-critic agent implemented with tch-rs.
use super::{config::A2cConfig, model::A2cModel};
use crate::{
    model::{ModelBase, SubModel},
    util::{stack_obs, OutDim},
};
use anyhow::Result;
use log::warn;
use lander_core::{
    record::{Record, RecordValue::Scalar},
    replay_buffer::TransitionBatch,
    Agent, Env, Policy, ReplayBufferBase,
};
use serde::{de::DeserializeOwned, Serialize};
use std::{fs, marker::PhantomData, path::Path};
use tch::{no_grad, Device, Kind, Tensor};

/// Actor-critic agent with a clipped surrogate objective.
///
/// The actor outputs a probability distribution over the discrete actions;
/// the critic estimates state values used by the training loop to bootstrap
/// target values. A frozen copy of the actor serves as the reference policy
/// of the surrogate ratio and is refreshed by [`Agent::sync_target`].
///
/// Two details are intentional and worth calling out:
///
/// * The surrogate ratio is `exp(p - p_old)` computed directly on the
///   softmax probabilities, not on their logarithms.
/// * The exploration rate `epsilon` doubles as the clip width of the
///   surrogate objective, so both decay together.
pub struct A2c<E, P, V>
where
    E: Env,
    P: SubModel<Input = Tensor, Output = Tensor>,
    V: SubModel<Input = Tensor, Output = Tensor>,
    E::Obs: Into<Tensor>,
    E::Act: Into<i64> + From<i64>,
    P::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    V::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    pub(in crate::a2c) actor: A2cModel<P>,
    pub(in crate::a2c) actor_tgt: A2cModel<P>,
    pub(in crate::a2c) critic: A2cModel<V>,
    pub(in crate::a2c) epsilon: f64,
    pub(in crate::a2c) epsilon_min: f64,
    pub(in crate::a2c) epsilon_decay: f64,
    pub(in crate::a2c) warmup_episodes: usize,
    pub(in crate::a2c) train: bool,
    pub(in crate::a2c) n_opts: usize,
    pub(in crate::a2c) device: Device,
    pub(in crate::a2c) phantom: PhantomData<E>,
}

impl<E, P, V> A2c<E, P, V>
where
    E: Env,
    P: SubModel<Input = Tensor, Output = Tensor>,
    V: SubModel<Input = Tensor, Output = Tensor>,
    E::Obs: Into<Tensor>,
    E::Act: Into<i64> + From<i64>,
    P::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    V::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    /// The current exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn opt_<R>(&mut self, episode: usize, buffer: &mut R) -> Record
    where
        R: ReplayBufferBase<Batch = TransitionBatch<E::Obs, E::Act>>,
    {
        // Decay exploration; the same value narrows the surrogate clip range.
        if self.epsilon > self.epsilon_min {
            self.epsilon = (self.epsilon * self.epsilon_decay).max(self.epsilon_min);
        }

        let TransitionBatch {
            obs,
            act,
            target_values,
            ixs,
        } = buffer.batch().unwrap();
        let obs = stack_obs(&obs).to(self.device);
        let act: Vec<i64> = act.into_iter().map(|a| a.into()).collect();
        let act = Tensor::from_slice(&act).to(self.device).unsqueeze(-1);
        let ret = Tensor::from_slice(&target_values[..]).to(self.device);

        // Critic update. The advantage of the actor is taken against the
        // critic value before this update, with gradients blocked.
        let v = self.critic.forward(&obs, true).squeeze_dim(-1);
        let advantage = &ret - &v.detach();
        let loss_c = (&ret - &v).square().mean(Kind::Float);
        self.critic.backward_step(&loss_c);

        // Actor update. The ratio is formed in probability space from the
        // softmax outputs of the current and the reference policy. During
        // the warm-up episodes the reference is the current policy itself,
        // fixing the ratio at one.
        let probs = self.actor.forward(&obs, true);
        let a_t = probs.gather(-1, &act, false).squeeze_dim(-1);
        let a_t_old = if episode < self.warmup_episodes + 1 {
            a_t.detach()
        } else {
            no_grad(|| {
                self.actor_tgt
                    .forward(&obs, false)
                    .gather(-1, &act, false)
                    .squeeze_dim(-1)
            })
        };

        let ratio = (&a_t - &a_t_old).exp();
        let clipped = ratio.clamp(1.0 - self.epsilon, 1.0 + self.epsilon) * &advantage;
        let surrogate = (&ratio * &advantage).minimum(&clipped);
        let loss_a = -surrogate.mean(Kind::Float);
        self.actor.backward_step(&loss_a);

        // Per-sample surrogate values become the new priorities of the
        // sampled transitions.
        let priorities = Vec::<f32>::from(&surrogate.detach().to(Device::Cpu));
        buffer.update_priority(&ixs, &priorities);

        self.n_opts += 1;

        let loss_actor = f32::from(loss_a);
        let loss_critic = f32::from(loss_c);
        if !loss_actor.is_finite() || !loss_critic.is_finite() {
            warn!(
                "Non-finite loss at optimization step {}: actor {}, critic {}",
                self.n_opts, loss_actor, loss_critic
            );
        }

        Record::from_slice(&[
            ("loss_actor", Scalar(loss_actor)),
            ("loss_critic", Scalar(loss_critic)),
            ("loss", Scalar(loss_actor + loss_critic)),
            ("eps", Scalar(self.epsilon as f32)),
        ])
    }
}

impl<E, P, V> Policy<E> for A2c<E, P, V>
where
    E: Env,
    P: SubModel<Input = Tensor, Output = Tensor>,
    V: SubModel<Input = Tensor, Output = Tensor>,
    E::Obs: Into<Tensor>,
    E::Act: Into<i64> + From<i64>,
    P::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    V::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    type Config = A2cConfig<P, V>;

    /// Constructs the actor-critic agent.
    fn build(config: Self::Config) -> Self {
        let device: Device = config
            .device
            .expect("No device is given for A2C agent")
            .into();
        let actor = A2cModel::build(config.actor_model_config, device);
        let mut actor_tgt = actor.clone();
        actor_tgt.freeze();
        let critic = A2cModel::build(config.critic_model_config, device);

        A2c {
            actor,
            actor_tgt,
            critic,
            epsilon: config.epsilon,
            epsilon_min: config.epsilon_min,
            epsilon_decay: config.epsilon_decay,
            warmup_episodes: config.warmup_episodes,
            train: config.train,
            n_opts: 0,
            device,
            phantom: PhantomData,
        }
    }

    /// Samples an action, either at random from the environment's action
    /// space with probability `epsilon` (in training mode), or greedily
    /// from the actor's probabilities.
    fn sample(&mut self, obs: &E::Obs, env: &mut E) -> E::Act {
        if self.train && fastrand::f64() < self.epsilon {
            return env.sample_act();
        }

        no_grad(|| {
            let obs = obs.clone().into().to(self.device).unsqueeze(0);
            let probs = self.actor.forward(&obs, false);
            let a = probs.argmax(-1, false).int64_value(&[0]);
            a.into()
        })
    }
}

impl<E, P, V, R> Agent<E, R> for A2c<E, P, V>
where
    E: Env,
    P: SubModel<Input = Tensor, Output = Tensor>,
    V: SubModel<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = TransitionBatch<E::Obs, E::Act>>,
    E::Obs: Into<Tensor>,
    E::Act: Into<i64> + From<i64>,
    P::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    V::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn opt_with_record(&mut self, episode: usize, buffer: &mut R) -> Record {
        self.opt_(episode, buffer)
    }

    fn state_values(&mut self, obs: &[E::Obs]) -> Vec<f32> {
        if obs.is_empty() {
            return vec![];
        }

        no_grad(|| {
            let obs = stack_obs(obs).to(self.device);
            let v = self.critic.forward(&obs, false).squeeze_dim(-1);
            Vec::<f32>::from(&v.to(Device::Cpu))
        })
    }

    fn sync_target(&mut self) {
        self.actor_tgt.sync_from(&self.actor).unwrap();
        self.actor_tgt.freeze();
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        self.actor.save(&path.join("actor.pt"))?;
        self.actor_tgt.save(&path.join("actor_tgt.pt"))?;
        self.critic.save(&path.join("critic.pt"))?;
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.actor.load(&path.join("actor.pt"))?;
        self.actor_tgt.load(&path.join("actor_tgt.pt"))?;
        self.critic.load(&path.join("critic.pt"))?;
        Ok(())
    }
}
