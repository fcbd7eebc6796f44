use anyhow::Result;
use lander_core::{
    record::Record,
    replay_buffer::{PriorityReplayBuffer, PriorityReplayBufferConfig},
    Act, Env, Obs, Policy, Step, Trainer, TrainerConfig,
};
use lander_tch_agent::{A2c, A2cConfig, A2cModelConfig, Mlp, MlpConfig, OptimizerConfig};
use tch::Tensor;

const OBS_DIM: usize = 4;
const N_ACTS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
struct StubObs(Vec<f32>);

impl Obs for StubObs {
    fn dim(&self) -> usize {
        self.0.len()
    }
}

impl From<StubObs> for Tensor {
    fn from(obs: StubObs) -> Tensor {
        Tensor::from_slice(&obs.0[..])
    }
}

#[derive(Debug, Clone, Copy)]
struct StubAct(i64);

impl Act for StubAct {}

impl From<i64> for StubAct {
    fn from(v: i64) -> Self {
        Self(v)
    }
}

impl From<StubAct> for i64 {
    fn from(a: StubAct) -> i64 {
        a.0
    }
}

/// A tiny deterministic environment terminating after a fixed horizon.
struct StubEnv {
    horizon: usize,
    steps: usize,
    sample_count: usize,
}

impl StubEnv {
    fn observe(&self) -> StubObs {
        let t = self.steps as f32;
        StubObs(vec![t * 0.1, (t * 0.3).sin(), (t * 0.2).cos(), 1.0])
    }
}

impl Env for StubEnv {
    type Config = usize; // horizon
    type Obs = StubObs;
    type Act = StubAct;
    type Info = ();

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            horizon: *config,
            steps: 0,
            sample_count: 0,
        })
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.steps = 0;
        Ok(self.observe())
    }

    fn reset_with_index(&mut self, _ix: usize) -> Result<Self::Obs> {
        self.reset()
    }

    fn step(&mut self, a: &Self::Act) -> (Step<Self>, Record) {
        self.steps += 1;
        let reward = if a.0 == 0 { 1.0 } else { 0.5 };
        let step = Step::new(self.observe(), *a, reward, self.steps >= self.horizon, false, ());
        (step, Record::empty())
    }

    fn sample_act(&mut self) -> Self::Act {
        self.sample_count += 1;
        StubAct((self.sample_count % N_ACTS) as i64)
    }

    fn n_acts(&self) -> usize {
        N_ACTS
    }

    fn obs_dim(&self) -> usize {
        OBS_DIM
    }
}

type StubBuffer = PriorityReplayBuffer<StubObs, StubAct>;

fn agent_config(epsilon: f64, epsilon_min: f64, epsilon_decay: f64) -> A2cConfig<Mlp, Mlp> {
    A2cConfig::default()
        .actor_model_config(
            A2cModelConfig::default()
                .net_config(MlpConfig::new(OBS_DIM as i64, vec![8], N_ACTS as i64, true))
                .opt_config(OptimizerConfig::Adam { lr: 1e-3 }),
        )
        .critic_model_config(
            A2cModelConfig::default()
                .net_config(MlpConfig::new(OBS_DIM as i64, vec![8], 1, false))
                .opt_config(OptimizerConfig::Adam { lr: 1e-3 }),
        )
        .epsilon(epsilon)
        .epsilon_min(epsilon_min)
        .epsilon_decay(epsilon_decay)
        .train(true)
        .device(tch::Device::Cpu)
}

fn buffer(capacity: usize, batch_size: usize) -> StubBuffer {
    use lander_core::ReplayBufferBase;
    let config = PriorityReplayBufferConfig::default()
        .capacity(capacity)
        .batch_size(batch_size)
        .seed(1);
    StubBuffer::build(&config).unwrap()
}

#[test]
fn test_full_exploration_uses_env_sampling() {
    tch::manual_seed(0);
    fastrand::seed(5);
    let mut env = StubEnv::build(&8, 0).unwrap();
    let mut agent: A2c<StubEnv, Mlp, Mlp> = A2c::build(agent_config(1.0, 1.0, 1.0));

    let obs = env.reset().unwrap();
    for _ in 0..100 {
        agent.sample(&obs, &mut env);
    }
    assert_eq!(env.sample_count, 100);
}

#[test]
fn test_zero_epsilon_is_greedy() {
    tch::manual_seed(0);
    fastrand::seed(5);
    let mut env = StubEnv::build(&8, 0).unwrap();
    let mut agent: A2c<StubEnv, Mlp, Mlp> = A2c::build(agent_config(0.0, 0.0, 1.0));

    let obs = env.reset().unwrap();
    for _ in 0..100 {
        let a = agent.sample(&obs, &mut env);
        assert!((0..N_ACTS as i64).contains(&a.0));
    }
    assert_eq!(env.sample_count, 0);
}

#[test]
fn test_epsilon_decays_monotonically_to_floor() -> Result<()> {
    tch::manual_seed(0);
    fastrand::seed(5);
    let mut env = StubEnv::build(&8, 0).unwrap();
    let mut agent: A2c<StubEnv, Mlp, Mlp> = A2c::build(agent_config(0.9, 0.5, 0.7));
    let mut buffer = buffer(64, 4);
    let mut trainer = Trainer::build(TrainerConfig::default().max_steps(10).gamma(0.9));

    let mut eps_values = vec![];
    for episode in 0..6 {
        let record = trainer.train_episode(&mut env, &mut agent, &mut buffer, episode)?;
        if let Ok(eps) = record.get_scalar("eps") {
            eps_values.push(eps);
        }
    }

    assert!(!eps_values.is_empty());
    for w in eps_values.windows(2) {
        assert!(w[1] <= w[0]);
    }
    for &eps in eps_values.iter() {
        assert!(eps >= 0.5);
    }
    assert_eq!(*eps_values.last().unwrap(), 0.5);
    Ok(())
}

#[test]
fn test_training_is_deterministic_under_fixed_seeds() -> Result<()> {
    fn run() -> Result<Vec<f32>> {
        tch::manual_seed(7);
        fastrand::seed(11);
        let mut env = StubEnv::build(&8, 0).unwrap();
        let mut agent: A2c<StubEnv, Mlp, Mlp> = A2c::build(agent_config(0.9, 0.1, 0.999));
        let mut buffer = buffer(64, 4);
        let mut trainer = Trainer::build(TrainerConfig::default().max_steps(10).gamma(0.9));

        let mut metrics = vec![];
        for episode in 0..3 {
            let record = trainer.train_episode(&mut env, &mut agent, &mut buffer, episode)?;
            metrics.push(record.get_scalar("score")?);
            if let Ok(loss) = record.get_scalar("loss") {
                metrics.push(loss);
            }
        }
        Ok(metrics)
    }

    assert_eq!(run()?, run()?);
    Ok(())
}
