use anyhow::Result;
use clap::Parser;
use lander_core::{
    replay_buffer::{PriorityReplayBuffer, PriorityReplayBufferConfig},
    Agent, DefaultEvaluator, Env as _, Evaluator as _, Policy as _, ReplayBufferBase as _,
    Trainer, TrainerConfig,
};
use lander_env::{LanderAct, LanderEnv, LanderEnvConfig, LanderObs, N_ACTS, OBS_DIM};
use lander_tch_agent::{
    A2c, A2cConfig, A2cModelConfig, Mlp, MlpConfig, OptimizerConfig,
};
use lander_tensorboard::TensorboardRecorder;
use serde::Serialize;
use std::path::Path;

const DIM_OBS: i64 = OBS_DIM as i64;
const DIM_ACT: i64 = N_ACTS as i64;
const LR: f64 = 1e-4;
const HIDDEN_DIM: i64 = 512;
const BATCH_SIZE: usize = 128;
const REPLAY_BUFFER_CAPACITY: usize = 20000;
const DISCOUNT_FACTOR: f64 = 0.8;
const EPSILON: f64 = 0.99;
const EPSILON_MIN: f64 = 0.1;
const EPSILON_DECAY: f64 = 0.999;
const MAX_STEPS_PER_EPISODE: usize = 200;
const SYNC_INTERVAL: usize = 500;
const WARMUP_EPISODES: usize = 500;
const MAX_EPISODES: usize = 10000;
const EVAL_INTERVAL: usize = 500;
const N_EPISODES_PER_EVAL: usize = 5;
const MODEL_DIR: &str = "./model/a2c_lander";

type ReplayBuffer = PriorityReplayBuffer<LanderObs, LanderAct>;
type Evaluator = DefaultEvaluator<LanderEnv>;

mod config {
    use super::*;

    #[derive(Serialize)]
    pub struct A2cLanderConfig {
        pub env_config: LanderEnvConfig,
        pub agent_config: A2cConfig<Mlp, Mlp>,
        pub trainer_config: TrainerConfig,
    }

    impl A2cLanderConfig {
        pub fn new(max_episodes: usize, model_dir: &str, eval_interval: usize) -> Self {
            let env_config = create_env_config();
            let agent_config = create_agent_config();
            let trainer_config = TrainerConfig::default()
                .max_episodes(max_episodes)
                .max_steps(MAX_STEPS_PER_EPISODE)
                .gamma(DISCOUNT_FACTOR)
                .sync_interval(SYNC_INTERVAL)
                .eval_interval(eval_interval)
                .save_interval(eval_interval)
                .model_dir(model_dir);
            Self {
                env_config,
                agent_config,
                trainer_config,
            }
        }
    }

    pub fn create_env_config() -> LanderEnvConfig {
        LanderEnvConfig::default()
    }

    pub fn create_agent_config() -> A2cConfig<Mlp, Mlp> {
        let device = tch::Device::cuda_if_available();
        let actor_model_config = A2cModelConfig::default()
            .net_config(MlpConfig::new(
                DIM_OBS,
                vec![HIDDEN_DIM, HIDDEN_DIM],
                DIM_ACT,
                true,
            ))
            .opt_config(OptimizerConfig::Adam { lr: LR });
        let critic_model_config = A2cModelConfig::default()
            .net_config(MlpConfig::new(
                DIM_OBS,
                vec![HIDDEN_DIM, HIDDEN_DIM],
                1,
                false,
            ))
            .opt_config(OptimizerConfig::Adam { lr: LR });
        A2cConfig::default()
            .actor_model_config(actor_model_config)
            .critic_model_config(critic_model_config)
            .epsilon(EPSILON)
            .epsilon_min(EPSILON_MIN)
            .epsilon_decay(EPSILON_DECAY)
            .warmup_episodes(WARMUP_EPISODES)
            .device(device)
    }
}

use config::{create_agent_config, create_env_config, A2cLanderConfig};

/// Train/eval an actor-critic agent in the lander environment
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Train the agent, not evaluate
    #[arg(short, long, default_value_t = false)]
    train: bool,

    /// Evaluate the agent, not train
    #[arg(short, long, default_value_t = false)]
    eval: bool,

    /// The number of training episodes
    #[arg(long, default_value_t = MAX_EPISODES)]
    episodes: usize,
}

fn train(args: &Args, model_dir: &str) -> Result<()> {
    let config = A2cLanderConfig::new(args.episodes, model_dir, EVAL_INTERVAL);
    let replay_buffer_config = PriorityReplayBufferConfig::default()
        .capacity(REPLAY_BUFFER_CAPACITY)
        .batch_size(BATCH_SIZE);
    let mut recorder = TensorboardRecorder::new(model_dir);
    let mut trainer = Trainer::build(config.trainer_config.clone());

    let env = LanderEnv::build(&config.env_config, 0)?;
    let mut agent = A2c::build(config.agent_config);
    let mut buffer = ReplayBuffer::build(&replay_buffer_config)?;
    let mut evaluator = Evaluator::new(&config.env_config, 1, N_EPISODES_PER_EVAL)?;

    trainer.train(env, &mut agent, &mut buffer, &mut recorder, &mut evaluator)?;

    Ok(())
}

fn eval(model_dir: &str) -> Result<()> {
    let env_config = create_env_config();
    let mut agent = {
        let mut agent: A2c<LanderEnv, Mlp, Mlp> = A2c::build(create_agent_config());
        Agent::<_, ReplayBuffer>::load_params(&mut agent, Path::new(model_dir))?;
        Agent::<_, ReplayBuffer>::eval(&mut agent);
        agent
    };

    let mut evaluator = Evaluator::new(&env_config, 0, N_EPISODES_PER_EVAL)?;
    let score = evaluator.evaluate(&mut agent)?;
    println!("Mean score over {} episodes: {}", N_EPISODES_PER_EVAL, score);

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    let args = Args::parse();

    if args.train {
        train(&args, MODEL_DIR)?;
    } else if args.eval {
        eval(&(MODEL_DIR.to_owned() + "/best"))?;
    } else {
        train(&args, MODEL_DIR)?;
        eval(&(MODEL_DIR.to_owned() + "/best"))?;
    }

    Ok(())
}
