use anyhow::Result;
use lander_core::{
    replay_buffer::{PriorityReplayBuffer, PriorityReplayBufferConfig},
    Env, ExperienceBufferBase, Policy, ReplayBufferBase, Trainer, TrainerConfig,
};
use lander_env::{LanderAct, LanderEnv, LanderEnvConfig, LanderObs, N_ACTS, OBS_DIM};
use lander_tch_agent::{A2c, A2cConfig, A2cModelConfig, Mlp, MlpConfig, OptimizerConfig};

const MAX_STEPS: usize = 30;
const BATCH_SIZE: usize = 8;

fn agent_config() -> A2cConfig<Mlp, Mlp> {
    A2cConfig::default()
        .actor_model_config(
            A2cModelConfig::default()
                .net_config(MlpConfig::new(OBS_DIM as i64, vec![16], N_ACTS as i64, true))
                .opt_config(OptimizerConfig::Adam { lr: 1e-3 }),
        )
        .critic_model_config(
            A2cModelConfig::default()
                .net_config(MlpConfig::new(OBS_DIM as i64, vec![16], 1, false))
                .opt_config(OptimizerConfig::Adam { lr: 1e-3 }),
        )
        .epsilon(0.9)
        .epsilon_min(0.1)
        .epsilon_decay(0.99)
        .train(true)
        .device(tch::Device::Cpu)
}

/// Runs a few training episodes of the agent in the lander environment.
#[test]
fn test_training_episodes_on_lander() -> Result<()> {
    tch::manual_seed(3);
    fastrand::seed(9);
    let mut env = LanderEnv::build(&LanderEnvConfig::default(), 0)?;
    let mut agent: A2c<LanderEnv, Mlp, Mlp> = A2c::build(agent_config());
    let mut buffer = PriorityReplayBuffer::<LanderObs, LanderAct>::build(
        &PriorityReplayBufferConfig::default()
            .capacity(256)
            .batch_size(BATCH_SIZE)
            .seed(1),
    )?;
    let mut trainer = Trainer::build(TrainerConfig::default().max_steps(MAX_STEPS).gamma(0.8));

    for episode in 0..3 {
        let record = trainer.train_episode(&mut env, &mut agent, &mut buffer, episode)?;
        assert!(record.get_scalar("score")?.is_finite());
        assert!(record.get_scalar("steps")? <= MAX_STEPS as f32);
    }

    // The first episode already fills the buffer beyond one batch, so later
    // episodes perform optimization steps and decay the exploration rate.
    assert!(buffer.len() > BATCH_SIZE);
    let record = trainer.train_episode(&mut env, &mut agent, &mut buffer, 3)?;
    assert!(record.get_scalar("loss_actor")?.is_finite());
    assert!(record.get_scalar("loss_critic")?.is_finite());
    assert!(record.get_scalar("eps")? < 0.9);
    Ok(())
}
