//! Episode-based training loop.
mod config;

use crate::{
    record::{Record, RecordValue::Scalar, Recorder},
    replay_buffer::Transition,
    Agent, Env, Evaluator, ExperienceBufferBase, ReplayBufferBase,
};
use anyhow::Result;
pub use config::TrainerConfig;
use log::info;
use std::path::Path;

/// Manages the training loop and related objects.
///
/// One iteration of the loop runs a full episode:
///
/// 1. Reset the environment and interact with it for at most `max_steps`
///    environment steps, collecting the visited observations, the applied
///    actions and the immediate rewards.
/// 2. Estimate the value of each successor state with the agent's critic in
///    a single batched call, compute the discounted target value
///    `r + gamma * v(s')` (or just `r` at episode ends) and push one
///    [`Transition`] per step into the replay buffer.
/// 3. If the buffer holds more transitions than the batch size, perform an
///    optimization step on the agent.
/// 4. Every `sync_interval` episodes, copy the online network parameters
///    into the target network.
/// 5. Every `eval_interval` episodes, evaluate the agent greedily, record
///    the result as `"eval_score"` and keep the best model so far in
///    `(model_dir)/best`.
///
/// Per-episode metrics are stored in the given [`Recorder`] under the keys
/// `"episode"`, `"score"`, `"steps"` and `"buffer_len"`, merged with
/// whatever the agent reports from its optimization step.
pub struct Trainer {
    /// The number of training episodes.
    max_episodes: usize,

    /// The maximum number of environment steps per episode.
    max_steps: usize,

    /// Discount factor for bootstrapped target values.
    gamma: f64,

    /// Interval of target network synchronization in episodes.
    sync_interval: usize,

    /// Interval of evaluation in episodes.
    eval_interval: usize,

    /// Interval of flushing records in episodes.
    flush_record_interval: usize,

    /// Interval of saving the model in episodes.
    save_interval: usize,

    /// Where to save the trained model.
    model_dir: Option<String>,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Self {
        Self {
            max_episodes: config.max_episodes,
            max_steps: config.max_steps,
            gamma: config.gamma,
            sync_interval: config.sync_interval,
            eval_interval: config.eval_interval,
            flush_record_interval: config.flush_record_interval,
            save_interval: config.save_interval,
            model_dir: config.model_dir,
        }
    }

    fn save_model<E, A, R>(agent: &A, model_dir: String)
    where
        E: Env,
        A: Agent<E, R>,
        R: ReplayBufferBase,
    {
        match agent.save_params(Path::new(&model_dir)) {
            Ok(()) => info!("Saved the model in {:?}.", &model_dir),
            Err(_) => info!("Failed to save model in {:?}.", &model_dir),
        }
    }

    fn save_best_model<E, A, R>(agent: &A, model_dir: String)
    where
        E: Env,
        A: Agent<E, R>,
        R: ReplayBufferBase,
    {
        let model_dir = model_dir + "/best";
        Self::save_model(agent, model_dir);
    }

    fn save_model_with_episode<E, A, R>(agent: &A, model_dir: String, episode: usize)
    where
        E: Env,
        A: Agent<E, R>,
        R: ReplayBufferBase,
    {
        let model_dir = model_dir + format!("/{}", episode).as_str();
        Self::save_model(agent, model_dir);
    }

    /// Runs a single training episode.
    ///
    /// Interacts with the environment, pushes bootstrapped transitions into
    /// the buffer and, if the buffer is filled beyond one batch, performs an
    /// optimization step. Returns the per-episode metrics.
    pub fn train_episode<E, A, R>(
        &mut self,
        env: &mut E,
        agent: &mut A,
        buffer: &mut R,
        episode: usize,
    ) -> Result<Record>
    where
        E: Env,
        A: Agent<E, R>,
        R: ExperienceBufferBase<Item = Transition<E::Obs, E::Act>> + ReplayBufferBase,
    {
        let mut obs = env.reset()?;
        let mut obs_list = Vec::new();
        let mut act_list = Vec::new();
        let mut reward_list = Vec::new();
        let mut next_obs_list = Vec::new();
        let mut done_list = Vec::new();
        let mut score = 0f32;

        for _ in 0..self.max_steps {
            let act = agent.sample(&obs, env);
            let (step, _) = env.step(&act);
            let is_done = step.is_done();

            score += step.reward;
            obs_list.push(obs);
            act_list.push(act);
            reward_list.push(step.reward);
            next_obs_list.push(step.obs.clone());
            done_list.push(is_done);
            obs = step.obs;

            if is_done {
                break;
            }
        }

        let steps = reward_list.len();

        // One batched critic call over all successor states of the episode.
        let next_values = agent.state_values(&next_obs_list);

        for (t, (obs, act)) in obs_list.drain(..).zip(act_list.drain(..)).enumerate() {
            let target_value = if done_list[t] {
                reward_list[t]
            } else {
                reward_list[t] + self.gamma as f32 * next_values[t]
            };
            buffer.push(Transition::new(obs, act, target_value))?;
        }

        let mut record = Record::empty();
        if buffer.len() > buffer.batch_size() {
            let record_agent = agent.opt_with_record(episode, buffer);
            record.merge_inplace(record_agent);
        }

        record.insert("score", Scalar(score));
        record.insert("steps", Scalar(steps as f32));
        record.insert("buffer_len", Scalar(buffer.len() as f32));

        Ok(record)
    }

    /// Trains the agent.
    pub fn train<E, A, R, D>(
        &mut self,
        mut env: E,
        agent: &mut A,
        buffer: &mut R,
        recorder: &mut dyn Recorder,
        evaluator: &mut D,
    ) -> Result<()>
    where
        E: Env,
        A: Agent<E, R>,
        R: ExperienceBufferBase<Item = Transition<E::Obs, E::Act>> + ReplayBufferBase,
        D: Evaluator<E, A>,
    {
        let mut max_eval_score = f32::MIN;
        agent.train();

        for episode in 0..self.max_episodes {
            let mut record = self.train_episode(&mut env, agent, buffer, episode)?;
            record.insert("episode", Scalar(episode as f32));

            if episode % self.sync_interval == 0 {
                agent.sync_target();
            }

            if (episode + 1) % self.eval_interval == 0 {
                info!("Starts evaluation of the trained model");
                agent.eval();
                let eval_score = evaluator.evaluate(agent)?;
                agent.train();
                record.insert("eval_score", Scalar(eval_score));

                // Keep the best model up to the current episode
                if eval_score > max_eval_score {
                    max_eval_score = eval_score;
                    if let Some(model_dir) = self.model_dir.as_ref() {
                        Self::save_best_model(agent, model_dir.clone())
                    }
                }
            }

            if (episode + 1) % self.save_interval == 0 {
                if let Some(model_dir) = self.model_dir.as_ref() {
                    Self::save_model_with_episode(agent, model_dir.clone(), episode + 1);
                }
            }

            recorder.store(record);

            if (episode + 1) % self.flush_record_interval == 0 {
                recorder.flush(episode as i64 + 1);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        record::BufferedRecorder,
        replay_buffer::{PriorityReplayBuffer, PriorityReplayBufferConfig},
        Act, DefaultEvaluator, Obs, Policy, Step,
    };
    use anyhow::Result;

    #[derive(Debug, Clone)]
    struct CountObs(Vec<f32>);

    impl Obs for CountObs {
        fn dim(&self) -> usize {
            self.0.len()
        }
    }

    #[derive(Debug, Clone, Copy)]
    struct CountAct(i64);

    impl Act for CountAct {}

    /// Deterministic environment terminating after four steps.
    struct CountEnv {
        steps: usize,
    }

    impl Env for CountEnv {
        type Config = ();
        type Obs = CountObs;
        type Act = CountAct;
        type Info = ();

        fn build(_config: &Self::Config, _seed: i64) -> Result<Self> {
            Ok(Self { steps: 0 })
        }

        fn reset(&mut self) -> Result<Self::Obs> {
            self.steps = 0;
            Ok(CountObs(vec![0.0]))
        }

        fn reset_with_index(&mut self, _ix: usize) -> Result<Self::Obs> {
            self.reset()
        }

        fn step(&mut self, a: &Self::Act) -> (Step<Self>, Record) {
            self.steps += 1;
            let step = Step::new(
                CountObs(vec![self.steps as f32]),
                *a,
                1.0,
                self.steps >= 4,
                false,
                (),
            );
            (step, Record::empty())
        }

        fn sample_act(&mut self) -> Self::Act {
            CountAct(0)
        }

        fn n_acts(&self) -> usize {
            2
        }

        fn obs_dim(&self) -> usize {
            1
        }
    }

    type CountBuffer = PriorityReplayBuffer<CountObs, CountAct>;

    struct CountAgent {
        train: bool,
        n_opts: usize,
        n_syncs: usize,
    }

    impl Policy<CountEnv> for CountAgent {
        type Config = ();

        fn build(_config: Self::Config) -> Self {
            Self {
                train: false,
                n_opts: 0,
                n_syncs: 0,
            }
        }

        fn sample(&mut self, _obs: &CountObs, _env: &mut CountEnv) -> CountAct {
            CountAct(1)
        }
    }

    impl Agent<CountEnv, CountBuffer> for CountAgent {
        fn train(&mut self) {
            self.train = true;
        }

        fn eval(&mut self) {
            self.train = false;
        }

        fn is_train(&self) -> bool {
            self.train
        }

        fn opt_with_record(&mut self, _episode: usize, _buffer: &mut CountBuffer) -> Record {
            self.n_opts += 1;
            Record::from_scalar("loss", 0.5)
        }

        fn state_values(&mut self, obs: &[CountObs]) -> Vec<f32> {
            vec![0.0; obs.len()]
        }

        fn sync_target(&mut self) {
            self.n_syncs += 1;
        }

        fn save_params(&self, _path: &Path) -> Result<()> {
            Ok(())
        }

        fn load_params(&mut self, _path: &Path) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_train_stores_per_episode_records() -> Result<()> {
        let env = CountEnv::build(&(), 0)?;
        let mut agent = CountAgent::build(());
        let mut buffer = CountBuffer::build(
            &PriorityReplayBufferConfig::default().capacity(16).batch_size(6),
        )?;
        let mut recorder = BufferedRecorder::new();
        let mut evaluator = DefaultEvaluator::<CountEnv>::new(&(), 0, 1)?;
        let mut trainer = Trainer::build(TrainerConfig::default().max_episodes(3).max_steps(10));

        trainer.train(env, &mut agent, &mut buffer, &mut recorder, &mut evaluator)?;

        assert_eq!(recorder.len(), 3);
        for (episode, record) in recorder.iter().enumerate() {
            assert_eq!(record.get_scalar("episode")?, episode as f32);
            assert_eq!(record.get_scalar("score")?, 4.0);
            assert_eq!(record.get_scalar("steps")?, 4.0);
        }

        // Four transitions per episode; only episodes 1 and 2 see the buffer
        // filled beyond one batch of six.
        assert_eq!(agent.n_opts, 2);
        let with_loss = recorder
            .iter()
            .filter(|r| r.get_scalar("loss").is_ok())
            .count();
        assert_eq!(with_loss, 2);

        // The target network is synchronized at episode 0.
        assert_eq!(agent.n_syncs, 1);
        Ok(())
    }
}
