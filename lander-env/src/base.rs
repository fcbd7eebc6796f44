//! A simulated lunar lander with discrete engine controls.
use crate::LanderEnvConfig;
use anyhow::Result;
use lander_core::{record::Record, Act, Env, Obs, Step};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Dimension of the observation vector.
pub const OBS_DIM: usize = 8;

/// The number of discrete actions.
pub const N_ACTS: usize = 4;

const DT: f32 = 1.0 / 30.0;
const GRAVITY: f32 = -0.55;
const MAIN_ENGINE_ACCEL: f32 = 1.2;
const SIDE_ENGINE_ACCEL: f32 = 0.12;
const SIDE_ENGINE_TORQUE: f32 = 0.9;
const MAIN_ENGINE_COST: f32 = 0.3;
const SIDE_ENGINE_COST: f32 = 0.03;
const LEG_CONTACT_HEIGHT: f32 = 0.05;
const SAFE_LANDING_SPEED: f32 = 0.5;
const SAFE_LANDING_ANGLE: f32 = 0.35;
const X_BOUND: f32 = 1.5;
const START_HEIGHT: f32 = 1.4;

/// Observation of [`LanderEnv`].
///
/// The eight components are the position relative to the landing pad, the
/// velocity, the hull angle and angular velocity, and the two leg contact
/// flags encoded as 0.0/1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct LanderObs(pub Vec<f32>);

impl Obs for LanderObs {
    fn dim(&self) -> usize {
        self.0.len()
    }
}

#[cfg(feature = "tch")]
impl From<LanderObs> for tch::Tensor {
    fn from(obs: LanderObs) -> tch::Tensor {
        tch::Tensor::from_slice(&obs.0[..])
    }
}

/// Action of [`LanderEnv`].
///
/// `0` is a no-op, `1` fires the left orientation engine, `2` the main
/// engine and `3` the right orientation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanderAct(pub i64);

impl Act for LanderAct {}

impl From<i64> for LanderAct {
    fn from(v: i64) -> Self {
        Self(v)
    }
}

impl From<LanderAct> for i64 {
    fn from(a: LanderAct) -> i64 {
        a.0
    }
}

/// A simulated lunar lander.
///
/// The lander starts above the landing pad with a seeded random initial
/// velocity and must touch down gently at the origin. Each step applies
/// engine thrust and gravity with a fixed-step Euler integration.
///
/// The reward follows the usual potential-based shaping: approaching the
/// pad, slowing down, staying upright and making leg contact all pay off,
/// firing engines costs fuel, and the episode ends with +100 for a gentle
/// touchdown or -100 for a crash or for drifting out of bounds. Episodes
/// are truncated after `max_episode_steps` steps.
pub struct LanderEnv {
    config: LanderEnvConfig,
    seed: u64,
    rng: StdRng,

    // State of the simulation
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    theta: f32,
    omega: f32,
    steps: usize,
    prev_shaping: f32,
}

impl LanderEnv {
    fn contacts(&self) -> (bool, bool) {
        let contact = self.y <= LEG_CONTACT_HEIGHT && self.theta.abs() < SAFE_LANDING_ANGLE;
        (contact, contact)
    }

    fn shaping(&self) -> f32 {
        let (leg1, leg2) = self.contacts();
        -100.0 * (self.x.powi(2) + self.y.powi(2)).sqrt()
            - 100.0 * (self.vx.powi(2) + self.vy.powi(2)).sqrt()
            - 100.0 * self.theta.abs()
            + 10.0 * leg1 as u8 as f32
            + 10.0 * leg2 as u8 as f32
    }

    fn observe(&self) -> LanderObs {
        let (leg1, leg2) = self.contacts();
        LanderObs(vec![
            self.x,
            self.y,
            self.vx,
            self.vy,
            self.theta,
            self.omega,
            leg1 as u8 as f32,
            leg2 as u8 as f32,
        ])
    }

    fn initial_state(rng: &mut StdRng) -> (f32, f32, f32, f32) {
        (
            rng.gen_range(-0.1..0.1),
            rng.gen_range(-0.2..0.2),
            rng.gen_range(-0.2..0.0),
            rng.gen_range(-0.1..0.1),
        )
    }

    fn apply_reset(&mut self, state: (f32, f32, f32, f32)) -> LanderObs {
        let (x, vx, vy, theta) = state;
        self.x = x;
        self.y = START_HEIGHT;
        self.vx = vx;
        self.vy = vy;
        self.theta = theta;
        self.omega = 0.0;
        self.steps = 0;
        self.prev_shaping = self.shaping();
        self.observe()
    }
}

impl Env for LanderEnv {
    type Config = LanderEnvConfig;
    type Obs = LanderObs;
    type Act = LanderAct;
    type Info = ();

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let mut env = Self {
            config: config.clone(),
            seed: seed as u64,
            rng: StdRng::seed_from_u64(seed as u64),
            x: 0.0,
            y: START_HEIGHT,
            vx: 0.0,
            vy: 0.0,
            theta: 0.0,
            omega: 0.0,
            steps: 0,
            prev_shaping: 0.0,
        };
        env.reset()?;
        Ok(env)
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        let state = Self::initial_state(&mut self.rng);
        Ok(self.apply_reset(state))
    }

    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        // A deterministic initial state per evaluation episode.
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(ix as u64));
        let state = Self::initial_state(&mut rng);
        Ok(self.apply_reset(state))
    }

    fn step(&mut self, a: &Self::Act) -> (Step<Self>, Record) {
        let mut ax = 0.0;
        let mut ay = GRAVITY;
        let mut torque = 0.0;
        let fuel_cost = match a.0 {
            0 => 0.0,
            1 => {
                ax += SIDE_ENGINE_ACCEL;
                torque += SIDE_ENGINE_TORQUE;
                SIDE_ENGINE_COST
            }
            2 => {
                ax += -self.theta.sin() * MAIN_ENGINE_ACCEL;
                ay += self.theta.cos() * MAIN_ENGINE_ACCEL;
                MAIN_ENGINE_COST
            }
            3 => {
                ax -= SIDE_ENGINE_ACCEL;
                torque -= SIDE_ENGINE_TORQUE;
                SIDE_ENGINE_COST
            }
            _ => panic!("Invalid action: {}", a.0),
        };

        self.vx += ax * DT;
        self.vy += ay * DT;
        self.x += self.vx * DT;
        self.y += self.vy * DT;
        self.omega += torque * DT;
        self.theta += self.omega * DT;
        self.steps += 1;

        let mut is_terminated = false;
        let mut terminal_reward = 0.0;

        if self.y <= 0.0 {
            self.y = 0.0;
            is_terminated = true;
            let gentle = self.vy.abs() <= SAFE_LANDING_SPEED
                && self.vx.abs() <= SAFE_LANDING_SPEED
                && self.theta.abs() <= SAFE_LANDING_ANGLE;
            terminal_reward = if gentle { 100.0 } else { -100.0 };
        } else if self.x.abs() > X_BOUND {
            is_terminated = true;
            terminal_reward = -100.0;
        }

        let shaping = self.shaping();
        let reward = shaping - self.prev_shaping - fuel_cost + terminal_reward;
        self.prev_shaping = shaping;

        let is_truncated = !is_terminated && self.steps >= self.config.max_episode_steps;

        let step = Step::new(
            self.observe(),
            *a,
            reward,
            is_terminated,
            is_truncated,
            (),
        );

        (step, Record::empty())
    }

    fn sample_act(&mut self) -> Self::Act {
        LanderAct(self.rng.gen_range(0..N_ACTS as i64))
    }

    fn n_acts(&self) -> usize {
        N_ACTS
    }

    fn obs_dim(&self) -> usize {
        OBS_DIM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(seed: i64) -> LanderEnv {
        LanderEnv::build(&LanderEnvConfig::default(), seed).unwrap()
    }

    #[test]
    fn test_obs_and_act_spaces() {
        let mut env = env(0);
        let obs = env.reset().unwrap();
        assert_eq!(obs.dim(), OBS_DIM);
        assert_eq!(env.obs_dim(), OBS_DIM);
        assert_eq!(env.n_acts(), N_ACTS);
        for _ in 0..100 {
            let a = env.sample_act();
            assert!((0..N_ACTS as i64).contains(&a.0));
        }
    }

    #[test]
    fn test_seed_determinism() {
        let mut env1 = env(7);
        let mut env2 = env(7);
        let obs1 = env1.reset().unwrap();
        let obs2 = env2.reset().unwrap();
        assert_eq!(obs1, obs2);

        for i in 0..50 {
            let a = LanderAct(i % N_ACTS as i64);
            let (s1, _) = env1.step(&a);
            let (s2, _) = env2.step(&a);
            assert_eq!(s1.obs, s2.obs);
            assert_eq!(s1.reward, s2.reward);
            if s1.is_done() {
                break;
            }
        }

        let mut env3 = env(8);
        let obs3 = env3.reset().unwrap();
        assert_ne!(obs1, obs3);
    }

    #[test]
    fn test_reset_with_index_determinism() {
        let mut env1 = env(7);
        let obs_a = env1.reset_with_index(3).unwrap();
        let obs_b = env1.reset_with_index(3).unwrap();
        let obs_c = env1.reset_with_index(4).unwrap();
        assert_eq!(obs_a, obs_b);
        assert_ne!(obs_a, obs_c);
    }

    #[test]
    fn test_free_fall_terminates() {
        let mut env = env(0);
        env.reset().unwrap();
        let mut terminated = false;
        for _ in 0..1000 {
            let (step, _) = env.step(&LanderAct(0));
            if step.is_done() {
                terminated = step.is_terminated;
                // An uncontrolled fall ends on the ground.
                assert!(step.obs.0[1] <= LEG_CONTACT_HEIGHT);
                break;
            }
        }
        assert!(terminated);
    }

    #[test]
    fn test_truncation_under_thrust() {
        let config = LanderEnvConfig::default().max_episode_steps(5);
        let mut env = LanderEnv::build(&config, 0).unwrap();
        env.reset().unwrap();
        // The main engine out-accelerates gravity, so the lander stays up.
        for i in 0..5 {
            let (step, _) = env.step(&LanderAct(2));
            if i < 4 {
                assert!(!step.is_done());
            } else {
                assert!(step.is_truncated);
                assert!(!step.is_terminated);
            }
        }
    }
}
