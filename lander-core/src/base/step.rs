//! Environment step.
use super::Env;

/// Additional information passed from an environment to an agent.
pub trait Info {}

impl Info for () {}

/// The result of a single environment step.
///
/// Contains the action applied, the observation after the transition, the
/// immediate reward, and the termination flags.
pub struct Step<E: Env> {
    /// Action applied at this step.
    pub act: E::Act,

    /// Observation after the state transition.
    pub obs: E::Obs,

    /// Immediate reward.
    pub reward: f32,

    /// The episode ended in a terminal state (crash or successful landing).
    pub is_terminated: bool,

    /// The episode was cut off by a step limit.
    pub is_truncated: bool,

    /// Additional information from the environment.
    pub info: E::Info,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`].
    pub fn new(
        obs: E::Obs,
        act: E::Act,
        reward: f32,
        is_terminated: bool,
        is_truncated: bool,
        info: E::Info,
    ) -> Self {
        Step {
            act,
            obs,
            reward,
            is_terminated,
            is_truncated,
            info,
        }
    }

    /// Returns `true` if the episode ends with this step.
    pub fn is_done(&self) -> bool {
        self.is_terminated || self.is_truncated
    }
}
