//! Core traits of the library.
mod agent;
mod env;
mod policy;
mod replay_buffer;
mod step;
use std::fmt::Debug;

pub use agent::Agent;
pub use env::Env;
pub use policy::Policy;
pub use replay_buffer::{ExperienceBufferBase, ReplayBufferBase};
pub use step::{Info, Step};

/// An observation of an environment.
pub trait Obs: Clone + Debug {
    /// Dimension of the observation vector.
    fn dim(&self) -> usize;
}

/// An action of an environment.
pub trait Act: Clone + Debug {}
