#![warn(missing_docs)]
//! Actor-critic agent implemented with [tch](https://crates.io/crates/tch).
//!
//! The central type is [`A2c`], an implementation of
//! [`lander_core::Agent`] combining:
//!
//! * an actor network emitting action probabilities,
//! * a critic network estimating state values,
//! * a frozen target copy of the actor serving as the reference policy of
//!   a clipped surrogate objective,
//! * epsilon-greedy exploration whose rate doubles as the clip width.
//!
//! Networks are built from [`SubModel`] implementations such as [`Mlp`] and
//! wrapped in [`A2cModel`], which owns the variable store and the optimizer.
mod a2c;
mod device;
mod mlp;
mod model;
mod opt;
pub mod util;

pub use a2c::{A2c, A2cConfig, A2cModel, A2cModelConfig};
pub use device::Device;
pub use mlp::{Mlp, MlpConfig};
pub use model::{ModelBase, SubModel};
pub use opt::{Optimizer, OptimizerConfig};
