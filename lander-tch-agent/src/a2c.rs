//! Actor-critic agent with a clipped surrogate objective.
mod base;
mod config;
mod model;

pub use base::A2c;
pub use config::A2cConfig;
pub use model::{A2cModel, A2cModelConfig};
