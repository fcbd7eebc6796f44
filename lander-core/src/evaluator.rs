//! Evaluate a [`Policy`].
use crate::{Env, Policy};
use anyhow::Result;
mod default_evaluator;
pub use default_evaluator::DefaultEvaluator;

/// Evaluate a [`Policy`].
pub trait Evaluator<E: Env, P: Policy<E>> {
    /// Runs evaluation episodes and returns a score.
    ///
    /// The caller of this method needs to handle the internal state of the
    /// policy, like training/evaluation mode.
    fn evaluate(&mut self, policy: &mut P) -> Result<f32>;
}
