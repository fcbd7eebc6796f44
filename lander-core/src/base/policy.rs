//! Policy interface.
use super::Env;

/// A mapping from observations to actions.
///
/// The environment is passed into [`Policy::sample`] so that exploring
/// policies can draw random actions from the environment's action space
/// rather than from a private copy of its description.
pub trait Policy<E: Env> {
    /// Configuration of the policy.
    type Config: Clone;

    /// Builds the policy.
    fn build(config: Self::Config) -> Self
    where
        Self: Sized;

    /// Samples an action given an observation.
    fn sample(&mut self, obs: &E::Obs, env: &mut E) -> E::Act;
}
