//! Replay buffer interfaces.
use anyhow::Result;

/// A buffer accumulating experience.
pub trait ExperienceBufferBase {
    /// Item pushed into the buffer.
    type Item;

    /// Pushes a transition into the buffer.
    fn push(&mut self, tr: Self::Item) -> Result<()>;

    /// The number of transitions in the buffer.
    fn len(&self) -> usize;

    /// Whether the buffer holds no transition.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A replay buffer from which batches are sampled for optimization steps.
pub trait ReplayBufferBase: ExperienceBufferBase {
    /// Configuration of the buffer.
    type Config: Clone;

    /// Batch generated from the buffer.
    type Batch;

    /// Builds the buffer.
    ///
    /// Fails if the configuration is inconsistent, for example when the
    /// batch size exceeds the capacity.
    fn build(config: &Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Number of transitions per sampled batch.
    fn batch_size(&self) -> usize;

    /// Samples a batch of transitions.
    fn batch(&mut self) -> Result<Self::Batch>;

    /// Updates the priorities of the transitions at `ixs`.
    fn update_priority(&mut self, ixs: &[usize], priorities: &[f32]);
}
