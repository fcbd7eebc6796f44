//! A replay buffer with priority-weighted sampling.
use super::PriorityReplayBufferConfig;
use crate::{
    base::{ExperienceBufferBase, ReplayBufferBase},
    error::LanderError,
};
use anyhow::Result;
use rand::{
    distributions::{Distribution, WeightedIndex},
    rngs::StdRng,
    SeedableRng,
};

/// A transition with a precomputed bootstrapped target value.
///
/// The target value is computed by the training loop at push time, so the
/// buffer does not need to keep next observations.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<O, A> {
    /// Observation at which the action was taken.
    pub obs: O,

    /// Action taken.
    pub act: A,

    /// Discounted target value of the state-action pair.
    pub target_value: f32,
}

impl<O, A> Transition<O, A> {
    /// Constructs a [`Transition`].
    pub fn new(obs: O, act: A, target_value: f32) -> Self {
        Self {
            obs,
            act,
            target_value,
        }
    }
}

/// A batch of transitions sampled from a [`PriorityReplayBuffer`].
///
/// `ixs` keeps the slot indices of the sampled transitions so that the agent
/// can push updated priorities back into the buffer.
pub struct TransitionBatch<O, A> {
    /// Observations.
    pub obs: Vec<O>,

    /// Actions.
    pub act: Vec<A>,

    /// Discounted target values.
    pub target_values: Vec<f32>,

    /// Slot indices of the sampled transitions.
    pub ixs: Vec<usize>,
}

/// A bounded FIFO replay buffer with priority-weighted sampling.
///
/// Transitions are kept in insertion order; when the buffer is full, the
/// oldest transition is dropped. Priorities are kept in a fixed-size array
/// of `capacity` slots, initialized to zero. A new transition receives the
/// mean of the whole priority array, or 1.0 when the buffer is empty.
///
/// Sampling draws `batch_size` indices with replacement, with probabilities
/// proportional to `(priority - min + 1e-8)^alpha` over occupied slots.
pub struct PriorityReplayBuffer<O, A> {
    capacity: usize,
    batch_size: usize,
    alpha: f32,
    realign_on_evict: bool,
    transitions: Vec<Transition<O, A>>,
    priorities: Vec<f32>,
    rng: StdRng,
}

impl<O, A> PriorityReplayBuffer<O, A>
where
    O: Clone,
    A: Clone,
{
    /// Normalized sampling probabilities over the occupied slots.
    ///
    /// Priorities can be negative, hence the shift by the minimum before the
    /// exponent is applied.
    pub fn sampling_probs(&self) -> Vec<f32> {
        let n = self.transitions.len();
        let min = self.priorities[..n]
            .iter()
            .fold(f32::MAX, |m, p| p.min(m));
        let mut probs: Vec<f32> = self.priorities[..n]
            .iter()
            .map(|p| (p - min + 1e-8).powf(self.alpha))
            .collect();
        let sum: f32 = probs.iter().sum();
        probs.iter_mut().for_each(|p| *p /= sum);
        probs
    }

    /// The priority of the transition in slot `ix`.
    pub fn priority(&self, ix: usize) -> f32 {
        self.priorities[ix]
    }

    /// The transition in slot `ix`.
    pub fn get(&self, ix: usize) -> &Transition<O, A> {
        &self.transitions[ix]
    }

    /// The capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<O, A> ExperienceBufferBase for PriorityReplayBuffer<O, A>
where
    O: Clone,
    A: Clone,
{
    type Item = Transition<O, A>;

    fn push(&mut self, tr: Self::Item) -> Result<()> {
        if self.transitions.len() == self.capacity {
            self.transitions.remove(0);
            if self.realign_on_evict {
                self.priorities.remove(0);
                self.priorities.push(0.0);
            }
        }

        // The mean runs over the whole fixed-size array, unoccupied slots
        // included.
        let priority = if self.transitions.is_empty() {
            1.0
        } else {
            self.priorities.iter().sum::<f32>() / self.capacity as f32
        };

        self.transitions.push(tr);
        self.priorities[self.transitions.len() - 1] = priority;

        Ok(())
    }

    fn len(&self) -> usize {
        self.transitions.len()
    }
}

impl<O, A> ReplayBufferBase for PriorityReplayBuffer<O, A>
where
    O: Clone,
    A: Clone,
{
    type Config = PriorityReplayBufferConfig;
    type Batch = TransitionBatch<O, A>;

    fn build(config: &Self::Config) -> Result<Self> {
        if config.capacity == 0 {
            return Err(LanderError::InvalidConfig("capacity must be positive".into()).into());
        }
        if config.batch_size == 0 || config.batch_size > config.capacity {
            return Err(LanderError::InvalidConfig(format!(
                "batch_size ({}) must be in 1..=capacity ({})",
                config.batch_size, config.capacity
            ))
            .into());
        }

        Ok(Self {
            capacity: config.capacity,
            batch_size: config.batch_size,
            alpha: config.alpha,
            realign_on_evict: config.realign_on_evict,
            transitions: Vec::with_capacity(config.capacity),
            priorities: vec![0.0; config.capacity],
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn batch(&mut self) -> Result<Self::Batch> {
        if self.transitions.is_empty() {
            return Err(LanderError::EmptyReplayBuffer.into());
        }

        let probs = self.sampling_probs();
        let dist = WeightedIndex::new(&probs)?;
        let ixs: Vec<usize> = (0..self.batch_size)
            .map(|_| dist.sample(&mut self.rng))
            .collect();

        let obs = ixs.iter().map(|&ix| self.transitions[ix].obs.clone()).collect();
        let act = ixs.iter().map(|&ix| self.transitions[ix].act.clone()).collect();
        let target_values = ixs
            .iter()
            .map(|&ix| self.transitions[ix].target_value)
            .collect();

        Ok(TransitionBatch {
            obs,
            act,
            target_values,
            ixs,
        })
    }

    fn update_priority(&mut self, ixs: &[usize], priorities: &[f32]) {
        debug_assert_eq!(ixs.len(), priorities.len());
        for (&ix, &p) in ixs.iter().zip(priorities.iter()) {
            self.priorities[ix] = p;
        }
    }
}
