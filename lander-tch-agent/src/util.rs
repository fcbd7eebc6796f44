//! Utilities.
use tch::Tensor;

/// Interface for handling output dimensions of network configurations.
pub trait OutDim {
    /// Returns the output dimension.
    fn get_out_dim(&self) -> i64;

    /// Sets the output dimension.
    fn set_out_dim(&mut self, v: i64);
}

/// Stacks observations into a single batched tensor.
pub fn stack_obs<O>(obs: &[O]) -> Tensor
where
    O: Clone + Into<Tensor>,
{
    let rows: Vec<Tensor> = obs.iter().map(|o| o.clone().into()).collect();
    Tensor::stack(&rows, 0)
}
