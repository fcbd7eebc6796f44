use crate::util::OutDim;
use serde::{Deserialize, Serialize};

/// Configuration of [`Mlp`](super::Mlp).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct MlpConfig {
    pub(super) in_dim: i64,
    pub(super) units: Vec<i64>,
    pub(super) out_dim: i64,
    pub(super) softmax_out: bool,
}

impl MlpConfig {
    /// Creates a configuration of an MLP.
    ///
    /// When `softmax_out` is `true`, the output layer is followed by a
    /// softmax over the last dimension, turning the output into a
    /// probability distribution.
    pub fn new(in_dim: i64, units: Vec<i64>, out_dim: i64, softmax_out: bool) -> Self {
        Self {
            in_dim,
            units,
            out_dim,
            softmax_out,
        }
    }
}

impl OutDim for MlpConfig {
    fn get_out_dim(&self) -> i64 {
        self.out_dim
    }

    fn set_out_dim(&mut self, out_dim: i64) {
        self.out_dim = out_dim;
    }
}
