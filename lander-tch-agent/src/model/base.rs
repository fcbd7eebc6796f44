//! Definition of interfaces of neural networks.
use anyhow::Result;
use std::path::Path;
use tch::{nn, nn::VarStore, Tensor};

/// Base interface of trainable models.
pub trait ModelBase {
    /// Trains the network given a loss.
    fn backward_step(&mut self, loss: &Tensor);

    /// Returns `var_store` as mutable reference.
    fn get_var_store_mut(&mut self) -> &mut nn::VarStore;

    /// Returns `var_store`.
    fn get_var_store(&self) -> &nn::VarStore;

    /// Save parameters of the neural network.
    fn save<T: AsRef<Path>>(&self, path: T) -> Result<()>;

    /// Load parameters of the neural network.
    fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()>;
}

/// Neural network module that can be initialized with a [`VarStore`] and a
/// configuration.
///
/// Modules consisting a network share a [`VarStore`], hence structs
/// implementing this trait are built against a given [`VarStore`]. The trait
/// also provides cloning into another [`VarStore`], which is how target
/// networks are created.
pub trait SubModel {
    /// Configuration from which [`SubModel`] is constructed.
    type Config;

    /// Input of the [`SubModel`].
    type Input;

    /// Output of the [`SubModel`].
    type Output;

    /// Builds [`SubModel`] with [`VarStore`] and [`SubModel::Config`].
    fn build(var_store: &VarStore, config: Self::Config) -> Self;

    /// Clones [`SubModel`] with [`VarStore`].
    fn clone_with_var_store(&self, var_store: &VarStore) -> Self;

    /// A generalized forward function.
    ///
    /// `train` selects between training and evaluation behavior of layers
    /// like batch normalization.
    fn forward(&self, input: &Self::Input, train: bool) -> Self::Output;
}
