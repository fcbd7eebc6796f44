//! Network wrapper owning its variable store and optimizer.
use crate::{
    model::{ModelBase, SubModel},
    opt::{Optimizer, OptimizerConfig},
    util::OutDim,
};
use anyhow::Result;
use log::{info, trace};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{marker::PhantomData, path::Path};
use tch::{nn, Device, Tensor};

/// Configuration of [`A2cModel`].
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct A2cModelConfig<C>
where
    C: DeserializeOwned + Serialize + OutDim + Clone,
{
    /// Configuration of the wrapped network.
    pub net_config: Option<C>,

    /// Configuration of the optimizer.
    pub opt_config: OptimizerConfig,
}

impl<C> Clone for A2cModelConfig<C>
where
    C: DeserializeOwned + Serialize + OutDim + Clone,
{
    fn clone(&self) -> Self {
        Self {
            net_config: self.net_config.clone(),
            opt_config: self.opt_config.clone(),
        }
    }
}

impl<C> Default for A2cModelConfig<C>
where
    C: DeserializeOwned + Serialize + OutDim + Clone,
{
    fn default() -> Self {
        Self {
            net_config: None,
            opt_config: OptimizerConfig::Adam { lr: 1e-4 },
        }
    }
}

impl<C> A2cModelConfig<C>
where
    C: DeserializeOwned + Serialize + OutDim + Clone,
{
    /// Sets the configuration of the wrapped network.
    pub fn net_config(mut self, net_config: C) -> Self {
        self.net_config = Some(net_config);
        self
    }

    /// Sets the configuration of the optimizer.
    pub fn opt_config(mut self, opt_config: OptimizerConfig) -> Self {
        self.opt_config = opt_config;
        self
    }

    /// Sets the output dimension of the wrapped network.
    pub fn out_dim(mut self, out_dim: i64) -> Self {
        if let Some(net_config) = self.net_config.as_mut() {
            net_config.set_out_dim(out_dim);
        }
        self
    }
}

/// A network together with its variable store and optimizer.
///
/// Cloning an [`A2cModel`] creates an independent copy of the network with
/// its own variable store initialized from the source; this is how target
/// networks are created.
pub struct A2cModel<M>
where
    M: SubModel<Input = Tensor, Output = Tensor>,
    M::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    device: Device,
    var_store: nn::VarStore,

    // Dimension of the output vector.
    pub(super) out_dim: i64,

    // The wrapped network.
    net: M,

    // Optimizer
    opt_config: OptimizerConfig,
    opt: Optimizer,

    phantom: PhantomData<M>,
}

impl<M> A2cModel<M>
where
    M: SubModel<Input = Tensor, Output = Tensor>,
    M::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    /// Builds the model on the given device.
    pub fn build(config: A2cModelConfig<M::Config>, device: Device) -> Self {
        let net_config = config.net_config.expect("No network config given");
        let out_dim = net_config.get_out_dim();
        let opt_config = config.opt_config;
        let var_store = nn::VarStore::new(device);
        let net = M::build(&var_store, net_config);

        Self::_build(device, out_dim, opt_config, net, var_store, None)
    }

    fn _build(
        device: Device,
        out_dim: i64,
        opt_config: OptimizerConfig,
        net: M,
        mut var_store: nn::VarStore,
        var_store_src: Option<&nn::VarStore>,
    ) -> Self {
        let opt = opt_config.build(&var_store).unwrap();

        if let Some(var_store_src) = var_store_src {
            var_store.copy(var_store_src).unwrap();
        }

        Self {
            device,
            out_dim,
            opt_config,
            var_store,
            opt,
            net,
            phantom: PhantomData,
        }
    }

    /// Outputs of the wrapped network given a batch of observations.
    pub fn forward(&self, x: &Tensor, train: bool) -> Tensor {
        self.net.forward(x, train)
    }

    /// Copies the parameters of `src` into this model.
    pub fn sync_from(&mut self, src: &Self) -> Result<()> {
        self.var_store.copy(&src.var_store)?;
        Ok(())
    }

    /// Disables gradient tracking for all variables of this model.
    pub fn freeze(&mut self) {
        self.var_store.freeze();
    }

    /// The device the model lives on.
    pub fn device(&self) -> Device {
        self.device
    }
}

impl<M> Clone for A2cModel<M>
where
    M: SubModel<Input = Tensor, Output = Tensor>,
    M::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    fn clone(&self) -> Self {
        let device = self.device;
        let out_dim = self.out_dim;
        let opt_config = self.opt_config.clone();
        let var_store = nn::VarStore::new(device);
        let net = self.net.clone_with_var_store(&var_store);

        Self::_build(
            device,
            out_dim,
            opt_config,
            net,
            var_store,
            Some(&self.var_store),
        )
    }
}

impl<M> ModelBase for A2cModel<M>
where
    M: SubModel<Input = Tensor, Output = Tensor>,
    M::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    fn backward_step(&mut self, loss: &Tensor) {
        self.opt.backward_step(loss);
    }

    fn get_var_store_mut(&mut self) -> &mut nn::VarStore {
        &mut self.var_store
    }

    fn get_var_store(&self) -> &nn::VarStore {
        &self.var_store
    }

    fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.var_store.save(&path)?;
        info!("Save model to {:?}", path.as_ref());
        let vs = self.var_store.variables();
        for (name, _) in vs.iter() {
            trace!("Save variable {}", name);
        }
        Ok(())
    }

    fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.var_store.load(&path)?;
        info!("Load model from {:?}", path.as_ref());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mlp::{Mlp, MlpConfig};

    fn model() -> A2cModel<Mlp> {
        let config = A2cModelConfig::default()
            .net_config(MlpConfig::new(4, vec![8], 2, true))
            .opt_config(OptimizerConfig::Adam { lr: 0.1 });
        A2cModel::build(config, Device::Cpu)
    }

    fn outputs(model: &A2cModel<Mlp>, x: &Tensor) -> Vec<f32> {
        tch::no_grad(|| Vec::<f32>::from(&model.forward(x, false).flatten(0, -1)))
    }

    #[test]
    fn test_clone_copies_parameters() {
        tch::manual_seed(42);
        let src = model();
        let dst = src.clone();

        let x = Tensor::rand(&[3, 4], tch::kind::FLOAT_CPU);
        assert_eq!(outputs(&src, &x), outputs(&dst, &x));
    }

    #[test]
    fn test_sync_after_update() {
        tch::manual_seed(42);
        let mut src = model();
        let mut tgt = src.clone();
        tgt.freeze();

        let x = Tensor::rand(&[4, 4], tch::kind::FLOAT_CPU);
        let before = outputs(&tgt, &x);

        // Train the source; the frozen copy must not move.
        let loss = src.forward(&x, true).square().mean(tch::Kind::Float);
        src.backward_step(&loss);
        assert_ne!(outputs(&src, &x), before);
        assert_eq!(outputs(&tgt, &x), before);

        // After synchronization both nets are bit-identical again.
        tgt.sync_from(&src).unwrap();
        assert_eq!(outputs(&tgt, &x), outputs(&src, &x));
    }
}
