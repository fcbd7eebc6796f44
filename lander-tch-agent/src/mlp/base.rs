use super::MlpConfig;
use crate::model::SubModel;
use tch::{nn, nn::ModuleT, Device, Kind, Tensor};

/// Multilayer perceptron with batch normalization and leaky ReLU activation.
///
/// Each hidden layer is a linear map followed by 1-d batch normalization and
/// a leaky ReLU. The output layer is linear, optionally followed by a
/// softmax.
pub struct Mlp {
    config: MlpConfig,
    device: Device,
    seq: nn::SequentialT,
}

impl Mlp {
    fn create_net(var_store: &nn::VarStore, config: &MlpConfig) -> nn::SequentialT {
        let p = &(var_store.root() / "mlp");
        let mut seq = nn::seq_t();
        let mut in_dim = config.in_dim;

        for (i, &out_dim) in config.units.iter().enumerate() {
            seq = seq.add(nn::linear(
                p / format!("{}{}", "ln", i),
                in_dim,
                out_dim,
                Default::default(),
            ));
            seq = seq.add(nn::batch_norm1d(
                p / format!("{}{}", "bn", i),
                out_dim,
                Default::default(),
            ));
            seq = seq.add_fn(|x| x.leaky_relu());
            in_dim = out_dim;
        }

        seq = seq.add(nn::linear(
            p / format!("{}{}", "ln", config.units.len()),
            in_dim,
            config.out_dim,
            Default::default(),
        ));

        if config.softmax_out {
            seq = seq.add_fn(|x| x.softmax(-1, Kind::Float));
        }

        seq
    }
}

impl SubModel for Mlp {
    type Config = MlpConfig;
    type Input = Tensor;
    type Output = Tensor;

    fn forward(&self, x: &Self::Input, train: bool) -> Tensor {
        self.seq.forward_t(&x.to(self.device), train)
    }

    fn build(var_store: &nn::VarStore, config: Self::Config) -> Self {
        let device = var_store.device();
        let seq = Self::create_net(var_store, &config);

        Self {
            config,
            device,
            seq,
        }
    }

    fn clone_with_var_store(&self, var_store: &nn::VarStore) -> Self {
        let config = self.config.clone();
        let device = var_store.device();
        let seq = Self::create_net(&var_store, &config);

        Self {
            config,
            device,
            seq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_shapes() {
        tch::manual_seed(0);
        let vs = nn::VarStore::new(Device::Cpu);
        let mlp = Mlp::build(&vs, MlpConfig::new(8, vec![16, 16], 4, true));

        let x = Tensor::rand(&[5, 8], tch::kind::FLOAT_CPU);
        let y = mlp.forward(&x, false);
        assert_eq!(y.size(), vec![5, 4]);

        // Softmax output rows sum to one.
        let sums = Vec::<f32>::from(&y.sum_dim_intlist(
            [-1i64].as_slice(),
            false,
            Kind::Float,
        ));
        for s in sums {
            assert!((s - 1.0).abs() < 1e-5);
        }
    }
}
