//! A serializable device descriptor.
use serde::{Deserialize, Serialize};

/// Device on which tensors and models are placed.
///
/// This mirrors [`tch::Device`] and exists so that device selection can be
/// part of serialized agent configurations.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub enum Device {
    /// The main CPU device.
    Cpu,

    /// A CUDA device with its ordinal.
    Cuda(usize),
}

impl From<Device> for tch::Device {
    fn from(device: Device) -> Self {
        match device {
            Device::Cpu => tch::Device::Cpu,
            Device::Cuda(n) => tch::Device::Cuda(n),
        }
    }
}

impl From<tch::Device> for Device {
    fn from(device: tch::Device) -> Self {
        match device {
            tch::Device::Cpu => Device::Cpu,
            tch::Device::Cuda(n) => Device::Cuda(n),
            _ => panic!("Unsupported device: {:?}", device),
        }
    }
}
