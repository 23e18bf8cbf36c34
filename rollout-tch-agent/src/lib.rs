//! Recurrent policies loaded from [TorchScript](https://pytorch.org/docs/stable/jit.html)
//! checkpoints with [tch](https://crates.io/crates/tch).
//!
//! A checkpoint is a module exported with `torch.jit.save()` whose method
//! (`forward` by default) takes an observation batch of one together with the
//! `(c, h)` state of an LSTM cell and returns `(c, h, action)`.
mod checkpoint;
mod config;
mod error;
mod policy;
use serde::{Deserialize, Serialize};
pub use checkpoint::latest_checkpoint;
pub use config::TchPolicyConfig;
pub use error::PolicyError;
pub use policy::{LstmState, TchRecurrentPolicy};

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq)]
/// Device for using tch.
///
/// This enum is added because [`tch::Device`] does not support serialization.
pub enum Device {
    /// The main CPU device.
    Cpu,

    /// The `n`-th GPU device.
    Cuda(usize),

    /// The first GPU device if available, CPU otherwise.
    CudaIfAvailable,
}

impl Default for Device {
    fn default() -> Self {
        Self::Cpu
    }
}

impl From<Device> for tch::Device {
    fn from(device: Device) -> Self {
        match device {
            Device::Cpu => tch::Device::Cpu,
            Device::Cuda(n) => tch::Device::Cuda(n),
            Device::CudaIfAvailable => tch::Device::cuda_if_available(),
        }
    }
}
