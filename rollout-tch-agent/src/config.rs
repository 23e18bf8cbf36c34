//! Configuration of [`TchRecurrentPolicy`](crate::TchRecurrentPolicy).
use crate::Device;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
/// Configuration of [`TchRecurrentPolicy`](crate::TchRecurrentPolicy).
pub struct TchPolicyConfig {
    /// Size of the LSTM state.
    pub hidden_size: i64,

    /// Method of the module computing `(c, h, action)`.
    pub method: String,

    /// Device on which the module runs.
    pub device: Device,
}

impl Default for TchPolicyConfig {
    fn default() -> Self {
        Self {
            hidden_size: 256,
            method: "forward".to_string(),
            device: Device::Cpu,
        }
    }
}

impl TchPolicyConfig {
    /// Sets the size of the LSTM state.
    pub fn hidden_size(mut self, v: i64) -> Self {
        self.hidden_size = v;
        self
    }

    /// Sets the method to call.
    pub fn method(mut self, name: impl Into<String>) -> Self {
        self.method = name.into();
        self
    }

    /// Sets the device.
    pub fn device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Loads [`TchPolicyConfig`] from YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TchPolicyConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_tch_policy_config() -> Result<()> {
        let config = TchPolicyConfig::default()
            .hidden_size(128)
            .method("act")
            .device(Device::Cuda(1));

        let dir = TempDir::new("tch_policy_config")?;
        let path = dir.path().join("policy.yaml");
        config.save(&path)?;
        assert_eq!(TchPolicyConfig::load(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let config: TchPolicyConfig = serde_yaml::from_str("device: CudaIfAvailable\n")?;
        assert_eq!(config.hidden_size, 256);
        assert_eq!(config.method, "forward");
        assert_eq!(config.device, Device::CudaIfAvailable);
        Ok(())
    }
}
