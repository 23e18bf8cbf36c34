use crate::args::Args;
use anyhow::Result;
use rollout_atari_env::{AtariEnvConfig, MonitorConfig};
use rollout_tch_agent::{Device, TchPolicyConfig};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub n_episodes: usize,
    pub checkpoint_dir: PathBuf,

    /// Episode statistics are not written if `None`.
    pub monitor_config: Option<MonitorConfig>,

    /// TensorBoard logs are not written if `None`.
    pub logdir: Option<PathBuf>,

    pub summary_path: Option<PathBuf>,
    pub env_config: AtariEnvConfig,
    pub policy_config: TchPolicyConfig,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            n_episodes: 5,
            checkpoint_dir: PathBuf::from("./train"),
            monitor_config: Some(MonitorConfig::default()),
            logdir: None,
            summary_path: None,
            env_config: AtariEnvConfig::default(),
            policy_config: TchPolicyConfig::default(),
        }
    }
}

fn device(name: &str) -> Device {
    match name {
        "Cpu" | "cpu" => Device::Cpu,
        _ => Device::CudaIfAvailable,
    }
}

impl EvalConfig {
    /// Loads the file given with `--config` if any, then applies the other options.
    pub fn from_args(args: &Args) -> Result<Self> {
        let config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(config.apply(args))
    }

    fn apply(mut self, args: &Args) -> Self {
        if let Some(name) = &args.name {
            self.env_config = self.env_config.name(name.clone());
        }
        if let Some(dir) = &args.checkpoint_dir {
            self.checkpoint_dir = dir.clone();
        }
        if args.no_monitor {
            self.monitor_config = None;
        } else if let Some(dir) = &args.monitor_dir {
            let config = self.monitor_config.take().unwrap_or_default();
            self.monitor_config = Some(config.dir(dir.clone()));
        }
        if let Some(n) = args.episodes {
            self.n_episodes = n;
        }
        if let Some(dir) = &args.logdir {
            self.logdir = Some(dir.clone());
        }
        if let Some(path) = &args.summary {
            self.summary_path = Some(path.clone());
        }
        if let Some(name) = &args.device {
            self.policy_config = self.policy_config.device(device(name));
        }
        if args.max_steps.is_some() {
            self.env_config = self.env_config.max_steps(args.max_steps);
        }
        self
    }

    /// Loads [`EvalConfig`] from YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`EvalConfig`].
    #[allow(dead_code)]
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
    fn test_defaults() -> Result<()> {
        let config = EvalConfig::from_args(&Args::default())?;
        assert_eq!(config.n_episodes, 5);
        assert_eq!(config.env_config.name, "MsPacman-v0");
        assert_eq!(config.policy_config.hidden_size, 256);
        assert_eq!(config.env_config.diagnostics.log_interval, 503);
        assert!(config.monitor_config.is_some());
        Ok(())
    }

    #[test]
    fn test_args_override_file() -> Result<()> {
        let dir = TempDir::new("eval_config")?;
        let path = dir.path().join("eval.yaml");
        let saved = EvalConfig {
            n_episodes: 20,
            logdir: Some(dir.path().join("logs")),
            ..EvalConfig::default()
        };
        saved.save(&path)?;

        let args = Args {
            config: Some(path),
            name: Some("PongNoFrameskip-v4".to_string()),
            episodes: Some(3),
            monitor_dir: Some(dir.path().join("monitor")),
            device: Some("Cpu".to_string()),
            ..Args::default()
        };
        let config = EvalConfig::from_args(&args)?;
        assert_eq!(config.n_episodes, 3);
        assert_eq!(config.logdir, saved.logdir);
        assert_eq!(config.env_config.name, "PongNoFrameskip-v4");
        assert_eq!(config.policy_config.device, Device::Cpu);
        assert_eq!(
            config.monitor_config.map(|c| c.dir),
            Some(dir.path().join("monitor"))
        );
        Ok(())
    }

    #[test]
    fn test_no_monitor() -> Result<()> {
        let args = Args {
            no_monitor: true,
            ..Args::default()
        };
        assert_eq!(EvalConfig::from_args(&args)?.monitor_config, None);
        Ok(())
    }
}
