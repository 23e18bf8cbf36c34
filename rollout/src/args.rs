use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Evaluate a recurrent policy in an Atari environment
#[derive(Clone, Parser, Debug, Default, Serialize, Deserialize)]
#[command(version, about)]
pub struct Args {
    /// YAML file with the evaluation configuration.
    /// The options below override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory in which the latest checkpoint is looked up.
    #[arg(long)]
    pub checkpoint_dir: Option<PathBuf>,

    /// Directory of the episode statistics.
    #[arg(long)]
    pub monitor_dir: Option<PathBuf>,

    /// Disables the episode statistics.
    #[arg(long, conflicts_with = "monitor_dir")]
    pub no_monitor: bool,

    /// The number of episodes.
    #[arg(long)]
    pub episodes: Option<usize>,

    /// Directory of TensorBoard logs.
    /// If not given, diagnostics are only logged as text.
    #[arg(long)]
    pub logdir: Option<PathBuf>,

    /// YAML file to which the episode lengths and rewards are saved.
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Device name.
    /// If set to `"Cpu"`, the CPU will be used.
    /// Otherwise, the device will be determined by the `cuda_if_available()` method.
    #[arg(long)]
    pub device: Option<String>,

    /// Maximum number of steps in an episode.
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Prints the configuration and exits.
    #[arg(long)]
    pub show_config: bool,

    /// Environment id, like `MsPacman-v0`.
    pub name: Option<String>,
}
