//! Configuration of Atari environments.
//!
//! If environment variable `ATARI_ROM_DIR` exists, it is used as the directory
//! from which ROM images of the Atari games are loaded. Otherwise ROMs are
//! looked up in `$HOME/atari_rom`.
use crate::DiagnosticsConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    env,
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

/// Converts an environment id like `MsPacman-v0` or `PongNoFrameskip-v4` to
/// the stem of the ROM file, like `ms_pacman` or `pong`.
pub fn rom_name(env_id: &str) -> String {
    let game = env_id.split('-').next().unwrap_or(env_id);
    let game = game
        .trim_end_matches("NoFrameskip")
        .trim_end_matches("Deterministic");

    let mut name = String::new();
    for (i, c) in game.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                name.push('_');
            }
            name.push(c.to_ascii_lowercase());
        } else {
            name.push(c);
        }
    }
    name
}

fn default_rom_dir() -> PathBuf {
    match env::var("ATARI_ROM_DIR") {
        Ok(var) => PathBuf::from(var),
        Err(_) => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("atari_rom"),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Configuration of [`AleEnv`](crate::AleEnv) and its wrappers.
pub struct AtariEnvConfig {
    /// Environment id, like `MsPacman-v0`.
    pub name: String,

    /// Directory of the ROM images.
    pub rom_dir: PathBuf,

    /// The number of emulator frames per step.
    pub frame_skip: i32,

    /// Probability of repeating the previous action (sticky actions).
    pub repeat_action_probability: f32,

    /// Episodes are truncated after this number of steps.
    pub max_steps: Option<usize>,

    /// Seed of the emulator, 0 seeds from the time.
    pub seed: i32,

    /// If given, the emulator dumps screens into this directory.
    pub record_screen_dir: Option<PathBuf>,

    /// Configuration of the diagnostics wrapper.
    pub diagnostics: DiagnosticsConfig,
}

impl Default for AtariEnvConfig {
    fn default() -> Self {
        Self {
            name: "MsPacman-v0".to_string(),
            rom_dir: default_rom_dir(),
            frame_skip: 4,
            repeat_action_probability: 0.25,
            max_steps: None,
            seed: 0,
            record_screen_dir: None,
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

impl AtariEnvConfig {
    /// Sets the environment id.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the ROM directory.
    pub fn rom_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.rom_dir = dir.into();
        self
    }

    /// Sets the number of emulator frames per step.
    pub fn frame_skip(mut self, v: i32) -> Self {
        self.frame_skip = v;
        self
    }

    /// Sets the probability of sticky actions.
    pub fn repeat_action_probability(mut self, v: f32) -> Self {
        self.repeat_action_probability = v;
        self
    }

    /// Sets the maximum number of steps in an episode.
    pub fn max_steps(mut self, v: Option<usize>) -> Self {
        self.max_steps = v;
        self
    }

    /// Sets the seed of the emulator.
    pub fn seed(mut self, v: i32) -> Self {
        self.seed = v;
        self
    }

    /// Sets the directory of screen dumps.
    pub fn record_screen_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.record_screen_dir = dir;
        self
    }

    /// Sets the configuration of the diagnostics wrapper.
    pub fn diagnostics(mut self, config: DiagnosticsConfig) -> Self {
        self.diagnostics = config;
        self
    }

    /// Path of the ROM image of the game.
    pub fn rom_path(&self) -> PathBuf {
        self.rom_dir.join(format!("{}.bin", rom_name(&self.name)))
    }

    /// Loads [`AtariEnvConfig`] from YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`AtariEnvConfig`].
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
    fn test_rom_name() {
        assert_eq!(rom_name("MsPacman-v0"), "ms_pacman");
        assert_eq!(rom_name("PongNoFrameskip-v4"), "pong");
        assert_eq!(rom_name("BreakoutDeterministic-v4"), "breakout");
        assert_eq!(rom_name("SpaceInvaders-v0"), "space_invaders");
        assert_eq!(rom_name("pong"), "pong");
    }

    #[test]
    fn test_rom_path() {
        let config = AtariEnvConfig::default()
            .name("PongNoFrameskip-v4")
            .rom_dir("/roms");
        assert_eq!(config.rom_path(), PathBuf::from("/roms/pong.bin"));
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let dir = TempDir::new("atari_env_config")?;
        let path = dir.path().join("env.yaml");
        let config = AtariEnvConfig::default()
            .name("PongNoFrameskip-v4")
            .max_steps(Some(10000))
            .diagnostics(DiagnosticsConfig::default().log_interval(100));
        config.save(&path)?;
        assert_eq!(AtariEnvConfig::load(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_missing_fields_take_defaults() -> Result<()> {
        let config: AtariEnvConfig = serde_yaml::from_str("name: Pong-v0\nframe_skip: 1\n")?;
        assert_eq!(config.name, "Pong-v0");
        assert_eq!(config.frame_skip, 1);
        assert_eq!(config.diagnostics.log_interval, 503);
        Ok(())
    }
}
