//! Episode statistics written to a monitor directory.
use anyhow::{bail, Result};
use chrono::Local;
use log::info;
use rollout_core::{record::Record, Env, Step};
use serde::{Deserialize, Serialize};
use std::{fs, fs::File, path::PathBuf, time::Instant};

/// Name of the file in the monitor directory.
pub const EPISODES_FILE: &str = "episodes.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Configuration of [`Monitor`].
pub struct MonitorConfig {
    /// Output directory.
    pub dir: PathBuf,

    /// If `true`, output of a previous run in `dir` is overwritten.
    pub force: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./monitor"),
            force: true,
        }
    }
}

impl MonitorConfig {
    /// Sets the output directory.
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Sets the overwrite flag.
    pub fn force(mut self, v: bool) -> Self {
        self.force = v;
        self
    }
}

/// A row of the episodes file.
#[derive(Debug, Serialize, Deserialize)]
pub struct EpisodeRow {
    pub episode: usize,
    pub length: usize,
    pub reward: f32,
    pub seconds: f32,
    pub finished_at: String,
}

/// Records the length, return and duration of every episode to a CSV file.
pub struct Monitor<E> {
    env: E,
    writer: csv::Writer<File>,
    episode: usize,
    length: usize,
    reward: f32,
    start: Instant,
}

impl<E: Env> Monitor<E> {
    /// Wraps the environment, creating `<dir>/episodes.csv`.
    pub fn new(env: E, config: &MonitorConfig) -> Result<Self> {
        let path = config.dir.join(EPISODES_FILE);
        if path.exists() {
            if !config.force {
                bail!(
                    "Monitor output {:?} already exists, set force to overwrite it",
                    path
                );
            }
            fs::remove_file(&path)?;
        }
        fs::create_dir_all(&config.dir)?;
        info!("Write episode statistics to {:?}", path);

        Ok(Self {
            env,
            writer: csv::Writer::from_path(&path)?,
            episode: 0,
            length: 0,
            reward: 0.0,
            start: Instant::now(),
        })
    }
}

impl<E: Env> Env for Monitor<E> {
    type Obs = E::Obs;
    type Act = E::Act;

    fn reset(&mut self) -> Result<E::Obs> {
        self.length = 0;
        self.reward = 0.0;
        self.start = Instant::now();
        self.env.reset()
    }

    fn step(&mut self, a: &E::Act) -> Result<(Step<Self>, Record)> {
        let (step, record) = self.env.step(a)?;
        self.length += 1;
        self.reward += step.reward;

        if step.is_done() {
            self.writer.serialize(EpisodeRow {
                episode: self.episode,
                length: self.length,
                reward: self.reward,
                seconds: self.start.elapsed().as_secs_f32(),
                finished_at: Local::now().to_rfc3339(),
            })?;
            self.writer.flush()?;
            self.episode += 1;
        }

        let step = Step::new(step.obs, step.reward, step.is_terminated, step.is_truncated);
        Ok((step, record))
    }
}
