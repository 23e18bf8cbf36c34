//! Diagnostics of environment interaction.
//!
//! [`DiagnosticsFilter`] tracks the reward and length of the running episode,
//! measures throughput every `log_interval` steps and picks known telemetry
//! fields from the info record of the wrapped environment. [`Diagnostics`]
//! applies one filter per sub-environment of a [`VecEnv`] and replaces the info
//! records with the diagnostics; observations, rewards and done flags pass
//! through unchanged.
use crate::{VecEnv, VecStep};
use anyhow::Result;
use log::{debug, info};
use rollout_core::{
    error::RolloutError,
    record::{Record, RecordValue},
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Telemetry fields holding `(lower, upper)` bounds, and the prefix of the
/// `_lb`/`_ub` keys they are copied to.
const BOUND_FIELDS: [(&str, &str); 3] = [
    (
        "stats.gauges.diagnostics.lag.action",
        "diagnostics/action_lag",
    ),
    (
        "stats.gauges.diagnostics.clock_skew",
        "diagnostics/clock_skew",
    ),
    (
        "stats.gauges.diagnostics.lag.observation",
        "diagnostics/observation_lag",
    ),
];

/// Telemetry fields copied as they are.
const VALUE_FIELDS: [(&str, &str); 5] = [
    ("reward.count", "diagnostics/reward_count"),
    ("stats.vnc.updates.bytes", "diagnostics/vnc_updates_bytes"),
    ("stats.vnc.updates.pixels", "diagnostics/vnc_updates_pixels"),
    (
        "stats.vnc.updates.rectangles",
        "diagnostics/vnc_updates_rectangles",
    ),
    ("env_status.state_id", "diagnostics/env_state_id"),
];

const VNC_UPDATES: &str = "stats.vnc.updates.n";
const EPISODE_ID: &str = "vectorized.episode_id";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Configuration of [`DiagnosticsFilter`].
pub struct DiagnosticsConfig {
    /// Interval of throughput measurement in environment steps.
    pub log_interval: usize,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self { log_interval: 503 }
    }
}

impl DiagnosticsConfig {
    /// Sets the interval of throughput measurement.
    pub fn log_interval(mut self, v: usize) -> Self {
        self.log_interval = v;
        self
    }
}

fn scalar(info: &Record, key: &str) -> Option<f32> {
    match info.get(key) {
        Some(RecordValue::Scalar(v)) => Some(*v),
        _ => None,
    }
}

/// Copies the telemetry fields present in `info` to `to_log`.
fn extract_telemetry(info: &Record, to_log: &mut Record) {
    for (src, dst) in BOUND_FIELDS.iter() {
        match info.get(src) {
            Some(RecordValue::Array1(v)) if v.len() >= 2 => {
                to_log.insert(format!("{}_lb", dst), RecordValue::Scalar(v[0]));
                to_log.insert(format!("{}_ub", dst), RecordValue::Scalar(v[1]));
            }
            Some(v) => debug!("Ignore malformed bounds {}: {:?}", src, v),
            None => {}
        }
    }

    for (src, dst) in VALUE_FIELDS.iter() {
        if let Some(v) = info.get(src) {
            to_log.insert(*dst, v.clone());
        }
    }
}

/// Computes diagnostics from the steps of a single environment.
#[derive(Debug)]
pub struct DiagnosticsFilter {
    log_interval: usize,

    /// Start of the running episode.
    episode_time: Instant,

    /// Time of the last throughput measurement.
    last_time: Instant,

    /// Steps since the filter was created.
    local_t: usize,

    episode_reward: f32,

    episode_length: usize,

    all_rewards: Vec<f32>,

    /// Screen updates since the last throughput measurement.
    num_vnc_updates: f32,

    /// Episode id seen at the last throughput measurement.
    last_episode_id: Option<f32>,
}

impl DiagnosticsFilter {
    /// Constructs the filter.
    pub fn new(config: &DiagnosticsConfig) -> Self {
        Self::new_at(config, Instant::now())
    }

    pub(crate) fn new_at(config: &DiagnosticsConfig, now: Instant) -> Self {
        Self {
            // an interval of 0 would never be reached
            log_interval: config.log_interval.max(1),
            episode_time: now,
            last_time: now,
            local_t: 0,
            episode_reward: 0.0,
            episode_length: 0,
            all_rewards: vec![],
            num_vnc_updates: 0.0,
            last_episode_id: None,
        }
    }

    /// Cumulative reward of the running episode.
    pub fn episode_reward(&self) -> f32 {
        self.episode_reward
    }

    /// Length of the running episode.
    pub fn episode_length(&self) -> usize {
        self.episode_length
    }

    /// Rewards of the running episode.
    pub fn rewards(&self) -> &[f32] {
        &self.all_rewards
    }

    /// Steps observed since the filter was created.
    pub fn local_t(&self) -> usize {
        self.local_t
    }

    /// Clears the episode statistics.
    pub fn after_reset(&mut self) {
        info!("Resetting environment");
        self.episode_reward = 0.0;
        self.episode_length = 0;
        self.all_rewards.clear();
    }

    /// Updates the statistics with a step and returns the diagnostics of the step.
    pub fn after_step<O>(
        &mut self,
        obs: Option<&O>,
        reward: Option<f32>,
        done: bool,
        info: &Record,
    ) -> Record {
        self.after_step_at(Instant::now(), obs.is_some(), reward, done, info)
    }

    pub(crate) fn after_step_at(
        &mut self,
        now: Instant,
        has_obs: bool,
        reward: Option<f32>,
        done: bool,
        info: &Record,
    ) -> Record {
        let mut to_log = Record::empty();
        if self.episode_length == 0 {
            self.episode_time = now;
        }

        self.local_t += 1;
        if let Some(n) = scalar(info, VNC_UPDATES) {
            self.num_vnc_updates += n;
        }

        if self.local_t % self.log_interval == 0 {
            self.log_throughput(now, info, &mut to_log);
        }

        if let Some(reward) = reward {
            self.episode_reward += reward;
            if has_obs {
                self.episode_length += 1;
            }
            self.all_rewards.push(reward);
        }

        if done {
            info!(
                "Episode terminating: episode_reward={} episode_length={}",
                self.episode_reward, self.episode_length
            );
            let total_time = now.duration_since(self.episode_time).as_secs_f32();
            to_log.insert(
                "global/episode_reward",
                RecordValue::Scalar(self.episode_reward),
            );
            to_log.insert(
                "global/episode_length",
                RecordValue::Scalar(self.episode_length as _),
            );
            to_log.insert("global/episode_time", RecordValue::Scalar(total_time));
            if total_time > 0.0 {
                to_log.insert(
                    "global/reward_per_time",
                    RecordValue::Scalar(self.episode_reward / total_time),
                );
            } else {
                debug!("Zero episode time, reward per time is not recorded");
            }
            self.episode_reward = 0.0;
            self.episode_length = 0;
            self.all_rewards.clear();
        }

        to_log
    }

    fn log_throughput(&mut self, now: Instant, info: &Record, to_log: &mut Record) {
        let elapsed = now.duration_since(self.last_time).as_secs_f32();
        self.last_time = now;

        let cur_episode_id = scalar(info, EPISODE_ID).unwrap_or(0.0);
        if elapsed > 0.0 {
            let fps = self.log_interval as f32 / elapsed;
            to_log.insert("diagnostics/fps", RecordValue::Scalar(fps));
            if self.last_episode_id == Some(cur_episode_id) {
                to_log.insert("diagnostics/fps_within_episode", RecordValue::Scalar(fps));
            }
        } else {
            debug!("Zero elapsed time, fps is not recorded");
        }
        self.last_episode_id = Some(cur_episode_id);

        extract_telemetry(info, to_log);

        if let Some(n) = scalar(info, VNC_UPDATES) {
            to_log.insert("diagnostics/vnc_updates_n", RecordValue::Scalar(n));
            if elapsed > 0.0 {
                to_log.insert(
                    "diagnostics/vnc_updates_n_ps",
                    RecordValue::Scalar(self.num_vnc_updates / elapsed),
                );
            }
            self.num_vnc_updates = 0.0;
        }
    }
}

/// Replaces the info records of a [`VecEnv`] with diagnostics.
pub struct Diagnostics<V> {
    env: V,
    filters: Vec<DiagnosticsFilter>,
}

impl<V: VecEnv> Diagnostics<V> {
    /// Attaches a filter configured with `config` to every sub-environment.
    pub fn new(env: V, config: &DiagnosticsConfig) -> Self {
        let filters = (0..env.num_envs())
            .map(|_| DiagnosticsFilter::new(config))
            .collect();
        Self { env, filters }
    }
}

impl<V: VecEnv> VecEnv for Diagnostics<V> {
    type Obs = V::Obs;
    type Act = V::Act;

    fn num_envs(&self) -> usize {
        self.env.num_envs()
    }

    fn reset(&mut self) -> Result<Vec<V::Obs>> {
        let obs = self.env.reset()?;
        self.filters.iter_mut().for_each(|f| f.after_reset());
        Ok(obs)
    }

    fn step(&mut self, acts: &[V::Act]) -> Result<VecStep<V::Obs>> {
        let mut step = self.env.step(acts)?;
        let n = self.filters.len();
        for actual in [
            step.obs.len(),
            step.reward.len(),
            step.is_terminated.len(),
            step.is_truncated.len(),
            step.info.len(),
        ]
        .iter()
        {
            if *actual != n {
                return Err(RolloutError::BatchSizeError {
                    expected: n,
                    actual: *actual,
                }
                .into());
            }
        }
        let info = std::mem::take(&mut step.info);
        step.info = self
            .filters
            .iter_mut()
            .zip(info.iter())
            .enumerate()
            .map(|(i, (filter, info))| {
                filter.after_step(step.obs[i].as_ref(), step.reward[i], step.is_done(i), info)
            })
            .collect();
        Ok(step)
    }
}
