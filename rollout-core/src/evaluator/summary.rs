//! Summary of evaluation runs.
use crate::record::{Record, RecordValue};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Write, path::Path};

/// Lengths and returns of evaluated episodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalSummary {
    /// The number of steps of each episode.
    pub lengths: Vec<usize>,

    /// The sum of rewards of each episode.
    pub rewards: Vec<f32>,
}

fn mean(vs: &[f32]) -> f32 {
    if vs.is_empty() {
        return f32::NAN;
    }
    vs.iter().sum::<f32>() / vs.len() as f32
}

/// Population standard deviation.
fn std_dev(vs: &[f32]) -> f32 {
    let m = mean(vs);
    (vs.iter().map(|v| (v - m).powi(2)).sum::<f32>() / vs.len() as f32).sqrt()
}

impl EvalSummary {
    /// Appends an episode.
    pub fn push(&mut self, length: usize, reward: f32) {
        self.lengths.push(length);
        self.rewards.push(reward);
    }

    /// Returns the number of episodes.
    pub fn n_episodes(&self) -> usize {
        self.rewards.len()
    }

    /// Mean of episode returns, `NaN` if there is no episode.
    pub fn reward_mean(&self) -> f32 {
        mean(&self.rewards)
    }

    /// Standard deviation of episode returns, `NaN` if there is no episode.
    pub fn reward_std(&self) -> f32 {
        std_dev(&self.rewards)
    }

    /// Mean of episode lengths, `NaN` if there is no episode.
    pub fn length_mean(&self) -> f32 {
        let lengths = self.lengths.iter().map(|&l| l as f32).collect::<Vec<_>>();
        mean(&lengths)
    }

    /// Converts the summary into a [`Record`].
    pub fn to_record(&self) -> Record {
        Record::from_slice(&[
            ("eval/reward_mean", RecordValue::Scalar(self.reward_mean())),
            ("eval/reward_std", RecordValue::Scalar(self.reward_std())),
            ("eval/length_mean", RecordValue::Scalar(self.length_mean())),
            ("eval/rewards", RecordValue::Array1(self.rewards.clone())),
            (
                "eval/lengths",
                RecordValue::Array1(self.lengths.iter().map(|&l| l as f32).collect()),
            ),
        ])
    }

    /// Saves the summary as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_statistics() {
        let mut summary = EvalSummary::default();
        for (l, r) in [(10, 2.0), (20, 4.0), (30, 4.0), (40, 4.0), (50, 5.0)] {
            summary.push(l, r);
        }
        for (l, r) in [(60, 5.0), (70, 7.0), (80, 9.0)] {
            summary.push(l, r);
        }

        assert_eq!(summary.n_episodes(), 8);
        assert!((summary.reward_mean() - 5.0).abs() < 1e-6);
        assert!((summary.reward_std() - 2.0).abs() < 1e-6);
        assert!((summary.length_mean() - 45.0).abs() < 1e-6);

        let record = summary.to_record();
        assert!((record.get_scalar("eval/reward_std").unwrap() - 2.0).abs() < 1e-6);
        assert_eq!(record.get_array1("eval/rewards").unwrap().len(), 8);
    }

    #[test]
    fn test_empty_summary() {
        let summary = EvalSummary::default();
        assert!(summary.reward_mean().is_nan());
        assert!(summary.reward_std().is_nan());
    }
}
