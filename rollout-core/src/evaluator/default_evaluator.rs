//! Default implementation of the [`Evaluator`] trait.
//!
//! Runs a fixed number of episodes, threading the policy state through every
//! step of an episode, and collects the length and return of each episode.
use super::{EvalSummary, Evaluator};
use crate::{
    record::{NullRecorder, RecordValue, Recorder},
    Env, Policy,
};
use anyhow::Result;
use log::info;

/// A default implementation of the [`Evaluator`] trait.
///
/// Non-empty records emitted by the environment at each step are tagged with
/// the running step count (`env_steps`) and written to the recorder.
///
/// # Examples
///
/// ```ignore
/// let env = create_atari_env(&env_config)?;
/// let mut evaluator = DefaultEvaluator::new(env, 5);
/// let summary = evaluator.evaluate(&mut policy)?;
/// println!("{} +/-{}", summary.reward_mean(), summary.reward_std());
/// ```
pub struct DefaultEvaluator<E: Env, R: Recorder = NullRecorder> {
    /// The number of episodes to run during evaluation.
    n_episodes: usize,

    /// The environment instance used for evaluation.
    env: E,

    recorder: R,

    /// Total number of environment steps across evaluations.
    env_steps: usize,
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`] discarding step records.
    pub fn new(env: E, n_episodes: usize) -> Self {
        Self {
            n_episodes,
            env,
            recorder: NullRecorder::new(),
            env_steps: 0,
        }
    }
}

impl<E: Env, R: Recorder> DefaultEvaluator<E, R> {
    /// Replaces the recorder receiving step records.
    pub fn with_recorder<R2: Recorder>(self, recorder: R2) -> DefaultEvaluator<E, R2> {
        DefaultEvaluator {
            n_episodes: self.n_episodes,
            env: self.env,
            recorder,
            env_steps: self.env_steps,
        }
    }

    /// Returns the recorder.
    pub fn recorder(&self) -> &R {
        &self.recorder
    }
}

impl<E: Env, R: Recorder> Evaluator<E> for DefaultEvaluator<E, R> {
    fn evaluate<P>(&mut self, policy: &mut P) -> Result<EvalSummary>
    where
        P: Policy<E>,
    {
        let mut summary = EvalSummary::default();

        for ix in 0..self.n_episodes {
            let mut obs = self.env.reset()?;
            let mut state = policy.initial_state();
            let mut length = 0;
            let mut reward_sum = 0f32;

            loop {
                let (act, next_state) = policy.sample(&obs, state)?;
                let (step, mut record) = self.env.step(&act)?;
                self.env_steps += 1;
                length += 1;
                reward_sum += step.reward;
                state = next_state;

                if !record.is_empty() {
                    record.insert("env_steps", RecordValue::Scalar(self.env_steps as _));
                    self.recorder.write(record);
                }

                if step.is_done() {
                    break;
                }
                obs = step.obs;
            }

            info!(
                "Episode {}: length = {}, reward = {}",
                ix, length, reward_sum
            );
            summary.push(length, reward_sum);
        }

        self.recorder.flush();
        Ok(summary)
    }
}
