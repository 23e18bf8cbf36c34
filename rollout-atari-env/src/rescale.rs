use crate::{process_frame42, AtariObs, RawFrame, VecEnv, VecStep};
use anyhow::Result;

/// Replaces raw frames of a [`VecEnv`] with `42x42x3` observations.
///
/// See [`process_frame42`].
pub struct Rescale42<V> {
    env: V,
}

impl<V: VecEnv<Obs = RawFrame>> Rescale42<V> {
    /// Wraps the vectorized environment.
    pub fn new(env: V) -> Self {
        Self { env }
    }
}

impl<V: VecEnv<Obs = RawFrame>> VecEnv for Rescale42<V> {
    type Obs = AtariObs;
    type Act = V::Act;

    fn num_envs(&self) -> usize {
        self.env.num_envs()
    }

    fn reset(&mut self) -> Result<Vec<AtariObs>> {
        Ok(self.env.reset()?.iter().map(process_frame42).collect())
    }

    fn step(&mut self, acts: &[V::Act]) -> Result<VecStep<AtariObs>> {
        Ok(self.env.step(acts)?.map_obs(|frame| process_frame42(&frame)))
    }
}
