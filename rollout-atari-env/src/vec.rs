//! Vectorized environment interface.
//!
//! Wrappers like [`Rescale42`](crate::Rescale42) and
//! [`Diagnostics`](crate::Diagnostics) operate on batches of sub-environments.
//! [`Vectorize`] lifts a scalar [`Env`] into a batch of one, and [`Unvectorize`]
//! turns a batch of one back into a scalar [`Env`].
use anyhow::Result;
use log::trace;
use rollout_core::{error::RolloutError, record::Record, Act, Env, Obs, Step};
use std::slice;

/// Outcome of a step of a vectorized environment.
///
/// Every field has one element per sub-environment. Observations and rewards
/// are optional: a sub-environment may not produce them at every step.
#[derive(Debug)]
pub struct VecStep<O> {
    /// Observations.
    pub obs: Vec<Option<O>>,

    /// Rewards.
    pub reward: Vec<Option<f32>>,

    /// Flags denoting if episodes are terminated.
    pub is_terminated: Vec<bool>,

    /// Flags denoting if episodes are truncated.
    pub is_truncated: Vec<bool>,

    /// Auxiliary information.
    pub info: Vec<Record>,
}

impl<O> VecStep<O> {
    /// Returns the number of sub-environments.
    pub fn len(&self) -> usize {
        self.obs.len()
    }

    /// Returns `true` if there is no sub-environment.
    pub fn is_empty(&self) -> bool {
        self.obs.is_empty()
    }

    /// Terminated or truncated.
    pub fn is_done(&self, i: usize) -> bool {
        self.is_terminated[i] || self.is_truncated[i]
    }

    /// Applies `f` to every observation.
    pub fn map_obs<U>(self, mut f: impl FnMut(O) -> U) -> VecStep<U> {
        VecStep {
            obs: self.obs.into_iter().map(|o| o.map(&mut f)).collect(),
            reward: self.reward,
            is_terminated: self.is_terminated,
            is_truncated: self.is_truncated,
            info: self.info,
        }
    }
}

/// A batch of environments stepped together.
pub trait VecEnv {
    /// Observation of a sub-environment.
    type Obs;

    /// Action of a sub-environment.
    type Act;

    /// Returns the number of sub-environments.
    fn num_envs(&self) -> usize;

    /// Resets all sub-environments.
    fn reset(&mut self) -> Result<Vec<Self::Obs>>;

    /// Steps all sub-environments, one action each.
    fn step(&mut self, acts: &[Self::Act]) -> Result<VecStep<Self::Obs>>;
}

/// Exposes a scalar [`Env`] as a [`VecEnv`] with a single sub-environment.
pub struct Vectorize<E> {
    env: E,
}

impl<E: Env> Vectorize<E> {
    /// Wraps the environment.
    pub fn new(env: E) -> Self {
        Self { env }
    }
}

impl<E: Env> VecEnv for Vectorize<E> {
    type Obs = E::Obs;
    type Act = E::Act;

    fn num_envs(&self) -> usize {
        1
    }

    fn reset(&mut self) -> Result<Vec<E::Obs>> {
        Ok(vec![self.env.reset()?])
    }

    fn step(&mut self, acts: &[E::Act]) -> Result<VecStep<E::Obs>> {
        if acts.len() != 1 {
            return Err(RolloutError::BatchSizeError {
                expected: 1,
                actual: acts.len(),
            }
            .into());
        }

        let (step, info) = self.env.step(&acts[0])?;
        Ok(VecStep {
            obs: vec![Some(step.obs)],
            reward: vec![Some(step.reward)],
            is_terminated: vec![step.is_terminated],
            is_truncated: vec![step.is_truncated],
            info: vec![info],
        })
    }
}

/// Exposes a [`VecEnv`] with a single sub-environment as a scalar [`Env`].
///
/// A missing observation is replaced with [`Obs::dummy()`] and a missing reward
/// with zero.
pub struct Unvectorize<V> {
    env: V,
}

impl<V: VecEnv> Unvectorize<V> {
    /// Wraps the vectorized environment.
    pub fn new(env: V) -> Self {
        Self { env }
    }
}

fn single<T>(mut v: Vec<T>) -> Result<T> {
    match v.len() {
        1 => Ok(v.remove(0)),
        n => Err(RolloutError::BatchSizeError {
            expected: 1,
            actual: n,
        }
        .into()),
    }
}

impl<V> Env for Unvectorize<V>
where
    V: VecEnv,
    V::Obs: Obs,
    V::Act: Act,
{
    type Obs = V::Obs;
    type Act = V::Act;

    fn reset(&mut self) -> Result<V::Obs> {
        single(self.env.reset()?)
    }

    fn step(&mut self, a: &V::Act) -> Result<(Step<Self>, Record)> {
        let step = self.env.step(slice::from_ref(a))?;
        if step.len() != 1 {
            return Err(RolloutError::BatchSizeError {
                expected: 1,
                actual: step.len(),
            }
            .into());
        }

        let obs = single(step.obs)?.unwrap_or_else(|| {
            trace!("No observation, use dummy");
            V::Obs::dummy()
        });
        let reward = single(step.reward)?.unwrap_or(0.0);
        let is_terminated = single(step.is_terminated)?;
        let is_truncated = single(step.is_truncated)?;
        let info = single(step.info)?;

        Ok((Step::new(obs, reward, is_terminated, is_truncated), info))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rollout_core::record::RecordValue;

    #[derive(Clone, Debug, PartialEq)]
    struct Pos(i32);

    impl Obs for Pos {
        fn dummy() -> Self {
            Pos(-1)
        }
    }

    #[derive(Clone, Debug)]
    struct Move(i32);

    impl Act for Move {}

    struct Line {
        pos: i32,
    }

    impl Env for Line {
        type Obs = Pos;
        type Act = Move;

        fn reset(&mut self) -> Result<Pos> {
            self.pos = 0;
            Ok(Pos(0))
        }

        fn step(&mut self, a: &Move) -> Result<(Step<Self>, Record)> {
            self.pos += a.0;
            let info = Record::from_scalar("pos", self.pos as f32);
            Ok((Step::new(Pos(self.pos), 1.0, self.pos >= 3, false), info))
        }
    }

    /// A batch of one which drops the observation at odd steps.
    struct Flaky {
        t: usize,
    }

    impl VecEnv for Flaky {
        type Obs = Pos;
        type Act = Move;

        fn num_envs(&self) -> usize {
            1
        }

        fn reset(&mut self) -> Result<Vec<Pos>> {
            Ok(vec![Pos(0)])
        }

        fn step(&mut self, _acts: &[Move]) -> Result<VecStep<Pos>> {
            self.t += 1;
            let obs = if self.t % 2 == 1 { None } else { Some(Pos(self.t as i32)) };
            Ok(VecStep {
                obs: vec![obs],
                reward: vec![None],
                is_terminated: vec![false],
                is_truncated: vec![false],
                info: vec![Record::empty()],
            })
        }
    }

    #[test]
    fn test_round_trip_keeps_scalar_semantics() -> Result<()> {
        let mut env = Unvectorize::new(Vectorize::new(Line { pos: 10 }));
        assert_eq!(env.reset()?, Pos(0));

        let (step, info) = env.step(&Move(2))?;
        assert_eq!(step.obs, Pos(2));
        assert_eq!(step.reward, 1.0);
        assert!(!step.is_done());
        assert_eq!(info.get("pos"), Some(&RecordValue::Scalar(2.0)));

        let (step, _) = env.step(&Move(2))?;
        assert!(step.is_terminated);
        Ok(())
    }

    #[test]
    fn test_vectorize_rejects_wrong_batch() {
        let mut env = Vectorize::new(Line { pos: 0 });
        assert_eq!(env.num_envs(), 1);
        assert!(env.step(&[Move(1), Move(1)]).is_err());
        assert!(env.step(&[]).is_err());
    }

    #[test]
    fn test_missing_values_are_filled() -> Result<()> {
        let mut env = Unvectorize::new(Flaky { t: 0 });
        let (step, _) = env.step(&Move(0))?;
        assert_eq!(step.obs, Pos(-1));
        assert_eq!(step.reward, 0.0);

        let (step, _) = env.step(&Move(0))?;
        assert_eq!(step.obs, Pos(2));
        Ok(())
    }

    /// Two sub-environments, which [`Unvectorize`] cannot expose.
    struct Pair;

    impl VecEnv for Pair {
        type Obs = Pos;
        type Act = Move;

        fn num_envs(&self) -> usize {
            2
        }

        fn reset(&mut self) -> Result<Vec<Pos>> {
            Ok(vec![Pos(0), Pos(0)])
        }

        fn step(&mut self, _acts: &[Move]) -> Result<VecStep<Pos>> {
            Ok(VecStep {
                obs: vec![Some(Pos(1)), Some(Pos(1))],
                reward: vec![Some(1.0), Some(1.0)],
                is_terminated: vec![false, false],
                is_truncated: vec![false, false],
                info: vec![Record::empty(), Record::empty()],
            })
        }
    }

    fn is_batch_size_error<T>(res: Result<T>, n: usize) -> bool {
        match res {
            Ok(_) => false,
            Err(e) => matches!(
                e.downcast_ref::<RolloutError>(),
                Some(RolloutError::BatchSizeError { expected: 1, actual }) if *actual == n
            ),
        }
    }

    #[test]
    fn test_unvectorize_rejects_wrong_batch() {
        let mut env = Unvectorize::new(Pair);
        assert!(is_batch_size_error(env.reset(), 2));
        assert!(is_batch_size_error(env.step(&Move(1)), 2));
    }
}
