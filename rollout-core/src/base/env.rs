//! Environment.
use super::{Act, Obs, Step};
use crate::record::Record;
use anyhow::Result;

/// Represents an environment, typically an MDP.
///
/// Wrappers implement this trait as well, so an environment can be decorated
/// by stacking them; every layer keeps the same reset/step contract.
pub trait Env {
    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Resets the environment and returns the initial observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Performes an environment step.
    ///
    /// The returned [`Record`] carries auxiliary information of the step,
    /// like the `info` dictionary of gym environments.
    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)>
    where
        Self: Sized;
}
