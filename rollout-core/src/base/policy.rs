//! Policy.
use super::Env;
use anyhow::Result;

/// A policy on an environment.
///
/// Policy is a mapping from an observation to an action. Policies with memory,
/// such as recurrent networks, carry it in [`Policy::State`]: the state returned
/// by [`Policy::sample`] is fed back at the next step, and
/// [`Policy::initial_state`] is used at the beginning of every episode.
/// Stateless policies use `()`.
pub trait Policy<E: Env> {
    /// Internal state threaded between consecutive steps.
    type State;

    /// Returns the state at the beginning of an episode.
    fn initial_state(&self) -> Self::State;

    /// Sample an action given an observation and the current state.
    fn sample(&mut self, obs: &E::Obs, state: Self::State) -> Result<(E::Act, Self::State)>;
}
