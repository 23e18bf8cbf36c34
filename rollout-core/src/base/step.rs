//! Environment step.
use super::Env;

/// Represents an observation and reward pair `(o_t+1, r_t)` emitted by an
/// environment after taking an action.
pub struct Step<E: Env> {
    /// Observation.
    pub obs: E::Obs,

    /// Reward.
    pub reward: f32,

    /// Flag denoting if episode is terminated.
    pub is_terminated: bool,

    /// Flag denoting if episode is truncated.
    pub is_truncated: bool,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(obs: E::Obs, reward: f32, is_terminated: bool, is_truncated: bool) -> Self {
        Step {
            obs,
            reward,
            is_terminated,
            is_truncated,
        }
    }

    #[inline]
    /// Terminated or truncated.
    pub fn is_done(&self) -> bool {
        self.is_terminated || self.is_truncated
    }
}
