//! Action for Atari environments.
use rollout_core::Act;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Action for Atari environments, an index into the minimal action set of the game.
pub struct AtariAct {
    /// Index into the minimal action set.
    pub act: usize,
}

impl AtariAct {
    /// Constructs an action from its index.
    pub fn new(act: usize) -> Self {
        Self { act }
    }
}

impl Act for AtariAct {}

impl From<usize> for AtariAct {
    fn from(act: usize) -> Self {
        Self { act }
    }
}
