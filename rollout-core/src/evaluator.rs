//! Evaluate [`Policy`].
use crate::{Env, Policy};
use anyhow::Result;
mod default_evaluator;
mod summary;
pub use default_evaluator::DefaultEvaluator;
pub use summary::EvalSummary;

/// Evaluate [`Policy`].
pub trait Evaluator<E: Env> {
    /// Runs episodes with the policy and summarizes them.
    fn evaluate<P>(&mut self, policy: &mut P) -> Result<EvalSummary>
    where
        P: Policy<E>;
}
