#![warn(missing_docs)]
//! Core traits for evaluating policies in environments.
//!
//! An [`Env`] emits [`Obs`] and consumes [`Act`]; a [`Policy`] maps observations
//! to actions while threading its own state (e.g. the hidden state of a recurrent
//! network) from one step to the next. [`DefaultEvaluator`] drives a fixed number
//! of episodes and summarizes the returns.
pub mod error;
pub mod record;

mod base;
pub use base::{Act, Env, Obs, Policy, Step};

mod evaluator;
pub use evaluator::{DefaultEvaluator, EvalSummary, Evaluator};
