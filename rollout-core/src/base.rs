//! Core functionalities.
mod env;
mod policy;
mod step;
pub use env::Env;
pub use policy::Policy;
use std::fmt::Debug;
pub use step::Step;

/// An observation of an environment.
pub trait Obs: Clone + Debug {
    /// Returns a dummy observation.
    ///
    /// Used in place of an observation the environment did not provide.
    fn dummy() -> Self;
}

/// An action of an environment.
pub trait Act: Clone + Debug {}
