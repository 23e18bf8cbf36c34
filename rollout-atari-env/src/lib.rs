//! Atari environments for evaluating pretrained policies.
//!
//! Frames rendered by the [Arcade Learning Environment](https://github.com/mgbellemare/Arcade-Learning-Environment)
//! are rescaled to 42x42 RGB observations and every step is annotated with
//! diagnostics: the reward and length of finished episodes, throughput and
//! telemetry forwarded by the emulator.
//!
//! You need to place Atari ROM images under the directory specified by
//! environment variable `ATARI_ROM_DIR`. An easy way to do this is to use
//! [AutoROM](https://pypi.org/project/AutoROM/) Python package.
//!
//! ```bash
//! pip install autorom
//! mkdir $HOME/atari_rom
//! AutoROM --install-dir $HOME/atari_rom
//! export ATARI_ROM_DIR=$HOME/atari_rom
//! ```
//!
//! Here is an example of running MsPacman with a policy always taking the
//! first action.
//!
//! ```no_run
//! use anyhow::Result;
//! use rollout_atari_env::{create_atari_env, AtariAct, AtariEnv, AtariEnvConfig};
//! use rollout_core::{DefaultEvaluator, Env, Evaluator as _, Policy};
//!
//! struct Noop;
//!
//! impl Policy<AtariEnv> for Noop {
//!     type State = ();
//!
//!     fn initial_state(&self) {}
//!
//!     fn sample(&mut self, _: &<AtariEnv as Env>::Obs, _: ()) -> Result<(AtariAct, ())> {
//!         Ok((AtariAct::new(0), ()))
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let env = create_atari_env(&AtariEnvConfig::default().name("MsPacman-v0"))?;
//!     let summary = DefaultEvaluator::new(env, 5).evaluate(&mut Noop)?;
//!     println!("{} +/-{}", summary.reward_mean(), summary.reward_std());
//!     Ok(())
//! }
//! ```
mod act;
#[cfg(feature = "ale")]
mod ale;
#[cfg(feature = "ale")]
mod ale_env;
mod diagnostics;
mod env;
mod error;
mod monitor;
mod obs;
mod process;
mod rescale;
mod vec;
pub use act::AtariAct;
#[cfg(feature = "ale")]
pub use ale_env::AleEnv;
pub use diagnostics::{Diagnostics, DiagnosticsConfig, DiagnosticsFilter};
#[cfg(feature = "ale")]
pub use env::{create_atari_env, AtariEnv};
pub use env::{rom_name, wrap_atari_env, AtariEnvConfig, WrappedEnv};
pub use error::AtariEnvError;
pub use monitor::{EpisodeRow, Monitor, MonitorConfig, EPISODES_FILE};
pub use obs::{AtariObs, RawFrame, FRAME_SIZE};
pub use process::process_frame42;
pub use rescale::Rescale42;
pub use vec::{Unvectorize, VecEnv, VecStep, Vectorize};
