//! Construction of wrapped Atari environments.
//!
//! Every environment is composed in the same order: the raw environment is
//! vectorized, its frames are rescaled to 42x42, diagnostics are attached and
//! finally the batch of one is unwrapped again.
mod config;
pub use config::{rom_name, AtariEnvConfig};

use crate::{DiagnosticsConfig, Diagnostics, RawFrame, Rescale42, Unvectorize, Vectorize};
use rollout_core::Env;

/// A raw environment with the preprocessing wrappers.
pub type WrappedEnv<E> = Unvectorize<Diagnostics<Rescale42<Vectorize<E>>>>;

/// Wraps a raw environment rendering RGB frames.
pub fn wrap_atari_env<E>(env: E, config: &DiagnosticsConfig) -> WrappedEnv<E>
where
    E: Env<Obs = RawFrame>,
{
    Unvectorize::new(Diagnostics::new(
        Rescale42::new(Vectorize::new(env)),
        config,
    ))
}

#[cfg(feature = "ale")]
/// The wrapped ALE environment.
pub type AtariEnv = WrappedEnv<crate::AleEnv>;

#[cfg(feature = "ale")]
/// Builds the ALE environment given in the configuration and wraps it.
pub fn create_atari_env(config: &AtariEnvConfig) -> anyhow::Result<AtariEnv> {
    let env = crate::AleEnv::build(config)?;
    Ok(wrap_atari_env(env, &config.diagnostics))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{AtariAct, FRAME_SIZE};
    use anyhow::Result;
    use rollout_core::{record::Record, Step};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Gives reward 1 at every step and ends after 10 steps.
    struct TenSteps {
        t: usize,
    }

    impl TenSteps {
        fn frame(&self) -> Result<RawFrame> {
            let v = (self.t * 20) as u8;
            RawFrame::from_rgb(160, 210, vec![v; 160 * 210 * 3])
        }
    }

    impl Env for TenSteps {
        type Obs = RawFrame;
        type Act = AtariAct;

        fn reset(&mut self) -> Result<RawFrame> {
            self.t = 0;
            self.frame()
        }

        fn step(&mut self, _a: &AtariAct) -> Result<(Step<Self>, Record)> {
            self.t += 1;
            let step = Step::new(self.frame()?, 1.0, self.t == 10, false);
            Ok((step, Record::empty()))
        }
    }

    #[test]
    fn test_scripted_episode() -> Result<()> {
        init();
        let mut env = wrap_atari_env(TenSteps { t: 0 }, &DiagnosticsConfig::default());
        let obs = env.reset()?;
        assert_eq!(obs.shape(), &[FRAME_SIZE, FRAME_SIZE, 3]);

        let mut records = vec![];
        loop {
            let (step, record) = env.step(&AtariAct::new(0))?;
            assert_eq!(step.obs.shape(), &[FRAME_SIZE, FRAME_SIZE, 3]);
            assert_eq!(step.reward, 1.0);
            records.push(record);
            if step.is_done() {
                break;
            }
        }

        assert_eq!(records.len(), 10);
        assert!(records[..9]
            .iter()
            .all(|r| !r.contains_key("global/episode_length")));
        let last = records.last().unwrap();
        assert_eq!(last.get_scalar("global/episode_length")?, 10.0);
        assert_eq!(last.get_scalar("global/episode_reward")?, 10.0);
        Ok(())
    }

    #[test]
    fn test_accumulators_cleared_between_episodes() -> Result<()> {
        init();
        let mut env = wrap_atari_env(TenSteps { t: 0 }, &DiagnosticsConfig::default());
        for _ in 0..2 {
            env.reset()?;
            let record = loop {
                let (step, record) = env.step(&AtariAct::new(0))?;
                if step.is_done() {
                    break record;
                }
            };
            assert_eq!(record.get_scalar("global/episode_reward")?, 10.0);
        }
        Ok(())
    }
}
