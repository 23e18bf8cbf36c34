//! Atari games emulated by the Arcade Learning Environment.
use crate::{
    ale::{Ale, AleAction, AleConfig},
    AtariAct, AtariEnvConfig, AtariEnvError, RawFrame,
};
use anyhow::Result;
use log::{info, trace};
use rollout_core::{record::Record, Env, Step};

/// An Atari game rendering full RGB screens.
///
/// Actions index the minimal action set of the game. An episode ends when the
/// game is over, or is truncated after `max_steps` steps if configured.
pub struct AleEnv {
    ale: Ale,
    actions: Vec<AleAction>,
    max_steps: Option<usize>,
    t: usize,
}

impl AleEnv {
    /// Loads the ROM of the game given in the configuration.
    pub fn build(config: &AtariEnvConfig) -> Result<Self> {
        let rom_path = config.rom_path();
        info!("Load ROM {:?}", rom_path);
        let ale = Ale::new(
            &rom_path,
            AleConfig {
                random_seed: config.seed,
                frame_skip: config.frame_skip,
                repeat_action_probability: config.repeat_action_probability,
                record_screen_dir: config.record_screen_dir.clone(),
            },
        )?;
        let actions = ale.minimal_actions();
        info!("{} actions available", actions.len());

        Ok(Self {
            ale,
            actions,
            max_steps: config.max_steps,
            t: 0,
        })
    }

    fn frame(&self) -> Result<RawFrame> {
        let mut buf = vec![0u8; self.ale.rgb24_size()];
        self.ale.rgb24(&mut buf);
        RawFrame::from_rgb(self.ale.width(), self.ale.height(), buf)
    }
}

impl Env for AleEnv {
    type Obs = RawFrame;
    type Act = AtariAct;

    fn reset(&mut self) -> Result<RawFrame> {
        trace!("AleEnv::reset()");
        self.ale.reset();
        self.t = 0;
        self.frame()
    }

    fn step(&mut self, a: &AtariAct) -> Result<(Step<Self>, Record)> {
        let action = *self
            .actions
            .get(a.act)
            .ok_or(AtariEnvError::ActionOutOfRange {
                act: a.act,
                n: self.actions.len(),
            })?;
        let reward = self.ale.take_action(action) as f32;
        self.t += 1;

        let is_terminated = self.ale.is_game_over();
        let is_truncated = !is_terminated && self.max_steps.map_or(false, |m| self.t >= m);
        let obs = self.frame()?;

        Ok((
            Step::new(obs, reward, is_terminated, is_truncated),
            Record::empty(),
        ))
    }
}
