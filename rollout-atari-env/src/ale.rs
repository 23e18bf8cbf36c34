//! Binding of the Arcade Learning Environment.
use crate::AtariEnvError;
use anyhow::{Context, Result};
use c_str_macro::c_str;
use std::ffi::CString;
use std::path::{Path, PathBuf};

// Variants are written by the emulator in `minimal_actions()`.
#[allow(dead_code)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum AleAction {
    Noop = 0,
    Fire = 1,
    Up = 2,
    Right = 3,
    Left = 4,
    Down = 5,
    UpRight = 6,
    UpLeft = 7,
    DownRight = 8,
    DownLeft = 9,
    UpFire = 10,
    RightFire = 11,
    LeftFire = 12,
    DownFire = 13,
    UpRightFire = 14,
    UpLeftFire = 15,
    DownRightFire = 16,
    DownLeftFire = 17,
}

pub struct AleConfig {
    pub random_seed: i32, // if 0, set to time
    pub frame_skip: i32,  // 1 is no skip
    pub repeat_action_probability: f32,
    pub record_screen_dir: Option<PathBuf>,
}

fn c_path(path: &Path) -> Result<CString> {
    let path = path
        .to_str()
        .with_context(|| format!("Non UTF-8 path: {:?}", path))?;
    Ok(CString::new(path)?)
}

pub struct Ale {
    inner: *mut atari_env_sys::ALEInterface,
}

impl Drop for Ale {
    fn drop(&mut self) {
        unsafe {
            atari_env_sys::ALE_del(self.inner);
        }
    }
}

impl Ale {
    pub fn new(rom_path: &Path, config: AleConfig) -> Result<Self> {
        if !rom_path.is_file() {
            return Err(AtariEnvError::RomNotFound(rom_path.to_path_buf()).into());
        }
        let rom_path = c_path(rom_path)?;
        let record_screen_dir = match config.record_screen_dir.as_ref() {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                Some(c_path(dir)?)
            }
            None => None,
        };

        let ale = unsafe { atari_env_sys::ALE_new() };
        unsafe {
            atari_env_sys::setInt(ale, c_str!("random_seed").as_ptr(), config.random_seed);
            atari_env_sys::setBool(ale, c_str!("display_screen").as_ptr(), false);
            atari_env_sys::setBool(ale, c_str!("sound").as_ptr(), false);
            atari_env_sys::setBool(ale, c_str!("color_averaging").as_ptr(), false);
            atari_env_sys::setInt(ale, c_str!("frame_skip").as_ptr(), config.frame_skip);
            atari_env_sys::setFloat(
                ale,
                c_str!("repeat_action_probability").as_ptr(),
                config.repeat_action_probability,
            );
            if let Some(dir) = record_screen_dir.as_ref() {
                atari_env_sys::setString(ale, c_str!("record_screen_dir").as_ptr(), dir.as_ptr());
            }
            atari_env_sys::loadROM(ale, rom_path.as_ptr());
            atari_env_sys::reset_game(ale);
        }

        Ok(Self { inner: ale })
    }

    pub fn minimal_actions(&self) -> Vec<AleAction> {
        let n = unsafe { atari_env_sys::getMinimalActionSize(self.inner) } as usize;
        let mut buf = vec![AleAction::Noop; n];
        unsafe {
            atari_env_sys::getMinimalActionSet(self.inner, buf.as_mut_ptr() as *mut i32);
        }
        buf
    }

    pub fn is_game_over(&self) -> bool {
        unsafe { atari_env_sys::game_over(self.inner) }
    }

    pub fn reset(&mut self) {
        unsafe {
            atari_env_sys::reset_game(self.inner);
        }
    }

    /// returns reward
    pub fn take_action(&mut self, action: AleAction) -> i32 {
        let ret: ::std::os::raw::c_int = unsafe { atari_env_sys::act(self.inner, action as i32) };
        ret.into()
    }

    pub fn width(&self) -> u32 {
        unsafe { atari_env_sys::getScreenWidth(self.inner) as u32 }
    }

    pub fn height(&self) -> u32 {
        unsafe { atari_env_sys::getScreenHeight(self.inner) as u32 }
    }

    pub fn rgb24_size(&self) -> usize {
        (self.width() as usize) * (self.height() as usize) * 3
    }

    /// always rgb in regardless of endianness
    pub fn rgb24(&self, buf: &mut [u8]) {
        debug_assert_eq!(buf.len(), self.rgb24_size());
        unsafe {
            atari_env_sys::getScreenRGB2(self.inner, buf.as_mut_ptr());
        }
    }
}
