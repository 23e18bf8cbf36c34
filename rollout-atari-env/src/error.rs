//! Errors of Atari environments.
use std::path::PathBuf;
use thiserror::Error;

/// Errors of Atari environments.
#[derive(Error, Debug)]
pub enum AtariEnvError {
    /// The pixel buffer does not match the frame size.
    #[error("Frame of {width}x{height} RGB pixels needs {expected} bytes, got {actual}")]
    FrameShapeError {
        /// Width of the frame.
        width: u32,
        /// Height of the frame.
        height: u32,
        /// Expected buffer length.
        expected: usize,
        /// Actual buffer length.
        actual: usize,
    },

    /// The ROM image of the game was not found.
    #[error("ROM not found: {0:?}")]
    RomNotFound(PathBuf),

    /// The action is not in the action set of the game.
    #[error("Action {act} is out of the {n} available actions")]
    ActionOutOfRange {
        /// Index of the action.
        act: usize,
        /// The number of available actions.
        n: usize,
    },
}
