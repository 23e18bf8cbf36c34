//! Observations of Atari environments.
use crate::AtariEnvError;
use anyhow::Result;
use image::RgbImage;
use ndarray::Array3;
use rollout_core::Obs;

/// Side length of preprocessed frames.
pub const FRAME_SIZE: usize = 42;

/// A screen rendered by the emulator, RGB with 8 bits per channel.
#[derive(Debug, Clone)]
pub struct RawFrame {
    img: RgbImage,
}

impl RawFrame {
    /// Builds a frame from a row-major RGB buffer.
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        let actual = data.len();
        match RgbImage::from_raw(width, height, data) {
            Some(img) if actual == expected => Ok(Self { img }),
            _ => Err(AtariEnvError::FrameShapeError {
                width,
                height,
                expected,
                actual,
            }
            .into()),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.img.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.img.height()
    }

    pub(crate) fn image(&self) -> &RgbImage {
        &self.img
    }
}

impl Obs for RawFrame {
    fn dummy() -> Self {
        Self {
            img: RgbImage::new(1, 1),
        }
    }
}

/// Preprocessed observation, a `42x42x3` array of values in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AtariObs {
    pub(crate) frame: Array3<f32>,
}

impl AtariObs {
    /// Shape of the observation, `[height, width, channel]`.
    pub fn shape(&self) -> &[usize] {
        self.frame.shape()
    }

    /// Returns the underlying array.
    pub fn frame(&self) -> &Array3<f32> {
        &self.frame
    }

    /// Returns the pixel values in row-major (height, width, channel) order.
    pub fn to_vec(&self) -> Vec<f32> {
        self.frame.iter().copied().collect()
    }
}

impl From<Array3<f32>> for AtariObs {
    fn from(frame: Array3<f32>) -> Self {
        Self { frame }
    }
}

impl Obs for AtariObs {
    fn dummy() -> Self {
        Self {
            frame: Array3::zeros((FRAME_SIZE, FRAME_SIZE, 3)),
        }
    }
}

#[cfg(feature = "tch")]
impl From<AtariObs> for tch::Tensor {
    /// Converts into a batch of one observation, `[1, 42, 42, 3]`.
    fn from(obs: AtariObs) -> tch::Tensor {
        let shape = [1, obs.frame.shape()[0], obs.frame.shape()[1], obs.frame.shape()[2]]
            .iter()
            .map(|&d| d as i64)
            .collect::<Vec<_>>();
        tch::Tensor::from_slice(&obs.to_vec()).reshape(shape.as_slice())
    }
}
