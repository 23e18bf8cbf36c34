//! Frame preprocessing.
use crate::{AtariObs, RawFrame, FRAME_SIZE};
use image::imageops::{resize, FilterType::Triangle};
use ndarray::Array3;

/// Size of the intermediate image of the two-stage resize.
const INTERMEDIATE_SIZE: u32 = 80;

/// Downsamples a frame to a `42x42x3` observation with values in `[0, 1]`.
///
/// Resizing to 80x80 first and then to 42x42 approximates mipmapping: a direct
/// bilinear resize would skip pixels that fall between sampling points.
pub fn process_frame42(frame: &RawFrame) -> AtariObs {
    let size = FRAME_SIZE as u32;
    let img = resize(frame.image(), INTERMEDIATE_SIZE, INTERMEDIATE_SIZE, Triangle);
    let img = resize(&img, size, size, Triangle);

    let frame = Array3::from_shape_fn((FRAME_SIZE, FRAME_SIZE, 3), |(y, x, c)| {
        img.get_pixel(x as u32, y as u32)[c] as f32 * (1.0 / 255.0)
    });

    AtariObs { frame }
}
