//! Raw screen frame preprocessing
//!
//! Converts the color frame delivered by the emulator once per tick into the
//! fixed-resolution grayscale frame the network consumes: luminance
//! conversion followed by an area-averaging downsample to 84x84.

use anyhow::{bail, Result};
use image::{ImageBuffer, Luma, RgbImage};

/// Side length of a preprocessed frame, in pixels
pub const FRAME_SIZE: u32 = 84;

/// Single-channel 8-bit frame produced by preprocessing
pub type GrayFrame = ImageBuffer<Luma<u8>, Vec<u8>>;

// ITU-R BT.601 luminance weights for 8-bit RGB
const LUMA_RED: f32 = 0.299;
const LUMA_GREEN: f32 = 0.587;
const LUMA_BLUE: f32 = 0.114;

/// Preprocess a raw color observation into a network-ready frame
///
/// Reduces the 3-channel frame to its luminance channel, then downsamples to
/// [`FRAME_SIZE`] x [`FRAME_SIZE`] by area averaging. The result depends only
/// on the input frame, so repeated calls on the same observation yield
/// identical output.
///
/// # Errors
///
/// Fails if the observation has a zero width or height.
///
/// # Example
///
/// ```rust
/// use image::RgbImage;
/// use ml_platformer::vision::preprocess;
///
/// let observation = RgbImage::new(256, 240);
/// let frame = preprocess(&observation).unwrap();
/// assert_eq!(frame.dimensions(), (84, 84));
/// ```
pub fn preprocess(raw: &RgbImage) -> Result<GrayFrame> {
    let (width, height) = raw.dimensions();
    if width == 0 || height == 0 {
        bail!("degenerate observation: {}x{} pixels", width, height);
    }

    let gray = to_luminance(raw);
    Ok(resize_area(&gray, FRAME_SIZE, FRAME_SIZE))
}

/// Collapse an RGB frame to its BT.601 luminance channel
fn to_luminance(raw: &RgbImage) -> GrayFrame {
    let (width, height) = raw.dimensions();
    let mut gray = GrayFrame::new(width, height);
    for (x, y, pixel) in raw.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let luma =
            LUMA_RED * f32::from(r) + LUMA_GREEN * f32::from(g) + LUMA_BLUE * f32::from(b);
        gray.put_pixel(x, y, Luma([luma.round() as u8]));
    }
    gray
}

/// Downsample by area averaging
///
/// Each output pixel is the coverage-weighted mean of every input pixel its
/// footprint spans, including fractional rows and columns at the edges of the
/// footprint. A constant input therefore maps to the same constant output.
fn resize_area(src: &GrayFrame, out_width: u32, out_height: u32) -> GrayFrame {
    let (in_width, in_height) = src.dimensions();
    if (in_width, in_height) == (out_width, out_height) {
        return src.clone();
    }

    let scale_x = f64::from(in_width) / f64::from(out_width);
    let scale_y = f64::from(in_height) / f64::from(out_height);

    let mut out = GrayFrame::new(out_width, out_height);
    for (ox, oy, pixel) in out.enumerate_pixels_mut() {
        let x0 = f64::from(ox) * scale_x;
        let x1 = x0 + scale_x;
        let y0 = f64::from(oy) * scale_y;
        let y1 = y0 + scale_y;

        let mut acc = 0.0;
        for iy in y0.floor() as u32..(y1.ceil() as u32).min(in_height) {
            let cover_y = span_overlap(iy, y0, y1);
            if cover_y == 0.0 {
                continue;
            }
            for ix in x0.floor() as u32..(x1.ceil() as u32).min(in_width) {
                let cover_x = span_overlap(ix, x0, x1);
                if cover_x == 0.0 {
                    continue;
                }
                acc += cover_x * cover_y * f64::from(src.get_pixel(ix, iy).0[0]);
            }
        }

        *pixel = Luma([(acc / (scale_x * scale_y)).round() as u8]);
    }
    out
}

/// Length of the overlap between input pixel `i` (spanning [i, i+1)) and the
/// interval [a, b)
fn span_overlap(i: u32, a: f64, b: f64) -> f64 {
    (b.min(f64::from(i) + 1.0) - a.max(f64::from(i))).max(0.0)
}
