//! # Dithering
//!
//! Converts grayscale images to the black/white [`MonoBitmap`] a label
//! printer can print.
//!
//! ## Algorithms
//!
//! | Method | Speed | Quality | Artifacts |
//! |--------|-------|---------|-----------|
//! | Threshold | Fastest | Poor on photos | Banding |
//! | Bayer | Fast | Good | Regular pattern |
//! | Floyd-Steinberg | Slow | Better | Noise, worms |
//!
//! Labels are mostly text and line art, where [`DitheringAlgorithm::Threshold`]
//! keeps edges crisp. Photos and logos with gradients look better with
//! [`DitheringAlgorithm::FloydSteinberg`].
//!
//! ## Intensity
//!
//! All algorithms work on darkness: `intensity = 1 - luma / 255`, so
//! 0.0 = white (no dot) and 1.0 = black (dot).
//!
//! ```
//! use image::{GrayImage, Luma};
//! use ptouch::render::dither::{self, DitheringAlgorithm};
//!
//! let img = GrayImage::from_pixel(8, 8, Luma([0]));
//! let bitmap = dither::dither(&img, DitheringAlgorithm::FloydSteinberg);
//! assert_eq!(bitmap.marked_count(), 64);
//! ```

use std::str::FromStr;

use image::GrayImage;

use super::bitmap::MonoBitmap;

/// Bayer 8x8 dithering matrix
///
/// Values range from 0-63. Low values activate first at low intensities.
pub const BAYER8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Binarization method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitheringAlgorithm {
    /// Fixed 50% cut
    #[default]
    Threshold,
    /// Ordered 8x8 Bayer matrix
    Bayer,
    /// Error diffusion
    FloydSteinberg,
}

impl FromStr for DitheringAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "threshold" | "none" => Ok(Self::Threshold),
            "bayer" => Ok(Self::Bayer),
            "floyd-steinberg" | "floyd_steinberg" | "fs" => Ok(Self::FloydSteinberg),
            other => Err(format!(
                "Unknown dithering '{}'. Use threshold, bayer or floyd-steinberg",
                other
            )),
        }
    }
}

/// Get the Bayer threshold for a pixel position.
///
/// Returns a value in (0, 1): `(BAYER8[y mod 8][x mod 8] + 0.5) / 64`.
/// The half step keeps pure black always printing and pure white never.
#[inline]
pub fn bayer_threshold(x: usize, y: usize) -> f32 {
    let matrix_value = BAYER8[y & 7][x & 7];
    (matrix_value as f32 + 0.5) / 64.0
}

#[inline]
fn intensity(luma: u8) -> f32 {
    1.0 - luma as f32 / 255.0
}

/// Convert a grayscale image with the chosen algorithm.
pub fn dither(img: &GrayImage, algorithm: DitheringAlgorithm) -> MonoBitmap {
    let (width, height) = (img.width() as usize, img.height() as usize);
    let at = |x: usize, y: usize| intensity(img.get_pixel(x as u32, y as u32).0[0]);

    match algorithm {
        DitheringAlgorithm::Threshold => MonoBitmap::from_fn(width, height, |x, y| at(x, y) > 0.5),
        DitheringAlgorithm::Bayer => {
            MonoBitmap::from_fn(width, height, |x, y| at(x, y) > bayer_threshold(x, y))
        }
        DitheringAlgorithm::FloydSteinberg => floyd_steinberg(width, height, at),
    }
}

/// Floyd-Steinberg error diffusion, left to right, top to bottom.
///
/// ```text
///          *   7/16
///   3/16 5/16  1/16
/// ```
fn floyd_steinberg<F>(width: usize, height: usize, at: F) -> MonoBitmap
where
    F: Fn(usize, usize) -> f32,
{
    let mut levels: Vec<f32> = (0..width * height)
        .map(|i| at(i % width, i / width))
        .collect();
    let mut bitmap = MonoBitmap::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let old = levels[y * width + x];
            let marked = old > 0.5;
            let error = old - if marked { 1.0 } else { 0.0 };
            if marked {
                bitmap.set(x, y, true);
            }

            let mut spread = |dx: isize, dy: usize, weight: f32| {
                let nx = x as isize + dx;
                let ny = y + dy;
                if nx >= 0 && (nx as usize) < width && ny < height {
                    levels[ny * width + nx as usize] += error * weight;
                }
            };
            spread(1, 0, 7.0 / 16.0);
            spread(-1, 1, 3.0 / 16.0);
            spread(0, 1, 5.0 / 16.0);
            spread(1, 1, 1.0 / 16.0);
        }
    }

    bitmap
}

// ============================================================================
// TESTS
// ============================================================================
