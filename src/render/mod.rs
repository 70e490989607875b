//! # Rendering Module
//!
//! Monochrome image input for the raster encoder.
//!
//! ## Modules
//!
//! - [`bitmap`]: The [`Bitmap`] trait and an owned [`MonoBitmap`]
//! - [`dither`]: Grayscale to black/white conversion
//!
//! ## Usage Example
//!
//! ```
//! use image::{GrayImage, Luma};
//! use ptouch::render::{Bitmap, dither::{self, DitheringAlgorithm}};
//!
//! // A 100x64 mid-gray label
//! let img = GrayImage::from_pixel(100, 64, Luma([128]));
//! let bitmap = dither::dither(&img, DitheringAlgorithm::Bayer);
//!
//! assert_eq!(bitmap.width(), 100);
//! assert_eq!(bitmap.height(), 64);
//! ```

pub mod bitmap;
pub mod dither;

pub use bitmap::{Bitmap, MonoBitmap};

use std::path::Path;

use image::GrayImage;

use crate::error::PtouchError;

/// Load an image file as grayscale.
///
/// Transparent pixels are treated as white paper, not as black.
pub fn load_gray<P: AsRef<Path>>(path: P) -> Result<GrayImage, PtouchError> {
    let path = path.as_ref();
    let img = image::open(path)
        .map_err(|e| PtouchError::Image(format!("Failed to open {}: {}", path.display(), e)))?
        .to_rgba8();

    let mut gray = GrayImage::new(img.width(), img.height());
    for (x, y, pixel) in img.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let luma = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
        // composite over white
        let alpha = a as u32;
        let blended = (luma * alpha + 255 * (255 - alpha)) / 255;
        gray.put_pixel(x, y, image::Luma([blended as u8]));
    }

    Ok(gray)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file() {
        let err = load_gray("/nonexistent/label.png").unwrap_err();
        assert!(matches!(err, PtouchError::Image(_)));
    }

    #[test]
    fn test_load_composites_alpha_over_white() {
        let dir = std::env::temp_dir().join(format!("ptouch-load-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("alpha.png");

        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([0, 0, 0, 0])); // transparent black
        img.put_pixel(1, 0, image::Rgba([0, 0, 0, 255])); // opaque black
        img.save(&path).unwrap();

        let gray = load_gray(&path).unwrap();
        assert_eq!(gray.get_pixel(0, 0).0[0], 255);
        assert_eq!(gray.get_pixel(1, 0).0[0], 0);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
