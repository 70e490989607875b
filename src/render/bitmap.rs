//! # Monochrome Bitmaps
//!
//! The raster encoder reads images through the [`Bitmap`] trait: a width, a
//! height and a per-pixel "is this dot printed" predicate. Layout and
//! typesetting happen elsewhere; by the time an image reaches this crate it
//! is already black and white.

use image::GrayImage;

/// Read-only monochrome image
pub trait Bitmap {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Whether the dot at `(x, y)` is printed. `(0, 0)` is the top-left.
    fn is_marked(&self, x: usize, y: usize) -> bool;
}

/// Luma below this value counts as a printed dot
pub const GRAY_THRESHOLD: u8 = 128;

/// Grayscale images are read with a fixed 50% threshold. Use
/// [`super::dither`] for anything that is not already black and white.
impl Bitmap for GrayImage {
    fn width(&self) -> usize {
        self.dimensions().0 as usize
    }

    fn height(&self) -> usize {
        self.dimensions().1 as usize
    }

    fn is_marked(&self, x: usize, y: usize) -> bool {
        self.get_pixel(x as u32, y as u32).0[0] < GRAY_THRESHOLD
    }
}

/// # Owned Monochrome Bitmap
///
/// Row-major grid of dots, `true` = printed.
///
/// ```
/// use ptouch::render::{Bitmap, MonoBitmap};
///
/// let mut bitmap = MonoBitmap::new(3, 2);
/// bitmap.set(2, 1, true);
/// assert!(bitmap.is_marked(2, 1));
/// assert!(!bitmap.is_marked(0, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonoBitmap {
    width: usize,
    height: usize,
    dots: Vec<bool>,
}

impl MonoBitmap {
    /// Create an all-white bitmap
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            dots: vec![false; width * height],
        }
    }

    /// Build a bitmap from a predicate evaluated at every position
    pub fn from_fn<F>(width: usize, height: usize, mut marked: F) -> Self
    where
        F: FnMut(usize, usize) -> bool,
    {
        let mut bitmap = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                bitmap.dots[y * width + x] = marked(x, y);
            }
        }
        bitmap
    }

    /// Set or clear one dot. Panics if out of bounds.
    pub fn set(&mut self, x: usize, y: usize, marked: bool) {
        assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        self.dots[y * self.width + x] = marked;
    }

    /// Number of printed dots
    pub fn marked_count(&self) -> usize {
        self.dots.iter().filter(|&&d| d).count()
    }
}

impl Bitmap for MonoBitmap {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn is_marked(&self, x: usize, y: usize) -> bool {
        self.dots[y * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_new_is_blank() {
        let bitmap = MonoBitmap::new(4, 3);
        assert_eq!(bitmap.width(), 4);
        assert_eq!(bitmap.height(), 3);
        assert_eq!(bitmap.marked_count(), 0);
    }

    #[test]
    fn test_from_fn() {
        let bitmap = MonoBitmap::from_fn(4, 4, |x, y| x == y);
        assert_eq!(bitmap.marked_count(), 4);
        assert!(bitmap.is_marked(2, 2));
        assert!(!bitmap.is_marked(2, 1));
    }

    #[test]
    #[should_panic]
    fn test_set_out_of_bounds() {
        MonoBitmap::new(2, 2).set(2, 0, true);
    }

    #[test]
    fn test_gray_image_threshold() {
        let mut img = GrayImage::new(3, 1);
        img.put_pixel(0, 0, Luma([0]));
        img.put_pixel(1, 0, Luma([127]));
        img.put_pixel(2, 0, Luma([128]));

        assert_eq!(Bitmap::width(&img), 3);
        assert!(img.is_marked(0, 0));
        assert!(img.is_marked(1, 0));
        assert!(!img.is_marked(2, 0));
    }
}
