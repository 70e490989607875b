//! # Raster Line Encoding
//!
//! Turns a monochrome [`Bitmap`] into the command frames of one print job.
//!
//! ## Coordinate System
//!
//! The tape moves past a vertical print head. Each image **column** becomes
//! one raster line; the image **height** runs across the tape.
//!
//! ```text
//!        image x (tape feed direction) ──────────►
//!      ┌──────────────────────────────┐  ▲ bit 0 of byte N-1  (bottom of head)
//!      │  ███  █   █ ███              │  │
//!      │  █  █ █   █ █                │  │ pixel offset = centering offset + y
//!      │  ███   █ █  ██               │  │ (y counted from the image bottom)
//!      │  █      █   ███              │  │
//!      └──────────────────────────────┘  ▼ bit 7 of byte 0    (top of head)
//! ```
//!
//! ## Bit Packing
//!
//! A raster line is `max_pixel_buffer / 8` bytes. Pixel offset `p` (from the
//! bottom of the head) sets bit `p % 8` of byte `(N - 1) - p / 8`, so the
//! buffer is addressed from its last byte backward:
//!
//! ```text
//! p = 0  → byte N-1, bit 0 (0x01)
//! p = 7  → byte N-1, bit 7 (0x80)
//! p = 8  → byte N-2, bit 0
//! ```
//!
//! The image is centered on the head:
//! `offset = max_pixel_buffer / 2 - height / 2`. Offsets outside the head are
//! dropped, so a too-tall image is clipped rather than rejected.
//!
//! ## Frame Layout
//!
//! | Byte | Value | Meaning |
//! |------|-------|---------|
//! | 0 | 0x47 | 'G' raster line |
//! | 1 | len + 1 | payload length, low byte (literal header + data) |
//! | 2 | 0x00 | payload length, high byte |
//! | 3 | len - 1 | PackBits literal run header |
//! | 4.. | data | raster line bytes |
//!
//! Every line is framed as a single PackBits literal run, which the printer
//! decodes identically whether or not compression mode is enabled.

use tracing::{debug, warn};

use super::commands;
use crate::error::PtouchError;
use crate::printer::DeviceDescriptor;
use crate::render::Bitmap;

/// Largest raster line a one-byte length field can frame
pub const MAX_LINE_BYTES: usize = 254;

/// How a print job ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Finish {
    /// Print and cut the tape
    #[default]
    Cut,
    /// Print and feed without cutting
    Advance,
}

impl Finish {
    pub fn from_cut_tape(cut_tape: bool) -> Self {
        if cut_tape { Self::Cut } else { Self::Advance }
    }

    /// Terminating command for this finish
    pub fn command(self) -> Vec<u8> {
        match self {
            Self::Cut => commands::eject(),
            Self::Advance => commands::advance(),
        }
    }
}

/// # Raster Encoder
///
/// Encodes bitmaps for one device. Holds only a reference to the static
/// descriptor.
///
/// ## Example
///
/// ```
/// use ptouch::printer::DeviceDescriptor;
/// use ptouch::protocol::raster::{Finish, RasterEncoder};
/// use ptouch::render::MonoBitmap;
///
/// let mut bitmap = MonoBitmap::new(1, 1);
/// bitmap.set(0, 0, true);
///
/// let encoder = RasterEncoder::new(&DeviceDescriptor::PT_P700).unwrap();
/// let frames = encoder.encode(&bitmap, Finish::Cut);
///
/// // M 02, ESC i a 01, one raster line, SUB
/// assert_eq!(frames.len(), 4);
/// assert_eq!(&frames[2][..4], &[0x47, 17, 0x00, 15]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RasterEncoder {
    device: &'static DeviceDescriptor,
    buffer_size: usize,
}

impl RasterEncoder {
    /// Create an encoder for a device.
    ///
    /// ## Errors
    ///
    /// - [`PtouchError::RasterUnsupported`] if the device cannot take raster data
    /// - [`PtouchError::InvalidCommand`] if its raster line cannot be framed
    pub fn new(device: &'static DeviceDescriptor) -> Result<Self, PtouchError> {
        if device.raster_unsupported {
            return Err(PtouchError::RasterUnsupported(device.name));
        }

        let buffer_size = device.buffer_size_bytes();
        if buffer_size == 0 || buffer_size > MAX_LINE_BYTES {
            return Err(PtouchError::InvalidCommand(format!(
                "{}: raster line of {} bytes cannot be framed (1..={})",
                device.name, buffer_size, MAX_LINE_BYTES
            )));
        }

        Ok(Self {
            device,
            buffer_size,
        })
    }

    pub fn device(&self) -> &'static DeviceDescriptor {
        self.device
    }

    /// Bytes per raster line
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Commands sent before the first raster line.
    pub fn preamble(&self) -> Vec<Vec<u8>> {
        let mut frames = Vec::with_capacity(2);
        if self.device.supports_compression {
            frames.push(commands::enable_compression());
        }
        if self.device.requires_alternate_init {
            frames.push(commands::raster_start_alternate());
        } else {
            frames.push(commands::raster_start());
        }
        frames
    }

    /// Pixel offset of the image's bottom row. Negative when the image is
    /// taller than the head.
    pub fn centering_offset(&self, image_height: usize) -> i64 {
        self.device.max_pixel_buffer as i64 / 2 - image_height as i64 / 2
    }

    /// Build the raster line for one image column.
    pub fn raster_line<B: Bitmap + ?Sized>(&self, bitmap: &B, x: usize) -> Vec<u8> {
        let height = bitmap.height();
        let offset = self.centering_offset(height);
        let mut line = vec![0u8; self.buffer_size];

        for y in 0..height {
            if bitmap.is_marked(x, height - 1 - y) {
                set_pixel(&mut line, offset + y as i64);
            }
        }

        line
    }

    /// Stream a whole job: preamble, one frame per column, finish command.
    ///
    /// Raster lines are built lazily, one column at a time.
    pub fn frames<'b, B: Bitmap + ?Sized>(
        &'b self,
        bitmap: &'b B,
        finish: Finish,
    ) -> impl Iterator<Item = Vec<u8>> + 'b {
        self.warn_if_clipped(bitmap.height());
        self.preamble()
            .into_iter()
            .chain((0..bitmap.width()).map(move |x| frame(&self.raster_line(bitmap, x))))
            .chain(std::iter::once(finish.command()))
    }

    /// Encode a whole job into a list of frames.
    pub fn encode<B: Bitmap + ?Sized>(&self, bitmap: &B, finish: Finish) -> Vec<Vec<u8>> {
        let frames: Vec<Vec<u8>> = self.frames(bitmap, finish).collect();
        debug!(
            device = self.device.name,
            columns = bitmap.width(),
            rows = bitmap.height(),
            frames = frames.len(),
            "encoded raster job"
        );
        frames
    }

    fn warn_if_clipped(&self, height: usize) {
        let offset = self.centering_offset(height);
        let head = (self.buffer_size * 8) as i64;
        let clipped = (0..height as i64)
            .filter(|y| !(0..head).contains(&(offset + y)))
            .count();
        if clipped > 0 {
            warn!(
                device = self.device.name,
                height, clipped, "image taller than print head, clipping rows"
            );
        }
    }
}

/// Set the bit for a pixel offset counted from the bottom of the head.
///
/// Offsets outside the line are ignored.
///
/// ```
/// use ptouch::protocol::raster::set_pixel;
///
/// let mut line = vec![0u8; 2];
/// set_pixel(&mut line, 0);
/// set_pixel(&mut line, 15);
/// set_pixel(&mut line, 16); // off the end, dropped
/// assert_eq!(line, vec![0x80, 0x01]);
/// ```
#[inline]
pub fn set_pixel(line: &mut [u8], pixel_offset: i64) {
    let bits = line.len() as i64 * 8;
    if !(0..bits).contains(&pixel_offset) {
        return;
    }
    let p = pixel_offset as usize;
    let index = (line.len() - 1) - p / 8;
    line[index] |= 1 << (p % 8);
}

/// Wrap a raster line in its frame header.
///
/// `line` must be `1..=MAX_LINE_BYTES` long; [`RasterEncoder::new`] rejects
/// every descriptor whose lines fall outside that range.
pub(crate) fn frame(line: &[u8]) -> Vec<u8> {
    debug_assert!(
        (1..=MAX_LINE_BYTES).contains(&line.len()),
        "raster line must be 1..={} bytes, got {}",
        MAX_LINE_BYTES,
        line.len()
    );

    let len = line.len() as u8;
    let mut cmd = Vec::with_capacity(4 + line.len());
    cmd.push(commands::RASTER_LINE);
    cmd.push(len + 1);
    cmd.push(0x00);
    cmd.push(len - 1);
    cmd.extend_from_slice(line);
    cmd
}

// ============================================================================
// TESTS
// ============================================================================
