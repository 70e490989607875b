//! # P-touch Protocol Implementation
//!
//! Low-level command builders and codecs for the Brother P-touch raster
//! protocol.
//!
//! ## Module Structure
//!
//! - [`commands`]: Fixed control commands and wire constants
//! - [`raster`]: Bitmap to raster-line frames
//! - [`status`]: 32-byte status reply decoding
//!
//! ## Usage Example
//!
//! ```
//! use ptouch::printer::DeviceDescriptor;
//! use ptouch::protocol::{commands, raster::{Finish, RasterEncoder}};
//! use ptouch::render::MonoBitmap;
//!
//! let mut data = Vec::new();
//!
//! // Initialize printer
//! data.extend(commands::init());
//!
//! // A 20-column label with a horizontal bar through the middle
//! let bitmap = MonoBitmap::from_fn(20, 8, |_, y| y == 4);
//! let encoder = RasterEncoder::new(&DeviceDescriptor::PT_P750W)?;
//! for frame in encoder.encode(&bitmap, Finish::Cut) {
//!     data.extend(frame);
//! }
//!
//! // 2 init + 2 M02 + 4 raster start + 20 * (4 + 16) lines + 1 cut
//! assert_eq!(data.len(), 2 + 2 + 4 + 20 * 20 + 1);
//! # Ok::<(), ptouch::PtouchError>(())
//! ```

pub mod commands;
pub mod raster;
pub mod status;
