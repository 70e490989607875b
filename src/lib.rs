//! # ptouch - Brother P-touch Label Printer Driver
//!
//! ptouch drives Brother P-touch thermal label printers (PT-P700, PT-P750W
//! and relatives) over USB bulk transfers. It provides:
//!
//! - **Discovery**: Match attached USB devices against known models
//! - **Session**: Initialization, command framing and status polling
//! - **Status decoding**: Loaded tape size and colors from the 32-byte reply
//! - **Raster encoding**: Monochrome bitmaps to raster-line frames
//!
//! ## Quick Start
//!
//! ```no_run
//! use ptouch::{discovery, render::{self, dither}, session::SessionConfig};
//!
//! let mut printer = discovery::first_printer(SessionConfig::default())?
//!     .expect("no printer attached");
//!
//! printer.init()?;
//! let status = printer.printer_status()?;
//! println!("Loaded: {}", status); // e.g. "12mm Black on White"
//!
//! let img = render::load_gray("label.png")?;
//! let bitmap = dither::dither(&img, dither::DitheringAlgorithm::Threshold);
//! printer.print_image(&bitmap, true)?;
//!
//! # Ok::<(), ptouch::error::PtouchError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`discovery`] | USB enumeration |
//! | [`session`] | Protocol session state machine |
//! | [`protocol`] | Command builders, raster encoder, status decoder |
//! | [`printer`] | Device registry, tape and color tables |
//! | [`render`] | Bitmap input and dithering |
//! | [`transport`] | USB and in-memory backends |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! See [`printer::registry`]. Every supported model has a 128-dot,
//! 180 DPI print head.

pub mod discovery;
pub mod error;
pub mod printer;
pub mod protocol;
pub mod render;
pub mod session;
pub mod transport;

// Re-exports for convenience
pub use error::PtouchError;
pub use printer::DeviceDescriptor;
pub use session::{ProtocolSession, SessionConfig};
pub use transport::{MemoryTransport, UsbTransport};
