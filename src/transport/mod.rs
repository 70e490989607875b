//! # Printer Transport Layer
//!
//! This module provides the bulk-transfer backends a
//! [`ProtocolSession`](crate::session::ProtocolSession) talks through.
//!
//! ## Available Transports
//!
//! - [`usb`]: libusb bulk transfers via `rusb`
//! - [`memory`]: in-memory recorder with scripted replies, for tests and
//!   for writing print jobs to a file

pub mod memory;
pub mod usb;

pub use memory::MemoryTransport;
pub use usb::UsbTransport;

use crate::error::PtouchError;

/// # Bulk Transport
///
/// Blocking bulk-transfer I/O with one device. Every call blocks until the
/// transfer completes or the backend's own timeout fires. Implementations
/// are owned by exactly one session and need no internal locking.
pub trait BulkTransport {
    /// Take ownership of interface 0.
    ///
    /// Detaches any kernel driver bound to it, selects the device
    /// configuration and claims the interface. Returns the address of the
    /// interface's first OUT endpoint, or `None` if it has none.
    fn open_interface(&mut self) -> Result<Option<u8>, PtouchError>;

    /// Write one frame. Returns the number of bytes the device accepted.
    fn write(&mut self, endpoint: u8, data: &[u8]) -> Result<usize, PtouchError>;

    /// Read into `buf`. Returns the number of bytes received; a transfer
    /// that times out with no data returns `Ok(0)`.
    fn read(&mut self, endpoint: u8, buf: &mut [u8]) -> Result<usize, PtouchError>;

    /// One-line description for logs and listings
    fn describe(&self) -> String;
}
