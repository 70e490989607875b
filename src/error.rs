//! # Error Types
//!
//! This module defines error types used throughout the ptouch library.
//!
//! None of these are recovered inside the library. The only internal
//! recovery is the bounded status poll in
//! [`ProtocolSession::query_status`](crate::session::ProtocolSession::query_status),
//! which absorbs short or empty reads until its attempt budget runs out.

use thiserror::Error;

/// Main error type for ptouch operations
#[derive(Debug, Error)]
pub enum PtouchError {
    /// A command other than initialize was sent before `init()` succeeded
    #[error("Device must be initialized before use. Call ProtocolSession::init() first")]
    ProtocolNotInitialized,

    /// The session hit a fatal error earlier and must be re-initialized
    #[error("Session is in a failed state; re-discover or re-initialize the device")]
    SessionFailed,

    /// The device accepted fewer bytes than the frame contained
    #[error("Short write: sent {written} of {expected} bytes")]
    IoWrite { expected: usize, written: usize },

    /// No usable status reply within the retry budget
    #[error("Unable to read printer status: no reply after {attempts} attempts")]
    StatusTimeout { attempts: u32 },

    /// A reply arrived but is not a valid status reply
    #[error("Invalid status reply ({reason}): {raw:02X?}")]
    InvalidStatusReply { reason: &'static str, raw: Vec<u8> },

    /// The loaded media width has no entry in the tape table
    #[error("Unsupported tape size {media_width}mm at {dpi} DPI")]
    UnsupportedTape { media_width: u8, dpi: u16 },

    /// A color code has no entry in its lookup table
    #[error("Unknown {table} color code 0x{code:02X}")]
    UnknownColorCode { table: &'static str, code: u8 },

    /// The bulk-OUT endpoint is missing or not at the protocol address
    #[error("Bulk-OUT endpoint mismatch: expected 0x{expected:02X}, found {}", fmt_endpoint(.found))]
    EndpointMismatch { expected: u8, found: Option<u8> },

    /// The descriptor marks the device as unable to receive raster data
    #[error("{0} does not support raster printing")]
    RasterUnsupported(&'static str),

    /// Discovery found no supported device
    #[error("No supported printer detected")]
    NoPrinter,

    /// Invalid command or parameter
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Image loading or conversion error
    #[error("Image error: {0}")]
    Image(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// USB stack error
    #[error("USB error: {0}")]
    Usb(#[from] rusb::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn fmt_endpoint(found: &Option<u8>) -> String {
    match found {
        Some(address) => format!("0x{:02X}", address),
        None => "none".to_string(),
    }
}
