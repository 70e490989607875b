//! # Protocol Session
//!
//! A [`ProtocolSession`] owns one opened printer and sequences everything
//! sent to it: initialization, commands, status polling and print jobs.
//!
//! ## State Machine
//!
//! ```text
//!                  init() ok
//! Uninitialized ─────────────► Ready ◄──┐ send / query_status / print_image
//!       │                        │  └───┘
//!       │ init() error           │ any error
//!       ▼                        ▼
//!     Failed ◄───────────────────┘
//!       │
//!       └── init() again, or drop and re-discover
//! ```
//!
//! Only the initialize command may be sent before the session is Ready.
//!
//! ## Threading
//!
//! All I/O blocks the calling thread. A session is not synchronized; use
//! one session per physical device and do not interleave calls on it.
//!
//! ## Example
//!
//! ```
//! use ptouch::printer::DeviceDescriptor;
//! use ptouch::render::MonoBitmap;
//! use ptouch::session::{PollConfig, ProtocolSession, SessionConfig};
//! use ptouch::transport::MemoryTransport;
//!
//! let config = SessionConfig { poll: PollConfig::immediate(10), ..Default::default() };
//! let mut session = ProtocolSession::new(
//!     MemoryTransport::new(),
//!     &DeviceDescriptor::PT_P700,
//!     config,
//! );
//!
//! session.init()?;
//! session.print_image(&MonoBitmap::new(10, 10), true)?;
//!
//! // ESC @, M 02, ESC i a 01, 10 raster lines, SUB
//! assert_eq!(session.transport().writes().len(), 14);
//! # Ok::<(), ptouch::PtouchError>(())
//! ```

pub mod config;

pub use config::{PollConfig, SessionConfig};

use std::thread;

use tracing::{debug, info, warn};

use crate::error::PtouchError;
use crate::printer::DeviceDescriptor;
use crate::protocol::commands::{
    self, INPUT_ENDPOINT, LEGACY_REPLY_SIZE, OUTPUT_ENDPOINT, STATUS_MAGIC, STATUS_REPLY_SIZE,
};
use crate::protocol::raster::{Finish, RasterEncoder};
use crate::protocol::status::{PrinterStatus, StatusReply};
use crate::render::Bitmap;
use crate::transport::BulkTransport;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Opened but `init()` has not succeeded yet
    Uninitialized,
    /// Initialized and accepting commands
    Ready,
    /// A fatal error occurred; only `init()` is accepted
    Failed,
}

/// # Protocol Session
///
/// Binds a transport to the descriptor of the device behind it.
pub struct ProtocolSession<T: BulkTransport> {
    transport: T,
    device: &'static DeviceDescriptor,
    config: SessionConfig,
    state: SessionState,
}

impl<T: BulkTransport> ProtocolSession<T> {
    pub fn new(transport: T, device: &'static DeviceDescriptor, config: SessionConfig) -> Self {
        Self {
            transport,
            device,
            config,
            state: SessionState::Uninitialized,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == SessionState::Ready
    }

    pub fn device(&self) -> &'static DeviceDescriptor {
        self.device
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Model name plus transport description
    pub fn describe(&self) -> String {
        format!("{}: {}", self.device.name, self.transport.describe())
    }

    // ========================================================================
    // INITIALIZATION
    // ========================================================================

    /// Claim the device and send the initialize command.
    ///
    /// Verifies that the interface's OUT endpoint sits at
    /// [`OUTPUT_ENDPOINT`]; there is no retry. Can be called again after a
    /// failure to start over.
    pub fn init(&mut self) -> Result<(), PtouchError> {
        if self.device.reduced_capability {
            warn!(
                device = self.device.name,
                "printer is in PLite mode; switch it to editor mode if printing fails"
            );
        }

        let result = self.claim_and_initialize();
        match &result {
            Ok(()) => {
                self.state = SessionState::Ready;
                info!(device = self.device.name, "session initialized");
            }
            Err(e) => {
                self.state = SessionState::Failed;
                warn!(device = self.device.name, error = %e, "initialization failed");
            }
        }
        result
    }

    fn claim_and_initialize(&mut self) -> Result<(), PtouchError> {
        let found = self.transport.open_interface()?;
        if found != Some(OUTPUT_ENDPOINT) {
            return Err(PtouchError::EndpointMismatch {
                expected: OUTPUT_ENDPOINT,
                found,
            });
        }
        self.write_frame(&commands::init())
    }

    // ========================================================================
    // COMMANDS
    // ========================================================================

    /// Write one command frame to the OUT endpoint.
    ///
    /// ## Errors
    ///
    /// - [`PtouchError::ProtocolNotInitialized`] before `init()` succeeded,
    ///   unless `data` is the initialize command itself
    /// - [`PtouchError::SessionFailed`] after a fatal error
    /// - [`PtouchError::IoWrite`] if the device took fewer bytes than sent
    pub fn send(&mut self, data: &[u8]) -> Result<(), PtouchError> {
        if data != commands::init().as_slice() {
            self.ensure_ready()?;
        }
        let result = self.write_frame(data);
        self.fail_on_error(result)
    }

    fn ensure_ready(&self) -> Result<(), PtouchError> {
        match self.state {
            SessionState::Ready => Ok(()),
            SessionState::Uninitialized => Err(PtouchError::ProtocolNotInitialized),
            SessionState::Failed => Err(PtouchError::SessionFailed),
        }
    }

    fn write_frame(&mut self, data: &[u8]) -> Result<(), PtouchError> {
        let written = self.transport.write(OUTPUT_ENDPOINT, data)?;
        debug!(len = data.len(), written, head = ?&data[..data.len().min(4)], "frame");
        if written != data.len() {
            return Err(PtouchError::IoWrite {
                expected: data.len(),
                written,
            });
        }
        Ok(())
    }

    fn fail_on_error<R>(&mut self, result: Result<R, PtouchError>) -> Result<R, PtouchError> {
        if result.is_err() {
            self.state = SessionState::Failed;
        }
        result
    }

    // ========================================================================
    // STATUS
    // ========================================================================

    /// Request and read a status reply.
    ///
    /// Sleeps the configured interval before each read. A 32-byte reply
    /// with the `80 20` marker succeeds; any other 32-byte reply and any
    /// 16-byte reply fail at once. Other lengths (including empty reads)
    /// are retried up to `max_attempts` times.
    pub fn query_status(&mut self) -> Result<StatusReply, PtouchError> {
        self.send(&commands::status_request())?;
        let result = self.poll_status();
        self.fail_on_error(result)
    }

    fn poll_status(&mut self) -> Result<StatusReply, PtouchError> {
        let poll = self.config.poll;
        let interval = poll.interval();

        for attempt in 1..=poll.max_attempts {
            if !interval.is_zero() {
                thread::sleep(interval);
            }

            let mut buf = [0u8; STATUS_REPLY_SIZE];
            let n = self.transport.read(INPUT_ENDPOINT, &mut buf)?;
            debug!(attempt, bytes = n, "status poll");

            match n {
                STATUS_REPLY_SIZE if buf[..2] == STATUS_MAGIC => {
                    return Ok(StatusReply::parse(&buf));
                }
                STATUS_REPLY_SIZE => {
                    return Err(PtouchError::InvalidStatusReply {
                        reason: "bad marker",
                        raw: buf.to_vec(),
                    });
                }
                LEGACY_REPLY_SIZE => {
                    return Err(PtouchError::InvalidStatusReply {
                        reason: "16-byte legacy reply",
                        raw: buf[..n].to_vec(),
                    });
                }
                _ => continue,
            }
        }

        Err(PtouchError::StatusTimeout {
            attempts: poll.max_attempts,
        })
    }

    /// Query the status and resolve tape and colors at this device's DPI.
    pub fn printer_status(&mut self) -> Result<PrinterStatus, PtouchError> {
        let reply = self.query_status()?;
        let status = reply.resolve(self.device.dpi);
        self.fail_on_error(status)
    }

    // ========================================================================
    // PRINTING
    // ========================================================================

    /// Print a bitmap, then cut (`cut_tape`) or just advance the tape.
    pub fn print_image<B: Bitmap + ?Sized>(
        &mut self,
        bitmap: &B,
        cut_tape: bool,
    ) -> Result<(), PtouchError> {
        self.ensure_ready()?;
        let encoder = RasterEncoder::new(self.device);
        let encoder = self.fail_on_error(encoder)?;

        info!(
            device = self.device.name,
            columns = bitmap.width(),
            rows = bitmap.height(),
            cut_tape,
            "printing"
        );
        for frame in encoder.frames(bitmap, Finish::from_cut_tape(cut_tape)) {
            self.send(&frame)?;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
