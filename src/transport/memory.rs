//! # In-Memory Transport
//!
//! Records every frame written and replays a queue of scripted reads.
//!
//! Used by the test suite to drive a session without hardware, and by the
//! `encode` command to capture a print job's exact byte stream.
//!
//! ```
//! use ptouch::transport::{BulkTransport, MemoryTransport};
//!
//! let mut transport = MemoryTransport::new().with_reply(vec![0x80, 0x20]);
//! transport.write(0x02, &[0x1B, 0x40]).unwrap();
//!
//! let mut buf = [0u8; 32];
//! assert_eq!(transport.read(0x81, &mut buf).unwrap(), 2);
//! assert_eq!(transport.read(0x81, &mut buf).unwrap(), 0); // queue empty
//! assert_eq!(transport.writes(), &[vec![0x1B, 0x40]]);
//! ```

use std::collections::VecDeque;

use super::BulkTransport;
use crate::error::PtouchError;
use crate::protocol::commands::OUTPUT_ENDPOINT;

#[derive(Debug, Clone)]
pub struct MemoryTransport {
    out_endpoint: Option<u8>,
    replies: VecDeque<Vec<u8>>,
    writes: Vec<Vec<u8>>,
    write_limit: Option<usize>,
    interface_opened: bool,
    read_count: usize,
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTransport {
    /// A transport whose OUT endpoint sits at the protocol address
    pub fn new() -> Self {
        Self {
            out_endpoint: Some(OUTPUT_ENDPOINT),
            replies: VecDeque::new(),
            writes: Vec::new(),
            write_limit: None,
            interface_opened: false,
            read_count: 0,
        }
    }

    /// Report a different OUT endpoint (or none) from `open_interface`
    pub fn with_out_endpoint(mut self, endpoint: Option<u8>) -> Self {
        self.out_endpoint = endpoint;
        self
    }

    /// Queue a reply for the next read
    pub fn with_reply(mut self, reply: Vec<u8>) -> Self {
        self.replies.push_back(reply);
        self
    }

    /// Accept at most `limit` bytes per write, simulating short writes
    pub fn with_write_limit(mut self, limit: usize) -> Self {
        self.write_limit = Some(limit);
        self
    }

    /// Every frame written so far, in order
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    /// All written frames concatenated
    pub fn written_bytes(&self) -> Vec<u8> {
        self.writes.concat()
    }

    /// Number of read calls made
    pub fn read_count(&self) -> usize {
        self.read_count
    }

    pub fn interface_opened(&self) -> bool {
        self.interface_opened
    }
}

impl BulkTransport for MemoryTransport {
    fn open_interface(&mut self) -> Result<Option<u8>, PtouchError> {
        self.interface_opened = true;
        Ok(self.out_endpoint)
    }

    fn write(&mut self, _endpoint: u8, data: &[u8]) -> Result<usize, PtouchError> {
        let accepted = self.write_limit.map_or(data.len(), |l| l.min(data.len()));
        self.writes.push(data[..accepted].to_vec());
        Ok(accepted)
    }

    fn read(&mut self, _endpoint: u8, buf: &mut [u8]) -> Result<usize, PtouchError> {
        self.read_count += 1;
        match self.replies.pop_front() {
            Some(reply) => {
                let n = reply.len().min(buf.len());
                buf[..n].copy_from_slice(&reply[..n]);
                Ok(n)
            }
            None => Ok(0),
        }
    }

    fn describe(&self) -> String {
        "in-memory transport".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_limit() {
        let mut transport = MemoryTransport::new().with_write_limit(2);
        assert_eq!(transport.write(0x02, &[1, 2, 3]).unwrap(), 2);
        assert_eq!(transport.write(0x02, &[4]).unwrap(), 1);
        assert_eq!(transport.written_bytes(), vec![1, 2, 4]);
    }

    #[test]
    fn test_reply_truncated_to_buffer() {
        let mut transport = MemoryTransport::new().with_reply(vec![9; 40]);
        let mut buf = [0u8; 32];
        assert_eq!(transport.read(0x81, &mut buf).unwrap(), 32);
        assert_eq!(transport.read_count(), 1);
    }

    #[test]
    fn test_open_interface_reports_endpoint() {
        let mut transport = MemoryTransport::new();
        assert_eq!(transport.open_interface().unwrap(), Some(0x02));
        assert!(transport.interface_opened());

        let mut transport = MemoryTransport::new().with_out_endpoint(None);
        assert_eq!(transport.open_interface().unwrap(), None);
    }
}
