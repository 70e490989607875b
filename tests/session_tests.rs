//! # Session Tests
//!
//! Drive a [`ProtocolSession`] end to end over a [`MemoryTransport`]:
//! initialization, status polling and decoding, and complete print jobs
//! checked byte for byte.

use ptouch::printer::{ColorTag, DeviceDescriptor};
use ptouch::protocol::status::StatusErrors;
use ptouch::render::MonoBitmap;
use ptouch::session::{PollConfig, SessionConfig, SessionState};
use ptouch::{MemoryTransport, ProtocolSession, PtouchError};
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};

// ============================================================================
// HELPERS
// ============================================================================

fn config(max_attempts: u32) -> SessionConfig {
    SessionConfig {
        poll: PollConfig::immediate(max_attempts),
        ..Default::default()
    }
}

fn ready_session(
    device: &'static DeviceDescriptor,
    transport: MemoryTransport,
) -> ProtocolSession<MemoryTransport> {
    let mut session = ProtocolSession::new(transport, device, config(10));
    session.init().unwrap();
    session
}

/// A well-formed status reply for the given tape
fn status_reply(media_width: u8, tape_color: u8, text_color: u8) -> Vec<u8> {
    let mut reply = vec![0u8; 32];
    reply[0] = 0x80;
    reply[1] = 0x20;
    reply[10] = media_width;
    reply[24] = tape_color;
    reply[25] = text_color;
    reply
}

// ============================================================================
// STATUS
// ============================================================================

#[test]
fn test_status_24mm_black_on_white() {
    let transport = MemoryTransport::new().with_reply(status_reply(24, 0x01, 0x08));
    let mut session = ready_session(&DeviceDescriptor::PT_P700, transport);

    let status = session.printer_status().unwrap();

    assert_eq!(status.tape.name, "24mm");
    assert_eq!(status.tape.width_px, 170);
    assert_eq!(status.tape_color.name, "White");
    assert_eq!(status.tape_color.tag, ColorTag::White);
    assert_eq!(status.text_color.name, "Black");
    assert_eq!(status.errors, StatusErrors::empty());
    assert_eq!(status.to_string(), "24mm Black on White");
    assert_eq!(session.state(), SessionState::Ready);

    // ESC @, then a single ESC i S
    assert_eq!(
        session.transport().writes(),
        &[vec![0x1B, 0x40], vec![0x1B, 0x69, 0x53]]
    );
    assert_eq!(session.transport().read_count(), 1);
}

#[test]
fn test_status_decoding_is_deterministic() {
    let transport = MemoryTransport::new()
        .with_reply(status_reply(12, 0x05, 0x01))
        .with_reply(status_reply(12, 0x05, 0x01));
    let mut session = ready_session(&DeviceDescriptor::PT_P750W, transport);

    let first = session.query_status().unwrap();
    let second = session.query_status().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.resolve(180).unwrap().to_string(), "12mm White on Blue");
}

#[test]
fn test_status_skips_empty_reads() {
    let transport = MemoryTransport::new()
        .with_reply(Vec::new())
        .with_reply(vec![0x80; 5])
        .with_reply(status_reply(9, 0x06, 0x08));
    let mut session = ready_session(&DeviceDescriptor::PT_P700, transport);

    let status = session.printer_status().unwrap();
    assert_eq!(status.to_string(), "9mm Black on Yellow");
    assert_eq!(session.transport().read_count(), 3);
}

#[test]
fn test_status_legacy_reply_fails_immediately() {
    let transport = MemoryTransport::new()
        .with_reply(vec![0u8; 16])
        .with_reply(status_reply(24, 0x01, 0x08));
    let mut session = ready_session(&DeviceDescriptor::PT_P700, transport);

    let err = session.query_status().unwrap_err();
    match err {
        PtouchError::InvalidStatusReply { raw, .. } => assert_eq!(raw.len(), 16),
        other => panic!("expected InvalidStatusReply, got {other:?}"),
    }
    assert_eq!(session.transport().read_count(), 1);
    assert_eq!(session.state(), SessionState::Failed);
}

#[test]
fn test_status_legacy_reply_does_not_wait_out_retries() {
    let config = SessionConfig {
        poll: PollConfig {
            max_attempts: 10,
            interval_ms: 50,
        },
        ..Default::default()
    };
    let transport = MemoryTransport::new().with_reply(vec![0u8; 16]);
    let mut session = ProtocolSession::new(transport, &DeviceDescriptor::PT_P700, config);
    session.init().unwrap();

    let start = Instant::now();
    let result = session.query_status();
    let elapsed = start.elapsed();

    assert!(matches!(result, Err(PtouchError::InvalidStatusReply { .. })));
    assert_eq!(session.transport().read_count(), 1);
    // One interval before the single read; a full retry loop takes 500 ms
    assert!(elapsed >= Duration::from_millis(50), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(250), "{elapsed:?}");
}

#[test]
fn test_status_bad_marker() {
    let mut reply = status_reply(24, 0x01, 0x08);
    reply[1] = 0x21;
    let transport = MemoryTransport::new().with_reply(reply);
    let mut session = ready_session(&DeviceDescriptor::PT_P700, transport);

    let err = session.query_status().unwrap_err();
    assert!(matches!(
        err,
        PtouchError::InvalidStatusReply {
            reason: "bad marker",
            ..
        }
    ));
    assert_eq!(session.transport().read_count(), 1);
}

#[test]
fn test_status_timeout_after_max_attempts() {
    let mut session = ready_session(&DeviceDescriptor::PT_P700, MemoryTransport::new());

    let err = session.query_status().unwrap_err();
    assert!(matches!(err, PtouchError::StatusTimeout { attempts: 10 }));
    assert_eq!(session.transport().read_count(), 10);
    assert_eq!(session.state(), SessionState::Failed);
}

#[test]
fn test_status_timeout_respects_config() {
    let transport = MemoryTransport::new();
    let mut session = ProtocolSession::new(transport, &DeviceDescriptor::PT_P700, config(3));
    session.init().unwrap();

    assert!(matches!(
        session.query_status(),
        Err(PtouchError::StatusTimeout { attempts: 3 })
    ));
    assert_eq!(session.transport().read_count(), 3);
}

#[test]
fn test_status_unknown_tape_color() {
    let transport = MemoryTransport::new().with_reply(status_reply(12, 0x99, 0x08));
    let mut session = ready_session(&DeviceDescriptor::PT_P700, transport);

    // The raw reply still decodes
    let reply = session.query_status().unwrap();
    assert_eq!(reply.tape_color_code, 0x99);
    assert!(matches!(
        reply.tape_color(),
        Err(PtouchError::UnknownColorCode {
            table: "tape",
            code: 0x99
        })
    ));
    assert!(matches!(
        reply.resolve(180),
        Err(PtouchError::UnknownColorCode { code: 0x99, .. })
    ));
}

#[test]
fn test_status_unsupported_tape_width() {
    let transport = MemoryTransport::new().with_reply(status_reply(36, 0x01, 0x08));
    let mut session = ready_session(&DeviceDescriptor::PT_P700, transport);

    assert!(matches!(
        session.printer_status(),
        Err(PtouchError::UnsupportedTape {
            media_width: 36,
            dpi: 180
        })
    ));
}

#[test]
fn test_status_reports_error_flags() {
    let mut reply = status_reply(12, 0x01, 0x08);
    // no media, cover open
    reply[8] = 0x01;
    reply[9] = 0x10;
    let transport = MemoryTransport::new().with_reply(reply);
    let mut session = ready_session(&DeviceDescriptor::PT_P700, transport);

    let status = session.printer_status().unwrap();
    assert!(status.errors.contains(StatusErrors::NO_MEDIA));
    assert!(status.errors.contains(StatusErrors::COVER_OPEN));
}

// ============================================================================
// SESSION LIFECYCLE
// ============================================================================

#[test]
fn test_send_before_init_is_rejected() {
    let mut session =
        ProtocolSession::new(MemoryTransport::new(), &DeviceDescriptor::PT_P700, config(10));

    assert!(matches!(
        session.send(&[0x1B, 0x69, 0x53]),
        Err(PtouchError::ProtocolNotInitialized)
    ));
    assert!(matches!(
        session.query_status(),
        Err(PtouchError::ProtocolNotInitialized)
    ));
    assert!(session.transport().writes().is_empty());
    assert_eq!(session.transport().read_count(), 0);
}

#[test]
fn test_plite_device_initializes() {
    let session = ready_session(&DeviceDescriptor::PT_P700_PLITE, MemoryTransport::new());
    assert!(session.is_initialized());
    assert_eq!(
        session.describe(),
        "PT-P700 (PLite Mode): in-memory transport"
    );
}

// ============================================================================
// PRINT JOBS
// ============================================================================

#[test]
fn test_single_pixel_job_bytes() {
    let mut bitmap = MonoBitmap::new(1, 1);
    bitmap.set(0, 0, true);

    let mut session = ready_session(&DeviceDescriptor::PT_P700, MemoryTransport::new());
    session.print_image(&bitmap, true).unwrap();

    let mut line = vec![0x47, 17, 0x00, 15];
    let mut payload = [0u8; 16];
    payload[7] = 0x01;
    line.extend_from_slice(&payload);

    assert_eq!(
        session.transport().writes(),
        &[
            vec![0x1B, 0x40],
            vec![0x4D, 0x02],
            vec![0x1B, 0x69, 0x61, 0x01],
            line,
            vec![0x1A],
        ]
    );
}

#[test]
fn test_advance_instead_of_cut() {
    let bitmap = MonoBitmap::new(3, 4);
    let mut session = ready_session(&DeviceDescriptor::PT_P750W, MemoryTransport::new());
    session.print_image(&bitmap, false).unwrap();

    let writes = session.transport().writes();
    assert_eq!(writes.len(), 1 + 2 + 3 + 1);
    assert_eq!(writes.last().unwrap(), &vec![0x0C]);
    assert!(!writes.contains(&vec![0x1A]));
}

#[test]
fn test_plite_job_uses_standard_raster_start() {
    let bitmap = MonoBitmap::new(2, 2);
    let mut session = ready_session(&DeviceDescriptor::PT_P750W_PLITE, MemoryTransport::new());
    session.print_image(&bitmap, true).unwrap();

    let writes = session.transport().writes();
    // No compression command on PLite devices
    assert_eq!(writes[1], vec![0x1B, 0x69, 0x52, 0x01]);
    assert_eq!(writes.len(), 1 + 1 + 2 + 1);
}

#[test]
fn test_full_column_centered_on_head() {
    // A full 84-pixel column on a 128-pixel head starts at offset 64 - 42 = 22
    let bitmap = MonoBitmap::from_fn(1, 84, |_, _| true);
    let mut session = ready_session(&DeviceDescriptor::PT_P700, MemoryTransport::new());
    session.print_image(&bitmap, true).unwrap();

    let line = &session.transport().writes()[3];
    let payload = &line[4..];
    assert_eq!(payload.len(), 16);

    let marked: u32 = payload.iter().map(|b| b.count_ones()).sum();
    assert_eq!(marked, 84);

    // Pixel offsets 22..=105 span bytes 13 down to 2
    assert_eq!(payload[15], 0x00);
    assert_eq!(payload[13], 0b1100_0000);
    assert_eq!(payload[2], 0b0000_0011);
    assert_eq!(payload[1], 0x00);
}

#[test]
fn test_print_after_status() {
    let transport = MemoryTransport::new().with_reply(status_reply(12, 0x01, 0x08));
    let mut session = ready_session(&DeviceDescriptor::PT_P700, transport);

    session.printer_status().unwrap();
    session.print_image(&MonoBitmap::new(5, 10), true).unwrap();

    // ESC @, ESC i S, M 02, ESC i a 01, 5 lines, SUB
    assert_eq!(session.transport().writes().len(), 1 + 1 + 2 + 5 + 1);
}

#[test]
fn test_print_after_failure_is_rejected() {
    let mut session = ready_session(&DeviceDescriptor::PT_P700, MemoryTransport::new());
    assert!(session.query_status().is_err());

    assert!(matches!(
        session.print_image(&MonoBitmap::new(1, 1), true),
        Err(PtouchError::SessionFailed)
    ));
}
