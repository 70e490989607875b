//! # Printer Discovery
//!
//! Enumerates the USB bus and opens a session for every attached device
//! found in the [registry](crate::printer::registry).
//!
//! Nothing is cached: each call walks the bus again, so the result always
//! reflects what is plugged in right now.

use tracing::{debug, info, warn};

use crate::error::PtouchError;
use crate::printer::{DeviceDescriptor, registry};
use crate::session::{ProtocolSession, SessionConfig};
use crate::transport::UsbTransport;

/// A session over a real USB device
pub type UsbSession = ProtocolSession<UsbTransport>;

/// Open a session for every supported printer on the bus.
///
/// Devices that do not match the registry are skipped. A supported device
/// that cannot be opened (permissions, already claimed) is logged and
/// skipped too, so one bad device does not hide the others.
///
/// ## Errors
///
/// Only a failure to enumerate the bus itself.
pub fn list_printers(config: SessionConfig) -> Result<Vec<UsbSession>, PtouchError> {
    let mut sessions = Vec::new();

    for device in rusb::devices()?.iter() {
        let descriptor = match device.device_descriptor() {
            Ok(d) => d,
            Err(e) => {
                debug!(error = %e, "skipping device without descriptor");
                continue;
            }
        };

        let Some(known) = registry::find(descriptor.vendor_id(), descriptor.product_id()) else {
            continue;
        };

        match UsbTransport::open(device, config.transfer_timeout()) {
            Ok(transport) => {
                info!(model = known.name, device = %transport.info(), "found printer");
                sessions.push(ProtocolSession::new(transport, known, config));
            }
            Err(e) => warn!(model = known.name, error = %e, "cannot open printer"),
        }
    }

    Ok(sessions)
}

/// Open a session for the first supported printer, if any.
///
/// Bus order decides which printer is first; with several printers
/// attached, use [`list_printers`] and pick one explicitly.
pub fn first_printer(config: SessionConfig) -> Result<Option<UsbSession>, PtouchError> {
    Ok(list_printers(config)?.into_iter().next())
}

/// Supported models, for listings and `--model` parsing
pub fn supported_models() -> impl Iterator<Item = &'static DeviceDescriptor> {
    registry::SUPPORTED_DEVICES.iter()
}
