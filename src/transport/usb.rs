//! # USB Bulk Transport
//!
//! This module talks to printers through libusb using the `rusb` crate.
//!
//! ## Linux Permissions
//!
//! Opening the device needs write access to its `/dev/bus/usb` node. Either
//! run as root or install a udev rule:
//!
//! ```text
//! # /etc/udev/rules.d/60-ptouch.rules
//! SUBSYSTEM=="usb", ATTRS{idVendor}=="04f9", MODE="0664", GROUP="plugdev"
//! ```
//!
//! ## Kernel Drivers
//!
//! Some kernels bind `usblp` to the printer interface. [`UsbTransport`]
//! detaches it before claiming the interface; the handle reattaches nothing
//! on drop, so unplug/replug restores the kernel driver.

use std::fmt;
use std::time::Duration;

use rusb::{Device, DeviceHandle, Direction, GlobalContext};
use tracing::debug;

use super::BulkTransport;
use crate::error::PtouchError;

/// Interface every supported printer exposes its bulk endpoints on
pub const PRINTER_INTERFACE: u8 = 0;

/// USB-level identity of an attached device
#[derive(Debug, Clone, Default)]
pub struct UsbDeviceInfo {
    pub bus: u8,
    pub address: u8,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial_number: Option<String>,
}

impl fmt::Display for UsbDeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (s/n: {}) [USB dev {} / Bus {}]",
            self.manufacturer.as_deref().unwrap_or("Unknown"),
            self.product.as_deref().unwrap_or("printer"),
            self.serial_number.as_deref().unwrap_or("n/a"),
            self.address,
            self.bus
        )
    }
}

/// # USB Printer Transport
///
/// Owns an open libusb handle to one printer.
pub struct UsbTransport {
    device: Device<GlobalContext>,
    handle: DeviceHandle<GlobalContext>,
    info: UsbDeviceInfo,
    timeout: Duration,
}

impl UsbTransport {
    /// Open a device and read its identification strings.
    ///
    /// String descriptors that cannot be read are left as `None`.
    pub fn open(device: Device<GlobalContext>, timeout: Duration) -> Result<Self, PtouchError> {
        let handle = device.open()?;
        let descriptor = device.device_descriptor()?;

        let info = UsbDeviceInfo {
            bus: device.bus_number(),
            address: device.address(),
            manufacturer: handle.read_manufacturer_string_ascii(&descriptor).ok(),
            product: handle.read_product_string_ascii(&descriptor).ok(),
            serial_number: handle.read_serial_number_string_ascii(&descriptor).ok(),
        };

        Ok(Self {
            device,
            handle,
            info,
            timeout,
        })
    }

    pub fn info(&self) -> &UsbDeviceInfo {
        &self.info
    }

    fn detach_kernel_driver(&mut self) -> Result<(), PtouchError> {
        match self.handle.kernel_driver_active(PRINTER_INTERFACE) {
            Ok(true) => {
                debug!(interface = PRINTER_INTERFACE, "detaching kernel driver");
                self.handle.detach_kernel_driver(PRINTER_INTERFACE)?;
            }
            Ok(false) => {}
            // Not every platform can query kernel drivers
            Err(rusb::Error::NotSupported) => {}
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn first_out_endpoint(&self) -> Result<Option<u8>, PtouchError> {
        let config = self.device.active_config_descriptor()?;
        let endpoint = config
            .interfaces()
            .find(|i| i.number() == PRINTER_INTERFACE)
            .and_then(|i| i.descriptors().find(|d| d.setting_number() == 0))
            .and_then(|d| {
                d.endpoint_descriptors()
                    .find(|e| e.direction() == Direction::Out)
                    .map(|e| e.address())
            });
        Ok(endpoint)
    }
}

impl BulkTransport for UsbTransport {
    fn open_interface(&mut self) -> Result<Option<u8>, PtouchError> {
        self.detach_kernel_driver()?;

        let configuration = self.device.config_descriptor(0)?.number();
        match self.handle.set_active_configuration(configuration) {
            Ok(()) => {}
            // Already configured and claimed by us
            Err(rusb::Error::Busy) => debug!("configuration busy, keeping active one"),
            Err(e) => return Err(e.into()),
        }
        self.handle.claim_interface(PRINTER_INTERFACE)?;

        self.first_out_endpoint()
    }

    fn write(&mut self, endpoint: u8, data: &[u8]) -> Result<usize, PtouchError> {
        Ok(self.handle.write_bulk(endpoint, data, self.timeout)?)
    }

    fn read(&mut self, endpoint: u8, buf: &mut [u8]) -> Result<usize, PtouchError> {
        match self.handle.read_bulk(endpoint, buf, self.timeout) {
            Ok(n) => Ok(n),
            Err(rusb::Error::Timeout) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn describe(&self) -> String {
        self.info.to_string()
    }
}
