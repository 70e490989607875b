//! # Supported Device Registry
//!
//! Static table of the label printers this crate knows how to drive, keyed
//! by USB vendor/product id.
//!
//! ## Supported Printers
//!
//! | Model | VID:PID | Head (px) | DPI | Compression | Raster start |
//! |-------|---------|-----------|-----|-------------|--------------|
//! | PT-P700 | 04F9:2061 | 128 | 180 | yes | alternate |
//! | PT-P750W | 04F9:2062 | 128 | 180 | yes | alternate |
//! | PT-P700 (PLite Mode) | 04F9:2064 | 128 | 180 | no | standard |
//! | PT-P750W (PLite Mode) | 04F9:2065 | 128 | 180 | no | standard |
//!
//! Supporting another model means appending an entry to
//! [`SUPPORTED_DEVICES`]. The table is never mutated at runtime.
//!
//! ## Usage
//!
//! ```
//! use ptouch::printer::registry;
//!
//! let device = registry::find(0x04F9, 0x2061).unwrap();
//! assert_eq!(device.name, "PT-P700");
//! assert_eq!(device.buffer_size_bytes(), 16);
//! ```

/// Brother Industries USB vendor id
pub const BROTHER_VENDOR_ID: u16 = 0x04F9;

/// # Device Descriptor
///
/// Hardware identity and protocol quirks of one printer model.
///
/// ## Capability Flags
///
/// - **supports_compression**: send `M 02` before raster data
/// - **requires_alternate_init**: use `ESC i a 01` to enter raster mode
/// - **reduced_capability**: the device enumerated in PLite (mass storage)
///   mode; printing may not work until it is switched back to editor mode
/// - **raster_unsupported**: the device cannot receive raster lines at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Model name
    pub name: &'static str,

    /// USB vendor id
    pub vendor_id: u16,

    /// USB product id
    pub product_id: u16,

    /// Print head height in pixels; bits per raster line
    pub max_pixel_buffer: u16,

    /// Resolution in dots per inch
    pub dpi: u16,

    pub supports_compression: bool,
    pub requires_alternate_init: bool,
    pub reduced_capability: bool,
    pub raster_unsupported: bool,
}

impl DeviceDescriptor {
    const fn base(name: &'static str, product_id: u16) -> Self {
        Self {
            name,
            vendor_id: BROTHER_VENDOR_ID,
            product_id,
            max_pixel_buffer: 128,
            dpi: 180,
            supports_compression: false,
            requires_alternate_init: false,
            reduced_capability: false,
            raster_unsupported: false,
        }
    }

    pub const PT_P700: Self = Self {
        supports_compression: true,
        requires_alternate_init: true,
        ..Self::base("PT-P700", 0x2061)
    };

    pub const PT_P750W: Self = Self {
        supports_compression: true,
        requires_alternate_init: true,
        ..Self::base("PT-P750W", 0x2062)
    };

    pub const PT_P700_PLITE: Self = Self {
        reduced_capability: true,
        ..Self::base("PT-P700 (PLite Mode)", 0x2064)
    };

    pub const PT_P750W_PLITE: Self = Self {
        reduced_capability: true,
        ..Self::base("PT-P750W (PLite Mode)", 0x2065)
    };

    /// Bytes per raster line (`max_pixel_buffer / 8`)
    #[inline]
    pub fn buffer_size_bytes(&self) -> usize {
        self.max_pixel_buffer as usize / 8
    }

    /// Whether this descriptor matches a USB vendor/product id pair
    #[inline]
    pub fn matches(&self, vendor_id: u16, product_id: u16) -> bool {
        self.vendor_id == vendor_id && self.product_id == product_id
    }
}

/// Every printer model the crate can drive
pub static SUPPORTED_DEVICES: &[DeviceDescriptor] = &[
    DeviceDescriptor::PT_P700,
    DeviceDescriptor::PT_P750W,
    DeviceDescriptor::PT_P700_PLITE,
    DeviceDescriptor::PT_P750W_PLITE,
];

/// Look up the descriptor for a USB vendor/product id pair.
pub fn find(vendor_id: u16, product_id: u16) -> Option<&'static DeviceDescriptor> {
    SUPPORTED_DEVICES
        .iter()
        .find(|d| d.matches(vendor_id, product_id))
}

/// Look up a descriptor by model name, ignoring case.
///
/// Accepts the display name (`"PT-P700"`) or a compact form without the
/// dash (`"ptp700"`).
pub fn by_name(name: &str) -> Option<&'static DeviceDescriptor> {
    let wanted = normalize(name);
    SUPPORTED_DEVICES.iter().find(|d| normalize(d.name) == wanted)
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
