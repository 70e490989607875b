//! # Printer Module
//!
//! Static hardware knowledge: which devices are supported, what tape sizes
//! exist, and what the color codes mean.
//!
//! ## Modules
//!
//! - [`registry`]: Supported device descriptors
//! - [`tape`]: Tape dimensions per resolution
//! - [`color`]: Tape and text color tables

pub mod color;
pub mod registry;
pub mod tape;

pub use color::{ColorDescriptor, ColorTag};
pub use registry::{DeviceDescriptor, SUPPORTED_DEVICES};
pub use tape::TapeInfo;
