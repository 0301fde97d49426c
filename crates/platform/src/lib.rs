//! Device and battery enumeration boundary for hidvolt.
//!
//! This crate holds the record types and collaborator traits the scanner
//! talks to, plus the production implementations: HID discovery through
//! hidapi and battery sources through starship-battery.
//!
//! # Example
//!
//! ```ignore
//! use hidvolt_platform::{DeviceEnumerator, DeviceSelector, HidDeviceDiscovery, PROP_INSTANCE_ID};
//!
//! let mut discovery = HidDeviceDiscovery::new()?;
//! let devices = discovery.find_all(&DeviceSelector::GENERIC_DESKTOP_MOUSE, &[PROP_INSTANCE_ID])?;
//! for device in devices {
//!     println!("{}", device.id);
//! }
//! ```

mod discovery;
mod hid;
mod power;
mod types;

pub use discovery::{BatteryEnumerator, DeviceEnumerator, EnumerationError};
pub use hid::HidDeviceDiscovery;
pub use power::SystemBatteries;
pub use types::{
    BatteryRecord, BatteryReport, BatteryStatus, DeviceHandle, DeviceRecord, DeviceSelector,
    PropertyBag, PropertyValue, PROP_INSTANCE_ID, PROP_IS_CONNECTED,
};
