//! Collaborator traits for device and battery enumeration.
//!
//! The scanning logic only ever talks to these traits; the production
//! implementations are [`crate::HidDeviceDiscovery`] and
//! [`crate::SystemBatteries`], and tests substitute in-memory fakes.

use crate::types::{BatteryRecord, BatteryReport, DeviceHandle, DeviceRecord, DeviceSelector};

/// Errors raised by an enumeration collaborator.
#[derive(Debug, thiserror::Error)]
pub enum EnumerationError {
    #[error("HID subsystem error: {0}")]
    Hid(#[from] hidapi::HidError),

    #[error("battery subsystem error: {0}")]
    Battery(#[from] starship_battery::Error),

    #[error("no such device: {0}")]
    NotFound(String),

    #[error("{0}")]
    Failed(String),
}

pub type Result<T> = std::result::Result<T, EnumerationError>;

/// Snapshot enumeration of HID interfaces matching a class selector.
pub trait DeviceEnumerator {
    /// Returns one snapshot per call; ordering is whatever the platform
    /// produces. `properties` names the extended property keys the caller
    /// wants in each record's bag; [`crate::PROP_INSTANCE_ID`] is always
    /// supported. A collaborator failure is an `Err`, distinguishable from
    /// a legitimately empty snapshot.
    fn find_all(
        &mut self,
        selector: &DeviceSelector,
        properties: &[&str],
    ) -> Result<Vec<DeviceRecord>>;

    /// Best-effort open of one discovered interface for extended metadata.
    fn open(&mut self, id: &str) -> Result<DeviceHandle>;
}

/// Host-scoped enumeration of battery-class sources.
///
/// The battery namespace is unrelated to the device namespace; callers
/// scan all sources rather than looking one up by device id.
pub trait BatteryEnumerator {
    fn find_all(&mut self) -> Result<Vec<BatteryRecord>>;

    /// Fetches a live capacity reading from one source.
    fn report(&mut self, id: &str) -> Result<BatteryReport>;
}
