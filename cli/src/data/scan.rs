//! One full scan: enumerate, classify, correlate, summarize.

use hidvolt_platform::{
    BatteryEnumerator, DeviceEnumerator, DeviceHandle, DeviceRecord, DeviceSelector,
    EnumerationError, PropertyBag, PROP_INSTANCE_ID, PROP_IS_CONNECTED,
};
use tracing::{debug, info, warn};

use crate::data::charge::{resolve_charge, ChargeResult};
use crate::data::classify::is_wireless_pointing_device;

/// Fallback label when the platform has no display name for a device.
pub const UNKNOWN_DEVICE_LABEL: &str = "Unknown device";

/// Report entry for one wireless pointing device.
#[derive(Debug, Clone)]
pub struct DeviceEntry {
    pub name: String,
    pub id: String,
    pub properties: PropertyBag,
    pub charge: ChargeResult,
    /// Only present when the property bag carried the connection flag;
    /// absence means unknown, not disconnected.
    pub connected: Option<bool>,
    pub handle: Option<DeviceHandle>,
    /// Inline note when the best-effort device open failed.
    pub access_error: Option<String>,
}

/// The finished report: per-device entries plus the trailing totals.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub entries: Vec<DeviceEntry>,
    /// Interfaces matching the class selector, wireless or not.
    pub devices_seen: usize,
    /// Devices satisfying the wireless heuristic.
    pub wireless_total: usize,
}

/// Drives one scan over borrowed collaborators.
pub struct Scanner<'a> {
    devices: &'a mut dyn DeviceEnumerator,
    batteries: &'a mut dyn BatteryEnumerator,
    selector: DeviceSelector,
}

impl<'a> Scanner<'a> {
    pub fn new(
        devices: &'a mut dyn DeviceEnumerator,
        batteries: &'a mut dyn BatteryEnumerator,
        selector: DeviceSelector,
    ) -> Self {
        Self {
            devices,
            batteries,
            selector,
        }
    }

    /// Runs one scan to completion.
    ///
    /// Only a failure of the device enumeration itself is returned as an
    /// error; everything that goes wrong for a single device stays inside
    /// that device's entry.
    pub fn run(&mut self) -> Result<ScanReport, EnumerationError> {
        info!(
            selector = %self.selector.selector_string(),
            "scanning for pointing devices"
        );
        let snapshot = self.devices.find_all(&self.selector, &[PROP_INSTANCE_ID])?;
        debug!(devices = snapshot.len(), "device snapshot complete");

        let mut entries = Vec::new();
        for device in &snapshot {
            if !is_wireless_pointing_device(&device.id) {
                debug!(id = %device.id, "skipping non-wireless interface");
                continue;
            }
            entries.push(self.build_entry(device));
        }

        // Recomputed over the same snapshot, not a running counter.
        let wireless_total = snapshot
            .iter()
            .filter(|device| is_wireless_pointing_device(&device.id))
            .count();

        Ok(ScanReport {
            entries,
            devices_seen: snapshot.len(),
            wireless_total,
        })
    }

    fn build_entry(&mut self, device: &DeviceRecord) -> DeviceEntry {
        let charge = resolve_charge(device, self.batteries);

        let (handle, access_error) = match self.devices.open(&device.id) {
            Ok(handle) => (Some(handle), None),
            Err(err) => {
                warn!(id = %device.id, error = %err, "device open failed");
                (None, Some(err.to_string()))
            }
        };

        DeviceEntry {
            name: device
                .display_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_DEVICE_LABEL.to_string()),
            id: device.id.clone(),
            properties: device.properties.clone(),
            charge,
            connected: device.flag(PROP_IS_CONNECTED),
            handle,
            access_error,
        }
    }
}
