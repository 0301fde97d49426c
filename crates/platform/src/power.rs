//! Battery source enumeration backed by starship-battery.

use starship_battery::units::energy::watt_hour;
use starship_battery::{Battery, Manager, State};
use tracing::debug;

use crate::discovery::{BatteryEnumerator, EnumerationError, Result};
use crate::types::{BatteryRecord, BatteryReport, BatteryStatus, PropertyBag, PropertyValue};

/// Enumerates the host's battery-class sources.
///
/// The manager is rebuilt per call so every query sees a fresh snapshot;
/// battery state on the host is not tied to any one device's lifetime.
pub struct SystemBatteries;

impl SystemBatteries {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemBatteries {
    fn default() -> Self {
        Self::new()
    }
}

impl BatteryEnumerator for SystemBatteries {
    fn find_all(&mut self) -> Result<Vec<BatteryRecord>> {
        let manager = Manager::new()?;

        let mut records = Vec::new();
        for (index, battery) in manager.batteries()?.enumerate() {
            let battery = battery?;

            let mut properties = PropertyBag::new();
            if let Some(vendor) = battery.vendor() {
                properties.insert(
                    "battery.vendor".to_string(),
                    PropertyValue::Text(vendor.to_string()),
                );
            }
            if let Some(serial) = battery.serial_number() {
                let serial = serial.trim();
                if !serial.is_empty() {
                    properties.insert(
                        "battery.serial".to_string(),
                        PropertyValue::Text(serial.to_string()),
                    );
                }
            }
            properties.insert(
                "battery.technology".to_string(),
                PropertyValue::Text(battery.technology().to_string()),
            );

            records.push(BatteryRecord {
                id: source_id(index, battery.serial_number()),
                display_name: battery.model().map(str::to_owned),
                properties,
            });
        }

        debug!(sources = records.len(), "battery snapshot complete");
        Ok(records)
    }

    fn report(&mut self, id: &str) -> Result<BatteryReport> {
        let manager = Manager::new()?;

        for (index, battery) in manager.batteries()?.enumerate() {
            let battery = battery?;
            if source_id(index, battery.serial_number()) != id {
                continue;
            }
            return Ok(build_report(&battery));
        }

        Err(EnumerationError::NotFound(id.to_string()))
    }
}

fn source_id(index: usize, serial: Option<&str>) -> String {
    match serial.map(str::trim) {
        Some(serial) if !serial.is_empty() => format!("BATTERY#{}#{}", index, serial),
        _ => format!("BATTERY#{}", index),
    }
}

fn build_report(battery: &Battery) -> BatteryReport {
    BatteryReport {
        status: status_from_state(battery.state()),
        remaining_capacity_mwh: capacity_mwh(battery.energy().get::<watt_hour>()),
        full_charge_capacity_mwh: capacity_mwh(battery.energy_full().get::<watt_hour>()),
    }
}

/// A source the manager can still enumerate is present; only an
/// indeterminate state maps to `Unknown`.
fn status_from_state(state: State) -> BatteryStatus {
    match state {
        State::Charging | State::Discharging | State::Empty | State::Full => {
            BatteryStatus::Present
        }
        State::Unknown => BatteryStatus::Unknown,
    }
}

fn capacity_mwh(watt_hours: f32) -> Option<u32> {
    if watt_hours.is_finite() && watt_hours >= 0.0 {
        Some((watt_hours * 1000.0) as u32)
    } else {
        None
    }
}
