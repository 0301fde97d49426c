//! Record and selector types shared across the enumeration boundary.

use std::collections::BTreeMap;
use std::fmt;

/// Property key carrying the platform device-instance identifier.
pub const PROP_INSTANCE_ID: &str = "device.instance_id";

/// Property key for the best-effort "is currently connected" flag.
///
/// Not every backend can report it; a missing key means unknown, not false.
pub const PROP_IS_CONNECTED: &str = "device.is_connected";

/// A single value in a device property bag.
///
/// The platform hands back loosely typed values; a closed variant keeps
/// downstream matches exhaustive instead of casting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Text(String),
    Flag(bool),
    Number(u32),
}

impl PropertyValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            PropertyValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<u32> {
        match self {
            PropertyValue::Number(number) => Some(*number),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(text) => write!(f, "{}", text),
            PropertyValue::Flag(flag) => write!(f, "{}", flag),
            PropertyValue::Number(number) => write!(f, "{}", number),
        }
    }
}

/// Identifier-keyed property mapping attached to a record.
pub type PropertyBag = BTreeMap<String, PropertyValue>;

/// HID class filter: a usage-page/usage-id pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceSelector {
    pub usage_page: u16,
    pub usage_id: u16,
}

impl DeviceSelector {
    /// Generic Desktop Controls / Mouse.
    pub const GENERIC_DESKTOP_MOUSE: Self = Self {
        usage_page: 0x0001,
        usage_id: 0x0002,
    };

    /// Query string handed to the discovery collaborator.
    pub fn selector_string(&self) -> String {
        format!(
            "hid:usage_page=0x{:04X};usage=0x{:04X}",
            self.usage_page, self.usage_id
        )
    }
}

impl Default for DeviceSelector {
    fn default() -> Self {
        Self::GENERIC_DESKTOP_MOUSE
    }
}

/// One discovered HID interface, snapshot at enumeration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    /// Platform device path; the namespace the classifier operates on.
    pub id: String,
    pub display_name: Option<String>,
    pub properties: PropertyBag,
}

impl DeviceRecord {
    /// Best-effort typed lookup; absent or differently typed keys are `None`.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.properties.get(key).and_then(PropertyValue::as_flag)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(PropertyValue::as_text)
    }

    pub fn number(&self, key: &str) -> Option<u32> {
        self.properties.get(key).and_then(PropertyValue::as_number)
    }
}

/// Extended metadata from a best-effort device open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceHandle {
    pub vendor_id: u16,
    pub product_id: u16,
    /// Device release number, BCD-encoded.
    pub version: u16,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
}

/// Presence status reported by a battery source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatteryStatus {
    Present,
    NotPresent,
    #[default]
    Unknown,
}

impl BatteryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BatteryStatus::Present => "present",
            BatteryStatus::NotPresent => "not present",
            BatteryStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BatteryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One battery-class source, snapshot at enumeration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatteryRecord {
    pub id: String,
    pub display_name: Option<String>,
    pub properties: PropertyBag,
}

/// A live capacity reading fetched from one battery source.
///
/// Capacities are milliwatt-hours; only the remaining/full ratio is ever
/// consumed, so the absolute unit just has to be consistent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatteryReport {
    pub status: BatteryStatus,
    pub remaining_capacity_mwh: Option<u32>,
    pub full_charge_capacity_mwh: Option<u32>,
}
