//! HID discovery backed by hidapi.

use std::ffi::CString;

use hidapi::HidApi;
use tracing::{debug, trace};

use crate::discovery::{DeviceEnumerator, EnumerationError, Result};
use crate::types::{
    DeviceHandle, DeviceRecord, DeviceSelector, PropertyBag, PropertyValue, PROP_INSTANCE_ID,
};

/// Enumerates HID interfaces through the system hidapi backend.
pub struct HidDeviceDiscovery {
    api: HidApi,
}

impl HidDeviceDiscovery {
    pub fn new() -> Result<Self> {
        Ok(Self {
            api: HidApi::new()?,
        })
    }
}

impl DeviceEnumerator for HidDeviceDiscovery {
    fn find_all(
        &mut self,
        selector: &DeviceSelector,
        properties: &[&str],
    ) -> Result<Vec<DeviceRecord>> {
        self.api.refresh_devices()?;
        debug!(
            selector = %selector.selector_string(),
            "enumerating HID interfaces"
        );

        let mut records = Vec::new();
        for info in self.api.device_list() {
            if info.usage_page() != selector.usage_page || info.usage() != selector.usage_id {
                continue;
            }

            let id = info.path().to_string_lossy().into_owned();
            trace!(id = %id, "matched interface");

            let mut bag = PropertyBag::new();
            bag.insert(
                "device.vendor_id".to_string(),
                PropertyValue::Number(u32::from(info.vendor_id())),
            );
            bag.insert(
                "device.product_id".to_string(),
                PropertyValue::Number(u32::from(info.product_id())),
            );
            bag.insert(
                "device.usage_page".to_string(),
                PropertyValue::Number(u32::from(info.usage_page())),
            );
            bag.insert(
                "device.usage".to_string(),
                PropertyValue::Number(u32::from(info.usage())),
            );
            if info.interface_number() >= 0 {
                bag.insert(
                    "device.interface".to_string(),
                    PropertyValue::Number(info.interface_number() as u32),
                );
            }
            if let Some(manufacturer) = info.manufacturer_string() {
                bag.insert(
                    "device.manufacturer".to_string(),
                    PropertyValue::Text(manufacturer.to_string()),
                );
            }
            if let Some(serial) = info.serial_number() {
                if !serial.is_empty() {
                    bag.insert(
                        "device.serial".to_string(),
                        PropertyValue::Text(serial.to_string()),
                    );
                }
            }

            for &key in properties {
                match key {
                    PROP_INSTANCE_ID => {
                        bag.insert(key.to_string(), PropertyValue::Text(id.clone()));
                    }
                    other if bag.contains_key(other) => {}
                    other => {
                        trace!(key = other, "extended property not available from hidapi")
                    }
                }
            }

            records.push(DeviceRecord {
                id,
                display_name: info.product_string().map(str::to_owned),
                properties: bag,
            });
        }

        Ok(records)
    }

    fn open(&mut self, id: &str) -> Result<DeviceHandle> {
        let (vendor_id, product_id, version) = self
            .api
            .device_list()
            .find(|info| info.path().to_string_lossy() == id)
            .map(|info| (info.vendor_id(), info.product_id(), info.release_number()))
            .ok_or_else(|| EnumerationError::NotFound(id.to_string()))?;

        let path =
            CString::new(id).map_err(|_| EnumerationError::NotFound(id.to_string()))?;
        let device = self.api.open_path(&path)?;

        Ok(DeviceHandle {
            vendor_id,
            product_id,
            version,
            manufacturer: device.get_manufacturer_string()?,
            product: device.get_product_string()?,
        })
    }
}
