//! Report rendering for the console sink.
//!
//! The scanner produces a [`ScanReport`]; everything here is presentation.
//! Both renderers write to any `io::Write`, so tests assert against a
//! buffer instead of capturing stdout.

use std::io::Write;

use color_eyre::eyre::Result;
use hidvolt_platform::PropertyValue;
use serde_json::json;

use crate::data::charge::{ChargeResult, UnavailableReason};
use crate::data::scan::ScanReport;

const NO_SOURCE_HINT: &str = "  Note: the host exposes no battery-class source; the charge level may \
     only be visible through the vendor's own software or after a driver update.";

pub fn render_text(report: &ScanReport, out: &mut impl Write) -> Result<()> {
    if report.devices_seen == 0 {
        writeln!(out, "No matching HID pointing devices found.")?;
    } else if report.entries.is_empty() {
        writeln!(
            out,
            "No wireless pointing devices among {} matching HID interface(s).",
            report.devices_seen
        )?;
    }

    for entry in &report.entries {
        writeln!(out, "=== Wireless HID device ===")?;
        writeln!(out, "Name: {}", entry.name)?;
        writeln!(out, "Id:   {}", entry.id)?;
        if !entry.properties.is_empty() {
            writeln!(out, "Properties:")?;
            for (key, value) in &entry.properties {
                writeln!(out, "  {}: {}", key, value)?;
            }
        }
        writeln!(out, "Charge: {}", entry.charge)?;
        if entry.charge == ChargeResult::Unavailable(UnavailableReason::NoBatterySource) {
            writeln!(out, "{}", NO_SOURCE_HINT)?;
        }
        match entry.connected {
            Some(connected) => writeln!(out, "Connected: {}", connected)?,
            None => writeln!(out, "Connected: unknown")?,
        }
        if let Some(handle) = &entry.handle {
            writeln!(out, "VID: {:04x}", handle.vendor_id)?;
            writeln!(out, "PID: {:04x}", handle.product_id)?;
            writeln!(out, "Version: {:04x}", handle.version)?;
            if let Some(manufacturer) = &handle.manufacturer {
                writeln!(out, "Manufacturer: {}", manufacturer)?;
            }
        }
        if let Some(err) = &entry.access_error {
            writeln!(out, "Device access failed: {}", err)?;
        }
        writeln!(out, "===========================")?;
        writeln!(out)?;
    }

    writeln!(
        out,
        "Wireless pointing devices found: {}",
        report.wireless_total
    )?;
    Ok(())
}

pub fn render_json(report: &ScanReport, out: &mut impl Write) -> Result<()> {
    let entries: Vec<_> = report
        .entries
        .iter()
        .map(|entry| {
            let properties: serde_json::Map<String, serde_json::Value> = entry
                .properties
                .iter()
                .map(|(key, value)| (key.clone(), property_json(value)))
                .collect();

            json!({
                "name": entry.name,
                "id": entry.id,
                "properties": properties,
                "charge": charge_json(&entry.charge),
                "connected": entry.connected,
                "metadata": entry.handle.as_ref().map(|handle| json!({
                    "vendor_id": handle.vendor_id,
                    "product_id": handle.product_id,
                    "version": handle.version,
                    "manufacturer": handle.manufacturer,
                    "product": handle.product,
                })),
                "access_error": entry.access_error,
            })
        })
        .collect();

    let doc = json!({
        "devices_seen": report.devices_seen,
        "wireless_total": report.wireless_total,
        "entries": entries,
    });

    writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
    Ok(())
}

fn property_json(value: &PropertyValue) -> serde_json::Value {
    match value {
        PropertyValue::Text(text) => json!(text),
        PropertyValue::Flag(flag) => json!(flag),
        PropertyValue::Number(number) => json!(number),
    }
}

fn charge_json(charge: &ChargeResult) -> serde_json::Value {
    match charge {
        ChargeResult::Percentage(percent) => json!({ "percent": percent }),
        ChargeResult::Unavailable(reason) => json!({ "unavailable": reason.key() }),
    }
}

#[cfg(test)]
mod tests {
    use hidvolt_platform::{DeviceHandle, PropertyBag};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::data::scan::DeviceEntry;

    fn entry(charge: ChargeResult) -> DeviceEntry {
        let mut properties = PropertyBag::new();
        properties.insert(
            "device.vendor_id".to_string(),
            PropertyValue::Number(0x046d),
        );
        DeviceEntry {
            name: "Test Mouse".to_string(),
            id: "HID#{00001812-0000-1000-8000-00805f9b34fb}&Col01#9&0".to_string(),
            properties,
            charge,
            connected: None,
            handle: Some(DeviceHandle {
                vendor_id: 0x046d,
                product_id: 0xc547,
                version: 0x0102,
                manufacturer: Some("Fake Labs".to_string()),
                product: Some("Fake Mouse".to_string()),
            }),
            access_error: None,
        }
    }

    fn report_with(entries: Vec<DeviceEntry>) -> ScanReport {
        let wireless_total = entries.len();
        ScanReport {
            entries,
            devices_seen: wireless_total + 1,
            wireless_total,
        }
    }

    fn text_of(report: &ScanReport) -> String {
        let mut buffer = Vec::new();
        render_text(report, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn text_report_carries_entries_and_total() {
        let report = report_with(vec![entry(ChargeResult::Percentage(25))]);
        let text = text_of(&report);

        assert!(text.contains("Name: Test Mouse"));
        assert!(text.contains("Charge: 25%"));
        assert!(text.contains("Connected: unknown"));
        assert!(text.contains("VID: 046d"));
        assert!(text.contains("Wireless pointing devices found: 1"));
    }

    #[test]
    fn missing_source_renders_the_vendor_hint() {
        let report = report_with(vec![entry(ChargeResult::Unavailable(
            UnavailableReason::NoBatterySource,
        ))]);
        let text = text_of(&report);

        assert!(text.contains("unavailable (no battery source reported by the host)"));
        assert!(text.contains("vendor's own software"));
    }

    #[test]
    fn empty_scan_says_so() {
        let report = ScanReport {
            entries: Vec::new(),
            devices_seen: 0,
            wireless_total: 0,
        };
        let text = text_of(&report);

        assert!(text.contains("No matching HID pointing devices found."));
        assert!(text.contains("Wireless pointing devices found: 0"));
    }

    #[test]
    fn json_report_matches_the_text_counts() {
        let report = report_with(vec![
            entry(ChargeResult::Percentage(25)),
            entry(ChargeResult::Unavailable(UnavailableReason::QueryError)),
        ]);

        let mut buffer = Vec::new();
        render_json(&report, &mut buffer).unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(doc["wireless_total"], 2);
        assert_eq!(doc["devices_seen"], 3);
        assert_eq!(doc["entries"].as_array().unwrap().len(), 2);
        assert_eq!(doc["entries"][0]["charge"]["percent"], 25);
        assert_eq!(doc["entries"][1]["charge"]["unavailable"], "query_error");
        assert_eq!(doc["entries"][0]["metadata"]["vendor_id"], 0x046d);
        assert_eq!(doc["entries"][0]["connected"], serde_json::Value::Null);
    }
}
