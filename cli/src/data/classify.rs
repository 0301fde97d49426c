//! Wireless pointing-device heuristic.

use std::sync::OnceLock;

use regex::Regex;

/// Collection-index suffix marking the first HID collection of a composite
/// device. Case varies with the API that produced the path, so the check
/// is ASCII-case-insensitive; any other collection index is rejected.
const COLLECTION_ONE_MARKER: &str = "&col01";

fn class_guid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"\{[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}\}",
        )
        .expect("hand-written pattern")
    })
}

/// Returns true when a device path carries a brace-delimited class GUID
/// token and the collection-01 marker.
///
/// This is a heuristic, not a transport check: any HID class GUID
/// satisfies it, so a wired composite device's first collection matches
/// too. The path string carries nothing that would identify the transport
/// as Bluetooth, so callers should read a positive as "looks like the
/// primary interface of a composite device" and no more.
///
/// Pure and panic-free; malformed input yields false.
pub fn is_wireless_pointing_device(id: &str) -> bool {
    if !class_guid_pattern().is_match(id) {
        return false;
    }
    id.to_ascii_lowercase().contains(COLLECTION_ONE_MARKER)
}
