//! Battery correlation for one discovered device.

use std::fmt;

use hidvolt_platform::{BatteryEnumerator, BatteryStatus, DeviceRecord};
use tracing::{debug, warn};

/// Outcome of one charge lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeResult {
    /// Normalized charge level, always within 0..=100.
    Percentage(u8),
    Unavailable(UnavailableReason),
}

impl fmt::Display for ChargeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargeResult::Percentage(percent) => write!(f, "{}%", percent),
            ChargeResult::Unavailable(reason) => write!(f, "unavailable ({})", reason.label()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    /// The host exposes no battery-class source at all.
    NoBatterySource,
    /// Sources exist, but none produced a usable capacity reading.
    NoUsableReport,
    /// Talking to the battery subsystem failed.
    QueryError,
}

impl UnavailableReason {
    pub fn label(&self) -> &'static str {
        match self {
            UnavailableReason::NoBatterySource => "no battery source reported by the host",
            UnavailableReason::NoUsableReport => "no battery source produced a usable report",
            UnavailableReason::QueryError => "battery query failed",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            UnavailableReason::NoBatterySource => "no_battery_source",
            UnavailableReason::NoUsableReport => "no_usable_report",
            UnavailableReason::QueryError => "query_error",
        }
    }
}

/// Best-effort charge lookup for one device.
///
/// Device ids and battery-source ids are unrelated namespaces, so this
/// scans every battery source on the host and takes the first usable
/// reading rather than attempting a per-device join. Every failure is
/// contained here; the caller's device loop never sees an error.
pub fn resolve_charge(
    device: &DeviceRecord,
    batteries: &mut dyn BatteryEnumerator,
) -> ChargeResult {
    let sources = match batteries.find_all() {
        Ok(sources) => sources,
        Err(err) => {
            warn!(device = %device.id, error = %err, "battery source enumeration failed");
            return ChargeResult::Unavailable(UnavailableReason::QueryError);
        }
    };

    if sources.is_empty() {
        debug!(device = %device.id, "host reports no battery-class sources");
        return ChargeResult::Unavailable(UnavailableReason::NoBatterySource);
    }

    debug!(
        device = %device.id,
        sources = sources.len(),
        "scanning battery sources"
    );

    for source in &sources {
        let report = match batteries.report(&source.id) {
            Ok(report) => report,
            Err(err) => {
                warn!(source = %source.id, error = %err, "battery report fetch failed");
                return ChargeResult::Unavailable(UnavailableReason::QueryError);
            }
        };

        if report.status == BatteryStatus::NotPresent {
            debug!(source = %source.id, "battery absent or unsupported for this source");
            continue;
        }

        let (Some(remaining), Some(full)) = (
            report.remaining_capacity_mwh,
            report.full_charge_capacity_mwh,
        ) else {
            debug!(source = %source.id, "capacity counters incomplete");
            continue;
        };

        if full == 0 {
            debug!(source = %source.id, "full-charge capacity is zero");
            continue;
        }

        // Widened so remaining * 100 cannot overflow; clamped in case the
        // source reports remaining > full.
        let percent = ((u64::from(remaining) * 100) / u64::from(full)).min(100) as u8;
        debug!(source = %source.id, percent, "usable reading");
        return ChargeResult::Percentage(percent);
    }

    ChargeResult::Unavailable(UnavailableReason::NoUsableReport)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use hidvolt_platform::{
        BatteryRecord, BatteryReport, EnumerationError, PropertyBag,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    struct FakeBatteries {
        sources: Vec<BatteryRecord>,
        reports: BTreeMap<String, BatteryReport>,
        fail_find: bool,
        fail_report: bool,
    }

    impl FakeBatteries {
        fn new() -> Self {
            Self {
                sources: Vec::new(),
                reports: BTreeMap::new(),
                fail_find: false,
                fail_report: false,
            }
        }

        fn with_source(mut self, id: &str, report: BatteryReport) -> Self {
            self.sources.push(BatteryRecord {
                id: id.to_string(),
                display_name: None,
                properties: PropertyBag::new(),
            });
            self.reports.insert(id.to_string(), report);
            self
        }
    }

    impl BatteryEnumerator for FakeBatteries {
        fn find_all(
            &mut self,
        ) -> Result<Vec<BatteryRecord>, EnumerationError> {
            if self.fail_find {
                return Err(EnumerationError::Failed("battery walk failed".to_string()));
            }
            Ok(self.sources.clone())
        }

        fn report(&mut self, id: &str) -> Result<BatteryReport, EnumerationError> {
            if self.fail_report {
                return Err(EnumerationError::Failed("report fetch failed".to_string()));
            }
            self.reports
                .get(id)
                .copied()
                .ok_or_else(|| EnumerationError::NotFound(id.to_string()))
        }
    }

    fn device() -> DeviceRecord {
        DeviceRecord {
            id: "HID#{00001812-0000-1000-8000-00805f9b34fb}&Col01#9&0".to_string(),
            display_name: Some("Test Mouse".to_string()),
            properties: PropertyBag::new(),
        }
    }

    fn report(
        status: BatteryStatus,
        remaining: Option<u32>,
        full: Option<u32>,
    ) -> BatteryReport {
        BatteryReport {
            status,
            remaining_capacity_mwh: remaining,
            full_charge_capacity_mwh: full,
        }
    }

    #[test]
    fn no_sources_means_no_battery_source() {
        let mut batteries = FakeBatteries::new();
        assert_eq!(
            resolve_charge(&device(), &mut batteries),
            ChargeResult::Unavailable(UnavailableReason::NoBatterySource)
        );
    }

    #[test]
    fn ratio_is_floored() {
        let mut batteries = FakeBatteries::new().with_source(
            "BATTERY#0",
            report(BatteryStatus::Present, Some(50), Some(200)),
        );
        assert_eq!(
            resolve_charge(&device(), &mut batteries),
            ChargeResult::Percentage(25)
        );

        let mut batteries = FakeBatteries::new().with_source(
            "BATTERY#0",
            report(BatteryStatus::Present, Some(2), Some(3)),
        );
        assert_eq!(
            resolve_charge(&device(), &mut batteries),
            ChargeResult::Percentage(66)
        );
    }

    #[test]
    fn zero_or_missing_full_capacity_never_divides() {
        let mut batteries = FakeBatteries::new().with_source(
            "BATTERY#0",
            report(BatteryStatus::Present, Some(50), Some(0)),
        );
        assert_eq!(
            resolve_charge(&device(), &mut batteries),
            ChargeResult::Unavailable(UnavailableReason::NoUsableReport)
        );

        let mut batteries = FakeBatteries::new().with_source(
            "BATTERY#0",
            report(BatteryStatus::Present, Some(50), None),
        );
        assert_eq!(
            resolve_charge(&device(), &mut batteries),
            ChargeResult::Unavailable(UnavailableReason::NoUsableReport)
        );
    }

    #[test]
    fn remaining_above_full_clamps_to_hundred() {
        let mut batteries = FakeBatteries::new().with_source(
            "BATTERY#0",
            report(BatteryStatus::Present, Some(250), Some(200)),
        );
        assert_eq!(
            resolve_charge(&device(), &mut batteries),
            ChargeResult::Percentage(100)
        );
    }

    #[test]
    fn large_capacities_do_not_overflow() {
        let mut batteries = FakeBatteries::new().with_source(
            "BATTERY#0",
            report(
                BatteryStatus::Present,
                Some(3_000_000_000),
                Some(4_000_000_000),
            ),
        );
        assert_eq!(
            resolve_charge(&device(), &mut batteries),
            ChargeResult::Percentage(75)
        );
    }

    #[test]
    fn not_present_sources_are_skipped_not_fatal() {
        let mut batteries = FakeBatteries::new()
            .with_source(
                "BATTERY#0",
                report(BatteryStatus::NotPresent, None, None),
            )
            .with_source(
                "BATTERY#1",
                report(BatteryStatus::Present, Some(80), Some(100)),
            );
        assert_eq!(
            resolve_charge(&device(), &mut batteries),
            ChargeResult::Percentage(80)
        );
    }

    #[test]
    fn all_sources_not_present_means_no_usable_report() {
        let mut batteries = FakeBatteries::new()
            .with_source(
                "BATTERY#0",
                report(BatteryStatus::NotPresent, None, None),
            )
            .with_source(
                "BATTERY#1",
                report(BatteryStatus::NotPresent, None, None),
            );
        assert_eq!(
            resolve_charge(&device(), &mut batteries),
            ChargeResult::Unavailable(UnavailableReason::NoUsableReport)
        );
    }

    #[test]
    fn enumeration_failure_downgrades_to_query_error() {
        let mut batteries = FakeBatteries::new();
        batteries.fail_find = true;
        assert_eq!(
            resolve_charge(&device(), &mut batteries),
            ChargeResult::Unavailable(UnavailableReason::QueryError)
        );
    }

    #[test]
    fn report_failure_downgrades_to_query_error() {
        let mut batteries = FakeBatteries::new().with_source(
            "BATTERY#0",
            report(BatteryStatus::Present, Some(50), Some(100)),
        );
        batteries.fail_report = true;
        assert_eq!(
            resolve_charge(&device(), &mut batteries),
            ChargeResult::Unavailable(UnavailableReason::QueryError)
        );
    }

    #[test]
    fn resolution_is_idempotent_per_snapshot() {
        let mut batteries = FakeBatteries::new()
            .with_source(
                "BATTERY#0",
                report(BatteryStatus::NotPresent, None, None),
            )
            .with_source(
                "BATTERY#1",
                report(BatteryStatus::Present, Some(42), Some(100)),
            );

        let first = resolve_charge(&device(), &mut batteries);
        let second = resolve_charge(&device(), &mut batteries);
        assert_eq!(first, second);
        assert_eq!(first, ChargeResult::Percentage(42));
    }

    #[test]
    fn display_renders_percentage_and_reasons() {
        assert_eq!(ChargeResult::Percentage(25).to_string(), "25%");
        assert_eq!(
            ChargeResult::Unavailable(UnavailableReason::NoBatterySource).to_string(),
            "unavailable (no battery source reported by the host)"
        );
    }
}
