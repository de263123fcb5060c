//! Lifespan label synthesis
//!
//! The dataset carries no ground-truth lifespan, so the target is derived
//! from usage intensity with a fixed additive rule set over a common base.
//! All adjustments are additive, so evaluation order does not matter.

use lifespan_core::UsageRecord;

/// Default lifespan for normal usage, in months.
pub const BASE_LIFESPAN_MONTHS: i64 = 36;
/// Lower clamp for the synthesized label.
pub const MIN_LIFESPAN_MONTHS: i64 = 12;
/// Upper clamp for the synthesized label.
pub const MAX_LIFESPAN_MONTHS: i64 = 60;

// Rule thresholds. The two battery rules are mutually exclusive because
// LIGHT_DRAIN_MAH < HEAVY_DRAIN_MAH; that is an invariant of the constants,
// not an enforced check.
const HEAVY_DRAIN_MAH: f64 = 1800.0;
const LIGHT_DRAIN_MAH: f64 = 800.0;
const HIGH_SCREEN_HOURS: f64 = 5.0;
const POWER_USER_CLASS: f64 = 4.0;

/// Synthesize the lifespan label for one record, in months.
pub fn synthesize_lifespan(
    battery_drain_mah: f64,
    screen_on_hours: f64,
    behavior_class: f64,
) -> i64 {
    let mut months = BASE_LIFESPAN_MONTHS;

    if battery_drain_mah > HEAVY_DRAIN_MAH {
        months -= 12;
    }
    if screen_on_hours > HIGH_SCREEN_HOURS {
        months -= 6;
    }
    if behavior_class >= POWER_USER_CLASS {
        months -= 6;
    }
    if battery_drain_mah < LIGHT_DRAIN_MAH {
        months += 6;
    }

    months.clamp(MIN_LIFESPAN_MONTHS, MAX_LIFESPAN_MONTHS)
}

/// Label every record, as regression targets.
pub fn synthesize_labels(records: &[UsageRecord]) -> Vec<f64> {
    records
        .iter()
        .map(|record| {
            synthesize_lifespan(
                record.battery_drain_mah_per_day,
                record.screen_on_hours_per_day,
                record.user_behavior_class,
            ) as f64
        })
        .collect()
}
