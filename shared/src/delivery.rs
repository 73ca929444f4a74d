//! Production lead-time estimate in business days

use chrono::{DateTime, Duration, Utc};

/// Volume per letter above which production takes two extra days
pub const LARGE_LETTER_VOLUME: f64 = 500.0;

/// Volume per letter above which production takes one extra day
pub const MEDIUM_LETTER_VOLUME: f64 = 200.0;

/// Base days by order size, highest bracket last
const BASE_DAYS: &[(u32, u32)] = &[(5, 3), (20, 5), (50, 7), (100, 10)];
const BASE_DAYS_OVER_100: u32 = 14;

/// Estimate business days from order to completion.
///
/// No cap is applied to the result.
pub fn estimate_delivery_days(
    total_units: u32,
    volume_per_unit: f64,
    led_lighting: bool,
    installation: bool,
) -> u32 {
    let base = BASE_DAYS
        .iter()
        .find(|(max_units, _)| total_units <= *max_units)
        .map(|(_, days)| *days)
        .unwrap_or(BASE_DAYS_OVER_100);

    let size = if volume_per_unit > LARGE_LETTER_VOLUME {
        2
    } else if volume_per_unit > MEDIUM_LETTER_VOLUME {
        1
    } else {
        0
    };

    // Scheduling an installer adds a day; LED wiring adds two
    let led = if led_lighting { 2 } else { 0 };
    let install = if installation { 1 } else { 0 };

    base + size + led + install
}

/// Calendar date the order is expected to be complete
pub fn estimated_completion(start: DateTime<Utc>, delivery_days: u32) -> DateTime<Utc> {
    start + Duration::days(i64::from(delivery_days))
}
