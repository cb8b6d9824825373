//! Timeframe and timestamp conversions.
//!
//! Timeframes use exchange notation: a count plus a unit suffix, e.g.
//! "1m", "15m", "4h", "1d", "1w", "1M". Months are fixed at 30 days.

use chrono::NaiveDateTime;

use crate::domain::error::CandlebotError;

/// Convert a timeframe string to its length in minutes.
pub fn tf_to_minutes(tf: &str) -> Result<i64, CandlebotError> {
    let invalid = || CandlebotError::InvalidTimeframe {
        value: tf.to_string(),
    };

    let Some((unit_start, unit)) = tf.char_indices().last() else {
        return Err(invalid());
    };
    let count: i64 = tf[..unit_start].parse().map_err(|_| invalid())?;
    if count <= 0 {
        return Err(invalid());
    }
    let unit_minutes = match unit {
        'm' => 1,
        'h' => 60,
        'd' => 60 * 24,
        'w' => 60 * 24 * 7,
        'M' => 60 * 24 * 30,
        _ => return Err(invalid()),
    };
    Ok(count * unit_minutes)
}

/// Parse a naive UTC datetime string to epoch milliseconds.
///
/// Accepts "T" or space between date and time, with optional fractional
/// seconds.
pub fn time_to_millis(time: &str) -> Result<i64, CandlebotError> {
    // %.f matches an optional fractional part, so these also cover
    // whole-second inputs.
    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    for format in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(time, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }
    Err(CandlebotError::InvalidTimestamp {
        value: time.to_string(),
    })
}
