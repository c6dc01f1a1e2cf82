// Tolerant parsers for the string-encoded numbers and timestamps the upstream market APIs return.
use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::str::FromStr;

// Parses "123.45", " 12.5% ", "1,234.5" into f64. Rejects NaN and infinities.
pub fn parse_number(s: &str) -> Result<f64> {
    let normalized = s.trim().trim_end_matches('%').replace(',', "");

    let value = f64::from_str(&normalized).map_err(|e| anyhow!("Failed to parse number '{}': {}", s, e))?;
    if !value.is_finite() {
        return Err(anyhow!("Number '{}' is not finite", s));
    }
    Ok(value)
}

/// Missing, empty, "None" or otherwise unparseable values all become 0.
pub fn number_or_zero(s: Option<&str>) -> f64 {
    s.and_then(|v| parse_number(v).ok()).unwrap_or(0.0)
}

// Accepts "2024-05-01 15:30:00", "2024-05-01T15:30:00" and date-only "2024-05-01" (midnight).
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(ts);
        }
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| anyhow!("Failed to parse timestamp '{}': {}", s, e))?;
    date.and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow!("Timestamp '{}' has no valid midnight", s))
}
