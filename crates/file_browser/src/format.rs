//! Display formatting for file metadata.

use chrono::{Local, TimeZone};

/// Human-readable size: integer bytes below 1024, one decimal above,
/// capped at GB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Localized modification time, `None` for an unrepresentable epoch.
pub fn format_mtime(epoch: u64) -> Option<String> {
    let timestamp = i64::try_from(epoch).ok()?;
    Local
        .timestamp_opt(timestamp, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
}
