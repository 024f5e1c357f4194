use chrono::{DateTime, Local, Utc};

/// Relative age of `dt` as seen from `now`, e.g. "5m ago".
pub fn relative_time_from(dt: &DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(dt);
    let seconds = duration.num_seconds();

    if seconds < 60 {
        return "just now".to_string();
    }
    if seconds < 3_600 {
        return format!("{}m ago", duration.num_minutes());
    }
    if seconds < 86_400 {
        return format!("{}h ago", duration.num_hours());
    }

    match duration.num_days() {
        d if d < 30 => format!("{}d ago", d),
        d if d < 365 => format!("{}mo ago", d / 30),
        d => format!("{}y ago", d / 365),
    }
}

pub fn relative_time(dt: &DateTime<Utc>) -> String {
    relative_time_from(dt, Utc::now())
}

/// Local wall-clock stamp for tables, "2025-10-03 14:10".
pub fn short_timestamp(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
