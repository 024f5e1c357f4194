use chrono::{DateTime, Duration, TimeZone, Utc};
use veraclaim::util::time::{relative_time, relative_time_from, short_timestamp};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 3, 14, 10, 0).unwrap()
}

fn ago(d: Duration) -> String {
    relative_time_from(&(now() - d), now())
}

#[test]
fn test_just_now() {
    assert_eq!(relative_time(&Utc::now()), "just now");
    assert_eq!(ago(Duration::seconds(59)), "just now");
}

#[test]
fn test_minutes() {
    assert_eq!(ago(Duration::seconds(61)), "1m ago");
    assert_eq!(ago(Duration::minutes(59)), "59m ago");
}

#[test]
fn test_hours() {
    assert_eq!(ago(Duration::hours(1)), "1h ago");
    assert_eq!(ago(Duration::hours(23)), "23h ago");
}

#[test]
fn test_days() {
    assert_eq!(ago(Duration::days(1)), "1d ago");
    assert_eq!(ago(Duration::days(29)), "29d ago");
}

#[test]
fn test_months() {
    assert_eq!(ago(Duration::days(30)), "1mo ago");
    assert_eq!(ago(Duration::days(200)), "6mo ago");
    assert_eq!(ago(Duration::days(364)), "12mo ago");
}

#[test]
fn test_years() {
    assert_eq!(ago(Duration::days(365)), "1y ago");
    assert_eq!(ago(Duration::days(1000)), "2y ago");
}

#[test]
fn test_future_timestamp() {
    assert_eq!(relative_time_from(&(now() + Duration::hours(5)), now()), "just now");
}

#[test]
fn test_short_timestamp_shape() {
    let stamp = short_timestamp(&now());
    // Local timezone varies; only the layout is fixed.
    assert_eq!(stamp.len(), "2025-10-03 14:10".len());
    assert_eq!(&stamp[4..5], "-");
    assert_eq!(&stamp[10..11], " ");
    assert_eq!(&stamp[13..14], ":");
}
