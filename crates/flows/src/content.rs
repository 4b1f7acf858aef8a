//! Hover overlay content. Only the descriptor is built here; turning it into
//! markup is the host's concern.

use chrono::{DateTime, Utc};
use foundation::Time;

use crate::record::{FlowRecord, GeoLocation};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OverlayKind {
    Transfer,
    Location,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayRow {
    pub label: String,
    pub value: String,
}

impl OverlayRow {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayContent {
    pub kind: OverlayKind,
    pub header: String,
    pub rows: Vec<OverlayRow>,
}

impl OverlayContent {
    pub fn row(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
    }
}

pub fn transfer_content(record: &FlowRecord) -> OverlayContent {
    let duration = record.duration_ms();
    OverlayContent {
        kind: OverlayKind::Transfer,
        header: "Transfer".to_string(),
        rows: vec![
            OverlayRow::new("DateTime Start", format_timestamp(record.start())),
            OverlayRow::new("DateTime End", format_timestamp(record.end())),
            OverlayRow::new("Duration", format_duration(duration)),
            OverlayRow::new("Size", format_size(record.byte_size as f64)),
            OverlayRow::new("Avg. Speed", format_speed(record.byte_size, duration)),
        ],
    }
}

pub fn location_content(location: &GeoLocation) -> OverlayContent {
    OverlayContent {
        kind: OverlayKind::Location,
        header: location.ip_address.clone(),
        rows: vec![
            OverlayRow::new("Hostname", location.hostname.as_str()),
            OverlayRow::new("Organization", location.organization.as_str()),
            OverlayRow::new("Region", location.region.as_str()),
        ],
    }
}

/// `Sat, 02 Jan 2016 10:00:00 UTC`.
pub fn format_timestamp(t: Time) -> String {
    match DateTime::<Utc>::from_timestamp_millis(t.millis()) {
        Some(dt) => dt.format("%a, %d %b %Y %H:%M:%S UTC").to_string(),
        None => format!("{} ms", t.millis()),
    }
}

/// `1 hours, 2 minutes, 3 seconds, 400 milliseconds`.
pub fn format_duration(ms: i64) -> String {
    let ms = ms.max(0);
    format!(
        "{} hours, {} minutes, {} seconds, {} milliseconds",
        ms / 3_600_000,
        (ms / 60_000) % 60,
        (ms / 1_000) % 60,
        ms % 1_000
    )
}

const SIZE_UNITS: [&str; 9] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB"];

/// Binary units with at most two decimals: `1.5 KiB`, `512 B`.
pub fn format_size(bytes: f64) -> String {
    if !bytes.is_finite() || bytes <= 0.0 {
        return "0 B".to_string();
    }
    let mut value = bytes;
    let mut exp = 0usize;
    while value >= 1024.0 && exp < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        exp += 1;
    }
    format!("{} {}", trim_decimals(value), SIZE_UNITS[exp])
}

/// Size per second, `n/a` when the duration is zero.
pub fn format_speed(bytes: u64, duration_ms: i64) -> String {
    if duration_ms <= 0 {
        return "n/a".to_string();
    }
    let per_second = bytes as f64 * 1_000.0 / duration_ms as f64;
    format!("{} / s", format_size(per_second))
}

fn trim_decimals(v: f64) -> String {
    let s = format!("{v:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
