//! Flow record payloads: a JSON array of transfer objects.

use chrono::{DateTime, NaiveDateTime};
use flows::{FlowId, FlowRecord, GeoLocation, RecordError};
use foundation::{Time, TimeSpan};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub enum FlowFormatError {
    Json(String),
    /// The payload was valid JSON but not an array.
    Malformed { actual: &'static str },
    /// The collaborator answered with an error object.
    Remote { display_name: String, message: String },
    Decode { position: usize, reason: String },
    InvalidRecord { position: usize, source: RecordError },
}

impl std::fmt::Display for FlowFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowFormatError::Json(e) => write!(f, "flow payload is not JSON: {e}"),
            FlowFormatError::Malformed { actual } => {
                write!(f, "data is malformed: expected array, got {actual}")
            }
            FlowFormatError::Remote {
                display_name,
                message,
            } => write!(f, "{display_name}: {message}"),
            FlowFormatError::Decode { position, reason } => {
                write!(f, "record at position {position} could not be decoded: {reason}")
            }
            FlowFormatError::InvalidRecord { position, source } => {
                write!(f, "invalid record at position {position}: {source}")
            }
        }
    }
}

impl std::error::Error for FlowFormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FlowFormatError::InvalidRecord { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Number(serde_json::Number),
    Text(String),
}

impl RawScalar {
    fn as_f64(&self) -> Option<f64> {
        match self {
            RawScalar::Number(n) => n.as_f64(),
            RawScalar::Text(s) => s.trim().parse().ok(),
        }
    }

    fn to_id(&self) -> String {
        match self {
            RawScalar::Number(n) => n.to_string(),
            RawScalar::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawGeo {
    longitude: Option<RawScalar>,
    latitude: Option<RawScalar>,
    #[serde(default)]
    ip_address: Option<String>,
    #[serde(default)]
    hostname: Option<String>,
    #[serde(default)]
    organization: Option<String>,
    #[serde(default)]
    region: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "PID")]
    pid: Option<RawScalar>,
    #[serde(rename = "geoSrc")]
    geo_src: Option<RawGeo>,
    #[serde(rename = "geoDst")]
    geo_dst: Option<RawGeo>,
    start_timestamp: Option<RawScalar>,
    end_timestamp: Option<RawScalar>,
    nbytes_size: Option<RawScalar>,
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Epoch milliseconds, or an RFC 3339 / `YYYY-MM-DD HH:MM:SS` UTC string.
pub fn parse_timestamp(raw: &str) -> Option<Time> {
    let raw = raw.trim();
    if let Ok(ms) = raw.parse::<i64>() {
        return Some(Time(ms));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(Time(dt.timestamp_millis()));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Time(naive.and_utc().timestamp_millis()))
}

fn timestamp(raw: Option<&RawScalar>) -> Option<Time> {
    match raw? {
        RawScalar::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).map(Time),
        RawScalar::Text(s) => parse_timestamp(s),
    }
}

fn location(raw: Option<&RawGeo>, id: &FlowId, field: &'static str) -> Result<GeoLocation, RecordError> {
    let missing = || RecordError::MissingField {
        id: Some(id.clone()),
        field,
    };
    let geo = raw.ok_or_else(missing)?;
    let longitude = geo.longitude.as_ref().and_then(RawScalar::as_f64).ok_or_else(missing)?;
    let latitude = geo.latitude.as_ref().and_then(RawScalar::as_f64).ok_or_else(missing)?;
    Ok(GeoLocation {
        longitude,
        latitude,
        ip_address: geo.ip_address.clone().unwrap_or_default(),
        hostname: geo.hostname.clone().unwrap_or_default(),
        organization: geo.organization.clone().unwrap_or_default(),
        region: geo.region.clone().unwrap_or_default(),
    })
}

impl RawRecord {
    fn into_record(self) -> Result<FlowRecord, RecordError> {
        let id = self
            .pid
            .as_ref()
            .map(|p| FlowId::new(p.to_id()))
            .ok_or(RecordError::MissingField { id: None, field: "PID" })?;
        let missing = |field: &'static str| RecordError::MissingField {
            id: Some(id.clone()),
            field,
        };
        let src = location(self.geo_src.as_ref(), &id, "geoSrc")?;
        let dst = location(self.geo_dst.as_ref(), &id, "geoDst")?;
        let start = timestamp(self.start_timestamp.as_ref()).ok_or_else(|| missing("start_timestamp"))?;
        let end = timestamp(self.end_timestamp.as_ref()).ok_or_else(|| missing("end_timestamp"))?;
        let bytes = self
            .nbytes_size
            .as_ref()
            .and_then(RawScalar::as_f64)
            .filter(|b| b.is_finite() && *b >= 0.0)
            .ok_or_else(|| missing("nbytes_size"))?;
        Ok(FlowRecord {
            id,
            src,
            dst,
            span: TimeSpan::new(start, end),
            byte_size: bytes.trunc() as u64,
        })
    }
}

pub fn parse_flow_records(payload: &str) -> Result<Vec<FlowRecord>, FlowFormatError> {
    let value: Value = serde_json::from_str(payload).map_err(|e| FlowFormatError::Json(e.to_string()))?;
    parse_flow_value(value)
}

/// Decodes every record; the first failure aborts the whole payload.
pub fn parse_flow_value(value: Value) -> Result<Vec<FlowRecord>, FlowFormatError> {
    if let Value::Object(obj) = &value
        && obj.contains_key("displayName")
        && obj.contains_key("message")
    {
        let text = |key: &str| match obj.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        let err = FlowFormatError::Remote {
            display_name: text("displayName"),
            message: text("message"),
        };
        warn!(error = %err, "flow source reported an error");
        return Err(err);
    }

    let Value::Array(items) = value else {
        let err = FlowFormatError::Malformed {
            actual: json_kind(&value),
        };
        warn!(error = %err, "rejected flow payload");
        return Err(err);
    };

    let mut out = Vec::with_capacity(items.len());
    for (position, item) in items.into_iter().enumerate() {
        let raw: RawRecord = serde_json::from_value(item).map_err(|e| FlowFormatError::Decode {
            position,
            reason: e.to_string(),
        })?;
        let record = raw
            .into_record()
            .map_err(|source| FlowFormatError::InvalidRecord { position, source })?;
        out.push(record);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{FlowFormatError, parse_flow_records, parse_timestamp};
    use flows::RecordError;
    use foundation::Time;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"[
      {
        "PID": 17,
        "geoSrc": {"longitude": -0.1, "latitude": 51.5, "ip_address": "198.51.100.4",
                   "hostname": "src.example.org", "organization": "Origin", "region": "England"},
        "geoDst": {"longitude": "2.35", "latitude": "48.85", "ip_address": "203.0.113.9",
                   "hostname": null, "organization": "Dest", "region": "Ile-de-France"},
        "start_timestamp": "2016-01-02T10:00:00Z",
        "end_timestamp": 1451728801500,
        "nbytes_size": "2048"
      }
    ]"#;

    #[test]
    fn decodes_original_field_names() {
        let records = parse_flow_records(SAMPLE).expect("records");
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.id.as_str(), "17");
        assert_eq!(r.src.hostname, "src.example.org");
        assert_eq!(r.dst.hostname, "");
        assert_eq!(r.dst.longitude, 2.35);
        assert_eq!(r.start(), Time(1_451_728_800_000));
        assert_eq!(r.end(), Time(1_451_728_801_500));
        assert_eq!(r.byte_size, 2_048);
    }

    #[test]
    fn non_array_is_malformed() {
        assert_eq!(
            parse_flow_records(r#"{"rows": []}"#).unwrap_err(),
            FlowFormatError::Malformed { actual: "object" }
        );
        assert_eq!(
            parse_flow_records("42").unwrap_err().to_string(),
            "data is malformed: expected array, got number"
        );
    }

    #[test]
    fn error_payload_carries_message() {
        let err = parse_flow_records(r#"{"displayName": "GeneralError", "message": "db down"}"#).unwrap_err();
        assert_eq!(
            err,
            FlowFormatError::Remote {
                display_name: "GeneralError".to_string(),
                message: "db down".to_string(),
            }
        );
    }

    #[test]
    fn missing_geo_is_invalid_record() {
        let payload = r#"[{"PID": "a", "geoSrc": {"latitude": 1}, "geoDst": {"longitude": 1, "latitude": 1},
                          "start_timestamp": 0, "end_timestamp": 1, "nbytes_size": 1}]"#;
        match parse_flow_records(payload).unwrap_err() {
            FlowFormatError::InvalidRecord {
                position: 0,
                source: RecordError::MissingField { field, .. },
            } => assert_eq!(field, "geoSrc"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn timestamp_forms() {
        assert_eq!(parse_timestamp("1000"), Some(Time(1_000)));
        assert_eq!(parse_timestamp("1970-01-01 00:00:01"), Some(Time(1_000)));
        assert_eq!(parse_timestamp("1970-01-01T00:00:01.250+00:00"), Some(Time(1_250)));
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
