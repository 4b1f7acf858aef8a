use foundation::math::GeoPoint;
use foundation::{Time, TimeSpan};

/// Opaque record identity (the `PID` of the wire format); the sole diffing key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlowId(String);

impl FlowId {
    pub fn new(id: impl Into<String>) -> Self {
        FlowId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for FlowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FlowId {
    fn from(s: &str) -> Self {
        FlowId::new(s)
    }
}

/// A geographic endpoint plus the host details shown on hover.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoLocation {
    pub longitude: f64,
    pub latitude: f64,
    pub ip_address: String,
    pub hostname: String,
    pub organization: String,
    pub region: String,
}

impl GeoLocation {
    pub fn at(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            ..Self::default()
        }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Source,
    Destination,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Source => f.write_str("source"),
            Endpoint::Destination => f.write_str("destination"),
        }
    }
}

/// One observed transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowRecord {
    pub id: FlowId,
    pub src: GeoLocation,
    pub dst: GeoLocation,
    pub span: TimeSpan,
    pub byte_size: u64,
}

impl FlowRecord {
    pub fn new(id: impl Into<String>, src: GeoLocation, dst: GeoLocation, span: TimeSpan, byte_size: u64) -> Self {
        Self {
            id: FlowId::new(id),
            src,
            dst,
            span,
            byte_size,
        }
    }

    pub fn start(&self) -> Time {
        self.span.start
    }

    pub fn end(&self) -> Time {
        self.span.end
    }

    pub fn duration_ms(&self) -> i64 {
        self.span.duration_ms()
    }

    /// `start <= t <= end`.
    pub fn is_active_at(&self, t: Time) -> bool {
        self.span.contains(t)
    }

    pub fn location(&self, endpoint: Endpoint) -> &GeoLocation {
        match endpoint {
            Endpoint::Source => &self.src,
            Endpoint::Destination => &self.dst,
        }
    }

    pub fn validate(&self) -> Result<(), RecordError> {
        if self.id.is_empty() {
            return Err(RecordError::EmptyId);
        }
        for endpoint in [Endpoint::Source, Endpoint::Destination] {
            let loc = self.location(endpoint);
            if !loc.point().is_valid() {
                return Err(RecordError::InvalidCoordinate {
                    id: self.id.clone(),
                    endpoint,
                    longitude: loc.longitude,
                    latitude: loc.latitude,
                });
            }
        }
        if !self.span.is_ordered() {
            return Err(RecordError::InvertedSpan {
                id: self.id.clone(),
                start: self.span.start,
                end: self.span.end,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordError {
    EmptyId,
    InvalidCoordinate {
        id: FlowId,
        endpoint: Endpoint,
        longitude: f64,
        latitude: f64,
    },
    InvertedSpan {
        id: FlowId,
        start: Time,
        end: Time,
    },
    /// Raised while decoding: a required field was absent or unusable.
    MissingField {
        id: Option<FlowId>,
        field: &'static str,
    },
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::EmptyId => write!(f, "record id is empty"),
            RecordError::InvalidCoordinate {
                id,
                endpoint,
                longitude,
                latitude,
            } => write!(
                f,
                "record {id}: {endpoint} coordinate ({longitude}, {latitude}) is out of range"
            ),
            RecordError::InvertedSpan { id, start, end } => write!(
                f,
                "record {id}: start {} is after end {}",
                start.millis(),
                end.millis()
            ),
            RecordError::MissingField { id: Some(id), field } => {
                write!(f, "record {id}: missing or invalid field '{field}'")
            }
            RecordError::MissingField { id: None, field } => {
                write!(f, "record: missing or invalid field '{field}'")
            }
        }
    }
}

impl std::error::Error for RecordError {}

#[cfg(test)]
mod tests {
    use super::{Endpoint, FlowRecord, GeoLocation, RecordError};
    use foundation::{Time, TimeSpan};

    fn record(id: &str, src: (f64, f64), start: i64, end: i64) -> FlowRecord {
        FlowRecord::new(
            id,
            GeoLocation::at(src.0, src.1),
            GeoLocation::at(10.0, 10.0),
            TimeSpan::new(Time(start), Time(end)),
            1,
        )
    }

    #[test]
    fn valid_record_passes() {
        assert_eq!(record("a", (1.0, 2.0), 0, 0).validate(), Ok(()));
    }

    #[test]
    fn rejects_each_kind_of_invalid_record() {
        assert_eq!(record(" ", (1.0, 2.0), 0, 1).validate(), Err(RecordError::EmptyId));
        assert!(matches!(
            record("a", (181.0, 2.0), 0, 1).validate(),
            Err(RecordError::InvalidCoordinate {
                endpoint: Endpoint::Source,
                ..
            })
        ));
        assert!(matches!(
            record("a", (f64::NAN, 2.0), 0, 1).validate(),
            Err(RecordError::InvalidCoordinate { .. })
        ));
        assert!(matches!(
            record("a", (1.0, 2.0), 5, 1).validate(),
            Err(RecordError::InvertedSpan { .. })
        ));
    }

    #[test]
    fn activity_is_inclusive() {
        let r = record("a", (0.0, 0.0), 100, 200);
        assert!(r.is_active_at(Time(100)));
        assert!(r.is_active_at(Time(200)));
        assert!(!r.is_active_at(Time(201)));
    }
}
