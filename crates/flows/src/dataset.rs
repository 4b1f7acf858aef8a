use std::collections::BTreeSet;
use std::rc::Rc;

use foundation::{Time, TimeSpan};
use tracing::debug;

use crate::record::{FlowId, FlowRecord, RecordError};
use crate::temporal::{IntervalItem, TemporalIndex};

#[derive(Debug, Clone, PartialEq)]
pub enum DatasetError {
    /// No records: time bounds are undefined.
    Empty,
    DuplicateId(FlowId),
    InvalidRecord { position: usize, source: RecordError },
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Empty => write!(f, "dataset is empty; time bounds are undefined"),
            DatasetError::DuplicateId(id) => write!(f, "duplicate record id '{id}'"),
            DatasetError::InvalidRecord { position, source } => {
                write!(f, "invalid record at position {position}: {source}")
            }
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::InvalidRecord { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Validates every record and checks ids are unique. Stops at the first
/// problem, in input order.
pub fn check_records<'a>(records: impl IntoIterator<Item = &'a FlowRecord>) -> Result<usize, DatasetError> {
    let mut seen: BTreeSet<&'a FlowId> = BTreeSet::new();
    let mut count = 0usize;
    for (position, record) in records.into_iter().enumerate() {
        record
            .validate()
            .map_err(|source| DatasetError::InvalidRecord { position, source })?;
        if !seen.insert(&record.id) {
            return Err(DatasetError::DuplicateId(record.id.clone()));
        }
        count += 1;
    }
    Ok(count)
}

/// Validated, immutable snapshot of flow records with a temporal index.
///
/// Records are shared (`Rc`) so rendered elements can hold on to the record
/// they were built from.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Rc<FlowRecord>>,
    bounds: TimeSpan,
    byte_range: (u64, u64),
    index: TemporalIndex,
}

impl Dataset {
    pub fn new(records: Vec<FlowRecord>) -> Result<Self, DatasetError> {
        if records.is_empty() {
            return Err(DatasetError::Empty);
        }
        check_records(&records)?;

        let mut bounds = records[0].span;
        let mut byte_range = (records[0].byte_size, records[0].byte_size);
        for r in &records[1..] {
            bounds = bounds.hull(&r.span);
            byte_range.0 = byte_range.0.min(r.byte_size);
            byte_range.1 = byte_range.1.max(r.byte_size);
        }

        let index = TemporalIndex::build(
            records
                .iter()
                .enumerate()
                .map(|(position, r)| IntervalItem {
                    position,
                    span: r.span,
                })
                .collect(),
        );
        debug!(
            records = records.len(),
            min = bounds.start.millis(),
            max = bounds.end.millis(),
            "dataset indexed"
        );

        Ok(Self {
            records: records.into_iter().map(Rc::new).collect(),
            bounds,
            byte_range,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Rc<FlowRecord>] {
        &self.records
    }

    /// `[min start, max end]` over all records.
    pub fn bounds(&self) -> TimeSpan {
        self.bounds
    }

    /// Smallest and largest byte size.
    pub fn byte_range(&self) -> (u64, u64) {
        self.byte_range
    }

    pub fn get(&self, id: &FlowId) -> Option<&Rc<FlowRecord>> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Records with `start <= t <= end`, in input order.
    pub fn visible_at(&self, t: Time) -> Vec<Rc<FlowRecord>> {
        self.index
            .query_at_time(t)
            .into_iter()
            .map(|i| Rc::clone(&self.records[i]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Dataset, DatasetError};
    use crate::record::{FlowId, FlowRecord, GeoLocation, RecordError};
    use foundation::{Time, TimeSpan};
    use pretty_assertions::assert_eq;

    fn rec(id: &str, start: i64, end: i64, bytes: u64) -> FlowRecord {
        FlowRecord::new(
            id,
            GeoLocation::at(-0.1, 51.5),
            GeoLocation::at(2.35, 48.85),
            TimeSpan::new(Time(start), Time(end)),
            bytes,
        )
    }

    fn ids(records: &[std::rc::Rc<FlowRecord>]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn window_membership_follows_cursor() {
        let t0 = 1_450_000_000_000;
        let ds = Dataset::new(vec![rec("A", t0, t0 + 1_000, 10), rec("B", t0 + 500, t0 + 1_500, 20)])
            .expect("dataset");
        assert_eq!(ids(&ds.visible_at(Time(t0 + 700))), vec!["A", "B"]);
        assert_eq!(ids(&ds.visible_at(Time(t0 + 200))), vec!["A"]);
        assert_eq!(ids(&ds.visible_at(Time(t0 + 1_500))), vec!["B"]);
        assert!(ds.visible_at(Time(t0 + 1_600)).is_empty());
    }

    #[test]
    fn bounds_and_byte_range() {
        let ds = Dataset::new(vec![rec("x", 50, 60, 7), rec("y", 10, 20, 3), rec("z", 30, 90, 100)])
            .expect("dataset");
        assert_eq!(ds.bounds(), TimeSpan::new(Time(10), Time(90)));
        assert_eq!(ds.byte_range(), (3, 100));
        assert_eq!(ds.len(), 3);
        assert!(ds.get(&FlowId::from("y")).is_some());
    }

    #[test]
    fn rejects_empty_duplicate_and_invalid_input() {
        assert_eq!(Dataset::new(Vec::new()).unwrap_err(), DatasetError::Empty);
        assert_eq!(
            Dataset::new(vec![rec("a", 0, 1, 1), rec("a", 2, 3, 1)]).unwrap_err(),
            DatasetError::DuplicateId(FlowId::from("a"))
        );
        let err = Dataset::new(vec![rec("a", 0, 1, 1), rec("b", 9, 3, 1)]).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::InvalidRecord {
                position: 1,
                source: RecordError::InvertedSpan { .. }
            }
        ));
    }
}
