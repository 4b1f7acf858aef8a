/// Instant in milliseconds since the Unix epoch.
///
/// Integer milliseconds keep cursor arithmetic exact.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Time(pub i64);

impl Time {
    pub fn millis(self) -> i64 {
        self.0
    }

    pub fn saturating_add_ms(self, ms: i64) -> Self {
        Time(self.0.saturating_add(ms))
    }

    pub fn clamp_to(self, span: TimeSpan) -> Self {
        Time(self.0.clamp(span.start.0, span.end.0.max(span.start.0)))
    }
}

/// Closed time interval `[start, end]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimeSpan {
    pub start: Time,
    pub end: Time,
}

impl TimeSpan {
    pub fn new(start: Time, end: Time) -> Self {
        Self { start, end }
    }

    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }

    pub fn duration_ms(&self) -> i64 {
        (self.end.0 - self.start.0).max(0)
    }

    /// Endpoints are inclusive.
    pub fn contains(&self, t: Time) -> bool {
        t >= self.start && t <= self.end
    }

    /// Smallest span covering both.
    pub fn hull(&self, other: &TimeSpan) -> TimeSpan {
        TimeSpan {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Time, TimeSpan};

    #[test]
    fn contains_is_inclusive() {
        let span = TimeSpan::new(Time(10), Time(20));
        assert!(!span.contains(Time(9)));
        assert!(span.contains(Time(10)));
        assert!(span.contains(Time(20)));
        assert!(!span.contains(Time(21)));
    }

    #[test]
    fn hull_and_clamp() {
        let a = TimeSpan::new(Time(10), Time(20));
        let b = TimeSpan::new(Time(15), Time(40));
        let h = a.hull(&b);
        assert_eq!(h, TimeSpan::new(Time(10), Time(40)));
        assert_eq!(Time(50).clamp_to(h), Time(40));
        assert_eq!(Time(0).clamp_to(h), Time(10));
        assert_eq!(h.duration_ms(), 30);
    }
}
