use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sequential identifier shared by every record collection.
pub type RecordId = u64;

/// Calendar date format used by records, range inputs, and exports.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Identifies records that expose a stable numeric identifier.
pub trait Identifiable {
    fn id(&self) -> RecordId;
}

/// Provides access to a human-friendly record name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Records that carry the calendar date they happened on.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// Returns the identifier a new record in `records` should receive.
///
/// Identifiers are one greater than the current maximum, so ids freed by a
/// deletion are never handed out again unless the maximum itself was removed.
pub fn next_id<T: Identifiable>(records: &[T]) -> RecordId {
    records
        .iter()
        .map(Identifiable::id)
        .max()
        .map_or(1, |max| max + 1)
}

/// Inclusive calendar-date range used by every report.
///
/// Dates compare as plain `(year, month, day)` values; no timezone is
/// involved at any point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Builds a range; `start > end` is allowed and matches nothing.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parses user-supplied `YYYY-MM-DD` bounds.
    ///
    /// Returns `None` when either side is empty or malformed, which callers
    /// treat as "no records in range".
    pub fn parse(start: &str, end: &str) -> Option<Self> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        Some(Self::new(start, end))
    }

    /// Range covering every representable date.
    pub fn everything() -> Self {
        Self::new(NaiveDate::MIN, NaiveDate::MAX)
    }

    /// The `days`-long window ending on `today` (inclusive on both ends).
    pub fn trailing_days(today: NaiveDate, days: u32) -> Self {
        let start = today
            .checked_sub_days(chrono::Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self::new(start, today)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

/// Parses a `YYYY-MM-DD` date, ignoring surrounding whitespace.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(RecordId);

    impl Identifiable for Row {
        fn id(&self) -> RecordId {
            self.0
        }
    }

    #[test]
    fn next_id_starts_at_one() {
        let rows: Vec<Row> = Vec::new();
        assert_eq!(next_id(&rows), 1);
    }

    #[test]
    fn next_id_skips_gaps_left_by_deletion() {
        let rows = vec![Row(1), Row(7), Row(3)];
        assert_eq!(next_id(&rows), 8);
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let range = DateRange::parse("2024-03-01", "2024-03-31").expect("valid range");
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()));
    }

    #[test]
    fn parse_rejects_blank_and_malformed_bounds() {
        assert!(DateRange::parse("", "2024-01-01").is_none());
        assert!(DateRange::parse("2024-01-01", "   ").is_none());
        assert!(DateRange::parse("01/02/2024", "2024-03-01").is_none());
    }

    #[test]
    fn reversed_range_matches_nothing() {
        let range = DateRange::parse("2024-05-01", "2024-04-01").unwrap();
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()));
    }
}
