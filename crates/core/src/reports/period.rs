//! Reporting periods and date bucketing.
//!
//! Every period is a half-open interval `[start, end)` of calendar dates. A
//! record dated exactly on a boundary belongs to the period that starts
//! there.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

use super::error::ReportError;
use crate::records::DatedRecord;

/// Earliest supported reporting year.
pub const MIN_YEAR: i32 = 1;
/// Latest supported reporting year.
pub const MAX_YEAR: i32 = 9999;

/// Granularity of a reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    /// One calendar month.
    Month,
    /// Three consecutive calendar months starting in January, April, July or October.
    Quarter,
    /// Twelve calendar months starting in January.
    Year,
}

impl PeriodKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    /// Valid period numbers for this kind. A year has a single period, `1`.
    #[must_use]
    pub const fn valid_periods(self) -> RangeInclusive<u32> {
        match self {
            Self::Month => 1..=12,
            Self::Quarter => 1..=4,
            Self::Year => 1..=1,
        }
    }

    const fn span_months(self) -> u32 {
        match self {
            Self::Month => 1,
            Self::Quarter => 3,
            Self::Year => 12,
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label of a period bucket: `2024-03`, `2024-Q1` or `2024`.
///
/// Ordering puts all months first, then quarters, then years, each
/// chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodLabel {
    /// A calendar month.
    Month {
        /// Calendar year.
        year: i32,
        /// Month, 1-12.
        month: u32,
    },
    /// A calendar quarter.
    Quarter {
        /// Calendar year.
        year: i32,
        /// Quarter, 1-4.
        quarter: u32,
    },
    /// A calendar year.
    Year(i32),
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month { year, month } => write!(f, "{year:04}-{month:02}"),
            Self::Quarter { year, quarter } => write!(f, "{year:04}-Q{quarter}"),
            Self::Year(year) => write!(f, "{year:04}"),
        }
    }
}

impl Serialize for PeriodLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A validated reporting period with its date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodSpec {
    kind: PeriodKind,
    year: i32,
    period: u32,
    start: NaiveDate,
    end: NaiveDate,
}

impl PeriodSpec {
    /// Builds a period, validating the year and the period number.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidYear` for years outside 1-9999 and
    /// `ReportError::InvalidPeriod` for a period number outside the kind's range
    /// (e.g., month 13 or quarter 5).
    pub fn new(kind: PeriodKind, year: i32, period: u32) -> Result<Self, ReportError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(ReportError::InvalidYear(year));
        }
        if !kind.valid_periods().contains(&period) {
            return Err(ReportError::InvalidPeriod { kind, period });
        }

        let first_month = match kind {
            PeriodKind::Month => period,
            PeriodKind::Quarter => (period - 1) * 3 + 1,
            PeriodKind::Year => 1,
        };
        let start = month_start(year, first_month)?;
        let (end_year, end_month) = add_months(year, first_month, kind.span_months());
        let end = month_start(end_year, end_month)?;

        Ok(Self {
            kind,
            year,
            period,
            start,
            end,
        })
    }

    /// A single calendar month.
    pub fn month(year: i32, month: u32) -> Result<Self, ReportError> {
        Self::new(PeriodKind::Month, year, month)
    }

    /// A calendar quarter.
    pub fn quarter(year: i32, quarter: u32) -> Result<Self, ReportError> {
        Self::new(PeriodKind::Quarter, year, quarter)
    }

    /// A calendar year.
    pub fn year(year: i32) -> Result<Self, ReportError> {
        Self::new(PeriodKind::Year, year, 1)
    }

    /// Period kind.
    #[must_use]
    pub const fn kind(&self) -> PeriodKind {
        self.kind
    }

    /// Calendar year the period starts in.
    #[must_use]
    pub const fn reference_year(&self) -> i32 {
        self.year
    }

    /// Period number within the year.
    #[must_use]
    pub const fn reference_period(&self) -> u32 {
        self.period
    }

    /// First day of the period (inclusive).
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// First day after the period (exclusive).
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Label of the period.
    #[must_use]
    pub const fn label(&self) -> PeriodLabel {
        match self.kind {
            PeriodKind::Month => PeriodLabel::Month {
                year: self.year,
                month: self.period,
            },
            PeriodKind::Quarter => PeriodLabel::Quarter {
                year: self.year,
                quarter: self.period,
            },
            PeriodKind::Year => PeriodLabel::Year(self.year),
        }
    }

    /// Returns true if `at` falls in `[start, end)`.
    #[must_use]
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.contains_date(at.date())
    }

    /// Returns true if `date` falls in `[start, end)`.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// Returns true if the whole calendar month lies inside this period.
    #[must_use]
    pub fn contains_month(&self, year: i32, month: u32) -> bool {
        NaiveDate::from_ymd_opt(year, month, 1).is_some_and(|d| self.contains_date(d))
    }

    /// Trend buckets for this period.
    ///
    /// - month: the month itself
    /// - quarter: its three months, then the quarter
    /// - year: its twelve months, then its four quarters
    pub fn buckets(&self) -> Result<Vec<Self>, ReportError> {
        match self.kind {
            PeriodKind::Month => Ok(vec![*self]),
            PeriodKind::Quarter => {
                let first = self.start.month();
                let mut buckets = (first..first + 3)
                    .map(|m| Self::month(self.year, m))
                    .collect::<Result<Vec<_>, _>>()?;
                buckets.push(*self);
                Ok(buckets)
            }
            PeriodKind::Year => {
                let months = (1..=12).map(|m| Self::month(self.year, m));
                let quarters = (1..=4).map(|q| Self::quarter(self.year, q));
                months.chain(quarters).collect()
            }
        }
    }
}

/// The month after `(year, month)`, rolling December into January of the next year.
#[must_use]
pub const fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn add_months(year: i32, month: u32, count: u32) -> (i32, u32) {
    (0..count).fold((year, month), |(y, m), _| next_month(y, m))
}

fn month_start(year: i32, month: u32) -> Result<NaiveDate, ReportError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(ReportError::InvalidYear(year))
}

/// Groups records into the trend buckets of a period.
///
/// Every bucket of the period is present in the result, empty or not.
/// Records dated outside the period land in no bucket.
///
/// # Errors
///
/// Returns `ReportError::InvalidPeriod` / `ReportError::InvalidYear` for an
/// out-of-range period, and `ReportError::InvalidRecord` for a record
/// without a date.
pub fn bucket_by_period<'a, R, I>(
    records: I,
    kind: PeriodKind,
    reference_year: i32,
    reference_period: u32,
) -> Result<BTreeMap<PeriodLabel, Vec<&'a R>>, ReportError>
where
    R: DatedRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let spec = PeriodSpec::new(kind, reference_year, reference_period)?;
    bucket_within(&spec, records)
}

/// Same as [`bucket_by_period`] for an already validated period.
pub fn bucket_within<'a, R, I>(
    spec: &PeriodSpec,
    records: I,
) -> Result<BTreeMap<PeriodLabel, Vec<&'a R>>, ReportError>
where
    R: DatedRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let buckets = spec.buckets()?;
    let mut grouped: BTreeMap<PeriodLabel, Vec<&'a R>> =
        buckets.iter().map(|b| (b.label(), Vec::new())).collect();

    for record in records {
        let at = record.occurred_at().ok_or(ReportError::InvalidRecord {
            record_id: record.record_id(),
            field: "occurred_at",
        })?;

        for bucket in &buckets {
            if bucket.contains(at)
                && let Some(members) = grouped.get_mut(&bucket.label())
            {
                members.push(record);
            }
        }
    }

    Ok(grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_range() {
        let spec = PeriodSpec::month(2024, 2).unwrap();
        assert_eq!(spec.start(), date(2024, 2, 1));
        assert_eq!(spec.end(), date(2024, 3, 1));
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        let spec = PeriodSpec::month(2024, 12).unwrap();
        assert_eq!(spec.end(), date(2025, 1, 1));
        assert_eq!(next_month(2024, 12), (2025, 1));
        assert_eq!(next_month(2024, 11), (2024, 12));
    }

    #[rstest]
    #[case(1, date(2024, 1, 1), date(2024, 4, 1))]
    #[case(2, date(2024, 4, 1), date(2024, 7, 1))]
    #[case(3, date(2024, 7, 1), date(2024, 10, 1))]
    #[case(4, date(2024, 10, 1), date(2025, 1, 1))]
    fn test_quarter_ranges(#[case] quarter: u32, #[case] start: NaiveDate, #[case] end: NaiveDate) {
        let spec = PeriodSpec::quarter(2024, quarter).unwrap();
        assert_eq!(spec.start(), start);
        assert_eq!(spec.end(), end);
    }

    #[test]
    fn test_year_range() {
        let spec = PeriodSpec::year(2023).unwrap();
        assert_eq!(spec.start(), date(2023, 1, 1));
        assert_eq!(spec.end(), date(2024, 1, 1));
    }

    #[rstest]
    #[case(PeriodKind::Month, 0)]
    #[case(PeriodKind::Month, 13)]
    #[case(PeriodKind::Quarter, 0)]
    #[case(PeriodKind::Quarter, 5)]
    #[case(PeriodKind::Year, 0)]
    #[case(PeriodKind::Year, 2)]
    fn test_out_of_range_period_rejected(#[case] kind: PeriodKind, #[case] period: u32) {
        assert_eq!(
            PeriodSpec::new(kind, 2024, period),
            Err(ReportError::InvalidPeriod { kind, period })
        );
    }

    #[test]
    fn test_out_of_range_year_rejected() {
        assert_eq!(PeriodSpec::year(0), Err(ReportError::InvalidYear(0)));
        assert_eq!(PeriodSpec::month(10_000, 1), Err(ReportError::InvalidYear(10_000)));
        assert!(PeriodSpec::month(9999, 12).is_ok());
    }

    #[test]
    fn test_boundary_is_half_open() {
        let march_first = date(2024, 3, 1).and_hms_opt(0, 0, 0).unwrap();
        let feb_last = date(2024, 2, 29).and_hms_opt(23, 59, 59).unwrap();

        let feb = PeriodSpec::month(2024, 2).unwrap();
        let mar = PeriodSpec::month(2024, 3).unwrap();

        assert!(mar.contains(march_first));
        assert!(!feb.contains(march_first));
        assert!(feb.contains(feb_last));
        assert!(!mar.contains(feb_last));
    }

    #[test]
    fn test_labels_display() {
        assert_eq!(PeriodSpec::month(2024, 3).unwrap().label().to_string(), "2024-03");
        assert_eq!(PeriodSpec::quarter(2024, 1).unwrap().label().to_string(), "2024-Q1");
        assert_eq!(PeriodSpec::year(2024).unwrap().label().to_string(), "2024");
    }

    #[test]
    fn test_quarter_buckets() {
        let labels: Vec<String> = PeriodSpec::quarter(2024, 4)
            .unwrap()
            .buckets()
            .unwrap()
            .iter()
            .map(|b| b.label().to_string())
            .collect();
        assert_eq!(labels, ["2024-10", "2024-11", "2024-12", "2024-Q4"]);
    }

    #[test]
    fn test_year_buckets() {
        let buckets = PeriodSpec::year(2024).unwrap().buckets().unwrap();
        assert_eq!(buckets.len(), 16);
        assert_eq!(
            buckets.iter().filter(|b| b.kind() == PeriodKind::Month).count(),
            12
        );
        assert_eq!(
            buckets.iter().filter(|b| b.kind() == PeriodKind::Quarter).count(),
            4
        );
    }

    #[test]
    fn test_label_ordering_months_before_quarters() {
        let month = PeriodLabel::Month { year: 2024, month: 12 };
        let quarter = PeriodLabel::Quarter { year: 2024, quarter: 1 };
        assert!(month < quarter);
        assert!(PeriodLabel::Month { year: 2024, month: 2 } < PeriodLabel::Month { year: 2024, month: 10 });
    }

    #[test]
    fn test_contains_month() {
        let q2 = PeriodSpec::quarter(2024, 2).unwrap();
        assert!(q2.contains_month(2024, 4));
        assert!(q2.contains_month(2024, 6));
        assert!(!q2.contains_month(2024, 7));
        assert!(!q2.contains_month(2024, 13));
    }
}
