//! Report error types.

use thiserror::Error;
use uuid::Uuid;

use super::period::PeriodKind;

/// Errors that can occur during aggregation and report generation.
///
/// All variants are caller errors. Nothing is retried and no partial
/// result is returned alongside them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    /// A record lacks a field needed for aggregation.
    #[error("Record {record_id} is missing required field `{field}`")]
    InvalidRecord {
        /// The offending record.
        record_id: Uuid,
        /// Name of the missing field.
        field: &'static str,
    },

    /// Period number outside the valid range for its kind.
    #[error("Invalid {kind} period: {period}")]
    InvalidPeriod {
        /// Period kind requested.
        kind: PeriodKind,
        /// Period number requested.
        period: u32,
    },

    /// A sum exceeded the decimal range.
    #[error("Amount total overflowed while summing record {record_id}")]
    AmountOverflow {
        /// The record whose amount could not be added.
        record_id: Uuid,
    },

    /// Year outside the supported calendar range.
    #[error("Year {0} is outside the supported range 1-9999")]
    InvalidYear(i32),
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRecord { .. } => "INVALID_RECORD",
            Self::InvalidPeriod { .. } => "INVALID_PERIOD",
            Self::InvalidYear(_) => "INVALID_YEAR",
            Self::AmountOverflow { .. } => "AMOUNT_OVERFLOW",
        }
    }
}

impl From<ReportError> for buildcost_shared::AppError {
    fn from(err: ReportError) -> Self {
        Self::Validation(err.to_string())
    }
}
