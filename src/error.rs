use crate::field::FieldKind;
use thiserror::Error;

/// Crate specific Errors implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CronError {
    /// Expression does not split into exactly 5 fields.
    #[error("invalid cron expression \"{expression}\": expected 5 fields (minute hour day-of-month month day-of-week), got {count}")]
    InvalidFieldCount {
        /// The offending expression, after trimming and alias expansion.
        expression: String,
        /// Number of whitespace-separated fields actually found.
        count: usize,
    },
    /// Schedule alias without a periodic expansion (`@reboot`).
    #[error("unsupported alias: {0}")]
    UnsupportedAlias(String),
    /// Token is not a recognized name or an in-range number for its field.
    #[error("invalid {field} value: {value}")]
    InvalidValue {
        /// Field the token belongs to.
        field: FieldKind,
        /// The offending raw token.
        value: String,
    },
    /// Range with reversed bounds or more than one hyphen.
    #[error("invalid range in {field} field: {value}")]
    InvalidRange {
        /// Field the range belongs to.
        field: FieldKind,
        /// The offending raw segment.
        value: String,
    },
    /// Step value is not a positive integer.
    #[error("invalid step in {field} field: {value} (step must be a positive integer)")]
    InvalidStep {
        /// Field the step belongs to.
        field: FieldKind,
        /// The offending raw segment.
        value: String,
    },
    /// Timezone identifier is not a known IANA name.
    #[error("invalid timezone: {0}")]
    InvalidTimeZone(String),
}
