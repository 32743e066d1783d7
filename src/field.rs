use crate::{utils, CronError, Result};
use std::{collections::BTreeSet, fmt::Display};

pub(crate) type FieldValue = u8;

/// Identifies one of the 5 positional fields of a cron expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKind {
    /// Minute of the hour, `0-59`.
    Minute,
    /// Hour of the day, `0-23`.
    Hour,
    /// Day of the month, `1-31`.
    DayOfMonth,
    /// Month of the year, `1-12` or `JAN-DEC`.
    Month,
    /// Day of the week, `0-7` or `SUN-SAT`; `7` is an alias for Sunday (`0`).
    DayOfWeek,
}

impl FieldKind {
    const DAY_LABELS: [&'static str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
    const MONTH_LABELS: [&'static str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    const MONTH_NAMES: &'static [(&'static str, FieldValue)] = &[
        ("jan", 1),
        ("feb", 2),
        ("mar", 3),
        ("apr", 4),
        ("may", 5),
        ("jun", 6),
        ("jul", 7),
        ("aug", 8),
        ("sep", 9),
        ("oct", 10),
        ("nov", 11),
        ("dec", 12),
        ("january", 1),
        ("february", 2),
        ("march", 3),
        ("april", 4),
        ("june", 6),
        ("july", 7),
        ("august", 8),
        ("september", 9),
        ("october", 10),
        ("november", 11),
        ("december", 12),
    ];

    // English abbreviations and full names, plus single-character Japanese tokens.
    const WEEKDAY_NAMES: &'static [(&'static str, FieldValue)] = &[
        ("sun", 0),
        ("mon", 1),
        ("tue", 2),
        ("wed", 3),
        ("thu", 4),
        ("fri", 5),
        ("sat", 6),
        ("sunday", 0),
        ("monday", 1),
        ("tuesday", 2),
        ("wednesday", 3),
        ("thursday", 4),
        ("friday", 5),
        ("saturday", 6),
        ("日", 0),
        ("月", 1),
        ("火", 2),
        ("水", 3),
        ("木", 4),
        ("金", 5),
        ("土", 6),
    ];

    /// Inclusive bounds of valid values. The day-of-week upper bound is 7:
    /// 7 is accepted on input and folded to 0 before it reaches a parsed set.
    pub(crate) fn bounds(&self) -> (FieldValue, FieldValue) {
        match self {
            Self::Minute => (0, 59),
            Self::Hour => (0, 23),
            Self::DayOfMonth => (1, 31),
            Self::Month => (1, 12),
            Self::DayOfWeek => (0, 7),
        }
    }

    fn names(&self) -> &'static [(&'static str, FieldValue)] {
        match self {
            Self::Minute | Self::Hour | Self::DayOfMonth => &[],
            Self::Month => Self::MONTH_NAMES,
            Self::DayOfWeek => Self::WEEKDAY_NAMES,
        }
    }

    /// Folds the day-of-week alias 7 to 0; every other value passes through.
    pub(crate) fn normalize(&self, value: FieldValue) -> FieldValue {
        if *self == Self::DayOfWeek && value == 7 {
            0
        } else {
            value
        }
    }

    /// Resolves a single token: digital value first, then the name table.
    pub(crate) fn resolve(&self, token: &str) -> Result<FieldValue> {
        let (min, max) = self.bounds();
        if let Some(value) = utils::parse_digital_value(token, min, max) {
            Ok(value)
        } else if let Some(value) = utils::parse_name_value(token, self.names()) {
            Ok(value)
        } else {
            Err(self.value_error(token))
        }
    }

    /// 3-letter label for a resolved value, for month and day-of-week fields.
    pub(crate) fn label(&self, value: FieldValue) -> Option<&'static str> {
        match self {
            Self::Month => Self::MONTH_LABELS.get((value as usize).checked_sub(1)?).copied(),
            Self::DayOfWeek => Self::DAY_LABELS.get(self.normalize(value) as usize).copied(),
            _ => None,
        }
    }

    pub(crate) fn value_error(&self, token: &str) -> CronError {
        CronError::InvalidValue {
            field: *self,
            value: token.to_owned(),
        }
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::DayOfMonth => "day of month",
            Self::Month => "month",
            Self::DayOfWeek => "day of week",
        };
        write!(f, "{name}")
    }
}

/// One parsed cron field: the expanded set of selected values
/// plus the raw text it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Field {
    kind: FieldKind,
    values: BTreeSet<FieldValue>,
    raw: String,
}

impl Field {
    /// Parses a single raw field into the set of values it selects.
    ///
    /// Grammar, per comma-separated segment: `base[/step]` where `base` is
    /// `*`, a single token, or a `start-end` range; tokens are numbers or
    /// name-table aliases. The resulting set is never empty: every accepted
    /// segment contributes at least one value.
    pub(crate) fn parse(kind: FieldKind, raw: &str) -> Result<Self> {
        let mut values = BTreeSet::new();

        for part in raw.split(',') {
            let part = part.trim();
            let (base, step) = match part.split_once('/') {
                Some((base, step)) => (base, parse_step(kind, part, step)?),
                None => (part, 1),
            };

            let (start, end) = if base == "*" {
                kind.bounds()
            } else if base.contains('-') {
                if base.matches('-').count() > 1 {
                    return Err(CronError::InvalidRange {
                        field: kind,
                        value: part.to_owned(),
                    });
                }
                let (start, end) = base.split_once('-').unwrap();
                let start = kind.resolve(start)?;
                let end = kind.resolve(end)?;
                if start > end {
                    return Err(CronError::InvalidRange {
                        field: kind,
                        value: part.to_owned(),
                    });
                }
                (start, end)
            } else {
                let value = kind.resolve(base)?;
                (value, value)
            };

            let mut value = u32::from(start);
            while value <= u32::from(end) {
                values.insert(kind.normalize(value as FieldValue));
                value += step;
            }
        }

        Ok(Self {
            kind,
            values,
            raw: raw.to_owned(),
        })
    }

    pub(crate) fn kind(&self) -> FieldKind {
        self.kind
    }

    pub(crate) fn raw(&self) -> &str {
        &self.raw
    }

    pub(crate) fn contains(&self, value: FieldValue) -> bool {
        self.values.contains(&value)
    }

    pub(crate) fn is_wildcard(&self) -> bool {
        self.raw == "*"
    }
}

/// Step values must be positive integers; zero, negatives and garbage all fail.
fn parse_step(kind: FieldKind, part: &str, step: &str) -> Result<u32> {
    match step.parse::<u32>() {
        Ok(step) if step > 0 => Ok(step),
        _ => Err(CronError::InvalidStep {
            field: kind,
            value: part.to_owned(),
        }),
    }
}
