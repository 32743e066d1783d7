use crate::{
    describe,
    field::{Field, FieldKind, FieldValue},
    CronError, Result,
};
use chrono::{DateTime, Datelike, TimeDelta, Timelike, Utc};
use chrono_tz::Tz;
use std::{fmt::Display, str::FromStr};
use tracing::debug;

/// Upper bound on the number of minutes a single occurrence search may scan:
/// one year's worth. This is the sole safeguard against a non-terminating
/// search over an unsatisfiable schedule (e.g. February 31st), so it is
/// enforced unconditionally, whatever the requested count.
pub const SEARCH_CEILING_MINUTES: u32 = 525_600;

/// Shorthand aliases and their canonical 5-field expansions.
const ALIASES: &[(&str, &str)] = &[
    ("@yearly", "0 0 1 1 *"),
    ("@annually", "0 0 1 1 *"),
    ("@monthly", "0 0 1 * *"),
    ("@weekly", "0 0 * * 0"),
    ("@daily", "0 0 * * *"),
    ("@midnight", "0 0 * * *"),
    ("@hourly", "0 * * * *"),
];

/// Represents a parsed cron schedule with its methods.
///
/// For cron schedule clarification and usage examples, please refer to the [crate documentation](crate).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String")]
#[serde(into = "String")]
pub struct Schedule {
    expression: String,
    minute: Field,
    hour: Field,
    dom: Field,
    month: Field,
    dow: Field,
}

impl Schedule {
    /// Parses and validates provided `expression` and constructs [`Schedule`] instance.
    ///
    /// The expression is trimmed and alias-expanded first; the original
    /// (pre-expansion) text is retained and echoed by [`Display`].
    ///
    /// Alternative way to construct [`Schedule`] is to use one of `try_from` or `from_str` methods.
    ///
    /// Returns [`CronError`] in a case provided expression is unparsable or has format errors.
    pub fn new(expression: impl Into<String>) -> Result<Self> {
        let expression = expression.into().trim().to_owned();
        let expanded = expand_alias(&expression)?;

        let elements: Vec<&str> = expanded.split_whitespace().collect();
        if elements.len() != 5 {
            let count = elements.len();
            return Err(CronError::InvalidFieldCount { expression, count });
        }

        let minute = Field::parse(FieldKind::Minute, elements[0])?;
        let hour = Field::parse(FieldKind::Hour, elements[1])?;
        let dom = Field::parse(FieldKind::DayOfMonth, elements[2])?;
        let month = Field::parse(FieldKind::Month, elements[3])?;
        let dow = Field::parse(FieldKind::DayOfWeek, elements[4])?;

        Ok(Self {
            expression,
            minute,
            hour,
            dom,
            month,
            dow,
        })
    }

    /// Return time of the upcoming cron event in `timezone`, starting from
    /// the minute after the provided `from` instant.
    ///
    /// Returns `None` if there is no event within the scan ceiling.
    #[inline]
    pub fn upcoming(&self, timezone: &str, from: &DateTime<Utc>) -> Result<Option<DateTime<Utc>>> {
        Ok(self.occurrences(timezone, from, 1)?.into_iter().next())
    }

    /// Returns the next `count` occurrences of the schedule in `timezone`,
    /// as UTC instants, starting from the minute after `from`.
    ///
    /// The timezone identifier is validated once, up front; an unknown name
    /// fails with [`CronError::InvalidTimeZone`] before any search work.
    ///
    /// The search scans at most [`SEARCH_CEILING_MINUTES`] minutes, so the
    /// result may hold fewer than `count` instants when the schedule has no
    /// further occurrences within that horizon. That outcome is a data
    /// result, not an error.
    pub fn occurrences(&self, timezone: &str, from: &DateTime<Utc>, count: usize) -> Result<Vec<DateTime<Utc>>> {
        let tz = Tz::from_str(timezone).map_err(|_| CronError::InvalidTimeZone(timezone.to_owned()))?;
        let found: Vec<DateTime<Utc>> = self.iter(tz, from).take(count).collect();

        if found.len() < count {
            debug!(
                schedule = %self,
                timezone,
                found = found.len(),
                requested = count,
                "occurrence search exhausted the scan ceiling"
            );
        }

        Ok(found)
    }

    /// Returns iterator of the schedule's occurrences in `tz` (as UTC
    /// instants), starting from the minute after `from` and ending when the
    /// scan ceiling is exhausted.
    #[inline]
    pub fn iter(&self, tz: Tz, from: &DateTime<Utc>) -> impl Iterator<Item = DateTime<Utc>> {
        // Cut off seconds and sub-seconds, then advance one whole minute:
        // the search never yields `from` itself, nor any instant in its past.
        let current = from
            .with_second(0)
            .and_then(|dt| dt.with_nanosecond(0))
            .and_then(|dt| dt.checked_add_signed(TimeDelta::minutes(1)))
            .map(|dt| dt.with_timezone(&tz));

        ScheduleIterator {
            schedule: self.clone(),
            current,
            budget: SEARCH_CEILING_MINUTES,
        }
    }

    /// Builds the human-readable description of the schedule.
    #[inline]
    pub fn description(&self) -> String {
        describe::describe(self)
    }

    /// True when every local wall-clock component of `local` is selected by
    /// the schedule. The weekday comes from the timezone-local calendar date,
    /// not from the UTC day, so matching stays correct near midnight.
    fn matches_local(&self, local: &DateTime<Tz>) -> bool {
        self.month.contains(local.month() as FieldValue)
            && self.dom.contains(local.day() as FieldValue)
            && self.dow.contains(local.weekday().num_days_from_sunday() as FieldValue)
            && self.hour.contains(local.hour() as FieldValue)
            && self.minute.contains(local.minute() as FieldValue)
    }

    /// Fields in canonical order.
    pub(crate) fn fields(&self) -> [&Field; 5] {
        [&self.minute, &self.hour, &self.dom, &self.month, &self.dow]
    }
}

/// Rewrites a shorthand alias into its canonical 5-field form.
///
/// `@reboot` has no periodic expansion, so it fails explicitly instead of
/// being treated as "never" or "now"; unknown input passes through for the
/// field parser to judge.
fn expand_alias(expression: &str) -> Result<&str> {
    if expression == "@reboot" {
        return Err(CronError::UnsupportedAlias(expression.to_owned()));
    }

    Ok(ALIASES
        .iter()
        .find(|(alias, _)| *alias == expression)
        .map_or(expression, |(_, expansion)| expansion))
}

/// Contains iterator state: the cursor in the schedule's timezone and the
/// remaining scan budget, shared across all yields of one search.
#[derive(Debug, Clone)]
struct ScheduleIterator {
    schedule: Schedule,
    current: Option<DateTime<Tz>>,
    budget: u32,
}

impl Iterator for ScheduleIterator {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.budget > 0 {
            self.budget -= 1;

            let candidate = self.current.clone()?;
            self.current = candidate.clone().checked_add_signed(TimeDelta::minutes(1));

            if self.schedule.matches_local(&candidate) {
                return Some(candidate.with_timezone(&Utc));
            }
        }

        None
    }
}

impl From<Schedule> for String {
    fn from(value: Schedule) -> Self {
        value.to_string()
    }
}

impl From<&Schedule> for String {
    fn from(value: &Schedule) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Schedule {
    type Error = CronError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&String> for Schedule {
    type Error = CronError;

    fn try_from(value: &String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Schedule {
    type Error = CronError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl FromStr for Schedule {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.expression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rstest_reuse::{apply, template};
    use std::time::Duration;

    fn utc(timestamp: &str) -> DateTime<Utc> {
        timestamp.parse().unwrap()
    }

    fn utc_all(timestamps: &[&str]) -> Vec<DateTime<Utc>> {
        timestamps.iter().map(|t| utc(t)).collect()
    }

    #[rstest]
    #[case("* * * * *", "UTC", "2024-01-01T00:00:30Z", 3, &["2024-01-01T00:01:00Z", "2024-01-01T00:02:00Z", "2024-01-01T00:03:00Z"])]
    // A minute-aligned "now" is never returned as "right now".
    #[case("* * * * *", "UTC", "2024-01-01T00:00:00Z", 1, &["2024-01-01T00:01:00Z"])]
    #[case("30 9 * * *", "UTC", "2024-01-01T10:00:00Z", 2, &["2024-01-02T09:30:00Z", "2024-01-03T09:30:00Z"])]
    #[case("30 9 * * *", "America/New_York", "2024-01-01T00:00:00Z", 1, &["2024-01-01T14:30:00Z"])]
    // DST starts on 2024-03-10 in America/New_York: the UTC offset of
    // "09:30 local" changes from -05:00 to -04:00 across the transition.
    #[case("30 9 * * *", "America/New_York", "2024-03-09T00:00:00Z", 2, &["2024-03-09T14:30:00Z", "2024-03-10T13:30:00Z"])]
    // 02:30 local does not exist on the spring-forward day; the next hit is a day later.
    #[case("30 2 * * *", "America/New_York", "2024-03-09T12:00:00Z", 2, &["2024-03-11T06:30:00Z", "2024-03-12T06:30:00Z"])]
    // 01:30 local happens twice on the fall-back day (2024-11-03); both instants match.
    #[case("30 1 * * *", "America/New_York", "2024-11-03T00:00:00Z", 3, &["2024-11-03T05:30:00Z", "2024-11-03T06:30:00Z", "2024-11-04T06:30:00Z"])]
    // The weekday is taken from the local calendar date: 2024-01-07T16:00Z
    // is still Sunday in UTC but already Monday 01:00 in Tokyo.
    #[case("0 1 * * MON", "Asia/Tokyo", "2024-01-07T15:00:00Z", 1, &["2024-01-07T16:00:00Z"])]
    #[case("0 12 * * *", "UTC", "2024-06-01T00:00:00Z", 1, &["2024-06-01T12:00:00Z"])]
    #[case("0 12 * * *", "Asia/Tokyo", "2024-06-01T00:00:00Z", 1, &["2024-06-01T03:00:00Z"])]
    #[case("*/15 9-17 * * MON-FRI", "UTC", "2024-01-01T08:50:00Z", 3, &["2024-01-01T09:00:00Z", "2024-01-01T09:15:00Z", "2024-01-01T09:30:00Z"])]
    #[case("0 0 * * 0", "UTC", "2024-01-01T00:00:00Z", 2, &["2024-01-07T00:00:00Z", "2024-01-14T00:00:00Z"])]
    #[case("0 0 * * 7", "UTC", "2024-01-01T00:00:00Z", 2, &["2024-01-07T00:00:00Z", "2024-01-14T00:00:00Z"])]
    #[case("0 0 29 2 *", "UTC", "2023-12-01T00:00:00Z", 1, &["2024-02-29T00:00:00Z"])]
    #[case("0 0 1 1 *", "UTC", "2024-06-01T00:00:00Z", 1, &["2025-01-01T00:00:00Z"])]
    #[case("@daily", "UTC", "2025-03-31T00:00:21Z", 3, &["2025-04-01T00:00:00Z", "2025-04-02T00:00:00Z", "2025-04-03T00:00:00Z"])]
    #[case("@hourly", "UTC", "2025-03-31T00:00:21Z", 2, &["2025-03-31T01:00:00Z", "2025-03-31T02:00:00Z"])]
    #[timeout(Duration::from_secs(60))]
    fn test_occurrences(
        #[case] expression: &str,
        #[case] timezone: &str,
        #[case] from: &str,
        #[case] count: usize,
        #[case] expected: &[&str],
    ) {
        let schedule = Schedule::new(expression).unwrap();
        let occurrences = schedule.occurrences(timezone, &utc(from), count).unwrap();

        assert_eq!(
            occurrences,
            utc_all(expected),
            "expression = {expression}, timezone = {timezone}, from = {from}"
        );
    }

    #[rstest]
    #[timeout(Duration::from_secs(60))]
    fn test_occurrences_are_strictly_increasing_minutes() {
        let schedule = Schedule::new("* * * * *").unwrap();
        let occurrences = schedule.occurrences("UTC", &utc("2024-05-05T05:05:05Z"), 3).unwrap();

        assert_eq!(occurrences.len(), 3);
        for pair in occurrences.windows(2) {
            assert_eq!(pair[1] - pair[0], TimeDelta::minutes(1));
        }
    }

    #[rstest]
    #[timeout(Duration::from_secs(60))]
    fn test_aliases_match_canonical_expansion() {
        let from = utc("2024-07-15T13:45:10Z");
        for (alias, expansion) in ALIASES {
            let aliased = Schedule::new(*alias).unwrap();
            let canonical = Schedule::new(*expansion).unwrap();

            assert_eq!(
                aliased.occurrences("UTC", &from, 3).unwrap(),
                canonical.occurrences("UTC", &from, 3).unwrap(),
                "alias = {alias}"
            );
            assert_eq!(aliased.description(), canonical.description(), "alias = {alias}");
        }
    }

    #[test]
    fn test_reboot_alias_is_rejected() {
        assert_eq!(
            Schedule::new("@reboot").unwrap_err(),
            CronError::UnsupportedAlias(String::from("@reboot"))
        );
    }

    #[rstest]
    #[case("* * * *", 4)]
    #[case("* * * * * *", 6)]
    #[case("", 0)]
    #[case("@every_minute", 1)]
    fn test_invalid_field_count(#[case] expression: &str, #[case] expected_count: usize) {
        assert!(
            matches!(
                Schedule::new(expression),
                Err(CronError::InvalidFieldCount { count, .. }) if count == expected_count
            ),
            "expression = {expression}"
        );
    }

    #[rstest]
    #[case("60 * * * *", FieldKind::Minute)]
    #[case("* 24 * * *", FieldKind::Hour)]
    #[case("* * 0 * *", FieldKind::DayOfMonth)]
    #[case("* * 32 * *", FieldKind::DayOfMonth)]
    #[case("* * * 13 *", FieldKind::Month)]
    #[case("* * * * 8", FieldKind::DayOfWeek)]
    #[case("5abc * * * *", FieldKind::Minute)]
    fn test_invalid_value_fails_fast(#[case] expression: &str, #[case] expected_field: FieldKind) {
        assert!(
            matches!(
                Schedule::new(expression),
                Err(CronError::InvalidValue { field, .. }) if field == expected_field
            ),
            "expression = {expression}"
        );
    }

    #[rstest]
    #[case("1-2-3 * * * *")]
    #[case("* * * DEC-JAN *")]
    #[case("* * * * SAT-SUN")]
    fn test_invalid_range_fails(#[case] expression: &str) {
        assert!(
            matches!(Schedule::new(expression), Err(CronError::InvalidRange { .. })),
            "expression = {expression}"
        );
    }

    #[rstest]
    #[case("*/0 * * * *")]
    #[case("*/-1 * * * *")]
    fn test_invalid_step_fails(#[case] expression: &str) {
        assert!(
            matches!(Schedule::new(expression), Err(CronError::InvalidStep { .. })),
            "expression = {expression}"
        );
    }

    #[test]
    fn test_invalid_timezone_is_checked_up_front() {
        let schedule = Schedule::new("* * * * *").unwrap();
        assert_eq!(
            schedule.occurrences("Mars/Olympus", &utc("2024-01-01T00:00:00Z"), 1).unwrap_err(),
            CronError::InvalidTimeZone(String::from("Mars/Olympus"))
        );
    }

    #[rstest]
    #[timeout(Duration::from_secs(120))]
    fn test_unsatisfiable_schedule_hits_ceiling() {
        // February 31st never exists: the scan runs to the ceiling and
        // returns a short (here: empty) result instead of looping forever.
        let schedule = Schedule::new("0 0 31 2 *").unwrap();
        let occurrences = schedule.occurrences("UTC", &utc("2024-01-01T00:00:00Z"), 1).unwrap();
        assert!(occurrences.is_empty());
    }

    #[rstest]
    #[timeout(Duration::from_secs(120))]
    fn test_ceiling_limits_horizon_to_one_year() {
        // Next Feb 29 after 2024-03-01 is 2028: out of the one-year horizon.
        let schedule = Schedule::new("0 0 29 2 *").unwrap();
        let occurrences = schedule.occurrences("UTC", &utc("2024-03-01T00:00:00Z"), 1).unwrap();
        assert!(occurrences.is_empty());
    }

    #[rstest]
    #[timeout(Duration::from_secs(60))]
    fn test_occurrences_always_land_on_the_local_wall_clock_time() {
        // Spans the 2024-03-10 DST transition, so the UTC offset changes
        // mid-run while the local wall-clock time must not.
        let schedule = Schedule::new("30 9 * * *").unwrap();
        let occurrences = schedule
            .occurrences("America/New_York", &utc("2024-03-01T00:00:00Z"), 20)
            .unwrap();

        assert_eq!(occurrences.len(), 20);
        for instant in occurrences {
            let local = instant.with_timezone(&Tz::America__New_York);
            assert_eq!((local.hour(), local.minute()), (9, 30), "instant = {instant}");
        }
    }

    #[rstest]
    #[timeout(Duration::from_secs(60))]
    fn test_timezone_changes_matching_not_only_formatting() {
        let schedule = Schedule::new("30 9 * * *").unwrap();
        let from = utc("2024-06-01T00:00:00Z");

        let in_utc = schedule.occurrences("UTC", &from, 2).unwrap();
        let in_tokyo = schedule.occurrences("Asia/Tokyo", &from, 2).unwrap();

        assert_ne!(in_utc, in_tokyo);
    }

    #[rstest]
    #[timeout(Duration::from_secs(60))]
    fn test_weekday_seven_equals_zero_everywhere() {
        let from = utc("2024-01-01T00:00:00Z");
        let with_seven = Schedule::new("0 0 * * 7").unwrap();
        let with_zero = Schedule::new("0 0 * * 0").unwrap();

        assert_eq!(
            with_seven.occurrences("UTC", &from, 5).unwrap(),
            with_zero.occurrences("UTC", &from, 5).unwrap()
        );
        assert_eq!(with_seven.description(), with_zero.description());
    }

    #[rstest]
    #[timeout(Duration::from_secs(60))]
    fn test_upcoming() {
        let schedule = Schedule::new("30 9 * * *").unwrap();
        let next = schedule.upcoming("UTC", &utc("2024-01-01T10:00:00Z")).unwrap();
        assert_eq!(next, Some(utc("2024-01-02T09:30:00Z")));

        let schedule = Schedule::new("0 0 31 2 *").unwrap();
        let next = schedule.upcoming("UTC", &utc("2024-01-01T10:00:00Z")).unwrap();
        assert_eq!(next, None);
    }

    #[rstest]
    #[timeout(Duration::from_secs(60))]
    fn test_iter_respects_shared_budget() {
        let schedule = Schedule::new("* * * * *").unwrap();
        let count = schedule.iter(Tz::UTC, &utc("2024-01-01T00:00:00Z")).count();
        assert_eq!(count as u32, SEARCH_CEILING_MINUTES);
    }

    #[template]
    #[rstest]
    #[case("* * * * *")]
    #[case("*/15 * * * *")]
    #[case("30 9 * * MON-FRI")]
    #[case("0 0 1 1 *")]
    #[case("0 12 * JAN-JUN 1-5")]
    #[case("@daily")]
    #[case("@hourly")]
    fn valid_schedules_to_test(#[case] input: &str) {}

    #[apply(valid_schedules_to_test)]
    fn test_schedule_display_echoes_original(#[case] input: &str) {
        assert_eq!(Schedule::new(input).unwrap().to_string(), input);
    }

    #[apply(valid_schedules_to_test)]
    fn test_try_from_string(#[case] input: &str) {
        // &str
        let schedule1 = Schedule::new(input).unwrap();
        let schedule2 = Schedule::try_from(input).unwrap();
        assert_eq!(schedule1, schedule2);

        // &String
        let tst_string = String::from(input);
        let schedule2 = Schedule::try_from(&tst_string).unwrap();
        assert_eq!(schedule1, schedule2);

        // String
        let schedule2 = Schedule::try_from(tst_string).unwrap();
        assert_eq!(schedule1, schedule2);

        // from_str
        let schedule2 = Schedule::from_str(input).unwrap();
        assert_eq!(schedule1, schedule2);
    }

    #[apply(valid_schedules_to_test)]
    fn test_serde_round_trip(#[case] input: &str) {
        let schedule = Schedule::new(input).unwrap();
        let serialized = serde_json::to_string(&schedule).unwrap();

        assert_eq!(serialized, format!("\"{input}\""));
        assert_eq!(serde_json::from_str::<Schedule>(&serialized).unwrap(), schedule);
    }

    #[test]
    fn test_serde_deserialize_invalid() {
        assert!(serde_json::from_str::<Schedule>("\"61 * * * *\"").is_err());
        assert!(serde_json::from_str::<Schedule>("\"@reboot\"").is_err());
    }

    #[test]
    fn test_expression_is_trimmed() {
        let schedule = Schedule::new("  30 9 * * *  ").unwrap();
        assert_eq!(schedule.to_string(), "30 9 * * *");
    }
}
