//! Cron expression parser with timezone-aware next-occurrence search.
#![deny(unsafe_code, warnings, missing_docs)]

//! This is a small crate, intended to:
//! - parse classic 5-field cron schedule expressions;
//! - compute the next N future occurrences of a schedule in any IANA timezone;
//! - describe a schedule as a human-readable English phrase.
//!
//! _This is not a cron jobs scheduler or runner._ Nothing is executed at the
//! computed instants; the crate only answers "when would this schedule fire next?".
//!
//! ## Cron schedule format
//!
//! A schedule expression has the traditional 5-field format: minutes, hours,
//! days of month, months and days of week.
//!
//! The table below describes valid values and patterns of each field:
//!
//! | Field        | Allowed values  | Allowed special characters |
//! |--------------|-----------------|----------------------------|
//! | Minutes      | 0-59            | * , - /                    |
//! | Hours        | 0-23            | * , - /                    |
//! | Day of Month | 1-31            | * , - /                    |
//! | Month        | 1-12 or JAN-DEC | * , - /                    |
//! | Day of Week  | 0-7 or SUN-SAT  | * , - /                    |
//!
//! Patterns meanings:
//! - `*` - each possible value, i.e. `0,1,2,...,59` for minutes;
//! - `,` - list of values or patterns, i.e. `1,7,12`, `SUN,FRI`;
//! - `-` - range of values, i.e. `0-15`, `JAN-MAR` (no wraparound: `DEC-JAN` is invalid);
//! - `/` - repeating values, i.e. `*/12`, `10-40/15`.
//!
//! Month and day-of-week names are case-insensitive and may be spelled as
//! 3-letter abbreviations (`MON`, `jan`) or full English names (`monday`,
//! `January`); days of week additionally accept the single-character Japanese
//! tokens `日 月 火 水 木 金 土`. Day-of-week value `7` is an alias for Sunday
//! and is interchangeable with `0` everywhere.
//!
//! Also, short aliases for well-known schedule expressions are allowed:
//!
//! | Alias                      | Expression  |
//! |----------------------------|-------------|
//! | `@yearly` (or `@annually`) | `0 0 1 1 *` |
//! | `@monthly`                 | `0 0 1 * *` |
//! | `@weekly`                  | `0 0 * * 0` |
//! | `@daily` (or `@midnight`)  | `0 0 * * *` |
//! | `@hourly`                  | `0 * * * *` |
//!
//! `@reboot` is rejected with a distinct error: it has no periodic expansion.
//!
//! ## Timezones
//!
//! The occurrence search matches the schedule against wall-clock fields as
//! seen in a named IANA timezone, so daylight-saving transitions behave the
//! way a real cron daemon in that zone would: a skipped local time simply
//! does not occur, a repeated local time occurs twice. Returned instants are
//! always UTC; the timezone affects matching only.
//!
//! The search scans forward minute by minute from the instant after "now"
//! and gives up after [`schedule::SEARCH_CEILING_MINUTES`] minutes (one
//! year), so an unsatisfiable schedule yields a short or empty result
//! instead of looping forever.
//!
//! ## How to use
//!
//! The central entity of the crate is the [`Schedule`] structure with three
//! basic methods: [new()](Schedule::new) to parse and validate an expression,
//! [upcoming()](Schedule::upcoming)/[occurrences()](Schedule::occurrences) to
//! compute future instants, and [description()](Schedule::description) to
//! render the human-readable phrase. The [`Request`]/[`Response`] pair wraps
//! all of that into a single transport-agnostic call.
//!
//! ### Example with `upcoming`
//! ```rust
//! use chrono::{DateTime, Utc};
//! use cron_when::{Result, Schedule};
//!
//! fn upcoming() -> Result<()> {
//!     let schedule = Schedule::new("30 9 * * MON-FRI")?;
//!     let now: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
//!
//!     // Next weekday 09:30 in New York, expressed as a UTC instant
//!     let next = schedule.upcoming("America/New_York", &now)?;
//!     assert_eq!(next.unwrap().to_rfc3339(), "2024-01-01T14:30:00+00:00");
//!
//!     Ok(())
//! }
//! # upcoming().unwrap();
//! ```
//!
//! ### Example with `occurrences`
//! ```rust
//! use chrono::{DateTime, Utc};
//! use cron_when::{Result, Schedule};
//!
//! fn occurrences() -> Result<()> {
//!     let schedule = Schedule::new("@hourly")?;
//!     let now: DateTime<Utc> = "2024-01-01T10:20:30Z".parse().unwrap();
//!
//!     // Get the next 3 occurrences starting from now
//!     let next = schedule.occurrences("UTC", &now, 3)?;
//!     assert_eq!(next.len(), 3);
//!     assert_eq!(next[0].to_rfc3339(), "2024-01-01T11:00:00+00:00");
//!
//!     Ok(())
//! }
//! # occurrences().unwrap();
//! ```
//!
//! ### Example with `Request`
//! ```rust
//! use chrono::{DateTime, Utc};
//! use cron_when::{Request, Result};
//!
//! fn request() -> Result<()> {
//!     let request = Request::new("*/15 * * * *");
//!     let now: DateTime<Utc> = "2024-01-01T00:07:00Z".parse().unwrap();
//!
//!     let response = request.execute(&now)?;
//!     assert_eq!(response.description, "at minute */15");
//!     assert_eq!(response.next_occurrences[0], "2024-01-01T00:15:00.000Z");
//!
//!     Ok(())
//! }
//! # request().unwrap();
//! ```

mod describe;
/// Crate specific Error implementation.
pub mod error;
mod field;
/// Transport-agnostic request and response types.
pub mod request;
/// Cron schedule parser, occurrence search and description generator.
pub mod schedule;
mod utils;

// Re-export of public entities.
pub use error::CronError;
pub use field::FieldKind;
pub use request::{Request, Response};
pub use schedule::Schedule;

/// Convenient alias for `Result`.
pub type Result<T, E = CronError> = std::result::Result<T, E>;
