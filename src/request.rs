use crate::{Result, Schedule};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

fn default_count() -> usize {
    5
}

fn default_timezone() -> String {
    String::from("UTC")
}

/// A single schedule evaluation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Cron expression: 5 fields or an `@`-alias.
    pub expression: String,
    /// Number of upcoming occurrences to compute (default: 5).
    #[serde(default = "default_count")]
    pub count: usize,
    /// IANA timezone the schedule's wall-clock fields refer to (default: UTC).
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Request {
    /// Creates a request with the default count and timezone.
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            count: default_count(),
            timezone: default_timezone(),
        }
    }

    /// Evaluates the request against the provided current instant.
    ///
    /// The timezone only affects which local wall-clock moments match;
    /// the response timestamps are always UTC. The occurrence list may be
    /// shorter than `count` when the schedule has no further occurrences
    /// within the search horizon (see [`Schedule::occurrences`]).
    pub fn execute(&self, now: &DateTime<Utc>) -> Result<Response> {
        let schedule = Schedule::new(self.expression.as_str())?;
        let occurrences = schedule.occurrences(&self.timezone, now, self.count)?;

        Ok(Response {
            expression: self.expression.clone(),
            description: schedule.description(),
            next_occurrences: occurrences
                .iter()
                .map(|instant| instant.to_rfc3339_opts(SecondsFormat::Millis, true))
                .collect(),
        })
    }
}

/// Result of a schedule evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// The original expression, echoed back before alias expansion.
    pub expression: String,
    /// Human-readable description of the schedule.
    pub description: String,
    /// Upcoming occurrences as ISO-8601 UTC timestamps.
    pub next_occurrences: Vec<String>,
}
