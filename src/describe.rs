//! Human-readable schedule descriptions.
//!
//! Works from the raw field strings rather than the parsed sets, so the
//! user's original list/range/step structure survives into the phrase
//! instead of being enumerated value by value.

use crate::{
    field::{Field, FieldKind},
    schedule::Schedule,
};

/// Builds an English phrase describing the schedule, one clause per
/// non-wildcard field. All-wildcard schedules collapse to "every minute".
pub(crate) fn describe(schedule: &Schedule) -> String {
    let mut clauses = Vec::new();

    for field in schedule.fields() {
        if field.is_wildcard() {
            continue;
        }

        let clause = match field.kind() {
            FieldKind::Minute => format!("at minute {}", field.raw()),
            FieldKind::Hour => format!("at hour {}", field.raw()),
            FieldKind::DayOfMonth => format!("on day {}", field.raw()),
            FieldKind::Month => format!("in month {}", resolve_field(field)),
            FieldKind::DayOfWeek => format!("on {}", resolve_field(field)),
        };
        clauses.push(clause);
    }

    if clauses.is_empty() {
        String::from("every minute")
    } else {
        clauses.join(", ")
    }
}

/// Re-renders a raw field, mapping each name or in-range numeric token back
/// to its 3-letter label while preserving the list/range/step structure.
fn resolve_field(field: &Field) -> String {
    let kind = field.kind();

    field
        .raw()
        .split(',')
        .map(|part| {
            let part = part.trim();
            let (base, step) = match part.split_once('/') {
                Some((base, step)) => (base, Some(step)),
                None => (part, None),
            };

            let resolved = if base == "*" {
                String::from("*")
            } else if let Some((start, end)) = base.split_once('-') {
                format!("{}-{}", resolve_token(kind, start), resolve_token(kind, end))
            } else {
                resolve_token(kind, base)
            };

            match step {
                Some(step) => format!("{resolved}/{step}"),
                None => resolved,
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Maps a single token to its label; unresolvable tokens pass through as-is.
fn resolve_token(kind: FieldKind, token: &str) -> String {
    kind.resolve(token)
        .ok()
        .and_then(|value| kind.label(value))
        .map_or_else(|| token.to_owned(), String::from)
}
