/// Common utility functions.
use crate::field::FieldValue;

/// Converts string into unsigned number with bounds validation.
///
/// The whole token must be a valid integer: trailing garbage
/// (like `5abc`) makes the parse fail rather than yield a prefix.
pub(crate) fn parse_digital_value(input: &str, min: FieldValue, max: FieldValue) -> Option<FieldValue> {
    let value = input.parse::<FieldValue>();
    if let Ok(value) = value {
        if value < min || value > max {
            None
        } else {
            Some(value)
        }
    } else {
        None
    }
}

/// Converts string with mnemonic value representation into unsigned number.
///
/// Lookup is ASCII case-insensitive, so `MON`, `Mon` and `mon` are
/// equivalent; non-ASCII aliases (the localized single-character weekday
/// tokens) must match exactly.
pub(crate) fn parse_name_value(input: &str, names: &[(&str, FieldValue)]) -> Option<FieldValue> {
    if input.is_empty() {
        None
    } else {
        names
            .iter()
            .find(|(name, _)| input.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }
}
