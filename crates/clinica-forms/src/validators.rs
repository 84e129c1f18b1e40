//! Field validators.
//!
//! Each validator takes the value found at a field path (if any) and returns
//! `None` when the value passes or `Some(message)` when it does not.
//! Apart from [`required`], every validator treats an absent or blank value
//! as "not present" and lets it pass: a missing optional measurement is not
//! an invalid one.

use clinica_core::draft::{is_blank, numeric_value};
use clinica_core::{Draft, ErrorMap};
use serde_json::Value;

use crate::step::{FieldSpec, Pattern, Rule};

pub const REQUIRED_MESSAGE: &str = "This field is required";

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !is_blank(v))
}

pub fn required(value: Option<&Value>) -> Option<String> {
    match present(value) {
        Some(_) => None,
        None => Some(REQUIRED_MESSAGE.to_string()),
    }
}

pub fn number_in_range(value: Option<&Value>, min: f64, max: f64) -> Option<String> {
    let value = present(value)?;
    match numeric_value(value) {
        None => Some("Must be a number".to_string()),
        Some(n) if n < min || n > max => Some(format!("Must be between {min} and {max}")),
        Some(_) => None,
    }
}

pub fn integer(value: Option<&Value>) -> Option<String> {
    let value = present(value)?;
    match numeric_value(value) {
        None => Some("Must be a number".to_string()),
        Some(n) if n.fract() != 0.0 => Some("Must be a whole number".to_string()),
        Some(_) => None,
    }
}

pub fn identifier(value: Option<&Value>) -> Option<String> {
    match present(value)? {
        Value::String(_) | Value::Number(_) => None,
        _ => Some("Must be a valid identifier".to_string()),
    }
}

pub fn matches_pattern(value: Option<&Value>, pattern: Pattern) -> Option<String> {
    let value = present(value)?;
    let ok = value.as_str().map(str::trim).is_some_and(|s| match pattern {
        Pattern::Date => is_date(s),
        Pattern::Phone => is_phone(s),
        Pattern::Email => is_email(s),
    });
    if ok {
        return None;
    }
    Some(
        match pattern {
            Pattern::Date => "Enter a valid date (YYYY-MM-DD)",
            Pattern::Phone => "Enter a valid phone number",
            Pattern::Email => "Enter a valid email address",
        }
        .to_string(),
    )
}

pub fn one_of<S: AsRef<str>>(value: Option<&Value>, options: &[S]) -> Option<String> {
    let value = present(value)?;
    let matched = value
        .as_str()
        .is_some_and(|s| options.iter().any(|o| o.as_ref() == s));
    if matched {
        None
    } else {
        let listed: Vec<&str> = options.iter().map(AsRef::as_ref).collect();
        Some(format!("Must be one of: {}", listed.join(", ")))
    }
}

pub fn max_length(value: Option<&Value>, max: usize) -> Option<String> {
    let value = present(value)?;
    match value.as_str() {
        Some(s) if s.chars().count() > max => Some(format!("Must be at most {max} characters")),
        Some(_) => None,
        None => Some("Must be text".to_string()),
    }
}

/// A list of free-text entries, none of them blank.
pub fn string_list(value: Option<&Value>) -> Option<String> {
    let value = present(value)?;
    match value.as_array() {
        Some(items)
            if items
                .iter()
                .all(|item| item.as_str().is_some_and(|s| !s.trim().is_empty())) =>
        {
            None
        }
        Some(_) => Some("Entries cannot be blank".to_string()),
        None => Some("Must be a list".to_string()),
    }
}

/// Diastolic pressure must stay below systolic. Only checked when both are
/// present and numeric; range problems are reported by the range rules.
pub fn blood_pressure_pair(systolic: Option<&Value>, diastolic: Option<&Value>) -> Option<String> {
    let systolic = present(systolic).and_then(numeric_value)?;
    let diastolic = present(diastolic).and_then(numeric_value)?;
    if diastolic >= systolic {
        Some("Diastolic pressure must be lower than systolic pressure".to_string())
    } else {
        None
    }
}

/// `lhs` must not exceed `rhs` when both are present.
pub fn not_greater_than(lhs: Option<&Value>, rhs: Option<&Value>, rhs_label: &str) -> Option<String> {
    let lhs = present(lhs).and_then(numeric_value)?;
    let rhs = present(rhs).and_then(numeric_value)?;
    if lhs > rhs {
        Some(format!("Cannot be greater than {rhs_label}"))
    } else {
        None
    }
}

/// Apply one rule to a value.
pub fn check(rule: &Rule, value: Option<&Value>) -> Option<String> {
    match rule {
        Rule::Range { min, max } => number_in_range(value, *min, *max),
        Rule::Integer => integer(value),
        Rule::Identifier => identifier(value),
        Rule::Pattern { pattern } => matches_pattern(value, *pattern),
        Rule::OneOf { options } => one_of(value, options.as_slice()),
        Rule::MaxLength { max } => max_length(value, *max),
        Rule::StringList => string_list(value),
    }
}

/// Validate every field of a step. A field that fails `required` gets no
/// further messages; otherwise the first failing rule is reported.
///
/// When the field's own path is empty and it names an alternate path, the
/// alternate value stands in for it, and errors are still keyed by the
/// field's own path.
pub fn validate_fields(fields: &[FieldSpec], draft: &Draft) -> ErrorMap {
    let mut errors = ErrorMap::new();

    for field in fields {
        let value = present(draft.get_path(&field.path)).or_else(|| {
            field
                .alternate
                .as_deref()
                .and_then(|alt| present(draft.get_path(alt)))
        });

        if field.required && let Some(message) = required(value) {
            errors.insert(field.path.clone(), message);
            continue;
        }

        if let Some(message) = field.rules.iter().find_map(|rule| check(rule, value)) {
            errors.insert(field.path.clone(), message);
        }
    }

    errors
}

fn is_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    shaped && s.parse::<jiff::civil::Date>().is_ok()
}

fn is_phone(s: &str) -> bool {
    let body = s.strip_prefix('+').unwrap_or(s);
    if body.is_empty() || !body.starts_with(|c: char| c.is_ascii_digit() || c == '(') {
        return false;
    }
    if !body.ends_with(|c: char| c.is_ascii_digit()) {
        return false;
    }

    let mut digits = 0;
    let mut depth = 0i32;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' | '.' => {}
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => return false,
        }
    }
    depth == 0 && (7..=15).contains(&digits)
}

fn is_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|l| {
            !l.is_empty() && l.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
        && labels.last().is_some_and(|tld| tld.len() >= 2)
}
