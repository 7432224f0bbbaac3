//! Form Input Validation
//!
//! Field-rule validation for submitted form data. A rule set is an ordered
//! list of `(field, constraints)` pairs where the constraints are a
//! `|`-separated spec such as `"required|email|min:8"`. Unknown constraint
//! names are skipped, so a form can declare rules this build does not know.

use std::collections::HashMap;

/// Violations collected by [`validate`], in rule-declaration order.
///
/// Only fields with at least one violation appear; an empty collection
/// means the input passed every declared constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormErrors(Vec<(String, Vec<String>)>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First message of the first field with violations, if any.
    ///
    /// This is the message shown to the user when a form round-trips.
    pub fn first(&self) -> Option<&str> {
        self.0
            .first()
            .and_then(|(_, messages)| messages.first())
            .map(String::as_str)
    }

    /// All messages recorded for one field.
    pub fn field(&self, name: &str) -> &[String] {
        self.0
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, messages)| messages.as_slice())
            .unwrap_or(&[])
    }
}

/// Validate `input` against `rules`.
///
/// Values are trimmed before evaluation and a missing field is treated as
/// the empty string. Constraints run in declaration order and every
/// violated constraint is recorded, not just the first. Pure function of
/// its inputs.
pub fn validate(input: &HashMap<&str, &str>, rules: &[(&str, &str)]) -> FormErrors {
    let mut errors = Vec::new();

    for (field, spec) in rules {
        let value = input.get(field).map(|v| v.trim()).unwrap_or("");
        let mut messages = Vec::new();

        for constraint in spec.split('|') {
            let (name, parameter) = match constraint.split_once(':') {
                Some((name, parameter)) => (name, Some(parameter)),
                None => (constraint, None),
            };

            match name {
                "required" if value.is_empty() => {
                    messages.push("This field is required.".to_string());
                }
                "email" if !value.is_empty() && !is_valid_email(value) => {
                    messages.push("Please enter a valid email.".to_string());
                }
                "min" if !value.is_empty() => {
                    let min = parameter
                        .and_then(|p| p.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if value.chars().count() < min {
                        messages.push(format!("Must be at least {min} characters."));
                    }
                }
                _ => {}
            }
        }

        if !messages.is_empty() {
            errors.push((field.to_string(), messages));
        }
    }

    FormErrors(errors)
}

/// Syntactic email check shared with the `Email` value object.
///
/// Deliberately basic: one `@`, a non-empty local part of at most 64
/// characters, a dotted domain of hostname characters. Actual deliverability
/// is out of scope.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || local.len() > 64 {
        return false;
    }

    if domain.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }

    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return false;
    }

    if domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }
    if domain.starts_with('-') || domain.ends_with('-') {
        return false;
    }

    true
}
