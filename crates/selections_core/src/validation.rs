//! crates/selections_core/src/validation.rs
//!
//! Field-level checks for the four client-editable selection fields.
//!
//! Only presence and type are checked: string length caps, integer parsing and
//! non-null structured data. Nothing here looks across fields or at other
//! records. All problems are collected before returning, keyed by field name.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::{NewSelection, SelectionChanges};

pub const PDF_NAME_MAX_CHARS: usize = 255;

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";
const NOT_BLANK: &str = "This field may not be blank.";
const NOT_STRING: &str = "Not a valid string.";
const NOT_INTEGER: &str = "A valid integer is required.";

/// Per-field validation messages. Body-level problems use `non_field_errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// `{"field": ["message", ...], ...}`
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(field, messages)| {
                let messages = messages.iter().cloned().map(Value::String).collect();
                (field.clone(), Value::Array(messages))
            })
            .collect();
        Value::Object(map)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{}: {}", field, messages.join(" "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validates a create (or full update) body. All four fields must be present.
pub fn validate_new_selection(body: &Value) -> Result<NewSelection, ValidationErrors> {
    let changes = validate_changes(body, false)?;
    match changes {
        SelectionChanges {
            pdf_name: Some(pdf_name),
            page_number: Some(page_number),
            selected_text: Some(selected_text),
            coordinates: Some(coordinates),
        } => Ok(NewSelection {
            pdf_name,
            page_number,
            selected_text,
            coordinates,
        }),
        // Non-partial validation already reported every absent field.
        _ => {
            let mut errors = ValidationErrors::default();
            errors.add("non_field_errors", "Incomplete selection.");
            Err(errors)
        }
    }
}

/// Validates an update body. With `partial`, absent fields are left as `None`;
/// otherwise every absent field is an error. Unknown and read-only keys
/// (`id`, `owner`, `created_at`) are ignored.
pub fn validate_changes(body: &Value, partial: bool) -> Result<SelectionChanges, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let object = match body {
        Value::Object(object) => object,
        other => {
            errors.add(
                "non_field_errors",
                format!(
                    "Invalid data. Expected a dictionary, but got {}.",
                    json_kind(other)
                ),
            );
            return Err(errors);
        }
    };

    let pdf_name = take_field(object, &mut errors, "pdf_name", partial);
    let page_number = take_field(object, &mut errors, "page_number", partial);
    let selected_text = take_field(object, &mut errors, "selected_text", partial);
    let coordinates = take_field(object, &mut errors, "coordinates", partial).cloned();

    let pdf_name =
        pdf_name.and_then(|v| check_text(&mut errors, "pdf_name", v, Some(PDF_NAME_MAX_CHARS)));
    let page_number = page_number.and_then(|v| check_integer(&mut errors, "page_number", v));
    let selected_text = selected_text.and_then(|v| check_text(&mut errors, "selected_text", v, None));

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(SelectionChanges {
        pdf_name,
        page_number,
        selected_text,
        coordinates,
    })
}

/// Looks up `name`, recording a missing (non-partial) or null value as an error.
fn take_field<'a>(
    object: &'a Map<String, Value>,
    errors: &mut ValidationErrors,
    name: &str,
    partial: bool,
) -> Option<&'a Value> {
    match object.get(name) {
        None => {
            if !partial {
                errors.add(name, REQUIRED);
            }
            None
        }
        Some(Value::Null) => {
            errors.add(name, NOT_NULL);
            None
        }
        Some(value) => Some(value),
    }
}

/// Strings are trimmed; numbers are accepted as their decimal text.
fn check_text(
    errors: &mut ValidationErrors,
    name: &str,
    value: &Value,
    max_chars: Option<usize>,
) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => {
            errors.add(name, NOT_STRING);
            return None;
        }
    };

    if text.is_empty() {
        errors.add(name, NOT_BLANK);
        return None;
    }

    if let Some(max) = max_chars {
        if text.chars().count() > max {
            errors.add(
                name,
                format!("Ensure this field has no more than {} characters.", max),
            );
            return None;
        }
    }

    Some(text)
}

/// Accepts JSON integers, integral floats (`3.0`) and strings holding either.
fn check_integer(errors: &mut ValidationErrors, name: &str, value: &Value) -> Option<i32> {
    let parsed: Option<i64> = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => parse_integer_text(s),
        _ => None,
    };

    let Some(parsed) = parsed else {
        errors.add(name, NOT_INTEGER);
        return None;
    };

    if parsed > i32::MAX as i64 {
        errors.add(
            name,
            format!("Ensure this value is less than or equal to {}.", i32::MAX),
        );
        return None;
    }
    if parsed < i32::MIN as i64 {
        errors.add(
            name,
            format!("Ensure this value is greater than or equal to {}.", i32::MIN),
        );
        return None;
    }

    Some(parsed as i32)
}

fn parse_integer_text(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    // "12.000" is still an integer.
    let digits = match trimmed.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        Some(_) => return None,
        None => trimmed,
    };
    digits.parse::<i64>().ok()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
