//! Declarative request validation over JSON objects.

use crate::error::AppError;
use crate::response::FieldError;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::OnceLock;

/// JSON shape accepted for a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    String,
    /// A string or an integer; integers are normalised to their decimal string.
    StringOrInteger,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Email,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub format: Option<Format>,
    pub min_length: Option<usize>,
    pub trim: bool,
}

impl FieldSpec {
    pub const fn string(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::String,
            required: false,
            format: None,
            min_length: None,
            trim: true,
        }
    }

    pub const fn string_or_integer(name: &'static str) -> Self {
        Self {
            kind: FieldKind::StringOrInteger,
            ..Self::string(name)
        }
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    pub const fn email(self) -> Self {
        Self {
            format: Some(Format::Email),
            ..self
        }
    }

    /// Keep surrounding whitespace (passwords).
    pub const fn untrimmed(self) -> Self {
        Self { trim: false, ..self }
    }

    pub const fn min_length(self, min: usize) -> Self {
        Self {
            min_length: Some(min),
            ..self
        }
    }
}

/// Values that passed validation, keyed by field name.
#[derive(Debug, Default)]
pub struct Validated {
    values: HashMap<&'static str, String>,
}

impl Validated {
    pub fn take(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    /// Take a field declared `required`.
    pub fn take_required(&mut self, name: &str) -> Result<String, AppError> {
        self.take(name)
            .ok_or_else(|| AppError::field(name, format!("{} is required", name)))
    }
}

pub struct RequestValidator;

impl RequestValidator {
    /// Check every field and report all failures together.
    /// Fields not named in `fields` are ignored.
    pub fn validate(body: &Map<String, Value>, fields: &[FieldSpec]) -> Result<Validated, AppError> {
        let mut out = Validated::default();
        let mut errors = Vec::new();
        for spec in fields {
            match validate_field(spec, body.get(spec.name)) {
                Ok(Some(v)) => {
                    out.values.insert(spec.name, v);
                }
                Ok(None) => {}
                Err(message) => errors.push(FieldError::new(spec.name, message)),
            }
        }
        if errors.is_empty() {
            Ok(out)
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

fn validate_field(spec: &FieldSpec, value: Option<&Value>) -> Result<Option<String>, String> {
    let name = spec.name;
    let value = match value {
        None | Some(Value::Null) if spec.required => return Err(format!("{} is required", name)),
        None | Some(Value::Null) => return Ok(None),
        Some(v) => v,
    };

    let s = match (spec.kind, value) {
        (_, Value::String(s)) if spec.trim => s.trim().to_string(),
        (_, Value::String(s)) => s.clone(),
        (FieldKind::StringOrInteger, Value::Number(n)) if n.is_i64() || n.is_u64() => n.to_string(),
        (FieldKind::String, _) => return Err(format!("{} must be a string", name)),
        (FieldKind::StringOrInteger, _) => {
            return Err(format!("{} must be a string or an integer", name))
        }
    };

    if spec.required && s.is_empty() {
        return Err(format!("{} is required", name));
    }
    if let Some(min) = spec.min_length {
        if s.chars().count() < min {
            return Err(format!("{} must be at least {} characters", name, min));
        }
    }
    if spec.format == Some(Format::Email) && !is_email(&s) {
        return Err(format!("{} must be a valid email", name));
    }
    Ok(Some(s))
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("email pattern compiles")
    })
}

pub fn is_email(s: &str) -> bool {
    email_regex().is_match(s)
}
