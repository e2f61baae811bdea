//! Input validation.
//!
//! Each request shape has an explicit `validate` step that collects every problem into a
//! [`ValidationErrors`] list instead of stopping at the first one. The [`Validator`]
//! collector hands back a placeholder for a rejected field; callers must return the result
//! of [`Validator::finish`] before using any value it produced.

use hms_types::{EmailAddress, NonEmptyText, TextError};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All field errors found in one request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed")?;
        for (i, err) in self.0.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{} {}", sep, err.field, err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn text_error(&mut self, field: &str, err: TextError) {
        let message = match err {
            TextError::Empty => "is required".to_string(),
            TextError::TooShort { min } => format!("must be at least {} characters", min),
            TextError::TooLong { max } => format!("must be at most {} characters", max),
            TextError::InvalidEmail => "must be a valid email address".to_string(),
        };
        self.reject(field, message);
    }

    /// A mandatory trimmed string whose length lies in `min..=max`.
    pub fn required_text(
        &mut self,
        field: &str,
        value: Option<&str>,
        min: usize,
        max: usize,
    ) -> String {
        match NonEmptyText::bounded(value.unwrap_or_default(), min, max) {
            Ok(text) => text.into_string(),
            Err(err) => {
                self.text_error(field, err);
                String::new()
            }
        }
    }

    /// An optional string: absent stays `None`, present must satisfy `min..=max` once trimmed.
    pub fn optional_text(
        &mut self,
        field: &str,
        value: Option<&str>,
        min: usize,
        max: usize,
    ) -> Option<String> {
        let value = value?;
        match NonEmptyText::bounded(value, min, max) {
            Ok(text) => Some(text.into_string()),
            Err(err) => {
                self.text_error(field, err);
                None
            }
        }
    }

    /// A mandatory secret, checked for length only (never trimmed).
    pub fn required_secret(&mut self, field: &str, value: Option<&str>, min: usize) -> String {
        match value {
            Some(v) if v.chars().count() >= min => v.to_string(),
            Some(_) => {
                self.reject(field, format!("must be at least {} characters", min));
                String::new()
            }
            None => {
                self.reject(field, "is required");
                String::new()
            }
        }
    }

    pub fn required_email(&mut self, field: &str, value: Option<&str>) -> String {
        match EmailAddress::parse(value.unwrap_or_default()) {
            Ok(email) => email.as_str().to_string(),
            Err(err) => {
                self.text_error(field, err);
                String::new()
            }
        }
    }

    pub fn required<T: Default>(&mut self, field: &str, value: Option<T>) -> T {
        match value {
            Some(v) => v,
            None => {
                self.reject(field, "is required");
                T::default()
            }
        }
    }

    /// Parses an enumerated value; `allowed` is only used for the error message.
    pub fn parse_enum<T: FromStr>(
        &mut self,
        field: &str,
        value: Option<&str>,
        allowed: &[&str],
    ) -> Option<T> {
        let raw = value?.trim();
        match raw.parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                self.reject(field, format!("must be one of {}", allowed.join(", ")));
                None
            }
        }
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}
