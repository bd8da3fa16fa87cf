//! Client-side validation of the analysis form.
//!
//! Every field is checked on each submit attempt and all failures are
//! reported together. Phone numbers are only required to be present.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::profile::{CompanyProfile, ProfileField};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    Required,
    InvalidFormat,
}

/// One failing form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: ProfileField,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    fn required(field: ProfileField) -> Self {
        let message = match field {
            ProfileField::CompanyName => "Company name is required.",
            ProfileField::CompanyEmail => "Company email is required.",
            ProfileField::CompanyPhone => "Company phone number is required.",
            ProfileField::PracticeArea => "Please select a practice area.",
        };
        Self {
            field,
            kind: FieldErrorKind::Required,
            message: message.to_string(),
        }
    }

    fn invalid_email() -> Self {
        Self {
            field: ProfileField::CompanyEmail,
            kind: FieldErrorKind::InvalidFormat,
            message: "Please enter a valid email address.".to_string(),
        }
    }
}

/// Form rejected before any request was made. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", summary(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// The failure recorded for `field`, if any.
    pub fn for_field(&self, field: ProfileField) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    pub fn fields(&self) -> impl Iterator<Item = ProfileField> + '_ {
        self.errors.iter().map(|e| e.field)
    }
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && EMAIL_RE.is_match(email)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate a profile for submission.
pub fn validate(profile: &CompanyProfile) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    if is_blank(&profile.company_name) {
        errors.push(FieldError::required(ProfileField::CompanyName));
    }
    if is_blank(&profile.company_email) {
        errors.push(FieldError::required(ProfileField::CompanyEmail));
    } else if !is_valid_email(&profile.company_email) {
        errors.push(FieldError::invalid_email());
    }
    if is_blank(&profile.company_phone) {
        errors.push(FieldError::required(ProfileField::CompanyPhone));
    }
    if is_blank(&profile.practice_area) {
        errors.push(FieldError::required(ProfileField::PracticeArea));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { errors })
    }
}
