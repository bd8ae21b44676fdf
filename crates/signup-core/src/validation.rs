//! Field validation rules
//!
//! Pure, synchronous validators. Each returns `None` when the value passes
//! or the first [`FieldError`] it hits. Emptiness is always checked first so
//! that an empty field reports `Required` rather than a format violation.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::models::{Field, FieldError, FormValues};

pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 20;

const USERNAME_FORMAT: &str = "3-10 characters of small letters, numbers";
const PASSWORD_FORMAT: &str = "8-20 characters, at least two kinds of characters";
const STUDENT_ID_FORMAT: &str = "only 10 numbers";
const NAME_FORMAT: &str = "only English and Korean supported";

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9]{3,10}$").expect("valid username regex"))
}

/// Matches passwords made of a single character class
fn single_class_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([a-z]*|[A-Z]*|[0-9]*|[^a-zA-Z0-9]*)$").expect("valid password regex")
    })
}

fn student_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{10}$").expect("valid student id regex"))
}

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[가-힣a-zA-Z ]*$").expect("valid name regex"))
}

pub fn validate_username(value: &str) -> Option<FieldError> {
    if value.is_empty() {
        return Some(FieldError::Required);
    }
    if !username_regex().is_match(value) {
        return Some(FieldError::InvalidFormat(USERNAME_FORMAT));
    }
    None
}

/// 8-20 characters mixing at least two of: lowercase, uppercase, digits, symbols
pub fn validate_password(value: &str) -> Option<FieldError> {
    if value.is_empty() {
        return Some(FieldError::Required);
    }
    let len = value.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) || single_class_regex().is_match(value) {
        return Some(FieldError::InvalidFormat(PASSWORD_FORMAT));
    }
    None
}

/// Cross-field rule: the confirmation must equal the password exactly
pub fn validate_password_again(value: &str, password: &str) -> Option<FieldError> {
    if value.is_empty() {
        return Some(FieldError::Required);
    }
    if value != password {
        return Some(FieldError::Mismatch);
    }
    None
}

pub fn validate_student_id(value: &str) -> Option<FieldError> {
    if value.is_empty() {
        return Some(FieldError::Required);
    }
    if !student_id_regex().is_match(value) {
        return Some(FieldError::InvalidFormat(STUDENT_ID_FORMAT));
    }
    None
}

/// First and last names: Hangul syllables, Latin letters and spaces
pub fn validate_name(value: &str) -> Option<FieldError> {
    if value.is_empty() {
        return Some(FieldError::Required);
    }
    if !name_regex().is_match(value) {
        return Some(FieldError::InvalidFormat(NAME_FORMAT));
    }
    None
}

pub fn validate_major(value: &str) -> Option<FieldError> {
    if value.is_empty() {
        Some(FieldError::Required)
    } else {
        None
    }
}

/// Validate one field against the current values
pub fn validate_field(field: Field, values: &FormValues) -> Option<FieldError> {
    let value = values.get(field);
    match field {
        Field::Username => validate_username(value),
        Field::Password => validate_password(value),
        Field::PasswordAgain => validate_password_again(value, &values.password),
        Field::FirstName | Field::LastName => validate_name(value),
        Field::StudentId => validate_student_id(value),
        Field::Major => validate_major(value),
    }
}

/// Validate every field, returning only the failing ones
pub fn validate_all(values: &FormValues) -> BTreeMap<Field, FieldError> {
    Field::ALL
        .into_iter()
        .filter_map(|field| validate_field(field, values).map(|err| (field, err)))
        .collect()
}
